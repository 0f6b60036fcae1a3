//! Turns a standardized index series into categorized observations and
//! aggregates them into the count and percentage tables the charts and the
//! dashboard read.

use crate::classify::category::Category;
use crate::classify::period::{Decade, PeriodGranularity, PeriodKey};
use crate::index::series::IndexSeries;
use chrono::{Datelike, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One classified index observation, denormalized with the grouping keys
/// every aggregation needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategorizedObservation {
    pub date: NaiveDate,
    pub value: f64,
    pub category: Category,
    pub year: i32,
    /// Calendar month 1-12.
    pub month: u32,
    /// `None` outside the 1981-2020 study period.
    pub decade: Option<Decade>,
}

/// Occurrence counts per category within one period bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    counts: [u32; Category::COUNT],
}

impl CategoryCounts {
    pub fn add(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    pub fn get(&self, category: Category) -> u32 {
        self.counts[category.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Percentage of observations per category within one period bucket.
/// Shares sum to 100 for every emitted row.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentageRow {
    pub period: PeriodKey,
    shares: [f64; Category::COUNT],
}

impl PercentageRow {
    pub fn share(&self, category: Category) -> f64 {
        self.shares[category.index()]
    }

    /// Shares in presentation order, driest category first.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL
            .iter()
            .map(move |category| (*category, self.shares[category.index()]))
    }
}

// Serialized as a flat record of named fields so downstream tables and
// chart callbacks can consume the rows without knowing the enum.
impl Serialize for PercentageRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT + 1))?;
        map.serialize_entry("period", &self.period.to_string())?;
        for (category, share) in self.iter() {
            map.serialize_entry(category.label(), &share)?;
        }
        map.end()
    }
}

/// Stateless classification and aggregation over an [`IndexSeries`].
pub struct IndexClassifier;

impl IndexClassifier {
    /// Classifies every scored entry of the series. Null and `NaN` index
    /// values carry no category and are excluded from all counts.
    pub fn classify(index: &IndexSeries) -> Vec<CategorizedObservation> {
        index
            .iter()
            .filter_map(|(date, value)| {
                let value = value.filter(|v| !v.is_nan())?;
                Some(CategorizedObservation {
                    date,
                    value,
                    category: Category::from_value(value),
                    year: date.year(),
                    month: date.month(),
                    decade: Decade::from_year(date.year()),
                })
            })
            .collect()
    }

    /// Counts category occurrences per period bucket.
    ///
    /// Decade grouping drops observations without a decade bucket; year and
    /// month grouping keep them.
    pub fn group_by_period(
        observations: &[CategorizedObservation],
        granularity: PeriodGranularity,
    ) -> BTreeMap<PeriodKey, CategoryCounts> {
        let mut grouped: BTreeMap<PeriodKey, CategoryCounts> = BTreeMap::new();
        for observation in observations {
            let key = match granularity {
                PeriodGranularity::Year => PeriodKey::Year(observation.year),
                PeriodGranularity::Month => PeriodKey::Month(observation.month),
                PeriodGranularity::Decade => match observation.decade {
                    Some(decade) => PeriodKey::Decade(decade),
                    None => continue,
                },
            };
            grouped.entry(key).or_default().add(observation.category);
        }
        grouped
    }

    /// Per-period category shares in percent, rows ordered chronologically.
    ///
    /// A period only appears when at least one observation fell into it, so
    /// every emitted row has a positive total and no division by zero can
    /// occur; periods with zero observations are omitted rather than padded
    /// with zero rows.
    pub fn occurrence_percentages(
        observations: &[CategorizedObservation],
        granularity: PeriodGranularity,
    ) -> Vec<PercentageRow> {
        Self::group_by_period(observations, granularity)
            .into_iter()
            .map(|(period, counts)| {
                let total = counts.total() as f64;
                let mut shares = [0.0; Category::COUNT];
                for category in Category::ALL {
                    shares[category.index()] = counts.get(category) as f64 * 100.0 / total;
                }
                PercentageRow { period, shares }
            })
            .collect()
    }
}
