use crate::index::error::IndexError;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A standardized index series: one optional score per month, immutable
/// once built. `None` marks months the fitter could not score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl IndexSeries {
    /// # Errors
    ///
    /// Returns [`IndexError::LengthMismatch`] when the two vectors differ
    /// in length.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Result<Self, IndexError> {
        if dates.len() != values.len() {
            return Err(IndexError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        Ok(Self { dates, values })
    }

    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Keeps entries whose date falls within the `[start_year, end_year]`
    /// calendar-year range (inclusive). The dashboard year selector calls
    /// this on every change; the source series is never mutated.
    pub fn filter_years(&self, start_year: i32, end_year: i32) -> IndexSeries {
        let (dates, values): (Vec<_>, Vec<_>) = self
            .iter()
            .filter(|(date, _)| date.year() >= start_year && date.year() <= end_year)
            .unzip();
        Self { dates, values }
    }
}
