//! Typed wrappers around the Polars `LazyFrame`s flowing through the
//! water-balance pipeline. Each wrapper pins the schema its stage expects
//! and keeps the benefits of lazy evaluation until a `collect_*` call.

use crate::error::SpeiError;
use crate::utils::date_from_days_since_epoch;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

/// One monthly observation series, schema `date: Date, value: Float64`,
/// sorted ascending by date.
#[derive(Clone)]
pub struct ObservationLazyFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl ObservationLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Returns a new frame with an arbitrary Polars predicate applied.
    pub fn filter(&self, predicate: Expr) -> ObservationLazyFrame {
        ObservationLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps observations whose date falls within the `[start_year, end_year]`
    /// calendar-year range (inclusive).
    pub fn filter_years(&self, start_year: i32, end_year: i32) -> ObservationLazyFrame {
        self.filter(
            col("date")
                .dt()
                .year()
                .gt_eq(lit(start_year))
                .and(col("date").dt().year().lt_eq(lit(end_year))),
        )
    }

    /// Per-year totals of the value column, ascending by year. Used for the
    /// annual-precipitation summary; null months are ignored by the sum.
    pub fn annual_sum(&self) -> Result<Vec<(i32, f64)>, SpeiError> {
        let df = self
            .frame
            .clone()
            .with_column(col("date").dt().year().alias("year"))
            .group_by([col("year")])
            .agg([col("value").sum().alias("total")])
            .sort(["year"], SortMultipleOptions::default())
            .collect()?;

        let years = df.column("year")?.i32()?;
        let totals = df.column("total")?.f64()?;
        let mut rows = Vec::with_capacity(df.height());
        for (i, (year, total)) in years.into_iter().zip(totals.into_iter()).enumerate() {
            let year = year.ok_or(SpeiError::MissingDate(i))?;
            rows.push((year, total.unwrap_or(0.0)));
        }
        Ok(rows)
    }

    /// Materializes the series as `(date, value)` pairs.
    pub fn collect_points(&self) -> Result<Vec<(NaiveDate, Option<f64>)>, SpeiError> {
        let df = self.frame.clone().collect()?;
        let dates = collect_dates(&df)?;
        let values = df.column("value")?.f64()?;
        Ok(dates.into_iter().zip(values.into_iter()).collect())
    }
}

/// A row of the merged evapotranspiration/precipitation table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub etp: Option<f64>,
    pub prp: Option<f64>,
}

/// Result of inner-joining the two observation series on date, schema
/// `date: Date, etp: Float64, prp: Float64`. Dates are exactly the
/// intersection of the input dates, ascending.
#[derive(Clone)]
pub struct AlignedLazyFrame {
    pub frame: LazyFrame,
}

impl AlignedLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    pub fn filter(&self, predicate: Expr) -> AlignedLazyFrame {
        AlignedLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Materializes the merged table, the shape the comparison charts read.
    pub fn collect_rows(&self) -> Result<Vec<AlignedRow>, SpeiError> {
        let df = self.frame.clone().collect()?;
        let dates = collect_dates(&df)?;
        let etp = df.column("etp")?.f64()?;
        let prp = df.column("prp")?.f64()?;
        Ok(dates
            .into_iter()
            .zip(etp.into_iter().zip(prp.into_iter()))
            .map(|(date, (etp, prp))| AlignedRow { date, etp, prp })
            .collect())
    }
}

/// Water balance (precipitation minus evapotranspiration) per date, schema
/// `date: Date, balance: Float64`.
#[derive(Clone)]
pub struct WaterBalanceLazyFrame {
    pub frame: LazyFrame,
}

impl WaterBalanceLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Materializes the balance series for the index fitter.
    pub fn collect_series(&self) -> Result<BalanceSeries, SpeiError> {
        let df = self.frame.clone().collect()?;
        let dates = collect_dates(&df)?;
        let values: Vec<Option<f64>> = df.column("balance")?.f64()?.into_iter().collect();
        Ok(BalanceSeries { dates, values })
    }
}

/// A materialized water-balance series. Nulls mark months where a component
/// was missing or a rolling window touched a missing month.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl BalanceSeries {
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
}

fn collect_dates(df: &DataFrame) -> Result<Vec<NaiveDate>, SpeiError> {
    let column = df.column("date")?.date()?;
    let mut dates = Vec::with_capacity(df.height());
    for (i, days) in column.into_iter().enumerate() {
        let days = days.ok_or(SpeiError::MissingDate(i))?;
        let date = date_from_days_since_epoch(days).ok_or(SpeiError::MissingDate(i))?;
        dates.push(date);
    }
    Ok(dates)
}
