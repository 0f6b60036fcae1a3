//! Explicit entry point for one SPEI computation. The pipeline is built
//! once, holds the accumulation window and the fitting seam, and is invoked
//! by the caller (CLI demo, dashboard initializer, test); nothing is
//! computed at load time.

use crate::balance::aligner::TimeSeriesAligner;
use crate::balance::frames::ObservationLazyFrame;
use crate::classify::classifier::{CategorizedObservation, CategoryCounts, IndexClassifier, PercentageRow};
use crate::classify::period::{PeriodGranularity, PeriodKey};
use crate::error::SpeiError;
use crate::index::fitter::{IndexFitter, ZScoreFitter};
use crate::index::series::IndexSeries;
use crate::series_data::loader::SeriesLoader;
use bon::bon;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One configured SPEI computation: evapotranspiration and precipitation
/// spreadsheets in, a classified index series out.
///
/// # Examples
///
/// ```no_run
/// use spei::{PeriodGranularity, SpeiPipeline};
///
/// # fn main() -> Result<(), spei::SpeiError> {
/// let pipeline = SpeiPipeline::builder().accumulation(3).build()?;
/// let run = pipeline.run("data/etp.xlsx", "data/prp.xlsx")?;
/// for row in run.occurrence_percentages(PeriodGranularity::Decade) {
///     println!("{}: {:.1}% weak drought", row.period, row.share(spei::Category::WeakDrought));
/// }
/// # Ok(())
/// # }
/// ```
pub struct SpeiPipeline {
    accumulation: usize,
    fitter: Box<dyn IndexFitter>,
}

#[bon]
impl SpeiPipeline {
    /// Builds a pipeline.
    ///
    /// # Arguments
    ///
    /// * `.accumulation(usize)`: Optional. Rolling-sum window in months
    ///   applied to the water balance (SPEI-n). Defaults to `1`.
    /// * `.fitter(Box<dyn IndexFitter>)`: Optional. The standardization
    ///   implementation. Defaults to [`ZScoreFitter`].
    ///
    /// # Errors
    ///
    /// Returns [`SpeiError::InvalidAccumulation`] when the window is zero.
    #[builder]
    pub fn new(
        #[builder(default = 1)] accumulation: usize,
        fitter: Option<Box<dyn IndexFitter>>,
    ) -> Result<Self, SpeiError> {
        if accumulation == 0 {
            return Err(SpeiError::InvalidAccumulation(accumulation));
        }
        Ok(Self {
            accumulation,
            fitter: fitter.unwrap_or_else(|| Box::new(ZScoreFitter::new())),
        })
    }

    /// Loads both spreadsheets and executes the full pipeline:
    /// load → align → water balance → rolling sum → fit → classify.
    pub fn run(
        &self,
        etp_path: impl AsRef<Path>,
        prp_path: impl AsRef<Path>,
    ) -> Result<SpeiRun, SpeiError> {
        let etp = SeriesLoader::from_path(etp_path)?;
        let prp = SeriesLoader::from_path(prp_path)?;
        self.run_frames(&etp, &prp)
    }

    /// Executes the pipeline over already-loaded observation frames.
    ///
    /// An empty date intersection is not an error: the run comes back empty
    /// and downstream rendering shows "no data".
    pub fn run_frames(
        &self,
        etp: &ObservationLazyFrame,
        prp: &ObservationLazyFrame,
    ) -> Result<SpeiRun, SpeiError> {
        let prepared = TimeSeriesAligner::prepare(etp, prp, self.accumulation)?;
        let balance = prepared.collect_series()?;
        if balance.is_empty() {
            info!("Water balance series is empty, producing an empty run");
            return Ok(SpeiRun {
                index: IndexSeries::empty(),
                categorized: Vec::new(),
            });
        }
        info!(
            "Fitting index over {} accumulated water-balance months (window {})",
            balance.len(),
            self.accumulation
        );

        let scores = self.fitter.fit(balance.values())?;
        if scores.len() != balance.len() {
            return Err(SpeiError::FitterLengthMismatch {
                expected: balance.len(),
                got: scores.len(),
            });
        }
        let index = IndexSeries::new(balance.dates().to_vec(), scores)?;
        let categorized = IndexClassifier::classify(&index);
        Ok(SpeiRun { index, categorized })
    }
}

/// Immutable result of one pipeline run. Dashboard callbacks recompute
/// groupings from this bundle per request; nothing here is ever mutated.
#[derive(Debug, Clone, Serialize)]
pub struct SpeiRun {
    index: IndexSeries,
    categorized: Vec<CategorizedObservation>,
}

impl SpeiRun {
    pub fn index(&self) -> &IndexSeries {
        &self.index
    }

    pub fn observations(&self) -> &[CategorizedObservation] {
        &self.categorized
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Category occurrence counts per period bucket.
    pub fn counts(&self, granularity: PeriodGranularity) -> BTreeMap<PeriodKey, CategoryCounts> {
        IndexClassifier::group_by_period(&self.categorized, granularity)
    }

    /// Category occurrence shares in percent per period bucket.
    pub fn occurrence_percentages(&self, granularity: PeriodGranularity) -> Vec<PercentageRow> {
        IndexClassifier::occurrence_percentages(&self.categorized, granularity)
    }

    /// Restricts the run to `[start_year, end_year]` and reclassifies.
    /// This is the stateless recompute behind the dashboard year selector.
    pub fn filter_years(&self, start_year: i32, end_year: i32) -> SpeiRun {
        let index = self.index.filter_years(start_year, end_year);
        let categorized = IndexClassifier::classify(&index);
        SpeiRun { index, categorized }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::category::Category;
    use chrono::NaiveDate;
    use std::io::Write;

    fn write_csv(header: &str, rows: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp csv");
        writeln!(file, "{header},Unnamed: 1").unwrap();
        writeln!(file, "data,dados").unwrap();
        for (date, value) in rows {
            writeln!(file, "{date},{value}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn etp_fixture(rows: &[(&str, &str)]) -> tempfile::NamedTempFile {
        write_csv("Hargreaves Potential Evapotranspiration (TerraClimate)", rows)
    }

    fn prp_fixture(rows: &[(&str, &str)]) -> tempfile::NamedTempFile {
        write_csv("Precipitation (TerraClimate)", rows)
    }

    #[test]
    fn builder_rejects_zero_accumulation() {
        let result = SpeiPipeline::builder().accumulation(0).build();
        assert!(matches!(result, Err(SpeiError::InvalidAccumulation(0))));
    }

    #[test]
    fn end_to_end_run_classifies_every_scored_month() {
        let etp = etp_fixture(&[
            ("1995-01-01", "10"),
            ("1995-02-01", "10"),
            ("1995-03-01", "10"),
        ]);
        let prp = prp_fixture(&[
            ("1995-01-01", "12"),
            ("1995-02-01", "8"),
            ("1995-03-01", "9"),
        ]);

        let pipeline = SpeiPipeline::builder().build().unwrap();
        let run = pipeline.run(etp.path(), prp.path()).unwrap();

        assert_eq!(run.index().len(), 3);
        assert_eq!(run.observations().len(), 3);
        assert_eq!(
            run.index().dates()[0],
            NaiveDate::from_ymd_opt(1995, 1, 1).unwrap()
        );
        // Balance [2, -2, -1]: one wet month above the mean, two dry below.
        assert_eq!(run.observations()[0].category, Category::ModerateHumidity);
        assert!(run.observations()[1].value < 0.0);

        let counts = run.counts(PeriodGranularity::Year);
        assert_eq!(counts[&PeriodKey::Year(1995)].total(), 3);
    }

    #[test]
    fn disjoint_sources_produce_an_empty_run() {
        let etp = etp_fixture(&[("1995-01-01", "10")]);
        let prp = prp_fixture(&[("2005-01-01", "12")]);

        let pipeline = SpeiPipeline::builder().build().unwrap();
        let run = pipeline.run(etp.path(), prp.path()).unwrap();

        assert!(run.is_empty());
        assert!(run.observations().is_empty());
        assert!(run.occurrence_percentages(PeriodGranularity::Decade).is_empty());
    }

    #[test]
    fn accumulation_shortens_the_index() {
        let etp = etp_fixture(&[
            ("1995-01-01", "10"),
            ("1995-02-01", "10"),
            ("1995-03-01", "10"),
            ("1995-04-01", "10"),
        ]);
        let prp = prp_fixture(&[
            ("1995-01-01", "12"),
            ("1995-02-01", "8"),
            ("1995-03-01", "9"),
            ("1995-04-01", "15"),
        ]);

        let pipeline = SpeiPipeline::builder().accumulation(3).build().unwrap();
        let run = pipeline.run(etp.path(), prp.path()).unwrap();

        // 4 months, window 3: two full windows.
        assert_eq!(run.index().len(), 2);
        assert_eq!(
            run.index().dates()[0],
            NaiveDate::from_ymd_opt(1995, 3, 1).unwrap()
        );
    }

    #[test]
    fn filter_years_recomputes_a_smaller_run() {
        let etp = etp_fixture(&[
            ("1995-01-01", "10"),
            ("1996-01-01", "10"),
            ("1997-01-01", "10"),
        ]);
        let prp = prp_fixture(&[
            ("1995-01-01", "12"),
            ("1996-01-01", "8"),
            ("1997-01-01", "9"),
        ]);

        let pipeline = SpeiPipeline::builder().build().unwrap();
        let run = pipeline.run(etp.path(), prp.path()).unwrap();
        let filtered = run.filter_years(1996, 1997);

        assert_eq!(filtered.index().len(), 2);
        assert_eq!(filtered.observations().len(), 2);
        // The original run is untouched.
        assert_eq!(run.index().len(), 3);
    }

    #[test]
    fn custom_fitter_length_violation_is_reported() {
        struct BrokenFitter;
        impl IndexFitter for BrokenFitter {
            fn fit(&self, _: &[Option<f64>]) -> Result<Vec<Option<f64>>, crate::IndexError> {
                Ok(vec![Some(0.0)])
            }
        }

        let etp = etp_fixture(&[("1995-01-01", "10"), ("1995-02-01", "10")]);
        let prp = prp_fixture(&[("1995-01-01", "12"), ("1995-02-01", "8")]);

        let pipeline = SpeiPipeline::builder()
            .fitter(Box::new(BrokenFitter))
            .build()
            .unwrap();
        let result = pipeline.run(etp.path(), prp.path());
        assert!(matches!(
            result,
            Err(SpeiError::FitterLengthMismatch { expected: 2, got: 1 })
        ));
    }
}
