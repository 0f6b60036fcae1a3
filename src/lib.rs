mod balance;
mod classify;
mod error;
mod index;
mod pipeline;
mod series_data;
mod utils;

pub use error::SpeiError;
pub use pipeline::{SpeiPipeline, SpeiRun};

pub use balance::aligner::TimeSeriesAligner;
pub use balance::frames::*;

pub use classify::category::Category;
pub use classify::classifier::*;
pub use classify::period::{Decade, PeriodGranularity, PeriodKey};

pub use index::error::IndexError;
pub use index::fitter::{IndexFitter, ZScoreFitter};
pub use index::series::IndexSeries;

pub use series_data::error::SeriesDataError;
pub use series_data::loader::SeriesLoader;
