pub mod error;
pub mod fitter;
pub mod series;
