pub mod category;
pub mod classifier;
pub mod period;
