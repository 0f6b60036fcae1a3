pub mod aligner;
pub mod frames;
