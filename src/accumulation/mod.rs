mod count_binning;
mod decay_binning;
mod signed_count;
mod strategy;
mod timestep_binning;
mod windowed;

pub use strategy::{AccumulationStrategy, FrameAccumulator};
pub use windowed::WindowedExtractor;
