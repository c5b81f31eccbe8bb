mod error;

pub mod accumulation;
pub mod alignment;
pub mod data_types;
pub mod processing;

pub use accumulation::{AccumulationStrategy, FrameAccumulator, WindowedExtractor};
pub use alignment::FrameSelector;
pub use data_types::{Event, EventStream, Frame, FrameGeometry, TimeStepGrid};
pub use error::{EventFrameError, Result};
