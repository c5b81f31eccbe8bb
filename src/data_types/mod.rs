mod event;
mod event_stream;
mod frame;

pub mod descriptors;

pub use descriptors::{FrameGeometry, TimeStepGrid};
pub use event::Event;
pub use event_stream::EventStream;
pub use frame::Frame;
