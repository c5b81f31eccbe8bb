mod frame_selector;

pub use frame_selector::{FrameSelector, ABANDON_GAP};
