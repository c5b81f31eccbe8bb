mod circular_mask;
mod combine;
mod contact_status;
mod edges;
mod morphology;
mod rotation;

pub use circular_mask::CircularMask;
pub use combine::{flip_frame, flip_sequence, logical_or_sequences, multiply_sequences, FlipAxis};
pub use contact_status::{rotate_contact_labels, ReferenceRotationTable};
pub use edges::edge_map;
pub use morphology::{dilate, dilate_sequence, erode, erode_sequence};
pub use rotation::{rotate_frame, rotate_sequence};
