/// Result type alias using EventFrameError
pub type Result<T> = std::result::Result<T, EventFrameError>;

/// Errors that can occur while turning event streams into frame tensors.
///
/// All of these are deterministic data errors, not transient I/O failures;
/// callers should treat them as terminal for the offending input. Errors
/// raised mid-accumulation leave the stream cursor on the offending event.
#[derive(Debug, thiserror::Error)]
pub enum EventFrameError {
    /// Event sequence is not sorted ascending by timestamp
    #[error("event stream not sorted: timestamp at index {index} precedes its predecessor")]
    MalformedStream { index: usize },

    /// Time grid is not strictly increasing
    #[error("time grid not strictly increasing at index {index}")]
    MalformedGrid { index: usize },

    /// Grid too short to infer a step size
    #[error("time grid needs at least {required} entries to infer a step size, got {actual}")]
    InsufficientGridSize { required: usize, actual: usize },

    /// Event pixel coordinate outside the frame geometry
    #[error("event {index} maps to pixel ({x}, {y}) outside {height}x{width}")]
    OutOfBoundsEvent {
        index: usize,
        x: i64,
        y: i64,
        height: usize,
        width: usize,
    },

    /// Temporal-decay bin index outside [0, num_bins); usually a
    /// misconfigured bin_step / num_bins pair
    #[error("decay bin {bin} outside [0, {num_bins}) for event {index}")]
    BinIndexOutOfRange {
        bin: i64,
        num_bins: usize,
        index: usize,
    },

    /// Invalid parameters provided to a constructor or operation
    #[error("bad parameters: {0}")]
    BadParameters(String),

    /// Internal error indicating a bug (please report)
    #[error("internal error, please raise an issue: {0}")]
    Internal(String),
}
