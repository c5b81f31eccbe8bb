use serde::{Deserialize, Serialize};

/// Single polarity event from an event camera.
///
/// One row of the decoded (x, y, timestamp, polarity) table. Coordinates are
/// kept as floats and only truncated to pixel indices at accumulation time;
/// timestamps are in whatever unit the source log uses (seconds or
/// nanoseconds), as long as the whole stream and any time grid agree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub x: f32,
    pub y: f32,
    pub timestamp: f64,
    /// Signed polarity indicator: `> 0` is an ON event, anything else OFF.
    pub polarity: f32,
}

impl Event {
    pub fn new(x: f32, y: f32, timestamp: f64, polarity: f32) -> Self {
        Self {
            x,
            y,
            timestamp,
            polarity,
        }
    }

    /// Whether this is an ON (positive polarity) event.
    pub fn is_positive(&self) -> bool {
        self.polarity > 0.0
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.x, self.y, self.timestamp, self.polarity
        )
    }
}
