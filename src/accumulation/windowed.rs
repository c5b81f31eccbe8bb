use crate::data_types::{Event, EventStream, TimeStepGrid};
use crate::error::{EventFrameError, Result};

/// Groups raw events (not yet rasterized) into time windows centered on grid
/// timestamps, for strategies that need the event set itself rather than a
/// dense frame.
///
/// For each grid timestamp `ts`, the group collects events with
/// `t > ts - window/2` until the first event with `t > ts + window/2`
/// appears; that boundary event closes the group and is included in it.
/// Events older than the half-window are consumed without being grouped.
#[derive(Debug, Clone)]
pub struct WindowedExtractor {
    time_window: f64,
}

impl WindowedExtractor {
    pub fn new(time_window: f64) -> Result<Self> {
        if time_window <= 0.0 {
            return Err(EventFrameError::BadParameters(format!(
                "time_window must be positive, got {}",
                time_window
            )));
        }
        Ok(Self { time_window })
    }

    pub fn time_window(&self) -> f64 {
        self.time_window
    }

    /// Extracts one event group per grid timestamp.
    ///
    /// A group for which the stream runs out before a closing boundary event
    /// is dropped, silently truncating the remaining grid entries (the
    /// consumed events stay consumed; resume with more data to continue).
    pub fn extract(&self, stream: &mut EventStream, grid: &TimeStepGrid) -> Vec<Vec<Event>> {
        let half_window = self.time_window / 2.0;
        let mut groups = Vec::new();

        for &ts in grid.timestamps() {
            let mut group = Vec::new();
            let mut closed = false;

            while let Some(event) = stream.peek() {
                stream.advance();
                if event.timestamp > ts - half_window {
                    group.push(event);
                    if event.timestamp > ts + half_window {
                        closed = true;
                        break;
                    }
                }
            }

            if !closed {
                tracing::debug!(ts, "stream exhausted before window closed");
                break;
            }
            groups.push(group);
        }

        tracing::debug!(
            groups = groups.len(),
            grid_len = grid.len(),
            remaining = stream.remaining_len(),
            "windowed extraction finished"
        );
        groups
    }
}
