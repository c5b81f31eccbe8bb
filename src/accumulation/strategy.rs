use serde::{Deserialize, Serialize};

use crate::data_types::{Event, EventStream, Frame, FrameGeometry, TimeStepGrid};
use crate::error::{EventFrameError, Result};

use super::{count_binning, decay_binning, signed_count, timestep_binning};

/// Temporal policy used to slice an event stream into frames.
///
/// All strategies share the same cursor-advance pattern over a sorted stream:
/// events are consumed exactly once per pass (amortized O(N) over the whole
/// grid) and the unconsumed tail stays in the stream for a resumed call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AccumulationStrategy {
    /// Three channels per frame: positive-event count, negative-event count,
    /// and the per-pixel mean of normalized timestamp residuals
    /// `|ts - t - step| / step`. The grid step is inferred from its final two
    /// entries, so the grid needs at least two of them.
    PolarityTimestep,

    /// Single signed channel: +1 per ON event, -1 per OFF event. With
    /// `time_window` set, events older than `ts - time_window` are dropped
    /// from the frame (the cursor still passes over them).
    SignedCount { time_window: Option<f64> },

    /// Single signed channel where frame boundaries are defined by a fixed
    /// event count instead of time. The grid only determines how many frames
    /// to produce; each frame spans however much time `events_per_frame`
    /// events take. Frame rate is therefore event-density dependent, not
    /// time-uniform. That is the point of this policy, not a defect.
    EventCountThreshold { events_per_frame: usize },

    /// `num_bins` channels per frame, one per age bin of width `bin_step`
    /// behind the grid timestamp. Each event inside the decay horizon adds
    /// its polarity value to channel `floor((ts - t) / bin_step)`. Emits one
    /// frame per grid entry unconditionally.
    TemporalDecay { num_bins: usize, bin_step: f64 },
}

impl AccumulationStrategy {
    /// Channel count a frame geometry must have for this strategy.
    pub fn required_channels(&self) -> usize {
        match self {
            Self::PolarityTimestep => 3,
            Self::SignedCount { .. } | Self::EventCountThreshold { .. } => 1,
            Self::TemporalDecay { num_bins, .. } => *num_bins,
        }
    }
}

/// Accumulates an event stream into dense frames under a chosen strategy.
///
/// The accumulator itself is stateless between calls; all streaming state
/// lives in the [`EventStream`] cursor. Repeated calls over consecutive grids
/// produce exactly the frames a single call over the concatenated grid would.
#[derive(Debug, Clone)]
pub struct FrameAccumulator {
    geometry: FrameGeometry,
    strategy: AccumulationStrategy,
}

impl FrameAccumulator {
    /// Creates an accumulator, validating geometry against the strategy.
    pub fn new(geometry: FrameGeometry, strategy: AccumulationStrategy) -> Result<Self> {
        let required = strategy.required_channels();
        if geometry.channels != required {
            return Err(EventFrameError::BadParameters(format!(
                "strategy {:?} needs {} channel(s), geometry has {}",
                strategy, required, geometry.channels
            )));
        }
        match strategy {
            AccumulationStrategy::SignedCount {
                time_window: Some(window),
            } if window <= 0.0 => {
                return Err(EventFrameError::BadParameters(format!(
                    "time_window must be positive, got {}",
                    window
                )));
            }
            AccumulationStrategy::EventCountThreshold { events_per_frame } if events_per_frame == 0 => {
                return Err(EventFrameError::BadParameters(
                    "events_per_frame must be nonzero".into(),
                ));
            }
            AccumulationStrategy::TemporalDecay { num_bins, bin_step } => {
                if num_bins == 0 {
                    return Err(EventFrameError::BadParameters("num_bins must be nonzero".into()));
                }
                if bin_step <= 0.0 {
                    return Err(EventFrameError::BadParameters(format!(
                        "bin_step must be positive, got {}",
                        bin_step
                    )));
                }
            }
            _ => {}
        }
        Ok(Self { geometry, strategy })
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    pub fn strategy(&self) -> &AccumulationStrategy {
        &self.strategy
    }

    /// Consumes events from the stream cursor and produces one frame per
    /// satisfied grid boundary.
    ///
    /// The unconsumed tail stays in `stream` (see [`EventStream::remaining`])
    /// so a later call can resume exactly where this one stopped. On error
    /// the cursor is left on the offending event and no frames are returned.
    pub fn accumulate(&self, stream: &mut EventStream, grid: &TimeStepGrid) -> Result<Vec<Frame>> {
        let cursor_before = stream.cursor();
        let frames = match self.strategy {
            AccumulationStrategy::PolarityTimestep => {
                timestep_binning::accumulate(&self.geometry, stream, grid)
            }
            AccumulationStrategy::SignedCount { time_window } => {
                signed_count::accumulate(&self.geometry, stream, grid, time_window)
            }
            AccumulationStrategy::EventCountThreshold { events_per_frame } => {
                count_binning::accumulate(&self.geometry, stream, grid, events_per_frame)
            }
            AccumulationStrategy::TemporalDecay { num_bins, bin_step } => {
                decay_binning::accumulate(&self.geometry, stream, grid, num_bins, bin_step)
            }
        }?;
        tracing::debug!(
            frames = frames.len(),
            grid_len = grid.len(),
            consumed = stream.cursor() - cursor_before,
            remaining = stream.remaining_len(),
            "accumulation pass finished"
        );
        Ok(frames)
    }

    /// Groups the remaining stream into frames of `time_window` duration
    /// measured from the stream's own first timestamp, with no external grid.
    ///
    /// Every remaining event is consumed; the final partial window is emitted.
    /// `target_len` pads zero frames at the back or drops frames from the
    /// front until the sequence has exactly that length. Only meaningful for
    /// single-channel geometries.
    pub fn sequence_from_stream(
        &self,
        stream: &mut EventStream,
        time_window: f64,
        target_len: Option<usize>,
    ) -> Result<Vec<Frame>> {
        if self.geometry.channels != 1 {
            return Err(EventFrameError::BadParameters(format!(
                "self-paced sequencing is single-channel, geometry has {} channels",
                self.geometry.channels
            )));
        }
        if time_window <= 0.0 {
            return Err(EventFrameError::BadParameters(format!(
                "time_window must be positive, got {}",
                time_window
            )));
        }
        signed_count::sequence_from_stream(&self.geometry, stream, time_window, target_len)
    }
}

/// Truncates an event's coordinates to a pixel index, failing fast when the
/// event falls outside the geometry. Never clamps: a silently relocated
/// event would corrupt neighboring counts.
pub(super) fn pixel_of(event: &Event, geometry: &FrameGeometry, index: usize) -> Result<(usize, usize)> {
    let x = event.x.floor() as i64;
    let y = event.y.floor() as i64;
    if x < 0 || y < 0 || x >= geometry.width as i64 || y >= geometry.height as i64 {
        return Err(EventFrameError::OutOfBoundsEvent {
            index,
            x,
            y,
            height: geometry.height,
            width: geometry.width,
        });
    }
    Ok((y as usize, x as usize))
}

/// Division that is defined as 0.0 on a zero denominator.
///
/// Used for the normalized-timestamp channel: a pixel that saw no events in
/// a timestep must read exactly 0.0, never NaN or infinity.
pub(super) fn guarded_div(numerator: f32, denominator: f32) -> f32 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_count_validated() {
        let geometry = FrameGeometry::new(4, 4, 1).unwrap();
        assert!(FrameAccumulator::new(geometry, AccumulationStrategy::PolarityTimestep).is_err());
        let geometry = FrameGeometry::new(4, 4, 3).unwrap();
        assert!(FrameAccumulator::new(geometry, AccumulationStrategy::PolarityTimestep).is_ok());
    }

    #[test]
    fn test_decay_parameters_validated() {
        let geometry = FrameGeometry::new(4, 4, 5).unwrap();
        assert!(FrameAccumulator::new(
            geometry,
            AccumulationStrategy::TemporalDecay { num_bins: 5, bin_step: 0.0 }
        )
        .is_err());
        assert!(FrameAccumulator::new(
            geometry,
            AccumulationStrategy::TemporalDecay { num_bins: 5, bin_step: 0.05 }
        )
        .is_ok());
    }

    #[test]
    fn test_zero_count_threshold_rejected() {
        let geometry = FrameGeometry::new(4, 4, 1).unwrap();
        assert!(FrameAccumulator::new(
            geometry,
            AccumulationStrategy::EventCountThreshold { events_per_frame: 0 }
        )
        .is_err());
    }

    #[test]
    fn test_pixel_truncation_and_bounds() {
        let geometry = FrameGeometry::new(4, 6, 1).unwrap();
        let event = Event::new(5.9, 3.2, 0.0, 1.0);
        assert_eq!(pixel_of(&event, &geometry, 0).unwrap(), (3, 5));
        let outside = Event::new(6.0, 0.0, 0.0, 1.0);
        assert!(matches!(
            pixel_of(&outside, &geometry, 7),
            Err(EventFrameError::OutOfBoundsEvent { index: 7, x: 6, .. })
        ));
        let negative = Event::new(-0.5, 0.0, 0.0, 1.0);
        assert!(pixel_of(&negative, &geometry, 0).is_err());
    }

    #[test]
    fn test_guarded_div_zero_denominator() {
        assert_eq!(guarded_div(3.0, 0.0), 0.0);
        assert_eq!(guarded_div(3.0, 2.0), 1.5);
    }
}
