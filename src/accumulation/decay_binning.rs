use crate::data_types::{EventStream, Frame, FrameGeometry, TimeStepGrid};
use crate::error::{EventFrameError, Result};

use super::strategy::pixel_of;

/// Multi-bin temporal decay binning over a sliding decay horizon.
///
/// Two monotonic cursors per pass: the leading cursor advances while
/// `t <= ts`, the trailing cursor while `t <= ts - num_bins * bin_step`.
/// Every event between them adds its polarity value to the age channel
/// `floor((ts - t) / bin_step)`. One frame is emitted per grid entry
/// unconditionally, empty or not.
///
/// Consecutive grid timestamps closer together than the decay horizon share
/// events, so after the pass the stream cursor rests at the trailing
/// position: everything still inside the horizon remains available to a
/// resumed call.
pub(super) fn accumulate(
    geometry: &FrameGeometry,
    stream: &mut EventStream,
    grid: &TimeStepGrid,
    num_bins: usize,
    bin_step: f64,
) -> Result<Vec<Frame>> {
    let horizon = num_bins as f64 * bin_step;
    let total = stream.len();
    let mut leading = stream.cursor();
    let mut trailing = stream.cursor();
    let mut frames = Vec::with_capacity(grid.len());

    for &ts in grid.timestamps() {
        while leading < total && stream.events()[leading].timestamp <= ts {
            leading += 1;
        }
        while trailing < leading && stream.events()[trailing].timestamp <= ts - horizon {
            trailing += 1;
        }

        let mut frame = Frame::zeros(geometry, ts);
        for index in trailing..leading {
            let event = stream.events()[index];
            let (py, px) = match pixel_of(&event, geometry, index) {
                Ok(pixel) => pixel,
                Err(error) => {
                    stream.set_cursor(index);
                    return Err(error);
                }
            };
            let bin = ((ts - event.timestamp) / bin_step).floor() as i64;
            if bin < 0 || bin as usize >= num_bins {
                stream.set_cursor(index);
                return Err(EventFrameError::BinIndexOutOfRange {
                    bin,
                    num_bins,
                    index,
                });
            }
            frame.pixels_mut()[[py, px, bin as usize]] += event.polarity;
        }
        tracing::trace!(ts, trailing, leading, "decay frame emitted");
        frames.push(frame);
    }

    stream.set_cursor(trailing);
    Ok(frames)
}
