use crate::data_types::{EventStream, Frame, FrameGeometry, TimeStepGrid};
use crate::error::Result;

use super::strategy::pixel_of;

/// Event-count binning: a frame closes once `events_per_frame` events have
/// been accumulated since the last emit, regardless of elapsed time.
///
/// The grid's timestamps only determine how many frames to produce (one per
/// entry, used as the frame's stamp); the binning predicate itself is the
/// running event count. Frames therefore cover event-density-dependent time
/// spans, a deliberate decoupling. A
/// stream that runs dry before reaching the threshold yields no frame for
/// that or later grid entries.
pub(super) fn accumulate(
    geometry: &FrameGeometry,
    stream: &mut EventStream,
    grid: &TimeStepGrid,
    events_per_frame: usize,
) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();

    for &ts in grid.timestamps() {
        let mut frame = Frame::zeros(geometry, ts);
        let mut consumed = 0usize;
        let mut emitted = false;

        while let Some(event) = stream.peek() {
            let (py, px) = pixel_of(&event, geometry, stream.cursor())?;
            frame.pixels_mut()[[py, px, 0]] += if event.is_positive() { 1.0 } else { -1.0 };
            stream.advance();
            consumed += 1;
            if consumed == events_per_frame {
                emitted = true;
                break;
            }
        }

        if !emitted {
            break;
        }
        tracing::trace!(ts, cursor = stream.cursor(), "count-threshold frame closed");
        frames.push(frame);
    }

    Ok(frames)
}
