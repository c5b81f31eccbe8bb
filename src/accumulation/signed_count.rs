use crate::data_types::{EventStream, Frame, FrameGeometry, TimeStepGrid};
use crate::error::Result;

use super::strategy::pixel_of;

/// Signed single-channel counting: +1 per ON event, -1 per OFF event.
///
/// Cursor semantics match three-channel binning: the frame-closing event is
/// left unconsumed and stream exhaustion truncates the output. When
/// `time_window` is set, events older than `ts - time_window` are passed over
/// without contributing; the cursor still consumes them.
pub(super) fn accumulate(
    geometry: &FrameGeometry,
    stream: &mut EventStream,
    grid: &TimeStepGrid,
    time_window: Option<f64>,
) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();

    for &ts in grid.timestamps() {
        let mut frame = Frame::zeros(geometry, ts);
        let mut closed = false;

        while let Some(event) = stream.peek() {
            let in_window = time_window.map_or(true, |window| event.timestamp > ts - window);
            if in_window {
                if event.timestamp > ts {
                    closed = true;
                    break;
                }
                let (py, px) = pixel_of(&event, geometry, stream.cursor())?;
                frame.pixels_mut()[[py, px, 0]] += if event.is_positive() { 1.0 } else { -1.0 };
            }
            stream.advance();
        }

        if !closed {
            break;
        }
        tracing::trace!(ts, cursor = stream.cursor(), "signed count frame closed");
        frames.push(frame);
    }

    Ok(frames)
}

/// Self-paced sequencing: windows of `time_window` measured from the first
/// remaining event's own timestamp, no external grid.
///
/// Every remaining event is consumed. A window closes on the first event past
/// its boundary (that event lands in the closing frame) or on stream
/// exhaustion, so the last partial window is emitted too. Frames are stamped
/// with their window-end boundary.
pub(super) fn sequence_from_stream(
    geometry: &FrameGeometry,
    stream: &mut EventStream,
    time_window: f64,
    target_len: Option<usize>,
) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();

    if let Some(first) = stream.peek() {
        let ts_min = first.timestamp;
        let mut window_index: usize = 1;
        let mut frame = Frame::zeros(geometry, ts_min + time_window);

        while let Some(event) = stream.peek() {
            let (py, px) = pixel_of(&event, geometry, stream.cursor())?;
            frame.pixels_mut()[[py, px, 0]] += if event.is_positive() { 1.0 } else { -1.0 };
            stream.advance();

            let boundary = ts_min + window_index as f64 * time_window;
            if event.timestamp > boundary || stream.is_exhausted() {
                frames.push(frame);
                window_index += 1;
                frame = Frame::zeros(geometry, ts_min + window_index as f64 * time_window);
            }
        }
    }

    if let Some(target) = target_len {
        while frames.len() < target {
            let timestamp = frames
                .last()
                .map_or(0.0, |frame| frame.timestamp() + time_window);
            frames.push(Frame::zeros(geometry, timestamp));
        }
        if frames.len() > target {
            frames.drain(0..frames.len() - target);
        }
    }

    Ok(frames)
}
