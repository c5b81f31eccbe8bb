use ndarray::{Array2, Axis, Zip};

use crate::data_types::{EventStream, Frame, FrameGeometry, TimeStepGrid};
use crate::error::Result;

use super::strategy::{guarded_div, pixel_of};

/// Three-channel timestep binning: positive counts, negative counts, and the
/// per-pixel mean of normalized timestamp residuals.
///
/// For each grid timestamp `ts`, events are consumed while `t <= ts`. The
/// first event beyond `ts` closes the frame and is left unconsumed; it is the
/// first event the next boundary (or a resumed call) sees. If the stream runs
/// out before a closing event appears, accumulation stops and no frame is
/// appended for that or any later timestamp; the partial state is simply
/// discarded, to be rebuilt when more of the stream is available.
pub(super) fn accumulate(
    geometry: &FrameGeometry,
    stream: &mut EventStream,
    grid: &TimeStepGrid,
) -> Result<Vec<Frame>> {
    let step = grid.step()?;
    let plane = (geometry.height, geometry.width);
    let mut frames = Vec::new();

    for &ts in grid.timestamps() {
        let mut frame = Frame::zeros(geometry, ts);
        let mut counters = Array2::<f32>::zeros(plane);
        let mut residuals = Array2::<f32>::zeros(plane);
        let mut closed = false;

        while let Some(event) = stream.peek() {
            if event.timestamp > ts {
                closed = true;
                break;
            }
            let (py, px) = pixel_of(&event, geometry, stream.cursor())?;
            if event.is_positive() {
                frame.pixels_mut()[[py, px, 0]] += 1.0;
            } else {
                frame.pixels_mut()[[py, px, 1]] += 1.0;
            }
            counters[[py, px]] += 1.0;
            residuals[[py, px]] += ((ts - event.timestamp - step).abs() / step) as f32;
            stream.advance();
        }

        if !closed {
            break;
        }

        let mut mean_channel = frame.pixels_mut().index_axis_mut(Axis(2), 2);
        Zip::from(&mut mean_channel)
            .and(&residuals)
            .and(&counters)
            .for_each(|out, &residual, &count| *out = guarded_div(residual, count));

        tracing::trace!(ts, cursor = stream.cursor(), "timestep frame closed");
        frames.push(frame);
    }

    Ok(frames)
}
