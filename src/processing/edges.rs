use ndarray::Array2;

use crate::data_types::Frame;
use crate::error::{EventFrameError, Result};

/// Grayscale edge extraction on a single-channel frame.
///
/// Sobel gradient magnitude with double thresholding: magnitudes at or above
/// `high_threshold` are edges, magnitudes between the thresholds are kept
/// only when an 8-neighbor is a strong edge, everything else is dropped.
/// The output is binary-valued at {0, 255}. `normalize` min-max rescales the
/// input to 0..255 first, for frames whose values are not already in pixel
/// range (signed counts, residual means). NaN input values are sanitized to
/// zero before the gradient pass.
pub fn edge_map(frame: &Frame, low_threshold: f32, high_threshold: f32, normalize: bool) -> Result<Frame> {
    if frame.channels() != 1 {
        return Err(EventFrameError::BadParameters(format!(
            "edge extraction expects a single-channel frame, got {} channels",
            frame.channels()
        )));
    }
    if low_threshold < 0.0 || high_threshold < low_threshold {
        return Err(EventFrameError::BadParameters(format!(
            "thresholds must satisfy 0 <= low <= high, got {} and {}",
            low_threshold, high_threshold
        )));
    }

    let mut source = if normalize {
        frame.min_max_normalized()
    } else {
        frame.clone()
    };
    source.sanitize_nan();

    let (height, width) = (frame.height(), frame.width());
    let pixels = source.pixels();
    let at = |y: i64, x: i64| -> f32 {
        // replicate border
        let yy = y.clamp(0, height as i64 - 1) as usize;
        let xx = x.clamp(0, width as i64 - 1) as usize;
        pixels[[yy, xx, 0]]
    };

    let mut magnitude = Array2::<f32>::zeros((height, width));
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let gx = -at(y - 1, x - 1) + at(y - 1, x + 1) - 2.0 * at(y, x - 1)
                + 2.0 * at(y, x + 1)
                - at(y + 1, x - 1)
                + at(y + 1, x + 1);
            let gy = -at(y - 1, x - 1) - 2.0 * at(y - 1, x) - at(y - 1, x + 1)
                + at(y + 1, x - 1)
                + 2.0 * at(y + 1, x)
                + at(y + 1, x + 1);
            magnitude[[y as usize, x as usize]] = (gx * gx + gy * gy).sqrt();
        }
    }

    let strong = magnitude.mapv(|m| m >= high_threshold);
    let mut edges = Frame::zeros(&frame.geometry(), frame.timestamp());
    for y in 0..height {
        for x in 0..width {
            let value = if strong[[y, x]] {
                255.0
            } else if magnitude[[y, x]] >= low_threshold && has_strong_neighbor(&strong, y, x) {
                255.0
            } else {
                0.0
            };
            edges.pixels_mut()[[y, x, 0]] = value;
        }
    }
    Ok(edges)
}

fn has_strong_neighbor(strong: &Array2<bool>, y: usize, x: usize) -> bool {
    let (height, width) = strong.dim();
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dy == 0 && dx == 0 {
                continue;
            }
            let yy = y as i64 + dy;
            let xx = x as i64 + dx;
            if yy >= 0 && yy < height as i64 && xx >= 0 && xx < width as i64 {
                if strong[[yy as usize, xx as usize]] {
                    return true;
                }
            }
        }
    }
    false
}
