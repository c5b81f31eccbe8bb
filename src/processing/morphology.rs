use ndarray::Array3;
use rayon::prelude::*;

use crate::data_types::Frame;
use crate::error::{EventFrameError, Result};

/// Morphological erosion with a square kernel: each pixel becomes the
/// minimum over its `kernel_size` x `kernel_size` neighborhood (clamped at
/// the borders), per channel. Input NaN values are sanitized to 0.0 first.
/// With `binarize`, the result is clamped to {0, 1} (`> 0` maps to 1).
pub fn erode(frame: &Frame, kernel_size: usize, binarize: bool) -> Result<Frame> {
    morph(frame, kernel_size, binarize, MorphOp::Erode)
}

/// Morphological dilation: the maximum over the kernel neighborhood.
/// Same NaN and binarization handling as [`erode`].
pub fn dilate(frame: &Frame, kernel_size: usize, binarize: bool) -> Result<Frame> {
    morph(frame, kernel_size, binarize, MorphOp::Dilate)
}

pub fn erode_sequence(frames: &[Frame], kernel_size: usize, binarize: bool) -> Result<Vec<Frame>> {
    frames
        .par_iter()
        .map(|frame| erode(frame, kernel_size, binarize))
        .collect()
}

pub fn dilate_sequence(frames: &[Frame], kernel_size: usize, binarize: bool) -> Result<Vec<Frame>> {
    frames
        .par_iter()
        .map(|frame| dilate(frame, kernel_size, binarize))
        .collect()
}

#[derive(Clone, Copy)]
enum MorphOp {
    Erode,
    Dilate,
}

fn morph(frame: &Frame, kernel_size: usize, binarize: bool, op: MorphOp) -> Result<Frame> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(EventFrameError::BadParameters(format!(
            "kernel size must be odd and nonzero, got {}",
            kernel_size
        )));
    }
    let mut source = frame.clone();
    source.sanitize_nan();

    let half = kernel_size / 2;
    let (height, width, channels) = (frame.height(), frame.width(), frame.channels());
    let pixels = source.pixels();
    let mut output = Array3::<f32>::zeros((height, width, channels));

    for y in 0..height {
        let y_lo = y.saturating_sub(half);
        let y_hi = (y + half).min(height - 1);
        for x in 0..width {
            let x_lo = x.saturating_sub(half);
            let x_hi = (x + half).min(width - 1);
            for c in 0..channels {
                let mut value = match op {
                    MorphOp::Erode => f32::INFINITY,
                    MorphOp::Dilate => f32::NEG_INFINITY,
                };
                for yy in y_lo..=y_hi {
                    for xx in x_lo..=x_hi {
                        let sample = pixels[[yy, xx, c]];
                        value = match op {
                            MorphOp::Erode => value.min(sample),
                            MorphOp::Dilate => value.max(sample),
                        };
                    }
                }
                output[[y, x, c]] = value;
            }
        }
    }

    let mut result = Frame::from_array(output, frame.timestamp());
    if binarize {
        result
            .pixels_mut()
            .mapv_inplace(|v| if v > 0.0 { 1.0 } else { 0.0 });
    }
    Ok(result)
}
