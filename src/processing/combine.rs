use ndarray::{Axis, Zip};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data_types::Frame;
use crate::error::{EventFrameError, Result};

/// Flip axis for [`flip_frame`]: vertical flips rows (about the horizontal
/// midline), horizontal flips columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipAxis {
    Vertical,
    Horizontal,
}

pub fn flip_frame(frame: &Frame, axis: FlipAxis) -> Frame {
    let mut pixels = frame.pixels().clone();
    match axis {
        FlipAxis::Vertical => pixels.invert_axis(Axis(0)),
        FlipAxis::Horizontal => pixels.invert_axis(Axis(1)),
    }
    Frame::from_array(pixels, frame.timestamp())
}

pub fn flip_sequence(frames: &[Frame], axis: FlipAxis) -> Vec<Frame> {
    frames.par_iter().map(|frame| flip_frame(frame, axis)).collect()
}

/// Elementwise logical OR of two aligned sequences: a pixel is 1.0 when it
/// is nonzero in either input. Zipping truncates to the shorter sequence;
/// timestamps come from the first.
pub fn logical_or_sequences(first: &[Frame], second: &[Frame]) -> Result<Vec<Frame>> {
    combine_sequences(first, second, |a, b| {
        if a != 0.0 || b != 0.0 {
            1.0
        } else {
            0.0
        }
    })
}

/// Elementwise product of two aligned sequences, the masking primitive.
/// Truncates to the shorter sequence; timestamps come from the first.
pub fn multiply_sequences(first: &[Frame], second: &[Frame]) -> Result<Vec<Frame>> {
    combine_sequences(first, second, |a, b| a * b)
}

fn combine_sequences(
    first: &[Frame],
    second: &[Frame],
    op: impl Fn(f32, f32) -> f32 + Sync,
) -> Result<Vec<Frame>> {
    first
        .par_iter()
        .zip(second.par_iter())
        .map(|(a, b)| {
            if a.geometry() != b.geometry() {
                return Err(EventFrameError::BadParameters(format!(
                    "cannot combine frames of geometry {} and {}",
                    a.geometry(),
                    b.geometry()
                )));
            }
            let mut out = Frame::zeros(&a.geometry(), a.timestamp());
            Zip::from(out.pixels_mut())
                .and(a.pixels())
                .and(b.pixels())
                .for_each(|o, &x, &y| *o = op(x, y));
            Ok(out)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::FrameGeometry;

    fn frame_with(values: &[((usize, usize), f32)], timestamp: f64) -> Frame {
        let geometry = FrameGeometry::new(3, 3, 1).unwrap();
        let mut frame = Frame::zeros(&geometry, timestamp);
        for &((y, x), v) in values {
            frame.pixels_mut()[[y, x, 0]] = v;
        }
        frame
    }

    #[test]
    fn test_flip_vertical_reverses_rows() {
        let frame = frame_with(&[((0, 1), 5.0)], 0.0);
        let flipped = flip_frame(&frame, FlipAxis::Vertical);
        assert_eq!(flipped.pixels()[[2, 1, 0]], 5.0);
        assert_eq!(flipped.pixels()[[0, 1, 0]], 0.0);
    }

    #[test]
    fn test_flip_horizontal_reverses_columns() {
        let frame = frame_with(&[((1, 0), 5.0)], 0.0);
        let flipped = flip_frame(&frame, FlipAxis::Horizontal);
        assert_eq!(flipped.pixels()[[1, 2, 0]], 5.0);
    }

    #[test]
    fn test_logical_or_is_binary() {
        let a = vec![frame_with(&[((0, 0), 3.0), ((1, 1), -2.0)], 0.5)];
        let b = vec![frame_with(&[((1, 1), 1.0), ((2, 2), 7.0)], 9.9)];
        let combined = logical_or_sequences(&a, &b).unwrap();
        assert_eq!(combined[0].pixels()[[0, 0, 0]], 1.0);
        assert_eq!(combined[0].pixels()[[1, 1, 0]], 1.0);
        assert_eq!(combined[0].pixels()[[2, 2, 0]], 1.0);
        assert_eq!(combined[0].pixels()[[0, 2, 0]], 0.0);
        // timestamps follow the first sequence
        assert_eq!(combined[0].timestamp(), 0.5);
    }

    #[test]
    fn test_multiply_masks_values() {
        let a = vec![frame_with(&[((0, 0), 3.0), ((1, 1), 4.0)], 0.0)];
        let b = vec![frame_with(&[((1, 1), 0.5)], 0.0)];
        let combined = multiply_sequences(&a, &b).unwrap();
        assert_eq!(combined[0].pixels()[[0, 0, 0]], 0.0);
        assert_eq!(combined[0].pixels()[[1, 1, 0]], 2.0);
    }

    #[test]
    fn test_truncates_to_shorter_sequence() {
        let a = vec![
            frame_with(&[], 0.0),
            frame_with(&[], 1.0),
            frame_with(&[], 2.0),
        ];
        let b = vec![frame_with(&[], 0.0)];
        assert_eq!(logical_or_sequences(&a, &b).unwrap().len(), 1);
        assert_eq!(multiply_sequences(&b, &a).unwrap().len(), 1);
    }

    #[test]
    fn test_geometry_mismatch_rejected() {
        let a = vec![frame_with(&[], 0.0)];
        let other = FrameGeometry::new(2, 2, 1).unwrap();
        let b = vec![Frame::zeros(&other, 0.0)];
        assert!(logical_or_sequences(&a, &b).is_err());
    }
}
