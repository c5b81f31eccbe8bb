use ndarray::Array3;
use rayon::prelude::*;

use crate::data_types::Frame;

/// Rotates a frame about `center` (x, y) by `angle_degrees`, positive being
/// counter-clockwise, with bilinear interpolation.
///
/// Implemented as an inverse-mapped affine warp: every destination pixel
/// samples the source at the back-rotated position, and samples falling
/// outside the source read as 0.0. Integer-aligned samples are exact, so a
/// 0-degree rotation is the identity.
pub fn rotate_frame(frame: &Frame, center: (f32, f32), angle_degrees: f32) -> Frame {
    let theta = angle_degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    let (cx, cy) = center;
    let (height, width, channels) = (frame.height(), frame.width(), frame.channels());

    let mut rotated = Array3::<f32>::zeros((height, width, channels));
    let source = frame.pixels();
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let sx = cos * dx - sin * dy + cx;
            let sy = sin * dx + cos * dy + cy;
            for c in 0..channels {
                rotated[[y, x, c]] = sample_bilinear(source, sx, sy, c);
            }
        }
    }
    Frame::from_array(rotated, frame.timestamp())
}

/// Rotates every frame of a sequence about the same center.
pub fn rotate_sequence(frames: &[Frame], center: (f32, f32), angle_degrees: f32) -> Vec<Frame> {
    frames
        .par_iter()
        .map(|frame| rotate_frame(frame, center, angle_degrees))
        .collect()
}

fn sample_bilinear(pixels: &Array3<f32>, sx: f32, sy: f32, channel: usize) -> f32 {
    let height = pixels.shape()[0] as i64;
    let width = pixels.shape()[1] as i64;
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let mut value = 0.0;
    for (dy, wy) in [(0, 1.0 - fy), (1, fy)] {
        for (dx, wx) in [(0, 1.0 - fx), (1, fx)] {
            let weight = wx * wy;
            if weight == 0.0 {
                continue;
            }
            let xx = x0 + dx;
            let yy = y0 + dy;
            if xx >= 0 && xx < width && yy >= 0 && yy < height {
                value += weight * pixels[[yy as usize, xx as usize, channel]];
            }
        }
    }
    value
}
