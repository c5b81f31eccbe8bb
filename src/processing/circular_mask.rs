use ndarray::{Array3, Zip};
use rayon::prelude::*;

use crate::data_types::{Frame, FrameGeometry};
use crate::error::{EventFrameError, Result};

/// Precomputed binary disk mask for circular cropping.
///
/// Rasterized once at construction (every pixel within `radius` of the
/// center is 1.0, all channels), then applied to frames by elementwise
/// multiplication. Typical use: restricting accumulated frames to a round
/// sensor's active area before training.
#[derive(Debug, Clone)]
pub struct CircularMask {
    mask: Array3<f32>,
    geometry: FrameGeometry,
}

impl CircularMask {
    /// Builds the disk mask. `center` is (x, y) in pixel coordinates.
    pub fn new(geometry: &FrameGeometry, center: (f32, f32), radius: f32) -> Result<Self> {
        if radius <= 0.0 {
            return Err(EventFrameError::BadParameters(format!(
                "mask radius must be positive, got {}",
                radius
            )));
        }
        let (cx, cy) = center;
        let radius_sq = radius * radius;
        let mut mask = Array3::<f32>::zeros(geometry.shape());
        Zip::indexed(&mut mask).for_each(|(y, x, _), value| {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= radius_sq {
                *value = 1.0;
            }
        });
        Ok(Self {
            mask,
            geometry: *geometry,
        })
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    pub fn mask(&self) -> &Array3<f32> {
        &self.mask
    }

    /// Multiplies a frame by the mask, zeroing everything outside the disk.
    pub fn apply(&self, frame: &Frame) -> Result<Frame> {
        if frame.geometry() != self.geometry {
            return Err(EventFrameError::BadParameters(format!(
                "mask geometry {} does not match frame geometry {}",
                self.geometry,
                frame.geometry()
            )));
        }
        Ok(Frame::from_array(frame.pixels() * &self.mask, frame.timestamp()))
    }

    /// Applies the mask across a frame sequence.
    pub fn apply_sequence(&self, frames: &[Frame]) -> Result<Vec<Frame>> {
        frames.par_iter().map(|frame| self.apply(frame)).collect()
    }
}
