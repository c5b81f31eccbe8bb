use serde::{Deserialize, Serialize};

use crate::error::{EventFrameError, Result};

/// Fixed output geometry of accumulated frames (height x width x channels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl FrameGeometry {
    pub fn new(height: usize, width: usize, channels: usize) -> Result<Self> {
        if height == 0 || width == 0 || channels == 0 {
            return Err(EventFrameError::BadParameters(format!(
                "frame geometry dimensions must be nonzero, got {}x{}x{}",
                height, width, channels
            )));
        }
        Ok(Self {
            height,
            width,
            channels,
        })
    }

    /// Same plane geometry with a different channel count.
    pub fn with_channels(&self, channels: usize) -> Result<Self> {
        Self::new(self.height, self.width, channels)
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    pub fn num_elements(&self) -> usize {
        self.height * self.width * self.channels
    }
}

impl std::fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

/// Ascending sequence of target timestamps defining frame boundaries.
///
/// Timestamps must be strictly increasing. Accumulation modes that need a
/// step size infer it from the gap between the final two entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStepGrid {
    timestamps: Vec<f64>,
}

impl TimeStepGrid {
    pub fn new(timestamps: Vec<f64>) -> Result<Self> {
        for index in 1..timestamps.len() {
            if timestamps[index] <= timestamps[index - 1] {
                return Err(EventFrameError::MalformedGrid { index });
            }
        }
        Ok(Self { timestamps })
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Step size inferred from the gap between the final two entries.
    ///
    /// Requires at least two entries; fails with
    /// [`EventFrameError::InsufficientGridSize`] otherwise.
    pub fn step(&self) -> Result<f64> {
        if self.timestamps.len() < 2 {
            return Err(EventFrameError::InsufficientGridSize {
                required: 2,
                actual: self.timestamps.len(),
            });
        }
        let n = self.timestamps.len();
        Ok(self.timestamps[n - 1] - self.timestamps[n - 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_rejects_zero_dimension() {
        assert!(FrameGeometry::new(0, 346, 1).is_err());
        assert!(FrameGeometry::new(260, 346, 3).is_ok());
    }

    #[test]
    fn test_grid_rejects_non_increasing() {
        let err = TimeStepGrid::new(vec![0.0, 0.1, 0.1]).unwrap_err();
        match err {
            EventFrameError::MalformedGrid { index } => assert_eq!(index, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_step_from_last_two_entries() {
        let grid = TimeStepGrid::new(vec![0.0, 0.1, 0.3]).unwrap();
        assert!((grid.step().unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_step_needs_two_entries() {
        let grid = TimeStepGrid::new(vec![0.5]).unwrap();
        assert!(matches!(
            grid.step(),
            Err(EventFrameError::InsufficientGridSize { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_empty_grid_allowed() {
        let grid = TimeStepGrid::new(Vec::new()).unwrap();
        assert!(grid.is_empty());
    }
}
