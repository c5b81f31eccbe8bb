use crate::data_types::Frame;
use crate::error::{EventFrameError, Result};

/// How far a frame's timestamp may run ahead of a target before the search
/// for that target is abandoned.
///
/// A forward-scan cutoff in stream time units, not a tolerance: once a frame
/// is this far past the target, no later frame can be closer, so the scan
/// gives up on the target without consuming the frame.
pub const ABANDON_GAP: f64 = 1.0;

/// Nearest-neighbor alignment of a timestamped frame sequence onto a target
/// timestamp grid.
///
/// For each target, scans forward from the last match and accepts the first
/// frame within `tolerance` (strict absolute difference). Targets without a
/// match are skipped, not padded, so the output may be shorter than the
/// target list; each frame is matched at most once.
#[derive(Debug, Clone)]
pub struct FrameSelector {
    tolerance: f64,
}

impl FrameSelector {
    pub fn new(tolerance: f64) -> Result<Self> {
        if tolerance <= 0.0 {
            return Err(EventFrameError::BadParameters(format!(
                "tolerance must be positive, got {}",
                tolerance
            )));
        }
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Selects at most one frame per target timestamp.
    pub fn select(&self, frames: &[Frame], targets: &[f64]) -> Vec<Frame> {
        let mut selected = Vec::new();
        let mut scan_start = 0;

        for &target in targets {
            for index in scan_start..frames.len() {
                let offset = frames[index].timestamp() - target;
                if offset.abs() < self.tolerance {
                    selected.push(frames[index].clone());
                    scan_start = index + 1;
                    break;
                } else if offset > ABANDON_GAP {
                    // too far ahead; give up on this target but keep the
                    // frame available for the next one
                    break;
                }
            }
        }

        tracing::debug!(
            selected = selected.len(),
            targets = targets.len(),
            "frame selection finished"
        );
        selected
    }
}
