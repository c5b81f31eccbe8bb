use serde::{Deserialize, Serialize};

use crate::error::{EventFrameError, Result};

/// Ordered table of canonical contact-orientation unit vectors.
///
/// Contact labels index into this table 1-based; label 0 means "no contact"
/// and never touches the table. Vectors may be 3D, but only the first two
/// components participate in rotation and matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRotationTable {
    vectors: Vec<[f32; 3]>,
}

impl ReferenceRotationTable {
    pub fn new(vectors: Vec<[f32; 3]>) -> Result<Self> {
        if vectors.is_empty() {
            return Err(EventFrameError::BadParameters(
                "reference rotation table must not be empty".into(),
            ));
        }
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[[f32; 3]] {
        &self.vectors
    }
}

/// Maps contact labels through a geometric rotation to the nearest label in
/// the reference table.
///
/// Each nonzero label's reference vector is rotated by `angle_degrees` with
/// the matrix `[[cos, sin], [-sin, cos]]` and replaced by the 1-based index
/// of the table entry closest in Euclidean distance, ties going to the first
/// occurrence in table order. Zero labels pass through unchanged. A label
/// outside `1..=table.len()` is rejected.
///
/// Used to keep ground-truth contact labels consistent with rotated frames:
/// rotate the frames and the labels by the same angle.
pub fn rotate_contact_labels(
    labels: &[u32],
    table: &ReferenceRotationTable,
    angle_degrees: f64,
) -> Result<Vec<u32>> {
    let radians = angle_degrees.to_radians();
    let (sin, cos) = (radians.sin() as f32, radians.cos() as f32);

    let mut rotated_labels = Vec::with_capacity(labels.len());
    for &label in labels {
        if label == 0 {
            rotated_labels.push(0);
            continue;
        }
        let vector = table
            .vectors()
            .get(label as usize - 1)
            .ok_or_else(|| {
                EventFrameError::BadParameters(format!(
                    "contact label {} outside reference table of length {}",
                    label,
                    table.len()
                ))
            })?;

        let rotated_x = cos * vector[0] + sin * vector[1];
        let rotated_y = -sin * vector[0] + cos * vector[1];

        let mut best_distance = f32::INFINITY;
        let mut best_index = 1u32;
        for (index, candidate) in table.vectors().iter().enumerate() {
            let dx = candidate[0] - rotated_x;
            let dy = candidate[1] - rotated_y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < best_distance {
                best_distance = distance;
                best_index = index as u32 + 1;
            }
        }
        rotated_labels.push(best_index);
    }
    Ok(rotated_labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Eight compass directions, 45 degrees apart, first entry pointing +x.
    fn compass_table() -> ReferenceRotationTable {
        let vectors = (0..8)
            .map(|i| {
                let angle = (i as f64) * 45.0_f64.to_radians();
                [angle.cos() as f32, angle.sin() as f32, 0.0]
            })
            .collect();
        ReferenceRotationTable::new(vectors).unwrap()
    }

    #[test]
    fn test_zero_label_passes_through() {
        let table = compass_table();
        let labels = rotate_contact_labels(&[0, 1, 0], &table, 90.0).unwrap();
        assert_eq!(labels[0], 0);
        assert_eq!(labels[2], 0);
    }

    #[test]
    fn test_zero_degree_rotation_is_identity() {
        let table = compass_table();
        let labels: Vec<u32> = (1..=8).collect();
        assert_eq!(rotate_contact_labels(&labels, &table, 0.0).unwrap(), labels);
    }

    #[test]
    fn test_full_turn_matches_zero_turn() {
        let table = compass_table();
        let labels: Vec<u32> = (1..=8).collect();
        let full = rotate_contact_labels(&labels, &table, 360.0).unwrap();
        let zero = rotate_contact_labels(&labels, &table, 0.0).unwrap();
        assert_eq!(full, zero);
    }

    #[test]
    fn test_rotation_steps_through_table() {
        let table = compass_table();
        // the rotation matrix [[cos, sin], [-sin, cos]] maps +x toward -y
        // for a positive angle, which steps backwards through a table laid
        // out counter-clockwise
        let labels = rotate_contact_labels(&[2], &table, 45.0).unwrap();
        assert_eq!(labels, vec![1]);
        let labels = rotate_contact_labels(&[1], &table, 45.0).unwrap();
        assert_eq!(labels, vec![8]);
    }

    #[test]
    fn test_out_of_range_label_rejected() {
        let table = compass_table();
        assert!(rotate_contact_labels(&[9], &table, 0.0).is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(ReferenceRotationTable::new(Vec::new()).is_err());
    }
}
