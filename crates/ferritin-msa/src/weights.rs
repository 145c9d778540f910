//! Sequence reweighting
//!
//! Down-weight redundant rows: every row gets `1 / (1 + n)` where `n` counts the
//! other rows closer than [`HAMMING_THRESHOLD`] in normalized Hamming distance.
//!
use crate::error::{MsaError, Result};
use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView1};

/// Rows closer than this fraction of differing positions are near-duplicates.
pub const HAMMING_THRESHOLD: f64 = 0.38;

fn hamming_distance(a: ArrayView1<u8>, b: ArrayView1<u8>) -> f64 {
    let differing = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
    differing as f64 / a.len() as f64
}

/// Redundancy weights for every row of the sequence matrix.
pub fn sequence_weights(seq_mat: &Array2<u8>) -> Result<Array1<f64>> {
    sequence_weights_with(seq_mat, HAMMING_THRESHOLD)
}

/// [`sequence_weights`] with an explicit near-duplicate threshold.
pub fn sequence_weights_with(seq_mat: &Array2<u8>, threshold: f64) -> Result<Array1<f64>> {
    let (n_align, n_res) = seq_mat.dim();
    if n_res == 0 {
        return Err(MsaError::InvalidInput(
            "cannot weight sequences of length 0".to_string(),
        ));
    }

    let mut neighbours = vec![0usize; n_align];
    for (i, j) in (0..n_align).tuple_combinations() {
        if hamming_distance(seq_mat.row(i), seq_mat.row(j)) < threshold {
            neighbours[i] += 1;
            neighbours[j] += 1;
        }
    }

    Ok(neighbours
        .into_iter()
        .map(|n| 1.0 / (1 + n) as f64)
        .collect())
}

/// Effective number of sequences.
pub fn effective_depth(weights: &Array1<f64>) -> f64 {
    weights.sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_alignment;

    #[test]
    fn test_mutual_near_duplicates() {
        let rows = ["ACD", "ACE", "A-D"];
        let mat = encode_alignment("ACD", &rows, false).unwrap();
        let weights = sequence_weights(&mat).unwrap();
        // ACE vs A-D differs at 2/3 positions, above the threshold
        assert!((weights[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((weights[1] - 0.5).abs() < 1e-12);
        assert!((weights[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_distinct_rows_keep_unit_weight() {
        let rows = ["ACDE", "WWWW", "GHIK"];
        let mat = encode_alignment("ACDE", &rows, false).unwrap();
        let weights = sequence_weights(&mat).unwrap();
        assert!(weights.iter().all(|&w| w == 1.0));
        assert_eq!(effective_depth(&weights), 3.0);
    }

    #[test]
    fn test_identical_rows_share_weight() {
        let rows = ["ACDE"; 4];
        let mat = encode_alignment("ACDE", &rows, false).unwrap();
        let weights = sequence_weights(&mat).unwrap();
        assert!(weights.iter().all(|&w| (w - 0.25).abs() < 1e-12));
        assert!((effective_depth(&weights) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 1 of 2 positions differ, 0.5 is not below 0.5
        let rows = ["AC", "AW"];
        let mat = encode_alignment("AC", &rows, false).unwrap();
        let weights = sequence_weights_with(&mat, 0.5).unwrap();
        assert_eq!(weights.to_vec(), vec![1.0, 1.0]);
    }
}
