//! Profile estimation
//!
//! Weighted single-column and column-pair residue frequencies.
//!
//! - `profile`: `[length, 22]`, gap included
//! - `profile_no_gap`: `[length, 21]`, unweighted
//! - `profile_2d`: `[length, length, R, R]` with `R` taken from a single-column profile
//!
use crate::error::{MsaError, Result};
use crate::info::alphabet::{ALPHABET_SIZE, NON_GAP_SIZE};
use ndarray::{Array1, Array2, Array4, Axis};

fn check_symbols(seq_mat: &Array2<u8>) -> Result<()> {
    match seq_mat.iter().find(|&&s| s as usize >= ALPHABET_SIZE) {
        Some(s) => Err(MsaError::InvalidInput(format!(
            "symbol index {} outside the alphabet",
            s
        ))),
        None => Ok(()),
    }
}

fn check_weights(seq_mat: &Array2<u8>, weights: &Array1<f64>) -> Result<()> {
    if weights.len() != seq_mat.nrows() {
        return Err(MsaError::ShapeMismatch {
            context: "sequence weights",
            expected: seq_mat.nrows(),
            found: weights.len(),
        });
    }
    Ok(())
}

// Normalize each row to sum to one, failing on empty rows.
fn normalize_rows(mut counts: Array2<f64>, context: &'static str) -> Result<Array2<f64>> {
    for (idx, mut row) in counts.axis_iter_mut(Axis(0)).enumerate() {
        let total = row.sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(MsaError::NumericalDegeneracy { context, index: idx });
        }
        row /= total;
    }
    Ok(counts)
}

// Weighted counts of the first `width` symbols per column.
fn column_counts(seq_mat: &Array2<u8>, weights: Option<&Array1<f64>>, width: usize) -> Array2<f64> {
    let mut counts = Array2::zeros((seq_mat.ncols(), width));
    for (m, row) in seq_mat.rows().into_iter().enumerate() {
        let w = weights.map_or(1.0, |w| w[m]);
        for (i, &s) in row.iter().enumerate() {
            let s = s as usize;
            if s < width {
                counts[[i, s]] += w;
            }
        }
    }
    counts
}

/// Weighted residue frequencies per column, gap included: `[length, 22]`.
///
/// `weights` defaults to one per row.
pub fn profile(seq_mat: &Array2<u8>, weights: Option<&Array1<f64>>) -> Result<Array2<f64>> {
    check_symbols(seq_mat)?;
    if let Some(w) = weights {
        check_weights(seq_mat, w)?;
    }
    normalize_rows(column_counts(seq_mat, weights, ALPHABET_SIZE), "profile")
}

/// Unweighted residue frequencies per column, gaps ignored: `[length, 21]`.
pub fn profile_no_gap(seq_mat: &Array2<u8>) -> Result<Array2<f64>> {
    check_symbols(seq_mat)?;
    normalize_rows(column_counts(seq_mat, None, NON_GAP_SIZE), "profile_no_gap")
}

/// Weighted joint frequencies of residue pairs for every pair of columns.
///
/// Output is `[length, length, R, R]` where `R` is the width of `profile_1d`
/// (21 or 22); pairs involving a symbol `>= R` are not counted. The whole tensor
/// is divided by the total weight.
pub fn profile_2d(
    seq_mat: &Array2<u8>,
    weights: &Array1<f64>,
    profile_1d: &Array2<f64>,
) -> Result<Array4<f64>> {
    check_symbols(seq_mat)?;
    check_weights(seq_mat, weights)?;
    let (_, n_res) = seq_mat.dim();
    let width = profile_1d.ncols();
    if width != ALPHABET_SIZE && width != NON_GAP_SIZE {
        return Err(MsaError::ShapeMismatch {
            context: "profile width",
            expected: ALPHABET_SIZE,
            found: width,
        });
    }
    if profile_1d.nrows() != n_res {
        return Err(MsaError::ShapeMismatch {
            context: "profile length",
            expected: n_res,
            found: profile_1d.nrows(),
        });
    }
    let total_weight = weights.sum();
    if total_weight <= 0.0 || !total_weight.is_finite() {
        return Err(MsaError::NumericalDegeneracy {
            context: "profile_2d",
            index: 0,
        });
    }

    let mut prof_2d = Array4::<f64>::zeros((n_res, n_res, width, width));
    let data = prof_2d
        .as_slice_mut()
        .ok_or_else(|| MsaError::InvalidInput("pair profile is not contiguous".to_string()))?;

    // one scatter pass per row: offset of (i, j, a, b) in row-major order
    let mut symbols: Vec<usize> = Vec::with_capacity(n_res);
    for (row, &w) in seq_mat.rows().into_iter().zip(weights.iter()) {
        symbols.clear();
        symbols.extend(row.iter().map(|&s| s as usize));
        for (i, &a) in symbols.iter().enumerate() {
            if a >= width {
                continue;
            }
            let base = i * n_res;
            for (j, &b) in symbols.iter().enumerate() {
                if b < width {
                    data[((base + j) * width + a) * width + b] += w;
                }
            }
        }
    }

    prof_2d.mapv_inplace(|v| v / total_weight);
    log::debug!(
        "pair profile [{}, {}, {}, {}] from {} rows",
        n_res,
        n_res,
        width,
        width,
        seq_mat.nrows()
    );
    Ok(prof_2d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_alignment;
    use crate::info::alphabet::{aa1_to_index, GAP_INDEX};
    use crate::weights::sequence_weights;

    fn small_alignment() -> Array2<u8> {
        let rows = ["ACDK", "ACEK", "A-DK", "WCD-"];
        encode_alignment("ACDK", &rows, false).unwrap()
    }

    #[test]
    fn test_profile_rows_sum_to_one() {
        let mat = small_alignment();
        let weights = sequence_weights(&mat).unwrap();
        for prof in [
            profile(&mat, None).unwrap(),
            profile(&mat, Some(&weights)).unwrap(),
            profile_no_gap(&mat).unwrap(),
        ] {
            for row in prof.rows() {
                assert!((row.sum() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_profile_counts() {
        let mat = small_alignment();
        let prof = profile(&mat, None).unwrap();
        assert_eq!(prof.dim(), (4, ALPHABET_SIZE));
        assert!((prof[[0, aa1_to_index('A')]] - 0.75).abs() < 1e-12);
        assert!((prof[[1, GAP_INDEX]] - 0.25).abs() < 1e-12);

        let no_gap = profile_no_gap(&mat).unwrap();
        assert_eq!(no_gap.dim(), (4, NON_GAP_SIZE));
        assert!((no_gap[[1, aa1_to_index('C')]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_profile() {
        let mat = small_alignment();
        let weights = Array1::from(vec![1.0, 0.0, 0.0, 1.0]);
        let prof = profile(&mat, Some(&weights)).unwrap();
        assert!((prof[[0, aa1_to_index('A')]] - 0.5).abs() < 1e-12);
        assert!((prof[[0, aa1_to_index('W')]] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weight_column_is_reported() {
        let mat = small_alignment();
        let weights = Array1::zeros(4);
        assert!(matches!(
            profile(&mat, Some(&weights)),
            Err(MsaError::NumericalDegeneracy { .. })
        ));
        let short = Array1::ones(3);
        assert!(matches!(
            profile(&mat, Some(&short)),
            Err(MsaError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_gap_only_column_without_gaps() {
        let rows = ["A-", "A-"];
        let mat = encode_alignment("A-", &rows, false).unwrap();
        assert!(matches!(
            profile_no_gap(&mat),
            Err(MsaError::NumericalDegeneracy { index: 1, .. })
        ));
    }

    #[test]
    fn test_profile_2d() {
        let mat = small_alignment();
        let weights = sequence_weights(&mat).unwrap();
        let prof = profile(&mat, Some(&weights)).unwrap();
        let prof_2d = profile_2d(&mat, &weights, &prof).unwrap();
        assert_eq!(prof_2d.dim(), (4, 4, ALPHABET_SIZE, ALPHABET_SIZE));

        // every column pair slice holds the full weight
        for i in 0..4 {
            for j in 0..4 {
                let slice = prof_2d.slice(ndarray::s![i, j, .., ..]);
                assert!((slice.sum() - 1.0).abs() < 1e-9);
            }
        }
        // the diagonal slice is the single-column profile on its diagonal
        for i in 0..4 {
            for a in 0..ALPHABET_SIZE {
                assert!((prof_2d[[i, i, a, a]] - prof[[i, a]]).abs() < 1e-12);
            }
        }
        // symmetric under swapping both columns and residues
        let a = aa1_to_index('A');
        let c = aa1_to_index('C');
        assert!((prof_2d[[0, 1, a, c]] - prof_2d[[1, 0, c, a]]).abs() < 1e-12);
    }

    #[test]
    fn test_profile_2d_without_gaps() {
        let mat = small_alignment();
        let weights = Array1::ones(4);
        let prof = profile_no_gap(&mat).unwrap();
        let prof_2d = profile_2d(&mat, &weights, &prof).unwrap();
        assert_eq!(prof_2d.dim(), (4, 4, NON_GAP_SIZE, NON_GAP_SIZE));
        // column 1 has one gap, so its pairs with column 0 only hold 3 of 4 rows
        let slice = prof_2d.slice(ndarray::s![0, 1, .., ..]);
        assert!((slice.sum() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_profile_2d_shape_checks() {
        let mat = small_alignment();
        let weights = Array1::ones(4);
        let bad = Array2::zeros((4, 20));
        assert!(matches!(
            profile_2d(&mat, &weights, &bad),
            Err(MsaError::ShapeMismatch { .. })
        ));
        let prof = profile(&mat, None).unwrap();
        let zero = Array1::zeros(4);
        assert!(matches!(
            profile_2d(&mat, &zero, &prof),
            Err(MsaError::NumericalDegeneracy { .. })
        ));
    }
}
