//! Alignment encoding
//!
//! Convert the text rows of an a3m-style alignment into numeric arrays.
//! Lowercase characters are insertions relative to the query and never occupy a column.
//!
use crate::error::{MsaError, Result};
use crate::info::alphabet::{aa1_to_index, ALPHABET_SIZE, GAP_INDEX};
use ndarray::{Array2, Axis};

/// Rows sharing fewer identical residues with the query than this fraction
/// of the query length are dropped by [`encode_alignment`].
pub const MIN_IDENTITY_FRACTION: f64 = 0.01;

/// Iterate over the aligned (non-insertion) characters of a row.
pub fn strip_insertions(row: &str) -> impl Iterator<Item = char> + '_ {
    row.chars().filter(|c| !c.is_lowercase())
}

/// Map every aligned character of `row` to its alphabet index.
pub fn encode_sequence(row: &str) -> Vec<u8> {
    strip_insertions(row)
        .map(|c| aa1_to_index(c) as u8)
        .collect()
}

/// Number of positions where both sequences carry the same non-gap symbol.
pub fn sequence_identity(s1: &[u8], s2: &[u8]) -> Result<usize> {
    if s1.len() != s2.len() {
        return Err(MsaError::ShapeMismatch {
            context: "sequence_identity",
            expected: s1.len(),
            found: s2.len(),
        });
    }
    Ok(s1
        .iter()
        .zip(s2)
        .filter(|(a, b)| a == b && **a as usize != GAP_INDEX)
        .count())
}

/// Build the `[rows, query_length]` sequence matrix.
///
/// `rows[0]` must be the query itself. With `filter` set, rows whose identity to
/// the query is below [`MIN_IDENTITY_FRACTION`] of the query length are dropped;
/// the query row is always kept.
pub fn encode_alignment<S: AsRef<str>>(query: &str, rows: &[S], filter: bool) -> Result<Array2<u8>> {
    let fraction = if filter {
        Some(MIN_IDENTITY_FRACTION)
    } else {
        None
    };
    encode_alignment_with(query, rows, fraction)
}

/// [`encode_alignment`] with an explicit identity fraction (`None` disables filtering).
pub fn encode_alignment_with<S: AsRef<str>>(
    query: &str,
    rows: &[S],
    min_identity_fraction: Option<f64>,
) -> Result<Array2<u8>> {
    match rows.first() {
        Some(first) if first.as_ref() == query => {}
        Some(_) => {
            return Err(MsaError::InvalidInput(
                "the first alignment row must be the query sequence".to_string(),
            ))
        }
        None => return Err(MsaError::InvalidInput("alignment has no rows".to_string())),
    }

    let query_encoded = encode_sequence(query);
    let seq_len = query_encoded.len();
    if seq_len == 0 {
        return Err(MsaError::InvalidInput("query sequence is empty".to_string()));
    }

    let mut data: Vec<u8> = Vec::with_capacity(rows.len() * seq_len);
    let mut kept = 0;
    for (idx, row) in rows.iter().enumerate() {
        let encoded = encode_sequence(row.as_ref());
        if encoded.len() != seq_len {
            return Err(MsaError::MalformedRow {
                row: idx,
                expected: seq_len,
                found: encoded.len(),
            });
        }
        if let Some(fraction) = min_identity_fraction {
            let identity = sequence_identity(&query_encoded, &encoded)?;
            if idx > 0 && (identity as f64) < seq_len as f64 * fraction {
                continue;
            }
        }
        data.extend_from_slice(&encoded);
        kept += 1;
    }

    if kept < rows.len() {
        log::debug!(
            "dropped {} of {} alignment rows below identity threshold",
            rows.len() - kept,
            rows.len()
        );
    }

    Array2::from_shape_vec((kept, seq_len), data)
        .map_err(|e| MsaError::InvalidInput(e.to_string()))
}

/// One-hot encoding of a sequence as `[length, ALPHABET_SIZE]`.
///
/// Every character must be a letter or `-`. Letters outside the alphabet land in `X`.
pub fn one_hot(sequence: &str) -> Result<Array2<f64>> {
    if sequence.chars().any(|c| c != '-' && !c.is_alphabetic()) {
        return Err(MsaError::InvalidSequence(sequence.to_string()));
    }
    let length = sequence.chars().count();
    let mut encoded = Array2::zeros((length, ALPHABET_SIZE));
    for (i, c) in sequence.chars().enumerate() {
        encoded[[i, aa1_to_index(c)]] = 1.0;
    }
    Ok(encoded)
}

/// Per-row count of insertions preceding every aligned position, `[rows, length]`.
///
/// The aligned length is taken from the first row.
pub fn deletion_matrix<S: AsRef<str>>(rows: &[S]) -> Result<Array2<f64>> {
    let first = rows
        .first()
        .ok_or_else(|| MsaError::InvalidInput("alignment has no rows".to_string()))?;
    let seq_len = strip_insertions(first.as_ref()).count();

    let mut deletions = Array2::zeros((rows.len(), seq_len));
    for (idx, row) in rows.iter().enumerate() {
        let mut counts = Vec::with_capacity(seq_len);
        let mut run = 0usize;
        for c in row.as_ref().chars() {
            if c.is_lowercase() {
                run += 1;
            } else {
                counts.push(run as f64);
                run = 0;
            }
        }
        if counts.len() != seq_len {
            return Err(MsaError::MalformedRow {
                row: idx,
                expected: seq_len,
                found: counts.len(),
            });
        }
        deletions
            .row_mut(idx)
            .assign(&ndarray::ArrayView1::from(&counts[..]));
    }
    Ok(deletions)
}

/// Fraction of rows with an insertion before each aligned position, `[length, 1]`.
pub fn deletion_probability<S: AsRef<str>>(rows: &[S]) -> Result<Array2<f64>> {
    let present = deletion_matrix(rows)?.mapv(|count| if count > 0.0 { 1.0 } else { 0.0 });
    let seq_len = present.ncols();
    let probability = present
        .mean_axis(Axis(0))
        .ok_or(MsaError::NumericalDegeneracy {
            context: "deletion_probability",
            index: 0,
        })?;
    probability
        .into_shape_with_order((seq_len, 1))
        .map_err(|e| MsaError::InvalidInput(e.to_string()))
}
