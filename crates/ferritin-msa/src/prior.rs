//! Substitution-matrix pseudocounts
//!
//! Each column's frequencies `f` are blended with a prior estimate
//! `g = normalize((f / P) . Q)` where `P` are background frequencies and
//! `Q[a, b] = P[a] P[b] exp(lambda S[a, b])` is derived from the substitution scores.
//! The empirical weight is `alpha = NC - 1`, `NC` being the number of observed symbols,
//! so conserved columns lean on the prior and diverse columns on the data:
//!
//! ```text
//! out = (alpha * f + beta * g) / (alpha + beta)
//! ```
use crate::error::{MsaError, Result};
use crate::info::alphabet::{ALPHABET_SIZE, NON_GAP_SIZE};
use crate::info::tables::ReferenceTables;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorConfig {
    /// pseudocount weight of the prior estimate
    pub beta: f64,
    /// scale applied to substitution scores before exponentiation
    pub substitution_scale: f64,
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            beta: 10.0,
            substitution_scale: 0.3176,
        }
    }
}

/// Precomputed background and substitution coupling for one profile width.
#[derive(Debug, Clone)]
pub struct ProfilePrior {
    background: Array1<f64>,
    q_mat: Array2<f64>,
    beta: f64,
}

impl ProfilePrior {
    pub fn new(tables: &ReferenceTables, width: usize, config: &PriorConfig) -> Result<Self> {
        if width != ALPHABET_SIZE && width != NON_GAP_SIZE {
            return Err(MsaError::ShapeMismatch {
                context: "prior width",
                expected: ALPHABET_SIZE,
                found: width,
            });
        }
        tables.validate()?;
        let background = tables.background_frequencies(width);
        let substitution = tables.substitution_matrix(width)?;
        let q_mat = Array2::from_shape_fn((width, width), |(a, b)| {
            background[a] * background[b] * (config.substitution_scale * substitution[[a, b]]).exp()
        });
        Ok(Self {
            background,
            q_mat,
            beta: config.beta,
        })
    }

    pub fn width(&self) -> usize {
        self.background.len()
    }

    /// The substitution-informed estimate `g` for a single column.
    pub fn prior_estimate(&self, freqs: ArrayView1<f64>, column: usize) -> Result<Array1<f64>> {
        let g = (&freqs / &self.background).dot(&self.q_mat);
        let total = g.sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(MsaError::NumericalDegeneracy {
                context: "profile prior",
                index: column,
            });
        }
        Ok(g / total)
    }

    /// Blend every column of `profile` with its prior estimate.
    pub fn regularize(&self, profile: &Array2<f64>) -> Result<Array2<f64>> {
        if profile.ncols() != self.width() {
            return Err(MsaError::ShapeMismatch {
                context: "profile width",
                expected: self.width(),
                found: profile.ncols(),
            });
        }
        let mut out = Array2::zeros(profile.raw_dim());
        for (i, (freqs, mut out_row)) in profile
            .axis_iter(Axis(0))
            .zip(out.axis_iter_mut(Axis(0)))
            .enumerate()
        {
            let observed = freqs.iter().filter(|&&f| f > 0.0).count();
            let alpha = observed as f64 - 1.0;
            let g = self.prior_estimate(freqs, i)?;
            out_row.assign(&((&freqs * alpha + &g * self.beta) / (alpha + self.beta)));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_alignment;
    use crate::info::alphabet::aa1_to_index;
    use crate::profile::{profile, profile_no_gap};

    #[test]
    fn test_conserved_column_equals_prior() {
        let tables = ReferenceTables::default();
        let prior = ProfilePrior::new(&tables, ALPHABET_SIZE, &PriorConfig::default()).unwrap();
        let mut prof = Array2::zeros((1, ALPHABET_SIZE));
        prof[[0, aa1_to_index('W')]] = 1.0;
        let out = prior.regularize(&prof).unwrap();
        let g = prior.prior_estimate(prof.row(0), 0).unwrap();
        for (o, e) in out.row(0).iter().zip(g.iter()) {
            assert!((o - e).abs() < 1e-12);
        }
        // the prior keeps most of the mass on the observed residue
        let w = aa1_to_index('W');
        assert!(out.row(0).iter().enumerate().all(|(a, &v)| a == w || v < out[[0, w]]));
    }

    #[test]
    fn test_rows_sum_to_one() {
        let rows = ["ACDKLM", "ACEKLM", "A-DKIM", "WCD-LV", "SCDRLM"];
        let mat = encode_alignment(rows[0], &rows, false).unwrap();
        let tables = ReferenceTables::default();
        let config = PriorConfig::default();

        let prof = profile(&mat, None).unwrap();
        let prior = ProfilePrior::new(&tables, ALPHABET_SIZE, &config).unwrap();
        for row in prior.regularize(&prof).unwrap().rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|&v| v > 0.0));
        }

        let prof = profile_no_gap(&mat).unwrap();
        let prior = ProfilePrior::new(&tables, NON_GAP_SIZE, &config).unwrap();
        for row in prior.regularize(&prof).unwrap().rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_small_beta_keeps_empirical_frequencies() {
        let tables = ReferenceTables::default();
        let config = PriorConfig {
            beta: 1e-9,
            ..PriorConfig::default()
        };
        let prior = ProfilePrior::new(&tables, ALPHABET_SIZE, &config).unwrap();
        let prof = Array2::from_elem((1, ALPHABET_SIZE), 1.0 / ALPHABET_SIZE as f64);
        let out = prior.regularize(&prof).unwrap();
        for (o, f) in out.iter().zip(prof.iter()) {
            assert!((o - f).abs() < 1e-9);
        }
    }

    #[test]
    fn test_diverse_column_trusts_data_more() {
        let tables = ReferenceTables::default();
        let prior = ProfilePrior::new(&tables, NON_GAP_SIZE, &PriorConfig::default()).unwrap();
        let mut prof = Array2::zeros((1, NON_GAP_SIZE));
        for a in 0..10 {
            prof[[0, a]] = 0.1;
        }
        let g = prior.prior_estimate(prof.row(0), 0).unwrap();
        let out = prior.regularize(&prof).unwrap();
        // alpha = 9, beta = 10
        for a in 0..NON_GAP_SIZE {
            let expected = (9.0 * prof[[0, a]] + 10.0 * g[a]) / 19.0;
            assert!((out[[0, a]] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degenerate_column() {
        let tables = ReferenceTables::default();
        let prior = ProfilePrior::new(&tables, ALPHABET_SIZE, &PriorConfig::default()).unwrap();
        let prof = Array2::zeros((2, ALPHABET_SIZE));
        assert!(matches!(
            prior.regularize(&prof),
            Err(MsaError::NumericalDegeneracy { index: 0, .. })
        ));
        assert!(ProfilePrior::new(&tables, 20, &PriorConfig::default()).is_err());
        let wrong = Array2::zeros((2, NON_GAP_SIZE));
        assert!(matches!(
            prior.regularize(&wrong),
            Err(MsaError::ShapeMismatch { .. })
        ));
    }
}
