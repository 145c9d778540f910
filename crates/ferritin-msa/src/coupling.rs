//! Coupling analysis
//!
//! Entropy and mutual information between alignment columns, following
//! "Mutual information without the influence of phylogeny or entropy dramatically
//! improves residue contact prediction" (Dunn, Wahl & Gloor, 2008).
//!
//! The coupling tensor is `[length, length, 4]` with channels given by [`CouplingChannel`].
//! Also here: static per-column features, gap co-occurrence and the mean contact potential.
//!
use crate::error::{MsaError, Result};
use crate::info::alphabet::{ALPHABET_SIZE, GAP_INDEX, NON_GAP_SIZE};
use crate::info::tables::ReferenceTables;
use ndarray::{s, Array1, Array2, Array3, Array4, Axis};
use strum::{Display, EnumIter};

const ENTROPY_EPS: f64 = 1e-7;
const RATIO_EPS: f64 = 1e-5;

/// Channels of the coupling tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum CouplingChannel {
    /// raw mutual information
    #[strum(serialize = "mi")]
    Mi = 0,
    /// MI normalized by the joint entropy
    #[strum(serialize = "mi_r")]
    MiR = 1,
    /// MI minus the average product correction
    #[strum(serialize = "mi_p")]
    MiP = 2,
    /// MI minus the average sum correction
    #[strum(serialize = "mi_a")]
    MiA = 3,
}

impl CouplingChannel {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

fn entropy_term(p: f64) -> f64 {
    -p * (p + ENTROPY_EPS).ln() / 21f64.ln()
}

/// Per-column entropy in units of log(21).
pub fn entropy_1d(prof_1d: &Array2<f64>) -> Array1<f64> {
    prof_1d.map_axis(Axis(1), |row| row.iter().map(|&p| entropy_term(p)).sum())
}

/// Per-column-pair joint entropy in units of log(21).
pub fn entropy_2d(prof_2d: &Array4<f64>) -> Array2<f64> {
    let (n_res, _, _, _) = prof_2d.dim();
    Array2::from_shape_fn((n_res, n_res), |(i, j)| {
        prof_2d
            .slice(s![i, j, .., ..])
            .iter()
            .map(|&p| entropy_term(p))
            .sum()
    })
}

fn zero_diagonal(mut mat: Array2<f64>) -> Array2<f64> {
    mat.diag_mut().fill(0.0);
    mat
}

/// Mutual information features `[MI, MIr, MIp, MIa]` for every pair of columns.
///
/// Self-pairs are zero in every channel except `MIr`, which is `0 / H2` there as well.
pub fn mutual_information(prof_1d: &Array2<f64>, prof_2d: &Array4<f64>) -> Result<Array3<f64>> {
    let n_res = prof_1d.nrows();
    let (d0, d1, d2, d3) = prof_2d.dim();
    if d0 != n_res || d1 != n_res {
        return Err(MsaError::ShapeMismatch {
            context: "pair profile length",
            expected: n_res,
            found: if d0 != n_res { d0 } else { d1 },
        });
    }
    if d2 != prof_1d.ncols() || d3 != prof_1d.ncols() {
        return Err(MsaError::ShapeMismatch {
            context: "pair profile width",
            expected: prof_1d.ncols(),
            found: if d2 != prof_1d.ncols() { d2 } else { d3 },
        });
    }
    if n_res < 2 {
        return Err(MsaError::InvalidInput(format!(
            "mutual information needs at least two columns, found {}",
            n_res
        )));
    }

    let h_1d = entropy_1d(prof_1d);
    let h_2d = entropy_2d(prof_2d);
    let mi = zero_diagonal(Array2::from_shape_fn((n_res, n_res), |(i, j)| {
        h_1d[i] + h_1d[j] - h_2d[[i, j]]
    }));
    let mi_r = &mi / &(&h_2d + RATIO_EPS);

    let n = n_res as f64;
    let mi_1d = mi.sum_axis(Axis(1)) / (n - 1.0);
    let mi_av = mi.sum() / n / (n - 1.0);

    let mi_p = if mi_av.abs() > f64::EPSILON {
        zero_diagonal(Array2::from_shape_fn((n_res, n_res), |(i, j)| {
            mi[[i, j]] - mi_1d[i] * mi_1d[j] / mi_av
        }))
    } else {
        log::warn!("average mutual information is zero, skipping product correction");
        mi.clone()
    };
    let mi_a = zero_diagonal(Array2::from_shape_fn((n_res, n_res), |(i, j)| {
        mi[[i, j]] - (mi_1d[i] + mi_1d[j] - mi_av)
    }));

    let mut features = Array3::zeros((n_res, n_res, 4));
    features.slice_mut(s![.., .., CouplingChannel::Mi.index()]).assign(&mi);
    features.slice_mut(s![.., .., CouplingChannel::MiR.index()]).assign(&mi_r);
    features.slice_mut(s![.., .., CouplingChannel::MiP.index()]).assign(&mi_p);
    features.slice_mut(s![.., .., CouplingChannel::MiA.index()]).assign(&mi_a);
    Ok(features)
}

/// Per-column `[column_index, length, depth, effective_depth]`, shape `[length, 4]`.
pub fn static_features(seq_mat: &Array2<u8>, weights: &Array1<f64>) -> Result<Array2<f64>> {
    let (n_align, n_res) = seq_mat.dim();
    if weights.len() != n_align {
        return Err(MsaError::ShapeMismatch {
            context: "sequence weights",
            expected: n_align,
            found: weights.len(),
        });
    }
    let effective = weights.sum();
    Ok(Array2::from_shape_fn((n_res, 4), |(i, k)| match k {
        0 => i as f64,
        1 => n_res as f64,
        2 => n_align as f64,
        _ => effective,
    }))
}

/// Fraction of rows gapped at both columns, `[length, length]`.
pub fn gap_matrix(seq_mat: &Array2<u8>) -> Result<Array2<f64>> {
    let n_align = seq_mat.nrows();
    if n_align == 0 {
        return Err(MsaError::NumericalDegeneracy {
            context: "gap_matrix",
            index: 0,
        });
    }
    let gaps = seq_mat.mapv(|s| if s as usize == GAP_INDEX { 1.0 } else { 0.0 });
    Ok(gaps.t().dot(&gaps) / n_align as f64)
}

/// Pair-profile-weighted contact potential, `[length, length, 1]`.
pub fn mean_contact_potential(prof_2d: &Array4<f64>, tables: &ReferenceTables) -> Result<Array3<f64>> {
    let (n_res, _, width, width_b) = prof_2d.dim();
    if width != width_b || (width != ALPHABET_SIZE && width != NON_GAP_SIZE) {
        return Err(MsaError::ShapeMismatch {
            context: "pair profile width",
            expected: ALPHABET_SIZE,
            found: width,
        });
    }
    tables.validate()?;
    let cp = tables.contact_matrix(width)?;
    let mcp = Array2::from_shape_fn((n_res, n_res), |(i, j)| {
        (&prof_2d.slice(s![i, j, .., ..]) * &cp).sum()
    });
    Ok(mcp.insert_axis(Axis(2)))
}
