//! # Reference Tables
//!
//! Constant lookup data consumed by the prior and the contact potential:
//!
//! - background residue frequencies (UniProtKB/Swiss-Prot composition, percent)
//! - BLOSUM62 substitution scores
//! - Miyazawa-Jernigan (1996) contact energies, in RT units
//!
//! All tables are indexed in alphabet order (see [`crate::AminoAcid`]). They are plain
//! values: build one [`ReferenceTables`] at startup and pass it to the featurizer.
//!
use crate::error::{MsaError, Result};
use crate::info::alphabet::ALPHABET_SIZE;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::io::Read;

#[rustfmt::skip]
const BACKGROUND_FREQUENCIES: [f64; ALPHABET_SIZE] = [
    //  A     R     N     D     C     Q     E     G     H     I     L
    8.25, 5.53, 4.06, 5.45, 1.37, 3.93, 6.75, 7.07, 2.27, 5.96, 9.66,
    //  K     M     F     P     S     T     W     Y     V     X     -
    5.84, 2.42, 3.86, 4.70, 6.56, 5.34, 1.08, 2.92, 6.87, 1.00, 1.00,
];

#[rustfmt::skip]
// BLOSUM62. `X` is the BLOSUM62 X row, the gap uses the `*` row.
const BLOSUM62: [[f64; ALPHABET_SIZE]; ALPHABET_SIZE] = [
    // columns: A R N D C Q E G H I L K M F P S T W Y V X -
    [ 4.0, -1.0, -2.0, -2.0,  0.0, -1.0, -1.0,  0.0, -2.0, -1.0, -1.0, -1.0, -1.0, -2.0, -1.0,  1.0,  0.0, -3.0, -2.0,  0.0,  0.0, -4.0], // A
    [-1.0,  5.0,  0.0, -2.0, -3.0,  1.0,  0.0, -2.0,  0.0, -3.0, -2.0,  2.0, -1.0, -3.0, -2.0, -1.0, -1.0, -3.0, -2.0, -3.0, -1.0, -4.0], // R
    [-2.0,  0.0,  6.0,  1.0, -3.0,  0.0,  0.0,  0.0,  1.0, -3.0, -3.0,  0.0, -2.0, -3.0, -2.0,  1.0,  0.0, -4.0, -2.0, -3.0, -1.0, -4.0], // N
    [-2.0, -2.0,  1.0,  6.0, -3.0,  0.0,  2.0, -1.0, -1.0, -3.0, -4.0, -1.0, -3.0, -3.0, -1.0,  0.0, -1.0, -4.0, -3.0, -3.0, -1.0, -4.0], // D
    [ 0.0, -3.0, -3.0, -3.0,  9.0, -3.0, -4.0, -3.0, -3.0, -1.0, -1.0, -3.0, -1.0, -2.0, -3.0, -1.0, -1.0, -2.0, -2.0, -1.0, -2.0, -4.0], // C
    [-1.0,  1.0,  0.0,  0.0, -3.0,  5.0,  2.0, -2.0,  0.0, -3.0, -2.0,  1.0,  0.0, -3.0, -1.0,  0.0, -1.0, -2.0, -1.0, -2.0, -1.0, -4.0], // Q
    [-1.0,  0.0,  0.0,  2.0, -4.0,  2.0,  5.0, -2.0,  0.0, -3.0, -3.0,  1.0, -2.0, -3.0, -1.0,  0.0, -1.0, -3.0, -2.0, -2.0, -1.0, -4.0], // E
    [ 0.0, -2.0,  0.0, -1.0, -3.0, -2.0, -2.0,  6.0, -2.0, -4.0, -4.0, -2.0, -3.0, -3.0, -2.0,  0.0, -2.0, -2.0, -3.0, -3.0, -1.0, -4.0], // G
    [-2.0,  0.0,  1.0, -1.0, -3.0,  0.0,  0.0, -2.0,  8.0, -3.0, -3.0, -1.0, -2.0, -1.0, -2.0, -1.0, -2.0, -2.0,  2.0, -3.0, -1.0, -4.0], // H
    [-1.0, -3.0, -3.0, -3.0, -1.0, -3.0, -3.0, -4.0, -3.0,  4.0,  2.0, -3.0,  1.0,  0.0, -3.0, -2.0, -1.0, -3.0, -1.0,  3.0, -1.0, -4.0], // I
    [-1.0, -2.0, -3.0, -4.0, -1.0, -2.0, -3.0, -4.0, -3.0,  2.0,  4.0, -2.0,  2.0,  0.0, -3.0, -2.0, -1.0, -2.0, -1.0,  1.0, -1.0, -4.0], // L
    [-1.0,  2.0,  0.0, -1.0, -3.0,  1.0,  1.0, -2.0, -1.0, -3.0, -2.0,  5.0, -1.0, -3.0, -1.0,  0.0, -1.0, -3.0, -2.0, -2.0, -1.0, -4.0], // K
    [-1.0, -1.0, -2.0, -3.0, -1.0,  0.0, -2.0, -3.0, -2.0,  1.0,  2.0, -1.0,  5.0,  0.0, -2.0, -1.0, -1.0, -1.0, -1.0,  1.0, -1.0, -4.0], // M
    [-2.0, -3.0, -3.0, -3.0, -2.0, -3.0, -3.0, -3.0, -1.0,  0.0,  0.0, -3.0,  0.0,  6.0, -4.0, -2.0, -2.0,  1.0,  3.0, -1.0, -1.0, -4.0], // F
    [-1.0, -2.0, -2.0, -1.0, -3.0, -1.0, -1.0, -2.0, -2.0, -3.0, -3.0, -1.0, -2.0, -4.0,  7.0, -1.0, -1.0, -4.0, -3.0, -2.0, -2.0, -4.0], // P
    [ 1.0, -1.0,  1.0,  0.0, -1.0,  0.0,  0.0,  0.0, -1.0, -2.0, -2.0,  0.0, -1.0, -2.0, -1.0,  4.0,  1.0, -3.0, -2.0, -2.0,  0.0, -4.0], // S
    [ 0.0, -1.0,  0.0, -1.0, -1.0, -1.0, -1.0, -2.0, -2.0, -1.0, -1.0, -1.0, -1.0, -2.0, -1.0,  1.0,  5.0, -2.0, -2.0,  0.0,  0.0, -4.0], // T
    [-3.0, -3.0, -4.0, -4.0, -2.0, -2.0, -3.0, -2.0, -2.0, -3.0, -2.0, -3.0, -1.0,  1.0, -4.0, -3.0, -2.0, 11.0,  2.0, -3.0, -2.0, -4.0], // W
    [-2.0, -2.0, -2.0, -3.0, -2.0, -1.0, -2.0, -3.0,  2.0, -1.0, -1.0, -2.0, -1.0,  3.0, -3.0, -2.0, -2.0,  2.0,  7.0, -1.0, -1.0, -4.0], // Y
    [ 0.0, -3.0, -3.0, -3.0, -1.0, -2.0, -2.0, -3.0, -3.0,  3.0,  1.0, -2.0,  1.0, -1.0, -2.0, -2.0,  0.0, -3.0, -1.0,  4.0, -1.0, -4.0], // V
    [ 0.0, -1.0, -1.0, -1.0, -2.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -2.0,  0.0,  0.0, -2.0, -1.0, -1.0, -1.0, -4.0], // X
    [-4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0, -4.0,  1.0], // -
];

#[rustfmt::skip]
// Miyazawa & Jernigan, J. Mol. Biol. 256 (1996), table 3. No contact energy for X or gaps.
const CONTACT_POTENTIAL: [[f64; ALPHABET_SIZE]; ALPHABET_SIZE] = [
    // columns: A R N D C Q E G H I L K M F P S T W Y V X -
    [-2.72, -1.83, -1.84, -1.70, -3.57, -1.89, -1.51, -2.31, -2.41, -4.58, -4.91, -1.31, -3.94, -4.81, -2.03, -2.01, -2.32, -3.82, -3.36, -4.04,  0.00,  0.00], // A
    [-1.83, -1.55, -1.64, -2.29, -2.57, -1.80, -2.27, -1.72, -2.16, -3.14, -3.81, -0.59, -3.12, -3.98, -1.70, -1.62, -1.90, -3.41, -3.16, -2.70,  0.00,  0.00], // R
    [-1.84, -1.64, -1.68, -1.68, -2.59, -1.71, -1.51, -1.74, -2.08, -3.24, -3.74, -1.21, -2.95, -3.75, -1.53, -1.58, -1.88, -3.07, -2.76, -2.83,  0.00,  0.00], // N
    [-1.70, -2.29, -1.68, -1.21, -2.41, -1.46, -1.02, -1.59, -2.32, -3.17, -3.40, -1.68, -2.57, -3.48, -1.33, -1.63, -1.80, -2.84, -2.76, -2.48,  0.00,  0.00], // D
    [-3.57, -2.57, -2.59, -2.41, -5.44, -2.85, -2.27, -3.16, -3.60, -5.50, -5.83, -1.95, -4.99, -5.80, -3.07, -2.86, -3.11, -4.95, -4.16, -4.96,  0.00,  0.00], // C
    [-1.89, -1.80, -1.71, -1.46, -2.85, -1.54, -1.42, -1.66, -1.98, -3.67, -4.04, -1.29, -3.30, -4.10, -1.73, -1.49, -1.90, -3.11, -2.97, -3.07,  0.00,  0.00], // Q
    [-1.51, -2.27, -1.51, -1.02, -2.27, -1.42, -0.91, -1.22, -2.15, -3.27, -3.59, -1.80, -2.89, -3.56, -1.26, -1.48, -1.74, -2.99, -2.79, -2.67,  0.00,  0.00], // E
    [-2.31, -1.72, -1.74, -1.59, -3.16, -1.66, -1.22, -2.24, -2.15, -3.78, -4.16, -1.15, -3.39, -4.13, -1.87, -1.82, -2.08, -3.42, -3.01, -3.38,  0.00,  0.00], // G
    [-2.41, -2.16, -2.08, -2.32, -3.60, -1.98, -2.15, -2.15, -3.05, -3.63, -4.54, -1.35, -3.98, -4.77, -2.25, -2.11, -2.42, -3.98, -3.52, -3.58,  0.00,  0.00], // H
    [-4.58, -3.14, -3.24, -3.17, -5.50, -3.67, -3.27, -3.78, -3.63, -6.54, -7.04, -2.49, -6.02, -6.84, -3.76, -3.52, -4.03, -5.78, -5.25, -6.05,  0.00,  0.00], // I
    [-4.91, -3.81, -3.74, -3.40, -5.83, -4.04, -3.59, -4.16, -4.54, -7.04, -7.37, -3.37, -6.41, -7.28, -4.20, -3.92, -4.34, -6.14, -5.67, -6.48,  0.00,  0.00], // L
    [-1.31, -0.59, -1.21, -1.68, -1.95, -1.29, -1.80, -1.15, -1.35, -2.49, -3.37, -0.12, -2.48, -3.36, -0.97, -1.05, -1.31, -2.69, -2.60, -2.29,  0.00,  0.00], // K
    [-3.94, -3.12, -2.95, -2.57, -4.99, -3.30, -2.89, -3.39, -3.98, -6.02, -6.41, -2.48, -5.46, -6.56, -3.45, -3.03, -3.51, -5.55, -4.91, -5.32,  0.00,  0.00], // M
    [-4.81, -3.98, -3.75, -3.48, -5.80, -4.10, -3.56, -4.13, -4.77, -6.84, -7.28, -3.36, -6.56, -7.26, -4.25, -4.02, -4.28, -6.16, -5.66, -6.29,  0.00,  0.00], // F
    [-2.03, -1.70, -1.53, -1.33, -3.07, -1.73, -1.26, -1.87, -2.25, -3.76, -4.20, -0.97, -3.45, -4.25, -1.75, -1.57, -1.90, -3.73, -3.19, -3.32,  0.00,  0.00], // P
    [-2.01, -1.62, -1.58, -1.63, -2.86, -1.49, -1.48, -1.82, -2.11, -3.52, -3.92, -1.05, -3.03, -4.02, -1.57, -1.67, -1.96, -2.99, -2.78, -3.05,  0.00,  0.00], // S
    [-2.32, -1.90, -1.88, -1.80, -3.11, -1.90, -1.74, -2.08, -2.42, -4.03, -4.34, -1.31, -3.51, -4.28, -1.90, -1.96, -2.12, -3.22, -3.01, -3.46,  0.00,  0.00], // T
    [-3.82, -3.41, -3.07, -2.84, -4.95, -3.11, -2.99, -3.42, -3.98, -5.78, -6.14, -2.69, -5.55, -6.16, -3.73, -2.99, -3.22, -5.06, -4.66, -5.18,  0.00,  0.00], // W
    [-3.36, -3.16, -2.76, -2.76, -4.16, -2.97, -2.79, -3.01, -3.52, -5.25, -5.67, -2.60, -4.91, -5.66, -3.19, -2.78, -3.01, -4.66, -4.17, -4.62,  0.00,  0.00], // Y
    [-4.04, -2.70, -2.83, -2.48, -4.96, -3.07, -2.67, -3.38, -3.58, -6.05, -6.48, -2.29, -5.32, -6.29, -3.32, -3.05, -3.46, -5.18, -4.62, -5.52,  0.00,  0.00], // V
    [ 0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00], // X
    [ 0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00,  0.00], // -
];

/// Background frequencies, substitution scores and contact potentials.
///
/// Matrices may be larger than the alphabet; only the leading
/// `ALPHABET_SIZE x ALPHABET_SIZE` block is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub background: Vec<f64>,
    pub substitution: Vec<Vec<f64>>,
    pub contact_potential: Vec<Vec<f64>>,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self {
            background: BACKGROUND_FREQUENCIES.to_vec(),
            substitution: BLOSUM62.iter().map(|row| row.to_vec()).collect(),
            contact_potential: CONTACT_POTENTIAL.iter().map(|row| row.to_vec()).collect(),
        }
    }
}

impl ReferenceTables {
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: ReferenceTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let tables: ReferenceTables = serde_json::from_reader(reader)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check sizes, finiteness, symmetry and background positivity.
    pub fn validate(&self) -> Result<()> {
        if self.background.len() < ALPHABET_SIZE {
            return Err(MsaError::InvalidTable(format!(
                "background has {} entries, need at least {}",
                self.background.len(),
                ALPHABET_SIZE
            )));
        }
        if let Some((idx, value)) = self.background[..ALPHABET_SIZE]
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v <= 0.0)
        {
            return Err(MsaError::InvalidTable(format!(
                "background frequency {} at index {} must be positive",
                value, idx
            )));
        }
        check_square("substitution", &self.substitution)?;
        check_square("contact_potential", &self.contact_potential)?;
        Ok(())
    }

    /// Normalized background frequencies over the first `width` symbols.
    pub fn background_frequencies(&self, width: usize) -> Array1<f64> {
        let freqs = Array1::from_iter(self.background.iter().take(width).copied());
        let total = freqs.sum();
        freqs / total
    }

    pub fn substitution_matrix(&self, width: usize) -> Result<Array2<f64>> {
        truncate("substitution", &self.substitution, width)
    }

    pub fn contact_matrix(&self, width: usize) -> Result<Array2<f64>> {
        truncate("contact_potential", &self.contact_potential, width)
    }
}

// Leading `width x width` block of a row-major table.
fn truncate(name: &str, matrix: &[Vec<f64>], width: usize) -> Result<Array2<f64>> {
    if matrix.len() < width || matrix[..width].iter().any(|row| row.len() < width) {
        return Err(MsaError::InvalidTable(format!(
            "{} is smaller than {}x{}",
            name, width, width
        )));
    }
    Ok(Array2::from_shape_fn((width, width), |(a, b)| matrix[a][b]))
}

fn check_square(name: &str, matrix: &[Vec<f64>]) -> Result<()> {
    if matrix.len() < ALPHABET_SIZE || matrix.iter().any(|row| row.len() < ALPHABET_SIZE) {
        return Err(MsaError::InvalidTable(format!(
            "{} must be at least {}x{}",
            name, ALPHABET_SIZE, ALPHABET_SIZE
        )));
    }
    for a in 0..ALPHABET_SIZE {
        for b in 0..ALPHABET_SIZE {
            let value = matrix[a][b];
            if !value.is_finite() {
                return Err(MsaError::InvalidTable(format!(
                    "{}[{}][{}] is not finite",
                    name, a, b
                )));
            }
            if (value - matrix[b][a]).abs() > 1e-9 {
                return Err(MsaError::InvalidTable(format!(
                    "{} is not symmetric at ({}, {})",
                    name, a, b
                )));
            }
        }
    }
    Ok(())
}
