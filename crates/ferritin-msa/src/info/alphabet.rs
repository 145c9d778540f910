//! # Alphabet
//!
//! The 22-symbol residue alphabet used by every feature in this crate.
//!
//! Index order follows the substitution matrix: the 20 standard residues
//! (`ARNDCQEGHILKMFPSTWYV`), then `X` for anything unrecognized, then `-` for gaps.
//!
use strum::{Display, EnumIter, EnumString};

/// Number of symbols including the gap.
pub const ALPHABET_SIZE: usize = 22;
/// Number of symbols excluding the gap.
pub const NON_GAP_SIZE: usize = 21;
pub const UNKNOWN_INDEX: usize = 20;
pub const GAP_INDEX: usize = 21;

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum AminoAcid {
    #[strum(serialize = "A")] Ala = 0,
    #[strum(serialize = "R")] Arg = 1,
    #[strum(serialize = "N")] Asn = 2,
    #[strum(serialize = "D")] Asp = 3,
    #[strum(serialize = "C")] Cys = 4,
    #[strum(serialize = "Q")] Gln = 5,
    #[strum(serialize = "E")] Glu = 6,
    #[strum(serialize = "G")] Gly = 7,
    #[strum(serialize = "H")] His = 8,
    #[strum(serialize = "I")] Ile = 9,
    #[strum(serialize = "L")] Leu = 10,
    #[strum(serialize = "K")] Lys = 11,
    #[strum(serialize = "M")] Met = 12,
    #[strum(serialize = "F")] Phe = 13,
    #[strum(serialize = "P")] Pro = 14,
    #[strum(serialize = "S")] Ser = 15,
    #[strum(serialize = "T")] Thr = 16,
    #[strum(serialize = "W")] Trp = 17,
    #[strum(serialize = "Y")] Tyr = 18,
    #[strum(serialize = "V")] Val = 19,
    #[strum(serialize = "X")] Unknown = 20,
    #[strum(serialize = "-")] Gap = 21,
}

impl AminoAcid {
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn code1(&self) -> char {
        index_to_aa1(self.index())
    }

    pub fn from_code1(code: char) -> Self {
        Self::from_index(aa1_to_index(code))
    }

    #[rustfmt::skip]
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Ala,  1 => Self::Arg,  2 => Self::Asn,  3 => Self::Asp,
            4 => Self::Cys,  5 => Self::Gln,  6 => Self::Glu,  7 => Self::Gly,
            8 => Self::His,  9 => Self::Ile,  10 => Self::Leu, 11 => Self::Lys,
            12 => Self::Met, 13 => Self::Phe, 14 => Self::Pro, 15 => Self::Ser,
            16 => Self::Thr, 17 => Self::Trp, 18 => Self::Tyr, 19 => Self::Val,
            21 => Self::Gap,
            _ => Self::Unknown,
        }
    }
}

#[rustfmt::skip]
/// Map a one-letter code to its alphabet index.
///
/// Total: any symbol outside the alphabet, including lowercase letters,
/// maps to [`UNKNOWN_INDEX`].
pub fn aa1_to_index(aa: char) -> usize {
    match aa {
        'A' => 0,  'R' => 1,  'N' => 2,  'D' => 3,
        'C' => 4,  'Q' => 5,  'E' => 6,  'G' => 7,
        'H' => 8,  'I' => 9,  'L' => 10, 'K' => 11,
        'M' => 12, 'F' => 13, 'P' => 14, 'S' => 15,
        'T' => 16, 'W' => 17, 'Y' => 18, 'V' => 19,
        '-' => 21,
        _   => UNKNOWN_INDEX,
    }
}

#[rustfmt::skip]
pub fn index_to_aa1(index: usize) -> char {
    match index {
        0 => 'A',  1 => 'R',  2 => 'N',  3 => 'D',
        4 => 'C',  5 => 'Q',  6 => 'E',  7 => 'G',
        8 => 'H',  9 => 'I',  10 => 'L', 11 => 'K',
        12 => 'M', 13 => 'F', 14 => 'P', 15 => 'S',
        16 => 'T', 17 => 'W', 18 => 'Y', 19 => 'V',
        21 => '-',
        _ => 'X',
    }
}
