//! # ferritin-msa
//!
//! Alignment-derived features for protein structure and contact models.
//!
//! __ferritin-msa__ turns a parsed multiple sequence alignment into ML-ready arrays:
//! * Numeric encoding of the alignment, the query one-hot and per-column insertion frequency
//! * Redundancy-corrected sequence weights
//! * Single and pairwise residue frequency profiles
//! * Substitution-matrix pseudocounts for the single profiles
//! * Mutual information with APC/ASC corrections and a mean contact potential
//!
//! The main entry point is the [`Alignment`] struct together with the [`MsaFeatures`]
//! trait, which runs the whole pipeline and returns an [`MsaFeatureSet`]. Every step is
//! also available as a free function operating on `ndarray` arrays.
//!
mod coupling;
mod encode;
mod error;
mod featurize;
mod info;
mod profile;
mod prior;
mod weights;

pub use self::coupling::{
    entropy_1d, entropy_2d, gap_matrix, mean_contact_potential, mutual_information,
    static_features, CouplingChannel,
};
pub use self::encode::{
    deletion_matrix, deletion_probability, encode_alignment, encode_alignment_with, encode_sequence,
    one_hot, sequence_identity, strip_insertions, MIN_IDENTITY_FRACTION,
};
pub use self::error::{MsaError, Result};
pub use self::featurize::{Alignment, AlignmentRecord, FeaturizerConfig, MsaFeatureSet, MsaFeatures};
pub use self::info::alphabet::{
    aa1_to_index, index_to_aa1, AminoAcid, ALPHABET_SIZE, GAP_INDEX, NON_GAP_SIZE, UNKNOWN_INDEX,
};
pub use self::info::tables::ReferenceTables;
pub use self::prior::{PriorConfig, ProfilePrior};
pub use self::profile::{profile, profile_2d, profile_no_gap};
pub use self::weights::{
    effective_depth, sequence_weights, sequence_weights_with, HAMMING_THRESHOLD,
};
