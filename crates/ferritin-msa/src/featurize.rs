//! MSA Featurizer
//!
//! Extract alignment features for contact and structure models.
//!
//! Returns a set of features calculated from a parsed alignment including:
//! - Query encodings: one-hot and per-column insertion frequency
//! - Alignment statistics: sequence matrix, redundancy weights, depth
//! - Profiles: single-column (raw and with pseudocounts) and column-pair frequencies
//! - Couplings: mutual information and its corrections, gap co-occurrence, contact potential
use crate::coupling::{gap_matrix, mean_contact_potential, mutual_information, static_features};
use crate::encode::{deletion_probability, encode_alignment_with, one_hot};
use crate::error::{MsaError, Result};
use crate::info::alphabet::{ALPHABET_SIZE, NON_GAP_SIZE};
use crate::info::tables::ReferenceTables;
use crate::prior::{PriorConfig, ProfilePrior};
use crate::profile::{profile, profile_2d, profile_no_gap};
use crate::weights::{sequence_weights_with, HAMMING_THRESHOLD};
use ndarray::{Array, Array1, Array2, Array3, Array4, ArrayD, Dimension};
use ndarray_safetensors::TensorViewWithDataBuffer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One aligned sequence as delivered by an alignment parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub id: String,
    pub sequence: String,
}

impl AlignmentRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }
}

/// A query sequence and its aligned homologs. The first record is the query itself.
#[derive(Debug, Clone)]
pub struct Alignment {
    query: String,
    records: Vec<AlignmentRecord>,
}

impl Alignment {
    pub fn new(query: impl Into<String>, records: Vec<AlignmentRecord>) -> Self {
        Self {
            query: query.into(),
            records,
        }
    }

    /// Use the first record as the query.
    pub fn from_records(records: Vec<AlignmentRecord>) -> Result<Self> {
        let query = records
            .first()
            .map(|r| r.sequence.clone())
            .ok_or_else(|| MsaError::InvalidInput("alignment has no records".to_string()))?;
        Ok(Self { query, records })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    pub fn sequences(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.sequence.as_str()).collect()
    }

    pub fn depth(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturizerConfig {
    /// drop rows with almost no identity to the query
    pub filter: bool,
    pub identity_fraction: f64,
    pub hamming_threshold: f64,
    /// build profiles over 22 symbols (gap included) or 21
    pub include_gaps: bool,
    pub prior: PriorConfig,
}

impl Default for FeaturizerConfig {
    fn default() -> Self {
        Self {
            filter: true,
            identity_fraction: crate::encode::MIN_IDENTITY_FRACTION,
            hamming_threshold: HAMMING_THRESHOLD,
            include_gaps: true,
            prior: PriorConfig::default(),
        }
    }
}

impl FeaturizerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct MsaFeatureSet {
    /// encoded alignment `[depth, length]`
    pub sequence_matrix: Array2<u8>,
    /// redundancy weight per retained row `[depth]`
    pub weights: Array1<f64>,
    /// query one-hot `[length, 22]`
    pub one_hot: Array2<f64>,
    /// insertion frequency before each column `[length, 1]`
    pub deletion_probability: Array2<f64>,
    /// weighted residue frequencies `[length, R]`
    pub profile: Array2<f64>,
    /// frequencies with substitution pseudocounts `[length, R]`
    pub profile_prior: Array2<f64>,
    /// residue pair frequencies `[length, length, R, R]`
    pub profile_2d: Array4<f64>,
    /// `[MI, MIr, MIp, MIa]` per column pair `[length, length, 4]`
    pub mutual_information: Array3<f64>,
    /// `[index, length, depth, effective depth]` per column `[length, 4]`
    pub static_features: Array2<f64>,
    /// gap co-occurrence `[length, length]`
    pub gap_matrix: Array2<f64>,
    /// mean contact potential `[length, length, 1]`
    pub contact_potential: Array3<f64>,
}

fn to_f32_view<D: Dimension>(arr: &Array<f64, D>) -> TensorViewWithDataBuffer {
    let arr: ArrayD<f32> = arr.mapv(|v| v as f32).into_dyn();
    TensorViewWithDataBuffer::new(&arr)
}

impl MsaFeatureSet {
    pub fn length(&self) -> usize {
        self.sequence_matrix.ncols()
    }

    pub fn depth(&self) -> usize {
        self.sequence_matrix.nrows()
    }

    pub fn effective_depth(&self) -> f64 {
        self.weights.sum()
    }

    /// Serialize every feature as an f32 safetensors buffer.
    pub fn to_safetensors(&self) -> Result<Vec<u8>> {
        let sequence_matrix = self.sequence_matrix.mapv(f64::from);
        let data = vec![
            ("sequence_matrix", to_f32_view(&sequence_matrix)),
            ("weights", to_f32_view(&self.weights)),
            ("one_hot", to_f32_view(&self.one_hot)),
            ("deletion_probability", to_f32_view(&self.deletion_probability)),
            ("profile", to_f32_view(&self.profile)),
            ("profile_prior", to_f32_view(&self.profile_prior)),
            ("profile_2d", to_f32_view(&self.profile_2d)),
            ("mutual_information", to_f32_view(&self.mutual_information)),
            ("static_features", to_f32_view(&self.static_features)),
            ("gap_matrix", to_f32_view(&self.gap_matrix)),
            ("contact_potential", to_f32_view(&self.contact_potential)),
        ];
        Ok(safetensors::serialize(data, &None)?)
    }

    pub fn save_to_safetensors<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_safetensors()?)?;
        Ok(())
    }
}

/// Convert an alignment into the arrays consumed by a model.
pub trait MsaFeatures {
    type Error;

    /// Numeric alignment; filtered per `config`
    fn sequence_matrix(&self, config: &FeaturizerConfig) -> std::result::Result<Array2<u8>, Self::Error>;

    /// One-hot encoding of the query
    fn query_one_hot(&self) -> std::result::Result<Array2<f64>, Self::Error>;

    /// Insertion frequency per query column
    fn deletion_probability(&self) -> std::result::Result<Array2<f64>, Self::Error>;

    /// Run the complete feature pipeline
    fn featurize(
        &self,
        tables: &ReferenceTables,
        config: &FeaturizerConfig,
    ) -> std::result::Result<MsaFeatureSet, Self::Error>;
}

impl MsaFeatures for Alignment {
    type Error = MsaError;

    fn sequence_matrix(&self, config: &FeaturizerConfig) -> Result<Array2<u8>> {
        let fraction = config.filter.then_some(config.identity_fraction);
        encode_alignment_with(&self.query, &self.sequences(), fraction)
    }

    fn query_one_hot(&self) -> Result<Array2<f64>> {
        one_hot(&self.query)
    }

    fn deletion_probability(&self) -> Result<Array2<f64>> {
        deletion_probability(&self.sequences())
    }

    fn featurize(&self, tables: &ReferenceTables, config: &FeaturizerConfig) -> Result<MsaFeatureSet> {
        let sequence_matrix = self.sequence_matrix(config)?;
        log::info!(
            "featurizing alignment: {} of {} rows retained, length {}",
            sequence_matrix.nrows(),
            self.depth(),
            sequence_matrix.ncols()
        );
        let weights = sequence_weights_with(&sequence_matrix, config.hamming_threshold)?;
        log::debug!("effective depth {:.2}", weights.sum());

        let (profile, width) = if config.include_gaps {
            (profile(&sequence_matrix, Some(&weights))?, ALPHABET_SIZE)
        } else {
            (profile_no_gap(&sequence_matrix)?, NON_GAP_SIZE)
        };
        let prior = ProfilePrior::new(tables, width, &config.prior)?;
        let profile_prior = prior.regularize(&profile)?;
        let profile_2d = profile_2d(&sequence_matrix, &weights, &profile_prior)?;
        let mutual_information = mutual_information(&profile_prior, &profile_2d)?;
        let contact_potential = mean_contact_potential(&profile_2d, tables)?;

        Ok(MsaFeatureSet {
            one_hot: self.query_one_hot()?,
            deletion_probability: self.deletion_probability()?,
            static_features: static_features(&sequence_matrix, &weights)?,
            gap_matrix: gap_matrix(&sequence_matrix)?,
            sequence_matrix,
            weights,
            profile,
            profile_prior,
            profile_2d,
            mutual_information,
            contact_potential,
        })
    }
}
