//! ferritin-test-data
//!
//! A module to provide test files embedded in the crate for use in testing.
//! Example alignments are included in the crate distribution for reference files.
//!
//! The test files are represented as `TestFile` objects which package the raw binary data
//! and create temporary files for programs to operate on.
use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use ferritin_test_data::TestFile;
/// let (msa_file, _temp) = TestFile::msa_01().create_temp().unwrap();
///
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// hhblits-style a3m: 10 records over a 30 residue query.
    /// Includes insertions, terminal gaps and one all-gap row.
    pub fn msa_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/msa/msa_01.a3m"),
            suffix: "a3m",
        }
    }
    /// Second record is one column short after removing insertions.
    pub fn msa_malformed() -> Self {
        Self {
            filebinary: include_bytes!("../data/msa/msa_malformed.a3m"),
            suffix: "a3m",
        }
    }

    pub fn as_str(&self) -> &'static str {
        std::str::from_utf8(self.filebinary).unwrap_or_default()
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }
}
