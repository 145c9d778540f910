use anyhow::{bail, Context, Result};
use ferritin_msa::AlignmentRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// An a3m / FASTA alignment reader.
///
/// `>` lines start a record, `#` lines and blank lines are skipped, and the
/// sequence lines of a record are joined. Lowercase insertion states are kept.
pub struct A3mReader<R> {
    inner: R,
    line: String,
    pending: Option<String>,
    line_number: usize,
}

impl<R> A3mReader<R> {
    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }
    /// Returns a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }
    /// Unwraps and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> A3mReader<R>
where
    R: BufRead,
{
    /// Creates an a3m reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
            pending: None,
            line_number: 0,
        }
    }

    /// Reads the next record, or `None` at end of input.
    pub fn read_record(&mut self) -> Result<Option<AlignmentRecord>> {
        let mut record: Option<AlignmentRecord> = self
            .pending
            .take()
            .map(|id| AlignmentRecord::new(id, String::new()));

        loop {
            self.line.clear();
            let n = self
                .inner
                .read_line(&mut self.line)
                .with_context(|| format!("reading line {}", self.line_number + 1))?;
            if n == 0 {
                return Ok(record);
            }
            self.line_number += 1;

            let line = self.line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('>') {
                let id = header.split_whitespace().next().unwrap_or_default().to_string();
                if let Some(done) = record.take() {
                    self.pending = Some(id);
                    return Ok(Some(done));
                }
                record = Some(AlignmentRecord::new(id, String::new()));
            } else {
                match record.as_mut() {
                    Some(current) => current
                        .sequence
                        .extend(line.chars().filter(|c| !c.is_whitespace())),
                    None => bail!(
                        "line {}: sequence data before the first '>' header",
                        self.line_number
                    ),
                }
            }
        }
    }

    /// Returns an iterator over records starting from the current stream position.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }
}

/// Iterator over the records of an [`A3mReader`].
pub struct Records<'a, R> {
    reader: &'a mut A3mReader<R>,
}

impl<R> Iterator for Records<'_, R>
where
    R: BufRead,
{
    type Item = Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Read every record of an a3m file.
pub fn read_a3m<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let records = A3mReader::new(BufReader::new(file))
        .records()
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("parsing {}", path.display()))?;
    log::debug!("read {} records from {}", records.len(), path.display());
    Ok(records)
}
