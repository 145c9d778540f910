//! ferritin-io
//!
//! Readers for the alignment formats consumed by `ferritin-msa`.
mod a3m;

pub use a3m::{read_a3m, A3mReader, Records};
