pub mod msa;
pub mod tables;
