//! File input and output.
//!
//! - [`fasta`]: element libraries from FASTA, constructs to FASTA plus a JSON
//!   manifest.
//! - [`report`]: per-condition and per-test tables of a comparison as polars
//!   `DataFrame`s and CSV.
pub mod fasta;
pub mod report;
