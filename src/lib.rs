//! # enhstack
//!
//! `enhstack` assembles fixed-length synthetic DNA constructs from named
//! elements (filler, enhancer copies, promoters) and turns the signal tracks
//! an external sequence-to-signal model predicts for them into region metrics
//! and cross-condition statistical verdicts.
//!
//! ## Key Features
//!
//! * **Exact assembly**: [`assemble`] produces a sequence of exactly the
//!   target length (a power of two) with a [`Manifest`] that partitions the
//!   construct into placed and filler intervals. Overlapping placements are
//!   rejected, reverse orientations are reverse-complemented.
//! * **Region metrics**: bp regions are mapped onto track bins and reduced to
//!   max, mean and trapezoidal AUC ([`extract_regions`]).
//! * **Replicate statistics**: per-condition mean, SEM and CV, one-way ANOVA,
//!   Spearman and Pearson trend tests against a typed covariate, Cohen's d
//!   and Benjamini-Hochberg adjusted pairwise t-tests. The [`Verdict`] keeps
//!   "groups differ" and "significant trend with negligible effect" apart
//!   from a confirmed effect.
//! * **Batch runs**: [`run_batch`] processes constructs in parallel with Rayon
//!   and collects per-construct failures instead of aborting.
//!
//! The number of batch worker threads can be configured with the
//! `ENHSTACK_NUM_THREADS` environment variable.
//!
//! ## Structure
//!
//! * [`data_structs`]: elements, layouts, constructs, regions, tracks,
//!   measurements and conditions.
//! * [`tools`]: the assembler, the coordinate mapper and metrics extractor,
//!   and the statistical comparator.
//! * [`pipeline`]: the predictor boundary, experiment configuration and
//!   batch runs.
//! * [`io`]: FASTA input and output and tabular reports.
//! * [`utils`]: statistical primitives, the thread pool and helper macros.
//!
//! ## Usage
//!
//! ```no_run
//! use enhstack::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let library = enhstack::io::fasta::read_library("elements.fa")?;
//!     let layout = Layout::distance_series(
//!         library.get("enhancer")?,
//!         library.get("promoter")?,
//!         50_000,
//!         DEFAULT_TARGET_LENGTH,
//!     )?;
//!     let construct = assemble(&layout, &library, DEFAULT_TARGET_LENGTH)?;
//!     println!("{}", construct.manifest().to_json()?);
//!     Ok(())
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod data_structs;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod prelude;
pub mod tools;
pub mod utils;

pub use crate::data_structs::{
    Condition,
    Construct,
    Covariate,
    Element,
    ElementLibrary,
    Layout,
    LayoutBuilder,
    Manifest,
    Measurement,
    Metric,
    NamedRegionSpec,
    Orientation,
    Placement,
    Region,
    RegionMetrics,
    RegionSpec,
    ReplicateGroup,
    Track,
    TrackKind,
};
pub use crate::error::{
    EnhstackError,
    FailureKind,
    Result,
};
pub use crate::pipeline::{
    run_batch,
    BatchResult,
    ConstructJob,
    ExperimentConfig,
    Predictor,
};
pub use crate::tools::assembly::assemble;
pub use crate::tools::metrics::{
    extract,
    extract_regions,
    BinMapper,
};
pub use crate::tools::stats::{
    compare,
    Comparator,
    ComparisonReport,
    TestOutcome,
    Verdict,
};
