//! Batch orchestration: assemble, predict, measure.
//!
//! Every [`ConstructJob`] is processed independently on the crate thread pool
//! ([`THREAD_POOL`]). A job that fails at any step is recorded as a
//! [`BatchFailure`] tagged with its [`FailureKind`] and never aborts the rest
//! of the batch. Results are returned as an explicit [`BatchResult`]; no state
//! is kept between runs.

mod config;

use std::sync::Arc;

use indexmap::IndexMap;
use log::{
    debug,
    info,
    warn,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

pub use config::ExperimentConfig;

use crate::data_structs::typedef::SignalType;
use crate::data_structs::{
    Condition,
    ElementLibrary,
    Layout,
    Manifest,
    Metric,
    NamedRegionSpec,
    RegionMetrics,
    ReplicateGroup,
    Track,
    TrackKind,
};
use crate::error::{
    EnhstackError,
    FailureKind,
};
use crate::getter_fn;
use crate::tools::assembly::assemble;
use crate::tools::metrics::extract_regions;
use crate::tools::stats::ComparisonReport;
use crate::utils::{
    n_threads,
    THREAD_POOL,
};

/// The external sequence-to-signal model.
///
/// Returns one value per bin of the submitted sequence. Closures with the
/// same signature implement it.
pub trait Predictor: Sync {
    fn predict(
        &self,
        sequence: &[u8],
        track_kind: &TrackKind,
        context: &str,
    ) -> anyhow::Result<Vec<SignalType>>;
}

impl<F> Predictor for F
where
    F: Fn(&[u8], &TrackKind, &str) -> anyhow::Result<Vec<SignalType>> + Sync,
{
    fn predict(
        &self,
        sequence: &[u8],
        track_kind: &TrackKind,
        context: &str,
    ) -> anyhow::Result<Vec<SignalType>> {
        self(sequence, track_kind, context)
    }
}

/// One construct to build and measure.
#[derive(Debug, Clone)]
pub struct ConstructJob {
    pub name:      String,
    pub condition: Condition,
    pub replicate: usize,
    pub layout:    Layout,
    pub library:   Arc<ElementLibrary>,
}

impl ConstructJob {
    pub fn new(
        name: impl Into<String>,
        condition: Condition,
        replicate: usize,
        layout: Layout,
        library: Arc<ElementLibrary>,
    ) -> Self {
        Self {
            name: name.into(),
            condition,
            replicate,
            layout,
            library,
        }
    }
}

/// A successfully measured construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructRecord {
    name:      String,
    condition: Condition,
    replicate: usize,
    manifest:  Manifest,
    metrics:   RegionMetrics,
}

impl ConstructRecord {
    getter_fn!(name, String);

    getter_fn!(condition, Condition);

    getter_fn!(manifest, Manifest);

    getter_fn!(metrics, RegionMetrics);

    pub fn replicate(&self) -> usize { self.replicate }
}

/// A construct that could not be built or measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub name:      String,
    pub condition: String,
    pub replicate: usize,
    pub kind:      FailureKind,
    pub message:   String,
}

impl BatchFailure {
    fn new(
        job: &ConstructJob,
        kind: FailureKind,
        message: String,
    ) -> Self {
        warn!("Construct '{}' failed ({}): {}", job.name, kind, message);
        Self {
            name: job.name.clone(),
            condition: job.condition.name().to_string(),
            replicate: job.replicate,
            kind,
            message,
        }
    }

    fn from_error(
        job: &ConstructJob,
        err: EnhstackError,
    ) -> Self {
        Self::new(job, err.kind(), err.to_string())
    }
}

/// Outcome of [`run_batch`], in job order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub records:  Vec<ConstructRecord>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn n_succeeded(&self) -> usize { self.records.len() }

    pub fn n_failed(&self) -> usize { self.failures.len() }

    /// Measurements of `region` grouped by condition, conditions in order of
    /// first appearance and replicates in replicate order.
    ///
    /// Constructs on which `region` could not be measured are left out.
    pub fn replicate_groups(
        &self,
        region: &str,
    ) -> Vec<ReplicateGroup> {
        let mut groups: IndexMap<&str, Vec<&ConstructRecord>> = IndexMap::new();
        for record in &self.records {
            groups
                .entry(record.condition.name())
                .or_default()
                .push(record);
        }

        groups
            .into_values()
            .map(|mut records| {
                records.sort_by_key(|r| r.replicate);
                let condition = records[0].condition.clone();
                let measurements = records
                    .iter()
                    .filter_map(|r| {
                        let measurement = r.metrics.get(region).copied();
                        if measurement.is_none() {
                            debug!("Region '{}' missing for construct '{}'", region, r.name);
                        }
                        measurement
                    })
                    .collect();
                ReplicateGroup::new(condition, measurements)
            })
            .collect()
    }

    /// Compares conditions on `metric` of `region` using the settings of
    /// `config`.
    pub fn compare(
        &self,
        region: &str,
        metric: Metric,
        config: &ExperimentConfig,
    ) -> crate::error::Result<ComparisonReport> {
        config
            .comparator()
            .compare(&self.replicate_groups(region), metric)
    }
}

fn process_job<P: Predictor>(
    job: &ConstructJob,
    predictor: &P,
    regions: &[NamedRegionSpec],
    config: &ExperimentConfig,
) -> Result<ConstructRecord, BatchFailure> {
    let construct = assemble(&job.layout, &job.library, config.target_length)
        .map_err(|e| BatchFailure::from_error(job, e))?
        .with_name(job.name.clone());

    let values = predictor
        .predict(construct.sequence(), &config.track_kind, &config.context)
        .map_err(|e| BatchFailure::new(job, FailureKind::Prediction, format!("{:#}", e)))?;
    let track = Track::try_new(values, config.bin_size, config.target_length)
        .map_err(|e| BatchFailure::from_error(job, e))?;
    let metrics = extract_regions(&track, construct.manifest(), regions)
        .map_err(|e| BatchFailure::from_error(job, e))?;

    debug!(
        "Construct '{}' ({}, replicate {}): {} regions measured",
        job.name,
        job.condition.name(),
        job.replicate,
        metrics.regions().len()
    );
    Ok(ConstructRecord {
        name: job.name.clone(),
        condition: job.condition.clone(),
        replicate: job.replicate,
        manifest: construct.manifest().clone(),
        metrics,
    })
}

/// Processes every job in parallel.
///
/// # Errors
///
/// Fails only if `config` is invalid. Per-construct failures are collected in
/// [`BatchResult::failures`].
pub fn run_batch<P: Predictor>(
    jobs: &[ConstructJob],
    predictor: &P,
    regions: &[NamedRegionSpec],
    config: &ExperimentConfig,
) -> anyhow::Result<BatchResult> {
    config.validate()?;
    info!(
        "Running batch of {} constructs on {} threads",
        jobs.len(),
        n_threads()
    );

    let outcomes = THREAD_POOL.install(|| {
        jobs.par_iter()
            .map(|job| process_job(job, predictor, regions, config))
            .collect::<Vec<_>>()
    });

    let mut result = BatchResult::default();
    for outcome in outcomes {
        match outcome {
            Ok(record) => result.records.push(record),
            Err(failure) => result.failures.push(failure),
        }
    }
    info!(
        "Batch finished: {} succeeded, {} failed",
        result.n_succeeded(),
        result.n_failed()
    );
    Ok(result)
}
