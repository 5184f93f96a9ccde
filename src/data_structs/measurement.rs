use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

use super::enums::Metric;
use super::typedef::SignalType;
use crate::error::FailureKind;

/// Metrics of one track over one region.
///
/// `auc` is a trapezoidal sum with unit bin spacing, i.e. it is expressed in
/// signal x bins, not signal x bp. Values from tracks with different bin
/// sizes are not directly comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub max:  SignalType,
    pub mean: SignalType,
    pub auc:  SignalType,
}

impl Measurement {
    pub fn new(
        max: SignalType,
        mean: SignalType,
        auc: SignalType,
    ) -> Self {
        Self { max, mean, auc }
    }

    pub fn get(
        &self,
        metric: Metric,
    ) -> SignalType {
        match metric {
            Metric::Max => self.max,
            Metric::Mean => self.mean,
            Metric::Auc => self.auc,
        }
    }
}

/// A region whose measurement could not be taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFailure {
    pub region:  String,
    pub kind:    FailureKind,
    pub message: String,
}

/// Per-region measurements of one construct plus its whole-track metrics.
///
/// A region that fails to resolve or covers no bins is listed in
/// [`RegionMetrics::failures`] and does not affect the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    pub(crate) regions:    IndexMap<String, Measurement>,
    pub(crate) global:     Measurement,
    /// Population standard deviation of the whole track.
    pub(crate) global_std: SignalType,
    pub(crate) failures:   Vec<RegionFailure>,
}

impl RegionMetrics {
    pub fn get(
        &self,
        region: &str,
    ) -> Option<&Measurement> {
        self.regions.get(region)
    }

    pub fn regions(&self) -> &IndexMap<String, Measurement> { &self.regions }

    pub fn global(&self) -> &Measurement { &self.global }

    pub fn global_mean(&self) -> SignalType { self.global.mean }

    pub fn global_max(&self) -> SignalType { self.global.max }

    pub fn global_std(&self) -> SignalType { self.global_std }

    pub fn failures(&self) -> &[RegionFailure] { &self.failures }
}
