use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use super::enums::Metric;
use super::measurement::Measurement;
use super::typedef::PosType;

/// Controlled variable of a condition, typed so that trend tests never have
/// to parse it out of a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Covariate {
    /// Enhancer-promoter distance in bp.
    Distance(PosType),
    /// Number of tandem element copies.
    CopyNumber(u32),
    Ordinal(i64),
    Continuous(f64),
    /// Categorical condition without a numeric covariate.
    None,
}

impl Covariate {
    /// Numeric value used by correlation tests.
    pub fn value(&self) -> Option<f64> {
        match self {
            Covariate::Distance(bp) => Some(*bp as f64),
            Covariate::CopyNumber(n) => Some(*n as f64),
            Covariate::Ordinal(v) => Some(*v as f64),
            Covariate::Continuous(v) => Some(*v),
            Covariate::None => None,
        }
    }
}

impl Display for Covariate {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Covariate::Distance(bp) => write!(f, "distance={}bp", bp),
            Covariate::CopyNumber(n) => write!(f, "copies={}", n),
            Covariate::Ordinal(v) => write!(f, "ordinal={}", v),
            Covariate::Continuous(v) => write!(f, "value={}", v),
            Covariate::None => write!(f, "-"),
        }
    }
}

/// Named experimental group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    name:      String,
    covariate: Covariate,
}

impl Condition {
    pub fn new(
        name: impl Into<String>,
        covariate: Covariate,
    ) -> Self {
        Self {
            name: name.into(),
            covariate,
        }
    }

    pub fn distance(distance: PosType) -> Self {
        let name = if distance >= 1000 && distance % 1000 == 0 {
            format!("{}kb", distance / 1000)
        }
        else {
            format!("{}bp", distance)
        };
        Self::new(name, Covariate::Distance(distance))
    }

    pub fn copy_number(copies: u32) -> Self {
        Self::new(format!("{}x", copies), Covariate::CopyNumber(copies))
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn covariate(&self) -> Covariate { self.covariate }
}

impl Display for Condition {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.covariate)
    }
}

/// Replicate measurements sharing a condition, in replicate order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateGroup {
    condition:    Condition,
    measurements: Vec<Measurement>,
}

impl ReplicateGroup {
    pub fn new(
        condition: Condition,
        measurements: Vec<Measurement>,
    ) -> Self {
        Self {
            condition,
            measurements,
        }
    }

    /// Group holding a single scalar per replicate, stored as every metric.
    ///
    /// Convenient when only one metric was measured upstream.
    pub fn from_values(
        condition: Condition,
        values: &[f64],
    ) -> Self {
        let measurements = values
            .iter()
            .map(|v| Measurement::new(*v, *v, *v))
            .collect();
        Self::new(condition, measurements)
    }

    pub fn condition(&self) -> &Condition { &self.condition }

    pub fn measurements(&self) -> &[Measurement] { &self.measurements }

    pub fn push(
        &mut self,
        measurement: Measurement,
    ) {
        self.measurements.push(measurement);
    }

    pub fn n_replicates(&self) -> usize { self.measurements.len() }

    pub fn values(
        &self,
        metric: Metric,
    ) -> Vec<f64> {
        self.measurements.iter().map(|m| m.get(metric)).collect()
    }
}
