use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::{
    Condition,
    Metric,
    ReplicateGroup,
};
use crate::utils::{
    mean,
    sample_std,
};

/// Replicate statistics of one metric in one condition.
///
/// `sd`, `sem` and `cv` are `NaN` with fewer than two replicates, and `cv` is
/// `NaN` when the mean is zero. They are never reported as zero in those
/// cases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub n:    usize,
    pub mean: f64,
    pub sd:   f64,
    pub sem:  f64,
    /// Coefficient of variation, in percent.
    pub cv:   f64,
}

impl DescriptiveStats {
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        let mean = mean(values);
        let sd = sample_std(values);
        let sem = sd / (n as f64).sqrt();
        let cv = if mean == 0.0 {
            f64::NAN
        }
        else {
            100.0 * sd / mean
        };
        Self {
            n,
            mean,
            sd,
            sem,
            cv,
        }
    }
}

/// Descriptive statistics of every metric of one replicate group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub condition: Condition,
    pub max:       DescriptiveStats,
    pub mean:      DescriptiveStats,
    pub auc:       DescriptiveStats,
}

impl ConditionSummary {
    pub fn from_group(group: &ReplicateGroup) -> Self {
        Self {
            condition: group.condition().clone(),
            max:       DescriptiveStats::from_values(&group.values(Metric::Max)),
            mean:      DescriptiveStats::from_values(&group.values(Metric::Mean)),
            auc:       DescriptiveStats::from_values(&group.values(Metric::Auc)),
        }
    }

    pub fn n_replicates(&self) -> usize { self.max.n }

    pub fn get(
        &self,
        metric: Metric,
    ) -> &DescriptiveStats {
        match metric {
            Metric::Max => &self.max,
            Metric::Mean => &self.mean,
            Metric::Auc => &self.auc,
        }
    }
}

pub fn summarize(groups: &[ReplicateGroup]) -> Vec<ConditionSummary> {
    groups.iter().map(ConditionSummary::from_group).collect()
}

/// Replicate consistency judged from the mean CV across conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityGrade {
    Excellent,
    Good,
    Acceptable,
    Poor,
    /// At least one condition has an undefined CV.
    Undetermined,
}

impl QualityGrade {
    pub fn from_mean_cv(cv: f64) -> Self {
        match cv {
            cv if cv.is_nan() => QualityGrade::Undetermined,
            cv if cv < 5.0 => QualityGrade::Excellent,
            cv if cv < 10.0 => QualityGrade::Good,
            cv if cv < 15.0 => QualityGrade::Acceptable,
            _ => QualityGrade::Poor,
        }
    }

    pub fn from_summaries(
        summaries: &[ConditionSummary],
        metric: Metric,
    ) -> Self {
        let cvs = summaries
            .iter()
            .map(|s| s.get(metric).cv)
            .collect::<Vec<_>>();
        Self::from_mean_cv(mean(&cvs))
    }
}

impl Display for QualityGrade {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            QualityGrade::Excellent => "excellent",
            QualityGrade::Good => "good",
            QualityGrade::Acceptable => "acceptable",
            QualityGrade::Poor => "poor",
            QualityGrade::Undetermined => "undetermined",
        };
        write!(f, "{}", s)
    }
}
