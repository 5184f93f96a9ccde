use std::fmt::Display;

use log::warn;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    EnhstackError,
    Result,
};

/// Result of one inferential test.
///
/// Insufficient data is an explicit state and is never reported as a
/// non-significant result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Computed { statistic: f64, p_value: f64 },
    NotApplicable { reason: String },
}

impl TestOutcome {
    /// Converts the result of a statistical primitive.
    ///
    /// [`EnhstackError::InsufficientData`] becomes
    /// [`TestOutcome::NotApplicable`]; any other error is returned.
    pub fn from_result(
        test: &str,
        result: Result<(f64, f64)>,
    ) -> Result<Self> {
        match result {
            Ok((statistic, p_value)) => {
                Ok(TestOutcome::Computed {
                    statistic,
                    p_value,
                })
            },
            Err(EnhstackError::InsufficientData { reason, .. }) => {
                warn!("{} not applicable: {}", test, reason);
                Ok(TestOutcome::NotApplicable { reason })
            },
            Err(e) => Err(e),
        }
    }

    pub fn not_applicable(reason: impl Into<String>) -> Self {
        TestOutcome::NotApplicable {
            reason: reason.into(),
        }
    }

    pub fn statistic(&self) -> Option<f64> {
        match self {
            TestOutcome::Computed { statistic, .. } => Some(*statistic),
            TestOutcome::NotApplicable { .. } => None,
        }
    }

    pub fn p_value(&self) -> Option<f64> {
        match self {
            TestOutcome::Computed { p_value, .. } => Some(*p_value),
            TestOutcome::NotApplicable { .. } => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, TestOutcome::Computed { .. })
    }

    /// `p < alpha`. Not applicable tests are never significant.
    pub fn is_significant(
        &self,
        alpha: f64,
    ) -> bool {
        self.p_value().is_some_and(|p| p < alpha)
    }
}

/// Cohen's d magnitude classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EffectSize {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectSize {
    /// `|d| < 0.2` negligible, `< 0.5` small, `<= 0.8` medium, otherwise
    /// large.
    pub fn classify(d: f64) -> Self {
        let d = d.abs();
        if d < 0.2 {
            EffectSize::Negligible
        }
        else if d < 0.5 {
            EffectSize::Small
        }
        else if d <= 0.8 {
            EffectSize::Medium
        }
        else {
            EffectSize::Large
        }
    }

    pub fn is_meaningful(&self) -> bool { *self >= EffectSize::Small }
}

impl Display for EffectSize {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            EffectSize::Negligible => "negligible",
            EffectSize::Small => "small",
            EffectSize::Medium => "medium",
            EffectSize::Large => "large",
        };
        write!(f, "{}", s)
    }
}

/// Which correlation must be significant for a trend to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendRule {
    /// Spearman rank correlation.
    Monotonic,
    /// Pearson correlation.
    Linear,
    /// Either of the two.
    #[default]
    Either,
}

/// Transform applied to the covariate before the Pearson test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CovariateTransform {
    #[default]
    Identity,
    Log,
    Log10,
}

impl CovariateTransform {
    /// Fails with [`EnhstackError::InvalidInput`] for a logarithm of a
    /// non-positive value.
    pub fn apply(
        &self,
        value: f64,
    ) -> Result<f64> {
        let check = |v: f64| {
            if v > 0.0 {
                Ok(v)
            }
            else {
                Err(EnhstackError::InvalidInput(format!(
                    "Cannot take the logarithm of covariate {}",
                    v
                )))
            }
        };
        match self {
            CovariateTransform::Identity => Ok(value),
            CovariateTransform::Log => Ok(check(value)?.ln()),
            CovariateTransform::Log10 => Ok(check(value)?.log10()),
        }
    }
}

/// Final classification of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Neither the trend test nor the effect size could be evaluated.
    InsufficientData,
    /// No significant trend and no significant group difference.
    NoEffect,
    /// ANOVA is significant but the covariate trend is not.
    GroupsDifferNoTrend,
    /// Significant trend with a negligible effect size.
    TrendNegligibleEffect,
    /// Significant trend whose effect size is undefined.
    TrendEffectUndetermined,
    /// Significant trend with at least a small effect.
    EffectConfirmed { effect: EffectSize },
}

impl Verdict {
    pub fn is_effect(&self) -> bool { matches!(self, Verdict::EffectConfirmed { .. }) }
}

impl Display for Verdict {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Verdict::InsufficientData => write!(f, "insufficient data"),
            Verdict::NoEffect => write!(f, "no significant trend"),
            Verdict::GroupsDifferNoTrend => {
                write!(f, "groups differ but not correlated with the covariate")
            },
            Verdict::TrendNegligibleEffect => {
                write!(f, "significant trend, negligible effect")
            },
            Verdict::TrendEffectUndetermined => {
                write!(f, "significant trend, effect size undefined")
            },
            Verdict::EffectConfirmed { effect } => {
                write!(f, "significant trend, {} effect", effect)
            },
        }
    }
}
