//! Replicate aggregation and cross-condition statistics.
//!
//! [`summarize`] reduces each [`ReplicateGroup`](crate::data_structs::ReplicateGroup)
//! to per-metric mean, SEM and CV. The [`Comparator`] then runs one-way ANOVA
//! across conditions, Spearman and Pearson trend tests against the condition
//! covariate, a pooled two-sample contrast with Cohen's d and consecutive
//! pairwise t-tests, and reduces them to a [`Verdict`].
//!
//! Tests that lack the data they need are reported as
//! [`TestOutcome::NotApplicable`], never as non-significant.
//!
//! Two-element factorial designs are scored separately by
//! [`FactorialSignals`]: additivity and Bliss excess, and the fit of the
//! truth table to each [`LogicGate`].

mod additivity;
mod comparator;
mod descriptive;
mod outcome;


pub use additivity::{
    Additivity,
    FactorialSignals,
    Interaction,
    LogicGate,
    LogicScores,
};
pub use comparator::{
    compare,
    verdict,
    Comparator,
    ComparisonReport,
    Contrast,
    ContrastResult,
    PairwiseResult,
};
pub use descriptive::{
    summarize,
    ConditionSummary,
    DescriptiveStats,
    QualityGrade,
};
pub use outcome::{
    CovariateTransform,
    EffectSize,
    TestOutcome,
    TrendRule,
    Verdict,
};
