use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::descriptive::{
    summarize,
    ConditionSummary,
    QualityGrade,
};
use super::outcome::{
    CovariateTransform,
    EffectSize,
    TestOutcome,
    TrendRule,
    Verdict,
};
use crate::data_structs::{
    Metric,
    ReplicateGroup,
};
use crate::error::{
    EnhstackError,
    Result,
};
use crate::utils::{
    benjamini_hochberg,
    cohens_d,
    f_oneway,
    pearson_test,
    spearman_test,
    ttest_ind,
};
use crate::with_field_fn;

/// Which conditions form the "low" and "high" sides of the pairwise contrast.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Contrast {
    /// Lowest-covariate condition against the highest-covariate one.
    #[default]
    Extremes,
    /// Conditions selected by name; replicates are pooled per side.
    Named { low: Vec<String>, high: Vec<String> },
    /// Conditions with a covariate `<= threshold` against the rest.
    CovariateThreshold { threshold: f64 },
}

impl Contrast {
    fn split<'a>(
        &self,
        ordered: &[&'a ReplicateGroup],
    ) -> Result<(Vec<&'a ReplicateGroup>, Vec<&'a ReplicateGroup>)> {
        match self {
            Contrast::Extremes => {
                if ordered.len() < 2 {
                    return Ok((vec![], vec![]));
                }
                Ok((vec![ordered[0]], vec![ordered[ordered.len() - 1]]))
            },
            Contrast::Named { low, high } => {
                let select = |names: &[String]| {
                    names
                        .iter()
                        .map(|name| {
                            ordered
                                .iter()
                                .find(|g| g.condition().name() == name)
                                .copied()
                                .ok_or_else(|| {
                                    EnhstackError::InvalidInput(format!(
                                        "Contrast refers to unknown condition '{}'",
                                        name
                                    ))
                                })
                        })
                        .collect::<Result<Vec<_>>>()
                };
                Ok((select(low.as_slice())?, select(high.as_slice())?))
            },
            Contrast::CovariateThreshold { threshold } => {
                let (low, high): (Vec<_>, Vec<_>) =
                    ordered.iter().copied().partition(|g| {
                        g.condition()
                            .covariate()
                            .value()
                            .is_some_and(|v| v <= *threshold)
                    });
                Ok((low, high))
            },
        }
    }
}

/// Two-sample contrast between pooled condition sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastResult {
    pub low:      Vec<String>,
    pub high:     Vec<String>,
    /// Pooled-variance t-test of high against low.
    pub t_test:   TestOutcome,
    /// `None` when the pooled standard deviation is zero or undefined.
    pub cohens_d: Option<f64>,
    pub effect:   Option<EffectSize>,
}

/// t-test between two conditions adjacent in covariate order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseResult {
    pub first:      String,
    pub second:     String,
    pub test:       TestOutcome,
    /// Benjamini-Hochberg adjusted p-value across computed pairs.
    pub adjusted_p: Option<f64>,
}

/// Everything the comparator concluded about one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub metric:    Metric,
    pub alpha:     f64,
    pub summaries: Vec<ConditionSummary>,
    pub anova:     TestOutcome,
    pub spearman:  TestOutcome,
    pub pearson:   TestOutcome,
    pub contrast:  ContrastResult,
    pub pairwise:  Vec<PairwiseResult>,
    pub quality:   QualityGrade,
    pub verdict:   Verdict,
}

/// Cross-condition statistical comparator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparator {
    pub alpha:      f64,
    pub trend_rule: TrendRule,
    pub transform:  CovariateTransform,
    pub contrast:   Contrast,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            alpha:      0.05,
            trend_rule: TrendRule::default(),
            transform:  CovariateTransform::default(),
            contrast:   Contrast::default(),
        }
    }
}

/// Groups in covariate order, or input order if any condition lacks a numeric
/// covariate. Ties keep input order.
fn ordered_by_covariate(groups: &[ReplicateGroup]) -> Vec<&ReplicateGroup> {
    if groups
        .iter()
        .all(|g| g.condition().covariate().value().is_some())
    {
        groups
            .iter()
            .sorted_by(|a, b| {
                let a = a.condition().covariate().value().unwrap_or_default();
                let b = b.condition().covariate().value().unwrap_or_default();
                a.total_cmp(&b)
            })
            .collect()
    }
    else {
        groups.iter().collect()
    }
}

fn pooled(
    groups: &[&ReplicateGroup],
    metric: Metric,
) -> Vec<f64> {
    groups.iter().flat_map(|g| g.values(metric)).collect()
}

fn names(groups: &[&ReplicateGroup]) -> Vec<String> {
    groups
        .iter()
        .map(|g| g.condition().name().to_string())
        .collect()
}

impl Comparator {
    with_field_fn!(alpha, f64);

    with_field_fn!(trend_rule, TrendRule);

    with_field_fn!(transform, CovariateTransform);

    with_field_fn!(contrast, Contrast);

    /// Runs every test on `metric` of `groups` and classifies the result.
    ///
    /// # Errors
    ///
    /// Insufficient data never fails; it is reported as
    /// [`TestOutcome::NotApplicable`]. Non-finite measurements, contrasts
    /// naming unknown conditions and invalid covariate transforms fail with
    /// [`EnhstackError::InvalidInput`].
    pub fn compare(
        &self,
        groups: &[ReplicateGroup],
        metric: Metric,
    ) -> Result<ComparisonReport> {
        let summaries = summarize(groups);
        let anova = self.anova(groups, metric)?;
        let (spearman, pearson) = self.trend(&summaries, metric)?;
        let contrast = self.contrast(groups, metric)?;
        let pairwise = self.pairwise(groups, metric)?;
        let quality = QualityGrade::from_summaries(&summaries, metric);
        let verdict = verdict(
            &anova,
            &spearman,
            &pearson,
            contrast.effect,
            self.trend_rule,
            self.alpha,
        );
        info!(
            "Compared {} conditions on {}: {} (replicate quality {})",
            groups.len(),
            metric,
            verdict,
            quality
        );

        Ok(ComparisonReport {
            metric,
            alpha: self.alpha,
            summaries,
            anova,
            spearman,
            pearson,
            contrast,
            pairwise,
            quality,
            verdict,
        })
    }

    pub fn anova(
        &self,
        groups: &[ReplicateGroup],
        metric: Metric,
    ) -> Result<TestOutcome> {
        let values = groups.iter().map(|g| g.values(metric)).collect_vec();
        let slices = values.iter().map(Vec::as_slice).collect_vec();
        TestOutcome::from_result("one-way ANOVA", f_oneway(&slices))
    }

    /// Spearman and Pearson correlation between the covariate and the
    /// per-condition mean.
    pub fn trend(
        &self,
        summaries: &[ConditionSummary],
        metric: Metric,
    ) -> Result<(TestOutcome, TestOutcome)> {
        let mut covariates = Vec::with_capacity(summaries.len());
        let mut means = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let value = match summary.condition.covariate().value() {
                Some(value) => value,
                None => {
                    let reason = format!(
                        "condition '{}' has no numeric covariate",
                        summary.condition.name()
                    );
                    warn!("Trend tests not applicable: {}", reason);
                    return Ok((
                        TestOutcome::not_applicable(reason.clone()),
                        TestOutcome::not_applicable(reason),
                    ));
                },
            };
            if summary.n_replicates() == 0 {
                warn!(
                    "Condition '{}' has no replicates, left out of trend tests",
                    summary.condition.name()
                );
                continue;
            }
            covariates.push(value);
            means.push(summary.get(metric).mean);
        }

        let spearman = TestOutcome::from_result(
            "Spearman correlation",
            spearman_test(&covariates, &means),
        )?;
        let transformed = covariates
            .iter()
            .map(|v| self.transform.apply(*v))
            .collect::<Result<Vec<_>>>()?;
        let pearson = TestOutcome::from_result(
            "Pearson correlation",
            pearson_test(&transformed, &means),
        )?;
        debug!("Trend on {}: spearman {:?}, pearson {:?}", metric, spearman, pearson);
        Ok((spearman, pearson))
    }

    pub fn contrast(
        &self,
        groups: &[ReplicateGroup],
        metric: Metric,
    ) -> Result<ContrastResult> {
        let ordered = ordered_by_covariate(groups);
        let (low, high) = self.contrast.split(&ordered)?;
        let (low_values, high_values) = (pooled(&low, metric), pooled(&high, metric));

        let t_test = TestOutcome::from_result(
            "two-sample t-test",
            ttest_ind(&high_values, &low_values),
        )?;
        let cohens_d = match cohens_d(&low_values, &high_values) {
            Ok(d) => Some(d),
            Err(EnhstackError::InsufficientData { reason, .. }) => {
                warn!("Cohen's d undefined: {}", reason);
                None
            },
            Err(e) => return Err(e),
        };

        Ok(ContrastResult {
            low: names(&low),
            high: names(&high),
            t_test,
            cohens_d,
            effect: cohens_d.map(EffectSize::classify),
        })
    }

    /// t-tests between consecutive conditions in covariate order.
    pub fn pairwise(
        &self,
        groups: &[ReplicateGroup],
        metric: Metric,
    ) -> Result<Vec<PairwiseResult>> {
        let ordered = ordered_by_covariate(groups);
        let mut results = ordered
            .iter()
            .tuple_windows()
            .map(|(first, second)| -> Result<PairwiseResult> {
                let test = TestOutcome::from_result(
                    "pairwise t-test",
                    ttest_ind(&first.values(metric), &second.values(metric)),
                )?;
                Ok(PairwiseResult {
                    first: first.condition().name().to_string(),
                    second: second.condition().name().to_string(),
                    test,
                    adjusted_p: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let pvalues = results
            .iter()
            .filter_map(|r| r.test.p_value())
            .collect_vec();
        let mut adjusted = benjamini_hochberg(&pvalues).into_iter();
        for result in results.iter_mut().filter(|r| r.test.is_computed()) {
            result.adjusted_p = adjusted.next();
        }
        Ok(results)
    }
}

/// Decision rule of the comparison.
///
/// An effect is confirmed only when the trend test selected by `rule` is
/// significant and the effect size is at least small. A significant ANOVA
/// without a significant trend is reported as
/// [`Verdict::GroupsDifferNoTrend`].
pub fn verdict(
    anova: &TestOutcome,
    spearman: &TestOutcome,
    pearson: &TestOutcome,
    effect: Option<EffectSize>,
    rule: TrendRule,
    alpha: f64,
) -> Verdict {
    let trend_tests = match rule {
        TrendRule::Monotonic => vec![spearman],
        TrendRule::Linear => vec![pearson],
        TrendRule::Either => vec![spearman, pearson],
    };
    let trend_significant = trend_tests.iter().any(|t| t.is_significant(alpha));
    let trend_evaluated = trend_tests.iter().any(|t| t.is_computed());

    if trend_significant {
        match effect {
            Some(effect) if effect.is_meaningful() => {
                Verdict::EffectConfirmed { effect }
            },
            Some(_) => Verdict::TrendNegligibleEffect,
            None => Verdict::TrendEffectUndetermined,
        }
    }
    else if anova.is_significant(alpha) {
        Verdict::GroupsDifferNoTrend
    }
    else if !trend_evaluated {
        Verdict::InsufficientData
    }
    else {
        Verdict::NoEffect
    }
}

/// [`Comparator::compare`] with default settings.
pub fn compare(
    groups: &[ReplicateGroup],
    metric: Metric,
) -> Result<ComparisonReport> {
    Comparator::default().compare(groups, metric)
}
