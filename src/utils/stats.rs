use std::cmp::Ordering;

use adjustp::{
    adjust,
    Procedure,
};
use log::*;
use statrs::distribution::{
    ContinuousCDF,
    FisherSnedecor,
    StudentsT,
};
use statrs::statistics::Statistics;

use crate::error::{
    EnhstackError,
    Result,
};

fn check_finite(
    test: &str,
    values: &[f64],
) -> Result<()> {
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(EnhstackError::InvalidInput(format!(
            "{}: non-finite input value {}",
            test, v
        )));
    }
    Ok(())
}

fn check_min_len(
    test: &str,
    values: &[f64],
    min: usize,
) -> Result<()> {
    if values.len() < min {
        return Err(EnhstackError::insufficient(
            test,
            format!("{} values supplied, at least {} required", values.len(), min),
        ));
    }
    Ok(())
}

/// True when every value equals the first (an empty slice is constant).
pub fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Arithmetic mean, `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().mean()
}

/// Sample (n - 1) standard deviation, `NaN` when fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    values.iter().std_dev()
}

/// Pooled sample standard deviation of two groups.
pub fn pooled_std(
    a: &[f64],
    b: &[f64],
) -> Result<f64> {
    check_min_len("pooled standard deviation", a, 2)?;
    check_min_len("pooled standard deviation", b, 2)?;
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let var_a = a.iter().variance();
    let var_b = b.iter().variance();
    Ok((((na - 1.0) * var_a + (nb - 1.0) * var_b) / (na + nb - 2.0)).sqrt())
}

/// Ranks starting from 1, ties receive the average of their ranks.
pub fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|a, b| {
        values[*a]
            .partial_cmp(&values[*b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let start = i;
        let mut end = i + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // ranks are 1-indexed
        let avg_rank = (start as f64 + 1.0 + end as f64) / 2.0;
        for idx in &order[start..end] {
            ranks[*idx] = avg_rank;
        }
        i = end;
    }
    ranks
}

/// Calculates Pearson correlation coefficient between two variables.
///
/// Undefined (and reported as insufficient data) when either variable has
/// zero variance.
pub fn pearson_r(
    x: &[f64],
    y: &[f64],
) -> Result<f64> {
    if x.len() != y.len() {
        return Err(EnhstackError::InvalidInput(format!(
            "Cannot calculate Pearson's r: x length ({}) doesn't match y length \
             ({})",
            x.len(),
            y.len()
        )));
    }
    check_min_len("Pearson correlation", x, 2)?;
    check_finite("Pearson correlation", x)?;
    check_finite("Pearson correlation", y)?;
    if is_constant(x) || is_constant(y) {
        return Err(EnhstackError::insufficient(
            "Pearson correlation",
            "one of the variables has zero variance",
        ));
    }

    let x_mean = x.iter().mean();
    let y_mean = y.iter().mean();

    // Calculate numerator (covariance)
    let numerator = x
        .iter()
        .zip(y.iter())
        .map(|(valx, valy)| (valx - x_mean) * (valy - y_mean))
        .sum::<f64>();

    // Calculate denominator (product of standard deviations)
    let denominator = {
        let x_dev: f64 = x.iter().map(|valx| (valx - x_mean).powi(2)).sum();
        let y_dev: f64 = y.iter().map(|valy| (valy - y_mean).powi(2)).sum();
        (x_dev * y_dev).sqrt()
    };

    let r = (numerator / denominator).clamp(-1.0, 1.0);
    trace!("Pearson's r = {:.4}", r);
    Ok(r)
}

/// Two-sided p-value of a correlation coefficient from `n` pairs, using the
/// t distribution with `n - 2` degrees of freedom.
fn correlation_pvalue(
    r: f64,
    n: usize,
) -> Result<f64> {
    let df = (n - 2) as f64;
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| EnhstackError::InvalidInput(e.to_string()))?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Pearson correlation with its two-sided p-value. Requires 3 pairs.
pub fn pearson_test(
    x: &[f64],
    y: &[f64],
) -> Result<(f64, f64)> {
    check_min_len("Pearson correlation", x, 3)?;
    let r = pearson_r(x, y)?;
    let p = correlation_pvalue(r, x.len())?;
    debug!("Pearson correlation: r={:.4}, p={:.6}, n={}", r, p, x.len());
    Ok((r, p))
}

/// Spearman rank correlation with its two-sided p-value. Requires 3 pairs.
pub fn spearman_test(
    x: &[f64],
    y: &[f64],
) -> Result<(f64, f64)> {
    check_min_len("Spearman correlation", x, 3)?;
    check_finite("Spearman correlation", x)?;
    check_finite("Spearman correlation", y)?;
    let rho = pearson_r(&ranks(x), &ranks(y))?;
    let p = correlation_pvalue(rho, x.len())?;
    debug!("Spearman correlation: rho={:.4}, p={:.6}, n={}", rho, p, x.len());
    Ok((rho, p))
}

/// Two-sample Student's t-test with pooled variance.
///
/// Returns `(t, p)` for `group1 - group2`.
pub fn ttest_ind(
    group1: &[f64],
    group2: &[f64],
) -> Result<(f64, f64)> {
    check_min_len("two-sample t-test", group1, 2)?;
    check_min_len("two-sample t-test", group2, 2)?;
    check_finite("two-sample t-test", group1)?;
    check_finite("two-sample t-test", group2)?;
    if is_constant(group1) && is_constant(group2) {
        return Err(EnhstackError::insufficient(
            "two-sample t-test",
            "both groups have zero variance",
        ));
    }

    let (n1, n2) = (group1.len() as f64, group2.len() as f64);
    let sp = pooled_std(group1, group2)?;
    let t = (mean(group1) - mean(group2)) / (sp * (1.0 / n1 + 1.0 / n2).sqrt());
    let df = n1 + n2 - 2.0;
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| EnhstackError::InvalidInput(e.to_string()))?;
    let p = (2.0 * dist.sf(t.abs())).min(1.0);
    debug!("t-test: t={:.4}, p={:.6}, df={}", t, p, df);
    Ok((t, p))
}

/// One-way ANOVA across groups.
///
/// Requires at least two groups of at least two values each. When every group
/// has zero within-group variance the F statistic is undefined and the test
/// is reported as insufficient data rather than as an infinitely significant
/// result.
pub fn f_oneway(groups: &[&[f64]]) -> Result<(f64, f64)> {
    if groups.len() < 2 {
        return Err(EnhstackError::insufficient(
            "one-way ANOVA",
            format!("{} groups supplied, at least 2 required", groups.len()),
        ));
    }
    for group in groups {
        check_min_len("one-way ANOVA", group, 2)?;
        check_finite("one-way ANOVA", group)?;
    }
    if groups.iter().all(|g| is_constant(g)) {
        return Err(EnhstackError::insufficient(
            "one-way ANOVA",
            "zero within-group variance in every group",
        ));
    }

    let n_total = groups.iter().map(|g| g.len()).sum::<usize>() as f64;
    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n_total;

    let (ss_between, ss_within) =
        groups.iter().fold((0.0, 0.0), |(between, within), group| {
            let group_mean = mean(group);
            let between = between
                + group.len() as f64 * (group_mean - grand_mean).powi(2);
            let within = within
                + group
                    .iter()
                    .map(|v| (v - group_mean).powi(2))
                    .sum::<f64>();
            (between, within)
        });

    let df_between = (groups.len() - 1) as f64;
    let df_within = n_total - groups.len() as f64;
    let f = (ss_between / df_between) / (ss_within / df_within);
    let dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| EnhstackError::InvalidInput(e.to_string()))?;
    let p = dist.sf(f);
    debug!(
        "One-way ANOVA: F={:.4}, p={:.6}, df=({}, {})",
        f, p, df_between, df_within
    );
    Ok((f, p))
}

/// Cohen's d as `(mean(high) - mean(low)) / pooled_std`.
pub fn cohens_d(
    low: &[f64],
    high: &[f64],
) -> Result<f64> {
    check_finite("Cohen's d", low)?;
    check_finite("Cohen's d", high)?;
    let sp = pooled_std(low, high)?;
    if sp == 0.0 {
        return Err(EnhstackError::insufficient(
            "Cohen's d",
            "pooled standard deviation is zero",
        ));
    }
    Ok((mean(high) - mean(low)) / sp)
}

/// Benjamini-Hochberg adjusted p-values, in input order.
pub fn benjamini_hochberg(pvalues: &[f64]) -> Vec<f64> {
    if pvalues.is_empty() {
        return Vec::new();
    }
    if pvalues.iter().any(|p| !p.is_finite()) {
        warn!("Non-finite p-values passed to Benjamini-Hochberg adjustment");
    }
    adjust(pvalues, Procedure::BenjaminiHochberg)
}

/// Conventional significance marker of a p-value.
pub fn significance_stars(p: f64) -> &'static str {
    if p < 0.001 {
        "***"
    }
    else if p < 0.01 {
        "**"
    }
    else if p < 0.05 {
        "*"
    }
    else {
        "n.s."
    }
}
