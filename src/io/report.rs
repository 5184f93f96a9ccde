//! Tabular output of comparison results.
//!
//! A [`ComparisonReport`] is flattened into one [`SummaryRecord`] per
//! condition and one [`TestRecord`] per test, which can be collected into
//! polars [`DataFrame`]s and written as CSV.

use std::io::Write;

use log::debug;
use polars::df;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::tools::stats::{
    ComparisonReport,
    ConditionSummary,
    TestOutcome,
};
use crate::utils::significance_stars;

/// Descriptive statistics of one condition, all metrics side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub condition: String,
    pub covariate: Option<f64>,
    pub n:         u32,
    pub max_mean:  f64,
    pub max_sem:   f64,
    pub max_cv:    f64,
    pub mean_mean: f64,
    pub mean_sem:  f64,
    pub mean_cv:   f64,
    pub auc_mean:  f64,
    pub auc_sem:   f64,
    pub auc_cv:    f64,
}

impl From<&ConditionSummary> for SummaryRecord {
    fn from(summary: &ConditionSummary) -> Self {
        Self {
            condition: summary.condition.name().to_string(),
            covariate: summary.condition.covariate().value(),
            n:         summary.n_replicates() as u32,
            max_mean:  summary.max.mean,
            max_sem:   summary.max.sem,
            max_cv:    summary.max.cv,
            mean_mean: summary.mean.mean,
            mean_sem:  summary.mean.sem,
            mean_cv:   summary.mean.cv,
            auc_mean:  summary.auc.mean,
            auc_sem:   summary.auc.sem,
            auc_cv:    summary.auc.cv,
        }
    }
}

/// One inferential test. `classification` holds the significance stars, the
/// effect class, the verdict or the reason a test was not applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub metric:         String,
    pub test:           String,
    pub statistic:      Option<f64>,
    pub p_value:        Option<f64>,
    pub adjusted_p:     Option<f64>,
    pub effect_size:    Option<f64>,
    pub classification: String,
}

impl TestRecord {
    fn from_outcome(
        metric: &str,
        test: impl Into<String>,
        outcome: &TestOutcome,
    ) -> Self {
        let classification = match outcome {
            TestOutcome::Computed { p_value, .. } => {
                significance_stars(*p_value).to_string()
            },
            TestOutcome::NotApplicable { reason } => format!("not applicable: {}", reason),
        };
        Self {
            metric: metric.to_string(),
            test: test.into(),
            statistic: outcome.statistic(),
            p_value: outcome.p_value(),
            adjusted_p: None,
            effect_size: None,
            classification,
        }
    }
}

pub fn summary_records(report: &ComparisonReport) -> Vec<SummaryRecord> {
    report.summaries.iter().map(SummaryRecord::from).collect()
}

pub fn test_records(report: &ComparisonReport) -> Vec<TestRecord> {
    let metric = report.metric.to_string();
    let mut records = vec![
        TestRecord::from_outcome(&metric, "anova", &report.anova),
        TestRecord::from_outcome(&metric, "spearman", &report.spearman),
        TestRecord::from_outcome(&metric, "pearson", &report.pearson),
    ];

    let contrast = &report.contrast;
    let mut t_test = TestRecord::from_outcome(
        &metric,
        format!(
            "t_test {} vs {}",
            contrast.high.join("+"),
            contrast.low.join("+")
        ),
        &report.contrast.t_test,
    );
    t_test.effect_size = contrast.cohens_d;
    records.push(t_test);
    records.push(TestRecord {
        metric:         metric.clone(),
        test:           "cohens_d".to_string(),
        statistic:      contrast.cohens_d,
        p_value:        None,
        adjusted_p:     None,
        effect_size:    contrast.cohens_d,
        classification: contrast
            .effect
            .map(|e| e.to_string())
            .unwrap_or_else(|| "undefined".to_string()),
    });

    for pair in report.pairwise.iter() {
        let mut record = TestRecord::from_outcome(
            &metric,
            format!("pairwise {} vs {}", pair.first, pair.second),
            &pair.test,
        );
        record.adjusted_p = pair.adjusted_p;
        records.push(record);
    }

    records.push(TestRecord {
        metric:         metric.clone(),
        test:           "verdict".to_string(),
        statistic:      None,
        p_value:        None,
        adjusted_p:     None,
        effect_size:    contrast.cohens_d,
        classification: report.verdict.to_string(),
    });
    records
}

pub fn summaries_to_dataframe(records: &[SummaryRecord]) -> PolarsResult<DataFrame> {
    macro_rules! column {
        ($field:ident) => {
            records.iter().map(|r| r.$field.clone()).collect::<Vec<_>>()
        };
    }
    df!(
        "condition" => column!(condition),
        "covariate" => column!(covariate),
        "n" => column!(n),
        "max_mean" => column!(max_mean),
        "max_sem" => column!(max_sem),
        "max_cv" => column!(max_cv),
        "mean_mean" => column!(mean_mean),
        "mean_sem" => column!(mean_sem),
        "mean_cv" => column!(mean_cv),
        "auc_mean" => column!(auc_mean),
        "auc_sem" => column!(auc_sem),
        "auc_cv" => column!(auc_cv),
    )
}

pub fn tests_to_dataframe(records: &[TestRecord]) -> PolarsResult<DataFrame> {
    macro_rules! column {
        ($field:ident) => {
            records.iter().map(|r| r.$field.clone()).collect::<Vec<_>>()
        };
    }
    df!(
        "metric" => column!(metric),
        "test" => column!(test),
        "statistic" => column!(statistic),
        "p_value" => column!(p_value),
        "adjusted_p" => column!(adjusted_p),
        "effect_size" => column!(effect_size),
        "classification" => column!(classification),
    )
}

/// Writes `df` as comma separated values with a header row.
pub fn write_csv<W: Write>(
    df: &mut DataFrame,
    sink: W,
) -> PolarsResult<()> {
    debug!("Writing {} rows as CSV", df.height());
    CsvWriter::new(sink).include_header(true).finish(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structs::{
        Condition,
        Metric,
        ReplicateGroup,
    };
    use crate::tools::stats::compare;

    fn report() -> ComparisonReport {
        let groups = (1..=4u32)
            .map(|copies| {
                let m = 0.1 * copies as f64;
                ReplicateGroup::from_values(Condition::copy_number(copies), &[
                    m - 0.01,
                    m,
                    m + 0.01,
                ])
            })
            .collect::<Vec<_>>();
        compare(&groups, Metric::Max).unwrap()
    }

    #[test]
    fn summary_table() {
        let report = report();
        let records = summary_records(&report);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].condition, "1x");
        assert_eq!(records[0].covariate, Some(1.0));
        assert_eq!(records[0].n, 3);

        let df = summaries_to_dataframe(&records).unwrap();
        assert_eq!(df.shape(), (4, 12));
    }

    #[test]
    fn test_table_lists_every_test() {
        let report = report();
        let records = test_records(&report);
        // anova, spearman, pearson, t-test, cohen's d, 3 pairs, verdict
        assert_eq!(records.len(), 9);
        assert_eq!(records.last().unwrap().classification, report.verdict.to_string());
        assert!(records
            .iter()
            .filter(|r| r.test.starts_with("pairwise"))
            .all(|r| r.adjusted_p.is_some()));

        let df = tests_to_dataframe(&records).unwrap();
        assert_eq!(df.shape(), (9, 7));
    }

    #[test]
    fn csv_output() {
        let records = summary_records(&report());
        let mut df = summaries_to_dataframe(&records).unwrap();
        let mut buf = Vec::new();
        write_csv(&mut df, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("condition,covariate,n,max_mean"));
        assert_eq!(lines.count(), 4);
    }
}
