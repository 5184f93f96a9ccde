use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    EnhstackError,
    Result,
};

/// Interaction class of two elements from their additivity ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    /// Ratio above 1.1.
    Synergy,
    /// Ratio in `(0.9, 1.1]`.
    Additive,
    Interference,
    /// The ratio is undefined.
    Undetermined,
}

impl Interaction {
    pub fn classify(ratio: f64) -> Self {
        if ratio.is_nan() {
            Interaction::Undetermined
        }
        else if ratio > 1.1 {
            Interaction::Synergy
        }
        else if ratio > 0.9 {
            Interaction::Additive
        }
        else {
            Interaction::Interference
        }
    }
}

impl Display for Interaction {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            Interaction::Synergy => "synergy",
            Interaction::Additive => "additive",
            Interaction::Interference => "interference",
            Interaction::Undetermined => "undetermined",
        };
        write!(f, "{}", s)
    }
}

/// Two-input gate whose truth table a factorial design is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicGate {
    And,
    Or,
    /// Output follows the inverse of input B.
    Not,
    Xor,
}

impl LogicGate {
    pub const ALL: [LogicGate; 4] =
        [LogicGate::And, LogicGate::Or, LogicGate::Not, LogicGate::Xor];

    /// Ideal output in truth-table order `00, 01, 10, 11` (A, B).
    pub fn pattern(&self) -> [f64; 4] {
        match self {
            LogicGate::And => [0.0, 0.0, 0.0, 1.0],
            LogicGate::Or => [0.0, 1.0, 1.0, 1.0],
            LogicGate::Not => [1.0, 0.0, 1.0, 0.0],
            LogicGate::Xor => [0.0, 1.0, 1.0, 0.0],
        }
    }

    /// R² of `normalized` against the ideal pattern, clipped at 0. A flat
    /// input scores 0 for every gate.
    pub fn score(
        &self,
        normalized: &[f64; 4],
    ) -> f64 {
        let mean = normalized.iter().sum::<f64>() / 4.0;
        let ss_tot = normalized.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        if ss_tot < FLAT_TOLERANCE {
            return 0.0;
        }
        let ss_res = normalized
            .iter()
            .zip(self.pattern())
            .map(|(v, ideal)| (v - ideal).powi(2))
            .sum::<f64>();
        (1.0 - ss_res / ss_tot).max(0.0)
    }
}

impl Display for LogicGate {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            LogicGate::And => "AND",
            LogicGate::Or => "OR",
            LogicGate::Not => "NOT",
            LogicGate::Xor => "XOR",
        };
        write!(f, "{}", s)
    }
}

const FLAT_TOLERANCE: f64 = 1e-6;

/// Fit of a factorial design to every [`LogicGate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicScores {
    /// Signals in truth-table order, scaled so the baseline is 0 and the
    /// maximum is 1. All zero when the signals span less than `1e-6`.
    pub normalized: [f64; 4],
    /// R² per gate, in [`LogicGate::ALL`] order.
    pub scores:     Vec<(LogicGate, f64)>,
    /// Highest scoring gate; ties go to the earlier gate in
    /// [`LogicGate::ALL`].
    pub best:       LogicGate,
    pub best_score: f64,
    /// Margin of the best score over the runner-up.
    pub confidence: f64,
}

impl LogicScores {
    pub fn get(
        &self,
        gate: LogicGate,
    ) -> f64 {
        self.scores
            .iter()
            .find(|(g, _)| *g == gate)
            .map(|(_, score)| *score)
            .unwrap_or(0.0)
    }
}

/// Signals of a two-factor design: neither element, each alone, and both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorialSignals {
    pub baseline: f64,
    pub a_only:   f64,
    pub b_only:   f64,
    pub combined: f64,
}

/// Cooperativity metrics of a two-factor design.
///
/// Undefined values are `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Additivity {
    /// `combined / (a + b)`, undefined unless `a + b > 0`.
    pub ratio:           f64,
    /// `combined - max(a, b)`.
    pub excess_over_max: f64,
    /// `combined - a * b / baseline` (`a * b` for a zero baseline), undefined
    /// unless both single signals are positive.
    pub bliss_excess:    f64,
    pub interaction:     Interaction,
}

impl FactorialSignals {
    pub fn new(
        baseline: f64,
        a_only: f64,
        b_only: f64,
        combined: f64,
    ) -> Self {
        Self {
            baseline,
            a_only,
            b_only,
            combined,
        }
    }

    /// Signals in truth-table order `00, 01, 10, 11`, where the second digit
    /// is element B.
    pub fn truth_table(&self) -> [f64; 4] {
        [self.baseline, self.b_only, self.a_only, self.combined]
    }

    fn check_finite(&self) -> Result<()> {
        let values = self.truth_table();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EnhstackError::InvalidInput(format!(
                "Non-finite signal in factorial analysis: {:?}",
                values
            )));
        }
        Ok(())
    }

    /// Baseline-anchored `[0, 1]` scaling of [`Self::truth_table`].
    pub fn normalized(&self) -> [f64; 4] {
        let values = self.truth_table();
        let min = values[0];
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max - min < FLAT_TOLERANCE {
            return [0.0; 4];
        }
        values.map(|v| (v - min) / (max - min))
    }

    /// Scores the design against every [`LogicGate`].
    ///
    /// Fails with [`EnhstackError::InvalidInput`] on non-finite signals.
    pub fn logic_scores(&self) -> Result<LogicScores> {
        self.check_finite()?;
        let normalized = self.normalized();
        let scores = LogicGate::ALL
            .iter()
            .map(|gate| (*gate, gate.score(&normalized)))
            .collect::<Vec<_>>();

        let (best, best_score) = scores
            .iter()
            .copied()
            .fold((LogicGate::ALL[0], f64::NEG_INFINITY), |acc, (gate, score)| {
                if score > acc.1 {
                    (gate, score)
                }
                else {
                    acc
                }
            });
        let runner_up = scores
            .iter()
            .filter(|(gate, _)| *gate != best)
            .map(|(_, score)| *score)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(LogicScores {
            normalized,
            best,
            best_score,
            confidence: best_score - runner_up,
            scores,
        })
    }

    /// Fails with [`EnhstackError::InvalidInput`] on non-finite signals.
    pub fn additivity(&self) -> Result<Additivity> {
        self.check_finite()?;
        let (a, b) = (self.a_only, self.b_only);

        let expected = a + b;
        let ratio = if expected > 0.0 {
            self.combined / expected
        }
        else {
            f64::NAN
        };
        let bliss_excess = if a > 0.0 && b > 0.0 {
            let expected = if self.baseline > 0.0 {
                a * b / self.baseline
            }
            else {
                a * b
            };
            self.combined - expected
        }
        else {
            f64::NAN
        };

        Ok(Additivity {
            ratio,
            excess_over_max: self.combined - a.max(b),
            bliss_excess,
            interaction: Interaction::classify(ratio),
        })
    }
}
