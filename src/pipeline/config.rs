use std::io::Read;

use anyhow::Context;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::layout::DEFAULT_FILLER_NAME;
use crate::data_structs::typedef::{
    PosType,
    DEFAULT_BIN_SIZE,
    DEFAULT_TARGET_LENGTH,
};
use crate::data_structs::{
    Layout,
    Placement,
    TrackKind,
};
use crate::error::{
    EnhstackError,
    Result,
};
use crate::tools::assembly::check_target_length;
use crate::tools::metrics::BinMapper;
use crate::tools::stats::{
    Comparator,
    Contrast,
    CovariateTransform,
    TrendRule,
};
use crate::with_field_fn;

/// Settings shared by every construct of one experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub target_length:       PosType,
    pub bin_size:            PosType,
    pub alpha:               f64,
    pub trend_rule:          TrendRule,
    pub covariate_transform: CovariateTransform,
    pub contrast:            Contrast,
    pub filler:              String,
    pub track_kind:          TrackKind,
    /// Passed to the predictor with every sequence, e.g. a cell type.
    pub context:             String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            target_length:       DEFAULT_TARGET_LENGTH,
            bin_size:            DEFAULT_BIN_SIZE,
            alpha:               0.05,
            trend_rule:          TrendRule::Either,
            covariate_transform: CovariateTransform::Identity,
            contrast:            Contrast::Extremes,
            filler:              DEFAULT_FILLER_NAME.to_string(),
            track_kind:          TrackKind::Dnase,
            context:             String::new(),
        }
    }
}

impl ExperimentConfig {
    with_field_fn!(target_length, PosType);

    with_field_fn!(bin_size, PosType);

    with_field_fn!(alpha, f64);

    with_field_fn!(trend_rule, TrendRule);

    with_field_fn!(covariate_transform, CovariateTransform);

    with_field_fn!(contrast, Contrast);

    with_field_fn!(filler, String);

    with_field_fn!(track_kind, TrackKind);

    with_field_fn!(context, String);

    pub fn validate(&self) -> Result<()> {
        check_target_length(self.target_length)?;
        BinMapper::new(self.bin_size, self.target_length)?;
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(EnhstackError::InvalidInput(format!(
                "Significance level {} is not in (0, 1)",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Reads a JSON config. Missing fields take their default values.
    pub fn from_json_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let config: Self =
            serde_json::from_reader(reader).context("Failed to parse experiment config")?;
        config.validate().context("Invalid experiment config")?;
        Ok(config)
    }

    pub fn bin_count(&self) -> usize { self.target_length / self.bin_size }

    pub fn mapper(&self) -> Result<BinMapper> {
        BinMapper::new(self.bin_size, self.target_length)
    }

    /// Layout using the configured filler element.
    pub fn layout(
        &self,
        placements: Vec<Placement>,
    ) -> Layout {
        Layout::new(placements).with_filler(self.filler.clone())
    }

    pub fn comparator(&self) -> Comparator {
        Comparator::default()
            .with_alpha(self.alpha)
            .with_trend_rule(self.trend_rule)
            .with_transform(self.covariate_transform)
            .with_contrast(self.contrast.clone())
    }
}
