//! Error taxonomy of the construct assembly and signal statistics core.
//!
//! Construction and extraction errors ([`EnhstackError::Layout`],
//! [`EnhstackError::InvalidLength`], [`EnhstackError::EmptyRegion`]) are fatal
//! to the single construct or measurement they concern. Statistical
//! insufficiency is reported as [`EnhstackError::InsufficientData`] by the
//! low-level primitives and surfaced by the comparator as an explicit
//! `NotApplicable` outcome instead.

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::data_structs::typedef::PosType;

pub type Result<T> = std::result::Result<T, EnhstackError>;

#[derive(Debug, Error)]
pub enum EnhstackError {
    /// Placements overlap, run past the construct, or cannot be tiled to the
    /// exact target length.
    #[error("Layout error: {0}")]
    Layout(String),

    /// Target length is not a positive power of two, or a track does not
    /// have the expected number of bins.
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// A region resolved to zero bins.
    #[error("Region '{region}' resolves to zero bins")]
    EmptyRegion { region: String },

    #[error("Insufficient data for {test}: {reason}")]
    InsufficientData { test: String, reason: String },

    #[error("Element '{0}' is not present in the element library")]
    UnknownElement(String),

    #[error("Invalid sequence for element '{name}': {reason}")]
    InvalidSequence { name: String, reason: String },

    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("Position {position} is outside of [0, {limit})")]
    OutOfRange { position: PosType, limit: PosType },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnhstackError {
    pub(crate) fn layout(msg: impl Into<String>) -> Self {
        EnhstackError::Layout(msg.into())
    }

    pub(crate) fn insufficient(
        test: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EnhstackError::InsufficientData {
            test:   test.into(),
            reason: reason.into(),
        }
    }

    /// Coarse failure category used in batch failure lists.
    pub fn kind(&self) -> FailureKind {
        match self {
            EnhstackError::Layout(_)
            | EnhstackError::UnknownElement(_)
            | EnhstackError::InvalidSequence { .. } => FailureKind::Layout,
            EnhstackError::InvalidLength(_) => FailureKind::InvalidLength,
            EnhstackError::EmptyRegion { .. } => FailureKind::EmptyRegion,
            EnhstackError::InsufficientData { .. } => FailureKind::InsufficientData,
            EnhstackError::InvalidTrack(_) => FailureKind::Prediction,
            _ => FailureKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    Layout,
    InvalidLength,
    EmptyRegion,
    InsufficientData,
    /// The external predictor failed or returned nothing usable.
    Prediction,
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            FailureKind::Layout => "LayoutError",
            FailureKind::InvalidLength => "InvalidLengthError",
            FailureKind::EmptyRegion => "EmptyRegionError",
            FailureKind::InsufficientData => "InsufficientDataError",
            FailureKind::Prediction => "PredictionError",
            FailureKind::Other => "Error",
        };
        write!(f, "{}", s)
    }
}
