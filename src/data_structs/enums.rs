use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::EnhstackError;

/// Orientation of an inserted element.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Default)]
pub enum Orientation {
    /// Element bytes as stored in the library.
    #[default]
    Forward,
    /// Reverse complement of the stored bytes.
    Reverse,
}

impl Orientation {
    pub fn flip(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        }
    }
}

impl Display for Orientation {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Orientation::Forward => write!(f, "+"),
            Orientation::Reverse => write!(f, "-"),
        }
    }
}

impl FromStr for Orientation {
    type Err = EnhstackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "+" | "forward" | "fwd" => Ok(Orientation::Forward),
            "-" | "reverse" | "rev" | "rc" => Ok(Orientation::Reverse),
            other => {
                Err(EnhstackError::InvalidInput(format!(
                    "Unknown orientation '{}'",
                    other
                )))
            },
        }
    }
}

impl Serialize for Orientation {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Orientation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Orientation::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Scalar metric of a [`Measurement`](super::Measurement).
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Max,
    Mean,
    Auc,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Max, Metric::Mean, Metric::Auc];
}

impl Display for Metric {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Metric::Max => write!(f, "max"),
            Metric::Mean => write!(f, "mean"),
            Metric::Auc => write!(f, "auc"),
        }
    }
}

impl FromStr for Metric {
    type Err = EnhstackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "max" => Ok(Metric::Max),
            "mean" => Ok(Metric::Mean),
            "auc" => Ok(Metric::Auc),
            other => {
                Err(EnhstackError::InvalidInput(format!(
                    "Unknown metric '{}'",
                    other
                )))
            },
        }
    }
}

/// Kind of track requested from the predictor.
#[derive(Eq, Hash, PartialEq, Clone, Debug, Serialize, Deserialize, Default)]
pub enum TrackKind {
    #[default]
    Dnase,
    Atac,
    Cage,
    RnaSeq,
    Other(String),
}

impl Display for TrackKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TrackKind::Dnase => write!(f, "DNASE"),
            TrackKind::Atac => write!(f, "ATAC"),
            TrackKind::Cage => write!(f, "CAGE"),
            TrackKind::RnaSeq => write!(f, "RNA_SEQ"),
            TrackKind::Other(name) => write!(f, "{}", name),
        }
    }
}
