use serde::{
    Deserialize,
    Serialize,
};

use super::typedef::{
    BinType,
    PosType,
    SignalType,
};
use crate::error::{
    EnhstackError,
    Result,
};

/// Predicted signal, one non-negative scalar per bin.
///
/// A track is only constructed through [`Track::try_new`], which checks the
/// bin count against the construct length, so every `Track` in circulation
/// matches the construct it was predicted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    values:   Vec<SignalType>,
    bin_size: PosType,
}

impl Track {
    pub fn try_new(
        values: Vec<SignalType>,
        bin_size: PosType,
        target_length: PosType,
    ) -> Result<Self> {
        if bin_size == 0 || target_length % bin_size != 0 {
            return Err(EnhstackError::InvalidLength(format!(
                "Bin size {} does not divide construct length {}",
                bin_size, target_length
            )));
        }
        let expected = target_length / bin_size;
        if values.len() != expected {
            return Err(EnhstackError::InvalidLength(format!(
                "Track has {} bins, expected {} ({} bp / {} bp bins)",
                values.len(),
                expected,
                target_length,
                bin_size
            )));
        }
        if let Some((idx, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(EnhstackError::InvalidTrack(format!(
                "Bin {} holds {}, expected a finite non-negative value",
                idx, value
            )));
        }
        Ok(Self { values, bin_size })
    }

    pub fn values(&self) -> &[SignalType] { &self.values }

    pub fn bin_size(&self) -> PosType { self.bin_size }

    pub fn bin_count(&self) -> BinType { self.values.len() }

    /// Length in bp of the construct this track covers.
    pub fn target_length(&self) -> PosType { self.values.len() * self.bin_size }
}
