use std::ops::Range;

use serde::{
    Deserialize,
    Serialize,
};

use super::enums::Orientation;
use super::typedef::PosType;
use crate::error::{
    EnhstackError,
    Result,
};

/// What occupies one manifest interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntervalKind {
    Placement {
        /// Index of the placement in the layout it came from.
        index:        usize,
        element_name: String,
        label:        String,
        orientation:  Orientation,
        repeat_count: usize,
        unit_length:  PosType,
    },
    Filler {
        element_name: String,
    },
}

/// Resolved half-open interval `[start, end)` of a construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub start: PosType,
    pub end:   PosType,
    #[serde(flatten)]
    pub kind:  IntervalKind,
}

impl ManifestEntry {
    pub fn len(&self) -> PosType { self.end - self.start }

    pub fn is_empty(&self) -> bool { self.start == self.end }

    pub fn range(&self) -> Range<PosType> { self.start..self.end }

    pub fn is_filler(&self) -> bool {
        matches!(self.kind, IntervalKind::Filler { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            IntervalKind::Placement { label, .. } => Some(label),
            IntervalKind::Filler { .. } => None,
        }
    }

    /// Center position, rounded down.
    pub fn center(&self) -> PosType { (self.start + self.end) / 2 }
}

/// Coordinate bookkeeping of an assembled construct.
///
/// Entries are sorted by start and partition `[0, target_length)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub(crate) target_length: PosType,
    pub(crate) entries:       Vec<ManifestEntry>,
}

impl Manifest {
    pub fn target_length(&self) -> PosType { self.target_length }

    pub fn entries(&self) -> &[ManifestEntry] { &self.entries }

    pub fn placements(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(|e| !e.is_filler())
    }

    pub fn fillers(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(|e| e.is_filler())
    }

    /// Finds the placement with the given label.
    pub fn find(
        &self,
        label: &str,
    ) -> Result<&ManifestEntry> {
        self.placements()
            .find(|e| e.label() == Some(label))
            .ok_or_else(|| {
                EnhstackError::InvalidInput(format!(
                    "No placement labelled '{}' in manifest",
                    label
                ))
            })
    }

    /// Checks that entries are sorted, contiguous and cover the whole
    /// construct.
    pub fn is_partition(&self) -> bool {
        let mut cursor = 0;
        for entry in &self.entries {
            if entry.start != cursor || entry.end <= entry.start {
                return false;
            }
            cursor = entry.end;
        }
        cursor == self.target_length
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Assembled fixed-length sequence and its manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Construct {
    pub(crate) name:     String,
    pub(crate) sequence: Vec<u8>,
    pub(crate) manifest: Manifest,
}

impl Construct {
    pub fn name(&self) -> &str { &self.name }

    pub fn with_name(
        mut self,
        name: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self
    }

    pub fn sequence(&self) -> &[u8] { &self.sequence }

    pub fn manifest(&self) -> &Manifest { &self.manifest }

    pub fn len(&self) -> PosType { self.sequence.len() }

    pub fn is_empty(&self) -> bool { self.sequence.is_empty() }

    /// Resolved interval of a labelled placement.
    pub fn element_interval(
        &self,
        label: &str,
    ) -> Result<Range<PosType>> {
        self.manifest.find(label).map(ManifestEntry::range)
    }

    /// Bytes at a resolved interval.
    pub fn slice(
        &self,
        range: Range<PosType>,
    ) -> &[u8] {
        &self.sequence[range]
    }
}
