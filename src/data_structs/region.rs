use std::fmt::Display;
use std::ops::Range;

use log::trace;
use serde::{
    Deserialize,
    Serialize,
};

use super::construct::Manifest;
use super::typedef::PosType;
use crate::error::{
    EnhstackError,
    Result,
};

/// Named half-open bp interval `[start, end)` of a construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    name:  String,
    start: PosType,
    end:   PosType,
}

impl Region {
    /// Creates a new `Region`. `start` must not exceed `end`.
    pub fn new(
        name: impl Into<String>,
        start: PosType,
        end: PosType,
    ) -> Result<Self> {
        let name = name.into();
        if start > end {
            return Err(EnhstackError::InvalidInput(format!(
                "Region '{}' starts after it ends ({} > {})",
                name, start, end
            )));
        }
        Ok(Self { name, start, end })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn start(&self) -> PosType { self.start }

    pub fn end(&self) -> PosType { self.end }

    pub fn length(&self) -> PosType { self.end - self.start }

    pub fn is_empty(&self) -> bool { self.start == self.end }

    pub fn range(&self) -> Range<PosType> { self.start..self.end }

    pub fn contains(
        &self,
        position: PosType,
    ) -> bool {
        self.range().contains(&position)
    }
}

impl Display for Region {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}:[{}, {})", self.name, self.start, self.end)
    }
}

/// How a region is positioned within a construct.
///
/// Placement-relative variants refer to placements by label and are resolved
/// against a [`Manifest`]. Windows reaching past the construct are clamped to
/// `[0, target_length)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionSpec {
    Absolute {
        start: PosType,
        end:   PosType,
    },
    /// Placement interval padded by `flank` bp on both sides.
    AroundPlacement {
        label: String,
        flank: PosType,
    },
    /// `half_width` bp on each side of the placement center.
    CenteredOnPlacement {
        label:      String,
        half_width: PosType,
    },
    /// From the end of `upstream` to the start of `downstream`.
    BetweenPlacements {
        upstream:   String,
        downstream: String,
    },
    /// The whole construct.
    Global,
}

impl RegionSpec {
    pub fn resolve(
        &self,
        name: &str,
        manifest: &Manifest,
    ) -> Result<Region> {
        let limit = manifest.target_length();
        let (start, end) = match self {
            RegionSpec::Absolute { start, end } => (*start, *end),
            RegionSpec::AroundPlacement { label, flank } => {
                let entry = manifest.find(label)?;
                (
                    entry.start.saturating_sub(*flank),
                    entry.end.saturating_add(*flank),
                )
            },
            RegionSpec::CenteredOnPlacement { label, half_width } => {
                let center = manifest.find(label)?.center();
                (
                    center.saturating_sub(*half_width),
                    center.saturating_add(*half_width),
                )
            },
            RegionSpec::BetweenPlacements {
                upstream,
                downstream,
            } => {
                let up = manifest.find(upstream)?;
                let down = manifest.find(downstream)?;
                if up.end > down.start {
                    return Err(EnhstackError::InvalidInput(format!(
                        "Placement '{}' does not end before '{}' starts",
                        upstream, downstream
                    )));
                }
                (up.end, down.start)
            },
            RegionSpec::Global => (0, limit),
        };
        let (start, end) = (start.min(limit), end.min(limit));
        trace!("Resolved region '{}' to [{}, {})", name, start, end);
        Region::new(name, start, end)
    }
}

/// A region specification with the name its metrics are reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRegionSpec {
    pub name: String,
    pub spec: RegionSpec,
}

impl NamedRegionSpec {
    pub fn new(
        name: impl Into<String>,
        spec: RegionSpec,
    ) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }

    pub fn resolve(
        &self,
        manifest: &Manifest,
    ) -> Result<Region> {
        self.spec.resolve(&self.name, manifest)
    }
}
