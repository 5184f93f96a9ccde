//! Core data types of the crate.
//!
//! - [`element`]: named DNA building blocks ([`Element`]) and their immutable
//!   store ([`ElementLibrary`]).
//! - [`layout`]: placement instructions ([`Placement`], [`Layout`],
//!   [`LayoutBuilder`]) consumed by the assembler.
//! - [`construct`]: the assembled sequence and its coordinate [`Manifest`].
//! - [`region`]: named intervals used for metric extraction, either absolute
//!   or relative to a placement ([`RegionSpec`]).
//! - [`Track`]: the per-bin signal returned by the predictor.
//! - [`Measurement`], [`Condition`] and [`ReplicateGroup`]: inputs of the
//!   statistical comparator.
//! - [`typedef`]: coordinate and signal type aliases and default constants.

mod condition;
pub mod construct;
pub mod element;
mod enums;
pub mod layout;
mod measurement;
pub mod region;
mod track;
pub mod typedef;


pub use condition::{
    Condition,
    Covariate,
    ReplicateGroup,
};
pub use construct::{
    Construct,
    IntervalKind,
    Manifest,
    ManifestEntry,
};
pub use element::{
    Element,
    ElementLibrary,
};
pub use enums::{
    Metric,
    Orientation,
    TrackKind,
};
pub use layout::{
    Layout,
    LayoutBuilder,
    Placement,
};
pub use measurement::{
    Measurement,
    RegionFailure,
    RegionMetrics,
};
pub use region::{
    NamedRegionSpec,
    Region,
    RegionSpec,
};
pub use track::Track;
