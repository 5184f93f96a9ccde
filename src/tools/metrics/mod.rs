//! Coordinate mapping and signal metrics.
//!
//! Predicted tracks are binned: bin `i` covers base pairs
//! `[i * bin_size, (i + 1) * bin_size)`. A bp region is converted to the
//! smallest bin interval covering it ([`bp_to_region_bins`]) and measured with
//! [`extract`]: the maximum, the mean and the trapezoidal area under the
//! curve of the bin values.

mod binning;
mod extract;

pub use binning::{
    bin_to_bp_range,
    bp_to_bin,
    bp_to_region_bins,
    BinMapper,
    BoundsPolicy,
};
pub use extract::{
    extract,
    extract_global,
    extract_region,
    extract_regions,
    trapezoid_auc,
};
