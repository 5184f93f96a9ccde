use std::ops::Range;

use log::trace;

use crate::data_structs::typedef::{
    BinType,
    PosType,
};
use crate::data_structs::Region;
use crate::error::{
    EnhstackError,
    Result,
};

/// `floor(position / bin_size)`.
///
/// # Panics
///
/// If `bin_size` is zero. [`BinMapper`] validates the bin size up front.
pub fn bp_to_bin(
    position: PosType,
    bin_size: PosType,
) -> BinType {
    position / bin_size
}

/// Base pairs `[start, end)` covered by a bin.
///
/// # Panics
///
/// On overflow of `(bin + 1) * bin_size`.
pub fn bin_to_bp_range(
    bin: BinType,
    bin_size: PosType,
) -> Range<PosType> {
    bin * bin_size..(bin + 1) * bin_size
}

/// Half-open bin interval covering the half-open bp interval `[start, end)`.
///
/// The start is rounded down and the end rounded up, so the bins never cover
/// less than the requested interval.
///
/// # Panics
///
/// If `bin_size` is zero.
pub fn bp_to_region_bins(
    start: PosType,
    end: PosType,
    bin_size: PosType,
) -> Range<BinType> {
    bp_to_bin(start, bin_size)..end.div_ceil(bin_size)
}

/// What to do with a position outside `[0, target_length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Map to the nearest valid bin.
    Clamp,
    /// Fail with [`EnhstackError::OutOfRange`].
    #[default]
    Fail,
}

/// Coordinate mapper for one construct length and track resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinMapper {
    bin_size:      PosType,
    target_length: PosType,
}

impl BinMapper {
    /// Fails with [`EnhstackError::InvalidLength`] unless `bin_size` is
    /// positive and divides `target_length`.
    pub fn new(
        bin_size: PosType,
        target_length: PosType,
    ) -> Result<Self> {
        if bin_size == 0 || target_length == 0 || target_length % bin_size != 0 {
            return Err(EnhstackError::InvalidLength(format!(
                "Bin size {} does not evenly divide construct length {}",
                bin_size, target_length
            )));
        }
        Ok(Self {
            bin_size,
            target_length,
        })
    }

    pub fn bin_size(&self) -> PosType { self.bin_size }

    pub fn target_length(&self) -> PosType { self.target_length }

    pub fn bin_count(&self) -> BinType { self.target_length / self.bin_size }

    pub fn bp_to_bin(
        &self,
        position: PosType,
        policy: BoundsPolicy,
    ) -> Result<BinType> {
        if position >= self.target_length {
            return match policy {
                BoundsPolicy::Clamp => Ok(self.bin_count() - 1),
                BoundsPolicy::Fail => {
                    Err(EnhstackError::OutOfRange {
                        position,
                        limit: self.target_length,
                    })
                },
            };
        }
        Ok(bp_to_bin(position, self.bin_size))
    }

    pub fn bin_to_bp_range(
        &self,
        bin: BinType,
    ) -> Result<Range<PosType>> {
        if bin >= self.bin_count() {
            return Err(EnhstackError::OutOfRange {
                position: bin,
                limit:    self.bin_count(),
            });
        }
        Ok(bin_to_bp_range(bin, self.bin_size))
    }

    /// Bins covering `region`, clamped to the track.
    pub fn bp_to_region_bins(
        &self,
        region: &Region,
    ) -> Range<BinType> {
        let bins = bp_to_region_bins(region.start(), region.end(), self.bin_size);
        let bins = bins.start.min(self.bin_count())..bins.end.min(self.bin_count());
        trace!("Region {} -> bins [{}, {})", region, bins.start, bins.end);
        bins
    }

    /// Bins of the whole construct.
    pub fn global_bins(&self) -> Range<BinType> { 0..self.bin_count() }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 8, 0)]
    #[case(7, 8, 0)]
    #[case(8, 8, 1)]
    #[case(400_000, 8, 50_000)]
    #[case(1_048_575, 8, 131_071)]
    #[case(5, 1, 5)]
    fn test_bp_to_bin(
        #[case] position: PosType,
        #[case] bin_size: PosType,
        #[case] expected: BinType,
    ) {
        assert_eq!(bp_to_bin(position, bin_size), expected);
    }

    #[test]
    fn bin_range_contains_position() {
        for bin_size in [1, 2, 8, 128] {
            for x in (0..4096).step_by(7) {
                assert!(bin_to_bp_range(bp_to_bin(x, bin_size), bin_size).contains(&x));
            }
        }
    }

    #[rstest]
    #[case(399_500, 401_500, 49_937..50_188)]
    #[case(0, 8, 0..1)]
    #[case(0, 9, 0..2)]
    #[case(15, 17, 1..3)]
    #[case(16, 16, 2..2)]
    fn region_bins_never_under_cover(
        #[case] start: PosType,
        #[case] end: PosType,
        #[case] expected: Range<BinType>,
    ) {
        let bins = bp_to_region_bins(start, end, 8);
        assert_eq!(bins, expected);
        if start < end {
            assert!(bins.start * 8 <= start);
            assert!(bins.end * 8 >= end);
        }
    }

    #[test]
    fn mapper_bounds_policy() {
        let mapper = BinMapper::new(8, 1024).unwrap();
        assert_eq!(mapper.bin_count(), 128);
        assert_eq!(mapper.bp_to_bin(1023, BoundsPolicy::Fail).unwrap(), 127);
        assert_eq!(mapper.bp_to_bin(5000, BoundsPolicy::Clamp).unwrap(), 127);
        assert!(matches!(
            mapper.bp_to_bin(1024, BoundsPolicy::Fail),
            Err(EnhstackError::OutOfRange { .. })
        ));
        assert_eq!(mapper.bin_to_bp_range(127).unwrap(), 1016..1024);
        assert!(mapper.bin_to_bp_range(128).is_err());
    }

    #[test]
    fn mapper_clamps_region_bins() {
        let mapper = BinMapper::new(8, 1024).unwrap();
        let region = Region::new("tail", 1000, 5000).unwrap();
        assert_eq!(mapper.bp_to_region_bins(&region), 125..128);
    }

    #[test]
    #[should_panic]
    fn zero_bin_size_panics_outside_mapper() {
        bp_to_region_bins(0, 16, 0);
    }

    #[rstest]
    #[case(0, 1024)]
    #[case(3, 1024)]
    #[case(8, 0)]
    fn mapper_rejects_bad_bin_size(
        #[case] bin_size: PosType,
        #[case] target: PosType,
    ) {
        assert!(matches!(
            BinMapper::new(bin_size, target),
            Err(EnhstackError::InvalidLength(_))
        ));
    }
}
