use std::ops::Range;

use indexmap::IndexMap;
use log::{
    debug,
    warn,
};
use statrs::statistics::Statistics;

use super::binning::BinMapper;
use crate::data_structs::typedef::{
    BinType,
    SignalType,
};
use crate::data_structs::{
    Manifest,
    Measurement,
    NamedRegionSpec,
    Region,
    RegionFailure,
    RegionMetrics,
    Track,
};
use crate::error::{
    EnhstackError,
    Result,
};

/// Trapezoidal area with unit spacing. A single value has zero area.
pub fn trapezoid_auc(values: &[SignalType]) -> SignalType {
    values
        .windows(2)
        .map(|w| (w[0] + w[1]) / 2.0)
        .sum()
}

/// Max, mean and trapezoidal AUC over the bins `[bins.start, bins.end)`.
///
/// # Errors
///
/// - [`EnhstackError::EmptyRegion`] if the interval has no bins.
/// - [`EnhstackError::OutOfRange`] if it ends past the last bin.
pub fn extract(
    track: &Track,
    bins: Range<BinType>,
) -> Result<Measurement> {
    if bins.start >= bins.end {
        return Err(EnhstackError::EmptyRegion {
            region: format!("bins [{}, {})", bins.start, bins.end),
        });
    }
    if bins.end > track.bin_count() {
        return Err(EnhstackError::OutOfRange {
            position: bins.end,
            limit:    track.bin_count(),
        });
    }
    let values = &track.values()[bins];
    let max = values
        .iter()
        .copied()
        .fold(SignalType::NEG_INFINITY, SignalType::max);
    let mean = values.iter().sum::<SignalType>() / values.len() as SignalType;
    Ok(Measurement::new(max, mean, trapezoid_auc(values)))
}

/// Metrics over the whole track.
pub fn extract_global(track: &Track) -> Result<Measurement> {
    extract(track, 0..track.bin_count())
}

/// Metrics of `track` over a bp region, mapped to bins with `mapper`.
pub fn extract_region(
    track: &Track,
    region: &Region,
    mapper: &BinMapper,
) -> Result<Measurement> {
    let bins = mapper.bp_to_region_bins(region);
    extract(track, bins).map_err(|err| {
        match err {
            EnhstackError::EmptyRegion { .. } => {
                EnhstackError::EmptyRegion {
                    region: region.to_string(),
                }
            },
            other => other,
        }
    })
}

/// Resolves every region against `manifest` and measures it on `track`.
///
/// Regions fail independently: a region that cannot be resolved or is empty
/// is recorded in [`RegionMetrics::failures`].
///
/// # Errors
///
/// [`EnhstackError::InvalidLength`] if the track does not cover the manifest's
/// construct length.
pub fn extract_regions(
    track: &Track,
    manifest: &Manifest,
    regions: &[NamedRegionSpec],
) -> Result<RegionMetrics> {
    if track.target_length() != manifest.target_length() {
        return Err(EnhstackError::InvalidLength(format!(
            "Track covers {} bp but the construct is {} bp",
            track.target_length(),
            manifest.target_length()
        )));
    }
    let mapper = BinMapper::new(track.bin_size(), manifest.target_length())?;

    let mut measured = IndexMap::with_capacity(regions.len());
    let mut failures = Vec::new();
    for named in regions {
        let result = named
            .resolve(manifest)
            .and_then(|region| extract_region(track, &region, &mapper));
        match result {
            Ok(measurement) => {
                measured.insert(named.name.clone(), measurement);
            },
            Err(err) => {
                warn!("Region '{}' not measured: {}", named.name, err);
                failures.push(RegionFailure {
                    region:  named.name.clone(),
                    kind:    err.kind(),
                    message: err.to_string(),
                });
            },
        }
    }
    let global = extract_global(track)?;
    let global_std = track.values().iter().population_std_dev();
    debug!(
        "Measured {} regions ({} failed), global mean {:.4}",
        measured.len(),
        failures.len(),
        global.mean
    );

    Ok(RegionMetrics {
        regions: measured,
        global,
        global_std,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::*;
    use crate::data_structs::{
        Element,
        ElementLibrary,
        Layout,
        Metric,
        Placement,
        RegionSpec,
    };
    use crate::error::FailureKind;
    use crate::tools::assembly::assemble;

    fn track(values: Vec<SignalType>) -> Track {
        let len = values.len();
        Track::try_new(values, 1, len).unwrap()
    }

    #[test]
    fn single_bin_region() {
        let t = track(vec![0.0, 2.5, 1.0, 0.0]);
        let m = extract(&t, 1..2).unwrap();
        assert_eq!(m, Measurement::new(2.5, 2.5, 0.0));
    }

    #[test]
    fn basic_metrics() {
        let t = track(vec![1.0, 3.0, 2.0, 4.0]);
        let m = extract(&t, 0..4).unwrap();
        assert_approx_eq!(m.max, 4.0);
        assert_approx_eq!(m.mean, 2.5);
        // 2 + 2.5 + 3
        assert_approx_eq!(m.auc, 7.5);
        assert_eq!(extract_global(&t).unwrap(), m);
    }

    #[test]
    fn empty_and_out_of_range_bins() {
        let t = track(vec![1.0; 8]);
        assert!(matches!(
            extract(&t, 3..3),
            Err(EnhstackError::EmptyRegion { .. })
        ));
        assert!(matches!(
            extract(&t, 4..9),
            Err(EnhstackError::OutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(0..16, 2..6)]
    #[case(4..12, 5..11)]
    #[case(0..16, 0..1)]
    fn max_and_auc_are_monotonic(
        #[case] outer: Range<BinType>,
        #[case] inner: Range<BinType>,
    ) {
        let t = track(vec![
            0.1, 0.5, 0.3, 0.9, 0.0, 1.2, 0.4, 0.4, 0.8, 0.2, 0.0, 0.6, 0.7, 0.3, 0.1, 0.5,
        ]);
        let outer = extract(&t, outer).unwrap();
        let inner = extract(&t, inner).unwrap();
        assert!(outer.max >= inner.max);
        assert!(outer.auc >= inner.auc);
    }

    #[test]
    fn doubling_signal_doubles_metrics() {
        let values = vec![0.0, 0.3, 0.7, 0.2, 0.9, 0.1, 0.4, 0.5];
        let doubled = values.iter().map(|v| v * 2.0).collect();
        let a = extract_global(&track(values)).unwrap();
        let b = extract_global(&track(doubled)).unwrap();
        for metric in Metric::ALL {
            assert_approx_eq!(b.get(metric), 2.0 * a.get(metric));
        }
    }

    #[rstest]
    #[case(2)]
    #[case(4)]
    #[case(16)]
    #[case(256)]
    fn doubling_region_width_doubles_auc(#[case] n: BinType) {
        let t = track(vec![0.5; 2 * n]);
        let single = extract(&t, 0..n).unwrap();
        let double = extract(&t, 0..2 * n).unwrap();

        let ratio = double.auc / single.auc;
        assert_approx_eq!(ratio, (2 * n - 1) as f64 / (n - 1) as f64);
        assert_approx_eq!(ratio - 2.0, 1.0 / (n - 1) as f64);
        assert_eq!(double.max, single.max);
        assert_approx_eq!(double.mean, single.mean);
    }

    #[test]
    fn extraction_is_idempotent() {
        let t = track(vec![0.2, 0.4, 0.1, 0.0]);
        assert_eq!(extract(&t, 1..4).unwrap(), extract(&t, 1..4).unwrap());
    }

    fn enhancer_construct() -> (Manifest, Track) {
        let target = 1 << 20;
        let library = ElementLibrary::try_from_elements(vec![
            Element::new("filler", b"ACGTTGCA").unwrap(),
            Element::new("enhancer", "ACGT".repeat(250)).unwrap(),
        ])
        .unwrap();
        let layout = Layout::new(vec![Placement::new("enhancer", 400_000)]);
        let construct = assemble(&layout, &library, target).unwrap();

        // Enhancer covers bins 50000..50125 at bin size 8
        let values = (0..target / 8)
            .map(|bin| {
                if (50_000..50_125).contains(&bin) {
                    0.3
                }
                else {
                    0.1
                }
            })
            .collect();
        let track = Track::try_new(values, 8, target).unwrap();
        (construct.manifest().clone(), track)
    }

    #[test]
    fn enhancer_region_end_to_end() {
        let (manifest, track) = enhancer_construct();
        let regions = vec![
            NamedRegionSpec::new("window", RegionSpec::Absolute {
                start: 399_500,
                end:   401_500,
            }),
            NamedRegionSpec::new("flanked", RegionSpec::AroundPlacement {
                label: "enhancer".into(),
                flank: 500,
            }),
        ];
        let metrics = extract_regions(&track, &manifest, &regions).unwrap();
        assert!(metrics.failures().is_empty());

        let window = metrics.get("window").unwrap();
        assert_approx_eq!(window.max, 0.3);
        assert_approx_eq!(window.auc, 50.0, 0.2);
        assert!(window.mean > 0.1 && window.mean < 0.3);
        assert_eq!(metrics.get("flanked").unwrap(), window);

        assert!(metrics.global_mean() < window.mean);
        assert_approx_eq!(metrics.global_max(), 0.3);
        // 125 of 131072 bins at 0.3, the rest at 0.1
        let frac: SignalType = 125.0 / 131_072.0;
        assert_approx_eq!(
            metrics.global_std(),
            0.2 * (frac * (1.0 - frac)).sqrt(),
            1e-9
        );
    }

    #[test]
    fn failing_region_does_not_affect_others() {
        let (manifest, track) = enhancer_construct();
        let regions = vec![
            NamedRegionSpec::new("empty", RegionSpec::Absolute {
                start: 100,
                end:   100,
            }),
            NamedRegionSpec::new("missing", RegionSpec::AroundPlacement {
                label: "promoter".into(),
                flank: 10,
            }),
            NamedRegionSpec::new("global", RegionSpec::Global),
        ];
        let metrics = extract_regions(&track, &manifest, &regions).unwrap();
        assert_eq!(metrics.regions().len(), 1);
        assert_eq!(metrics.get("global").unwrap(), metrics.global());
        assert_eq!(metrics.failures().len(), 2);
        assert_eq!(metrics.failures()[0].kind, FailureKind::EmptyRegion);
        assert_eq!(metrics.failures()[1].region, "missing");
    }

    #[test]
    fn track_must_match_construct_length() {
        let (manifest, _) = enhancer_construct();
        let short = track(vec![0.0; 1024]);
        assert!(matches!(
            extract_regions(&short, &manifest, &[]),
            Err(EnhstackError::InvalidLength(_))
        ));
    }
}
