use bio::alphabets::dna;
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

use super::*;
use crate::data_structs::{
    Element,
    LayoutBuilder,
    Orientation,
    Placement,
};

fn random_dna(
    rng: &mut ChaCha8Rng,
    length: usize,
) -> Vec<u8> {
    let chars = [b'A', b'C', b'G', b'T'];
    (0..length).map(|_| chars[rng.gen_range(0..4)]).collect()
}

fn library(seed: u64) -> ElementLibrary {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    ElementLibrary::try_from_elements(vec![
        Element::new("filler", random_dna(&mut rng, 997)).unwrap(),
        Element::new("enhancer", random_dna(&mut rng, 1001)).unwrap(),
        Element::new("promoter", random_dna(&mut rng, 301)).unwrap(),
        Element::new("ctcf", b"CCGCGAGGTGGCAG").unwrap(),
    ])
    .unwrap()
}

#[rstest]
#[case(1 << 12)]
#[case(1 << 16)]
#[case(1 << 20)]
fn length_and_partition_invariants(#[case] target: usize) {
    let lib = library(1);
    let layout = Layout::new(vec![
        Placement::new("enhancer", target / 8),
        Placement::new("promoter", target / 2).with_orientation(Orientation::Reverse),
    ]);
    let construct = assemble(&layout, &lib, target).unwrap();
    assert_eq!(construct.len(), target);
    assert!(construct.manifest().is_partition());

    let covered: usize = construct.manifest().entries().iter().map(|e| e.len()).sum();
    assert_eq!(covered, target);
}

#[test]
fn placed_bytes_are_reproduced() {
    let lib = library(2);
    let layout = Layout::new(vec![
        Placement::new("enhancer", 100).with_label("enh"),
        Placement::new("promoter", 2000)
            .with_orientation(Orientation::Reverse)
            .with_label("prom"),
    ]);
    let construct = assemble(&layout, &lib, 4096).unwrap();

    let enh = construct.element_interval("enh").unwrap();
    assert_eq!(enh, 100..1101);
    assert_eq!(construct.slice(enh), lib.get("enhancer").unwrap().sequence());

    let prom = construct.element_interval("prom").unwrap();
    let expected = dna::revcomp(lib.get("promoter").unwrap().sequence());
    assert_eq!(construct.slice(prom.clone()), expected.as_slice());
    // Reverse complement twice restores the element
    assert_eq!(
        dna::revcomp(construct.slice(prom)),
        lib.get("promoter").unwrap().sequence()
    );
}

#[test]
fn filler_is_tiled_by_absolute_position() {
    let lib = library(3);
    let filler = lib.get("filler").unwrap().sequence().to_vec();
    let layout = Layout::new(vec![Placement::new("promoter", 1500)]);
    let construct = assemble(&layout, &lib, 4096).unwrap();

    for entry in construct.manifest().fillers() {
        for pos in entry.range() {
            assert_eq!(construct.sequence()[pos], filler[pos % filler.len()]);
        }
    }
    assert_eq!(construct.manifest().entries().len(), 3);
}

#[test]
fn tandem_repeats_are_back_to_back() {
    let lib = library(4);
    let layout = Layout::new(vec![Placement::new("enhancer", 0)
        .with_repeat_count(3)
        .with_label("block")]);
    let construct = assemble(&layout, &lib, 8192).unwrap();
    let unit = lib.get("enhancer").unwrap().sequence();
    let block = construct.element_interval("block").unwrap();
    assert_eq!(block, 0..3003);
    for copy in construct.slice(block).chunks(unit.len()) {
        assert_eq!(copy, unit);
    }
}

#[rstest]
#[case(vec![Placement::new("enhancer", 100), Placement::new("promoter", 500)])]
#[case(vec![Placement::new("enhancer", 100), Placement::new("promoter", 100)])]
#[case(vec![Placement::new("promoter", 1100), Placement::new("enhancer", 100)])]
fn overlapping_placements_fail(#[case] placements: Vec<Placement>) {
    let lib = library(5);
    let result = assemble(&Layout::new(placements), &lib, 4096);
    assert!(matches!(result, Err(EnhstackError::Layout(_))));
}

#[test]
fn adjacent_placements_are_allowed() {
    let lib = library(5);
    let layout = Layout::new(vec![
        Placement::new("promoter", 1101),
        Placement::new("enhancer", 100),
    ]);
    let construct = assemble(&layout, &lib, 4096).unwrap();
    assert!(construct.manifest().is_partition());
    assert_eq!(construct.manifest().placements().count(), 2);
}

#[test]
fn placement_past_the_end_fails() {
    let lib = library(6);
    let layout = Layout::new(vec![Placement::new("enhancer", 4000)]);
    assert!(matches!(
        assemble(&layout, &lib, 4096),
        Err(EnhstackError::Layout(_))
    ));
}

#[rstest]
#[case(0)]
#[case(1000)]
#[case(4095)]
#[case(3 << 10)]
fn target_length_must_be_power_of_two(#[case] target: usize) {
    let lib = library(7);
    assert!(matches!(
        assemble(&Layout::default(), &lib, target),
        Err(EnhstackError::InvalidLength(_))
    ));
}

#[test]
fn zero_repeat_count_fails() {
    let lib = library(8);
    let layout = Layout::new(vec![Placement::new("enhancer", 0).with_repeat_count(0)]);
    assert!(matches!(
        assemble(&layout, &lib, 4096),
        Err(EnhstackError::Layout(_))
    ));
}

#[test]
fn unknown_element_fails() {
    let lib = library(9);
    let layout = Layout::new(vec![Placement::new("silencer", 0)]);
    assert!(matches!(
        assemble(&layout, &lib, 4096),
        Err(EnhstackError::UnknownElement(name)) if name == "silencer"
    ));
}

#[test]
fn filler_only_required_for_gaps() {
    let unit = Element::new("unit", b"ACGT").unwrap();
    let lib = ElementLibrary::try_from_elements(vec![unit]).unwrap();

    let full = Layout::new(vec![Placement::new("unit", 0).with_repeat_count(16)]);
    let construct = assemble(&full, &lib, 64).unwrap();
    assert_eq!(construct.sequence(), b"ACGT".repeat(16).as_slice());
    assert_eq!(construct.manifest().fillers().count(), 0);

    let gapped = Layout::new(vec![Placement::new("unit", 0)]);
    assert!(matches!(
        assemble(&gapped, &lib, 64),
        Err(EnhstackError::UnknownElement(name)) if name == "filler"
    ));
}

#[test]
fn builder_matches_manual_offsets() {
    let lib = library(10);
    let enhancer = lib.get("enhancer").unwrap().as_ref().clone();
    let promoter = lib.get("promoter").unwrap().as_ref().clone();

    let built = LayoutBuilder::new()
        .skip(200)
        .append(&enhancer, Orientation::Forward, 2, Some("enh"))
        .skip(50)
        .append(&enhancer, Orientation::Reverse, 1, None)
        .seek(4000)
        .append(&promoter, Orientation::Forward, 1, Some("prom"))
        .build()
        .unwrap();

    let manual = Layout::new(vec![
        Placement::new("enhancer", 200)
            .with_repeat_count(2)
            .with_label("enh"),
        Placement::new("enhancer", 2252).with_orientation(Orientation::Reverse),
        Placement::new("promoter", 4000).with_label("prom"),
    ]);
    assert_eq!(built, manual);
    assert_eq!(
        assemble(&built, &lib, 8192).unwrap(),
        assemble(&manual, &lib, 8192).unwrap()
    );
}

#[test]
fn builder_rejects_backwards_seek() {
    let lib = library(11);
    let enhancer = lib.get("enhancer").unwrap().as_ref().clone();
    let result = LayoutBuilder::new()
        .append(&enhancer, Orientation::Forward, 1, None)
        .seek(10)
        .build();
    assert!(matches!(result, Err(EnhstackError::Layout(_))));
}

#[rstest]
#[case(usize::MAX / 2, 0)]
#[case(1, usize::MAX)]
fn builder_overflow_is_a_layout_error(
    #[case] repeat_count: usize,
    #[case] skip: usize,
) {
    let lib = library(13);
    let enhancer = lib.get("enhancer").unwrap().as_ref().clone();
    let result = LayoutBuilder::new()
        .skip(skip)
        .append(&enhancer, Orientation::Forward, repeat_count, None)
        .append(&enhancer, Orientation::Forward, 1, None)
        .build();
    assert!(matches!(result, Err(EnhstackError::Layout(_))));
}

#[test]
fn distance_series_layout() {
    let lib = library(12);
    let enhancer = lib.get("enhancer").unwrap();
    let promoter = lib.get("promoter").unwrap();
    let target = 1 << 20;

    let layout = Layout::distance_series(enhancer, promoter, 50_000, target).unwrap();
    let construct = assemble(&layout, &lib, target).unwrap();

    let prom = construct.element_interval("promoter").unwrap();
    let enh = construct.element_interval("enhancer").unwrap();
    assert_eq!(prom.start, target / 2 - 150);
    assert_eq!(prom.start - enh.end, 50_000);
    assert_eq!(enh.len(), 1001);

    assert!(matches!(
        Layout::distance_series(enhancer, promoter, 600_000, target),
        Err(EnhstackError::Layout(_))
    ));
}

#[test]
fn assembly_is_deterministic() {
    let lib = library(13);
    let layout = Layout::new(vec![
        Placement::new("ctcf", 10),
        Placement::new("enhancer", 30),
    ]);
    assert_eq!(
        assemble(&layout, &lib, 2048).unwrap(),
        assemble(&layout, &lib, 2048).unwrap()
    );
}
