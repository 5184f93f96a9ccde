//! Construct assembly.
//!
//! [`assemble`] turns a [`Layout`] into a [`Construct`] of exactly
//! `target_length` bases. Placements are resolved in layout order, checked for
//! overlaps, and every uncovered base is taken from the layout's filler
//! element. Filler is tiled by absolute position (base `p` of a gap is
//! `filler[p % filler.len()]`), so a construct is identical to one built by
//! laying the filler over the whole construct and overwriting the placed
//! intervals.

use log::{
    debug,
    trace,
};

use crate::data_structs::typedef::PosType;
use crate::data_structs::{
    Construct,
    ElementLibrary,
    IntervalKind,
    Layout,
    Manifest,
    ManifestEntry,
    Placement,
};
use crate::error::{
    EnhstackError,
    Result,
};

#[cfg(test)]
mod tests;

/// Fails with [`EnhstackError::InvalidLength`] unless `length` is a positive
/// power of two.
pub fn check_target_length(length: PosType) -> Result<()> {
    if length == 0 || !length.is_power_of_two() {
        return Err(EnhstackError::InvalidLength(format!(
            "Target length {} is not a positive power of two",
            length
        )));
    }
    Ok(())
}

/// Placement with its absolute interval.
#[derive(Debug)]
struct Resolved<'a> {
    index:     usize,
    start:     PosType,
    end:       PosType,
    placement: &'a Placement,
}

fn resolve_placements<'a>(
    layout: &'a Layout,
    library: &ElementLibrary,
    target_length: PosType,
) -> Result<Vec<Resolved<'a>>> {
    let mut resolved = Vec::with_capacity(layout.placements().len());
    for (index, placement) in layout.placements().iter().enumerate() {
        if placement.repeat_count() == 0 {
            return Err(EnhstackError::layout(format!(
                "Placement '{}' has a repeat count of 0",
                placement.label()
            )));
        }
        let length = placement.resolved_len(library)?;
        let end = placement
            .start_offset()
            .checked_add(length)
            .filter(|end| *end <= target_length)
            .ok_or_else(|| {
                EnhstackError::layout(format!(
                    "Placement '{}' at {} with {} bp exceeds target length {}",
                    placement.label(),
                    placement.start_offset(),
                    length,
                    target_length
                ))
            })?;
        trace!(
            "Resolved placement #{} '{}' to [{}, {})",
            index,
            placement.label(),
            placement.start_offset(),
            end
        );
        resolved.push(Resolved {
            index,
            start: placement.start_offset(),
            end,
            placement,
        });
    }

    resolved.sort_by_key(|r| (r.start, r.index));
    for pair in resolved.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.start < prev.end {
            return Err(EnhstackError::layout(format!(
                "Placements '{}' [{}, {}) and '{}' [{}, {}) overlap",
                prev.placement.label(),
                prev.start,
                prev.end,
                next.placement.label(),
                next.start,
                next.end
            )));
        }
    }
    Ok(resolved)
}

/// Appends filler bases for the absolute interval `[start, end)`.
fn tile_filler(
    buf: &mut Vec<u8>,
    filler: &[u8],
    start: PosType,
    end: PosType,
) {
    let mut pos = start;
    while pos < end {
        let offset = pos % filler.len();
        let take = (filler.len() - offset).min(end - pos);
        buf.extend_from_slice(&filler[offset..offset + take]);
        pos += take;
    }
}

/// Assembles `layout` into a construct of exactly `target_length` bases.
///
/// # Errors
///
/// - [`EnhstackError::InvalidLength`] if `target_length` is not a positive
///   power of two.
/// - [`EnhstackError::UnknownElement`] if a placement or the filler refers to
///   an element missing from `library` (the filler is only required when
///   some base is left uncovered).
/// - [`EnhstackError::Layout`] if a repeat count is zero, placements overlap
///   (coincident starts included), or a placement runs past the end.
pub fn assemble(
    layout: &Layout,
    library: &ElementLibrary,
    target_length: PosType,
) -> Result<Construct> {
    check_target_length(target_length)?;
    let resolved = resolve_placements(layout, library, target_length)?;

    let covered: PosType = resolved.iter().map(|r| r.end - r.start).sum();
    let filler = if covered < target_length {
        Some(library.get(layout.filler())?)
    }
    else {
        None
    };

    let mut sequence = Vec::with_capacity(target_length);
    let mut entries = Vec::with_capacity(resolved.len() * 2 + 1);
    let mut cursor = 0;

    let fill_gap = |sequence: &mut Vec<u8>,
                    entries: &mut Vec<ManifestEntry>,
                    start: PosType,
                    end: PosType| {
        if start >= end {
            return;
        }
        // Filler is always present when a gap exists.
        if let Some(filler) = filler {
            tile_filler(sequence, filler.sequence(), start, end);
            entries.push(ManifestEntry {
                start,
                end,
                kind: IntervalKind::Filler {
                    element_name: filler.name().to_string(),
                },
            });
        }
    };

    for item in &resolved {
        let placement = item.placement;
        fill_gap(&mut sequence, &mut entries, cursor, item.start);

        let element = library.get(placement.element_name())?;
        let unit = element.oriented(placement.orientation());
        for _ in 0..placement.repeat_count() {
            sequence.extend_from_slice(&unit);
        }
        entries.push(ManifestEntry {
            start: item.start,
            end:   item.end,
            kind:  IntervalKind::Placement {
                index:        item.index,
                element_name: element.name().to_string(),
                label:        placement.label().to_string(),
                orientation:  placement.orientation(),
                repeat_count: placement.repeat_count(),
                unit_length:  element.len(),
            },
        });
        cursor = item.end;
    }
    fill_gap(&mut sequence, &mut entries, cursor, target_length);

    if sequence.len() != target_length {
        return Err(EnhstackError::layout(format!(
            "Assembled {} bp, expected exactly {} bp",
            sequence.len(),
            target_length
        )));
    }

    debug!(
        "Assembled {} bp construct: {} placements, {} filler intervals",
        target_length,
        resolved.len(),
        entries.len() - resolved.len()
    );

    Ok(Construct {
        name: String::from("construct"),
        sequence,
        manifest: Manifest {
            target_length,
            entries,
        },
    })
}
