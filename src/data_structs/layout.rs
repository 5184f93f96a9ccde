use serde::{
    Deserialize,
    Serialize,
};

use super::element::{
    Element,
    ElementLibrary,
};
use super::enums::Orientation;
use super::typedef::PosType;
use crate::error::{
    EnhstackError,
    Result,
};
use crate::with_field_fn;

pub const DEFAULT_FILLER_NAME: &str = "filler";

/// Instruction to insert `repeat_count` back-to-back copies of an element
/// starting at `start_offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub(crate) element_name: String,
    pub(crate) start_offset: PosType,
    pub(crate) repeat_count: usize,
    pub(crate) orientation:  Orientation,
    /// Name used by regions to refer to this placement. Falls back to the
    /// element name when absent.
    pub(crate) label:        Option<String>,
}

impl Placement {
    pub fn new(
        element_name: impl Into<String>,
        start_offset: PosType,
    ) -> Self {
        Self {
            element_name: element_name.into(),
            start_offset,
            repeat_count: 1,
            orientation: Orientation::Forward,
            label: None,
        }
    }

    with_field_fn!(repeat_count, usize);
    with_field_fn!(orientation, Orientation);

    pub fn with_label(
        mut self,
        label: impl Into<String>,
    ) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn element_name(&self) -> &str { &self.element_name }

    pub fn start_offset(&self) -> PosType { self.start_offset }

    pub fn repeat_count(&self) -> usize { self.repeat_count }

    pub fn orientation(&self) -> Orientation { self.orientation }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.element_name)
    }

    /// Length in bp once resolved against `library`.
    pub fn resolved_len(
        &self,
        library: &ElementLibrary,
    ) -> Result<PosType> {
        let element = library.get(&self.element_name)?;
        element.len().checked_mul(self.repeat_count).ok_or_else(|| {
            EnhstackError::layout(format!(
                "Placement '{}' length overflows",
                self.label()
            ))
        })
    }
}

/// Ordered set of placements plus the name of the element used to fill every
/// base not covered by a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub(crate) placements: Vec<Placement>,
    pub(crate) filler:     String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            placements: Vec::new(),
            filler:     DEFAULT_FILLER_NAME.to_string(),
        }
    }
}

impl Layout {
    pub fn new(placements: Vec<Placement>) -> Self {
        Self {
            placements,
            ..Default::default()
        }
    }

    pub fn with_filler(
        mut self,
        filler: impl Into<String>,
    ) -> Self {
        self.filler = filler.into();
        self
    }

    pub fn push(
        &mut self,
        placement: Placement,
    ) {
        self.placements.push(placement);
    }

    pub fn placements(&self) -> &[Placement] { &self.placements }

    pub fn filler(&self) -> &str { &self.filler }

    pub fn is_empty(&self) -> bool { self.placements.is_empty() }

    /// Canonical distance-decay layout.
    ///
    /// The promoter is centered on `target_length / 2` and the enhancer ends
    /// `distance` bp upstream of the promoter start. Placements are labelled
    /// `"enhancer"` and `"promoter"`.
    pub fn distance_series(
        enhancer: &Element,
        promoter: &Element,
        distance: PosType,
        target_length: PosType,
    ) -> Result<Self> {
        let promoter_start = (target_length / 2)
            .checked_sub(promoter.len() / 2)
            .ok_or_else(|| {
                EnhstackError::layout(format!(
                    "Promoter of {} bp does not fit around the center of a {} bp \
                     construct",
                    promoter.len(),
                    target_length
                ))
            })?;
        if promoter_start + promoter.len() > target_length {
            return Err(EnhstackError::layout(format!(
                "Promoter would extend beyond construct: {} > {}",
                promoter_start + promoter.len(),
                target_length
            )));
        }
        let enhancer_start = promoter_start
            .checked_sub(distance)
            .and_then(|end| end.checked_sub(enhancer.len()))
            .ok_or_else(|| {
                EnhstackError::layout(format!(
                    "Enhancer at distance {} bp would start before position 0",
                    distance
                ))
            })?;

        Ok(Layout::new(vec![
            Placement::new(enhancer.name(), enhancer_start).with_label("enhancer"),
            Placement::new(promoter.name(), promoter_start).with_label("promoter"),
        ]))
    }
}

/// Declares a layout by appending placements at a moving cursor.
///
/// Bases skipped over are left to the filler at assembly time.
#[derive(Debug, Clone, Default)]
pub struct LayoutBuilder {
    layout: Layout,
    cursor: PosType,
    error:  Option<String>,
}

impl LayoutBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn with_filler(
        mut self,
        filler: impl Into<String>,
    ) -> Self {
        self.layout.filler = filler.into();
        self
    }

    pub fn cursor(&self) -> PosType { self.cursor }

    /// Appends `repeat_count` copies of `element` at the cursor.
    pub fn append(
        mut self,
        element: &Element,
        orientation: Orientation,
        repeat_count: usize,
        label: Option<&str>,
    ) -> Self {
        let mut placement = Placement::new(element.name(), self.cursor)
            .with_orientation(orientation)
            .with_repeat_count(repeat_count);
        if let Some(label) = label {
            placement = placement.with_label(label);
        }
        let cursor = self.cursor;
        let advanced = element
            .len()
            .checked_mul(repeat_count)
            .and_then(|len| cursor.checked_add(len));
        self.layout.placements.push(placement);
        self.advance(advanced, || {
            format!(
                "{} copies of '{}' overflow the cursor at {}",
                repeat_count,
                element.name(),
                cursor
            )
        })
    }

    /// Leaves `length` bp of filler.
    pub fn skip(
        self,
        length: PosType,
    ) -> Self {
        let advanced = self.cursor.checked_add(length);
        let cursor = self.cursor;
        self.advance(advanced, || {
            format!("Skipping {} bp overflows the cursor at {}", length, cursor)
        })
    }

    /// Moves the cursor to `advanced`, or records the first overflow.
    fn advance(
        mut self,
        advanced: Option<PosType>,
        msg: impl FnOnce() -> String,
    ) -> Self {
        match advanced {
            Some(cursor) => self.cursor = cursor,
            None => {
                if self.error.is_none() {
                    self.error = Some(msg());
                }
                self.cursor = PosType::MAX;
            },
        }
        self
    }

    /// Moves the cursor forward to an absolute position.
    pub fn seek(
        mut self,
        position: PosType,
    ) -> Self {
        if position < self.cursor && self.error.is_none() {
            self.error = Some(format!(
                "Cannot seek backwards from {} to {}",
                self.cursor, position
            ));
        }
        self.cursor = self.cursor.max(position);
        self
    }

    pub fn build(self) -> Result<Layout> {
        match self.error {
            Some(msg) => Err(EnhstackError::Layout(msg)),
            None => Ok(self.layout),
        }
    }
}
