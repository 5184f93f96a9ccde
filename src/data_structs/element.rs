use std::borrow::Cow;
use std::io::{
    BufRead,
    BufReader,
    Read,
};
use std::sync::Arc;

use bio::alphabets::dna;
use hashbrown::HashMap;
use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
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

/// Named, immutable DNA building block (enhancer, promoter, filler, ...).
///
/// Sequences are validated against the `{A, C, G, T}` alphabet and stored
/// upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    name:               String,
    sequence:           Vec<u8>,
    source_coordinates: Option<String>,
}

impl Element {
    pub fn new<S: AsRef<[u8]>>(
        name: impl Into<String>,
        sequence: S,
    ) -> Result<Self> {
        let name = name.into();
        let sequence = sequence.as_ref().to_ascii_uppercase();
        if sequence.is_empty() {
            return Err(EnhstackError::InvalidSequence {
                name,
                reason: "sequence is empty".into(),
            });
        }
        if let Some((idx, byte)) = sequence
            .iter()
            .find_position(|b| !matches!(b, b'A' | b'C' | b'G' | b'T'))
        {
            return Err(EnhstackError::InvalidSequence {
                name,
                reason: format!(
                    "symbol '{}' at position {} is not one of A, C, G, T",
                    *byte as char, idx
                ),
            });
        }
        Ok(Self {
            name,
            sequence,
            source_coordinates: None,
        })
    }

    /// Attaches provenance, e.g. `chr11:5290000-5291000`.
    pub fn with_source(
        mut self,
        coordinates: impl Into<String>,
    ) -> Self {
        self.source_coordinates = Some(coordinates.into());
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn sequence(&self) -> &[u8] { &self.sequence }

    pub fn len(&self) -> PosType { self.sequence.len() }

    pub fn is_empty(&self) -> bool { self.sequence.is_empty() }

    pub fn source_coordinates(&self) -> Option<&str> {
        self.source_coordinates.as_deref()
    }

    /// Element bytes in the requested orientation.
    pub fn oriented(
        &self,
        orientation: Orientation,
    ) -> Cow<'_, [u8]> {
        match orientation {
            Orientation::Forward => Cow::Borrowed(&self.sequence),
            Orientation::Reverse => Cow::Owned(dna::revcomp(&self.sequence)),
        }
    }

    /// Composition-preserving shuffle, deterministic for a given seed.
    ///
    /// Used to derive technical-replicate fillers that keep the nucleotide
    /// content of the original filler but randomise its order.
    pub fn shuffled(
        &self,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sequence = self.sequence.clone();
        sequence.shuffle(&mut rng);
        debug!("Shuffled element '{}' with seed {}", self.name, seed);
        Self {
            name: self.name.clone(),
            sequence,
            source_coordinates: self.source_coordinates.clone(),
        }
    }
}

/// Immutable name -> [`Element`] store.
#[derive(Debug, Clone, Default)]
pub struct ElementLibrary {
    elements: HashMap<String, Arc<Element>>,
}

impl ElementLibrary {
    pub fn new() -> Self { Self::default() }

    /// Builds a library, rejecting duplicate element names.
    pub fn try_from_elements<I>(elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = Element>, {
        let mut map = HashMap::new();
        for element in elements {
            let name = element.name().to_string();
            if map.insert(name.clone(), Arc::new(element)).is_some() {
                return Err(EnhstackError::InvalidInput(format!(
                    "Duplicate element name '{}'",
                    name
                )));
            }
        }
        Ok(Self { elements: map })
    }

    /// Reads every FASTA record as one element named after the record id.
    pub fn from_fasta_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_fasta_bufread(BufReader::new(reader))
    }

    fn from_fasta_bufread<B: BufRead>(reader: B) -> Result<Self> {
        let elements = bio::io::fasta::Reader::from_bufread(reader)
            .records()
            .map(|record| {
                let record = record?;
                Element::new(record.id(), record.seq())
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("Loaded {} elements from FASTA", elements.len());
        Self::try_from_elements(elements)
    }

    /// Returns a copy of the library with `element` inserted, replacing any
    /// element of the same name.
    pub fn with_replacement(
        &self,
        element: Element,
    ) -> Self {
        let mut elements = self.elements.clone();
        elements.insert(element.name().to_string(), Arc::new(element));
        Self { elements }
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Result<&Arc<Element>> {
        self.elements
            .get(name)
            .ok_or_else(|| EnhstackError::UnknownElement(name.to_string()))
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.elements.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.elements.keys().map(String::as_str).sorted().collect()
    }

    pub fn len(&self) -> usize { self.elements.len() }

    pub fn is_empty(&self) -> bool { self.elements.is_empty() }
}
