//! FASTA input and output of elements and constructs.

use std::fs::File;
use std::io::{
    BufReader,
    BufWriter,
    Write,
};
use std::path::Path;

use anyhow::Context;
use bio::io::fasta;
use log::info;

use crate::data_structs::{
    Construct,
    ElementLibrary,
};

/// Loads an element library from a FASTA file, one element per record.
pub fn read_library<P: AsRef<Path>>(path: P) -> anyhow::Result<ElementLibrary> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open element FASTA {}", path.display()))?;
    let library = ElementLibrary::from_fasta_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load elements from {}", path.display()))?;
    info!("Loaded {} elements from {}", library.len(), path.display());
    Ok(library)
}

/// Writes `construct` as a single FASTA record: one header line and the whole
/// sequence on one line.
pub fn write_construct<W: Write>(
    construct: &Construct,
    description: Option<&str>,
    sink: W,
) -> std::io::Result<()> {
    let mut writer = fasta::Writer::new(sink);
    writer.write(construct.name(), description, construct.sequence())?;
    writer.flush()
}

/// Writes the construct FASTA and its JSON manifest next to each other:
/// `<dir>/<name>.fa` and `<dir>/<name>.manifest.json`.
pub fn save_construct<P: AsRef<Path>>(
    construct: &Construct,
    dir: P,
) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    let fasta_path = dir.join(format!("{}.fa", construct.name()));
    let manifest_path = dir.join(format!("{}.manifest.json", construct.name()));

    let description = format!("length={}", construct.len());
    let sink = BufWriter::new(
        File::create(&fasta_path)
            .with_context(|| format!("Failed to create {}", fasta_path.display()))?,
    );
    write_construct(construct, Some(&description), sink)?;

    let sink = BufWriter::new(
        File::create(&manifest_path)
            .with_context(|| format!("Failed to create {}", manifest_path.display()))?,
    );
    serde_json::to_writer_pretty(sink, construct.manifest())?;
    info!(
        "Saved construct '{}' to {}",
        construct.name(),
        dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::data_structs::{
        Element,
        Layout,
        Manifest,
        Placement,
    };
    use crate::tools::assembly::assemble;

    fn construct() -> Construct {
        let library = ElementLibrary::try_from_elements(vec![
            Element::new("filler", b"AACCGGTT").unwrap(),
            Element::new("enh", b"GATTACA").unwrap(),
        ])
        .unwrap();
        let layout = Layout::new(vec![Placement::new("enh", 100)]);
        assemble(&layout, &library, 256)
            .unwrap()
            .with_name("test_construct")
    }

    #[test]
    fn construct_is_single_line_record() {
        let construct = construct();
        let mut buf = Vec::new();
        write_construct(&construct, Some("length=256"), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], ">test_construct length=256");
        assert_eq!(lines[1].as_bytes(), construct.sequence());
    }

    #[test]
    fn written_construct_reads_back_as_element() {
        let construct = construct();
        let mut buf = Vec::new();
        write_construct(&construct, None, &mut buf).unwrap();

        let library = ElementLibrary::from_fasta_reader(Cursor::new(buf)).unwrap();
        let element = library.get("test_construct").unwrap();
        assert_eq!(element.sequence(), construct.sequence());
    }

    #[test]
    fn saved_files() {
        let dir = tempfile::tempdir().unwrap();
        let construct = construct();
        save_construct(&construct, dir.path()).unwrap();

        let fasta = read_library(dir.path().join("test_construct.fa")).unwrap();
        assert_eq!(fasta.len(), 1);

        let manifest: Manifest = serde_json::from_reader(
            File::open(dir.path().join("test_construct.manifest.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(&manifest, construct.manifest());
        assert!(manifest.is_partition());
    }

    #[test]
    fn missing_library_has_context() {
        let err = read_library("/nonexistent/elements.fa").unwrap_err();
        assert!(err.to_string().contains("elements.fa"));
    }
}
