//! In-memory OPC package: the parts of a .pptx ZIP archive and the
//! relationships between them.

use crate::xml::{attribute, local_name, XmlOut, NS_PACKAGE_RELATIONSHIPS};
use deck_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const RT_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const RT_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const RT_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
pub const CT_PRESENTATION_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
pub const CT_TEMPLATE_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Upper bound on the total uncompressed size of a package.
pub const MAX_PACKAGE_SIZE: u64 = 512 * 1024 * 1024;

/// A relationship from one part to another (or to an external resource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Resolve the target to a part name, relative to `source_part`.
    pub fn target_part(&self, source_part: &str) -> String {
        resolve_target(source_part, &self.target)
    }
}

/// The parts of a package, kept in archive order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Read every file of a ZIP archive into memory.
    pub fn open<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::open_with_limit(reader, MAX_PACKAGE_SIZE)
    }

    /// Like [`Package::open`], failing once more than `limit` bytes have
    /// been inflated across all entries.
    pub fn open_with_limit<R: Read + Seek>(reader: R, limit: u64) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        let mut remaining = limit;
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", i, e)))?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().trim_start_matches('/').to_string();
            let mut data = Vec::new();
            // One byte past the budget tells an exact fit from an overrun.
            let read = file
                .by_ref()
                .take(remaining.saturating_add(1))
                .read_to_end(&mut data)
                .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", name, e)))?
                as u64;
            if read > remaining {
                return Err(Error::ZipError(format!(
                    "Package exceeds {} bytes uncompressed at '{}'",
                    limit, name
                )));
            }
            remaining -= read;
            parts.push((name, data));
        }

        Ok(Self { parts })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// A part decoded as UTF-8 XML.
    pub fn xml_part(&self, name: &str) -> Result<&str> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::InvalidTemplate(format!("Missing part '{}'", name)))?;
        std::str::from_utf8(data)
            .map_err(|e| Error::XmlError(format!("Part '{}' is not UTF-8: {}", name, e)))
    }

    /// Replace a part, or append it when new.
    pub fn set_part(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        match self.parts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = data,
            None => self.parts.push((name, data)),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    /// Relationships of `source_part`; empty when it has no rels part.
    pub fn relationships(&self, source_part: &str) -> Result<Vec<Relationship>> {
        let rels_name = rels_part_name(source_part);
        if !self.contains(&rels_name) {
            return Ok(Vec::new());
        }
        parse_relationships(self.xml_part(&rels_name)?)
    }

    /// Write the package back out as a ZIP archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(data)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// Name of the rels part holding relationships of `part` (`""` is the package).
pub fn rels_part_name(part: &str) -> String {
    match part.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &part[..pos], &part[pos + 1..]),
        None if part.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of `source_part`.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/'));
    }
    let base = match source_part.rfind('/') {
        Some(pos) => &source_part[..pos],
        None => "",
    };
    normalize(base.split('/').chain(target.split('/')))
}

/// Express `target_part` as a target relative to the directory of `source_part`.
pub fn relative_target(source_part: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = match source_part.rfind('/') {
        Some(pos) => source_part[..pos].split('/').collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = target_part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = vec![".."; source_dir.len() - common];
    segments.extend(&target[common..]);
    segments.join("/")
}

fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    out.join("/")
}

pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                rels.push(Relationship {
                    id: attribute(e, b"Id").unwrap_or_default(),
                    rel_type: attribute(e, b"Type").unwrap_or_default(),
                    target: attribute(e, b"Target").unwrap_or_default(),
                    external: attribute(e, b"TargetMode").as_deref() == Some("External"),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Serialize a complete rels part.
pub fn write_relationships(rels: &[Relationship]) -> Result<String> {
    let mut out = XmlOut::document()?;
    out.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
    for rel in rels {
        write_relationship(&mut out, "", rel)?;
    }
    out.end("Relationships")?;
    out.into_string()
}

pub(crate) fn write_relationship(out: &mut XmlOut, prefix: &str, rel: &Relationship) -> Result<()> {
    let name = format!("{}Relationship", prefix);
    let mut attrs = vec![
        ("Id", rel.id.as_str()),
        ("Type", rel.rel_type.as_str()),
        ("Target", rel.target.as_str()),
    ];
    if rel.external {
        attrs.push(("TargetMode", "External"));
    }
    out.empty(&name, &attrs)
}

/// Trailing number of a name like "rId12" or "slide3.xml".
pub fn trailing_number(s: &str) -> Option<u32> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

/// First `rIdN` not used by `rels`.
pub fn next_relationship_id(rels: &[Relationship]) -> String {
    let max = rels
        .iter()
        .filter(|r| r.id.starts_with("rId"))
        .filter_map(|r| trailing_number(&r.id))
        .max()
        .unwrap_or(0);
    format!("rId{}", max + 1)
}
