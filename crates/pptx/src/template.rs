//! Presentation templates: the package plus the slide layouts it offers.

use crate::package::{Package, RT_OFFICE_DOCUMENT, RT_SLIDE_MASTER};
use crate::placeholder::PlaceholderInfo;
use crate::xml::{attribute, for_each_element, local_name, relationship_id};
use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};

const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";

/// A slide layout of the template.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    /// Part name inside the package, e.g. "ppt/slideLayouts/slideLayout2.xml".
    pub part_name: String,

    /// Display name from `p:cSld`, e.g. "Title and Content".
    pub name: String,

    /// Placeholders in document order.
    pub placeholders: Vec<PlaceholderInfo>,
}

/// A read-only presentation template.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    package: Package,
    presentation_part: String,
    layouts: Vec<SlideLayout>,
    slide_ids: Vec<(u32, String)>,
}

impl TemplateDocument {
    /// Open a template from a .pptx (or .potx) reader.
    pub fn open<R: Read + Seek>(reader: R) -> Result<Self> {
        let package = Package::open(reader)?;

        let presentation_part = package
            .relationships("")?
            .into_iter()
            .find(|r| r.rel_type == RT_OFFICE_DOCUMENT)
            .map(|r| r.target_part(""))
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string());

        let presentation = read_presentation(package.xml_part(&presentation_part)?)?;
        let rels = package.relationships(&presentation_part)?;

        let mut layouts = Vec::new();
        if let Some(master_rid) = presentation.master_ids.first() {
            let master = rels
                .iter()
                .find(|r| &r.id == master_rid && r.rel_type == RT_SLIDE_MASTER)
                .ok_or_else(|| {
                    Error::InvalidTemplate(format!("Slide master '{}' has no relationship", master_rid))
                })?;
            layouts = read_master_layouts(&package, &master.target_part(&presentation_part))?;
        }

        log::debug!(
            "Template has {} layouts and {} slides",
            layouts.len(),
            presentation.slide_ids.len()
        );

        Ok(Self {
            package,
            presentation_part,
            layouts,
            slide_ids: presentation.slide_ids,
        })
    }

    /// Layouts of the first slide master, in master order.
    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    /// Number of slides the template already contains.
    pub fn slide_count(&self) -> usize {
        self.slide_ids.len()
    }

    /// Layout for the slide at `index`: the first layout for slide 0, the
    /// second (or the first again, when there is only one) for the rest.
    pub fn layout_for_slide(&self, index: usize) -> Result<&SlideLayout> {
        let position = if index == 0 || self.layouts.len() < 2 { 0 } else { 1 };
        self.layouts.get(position).ok_or(Error::NoLayouts)
    }

    pub(crate) fn package(&self) -> &Package {
        &self.package
    }

    pub(crate) fn into_package(self) -> Package {
        self.package
    }

    pub(crate) fn presentation_part(&self) -> &str {
        &self.presentation_part
    }

    /// Slide ids and their relationship ids, in deck order.
    pub(crate) fn slide_ids(&self) -> &[(u32, String)] {
        &self.slide_ids
    }
}

struct PresentationInfo {
    master_ids: Vec<String>,
    slide_ids: Vec<(u32, String)>,
}

fn read_presentation(xml: &str) -> Result<PresentationInfo> {
    let mut info = PresentationInfo {
        master_ids: Vec::new(),
        slide_ids: Vec::new(),
    };

    for_each_element(xml, |e| {
        match local_name(e.name().as_ref()) {
            b"sldMasterId" => info.master_ids.extend(relationship_id(e)),
            b"sldId" => {
                let id = attribute(e, b"id").and_then(|v| v.parse().ok()).unwrap_or(0);
                info.slide_ids.push((id, relationship_id(e).unwrap_or_default()));
            }
            _ => {}
        }
    })?;

    Ok(info)
}

fn read_master_layouts(package: &Package, master_part: &str) -> Result<Vec<SlideLayout>> {
    let mut layout_rids = Vec::new();
    for_each_element(package.xml_part(master_part)?, |e| {
        if local_name(e.name().as_ref()) == b"sldLayoutId" {
            layout_rids.extend(relationship_id(e));
        }
    })?;

    let rels = package.relationships(master_part)?;
    let mut layouts = Vec::with_capacity(layout_rids.len());
    for rid in layout_rids {
        let Some(rel) = rels.iter().find(|r| r.id == rid) else {
            log::warn!("Layout relationship '{}' missing from {}", rid, master_part);
            continue;
        };
        let part_name = rel.target_part(master_part);
        let (name, placeholders) = read_layout(package.xml_part(&part_name)?)?;
        layouts.push(SlideLayout {
            part_name,
            name,
            placeholders,
        });
    }

    Ok(layouts)
}

/// Read a layout's display name and placeholders.
fn read_layout(xml: &str) -> Result<(String, Vec<PlaceholderInfo>)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut layout_name = String::new();
    let mut placeholders = Vec::new();
    let mut shape_name = String::new();
    let mut current: Option<PlaceholderInfo> = None;
    let mut shape_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"sp" | b"pic" | b"graphicFrame" => {
                        shape_depth += 1;
                        if shape_depth == 1 {
                            shape_name.clear();
                            current = None;
                        }
                    }
                    _ => read_layout_element(e, &mut layout_name, &mut shape_name, &mut current),
                }
            }
            Ok(Event::Empty(ref e)) => {
                read_layout_element(e, &mut layout_name, &mut shape_name, &mut current)
            }
            Ok(Event::End(ref e)) => {
                if matches!(local_name(e.name().as_ref()), b"sp" | b"pic" | b"graphicFrame") {
                    shape_depth = shape_depth.saturating_sub(1);
                    if shape_depth == 0 {
                        if let Some(mut ph) = current.take() {
                            ph.name = std::mem::take(&mut shape_name);
                            placeholders.push(ph);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide layout: {}", e)));
            }
            _ => {}
        }
    }

    Ok((layout_name, placeholders))
}

fn read_layout_element(
    e: &BytesStart<'_>,
    layout_name: &mut String,
    shape_name: &mut String,
    current: &mut Option<PlaceholderInfo>,
) {
    match local_name(e.name().as_ref()) {
        b"cSld" => *layout_name = attribute(e, b"name").unwrap_or_default(),
        b"cNvPr" if shape_name.is_empty() => *shape_name = attribute(e, b"name").unwrap_or_default(),
        b"ph" if current.is_none() => {
            let mut ph = PlaceholderInfo::new(
                String::new(),
                attribute(e, b"type").unwrap_or_else(|| "obj".to_string()),
                attribute(e, b"idx").and_then(|v| v.parse().ok()).unwrap_or(0),
            );
            ph.orient = attribute(e, b"orient");
            ph.size = attribute(e, b"sz");
            *current = Some(ph);
        }
        _ => {}
    }
}
