//! Minimal in-memory templates for tests.
//!
//! The packages carry only what the renderer and reader look at: content
//! types, package and presentation relationships, one slide master and its
//! layouts, and optionally some existing slides.

use crate::package::{CT_PRESENTATION_MAIN, CT_SLIDE, CT_TEMPLATE_MAIN};
use deck_core::{Error, Result};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const RT_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A placeholder in a fixture layout.
#[derive(Debug, Clone)]
pub struct PlaceholderSpec {
    pub name: String,
    pub kind: Option<String>,
    pub idx: Option<u32>,
}

impl PlaceholderSpec {
    pub fn new(name: &str, kind: Option<&str>, idx: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.map(str::to_string),
            idx,
        }
    }
}

/// A fixture layout.
#[derive(Debug, Clone)]
pub struct LayoutSpec {
    pub name: String,
    pub placeholders: Vec<PlaceholderSpec>,
}

impl LayoutSpec {
    pub fn new(name: &str, placeholders: Vec<PlaceholderSpec>) -> Self {
        Self {
            name: name.to_string(),
            placeholders,
        }
    }

    /// "Title Slide": centered title and subtitle.
    pub fn title_slide() -> Self {
        Self::new(
            "Title Slide",
            vec![
                PlaceholderSpec::new("Title 1", Some("ctrTitle"), None),
                PlaceholderSpec::new("Subtitle 2", Some("subTitle"), Some(1)),
                PlaceholderSpec::new("Date Placeholder 3", Some("dt"), Some(10)),
            ],
        )
    }

    /// "Title and Content": title and the primary body placeholder.
    pub fn title_and_content() -> Self {
        Self::new(
            "Title and Content",
            vec![
                PlaceholderSpec::new("Title 1", Some("title"), None),
                PlaceholderSpec::new("Content Placeholder 2", None, Some(1)),
                PlaceholderSpec::new("Footer Placeholder 4", Some("ftr"), Some(11)),
                PlaceholderSpec::new("Slide Number Placeholder 5", Some("sldNum"), Some(12)),
            ],
        )
    }
}

/// Builds a template package.
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    layouts: Vec<LayoutSpec>,
    existing_slides: usize,
    first_slide_id: Option<u32>,
    as_template: bool,
}

impl TemplateBuilder {
    /// A package with no layouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// "Title Slide" followed by "Title and Content".
    pub fn standard() -> Self {
        Self::new()
            .layout(LayoutSpec::title_slide())
            .layout(LayoutSpec::title_and_content())
    }

    /// Only the "Title Slide" layout.
    pub fn single_layout() -> Self {
        Self::new().layout(LayoutSpec::title_slide())
    }

    pub fn layout(mut self, layout: LayoutSpec) -> Self {
        self.layouts.push(layout);
        self
    }

    /// Add slides that already exist in the template, built on the first layout.
    pub fn existing_slides(mut self, count: usize) -> Self {
        self.existing_slides = count;
        self
    }

    /// Number the existing slides from `id` instead of 256.
    pub fn first_slide_id(mut self, id: u32) -> Self {
        self.first_slide_id = Some(id);
        self
    }

    /// Declare the main part as a .potx template.
    pub fn as_template(mut self) -> Self {
        self.as_template = true;
        self
    }

    /// Write the package as .pptx bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut parts: Vec<(String, String)> = Vec::new();

        parts.push(("[Content_Types].xml".into(), self.content_types()));
        parts.push((
            "_rels/.rels".into(),
            rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]),
        ));

        // Presentation rels: master first, then existing slides.
        let mut pres_rels = vec![("rId1".to_string(), "slideMaster", "slideMasters/slideMaster1.xml".to_string())];
        let mut slide_ids = String::new();
        let first_id = u64::from(self.first_slide_id.unwrap_or(256));
        for i in 0..self.existing_slides {
            let rid = format!("rId{}", i + 2);
            slide_ids.push_str(&format!(
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                first_id + i as u64,
                rid
            ));
            pres_rels.push((rid, "slide", format!("slides/slide{}.xml", i + 1)));
        }
        let pres_rels: Vec<(&str, &str, &str)> = pres_rels
            .iter()
            .map(|(id, t, target)| (id.as_str(), *t, target.as_str()))
            .collect();
        parts.push(("ppt/_rels/presentation.xml.rels".into(), rels(&pres_rels)));

        let slide_list = if self.existing_slides > 0 {
            format!("<p:sldIdLst>{}</p:sldIdLst>", slide_ids)
        } else {
            String::new()
        };
        parts.push((
            "ppt/presentation.xml".into(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {NS_DECL}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{slide_list}<p:sldSz cx="9144000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
            ),
        ));

        // Master and its layouts.
        let layout_ids: String = (0..self.layouts.len())
            .map(|i| format!(r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#, 2147483649u64 + i as u64, i + 1))
            .collect();
        parts.push((
            "ppt/slideMasters/slideMaster1.xml".into(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster {NS_DECL}><p:cSld><p:spTree/></p:cSld><p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst></p:sldMaster>"#
            ),
        ));
        let master_rels: Vec<(String, String)> = (0..self.layouts.len())
            .map(|i| (format!("rId{}", i + 1), format!("../slideLayouts/slideLayout{}.xml", i + 1)))
            .collect();
        let master_rels: Vec<(&str, &str, &str)> = master_rels
            .iter()
            .map(|(id, target)| (id.as_str(), "slideLayout", target.as_str()))
            .collect();
        parts.push(("ppt/slideMasters/_rels/slideMaster1.xml.rels".into(), rels(&master_rels)));

        for (i, layout) in self.layouts.iter().enumerate() {
            parts.push((
                format!("ppt/slideLayouts/slideLayout{}.xml", i + 1),
                layout_xml(layout),
            ));
            parts.push((
                format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
                rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            ));
        }

        for i in 0..self.existing_slides {
            parts.push((
                format!("ppt/slides/slide{}.xml", i + 1),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS_DECL}><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Existing {n}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
                    n = i + 1
                ),
            ));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            ));
        }

        write_zip(&parts)
    }

    fn content_types(&self) -> String {
        let main = if self.as_template {
            CT_TEMPLATE_MAIN
        } else {
            CT_PRESENTATION_MAIN
        };
        let mut overrides = format!(r#"<Override PartName="/ppt/presentation.xml" ContentType="{main}"/>"#);
        overrides.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
        for i in 0..self.layouts.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/ppt/slideLayouts/slideLayout{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
                i + 1
            ));
        }
        for i in 0..self.existing_slides {
            overrides.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{CT_SLIDE}"/>"#,
                i + 1
            ));
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{overrides}</Types>"#
        )
    }
}

fn layout_xml(layout: &LayoutSpec) -> String {
    let mut shapes = String::new();
    for (i, ph) in layout.placeholders.iter().enumerate() {
        let mut attrs = String::new();
        if let Some(kind) = &ph.kind {
            attrs.push_str(&format!(r#" type="{}""#, kind));
        }
        if let Some(idx) = ph.idx {
            attrs.push_str(&format!(r#" idx="{}""#, idx));
        }
        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph{attrs}/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>Click to edit</a:t></a:r></a:p></p:txBody></p:sp>"#,
            id = i + 2,
            name = ph.name,
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {NS_DECL} preserve="1"><p:cSld name="{name}"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        name = layout.name,
    )
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, kind, target)| {
            format!(r#"<Relationship Id="{id}" Type="{RT_BASE}/{kind}" Target="{target}"/>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{RELS_NS}">{body}</Relationships>"#
    )
}

fn write_zip(parts: &[(String, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(name.as_str(), FileOptions::default())
            .map_err(|e| Error::ZipError(e.to_string()))?;
        zip.write_all(content.as_bytes())?;
    }
    let cursor = zip.finish().map_err(|e| Error::ZipError(e.to_string()))?;
    Ok(cursor.into_inner())
}
