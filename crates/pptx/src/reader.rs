//! Reading back a generated deck: slide order, layouts and placeholder text.

use crate::package::{Package, RT_OFFICE_DOCUMENT, RT_SLIDE_LAYOUT};
use crate::xml::{attribute, for_each_element, local_name, relationship_id};
use deck_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};

/// Summary of a presentation's slides.
#[derive(Debug, Clone)]
pub struct DeckSummary {
    /// Slides in presentation order.
    pub slides: Vec<SlideSummary>,
}

/// One slide of a presentation.
#[derive(Debug, Clone)]
pub struct SlideSummary {
    /// 1-based slide number.
    pub number: usize,

    /// Part name of the slide.
    pub part_name: String,

    /// Part name of the layout the slide was built from.
    pub layout_part: Option<String>,

    /// Text-bearing shapes in document order.
    pub shapes: Vec<ShapeText>,
}

impl SlideSummary {
    /// Paragraphs of the title placeholder (idx 0).
    pub fn title(&self) -> Option<&[String]> {
        self.placeholder(0)
    }

    /// Paragraphs of the placeholder with the given idx.
    pub fn placeholder(&self, idx: u32) -> Option<&[String]> {
        self.shapes
            .iter()
            .find(|s| s.placeholder_idx == Some(idx))
            .map(|s| s.paragraphs.as_slice())
    }

    /// Paragraphs of the shape with the given name.
    pub fn shape(&self, name: &str) -> Option<&[String]> {
        self.shapes
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.paragraphs.as_slice())
    }
}

/// Text of one shape.
#[derive(Debug, Clone, Default)]
pub struct ShapeText {
    /// Shape name from `p:cNvPr`.
    pub name: String,

    /// Placeholder idx, when the shape is a placeholder.
    pub placeholder_idx: Option<u32>,

    /// Paragraph texts; empty paragraphs are kept.
    pub paragraphs: Vec<String>,
}

/// Reads slide structure back out of a .pptx.
pub struct DeckReader;

impl DeckReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a presentation from a reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let package = Package::open(reader)?;

        let presentation_part = package
            .relationships("")?
            .into_iter()
            .find(|r| r.rel_type == RT_OFFICE_DOCUMENT)
            .map(|r| r.target_part(""))
            .ok_or_else(|| Error::InvalidTemplate("No presentation part".to_string()))?;

        let slide_order = self.get_slide_order(&package, &presentation_part)?;

        let mut slides = Vec::with_capacity(slide_order.len());
        for (idx, slide_path) in slide_order.into_iter().enumerate() {
            slides.push(self.parse_slide(&package, slide_path, idx + 1)?);
        }

        Ok(DeckSummary { slides })
    }

    /// Slide part names in `p:sldIdLst` order.
    fn get_slide_order(&self, package: &Package, presentation_part: &str) -> Result<Vec<String>> {
        let mut rids = Vec::new();
        for_each_element(package.xml_part(presentation_part)?, |e| {
            if local_name(e.name().as_ref()) == b"sldId" {
                rids.extend(relationship_id(e));
            }
        })?;

        let rels = package.relationships(presentation_part)?;
        rids.iter()
            .map(|rid| {
                rels.iter()
                    .find(|r| &r.id == rid)
                    .map(|r| r.target_part(presentation_part))
                    .ok_or_else(|| {
                        Error::InvalidTemplate(format!("Slide relationship '{}' not found", rid))
                    })
            })
            .collect()
    }

    fn parse_slide(&self, package: &Package, part_name: String, number: usize) -> Result<SlideSummary> {
        let layout_part = package
            .relationships(&part_name)?
            .into_iter()
            .find(|r| r.rel_type == RT_SLIDE_LAYOUT)
            .map(|r| r.target_part(&part_name));

        let shapes = self.extract_shapes_from_xml(package.xml_part(&part_name)?)?;

        Ok(SlideSummary {
            number,
            part_name,
            layout_part,
            shapes,
        })
    }

    /// Extract shapes with their paragraph text from slide XML.
    fn extract_shapes_from_xml(&self, xml_content: &str) -> Result<Vec<ShapeText>> {
        let mut shapes = Vec::new();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(false);

        let mut current_shape: Option<ShapeText> = None;
        let mut in_text_body = false;
        let mut in_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => current_shape = Some(ShapeText::default()),
                    b"txBody" => in_text_body = true,
                    b"p" if in_text_body => {
                        if let Some(ref mut shape) = current_shape {
                            shape.paragraphs.push(String::new());
                        }
                    }
                    b"t" => in_text = true,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => {
                    if let Some(ref mut shape) = current_shape {
                        match local_name(e.name().as_ref()) {
                            b"cNvPr" if shape.name.is_empty() => {
                                shape.name = attribute(e, b"name").unwrap_or_default();
                            }
                            b"ph" => {
                                shape.placeholder_idx =
                                    Some(attribute(e, b"idx").and_then(|v| v.parse().ok()).unwrap_or(0));
                            }
                            b"p" if in_text_body => shape.paragraphs.push(String::new()),
                            b"br" if in_text_body => {
                                if let Some(last) = shape.paragraphs.last_mut() {
                                    last.push('\n');
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Ok(Event::Text(ref e)) if in_text => {
                    if let Some(last) = current_shape.as_mut().and_then(|s| s.paragraphs.last_mut()) {
                        let text = e.unescape().unwrap_or_default();
                        last.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => {
                        if let Some(shape) = current_shape.take() {
                            shapes.push(shape);
                        }
                        in_text_body = false;
                    }
                    b"txBody" => in_text_body = false,
                    b"t" => in_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
                }
                _ => {}
            }
        }

        Ok(shapes)
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_shapes() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/>
<p:txBody><a:bodyPr/><a:p><a:r><a:t>Fish &amp; chips</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>
<p:txBody><a:bodyPr/><a:p/><a:p><a:r><a:t>one</a:t></a:r><a:br/><a:r><a:t>two</a:t></a:r></a:p></p:txBody></p:sp>
</p:spTree></p:cSld></p:sld>"#;

        let shapes = DeckReader::new().extract_shapes_from_xml(xml).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].name, "Title 1");
        assert_eq!(shapes[0].placeholder_idx, Some(0));
        assert_eq!(shapes[0].paragraphs, vec!["Fish & chips"]);
        assert_eq!(shapes[1].placeholder_idx, Some(1));
        assert_eq!(shapes[1].paragraphs, vec!["", "one\ntwo"]);
    }
}
