//! Slide part XML for a new slide built from a layout.

use crate::placeholder::PlaceholderInfo;
use crate::xml::{xml_safe, XmlOut, NS_MAIN_DRAWING, NS_PRESENTATION, NS_RELATIONSHIPS};
use deck_core::Result;

/// A placeholder copied onto a new slide, with the text to put in it.
#[derive(Debug, Clone)]
pub(crate) struct SlideShape<'a> {
    pub placeholder: &'a PlaceholderInfo,

    /// Paragraphs to write. `None` leaves the text frame empty.
    pub paragraphs: Option<Vec<String>>,
}

/// Serialize a slide whose shape tree holds `shapes`, in order.
pub(crate) fn write_slide(shapes: &[SlideShape<'_>]) -> Result<String> {
    let mut out = XmlOut::document()?;
    out.start(
        "p:sld",
        &[
            ("xmlns:a", NS_MAIN_DRAWING),
            ("xmlns:r", NS_RELATIONSHIPS),
            ("xmlns:p", NS_PRESENTATION),
        ],
    )?;
    out.start("p:cSld", &[])?;
    out.start("p:spTree", &[])?;

    out.start("p:nvGrpSpPr", &[])?;
    out.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    out.empty("p:cNvGrpSpPr", &[])?;
    out.empty("p:nvPr", &[])?;
    out.end("p:nvGrpSpPr")?;

    out.start("p:grpSpPr", &[])?;
    out.start("a:xfrm", &[])?;
    out.empty("a:off", &[("x", "0"), ("y", "0")])?;
    out.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    out.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    out.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    out.end("a:xfrm")?;
    out.end("p:grpSpPr")?;

    for (i, shape) in shapes.iter().enumerate() {
        write_placeholder(&mut out, i as u32 + 2, shape)?;
    }

    out.end("p:spTree")?;
    out.end("p:cSld")?;
    out.start("p:clrMapOvr", &[])?;
    out.empty("a:masterClrMapping", &[])?;
    out.end("p:clrMapOvr")?;
    out.end("p:sld")?;
    out.into_string()
}

fn write_placeholder(out: &mut XmlOut, shape_id: u32, shape: &SlideShape<'_>) -> Result<()> {
    let ph = shape.placeholder;
    let id = shape_id.to_string();
    let name = if ph.name.is_empty() {
        format!("Placeholder {}", shape_id - 1)
    } else {
        ph.name.clone()
    };

    out.start("p:sp", &[])?;
    out.start("p:nvSpPr", &[])?;
    out.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    out.start("p:cNvSpPr", &[])?;
    out.empty("a:spLocks", &[("noGrp", "1")])?;
    out.end("p:cNvSpPr")?;
    out.start("p:nvPr", &[])?;

    let idx = ph.idx.to_string();
    let mut ph_attrs: Vec<(&str, &str)> = Vec::new();
    if ph.kind != "obj" {
        ph_attrs.push(("type", ph.kind.as_str()));
    }
    if let Some(orient) = &ph.orient {
        ph_attrs.push(("orient", orient.as_str()));
    }
    if let Some(size) = &ph.size {
        ph_attrs.push(("sz", size.as_str()));
    }
    if ph.idx != 0 {
        ph_attrs.push(("idx", idx.as_str()));
    }
    out.empty("p:ph", &ph_attrs)?;

    out.end("p:nvPr")?;
    out.end("p:nvSpPr")?;
    out.empty("p:spPr", &[])?;

    if ph.supports_text() || shape.paragraphs.is_some() {
        out.start("p:txBody", &[])?;
        out.empty("a:bodyPr", &[])?;
        out.empty("a:lstStyle", &[])?;
        match shape.paragraphs.as_deref() {
            Some(paragraphs) if !paragraphs.is_empty() => {
                for text in paragraphs {
                    write_paragraph(out, text)?;
                }
            }
            _ => out.empty("a:p", &[])?,
        }
        out.end("p:txBody")?;
    }

    out.end("p:sp")
}

/// One top-level paragraph; empty text is an empty paragraph. Line feeds
/// and vertical tabs become `a:br` line breaks inside the paragraph.
fn write_paragraph(out: &mut XmlOut, text: &str) -> Result<()> {
    let text = text.replace("\r\n", "\n");
    if xml_safe(&text).is_empty() {
        return out.empty("a:p", &[]);
    }

    out.start("a:p", &[])?;
    for (i, line) in text.split(['\n', '\u{b}']).enumerate() {
        if i > 0 {
            out.empty("a:br", &[])?;
        }
        let line = xml_safe(line);
        if line.is_empty() {
            continue;
        }
        out.start("a:r", &[])?;
        out.empty("a:rPr", &[("lang", "en-US"), ("dirty", "0")])?;
        out.text_element("a:t", &line)?;
        out.end("a:r")?;
    }
    out.end("a:p")
}
