//! Small helpers over quick-xml for reading attributes, writing new parts
//! and splicing elements into existing parts without disturbing the rest.

use deck_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

pub(crate) const NS_MAIN_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(crate) const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

pub(crate) fn xml_err(e: impl Display) -> Error {
    Error::XmlError(e.to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// The namespace prefix of a qualified name, with its trailing colon
/// (`"p:"` for `p:sldIdLst`), or empty when unprefixed.
pub(crate) fn prefix_of(name: &[u8]) -> String {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => format!("{}:", String::from_utf8_lossy(&name[..pos])),
        None => String::new(),
    }
}

/// Value of the attribute whose full key is `key`.
pub(crate) fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// Value of a namespaced relationship id attribute such as `r:id`.
pub(crate) fn relationship_id(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| {
            let key = attr.key.as_ref();
            key.contains(&b':') && local_name(key) == b"id"
        })
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Drop characters that XML 1.0 cannot carry.
pub(crate) fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}'))
        .collect()
}

/// Call `f` for every start or empty element in `xml`.
pub(crate) fn for_each_element<F>(xml: &str, mut f: F) -> Result<()>
where
    F: FnMut(&BytesStart<'_>),
{
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => f(e),
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err(e)),
            _ => {}
        }
    }

    Ok(())
}

/// Thin writer for building new XML parts.
pub(crate) struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    /// Start a standalone OOXML document.
    pub(crate) fn document() -> Result<Self> {
        let mut out = Self::fragment();
        out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(out)
    }

    /// Start a bare fragment, used when splicing into an existing part.
    pub(crate) fn fragment() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    pub(crate) fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(xml_err)
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut e = BytesStart::new(name);
        for &attr in attrs {
            e.push_attribute(attr);
        }
        self.event(Event::Start(e))
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut e = BytesStart::new(name);
        for &attr in attrs {
            e.push_attribute(attr);
        }
        self.event(Event::Empty(e))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    /// Write `<name>text</name>`.
    pub(crate) fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(xml_err)
    }
}

/// What to do with the original event after a rewrite callback ran.
pub(crate) enum Flow {
    /// Copy the original event to the output.
    Keep,
    /// The callback wrote its own replacement; drop the original.
    Replaced,
}

/// Stream `xml` through `on_event`, copying every event it keeps.
///
/// The callback sees each event with its element depth (the root element is
/// depth 1) and may write extra events before it returns.
pub(crate) fn rewrite<F>(xml: &str, mut on_event: F) -> Result<String>
where
    F: FnMut(&Event<'_>, usize, &mut XmlOut) -> Result<Flow>,
{
    let mut reader = Reader::from_str(xml);
    let mut out = XmlOut::fragment();
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(xml_err)?;
        let level = match &event {
            Event::Start(_) => {
                depth += 1;
                depth
            }
            Event::End(_) => {
                let level = depth;
                depth = depth.saturating_sub(1);
                level
            }
            Event::Empty(_) => depth + 1,
            Event::Eof => break,
            _ => depth,
        };

        if let Flow::Keep = on_event(&event, level, &mut out)? {
            out.event(event)?;
        }
    }

    out.into_string()
}

/// Append children to the first element named `parent` (by local name).
///
/// `children` receives the parent's namespace prefix. A self-closing parent is
/// expanded. Fails when the element does not exist.
pub(crate) fn append_children<F>(xml: &str, parent: &[u8], mut children: F) -> Result<String>
where
    F: FnMut(&mut XmlOut, &str) -> Result<()>,
{
    let mut done = false;
    let rewritten = rewrite(xml, |event, _, out| {
        if done {
            return Ok(Flow::Keep);
        }
        match event {
            Event::End(e) if local_name(e.name().as_ref()) == parent => {
                children(out, &prefix_of(e.name().as_ref()))?;
                done = true;
                Ok(Flow::Keep)
            }
            Event::Empty(e) if local_name(e.name().as_ref()) == parent => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                out.event(Event::Start(e.clone()))?;
                children(out, &prefix_of(e.name().as_ref()))?;
                out.end(&name)?;
                done = true;
                Ok(Flow::Replaced)
            }
            _ => Ok(Flow::Keep),
        }
    })?;

    if !done {
        return Err(Error::XmlError(format!(
            "Element '{}' not found",
            String::from_utf8_lossy(parent)
        )));
    }
    Ok(rewritten)
}
