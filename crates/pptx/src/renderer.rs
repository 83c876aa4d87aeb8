//! Deck rendering: one new slide per record, appended to a copy of the template.

use crate::package::{
    next_relationship_id, rels_part_name, relative_target, trailing_number, write_relationship,
    write_relationships, Package, Relationship, CONTENT_TYPES_PART, CT_PRESENTATION_MAIN,
    CT_SLIDE, CT_TEMPLATE_MAIN, RT_SLIDE, RT_SLIDE_LAYOUT,
};
use crate::placeholder::{select_body, title_position, PlaceholderInfo};
use crate::slide::{write_slide, SlideShape};
use crate::template::{SlideLayout, TemplateDocument};
use crate::xml::{
    append_children, attribute, for_each_element, local_name, prefix_of, rewrite, Flow, XmlOut,
    NS_RELATIONSHIPS,
};
use deck_core::{Error, Result, SlideRecord};
use quick_xml::events::Event;
use std::io::{Read, Seek};

/// Lowest slide id PowerPoint accepts.
const MIN_SLIDE_ID: u32 = 256;

/// Highest valid slide id (`ST_SlideId`).
const MAX_SLIDE_ID: u32 = 2_147_483_647;

/// Children of `p:presentation` that come before `p:sldIdLst`.
const BEFORE_SLIDE_ID_LIST: &[&[u8]] = &[b"sldMasterIdLst", b"notesMasterIdLst", b"handoutMasterIdLst"];

/// Renders slide records into a presentation built from a template.
#[derive(Debug, Clone, Default)]
pub struct DeckRenderer;

/// A slide part added to the package, still to be listed in the presentation.
struct AddedSlide {
    part_name: String,
    relationship: Relationship,
    slide_id: u32,
}

impl DeckRenderer {
    /// Create a new renderer.
    pub fn new() -> Self {
        Self
    }

    /// Open `template` and render `slides` into a new .pptx.
    pub fn render<R: Read + Seek>(&self, template: R, slides: &[SlideRecord]) -> Result<Vec<u8>> {
        let template = TemplateDocument::open(template)?;
        self.render_document(template, slides)
    }

    /// Render `slides` after the template's existing slides.
    ///
    /// Fails with [`Error::NoLayouts`] when the template defines no layouts,
    /// even if there is nothing to add.
    pub fn render_document(
        &self,
        template: TemplateDocument,
        slides: &[SlideRecord],
    ) -> Result<Vec<u8>> {
        if template.layouts().is_empty() {
            return Err(Error::NoLayouts);
        }

        let presentation_part = template.presentation_part().to_string();
        let mut all_rels = template.package().relationships(&presentation_part)?;
        let mut next_id = match template.slide_ids().iter().map(|(id, _)| *id).max() {
            Some(max) => max.checked_add(1).map(|id| id.max(MIN_SLIDE_ID)),
            None => Some(MIN_SLIDE_ID),
        };

        let mut built = Vec::with_capacity(slides.len());
        for (i, record) in slides.iter().enumerate() {
            let layout = template.layout_for_slide(i)?;
            built.push((layout.part_name.clone(), build_slide(i, record, layout)?));
        }

        let mut package = template.into_package();
        let mut added = Vec::with_capacity(built.len());
        for (layout_part, slide_xml) in built {
            let slide_id = next_id.filter(|id| *id <= MAX_SLIDE_ID).ok_or_else(|| {
                Error::InvalidTemplate(format!("Slide ids exhausted (maximum {})", MAX_SLIDE_ID))
            })?;
            next_id = slide_id.checked_add(1);
            let part_name = next_slide_part(&package);

            let layout_rel = Relationship {
                id: "rId1".to_string(),
                rel_type: RT_SLIDE_LAYOUT.to_string(),
                target: relative_target(&part_name, &layout_part),
                external: false,
            };
            package.set_part(
                rels_part_name(&part_name),
                write_relationships(&[layout_rel])?.into_bytes(),
            );
            package.set_part(part_name.clone(), slide_xml.into_bytes());

            let relationship = Relationship {
                id: next_relationship_id(&all_rels),
                rel_type: RT_SLIDE.to_string(),
                target: relative_target(&presentation_part, &part_name),
                external: false,
            };
            all_rels.push(relationship.clone());

            added.push(AddedSlide {
                part_name,
                relationship,
                slide_id,
            });
        }

        if !added.is_empty() {
            register_slides(&mut package, &presentation_part, &added)?;
        }
        fix_main_content_type(&mut package)?;

        log::info!("Rendered {} slides", added.len());
        package.to_bytes()
    }
}

/// Build the XML for slide `index` from `layout`.
fn build_slide(index: usize, record: &SlideRecord, layout: &SlideLayout) -> Result<String> {
    let placeholders: Vec<PlaceholderInfo> = layout
        .placeholders
        .iter()
        .filter(|ph| ph.is_cloneable())
        .cloned()
        .collect();

    let mut shapes: Vec<SlideShape<'_>> = placeholders
        .iter()
        .map(|placeholder| SlideShape {
            placeholder,
            paragraphs: None,
        })
        .collect();

    let title = title_position(&placeholders);
    if let Some(pos) = title {
        shapes[pos].paragraphs = Some(
            record
                .display_title()
                .split('\n')
                .map(str::to_string)
                .collect(),
        );
    }

    match select_body(&placeholders, title) {
        Some((pos, rule)) => {
            log::debug!(
                "Slide {}: body placeholder '{}' chosen by {:?}",
                index + 1,
                placeholders[pos].name,
                rule
            );
            shapes[pos].paragraphs = Some(
                record
                    .content
                    .paragraphs()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            );
        }
        None => log::warn!(
            "Could not find a content placeholder for slide {} (layout '{}')",
            index + 1,
            layout.name
        ),
    }

    write_slide(&shapes)
}

/// First `ppt/slides/slideN.xml` above every slide part in the package.
fn next_slide_part(package: &Package) -> String {
    let max = package
        .part_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .filter_map(trailing_number)
        .max()
        .unwrap_or(0);
    format!("ppt/slides/slide{}.xml", max + 1)
}

/// List the new slides in the presentation rels, `p:sldIdLst` and content types.
fn register_slides(package: &mut Package, presentation_part: &str, added: &[AddedSlide]) -> Result<()> {
    let rels_part = rels_part_name(presentation_part);
    let rels_xml = if package.contains(&rels_part) {
        append_children(package.xml_part(&rels_part)?, b"Relationships", |out, prefix| {
            added
                .iter()
                .try_for_each(|slide| write_relationship(out, prefix, &slide.relationship))
        })?
    } else {
        let rels: Vec<Relationship> = added.iter().map(|s| s.relationship.clone()).collect();
        write_relationships(&rels)?
    };
    package.set_part(rels_part, rels_xml.into_bytes());

    let presentation_xml = add_slide_ids(package.xml_part(presentation_part)?, added)?;
    package.set_part(presentation_part, presentation_xml.into_bytes());

    let content_types =
        append_children(package.xml_part(CONTENT_TYPES_PART)?, b"Types", |out, prefix| {
            let name = format!("{}Override", prefix);
            added.iter().try_for_each(|slide| {
                let part_name = format!("/{}", slide.part_name);
                out.empty(&name, &[("PartName", part_name.as_str()), ("ContentType", CT_SLIDE)])
            })
        })?;
    package.set_part(CONTENT_TYPES_PART, content_types.into_bytes());

    Ok(())
}

/// Append `p:sldId` entries, creating `p:sldIdLst` in schema order if needed.
fn add_slide_ids(xml: &str, added: &[AddedSlide]) -> Result<String> {
    let mut has_list = false;
    let mut rel_prefix = None;
    for_each_element(xml, |e| {
        has_list |= local_name(e.name().as_ref()) == b"sldIdLst";
        if rel_prefix.is_none() {
            rel_prefix = e.attributes().flatten().find_map(|attr| {
                let prefix = attr.key.as_ref().strip_prefix(b"xmlns:")?;
                (attr.value.as_ref() == NS_RELATIONSHIPS.as_bytes())
                    .then(|| String::from_utf8_lossy(prefix).into_owned())
            });
        }
    })?;
    let rid_key = format!("{}:id", rel_prefix.as_deref().unwrap_or("r"));

    let write_ids = |out: &mut XmlOut, prefix: &str| -> Result<()> {
        let name = format!("{}sldId", prefix);
        added.iter().try_for_each(|slide| {
            let id = slide.slide_id.to_string();
            out.empty(
                &name,
                &[("id", id.as_str()), (rid_key.as_str(), slide.relationship.id.as_str())],
            )
        })
    };

    if has_list {
        return append_children(xml, b"sldIdLst", &write_ids);
    }

    // No list yet: open one before the first root child that must follow it.
    let mut inserted = false;
    let rewritten = rewrite(xml, |event, depth, out| {
        if inserted {
            return Ok(Flow::Keep);
        }
        let name = match event {
            Event::Start(e) | Event::Empty(e)
                if depth == 2 && !BEFORE_SLIDE_ID_LIST.contains(&local_name(e.name().as_ref())) =>
            {
                e.name().as_ref().to_vec()
            }
            Event::End(e) if depth == 1 => e.name().as_ref().to_vec(),
            _ => return Ok(Flow::Keep),
        };

        let prefix = prefix_of(&name);
        let list = format!("{}sldIdLst", prefix);
        out.start(&list, &[])?;
        write_ids(out, &prefix)?;
        out.end(&list)?;
        inserted = true;
        Ok(Flow::Keep)
    })?;

    if !inserted {
        return Err(Error::InvalidTemplate(
            "Presentation part has no root element".to_string(),
        ));
    }
    Ok(rewritten)
}

/// Make a .potx template's main part a presentation so the output opens as .pptx.
fn fix_main_content_type(package: &mut Package) -> Result<()> {
    let xml = package.xml_part(CONTENT_TYPES_PART)?;
    if !xml.contains(CT_TEMPLATE_MAIN) {
        return Ok(());
    }

    let fixed = rewrite(xml, |event, _, out| match event {
        Event::Empty(e)
            if local_name(e.name().as_ref()) == b"Override"
                && attribute(e, b"ContentType").as_deref() == Some(CT_TEMPLATE_MAIN) =>
        {
            let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
            let part_name = attribute(e, b"PartName").unwrap_or_default();
            out.empty(
                &name,
                &[("PartName", part_name.as_str()), ("ContentType", CT_PRESENTATION_MAIN)],
            )?;
            Ok(Flow::Replaced)
        }
        _ => Ok(Flow::Keep),
    })?;

    log::debug!("Converted template main part to a presentation");
    package.set_part(CONTENT_TYPES_PART, fixed.into_bytes());
    Ok(())
}
