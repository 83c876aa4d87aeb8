//! Rendering slide records into fixture templates and reading them back.

use deck_core::{Error, SlideContent, SlideRecord};
use deck_pptx::fixtures::{LayoutSpec, PlaceholderSpec, TemplateBuilder};
use deck_pptx::{DeckReader, DeckRenderer, DeckSummary, TemplateDocument};
use std::io::{Cursor, Read};

const TITLE_LAYOUT: &str = "ppt/slideLayouts/slideLayout1.xml";
const CONTENT_LAYOUT: &str = "ppt/slideLayouts/slideLayout2.xml";

fn render(template: &TemplateBuilder, slides: &[SlideRecord]) -> DeckSummary {
    let template = template.build().expect("fixture template");
    let output = DeckRenderer::new()
        .render(Cursor::new(template), slides)
        .expect("render");
    DeckReader::new().read(Cursor::new(output)).expect("read back")
}

fn records(n: usize) -> Vec<SlideRecord> {
    (1..=n)
        .map(|i| SlideRecord::new(format!("Title {}", i), [format!("Point {}a", i), format!("Point {}b", i)]))
        .collect()
}

fn strings(paragraphs: Option<&[String]>) -> Vec<&str> {
    paragraphs
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .collect()
}

#[test]
fn test_template_layouts_are_discovered() {
    let bytes = TemplateBuilder::standard().build().unwrap();
    let template = TemplateDocument::open(Cursor::new(bytes)).unwrap();

    let names: Vec<_> = template.layouts().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Title Slide", "Title and Content"]);
    assert_eq!(template.layouts()[1].part_name, CONTENT_LAYOUT);
    assert_eq!(template.slide_count(), 0);
}

#[test]
fn test_slide_count_matches_records() {
    for n in [0, 1, 5] {
        let deck = render(&TemplateBuilder::standard(), &records(n));
        assert_eq!(deck.slides.len(), n, "rendering {} records", n);
    }
}

#[test]
fn test_first_slide_uses_title_layout_rest_use_second() {
    let deck = render(&TemplateBuilder::standard(), &records(3));

    let layouts: Vec<_> = deck
        .slides
        .iter()
        .map(|s| s.layout_part.as_deref().unwrap())
        .collect();
    assert_eq!(layouts, vec![TITLE_LAYOUT, CONTENT_LAYOUT, CONTENT_LAYOUT]);
}

#[test]
fn test_single_layout_is_reused() {
    let deck = render(&TemplateBuilder::single_layout(), &records(3));

    assert!(deck
        .slides
        .iter()
        .all(|s| s.layout_part.as_deref() == Some(TITLE_LAYOUT)));
}

#[test]
fn test_title_and_bullets_are_written() {
    let deck = render(&TemplateBuilder::standard(), &records(2));

    let first = &deck.slides[0];
    assert_eq!(strings(first.title()), vec!["Title 1"]);
    // The subtitle holds idx 1 on the title layout.
    assert_eq!(strings(first.placeholder(1)), vec!["Point 1a", "Point 1b"]);

    let second = &deck.slides[1];
    assert_eq!(strings(second.title()), vec!["Title 2"]);
    assert_eq!(
        strings(second.shape("Content Placeholder 2")),
        vec!["Point 2a", "Point 2b"]
    );
}

#[test]
fn test_footer_placeholders_are_not_cloned() {
    let deck = render(&TemplateBuilder::standard(), &records(2));

    let names: Vec<_> = deck.slides[1].shapes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Title 1", "Content Placeholder 2"]);
    assert!(deck.slides[0].shape("Date Placeholder 3").is_none());
}

#[test]
fn test_missing_title_uses_default() {
    let record = SlideRecord {
        title: None,
        content: SlideContent::Text("Only paragraph".to_string()),
    };
    let deck = render(&TemplateBuilder::standard(), &[record]);

    assert_eq!(strings(deck.slides[0].title()), vec!["Untitled Slide"]);
    assert_eq!(strings(deck.slides[0].placeholder(1)), vec!["Only paragraph"]);
}

#[test]
fn test_empty_bullet_and_escaping() {
    let slides = vec![
        SlideRecord::new("Slide 1: Intro", [""]),
        SlideRecord::new("R&D <2025>", ["a < b & c", "\"quoted\""]),
    ];
    let deck = render(&TemplateBuilder::standard(), &slides);

    assert_eq!(strings(deck.slides[0].placeholder(1)), vec![""]);
    assert_eq!(strings(deck.slides[1].title()), vec!["R&D <2025>"]);
    assert_eq!(
        strings(deck.slides[1].placeholder(1)),
        vec!["a < b & c", "\"quoted\""]
    );
}

#[test]
fn test_line_feed_in_bullet_stays_in_one_paragraph() {
    let slides = vec![SlideRecord::new("Intro", ["first line\nsecond line", "next"])];
    let deck = render(&TemplateBuilder::standard(), &slides);

    assert_eq!(
        strings(deck.slides[0].placeholder(1)),
        vec!["first line\nsecond line", "next"]
    );
}

#[test]
fn test_body_found_by_name_heuristic() {
    let template = TemplateBuilder::new().layout(LayoutSpec::new(
        "Custom",
        vec![
            PlaceholderSpec::new("Heading", Some("title"), None),
            PlaceholderSpec::new("Image", Some("pic"), Some(13)),
            PlaceholderSpec::new("Main Body", Some("body"), Some(14)),
        ],
    ));
    let deck = render(&template, &records(1));

    assert_eq!(strings(deck.slides[0].shape("Main Body")), vec!["Point 1a", "Point 1b"]);
    assert!(strings(deck.slides[0].shape("Image")).is_empty());
}

#[test]
fn test_body_found_by_free_text_rule() {
    let template = TemplateBuilder::new().layout(LayoutSpec::new(
        "Quote",
        vec![
            PlaceholderSpec::new("Heading", Some("title"), None),
            PlaceholderSpec::new("Quote Text", Some("subTitle"), Some(20)),
        ],
    ));
    let deck = render(&template, &records(1));

    assert_eq!(strings(deck.slides[0].shape("Quote Text")), vec!["Point 1a", "Point 1b"]);
}

#[test]
fn test_title_only_layout_skips_body() {
    let template = TemplateBuilder::new().layout(LayoutSpec::new(
        "Title Only",
        vec![PlaceholderSpec::new("Title 1", Some("title"), None)],
    ));
    let deck = render(&template, &records(2));

    assert_eq!(deck.slides.len(), 2);
    assert_eq!(strings(deck.slides[1].title()), vec!["Title 2"]);
    assert_eq!(deck.slides[1].shapes.len(), 1);
}

#[test]
fn test_existing_slides_are_kept_first() {
    let deck = render(&TemplateBuilder::standard().existing_slides(2), &records(2));

    assert_eq!(deck.slides.len(), 4);
    assert_eq!(strings(deck.slides[0].title()), vec!["Existing 1"]);
    assert_eq!(strings(deck.slides[1].title()), vec!["Existing 2"]);
    assert_eq!(strings(deck.slides[2].title()), vec!["Title 1"]);
    assert_eq!(deck.slides[2].part_name, "ppt/slides/slide3.xml");
    assert_eq!(deck.slides[3].layout_part.as_deref(), Some(CONTENT_LAYOUT));
}

#[test]
fn test_zero_records_leave_existing_slides_alone() {
    let deck = render(&TemplateBuilder::standard().existing_slides(1), &[]);
    assert_eq!(deck.slides.len(), 1);
    assert_eq!(strings(deck.slides[0].title()), vec!["Existing 1"]);
}

#[test]
fn test_last_valid_slide_id_is_used() {
    let template = TemplateBuilder::standard()
        .existing_slides(1)
        .first_slide_id(2_147_483_646);
    let deck = render(&template, &records(1));
    assert_eq!(deck.slides.len(), 2);
}

#[test]
fn test_exhausted_slide_ids_are_an_error() {
    for first_id in [2_147_483_646, 2_147_483_647, u32::MAX] {
        let template = TemplateBuilder::standard()
            .existing_slides(1)
            .first_slide_id(first_id)
            .build()
            .unwrap();
        let result = DeckRenderer::new().render(Cursor::new(template), &records(2));
        assert!(
            matches!(result, Err(Error::InvalidTemplate(_))),
            "first slide id {}",
            first_id
        );
    }
}

#[test]
fn test_exhausted_slide_ids_allow_zero_records() {
    let deck = render(
        &TemplateBuilder::standard().existing_slides(1).first_slide_id(u32::MAX),
        &[],
    );
    assert_eq!(deck.slides.len(), 1);
}

#[test]
fn test_no_layouts_is_an_error() {
    let template = TemplateBuilder::new().build().unwrap();
    let result = DeckRenderer::new().render(Cursor::new(template), &records(1));
    assert!(matches!(result, Err(Error::NoLayouts)));
}

#[test]
fn test_not_a_zip_is_an_error() {
    let result = DeckRenderer::new().render(Cursor::new(b"plain text".to_vec()), &records(1));
    assert!(matches!(result, Err(Error::ZipError(_))));
}

#[test]
fn test_content_types_list_new_slides() {
    let template = TemplateBuilder::standard().as_template().build().unwrap();
    let output = DeckRenderer::new()
        .render(Cursor::new(template), &records(2))
        .unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(output)).unwrap();
    let mut content_types = String::new();
    archive
        .by_name("[Content_Types].xml")
        .unwrap()
        .read_to_string(&mut content_types)
        .unwrap();

    assert!(content_types.contains(r#"<Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#));
    assert!(content_types.contains("/ppt/slides/slide2.xml"));
    assert!(content_types.contains("presentationml.presentation.main+xml"));
    assert!(!content_types.contains("presentationml.template.main+xml"));
}
