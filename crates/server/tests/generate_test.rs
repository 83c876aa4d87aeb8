mod common;

use actix_web::http::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{file_count, template_bytes, test_config, MultipartBody};
use deck_gemini::stub::StubServer;
use deck_pptx::{DeckReader, PPTX_MIME_TYPE};
use deck_server::ServerConfig;
use std::io::Cursor;
use tempfile::TempDir;

struct Reply {
    status: StatusCode,
    body: Vec<u8>,
    content_type: Option<String>,
    disposition: Option<String>,
}

impl Reply {
    fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("utf-8 body")
    }
}

/// Post `body` to `/generate` on a fresh app.
async fn post_generate(config: ServerConfig, body: MultipartBody) -> Reply {
    let config = web::Data::new(config);
    let app =
        test::init_service(App::new().configure(|cfg| deck_server::configure(cfg, &config))).await;

    let (content_type, payload) = body.finish();
    let req = test::TestRequest::post()
        .uri("/generate")
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    let header = |name: HeaderName| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header(CONTENT_TYPE);
    let disposition = header(CONTENT_DISPOSITION);
    let status = resp.status();

    Reply {
        status,
        body: test::read_body(resp).await.to_vec(),
        content_type,
        disposition,
    }
}

#[actix_web::test]
async fn test_index_serves_form() {
    let dir = TempDir::new().unwrap();
    let config = web::Data::new(test_config(dir.path(), None));
    let app = test::init_service(App::new().configure(|cfg| deck_server::configure(cfg, &config))).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains(r#"action="/generate""#));
    assert!(html.contains(r#"name="template""#));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/static/script.js").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_missing_template_is_rejected() {
    let dir = TempDir::new().unwrap();
    let body = MultipartBody::new().text("text", "Hello").text("guidance", "");

    let reply = post_generate(test_config(dir.path(), Some("key")), body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.text(), "Missing required data: template.");
}

#[actix_web::test]
async fn test_missing_api_key_is_rejected_and_upload_removed() {
    let dir = TempDir::new().unwrap();
    let body = MultipartBody::new()
        .text("text", "Hello")
        .file("template", "deck.pptx", &template_bytes());

    let reply = post_generate(test_config(dir.path(), None), body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.text(), "Missing required data: API key.");
    assert_eq!(file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_all_missing_fields_are_listed() {
    let dir = TempDir::new().unwrap();
    let body = MultipartBody::new()
        .text("guidance", "formal")
        .file("template", "empty.pptx", b"");

    let reply = post_generate(test_config(dir.path(), None), body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.text(), "Missing required data: text, template, API key.");
}

#[actix_web::test]
async fn test_fallback_deck_is_generated() {
    let dir = TempDir::new().unwrap();
    let body = MultipartBody::new()
        .text("text", "Intro\nWelcome.")
        .text("guidance", "")
        .file("template", "deck.pptx", &template_bytes());

    let reply = post_generate(test_config(dir.path(), Some("key")), body).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type.as_deref(), Some(PPTX_MIME_TYPE));
    assert_eq!(
        reply.disposition.as_deref(),
        Some(r#"attachment; filename="generated_presentation.pptx""#)
    );

    let deck = DeckReader::new().read(Cursor::new(reply.body)).unwrap();
    assert_eq!(deck.slides.len(), 1);
    assert_eq!(deck.slides[0].title(), Some(&["Slide 1: Intro".to_string()][..]));
    assert_eq!(deck.slides[0].placeholder(1), Some(&["Welcome.".to_string()][..]));
    assert_eq!(file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_blank_text_cannot_be_structured() {
    let dir = TempDir::new().unwrap();
    let body = MultipartBody::new()
        .text("text", "  \n\n  ")
        .file("template", "deck.pptx", &template_bytes());

    let reply = post_generate(test_config(dir.path(), Some("key")), body).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.text(), "Could not generate slide structure from the text.");
    assert_eq!(file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_unreadable_template_fails_to_render() {
    let dir = TempDir::new().unwrap();
    let body = MultipartBody::new()
        .text("text", "Intro\nWelcome.")
        .file("template", "notes.txt", b"not a presentation");

    let reply = post_generate(test_config(dir.path(), Some("key")), body).await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.text(), "Failed to render presentation from the template.");
    assert_eq!(file_count(dir.path()), 0);
}

#[actix_web::test]
async fn test_model_slides_are_rendered() {
    let dir = TempDir::new().unwrap();
    let model = StubServer::replying(
        r#"```json
[{"title": "Agenda", "content": ["Goals", "Timeline"]},
 {"title": "Goals", "content": ["Ship it"]}]
```"#,
    )
    .unwrap();
    let mut config = test_config(dir.path(), Some("key"));
    config.api_base = model.api_base();

    let body = MultipartBody::new()
        .text("text", "Our plan for the quarter.")
        .text("guidance", "short")
        .file("template", "deck.pptx", &template_bytes());

    let reply = post_generate(config, body).await;
    assert_eq!(reply.status, StatusCode::OK);

    let deck = DeckReader::new().read(Cursor::new(reply.body)).unwrap();
    assert_eq!(deck.slides.len(), 2);
    assert_eq!(deck.slides[0].title(), Some(&["Agenda".to_string()][..]));
    assert_eq!(
        deck.slides[0].placeholder(1),
        Some(&["Goals".to_string(), "Timeline".to_string()][..])
    );
    assert_eq!(deck.slides[1].title(), Some(&["Goals".to_string()][..]));
    assert_eq!(model.requests().len(), 1);
    assert_eq!(file_count(dir.path()), 0);
}
