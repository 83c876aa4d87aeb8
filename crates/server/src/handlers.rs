//! HTTP handlers: the upload form and deck generation.

use crate::config::ServerConfig;
use crate::errors::AppError;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use deck_core::plan_slides;
use deck_gemini::{GeminiConfig, GeminiStructurer};
use deck_pptx::{DeckRenderer, PPTX_MIME_TYPE};
use tempfile::NamedTempFile;

/// File name offered for the generated deck.
pub const DOWNLOAD_NAME: &str = "generated_presentation.pptx";

/// Fields of the `/generate` form. All are optional at the extractor level so
/// that missing ones can be reported together.
#[derive(MultipartForm)]
pub struct GenerateForm {
    pub text: Option<Text<String>>,
    pub guidance: Option<Text<String>>,
    pub template: Option<TempFile>,
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../static/index.html"))
}

pub async fn script() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(include_str!("../static/script.js"))
}

pub async fn generate(
    config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<GenerateForm>,
) -> Result<HttpResponse, AppError> {
    let text = form.text.map(|t| t.0);
    let guidance = form.guidance.map(|g| g.0).unwrap_or_default();
    // Browsers submit an empty part when no file was picked.
    let template = form.template.filter(|t| t.size > 0);
    let gemini = config.gemini();

    let (text, template, gemini) = match (text, template, gemini) {
        (Some(text), Some(template), Some(gemini)) => (text, template, gemini),
        (text, template, gemini) => {
            let missing = [
                ("text", text.is_some()),
                ("template", template.is_some()),
                ("API key", gemini.is_some()),
            ]
            .into_iter()
            .filter_map(|(name, present)| (!present).then_some(name))
            .collect();
            return Err(AppError::MissingFields(missing));
        }
    };

    log::info!(
        "Generating deck from {} characters of text with template {:?} ({} bytes)",
        text.len(),
        template.file_name.as_deref().unwrap_or("<unnamed>"),
        template.size
    );

    let (template, deck) = web::block(move || {
        let deck = build_deck(gemini, &text, &guidance, &template.file);
        (template, deck)
    })
    .await?;

    if let Err(e) = template.file.close() {
        log::warn!("Failed to remove uploaded template: {}", e);
    }
    let deck = deck?;

    Ok(HttpResponse::Ok()
        .content_type(PPTX_MIME_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(DOWNLOAD_NAME.to_string())],
        })
        .body(deck))
}

/// Plan slides for `text` and render them into the uploaded template.
fn build_deck(
    gemini: GeminiConfig,
    text: &str,
    guidance: &str,
    template: &NamedTempFile,
) -> Result<Vec<u8>, AppError> {
    let structurer = GeminiStructurer::new(gemini);
    let plan = plan_slides(Some(&structurer), text, guidance);
    if plan.is_empty() {
        return Err(AppError::NoSlides);
    }
    log::info!("Rendering {} slides ({:?})", plan.slides.len(), plan.source);

    let file = template.reopen().map_err(deck_core::Error::from)?;
    Ok(DeckRenderer::new().render(file, &plan.slides)?)
}
