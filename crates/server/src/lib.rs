//! Web front end: upload text and a template, download a generated deck.

pub mod config;
pub mod errors;
pub mod handlers;

pub use config::ServerConfig;
pub use errors::AppError;

use actix_multipart::form::tempfile::TempFileConfig;
use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

/// Register shared state and routes.
pub fn configure(cfg: &mut web::ServiceConfig, config: &web::Data<ServerConfig>) {
    let limit = config.max_upload_bytes();

    cfg.app_data(config.clone())
        .app_data(TempFileConfig::default().directory(config.upload_root()))
        .app_data(
            MultipartFormConfig::default()
                .total_limit(limit)
                .memory_limit(limit),
        )
        .route("/", web::get().to(handlers::index))
        .route("/static/script.js", web::get().to(handlers::script))
        .route("/generate", web::post().to(handlers::generate));
}
