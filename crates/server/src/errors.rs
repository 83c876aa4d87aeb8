//! Errors returned by request handlers and their HTTP responses.

use actix_web::http::StatusCode;
use actix_web::{error::BlockingError, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required data: {}.", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Could not generate slide structure from the text.")]
    NoSlides,

    #[error("Render error: {0}")]
    Render(#[from] deck_core::Error),

    #[error("Blocking task error: {0}")]
    Blocking(#[from] BlockingError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::MissingFields(_) | AppError::NoSlides => {
                log::warn!("{self}");
                self.to_string()
            }
            AppError::Render(_) => {
                log::error!("{self}");
                "Failed to render presentation from the template.".to_string()
            }
            AppError::Blocking(_) => {
                log::error!("{self}");
                "Internal Server Error".to_string()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}
