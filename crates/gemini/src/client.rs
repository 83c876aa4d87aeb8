//! Blocking Gemini client implementing [`SlideStructurer`].

use crate::error::{Result, StructuringError};
use crate::prompt::build_prompt;
use crate::types::{GenerateContentRequest, GenerateContentResponse};
use deck_core::{parse_slide_records, SlideRecord, SlideStructurer};
use std::time::Duration;

/// Public Gemini REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Settings for the public endpoint and default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// Asks Gemini to structure text into slides.
///
/// Uses the blocking reqwest client; call it from a blocking context.
pub struct GeminiStructurer {
    config: GeminiConfig,
}

impl GeminiStructurer {
    pub fn new(config: GeminiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// One structuring attempt, reporting why it failed.
    pub fn try_structure(&self, text: &str, guidance: &str) -> Result<Vec<SlideRecord>> {
        let reply = self.generate(&build_prompt(text, guidance))?;
        if reply.trim().is_empty() {
            return Err(StructuringError::EmptyReply);
        }

        parse_slide_records(&reply).map_err(|e| {
            log::debug!("Raw model reply: {}", reply);
            StructuringError::from(e)
        })
    }

    /// Send `prompt` and return the reply text.
    fn generate(&self, prompt: &str) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()?;

        let url = self.config.endpoint();
        log::debug!("Requesting slide structure from {}", url);

        let response = client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StructuringError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateContentResponse = response.json()?;
        Ok(response.text())
    }
}

impl SlideStructurer for GeminiStructurer {
    fn structure(&self, text: &str, guidance: &str) -> Option<Vec<SlideRecord>> {
        match self.try_structure(text, guidance) {
            Ok(slides) => Some(slides),
            Err(e) => {
                log::warn!("Slide structuring with {} failed: {}", self.config.model, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable() -> GeminiStructurer {
        GeminiStructurer::new(
            GeminiConfig::new("test-key")
                .with_api_base("http://127.0.0.1:1")
                .with_timeout(Duration::from_secs(2)),
        )
    }

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("k");
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );

        let config = config.with_api_base("http://localhost:9000/").with_model("gemini-pro");
        assert_eq!(config.endpoint(), "http://localhost:9000/models/gemini-pro:generateContent");
    }

    #[test]
    fn test_unreachable_api_is_an_http_error() {
        let result = unreachable().try_structure("Some text", "");
        assert!(matches!(result, Err(StructuringError::Http(_))));
    }

    #[test]
    fn test_failure_is_absorbed_by_structurer() {
        assert!(unreachable().structure("Some text", "").is_none());
    }
}
