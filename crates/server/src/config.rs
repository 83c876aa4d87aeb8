//! Server configuration from flags and environment.

use clap::Parser;
use deck_gemini::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use std::path::PathBuf;

/// Serve the text-to-deck upload form.
#[derive(Parser, Debug, Clone)]
#[command(name = "deck-server")]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "DECK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Directory for uploaded templates (default: <system temp>/uploads)
    #[arg(long, env = "DECK_UPLOAD_ROOT")]
    pub upload_root: Option<PathBuf>,

    /// Gemini API key; generation is refused without one
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Largest accepted upload, in megabytes
    #[arg(long, env = "DECK_MAX_UPLOAD_MB", default_value_t = 50)]
    pub max_upload_mb: usize,
}

impl ServerConfig {
    /// Where uploaded templates are written.
    pub fn upload_root(&self) -> PathBuf {
        self.upload_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("uploads"))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Gemini settings, or `None` when no usable API key is configured.
    pub fn gemini(&self) -> Option<GeminiConfig> {
        let key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(
            GeminiConfig::new(key)
                .with_model(&self.model)
                .with_api_base(&self.api_base),
        )
    }
}
