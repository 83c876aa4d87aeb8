//! Shared helpers for server integration tests.

use deck_pptx::fixtures::TemplateBuilder;
use deck_server::ServerConfig;
use std::path::Path;

pub const BOUNDARY: &str = "deck-test-boundary-7MA4YWxkTrZu0gW";

/// An API base nothing listens on, so every model call fails fast.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:1";

/// Config for a test server writing uploads under `upload_root`.
pub fn test_config(upload_root: &Path, api_key: Option<&str>) -> ServerConfig {
    ServerConfig {
        bind: "127.0.0.1:0".to_string(),
        upload_root: Some(upload_root.to_path_buf()),
        api_key: api_key.map(str::to_string),
        model: "gemini-1.5-flash".to_string(),
        api_base: UNREACHABLE_API.to_string(),
        max_upload_mb: 5,
    }
}

/// A two-layout template package.
pub fn template_bytes() -> Vec<u8> {
    TemplateBuilder::standard()
        .build()
        .expect("Failed to build fixture template")
}

/// Builds a `multipart/form-data` request body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// The content type header value and the finished body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}

/// Number of entries left in `dir`.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("Failed to read upload dir")
        .count()
}
