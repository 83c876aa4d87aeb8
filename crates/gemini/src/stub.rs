//! A canned-reply HTTP server standing in for the Gemini API in tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Answers every request with the same status and body, recording requests.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Start serving `body` with `status` on a free local port.
    pub fn start(status: u16, body: impl Into<String>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let body = body.into();

        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                if let Err(e) = answer(stream, status, &body, &seen) {
                    log::warn!("Stub server failed to answer: {}", e);
                }
            }
        });

        Ok(Self { addr, requests })
    }

    /// Answer with a 200 `generateContent` envelope carrying `text`.
    pub fn replying(text: &str) -> std::io::Result<Self> {
        Self::start(200, reply_envelope(text))
    }

    /// Base URL to configure the client with.
    pub fn api_base(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Raw requests received so far (head and body).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

/// A `generateContent` response whose single candidate holds `text`.
pub fn reply_envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

fn answer(
    stream: TcpStream,
    status: u16,
    body: &str,
    seen: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut request = String::new();
    let mut content_length = 0usize;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
        request.push_str(&line);
        if line == "\r\n" {
            break;
        }
    }

    let mut payload = vec![0u8; content_length];
    reader.read_exact(&mut payload)?;
    request.push_str(&String::from_utf8_lossy(&payload));
    if let Ok(mut requests) = seen.lock() {
        requests.push(request);
    }

    let mut stream = reader.into_inner();
    write!(
        stream,
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )?;
    stream.flush()
}
