//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which writes an index page into a temp dir and
//! builds an [`AppContext`] around an in-memory movie. The [`with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use asciimation::config::Config;
use asciimation::server::{self, AppContext};
use asciimation_movie::{parse_movie, Movie, BLOCK_LINES};
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body><pre id=\"screen\"></pre></body></html>";

/// Movie text for `frames`, each a `(delay line, frame text)` pair.
///
/// Every frame text line is repeated to fill the text rows of a block.
pub fn movie_text(frames: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (delay, text) in frames {
        out.push_str(delay);
        out.push('\n');
        for row in 0..BLOCK_LINES - 1 {
            out.push_str(&format!("{text} {row}\n"));
        }
    }
    out
}

/// `count` frames with the same delay, labelled `frame-0`, `frame-1`, ...
pub fn uniform_movie(count: usize, delay: &str) -> String {
    let labels: Vec<String> = (0..count).map(|i| format!("frame-{i}")).collect();
    let frames: Vec<(&str, &str)> = labels.iter().map(|l| (delay, l.as_str())).collect();
    movie_text(&frames)
}

pub fn parse(text: &str) -> Movie {
    parse_movie(Cursor::new(text.to_string())).expect("failed to parse movie")
}

/// Write `text` gzip-compressed to `dir/name`.
pub fn write_gzip_movie(dir: &Path, name: &str, text: &str) -> PathBuf {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();
    path
}

/// One parsed SSE event.
#[derive(Debug, Default, Clone)]
pub struct SseEvent {
    pub id: Option<String>,
    pub data: String,
}

impl SseEvent {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.data).expect("event data is not JSON")
    }
}

/// Split an SSE body into events, skipping keep-alive comments.
pub fn parse_sse(body: &str) -> Vec<SseEvent> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = SseEvent::default();
            let mut has_field = false;
            for line in block.lines() {
                if let Some(id) = line.strip_prefix("id:") {
                    event.id = Some(id.trim_start().to_string());
                    has_field = true;
                } else if let Some(data) = line.strip_prefix("data:") {
                    if !event.data.is_empty() {
                        event.data.push('\n');
                    }
                    event.data.push_str(data.strip_prefix(' ').unwrap_or(data));
                    has_field = true;
                }
            }
            has_field.then_some(event)
        })
        .collect()
}

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a harness serving `movie_text` with the default configuration.
    pub fn new(movie_text: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let index = dir.path().join("index.html");
        std::fs::write(&index, INDEX_HTML).unwrap();

        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.index = index;

        let ctx = AppContext::new(config, parse(movie_text));
        Self { ctx, dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server(movie_text: &str) -> (Self, SocketAddr) {
        let harness = Self::new(movie_text);
        let addr = harness.spawn(std::future::pending()).await;
        (harness, addr)
    }

    /// Start the server, stopping it once `signal` resolves.
    pub async fn spawn<F>(&self, signal: F) -> SocketAddr
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            server::serve(listener, ctx, signal).await.ok();
        });

        addr
    }
}
