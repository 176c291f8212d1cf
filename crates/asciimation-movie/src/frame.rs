//! Frame types and payload encoding.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Message carried in the `data` field of every frame event.
///
/// Field names are the ones the browser client reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrameMessage {
    /// 1-based position of the frame in the movie file.
    pub frame_no: u64,
    /// HTML-escaped frame text.
    pub frame_buf: String,
}

impl FrameMessage {
    /// Build a message from raw frame text, escaping it for HTML.
    pub fn new(frame_no: u64, raw_text: &str) -> Self {
        Self {
            frame_no,
            frame_buf: escape_html(raw_text),
        }
    }
}

/// One unit of animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    delay: Duration,
    payload: Arc<str>,
}

impl Frame {
    pub fn new(delay: Duration, payload: impl Into<Arc<str>>) -> Self {
        Self {
            delay,
            payload: payload.into(),
        }
    }

    /// Encode `message` once and keep the JSON as the frame payload.
    pub fn encode(delay: Duration, message: &FrameMessage) -> serde_json::Result<Self> {
        let json = serde_json::to_string(message)?;
        Ok(Self::new(delay, json))
    }

    /// How long the frame stays on screen.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pre-serialized JSON [`FrameMessage`].
    pub fn payload(&self) -> &Arc<str> {
        &self.payload
    }
}

/// Escape the five HTML-significant characters.
///
/// ```
/// use asciimation_movie::escape_html;
///
/// assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain text"), "plain text");
        assert_eq!(escape_html("a < b > c & d"), "a &lt; b &gt; c &amp; d");
        assert_eq!(escape_html("\"quoted\" 'single'"), "&#34;quoted&#34; &#39;single&#39;");
        assert_eq!(escape_html("line\n  indented\n"), "line\n  indented\n");
    }

    #[test]
    fn test_message_field_names() {
        let message = FrameMessage::new(3, "/\\_/\\\n");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["FrameNo"], 3);
        assert_eq!(json["FrameBuf"], "/\\_/\\\n");
    }

    #[test]
    fn test_encode_escapes_text() {
        let message = FrameMessage::new(1, "<o> & <o>\n");
        let frame = Frame::encode(Duration::from_millis(300), &message).unwrap();

        assert_eq!(frame.delay(), Duration::from_millis(300));
        assert!(frame.payload().contains("&lt;o&gt; &amp; &lt;o&gt;"));
        assert!(!frame.payload().contains("<o>"));

        let decoded: FrameMessage = serde_json::from_str(frame.payload()).unwrap();
        assert_eq!(decoded.frame_no, 1);
        assert_eq!(decoded.frame_buf, "&lt;o&gt; &amp; &lt;o&gt;\n");
    }
}
