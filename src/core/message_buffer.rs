//! Scratch buffer that renders the user payload of a log line
//!
//! The buffer is either growable or bounded. A bounded buffer never grows past
//! its limit: output that would overflow is cut at a UTF-8 boundary and ends
//! with [`TRUNCATION_MARKER`], and formatting stops early. Newlines, carriage
//! returns and tabs can be escaped while writing so a payload can never spill
//! onto a second line.

use std::borrow::Cow;
use std::fmt::{self, Write};

/// Suffix appended to a message that did not fit its buffer
pub const TRUNCATION_MARKER: &str = "...";

/// Characters that would break a record across lines or fields
pub(crate) const ESCAPED: &[char] = &['\n', '\r', '\t'];

fn escape_sequence(c: char) -> &'static str {
    match c {
        '\n' => "\\n",
        '\r' => "\\r",
        _ => "\\t",
    }
}

/// Escape `\n`, `\r` and `\t` in a metadata field such as the thread label
/// or the file name. Borrows when nothing needs escaping.
pub fn escape_line_breaks(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPED) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        if ESCAPED.contains(&c) {
            escaped.push_str(escape_sequence(c));
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

/// Rendered payload and whether it had to be cut short
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub text: String,
    pub truncated: bool,
}

#[derive(Debug)]
pub struct MessageBuffer {
    buf: String,
    limit: Option<usize>,
    sanitize: bool,
    truncated: bool,
}

impl MessageBuffer {
    /// Growable buffer
    pub fn unbounded() -> Self {
        Self {
            buf: String::new(),
            limit: None,
            sanitize: true,
            truncated: false,
        }
    }

    /// Buffer holding at most `limit` bytes, marker included
    pub fn bounded(limit: usize) -> Self {
        Self {
            buf: String::with_capacity(limit),
            limit: Some(limit),
            sanitize: true,
            truncated: false,
        }
    }

    /// Enable or disable escaping of `\n`, `\r` and `\t`
    #[must_use]
    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    /// Render `args` into this buffer
    pub fn render(mut self, args: fmt::Arguments<'_>) -> RenderedMessage {
        // An error here only means the bound was hit and formatting stopped.
        let _ = self.write_fmt(args);
        RenderedMessage {
            text: self.buf,
            truncated: self.truncated,
        }
    }

    fn push(&mut self, piece: &str) -> fmt::Result {
        if let Some(limit) = self.limit {
            if self.buf.len() + piece.len() > limit {
                let room = limit.saturating_sub(self.buf.len());
                self.buf.push_str(&piece[..floor_char_boundary(piece, room)]);
                self.cut(limit);
                return Err(fmt::Error);
            }
        }
        self.buf.push_str(piece);
        Ok(())
    }

    fn cut(&mut self, limit: usize) {
        let budget = limit.saturating_sub(TRUNCATION_MARKER.len());
        let end = floor_char_boundary(&self.buf, budget);
        self.buf.truncate(end);
        if limit >= TRUNCATION_MARKER.len() {
            self.buf.push_str(TRUNCATION_MARKER);
        }
        self.truncated = true;
    }
}

impl Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Err(fmt::Error);
        }
        if !self.sanitize || !s.contains(ESCAPED) {
            return self.push(s);
        }

        let mut rest = s;
        while let Some(idx) = rest.find(ESCAPED) {
            self.push(&rest[..idx])?;
            self.push(escape_sequence(char::from(rest.as_bytes()[idx])))?;
            rest = &rest[idx + 1..];
        }
        self.push(rest)
    }
}

/// Largest index `<= index` that lies on a char boundary of `s`
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0)
}
