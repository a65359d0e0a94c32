//! Message reconstruction from raw DATA bytes
//!
//! A message is a header block terminated by an empty line, then the body.
//! Header values may be folded over several lines (RFC 5322); lookups are
//! case-insensitive. Senders that omit the header block entirely are common
//! enough that [`Message::read`] retries once with a synthesized minimal
//! block before giving up.

use crate::mail::error::MailError;

/// Header block prepended when the raw bytes do not parse as a message
const FALLBACK_HEADERS: &[u8] =
    b"Subject: (no subject)\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n";

/// An ordered header name/value mapping with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, preserving order
    pub fn push(&mut self, name: String, value: String) {
        self.entries.push((name, value));
    }

    /// Look up the first header with the given name, ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no headers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed message or message part: headers plus raw body bytes
#[derive(Debug, Clone)]
pub struct Message {
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Message {
    /// Parse raw message bytes into headers and body.
    ///
    /// Fails on a header line without a colon, a continuation line with no
    /// header to continue, or a header block that never terminates.
    pub fn parse(raw: &[u8]) -> Result<Self, MailError> {
        let (headers, body_start) = parse_header_block(raw)?;
        Ok(Self {
            headers,
            body: raw[body_start..].to_vec(),
        })
    }

    /// Parse raw message bytes, retrying once with a synthesized default
    /// header block in front when the first attempt fails. The retry covers
    /// senders that transmit a bare body with no headers at all.
    pub fn read(raw: &[u8]) -> Result<Self, MailError> {
        Self::parse(raw).or_else(|_| {
            let mut fixed = Vec::with_capacity(FALLBACK_HEADERS.len() + raw.len());
            fixed.extend_from_slice(FALLBACK_HEADERS);
            fixed.extend_from_slice(raw);
            Self::parse(&fixed)
        })
    }
}

/// Parse the header block at the start of `raw`. Returns the headers and the
/// byte offset where the body begins.
fn parse_header_block(raw: &[u8]) -> Result<(HeaderMap, usize), MailError> {
    let mut headers = HeaderMap::new();
    let mut offset = 0;

    while offset < raw.len() {
        let line_end = match raw[offset..].iter().position(|b| *b == b'\n') {
            Some(pos) => offset + pos + 1,
            None => raw.len(),
        };
        let line = trim_line_ending(&raw[offset..line_end]);

        if line.is_empty() {
            // Empty line terminates the header block
            return Ok((headers, line_end));
        }

        let text = String::from_utf8_lossy(line);
        if line[0] == b' ' || line[0] == b'\t' {
            // Folded continuation of the previous header value
            match headers.entries.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(text.trim());
                }
                None => return Err(MailError::MalformedHeader(text.into_owned())),
            }
        } else {
            match text.split_once(':') {
                Some((name, value)) => {
                    headers.push(name.trim().to_string(), value.trim().to_string());
                }
                None => return Err(MailError::MalformedHeader(text.into_owned())),
            }
        }

        offset = line_end;
    }

    Err(MailError::MissingBodySeparator)
}

/// Strip a trailing CRLF or LF from a line slice
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
