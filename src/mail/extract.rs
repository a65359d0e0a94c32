//! Recursive message structure walker
//!
//! Turns a parsed message into a displayable (subject, html, attachments)
//! triple. The walker always prefers rich content: an HTML part wins over a
//! plain-text part, and plain text is wrapped in `<pre>` so line breaks
//! survive rendering. Every decision favors producing *some* output over
//! strict correctness; malformed structure degrades to best-effort raw
//! content instead of failing the message.

use log::debug;

use crate::mail::decode::decode;
use crate::mail::message::{HeaderMap, Message};

/// Displayable content recovered from one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Subject header, empty when absent at every depth
    pub subject: String,
    /// Display body: HTML when available, `<pre>`-wrapped plain text
    /// otherwise, raw decoded bytes as a last resort
    pub html: String,
    /// Attachment filenames in depth-first encounter order. The attachment
    /// bytes themselves are never kept.
    pub attachments: Vec<String>,
}

/// A parsed Content-Type or Content-Disposition value
#[derive(Debug, Clone)]
struct MediaType {
    kind: String,
    params: Vec<(String, String)>,
}

impl MediaType {
    /// Lenient `type/subtype; key=value; ...` parser. Never fails: an
    /// unparseable value yields an empty kind, which callers treat as
    /// opaque content.
    fn parse(value: &str) -> Self {
        let mut segments = value.split(';');
        let kind = segments.next().unwrap_or("").trim().to_lowercase();
        let params = segments
            .filter_map(|segment| {
                let (key, value) = segment.split_once('=')?;
                let value = value.trim().trim_matches('"');
                Some((key.trim().to_lowercase(), value.to_string()))
            })
            .collect();
        Self { kind, params }
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Walk a message and recover its displayable content.
///
/// Pure: identical input yields identical output, and the message is not
/// modified.
pub fn extract(msg: &Message) -> Extraction {
    let subject = msg.headers.get("Subject").unwrap_or("").to_string();
    let content_type = msg.headers.get("Content-Type").unwrap_or("");
    let media = MediaType::parse(content_type);

    if media.kind.starts_with("multipart/") {
        let boundary = media.param("boundary").unwrap_or("");
        return extract_multipart(subject, boundary, &msg.body);
    }

    // Single part: decode with the message's own transfer encoding and
    // classify by media type
    let encoding = msg.headers.get("Content-Transfer-Encoding").unwrap_or("");
    let decoded = decode_or_raw(&msg.body, encoding);
    let html = if media.kind.contains("text/html") {
        String::from_utf8_lossy(&decoded).into_owned()
    } else if media.kind.contains("text/plain") {
        wrap_preformatted(&String::from_utf8_lossy(&decoded))
    } else {
        // Unknown or unparseable type: forward the bytes as-is
        String::from_utf8_lossy(&decoded).into_owned()
    };

    Extraction {
        subject,
        html,
        attachments: Vec::new(),
    }
}

/// Walk the parts of a multipart body.
///
/// Candidate selection mirrors what mail clients expect from this bridge:
/// the first HTML part at a given level wins over later ones, the first
/// plain-text part is the fallback, and a non-empty display body from a
/// nested container replaces the pending HTML candidate. Attachment parts
/// contribute their filename only.
fn extract_multipart(mut subject: String, boundary: &str, body: &[u8]) -> Extraction {
    let mut html_body = String::new();
    let mut plain_body = String::new();
    let mut attachments = Vec::new();

    // No boundary means no parts, which is an empty body, not an error
    let parts = if boundary.is_empty() {
        Vec::new()
    } else {
        split_parts(body, boundary)
    };

    for raw_part in parts {
        let part = parse_part(&raw_part);
        // A part without a Content-Type is plain text per RFC 2045
        let content_type = part.headers.get("Content-Type").unwrap_or("text/plain");
        let disposition = part.headers.get("Content-Disposition").unwrap_or("");
        let encoding = part.headers.get("Content-Transfer-Encoding").unwrap_or("");
        let decoded = decode_or_raw(&part.body, encoding);
        let content_type_lower = content_type.to_lowercase();

        if content_type_lower.starts_with("multipart/") {
            let nested = extract(&Message {
                headers: part.headers.clone(),
                body: decoded,
            });
            if !nested.html.is_empty() {
                html_body = nested.html;
            }
            if subject.is_empty() && !nested.subject.is_empty() {
                subject = nested.subject;
            }
            attachments.extend(nested.attachments);
            continue;
        }

        if disposition.to_lowercase().starts_with("attachment") {
            if let Some(filename) = MediaType::parse(disposition).param("filename") {
                attachments.push(filename.to_string());
            }
            continue;
        }

        if content_type_lower.contains("text/html") && html_body.is_empty() {
            html_body = String::from_utf8_lossy(&decoded).into_owned();
        } else if content_type_lower.contains("text/plain") && plain_body.is_empty() {
            plain_body = wrap_preformatted(&String::from_utf8_lossy(&decoded));
        }
    }

    let html = if !html_body.is_empty() {
        html_body
    } else {
        plain_body
    };

    Extraction {
        subject,
        html,
        attachments,
    }
}

/// Decode a body, substituting the raw bytes when the content does not match
/// its declared encoding
fn decode_or_raw(body: &[u8], encoding: &str) -> Vec<u8> {
    match decode(body, encoding) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("decode failed ({encoding}): {e}, using raw bytes");
            body.to_vec()
        }
    }
}

/// Wrap plain text so whitespace and line breaks survive HTML rendering
fn wrap_preformatted(text: &str) -> String {
    format!("<pre>{text}</pre>")
}

/// Parse one multipart part. A part without a parseable header block is
/// treated as all body with no headers.
fn parse_part(raw: &[u8]) -> Message {
    Message::parse(raw).unwrap_or_else(|_| Message {
        headers: HeaderMap::new(),
        body: raw.to_vec(),
    })
}

/// Split a multipart body on its boundary delimiter lines.
///
/// Delimiter lines tolerate trailing whitespace, the preamble and epilogue
/// are dropped, and the line break preceding a delimiter belongs to the
/// framing, not to the part. A missing closing delimiter terminates the last
/// part at end of input.
fn split_parts(body: &[u8], boundary: &str) -> Vec<Vec<u8>> {
    let delimiter = format!("--{boundary}");
    let close_delimiter = format!("{delimiter}--");

    let mut parts = Vec::new();
    let mut current: Option<Vec<u8>> = None;
    let mut offset = 0;

    while offset < body.len() {
        let line_end = match body[offset..].iter().position(|b| *b == b'\n') {
            Some(pos) => offset + pos + 1,
            None => body.len(),
        };
        let raw_line = &body[offset..line_end];
        let text = String::from_utf8_lossy(raw_line);
        let trimmed = text.trim_end();

        if trimmed == close_delimiter {
            if let Some(part) = current.take() {
                parts.push(strip_final_line_break(part));
            }
            return parts;
        }
        if trimmed == delimiter {
            if let Some(part) = current.take() {
                parts.push(strip_final_line_break(part));
            }
            current = Some(Vec::new());
        } else if let Some(part) = current.as_mut() {
            part.extend_from_slice(raw_line);
        }

        offset = line_end;
    }

    if let Some(part) = current.take() {
        parts.push(strip_final_line_break(part));
    }
    parts
}

/// Remove the single trailing CRLF (or LF) that frames the next delimiter
fn strip_final_line_break(mut part: Vec<u8>) -> Vec<u8> {
    if part.ends_with(b"\r\n") {
        part.truncate(part.len() - 2);
    } else if part.ends_with(b"\n") {
        part.truncate(part.len() - 1);
    }
    part
}
