//! Error types for message reconstruction and decoding
//!
//! None of these ever reach the SMTP client: header-parse failures get one
//! fallback retry and are then dropped with a log entry, and decode failures
//! make the caller fall back to the raw bytes.

use thiserror::Error;

/// Failures while reconstructing a message from raw DATA bytes
#[derive(Error, Debug)]
pub enum MailError {
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("message has no header/body separator")]
    MissingBodySeparator,
}

/// Failures while decoding a transfer encoding
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid quoted-printable content: {0}")]
    QuotedPrintable(#[from] quoted_printable::QuotedPrintableError),
}
