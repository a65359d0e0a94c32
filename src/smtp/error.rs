//! Error types for the SMTP listener

use thiserror::Error;

/// Transport-level failures. Fatal to a single session, or to the whole
/// process when they occur while binding a listener at startup.
#[derive(Error, Debug)]
pub enum SmtpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
