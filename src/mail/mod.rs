//! Message reconstruction and content extraction

pub mod decode;
pub mod error;
pub mod extract;
pub mod message;

pub use error::{DecodeError, MailError};
pub use extract::{Extraction, extract};
pub use message::{HeaderMap, Message};

use log::{info, warn};

use crate::notify::Notifier;

/// Process one completed raw message: reconstruct it, walk its structure and
/// hand the result to the notifier.
///
/// Runs on a detached thread after the client has already been acknowledged,
/// so failures here are logged and swallowed. An unparseable message (after
/// the one fallback retry inside [`Message::read`]) is dropped.
pub fn process(raw: &[u8], notifier: &dyn Notifier) {
    let msg = match Message::read(raw) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("message parse failed, dropping: {e}");
            return;
        }
    };

    let result = extract(&msg);
    info!(
        "extracted subject={:?} body_len={}",
        result.subject,
        result.html.len()
    );
    if !result.attachments.is_empty() {
        info!("attachments: {:?}", result.attachments);
    }

    notifier.deliver(&result.subject, &result.html);
}
