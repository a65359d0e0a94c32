//! # smtp2wwpm
//!
//! smtp2wwpm is an SMTP-to-webhook bridge: it accepts inbound mail over
//! SMTP (plaintext and implicit TLS), recovers a displayable HTML body from
//! the message's MIME structure, and POSTs `{subject, html}` as JSON to a
//! configured webhook URL.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smtp2wwpm::{SmtpServer, WebhookNotifier};
//! use std::sync::Arc;
//!
//! let notifier = Arc::new(WebhookNotifier::new(
//!     "https://example.com/webhook".to_string(),
//! ));
//! let server = SmtpServer::new(notifier);
//! server.start("0.0.0.0:2525").unwrap();
//! ```
//!
//! ## Protocol behavior
//!
//! Every command is acknowledged optimistically:
//!
//! - `EHLO`/`HELO` - capability list advertising `AUTH LOGIN PLAIN`,
//!   `PIPELINING` and `8BITMIME`
//! - `AUTH LOGIN` / `AUTH PLAIN` - the full challenge dance, but **any**
//!   credential succeeds
//! - `MAIL FROM` / `RCPT TO` - accepted without validation
//! - `DATA` - message bytes collected until the `.` terminator
//! - `RSET`, `NOOP`, `QUIT` - as usual
//! - anything else - `250 OK`
//!
//! ## Content extraction
//!
//! The first `text/html` part of a message becomes the display body;
//! `text/plain` is the fallback, wrapped in `<pre>` so line breaks survive.
//! Nested multipart containers are walked recursively and attachment
//! filenames are collected (attachment bytes are dropped). Messages without
//! a parseable header block get a synthesized `(no subject)` header and are
//! forwarded anyway.
//!
//! ## Security notes
//!
//! **This server performs no authentication.** The AUTH handshake exists
//! only to satisfy clients that refuse to send without one; every credential
//! is accepted and none is checked, stored, or logged. Run it only where a
//! trusted sender needs bridging into a webhook channel, never on the open
//! internet as a real mail server.
//!
//! Delivery to the webhook is fire-and-forget: the SMTP client gets its
//! `250 OK : queued as smtp2wwpm` before extraction runs, failures are only
//! logged, and nothing is retried.

pub mod mail;
pub mod notify;
pub mod smtp;
pub mod tls;

pub use mail::{Extraction, Message, extract};
pub use notify::{Notifier, WebhookNotifier};
pub use smtp::{SmtpError, SmtpResponse, SmtpServer, SmtpSession};
