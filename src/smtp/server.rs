//! SMTP server implementation
//!
//! One thread per accepted connection; sessions share nothing. A completed
//! message is handed to a detached processing thread before the client sees
//! its acknowledgment, so "250 OK : queued" never implies the webhook call
//! succeeded (or will ever be made) - delivery is at-most-once.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use log::{debug, error, info};

use crate::mail;
use crate::notify::Notifier;
use crate::smtp::commands::{Action, SmtpCommandHandler};
use crate::smtp::error::SmtpError;
use crate::smtp::response::SmtpResponse;
use crate::smtp::session::SmtpSession;

/// Accepts connections and runs one dialog per client
#[derive(Clone)]
pub struct SmtpServer {
    notifier: Arc<dyn Notifier>,
}

impl SmtpServer {
    /// Create a server delivering extracted messages to the given notifier
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Bind the plaintext listener and accept connections (blocking)
    pub fn start(&self, addr: &str) -> Result<(), SmtpError> {
        let listener = TcpListener::bind(addr)?;
        self.start_with_listener(listener)
    }

    /// Accept plaintext connections on an existing listener (blocking)
    pub fn start_with_listener(&self, listener: TcpListener) -> Result<(), SmtpError> {
        info!("SMTP listening on {}", listener.local_addr()?);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let server = self.clone();
                    thread::spawn(move || {
                        if let Err(e) = server.handle_client(stream, false) {
                            debug!("session ended: {e}");
                        }
                    });
                }
                Err(e) => {
                    error!("accept failed: {e}");
                }
            }
        }

        Ok(())
    }

    /// Bind the TLS listener and accept connections (blocking)
    pub fn start_tls(
        &self,
        addr: &str,
        config: Arc<rustls::ServerConfig>,
    ) -> Result<(), SmtpError> {
        let listener = TcpListener::bind(addr)?;
        self.start_tls_with_listener(listener, config)
    }

    /// Accept TLS connections on an existing listener (blocking). Runs the
    /// same dialog as the plaintext listener; only the greeting differs.
    pub fn start_tls_with_listener(
        &self,
        listener: TcpListener,
        config: Arc<rustls::ServerConfig>,
    ) -> Result<(), SmtpError> {
        info!("SMTPS listening on {}", listener.local_addr()?);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let server = self.clone();
                    let config = Arc::clone(&config);
                    thread::spawn(move || {
                        let conn = match rustls::ServerConnection::new(config) {
                            Ok(conn) => conn,
                            Err(e) => {
                                error!("TLS session setup failed: {e}");
                                return;
                            }
                        };
                        let tls_stream = rustls::StreamOwned::new(conn, stream);
                        if let Err(e) = server.handle_client(tls_stream, true) {
                            debug!("TLS session ended: {e}");
                        }
                    });
                }
                Err(e) => {
                    error!("accept failed: {e}");
                }
            }
        }

        Ok(())
    }

    /// Run one client dialog to completion.
    ///
    /// Generic over the stream so plaintext and TLS connections share the
    /// loop. Any read or write failure ends the session; a partially
    /// collected message is never forwarded.
    fn handle_client<S: Read + Write>(&self, stream: S, encrypted: bool) -> Result<(), SmtpError> {
        let mut session = SmtpSession::new(encrypted);
        let handler = SmtpCommandHandler::new();
        let mut reader = BufReader::new(stream);

        send_response(&mut reader, &SmtpResponse::greeting(encrypted))?;

        let mut line_buffer = Vec::new();
        loop {
            line_buffer.clear();
            if reader.read_until(b'\n', &mut line_buffer)? == 0 {
                break; // Connection closed
            }

            if session.collecting_data() {
                if is_terminator(&line_buffer) {
                    // Move the buffer out before acknowledging so the next
                    // message cannot race the handed-off bytes
                    let raw = session.take_message();
                    let notifier = Arc::clone(&self.notifier);
                    thread::spawn(move || mail::process(&raw, notifier.as_ref()));
                    send_response(&mut reader, &SmtpResponse::queued())?;
                } else {
                    session.append_data(&line_buffer);
                }
                continue;
            }

            let line = String::from_utf8_lossy(&line_buffer);
            let line = line.trim_end_matches(['\r', '\n']);

            match handler.handle(line) {
                Action::Reply(response) => {
                    send_response(&mut reader, &response)?;
                }
                Action::Challenge(prompts) => {
                    for prompt in prompts {
                        send_response(&mut reader, &SmtpResponse::challenge(prompt))?;
                        // The credential answer is read and thrown away
                        let mut discard = Vec::new();
                        if reader.read_until(b'\n', &mut discard)? == 0 {
                            return Ok(());
                        }
                    }
                    send_response(&mut reader, &SmtpResponse::auth_ok())?;
                }
                Action::BeginData => {
                    send_response(&mut reader, &SmtpResponse::data_start())?;
                    session.begin_data();
                }
                Action::Reset => {
                    session.reset();
                    send_response(&mut reader, &SmtpResponse::ok())?;
                }
                Action::Quit => {
                    send_response(&mut reader, &SmtpResponse::quit())?;
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Whether a raw line is the end-of-data terminator: a single dot once the
/// line ending is stripped
fn is_terminator(raw_line: &[u8]) -> bool {
    let line = raw_line.strip_suffix(b"\n").unwrap_or(raw_line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line == b"."
}

/// Send a response through the buffered stream
fn send_response<S: Read + Write>(
    reader: &mut BufReader<S>,
    response: &SmtpResponse,
) -> Result<(), SmtpError> {
    let stream = reader.get_mut();
    stream.write_all(response.format().as_bytes())?;
    stream.flush()?;
    Ok(())
}
