//! SMTP command dispatch
//!
//! Every command is acknowledged optimistically. Senders and recipients are
//! not validated, and the AUTH sub-protocol accepts any credential without
//! checking, storing, or logging it. This is the bridge's contract: satisfy
//! clients that insist on a handshake, then take their mail.

use crate::smtp::response::{PASSWORD_CHALLENGE, SmtpResponse, USERNAME_CHALLENGE};

/// What the dialog loop should do with a command line.
///
/// The handler itself never touches the stream or the session; the AUTH
/// sub-dialogs need extra reads that only the loop owning the reader can
/// perform.
#[derive(Debug)]
pub enum Action {
    /// Send the response and keep reading commands
    Reply(SmtpResponse),
    /// Send each 334 challenge, discarding the client's answer line after
    /// each one, then acknowledge with 235
    Challenge(Vec<&'static str>),
    /// Send the 354 go-ahead and switch to data collection
    BeginData,
    /// Clear the message buffer and acknowledge
    Reset,
    /// Say goodbye and close the connection
    Quit,
}

/// Maps command lines onto dialog actions
#[derive(Debug)]
pub struct SmtpCommandHandler;

impl SmtpCommandHandler {
    /// Create a new command handler
    pub fn new() -> Self {
        Self
    }

    /// Classify a single command line. Matching is case-insensitive on the
    /// leading token(s); anything unrecognized is acknowledged with 250.
    pub fn handle(&self, line: &str) -> Action {
        let upper = line.to_uppercase();

        if upper.starts_with("AUTH PLAIN") {
            // With an inline credential the handshake is already "done"
            return if line.split_whitespace().count() == 3 {
                Action::Reply(SmtpResponse::auth_ok())
            } else {
                Action::Challenge(vec![""])
            };
        }

        if upper.starts_with("AUTH LOGIN") {
            // With an inline username only the password prompt remains
            return if line.split_whitespace().count() == 2 {
                Action::Challenge(vec![PASSWORD_CHALLENGE])
            } else {
                Action::Challenge(vec![USERNAME_CHALLENGE, PASSWORD_CHALLENGE])
            };
        }

        if upper.starts_with("EHLO") || upper.starts_with("HELO") {
            Action::Reply(SmtpResponse::ehlo())
        } else if upper.starts_with("MAIL FROM:") || upper.starts_with("RCPT TO:") {
            Action::Reply(SmtpResponse::ok())
        } else if upper == "DATA" {
            Action::BeginData
        } else if upper == "RSET" {
            Action::Reset
        } else if upper == "NOOP" {
            Action::Reply(SmtpResponse::ok())
        } else if upper == "QUIT" {
            Action::Quit
        } else {
            // Lenient catch-all
            Action::Reply(SmtpResponse::ok())
        }
    }
}

impl Default for SmtpCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> SmtpCommandHandler {
        SmtpCommandHandler::new()
    }

    #[test]
    fn test_ehlo_command() {
        let action = handler().handle("EHLO client.local");
        match action {
            Action::Reply(response) => {
                assert!(response.format().starts_with("250-smtp2wwpm\r\n"));
                assert!(response.format().contains("250-AUTH LOGIN PLAIN\r\n"));
            }
            other => panic!("expected Reply, got {other:?}"),
        }
    }

    #[test]
    fn test_helo_lowercase() {
        let action = handler().handle("helo client.local");
        assert!(matches!(action, Action::Reply(_)));
    }

    #[test]
    fn test_auth_plain_inline() {
        let action = handler().handle("AUTH PLAIN AGZvbwBiYXI=");
        match action {
            Action::Reply(response) => assert_eq!(response.code, "235"),
            other => panic!("expected Reply, got {other:?}"),
        }
    }

    #[test]
    fn test_auth_plain_without_argument() {
        let action = handler().handle("AUTH PLAIN");
        match action {
            Action::Challenge(prompts) => assert_eq!(prompts, vec![""]),
            other => panic!("expected Challenge, got {other:?}"),
        }
    }

    #[test]
    fn test_auth_login_with_username() {
        let action = handler().handle("AUTH LOGIN dXNlcg==");
        match action {
            Action::Challenge(prompts) => assert_eq!(prompts, vec![PASSWORD_CHALLENGE]),
            other => panic!("expected Challenge, got {other:?}"),
        }
    }

    #[test]
    fn test_auth_login_bare() {
        let action = handler().handle("AUTH LOGIN");
        match action {
            Action::Challenge(prompts) => {
                assert_eq!(prompts, vec![USERNAME_CHALLENGE, PASSWORD_CHALLENGE]);
            }
            other => panic!("expected Challenge, got {other:?}"),
        }
    }

    #[test]
    fn test_mail_and_rcpt_acknowledged() {
        for line in [
            "MAIL FROM:<sender@example.com>",
            "RCPT TO:<recipient@example.com>",
            "mail from:<sender@example.com>",
        ] {
            match handler().handle(line) {
                Action::Reply(response) => assert_eq!(response.format(), "250 OK\r\n"),
                other => panic!("expected Reply for {line:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_data_command() {
        assert!(matches!(handler().handle("DATA"), Action::BeginData));
        assert!(matches!(handler().handle("data"), Action::BeginData));
    }

    #[test]
    fn test_rset_command() {
        assert!(matches!(handler().handle("RSET"), Action::Reset));
    }

    #[test]
    fn test_quit_command() {
        assert!(matches!(handler().handle("QUIT"), Action::Quit));
    }

    #[test]
    fn test_unknown_command_is_acknowledged() {
        // No rejection path exists: unknown input still gets 250
        for line in ["VRFY someone", "STARTTLS", "AUTH CRAM-MD5", "", "garbage"] {
            match handler().handle(line) {
                Action::Reply(response) => assert_eq!(response.format(), "250 OK\r\n"),
                other => panic!("expected Reply for {line:?}, got {other:?}"),
            }
        }
    }
}
