//! SMTP response handling

/// Name the server announces on the wire. Changing it breaks clients that
/// match the queued acknowledgment text.
pub const SERVER_NAME: &str = "smtp2wwpm";

/// Base64 of "Username:", sent as the first AUTH LOGIN challenge
pub const USERNAME_CHALLENGE: &str = "VXNlcm5hbWU6";

/// Base64 of "Password:", sent as the second AUTH LOGIN challenge
pub const PASSWORD_CHALLENGE: &str = "UGFzc3dvcmQ6";

/// Represents an SMTP response that can be sent to a client
#[derive(Debug, Clone)]
pub struct SmtpResponse {
    /// The SMTP response code (e.g., "250", "334", "221")
    pub code: String,
    /// The human-readable message
    pub message: String,
    /// Optional multiline messages for EHLO responses
    pub multiline: Option<Vec<String>>,
}

impl SmtpResponse {
    /// Create a new SMTP response
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            multiline: None,
        }
    }

    /// Create a new multiline SMTP response
    pub fn new_multiline(code: &str, message: &str, lines: Vec<String>) -> Self {
        Self {
            code: code.to_owned(),
            message: message.to_owned(),
            multiline: Some(lines),
        }
    }

    /// Create a success response (250 OK)
    pub fn ok() -> Self {
        Self::new("250", "OK")
    }

    /// Create a greeting response (220)
    pub fn greeting(encrypted: bool) -> Self {
        if encrypted {
            Self::new("220", &format!("{SERVER_NAME} ready (TLS/SMTPS)"))
        } else {
            Self::new("220", &format!("{SERVER_NAME} ready"))
        }
    }

    /// Create the EHLO/HELO response (250) with the capability list
    pub fn ehlo() -> Self {
        let capabilities = vec![
            "AUTH LOGIN PLAIN".to_owned(),
            "PIPELINING".to_owned(),
            "8BITMIME".to_owned(),
        ];
        Self::new_multiline("250", SERVER_NAME, capabilities)
    }

    /// Create an AUTH challenge response (334)
    pub fn challenge(prompt: &str) -> Self {
        Self::new("334", prompt)
    }

    /// Create the AUTH success response (235)
    pub fn auth_ok() -> Self {
        Self::new("235", "Authentication successful")
    }

    /// Create a DATA intermediate response (354)
    pub fn data_start() -> Self {
        Self::new("354", "End data with <CR><LF>.<CR><LF>")
    }

    /// Create the end-of-data acknowledgment (250)
    pub fn queued() -> Self {
        Self::new("250", &format!("OK : queued as {SERVER_NAME}"))
    }

    /// Create a QUIT response (221)
    pub fn quit() -> Self {
        Self::new("221", "Bye")
    }

    /// Format the response for sending over the wire
    pub fn format(&self) -> String {
        if let Some(ref lines) = self.multiline {
            let mut result = format!("{}-{}\r\n", self.code, self.message);
            for (i, line) in lines.iter().enumerate() {
                if i == lines.len() - 1 {
                    // Last line uses space instead of dash
                    result.push_str(&format!("{} {}\r\n", self.code, line));
                } else {
                    result.push_str(&format!("{}-{}\r\n", self.code, line));
                }
            }
            result
        } else {
            format!("{} {}\r\n", self.code, self.message)
        }
    }

    /// Check if this is a success response (2xx)
    pub fn is_success(&self) -> bool {
        self.code.starts_with('2')
    }
}
