//! SMTP session state management

/// Represents the current phase of an SMTP session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpPhase {
    /// Steady state - awaiting a command line
    Command,
    /// DATA received - collecting message bytes until the terminator line
    CollectingData,
}

/// Manages the state and data for a single SMTP session
#[derive(Debug)]
pub struct SmtpSession {
    /// Current phase of the session
    pub phase: SmtpPhase,
    /// Raw message bytes collected during the data phase
    buffer: Vec<u8>,
    /// Whether the underlying transport is TLS (affects only the greeting)
    pub encrypted: bool,
}

impl SmtpSession {
    /// Create a new SMTP session
    pub fn new(encrypted: bool) -> Self {
        Self {
            phase: SmtpPhase::Command,
            buffer: Vec::new(),
            encrypted,
        }
    }

    /// Switch into the data-collection phase
    pub fn begin_data(&mut self) {
        self.phase = SmtpPhase::CollectingData;
    }

    /// Whether the session is currently collecting message data
    pub fn collecting_data(&self) -> bool {
        self.phase == SmtpPhase::CollectingData
    }

    /// Append a raw line (original line-ending bytes included) to the
    /// in-progress message.
    pub fn append_data(&mut self, raw_line: &[u8]) {
        self.buffer.extend_from_slice(raw_line);
    }

    /// Take ownership of the collected message and return to the command
    /// phase. The buffer is cleared as part of the move, so a subsequent
    /// message on the same session cannot touch the handed-off bytes.
    pub fn take_message(&mut self) -> Vec<u8> {
        self.phase = SmtpPhase::Command;
        std::mem::take(&mut self.buffer)
    }

    /// Discard any collected data and return to the command phase (RSET)
    pub fn reset(&mut self) {
        self.phase = SmtpPhase::Command;
        self.buffer.clear();
    }

    /// Size of the message collected so far
    pub fn data_size(&self) -> usize {
        self.buffer.len()
    }
}
