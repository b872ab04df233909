//! Exit codes for the logsync CLI.

use logsync_core::errors::{ExError, ExErrorKind};

/// Exit code constants.
pub mod codes {
    /// No diverged sessions (history: no exclusive entries).
    pub const IN_SYNC: u8 = 0;
    /// At least one diverged session (history: entries differ).
    pub const DIVERGED: u8 = 1;
    /// Fetch failed: transport, authentication or non-zero remote exit.
    pub const FETCH_FAILED: u8 = 3;
    /// Fetch timed out.
    pub const FETCH_TIMEOUT: u8 = 4;
    /// Bad configuration, glob or source handle.
    pub const CONFIG_ERROR: u8 = 5;
    /// Internal or output error.
    pub const INTERNAL_ERROR: u8 = 6;
}

/// Map an ExError to an exit code.
pub fn exit_code(error: &ExError) -> u8 {
    match error.kind() {
        ExErrorKind::FetchFailed => codes::FETCH_FAILED,
        ExErrorKind::FetchTimeout => codes::FETCH_TIMEOUT,
        ExErrorKind::InvalidSource | ExErrorKind::InvalidPattern | ExErrorKind::Config => {
            codes::CONFIG_ERROR
        }
        ExErrorKind::MalformedLine | ExErrorKind::Serialization | ExErrorKind::Internal => {
            codes::INTERNAL_ERROR
        }
    }
}
