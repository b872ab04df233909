//! Correlation types for run tracking and tracing
//!
//! A single verification run fetches from two sources concurrently; the run
//! id lets every log line from both fetch tasks be tied back to one run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single verification run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new random RunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one CLI invocation
///
/// The run id is recorded on the root tracing span and on any error that
/// aborts the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
}

impl RunContext {
    /// Create a new context with a fresh RunId
    pub fn new() -> Self {
        Self {
            run_id: RunId::new(),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
