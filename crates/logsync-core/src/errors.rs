use crate::model::Side;
use logsync_core_types::RunId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in logsync. Each kind maps to a stable error code that can be used for
/// programmatic error handling, testing, and exit-status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input/Validation
    InvalidSource,
    InvalidPattern,
    /// A manifest line could not be parsed (non-fatal when collected by the parser)
    MalformedLine,
    Config,

    // Fetch
    /// Transport or authentication failure while fetching a manifest
    FetchFailed,
    /// A fetch did not complete within the caller-supplied timeout
    FetchTimeout,

    // Output
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSource => "ERR_INVALID_SOURCE",
            ExErrorKind::InvalidPattern => "ERR_INVALID_PATTERN",
            ExErrorKind::MalformedLine => "ERR_MALFORMED_LINE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::FetchFailed => "ERR_FETCH_FAILED",
            ExErrorKind::FetchTimeout => "ERR_FETCH_TIMEOUT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds raised while obtaining a manifest from a source
    pub fn is_fetch(&self) -> bool {
        matches!(self, ExErrorKind::FetchFailed | ExErrorKind::FetchTimeout)
    }
}

/// Canonical structured error type
///
/// Carries a classification plus the context needed to print a clear,
/// source-attributed message: which side failed, which source id, which path.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    side: Option<Side>,
    source_id: Option<String>,
    path: Option<String>,
    line_no: Option<usize>,
    run_id: Option<RunId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            side: None,
            source_id: None,
            path: None,
            line_no: None,
            run_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Attribute the error to one side of the comparison
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Add source identifier context
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Add path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add 1-based line number context
    pub fn with_line_no(mut self, line_no: usize) -> Self {
        self.line_no = Some(line_no);
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the side the error is attributed to, if any
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    /// Get the source identifier context, if any
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the line number context, if any
    pub fn line_no(&self) -> Option<usize> {
        self.line_no
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(side) = self.side {
            write!(f, " source {}", side)?;
            if let Some(source_id) = &self.source_id {
                write!(f, " ({})", source_id)?;
            }
        } else if let Some(source_id) = &self.source_id {
            write!(f, " source {}", source_id)?;
        }
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(line_no) = self.line_no {
            write!(f, " (line: {})", line_no)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by the manifest and filter layers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// A manifest line did not have the `path|count|ids` shape
    #[error("Malformed manifest line {line_no}: {reason}")]
    MalformedLine { line_no: usize, reason: String },

    /// A path glob could not be compiled
    #[error("Invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl From<SyncError> for ExError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::MalformedLine { line_no, reason } => {
                ExError::new(ExErrorKind::MalformedLine)
                    .with_op("parse_manifest")
                    .with_line_no(line_no)
                    .with_message(reason)
            }
            SyncError::InvalidPattern { pattern, reason } => {
                ExError::new(ExErrorKind::InvalidPattern)
                    .with_op("path_filter")
                    .with_message(format!("invalid pattern `{}`: {}", pattern, reason))
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
