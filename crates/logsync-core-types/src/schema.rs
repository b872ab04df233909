//! Canonical schema constants for structured logging and events
//!
//! The operation macros in `logsync-core` emit fields under these names and
//! the test capture layer reads them back by the same names.

// Operation boundary fields
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

/// Recorded on the root span of a run, inherited by every event inside it
pub const FIELD_RUN_ID: &str = "run_id";

// Source attribution for fetch operations
pub const FIELD_SIDE: &str = "side";
pub const FIELD_SOURCE_ID: &str = "source_id";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
