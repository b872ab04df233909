//! Structured logging facility for logsync
//!
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode that also sees fields of enclosing spans
//!
//! Log output always goes to stderr; stdout is reserved for the report.
//!
//! # Usage
//!
//! ```rust
//! use logsync_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_with_filter, Profile};
pub use logsync_core_types::schema;
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
