//! Operation boundary macros
//!
//! Every operation logs one `start` event and then exactly one `end` or
//! `end_error` event. The closing macros take the `Instant` captured before
//! the start event and compute `duration_ms` themselves.
//!
//! Fetch operations name their side and source right after the op (or after
//! the `Instant` for the closing macros) using `side: ..., source: ...`, so
//! every event of a concurrent pair fetch says which source it belongs to.
//! Any further `name = value` pairs are passed to `tracing` unchanged.

use std::time::Instant;

/// Milliseconds elapsed since `started`, saturating at `u64::MAX`
#[doc(hidden)]
pub fn elapsed_ms(started: &Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op {
    ($level:ident, $op:expr, $event:expr, [$($pre:tt)*],
     side: $side:expr, source: $source:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($pre)*
            side = %$side,
            source_id = %$source,
            $($($field)*)?
        )
    };
    ($level:ident, $op:expr, $event:expr, [$($pre:tt)*] $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($pre)*
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use logsync_core::log_op_start;
/// log_op_start!("parse_manifest", bytes = 120);
/// log_op_start!("fetch", side: "A", source: "user@arm-box");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($rest:tt)*)?) => {
        $crate::__log_op!(
            info,
            $op,
            $crate::logging_facility::schema::EVENT_START,
            []
            $(, $($rest)*)?
        )
    };
}

/// Log the successful end of an operation started at `$started`
///
/// # Example
///
/// ```
/// # use logsync_core::log_op_end;
/// let started = std::time::Instant::now();
/// log_op_end!("compare_manifests", started, diverged_count = 0);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, $started:expr $(, $($rest:tt)*)?) => {
        $crate::__log_op!(
            info,
            $op,
            $crate::logging_facility::schema::EVENT_END,
            [duration_ms = $crate::logging_facility::macros::elapsed_ms(&$started),]
            $(, $($rest)*)?
        )
    };
}

/// Log the failure of an operation started at `$started`
///
/// `$err` is borrowed as an [`ExError`](crate::errors::ExError) so the stable
/// kind and code always appear next to the rendered message.
///
/// # Example
///
/// ```
/// # use logsync_core::log_op_error;
/// # use logsync_core::errors::{ExError, ExErrorKind};
/// let started = std::time::Instant::now();
/// let err = ExError::new(ExErrorKind::FetchTimeout);
/// log_op_error!("fetch", err, started, side: "B", source: "user@x86-box");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, $started:expr $(, $($rest:tt)*)?) => {{
        let ex_err: &$crate::errors::ExError = &$err;
        $crate::__log_op!(
            error,
            $op,
            $crate::logging_facility::schema::EVENT_END_ERROR,
            [
                duration_ms = $crate::logging_facility::macros::elapsed_ms(&$started),
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                message = %ex_err,
            ]
            $(, $($rest)*)?
        )
    }};
}
