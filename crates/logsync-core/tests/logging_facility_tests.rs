#![allow(clippy::unwrap_used, clippy::expect_used)]

use logsync_core::classify::compare_manifests;
use logsync_core::errors::{ExError, ExErrorKind};
use logsync_core::logging_facility::test_capture::init_test_capture;
use logsync_core::model::Side;
use logsync_core::parser::parse_manifest;
use logsync_core::{log_op_end, log_op_error, log_op_start};
use logsync_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use std::time::Instant;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    assert_eq!(capture.count(op_name, EVENT_START), 1);
    let start = capture.find(op_name, EVENT_START).expect("start event");
    assert_eq!(start.component(), Some(module_path!()));
}

#[test]
fn test_log_op_end_computes_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    let started = Instant::now();
    log_op_end!(op_name, started, entry_count = 4);

    let end = capture.find(op_name, EVENT_END).expect("end event");
    assert!(end.duration_ms().is_some());
    assert_eq!(end.field("entry_count"), Some("4"));
}

#[test]
fn test_log_op_error_includes_kind_code_and_source() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ExError::new(ExErrorKind::FetchTimeout)
        .with_side(Side::B)
        .with_source_id("user@x86-box")
        .with_message("timed out after 5s");
    log_op_error!(op_name, err, Instant::now(), side: Side::B, source: "user@x86-box");

    let error_event = capture.find(op_name, EVENT_END_ERROR).expect("error event");
    assert_eq!(error_event.err_code(), Some("ERR_FETCH_TIMEOUT"));
    assert_eq!(error_event.err_kind(), Some("FetchTimeout"));
    assert_eq!(error_event.side(), Some("B"));
    assert_eq!(error_event.source_id(), Some("user@x86-box"));
    assert!(error_event
        .field("message")
        .is_some_and(|m| m.contains("timed out after 5s")));
    // the error is only borrowed
    assert_eq!(err.side(), Some(Side::B));
}

#[test]
fn test_side_attribution_on_every_boundary() {
    let capture = init_test_capture();
    let op_name = "test_side_attribution_unique_4";

    let started = Instant::now();
    log_op_start!(op_name, side: Side::A, source: "/data/arm");
    log_op_end!(op_name, started, side: Side::A, source: "/data/arm", bytes = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 2);
    for event in &events {
        assert_eq!(event.side(), Some("A"));
        assert_eq!(event.source_id(), Some("/data/arm"));
    }
    assert_eq!(events[1].field("bytes"), Some("10"));
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_5";

    let started = Instant::now();
    log_op_start!(op_name, bytes = 3);
    log_op_end!(op_name, started);

    assert_eq!(capture.count(op_name, EVENT_START), 1);
    assert_eq!(capture.count(op_name, EVENT_END), 1);
    assert_eq!(capture.count(op_name, EVENT_END_ERROR), 0);
}

#[test]
fn test_events_inherit_run_id_from_enclosing_span() {
    let capture = init_test_capture();
    let op_name = "test_run_span_unique_6";

    let span = tracing::info_span!("run", run_id = "run-0042");
    span.in_scope(|| {
        log_op_start!(op_name);
    });
    log_op_end!(op_name, Instant::now());

    let start = capture.find(op_name, EVENT_START).expect("start event");
    let end = capture.find(op_name, EVENT_END).expect("end event");
    assert_eq!(start.run_id(), Some("run-0042"));
    assert_eq!(end.run_id(), None);
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_parse_and_classify_emit_boundaries() {
    let capture = init_test_capture();

    let a = parse_manifest("logging-boundary/p|1|u1,\n");
    let b = parse_manifest("logging-boundary/p|1|u1,\n");
    let _ = compare_manifests(&a.manifest, &b.manifest);

    capture.assert_event_exists("parse_manifest", EVENT_START);
    capture.assert_event_exists("parse_manifest", EVENT_END);
    capture.assert_event_exists("compare_manifests", EVENT_START);

    let end = capture
        .find("compare_manifests", EVENT_END)
        .expect("compare end event");
    assert!(end.duration_ms().is_some());
    assert!(end.field("shared_count").is_some());
}
