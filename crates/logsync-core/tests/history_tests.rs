use logsync_core::history::{compare_history, parse_history};

const A: &str = r#"{"sessionId":"s1","timestamp":100,"display":"one","project":"/a"}
{"sessionId":"s1","timestamp":200,"display":"two","project":"/a"}
{"sessionId":"s2","timestamp":300,"display":"three","project":"/b"}
"#;

const B: &str = r#"{"sessionId":"s1","timestamp":100,"display":"one","project":"/a"}
{"sessionId":"s3","timestamp":50,"display":"only b","project":"/c"}
not json at all
"#;

#[test]
fn test_compare_history_partitions_keys() {
    let a = parse_history(A);
    let b = parse_history(B);

    let cmp = compare_history(&a, &b);

    assert_eq!(cmp.shared, 1);
    let a_only: Vec<(&str, i64)> = cmp
        .a_only
        .iter()
        .map(|e| (e.session_id.as_str(), e.timestamp))
        .collect();
    assert_eq!(a_only, vec![("s1", 200), ("s2", 300)]);
    assert_eq!(cmp.b_only.len(), 1);
    assert_eq!(cmp.a_only_sessions(), 2);
    assert_eq!(cmp.b_only_sessions(), 1);
    assert!(!cmp.is_consistent());
    assert_eq!(b.skipped, 1);
}

#[test]
fn test_display_text_is_not_part_of_identity() {
    let a = parse_history(r#"{"sessionId":"s","timestamp":1,"display":"before"}"#);
    let b = parse_history(r#"{"sessionId":"s","timestamp":1,"display":"after"}"#);

    let cmp = compare_history(&a, &b);

    assert_eq!(cmp.shared, 1);
    assert!(cmp.is_consistent());
}

#[test]
fn test_empty_histories_are_consistent() {
    let cmp = compare_history(&parse_history(""), &parse_history("\n\n"));
    assert_eq!(cmp.shared, 0);
    assert!(cmp.is_consistent());
}
