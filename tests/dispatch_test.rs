//! Dispatch behaviour of the default format registry
//!
//! Exercises the public surface only: `FormatRegistry::outbound` and
//! `FormatRegistry::inbound` with the built-in format identifiers.

use formatbox::formats::{Direction, FormatError, FormatRegistry, GDOC, INI, JSON, TXT};
use formatbox::value::{Value, ValueMap};
use std::sync::Arc;
use std::thread;

fn properties() -> Value {
    [
        ("Key", Value::from("Value")),
        ("frames", Value::List(vec![Value::from(1001), Value::from(1100)])),
        ("fps", Value::from(23.976)),
        ("enabled", Value::from(true)),
        ("notes", Value::Null),
        (
            "owner",
            [("name", "marcus"), ("team", "lighting")]
                .into_iter()
                .collect::<Value>(),
        ),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_round_trip_text_and_json() {
    let registry = FormatRegistry::with_defaults();

    let samples = [
        (TXT, Value::from("")),
        (TXT, Value::from("multi\nline ünïcode")),
        (JSON, properties()),
        (JSON, Value::List(vec![Value::from("a"), Value::from(-3)])),
        (JSON, Value::from("just a string")),
        (JSON, Value::Map(ValueMap::new())),
    ];

    for (format_id, value) in samples {
        let written = registry.outbound(&value, format_id).unwrap();
        let read = registry.inbound(&written, format_id).unwrap();
        assert_eq!(read, value, "round trip through {format_id}");
    }
}

#[test]
fn test_json_output_is_deterministic() {
    let registry = FormatRegistry::with_defaults();

    let first = registry.outbound(&properties(), JSON).unwrap();
    let second = registry.outbound(&properties(), JSON).unwrap();
    assert_eq!(first, second);
    assert!(first.as_str().unwrap().starts_with("{\n    \"Key\": \"Value\","));
}

#[test]
fn test_unregistered_format_is_unsupported() {
    let registry = FormatRegistry::with_defaults();

    for format_id in [".xyz", "json", ".JSON", ""] {
        let err = registry.outbound(&Value::from("x"), format_id).unwrap_err();
        assert!(
            matches!(err, FormatError::UnsupportedFormat(ref id) if id == format_id),
            "{format_id:?} gave {err:?}"
        );
        let err = registry.inbound(&Value::from("x"), format_id).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedFormat(_)));
    }
}

#[test]
fn test_text_never_fails() {
    let registry = FormatRegistry::with_defaults();

    for value in [
        Value::Null,
        Value::from(f64::NAN),
        Value::from(-7),
        properties(),
        Value::Bytes(bytes::Bytes::from_static(b"\xff\xfe")),
    ] {
        assert!(registry.outbound(&value, TXT).is_ok());
        assert!(registry.inbound(&value, TXT).is_ok());
    }
}

#[test]
fn test_json_failures() {
    let registry = FormatRegistry::with_defaults();

    let unencodable: Value = [("payload", Value::Bytes(bytes::Bytes::from_static(b"\x00\x01")))]
        .into_iter()
        .collect();
    match registry.outbound(&unencodable, JSON).unwrap_err() {
        FormatError::DataCorrupted { value, reason } => {
            assert_eq!(*value, unencodable);
            assert!(!reason.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = registry.inbound(&Value::from("{not valid"), JSON).unwrap_err();
    assert!(matches!(err, FormatError::MalformedInput { .. }));
}

#[test]
fn test_section_config() {
    let registry = FormatRegistry::with_defaults();

    let parsed = registry.inbound(&Value::from("[A]\nkey=val\n"), INI).unwrap();
    let expected: Value = [("A", [("key", "val")].into_iter().collect::<Value>())]
        .into_iter()
        .collect();
    assert_eq!(parsed, expected);

    let parsed = registry.inbound(&Value::from("[A]\nKey=val\n"), INI).unwrap();
    assert!(parsed.get("A").unwrap().get("Key").is_some());
    assert!(parsed.get("A").unwrap().get("key").is_none());

    let err = registry.outbound(&parsed, INI).unwrap_err();
    assert!(matches!(
        err,
        FormatError::NotImplemented {
            direction: Direction::Outbound,
            ..
        }
    ));
}

#[test]
fn test_remote_documents_not_implemented_by_default() {
    let registry = FormatRegistry::with_defaults();
    let descriptor: Value = [("link", "https://docs.example.com/d/1"), ("data", "body")]
        .into_iter()
        .collect();

    for value in [descriptor, Value::Null] {
        assert!(matches!(
            registry.outbound(&value, GDOC).unwrap_err(),
            FormatError::NotImplemented { .. }
        ));
        assert!(matches!(
            registry.inbound(&value, GDOC).unwrap_err(),
            FormatError::NotImplemented { .. }
        ));
    }
}

/// One call per handler, rendered so results can be compared
fn dispatch_all(registry: &FormatRegistry) -> Vec<String> {
    let ini_text = Value::from("[DEFAULT]\nroot = /mnt\n[job]\ndir = %(root)s/job\n");

    vec![
        format!("{:?}", registry.outbound(&properties(), JSON)),
        format!("{:?}", registry.outbound(&properties(), TXT)),
        format!("{:?}", registry.inbound(&ini_text, INI)),
        format!("{:?}", registry.inbound(&Value::from("{bad"), JSON)),
        format!("{:?}", registry.outbound(&Value::Null, GDOC)),
    ]
}

#[test]
fn test_concurrent_dispatch_matches_sequential() {
    let registry = Arc::new(FormatRegistry::with_defaults());
    let expected = dispatch_all(&registry);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..50)
                    .map(|_| dispatch_all(&registry))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for results in handle.join().unwrap() {
            assert_eq!(results, expected);
        }
    }
}
