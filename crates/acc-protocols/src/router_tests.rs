use super::*;
use crate::types::PositionDescriptor;

#[test]
fn test_parse_add_entry() {
    let json = r#"{
        "type": "ACC_ADD_ENTRY",
        "payload": {
            "content": "<p>hi</p>",
            "source_url": "https://chat.example.com/c/1",
            "tags": [],
            "anchor": {"kind": "index", "value": 2}
        }
    }"#;
    let request = Request::parse(json).unwrap();
    match request {
        Request::AddEntry(entry) => {
            assert_eq!(entry.anchor, PositionDescriptor::PositionalIndex(2));
            assert_eq!(entry.content, "<p>hi</p>");
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[test]
fn test_parse_clear_all_without_payload() {
    let request = Request::parse(r#"{"type": "ACC_CLEAR_ALL_ENTRIES"}"#).unwrap();
    assert_eq!(request, Request::ClearAll);
    assert!(request.is_mutation());
}

#[test]
fn test_parse_search_defaults_keyword() {
    let request = Request::parse(r#"{"type": "ACC_SEARCH", "payload": {}}"#).unwrap();
    assert_eq!(request, Request::Search { keyword: String::new() });
    assert!(!request.is_mutation());
}

#[test]
fn test_parse_search_without_payload_lists_everything() {
    for json in [
        r#"{"type": "ACC_SEARCH"}"#,
        r#"{"type": "ACC_SEARCH", "payload": null}"#,
    ] {
        assert_eq!(
            Request::parse(json).unwrap(),
            Request::Search { keyword: String::new() }
        );
    }
}

#[test]
fn test_parse_batch_delete_without_payload() {
    assert_eq!(
        Request::parse(r#"{"type": "ACC_BATCH_DELETE"}"#).unwrap(),
        Request::BatchDelete { ids: Vec::new() }
    );
}

#[test]
fn test_payload_still_required_for_delete_entry() {
    assert!(matches!(
        Request::parse(r#"{"type": "ACC_DELETE_ENTRY"}"#),
        Err(RouterError::InvalidRequest(_))
    ));
}

#[test]
fn test_parse_unknown_type() {
    let err = Request::parse(r#"{"type": "ACC_FOO"}"#).unwrap_err();
    assert!(matches!(err, RouterError::UnknownType(ref t) if t == "ACC_FOO"));
}

#[test]
fn test_parse_missing_type() {
    let err = Request::parse(r#"{"payload": {}}"#).unwrap_err();
    assert!(matches!(err, RouterError::InvalidRequest(_)));
}

#[test]
fn test_parse_bad_payload() {
    let err = Request::parse(r#"{"type": "ACC_DELETE_ENTRY", "payload": {}}"#).unwrap_err();
    assert!(matches!(err, RouterError::InvalidRequest(_)));
}

#[test]
fn test_type_names_are_known() {
    let requests = vec![
        Request::Search { keyword: String::new() },
        Request::DeleteEntry { id: "1".into() },
        Request::BatchDelete { ids: vec![] },
        Request::ClearAll,
        Request::SetTitle { id: "1".into(), title: None },
    ];
    for request in requests {
        assert!(Request::TYPES.contains(&request.type_name()));
    }
}

#[test]
fn test_response_shapes() {
    let json = serde_json::to_value(Response::created("7")).unwrap();
    assert_eq!(json, serde_json::json!({"ok": true, "id": "7"}));

    let json = serde_json::to_value(Response::error("nope")).unwrap();
    assert_eq!(json, serde_json::json!({"ok": false, "error": "nope"}));
}

#[test]
fn test_notification_wire_form() {
    let json = serde_json::to_string(&Notification::DataChanged).unwrap();
    assert_eq!(json, r#"{"type":"ACC_DATA_CHANGED"}"#);
}
