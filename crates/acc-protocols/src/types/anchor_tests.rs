use super::*;

#[test]
fn test_kind_and_value() {
    let id = PositionDescriptor::StableId("msg-42".to_string());
    assert_eq!(id.kind(), AnchorKind::Id);
    assert_eq!(id.value(), "msg-42");

    let index = PositionDescriptor::PositionalIndex(2);
    assert_eq!(index.kind(), AnchorKind::Index);
    assert_eq!(index.value(), "2");
}

#[test]
fn test_from_parts() {
    assert_eq!(
        PositionDescriptor::from_parts("index", "7").unwrap(),
        PositionDescriptor::PositionalIndex(7)
    );
    assert_eq!(
        PositionDescriptor::from_parts("fingerprint", "abc").unwrap(),
        PositionDescriptor::TextFingerprint("abc".to_string())
    );
}

#[test]
fn test_from_parts_rejects_unknown_kind() {
    let err = PositionDescriptor::from_parts("xpath", "/html").unwrap_err();
    assert!(matches!(err, AnchorError::MalformedDescriptor(_)));
}

#[test]
fn test_from_parts_rejects_negative_index() {
    assert!(PositionDescriptor::from_parts("index", "-1").is_err());
    assert!(PositionDescriptor::from_parts("index", "two").is_err());
}

#[test]
fn test_serialization_shape() {
    let json = serde_json::to_value(PositionDescriptor::PositionalIndex(3)).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "index", "value": 3}));

    let parsed: PositionDescriptor =
        serde_json::from_value(serde_json::json!({"kind": "id", "value": "m1"})).unwrap();
    assert_eq!(parsed, PositionDescriptor::StableId("m1".to_string()));
}

#[test]
fn test_kind_display() {
    assert_eq!(AnchorKind::Fingerprint.to_string(), "fingerprint");
}
