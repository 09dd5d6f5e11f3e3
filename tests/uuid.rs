use datalize::{ErrorKind, from_value, to_value};
use facet_testhelpers::test;
use serde_json::json;
use uuid::Uuid;

#[test]
fn uuid_types() {
    let uuid_str = "d3c78de74eba445081002a600b37017e";
    let uuid_obj = Uuid::parse_str("d3c78de7-4eba-4450-8100-2a600b37017e").unwrap();
    assert_eq!(from_value::<Uuid>(&json!(uuid_str)).unwrap(), uuid_obj);
    assert_eq!(to_value(&uuid_obj), json!(uuid_str));
}

#[test]
fn dashes_and_uppercase_are_accepted() {
    let parsed = from_value::<Uuid>(&json!("D3C78DE7-4EBA-4450-8100-2A600B37017E")).unwrap();
    assert_eq!(to_value(&parsed), json!("d3c78de74eba445081002a600b37017e"));
}

#[test]
fn malformed_uuids() {
    for input in [
        "abc",
        "d3c78de74eba445081002a600b37017x",
        "{d3c78de7-4eba-4450-8100-2a600b37017e}",
        "",
    ] {
        let err = from_value::<Uuid>(&json!(input)).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::InvalidFormat { .. }),
            "{input:?} gave {err}"
        );
    }

    let err = from_value::<Uuid>(&json!(12)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ShapeMismatch { .. }));
}
