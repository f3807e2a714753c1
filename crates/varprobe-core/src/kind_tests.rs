use crate::Kind;

#[test]
fn codes_roundtrip() {
    for kind in Kind::ALL {
        assert_eq!(Kind::from_code(kind.code()), Some(kind));
    }
    assert_eq!(Kind::from_code(9), None);
    assert_eq!(Kind::from_code(u32::MAX), None);
}

#[test]
fn copyable_set_is_closed() {
    let copyable: Vec<_> = Kind::ALL.into_iter().filter(|k| k.is_copyable()).collect();
    assert_eq!(
        copyable,
        [
            Kind::Nil,
            Kind::Boolean,
            Kind::Pointer,
            Kind::Number,
            Kind::String
        ]
    );
}

#[test]
fn names() {
    assert_eq!(Kind::Number.name(), "number");
    assert_eq!(Kind::Pointer.name(), "lightuserdata");
    assert_eq!(Kind::Userdata.to_string(), "userdata");
}

#[test]
fn serializes_as_name() {
    assert_eq!(serde_json::to_string(&Kind::Table).unwrap(), r#""table""#);
}
