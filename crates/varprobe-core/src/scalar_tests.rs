use crate::scalar::format_float;
use crate::{Kind, Scalar};

#[test]
fn kinds() {
    assert_eq!(Scalar::Nil.kind(), Kind::Nil);
    assert_eq!(Scalar::Integer(1).kind(), Kind::Number);
    assert_eq!(Scalar::Float(1.5).kind(), Kind::Number);
    assert_eq!(Scalar::from("x").kind(), Kind::String);
    assert_eq!(Scalar::Pointer(0).kind(), Kind::Pointer);
}

#[test]
fn integer_and_float_stay_distinct() {
    assert_ne!(Scalar::Integer(1), Scalar::Float(1.0));
    assert_eq!(Scalar::Integer(1).to_string(), "1");
    assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
}

#[test]
fn float_formatting() {
    assert_eq!(format_float(0.5), "0.5");
    assert_eq!(format_float(-2.0), "-2.0");
    assert_eq!(format_float(0.1 + 0.2), "0.3");
    assert_eq!(format_float(3.14159), "3.14159");
    assert_eq!(format_float(1e100), "1e+100");
    assert_eq!(format_float(1e15), "1e+15");
    assert_eq!(format_float(1e14), "1e+14");
    assert_eq!(format_float(1e13), "10000000000000.0");
    assert_eq!(format_float(0.0001), "0.0001");
    assert_eq!(format_float(0.00001), "1e-05");
    assert_eq!(format_float(f64::INFINITY), "inf");
    assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
}

#[test]
fn tostring() {
    assert_eq!(Scalar::Nil.to_string(), "nil");
    assert_eq!(Scalar::Boolean(false).to_string(), "false");
    assert_eq!(Scalar::from("tbl").to_string(), "tbl");
    assert_eq!(Scalar::Pointer(0x1f).to_string(), "userdata: 0x1f");
}

#[test]
fn repr_quotes_strings_only() {
    assert_eq!(Scalar::from("x").repr(), r#""x""#);
    assert_eq!(Scalar::Integer(10).repr(), "10");
}

#[test]
fn non_utf8_strings_are_lossy() {
    let s = Scalar::String(vec![b'a', 0xff]);
    assert_eq!(s.to_string(), "a\u{fffd}");
}

#[test]
fn serializes() {
    let values = [
        Scalar::Nil,
        Scalar::Boolean(true),
        Scalar::Integer(-3),
        Scalar::Float(2.5),
        Scalar::from("hi"),
        Scalar::Pointer(255),
    ];
    assert_eq!(
        serde_json::to_string(&values).unwrap(),
        r#"[null,true,-3,2.5,"hi","0xff"]"#
    );
}
