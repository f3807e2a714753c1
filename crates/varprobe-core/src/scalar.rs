//! Copyable values.
//!
//! A scalar is the only thing that ever crosses between the control side and
//! the target by value. Integer and float numbers stay distinct.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::Kind;

#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// Byte string, not necessarily UTF-8.
    String(Vec<u8>),
    Pointer(usize),
}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Nil => Kind::Nil,
            Scalar::Boolean(_) => Kind::Boolean,
            Scalar::Integer(_) | Scalar::Float(_) => Kind::Number,
            Scalar::String(_) => Kind::String,
            Scalar::Pointer(_) => Kind::Pointer,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Scalar::Nil)
    }

    /// Quoted form used by dumps, where strings must stand out from numbers.
    pub fn repr(&self) -> String {
        match self {
            Scalar::String(bytes) => format!("{:?}", String::from_utf8_lossy(bytes)),
            other => other.to_string(),
        }
    }
}

/// Interpreter-style `tostring`.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Nil => f.write_str("nil"),
            Scalar::Boolean(b) => write!(f, "{b}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(n) => f.write_str(&format_float(*n)),
            Scalar::String(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Scalar::Pointer(p) => write!(f, "userdata: {p:#x}"),
        }
    }
}

/// Format a float like C's `%.14g`, with a `.0` suffix when the result
/// would otherwise read as an integer.
pub fn format_float(n: f64) -> String {
    if n.is_nan() {
        return if n.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    const PRECISION: i32 = 14;
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, n);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    let mut out = if (-4..PRECISION).contains(&exp) {
        let decimals = (PRECISION - 1 - exp) as usize;
        trim_fraction(&format!("{n:.decimals$}")).to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    };

    if out.bytes().all(|b| b == b'-' || b.is_ascii_digit()) {
        out.push_str(".0");
    }
    out
}

fn trim_fraction(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Nil => serializer.serialize_none(),
            Scalar::Boolean(b) => serializer.serialize_bool(*b),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(n) => serializer.serialize_f64(*n),
            Scalar::String(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
            Scalar::Pointer(p) => serializer.serialize_str(&format!("{p:#x}")),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Float(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Scalar {
    fn from(bytes: &[u8]) -> Self {
        Scalar::String(bytes.to_vec())
    }
}
