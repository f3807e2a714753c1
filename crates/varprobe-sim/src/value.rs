//! Values stored in the sim heap.

use std::rc::Rc;

/// Index of an object in the heap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObjId(pub(crate) u32);

#[derive(Clone, Debug, PartialEq)]
pub enum SimValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(Rc<[u8]>),
    Pointer(usize),
    Object(ObjId),
}

impl SimValue {
    pub fn is_nil(&self) -> bool {
        matches!(self, SimValue::Nil)
    }
}

impl From<bool> for SimValue {
    fn from(b: bool) -> Self {
        SimValue::Boolean(b)
    }
}

impl From<i64> for SimValue {
    fn from(i: i64) -> Self {
        SimValue::Integer(i)
    }
}

impl From<f64> for SimValue {
    fn from(n: f64) -> Self {
        SimValue::Float(n)
    }
}

impl From<&str> for SimValue {
    fn from(s: &str) -> Self {
        SimValue::String(Rc::from(s.as_bytes()))
    }
}

/// Normalized table key.
///
/// Floats with an integral value collapse onto the integer key, so `t[1]`
/// and `t[1.0]` are the same slot. Nil and NaN cannot be keys.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) enum TableKey {
    Boolean(bool),
    Integer(i64),
    Float(u64),
    String(Rc<[u8]>),
    Pointer(usize),
    Object(ObjId),
}

impl TableKey {
    pub(crate) fn from_value(value: &SimValue) -> Option<Self> {
        let key = match value {
            SimValue::Nil => return None,
            SimValue::Boolean(b) => TableKey::Boolean(*b),
            SimValue::Integer(i) => TableKey::Integer(*i),
            SimValue::Float(n) if n.is_nan() => return None,
            SimValue::Float(n) => {
                const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
                if n.fract() == 0.0 && (-LIMIT..LIMIT).contains(n) {
                    TableKey::Integer(*n as i64)
                } else {
                    TableKey::Float(n.to_bits())
                }
            }
            SimValue::String(s) => TableKey::String(Rc::clone(s)),
            SimValue::Pointer(p) => TableKey::Pointer(*p),
            SimValue::Object(id) => TableKey::Object(*id),
        };
        Some(key)
    }

    pub(crate) fn to_value(&self) -> SimValue {
        match self {
            TableKey::Boolean(b) => SimValue::Boolean(*b),
            TableKey::Integer(i) => SimValue::Integer(*i),
            TableKey::Float(bits) => SimValue::Float(f64::from_bits(*bits)),
            TableKey::String(s) => SimValue::String(Rc::clone(s)),
            TableKey::Pointer(p) => SimValue::Pointer(*p),
            TableKey::Object(id) => SimValue::Object(*id),
        }
    }
}
