//! Moving scalars across the target boundary.

use varprobe_core::{Kind, Scalar, Target};

/// Copy a live value out, if its kind is copyable.
pub(crate) fn copy_out<T: Target>(target: &T, value: &T::Ref) -> Option<Scalar> {
    let scalar = match target.kind(value) {
        Kind::Nil => Scalar::Nil,
        Kind::Boolean => Scalar::Boolean(target.to_boolean(value)),
        Kind::Number => match target.to_integer(value) {
            Some(i) => Scalar::Integer(i),
            None => Scalar::Float(target.to_float(value)),
        },
        Kind::String => Scalar::String(target.to_bytes(value)),
        Kind::Pointer => Scalar::Pointer(target.to_pointer(value)),
        Kind::Table | Kind::Function | Kind::Userdata | Kind::Thread => return None,
    };
    Some(scalar)
}

/// Materialize a copied scalar inside the target.
pub(crate) fn copy_in<T: Target>(target: &mut T, scalar: &Scalar) -> T::Ref {
    match scalar {
        Scalar::Nil => target.new_nil(),
        Scalar::Boolean(b) => target.new_boolean(*b),
        Scalar::Integer(i) => target.new_integer(*i),
        Scalar::Float(n) => target.new_float(*n),
        Scalar::String(bytes) => target.new_string(bytes),
        Scalar::Pointer(p) => target.new_pointer(*p),
    }
}

/// A value of `kind` whose metatable is the one shared by the whole kind.
pub(crate) fn representative<T: Target>(target: &mut T, kind: Kind) -> Option<T::Ref> {
    let value = match kind {
        Kind::Nil => target.new_nil(),
        Kind::Boolean => target.new_boolean(false),
        Kind::Number => target.new_integer(0),
        Kind::String => target.new_string(b""),
        Kind::Pointer => target.new_pointer(0),
        Kind::Thread => target.main_thread(),
        Kind::Table | Kind::Function | Kind::Userdata => return None,
    };
    Some(value)
}

/// Whether [`representative`] can build a value of `kind`.
pub(crate) fn has_representative(kind: Kind) -> bool {
    !matches!(kind, Kind::Table | Kind::Function | Kind::Userdata)
}
