//! Value kinds of the target interpreter.

use serde::{Serialize, Serializer};

/// Kind name reported when a value could not be resolved.
pub const NO_VALUE: &str = "no value";

/// Kind of a value living in the target.
///
/// The first five kinds are scalars and cross between contexts by copy.
/// The rest stay resident in the target and are only reachable through a
/// [`Handle`](crate::Handle).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    Nil,
    Boolean,
    /// Raw foreign pointer with no identity of its own.
    Pointer,
    Number,
    String,
    /// Key-value aggregate.
    Table,
    Function,
    /// Opaque object with an optional payload and metatable.
    Userdata,
    /// Execution context.
    Thread,
}

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Nil,
        Kind::Boolean,
        Kind::Pointer,
        Kind::Number,
        Kind::String,
        Kind::Table,
        Kind::Function,
        Kind::Userdata,
        Kind::Thread,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Boolean => "boolean",
            Kind::Pointer => "lightuserdata",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Table => "table",
            Kind::Function => "function",
            Kind::Userdata => "userdata",
            Kind::Thread => "thread",
        }
    }

    /// Stable numeric code used by the raw step encoding.
    pub fn code(self) -> u32 {
        match self {
            Kind::Nil => 0,
            Kind::Boolean => 1,
            Kind::Pointer => 2,
            Kind::Number => 3,
            Kind::String => 4,
            Kind::Table => 5,
            Kind::Function => 6,
            Kind::Userdata => 7,
            Kind::Thread => 8,
        }
    }

    pub fn from_code(code: u32) -> Option<Kind> {
        Kind::ALL.get(code as usize).copied()
    }

    /// Whether values of this kind are copied rather than referenced.
    pub fn is_copyable(self) -> bool {
        matches!(
            self,
            Kind::Nil | Kind::Boolean | Kind::Pointer | Kind::Number | Kind::String
        )
    }

    /// Whether values of this kind carry their own metatable.
    ///
    /// Every other kind shares one metatable per kind.
    pub fn has_own_metatable(self) -> bool {
        matches!(self, Kind::Table | Kind::Userdata)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Kind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}
