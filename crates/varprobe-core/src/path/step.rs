//! Path steps.

use std::fmt;

use crate::Kind;

/// How an index step uses its key.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lookup {
    /// `base[key]`, raw lookup.
    Get,
    /// The key following `key` in the aggregate's native iteration order.
    Next,
}

impl Lookup {
    pub(crate) fn to_mode(self) -> u16 {
        match self {
            Lookup::Get => 0,
            Lookup::Next => 1,
        }
    }

    pub(crate) fn from_mode(mode: u16) -> Option<Self> {
        match mode {
            0 => Some(Lookup::Get),
            1 => Some(Lookup::Next),
            _ => None,
        }
    }
}

/// One node of a path.
///
/// Steps with a base are followed in the path buffer by the base subpath;
/// `IndexObject` is additionally followed by its key subpath.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    /// Local `slot` of the call frame `frame` levels up from the evaluation call.
    FrameLocal { frame: u16, slot: u32 },
    /// Callable running in call frame `frame`.
    FrameFunction { frame: u16 },
    /// Aggregate lookup with a constant key. `key` is a 1-based pool
    /// reference; 0 stands for nil.
    Index { lookup: Lookup, key: u32 },
    /// Aggregate lookup with a key that is itself a path. `base_len` is the
    /// size of the base subpath, which locates the key subpath after it.
    IndexObject { lookup: Lookup, base_len: u32 },
    /// Capture `index` of the callable base.
    Upvalue { index: u32 },
    Global,
    Registry,
    MainThread,
    /// Shared metatable of every value of a scalar-like kind. Has no base.
    KindMetatable(Kind),
    /// Metatable of the base aggregate or opaque object.
    Metatable,
    /// Payload of the opaque-object base.
    UserPayload,
}

impl Step {
    /// Whether the step is followed by exactly one base subpath.
    pub fn has_base(self) -> bool {
        matches!(
            self,
            Step::Index { .. } | Step::Upvalue { .. } | Step::Metatable | Step::UserPayload
        )
    }

    /// Whether the step occupies a single record with no subpaths.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            Step::FrameLocal { .. }
                | Step::FrameFunction { .. }
                | Step::Global
                | Step::Registry
                | Step::MainThread
                | Step::KindMetatable(_)
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::FrameLocal { frame, slot } => write!(f, "FrameLocal frame={frame} slot={slot}"),
            Step::FrameFunction { frame } => write!(f, "FrameFunction frame={frame}"),
            Step::Index {
                lookup: Lookup::Get,
                key,
            } => write!(f, "Index key=#{key}"),
            Step::Index {
                lookup: Lookup::Next,
                key,
            } => write!(f, "Next key=#{key}"),
            Step::IndexObject {
                lookup: Lookup::Get,
                base_len,
            } => write!(f, "IndexObject base={base_len}"),
            Step::IndexObject {
                lookup: Lookup::Next,
                base_len,
            } => write!(f, "NextObject base={base_len}"),
            Step::Upvalue { index } => write!(f, "Upvalue {index}"),
            Step::Global => f.write_str("Global"),
            Step::Registry => f.write_str("Registry"),
            Step::MainThread => f.write_str("MainThread"),
            Step::KindMetatable(kind) => write!(f, "Metatable kind={kind}"),
            Step::Metatable => f.write_str("Metatable"),
            Step::UserPayload => f.write_str("UserPayload"),
        }
    }
}
