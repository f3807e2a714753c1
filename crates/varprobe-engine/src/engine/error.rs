//! Errors that can occur while inspecting a target.

use std::fmt;

use varprobe_core::Kind;

pub type Result<T, E = InspectError> = std::result::Result<T, E>;

/// What a lookup expected to find and did not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Missing {
    Frame(u16),
    Local { frame: u16, slot: u32 },
    Upvalue(u32),
    Metatable,
    Payload,
    Key,
    /// A `next` lookup ran past the last key.
    IterationEnd,
    PoolEntry(u32),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Frame(frame) => write!(f, "frame {frame}"),
            Missing::Local { frame, slot } => write!(f, "local {slot} of frame {frame}"),
            Missing::Upvalue(index) => write!(f, "upvalue {index}"),
            Missing::Metatable => f.write_str("metatable"),
            Missing::Payload => f.write_str("user payload"),
            Missing::Key => f.write_str("key"),
            Missing::IterationEnd => f.write_str("next key"),
            Missing::PoolEntry(index) => write!(f, "pool entry #{index}"),
        }
    }
}

/// Resource a lookup ran out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exhaustion {
    /// Path nesting exceeded the configured limit.
    RecursionLimit(u32),
    /// The target refused to grow its working area.
    WorkingArea,
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exhaustion::RecursionLimit(limit) => write!(f, "recursion limit of {limit} exceeded"),
            Exhaustion::WorkingArea => f.write_str("target working area exhausted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectError {
    /// A step was applied to a value of the wrong kind.
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: Kind },

    #[error("{0} not found")]
    NotFound(Missing),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// Hard failure: the caller should stop, not retry with another path.
    #[error("{0}")]
    ResourceExhausted(Exhaustion),
}

impl InspectError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, InspectError::ResourceExhausted(_))
    }
}

impl From<Missing> for InspectError {
    fn from(missing: Missing) -> Self {
        InspectError::NotFound(missing)
    }
}

impl From<Exhaustion> for InspectError {
    fn from(exhaustion: Exhaustion) -> Self {
        InspectError::ResourceExhausted(exhaustion)
    }
}

/// Folding expected failures into absence.
pub trait Outcome<T> {
    /// `Ok(None)` for soft failures; fatal ones stay `Err`.
    fn soft(self) -> Result<Option<T>>;
}

impl<T> Outcome<T> for Result<T> {
    fn soft(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_fatal() => Err(e),
            Err(_) => Ok(None),
        }
    }
}
