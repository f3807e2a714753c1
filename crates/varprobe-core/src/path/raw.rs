//! Fixed-size raw step records.
//!
//! Layout per record: `tag` (8 bits), `frame` (16 bits, frame depth or mode
//! flag depending on the tag), `index` (32 bits, slot, pool reference, base
//! size or kind code depending on the tag).

use crate::Kind;

use super::step::{Lookup, Step};
use super::PathError;

pub const TAG_FRAME_LOCAL: u8 = 0;
pub const TAG_FRAME_FUNCTION: u8 = 1;
pub const TAG_INDEX: u8 = 2;
pub const TAG_INDEX_OBJECT: u8 = 3;
pub const TAG_UPVALUE: u8 = 4;
pub const TAG_GLOBAL: u8 = 5;
pub const TAG_REGISTRY: u8 = 6;
pub const TAG_MAIN_THREAD: u8 = 7;
pub const TAG_METATABLE: u8 = 8;
pub const TAG_USER_PAYLOAD: u8 = 9;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RawStep {
    pub tag: u8,
    pub frame: u16,
    pub index: u32,
}

impl RawStep {
    pub const fn new(tag: u8, frame: u16, index: u32) -> Self {
        Self { tag, frame, index }
    }
}

impl Step {
    pub fn to_raw(self) -> RawStep {
        match self {
            Step::FrameLocal { frame, slot } => RawStep::new(TAG_FRAME_LOCAL, frame, slot),
            Step::FrameFunction { frame } => RawStep::new(TAG_FRAME_FUNCTION, frame, 0),
            Step::Index { lookup, key } => RawStep::new(TAG_INDEX, lookup.to_mode(), key),
            Step::IndexObject { lookup, base_len } => {
                RawStep::new(TAG_INDEX_OBJECT, lookup.to_mode(), base_len)
            }
            Step::Upvalue { index } => RawStep::new(TAG_UPVALUE, 0, index),
            Step::Global => RawStep::new(TAG_GLOBAL, 0, 0),
            Step::Registry => RawStep::new(TAG_REGISTRY, 0, 0),
            Step::MainThread => RawStep::new(TAG_MAIN_THREAD, 0, 0),
            Step::KindMetatable(kind) => RawStep::new(TAG_METATABLE, 1, kind.code()),
            Step::Metatable => RawStep::new(TAG_METATABLE, 0, 0),
            Step::UserPayload => RawStep::new(TAG_USER_PAYLOAD, 0, 0),
        }
    }

    /// Decode one record. `at` is only used for error reporting.
    ///
    /// Fields a tag does not use are ignored.
    pub fn from_raw(raw: RawStep, at: usize) -> Result<Step, PathError> {
        let lookup = |mode: u16| {
            Lookup::from_mode(mode).ok_or(PathError::InvalidMode { at, mode })
        };
        let step = match raw.tag {
            TAG_FRAME_LOCAL => Step::FrameLocal {
                frame: raw.frame,
                slot: raw.index,
            },
            TAG_FRAME_FUNCTION => Step::FrameFunction { frame: raw.frame },
            TAG_INDEX => Step::Index {
                lookup: lookup(raw.frame)?,
                key: raw.index,
            },
            TAG_INDEX_OBJECT => Step::IndexObject {
                lookup: lookup(raw.frame)?,
                base_len: raw.index,
            },
            TAG_UPVALUE => Step::Upvalue { index: raw.index },
            TAG_GLOBAL => Step::Global,
            TAG_REGISTRY => Step::Registry,
            TAG_MAIN_THREAD => Step::MainThread,
            TAG_METATABLE => match raw.frame {
                0 => Step::Metatable,
                1 => Step::KindMetatable(
                    Kind::from_code(raw.index)
                        .ok_or(PathError::InvalidKind { at, code: raw.index })?,
                ),
                mode => return Err(PathError::InvalidMode { at, mode }),
            },
            TAG_USER_PAYLOAD => Step::UserPayload,
            tag => return Err(PathError::UnknownTag { at, tag }),
        };
        Ok(step)
    }
}
