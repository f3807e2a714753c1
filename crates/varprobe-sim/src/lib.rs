//! In-process reference target for varprobe.
//!
//! A small interpreter heap with everything the evaluator can reach:
//! insertion-ordered tables, closures with named captures, native functions,
//! opaque objects with payloads and metatables, per-kind shared metatables,
//! threads, and a call stack that tests push and pop around inspection.
//!
//! Live refs handed to the evaluator are counted, so tests can assert that
//! every operation leaves the working area exactly as it found it.

mod pin;
mod target;
mod value;


pub use pin::Pin;
pub use target::{SimRef, SimTarget, DEFAULT_CAPACITY};
pub use value::{ObjId, SimValue};
