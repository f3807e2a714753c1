#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for varprobe.
//!
//! Everything in this crate lives on the control side and never touches the
//! target interpreter:
//! - **Path model**: flat-encoded step trees describing how to re-derive a value
//! - **Handles**: a path plus the constant pool its lookups reference
//! - **Formatter**: diagnostic rendering of handles and scalars
//! - **Target**: the narrow capability trait an interpreter binding implements

pub mod colors;
pub mod describe;
pub mod handle;
pub mod kind;
pub mod path;
pub mod pool;
pub mod scalar;
pub mod target;

#[cfg(test)]
mod describe_tests;
#[cfg(test)]
mod handle_tests;
#[cfg(test)]
mod kind_tests;
#[cfg(test)]
mod scalar_tests;

pub use colors::Colors;
pub use describe::describe;
pub use handle::{Handle, Root, Value};
pub use kind::Kind;
pub use path::{Lookup, Node, Path, PathError, RawStep, Step};
pub use pool::ConstantPool;
pub use scalar::Scalar;
pub use target::{Callable, RawNext, Target};
