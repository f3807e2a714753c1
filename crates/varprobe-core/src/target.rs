//! Capability interface onto the target interpreter.
//!
//! This is the whole surface the evaluator needs: kind inspection, scalar
//! readers and constructors, call-stack introspection, raw aggregate access,
//! captures, metatables and opaque-object payloads.
//!
//! Live values are represented by [`Target::Ref`]. Each ref occupies one slot
//! of the target's working area for as long as it is alive; dropping it frees
//! the slot. Callers reserve room with [`Target::reserve`] before producing
//! new refs. None of these operations may run target-defined code.

use crate::Kind;

/// Result of a raw "next key" query.
#[derive(Debug)]
pub enum RawNext<R> {
    /// The following key and its value.
    Entry(R, R),
    /// The key was the last one.
    End,
    /// The key is not present in the aggregate.
    InvalidKey,
}

/// What a callable is made of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Callable {
    /// Implemented natively, at `address`.
    Native { address: usize },
    /// Implemented in the target's own language.
    Script {
        source: String,
        line_defined: i64,
        last_line_defined: i64,
    },
}

pub trait Target {
    /// A live value pinned in the working area.
    type Ref: Clone;

    /// Make sure `slots` more refs can be produced. `false` means the working
    /// area cannot grow.
    fn reserve(&mut self, slots: usize) -> bool;

    fn kind(&self, value: &Self::Ref) -> Kind;

    /// Identity of a non-scalar value, for display only.
    fn identity(&self, value: &Self::Ref) -> usize;

    fn to_boolean(&self, value: &Self::Ref) -> bool;
    /// `Some` only when the number is held in integer form.
    fn to_integer(&self, value: &Self::Ref) -> Option<i64>;
    fn to_float(&self, value: &Self::Ref) -> f64;
    fn to_bytes(&self, value: &Self::Ref) -> Vec<u8>;
    fn to_pointer(&self, value: &Self::Ref) -> usize;

    fn new_nil(&mut self) -> Self::Ref;
    fn new_boolean(&mut self, b: bool) -> Self::Ref;
    fn new_integer(&mut self, i: i64) -> Self::Ref;
    fn new_float(&mut self, n: f64) -> Self::Ref;
    fn new_string(&mut self, bytes: &[u8]) -> Self::Ref;
    fn new_pointer(&mut self, p: usize) -> Self::Ref;

    fn globals(&mut self) -> Self::Ref;
    fn registry(&mut self) -> Self::Ref;
    fn main_thread(&mut self) -> Self::Ref;

    /// Whether a call frame exists `level` frames up the current call stack.
    fn has_frame(&self, level: u16) -> bool;
    /// Name and value of local `slot` in frame `level`.
    fn frame_local(&mut self, level: u16, slot: u32) -> Option<(String, Self::Ref)>;
    /// Callable running in frame `level`.
    fn frame_function(&mut self, level: u16) -> Option<Self::Ref>;

    /// Lookup bypassing any override. Absent keys yield nil.
    fn raw_get(&mut self, table: &Self::Ref, key: &Self::Ref) -> Self::Ref;
    /// Native-order iteration bypassing any override. A nil key starts it.
    fn raw_next(&mut self, table: &Self::Ref, key: &Self::Ref) -> RawNext<Self::Ref>;

    /// Name and value of capture `index` of a callable.
    fn upvalue(&mut self, function: &Self::Ref, index: u32) -> Option<(String, Self::Ref)>;
    fn metatable(&mut self, value: &Self::Ref) -> Option<Self::Ref>;
    /// Payload attached to an opaque object.
    fn user_payload(&mut self, userdata: &Self::Ref) -> Option<Self::Ref>;

    /// `None` when `function` is not callable.
    fn callable(&self, function: &Self::Ref) -> Option<Callable>;
    /// Execution status of the target's current context.
    fn status(&self) -> i32;
}
