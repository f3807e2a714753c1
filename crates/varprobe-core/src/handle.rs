//! Handles and control-side values.
//!
//! A handle is an immutable lazy reference: a path saying how to re-derive a
//! target value plus the pool of scalars its lookups use. It holds nothing
//! live in the target, so dropping one needs no cooperation from it.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::path::{Lookup, Path, PathError, Step};
use crate::{ConstantPool, Kind, Scalar};

/// Well-known target roots.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Root {
    Global,
    Registry,
    MainThread,
}

impl Root {
    fn step(self) -> Step {
        match self {
            Root::Global => Step::Global,
            Root::Registry => Step::Registry,
            Root::MainThread => Step::MainThread,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Handle {
    path: Path,
    pool: ConstantPool,
}

impl Handle {
    fn leaf(step: Step) -> Self {
        Self {
            path: Path::leaf(step),
            pool: ConstantPool::new(),
        }
    }

    pub fn root(root: Root) -> Self {
        Self::leaf(root.step())
    }

    pub fn frame_local(frame: u16, slot: u32) -> Self {
        Self::leaf(Step::FrameLocal { frame, slot })
    }

    pub fn frame_function(frame: u16) -> Self {
        Self::leaf(Step::FrameFunction { frame })
    }

    /// Shared metatable of `kind`.
    pub fn kind_metatable(kind: Kind) -> Self {
        Self::leaf(Step::KindMetatable(kind))
    }

    /// Assemble a handle from decoded parts, checking every pool reference.
    pub fn from_parts(path: Path, pool: ConstantPool) -> Result<Self, PathError> {
        if let Some((at, index)) = path
            .pool_refs()
            .find(|(_, index)| *index as usize > pool.len())
        {
            return Err(PathError::PoolIndex {
                at,
                index,
                len: pool.len(),
            });
        }
        Ok(Self { path, pool })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pool(&self) -> &ConstantPool {
        &self.pool
    }

    /// `self[key]` with a constant key.
    ///
    /// # Panics
    ///
    /// If `key` is nil. Only [`Handle::next_key`] takes a nil key.
    pub fn index(&self, key: &Scalar) -> Self {
        assert!(!key.is_nil(), "nil key cannot be looked up");
        self.constant_lookup(Lookup::Get, key)
    }

    /// The key following `last` in native order; nil starts the iteration.
    pub fn next_key(&self, last: &Scalar) -> Self {
        self.constant_lookup(Lookup::Next, last)
    }

    fn constant_lookup(&self, lookup: Lookup, key: &Scalar) -> Self {
        let (pool, key) = if key.is_nil() {
            (self.pool.clone(), 0)
        } else {
            self.pool.appended(key.clone())
        };
        Self {
            path: Path::wrap(Step::Index { lookup, key }, &self.path),
            pool,
        }
    }

    /// Lookup whose key is itself a handle. The pools are merged and the
    /// key's references rebased past the end of this handle's pool.
    pub fn index_object(&self, lookup: Lookup, key: &Handle) -> Self {
        let (pool, offset) = self.pool.merged(&key.pool);
        Self {
            path: Path::embed(lookup, &self.path, &key.path, offset),
            pool,
        }
    }

    pub fn upvalue(&self, index: u32) -> Self {
        self.wrap(Step::Upvalue { index })
    }

    pub fn metatable(&self) -> Self {
        self.wrap(Step::Metatable)
    }

    pub fn user_payload(&self) -> Self {
        self.wrap(Step::UserPayload)
    }

    fn wrap(&self, step: Step) -> Self {
        Self {
            path: Path::wrap(step, &self.path),
            pool: self.pool.clone(),
        }
    }

    /// Listing of steps and pool entries for debugging.
    pub fn dump(&self) -> String {
        let width = self.path.len().saturating_sub(1).to_string().len();
        let mut out = String::from("steps:\n");
        for (i, step) in self.path.steps().iter().enumerate() {
            out.push_str(&format!("  {i:>width$} {step}\n"));
        }
        if !self.pool.is_empty() {
            out.push_str("pool:\n");
            for (i, value) in self.pool.iter().enumerate() {
                out.push_str(&format!("  #{} {}\n", i + 1, value.repr()));
            }
        }
        out
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::describe::describe_handle(self))
    }
}

/// A value as seen by the control side: either copied, or left in the target
/// and referenced lazily.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Handle(Handle),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Handle(_) => None,
        }
    }

    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Value::Handle(h) => Some(h),
            Value::Scalar(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::describe(self))
    }
}

/// Scalars serialize as themselves, handles as their diagnostic path.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::Handle(h) => serializer.serialize_str(&h.to_string()),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Handle(h)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(i.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(b.into())
    }
}
