//! Constant pools.
//!
//! Scalars captured while building a handle, referenced 1-based by `Index`
//! steps (reference 0 means nil). A pool belongs to exactly one handle and
//! is never mutated once that handle exists; extending a handle produces a
//! new pool.

use crate::Scalar;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstantPool(Vec<Scalar>);

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entry at a 1-based reference. `None` for 0 and out-of-range references.
    pub fn get(&self, reference: u32) -> Option<&Scalar> {
        let index = reference.checked_sub(1)?;
        self.0.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scalar> {
        self.0.iter()
    }

    /// Copy of this pool with `value` appended, and the reference to it.
    pub(crate) fn appended(&self, value: Scalar) -> (Self, u32) {
        let mut entries = Vec::with_capacity(self.0.len() + 1);
        entries.extend_from_slice(&self.0);
        entries.push(value);
        let reference = u32::try_from(entries.len()).expect("pool exceeds u32 entries");
        (Self(entries), reference)
    }

    /// Copy of this pool followed by all of `other`, and the offset by which
    /// references into `other` must be shifted.
    pub(crate) fn merged(&self, other: &Self) -> (Self, u32) {
        let offset = u32::try_from(self.0.len()).expect("pool exceeds u32 entries");
        let mut entries = Vec::with_capacity(self.0.len() + other.0.len());
        entries.extend_from_slice(&self.0);
        entries.extend_from_slice(&other.0);
        (Self(entries), offset)
    }
}

impl FromIterator<Scalar> for ConstantPool {
    fn from_iter<I: IntoIterator<Item = Scalar>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
