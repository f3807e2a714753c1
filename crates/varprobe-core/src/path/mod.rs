//! Flat-encoded step trees.
//!
//! A path is one contiguous buffer of [`Step`]s rooted at index 0. A step with
//! a base is immediately followed by the base subpath; an `IndexObject` step
//! is followed by its base and then its key subpath. Children are located by
//! skipping sizes, never by pointer, so a path owns no nodes of its own and
//! copies with a single `memcpy`-like clone.
//!
//! The size function must match the physical layout exactly: a wrong size
//! misreads sibling data. Paths are only built by the constructors here or by
//! [`Path::from_raw`], which validates the layout.

mod raw;
mod step;


pub use raw::{
    RawStep, TAG_FRAME_FUNCTION, TAG_FRAME_LOCAL, TAG_GLOBAL, TAG_INDEX, TAG_INDEX_OBJECT,
    TAG_MAIN_THREAD, TAG_METATABLE, TAG_REGISTRY, TAG_UPVALUE, TAG_USER_PAYLOAD,
};
pub use step::{Lookup, Step};

/// Errors from decoding raw step records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,

    #[error("record {at}: unknown step tag {tag}")]
    UnknownTag { at: usize, tag: u8 },

    #[error("record {at}: invalid mode {mode}")]
    InvalidMode { at: usize, mode: u16 },

    #[error("record {at}: invalid kind code {code}")]
    InvalidKind { at: usize, code: u32 },

    #[error("record {at}: subpath runs past the end of the path")]
    Truncated { at: usize },

    #[error("record {at}: declared base size {declared} but base occupies {actual} records")]
    BaseLength {
        at: usize,
        declared: u32,
        actual: usize,
    },

    #[error("path occupies {size} records but {len} were given")]
    Trailing { size: usize, len: usize },

    #[error("record {at}: pool reference #{index} out of range (pool has {len} entries)")]
    PoolIndex { at: usize, index: u32, len: usize },
}

/// Number of records occupied by the node at the start of `steps`,
/// including its subpaths.
///
/// A node ends where its last subpath ends, so the walk follows bases and
/// keys down to the final leaf without recursing.
pub fn size_of(steps: &[Step]) -> usize {
    let mut at = 0;
    loop {
        match steps[at] {
            Step::IndexObject { base_len, .. } => at += 1 + base_len as usize,
            step if step.is_leaf() => return at + 1,
            _ => at += 1,
        }
    }
}

/// Like [`size_of`] for untrusted buffers: bounds and declared base sizes
/// are checked instead of assumed.
///
/// Sizes are computed for every record from the back, so a subpath is always
/// known before the step that owns it. Each record keeps the first error
/// found in its own subtree.
fn checked_size(steps: &[Step]) -> Result<usize, PathError> {
    let mut sizes: Vec<Result<usize, PathError>> = vec![Ok(0); steps.len()];
    let size_at = |sizes: &[Result<usize, PathError>], at: usize| match sizes.get(at) {
        Some(size) => size.clone(),
        None => Err(PathError::Truncated { at }),
    };
    for at in (0..steps.len()).rev() {
        sizes[at] = match steps[at] {
            Step::IndexObject { base_len, .. } => size_at(&sizes, at + 1).and_then(|base| {
                if base != base_len as usize {
                    return Err(PathError::BaseLength {
                        at,
                        declared: base_len,
                        actual: base,
                    });
                }
                Ok(1 + base + size_at(&sizes, at + 1 + base)?)
            }),
            step if step.is_leaf() => Ok(1),
            _ => size_at(&sizes, at + 1).map(|base| 1 + base),
        };
    }
    size_at(&sizes, 0)
}

/// A validated step buffer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Path(Vec<Step>);

impl Path {
    pub(crate) fn leaf(step: Step) -> Self {
        assert!(step.is_leaf(), "{step} needs a base");
        Self(vec![step])
    }

    /// `step` as the new root over a copy of `base`.
    pub(crate) fn wrap(step: Step, base: &Path) -> Self {
        assert!(step.has_base(), "{step} takes no single base");
        let mut steps = Vec::with_capacity(1 + base.len());
        steps.push(step);
        steps.extend_from_slice(&base.0);
        Self(steps)
    }

    /// `IndexObject` over copies of `base` and `key`.
    ///
    /// Every nonzero pool reference inside the embedded key segment is shifted
    /// by `key_pool_offset`, the length of the base pool the key's pool is
    /// appended to. References inside the base segment keep their values.
    pub(crate) fn embed(lookup: Lookup, base: &Path, key: &Path, key_pool_offset: u32) -> Self {
        let base_len = u32::try_from(base.len()).expect("base path exceeds u32 records");
        let mut steps = Vec::with_capacity(1 + base.len() + key.len());
        steps.push(Step::IndexObject { lookup, base_len });
        steps.extend_from_slice(&base.0);
        steps.extend(key.0.iter().map(|step| rebase(*step, key_pool_offset)));
        Self(steps)
    }

    /// Decode and validate raw records.
    pub fn from_raw(raw: &[RawStep]) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let steps = raw
            .iter()
            .enumerate()
            .map(|(at, r)| Step::from_raw(*r, at))
            .collect::<Result<Vec<_>, _>>()?;
        let size = checked_size(&steps)?;
        if size != steps.len() {
            return Err(PathError::Trailing {
                size,
                len: steps.len(),
            });
        }
        Ok(Self(steps))
    }

    pub fn to_raw(&self) -> Vec<RawStep> {
        self.0.iter().map(|s| s.to_raw()).collect()
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a path has at least its root step.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn root(&self) -> Node<'_> {
        Node {
            steps: &self.0,
            offset: 0,
        }
    }

    /// Pool references of all `Index` steps with their record offsets.
    pub(crate) fn pool_refs(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0.iter().enumerate().filter_map(|(at, step)| match step {
            Step::Index { key, .. } if *key != 0 => Some((at, *key)),
            _ => None,
        })
    }
}

fn rebase(step: Step, offset: u32) -> Step {
    match step {
        Step::Index { lookup, key } if key != 0 => Step::Index {
            lookup,
            key: key.checked_add(offset).expect("pool reference overflow"),
        },
        other => other,
    }
}

/// View of one node inside a path.
#[derive(Clone, Copy, Debug)]
pub struct Node<'p> {
    /// Records from this node to the end of the path.
    steps: &'p [Step],
    /// Position of this node in the whole path.
    offset: usize,
}

impl<'p> Node<'p> {
    pub fn step(&self) -> Step {
        self.steps[0]
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        size_of(self.steps)
    }

    /// Base subpath. Panics for leaf steps.
    pub fn base(&self) -> Node<'p> {
        let step = self.step();
        assert!(
            step.has_base() || matches!(step, Step::IndexObject { .. }),
            "{step} has no base"
        );
        Node {
            steps: &self.steps[1..],
            offset: self.offset + 1,
        }
    }

    /// Key subpath of an `IndexObject`. Panics for other steps.
    pub fn key(&self) -> Node<'p> {
        let Step::IndexObject { base_len, .. } = self.step() else {
            panic!("{} has no key subpath", self.step());
        };
        let skip = 1 + base_len as usize;
        Node {
            steps: &self.steps[skip..],
            offset: self.offset + skip,
        }
    }
}
