//! Path evaluator.
//!
//! Walks a path from its root node down to the leaves and back, producing the
//! live value it designates. Every intermediate ref is dropped as soon as the
//! parent step has used it, so a successful evaluation leaves exactly one ref
//! alive in the working area and a failed one leaves none.

use varprobe_core::{ConstantPool, Kind, Lookup, Node, Path, RawNext, Step, Target};

use super::error::{Exhaustion, InspectError, Missing, Result};
use super::inspector::EvalLimits;
use super::marshal::{copy_in, representative};
use super::trace::Tracer;

pub(crate) struct Evaluator<'a, T: Target, R: Tracer> {
    target: &'a mut T,
    pool: &'a ConstantPool,
    limits: EvalLimits,
    tracer: &'a mut R,
}

impl<'a, T: Target, R: Tracer> Evaluator<'a, T, R> {
    pub(crate) fn new(
        target: &'a mut T,
        pool: &'a ConstantPool,
        limits: EvalLimits,
        tracer: &'a mut R,
    ) -> Self {
        Self {
            target,
            pool,
            limits,
            tracer,
        }
    }

    pub(crate) fn evaluate(&mut self, path: &Path) -> Result<T::Ref> {
        self.node(path.root(), 0)
    }

    fn node(&mut self, node: Node<'_>, depth: u32) -> Result<T::Ref> {
        let step = node.step();
        if depth >= self.limits.recursion_limit {
            let limit = self.limits.recursion_limit;
            return Err(self.fail(step, depth, Exhaustion::RecursionLimit(limit).into()));
        }
        if !self.target.reserve(self.limits.stack_reserve) {
            return Err(self.fail(step, depth, Exhaustion::WorkingArea.into()));
        }

        self.tracer.trace_enter(step, depth);
        let value = self.step(node, depth)?;
        let kind = self.target.kind(&value);
        self.tracer.trace_resolved(step, depth, kind);
        Ok(value)
    }

    fn step(&mut self, node: Node<'_>, depth: u32) -> Result<T::Ref> {
        let step = node.step();
        match step {
            Step::FrameLocal { frame, slot } => {
                if !self.target.has_frame(frame) {
                    return Err(self.fail(step, depth, Missing::Frame(frame).into()));
                }
                match self.target.frame_local(frame, slot) {
                    Some((_, value)) => Ok(value),
                    None => Err(self.fail(step, depth, Missing::Local { frame, slot }.into())),
                }
            }
            Step::FrameFunction { frame } => match self.target.frame_function(frame) {
                Some(function) => Ok(function),
                None => Err(self.fail(step, depth, Missing::Frame(frame).into())),
            },
            Step::Index { lookup, key } => {
                let table = self.aggregate(node, depth)?;
                let key = match key {
                    0 => self.target.new_nil(),
                    index => match self.pool.get(index) {
                        Some(scalar) => copy_in(self.target, scalar),
                        None => {
                            let error = Missing::PoolEntry(index).into();
                            return Err(self.fail(step, depth, error));
                        }
                    },
                };
                self.lookup(step, depth, lookup, &table, &key)
            }
            Step::IndexObject { lookup, .. } => {
                let table = self.aggregate(node, depth)?;
                let key = self.node(node.key(), depth + 1)?;
                self.lookup(step, depth, lookup, &table, &key)
            }
            Step::Upvalue { index } => {
                let function =
                    self.checked_base(node, depth, "function", |k| k == Kind::Function)?;
                match self.target.upvalue(&function, index) {
                    Some((_, value)) => Ok(value),
                    None => Err(self.fail(step, depth, Missing::Upvalue(index).into())),
                }
            }
            Step::Global => Ok(self.target.globals()),
            Step::Registry => Ok(self.target.registry()),
            Step::MainThread => Ok(self.target.main_thread()),
            Step::KindMetatable(kind) => {
                let Some(value) = representative(self.target, kind) else {
                    let error = InspectError::Unsupported("kind has no shared metatable");
                    return Err(self.fail(step, depth, error));
                };
                match self.target.metatable(&value) {
                    Some(mt) => Ok(mt),
                    None => Err(self.fail(step, depth, Missing::Metatable.into())),
                }
            }
            Step::Metatable => {
                let base =
                    self.checked_base(node, depth, "table or userdata", Kind::has_own_metatable)?;
                match self.target.metatable(&base) {
                    Some(mt) => Ok(mt),
                    None => Err(self.fail(step, depth, Missing::Metatable.into())),
                }
            }
            Step::UserPayload => {
                let base = self.checked_base(node, depth, "userdata", |k| k == Kind::Userdata)?;
                match self.target.user_payload(&base) {
                    Some(payload) => Ok(payload),
                    None => Err(self.fail(step, depth, Missing::Payload.into())),
                }
            }
        }
    }

    fn aggregate(&mut self, node: Node<'_>, depth: u32) -> Result<T::Ref> {
        self.checked_base(node, depth, "table", |k| k == Kind::Table)
    }

    /// Evaluate the base of `node` and check its kind.
    fn checked_base(
        &mut self,
        node: Node<'_>,
        depth: u32,
        expected: &'static str,
        accepts: impl Fn(Kind) -> bool,
    ) -> Result<T::Ref> {
        let base = self.node(node.base(), depth + 1)?;
        let found = self.target.kind(&base);
        if accepts(found) {
            return Ok(base);
        }
        drop(base);
        Err(self.fail(
            node.step(),
            depth,
            InspectError::TypeMismatch { expected, found },
        ))
    }

    fn lookup(
        &mut self,
        step: Step,
        depth: u32,
        lookup: Lookup,
        table: &T::Ref,
        key: &T::Ref,
    ) -> Result<T::Ref> {
        match lookup {
            Lookup::Get => {
                let value = self.target.raw_get(table, key);
                if self.target.kind(&value) == Kind::Nil {
                    drop(value);
                    return Err(self.fail(step, depth, Missing::Key.into()));
                }
                Ok(value)
            }
            Lookup::Next => match self.target.raw_next(table, key) {
                RawNext::Entry(next, _) => Ok(next),
                RawNext::End => Err(self.fail(step, depth, Missing::IterationEnd.into())),
                RawNext::InvalidKey => Err(self.fail(step, depth, Missing::Key.into())),
            },
        }
    }

    fn fail(&mut self, step: Step, depth: u32, error: InspectError) -> InspectError {
        self.tracer.trace_failed(step, depth, &error);
        error
    }
}
