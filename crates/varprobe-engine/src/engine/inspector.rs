//! The inspector: eager evaluation plus handle construction.

use serde::Serialize;
use varprobe_core::kind::NO_VALUE;
use varprobe_core::{Callable, Handle, Kind, Root, Scalar, Target, Value};

use super::callable::{CallableInfo, SymbolResolver};
use super::error::{Exhaustion, Result};
use super::eval::Evaluator;
use super::marshal::{copy_in, copy_out};
use super::trace::{NoopTracer, Tracer};

/// Evaluation limits.
#[derive(Clone, Copy, Debug)]
pub struct EvalLimits {
    /// Maximum path nesting (default: 200).
    pub(crate) recursion_limit: u32,
    /// Working-area slots reserved before each descent (default: 3).
    pub(crate) stack_reserve: usize,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            recursion_limit: 200,
            stack_reserve: 3,
        }
    }
}

impl EvalLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum path nesting.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Set the slots reserved before each descent.
    pub fn stack_reserve(mut self, slots: usize) -> Self {
        self.stack_reserve = slots;
        self
    }
}

/// A value after eager evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Resolved {
    pub kind: Kind,
    /// The copy for scalar kinds, the queried handle otherwise.
    pub value: Value,
}

/// Inspection session over one target.
///
/// Holds the target exclusively for its lifetime. Every operation leaves the
/// target's working area as it found it.
pub struct Inspector<'t, T: Target, R: Tracer = NoopTracer> {
    pub(crate) target: &'t mut T,
    pub(crate) limits: EvalLimits,
    pub(crate) tracer: R,
}

/// Builder for [`Inspector`] instances.
pub struct InspectorBuilder<'t, T: Target, R: Tracer = NoopTracer> {
    target: &'t mut T,
    limits: EvalLimits,
    tracer: R,
}

impl<'t, T: Target> InspectorBuilder<'t, T> {
    pub fn new(target: &'t mut T) -> Self {
        Self {
            target,
            limits: EvalLimits::default(),
            tracer: NoopTracer,
        }
    }
}

impl<'t, T: Target, R: Tracer> InspectorBuilder<'t, T, R> {
    /// Set the evaluation limits.
    pub fn limits(mut self, limits: EvalLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    pub fn stack_reserve(mut self, slots: usize) -> Self {
        self.limits = self.limits.stack_reserve(slots);
        self
    }

    /// Replace the tracer.
    pub fn tracer<U: Tracer>(self, tracer: U) -> InspectorBuilder<'t, T, U> {
        InspectorBuilder {
            target: self.target,
            limits: self.limits,
            tracer,
        }
    }

    pub fn build(self) -> Inspector<'t, T, R> {
        Inspector {
            target: self.target,
            limits: self.limits,
            tracer: self.tracer,
        }
    }
}

impl<'t, T: Target> Inspector<'t, T> {
    pub fn builder(target: &'t mut T) -> InspectorBuilder<'t, T> {
        InspectorBuilder::new(target)
    }

    pub fn new(target: &'t mut T) -> Self {
        Self::builder(target).build()
    }
}

impl<'t, T: Target, R: Tracer> Inspector<'t, T, R> {
    pub fn tracer(&self) -> &R {
        &self.tracer
    }

    pub fn into_tracer(self) -> R {
        self.tracer
    }

    pub fn target(&self) -> &T {
        self.target
    }

    pub fn root(&self, root: Root) -> Handle {
        Handle::root(root)
    }

    /// Evaluate `value` and copy the result out when possible.
    pub fn query(&mut self, value: &Value) -> Result<Resolved> {
        self.query_live(value)
            .inspect_err(|e| self.tracer.trace_rejected("query", e))
    }

    fn query_live(&mut self, value: &Value) -> Result<Resolved> {
        let handle = match value {
            Value::Scalar(scalar) => {
                return Ok(Resolved {
                    kind: scalar.kind(),
                    value: value.clone(),
                });
            }
            Value::Handle(handle) => handle,
        };
        let live = self.resolve(value)?;
        let kind = self.target.kind(&live);
        let value = self.publish(&live, || handle.clone());
        Ok(Resolved { kind, value })
    }

    pub fn type_of(&mut self, value: &Value) -> Result<Kind> {
        let live = self
            .resolve(value)
            .inspect_err(|e| self.tracer.trace_rejected("type_of", e))?;
        Ok(self.target.kind(&live))
    }

    /// Kind name of `value`, or "no value" when it does not resolve.
    pub fn type_name(&mut self, value: &Value) -> &'static str {
        self.type_of(value).map_or(NO_VALUE, Kind::name)
    }

    /// The value itself when copyable, `[kind: 0xidentity]` otherwise.
    pub fn display(&mut self, value: &Value) -> Result<Scalar> {
        let live = self
            .resolve(value)
            .inspect_err(|e| self.tracer.trace_rejected("display", e))?;
        if let Some(scalar) = copy_out(self.target, &live) {
            return Ok(scalar);
        }
        let kind = self.target.kind(&live);
        let identity = self.target.identity(&live);
        Ok(Scalar::from(format!("[{kind}: {identity:#x}]").as_str()))
    }

    /// Native address and image, script source and line range, or the
    /// target's status when `value` is not callable.
    pub fn describe_callable(
        &mut self,
        value: &Value,
        symbols: &dyn SymbolResolver,
    ) -> Result<CallableInfo> {
        let live = self
            .resolve(value)
            .inspect_err(|e| self.tracer.trace_rejected("describe_callable", e))?;
        let info = match self.target.callable(&live) {
            Some(Callable::Native { address }) => {
                let symbol = symbols.resolve(address);
                CallableInfo::Native {
                    pointer_address: address,
                    symbol_base: symbol.base,
                    symbol_file: symbol.file,
                }
            }
            Some(Callable::Script {
                source,
                line_defined,
                last_line_defined,
            }) => CallableInfo::Script {
                source,
                linedefined: line_defined,
                lastlinedefined: last_line_defined,
            },
            None => CallableInfo::Status(self.target.status()),
        };
        Ok(info)
    }

    /// Live value of `value`: scalars are copied in, handles evaluated.
    pub(crate) fn resolve(&mut self, value: &Value) -> Result<T::Ref> {
        match value {
            Value::Scalar(scalar) => {
                self.reserve()?;
                Ok(copy_in(self.target, scalar))
            }
            Value::Handle(handle) => {
                Evaluator::new(self.target, handle.pool(), self.limits, &mut self.tracer)
                    .evaluate(handle.path())
            }
        }
    }

    pub(crate) fn reserve(&mut self) -> Result<()> {
        if self.target.reserve(self.limits.stack_reserve) {
            Ok(())
        } else {
            Err(Exhaustion::WorkingArea.into())
        }
    }

    /// Copy `live` out, or fall back to the handle `lazy` builds.
    pub(crate) fn publish(&mut self, live: &T::Ref, lazy: impl FnOnce() -> Handle) -> Value {
        match copy_out(self.target, live) {
            Some(scalar) => {
                self.tracer.trace_copied(&scalar);
                Value::Scalar(scalar)
            }
            None => {
                let handle = lazy();
                self.tracer.trace_handle(&handle);
                Value::Handle(handle)
            }
        }
    }
}
