//! Tracing infrastructure for debugging path evaluation.
//!
//! # Design: Zero-Cost Abstraction
//!
//! When `NoopTracer` is used every trait method is an `#[inline(always)]`
//! empty function, so the compiler removes the calls and their arguments.
//! No tracing state lives in the evaluator or the inspector.
//!
//! `PrintTracer` collects one line per event, indented by path depth.

use varprobe_core::{Colors, Handle, Kind, Scalar, Step};

use super::error::InspectError;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Copies, handles built and failures.
    #[default]
    Default,
    /// Also every step as it resolves.
    Verbose,
    /// Also every step as it is entered.
    VeryVerbose,
}

/// Instrumentation hooks for inspection.
///
/// - `trace_enter` - before a step is resolved; `depth` is 0 at the path root
/// - `trace_resolved` - after a step produced a live value
/// - `trace_failed` - at the step where a failure originated
/// - `trace_rejected` - when a public operation returns an error
/// - `trace_copied` - when a result is returned by copy
/// - `trace_handle` - when a result is returned as a new handle
pub trait Tracer {
    fn trace_enter(&mut self, step: Step, depth: u32);

    fn trace_resolved(&mut self, step: Step, depth: u32, kind: Kind);

    fn trace_failed(&mut self, step: Step, depth: u32, error: &InspectError);

    fn trace_rejected(&mut self, operation: &'static str, error: &InspectError);

    fn trace_copied(&mut self, value: &Scalar);

    fn trace_handle(&mut self, handle: &Handle);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _step: Step, _depth: u32) {}

    #[inline(always)]
    fn trace_resolved(&mut self, _step: Step, _depth: u32, _kind: Kind) {}

    #[inline(always)]
    fn trace_failed(&mut self, _step: Step, _depth: u32, _error: &InspectError) {}

    #[inline(always)]
    fn trace_rejected(&mut self, _operation: &'static str, _error: &InspectError) {}

    #[inline(always)]
    fn trace_copied(&mut self, _value: &Scalar) {}

    #[inline(always)]
    fn trace_handle(&mut self, _handle: &Handle) {}
}

/// Tracer that collects an evaluation trace for debugging.
pub struct PrintTracer {
    verbosity: Verbosity,
    lines: Vec<String>,
    colors: Colors,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn push_step(&mut self, depth: u32, content: String) {
        let indent = "  ".repeat(depth as usize);
        self.lines.push(format!("{indent}{content}"));
    }
}

impl Tracer for PrintTracer {
    fn trace_enter(&mut self, step: Step, depth: u32) {
        if self.verbosity != Verbosity::VeryVerbose {
            return;
        }
        let c = self.colors;
        self.push_step(depth, format!("{}>{} {step}", c.dim, c.reset));
    }

    fn trace_resolved(&mut self, step: Step, depth: u32, kind: Kind) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let c = self.colors;
        self.push_step(depth, format!("{step} {}{kind}{}", c.blue, c.reset));
    }

    fn trace_failed(&mut self, step: Step, depth: u32, error: &InspectError) {
        let c = self.colors;
        self.push_step(depth, format!("{step} {}!{} {error}", c.dim, c.reset));
    }

    fn trace_rejected(&mut self, operation: &'static str, error: &InspectError) {
        let c = self.colors;
        self.lines
            .push(format!("{operation} {}!{} {error}", c.dim, c.reset));
    }

    fn trace_copied(&mut self, value: &Scalar) {
        let c = self.colors;
        self.lines
            .push(format!("copy {}{}{}", c.green, value.repr(), c.reset));
    }

    fn trace_handle(&mut self, handle: &Handle) {
        let c = self.colors;
        self.lines
            .push(format!("handle {}{handle}{}", c.blue, c.reset));
    }
}
