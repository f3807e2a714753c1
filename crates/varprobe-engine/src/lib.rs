#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Lazy inspection of values inside a foreign interpreter.
//!
//! This crate provides the [`Inspector`], which resolves handles against a
//! [`Target`](varprobe_core::Target) on demand and builds new handles as a
//! caller navigates, plus the evaluation limits and tracing around it.

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    CallableInfo, EvalLimits, Exhaustion, InspectError, Inspector, InspectorBuilder, Missing,
    NoSymbols, NoopTracer, Outcome, PrintTracer, Resolved, Result, SymbolInfo, SymbolResolver,
    Tracer, Verbosity,
};
pub use varprobe_core::{Handle, Kind, Root, Scalar, Value, describe};
