//! Inspection engine.
//!
//! The inspector evaluates handles against a target on demand, copies
//! scalar results back to the control side and wraps everything else in new
//! handles. Nothing it returns keeps a live reference into the target.

mod callable;
mod combine;
mod error;
mod eval;
mod frames;
mod inspector;
mod marshal;
mod trace;

#[cfg(test)]
mod combine_tests;
#[cfg(test)]
mod test_utils;

pub use callable::{CallableInfo, NoSymbols, SymbolInfo, SymbolResolver};
pub use error::{Exhaustion, InspectError, Missing, Outcome, Result};
pub use inspector::{EvalLimits, Inspector, InspectorBuilder, Resolved};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
