//! Diagnostic rendering of handles.
//!
//! Pure: reads only the path and the already-copied pool, never the target.

use crate::path::{Lookup, Node, Step};
use crate::{ConstantPool, Handle, Value};

/// Render a value for diagnostics.
///
/// Handles render as their path; scalars as `[kind:tostring]`.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Handle(h) => describe_handle(h),
        Value::Scalar(s) => format!("[{}:{}]", s.kind().name(), s),
    }
}

pub fn describe_handle(handle: &Handle) -> String {
    let mut out = String::new();
    write_node(&mut out, handle.path().root(), handle.pool());
    out
}

/// Pending output while rendering: a subpath still to expand, or literal text.
enum Piece<'p> {
    Node(Node<'p>),
    Text(String),
}

/// Render `root` with an explicit work stack, so path depth is bounded only
/// by memory. Pieces are pushed in reverse of their output order.
fn write_node(out: &mut String, root: Node<'_>, pool: &ConstantPool) {
    let mut work = vec![Piece::Node(root)];
    while let Some(piece) = work.pop() {
        let node = match piece {
            Piece::Text(text) => {
                out.push_str(&text);
                continue;
            }
            Piece::Node(node) => node,
        };
        match node.step() {
            Step::FrameLocal { frame, slot } => out.push_str(&format!("(L {frame} {slot})")),
            Step::FrameFunction { frame } => out.push_str(&format!("(f {frame})")),
            Step::Global => out.push_str("_G"),
            Step::Registry => out.push_str("_REGISTRY"),
            Step::MainThread => out.push_str("_MAINTHREAD"),
            Step::KindMetatable(kind) => out.push_str(&format!("({kind} mt)")),
            Step::Upvalue { index } => {
                work.push(Piece::Text(format!(".u[{index}]")));
                work.push(Piece::Node(node.base()));
            }
            Step::Metatable => {
                out.push('(');
                work.push(Piece::Text(" mt)".into()));
                work.push(Piece::Node(node.base()));
            }
            Step::UserPayload => {
                out.push('(');
                work.push(Piece::Text(" uv)".into()));
                work.push(Piece::Node(node.base()));
            }
            Step::Index {
                lookup: Lookup::Get,
                key,
            } => {
                work.push(Piece::Text(format!(".{}", constant(pool, key))));
                work.push(Piece::Node(node.base()));
            }
            Step::Index {
                lookup: Lookup::Next,
                key,
            } => {
                out.push_str("(next ");
                work.push(Piece::Text(format!(" {})", constant(pool, key))));
                work.push(Piece::Node(node.base()));
            }
            Step::IndexObject {
                lookup: Lookup::Get,
                ..
            } => {
                work.push(Piece::Text("]".into()));
                work.push(Piece::Node(node.key()));
                work.push(Piece::Text("[".into()));
                work.push(Piece::Node(node.base()));
            }
            Step::IndexObject {
                lookup: Lookup::Next,
                ..
            } => {
                out.push_str("(next ");
                work.push(Piece::Text(")".into()));
                work.push(Piece::Node(node.key()));
                work.push(Piece::Text(" ".into()));
                work.push(Piece::Node(node.base()));
            }
        }
    }
}

fn constant(pool: &ConstantPool, reference: u32) -> String {
    match pool.get(reference) {
        Some(value) => value.to_string(),
        None => "nil".to_string(),
    }
}
