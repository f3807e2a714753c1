//! Shared fixture for engine tests.

use varprobe_core::{Handle, Root, Scalar, Value};
use varprobe_sim::{SimTarget, SimValue};

pub(crate) const NATIVE_ADDRESS: usize = 0x7f00_1000;

/// A small target world:
///
/// ```text
/// globals
///   tbl     = { a = 1, b = 2 }
///   nested  = { inner = { x = 1.5 }, [tbl] = "by table" }
///   name    = "probe"
///   flag    = true
///   ptr     = pointer 0xdead
///   obj     = userdata, payload { tag = "payload" }, metatable { __name = "Obj" }
///   bare    = userdata without payload or metatable
///   counter = closure @counter.lua:4-12, upvalues count = 3, state = { hits = 0 }
///   native  = native function
///   co      = thread
/// strings share the metatable { __index = { len = <native> } }
/// frame 0 runs counter with locals n = 42, t = tbl, none = nil
/// ```
pub(crate) fn world() -> SimTarget {
    let mut target = SimTarget::new();

    let tbl = target.new_table();
    target.set(&tbl, "a", 1i64);
    target.set(&tbl, "b", 2i64);
    target.set_global("tbl", tbl.clone());

    let nested = target.new_table();
    let inner = target.new_table();
    target.set(&inner, "x", 1.5);
    target.set(&nested, "inner", inner);
    target.set(&nested, tbl.clone(), "by table");
    target.set_global("nested", nested);

    target.set_global("name", "probe");
    target.set_global("flag", true);
    target.set_global("ptr", SimValue::Pointer(0xdead));

    let payload = target.new_table();
    target.set(&payload, "tag", "payload");
    let obj_mt = target.new_table();
    target.set(&obj_mt, "__name", "Obj");
    let obj = target.new_userdata(Some(payload));
    target.set_metatable(&obj, Some(&obj_mt));
    target.set_global("obj", obj);

    let bare = target.new_userdata(None);
    target.set_global("bare", bare);

    let state = target.new_table();
    target.set(&state, "hits", 0i64);
    let counter = target.new_closure(
        "@counter.lua",
        (4, 12),
        vec![("count", SimValue::from(3i64)), ("state", state)],
    );
    target.set_global("counter", counter.clone());

    let native = target.new_native(NATIVE_ADDRESS);
    target.set_global("native", native.clone());

    let co = target.new_thread();
    target.set_global("co", co);

    let string_mt = target.new_table();
    let string_lib = target.new_table();
    target.set(&string_lib, "len", native);
    target.set(&string_mt, "__index", string_lib);
    target.set_metatable(&SimValue::from(""), Some(&string_mt));

    target.push_frame(
        &counter,
        vec![
            ("n", SimValue::from(42i64)),
            ("t", tbl),
            ("none", SimValue::Nil),
        ],
    );
    target
}

pub(crate) fn global(name: &str) -> Handle {
    Handle::root(Root::Global).index(&Scalar::from(name))
}

pub(crate) fn handle(value: Value) -> Handle {
    match value {
        Value::Handle(h) => h,
        Value::Scalar(s) => panic!("expected a handle, got {s:?}"),
    }
}
