use varprobe_core::{Handle, Kind, Root, Scalar, Value};
use varprobe_sim::SimTarget;

use super::error::{InspectError, Missing};
use super::inspector::Inspector;
use super::test_utils::{global, handle, world};

fn v(h: Handle) -> Value {
    Value::Handle(h)
}

fn entries(insp: &mut Inspector<'_, SimTarget>, base: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut last: Option<Value> = None;
    while let Some((key, value)) = insp.next(base, last.as_ref()).unwrap() {
        out.push((key.to_string(), value.to_string()));
        last = Some(key);
    }
    out
}

#[test]
fn index_copies_scalars() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    assert_eq!(
        insp.index(&v(global("tbl")), &"a".into()).unwrap(),
        Value::from(1i64)
    );
    assert_eq!(
        insp.index(&v(global("nested")), &v(global("tbl"))).unwrap(),
        Value::from("by table")
    );
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn missing_keys_resolve_once_added() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    let tbl = v(global("tbl"));
    assert_eq!(
        insp.index(&tbl, &"late".into()),
        Err(InspectError::NotFound(Missing::Key))
    );
    let late = v(global("tbl").index(&"late".into()));
    assert_eq!(
        insp.query(&late),
        Err(InspectError::NotFound(Missing::Key))
    );
    drop(insp);

    let table = target.get(&target.globals_table(), "tbl");
    target.set(&table, "late", 9i64);
    let mut insp = Inspector::new(&mut target);
    assert_eq!(insp.index(&tbl, &"late".into()), Ok(Value::from(9i64)));
    assert_eq!(insp.query(&late).map(|r| r.value), Ok(Value::from(9i64)));
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn index_builds_handles_for_resident_values() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    let globals = v(insp.root(Root::Global));
    let tbl = insp.index(&globals, &"tbl".into()).unwrap();
    assert_eq!(tbl, v(global("tbl")));

    let obj = handle(insp.index(&globals, &"obj".into()).unwrap());
    assert_eq!(obj.to_string(), "_G.obj");
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn copyable_object_keys_are_recorded_as_constants() {
    let mut target = world();
    target.set_global("which", "inner");
    let mut insp = Inspector::new(&mut target);
    let inner = handle(
        insp.index(&v(global("nested")), &v(global("which")))
            .unwrap(),
    );
    assert_eq!(inner.to_string(), "_G.nested.inner");
}

#[test]
fn index_rejects_bad_input() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    assert_eq!(
        insp.index(&v(global("tbl")), &Value::Scalar(Scalar::Nil)),
        Err(InspectError::Unsupported("nil key"))
    );
    assert_eq!(
        insp.index(&v(global("tbl")), &v(Handle::frame_local(0, 3))),
        Err(InspectError::Unsupported("nil key"))
    );
    assert_eq!(
        insp.index(&"probe".into(), &"len".into()),
        Err(InspectError::TypeMismatch {
            expected: "table",
            found: Kind::String,
        })
    );
    assert_eq!(
        insp.index(&v(global("missing")), &"x".into()),
        Err(InspectError::NotFound(Missing::Key))
    );
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn iteration_visits_every_entry() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    assert_eq!(
        entries(&mut insp, &v(global("tbl"))),
        [
            ("[string:a]".to_string(), "[number:1]".to_string()),
            ("[string:b]".to_string(), "[number:2]".to_string()),
        ]
    );
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn iteration_over_resident_keys_and_values() {
    let mut target = world();
    let t = target.new_table();
    let tbl = target.get(&target.globals_table(), "tbl");
    let value = target.new_table();
    target.set(&t, tbl, value);
    target.set_global("t", t);

    let mut insp = Inspector::new(&mut target);
    assert_eq!(
        entries(&mut insp, &v(global("t"))),
        [(
            "(next _G.t nil)".to_string(),
            "_G.t[(next _G.t nil)]".to_string()
        )]
    );
    assert_eq!(
        entries(&mut insp, &v(global("nested"))),
        [
            ("[string:inner]".to_string(), "_G.nested.inner".to_string()),
            (
                "(next _G.nested inner)".to_string(),
                "[string:by table]".to_string()
            ),
        ]
    );
}

#[test]
fn iteration_key_handles_resolve_later() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    let nested = v(global("nested"));
    let (first, _) = insp.next(&nested, None).unwrap().unwrap();
    let (second, _) = insp.next(&nested, Some(&first)).unwrap().unwrap();
    let key = handle(second);

    assert_eq!(insp.type_of(&v(key.clone())), Ok(Kind::Table));
    assert_eq!(
        insp.index(&v(key), &"b".into()).unwrap(),
        Value::from(2i64)
    );
}

#[test]
fn iteration_errors() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    assert_eq!(
        insp.next(&v(global("tbl")), Some(&"zzz".into())),
        Err(InspectError::NotFound(Missing::Key))
    );
    assert_eq!(
        insp.next(&v(global("counter")), None),
        Err(InspectError::TypeMismatch {
            expected: "table",
            found: Kind::Function,
        })
    );
    assert_eq!(insp.next(&v(global("tbl")), Some(&"b".into())), Ok(None));
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn upvalues() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    let counter = v(global("counter"));
    assert_eq!(
        insp.upvalue(&counter, 1).unwrap(),
        ("count".to_string(), Value::from(3i64))
    );

    let (name, state) = insp.upvalue(&counter, 2).unwrap();
    assert_eq!(name, "state");
    assert_eq!(state.to_string(), "_G.counter.u[2]");
    assert_eq!(
        insp.index(&state, &"hits".into()).unwrap(),
        Value::from(0i64)
    );

    assert_eq!(
        insp.upvalue(&counter, 5),
        Err(InspectError::NotFound(Missing::Upvalue(5)))
    );
    assert_eq!(
        insp.upvalue(&v(global("tbl")), 1),
        Err(InspectError::TypeMismatch {
            expected: "function",
            found: Kind::Table,
        })
    );
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn metatables() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    let obj_mt = insp.metatable(&v(global("obj"))).unwrap();
    assert_eq!(obj_mt.to_string(), "(_G.obj mt)");
    assert_eq!(
        insp.index(&v(obj_mt), &"__name".into()).unwrap(),
        Value::from("Obj")
    );

    let by_scalar = insp.metatable(&"anything".into()).unwrap();
    let by_handle = insp.metatable(&v(global("name"))).unwrap();
    assert_eq!(by_scalar, Handle::kind_metatable(Kind::String));
    assert_eq!(by_handle, by_scalar);
    assert_eq!(by_scalar.to_string(), "(string mt)");

    assert_eq!(
        insp.metatable(&v(global("bare"))),
        Err(InspectError::NotFound(Missing::Metatable))
    );
    assert_eq!(
        insp.metatable(&Value::from(7i64)),
        Err(InspectError::NotFound(Missing::Metatable))
    );
    assert_eq!(
        insp.metatable(&v(global("counter"))),
        Err(InspectError::Unsupported("kind has no shared metatable"))
    );
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn user_payloads() {
    let mut target = world();
    let mut insp = Inspector::new(&mut target);
    let payload = insp.user_payload(&v(global("obj"))).unwrap();
    assert_eq!(payload.to_string(), "(_G.obj uv)");
    assert_eq!(
        insp.index(&payload, &"tag".into()).unwrap(),
        Value::from("payload")
    );
    assert_eq!(
        insp.user_payload(&v(global("bare"))),
        Err(InspectError::NotFound(Missing::Payload))
    );
    assert_eq!(
        insp.user_payload(&v(global("name"))),
        Err(InspectError::TypeMismatch {
            expected: "userdata",
            found: Kind::String,
        })
    );
    assert_eq!(insp.target().live_refs(), 0);
}

#[test]
fn copied_payloads() {
    let mut target = world();
    let ud = target.new_userdata(Some("raw".into()));
    target.set_global("raw", ud);
    let mut insp = Inspector::new(&mut target);
    assert_eq!(
        insp.user_payload(&v(global("raw"))).unwrap(),
        Value::from("raw")
    );
}
