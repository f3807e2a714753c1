use crate::path::Lookup;
use crate::{describe, Handle, Kind, Root, Scalar, Value};

fn show(h: Handle) -> String {
    describe(&Value::Handle(h))
}

#[test]
fn roots() {
    assert_eq!(show(Handle::root(Root::Global)), "_G");
    assert_eq!(show(Handle::root(Root::Registry)), "_REGISTRY");
    assert_eq!(show(Handle::root(Root::MainThread)), "_MAINTHREAD");
}

#[test]
fn frames() {
    assert_eq!(show(Handle::frame_local(2, 5)), "(L 2 5)");
    assert_eq!(show(Handle::frame_function(1)), "(f 1)");
}

#[test]
fn index_and_iteration() {
    let tbl = Handle::root(Root::Global).index(&Scalar::from("tbl"));
    assert_eq!(show(tbl.clone()), "_G.tbl");
    assert_eq!(show(tbl.next_key(&Scalar::Nil)), "(next _G.tbl nil)");
    assert_eq!(
        show(tbl.next_key(&Scalar::from("lastkey"))),
        "(next _G.tbl lastkey)"
    );
    assert_eq!(show(tbl.index(&Scalar::Float(1.5))), "_G.tbl.1.5");
    assert_eq!(show(tbl.index(&Scalar::Boolean(true))), "_G.tbl.true");
}

#[test]
fn object_keys() {
    let tbl = Handle::root(Root::Global).index(&Scalar::from("tbl"));
    let key = Handle::frame_local(0, 1);
    assert_eq!(show(tbl.index_object(Lookup::Get, &key)), "_G.tbl[(L 0 1)]");
    assert_eq!(
        show(tbl.index_object(Lookup::Next, &key)),
        "(next _G.tbl (L 0 1))"
    );
}

#[test]
fn metatables_payloads_upvalues() {
    assert_eq!(show(Handle::kind_metatable(Kind::Number)), "(number mt)");
    let obj = Handle::root(Root::Registry).index(&Scalar::Integer(3));
    assert_eq!(show(obj.metatable()), "(_REGISTRY.3 mt)");
    assert_eq!(show(obj.user_payload()), "(_REGISTRY.3 uv)");
    assert_eq!(show(Handle::frame_function(0).upvalue(2)), "(f 0).u[2]");
    assert_eq!(
        show(obj.user_payload().metatable().index(&Scalar::from("__index"))),
        "((_REGISTRY.3 uv) mt).__index"
    );
}

#[test]
fn scalars() {
    assert_eq!(describe(&Value::from("hi")), "[string:hi]");
    assert_eq!(describe(&Value::from(42i64)), "[number:42]");
    assert_eq!(describe(&Value::Scalar(Scalar::Float(2.0))), "[number:2.0]");
    assert_eq!(describe(&Value::Scalar(Scalar::Nil)), "[nil:nil]");
    assert_eq!(describe(&Value::from(false)), "[boolean:false]");
    assert_eq!(
        describe(&Value::Scalar(Scalar::Pointer(0x10))),
        "[lightuserdata:userdata: 0x10]"
    );
}
