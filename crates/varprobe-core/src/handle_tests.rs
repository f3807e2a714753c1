use crate::path::{Lookup, Path, PathError, RawStep, Step, TAG_GLOBAL, TAG_INDEX};
use crate::{ConstantPool, Handle, Root, Scalar, Value};

#[test]
fn constant_key_appends_to_copy_of_pool() {
    let g = Handle::root(Root::Global);
    let t = g.index(&Scalar::from("t"));
    let k = t.index(&Scalar::from("k"));

    assert!(g.pool().is_empty());
    assert_eq!(t.pool().len(), 1);
    assert_eq!(k.pool().len(), 2);
    assert_eq!(k.pool().get(2), Some(&Scalar::from("k")));
    assert_eq!(
        k.path().steps(),
        [
            Step::Index {
                lookup: Lookup::Get,
                key: 2
            },
            Step::Index {
                lookup: Lookup::Get,
                key: 1
            },
            Step::Global,
        ]
    );
}

#[test]
fn nil_key_uses_reference_zero() {
    let t = Handle::root(Root::Global).index(&Scalar::from("t"));
    let start = t.next_key(&Scalar::Nil);
    assert_eq!(start.pool(), t.pool());
    assert_eq!(
        start.path().root().step(),
        Step::Index {
            lookup: Lookup::Next,
            key: 0
        }
    );
}

#[test]
fn object_key_merges_pools_and_rebases_key_segment() {
    // base pool A = [10, "x"], key pool B = ["y"]
    let base = Handle::root(Root::Global)
        .index(&Scalar::Integer(10))
        .index(&Scalar::from("x"));
    let key = Handle::root(Root::Registry).index(&Scalar::from("y"));
    assert_eq!(key.path().root().step(), Step::Index { lookup: Lookup::Get, key: 1 });

    let h = base.index_object(Lookup::Get, &key);

    let pool: Vec<_> = h.pool().iter().cloned().collect();
    assert_eq!(
        pool,
        [Scalar::Integer(10), Scalar::from("x"), Scalar::from("y")]
    );
    assert_eq!(
        h.path().steps(),
        [
            Step::IndexObject {
                lookup: Lookup::Get,
                base_len: 3
            },
            Step::Index {
                lookup: Lookup::Get,
                key: 2
            },
            Step::Index {
                lookup: Lookup::Get,
                key: 1
            },
            Step::Global,
            Step::Index {
                lookup: Lookup::Get,
                key: 3
            },
            Step::Registry,
        ]
    );
    assert_eq!(h.to_string(), "_G.10.x[_REGISTRY.y]");
}

#[test]
fn nested_object_keys_rebase_every_reference_in_segment() {
    let inner = Handle::root(Root::Registry).index(&Scalar::from("a"));
    let key = Handle::root(Root::Global)
        .index(&Scalar::from("b"))
        .index_object(Lookup::Get, &inner);
    // key pool = ["b", "a"], references 1 and 2
    let base = Handle::root(Root::Global).index(&Scalar::from("t"));
    let h = base.index_object(Lookup::Next, &key);

    let refs: Vec<_> = h.path().pool_refs().collect();
    assert_eq!(refs, [(1, 1), (4, 2), (6, 3)]);
    assert_eq!(h.to_string(), "(next _G.t _G.b[_REGISTRY.a])");
}

#[test]
#[should_panic(expected = "nil key cannot be looked up")]
fn nil_constant_key_is_rejected() {
    let _ = Handle::root(Root::Global).index(&Scalar::Nil);
}

#[test]
fn key_without_pool_needs_no_rebase() {
    let base = Handle::root(Root::Global).index(&Scalar::from("t"));
    let h = base.index_object(Lookup::Get, &Handle::frame_local(0, 1));
    assert_eq!(h.pool(), base.pool());
}

#[test]
fn wrapping_steps_copy_pool_unchanged() {
    let base = Handle::root(Root::Global).index(&Scalar::from("f"));
    for h in [base.upvalue(2), base.metatable(), base.user_payload()] {
        assert_eq!(h.pool(), base.pool());
        assert_eq!(h.path().len(), base.path().len() + 1);
        assert_eq!(&h.path().steps()[1..], base.path().steps());
    }
}

#[test]
fn from_parts_checks_pool_references() {
    let path = Path::from_raw(&[
        RawStep::new(TAG_INDEX, 0, 2),
        RawStep::new(TAG_GLOBAL, 0, 0),
    ])
    .unwrap();
    let pool: ConstantPool = [Scalar::from("only")].into_iter().collect();
    assert_eq!(
        Handle::from_parts(path.clone(), pool),
        Err(PathError::PoolIndex {
            at: 0,
            index: 2,
            len: 1
        })
    );

    let pool: ConstantPool = [Scalar::from("a"), Scalar::from("b")].into_iter().collect();
    let h = Handle::from_parts(path, pool).unwrap();
    assert_eq!(h.to_string(), "_G.b");
}

#[test]
fn dump_lists_steps_and_pool() {
    let key = Handle::root(Root::Registry).index(&Scalar::from("y"));
    let h = Handle::root(Root::Global)
        .index(&Scalar::Integer(10))
        .index(&Scalar::from("x"))
        .index_object(Lookup::Get, &key);
    insta::assert_snapshot!(h.dump(), @r#"
    steps:
      0 IndexObject base=3
      1 Index key=#2
      2 Index key=#1
      3 Global
      4 Index key=#3
      5 Registry
    pool:
      #1 10
      #2 "x"
      #3 "y"
    "#);
}

#[test]
fn value_serializes_handles_as_paths() {
    let values = [
        Value::from("s"),
        Value::from(Handle::root(Root::Global).index(&Scalar::from("t"))),
    ];
    assert_eq!(serde_json::to_string(&values).unwrap(), r#"["s","_G.t"]"#);
}
