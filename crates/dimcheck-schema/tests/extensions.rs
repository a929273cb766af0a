//! Integration test: downstream Details and concurrent calls.
//!
//! A Detail written outside this crate must participate exactly like the
//! built-in ones, and schemas shared between threads must never leak one
//! call's bindings into another.

use std::sync::Arc;
use std::thread;

use dimcheck_core::{ArrayCapabilities, ArrayLike, ArrayMeta, DtypeKind, ElementType};
use dimcheck_schema::{
    build_schema, BindingEnvironment, Detail, DetailRegistry, Manifest, MismatchReason, Signature,
    TensorSchema, Token,
};
use proptest::prelude::*;

/// Requires an element type of one class, rendered by its class name.
#[derive(Debug)]
struct KindDetail(DtypeKind);

impl Detail for KindDetail {
    fn check(&self, array: &dyn ArrayLike) -> bool {
        array.element_type().kind() == self.0
    }

    fn describe(&self) -> String {
        format!("KindDetail({})", self.0)
    }

    fn describe_mismatch(&self, array: &dyn ArrayLike) -> String {
        format!("KindDetail({})", array.element_type().kind())
    }
}

fn foo_checker() -> TensorSchema {
    build_schema(
        vec![Token::Size(3), Token::detail(KindDetail(DtypeKind::Unsigned))],
        ArrayCapabilities::PLAIN,
    )
    .unwrap()
}

#[test]
fn test_custom_detail_participates_like_builtins() {
    let schema = foo_checker();
    let mut env = BindingEnvironment::new();

    let valid = ArrayMeta::new(vec![3], ElementType::U32);
    assert!(schema.match_array(&mut env, &valid).is_ok());

    let wrong_kind = ArrayMeta::new(vec![3], ElementType::F16);
    let err = schema.match_array(&mut env, &wrong_kind).unwrap_err();
    assert_eq!(
        err.reason,
        MismatchReason::Detail {
            expected: "KindDetail(unsigned)".to_string(),
            actual: "KindDetail(float)".to_string(),
        }
    );

    let wrong_shape = ArrayMeta::new(vec![2], ElementType::U8);
    assert!(matches!(
        schema.match_array(&mut env, &wrong_shape),
        Err(ref m) if matches!(m.reason, MismatchReason::Rank { .. } | MismatchReason::FixedSize { .. })
    ));
}

#[test]
fn test_custom_detail_renders_in_schema() {
    assert_eq!(foo_checker().to_string(), "(3), KindDetail(unsigned)");
}

#[test]
fn test_custom_detail_from_manifest() {
    let mut registry = DetailRegistry::new();
    registry.register("unsigned", KindDetail(DtypeKind::Unsigned));
    let set = Manifest::from_yaml_str(
        "functions:\n  foo:\n    params:\n      - name: tensor\n        schema: [3, {detail: unsigned}]\n",
    )
    .unwrap()
    .build(&registry, ArrayCapabilities::PLAIN)
    .unwrap();

    let foo = set.require("foo").unwrap();
    assert!(foo.check_call(&[&ArrayMeta::new(vec![3], ElementType::U64)], None).is_ok());
    assert!(foo.check_call(&[&ArrayMeta::new(vec![3], ElementType::F16)], None).is_err());
    assert!(foo.check_call(&[&ArrayMeta::new(vec![2], ElementType::U8)], None).is_err());
}

#[test]
fn test_concurrent_calls_keep_separate_bindings() {
    let sig = Arc::new(
        Signature::new("square")
            .param(
                "x",
                build_schema(vec!["dim1".into(), "dim1".into()], ArrayCapabilities::PLAIN)
                    .unwrap(),
            )
            .returns(
                build_schema(vec!["dim1".into()], ArrayCapabilities::PLAIN).unwrap(),
            ),
    );

    let handles: Vec<_> = (1..=8usize)
        .map(|n| {
            let sig = Arc::clone(&sig);
            thread::spawn(move || {
                for _ in 0..100 {
                    let x = ArrayMeta::new(vec![n, n], ElementType::F32);
                    let out = ArrayMeta::new(vec![n], ElementType::F32);
                    let env = sig.check_call(&[&x], Some(&out)).unwrap();
                    assert_eq!(env.get("dim1"), Some(n));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_schemas_and_signatures_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TensorSchema>();
    assert_send_sync::<Signature>();
    assert_send_sync::<BindingEnvironment>();
}

proptest! {
    /// Binding a name in one call's environment is never visible from another.
    #[test]
    fn environments_do_not_interfere(a in 0usize..16, b in 0usize..16) {
        let schema = build_schema(vec![Token::name("dim1")], ArrayCapabilities::PLAIN).unwrap();
        let mut first = BindingEnvironment::new();
        let mut second = BindingEnvironment::new();

        schema.match_array(&mut first, &ArrayMeta::new(vec![a], ElementType::F32)).unwrap();
        prop_assert_eq!(second.get("dim1"), None);
        schema.match_array(&mut second, &ArrayMeta::new(vec![b], ElementType::F32)).unwrap();

        prop_assert_eq!(first.get("dim1"), Some(a));
        prop_assert_eq!(second.get("dim1"), Some(b));
    }
}
