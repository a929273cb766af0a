//! Integration test: whole-call validation across several arguments.
//!
//! Exercises builder, matcher and signature together the way an interceptor
//! would drive them: one environment per call, every constrained argument
//! matched against it in order.

use dimcheck_core::{ArrayCapabilities, ArrayLike, ArrayMeta, ElementType};
use dimcheck_schema::{
    build_schema, BindingEnvironment, CallError, Mismatch, MismatchReason, Signature, TensorSchema, Token,
};

fn schema(tokens: Vec<Token>) -> TensorSchema {
    build_schema(tokens, ArrayCapabilities::PLAIN).unwrap()
}

fn rand(shape: &[usize]) -> ArrayMeta {
    ArrayMeta::new(shape.to_vec(), ElementType::F32)
}

#[test]
fn test_square() {
    let sig = Signature::new("func").param("x", schema(vec!["dim1".into(), "dim1".into()]));
    assert!(sig.check_call(&[&rand(&[2, 2])], None).is_ok());
    assert!(sig.check_call(&[&rand(&[5, 5])], None).is_ok());
    assert!(sig.check_call(&[&rand(&[3, 5])], None).is_err());
    assert!(sig.check_call(&[&rand(&[5, 3])], None).is_err());
}

#[test]
fn test_repeat() {
    let sig = Signature::new("func")
        .param(
            "x",
            schema(vec!["dim1".into(), "dim2".into(), "dim2".into()]),
        )
        .param("y", schema(vec![Token::Size(-1), "dim2".into()]));

    let accepted: [(&[usize], &[usize]); 3] = [
        (&[5, 3, 3], &[9, 3]),
        (&[5, 5, 5], &[9, 5]),
        (&[4, 5, 5], &[2, 5]),
    ];
    for (x, y) in accepted {
        assert!(sig.check_call(&[&rand(x), &rand(y)], None).is_ok(), "{x:?} {y:?}");
    }

    let rejected: [(&[usize], &[usize]); 4] = [
        (&[4, 5, 4], &[3, 5]),
        (&[4, 5, 5], &[3, 3]),
        (&[4, 3, 5], &[3, 3]),
        (&[4, 3, 3], &[0, 2]),
    ];
    for (x, y) in rejected {
        assert!(sig.check_call(&[&rand(x), &rand(y)], None).is_err(), "{x:?} {y:?}");
    }
}

#[test]
fn test_scalar_schema() {
    let sig = Signature::new("func").param("x", schema(vec![Token::Scalar]));
    assert!(sig.check_call(&[&ArrayMeta::scalar(ElementType::F32)], None).is_ok());
    for shape in [&[1][..], &[1, 2], &[5, 2, 2]] {
        let err = sig.check_call(&[&rand(shape)], None).unwrap_err();
        match err {
            CallError::Argument { source, .. } => {
                assert!(matches!(source.reason, MismatchReason::Rank { .. }));
            }
            other => panic!("expected an argument mismatch, got {other}"),
        }
    }
}

#[test]
fn test_unconstrained_arguments_accept_any_array() {
    let sig = Signature::new("func")
        .param("x", schema(vec![Token::Open]))
        .param("y", schema(vec![Token::Open]));
    assert!(sig.check_call(&[&rand(&[2]), &rand(&[2])], None).is_ok());
    assert!(sig
        .check_call(&[&ArrayMeta::scalar(ElementType::Bool), &rand(&[1, 2, 3])], None)
        .is_ok());
}

/// A tuple of schemas is composed by the caller: one environment, one
/// `match_array` per element.
#[test]
fn test_nested_tuple_shares_one_environment() {
    let first = schema(vec![Token::Size(3), "channel".into(), Token::Size(4)]);
    let second = schema(vec!["channel".into()]);

    let check_pair = |a: &dyn ArrayLike, b: &dyn ArrayLike| -> Result<(), Mismatch> {
        let mut env = BindingEnvironment::new();
        first.match_array(&mut env, a)?;
        second.match_array(&mut env, b)
    };

    assert!(check_pair(&rand(&[3, 1, 4]), &rand(&[1])).is_ok());
    assert!(check_pair(&rand(&[3, 5, 4]), &rand(&[5])).is_ok());
    let err = check_pair(&rand(&[3, 1, 4]), &rand(&[2])).unwrap_err();
    assert_eq!(
        err.reason,
        MismatchReason::NameConflict {
            name: "channel".to_string(),
            axis: 0,
            bound: 1,
            actual: 2,
        }
    );
}

#[test]
fn test_batched_matmul_with_return_value() {
    let sig = Signature::new("matmul")
        .param("a", schema(vec![Token::Ellipsis, "n".into(), "k".into()]))
        .param("b", schema(vec![Token::Ellipsis, "k".into(), "m".into()]))
        .returns(schema(vec![Token::Ellipsis, "n".into(), "m".into()]));

    let env = sig
        .check_call(
            &[&rand(&[8, 2, 3]), &rand(&[3, 4])],
            Some(&rand(&[8, 2, 4])),
        )
        .unwrap();
    let bound: Vec<_> = env.iter().collect();
    assert_eq!(bound, vec![("k", 3), ("m", 4), ("n", 2)]);

    let err = sig
        .check_call(&[&rand(&[2, 3]), &rand(&[3, 4])], Some(&rand(&[2, 5])))
        .unwrap_err();
    assert!(matches!(err, CallError::Return { .. }));
    assert_eq!(
        err.to_string(),
        "return value of matmul(): shape=(2, 5) dtype=f32 does not match (..., n, m): \
         dimension 1 'm' has size 5, but 'm' is 4"
    );
}

#[test]
fn test_incremental_call_check_exposes_bindings() {
    let sig = Signature::new("f")
        .param("x", schema(vec!["a".into(), "b".into()]))
        .param("y", schema(vec!["b".into()]));
    let mut call = sig.begin_call();
    call.check_arg(0, &rand(&[2, 7])).unwrap();
    assert_eq!(call.bindings().get("b"), Some(7));
    assert!(call.check_arg(1, &rand(&[6])).is_err());
    // The failed argument did not disturb what the first one bound.
    assert_eq!(call.bindings().len(), 2);
    call.check_arg(1, &rand(&[7])).unwrap();
    let env = call.finish();
    assert_eq!(env.get("a"), Some(2));
}
