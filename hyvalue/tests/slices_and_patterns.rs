use hyvalue::{
    registry::SignalRegistry,
    shape::Shape,
    value::{Assignable, Value, any::AnyValue, constant::Const, slice::Slice},
};
use num_bigint::BigInt;

fn u(width: u32) -> Shape {
    Shape::unsigned(width).expect("valid width")
}

fn matched(value: &Value, patterns: &[&str]) -> bool {
    !value
        .matches(patterns)
        .expect("patterns are valid")
        .as_const()
        .expect("constant value matches fold")
        .is_zero()
}

#[test]
fn negative_start_wraps_around_width() {
    let v = Value::from(AnyValue::new(u(8)));
    let wrapped = Slice::new(v.clone(), -4, 8).expect("-4 wraps to 4");
    let direct = Slice::new(v, 4, 8).expect("valid bounds");

    assert_eq!(wrapped, direct);
    assert_eq!((wrapped.start(), wrapped.stop()), (4, 8));
    assert_eq!(wrapped.shape(), u(4));
}

#[test]
fn negative_stop_wraps_around_width() {
    let v = Value::from(AnyValue::new(u(8)));
    let s = Slice::new(v, 0, -1).expect("-1 wraps to 7");
    assert_eq!((s.start(), s.stop()), (0, 7));
}

#[test]
fn invalid_bounds_fail_with_out_of_range() {
    let v = Value::from(AnyValue::new(u(8)));

    for (start, stop) in [(0, 0), (1, 1), (5, 3), (0, 9), (-9, 8), (8, 9), (-1, -1)] {
        let err = Slice::new(v.clone(), start, stop).unwrap_err();
        assert!(
            err.is_out_of_range(),
            "slice [{}:{}] should be rejected, got {:?}",
            start,
            stop,
            err
        );
    }
}

#[test]
fn slice_shape_is_always_unsigned() {
    let v = Value::from(AnyValue::new(Shape::signed(8).unwrap()));
    assert_eq!(v.slice(0, 8).unwrap().shape(), u(8));
    assert_eq!(v.bit(-1).unwrap().shape(), Shape::BIT);
}

#[test]
fn bit_indices_wrap_once() {
    let v = Value::from(Const::with_shape(0b1000_0001, u(8)));

    for index in [0, 7, -1, -8] {
        let bit = v.bit(index).unwrap();
        assert_eq!(bit.as_const().unwrap().value(), &BigInt::from(1), "bit {}", index);
    }
    assert_eq!(v.bit(-2).unwrap().as_const().unwrap().value(), &BigInt::from(0));

    for index in [8, -9, 100] {
        let err = v.bit(index).unwrap_err();
        assert!(err.is_out_of_range(), "bit {} should be rejected", index);
    }
}

#[test]
fn slice_folds_constant_bits() {
    let c = Value::from(Const::with_shape(-2, Shape::signed(4).unwrap()));
    assert_eq!(
        c.slice(1, 4).unwrap().as_const().unwrap().value(),
        &BigInt::from(0b111)
    );
    assert_eq!(c.bit(0).unwrap().as_const().unwrap().value(), &BigInt::from(0));
    assert_eq!(c.bit(-1).unwrap().as_const().unwrap().value(), &BigInt::from(1));
    assert_eq!(c.bit(-2).unwrap().as_const().unwrap().value(), &BigInt::from(1));
}

#[test]
fn slice_of_slice_composes() {
    let c = Value::from(Const::with_shape(0b1011_0110, u(8)));
    let outer = c.slice(2, 7).unwrap();
    let inner = outer.slice(1, 3).unwrap();
    assert_eq!(inner.as_const().unwrap().value(), &BigInt::from(0b10));
}

#[test]
fn slice_of_signal_is_assignable() {
    let reg = SignalRegistry::new();
    let a = reg.declare(Some("a"), u(8));
    let s = Value::from(a).slice(2, 6).unwrap();

    assert_eq!(s.lhs_signals().unwrap().into_iter().collect::<Vec<_>>(), vec![a.id()]);
    assert_eq!(s.rhs_signals().into_iter().collect::<Vec<_>>(), vec![a.id()]);
    assert!(s.as_const().unwrap_err().is_not_constant());
}

#[test]
fn slice_implements_assignable() {
    let reg = SignalRegistry::new();
    let a = reg.declare(Some("a"), u(8));

    let low = Slice::new(a, 0, 4).unwrap();
    assert_eq!(low.lhs_signals().unwrap().into_iter().collect::<Vec<_>>(), vec![a.id()]);

    let nested = Slice::new(Value::from(low).slice(1, 3).unwrap(), 0, 1).unwrap();
    assert_eq!(nested.lhs_signals().unwrap().len(), 1);

    let of_expr = Slice::new(Value::from(a) + 1, 0, 2).unwrap();
    assert!(of_expr.lhs_signals().unwrap_err().is_not_assignable());
}

#[test]
fn slice_of_expression_is_not_assignable() {
    let reg = SignalRegistry::new();
    let a = Value::from(reg.declare(Some("a"), u(8)));
    let sum = (a.clone() + 1).slice(0, 8).unwrap();

    assert!(sum.lhs_signals().unwrap_err().is_not_assignable());
    assert_eq!(sum.rhs_signals().len(), 1);
}

#[test]
fn matches_exact_and_wildcard_patterns() {
    let five = Value::from(Const::new(5, None));
    assert_eq!(five.shape(), u(3));

    assert!(matched(&five, &["101"]));
    assert!(matched(&five, &["1*1"]));
    assert!(matched(&five, &["***"]));
    assert!(!matched(&five, &["010"]));
    assert!(!matched(&five, &["0**"]));
}

#[test]
fn matches_any_of_several_patterns() {
    let five = Value::from(Const::new(5, None));
    assert!(matched(&five, &["000", "1*1"]));
    assert!(!matched(&five, &["000", "11*"]));
    assert!(!matched(&five, &[]), "no pattern never matches");
}

#[test]
fn matches_uses_bit_pattern_of_signed_values() {
    let neg = Value::from(Const::with_shape(-3, Shape::signed(4).unwrap()));
    assert!(matched(&neg, &["1101"]));
    assert!(matched(&neg, &["1**1"]));
}

#[test]
fn matches_rejects_malformed_patterns() {
    let v = Value::from(AnyValue::new(u(3)));

    let err = v.matches(&["1x1"]).unwrap_err();
    assert!(err.is_invalid_pattern());

    let err = v.matches(&["101", "1 1"]).unwrap_err();
    assert!(err.is_invalid_pattern(), "every pattern is validated");

    let err = v.matches(&["1010"]).unwrap_err();
    assert!(err.is_invalid_pattern(), "width mismatch is rejected");
}

#[test]
fn matches_builds_single_bit_expression() {
    let reg = SignalRegistry::new();
    let a = reg.declare(Some("a"), u(4));
    let m = Value::from(a).matches(&["1**0", "0001"]).unwrap();

    assert_eq!(m.shape(), Shape::BIT);
    assert_eq!(m.rhs_signals().into_iter().collect::<Vec<_>>(), vec![a.id()]);
}
