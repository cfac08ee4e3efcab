use hyvalue::{
    shape::Shape,
    srcloc,
    value::{Value, any::AnyValue, constant::Const},
};
use num_bigint::BigInt;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn u(width: u32) -> Shape {
    Shape::unsigned(width).expect("valid width")
}

fn s(width: u32) -> Shape {
    Shape::signed(width).expect("valid width")
}

#[test]
fn const_without_shape_uses_minimal_shape() {
    let c = Const::new(5, None);
    assert_eq!(c.shape(), u(3));
    assert_eq!(c.value(), &BigInt::from(5));

    let c = Const::new(-5, None);
    assert_eq!(c.shape(), s(4));
    assert_eq!(c.value(), &BigInt::from(-5));

    let c = Const::new(0, None);
    assert_eq!(c.shape(), u(1));
}

#[test]
fn const_truncates_to_explicit_shape() {
    assert_eq!(Const::with_shape(0x1ff, u(8)).value(), &BigInt::from(0xff));
    assert_eq!(Const::with_shape(-1, u(4)).value(), &BigInt::from(15));
    assert_eq!(Const::with_shape(16, u(4)).value(), &BigInt::from(0));
}

#[test]
fn const_sign_extends_signed_shapes() {
    assert_eq!(Const::with_shape(15, s(4)).value(), &BigInt::from(-1));
    assert_eq!(Const::with_shape(8, s(4)).value(), &BigInt::from(-8));
    assert_eq!(Const::with_shape(7, s(4)).value(), &BigInt::from(7));
    assert_eq!(Const::with_shape(-9, s(4)).value(), &BigInt::from(7));
}

#[test]
fn const_bits_is_unsigned_reinterpretation() {
    let c = Const::with_shape(-2, s(4));
    assert_eq!(c.bits(), BigInt::from(0b1110));
    assert!(c.bit(3));
    assert!(!c.bit(0));
}

#[test]
fn const_cast_to_reinterprets_bits() {
    let c = Const::with_shape(200, u(8));
    assert_eq!(c.cast_to(s(8)).value(), &BigInt::from(-56));
    assert_eq!(c.cast_to(u(4)).value(), &BigInt::from(8));
}

#[test]
fn const_equality_ignores_construction_site() {
    let a = Const::new(3, None);
    let b = Const::new(3, None).with_src_loc(srcloc!());
    assert_eq!(a, b);
    assert!(b.src_loc().is_some_and(|loc| loc.function.is_some()));
    assert_ne!(a.src_loc(), b.src_loc());
}

#[test]
fn const_records_construction_site() {
    let c = Const::new(1, None);
    let loc = c.src_loc().expect("constructor is track_caller");
    assert!(loc.file.ends_with("constants.rs"), "unexpected file {}", loc.file);
    assert_eq!(loc.line, line!() - 3);
}

#[test]
fn const_display() {
    assert_eq!(Const::with_shape(3, u(4)).to_string(), "(const 4'd3)");
    assert_eq!(Const::with_shape(-3, s(4)).to_string(), "(const 4'sd-3)");
}

#[test]
fn const_and_placeholder_have_no_signals() {
    let c = Value::from(Const::new(9, None));
    let any = Value::from(AnyValue::new(u(4)));

    assert!(c.rhs_signals().is_empty());
    assert!(any.rhs_signals().is_empty());

    assert!(c.lhs_signals().unwrap_err().is_not_assignable());
    assert!(any.lhs_signals().unwrap_err().is_not_assignable());
}

#[test]
fn placeholder_is_never_constant() {
    let any = Value::from(AnyValue::new(s(7)));
    assert_eq!(any.shape(), s(7));
    assert!(any.as_const().unwrap_err().is_not_constant());
    assert!((any + 1).as_const().unwrap_err().is_not_constant());
}

#[test]
fn normalization_is_idempotent_and_in_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    for _ in 0..2000 {
        let width = rng.random_range(1..=96u32);
        let signed = rng.random_bool(0.5);
        let shape = Shape::new(width, signed).expect("valid width");

        let magnitude = BigInt::from(rng.random::<u64>()) << rng.random_range(0..64u32);
        let raw = if rng.random_bool(0.5) { -magnitude } else { magnitude };

        let once = Const::normalize(&raw, shape);
        let twice = Const::normalize(&once, shape);
        assert_eq!(once, twice, "normalization of {} to {} is not idempotent", raw, shape);

        assert!(
            shape.min_value() <= once && once <= shape.max_value(),
            "{} normalized to {} gives out-of-range {}",
            raw,
            shape,
            once
        );

        // Same low bits as the raw value.
        let modulus = BigInt::from(1) << width;
        let low = |v: &BigInt| ((v % &modulus) + &modulus) % &modulus;
        assert_eq!(low(&raw), low(&once));
    }
}

#[test]
fn shape_bounds_match_reference_values() {
    assert_eq!(u(4).max_value(), BigInt::from(15));
    assert_eq!(u(4).min_value(), BigInt::from(0));
    assert_eq!(s(4).max_value(), BigInt::from(7));
    assert_eq!(s(4).min_value(), BigInt::from(-8));
}
