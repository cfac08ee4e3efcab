use std::collections::BTreeMap;

use hyvalue::{
    range::IntRange,
    shape::{Shape, ShapeSource},
    sizing::{bit_length, bits_for, log2_int},
};
use num_bigint::BigInt;

fn big(n: i64) -> BigInt {
    BigInt::from(n)
}

#[test]
fn bits_for_matches_reference_widths() {
    assert_eq!(bits_for(&big(0), false), 1);
    assert_eq!(bits_for(&big(-1), false), 1);
    assert_eq!(bits_for(&big(1), false), 1);
    assert_eq!(bits_for(&big(7), false), 3);
    assert_eq!(bits_for(&big(8), false), 4);
    assert_eq!(bits_for(&big(-8), false), 4);
    assert_eq!(bits_for(&big(-9), false), 5);
    assert_eq!(bits_for(&big(255), false), 8);
    assert_eq!(bits_for(&big(255), true), 9);
}

#[test]
fn bits_for_always_adds_sign_bit_to_non_positive_values() {
    for n in [0, -1, -2, -128] {
        assert_eq!(
            bits_for(&big(n), false),
            bits_for(&big(n), true),
            "sign bit requirement must not change the width of {}",
            n
        );
    }
    assert_eq!(bits_for(&big(-128), false), 8);
}

#[test]
fn bits_for_handles_values_beyond_machine_words() {
    let huge = BigInt::from(1) << 200u32;
    assert_eq!(bits_for(&huge, false), 201);
    assert_eq!(bits_for(&-huge, false), 201);
}

#[test]
fn bit_length_counts_magnitude_bits() {
    assert_eq!(bit_length(&big(0), false), 1);
    assert_eq!(bit_length(&big(0), true), 0);
    assert_eq!(bit_length(&big(1), false), 1);
    assert_eq!(bit_length(&big(6), false), 3);
    assert_eq!(bit_length(&big(-6), false), 3);
}

#[test]
fn log2_int_rounds_up_or_requires_power_of_two() {
    assert_eq!(log2_int(&big(0), true), Ok(0));
    assert_eq!(log2_int(&big(1), true), Ok(0));
    assert_eq!(log2_int(&big(8), true), Ok(3));
    assert_eq!(log2_int(&big(9), false), Ok(4));

    let err = log2_int(&big(9), true).unwrap_err();
    assert!(err.is_not_power_of_two());

    let err = log2_int(&big(-4), false).unwrap_err();
    assert!(err.is_negative_logarithm());
}

#[test]
fn shape_constructors_reject_zero_width() {
    assert!(Shape::unsigned(0).unwrap_err().is_invalid_shape());
    assert!(Shape::signed(0).unwrap_err().is_invalid_shape());
    assert!(Shape::unsigned(Shape::MAX_WIDTH + 1).is_err());

    let s = Shape::signed(12).expect("12 bits is a valid width");
    assert_eq!(s.width(), 12);
    assert!(s.is_signed());
}

#[test]
fn shape_equality_is_structural() {
    assert!(Shape::unsigned(4).unwrap().equals((4, false)));
    assert!(!Shape::signed(4).unwrap().equals((4, false)));
    assert!(Shape::signed(4).unwrap().equals(Shape::signed(4).unwrap()));
    assert_eq!(Shape::unsigned(4).unwrap(), Shape::unsigned(4).unwrap());
    assert_ne!(Shape::unsigned(4).unwrap(), Shape::unsigned(5).unwrap());
}

#[test]
fn cast_from_integer_is_a_width() {
    assert_eq!(Shape::cast(6).unwrap(), Shape::unsigned(6).unwrap());
    assert!(Shape::cast(0).unwrap_err().is_invalid_shape());
    assert!(Shape::cast(-3).unwrap_err().is_invalid_shape());
}

#[test]
fn cast_from_pair_and_shape() {
    assert_eq!(Shape::cast((5, true)).unwrap(), Shape::signed(5).unwrap());
    let s = Shape::unsigned(3).unwrap();
    assert_eq!(Shape::cast(s).unwrap(), s);
    assert!(Shape::cast((0, true)).is_err());
}

#[test]
fn cast_from_range_uses_produced_endpoints() {
    let unsigned = Shape::cast(IntRange::new(0, 16, 1).unwrap()).unwrap();
    assert_eq!(unsigned, Shape::unsigned(4).unwrap(), "stop is exclusive");

    let signed = Shape::cast(IntRange::new(-5, 3, 1).unwrap()).unwrap();
    assert_eq!(signed, Shape::signed(4).unwrap());

    let descending = Shape::cast(IntRange::new(10, -2, -3).unwrap()).unwrap();
    // Produces 10, 7, 4, 1.
    assert_eq!(descending, Shape::unsigned(4).unwrap());

    let from_std = Shape::cast(0..256).unwrap();
    assert_eq!(from_std, Shape::unsigned(8).unwrap());
}

#[test]
fn cast_from_empty_range_fails() {
    let err = Shape::cast(IntRange::new(3, 3, 1).unwrap()).unwrap_err();
    assert!(err.is_empty_shape_source());
}

#[test]
fn cast_from_named_map_sizes_enumeration_values() {
    let states: ShapeSource = [("idle", 0), ("run", 5), ("halt", 2)].into_iter().collect();
    assert_eq!(Shape::cast(states).unwrap(), Shape::unsigned(3).unwrap());

    let mut signed = BTreeMap::new();
    signed.insert("neg".to_string(), BigInt::from(-1));
    signed.insert("pos".to_string(), BigInt::from(3));
    assert_eq!(Shape::cast(signed).unwrap(), Shape::signed(3).unwrap());

    assert!(Shape::cast(BTreeMap::new()).unwrap_err().is_empty_shape_source());
}

#[test]
fn range_iterates_with_exclusive_stop() {
    let r = IntRange::new(0, 5, 2).unwrap();
    assert_eq!(r.iter().collect::<Vec<_>>(), vec![0, 2, 4]);
    assert_eq!(r.len(), 3);
    assert_eq!(r.last(), Some(4));

    let down = IntRange::new(3, -3, -2).unwrap();
    assert_eq!(down.into_iter().collect::<Vec<_>>(), vec![3, 1, -1]);

    assert!(IntRange::new(5, 0, 1).unwrap().is_empty());
    assert!(IntRange::new(0, 5, 0).unwrap_err().is_invalid_range_step());
}

#[test]
fn shape_display() {
    assert_eq!(Shape::unsigned(4).unwrap().to_string(), "unsigned(4)");
    assert_eq!(Shape::signed(9).unwrap().to_string(), "signed(9)");
}
