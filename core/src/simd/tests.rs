use rstest::rstest;

use super::*;

const A: [f32; 4] = [1.5, -2.0, 3.25, -0.0];
const B: [f32; 4] = [0.5, 4.0, 3.25, 7.0];

fn lanes<T: SimdElement>(v: Simd<T>) -> [T; 4] {
    v.to_array()
}

fn expect_mask(predicate: [bool; 4]) -> [u32; 4] {
    predicate.map(|p| if p { u32::MAX } else { 0 })
}

// ============================================================================
// Factories and lane access
// ============================================================================

#[test]
fn load_and_lane_access() {
    let src = SimdAlignedArray::new([10.0f32, 20.0, 30.0, 40.0]);
    let v = Simd::load(&src);
    assert_eq!(v.lane::<0>(), 10.0);
    assert_eq!(v.lane::<1>(), 20.0);
    assert_eq!(v.lane::<2>(), 30.0);
    assert_eq!(v.lane::<3>(), 40.0);
}

#[test]
fn load_unaligned_from_offset() {
    let storage = [0u32, 1, 2, 3, 4, 5];
    let v = Simd::from_slice(&storage[1..]);
    assert_eq!(lanes(v), [1, 2, 3, 4]);
    let w = simd_load_unaligned(&[7i32, -7, 8, -8]);
    assert_eq!(lanes(w), [7, -7, 8, -8]);
}

#[test]
#[should_panic(expected = "shorter than 4 lanes")]
fn from_short_slice_panics() {
    let _ = Simd::from_slice(&[1.0f32, 2.0]);
}

#[test]
fn set_orders_lanes() {
    assert_eq!(lanes(Simd::set(1i32, 2, 3, 4)), [1, 2, 3, 4]);
    assert_eq!(lanes(simd_set(9u32, 8, 7, 6)), [9, 8, 7, 6]);
}

#[test]
fn spread_scalar_fills_every_lane() {
    assert_eq!(lanes(simd_spread_scalar(2.5f32)), [2.5; 4]);
    assert_eq!(lanes(Simd::splat(u32::MAX)), [u32::MAX; 4]);
}

#[test]
fn spread_from_each_lane() {
    let v = Simd::set(1.0f32, 2.0, 3.0, 4.0);
    assert_eq!(lanes(simd_spread_from_lane::<0, _>(v)), [1.0; 4]);
    assert_eq!(lanes(simd_spread_from_lane::<1, _>(v)), [2.0; 4]);
    assert_eq!(lanes(simd_spread_from_lane::<2, _>(v)), [3.0; 4]);
    assert_eq!(lanes(simd_spread_from_lane::<3, _>(v)), [4.0; 4]);

    let i = Simd::set(-1i32, -2, -3, -4);
    assert_eq!(lanes(Simd::spread_from_lane::<2>(i)), [-3; 4]);
    let u = Simd::set(5u32, 6, 7, 8);
    assert_eq!(lanes(Simd::spread_from_lane::<3>(u)), [8; 4]);
}

#[test]
fn store_round_trips() {
    let v = Simd::set(4u32, 3, 2, 1);
    let mut aligned = SimdAlignedArray::splat(0u32);
    simd_store(v, &mut aligned);
    assert_eq!(*aligned, [4, 3, 2, 1]);

    let mut unaligned = [0u32; 4];
    simd_store_unaligned(v, &mut unaligned);
    assert_eq!(unaligned, [4, 3, 2, 1]);

    let mut wide = [0u32; 6];
    v.write_to_slice(&mut wide[2..]);
    assert_eq!(wide, [0, 0, 4, 3, 2, 1]);
}

#[test]
fn register_interop_is_identity() {
    let v = Simd::set(1.0f32, 2.0, 3.0, 4.0);
    let back = Simd::<f32>::from_register(v.into_register());
    assert_eq!(lanes(back), [1.0, 2.0, 3.0, 4.0]);
}

// ============================================================================
// Casts
// ============================================================================

#[test]
fn cast_preserves_bits() {
    let v = Simd::set(1.0f32, -0.0, 2.5, f32::INFINITY);
    let bits = simd_cast::<u32, f32>(v);
    assert_eq!(lanes(bits), A_BITS);
    let signed = simd_cast::<i32, u32>(bits);
    assert_eq!(lanes(signed), A_BITS.map(|b| b as i32));
    let back = simd_cast::<f32, i32>(signed);
    assert_eq!(lanes(back).map(f32::to_bits), A_BITS);
}

const A_BITS: [u32; 4] = [0x3F80_0000, 0x8000_0000, 0x4020_0000, 0x7F80_0000];

#[test]
fn cast_to_same_kind_is_identity() {
    let v = Simd::set(1u32, 2, 3, 4);
    assert_eq!(lanes(simd_cast::<u32, u32>(v)), [1, 2, 3, 4]);
}

// ============================================================================
// Arithmetic
// ============================================================================

fn add_ref(a: f32, b: f32) -> f32 {
    a + b
}

fn sub_ref(a: f32, b: f32) -> f32 {
    a - b
}

fn mul_ref(a: f32, b: f32) -> f32 {
    a * b
}

fn div_ref(a: f32, b: f32) -> f32 {
    a / b
}

fn min_ref(a: f32, b: f32) -> f32 {
    if a < b { a } else { b }
}

fn max_ref(a: f32, b: f32) -> f32 {
    if a > b { a } else { b }
}

fn abs_difference_ref(a: f32, b: f32) -> f32 {
    (a - b).abs()
}

fn negate_ref(a: f32) -> f32 {
    -a
}

fn reciprocal_ref(x: f32) -> f32 {
    1.0 / x
}

fn reciprocal_sqrt_ref(x: f32) -> f32 {
    1.0 / x.sqrt()
}

#[rstest]
#[case::add(simd_add::<f32>, add_ref)]
#[case::subtract(simd_subtract::<f32>, sub_ref)]
#[case::multiply(simd_multiply::<f32>, mul_ref)]
#[case::divide(simd_divide, div_ref)]
#[case::min(simd_min, min_ref)]
#[case::max(simd_max, max_ref)]
#[case::abs_difference(simd_abs_difference, abs_difference_ref)]
fn binary_f32_matches_scalar(
    #[case] op: fn(Simd<f32>, Simd<f32>) -> Simd<f32>,
    #[case] reference: fn(f32, f32) -> f32,
) {
    let result = lanes(op(Simd::from(A), Simd::from(B)));
    for k in 0..4 {
        assert_eq!(
            result[k].to_bits(),
            reference(A[k], B[k]).to_bits(),
            "lane {k}"
        );
    }
}

#[rstest]
#[case::negate(simd_negate, negate_ref)]
#[case::abs(simd_abs, f32::abs)]
fn unary_f32_matches_scalar(
    #[case] op: fn(Simd<f32>) -> Simd<f32>,
    #[case] reference: fn(f32) -> f32,
) {
    let result = lanes(op(Simd::from(A)));
    for k in 0..4 {
        assert_eq!(result[k].to_bits(), reference(A[k]).to_bits(), "lane {k}");
    }
}

#[test]
fn abs_is_absolute_value() {
    let v = Simd::set(-1.0f32, 2.0, -3.5, 0.0);
    assert_eq!(lanes(simd_abs(v)), [1.0, 2.0, 3.5, 0.0]);
}

#[test]
fn integer_arithmetic_wraps() {
    let a = Simd::set(i32::MAX, i32::MIN, -7, 46341);
    let b = Simd::set(1i32, 1, 3, 46341);
    assert_eq!(lanes(simd_add(a, b)), [i32::MIN, i32::MIN + 1, -4, 92682]);
    let difference = lanes(simd_subtract(a, b));
    assert_eq!(difference, [i32::MAX - 1, i32::MAX, -10, 0]);
    assert_eq!(
        lanes(simd_multiply(a, b)),
        [i32::MAX, i32::MIN, -21, 46341i32.wrapping_mul(46341)]
    );

    let u = Simd::set(u32::MAX, 0, 0x1_0000, 3);
    let v = Simd::set(2u32, 1, 0x1_0000, 5);
    assert_eq!(lanes(simd_add(u, v)), [1, 1, 0x2_0000, 8]);
    assert_eq!(
        lanes(simd_subtract(u, v)),
        [u32::MAX - 2, u32::MAX, 0, u32::MAX - 1]
    );
    assert_eq!(lanes(simd_multiply(u, v)), [u32::MAX - 1, 0, 0, 15]);
}

#[test]
fn multiply_scalar_matches_spread() {
    let v = Simd::set(1i32, -2, 3, -4);
    assert_eq!(lanes(simd_multiply_scalar(v, -3)), [-3, 6, -9, 12]);
    assert_eq!(lanes(Simd::from(A) * 2.0), A.map(|a| a * 2.0));
}

#[test]
fn fuse_add_multiply() {
    let add = Simd::set(1.0f32, 2.0, 3.0, 4.0);
    let lhs = Simd::set(2.0f32, 3.0, 4.0, 5.0);
    let rhs = Simd::set(0.5f32, 0.25, -1.0, 2.0);
    assert_eq!(
        lanes(simd_fuse_add_multiply(add, lhs, rhs)),
        [2.0, 2.75, -1.0, 14.0]
    );
    assert_eq!(
        lanes(simd_fuse_add_multiply_scalar(add, lhs, 2.0)),
        [5.0, 8.0, 11.0, 14.0]
    );
}

#[test]
fn operators_forward_to_functions() {
    let a = Simd::from(A);
    let b = Simd::from(B);
    assert_eq!(lanes(a + b), lanes(simd_add(a, b)));
    assert_eq!(lanes(a - b), lanes(simd_subtract(a, b)));
    assert_eq!(lanes(a * b), lanes(simd_multiply(a, b)));
    assert_eq!(lanes(a / b), lanes(simd_divide(a, b)));
    assert_eq!(
        lanes(-a).map(f32::to_bits),
        lanes(simd_negate(a)).map(f32::to_bits)
    );
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn f32_comparisons() {
    let a = Simd::from(A);
    let b = Simd::from(B);
    let mask = |f: fn(&f32, &f32) -> bool| expect_mask(std::array::from_fn(|k| f(&A[k], &B[k])));
    assert_eq!(lanes(simd_equal(a, b)), mask(PartialEq::eq));
    assert_eq!(lanes(simd_not_equal(a, b)), mask(PartialEq::ne));
    assert_eq!(lanes(simd_less(a, b)), mask(PartialOrd::lt));
    assert_eq!(lanes(simd_greater(a, b)), mask(PartialOrd::gt));
    assert_eq!(lanes(simd_less_equal(a, b)), mask(PartialOrd::le));
    assert_eq!(lanes(simd_greater_equal(a, b)), mask(PartialOrd::ge));
}

#[test]
fn signed_comparisons() {
    let a = Simd::set(-5i32, 0, 7, i32::MIN);
    let b = Simd::set(3i32, 0, -7, i32::MAX);
    assert_eq!(
        lanes(simd_less(a, b)),
        expect_mask([true, false, false, true])
    );
    assert_eq!(
        lanes(simd_greater(a, b)),
        expect_mask([false, false, true, false])
    );
    assert_eq!(
        lanes(simd_less_equal(a, b)),
        expect_mask([true, true, false, true])
    );
    assert_eq!(
        lanes(simd_greater_equal(a, b)),
        expect_mask([false, true, true, false])
    );
    assert_eq!(
        lanes(simd_equal(a, b)),
        expect_mask([false, true, false, false])
    );
    assert_eq!(
        lanes(simd_not_equal(a, b)),
        expect_mask([true, false, true, true])
    );
}

#[test]
fn unsigned_comparisons_use_unsigned_order() {
    let a = Simd::set(u32::MAX, 0, 0x8000_0000, 5);
    let b = Simd::set(1u32, 0, 0x7FFF_FFFF, 6);
    assert_eq!(
        lanes(simd_less(a, b)),
        expect_mask([false, false, false, true])
    );
    assert_eq!(
        lanes(simd_greater(a, b)),
        expect_mask([true, false, true, false])
    );
    assert_eq!(
        lanes(simd_less_equal(a, b)),
        expect_mask([false, true, false, true])
    );
    assert_eq!(
        lanes(simd_greater_equal(a, b)),
        expect_mask([true, true, true, false])
    );
}

#[test]
fn almost_equal_with_scalar_and_vector_tolerance() {
    let a = Simd::set(1.0f32, 2.0, 3.0, 4.0);
    let b = Simd::set(1.05f32, 2.5, 2.99, 4.0);
    assert_eq!(
        lanes(simd_almost_equal_scalar(a, b, 0.1)),
        expect_mask([true, false, true, true])
    );
    let tolerance = Simd::set(0.01f32, 1.0, 0.001, 0.0);
    assert_eq!(
        lanes(simd_almost_equal(a, b, tolerance)),
        expect_mask([false, true, false, true])
    );
}

// ============================================================================
// Reciprocals and roots
// ============================================================================

fn inputs() -> impl Iterator<Item = Simd<f32>> {
    (0..6).map(|i| {
        let base = 1.0 + i as f32;
        Simd::set(base, base + 0.25, base + 0.5, base + 1.0)
    })
}

fn assert_within(
    op: fn(Simd<f32>) -> Simd<f32>,
    reference: fn(f32) -> f32,
    tolerance: f32,
) {
    for v in inputs() {
        let result = lanes(op(v));
        for (k, x) in lanes(v).into_iter().enumerate() {
            let expected = reference(x);
            assert!(
                (result[k] - expected).abs() <= tolerance,
                "input {x}: got {}, expected {expected}",
                result[k]
            );
        }
    }
}

#[rstest]
#[case::reciprocal(simd_reciprocal, reciprocal_ref, 1e-5)]
#[case::fast_reciprocal(simd_fast_reciprocal, reciprocal_ref, 1e-2)]
#[case::sqrt(simd_sqrt, f32::sqrt, 1e-5)]
#[case::fast_sqrt(simd_fast_sqrt, f32::sqrt, 1e-2)]
#[case::reciprocal_sqrt(simd_reciprocal_sqrt, reciprocal_sqrt_ref, 1e-5)]
#[case::fast_reciprocal_sqrt(simd_fast_reciprocal_sqrt, reciprocal_sqrt_ref, 1e-2)]
fn reciprocal_and_root_accuracy(
    #[case] op: fn(Simd<f32>) -> Simd<f32>,
    #[case] reference: fn(f32) -> f32,
    #[case] tolerance: f32,
) {
    assert_within(op, reference, tolerance);
}

#[test]
fn debug_lists_lanes() {
    let v = Simd::set(1u32, 2, 3, 4);
    assert_eq!(format!("{v:?}"), "Simd([1, 2, 3, 4])");
}

#[test]
fn backend_is_reported() {
    assert!(!SIMD_BACKEND.to_string().is_empty());
    #[cfg(feature = "disable-simd")]
    assert_eq!(SIMD_BACKEND, SimdBackend::Scalar);
}
