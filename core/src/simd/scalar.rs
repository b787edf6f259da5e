//! Portable scalar back-end.
//!
//! Lane results here are the reference the NEON and SSE back-ends match.

use super::{SimdBackend, SimdElement};

pub(super) const BACKEND: SimdBackend = SimdBackend::Scalar;

/// Four lanes stored in memory with SIMD register alignment.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lanes<T>(pub [T; 4]);

pub type F32 = Lanes<f32>;
pub type Mask = Lanes<u32>;

#[inline]
fn map<T: Copy, U>(a: Lanes<T>, f: impl Fn(T) -> U) -> Lanes<U> {
    Lanes(a.0.map(f))
}

#[inline]
fn zip<T: Copy, U>(a: Lanes<T>, b: Lanes<T>, f: impl Fn(T, T) -> U) -> Lanes<U> {
    Lanes([
        f(a.0[0], b.0[0]),
        f(a.0[1], b.0[1]),
        f(a.0[2], b.0[2]),
        f(a.0[3], b.0[3]),
    ])
}

#[inline]
fn mask(predicate: bool) -> u32 {
    if predicate { u32::MAX } else { 0 }
}

macro_rules! scalar_element {
    (
        $elem:ty,
        add: $add:expr,
        sub: $sub:expr,
        mul: $mul:expr,
        to_bits: $to_bits:expr,
        from_bits: $from_bits:expr
    ) => {
        impl SimdElement for $elem {
            type Register = Lanes<$elem>;

            #[inline]
            unsafe fn load_aligned(src: *const Self) -> Self::Register {
                // SAFETY: caller guarantees four readable, aligned elements.
                Lanes(unsafe { src.cast::<[Self; 4]>().read() })
            }

            #[inline]
            unsafe fn load_unaligned(src: *const Self) -> Self::Register {
                // SAFETY: caller guarantees four readable elements.
                Lanes(unsafe { src.cast::<[Self; 4]>().read_unaligned() })
            }

            #[inline]
            unsafe fn store_aligned(dst: *mut Self, v: Self::Register) {
                // SAFETY: caller guarantees four writable, aligned elements.
                unsafe { dst.cast::<[Self; 4]>().write(v.0) }
            }

            #[inline]
            unsafe fn store_unaligned(dst: *mut Self, v: Self::Register) {
                // SAFETY: caller guarantees four writable elements.
                unsafe { dst.cast::<[Self; 4]>().write_unaligned(v.0) }
            }

            #[inline]
            fn splat(x: Self) -> Self::Register {
                Lanes([x; 4])
            }

            #[inline]
            fn set(v0: Self, v1: Self, v2: Self, v3: Self) -> Self::Register {
                Lanes([v0, v1, v2, v3])
            }

            #[inline]
            fn extract<const LANE: usize>(v: Self::Register) -> Self {
                v.0[LANE]
            }

            #[inline]
            fn splat_lane<const LANE: usize>(v: Self::Register) -> Self::Register {
                Lanes([v.0[LANE]; 4])
            }

            #[inline]
            fn add(a: Self::Register, b: Self::Register) -> Self::Register {
                zip(a, b, $add)
            }

            #[inline]
            fn sub(a: Self::Register, b: Self::Register) -> Self::Register {
                zip(a, b, $sub)
            }

            #[inline]
            fn mul(a: Self::Register, b: Self::Register) -> Self::Register {
                zip(a, b, $mul)
            }

            #[inline]
            fn cmp_eq(a: Self::Register, b: Self::Register) -> Mask {
                zip(a, b, |x, y| mask(x == y))
            }

            #[inline]
            fn cmp_ne(a: Self::Register, b: Self::Register) -> Mask {
                zip(a, b, |x, y| mask(x != y))
            }

            #[inline]
            fn cmp_lt(a: Self::Register, b: Self::Register) -> Mask {
                zip(a, b, |x, y| mask(x < y))
            }

            #[inline]
            fn cmp_gt(a: Self::Register, b: Self::Register) -> Mask {
                zip(a, b, |x, y| mask(x > y))
            }

            #[inline]
            fn cmp_le(a: Self::Register, b: Self::Register) -> Mask {
                zip(a, b, |x, y| mask(x <= y))
            }

            #[inline]
            fn cmp_ge(a: Self::Register, b: Self::Register) -> Mask {
                zip(a, b, |x, y| mask(x >= y))
            }

            #[inline]
            fn to_bits(v: Self::Register) -> Mask {
                map(v, $to_bits)
            }

            #[inline]
            fn from_bits(bits: Mask) -> Self::Register {
                map(bits, $from_bits)
            }
        }
    };
}

scalar_element!(
    f32,
    add: |a: f32, b: f32| a + b,
    sub: |a: f32, b: f32| a - b,
    mul: |a: f32, b: f32| a * b,
    to_bits: |x: f32| x.to_bits(),
    from_bits: f32::from_bits
);

scalar_element!(
    i32,
    add: i32::wrapping_add,
    sub: i32::wrapping_sub,
    mul: i32::wrapping_mul,
    to_bits: |x: i32| x as u32,
    from_bits: |x: u32| x as i32
);

scalar_element!(
    u32,
    add: u32::wrapping_add,
    sub: u32::wrapping_sub,
    mul: u32::wrapping_mul,
    to_bits: |x: u32| x,
    from_bits: |x: u32| x
);

// ============================================================================
// f32-only operations
// ============================================================================

#[inline]
pub(super) fn div(a: F32, b: F32) -> F32 {
    zip(a, b, |x, y| x / y)
}

#[inline]
pub(super) fn neg(v: F32) -> F32 {
    map(v, |x| -x)
}

#[inline]
pub(super) fn abs(v: F32) -> F32 {
    map(v, f32::abs)
}

#[inline]
pub(super) fn abs_diff(a: F32, b: F32) -> F32 {
    zip(a, b, |x, y| (x - y).abs())
}

#[inline]
pub(super) fn fma(add: F32, lhs: F32, rhs: F32) -> F32 {
    let products = zip(lhs, rhs, |x, y| x * y);
    zip(add, products, |x, y| x + y)
}

#[inline]
pub(super) fn min(a: F32, b: F32) -> F32 {
    zip(a, b, |x, y| if x < y { x } else { y })
}

#[inline]
pub(super) fn max(a: F32, b: F32) -> F32 {
    zip(a, b, |x, y| if x > y { x } else { y })
}

#[inline]
pub(super) fn recip_fast(v: F32) -> F32 {
    recip(v)
}

#[inline]
pub(super) fn recip(v: F32) -> F32 {
    map(v, |x| 1.0 / x)
}

#[inline]
pub(super) fn sqrt_fast(v: F32) -> F32 {
    sqrt(v)
}

#[inline]
pub(super) fn sqrt(v: F32) -> F32 {
    map(v, f32::sqrt)
}

#[inline]
pub(super) fn rsqrt_fast(v: F32) -> F32 {
    rsqrt(v)
}

#[inline]
pub(super) fn rsqrt(v: F32) -> F32 {
    map(v, |x| 1.0 / x.sqrt())
}
