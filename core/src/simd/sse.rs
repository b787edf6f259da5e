//! SSE/SSE2 back-end.

// Intrinsics become safe to call once the target feature is enabled at
// build time on newer compilers.
#![allow(unused_unsafe)]

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{SimdBackend, SimdElement};

pub(super) const BACKEND: SimdBackend = SimdBackend::Sse;

pub type F32 = __m128;
pub type Mask = __m128i;

#[inline]
fn not(v: __m128i) -> __m128i {
    unsafe { _mm_xor_si128(v, _mm_set1_epi32(-1)) }
}

/// Flip the sign bit so that signed compares order unsigned lanes.
#[inline]
fn bias(v: __m128i) -> __m128i {
    unsafe { _mm_xor_si128(v, _mm_set1_epi32(i32::MIN)) }
}

#[cfg(target_feature = "sse4.1")]
#[inline]
fn mullo(a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_mullo_epi32(a, b) }
}

/// Low 32 bits of each lane product using only SSE2.
#[cfg(not(target_feature = "sse4.1"))]
#[inline]
fn mullo(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let even = _mm_mul_epu32(a, b);
        let odd = _mm_mul_epu32(_mm_srli_epi64::<32>(a), _mm_srli_epi64::<32>(b));
        _mm_unpacklo_epi32(
            _mm_shuffle_epi32::<0b00_00_10_00>(even),
            _mm_shuffle_epi32::<0b00_00_10_00>(odd),
        )
    }
}

#[inline]
fn broadcast_epi32<const LANE: usize>(v: __m128i) -> __m128i {
    unsafe {
        match LANE {
            0 => _mm_shuffle_epi32::<0x00>(v),
            1 => _mm_shuffle_epi32::<0x55>(v),
            2 => _mm_shuffle_epi32::<0xAA>(v),
            _ => _mm_shuffle_epi32::<0xFF>(v),
        }
    }
}

// ============================================================================
// f32
// ============================================================================

impl SimdElement for f32 {
    type Register = __m128;

    #[inline]
    unsafe fn load_aligned(src: *const Self) -> __m128 {
        unsafe { _mm_load_ps(src) }
    }

    #[inline]
    unsafe fn load_unaligned(src: *const Self) -> __m128 {
        unsafe { _mm_loadu_ps(src) }
    }

    #[inline]
    unsafe fn store_aligned(dst: *mut Self, v: __m128) {
        unsafe { _mm_store_ps(dst, v) }
    }

    #[inline]
    unsafe fn store_unaligned(dst: *mut Self, v: __m128) {
        unsafe { _mm_storeu_ps(dst, v) }
    }

    #[inline]
    fn splat(x: Self) -> __m128 {
        unsafe { _mm_set1_ps(x) }
    }

    #[inline]
    fn set(v0: Self, v1: Self, v2: Self, v3: Self) -> __m128 {
        unsafe { _mm_setr_ps(v0, v1, v2, v3) }
    }

    #[inline]
    fn extract<const LANE: usize>(v: __m128) -> Self {
        unsafe { _mm_cvtss_f32(Self::splat_lane::<LANE>(v)) }
    }

    #[inline]
    fn splat_lane<const LANE: usize>(v: __m128) -> __m128 {
        unsafe {
            match LANE {
                0 => _mm_shuffle_ps::<0x00>(v, v),
                1 => _mm_shuffle_ps::<0x55>(v, v),
                2 => _mm_shuffle_ps::<0xAA>(v, v),
                _ => _mm_shuffle_ps::<0xFF>(v, v),
            }
        }
    }

    #[inline]
    fn add(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_add_ps(a, b) }
    }

    #[inline]
    fn sub(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_sub_ps(a, b) }
    }

    #[inline]
    fn mul(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_mul_ps(a, b) }
    }

    #[inline]
    fn cmp_eq(a: __m128, b: __m128) -> Mask {
        unsafe { _mm_castps_si128(_mm_cmpeq_ps(a, b)) }
    }

    #[inline]
    fn cmp_ne(a: __m128, b: __m128) -> Mask {
        unsafe { _mm_castps_si128(_mm_cmpneq_ps(a, b)) }
    }

    #[inline]
    fn cmp_lt(a: __m128, b: __m128) -> Mask {
        unsafe { _mm_castps_si128(_mm_cmplt_ps(a, b)) }
    }

    #[inline]
    fn cmp_gt(a: __m128, b: __m128) -> Mask {
        unsafe { _mm_castps_si128(_mm_cmpgt_ps(a, b)) }
    }

    #[inline]
    fn cmp_le(a: __m128, b: __m128) -> Mask {
        unsafe { _mm_castps_si128(_mm_cmple_ps(a, b)) }
    }

    #[inline]
    fn cmp_ge(a: __m128, b: __m128) -> Mask {
        unsafe { _mm_castps_si128(_mm_cmpge_ps(a, b)) }
    }

    #[inline]
    fn to_bits(v: __m128) -> Mask {
        unsafe { _mm_castps_si128(v) }
    }

    #[inline]
    fn from_bits(bits: Mask) -> __m128 {
        unsafe { _mm_castsi128_ps(bits) }
    }
}

// ============================================================================
// i32 / u32
// ============================================================================

macro_rules! sse_integer_element {
    ($elem:ty, lt: $lt:expr, gt: $gt:expr) => {
        impl SimdElement for $elem {
            type Register = __m128i;

            #[inline]
            unsafe fn load_aligned(src: *const Self) -> __m128i {
                unsafe { _mm_load_si128(src.cast()) }
            }

            #[inline]
            unsafe fn load_unaligned(src: *const Self) -> __m128i {
                unsafe { _mm_loadu_si128(src.cast()) }
            }

            #[inline]
            unsafe fn store_aligned(dst: *mut Self, v: __m128i) {
                unsafe { _mm_store_si128(dst.cast(), v) }
            }

            #[inline]
            unsafe fn store_unaligned(dst: *mut Self, v: __m128i) {
                unsafe { _mm_storeu_si128(dst.cast(), v) }
            }

            #[inline]
            fn splat(x: Self) -> __m128i {
                unsafe { _mm_set1_epi32(x as i32) }
            }

            #[inline]
            fn set(v0: Self, v1: Self, v2: Self, v3: Self) -> __m128i {
                unsafe { _mm_setr_epi32(v0 as i32, v1 as i32, v2 as i32, v3 as i32) }
            }

            #[inline]
            fn extract<const LANE: usize>(v: __m128i) -> Self {
                unsafe { _mm_cvtsi128_si32(broadcast_epi32::<LANE>(v)) as Self }
            }

            #[inline]
            fn splat_lane<const LANE: usize>(v: __m128i) -> __m128i {
                broadcast_epi32::<LANE>(v)
            }

            #[inline]
            fn add(a: __m128i, b: __m128i) -> __m128i {
                unsafe { _mm_add_epi32(a, b) }
            }

            #[inline]
            fn sub(a: __m128i, b: __m128i) -> __m128i {
                unsafe { _mm_sub_epi32(a, b) }
            }

            #[inline]
            fn mul(a: __m128i, b: __m128i) -> __m128i {
                mullo(a, b)
            }

            #[inline]
            fn cmp_eq(a: __m128i, b: __m128i) -> Mask {
                unsafe { _mm_cmpeq_epi32(a, b) }
            }

            #[inline]
            fn cmp_ne(a: __m128i, b: __m128i) -> Mask {
                not(Self::cmp_eq(a, b))
            }

            #[inline]
            fn cmp_lt(a: __m128i, b: __m128i) -> Mask {
                let lt: fn(__m128i, __m128i) -> __m128i = $lt;
                lt(a, b)
            }

            #[inline]
            fn cmp_gt(a: __m128i, b: __m128i) -> Mask {
                let gt: fn(__m128i, __m128i) -> __m128i = $gt;
                gt(a, b)
            }

            #[inline]
            fn cmp_le(a: __m128i, b: __m128i) -> Mask {
                not(Self::cmp_gt(a, b))
            }

            #[inline]
            fn cmp_ge(a: __m128i, b: __m128i) -> Mask {
                not(Self::cmp_lt(a, b))
            }

            #[inline]
            fn to_bits(v: __m128i) -> Mask {
                v
            }

            #[inline]
            fn from_bits(bits: Mask) -> __m128i {
                bits
            }
        }
    };
}

sse_integer_element!(
    i32,
    lt: |a, b| unsafe { _mm_cmplt_epi32(a, b) },
    gt: |a, b| unsafe { _mm_cmpgt_epi32(a, b) }
);

sse_integer_element!(
    u32,
    lt: |a, b| unsafe { _mm_cmplt_epi32(bias(a), bias(b)) },
    gt: |a, b| unsafe { _mm_cmpgt_epi32(bias(a), bias(b)) }
);

// ============================================================================
// f32-only operations
// ============================================================================

#[inline]
fn sign_mask() -> __m128 {
    unsafe { _mm_set1_ps(-0.0) }
}

#[inline]
pub(super) fn div(a: F32, b: F32) -> F32 {
    unsafe { _mm_div_ps(a, b) }
}

#[inline]
pub(super) fn neg(v: F32) -> F32 {
    unsafe { _mm_xor_ps(v, sign_mask()) }
}

#[inline]
pub(super) fn abs(v: F32) -> F32 {
    unsafe { _mm_andnot_ps(sign_mask(), v) }
}

#[inline]
pub(super) fn abs_diff(a: F32, b: F32) -> F32 {
    abs(unsafe { _mm_sub_ps(a, b) })
}

#[cfg(target_feature = "fma")]
#[inline]
pub(super) fn fma(add: F32, lhs: F32, rhs: F32) -> F32 {
    unsafe { _mm_fmadd_ps(lhs, rhs, add) }
}

#[cfg(not(target_feature = "fma"))]
#[inline]
pub(super) fn fma(add: F32, lhs: F32, rhs: F32) -> F32 {
    unsafe { _mm_add_ps(add, _mm_mul_ps(lhs, rhs)) }
}

// `_mm_min_ps(a, b)` is `a < b ? a : b`, matching the scalar lane rule.
#[inline]
pub(super) fn min(a: F32, b: F32) -> F32 {
    unsafe { _mm_min_ps(a, b) }
}

#[inline]
pub(super) fn max(a: F32, b: F32) -> F32 {
    unsafe { _mm_max_ps(a, b) }
}

#[inline]
pub(super) fn recip_fast(v: F32) -> F32 {
    unsafe { _mm_rcp_ps(v) }
}

#[inline]
pub(super) fn recip(v: F32) -> F32 {
    unsafe { _mm_div_ps(_mm_set1_ps(1.0), v) }
}

#[inline]
pub(super) fn sqrt_fast(v: F32) -> F32 {
    sqrt(v)
}

#[inline]
pub(super) fn sqrt(v: F32) -> F32 {
    unsafe { _mm_sqrt_ps(v) }
}

#[inline]
pub(super) fn rsqrt_fast(v: F32) -> F32 {
    unsafe { _mm_rsqrt_ps(v) }
}

#[inline]
pub(super) fn rsqrt(v: F32) -> F32 {
    unsafe { _mm_div_ps(_mm_set1_ps(1.0), _mm_sqrt_ps(v)) }
}
