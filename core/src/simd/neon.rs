//! NEON back-end for aarch64.

#![allow(unused_unsafe)]

use std::arch::aarch64::*;

use super::{SimdBackend, SimdElement};

pub(super) const BACKEND: SimdBackend = SimdBackend::Neon;

pub type F32 = float32x4_t;
pub type Mask = uint32x4_t;

macro_rules! neon_element {
    (
        $elem:ty, $reg:ty,
        load: $load:ident, store: $store:ident, dup: $dup:ident,
        get_lane: $get:ident, dup_lane: $dup_lane:ident,
        add: $add:ident, sub: $sub:ident, mul: $mul:ident,
        eq: $eq:ident, lt: $lt:ident, gt: $gt:ident, le: $le:ident, ge: $ge:ident,
        to_bits: |$b:ident| $to_bits:expr, from_bits: |$u:ident| $from_bits:expr
    ) => {
        impl SimdElement for $elem {
            type Register = $reg;

            // NEON loads and stores have no alignment requirement.
            #[inline]
            unsafe fn load_aligned(src: *const Self) -> $reg {
                unsafe { $load(src) }
            }

            #[inline]
            unsafe fn load_unaligned(src: *const Self) -> $reg {
                unsafe { $load(src) }
            }

            #[inline]
            unsafe fn store_aligned(dst: *mut Self, v: $reg) {
                unsafe { $store(dst, v) }
            }

            #[inline]
            unsafe fn store_unaligned(dst: *mut Self, v: $reg) {
                unsafe { $store(dst, v) }
            }

            #[inline]
            fn splat(x: Self) -> $reg {
                unsafe { $dup(x) }
            }

            #[inline]
            fn set(v0: Self, v1: Self, v2: Self, v3: Self) -> $reg {
                let lanes = [v0, v1, v2, v3];
                unsafe { $load(lanes.as_ptr()) }
            }

            #[inline]
            fn extract<const LANE: usize>(v: $reg) -> Self {
                unsafe {
                    match LANE {
                        0 => $get::<0>(v),
                        1 => $get::<1>(v),
                        2 => $get::<2>(v),
                        _ => $get::<3>(v),
                    }
                }
            }

            #[inline]
            fn splat_lane<const LANE: usize>(v: $reg) -> $reg {
                unsafe {
                    match LANE {
                        0 => $dup_lane::<0>(v),
                        1 => $dup_lane::<1>(v),
                        2 => $dup_lane::<2>(v),
                        _ => $dup_lane::<3>(v),
                    }
                }
            }

            #[inline]
            fn add(a: $reg, b: $reg) -> $reg {
                unsafe { $add(a, b) }
            }

            #[inline]
            fn sub(a: $reg, b: $reg) -> $reg {
                unsafe { $sub(a, b) }
            }

            #[inline]
            fn mul(a: $reg, b: $reg) -> $reg {
                unsafe { $mul(a, b) }
            }

            #[inline]
            fn cmp_eq(a: $reg, b: $reg) -> Mask {
                unsafe { $eq(a, b) }
            }

            #[inline]
            fn cmp_ne(a: $reg, b: $reg) -> Mask {
                unsafe { vmvnq_u32($eq(a, b)) }
            }

            #[inline]
            fn cmp_lt(a: $reg, b: $reg) -> Mask {
                unsafe { $lt(a, b) }
            }

            #[inline]
            fn cmp_gt(a: $reg, b: $reg) -> Mask {
                unsafe { $gt(a, b) }
            }

            #[inline]
            fn cmp_le(a: $reg, b: $reg) -> Mask {
                unsafe { $le(a, b) }
            }

            #[inline]
            fn cmp_ge(a: $reg, b: $reg) -> Mask {
                unsafe { $ge(a, b) }
            }

            #[inline]
            fn to_bits($b: $reg) -> Mask {
                unsafe { $to_bits }
            }

            #[inline]
            fn from_bits($u: Mask) -> $reg {
                unsafe { $from_bits }
            }
        }
    };
}

neon_element!(
    f32, float32x4_t,
    load: vld1q_f32, store: vst1q_f32, dup: vdupq_n_f32,
    get_lane: vgetq_lane_f32, dup_lane: vdupq_laneq_f32,
    add: vaddq_f32, sub: vsubq_f32, mul: vmulq_f32,
    eq: vceqq_f32, lt: vcltq_f32, gt: vcgtq_f32, le: vcleq_f32, ge: vcgeq_f32,
    to_bits: |v| vreinterpretq_u32_f32(v), from_bits: |bits| vreinterpretq_f32_u32(bits)
);

neon_element!(
    i32, int32x4_t,
    load: vld1q_s32, store: vst1q_s32, dup: vdupq_n_s32,
    get_lane: vgetq_lane_s32, dup_lane: vdupq_laneq_s32,
    add: vaddq_s32, sub: vsubq_s32, mul: vmulq_s32,
    eq: vceqq_s32, lt: vcltq_s32, gt: vcgtq_s32, le: vcleq_s32, ge: vcgeq_s32,
    to_bits: |v| vreinterpretq_u32_s32(v), from_bits: |bits| vreinterpretq_s32_u32(bits)
);

neon_element!(
    u32, uint32x4_t,
    load: vld1q_u32, store: vst1q_u32, dup: vdupq_n_u32,
    get_lane: vgetq_lane_u32, dup_lane: vdupq_laneq_u32,
    add: vaddq_u32, sub: vsubq_u32, mul: vmulq_u32,
    eq: vceqq_u32, lt: vcltq_u32, gt: vcgtq_u32, le: vcleq_u32, ge: vcgeq_u32,
    to_bits: |v| v, from_bits: |bits| bits
);

// ============================================================================
// f32-only operations
// ============================================================================

#[inline]
pub(super) fn div(a: F32, b: F32) -> F32 {
    unsafe { vdivq_f32(a, b) }
}

#[inline]
pub(super) fn neg(v: F32) -> F32 {
    unsafe { vnegq_f32(v) }
}

#[inline]
pub(super) fn abs(v: F32) -> F32 {
    unsafe { vabsq_f32(v) }
}

#[inline]
pub(super) fn abs_diff(a: F32, b: F32) -> F32 {
    unsafe { vabdq_f32(a, b) }
}

#[inline]
pub(super) fn fma(add: F32, lhs: F32, rhs: F32) -> F32 {
    unsafe { vfmaq_f32(add, lhs, rhs) }
}

// Written as compare-and-select so that NaN lanes follow the scalar rule.
#[inline]
pub(super) fn min(a: F32, b: F32) -> F32 {
    unsafe { vbslq_f32(vcltq_f32(a, b), a, b) }
}

#[inline]
pub(super) fn max(a: F32, b: F32) -> F32 {
    unsafe { vbslq_f32(vcgtq_f32(a, b), a, b) }
}

/// One Newton-Raphson step on a reciprocal estimate.
#[inline]
fn refine_recip(v: F32, estimate: F32) -> F32 {
    unsafe { vmulq_f32(vrecpsq_f32(v, estimate), estimate) }
}

/// One Newton-Raphson step on a reciprocal square root estimate.
#[inline]
fn refine_rsqrt(v: F32, estimate: F32) -> F32 {
    unsafe { vmulq_f32(vrsqrtsq_f32(vmulq_f32(v, estimate), estimate), estimate) }
}

#[inline]
pub(super) fn recip_fast(v: F32) -> F32 {
    refine_recip(v, unsafe { vrecpeq_f32(v) })
}

#[inline]
pub(super) fn recip(v: F32) -> F32 {
    refine_recip(v, recip_fast(v))
}

#[inline]
pub(super) fn sqrt_fast(v: F32) -> F32 {
    sqrt(v)
}

#[inline]
pub(super) fn sqrt(v: F32) -> F32 {
    unsafe { vsqrtq_f32(v) }
}

#[inline]
pub(super) fn rsqrt_fast(v: F32) -> F32 {
    refine_rsqrt(v, unsafe { vrsqrteq_f32(v) })
}

#[inline]
pub(super) fn rsqrt(v: F32) -> F32 {
    refine_rsqrt(v, rsqrt_fast(v))
}
