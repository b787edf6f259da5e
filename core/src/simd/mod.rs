//! Portable four-lane SIMD vectors.
//!
//! This module provides:
//! - [`Simd`] - Four lanes of `f32`, `i32` or `u32` in a platform register
//! - [`SimdElement`] - The sealed set of lane element kinds
//! - [`AlignedArray`] - Fixed-size arrays with a declared alignment, used for aligned loads and stores
//! - `simd_*` free functions - Lane-wise arithmetic, comparisons, reciprocals, roots and dot products
//!
//! # Back-ends
//!
//! One back-end is compiled in, chosen from the build target:
//!
//! | Target | Back-end |
//! |--------|----------|
//! | `aarch64` with `neon` | NEON |
//! | `x86` / `x86_64` with `sse2` | SSE |
//! | anything else, or the `disable-simd` feature | scalar |
//!
//! Every back-end produces the lane results of the scalar back-end. Integer
//! arithmetic wraps. The only permitted differences are the precision of the
//! `fast` reciprocal and root tiers and the rounding of a hardware fused
//! multiply-add.
//!
//! # Example
//!
//! ```
//! use ember_core::simd::{Simd, simd_add, simd_less};
//!
//! let a = Simd::set(1.0f32, 2.0, 3.0, 4.0);
//! let b = Simd::splat(2.5f32);
//! assert_eq!(simd_add(a, b).lane::<3>(), 6.5);
//! assert_eq!(simd_less(a, b).to_array(), [u32::MAX, u32::MAX, 0, 0]);
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

mod aligned;
mod dot;

#[cfg(all(
    target_arch = "aarch64",
    target_feature = "neon",
    not(feature = "disable-simd")
))]
#[path = "neon.rs"]
mod backend;

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(feature = "disable-simd")
))]
#[path = "sse.rs"]
mod backend;

#[cfg(not(any(
    all(
        target_arch = "aarch64",
        target_feature = "neon",
        not(feature = "disable-simd")
    ),
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2",
        not(feature = "disable-simd")
    )
)))]
#[path = "scalar.rs"]
mod backend;

pub use aligned::{
    Align4, Align8, Align16, Align32, Align64, AlignedArray, Alignment, SIMD_ALIGNMENT,
    SimdAlignedArray,
};
pub use dot::{
    simd_dot, simd_dot_scalars, simd_dot4, simd_dot4_each, simd_dot4_scalars, simd_dot4_to,
    simd_dot4_to_simd,
};

/// The SIMD instruction set a build uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdBackend {
    /// ARM Advanced SIMD.
    Neon,
    /// x86 SSE/SSE2.
    Sse,
    /// Portable scalar code.
    Scalar,
}

impl fmt::Display for SimdBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neon => write!(f, "neon"),
            Self::Sse => write!(f, "sse"),
            Self::Scalar => write!(f, "scalar"),
        }
    }
}

/// The back-end selected for this build.
pub const SIMD_BACKEND: SimdBackend = backend::BACKEND;

/// Register type of a [`Simd<T>`].
pub type SimdRegister<T> = <T as SimdElement>::Register;

/// Register type returned by comparisons.
pub type MaskRegister = backend::Mask;

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
}

/// A 32-bit lane element kind: `f32`, `i32` or `u32`.
///
/// The methods are the per-back-end primitives behind [`Simd`]; use the
/// `simd_*` functions and [`Simd`] methods instead of calling them directly.
pub trait SimdElement:
    sealed::Sealed + Copy + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static
{
    /// Platform register holding four lanes of `Self`.
    type Register: Copy;

    #[doc(hidden)]
    unsafe fn load_aligned(src: *const Self) -> Self::Register;
    #[doc(hidden)]
    unsafe fn load_unaligned(src: *const Self) -> Self::Register;
    #[doc(hidden)]
    unsafe fn store_aligned(dst: *mut Self, v: Self::Register);
    #[doc(hidden)]
    unsafe fn store_unaligned(dst: *mut Self, v: Self::Register);
    #[doc(hidden)]
    fn splat(x: Self) -> Self::Register;
    #[doc(hidden)]
    fn set(v0: Self, v1: Self, v2: Self, v3: Self) -> Self::Register;
    #[doc(hidden)]
    fn extract<const LANE: usize>(v: Self::Register) -> Self;
    #[doc(hidden)]
    fn splat_lane<const LANE: usize>(v: Self::Register) -> Self::Register;
    #[doc(hidden)]
    fn add(a: Self::Register, b: Self::Register) -> Self::Register;
    #[doc(hidden)]
    fn sub(a: Self::Register, b: Self::Register) -> Self::Register;
    #[doc(hidden)]
    fn mul(a: Self::Register, b: Self::Register) -> Self::Register;
    #[doc(hidden)]
    fn cmp_eq(a: Self::Register, b: Self::Register) -> MaskRegister;
    #[doc(hidden)]
    fn cmp_ne(a: Self::Register, b: Self::Register) -> MaskRegister;
    #[doc(hidden)]
    fn cmp_lt(a: Self::Register, b: Self::Register) -> MaskRegister;
    #[doc(hidden)]
    fn cmp_gt(a: Self::Register, b: Self::Register) -> MaskRegister;
    #[doc(hidden)]
    fn cmp_le(a: Self::Register, b: Self::Register) -> MaskRegister;
    #[doc(hidden)]
    fn cmp_ge(a: Self::Register, b: Self::Register) -> MaskRegister;
    #[doc(hidden)]
    fn to_bits(v: Self::Register) -> MaskRegister;
    #[doc(hidden)]
    fn from_bits(bits: MaskRegister) -> Self::Register;
}

// ============================================================================
// Simd<T>
// ============================================================================

/// Four lanes of `T` held in a platform SIMD register.
///
/// `Simd<T>` is layout-compatible with its register type (`__m128`,
/// `__m128i`, `float32x4_t`, ...), so [`into_register`](Self::into_register)
/// and [`from_register`](Self::from_register) hand values to and from
/// platform intrinsics at no cost.
#[repr(transparent)]
pub struct Simd<T: SimdElement>(T::Register);

impl<T: SimdElement> Clone for Simd<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SimdElement> Copy for Simd<T> {}

impl<T: SimdElement> Simd<T> {
    /// Load four lanes from 16-byte aligned storage.
    #[inline]
    pub fn load(src: &SimdAlignedArray<T, 4>) -> Self {
        // SAFETY: SimdAlignedArray guarantees 16-byte alignment and four elements.
        Self(unsafe { T::load_aligned(src.as_ptr()) })
    }

    /// Load four lanes from storage with no alignment requirement.
    #[inline]
    pub fn load_unaligned(src: &[T; 4]) -> Self {
        // SAFETY: the array holds four elements.
        Self(unsafe { T::load_unaligned(src.as_ptr()) })
    }

    /// Load the first four elements of `src`.
    ///
    /// # Panics
    ///
    /// If `src` has fewer than four elements.
    #[inline]
    pub fn from_slice(src: &[T]) -> Self {
        assert!(
            src.len() >= 4,
            "slice of length {} is shorter than 4 lanes",
            src.len()
        );
        // SAFETY: length checked above.
        Self(unsafe { T::load_unaligned(src.as_ptr()) })
    }

    /// Every lane set to `x`.
    #[inline]
    pub fn splat(x: T) -> Self {
        Self(T::splat(x))
    }

    /// Every lane set to lane `LANE` of `v`.
    #[inline]
    pub fn spread_from_lane<const LANE: usize>(v: Self) -> Self {
        const { assert!(LANE < 4, "lane index out of range") };
        Self(T::splat_lane::<LANE>(v.0))
    }

    /// Lanes set to `v0, v1, v2, v3` in order.
    #[inline]
    pub fn set(v0: T, v1: T, v2: T, v3: T) -> Self {
        Self(T::set(v0, v1, v2, v3))
    }

    /// Store four lanes into 16-byte aligned storage.
    #[inline]
    pub fn store(self, dst: &mut SimdAlignedArray<T, 4>) {
        // SAFETY: SimdAlignedArray guarantees 16-byte alignment and four elements.
        unsafe { T::store_aligned(dst.as_mut_ptr(), self.0) }
    }

    /// Store four lanes into storage with no alignment requirement.
    #[inline]
    pub fn store_unaligned(self, dst: &mut [T; 4]) {
        // SAFETY: the array holds four elements.
        unsafe { T::store_unaligned(dst.as_mut_ptr(), self.0) }
    }

    /// Store the four lanes into the start of `dst`.
    ///
    /// # Panics
    ///
    /// If `dst` has fewer than four elements.
    #[inline]
    pub fn write_to_slice(self, dst: &mut [T]) {
        assert!(
            dst.len() >= 4,
            "slice of length {} is shorter than 4 lanes",
            dst.len()
        );
        // SAFETY: length checked above.
        unsafe { T::store_unaligned(dst.as_mut_ptr(), self.0) }
    }

    /// The scalar in lane `LANE`.
    #[inline]
    pub fn lane<const LANE: usize>(self) -> T {
        const { assert!(LANE < 4, "lane index out of range") };
        T::extract::<LANE>(self.0)
    }

    /// The four lanes as an array.
    pub fn to_array(self) -> [T; 4] {
        let mut out = [T::default(); 4];
        self.store_unaligned(&mut out);
        out
    }

    /// Wrap a platform register.
    #[inline]
    pub fn from_register(register: T::Register) -> Self {
        Self(register)
    }

    /// The underlying platform register.
    #[inline]
    pub fn into_register(self) -> T::Register {
        self.0
    }
}

impl<T: SimdElement> From<[T; 4]> for Simd<T> {
    fn from(lanes: [T; 4]) -> Self {
        Self::load_unaligned(&lanes)
    }
}

impl<T: SimdElement> From<Simd<T>> for [T; 4] {
    fn from(v: Simd<T>) -> Self {
        v.to_array()
    }
}

impl<T: SimdElement> Default for Simd<T> {
    fn default() -> Self {
        Self::splat(T::default())
    }
}

impl<T: SimdElement> fmt::Debug for Simd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Simd").field(&self.to_array()).finish()
    }
}

static_assertions::assert_eq_size!(Simd<f32>, SimdRegister<f32>, [f32; 4]);
static_assertions::assert_eq_size!(Simd<i32>, SimdRegister<i32>, [i32; 4]);
static_assertions::assert_eq_size!(Simd<u32>, SimdRegister<u32>, [u32; 4]);
static_assertions::const_assert_eq!(align_of::<Simd<f32>>(), SIMD_ALIGNMENT);
static_assertions::assert_impl_all!(Simd<f32>: Send, Sync, Copy);

// ============================================================================
// Factories and stores
// ============================================================================

#[inline]
pub fn simd_load<T: SimdElement>(src: &SimdAlignedArray<T, 4>) -> Simd<T> {
    Simd::load(src)
}

#[inline]
pub fn simd_load_unaligned<T: SimdElement>(src: &[T; 4]) -> Simd<T> {
    Simd::load_unaligned(src)
}

#[inline]
pub fn simd_spread_scalar<T: SimdElement>(x: T) -> Simd<T> {
    Simd::splat(x)
}

#[inline]
pub fn simd_spread_from_lane<const LANE: usize, T: SimdElement>(v: Simd<T>) -> Simd<T> {
    Simd::spread_from_lane::<LANE>(v)
}

#[inline]
pub fn simd_set<T: SimdElement>(v0: T, v1: T, v2: T, v3: T) -> Simd<T> {
    Simd::set(v0, v1, v2, v3)
}

#[inline]
pub fn simd_store<T: SimdElement>(v: Simd<T>, dst: &mut SimdAlignedArray<T, 4>) {
    v.store(dst)
}

#[inline]
pub fn simd_store_unaligned<T: SimdElement>(v: Simd<T>, dst: &mut [T; 4]) {
    v.store_unaligned(dst)
}

/// Reinterpret the 128 register bits as lanes of another kind.
///
/// No lane conversion happens: `simd_cast::<u32, f32>(Simd::splat(1.0))`
/// yields `0x3F80_0000` in every lane.
#[inline]
pub fn simd_cast<To: SimdElement, From: SimdElement>(v: Simd<From>) -> Simd<To> {
    Simd(To::from_bits(From::to_bits(v.0)))
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Lane-wise `a + b`. Integer lanes wrap.
#[inline]
pub fn simd_add<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<T> {
    Simd(T::add(a.0, b.0))
}

/// Lane-wise `a - b`. Integer lanes wrap.
#[inline]
pub fn simd_subtract<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<T> {
    Simd(T::sub(a.0, b.0))
}

/// Lane-wise `a * b`. Integer lanes keep the low 32 bits.
#[inline]
pub fn simd_multiply<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<T> {
    Simd(T::mul(a.0, b.0))
}

#[inline]
pub fn simd_multiply_scalar<T: SimdElement>(v: Simd<T>, s: T) -> Simd<T> {
    simd_multiply(v, Simd::splat(s))
}

#[inline]
pub fn simd_divide(a: Simd<f32>, b: Simd<f32>) -> Simd<f32> {
    Simd(backend::div(a.0, b.0))
}

#[inline]
pub fn simd_negate(v: Simd<f32>) -> Simd<f32> {
    Simd(backend::neg(v.0))
}

#[inline]
pub fn simd_abs(v: Simd<f32>) -> Simd<f32> {
    Simd(backend::abs(v.0))
}

/// Lane-wise `|a - b|`.
#[inline]
pub fn simd_abs_difference(a: Simd<f32>, b: Simd<f32>) -> Simd<f32> {
    Simd(backend::abs_diff(a.0, b.0))
}

/// Lane-wise `add + lhs * rhs`, fused where the target has an instruction for it.
#[inline]
pub fn simd_fuse_add_multiply(add: Simd<f32>, lhs: Simd<f32>, rhs: Simd<f32>) -> Simd<f32> {
    Simd(backend::fma(add.0, lhs.0, rhs.0))
}

#[inline]
pub fn simd_fuse_add_multiply_scalar(add: Simd<f32>, lhs: Simd<f32>, rhs: f32) -> Simd<f32> {
    simd_fuse_add_multiply(add, lhs, Simd::splat(rhs))
}

#[inline]
pub fn simd_min(a: Simd<f32>, b: Simd<f32>) -> Simd<f32> {
    Simd(backend::min(a.0, b.0))
}

#[inline]
pub fn simd_max(a: Simd<f32>, b: Simd<f32>) -> Simd<f32> {
    Simd(backend::max(a.0, b.0))
}

// ============================================================================
// Comparisons
// ============================================================================

// Each lane of a comparison result is `u32::MAX` when the predicate holds and 0 otherwise.

#[inline]
pub fn simd_equal<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<u32> {
    Simd::from_register(u32::from_bits(T::cmp_eq(a.0, b.0)))
}

#[inline]
pub fn simd_not_equal<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<u32> {
    Simd::from_register(u32::from_bits(T::cmp_ne(a.0, b.0)))
}

#[inline]
pub fn simd_less<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<u32> {
    Simd::from_register(u32::from_bits(T::cmp_lt(a.0, b.0)))
}

#[inline]
pub fn simd_greater<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<u32> {
    Simd::from_register(u32::from_bits(T::cmp_gt(a.0, b.0)))
}

#[inline]
pub fn simd_less_equal<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<u32> {
    Simd::from_register(u32::from_bits(T::cmp_le(a.0, b.0)))
}

#[inline]
pub fn simd_greater_equal<T: SimdElement>(a: Simd<T>, b: Simd<T>) -> Simd<u32> {
    Simd::from_register(u32::from_bits(T::cmp_ge(a.0, b.0)))
}

/// Lanes where `|a - b| <= tolerance`, with a per-lane tolerance.
#[inline]
pub fn simd_almost_equal(a: Simd<f32>, b: Simd<f32>, tolerance: Simd<f32>) -> Simd<u32> {
    simd_less_equal(simd_abs_difference(a, b), tolerance)
}

#[inline]
pub fn simd_almost_equal_scalar(a: Simd<f32>, b: Simd<f32>, tolerance: f32) -> Simd<u32> {
    simd_almost_equal(a, b, Simd::splat(tolerance))
}

// ============================================================================
// Reciprocals and roots
// ============================================================================

/// Approximate `1 / v`, within 1e-2 for inputs in `[1, 7]`.
#[inline]
pub fn simd_fast_reciprocal(v: Simd<f32>) -> Simd<f32> {
    Simd(backend::recip_fast(v.0))
}

/// `1 / v`, within 1e-5 for inputs in `[1, 7]`.
#[inline]
pub fn simd_reciprocal(v: Simd<f32>) -> Simd<f32> {
    Simd(backend::recip(v.0))
}

#[inline]
pub fn simd_fast_sqrt(v: Simd<f32>) -> Simd<f32> {
    Simd(backend::sqrt_fast(v.0))
}

#[inline]
pub fn simd_sqrt(v: Simd<f32>) -> Simd<f32> {
    Simd(backend::sqrt(v.0))
}

#[inline]
pub fn simd_fast_reciprocal_sqrt(v: Simd<f32>) -> Simd<f32> {
    Simd(backend::rsqrt_fast(v.0))
}

#[inline]
pub fn simd_reciprocal_sqrt(v: Simd<f32>) -> Simd<f32> {
    Simd(backend::rsqrt(v.0))
}

// ============================================================================
// Operators
// ============================================================================

impl<T: SimdElement> Add for Simd<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        simd_add(self, rhs)
    }
}

impl<T: SimdElement> Sub for Simd<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        simd_subtract(self, rhs)
    }
}

impl<T: SimdElement> Mul for Simd<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        simd_multiply(self, rhs)
    }
}

impl<T: SimdElement> Mul<T> for Simd<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        simd_multiply_scalar(self, rhs)
    }
}

impl Div for Simd<f32> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        simd_divide(self, rhs)
    }
}

impl Neg for Simd<f32> {
    type Output = Self;

    fn neg(self) -> Self {
        simd_negate(self)
    }
}

#[cfg(test)]
mod tests;
