//! Batched four-wide dot products.
//!
//! A "group" is four `Simd<f32>` vectors (or sixteen consecutive scalars
//! read as four vectors). Lane `k` of a group's dot product is the dot
//! product of lane `k` across the four vectors of each side.

use super::{Simd, SimdAlignedArray, SimdElement, simd_add, simd_multiply};

/// Dot products of two groups of four vectors, one per lane.
///
/// The four products are summed as `(p0 + p1) + (p2 + p3)` so that the adds
/// do not form a serial chain.
#[inline]
pub fn simd_dot4(lhs: &[Simd<f32>; 4], rhs: &[Simd<f32>; 4]) -> Simd<f32> {
    let p0 = simd_multiply(lhs[0], rhs[0]);
    let p1 = simd_multiply(lhs[1], rhs[1]);
    let p2 = simd_multiply(lhs[2], rhs[2]);
    let p3 = simd_multiply(lhs[3], rhs[3]);
    simd_add(simd_add(p0, p1), simd_add(p2, p3))
}

/// [`simd_dot4`] over sixteen aligned scalars per side.
#[inline]
pub fn simd_dot4_scalars(
    lhs: &SimdAlignedArray<f32, 16>,
    rhs: &SimdAlignedArray<f32, 16>,
) -> Simd<f32> {
    simd_dot4(&load_group_aligned(lhs), &load_group_aligned(rhs))
}

#[inline]
fn load_group_aligned(src: &SimdAlignedArray<f32, 16>) -> [Simd<f32>; 4] {
    // SAFETY: the array is 16-byte aligned and each quad starts 16 bytes
    // after the previous one.
    std::array::from_fn(|i| unsafe {
        Simd::from_register(f32::load_aligned(src.as_ptr().add(4 * i)))
    })
}

#[inline]
fn load_group(src: &[f32]) -> [Simd<f32>; 4] {
    std::array::from_fn(|i| Simd::from_slice(&src[4 * i..]))
}

#[inline]
fn group_of(src: &[Simd<f32>]) -> [Simd<f32>; 4] {
    [src[0], src[1], src[2], src[3]]
}

/// One dot product per group of four vectors.
///
/// # Panics
///
/// If the slices differ in length or the length is not a multiple of four.
pub fn simd_dot(lhs: &[Simd<f32>], rhs: &[Simd<f32>]) -> Vec<Simd<f32>> {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "dot product operands differ in length"
    );
    assert!(
        lhs.len() % 4 == 0,
        "vector count {} is not a multiple of 4",
        lhs.len()
    );
    lhs.chunks_exact(4)
        .zip(rhs.chunks_exact(4))
        .map(|(l, r)| simd_dot4(&group_of(l), &group_of(r)))
        .collect()
}

/// One dot product per sixteen scalars.
///
/// # Panics
///
/// If the slices differ in length or the length is not a multiple of sixteen.
pub fn simd_dot_scalars(lhs: &[f32], rhs: &[f32]) -> Vec<Simd<f32>> {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "dot product operands differ in length"
    );
    assert!(
        lhs.len() % 16 == 0,
        "scalar count {} is not a multiple of 16",
        lhs.len()
    );
    lhs.chunks_exact(16)
        .zip(rhs.chunks_exact(16))
        .map(|(l, r)| simd_dot4(&load_group(l), &load_group(r)))
        .collect()
}

/// Dot products of every sixteen scalars, stored as four scalars each.
///
/// `out` receives `lhs.len() / 4` values.
///
/// # Panics
///
/// If the slices differ in length, the length is not a multiple of sixteen,
/// or `out.len() != lhs.len() / 4`.
pub fn simd_dot4_to(lhs: &[f32], rhs: &[f32], out: &mut [f32]) {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "dot product operands differ in length"
    );
    assert!(
        lhs.len() % 16 == 0,
        "scalar count {} is not a multiple of 16",
        lhs.len()
    );
    assert_eq!(
        out.len(),
        lhs.len() / 4,
        "output must hold one scalar per input quad"
    );
    for ((l, r), o) in lhs
        .chunks_exact(16)
        .zip(rhs.chunks_exact(16))
        .zip(out.chunks_exact_mut(4))
    {
        simd_dot4(&load_group(l), &load_group(r)).write_to_slice(o);
    }
}

/// Dot products of every sixteen scalars, stored as vectors.
///
/// `out` receives `lhs.len() / 16` values.
///
/// # Panics
///
/// If the slices differ in length, the length is not a multiple of sixteen,
/// or `out.len() != lhs.len() / 16`.
pub fn simd_dot4_to_simd(lhs: &[f32], rhs: &[f32], out: &mut [Simd<f32>]) {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "dot product operands differ in length"
    );
    assert!(
        lhs.len() % 16 == 0,
        "scalar count {} is not a multiple of 16",
        lhs.len()
    );
    assert_eq!(
        out.len(),
        lhs.len() / 16,
        "output must hold one vector per 16 scalars"
    );
    for ((l, r), o) in lhs.chunks_exact(16).zip(rhs.chunks_exact(16)).zip(out) {
        *o = simd_dot4(&load_group(l), &load_group(r));
    }
}

/// Pairwise [`simd_dot4`] over arrays of groups.
///
/// # Panics
///
/// If the three slices differ in length.
pub fn simd_dot4_each(lhs: &[[Simd<f32>; 4]], rhs: &[[Simd<f32>; 4]], out: &mut [Simd<f32>]) {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "dot product operands differ in length"
    );
    assert_eq!(
        out.len(),
        lhs.len(),
        "output must hold one vector per group"
    );
    for ((l, r), o) in lhs.iter().zip(rhs).zip(out) {
        *o = simd_dot4(l, r);
    }
}
