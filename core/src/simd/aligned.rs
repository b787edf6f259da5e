//! Fixed-size arrays with a declared alignment.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Alignment required by aligned SIMD loads and stores, in bytes.
pub const SIMD_ALIGNMENT: usize = 16;

mod sealed {
    pub trait Sealed {}
}

/// Zero-sized marker carrying an alignment.
pub trait Alignment: sealed::Sealed + Copy + Default + fmt::Debug {
    const BYTES: usize;
}

macro_rules! alignment_marker {
    ($name:ident, $bytes:literal) => {
        #[doc = concat!("Marker for ", stringify!($bytes), "-byte alignment.")]
        #[repr(align($bytes))]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl Alignment for $name {
            const BYTES: usize = $bytes;
        }
    };
}

alignment_marker!(Align4, 4);
alignment_marker!(Align8, 8);
alignment_marker!(Align16, 16);
alignment_marker!(Align32, 32);
alignment_marker!(Align64, 64);

/// `[T; N]` aligned to at least `A` (and always to `T`'s own alignment).
#[repr(C)]
#[derive(Clone, Copy, PartialEq)]
pub struct AlignedArray<T, const N: usize, A: Alignment = Align16> {
    _align: [A; 0],
    data: [T; N],
}

/// Array aligned for SIMD loads and stores.
pub type SimdAlignedArray<T, const N: usize> = AlignedArray<T, N, Align16>;

impl<T, const N: usize, A: Alignment> AlignedArray<T, N, A> {
    pub const fn new(data: [T; N]) -> Self {
        Self { _align: [], data }
    }

    pub fn into_inner(self) -> [T; N] {
        self.data
    }

    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }
}

impl<T: Copy, const N: usize, A: Alignment> AlignedArray<T, N, A> {
    /// Every element set to `value`.
    pub const fn splat(value: T) -> Self {
        Self::new([value; N])
    }
}

impl<T, const N: usize, A: Alignment> Deref for AlignedArray<T, N, A> {
    type Target = [T; N];

    fn deref(&self) -> &[T; N] {
        &self.data
    }
}

impl<T, const N: usize, A: Alignment> DerefMut for AlignedArray<T, N, A> {
    fn deref_mut(&mut self) -> &mut [T; N] {
        &mut self.data
    }
}

impl<T, const N: usize, A: Alignment> From<[T; N]> for AlignedArray<T, N, A> {
    fn from(data: [T; N]) -> Self {
        Self::new(data)
    }
}

impl<T: fmt::Debug, const N: usize, A: Alignment> fmt::Debug for AlignedArray<T, N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_is_at_least_marker() {
        assert_eq!(align_of::<AlignedArray<u8, 3, Align16>>(), 16);
        assert_eq!(align_of::<AlignedArray<u8, 3, Align64>>(), 64);
        assert_eq!(align_of::<SimdAlignedArray<f32, 4>>(), SIMD_ALIGNMENT);
    }

    #[test]
    fn alignment_never_drops_below_element() {
        let align = align_of::<AlignedArray<u64, 2, Align4>>();
        assert_eq!(align, align_of::<u64>());
    }

    #[test]
    fn size_is_padded_to_alignment() {
        assert_eq!(size_of::<SimdAlignedArray<f32, 4>>(), 16);
        assert_eq!(size_of::<AlignedArray<u8, 3, Align8>>(), 8);
    }

    #[test]
    fn deref_exposes_elements() {
        let mut a = SimdAlignedArray::new([1, 2, 3, 4]);
        a[2] = 9;
        assert_eq!(*a, [1, 2, 9, 4]);
        assert_eq!(a.as_ptr() as usize % SIMD_ALIGNMENT, 0);
    }

    #[test]
    fn splat_fills() {
        let a = AlignedArray::<f32, 16, Align32>::splat(0.5);
        assert!(a.iter().all(|&x| x == 0.5));
    }
}
