//! Growable array that allocates through an [`Allocator`] handle.

use std::alloc::handle_alloc_error;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use super::Allocator;

/// Growable array of plain values allocated through an [`Allocator`].
///
/// `AllocVec` is intentionally not `Clone`: duplicating one is an explicit
/// [`copy`](Self::copy) or [`copy_with`](Self::copy_with), so every deep
/// copy (and the allocator it lands in) is visible at the call site.
pub struct AllocVec<T: Copy> {
    ptr: NonNull<T>,
    len: usize,
    capacity: usize,
    allocator: Allocator,
}

// SAFETY: AllocVec owns its elements like Vec<T>, and the allocator handle
// is Send + Sync.
unsafe impl<T: Copy + Send> Send for AllocVec<T> {}
unsafe impl<T: Copy + Sync> Sync for AllocVec<T> {}

impl<T: Copy> AllocVec<T> {
    const MIN_CAPACITY: usize = if size_of::<T>() == 1 { 8 } else { 4 };

    /// Create an empty vector on the global heap.
    pub fn new() -> Self {
        Self::new_in(Allocator::default())
    }

    /// Create an empty vector that will allocate from `allocator`.
    pub fn new_in(allocator: Allocator) -> Self {
        assert!(
            size_of::<T>() != 0,
            "AllocVec does not support zero-sized types"
        );
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            capacity: 0,
            allocator,
        }
    }

    pub fn with_capacity_in(capacity: usize, allocator: Allocator) -> Self {
        let mut vec = Self::new_in(allocator);
        vec.reserve(capacity);
        vec
    }

    pub fn from_slice_in(values: &[T], allocator: Allocator) -> Self {
        let mut vec = Self::with_capacity_in(values.len(), allocator);
        vec.extend_from_slice(values);
        vec
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The allocator this vector draws from.
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` elements are initialized; ptr is dangling
        // but aligned when len == 0.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: see `as_slice`.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Ensure room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        let required = match self.len.checked_add(additional) {
            Some(required) => required,
            None => panic!("AllocVec capacity overflow"),
        };
        if required > self.capacity {
            let grown = self.capacity.saturating_mul(2).max(Self::MIN_CAPACITY);
            self.grow_to(required.max(grown));
        }
    }

    fn grow_to(&mut self, capacity: usize) {
        let new_ptr = match self.allocator.allocate_array::<T>(capacity) {
            Ok(ptr) => ptr,
            Err(err) => handle_alloc_error(err.layout()),
        };
        if self.capacity != 0 {
            // SAFETY: both blocks hold at least `len` elements and do not overlap;
            // the old block came from this allocator with `capacity` elements.
            unsafe {
                std::ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len);
                self.allocator.deallocate_array(self.ptr, self.capacity);
            }
        }
        self.ptr = new_ptr;
        self.capacity = capacity;
    }

    pub fn push(&mut self, value: T) {
        self.reserve(1);
        // SAFETY: reserve guarantees len < capacity.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.reserve(values.len());
        // SAFETY: reserve guarantees room; `values` cannot alias our storage
        // because we hold `&mut self`.
        unsafe {
            std::ptr::copy_nonoverlapping(
                values.as_ptr(),
                self.ptr.as_ptr().add(self.len),
                values.len(),
            );
        }
        self.len += values.len();
    }

    /// Drop all elements, keeping the allocation.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Deep copy using this vector's allocator.
    pub fn copy(&self) -> Self {
        self.copy_with(self.allocator.clone())
    }

    /// Deep copy into storage drawn from `allocator`.
    pub fn copy_with(&self, allocator: Allocator) -> Self {
        Self::from_slice_in(self.as_slice(), allocator)
    }
}

impl<T: Copy> Drop for AllocVec<T> {
    fn drop(&mut self) {
        if self.capacity != 0 {
            // SAFETY: ptr was allocated by this allocator with `capacity` elements.
            unsafe { self.allocator.deallocate_array(self.ptr, self.capacity) };
        }
    }
}

impl<T: Copy> Default for AllocVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Deref for AllocVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy> DerefMut for AllocVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy + PartialEq> PartialEq for AllocVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Copy + Eq> Eq for AllocVec<T> {}

impl<T: Copy + fmt::Debug> fmt::Debug for AllocVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Copy> From<&[T]> for AllocVec<T> {
    fn from(values: &[T]) -> Self {
        Self::from_slice_in(values, Allocator::default())
    }
}

impl<T: Copy> From<Vec<T>> for AllocVec<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from(values.as_slice())
    }
}

impl<T: Copy> Extend<T> for AllocVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Copy> FromIterator<T> for AllocVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}
