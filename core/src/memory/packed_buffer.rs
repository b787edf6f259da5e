//! Append-only byte buffer with typed writer and reader views.
//!
//! This module provides:
//! - [`PackedBuffer`] - Owning, growable byte sequence
//! - [`PackedBufferWriter`] - Appends raw bytes and packed values
//! - [`PackedBufferReader`] - Reads values back through a cursor
//! - [`Packer`] - Two-way serialization contract for a value type
//! - [`TrivialObjectPacker`] - Packer that copies a value's object representation
//!
//! Values are written in host byte order with no alignment padding, so the
//! byte layout is exactly the concatenation of what was written.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

use bytemuck::Pod;

use super::{AllocVec, Allocator};

/// Error returned when a read runs past the end of a [`PackedBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnpackError {
    #[error("out of bytes: requested {requested}, {available} available")]
    OutOfBytes { requested: usize, available: usize },
}

// ============================================================================
// Buffer
// ============================================================================

/// Owning, growable byte sequence used as a staging area for packed values.
///
/// Copying is explicit through [`copy`](Self::copy) and
/// [`copy_with`](Self::copy_with). Two buffers are equal when their stored
/// bytes are equal; capacity and allocator are ignored.
#[derive(Default, PartialEq, Eq)]
pub struct PackedBuffer {
    bytes: AllocVec<u8>,
}

impl PackedBuffer {
    /// Create an empty buffer on the global heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer that allocates from `allocator`.
    pub fn new_in(allocator: Allocator) -> Self {
        Self {
            bytes: AllocVec::new_in(allocator),
        }
    }

    /// Adopt an existing byte vector.
    pub fn from_vec(bytes: AllocVec<u8>) -> Self {
        Self { bytes }
    }

    /// Ensure `capacity() >= n_bytes`.
    pub fn reserve(&mut self, n_bytes: usize) {
        self.bytes.reserve(n_bytes.saturating_sub(self.bytes.len()));
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Number of bytes stored.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of bytes that fit without reallocating.
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// The stored bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Pointer to the start of the storage.
    pub fn data(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    pub fn allocator(&self) -> &Allocator {
        self.bytes.allocator()
    }

    /// Deep copy using this buffer's allocator.
    pub fn copy(&self) -> Self {
        Self {
            bytes: self.bytes.copy(),
        }
    }

    /// Deep copy into storage drawn from `allocator`.
    pub fn copy_with(&self, allocator: Allocator) -> Self {
        Self {
            bytes: self.bytes.copy_with(allocator),
        }
    }

    /// Give up the buffer and return its bytes.
    pub fn into_vec(self) -> AllocVec<u8> {
        self.bytes
    }

    pub fn writer(&mut self) -> PackedBufferWriter<'_> {
        PackedBufferWriter::new(self)
    }

    pub fn reader(&self) -> PackedBufferReader<'_> {
        PackedBufferReader::new(self)
    }
}

impl Index<usize> for PackedBuffer {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.bytes[index]
    }
}

impl From<Vec<u8>> for PackedBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes.into())
    }
}

impl fmt::Debug for PackedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedBuffer")
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .field("allocator", self.allocator())
            .finish()
    }
}

static_assertions::assert_impl_all!(PackedBuffer: Send, Sync);
static_assertions::assert_not_impl_any!(PackedBuffer: Clone, Copy);

// ============================================================================
// Packers
// ============================================================================

/// Two-way serialization of `T` through a packed buffer.
///
/// A packer fully controls the bytes it emits. `unpack` must leave the
/// reader's cursor where it found it when it fails;
/// [`PackedBufferReader::rewind_on_error`] does that for multi-read packers.
pub trait Packer<T> {
    fn pack(&self, writer: &mut PackedBufferWriter<'_>, value: &T);

    fn unpack(&self, reader: &mut PackedBufferReader<'_>) -> Result<T, UnpackError>;
}

/// Packs a plain value as its raw object representation.
pub struct TrivialObjectPacker<T>(PhantomData<fn() -> T>);

impl<T> TrivialObjectPacker<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TrivialObjectPacker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TrivialObjectPacker<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TrivialObjectPacker<T> {}

impl<T> fmt::Debug for TrivialObjectPacker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrivialObjectPacker<{}>", std::any::type_name::<T>())
    }
}

impl<T: Pod> Packer<T> for TrivialObjectPacker<T> {
    fn pack(&self, writer: &mut PackedBufferWriter<'_>, value: &T) {
        writer.write_bytes(bytemuck::bytes_of(value));
    }

    fn unpack(&self, reader: &mut PackedBufferReader<'_>) -> Result<T, UnpackError> {
        let size = size_of::<T>();
        let available = reader.remaining();
        if available < size {
            return Err(UnpackError::OutOfBytes {
                requested: size,
                available,
            });
        }
        let start = reader.index();
        let bytes = &reader.buffer.as_bytes()[start..start + size];
        reader.read_index += size;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Appends bytes and packed values to a [`PackedBuffer`].
///
/// The writer holds no cursor: every write appends.
pub struct PackedBufferWriter<'a> {
    buffer: &'a mut PackedBuffer,
}

impl<'a> PackedBufferWriter<'a> {
    pub fn new(buffer: &'a mut PackedBuffer) -> Self {
        Self { buffer }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.push_bytes(bytes);
    }

    /// Append the object representation of `value` (host byte order, no padding).
    pub fn pack_object<T: Pod>(&mut self, value: &T) {
        self.pack_object_with(value, &TrivialObjectPacker::new());
    }

    /// Append `value` using `packer`'s layout.
    pub fn pack_object_with<T, P: Packer<T>>(&mut self, value: &T, packer: &P) {
        packer.pack(self, value);
    }

    /// Append every value of `values`, in iteration order.
    pub fn pack_objects<'v, T: Pod + 'v>(&mut self, values: impl IntoIterator<Item = &'v T>) {
        self.pack_objects_with(values, &TrivialObjectPacker::new());
    }

    pub fn pack_objects_with<'v, T: 'v, P: Packer<T>>(
        &mut self,
        values: impl IntoIterator<Item = &'v T>,
        packer: &P,
    ) {
        for value in values {
            packer.pack(self, value);
        }
    }

    /// Bytes written to the underlying buffer so far.
    pub fn size(&self) -> usize {
        self.buffer.size()
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Reads bytes and packed values from a [`PackedBuffer`] through a cursor.
pub struct PackedBufferReader<'a> {
    buffer: &'a PackedBuffer,
    read_index: usize,
}

impl<'a> PackedBufferReader<'a> {
    pub fn new(buffer: &'a PackedBuffer) -> Self {
        Self {
            buffer,
            read_index: 0,
        }
    }

    /// Copy up to `dst.len()` bytes from the cursor into `dst`.
    ///
    /// Returns the filled prefix of `dst`, which is shorter than `dst` when
    /// the buffer runs out.
    pub fn read_bytes<'d>(&mut self, dst: &'d mut [u8]) -> &'d mut [u8] {
        let count = dst.len().min(self.remaining());
        let start = self.read_index;
        dst[..count].copy_from_slice(&self.buffer.as_bytes()[start..start + count]);
        self.read_index += count;
        &mut dst[..count]
    }

    /// Read a plain value from its object representation.
    ///
    /// The cursor does not move on failure.
    pub fn unpack_object<T: Pod>(&mut self) -> Result<T, UnpackError> {
        self.unpack_object_with(&TrivialObjectPacker::new())
    }

    /// Read a value using `packer`'s layout.
    pub fn unpack_object_with<T, P: Packer<T>>(&mut self, packer: &P) -> Result<T, UnpackError> {
        packer.unpack(self)
    }

    /// Run `f` and restore the cursor if it fails.
    pub fn rewind_on_error<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, UnpackError>,
    ) -> Result<T, UnpackError> {
        let start = self.read_index;
        let result = f(self);
        if result.is_err() {
            self.read_index = start;
        }
        result
    }

    /// Current cursor position.
    pub fn index(&self) -> usize {
        self.read_index
    }

    /// Move the cursor to `index`, which must not exceed the buffer size.
    pub fn seek(&mut self, index: usize) {
        debug_assert!(
            index <= self.buffer.size(),
            "seek to {index} past end of {}-byte buffer",
            self.buffer.size()
        );
        self.read_index = index.min(self.buffer.size());
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.size() - self.read_index
    }
}
