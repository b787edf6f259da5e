//! Memory management primitives.
//!
//! This module provides:
//! - [`Allocator`] - Clonable handle to a [`MemoryResource`]
//! - [`GlobalResource`] / [`TrackingResource`] - Built-in memory resources
//! - [`AllocVec`] - Explicitly-copyable growable array
//! - [`PackedBuffer`] with its [`PackedBufferWriter`] and [`PackedBufferReader`] views

mod allocator;
mod packed_buffer;
mod vector;

pub use allocator::{AllocError, Allocator, GlobalResource, MemoryResource, TrackingResource};
pub use packed_buffer::{
    PackedBuffer, PackedBufferReader, PackedBufferWriter, Packer, TrivialObjectPacker, UnpackError,
};
pub use vector::AllocVec;
