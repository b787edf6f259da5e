//! # Ember Engine Core
//!
//! Core crate for the Ember engine basic utilities:
//!
//! - [`simd`] - Portable four-lane SIMD vectors over NEON, SSE or scalar code
//! - [`memory`] - Allocator handles, explicitly-copyable vectors and packed byte buffers
//! - [`geometry`] - Axis-aligned bounding boxes
//! - [`color`] - Linear RGBA colors
//! - [`math`] - nalgebra type aliases

pub mod color;
pub mod geometry;
pub mod math;
pub mod memory;
pub mod simd;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the core version and the SIMD back-end selected at build time.
pub fn init() {
    log::info!(
        "Ember Core v{} initialized (simd backend: {})",
        VERSION,
        simd::SIMD_BACKEND
    );
}
