//! Math type aliases and helper functions.
//!
//! All rendering math is `f32`. Points and vectors are kept as distinct
//! nalgebra types so that positions and directions do not mix silently.

pub use nalgebra;

// ===== Vectors =====

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

// ===== Points =====

/// 2D point (f32).
pub type Point2 = nalgebra::Point2<f32>;

/// 3D point (f32).
pub type Point3 = nalgebra::Point3<f32>;

/// 4D point (f32).
pub type Point4 = nalgebra::Point4<f32>;

// ===== Helper functions =====

/// Component-wise minimum of two 3D points.
pub fn point3_min(a: &Point3, b: &Point3) -> Point3 {
    Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

/// Component-wise maximum of two 3D points.
pub fn point3_max(a: &Point3, b: &Point3) -> Point3 {
    Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// Lift a 2D point onto the `z = 0` plane.
pub fn point2_to_point3(p: &Point2) -> Point3 {
    Point3::new(p.x, p.y, 0.0)
}

/// Returns `true` if every component of `a` and `b` differs by at most `epsilon`.
pub fn point3_almost_equal(a: &Point3, b: &Point3, epsilon: f32) -> bool {
    (a - b).iter().all(|d| d.abs() <= epsilon)
}
