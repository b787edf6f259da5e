//! Axis-aligned bounding volumes.

use crate::math::{Point3, Vec3, point3_almost_equal, point3_max, point3_min};

/// An axis-aligned box described by its lower and upper corners.
///
/// The default box is degenerate and sits at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisAlignedBox {
    lower: Point3,
    upper: Point3,
}

impl AxisAlignedBox {
    /// Create a box from ordered corners.
    ///
    /// `lower` must not exceed `upper` on any axis.
    pub fn new(lower: Point3, upper: Point3) -> Self {
        debug_assert!(
            lower.x <= upper.x && lower.y <= upper.y && lower.z <= upper.z,
            "lower corner {lower:?} exceeds upper corner {upper:?}"
        );
        Self { lower, upper }
    }

    /// Create the smallest box containing two arbitrary points.
    pub fn from_points(a: Point3, b: Point3) -> Self {
        Self {
            lower: point3_min(&a, &b),
            upper: point3_max(&a, &b),
        }
    }

    /// Create a degenerate box around a single point.
    pub fn from_point(p: Point3) -> Self {
        Self { lower: p, upper: p }
    }

    /// Create a box from its lower corner and non-negative extent.
    pub fn from_point_and_size(lower: Point3, size: Vec3) -> Self {
        Self::new(lower, lower + size)
    }

    pub fn lower(&self) -> Point3 {
        self.lower
    }

    pub fn upper(&self) -> Point3 {
        self.upper
    }

    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.lower, &self.upper)
    }

    pub fn size(&self) -> Vec3 {
        self.upper - self.lower
    }

    /// Grow the box so that it contains `p`.
    pub fn expand_to_include(&mut self, p: &Point3) {
        self.lower = point3_min(&self.lower, p);
        self.upper = point3_max(&self.upper, p);
    }

    /// Returns `true` if `p` lies inside or on the boundary.
    pub fn contains(&self, p: &Point3) -> bool {
        self.contains_with_tolerance(p, 0.0)
    }

    pub fn contains_with_tolerance(&self, p: &Point3, tolerance: f32) -> bool {
        (0..3).all(|i| p[i] >= self.lower[i] - tolerance && p[i] <= self.upper[i] + tolerance)
    }

    /// Returns `true` if the two boxes overlap or touch.
    pub fn intersects(&self, other: &AxisAlignedBox) -> bool {
        (0..3).all(|i| self.lower[i] <= other.upper[i] && other.lower[i] <= self.upper[i])
    }

    /// Returns `true` if `other` lies entirely inside this box.
    pub fn encloses(&self, other: &AxisAlignedBox) -> bool {
        self.contains(&other.lower) && self.contains(&other.upper)
    }

    /// Outward face normals in `-x, +x, -y, +y, -z, +z` order.
    pub fn normals() -> [Vec3; 6] {
        [
            -Vec3::x(),
            Vec3::x(),
            -Vec3::y(),
            Vec3::y(),
            -Vec3::z(),
            Vec3::z(),
        ]
    }

    pub fn almost_equal(&self, other: &AxisAlignedBox, epsilon: f32) -> bool {
        point3_almost_equal(&self.lower, &other.lower, epsilon)
            && point3_almost_equal(&self.upper, &other.upper, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> AxisAlignedBox {
        AxisAlignedBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn from_points_orders_corners() {
        let (p, q) = (Point3::new(1.0, -2.0, 3.0), Point3::new(-1.0, 2.0, 0.0));
        let b = AxisAlignedBox::from_points(p, q);
        assert_eq!(b.lower(), Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.upper(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn center_and_size() {
        let size = Vec3::new(2.0, 4.0, 6.0);
        let b = AxisAlignedBox::from_point_and_size(Point3::new(1.0, 2.0, 3.0), size);
        assert_eq!(b.center(), Point3::new(2.0, 4.0, 6.0));
        assert_eq!(b.size(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn expand_grows_box() {
        let mut b = AxisAlignedBox::from_point(Point3::origin());
        b.expand_to_include(&Point3::new(2.0, -1.0, 0.5));
        b.expand_to_include(&Point3::new(-3.0, 0.0, 0.0));
        assert_eq!(b.lower(), Point3::new(-3.0, -1.0, 0.0));
        assert_eq!(b.upper(), Point3::new(2.0, 0.0, 0.5));
    }

    #[test]
    fn containment() {
        let b = unit_box();
        assert!(b.contains(&Point3::new(1.0, 0.0, -1.0)));
        assert!(!b.contains(&Point3::new(1.01, 0.0, 0.0)));
        assert!(b.contains_with_tolerance(&Point3::new(1.01, 0.0, 0.0), 0.02));
    }

    #[test]
    fn intersection_and_enclosure() {
        let b = unit_box();
        let inner = AxisAlignedBox::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5));
        let touching = AxisAlignedBox::new(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0));
        let apart = AxisAlignedBox::new(Point3::new(3.0, 3.0, 3.0), Point3::new(4.0, 4.0, 4.0));
        assert!(b.encloses(&inner));
        assert!(!inner.encloses(&b));
        assert!(b.intersects(&touching));
        assert!(!b.intersects(&apart));
    }

    #[test]
    fn normals_point_outward() {
        let normals = AxisAlignedBox::normals();
        assert_eq!(normals[0], Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(normals[5], Vec3::new(0.0, 0.0, 1.0));
    }
}
