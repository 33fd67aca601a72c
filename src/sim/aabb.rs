//! Axis-aligned bounding boxes
//!
//! Every collider in the arena is an AABB derived from a center and a size:
//! - min = center - size / 2
//! - max = center + size / 2
//!
//! Intervals are closed, so boxes that share a face count as intersecting.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all(), "aabb min must not exceed max");
        Self { min, max }
    }

    /// Build a box from its center and full extents
    #[inline]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        debug_assert!(size.cmpge(Vec3::ZERO).all(), "negative aabb size");
        let half = size.abs() / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Overlap on all three axes (touching counts)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Closest point on (or in) the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    /// Sphere test: distance from the sphere center to the closest box point <= radius
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = self.closest_point(center);
        (closest - center).length_squared() <= radius * radius
    }

    /// Whether the closed intervals on a single axis overlap
    #[inline]
    pub fn overlaps_axis(&self, other: &Aabb, axis: usize) -> bool {
        self.min[axis] <= other.max[axis] && self.max[axis] >= other.min[axis]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_size() {
        let b = Aabb::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_separated_boxes_miss() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::new(0.0, 0.0, 1.01), Vec3::ONE);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_sphere_hits_face_and_misses_corner() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        // Touching the +X face
        assert!(b.intersects_sphere(Vec3::new(1.5, 0.0, 0.0), 0.5));
        // Diagonal from the corner: distance sqrt(3)*0.5 ~ 0.866 > 0.8
        assert!(!b.intersects_sphere(Vec3::splat(1.5), 0.8));
        // Center inside the box
        assert!(b.intersects_sphere(Vec3::ZERO, 0.1));
    }
}
