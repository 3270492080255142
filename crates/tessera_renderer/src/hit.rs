//! Intersection results and the `Intersect` capability.

use crate::Ray;
use tessera_math::{Interval, Vec2, Vec3};

/// Distance sentinel meaning "no hit".
pub const DMAX: f32 = f32::INFINITY;

/// Distances a hit must fall strictly inside to count.
const VALID_DISTANCE: Interval = Interval::new(0.0, DMAX);

/// Record of a ray-primitive intersection.
///
/// A record whose `distance` is still `DMAX` (or is not positive) means the
/// ray missed; the other fields are then meaningless. Check [`is_hit`]
/// before reading them.
///
/// [`is_hit`]: HitRecord::is_hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub position: Vec3,
    /// Geometric normal. Unit length for spheres, unnormalized for triangles.
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub distance: f32,
    /// Index into the scene's material table
    pub material_index: usize,
    /// Index of the primitive within the scene, set by `Scene::ray_query`
    pub primitive_index: usize,
    /// Barycentric (triangle) or spherical (sphere) coordinates
    pub uv: Vec2,
    /// Whether the ray arrived against the geometric normal
    pub front_facing: bool,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self::miss()
    }
}

impl HitRecord {
    /// A record that reports no intersection.
    pub fn miss() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            distance: DMAX,
            material_index: 0,
            primitive_index: 0,
            uv: Vec2::ZERO,
            front_facing: false,
        }
    }

    /// True if this record describes an intersection in front of the ray.
    #[inline]
    pub fn is_hit(&self) -> bool {
        VALID_DISTANCE.surrounds(self.distance)
    }

    /// Unit normal on the side the ray arrived from.
    pub fn facing_normal(&self) -> Vec3 {
        let n = self.normal.normalize();
        if self.front_facing {
            n
        } else {
            -n
        }
    }
}

/// Trait for geometry that can be tested against a ray.
pub trait Intersect: Send + Sync {
    /// Intersect the ray with this object.
    ///
    /// Misses are reported through the distance sentinel, never an error.
    fn intersect(&self, ray: &Ray) -> HitRecord;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_is_not_hit() {
        assert!(!HitRecord::miss().is_hit());
        assert_eq!(HitRecord::default().distance, DMAX);
    }

    #[test]
    fn test_non_positive_distance_is_not_hit() {
        let mut rec = HitRecord::miss();
        rec.distance = 0.0;
        assert!(!rec.is_hit());
        rec.distance = -2.0;
        assert!(!rec.is_hit());
        rec.distance = f32::NAN;
        assert!(!rec.is_hit());
        rec.distance = 3.0;
        assert!(rec.is_hit());
    }

    #[test]
    fn test_facing_normal() {
        let mut rec = HitRecord::miss();
        rec.normal = Vec3::new(0.0, 0.0, 2.0);
        rec.front_facing = true;
        assert_eq!(rec.facing_normal(), Vec3::Z);
        rec.front_facing = false;
        assert_eq!(rec.facing_normal(), -Vec3::Z);
    }
}
