//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hit::{HitRecord, Intersect},
    Ray,
};
use tessera_math::{Vec2, Vec3};

/// Determinant magnitude below which the ray counts as parallel to the plane.
const PARALLEL_EPSILON: f32 = f32::EPSILON;

/// A triangle primitive.
///
/// Counter-clockwise winding (`p0 -> p1 -> p2`) faces along
/// `cross(p1 - p0, p2 - p0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    points: [Vec3; 3],
    material_index: usize,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, material_index: usize) -> Self {
        Self {
            points: [p0, p1, p2],
            material_index,
        }
    }

    pub fn points(&self) -> [Vec3; 3] {
        self.points
    }

    pub fn material_index(&self) -> usize {
        self.material_index
    }
}

impl Intersect for Triangle {
    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// The reported normal is `cross(edge1, edge2)` and is NOT normalized.
    fn intersect(&self, ray: &Ray) -> HitRecord {
        let mut rec = HitRecord::miss();
        let [p0, p1, p2] = self.points;

        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let pvec = ray.direction.cross(edge2);
        let det = edge1.dot(pvec);

        // Ray is parallel to triangle
        if det.abs() < PARALLEL_EPSILON {
            return rec;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin - p0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return rec;
        }

        let qvec = tvec.cross(edge1);
        let v = ray.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return rec;
        }

        // May be negative for triangles behind the ray; `is_hit` rejects those
        rec.distance = edge2.dot(qvec) * inv_det;
        rec.position = p0 + u * edge1 + v * edge2;
        rec.normal = edge1.cross(edge2);
        rec.front_facing = rec.normal.dot(ray.direction) < 0.0;
        rec.uv = Vec2::new(u, v);
        rec.material_index = self.material_index;

        rec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            1,
        )
    }

    #[test]
    fn test_triangle_hit() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = unit_triangle().intersect(&ray);

        assert!(rec.is_hit());
        assert!((rec.distance - 1.0).abs() < 1e-6);
        assert!(rec.uv.x >= 0.0 && rec.uv.y >= 0.0);
        assert!(rec.uv.x + rec.uv.y <= 1.0);
        assert!((rec.position - Vec3::new(0.25, 0.25, 0.0)).length() < 1e-6);
        assert_eq!(rec.material_index, 1);
    }

    #[test]
    fn test_triangle_miss_outside() {
        let ray = Ray::new(Vec3::new(0.9, 0.9, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!unit_triangle().intersect(&ray).is_hit());
    }

    #[test]
    fn test_triangle_parallel() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::X);
        let rec = unit_triangle().intersect(&ray);
        assert_eq!(rec.distance, crate::DMAX);
    }

    #[test]
    fn test_triangle_behind_ray() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z);
        let rec = unit_triangle().intersect(&ray);
        assert!(rec.distance < 0.0);
        assert!(!rec.is_hit());
    }

    #[test]
    fn test_triangle_normal_unnormalized() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            0,
        );
        let ray = Ray::new(Vec3::new(0.5, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = tri.intersect(&ray);

        assert!(rec.is_hit());
        assert_eq!(rec.normal, Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_triangle_facing() {
        let tri = unit_triangle();
        let from_front = Ray::new(Vec3::new(0.2, 0.2, 1.0), -Vec3::Z);
        let from_back = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::Z);

        assert!(tri.intersect(&from_front).front_facing);
        let back = tri.intersect(&from_back);
        assert!(back.is_hit());
        assert!(!back.front_facing);
    }
}
