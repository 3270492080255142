//! Sphere primitive for ray tracing.

use crate::{
    hit::{HitRecord, Intersect},
    Ray,
};
use std::f32::consts::PI;
use tessera_math::{Vec2, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material_index: usize,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material_index: usize) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material_index,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material_index(&self) -> usize {
        self.material_index
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Intersect for Sphere {
    /// Solves `|o + t·d - c|² = r²` for a unit-length `d`.
    ///
    /// The nearest strictly positive root wins, so a ray starting inside
    /// the sphere reports where it exits.
    fn intersect(&self, ray: &Ray) -> HitRecord {
        let mut rec = HitRecord::miss();

        let disp = ray.origin - self.center;
        let b = ray.direction.dot(disp);
        let c = disp.dot(disp) - self.radius * self.radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return rec;
        }

        let sqrtd = discriminant.sqrt();
        let near = -b - sqrtd;
        let far = -b + sqrtd;

        let distance = if near > 0.0 {
            near
        } else if far > 0.0 {
            far
        } else {
            return rec;
        };

        rec.distance = distance;
        rec.position = ray.at(distance);
        rec.normal = (rec.position - self.center).normalize();
        rec.front_facing = rec.normal.dot(ray.direction) < 0.0;
        rec.uv = Self::sphere_uv(rec.normal);
        rec.material_index = self.material_index;

        rec
    }
}
