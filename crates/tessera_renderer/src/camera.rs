//! Pinhole camera for ray generation.

use crate::sampling::{gen_f32, random_unit_vector};
use crate::Ray;
use rand::RngCore;
use tessera_math::{Vec2, Vec3};

/// Camera that maps pixel coordinates to world-space rays.
///
/// Basis vectors come from [`Camera::lookat`]; until then the camera sits at
/// the origin looking down +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    // Image settings
    width: u32,
    height: u32,
    /// Distance scale of the forward axis (larger = narrower view)
    fov: f32,

    position: Vec3,
    /// Right
    bx: Vec3,
    /// Up
    by: Vec3,
    /// Forward
    bz: Vec3,
}

impl Camera {
    /// Create a camera for an image of the given size.
    pub fn new(width: u32, height: u32, fov: f32) -> Self {
        Self {
            width,
            height,
            fov,
            position: Vec3::ZERO,
            bx: Vec3::X,
            by: Vec3::Y,
            bz: Vec3::Z,
        }
    }

    /// Place the camera at `from`, looking at `at`.
    ///
    /// `up` must not be parallel to the view direction.
    pub fn lookat(&mut self, from: Vec3, at: Vec3, up: Vec3) {
        self.position = from;
        self.bz = (at - from).normalize();
        self.bx = up.cross(self.bz).normalize();
        self.by = self.bx.cross(self.bz).normalize();
    }

    /// Place the camera at a random point on a shell of radius
    /// `[base_distance, base_distance + 1)` around `target`.
    pub fn orbit(&mut self, target: Vec3, base_distance: f32, rng: &mut dyn RngCore) {
        let from = target + random_unit_vector(rng) * (base_distance + gen_f32(rng));
        self.lookat(from, target, Vec3::Y);
    }

    /// Generate the ray through `pixel`.
    ///
    /// `pixel` is in image coordinates, `[0, width] x [0, height]`, and already
    /// includes any sub-pixel jitter the caller wants.
    pub fn sample(&self, pixel: Vec2) -> Ray {
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;

        // Remap [0, dimension] to [-1, 1]
        let lx = (pixel.x - half_w) / half_w;
        let ly = (pixel.y - half_h) / half_h;
        let aspect_ratio = self.width as f32 / self.height as f32;

        let direction = aspect_ratio * lx * self.bx + ly * self.by + (1.0 / self.fov) * self.bz;
        Ray::new(self.position, direction.normalize())
    }

    /// Generate a ray through a random point of pixel (x, y).
    pub fn sample_jittered(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let jitter = Vec2::new(gen_f32(rng), gen_f32(rng));
        self.sample(Vec2::new(x as f32, y as f32) + jitter)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Basis vectors (right, up, forward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.bx, self.by, self.bz)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
