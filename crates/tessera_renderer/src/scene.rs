//! Scene container: primitives plus the material table they index into.

use crate::material::palette;
use crate::sampling::{gen_f32, random_centered};
use crate::{Color, HitRecord, Intersect, Material, Primitive, Ray, Sphere, Triangle};
use rand::RngCore;
use std::f32::consts::PI;
use tessera_math::{Interval, Vec3};

/// Spacing of palette lookups between consecutive primitives.
const PALETTE_SCALAR: f32 = 16.18;
/// Emission multiplier for the light-emitting ribbons.
const BRIGHTNESS_SCALAR: f32 = 16.18;

/// An ordered collection of primitives and their materials.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    materials: Vec<Material>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive. Its position in the list decides ties in `ray_query`.
    pub fn add(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }

    /// Add a material and return its index for use by primitives.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Look up a material by index.
    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Remove all primitives and materials.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.materials.clear();
    }

    /// Find the nearest intersection along the ray.
    ///
    /// Linear scan; on equal distances the earlier primitive wins. Returns a
    /// miss record (`distance == DMAX`) when nothing is hit.
    pub fn ray_query(&self, ray: &Ray) -> HitRecord {
        let mut nearest = HitRecord::miss();

        for (index, primitive) in self.primitives.iter().enumerate() {
            let candidate = primitive.intersect(ray);
            if Interval::new(0.0, nearest.distance).surrounds(candidate.distance) {
                nearest = candidate;
                nearest.primitive_index = index;
            }
        }

        nearest
    }

    /// Fill the scene with the procedural ribbon-and-spheres layout.
    ///
    /// Adds `count` triangles and `count` spheres. Roughly one triangle in ten
    /// emits light (barycentric colors in front, a palette color behind); the
    /// rest pass light through. Spheres are diffuse (about 40%) or mirrors.
    pub fn populate(&mut self, count: usize, rng: &mut dyn RngCore) {
        let mirror = self.add_material(Material::Mirror(Color::splat(0.89)));
        let clear = self.add_material(Material::PassThrough(Color::splat(0.999)));

        for i in 0..count {
            let y = ((i as f32 / count as f32) - 0.5) * 2.0;
            let p0 = Vec3::new((y * 6.5).cos(), (y * 14.0).sin(), y * PI);
            let p1 = Vec3::new((y * 9.7).cos() + 0.1, (y * 16.4).sin() + 0.7, y);
            let p2 = Vec3::new(
                (y * 15.8).cos() - 0.3,
                (y * 19.2).sin() + 0.1,
                y + 0.3 * gen_f32(rng),
            ) + random_centered(rng) * 0.04;

            let p2 = if gen_f32(rng) < 0.1 { random_centered(rng) } else { p2 };
            let triangle_material = if gen_f32(rng) < 0.1 {
                let index = self.primitives.len();
                self.add_material(Material::BarycentricEmissive {
                    brightness: BRIGHTNESS_SCALAR,
                    back: palette(index as f32 * PALETTE_SCALAR) * BRIGHTNESS_SCALAR,
                })
            } else {
                clear
            };
            self.add(Triangle::new(p0, p1, p2, triangle_material));

            let center = random_centered(rng);
            let radius = 0.4 * gen_f32(rng);
            let sphere_material = if gen_f32(rng) < 0.4 {
                let index = self.primitives.len();
                self.add_material(Material::Diffuse(palette(index as f32 * PALETTE_SCALAR)))
            } else {
                mirror
            };
            self.add(Sphere::new(center, radius, sphere_material));
        }

        log::debug!(
            "Populated scene with {} primitives and {} materials",
            self.primitives.len(),
            self.materials.len()
        );
    }
}
