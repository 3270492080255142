//! Surface materials and how a path responds to them.

use crate::sampling::cosine_hemisphere;
use crate::HitRecord;
use rand::RngCore;
use tessera_math::{reflect, Vec3};

/// Color type alias (linear RGB, unbounded)
pub type Color = Vec3;

/// How light interacts with a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Light source with the same emission on both faces. Emits, then
    /// bounces diffusely without darkening the path.
    Emissive(Color),
    /// Light source that emits `brightness * (u, v, 1 - u - v)` on its front
    /// face and `back` on its back face. Bounces like `Emissive`.
    BarycentricEmissive { brightness: f32, back: Color },
    /// Lambertian reflector with the given albedo.
    Diffuse(Color),
    /// Perfect mirror, tinted.
    Mirror(Color),
    /// Lets the path through unchanged apart from attenuation.
    PassThrough(Color),
}

/// Result of a path meeting a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    /// Radiance emitted toward the incoming ray
    pub emitted: Color,
    /// Multiplier applied to the path throughput
    pub attenuation: Color,
    /// Outgoing direction
    pub direction: Vec3,
}

impl Interaction {
    fn scattered(attenuation: Color, direction: Vec3) -> Self {
        Self {
            emitted: Color::ZERO,
            attenuation,
            direction,
        }
    }

    fn emitting(emitted: Color, hit: &HitRecord, rng: &mut dyn RngCore) -> Self {
        Self {
            emitted,
            attenuation: Color::ONE,
            direction: cosine_hemisphere(hit.facing_normal(), rng),
        }
    }
}

impl Material {
    /// Decide what happens to a path arriving along `incoming` at `hit`.
    ///
    /// `incoming` must be unit length.
    pub fn interact(&self, incoming: Vec3, hit: &HitRecord, rng: &mut dyn RngCore) -> Interaction {
        match *self {
            Material::Emissive(emit) => Interaction::emitting(emit, hit, rng),
            Material::BarycentricEmissive { brightness, back } => {
                let emit = if hit.front_facing {
                    brightness * Color::new(hit.uv.x, hit.uv.y, 1.0 - hit.uv.x - hit.uv.y)
                } else {
                    back
                };
                Interaction::emitting(emit, hit, rng)
            }
            Material::Diffuse(albedo) => {
                let direction = cosine_hemisphere(hit.facing_normal(), rng);
                Interaction::scattered(albedo, direction)
            }
            Material::Mirror(tint) => {
                let direction = reflect(incoming, hit.facing_normal());
                Interaction::scattered(tint, direction)
            }
            Material::PassThrough(attenuation) => Interaction::scattered(attenuation, incoming),
        }
    }
}

/// Cosine color palette (after Inigo Quilez) with the default rainbow weights.
pub fn palette(t: f32) -> Color {
    let a = Vec3::splat(0.5);
    let b = Vec3::splat(0.5);
    let c = Vec3::ONE;
    let d = Vec3::new(0.0, 0.33, 0.67);

    let phase = (c * t + d) * 2.0 * std::f32::consts::PI;
    a + b * Vec3::new(phase.x.cos(), phase.y.cos(), phase.z.cos())
}
