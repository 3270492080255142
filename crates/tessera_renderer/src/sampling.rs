//! Random sampling helpers shared by the camera, materials and scene builder.

use rand::{Rng, RngCore};
use std::f32::consts::PI;
use tessera_math::Vec3;

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let z = gen_f32(rng) * 2.0 - 1.0;
    let a = gen_f32(rng) * 2.0 * PI;
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * a.cos(), r * a.sin(), z)
}

/// Random vector with each component in [-0.5, 0.5).
pub fn random_centered(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng)) - Vec3::splat(0.5)
}

/// Cosine-weighted direction in the hemisphere around the unit normal `n`.
pub fn cosine_hemisphere(n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let direction = n + random_unit_vector(rng);

    // Catch degenerate scatter direction
    if direction.length_squared() < 1e-8 {
        n
    } else {
        direction.normalize()
    }
}
