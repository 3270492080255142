//! Monte Carlo path tracing integrator.
//!
//! Implements iterative path tracing with:
//! - Bounded bounce count
//! - Russian roulette termination with throughput compensation
//! - Anti-aliasing via jittered multi-sampling

use crate::sampling::gen_f32;
use crate::{Camera, Color, RenderConfig, Ray, Scene};
use rand::RngCore;

/// Offset applied along the normal when spawning the next ray.
pub const SURFACE_EPSILON: f32 = 1e-4;

/// Settings that shape a single path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSettings {
    /// Maximum number of scene queries per path
    pub max_bounces: u32,
    /// Radiance picked up by escaping rays
    pub background: Color,
    /// Use a sky gradient instead of the solid background
    pub use_sky_gradient: bool,
    /// Terminate paths early with Russian roulette
    pub russian_roulette: bool,
}

impl From<&RenderConfig> for TraceSettings {
    fn from(config: &RenderConfig) -> Self {
        Self {
            max_bounces: config.max_bounces,
            background: config.background,
            use_sky_gradient: config.use_sky_gradient,
            russian_roulette: config.russian_roulette,
        }
    }
}

/// Result of tracing one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Radiance carried back to the camera
    pub radiance: Color,
    /// Scene queries issued
    pub rays: u32,
}

/// Averaged estimate for one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    /// Mean radiance over all samples
    pub radiance: Color,
    /// Scene queries issued across all samples
    pub rays: u64,
}

/// Traces paths through a scene as seen by a camera.
pub struct PathTracer<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    settings: TraceSettings,
}

impl<'a> PathTracer<'a> {
    pub fn new(scene: &'a Scene, camera: &'a Camera, settings: TraceSettings) -> Self {
        Self {
            scene,
            camera,
            settings,
        }
    }

    /// Follow one light path starting with `ray`.
    pub fn trace(&self, ray: Ray, rng: &mut dyn RngCore) -> PathSample {
        let mut ray = ray;
        let mut throughput = Color::ONE;
        let mut radiance = Color::ZERO;
        let mut rays = 0;

        for _ in 0..self.settings.max_bounces {
            let hit = self.scene.ray_query(&ray);
            rays += 1;

            if !hit.is_hit() {
                radiance += throughput * self.background(&ray);
                break;
            }

            // Unknown material indices absorb
            let Some(material) = self.scene.material(hit.material_index) else {
                break;
            };

            let interaction = material.interact(ray.direction, &hit, rng);
            radiance += throughput * interaction.emitted;
            throughput *= interaction.attenuation;

            let direction = interaction.direction;

            // Step off the surface on the side the new ray leaves from
            let normal = hit.normal.normalize();
            let side = if direction.dot(normal) >= 0.0 { 1.0 } else { -1.0 };
            ray = Ray::new(hit.position + normal * (side * SURFACE_EPSILON), direction);

            if self.settings.russian_roulette && !russian_roulette(&mut throughput, rng) {
                break;
            }
        }

        PathSample { radiance, rays }
    }

    /// Average `samples` jittered paths through pixel (x, y).
    pub fn render_pixel(&self, x: u32, y: u32, samples: u32, rng: &mut dyn RngCore) -> PixelSample {
        let mut radiance = Color::ZERO;
        let mut rays = 0u64;

        for _ in 0..samples {
            let ray = self.camera.sample_jittered(x, y, rng);
            let sample = self.trace(ray, rng);
            radiance += sample.radiance;
            rays += u64::from(sample.rays);
        }

        PixelSample {
            radiance: radiance / samples.max(1) as f32,
            rays,
        }
    }

    fn background(&self, ray: &Ray) -> Color {
        if self.settings.use_sky_gradient {
            sky_gradient(ray)
        } else {
            self.settings.background
        }
    }
}

/// Survive-or-terminate step of Russian roulette.
///
/// The path survives with probability `p = max(throughput)`; survivors are
/// scaled by `1/p` so the estimator stays unbiased. Returns false when the
/// path should stop.
pub fn russian_roulette(throughput: &mut Color, rng: &mut dyn RngCore) -> bool {
    let p = throughput.max_element();
    if gen_f32(rng) > p || p <= 0.0 {
        return false;
    }
    *throughput /= p;
    true
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::ONE;
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}
