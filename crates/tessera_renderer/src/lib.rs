//! Tessera renderer - tiled CPU path tracing
//!
//! A Monte Carlo path tracer over a flat list of spheres and triangles,
//! driven across a fixed worker pool one tile at a time.

mod camera;
mod config;
mod error;
mod hit;
mod image_out;
mod integrator;
mod material;
mod primitive;
mod progress;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod tile;
mod tonemap;
mod triangle;

pub use camera::Camera;
pub use config::{RenderConfig, DEFAULT_TILE_SIZE};
pub use error::{ConfigError, RenderError, Result};
pub use hit::{HitRecord, Intersect, DMAX};
pub use image_out::write_image;
pub use integrator::{
    russian_roulette, PathSample, PathTracer, PixelSample, TraceSettings, SURFACE_EPSILON,
};
pub use material::{palette, Color, Interaction, Material};
pub use primitive::Primitive;
pub use progress::{progress_line, report, summary_line, Progress, WorkerGuard, BAR_STOPS};
pub use renderer::{render, render_tiles, RenderOutput, RenderStats};
pub use sampling::{cosine_hemisphere, gen_f32, random_centered, random_unit_vector};
pub use scene::Scene;
pub use sphere::Sphere;
pub use tile::{Tile, TileGrid, TileOrder, TileView, CHANNELS};
pub use tonemap::{aces, tonemap_gamma, to_rgba8, DEFAULT_EXPOSURE, DEFAULT_GAMMA};
pub use triangle::Triangle;

/// Re-export the math types the renderer API speaks in
pub use tessera_math::{Interval, Ray, Vec2, Vec3};
