use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;
use tessera_math::Vec3;
use tessera_renderer::{render, Camera, RenderConfig, Scene, TileOrder};

/// Distance of the randomly placed camera from the scene center, plus up to one.
const ORBIT_DISTANCE: f32 = 2.2;

#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "Tiled CPU path tracer")]
struct Cli {
    /// Output image path (format from extension, PNG expected)
    output: PathBuf,

    #[arg(long, default_value_t = 960)]
    width: u32,

    #[arg(long, default_value_t = 540)]
    height: u32,

    /// Samples per pixel
    #[arg(long, default_value_t = 420)]
    samples: u32,

    /// Maximum bounces per path
    #[arg(long, default_value_t = 69)]
    bounces: u32,

    #[arg(long, default_value_t = tessera_renderer::DEFAULT_TILE_SIZE)]
    tile_size: u32,

    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    #[arg(long, default_value_t = 0.69420)]
    fov: f32,

    #[arg(long, default_value_t = tessera_renderer::DEFAULT_GAMMA)]
    gamma: f32,

    /// Triangles and spheres each in the generated scene
    #[arg(long, default_value_t = 69)]
    primitives: usize,

    /// Seed for the scene, camera and worker random streams
    #[arg(long)]
    seed: Option<u64>,

    /// Hand out tiles from the center outward
    #[arg(long)]
    spiral: bool,

    /// Disable Russian roulette path termination
    #[arg(long)]
    no_roulette: bool,

    /// Light escaping rays with a sky gradient instead of black
    #[arg(long)]
    sky: bool,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,

    /// Camera position as x,y,z; random orbit when omitted
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    eye: Option<Vec3>,
}

impl Cli {
    fn config(&self) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.samples,
            max_bounces: self.bounces,
            tile_size: self.tile_size,
            threads: self.threads.unwrap_or(defaults.threads),
            fov: self.fov,
            gamma: self.gamma,
            use_sky_gradient: self.sky,
            russian_roulette: !self.no_roulette,
            tile_order: if self.spiral {
                TileOrder::Spiral
            } else {
                TileOrder::Scanline
            },
            seed: self.seed,
            show_progress: !self.quiet,
            ..defaults
        }
    }
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid number in '{}': {}", s, err))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got '{}'", s)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = Instant::now();
    let cli = Cli::parse();
    let config = cli.config();
    config.validate().context("Invalid render settings")?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut scene = Scene::new();
    scene.populate(cli.primitives, &mut rng);

    let mut camera = Camera::new(config.width, config.height, config.fov);
    match cli.eye {
        Some(eye) => camera.lookat(eye, Vec3::ZERO, Vec3::Y),
        None => camera.orbit(Vec3::ZERO, ORBIT_DISTANCE, &mut rng),
    }
    log::info!("Camera at {:?}", camera.position());

    let output = render(&scene, &camera, &config).context("Render failed")?;
    output
        .save(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!(
        "{} - {:.3} seconds",
        cli.output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
