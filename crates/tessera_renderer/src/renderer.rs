//! Tiled multi-threaded renderer.
//!
//! A fixed pool of worker threads races for tiles through a shared atomic
//! claim counter. Each worker owns its random stream and writes only the
//! pixels of the tiles it claimed; one extra thread draws the progress bar.

use crate::error::Result;
use crate::image_out::write_image;
use crate::integrator::{PathTracer, TraceSettings};
use crate::progress::{report, Progress};
use crate::tile::{TileGrid, TileView, CHANNELS};
use crate::tonemap::{tonemap_gamma, to_rgba8};
use crate::{Camera, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Timing and workload of a finished render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    /// Wall time from pool start to the last join
    pub elapsed: Duration,
    /// Tiles rendered
    pub tiles: usize,
    /// Scene queries issued by all workers
    pub rays: u64,
    /// Camera samples taken (`width * height * samples_per_pixel`)
    pub samples: u64,
}

impl RenderStats {
    pub fn rays_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.rays as f64 / seconds
        } else {
            0.0
        }
    }
}

/// A finished RGBA8 image, rows top to bottom.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub stats: RenderStats,
}

impl RenderOutput {
    /// Encode to `path`; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_image(path, self.width, self.height, CHANNELS as u8, &self.pixels)
    }
}

/// Path trace `scene` through `camera` into an RGBA8 image.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> Result<RenderOutput> {
    if (camera.width(), camera.height()) != (config.width, config.height) {
        log::warn!(
            "Camera is {}x{} but the image is {}x{}",
            camera.width(),
            camera.height(),
            config.width,
            config.height
        );
    }

    log::info!(
        "Rendering {} primitives at {}x{}, {} spp, {} bounces",
        scene.len(),
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_bounces
    );

    let tracer = PathTracer::new(scene, camera, TraceSettings::from(config));
    render_tiles(config, |x, y, rng| {
        let pixel = tracer.render_pixel(x, y, config.samples_per_pixel, rng);
        let display = tonemap_gamma(pixel.radiance, config.exposure, config.gamma);
        (to_rgba8(display), pixel.rays)
    })
}

/// Run `shade` once for every pixel across the worker pool.
///
/// `shade(x, y, rng)` returns the final pixel and the rays it cost. Blocks
/// until every worker and the reporter have finished.
pub fn render_tiles<F>(config: &RenderConfig, shade: F) -> Result<RenderOutput>
where
    F: Fn(u32, u32, &mut dyn RngCore) -> ([u8; 4], u64) + Sync,
{
    config.validate()?;

    let grid = TileGrid::new(config.width, config.height, config.tile_size);
    let mut pixels = vec![0u8; config.width as usize * config.height as usize * CHANNELS];

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads + 1)
        .thread_name(|index| format!("tessera-worker-{}", index))
        .build()?;

    log::info!(
        "{} tiles of {}px on {} threads",
        grid.count(),
        config.tile_size,
        config.threads
    );

    // Slot n holds the view for claim n
    let slots: Vec<Mutex<Option<TileView>>> = grid
        .partition(&mut pixels, config.tile_order)
        .into_iter()
        .map(|view| Mutex::new(Some(view)))
        .collect();

    let progress = Progress::new(grid.count(), config.threads);
    let next_claim = AtomicUsize::new(0);
    let start = Instant::now();

    let mut out: Box<dyn Write + Send> = if config.show_progress {
        Box::new(io::stdout())
    } else {
        Box::new(io::sink())
    };

    {
        let progress = &progress;
        let next_claim = &next_claim;
        let slots = &slots;
        let shade = &shade;

        pool.scope(|s| {
            s.spawn(move |_| {
                if let Err(err) = report(progress, config.report_interval, start, &mut out) {
                    log::warn!("Progress output failed: {}", err);
                }
            });

            for worker in 0..config.threads {
                s.spawn(move |_| {
                    let _guard = progress.worker_guard();
                    let mut rng = match config.seed {
                        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker as u64)),
                        None => StdRng::from_entropy(),
                    };
                    log::debug!("Worker {} started", worker);

                    let mut finished = 0usize;
                    loop {
                        let claim = next_claim.fetch_add(1, Ordering::Relaxed);
                        let Some(slot) = slots.get(claim) else {
                            break;
                        };
                        let taken = slot
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .take();
                        let Some(mut view) = taken else {
                            continue;
                        };

                        let tile = view.tile();
                        let mut rays = 0u64;
                        for ly in 0..tile.height {
                            for lx in 0..tile.width {
                                let (rgba, cost) = shade(tile.x + lx, tile.y + ly, &mut rng);
                                view.put(lx, ly, rgba);
                                rays += cost;
                            }
                        }

                        progress.tile_finished(rays);
                        finished += 1;
                    }

                    log::debug!("Worker {} exiting after {} tiles", worker, finished);
                });
            }
        });
    }

    drop(slots);

    let stats = RenderStats {
        elapsed: start.elapsed(),
        tiles: grid.count(),
        rays: progress.rays(),
        samples: u64::from(config.width)
            * u64::from(config.height)
            * u64::from(config.samples_per_pixel),
    };
    log::info!(
        "Render finished in {:.2?} ({} rays, {:.0} rays/sec)",
        stats.elapsed,
        stats.rays,
        stats.rays_per_second()
    );

    Ok(RenderOutput {
        width: config.width,
        height: config.height,
        pixels,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, RenderError};
    use crate::tile::TileOrder;
    use crate::{Color, Material, Sphere};
    use rand::Rng;
    use std::sync::atomic::AtomicU32;
    use tessera_math::Vec3;

    fn config(width: u32, height: u32, tile_size: u32, threads: usize) -> RenderConfig {
        RenderConfig {
            report_interval: Duration::from_millis(1),
            ..RenderConfig::default()
                .with_resolution(width, height)
                .with_tiling(tile_size, threads)
                .quiet()
        }
    }

    fn count_writes(config: &RenderConfig) -> (RenderOutput, Vec<u32>) {
        let width = config.width as usize;
        let counts: Vec<AtomicU32> = (0..width * config.height as usize)
            .map(|_| AtomicU32::new(0))
            .collect();

        let output = render_tiles(config, |x, y, _rng| {
            counts[y as usize * width + x as usize].fetch_add(1, Ordering::Relaxed);
            ([x as u8, y as u8, 7, 255], 1)
        })
        .unwrap();

        (output, counts.into_iter().map(AtomicU32::into_inner).collect())
    }

    #[test]
    fn test_every_pixel_written_once() {
        let config = config(37, 23, 5, 4);
        let (output, counts) = count_writes(&config);

        assert!(counts.iter().all(|&n| n == 1));
        assert_eq!(output.stats.tiles, 8 * 5);
        assert_eq!(output.stats.rays, 37 * 23);

        for y in 0..23u32 {
            for x in 0..37u32 {
                let offset = (y as usize * 37 + x as usize) * CHANNELS;
                assert_eq!(&output.pixels[offset..offset + 4], &[x as u8, y as u8, 7, 255]);
            }
        }
    }

    #[test]
    fn test_more_workers_than_tiles() {
        let mut config = config(16, 16, 8, 16);
        config.tile_order = TileOrder::Spiral;
        let (output, counts) = count_writes(&config);

        assert!(counts.iter().all(|&n| n == 1));
        assert_eq!(output.stats.tiles, 4);
    }

    #[test]
    fn test_single_worker_claims_in_spiral_order() {
        let mut config = config(24, 24, 8, 1);
        config.tile_order = TileOrder::Spiral;
        let visited = Mutex::new(Vec::new());

        render_tiles(&config, |x, y, _rng| {
            if x % 8 == 0 && y % 8 == 0 {
                visited.lock().unwrap().push((x, y));
            }
            ([0; 4], 0)
        })
        .unwrap();

        let visited = visited.into_inner().unwrap();
        let grid = TileGrid::new(24, 24, 8);
        let expected: Vec<(u32, u32)> = grid
            .claim_order(TileOrder::Spiral)
            .into_iter()
            .map(|index| grid.tile(index))
            .map(|tile| (tile.x, tile.y))
            .collect();
        assert_eq!(visited[0], (8, 8));
        assert_eq!(visited, expected);
    }

    #[test]
    fn test_tile_larger_than_image() {
        let config = config(3, 2, 64, 2);
        let (output, counts) = count_writes(&config);
        assert_eq!(counts, vec![1; 6]);
        assert_eq!(output.pixels.len(), 3 * 2 * 4);
    }

    #[test]
    fn test_seeded_single_worker_is_reproducible() {
        let config = config(12, 9, 4, 1).with_seed(99);
        let shade = |_x: u32, _y: u32, rng: &mut dyn RngCore| {
            let value: u8 = rng.gen();
            ([value, value, value, 255], 0)
        };

        let a = render_tiles(&config, shade).unwrap();
        let b = render_tiles(&config, shade).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = config(0, 8, 8, 2);
        let result = render_tiles(&config, |_, _, _| ([0; 4], 0));
        assert!(matches!(
            result,
            Err(RenderError::Config(ConfigError::Zero("width")))
        ));
    }

    #[test]
    fn test_render_inside_light() {
        // Camera inside an emissive sphere: every bounce lands on the light again
        let emission = Color::new(0.8, 0.4, 0.2);
        let mut scene = Scene::new();
        let light = scene.add_material(Material::Emissive(emission));
        scene.add(Sphere::new(Vec3::ZERO, 50.0, light));

        let mut camera = Camera::new(10, 6, 0.7);
        camera.lookat(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y);

        let config = config(10, 6, 4, 2).with_quality(2, 3).with_seed(1);
        let output = render(&scene, &camera, &config).unwrap();

        let radiance = emission + emission + emission;
        let expected = to_rgba8(tonemap_gamma(radiance, config.exposure, config.gamma));
        for pixel in output.pixels.chunks(4) {
            assert_eq!(pixel, &expected);
        }
        assert_eq!(output.stats.rays, 10 * 6 * 2 * 3);
        assert_eq!(output.stats.samples, 10 * 6 * 2);
    }
}
