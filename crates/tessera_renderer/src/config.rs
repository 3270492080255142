//! Render configuration.

use crate::error::ConfigError;
use crate::tile::TileOrder;
use crate::tonemap::{DEFAULT_EXPOSURE, DEFAULT_GAMMA};
use crate::Color;
use std::time::Duration;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 8;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce count per path
    pub max_bounces: u32,
    /// Edge length of the square tiles handed to workers
    pub tile_size: u32,
    /// Worker threads (the progress reporter runs on one more)
    pub threads: usize,
    /// Camera field of view scalar; the forward axis is weighted by 1/fov
    pub fov: f32,
    /// Display gamma
    pub gamma: f32,
    /// Exposure applied before tone mapping
    pub exposure: f32,
    /// Radiance picked up by rays that escape the scene
    pub background: Color,
    /// Use a sky gradient instead of the solid background
    pub use_sky_gradient: bool,
    /// Terminate paths early with Russian roulette
    pub russian_roulette: bool,
    /// Order in which tiles are handed out
    pub tile_order: TileOrder,
    /// Fixed seed for reproducible worker streams; entropy when `None`
    pub seed: Option<u64>,
    /// How often the progress reporter polls
    pub report_interval: Duration,
    /// Print the progress bar to stdout
    pub show_progress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            samples_per_pixel: 420,
            max_bounces: 69,
            tile_size: DEFAULT_TILE_SIZE,
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            fov: 0.69420,
            gamma: DEFAULT_GAMMA,
            exposure: DEFAULT_EXPOSURE,
            background: Color::ZERO,
            use_sky_gradient: false,
            russian_roulette: true,
            tile_order: TileOrder::Scanline,
            seed: None,
            report_interval: Duration::from_millis(618),
            show_progress: true,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_bounces: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_bounces = max_bounces;
        self
    }

    /// Set tile size and worker count.
    pub fn with_tiling(mut self, tile_size: u32, threads: usize) -> Self {
        self.tile_size = tile_size;
        self.threads = threads;
        self
    }

    /// Use a fixed seed for the worker random streams.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Silence the progress bar.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Check every setting the renderer divides by or loops over.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("width", self.width as usize),
            ("height", self.height as usize),
            ("samples_per_pixel", self.samples_per_pixel as usize),
            ("max_bounces", self.max_bounces as usize),
            ("tile_size", self.tile_size as usize),
            ("threads", self.threads),
        ];
        if let Some((name, _)) = counts.into_iter().find(|&(_, value)| value == 0) {
            return Err(ConfigError::Zero(name));
        }

        let scalars = [
            ("fov", self.fov),
            ("gamma", self.gamma),
            ("exposure", self.exposure),
        ];
        for (name, value) in scalars {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tile_size, 8);
        assert!(config.threads >= 1);
    }

    #[test]
    fn test_zero_fields_rejected() {
        let config = RenderConfig::default().with_resolution(0, 10);
        assert_eq!(config.validate(), Err(ConfigError::Zero("width")));

        let config = RenderConfig::default().with_tiling(8, 0);
        assert_eq!(config.validate(), Err(ConfigError::Zero("threads")));

        let config = RenderConfig::default().with_tiling(0, 2);
        assert_eq!(config.validate(), Err(ConfigError::Zero("tile_size")));

        let config = RenderConfig::default().with_quality(0, 4);
        assert_eq!(config.validate(), Err(ConfigError::Zero("samples_per_pixel")));
    }

    #[test]
    fn test_bad_scalars_rejected() {
        let config = RenderConfig {
            gamma: 0.0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "gamma", .. })
        ));

        let config = RenderConfig {
            fov: f32::NAN,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "fov", .. })
        ));
    }
}
