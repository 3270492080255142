//! Display transform: exposure, filmic tone curve, gamma, 8-bit quantization.

use crate::Color;
use tessera_math::Interval;

/// Exposure applied before the tone curve.
pub const DEFAULT_EXPOSURE: f32 = 0.6;
/// Display gamma.
pub const DEFAULT_GAMMA: f32 = 2.2;

// ACES filmic fit (Narkowicz)
const A: f32 = 2.51;
const B: f32 = 0.03;
const C: f32 = 2.43;
const D: f32 = 0.59;
const E: f32 = 0.14;

const UNIT: Interval = Interval::new(0.0, 1.0);

/// Filmic curve `x(ax + b) / (x(cx + d) + e)` on one channel.
#[inline]
pub fn aces(x: f32) -> f32 {
    (x * (A * x + B)) / (x * (C * x + D) + E)
}

/// Map linear radiance to display values in [0, 1].
///
/// Non-finite channels come out as 0.
pub fn tonemap_gamma(linear: Color, exposure: f32, gamma: f32) -> Color {
    let inv_gamma = 1.0 / gamma;
    let channel = |x: f32| {
        let mapped = aces(x * exposure);
        if mapped.is_nan() {
            return 0.0;
        }
        UNIT.clamp(mapped).powf(inv_gamma)
    };
    Color::new(channel(linear.x), channel(linear.y), channel(linear.z))
}

/// Convert a display color to 8-bit RGBA with opaque alpha.
pub fn to_rgba8(display: Color) -> [u8; 4] {
    let quantize = |x: f32| (255.0 * UNIT.clamp(x)) as u8;
    [quantize(display.x), quantize(display.y), quantize(display.z), 255]
}
