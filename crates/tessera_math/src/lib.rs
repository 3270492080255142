// Re-export glam for convenience
pub use glam::*;

// Tessera math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Reflect `v` about the normal `n`.
///
/// `n` must be unit length for the result to preserve the length of `v`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
