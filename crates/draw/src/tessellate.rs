//! Screen-space ellipse sampling projected back to geographic rings.

use foundation::math::{GeoPos, Vec2};
use visualizer::RenderPort;

pub const MIN_ELLIPSE_SAMPLES: usize = 36;
pub const MAX_ELLIPSE_SAMPLES: usize = 180;

/// Samples an ellipse centered at `center_px` and projects each sample
/// through the port. Samples that miss the surface are dropped, so the
/// returned ring can be shorter than the sample count; near the horizon
/// or the poles it may come back nearly empty. Callers decide whether a
/// short ring is usable.
///
/// Elongated ellipses get proportionally more samples so the flat sides
/// stay smooth; circles get the minimum.
pub fn tessellate_ellipse(
    port: &dyn RenderPort,
    center_px: Vec2,
    radius_a_px: f64,
    radius_b_px: f64,
    rotation_deg: f64,
) -> Vec<GeoPos> {
    if !radius_a_px.is_finite() || !radius_b_px.is_finite() || radius_a_px <= 0.0 || radius_b_px <= 0.0 {
        return Vec::new();
    }

    let samples = sample_count(radius_a_px, radius_b_px);
    let rotation = rotation_deg.to_radians();
    let (rot_sin, rot_cos) = rotation.sin_cos();

    let mut ring = Vec::with_capacity(samples);
    for i in 0..samples {
        let theta = std::f64::consts::TAU * i as f64 / samples as f64;
        let x = radius_a_px * theta.cos();
        let y = radius_b_px * theta.sin();
        let px = Vec2::new(
            center_px.x + x * rot_cos - y * rot_sin,
            center_px.y + x * rot_sin + y * rot_cos,
        );
        if let Some(geo) = port.pick_surface(px) {
            ring.push(geo);
        }
    }
    ring
}

fn sample_count(radius_a_px: f64, radius_b_px: f64) -> usize {
    let aspect = radius_a_px.max(radius_b_px) / radius_a_px.min(radius_b_px);
    let scaled = (MIN_ELLIPSE_SAMPLES as f64 * aspect).round() as usize;
    scaled.clamp(MIN_ELLIPSE_SAMPLES, MAX_ELLIPSE_SAMPLES)
}
