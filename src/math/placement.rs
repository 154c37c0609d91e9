//! Evenly spaced points on a circle: roller centers and output-hole centers.
//!
//! Both use the same placement with a fixed starting angle of zero, so the
//! output is bit-for-bit reproducible between runs (stable CSV/plot order).

use std::f64::consts::TAU;

use crate::domain::{OutputHoles, ProfilePoint, RotorParameters};

/// `count` points at angles `2πk / count` on a circle of `radius` around the origin.
pub fn circle_placement(radius: f64, count: usize) -> Vec<ProfilePoint> {
    (0..count)
        .map(|k| {
            let angle = TAU * k as f64 / count as f64;
            ProfilePoint::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Roller centers on the pitch circle (`R`, `N`).
pub fn roller_centers(params: &RotorParameters) -> Vec<ProfilePoint> {
    circle_placement(params.pitch_radius, params.rollers as usize)
}

/// Output-hole centers on the output pin circle.
pub fn output_hole_centers(holes: &OutputHoles) -> Vec<ProfilePoint> {
    circle_placement(holes.circle_radius, holes.count)
}
