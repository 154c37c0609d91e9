//! Shared "design pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! parameter checks -> profile(s) -> roller/hole placement
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::{debug, warn};

use crate::check::{ParameterWarning, check_parameters};
use crate::domain::{DesignConfig, ProfilePoint};
use crate::math::{evaluate_profile, output_hole_centers, roller_centers, sweep_parameters};

/// All computed outputs of a single design evaluation.
#[derive(Debug, Clone)]
pub struct DesignRun {
    pub config: DesignConfig,
    pub warnings: Vec<ParameterWarning>,
    /// Curve parameter values shared by both discs.
    pub sweep: Vec<f64>,
    pub disc1: Vec<ProfilePoint>,
    /// Present only for dual-disc designs.
    pub disc2: Option<Vec<ProfilePoint>>,
    pub rollers: Vec<ProfilePoint>,
    pub holes: Vec<ProfilePoint>,
    pub hole_radius: f64,
}

/// Evaluate a design.
///
/// This never fails: warnings are collected and logged, and the curves are
/// computed regardless.
pub fn run_design(config: &DesignConfig) -> DesignRun {
    let params = config.rotor_parameters();
    debug!(
        n = params.rollers,
        r = params.pitch_radius,
        rr = params.roller_radius,
        e = params.eccentricity,
        samples = config.sweep.sample_count,
        dual = config.discs.dual_disc,
        "evaluating design"
    );

    // 1) Advisory checks.
    let warnings = check_parameters(&params);
    for w in &warnings {
        warn!("{w}");
    }

    // 2) Profiles. Disc 2 is the same evaluator with a phase offset.
    let sweep = sweep_parameters(&config.sweep);
    let disc1 = evaluate_profile(&sweep, &params);
    let disc2 = config
        .second_disc_parameters()
        .map(|p2| evaluate_profile(&sweep, &p2));

    // 3) Ancillary geometry.
    let rollers = roller_centers(&params);
    let holes = output_hole_centers(&config.holes);

    let non_finite = disc1
        .iter()
        .chain(disc2.iter().flatten())
        .filter(|p| !(p.x.is_finite() && p.y.is_finite()))
        .count();
    if non_finite > 0 {
        warn!(non_finite, "profile contains non-finite points");
    }
    debug!(points = disc1.len(), rollers = rollers.len(), holes = holes.len(), "design evaluated");

    DesignRun {
        config: *config,
        warnings,
        sweep,
        disc1,
        disc2,
        rollers,
        holes,
        hole_radius: config.holes.hole_radius(),
    }
}
