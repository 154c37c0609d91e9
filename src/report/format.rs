//! Formatted text output: CAD equations, parameter summary, run summary.
//!
//! We keep formatting code in one place so:
//! - the geometry code stays clean and testable
//! - output changes are localized (the layouts below are pinned by tests)

use std::f64::consts::TAU;

use chrono::{Local, NaiveDateTime};

use crate::app::pipeline::DesignRun;
use crate::check::ParameterWarning;
use crate::domain::{DesignConfig, ProfilePoint};

/// Indicative reduction ratio for a single-disc reducer with `N - 1` lobes.
///
/// This is architecture dependent (fixed ring vs. fixed output, etc.) and is
/// only ever displayed as a hint. `NaN` for `N <= 1`.
pub fn ratio_hint(rollers: u32) -> f64 {
    if rollers <= 1 {
        return f64::NAN;
    }
    (rollers - 1) as f64
}

/// Shortest round-trip float text, always with a decimal point or exponent
/// (`20.0`, `1.1`, `0.0009`).
pub fn fmt_float(v: f64) -> String {
    format!("{v:?}")
}

/// Parametric equations for a CAD "equation driven curve" dialog.
///
/// CAD equation engines generally only offer single-argument `atan`, so `psi`
/// is written as `atan(num / denom)` here even though the in-crate evaluator
/// uses `atan2`.
pub fn format_equations(config: &DesignConfig) -> String {
    let n = config.rotor.rollers;
    let psi = format!("atan( sin((1-{n})*t) / ((R/(E*{n})) - cos((1-{n})*t)) )");
    let x_eq = format!("X = (R*cos(t)) - (Rr*cos(t + {psi})) - (E*cos({n}*t))");
    let y_eq = format!("Y = (-R*sin(t)) + (Rr*sin(t + {psi})) + (E*sin({n}*t))");

    let t0 = 0.0_f64;
    let t1 = TAU - config.sweep.epsilon;

    let mut lines = vec![
        "SolidWorks Equation Driven Curve (Parametric)".to_string(),
        "Units: mm for R, Rr, E. Parameter t is radians.".to_string(),
        String::new(),
        "Define these variables in SolidWorks Equations:".to_string(),
        format!("R  = {}", fmt_float(config.rotor.pitch_radius)),
        format!("Rr = {}", fmt_float(config.rotor.roller_radius)),
        format!("E  = {}", fmt_float(config.rotor.eccentricity)),
        format!("N  = {n}"),
        String::new(),
        "Paste into the Equation Driven Curve dialog:".to_string(),
        x_eq,
        y_eq,
        String::new(),
        format!(
            "Recommended t range: {} to {} (avoid exactly 2*pi)",
            fmt_float(t0),
            fmt_float(t1)
        ),
    ];

    if config.discs.dual_disc {
        let phase = fmt_float(config.discs.phase_rad());
        lines.push(String::new());
        lines.push("Optional: Disc 2 (phase shifted)".to_string());
        lines.push(format!("Use t2 = t + {phase}  (or add {phase} everywhere t appears)"));
    }

    lines.join("\n")
}

/// Parameter summary stamped with the current local time.
pub fn format_parameters_now(config: &DesignConfig) -> String {
    format_parameters(config, Local::now().naive_local())
}

/// Human-readable dump of every input plus derived values.
pub fn format_parameters(config: &DesignConfig, generated: NaiveDateTime) -> String {
    let rotor = &config.rotor;
    let holes = &config.holes;
    let lobes = rotor.rollers.saturating_sub(1);

    let mut lines = vec![
        format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")),
        String::new(),
        "Core rotor parameters (mm unless stated):".to_string(),
        format!("N (rollers)            = {}", rotor.rollers),
        format!("Lobes (N-1)             = {lobes}"),
        format!("R  (roller PCD radius)  = {}", fmt_float(rotor.pitch_radius)),
        format!("Rr (roller radius)      = {}", fmt_float(rotor.roller_radius)),
        format!("E  (eccentricity)       = {}", fmt_float(rotor.eccentricity)),
        format!(
            "Ratio hint (~N-1)        = {} (approximate, architecture dependent)",
            ratio_hint(rotor.rollers)
        ),
        String::new(),
        "Output holes:".to_string(),
        format!("Output pin circle radius = {}", fmt_float(holes.circle_radius)),
        format!("Output pin count         = {}", holes.count),
        format!("Output pin diameter      = {}", fmt_float(holes.pin_diameter)),
        format!("Hole clearance           = {}", fmt_float(holes.clearance)),
        String::new(),
        "Sampling:".to_string(),
        format!("samples                  = {}", config.sweep.sample_count),
        format!("eps (rad)                = {}", fmt_float(config.sweep.epsilon)),
    ];

    if config.discs.dual_disc {
        lines.push(String::new());
        lines.push("Dual disc:".to_string());
        lines.push(format!(
            "disc2 phase (deg)        = {}",
            fmt_float(config.discs.disc2_phase_deg)
        ));
    }

    lines.join("\n")
}

/// Bullet list of advisory warnings (empty string when there are none).
pub fn format_warnings(warnings: &[ParameterWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut out = String::from("Warnings:\n");
    for w in warnings {
        out.push_str(&format!("- {w}\n"));
    }
    out
}

/// Short overview of an evaluated design for terminal output.
pub fn format_run_summary(run: &DesignRun) -> String {
    let c = &run.config;
    let mut out = String::new();

    out.push_str("=== cyclo - cycloidal rotor design ===\n");
    out.push_str(&format!(
        "Rotor: N={} R={} Rr={} E={} | lobes={}\n",
        c.rotor.rollers,
        fmt_float(c.rotor.pitch_radius),
        fmt_float(c.rotor.roller_radius),
        fmt_float(c.rotor.eccentricity),
        c.rotor.rollers.saturating_sub(1),
    ));
    out.push_str(&format!(
        "Output holes: n={} on R={} | hole diameter={:.3}mm\n",
        c.holes.count,
        fmt_float(c.holes.circle_radius),
        2.0 * run.hole_radius,
    ));
    out.push_str(&format!(
        "Sweep: n={} | t=[0, {:.6}] rad\n",
        run.sweep.len(),
        run.sweep.last().copied().unwrap_or(0.0),
    ));

    out.push_str(&format!("Disc 1: {}\n", fmt_extent(&run.disc1)));
    if let Some(disc2) = &run.disc2 {
        out.push_str(&format!(
            "Disc 2: phase={}deg | {}\n",
            fmt_float(c.discs.disc2_phase_deg),
            fmt_extent(disc2)
        ));
    }

    if !run.warnings.is_empty() {
        out.push('\n');
        out.push_str(&format_warnings(&run.warnings));
    }

    out
}

fn fmt_extent(points: &[ProfilePoint]) -> String {
    match radial_extent(points) {
        Some((min, max)) => format!("points={} | radius=[{min:.3}, {max:.3}]mm", points.len()),
        None => format!("points={} | radius=[-, -]", points.len()),
    }
}

/// Min/max distance from the origin over the finite points.
fn radial_extent(points: &[ProfilePoint]) -> Option<(f64, f64)> {
    let mut min_r = f64::INFINITY;
    let mut max_r = f64::NEG_INFINITY;
    for p in points {
        let r = p.coords.norm();
        if r.is_finite() {
            min_r = min_r.min(r);
            max_r = max_r.max(r);
        }
    }
    (min_r.is_finite() && max_r.is_finite()).then_some((min_r, max_r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap()
    }

    #[test]
    fn equations_single_disc() {
        let txt = format_equations(&DesignConfig::default());
        let lines: Vec<&str> = txt.lines().collect();

        assert_eq!(lines[0], "SolidWorks Equation Driven Curve (Parametric)");
        assert_eq!(lines[4], "R  = 20.0");
        assert_eq!(lines[5], "Rr = 3.0");
        assert_eq!(lines[6], "E  = 1.1");
        assert_eq!(lines[7], "N  = 10");
        assert_eq!(
            lines[10],
            "X = (R*cos(t)) - (Rr*cos(t + atan( sin((1-10)*t) / ((R/(E*10)) - cos((1-10)*t)) ))) - (E*cos(10*t))"
        );
        assert_eq!(
            lines[11],
            "Y = (-R*sin(t)) + (Rr*sin(t + atan( sin((1-10)*t) / ((R/(E*10)) - cos((1-10)*t)) ))) + (E*sin(10*t))"
        );
        assert_eq!(
            lines[13],
            format!("Recommended t range: 0.0 to {:?} (avoid exactly 2*pi)", TAU - 9e-4)
        );
        assert_eq!(lines.len(), 14);
        assert!(!txt.contains("Disc 2"));
    }

    #[test]
    fn equations_dual_disc_note() {
        let mut config = DesignConfig::default();
        config.discs.dual_disc = true;
        let txt = format_equations(&config);
        let last = txt.lines().last().unwrap();
        assert_eq!(
            last,
            "Use t2 = t + 3.141592653589793  (or add 3.141592653589793 everywhere t appears)"
        );
        assert!(txt.contains("Optional: Disc 2 (phase shifted)"));
    }

    #[test]
    fn parameters_layout() {
        let txt = format_parameters(&DesignConfig::default(), stamp());
        let expected = concat!(
            "Generated: 2025-03-14 09:26:53\n",
            "\n",
            "Core rotor parameters (mm unless stated):\n",
            "N (rollers)            = 10\n",
            "Lobes (N-1)             = 9\n",
            "R  (roller PCD radius)  = 20.0\n",
            "Rr (roller radius)      = 3.0\n",
            "E  (eccentricity)       = 1.1\n",
            "Ratio hint (~N-1)        = 9 (approximate, architecture dependent)\n",
            "\n",
            "Output holes:\n",
            "Output pin circle radius = 10.0\n",
            "Output pin count         = 4\n",
            "Output pin diameter      = 8.0\n",
            "Hole clearance           = 0.2\n",
            "\n",
            "Sampling:\n",
            "samples                  = 1200\n",
            "eps (rad)                = 0.0009",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn parameters_dual_disc_block() {
        let mut config = DesignConfig::default();
        config.discs.dual_disc = true;
        config.discs.disc2_phase_deg = 90.0;
        let txt = format_parameters(&config, stamp());
        assert!(txt.ends_with("Dual disc:\ndisc2 phase (deg)        = 90.0"));
    }

    #[test]
    fn ratio_hint_is_n_minus_one() {
        assert_eq!(ratio_hint(10), 9.0);
        assert_eq!(ratio_hint(3), 2.0);
        assert!(ratio_hint(1).is_nan());
        assert!(ratio_hint(0).is_nan());
    }

    #[test]
    fn warnings_block() {
        assert_eq!(format_warnings(&[]), "");
        let txt = format_warnings(&[ParameterWarning::NonPositiveEccentricity]);
        assert_eq!(txt, "Warnings:\n- E must be > 0.\n");
    }

    #[test]
    fn run_summary_mentions_both_discs() {
        let mut config = DesignConfig::default();
        config.discs.dual_disc = true;
        let run = crate::app::pipeline::run_design(&config);
        let txt = format_run_summary(&run);
        assert!(txt.contains("Rotor: N=10 R=20.0 Rr=3.0 E=1.1 | lobes=9"));
        assert!(txt.contains("hole diameter=8.200mm"));
        assert!(txt.contains("Disc 1: points=1200"));
        assert!(txt.contains("Disc 2: phase=180.0deg"));
        assert!(!txt.contains("Warnings:"));
    }

    #[test]
    fn radial_extent_skips_non_finite() {
        let points = vec![
            ProfilePoint::new(3.0, 4.0),
            ProfilePoint::new(f64::NAN, 0.0),
            ProfilePoint::new(1.0, 0.0),
        ];
        assert_eq!(radial_extent(&points), Some((1.0, 5.0)));
        assert_eq!(radial_extent(&[]), None);
    }
}
