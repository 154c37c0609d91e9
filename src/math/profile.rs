//! Rotor profile evaluation.
//!
//! The profile is the classic parametric form of a cycloidal disc rolling
//! inside a ring of `N` rollers:
//!
//! ```text
//! tt    = t + phase
//! a     = (1 - N) * tt
//! psi   = atan2(sin(a), R / (E * N) - cos(a))
//! x     =  R * cos(tt) - Rr * cos(tt + psi) - E * cos(N * tt)
//! y     = -R * sin(tt) + Rr * sin(tt + psi) + E * sin(N * tt)
//! ```
//!
//! Numerical notes:
//! - `psi` always uses the two-argument `atan2`. The single-argument form that
//!   CAD equation dialogs expect divides by the denominator and flips branch
//!   whenever it crosses zero.
//! - Nothing is clamped or filtered. Degenerate inputs (`E = 0`, a self-crossing
//!   `E > R/N`, or anything producing NaN/inf) are evaluated exactly as written
//!   and passed through, so previews and point tables show the problem instead
//!   of hiding it.

use crate::domain::{ProfilePoint, RotorParameters, SweepConfig};

/// Pressure angle `psi` at the (already phase-shifted) parameter `tt`.
pub fn pressure_angle(tt: f64, params: &RotorParameters) -> f64 {
    let n = params.rollers as f64;
    let a = (1.0 - n) * tt;
    let denom = params.pitch_radius / (params.eccentricity * n) - a.cos();
    a.sin().atan2(denom)
}

/// Evaluate a single profile point at curve parameter `t`.
pub fn profile_point(t: f64, params: &RotorParameters) -> ProfilePoint {
    let tt = t + params.phase_offset;
    let n = params.rollers as f64;
    let psi = pressure_angle(tt, params);

    let r = params.pitch_radius;
    let rr = params.roller_radius;
    let e = params.eccentricity;

    let x = (r * tt.cos()) - (rr * (tt + psi).cos()) - (e * (n * tt).cos());
    let y = (-r * tt.sin()) + (rr * (tt + psi).sin()) + (e * (n * tt).sin());
    ProfilePoint::new(x, y)
}

/// Evaluate the profile at every parameter value, preserving order.
pub fn evaluate_profile(ts: &[f64], params: &RotorParameters) -> Vec<ProfilePoint> {
    ts.iter().map(|&t| profile_point(t, params)).collect()
}

/// Evenly spaced parameter values over `[0, 2π - epsilon]`, both ends included.
///
/// The last value is set to `2π - epsilon` exactly rather than accumulated, so
/// the end of the sweep does not drift with the sample count.
pub fn sweep_parameters(sweep: &SweepConfig) -> Vec<f64> {
    let n = sweep.sample_count;
    let t_end = sweep.t_end();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = t_end / (n as f64 - 1.0);
            (0..n)
                .map(|i| if i + 1 == n { t_end } else { i as f64 * step })
                .collect()
        }
    }
}

/// Sample and evaluate a full profile in one call.
pub fn trace_profile(params: &RotorParameters, sweep: &SweepConfig) -> Vec<ProfilePoint> {
    evaluate_profile(&sweep_parameters(sweep), params)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{PI, TAU};

    use proptest::prelude::*;

    use super::*;

    fn reference_rotor() -> RotorParameters {
        RotorParameters::new(20.0, 3.0, 1.1, 10)
    }

    #[test]
    fn first_point_sits_on_x_axis() {
        let sweep = SweepConfig {
            sample_count: 1200,
            epsilon: 9e-4,
        };
        let points = trace_profile(&reference_rotor(), &sweep);
        assert_eq!(points.len(), 1200);

        // psi(0) = atan2(0, R/(E*N) - 1) = 0, so x = R - Rr - E.
        assert!((points[0].x - 15.9).abs() < 1e-12, "x0 = {}", points[0].x);
        assert!(points[0].y.abs() < 1e-12, "y0 = {}", points[0].y);
    }

    #[test]
    fn sweep_spans_zero_to_two_pi_minus_epsilon() {
        let sweep = SweepConfig {
            sample_count: 1200,
            epsilon: 9e-4,
        };
        let ts = sweep_parameters(&sweep);
        assert_eq!(ts.len(), 1200);
        assert_eq!(ts[0], 0.0);
        assert_eq!(*ts.last().unwrap(), TAU - 9e-4);
        assert!(ts.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn sweep_degenerate_counts() {
        let mut sweep = SweepConfig::default();
        sweep.sample_count = 0;
        assert!(sweep_parameters(&sweep).is_empty());
        sweep.sample_count = 1;
        assert_eq!(sweep_parameters(&sweep), vec![0.0]);
        sweep.sample_count = 2;
        assert_eq!(sweep_parameters(&sweep), vec![0.0, TAU - sweep.epsilon]);
    }

    #[test]
    fn pressure_angle_handles_zero_denominator() {
        // R / (E * N) = 1 makes the denominator vanish at a = 0.
        let params = RotorParameters::new(10.0, 1.0, 1.0, 10);
        let psi = pressure_angle(0.0, &params);
        assert_eq!(psi, 0.0);

        let tt = PI / 18.0; // a = -π/2, denom = 1
        let psi = pressure_angle(tt, &params);
        assert!((psi + PI / 4.0).abs() < 1e-12, "psi = {psi}");
    }

    #[test]
    fn zero_eccentricity_is_evaluated_as_given() {
        // R / (E * N) = +inf, so psi collapses to zero and the E terms vanish:
        // the "profile" is a plain circle of radius R - Rr.
        let params = RotorParameters::new(20.0, 3.0, 0.0, 10);
        let sweep = SweepConfig {
            sample_count: 200,
            epsilon: 9e-4,
        };
        let ts = sweep_parameters(&sweep);
        let points = evaluate_profile(&ts, &params);
        assert_eq!(points.len(), 200);
        for (t, p) in ts.iter().zip(&points) {
            assert!((p.x - 17.0 * t.cos()).abs() < 1e-12);
            assert!((p.y + 17.0 * t.sin()).abs() < 1e-12);
        }
    }

    #[test]
    fn dual_disc_is_the_same_curve_shifted() {
        let p1 = reference_rotor();
        let p2 = p1.with_phase(PI);
        for &t in &[0.0, 0.3, 1.7, 4.2] {
            let a = profile_point(t, &p2);
            let b = profile_point(t + PI, &p1);
            assert!((a - b).norm() < 1e-12);
        }
    }

    fn rotor_strategy() -> impl Strategy<Value = RotorParameters> {
        (3u32..40, 5.0f64..80.0, 0.05f64..0.9, 0.1f64..0.95).prop_map(|(n, r, rr_frac, e_frac)| {
            let e = e_frac * r / n as f64;
            RotorParameters::new(r, rr_frac * r / 4.0, e, n)
        })
    }

    proptest! {
        #[test]
        fn profile_is_finite_for_valid_rotors(params in rotor_strategy(), t in 0.0f64..TAU) {
            let p = profile_point(t, &params);
            prop_assert!(p.x.is_finite() && p.y.is_finite());
        }

        #[test]
        fn profile_is_two_pi_periodic(params in rotor_strategy(), t in 0.0f64..TAU, phase in 0.0f64..TAU) {
            let params = params.with_phase(phase);
            let a = profile_point(t, &params);
            let b = profile_point(t + TAU, &params);
            prop_assert!((a - b).norm() < 1e-8, "a={a:?} b={b:?}");
        }

        #[test]
        fn phase_offset_shifts_the_parameter(params in rotor_strategy(), t in 0.0f64..TAU, phase in 0.0f64..TAU) {
            let shifted = profile_point(t, &params.with_phase(phase));
            let reference = profile_point(t + phase, &params);
            prop_assert!((shifted - reference).norm() < 1e-9);
        }
    }
}
