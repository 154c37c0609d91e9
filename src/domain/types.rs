//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed by value into the pure geometry functions
//! - serialized to design files (JSON) and reloaded later
//! - rendered by both the CLI and the TUI without conversion

use std::f64::consts::TAU;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A sampled point on the rotor profile (or a circle center), in mm.
pub type ProfilePoint = Point2<f64>;

/// Geometric inputs of a single rotor disc.
///
/// Symbols follow the usual cycloidal drive notation: `R`, `Rr`, `E`, `N`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotorParameters {
    /// `R`: roller pitch circle radius (mm).
    pub pitch_radius: f64,
    /// `Rr`: roller radius (mm).
    pub roller_radius: f64,
    /// `E`: eccentricity (mm).
    pub eccentricity: f64,
    /// `N`: number of rollers.
    pub rollers: u32,
    /// Extra rotation of the curve parameter (radians).
    ///
    /// Zero for the first disc; the second disc of a dual-disc drive reuses the
    /// same parameters with a non-zero offset.
    pub phase_offset: f64,
}

impl RotorParameters {
    pub fn new(pitch_radius: f64, roller_radius: f64, eccentricity: f64, rollers: u32) -> Self {
        Self {
            pitch_radius,
            roller_radius,
            eccentricity,
            rollers,
            phase_offset: 0.0,
        }
    }

    /// Same rotor, rotated by `phase_offset` radians.
    pub fn with_phase(self, phase_offset: f64) -> Self {
        Self { phase_offset, ..self }
    }

    /// Number of profile lobes (`N - 1`).
    pub fn lobes(&self) -> u32 {
        self.rollers.saturating_sub(1)
    }
}

/// How densely the profile parameter is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Number of samples (both ends included).
    pub sample_count: usize,
    /// Angular margin (radians) kept before `2π` so the curve is not closed exactly.
    pub epsilon: f64,
}

impl SweepConfig {
    /// Last parameter value of the sweep: `2π - epsilon`.
    pub fn t_end(&self) -> f64 {
        TAU - self.epsilon
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sample_count: 1200,
            epsilon: 9e-4,
        }
    }
}

/// Output pin holes drilled through the disc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputHoles {
    /// Radius of the circle the hole centers sit on (mm).
    pub circle_radius: f64,
    pub count: usize,
    /// Output pin diameter (mm).
    pub pin_diameter: f64,
    /// Extra diameter added to the pin for the hole (mm).
    pub clearance: f64,
}

impl OutputHoles {
    /// Radius of each drilled hole: `(pin_diameter + clearance) / 2`.
    pub fn hole_radius(&self) -> f64 {
        (self.pin_diameter + self.clearance) / 2.0
    }
}

impl Default for OutputHoles {
    fn default() -> Self {
        Self {
            circle_radius: 10.0,
            count: 4,
            pin_diameter: 8.0,
            clearance: 0.2,
        }
    }
}

/// Dual-disc options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscOptions {
    pub dual_disc: bool,
    /// Phase of the second disc in degrees (normally 180).
    pub disc2_phase_deg: f64,
}

impl DiscOptions {
    pub fn phase_rad(&self) -> f64 {
        self.disc2_phase_deg.to_radians()
    }
}

impl Default for DiscOptions {
    fn default() -> Self {
        Self {
            dual_disc: false,
            disc2_phase_deg: 180.0,
        }
    }
}

/// Rotor inputs as stored in a design file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotorInputs {
    pub rollers: u32,
    pub pitch_radius: f64,
    pub roller_radius: f64,
    pub eccentricity: f64,
}

impl Default for RotorInputs {
    fn default() -> Self {
        Self {
            rollers: 10,
            pitch_radius: 20.0,
            roller_radius: 3.0,
            eccentricity: 1.1,
        }
    }
}

/// The full input surface of one design run.
///
/// This is derived from CLI flags, a design file, or the TUI form (plus defaults).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignConfig {
    #[serde(default)]
    pub rotor: RotorInputs,
    #[serde(default)]
    pub holes: OutputHoles,
    #[serde(default)]
    pub discs: DiscOptions,
    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Input limits enforced before a design reaches the geometry core.
pub mod limits {
    pub const MIN_ROLLERS: u32 = 3;
    pub const MIN_PITCH_RADIUS: f64 = 0.1;
    pub const MIN_ROLLER_RADIUS: f64 = 0.1;
    pub const MIN_ECCENTRICITY: f64 = 0.001;
    pub const MIN_OUT_CIRCLE_RADIUS: f64 = 0.1;
    pub const MIN_OUT_COUNT: usize = 3;
    pub const MIN_PIN_DIAMETER: f64 = 0.1;
    pub const MIN_CLEARANCE: f64 = 0.0;
    pub const MAX_PHASE_DEG: f64 = 360.0;
    pub const MIN_SAMPLES: usize = 200;
    pub const MAX_SAMPLES: usize = 6000;
    pub const MIN_EPSILON: f64 = 1e-6;
}

impl DesignConfig {
    /// Parameters of disc 1 (no phase offset).
    pub fn rotor_parameters(&self) -> RotorParameters {
        RotorParameters::new(
            self.rotor.pitch_radius,
            self.rotor.roller_radius,
            self.rotor.eccentricity,
            self.rotor.rollers,
        )
    }

    /// Parameters of disc 2, if the design has one.
    pub fn second_disc_parameters(&self) -> Option<RotorParameters> {
        self.discs
            .dual_disc
            .then(|| self.rotor_parameters().with_phase(self.discs.phase_rad()))
    }

    /// Check the form-level input ranges.
    ///
    /// The geometry core accepts any numbers; this is the gate the CLI and TUI
    /// apply before handing a design over.
    pub fn validate(&self) -> Result<(), AppError> {
        use limits::*;

        let floats = [
            ("pitch radius (R)", self.rotor.pitch_radius),
            ("roller radius (Rr)", self.rotor.roller_radius),
            ("eccentricity (E)", self.rotor.eccentricity),
            ("output pin circle radius", self.holes.circle_radius),
            ("output pin diameter", self.holes.pin_diameter),
            ("hole clearance", self.holes.clearance),
            ("disc 2 phase", self.discs.disc2_phase_deg),
            ("epsilon", self.sweep.epsilon),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be a finite number, got {value}")));
            }
        }

        if self.rotor.rollers < MIN_ROLLERS {
            return Err(invalid(format!(
                "number of rollers (N) must be >= {MIN_ROLLERS}, got {}",
                self.rotor.rollers
            )));
        }
        at_least("pitch radius (R)", self.rotor.pitch_radius, MIN_PITCH_RADIUS)?;
        at_least("roller radius (Rr)", self.rotor.roller_radius, MIN_ROLLER_RADIUS)?;
        at_least("eccentricity (E)", self.rotor.eccentricity, MIN_ECCENTRICITY)?;
        at_least("output pin circle radius", self.holes.circle_radius, MIN_OUT_CIRCLE_RADIUS)?;
        if self.holes.count < MIN_OUT_COUNT {
            return Err(invalid(format!(
                "output pin count must be >= {MIN_OUT_COUNT}, got {}",
                self.holes.count
            )));
        }
        at_least("output pin diameter", self.holes.pin_diameter, MIN_PIN_DIAMETER)?;
        at_least("hole clearance", self.holes.clearance, MIN_CLEARANCE)?;
        if !(0.0..=MAX_PHASE_DEG).contains(&self.discs.disc2_phase_deg) {
            return Err(invalid(format!(
                "disc 2 phase must be within [0, {MAX_PHASE_DEG}] degrees, got {}",
                self.discs.disc2_phase_deg
            )));
        }
        if !(MIN_SAMPLES..=MAX_SAMPLES).contains(&self.sweep.sample_count) {
            return Err(invalid(format!(
                "samples must be within [{MIN_SAMPLES}, {MAX_SAMPLES}], got {}",
                self.sweep.sample_count
            )));
        }
        at_least("epsilon", self.sweep.epsilon, MIN_EPSILON)?;

        Ok(())
    }
}

fn at_least(name: &str, value: f64, min: f64) -> Result<(), AppError> {
    if value < min {
        return Err(invalid(format!("{name} must be >= {min}, got {value}")));
    }
    Ok(())
}

fn invalid(message: String) -> AppError {
    AppError::new(2, format!("Invalid design input: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_design_is_valid() {
        let config = DesignConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rotor.rollers, 10);
        assert_eq!(config.sweep.sample_count, 1200);
    }

    #[test]
    fn hole_radius_adds_clearance_to_diameter() {
        let holes = OutputHoles {
            circle_radius: 10.0,
            count: 4,
            pin_diameter: 8.0,
            clearance: 0.2,
        };
        assert!((holes.hole_radius() - 4.1).abs() < 1e-12);
    }

    #[test]
    fn second_disc_only_when_dual() {
        let mut config = DesignConfig::default();
        assert!(config.second_disc_parameters().is_none());

        config.discs.dual_disc = true;
        let p2 = config.second_disc_parameters().unwrap();
        assert!((p2.phase_offset - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(p2.rollers, config.rotor.rollers);
    }

    #[test]
    fn validate_rejects_out_of_range_inputs() {
        let mut config = DesignConfig::default();
        config.rotor.rollers = 2;
        let err = config.validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("rollers"));

        let mut config = DesignConfig::default();
        config.sweep.sample_count = 100;
        assert!(config.validate().is_err());

        let mut config = DesignConfig::default();
        config.discs.disc2_phase_deg = 400.0;
        assert!(config.validate().is_err());

        let mut config = DesignConfig::default();
        config.rotor.eccentricity = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn design_file_fields_fall_back_to_defaults() {
        let config: DesignConfig =
            serde_json::from_str(r#"{ "rotor": { "rollers": 12, "pitch_radius": 30.0, "roller_radius": 4.0, "eccentricity": 1.5 } }"#)
                .unwrap();
        assert_eq!(config.rotor.rollers, 12);
        assert_eq!(config.holes, OutputHoles::default());
        assert_eq!(config.sweep, SweepConfig::default());
    }
}
