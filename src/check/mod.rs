//! Advisory sanity checks over the rotor parameters.
//!
//! These are heuristics, not gates: a design that fails every check is still
//! evaluated and exported. The presentation layer decides how to show them.

use std::fmt;

use crate::domain::RotorParameters;

/// A single advisory finding about a rotor design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterWarning {
    /// `E <= 0`.
    NonPositiveEccentricity,
    /// `E > R / N`; the profile often self-intersects past this point.
    EccentricityExceedsLimit { limit: f64 },
    /// `R <= Rr`.
    PitchNotAboveRoller,
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterWarning::NonPositiveEccentricity => write!(f, "E must be > 0."),
            ParameterWarning::EccentricityExceedsLimit { .. } => write!(
                f,
                "E is larger than R/N. This often causes ugly/self-intersecting profiles. \
                 Not always invalid, but check fit."
            ),
            ParameterWarning::PitchNotAboveRoller => write!(
                f,
                "R should usually be larger than Rr (roller circle radius vs roller radius)."
            ),
        }
    }
}

/// Run every check and return all that fire, in a fixed order.
pub fn check_parameters(params: &RotorParameters) -> Vec<ParameterWarning> {
    let mut warnings = Vec::new();

    if params.eccentricity <= 0.0 {
        warnings.push(ParameterWarning::NonPositiveEccentricity);
    }

    let limit = params.pitch_radius / params.rollers as f64;
    if params.eccentricity > limit {
        warnings.push(ParameterWarning::EccentricityExceedsLimit { limit });
    }

    if params.pitch_radius <= params.roller_radius {
        warnings.push(ParameterWarning::PitchNotAboveRoller);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_design_has_no_warnings() {
        let params = RotorParameters::new(20.0, 3.0, 1.1, 10);
        assert!(check_parameters(&params).is_empty());
    }

    #[test]
    fn pitch_equal_to_roller_is_flagged() {
        let params = RotorParameters::new(1.0, 1.0, 1.0, 10);
        let warnings = check_parameters(&params);

        assert!(warnings.contains(&ParameterWarning::PitchNotAboveRoller));
        assert!(!warnings.contains(&ParameterWarning::NonPositiveEccentricity));
        // 1.0 > 1.0 / 10 as well.
        assert_eq!(
            warnings,
            vec![
                ParameterWarning::EccentricityExceedsLimit { limit: 0.1 },
                ParameterWarning::PitchNotAboveRoller,
            ]
        );
    }

    #[test]
    fn every_check_can_fire_at_once() {
        let params = RotorParameters::new(-1.0, 2.0, 0.0, 10);
        let warnings = check_parameters(&params);
        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[0], ParameterWarning::NonPositiveEccentricity);
    }

    #[test]
    fn eccentricity_at_the_limit_is_accepted() {
        let params = RotorParameters::new(20.0, 3.0, 2.0, 10);
        assert!(check_parameters(&params).is_empty());
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(ParameterWarning::NonPositiveEccentricity.to_string(), "E must be > 0.");
        assert!(
            ParameterWarning::EccentricityExceedsLimit { limit: 2.0 }
                .to_string()
                .starts_with("E is larger than R/N.")
        );
    }
}
