//! Geometry core: the rotor profile evaluator and circle placements.

pub mod placement;
pub mod profile;

pub use placement::*;
pub use profile::*;
