//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the rotor geometry inputs (`RotorParameters`, `OutputHoles`, `DiscOptions`)
//! - sampling configuration (`SweepConfig`)
//! - the full, serializable input set of a run (`DesignConfig`)

pub mod types;

pub use types::*;
