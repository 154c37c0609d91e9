//! `cyclo-rotor` library crate.
//!
//! The binary (`cyclo`) is a thin wrapper around this library so that:
//!
//! - the profile math is testable without spawning processes
//! - the design pipeline is shared by the CLI subcommands and the TUI

pub mod app;
pub mod check;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
