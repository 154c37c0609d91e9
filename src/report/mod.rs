//! Reporting utilities: CAD equations, parameter summaries, run summaries.

pub mod format;

pub use format::*;
