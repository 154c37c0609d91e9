//! Input/output helpers.
//!
//! - point tables and text exports (`export`)
//! - design JSON read/write (`design`)

pub mod design;
pub mod export;

pub use design::*;
pub use export::*;
