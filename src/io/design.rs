//! Read/write design JSON files.
//!
//! A design file is the "portable" representation of a rotor design: every
//! input of the form, so a run can be reproduced later or shared. The schema is
//! `domain::DesignConfig` wrapped with a small header.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DesignConfig;
use crate::error::AppError;

/// On-disk layout of a design file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignFile {
    pub tool: String,
    #[serde(flatten)]
    pub design: DesignConfig,
}

/// Write a design JSON file.
pub fn write_design_json(path: &Path, design: &DesignConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create design JSON '{}': {e}", path.display())))?;

    let doc = DesignFile {
        tool: "cyclo".to_string(),
        design: *design,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write design JSON: {e}")))?;

    Ok(())
}

/// Read a design JSON file.
///
/// Missing sections fall back to their defaults; the `tool` tag is optional so
/// hand-written files work too.
pub fn read_design_json(path: &Path) -> Result<DesignConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open design JSON '{}': {e}", path.display())))?;
    let design: DesignConfig =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid design JSON: {e}")))?;
    Ok(design)
}
