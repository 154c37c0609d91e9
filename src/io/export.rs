//! Export point tables and text documents to disk.
//!
//! Point tables are plain `x_mm,y_mm` CSV, meant to be easy to consume in CAD
//! "curve through XYZ points" importers, spreadsheets, or downstream scripts.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::pipeline::DesignRun;
use crate::domain::{DesignConfig, ProfilePoint};
use crate::error::AppError;
use crate::report::{fmt_float, format_equations, format_parameters_now};

/// Header row of every point table.
pub const POINTS_HEADER: &str = "x_mm,y_mm";

/// Render a point table, one row per sample in sweep order (6 decimals).
pub fn points_csv(points: &[ProfilePoint]) -> String {
    let mut out = String::with_capacity(16 + points.len() * 24);
    out.push_str(POINTS_HEADER);
    for p in points {
        out.push_str(&format!("\n{:.6},{:.6}", p.x, p.y));
    }
    out
}

/// Write a point table to a CSV file.
pub fn write_points_csv(path: &Path, points: &[ProfilePoint]) -> Result<(), AppError> {
    write_text(path, &points_csv(points))
}

/// Write a text document (UTF-8) to a file.
pub fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export '{}': {e}", path.display())))?;
    file.write_all(text.as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write export '{}': {e}", path.display())))?;
    Ok(())
}

/// Read a point table previously written by [`write_points_csv`].
pub fn read_points_csv(path: &Path) -> Result<Vec<ProfilePoint>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open points CSV '{}': {e}", path.display())))?;
    parse_points_csv(file)
}

/// Parse a point table from any reader.
pub fn parse_points_csv<R: Read>(reader: R) -> Result<Vec<ProfilePoint>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read points CSV header: {e}")))?
        .clone();
    if headers.len() != 2 || &headers[0] != "x_mm" || &headers[1] != "y_mm" {
        return Err(AppError::new(
            2,
            format!("Unexpected points CSV header '{}', expected '{POINTS_HEADER}'", headers.iter().collect::<Vec<_>>().join(",")),
        ));
    }

    let mut points = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = record.map_err(|e| AppError::new(2, format!("Points CSV line {line}: {e}")))?;
        let x = parse_coord(record.get(0), line, "x_mm")?;
        let y = parse_coord(record.get(1), line, "y_mm")?;
        points.push(ProfilePoint::new(x, y));
    }
    Ok(points)
}

fn parse_coord(field: Option<&str>, line: usize, name: &str) -> Result<f64, AppError> {
    let raw = field.ok_or_else(|| AppError::new(2, format!("Points CSV line {line}: missing {name}")))?;
    raw.parse::<f64>()
        .map_err(|e| AppError::new(2, format!("Points CSV line {line}: invalid {name} '{raw}': {e}")))
}

/// File names used for an export bundle.
///
/// Names carry the key parameters so several designs can share a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNames {
    pub disc1_points: String,
    pub disc2_points: String,
    pub equations: String,
    pub parameters: String,
}

impl ExportNames {
    pub fn for_design(config: &DesignConfig) -> Self {
        let tag = format!(
            "N{}_R{}_Rr{}_E{}",
            config.rotor.rollers,
            fmt_float(config.rotor.pitch_radius),
            fmt_float(config.rotor.roller_radius),
            fmt_float(config.rotor.eccentricity),
        );
        Self {
            disc1_points: format!("disc1_points_{tag}.csv"),
            disc2_points: format!(
                "disc2_points_{tag}_phase{}.csv",
                fmt_float(config.discs.disc2_phase_deg)
            ),
            equations: format!("solidworks_equations_{tag}.txt"),
            parameters: format!("parameters_{tag}.txt"),
        }
    }
}

/// Write every export of a run into `dir` (created if missing).
///
/// Returns the written paths in a stable order: disc 1 points, disc 2 points
/// (dual disc only), equations, parameters.
pub fn write_export_bundle(dir: &Path, run: &DesignRun) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let names = ExportNames::for_design(&run.config);
    let mut written = Vec::with_capacity(4);

    let path = dir.join(&names.disc1_points);
    write_points_csv(&path, &run.disc1)?;
    written.push(path);

    if let Some(disc2) = &run.disc2 {
        let path = dir.join(&names.disc2_points);
        write_points_csv(&path, disc2)?;
        written.push(path);
    }

    let path = dir.join(&names.equations);
    write_text(&path, &format_equations(&run.config))?;
    written.push(path);

    let path = dir.join(&names.parameters);
    write_text(&path, &format_parameters_now(&run.config))?;
    written.push(path);

    for path in &written {
        info!(path = %path.display(), "wrote export");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_design;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cyclo_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn points_csv_layout() {
        let points = vec![ProfilePoint::new(15.9, 0.0), ProfilePoint::new(-1.25, 3.0000004)];
        let txt = points_csv(&points);
        assert_eq!(txt, "x_mm,y_mm\n15.900000,0.000000\n-1.250000,3.000000");
        assert_eq!(points_csv(&[]), "x_mm,y_mm");
    }

    #[test]
    fn points_survive_a_round_trip_within_half_a_micron() {
        let run = run_design(&DesignConfig::default());
        let txt = points_csv(&run.disc1);
        let parsed = parse_points_csv(txt.as_bytes()).unwrap();

        assert_eq!(parsed.len(), run.disc1.len());
        for (a, b) in run.disc1.iter().zip(&parsed) {
            assert!((a.x - b.x).abs() <= 5e-7 + 1e-12, "{a:?} vs {b:?}");
            assert!((a.y - b.y).abs() <= 5e-7 + 1e-12, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn non_finite_rows_are_kept() {
        let points = vec![ProfilePoint::new(f64::NAN, 1.0)];
        let parsed = parse_points_csv(points_csv(&points).as_bytes()).unwrap();
        assert!(parsed[0].x.is_nan());
        assert_eq!(parsed[0].y, 1.0);
    }

    #[test]
    fn parse_rejects_wrong_header_and_bad_values() {
        let err = parse_points_csv("x,y\n1,2".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = parse_points_csv("x_mm,y_mm\n1.0,abc".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn export_names_follow_parameters() {
        let mut config = DesignConfig::default();
        config.discs.dual_disc = true;
        let names = ExportNames::for_design(&config);
        assert_eq!(names.disc1_points, "disc1_points_N10_R20.0_Rr3.0_E1.1.csv");
        assert_eq!(names.disc2_points, "disc2_points_N10_R20.0_Rr3.0_E1.1_phase180.0.csv");
        assert_eq!(names.equations, "solidworks_equations_N10_R20.0_Rr3.0_E1.1.txt");
        assert_eq!(names.parameters, "parameters_N10_R20.0_Rr3.0_E1.1.txt");
    }

    #[test]
    fn bundle_writes_disc2_only_when_dual() {
        let dir = scratch_dir("bundle_single");
        let run = run_design(&DesignConfig::default());
        let written = write_export_bundle(&dir, &run).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));

        let back = read_points_csv(&written[0]).unwrap();
        assert_eq!(back.len(), 1200);

        let mut config = DesignConfig::default();
        config.discs.dual_disc = true;
        let dir2 = scratch_dir("bundle_dual");
        let written = write_export_bundle(&dir2, &run_design(&config)).unwrap();
        assert_eq!(written.len(), 4);
        assert!(written[1].file_name().unwrap().to_string_lossy().starts_with("disc2_points_"));

        let _ = fs::remove_dir_all(&dir);
        let _ = fs::remove_dir_all(&dir2);
    }
}
