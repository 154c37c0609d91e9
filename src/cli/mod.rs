//! Command-line parsing for the cycloidal rotor generator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the geometry code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cyclo", version, about = "Cycloidal drive rotor profile generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a design: print warnings, a summary and a preview, and optionally export files.
    Design(DesignCmdArgs),
    /// Print the parametric equations for a CAD equation-driven curve.
    Equations(DesignArgs),
    /// Print the parameter summary.
    Params(DesignArgs),
    /// Print (or write) the sampled profile points as CSV.
    Points(PointsArgs),
    /// Print the ASCII preview only.
    Plot(PlotCmdArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying design pipeline as `cyclo design`, but lets
    /// you adjust parameters live in a terminal UI using Ratatui.
    Tui(DesignArgs),
}

/// Design inputs shared by every subcommand.
///
/// Every flag is optional: unset flags fall back to the design file (if any),
/// then to the built-in defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct DesignArgs {
    /// Design JSON to start from (see `--save-config`).
    #[arg(long, value_name = "JSON", env = "CYCLO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the resolved design to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub save_config: Option<PathBuf>,

    /// Number of rollers (N).
    #[arg(short = 'n', long)]
    pub rollers: Option<u32>,

    /// Roller pitch circle radius R (mm).
    #[arg(short = 'R', long)]
    pub pitch_radius: Option<f64>,

    /// Roller radius Rr (mm).
    #[arg(long)]
    pub roller_radius: Option<f64>,

    /// Eccentricity E (mm).
    #[arg(short = 'e', long)]
    pub eccentricity: Option<f64>,

    /// Radius of the output pin circle (mm).
    #[arg(long)]
    pub out_pin_circle_radius: Option<f64>,

    /// Number of output pins.
    #[arg(long)]
    pub out_pin_count: Option<usize>,

    /// Output pin diameter (mm).
    #[arg(long)]
    pub out_pin_diameter: Option<f64>,

    /// Hole clearance added to the pin diameter (mm).
    #[arg(long)]
    pub hole_clearance: Option<f64>,

    /// Generate a second, phase-shifted disc.
    #[arg(long)]
    pub dual_disc: bool,

    /// Phase of disc 2 in degrees [0, 360].
    #[arg(long)]
    pub disc2_phase_deg: Option<f64>,

    /// Number of profile samples [200, 6000].
    #[arg(long)]
    pub samples: Option<usize>,

    /// Angular margin (rad) kept before 2π so the curve is not closed exactly.
    #[arg(long)]
    pub epsilon: Option<f64>,
}

/// Options for `cyclo design`.
#[derive(Debug, Args, Clone)]
pub struct DesignCmdArgs {
    #[command(flatten)]
    pub design: DesignArgs,

    #[command(flatten)]
    pub plot: PlotSize,

    /// Disable the terminal preview.
    #[arg(long)]
    pub no_plot: bool,

    /// Write CSV/TXT exports into this directory.
    #[arg(long, value_name = "DIR", env = "CYCLO_EXPORT_DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Which disc a point table is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Disc {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

/// Options for `cyclo points`.
#[derive(Debug, Args, Clone)]
pub struct PointsArgs {
    #[command(flatten)]
    pub design: DesignArgs,

    /// Disc to export (disc 2 requires `--dual-disc`).
    #[arg(long, value_enum, default_value = "1")]
    pub disc: Disc,

    /// Write to a file instead of stdout.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

/// Options for `cyclo plot`.
#[derive(Debug, Args, Clone)]
pub struct PlotCmdArgs {
    #[command(flatten)]
    pub design: DesignArgs,

    #[command(flatten)]
    pub plot: PlotSize,
}

/// Preview size in terminal cells.
#[derive(Debug, Args, Clone, Copy)]
pub struct PlotSize {
    /// Plot width (columns).
    #[arg(long, default_value_t = 81)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 41)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_design_flags() {
        let cli = Cli::parse_from([
            "cyclo", "design", "-n", "12", "-R", "30", "--roller-radius", "4", "-e", "1.5", "--dual-disc",
            "--no-plot",
        ]);
        let Command::Design(args) = cli.command else {
            panic!("expected design subcommand");
        };
        assert_eq!(args.design.rollers, Some(12));
        assert_eq!(args.design.pitch_radius, Some(30.0));
        assert_eq!(args.design.roller_radius, Some(4.0));
        assert_eq!(args.design.eccentricity, Some(1.5));
        assert!(args.design.dual_disc);
        assert!(args.no_plot);
        assert_eq!(args.plot.width, 81);
    }

    #[test]
    fn points_disc_selector() {
        let cli = Cli::parse_from(["cyclo", "points", "--disc", "2", "--dual-disc"]);
        let Command::Points(args) = cli.command else {
            panic!("expected points subcommand");
        };
        assert_eq!(args.disc, Disc::Two);
        assert!(args.output.is_none());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
