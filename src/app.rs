//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the design (defaults -> design file -> flags)
//! - runs the design pipeline
//! - prints reports/plots
//! - writes optional exports

use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DesignArgs, DesignCmdArgs, Disc, PlotCmdArgs, PointsArgs};
use crate::domain::DesignConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `cyclo` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may provide CYCLO_CONFIG / CYCLO_EXPORT_DIR / RUST_LOG.
    dotenvy::dotenv().ok();

    // We want `cyclo` and `cyclo -n 12` to behave like `cyclo tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; log lines would corrupt the screen.
    if !matches!(cli.command, Command::Tui(_)) {
        init_logging();
    }

    match cli.command {
        Command::Design(args) => handle_design(args),
        Command::Equations(args) => handle_equations(&args),
        Command::Params(args) => handle_params(&args),
        Command::Points(args) => handle_points(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(&args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cyclo_rotor=info"));
    // Ignore the error if a subscriber is already installed (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn handle_design(args: DesignCmdArgs) -> Result<(), AppError> {
    let config = design_config_from_args(&args.design)?;
    let run = pipeline::run_design(&config);

    println!("{}", crate::report::format_run_summary(&run));

    if !args.no_plot {
        let plot = crate::plot::render_design_plot(&run, args.plot.width, args.plot.height);
        println!("{plot}");
    }

    if let Some(dir) = &args.out_dir {
        let written = crate::io::export::write_export_bundle(dir, &run)?;
        println!("Exports:");
        for path in written {
            println!("- {}", path.display());
        }
    }

    Ok(())
}

fn handle_equations(args: &DesignArgs) -> Result<(), AppError> {
    let config = design_config_from_args(args)?;
    println!("{}", crate::report::format_equations(&config));
    Ok(())
}

fn handle_params(args: &DesignArgs) -> Result<(), AppError> {
    let config = design_config_from_args(args)?;
    let run = pipeline::run_design(&config);
    println!("{}", crate::report::format_parameters_now(&config));
    let warnings = crate::report::format_warnings(&run.warnings);
    if !warnings.is_empty() {
        println!();
        print!("{warnings}");
    }
    Ok(())
}

fn handle_points(args: PointsArgs) -> Result<(), AppError> {
    let config = design_config_from_args(&args.design)?;
    let run = pipeline::run_design(&config);

    let points = match args.disc {
        Disc::One => &run.disc1,
        Disc::Two => run
            .disc2
            .as_ref()
            .ok_or_else(|| AppError::new(2, "Disc 2 points requested but --dual-disc is not enabled."))?,
    };

    match &args.output {
        Some(path) => {
            crate::io::export::write_points_csv(path, points)?;
            info!(path = %path.display(), rows = points.len(), "wrote points CSV");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", crate::io::export::points_csv(points))
                .map_err(|e| AppError::new(2, format!("Failed to write points to stdout: {e}")))?;
        }
    }
    Ok(())
}

fn handle_plot(args: PlotCmdArgs) -> Result<(), AppError> {
    let config = design_config_from_args(&args.design)?;
    let run = pipeline::run_design(&config);
    let plot = crate::plot::render_design_plot(&run, args.plot.width, args.plot.height);
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: &DesignArgs) -> Result<(), AppError> {
    let config = design_config_from_args(args)?;
    crate::tui::run(config)
}

/// Resolve the design for a run: defaults, then the design file, then flags.
///
/// The result is range-checked; the resolved design is optionally saved.
pub fn design_config_from_args(args: &DesignArgs) -> Result<DesignConfig, AppError> {
    let base = match &args.config {
        Some(path) => {
            let design = crate::io::design::read_design_json(path)?;
            info!(path = %path.display(), "loaded design file");
            design
        }
        None => DesignConfig::default(),
    };

    let config = apply_overrides(base, args);
    config.validate()?;

    if let Some(path) = &args.save_config {
        save_design(path, &config)?;
    }

    Ok(config)
}

fn save_design(path: &Path, config: &DesignConfig) -> Result<(), AppError> {
    crate::io::design::write_design_json(path, config)?;
    info!(path = %path.display(), "saved design file");
    Ok(())
}

/// Apply explicitly supplied flags on top of `base`.
pub fn apply_overrides(mut config: DesignConfig, args: &DesignArgs) -> DesignConfig {
    if let Some(v) = args.rollers {
        config.rotor.rollers = v;
    }
    if let Some(v) = args.pitch_radius {
        config.rotor.pitch_radius = v;
    }
    if let Some(v) = args.roller_radius {
        config.rotor.roller_radius = v;
    }
    if let Some(v) = args.eccentricity {
        config.rotor.eccentricity = v;
    }
    if let Some(v) = args.out_pin_circle_radius {
        config.holes.circle_radius = v;
    }
    if let Some(v) = args.out_pin_count {
        config.holes.count = v;
    }
    if let Some(v) = args.out_pin_diameter {
        config.holes.pin_diameter = v;
    }
    if let Some(v) = args.hole_clearance {
        config.holes.clearance = v;
    }
    // A flag can only switch dual disc on; a design file may already have it on.
    if args.dual_disc {
        config.discs.dual_disc = true;
    }
    if let Some(v) = args.disc2_phase_deg {
        config.discs.disc2_phase_deg = v;
    }
    if let Some(v) = args.samples {
        config.sweep.sample_count = v;
    }
    if let Some(v) = args.epsilon {
        config.sweep.epsilon = v;
    }
    config
}

/// Rewrite argv so `cyclo` defaults to `cyclo tui`.
///
/// Rules:
/// - `cyclo`                      -> `cyclo tui`
/// - `cyclo -n 12 ...`            -> `cyclo tui -n 12 ...`
/// - `cyclo --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "design" | "equations" | "params" | "points" | "plot" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
