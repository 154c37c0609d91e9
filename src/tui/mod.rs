//! Ratatui-based terminal UI.
//!
//! The TUI is the interactive form: a settings panel for every design input,
//! a live preview of the rotor, rollers and output holes, and the advisory
//! warnings. Every change re-runs the whole design pipeline.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::pipeline::{DesignRun, run_design};
use crate::domain::{DesignConfig, ProfilePoint, limits};
use crate::error::AppError;
use crate::plot::{circles, equal_aspect_bounds};

mod plotters_chart;

use plotters_chart::{DISC1_RGB, DISC2_RGB, HOLE_RGB, ROLLER_RGB, RotorPlottersChart};

/// Design file written by the `s` key.
const DESIGN_FILE: &str = "cyclo_design.json";

/// Start the TUI with an initial design.
pub fn run(config: DesignConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Editable inputs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Rollers,
    PitchRadius,
    RollerRadius,
    Eccentricity,
    OutCircleRadius,
    OutCount,
    PinDiameter,
    Clearance,
    DualDisc,
    Disc2Phase,
    Samples,
    Epsilon,
}

impl Field {
    const ALL: [Field; 12] = [
        Field::Rollers,
        Field::PitchRadius,
        Field::RollerRadius,
        Field::Eccentricity,
        Field::OutCircleRadius,
        Field::OutCount,
        Field::PinDiameter,
        Field::Clearance,
        Field::DualDisc,
        Field::Disc2Phase,
        Field::Samples,
        Field::Epsilon,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Rollers => "Rollers (N)",
            Field::PitchRadius => "Pitch radius (R)",
            Field::RollerRadius => "Roller radius (Rr)",
            Field::Eccentricity => "Eccentricity (E)",
            Field::OutCircleRadius => "Out pin circle R",
            Field::OutCount => "Out pin count",
            Field::PinDiameter => "Out pin diameter",
            Field::Clearance => "Hole clearance",
            Field::DualDisc => "Dual disc",
            Field::Disc2Phase => "Disc 2 phase (deg)",
            Field::Samples => "Samples",
            Field::Epsilon => "Epsilon (rad)",
        }
    }

    fn value(self, c: &DesignConfig) -> String {
        match self {
            Field::Rollers => c.rotor.rollers.to_string(),
            Field::PitchRadius => format!("{:.3}", c.rotor.pitch_radius),
            Field::RollerRadius => format!("{:.3}", c.rotor.roller_radius),
            Field::Eccentricity => format!("{:.4}", c.rotor.eccentricity),
            Field::OutCircleRadius => format!("{:.3}", c.holes.circle_radius),
            Field::OutCount => c.holes.count.to_string(),
            Field::PinDiameter => format!("{:.3}", c.holes.pin_diameter),
            Field::Clearance => format!("{:.3}", c.holes.clearance),
            Field::DualDisc => (if c.discs.dual_disc { "on" } else { "off" }).to_string(),
            Field::Disc2Phase => format!("{:.1}", c.discs.disc2_phase_deg),
            Field::Samples => c.sweep.sample_count.to_string(),
            Field::Epsilon => format!("{:.6}", c.sweep.epsilon),
        }
    }
}

/// Step a field by `delta` increments, keeping it inside the form limits.
fn adjust_field(c: &mut DesignConfig, field: Field, delta: i32) {
    let d = delta as f64;
    match field {
        Field::Rollers => {
            let n = (c.rotor.rollers as i64 + delta as i64).max(limits::MIN_ROLLERS as i64);
            c.rotor.rollers = n as u32;
        }
        Field::PitchRadius => {
            c.rotor.pitch_radius = step(c.rotor.pitch_radius, 0.5 * d).max(limits::MIN_PITCH_RADIUS);
        }
        Field::RollerRadius => {
            c.rotor.roller_radius = step(c.rotor.roller_radius, 0.1 * d).max(limits::MIN_ROLLER_RADIUS);
        }
        Field::Eccentricity => {
            c.rotor.eccentricity = step(c.rotor.eccentricity, 0.05 * d).max(limits::MIN_ECCENTRICITY);
        }
        Field::OutCircleRadius => {
            c.holes.circle_radius = step(c.holes.circle_radius, 0.5 * d).max(limits::MIN_OUT_CIRCLE_RADIUS);
        }
        Field::OutCount => {
            let n = (c.holes.count as i64 + delta as i64).max(limits::MIN_OUT_COUNT as i64);
            c.holes.count = n as usize;
        }
        Field::PinDiameter => {
            c.holes.pin_diameter = step(c.holes.pin_diameter, 0.5 * d).max(limits::MIN_PIN_DIAMETER);
        }
        Field::Clearance => {
            c.holes.clearance = step(c.holes.clearance, 0.05 * d).max(limits::MIN_CLEARANCE);
        }
        Field::DualDisc => c.discs.dual_disc = !c.discs.dual_disc,
        Field::Disc2Phase => {
            c.discs.disc2_phase_deg = step(c.discs.disc2_phase_deg, d).rem_euclid(limits::MAX_PHASE_DEG);
        }
        Field::Samples => {
            let n = (c.sweep.sample_count as i64 + 100 * delta as i64)
                .clamp(limits::MIN_SAMPLES as i64, limits::MAX_SAMPLES as i64);
            c.sweep.sample_count = n as usize;
        }
        Field::Epsilon => {
            c.sweep.epsilon = step(c.sweep.epsilon, 1e-4 * d).max(limits::MIN_EPSILON);
        }
    }
}

/// Add and snap to a 1e-9 grid so repeated steps don't accumulate noise
/// (`1.1 + 0.05` should display and export as `1.15`).
fn step(value: f64, by: f64) -> f64 {
    ((value + by) * 1e9).round() / 1e9
}

struct App {
    config: DesignConfig,
    selected_field: usize,
    status: String,
    run: DesignRun,
    export_dir: PathBuf,
}

impl App {
    fn new(config: DesignConfig) -> Self {
        let export_dir = std::env::var_os("CYCLO_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("exports"));
        Self {
            run: run_design(&config),
            config,
            selected_field: 0,
            status: "Ready.".to_string(),
            export_dir,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Enter | KeyCode::Char(' ') if Field::ALL[self.selected_field] == Field::DualDisc => {
                self.adjust(1);
            }
            KeyCode::Char('x') => self.export(),
            KeyCode::Char('s') => self.save_design(),
            _ => {}
        }
        false
    }

    fn adjust(&mut self, delta: i32) {
        let field = Field::ALL[self.selected_field];
        adjust_field(&mut self.config, field, delta);
        self.run = run_design(&self.config);
        self.status = format!("{}: {}", field.label(), field.value(&self.config));
    }

    fn export(&mut self) {
        self.status = match crate::io::export::write_export_bundle(&self.export_dir, &self.run) {
            Ok(paths) => format!("Wrote {} file(s) to {}", paths.len(), self.export_dir.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn save_design(&mut self) {
        let path = PathBuf::from(DESIGN_FILE);
        self.status = match crate::io::design::write_design_json(&path, &self.config) {
            Ok(()) => format!("Saved design to {}", path.display()),
            Err(err) => format!("Save failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let c = &self.config;
        let lines = vec![
            Line::from(vec![
                Span::styled("cyclo", Style::default().fg(Color::Cyan)),
                Span::raw(" - cycloidal drive rotor designer"),
            ]),
            Line::from(Span::styled(
                format!(
                    "N={} R={:.3} Rr={:.3} E={:.4} | lobes={} | hole Ø{:.3} x{} | samples={}",
                    c.rotor.rollers,
                    c.rotor.pitch_radius,
                    c.rotor.roller_radius,
                    c.rotor.eccentricity,
                    c.rotor.rollers.saturating_sub(1),
                    2.0 * self.run.hole_radius,
                    c.holes.count,
                    self.run.disc1.len(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(36)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(Field::ALL.len() as u16 + 2), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_settings(frame, side[0]);
        self.draw_warnings(frame, side[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Rotor preview")
            .title_bottom(legend_line(self.run.disc2.is_some()))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = chart_series(&self.run, inner.width, inner.height);
        let widget = RotorPlottersChart {
            disc1: &series.disc1,
            disc2: &series.disc2,
            rollers: &series.rollers,
            holes: &series.holes,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|f| ListItem::new(format!("{:<19} {}", f.label(), f.value(&self.config))))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_warnings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines: Vec<Line> = if self.run.warnings.is_empty() {
            vec![Line::from(Span::styled("No warnings.", Style::default().fg(Color::Green)))]
        } else {
            self.run
                .warnings
                .iter()
                .map(|w| {
                    Line::from(Span::styled(
                        format!("! {w}"),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ))
                })
                .collect()
        };

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Warnings").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  x export  s save design  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn legend_line(dual: bool) -> Line<'static> {
    let swatch = |(r, g, b): (u8, u8, u8), label: &'static str| {
        vec![
            Span::styled("━━ ", Style::default().fg(Color::Rgb(r, g, b))),
            Span::raw(label),
        ]
    };
    let mut spans = swatch(DISC1_RGB, "disc 1  ");
    if dual {
        spans.extend(swatch(DISC2_RGB, "disc 2  "));
    }
    spans.extend(swatch(ROLLER_RGB, "rollers  "));
    spans.extend(swatch(HOLE_RGB, "output holes"));
    Line::from(spans)
}

/// Everything the chart widget draws, in model coordinates (mm).
struct ChartSeries {
    disc1: Vec<Vec<(f64, f64)>>,
    disc2: Vec<Vec<(f64, f64)>>,
    rollers: Vec<Vec<(f64, f64)>>,
    holes: Vec<Vec<(f64, f64)>>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters, framed with equal aspect for a
/// `cols` x `rows` cell area.
fn chart_series(run: &DesignRun, cols: u16, rows: u16) -> ChartSeries {
    let roller_circles = circles(&run.rollers, run.config.rotor.roller_radius);
    let hole_circles = circles(&run.holes, run.hole_radius);

    let mut all: Vec<&[ProfilePoint]> = vec![run.disc1.as_slice()];
    if let Some(disc2) = &run.disc2 {
        all.push(disc2.as_slice());
    }
    all.extend(roller_circles.iter().map(Vec::as_slice));
    all.extend(hole_circles.iter().map(Vec::as_slice));

    // Leave room for the label areas configured in the widget.
    let plot_cols = (cols as usize).saturating_sub(8).max(10);
    let plot_rows = (rows as usize).saturating_sub(5).max(5);
    let b = equal_aspect_bounds(all.into_iter(), plot_cols, plot_rows);

    ChartSeries {
        disc1: finite_segments(&run.disc1),
        disc2: run.disc2.as_deref().map(finite_segments).unwrap_or_default(),
        rollers: roller_circles.iter().map(|c| to_pairs(c)).collect(),
        holes: hole_circles.iter().map(|c| to_pairs(c)).collect(),
        x_bounds: [b.x_min, b.x_max],
        y_bounds: [b.y_min, b.y_max],
    }
}

fn to_pairs(points: &[ProfilePoint]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.x, p.y)).collect()
}

/// Split a polyline into runs of finite points so gaps stay visible.
fn finite_segments(points: &[ProfilePoint]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for p in points {
        if p.x.is_finite() && p.y.is_finite() {
            current.push((p.x, p.y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_respects_form_limits() {
        let mut c = DesignConfig::default();
        c.rotor.rollers = 3;
        adjust_field(&mut c, Field::Rollers, -1);
        assert_eq!(c.rotor.rollers, 3);

        c.sweep.sample_count = 6000;
        adjust_field(&mut c, Field::Samples, 1);
        assert_eq!(c.sweep.sample_count, 6000);

        c.sweep.epsilon = 1e-4;
        adjust_field(&mut c, Field::Epsilon, -1);
        assert_eq!(c.sweep.epsilon, limits::MIN_EPSILON);

        c.holes.clearance = 0.0;
        adjust_field(&mut c, Field::Clearance, -1);
        assert_eq!(c.holes.clearance, 0.0);

        assert!(c.validate().is_ok());
    }

    #[test]
    fn adjust_steps_without_float_noise() {
        let mut c = DesignConfig::default();
        adjust_field(&mut c, Field::Eccentricity, 1);
        assert_eq!(c.rotor.eccentricity, 1.15);
        adjust_field(&mut c, Field::RollerRadius, 3);
        assert_eq!(c.rotor.roller_radius, 3.3);
    }

    #[test]
    fn phase_wraps_and_dual_toggles() {
        let mut c = DesignConfig::default();
        c.discs.disc2_phase_deg = 0.0;
        adjust_field(&mut c, Field::Disc2Phase, -1);
        assert_eq!(c.discs.disc2_phase_deg, 359.0);
        adjust_field(&mut c, Field::Disc2Phase, 1);
        assert_eq!(c.discs.disc2_phase_deg, 0.0);

        adjust_field(&mut c, Field::DualDisc, 1);
        assert!(c.discs.dual_disc);
        adjust_field(&mut c, Field::DualDisc, -1);
        assert!(!c.discs.dual_disc);
    }

    #[test]
    fn finite_segments_split_on_gaps() {
        let pts = [
            ProfilePoint::new(0.0, 0.0),
            ProfilePoint::new(1.0, 0.0),
            ProfilePoint::new(f64::NAN, 0.0),
            ProfilePoint::new(2.0, f64::INFINITY),
            ProfilePoint::new(3.0, 1.0),
        ];
        let segs = finite_segments(&pts);
        assert_eq!(segs, vec![vec![(0.0, 0.0), (1.0, 0.0)], vec![(3.0, 1.0)]]);
    }

    #[test]
    fn chart_series_frames_every_element() {
        let mut config = DesignConfig::default();
        config.discs.dual_disc = true;
        let run = run_design(&config);
        let s = chart_series(&run, 100, 40);

        assert_eq!(s.disc1.len(), 1);
        assert_eq!(s.disc1[0].len(), run.disc1.len());
        assert_eq!(s.disc2.len(), 1);
        assert_eq!(s.rollers.len(), 10);
        assert_eq!(s.holes.len(), 4);

        // Rollers reach R + Rr = 23mm from the origin.
        assert!(s.x_bounds[0] < -23.0 && s.x_bounds[1] > 23.0);
        assert!(s.y_bounds[0] < -19.0 && s.y_bounds[1] > 19.0);
    }
}
