//! ASCII preview of a design for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output
//!
//! Plot elements (earlier entries win where they overlap):
//! - disc 1 profile: `*`
//! - disc 2 profile: `+`
//! - rollers: `o`
//! - output holes: `.`
//!
//! Terminal cells are roughly twice as tall as they are wide, so one row spans
//! two column-widths of model space to keep circles round.

use std::f64::consts::TAU;

use crate::app::pipeline::DesignRun;
use crate::domain::ProfilePoint;

/// Segments used to approximate roller and hole circles.
const CIRCLE_SEGMENTS: usize = 72;

/// Height/width ratio of a terminal cell.
pub const CELL_ASPECT: f64 = 2.0;

/// Model-space window of a preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Render the rotor profile(s), rollers and output holes.
pub fn render_design_plot(run: &DesignRun, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let rollers = circles(&run.rollers, run.config.rotor.roller_radius);
    let holes = circles(&run.holes, run.hole_radius);

    let mut layers: Vec<(&[ProfilePoint], char)> = vec![(run.disc1.as_slice(), '*')];
    if let Some(disc2) = &run.disc2 {
        layers.push((disc2.as_slice(), '+'));
    }
    for c in &rollers {
        layers.push((c.as_slice(), 'o'));
    }
    for c in &holes {
        layers.push((c.as_slice(), '.'));
    }

    let bounds = equal_aspect_bounds(layers.iter().map(|(pts, _)| *pts), width, height);
    let mut grid = vec![vec![' '; width]; height];
    for (pts, ch) in &layers {
        draw_polyline(&mut grid, pts, bounds, *ch);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Preview: x=[{:.2}, {:.2}] y=[{:.2}, {:.2}] mm (equal aspect)\n",
        bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str(&legend(run.disc2.is_some()));
    out.push('\n');
    out
}

fn legend(dual: bool) -> String {
    if dual {
        "* disc 1  + disc 2  o rollers  . output holes".to_string()
    } else {
        "* disc 1  o rollers  . output holes".to_string()
    }
}

/// Closed polylines approximating a circle of `radius` around each center.
pub fn circles(centers: &[ProfilePoint], radius: f64) -> Vec<Vec<ProfilePoint>> {
    centers
        .iter()
        .map(|c| {
            (0..=CIRCLE_SEGMENTS)
                .map(|i| {
                    let a = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
                    ProfilePoint::new(c.x + radius * a.cos(), c.y + radius * a.sin())
                })
                .collect()
        })
        .collect()
}

/// Window around every finite point, scaled so one unit spans the same
/// physical length on both axes of a `width` x `height` cell grid.
pub fn equal_aspect_bounds<'a>(
    layers: impl Iterator<Item = &'a [ProfilePoint]>,
    width: usize,
    height: usize,
) -> Bounds {
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in layers.flatten() {
        if p.x.is_finite() && p.y.is_finite() {
            x0 = x0.min(p.x);
            x1 = x1.max(p.x);
            y0 = y0.min(p.y);
            y1 = y1.max(p.y);
        }
    }
    if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) {
        (x0, x1, y0, y1) = (-1.0, 1.0, -1.0, 1.0);
    }

    let cx = 0.5 * (x0 + x1);
    let cy = 0.5 * (y0 + y1);
    let cols = width as f64 - 1.0;
    let rows = height as f64 - 1.0;

    // Model units per column, padded by 5%.
    let unit = ((x1 - x0) / cols)
        .max((y1 - y0) / (CELL_ASPECT * rows))
        .max(1e-12)
        * 1.05;
    let half_w = 0.5 * unit * cols;
    let half_h = 0.5 * unit * CELL_ASPECT * rows;

    Bounds {
        x_min: cx - half_w,
        x_max: cx + half_w,
        y_min: cy - half_h,
        y_max: cy + half_h,
    }
}

fn map_x(x: f64, b: Bounds, width: usize) -> usize {
    let u = ((x - b.x_min) / (b.x_max - b.x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, b: Bounds, height: usize) -> usize {
    let u = ((y - b.y_min) / (b.y_max - b.y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Connect consecutive points; non-finite points break the line.
fn draw_polyline(grid: &mut [Vec<char>], points: &[ProfilePoint], b: Bounds, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev: Option<(usize, usize)> = None;
    for p in points {
        if !(p.x.is_finite() && p.y.is_finite()) {
            prev = None;
            continue;
        }
        let x = map_x(p.x, b, width);
        let y = map_y(p.y, b, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, y, ch),
            None => draw_line(grid, x, y, x, y, ch),
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
