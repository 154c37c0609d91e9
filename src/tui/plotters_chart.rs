//! Plotters-powered rotor preview widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Line colors, shared with the legend drawn by the TUI.
pub const DISC1_RGB: (u8, u8, u8) = (0, 255, 255);
pub const DISC2_RGB: (u8, u8, u8) = (255, 0, 255);
pub const ROLLER_RGB: (u8, u8, u8) = (255, 255, 0);
pub const HOLE_RGB: (u8, u8, u8) = (0, 255, 0);

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call; polylines are
/// already split at non-finite points.
pub struct RotorPlottersChart<'a> {
    /// Disc 1 profile segments.
    pub disc1: &'a [Vec<(f64, f64)>],
    /// Disc 2 profile segments (empty for single-disc designs).
    pub disc2: &'a [Vec<(f64, f64)>],
    /// One closed polyline per roller.
    pub rollers: &'a [Vec<(f64, f64)>],
    /// One closed polyline per output hole.
    pub holes: &'a [Vec<(f64, f64)>],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for RotorPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("x (mm)")
                .y_desc("y (mm)")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let rgb = |(r, g, b): (u8, u8, u8)| RGBColor(r, g, b);

            // Holes and rollers first so the profiles stay on top.
            //
            // Circles are drawn as polylines: `plotters-ratatui-backend` maps
            // `Circle` marker radii incorrectly (pixel radius -> normalized canvas
            // units), which produces huge circles.
            for hole in self.holes {
                chart.draw_series(LineSeries::new(hole.iter().copied(), &rgb(HOLE_RGB)))?;
            }
            for roller in self.rollers {
                chart.draw_series(LineSeries::new(roller.iter().copied(), &rgb(ROLLER_RGB)))?;
            }
            for segment in self.disc2 {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &rgb(DISC2_RGB)))?;
            }
            for segment in self.disc1 {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &rgb(DISC1_RGB)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
