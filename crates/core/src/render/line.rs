use std::f64::consts::FRAC_PI_2;

use crate::models::chart::{Color, LineChartLayout, Point};

use super::surface::{DrawingSurface, TextStyle};

pub const AXIS_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);
pub const SERIES_COLOR: Color = Color::rgb(0x00, 0x7b, 0xff);
pub const TICK_LENGTH: f64 = 5.0;
pub const MARKER_RADIUS: f64 = 2.0;

/// Clear the surface and draw axes, ticks, the series and its labels.
pub fn draw_line_chart<S: DrawingSurface>(surface: &mut S, layout: &LineChartLayout) {
    surface.clear();

    let small = TextStyle::new(12.0, AXIS_COLOR);
    let origin = layout.origin();
    let top = Point::new(layout.margin, layout.margin);
    let right = Point::new(layout.margin + layout.chart_width, origin.y);
    surface.stroke_polyline(&[top, origin, right], AXIS_COLOR, 1.0);

    for tick in &layout.y_ticks {
        let outer = Point::new(tick.at.x - TICK_LENGTH, tick.at.y);
        surface.stroke_segment(outer, tick.at, AXIS_COLOR, 1.0);
        surface.draw_text(&tick.label, Point::new(5.0, tick.at.y + 4.0), &small);
    }

    for tick in &layout.x_ticks {
        let outer = Point::new(tick.at.x, tick.at.y + TICK_LENGTH);
        surface.stroke_segment(tick.at, outer, AXIS_COLOR, 1.0);
        surface.draw_text(&tick.label, Point::new(tick.at.x - 4.0, origin.y + 18.0), &small);
    }

    surface.stroke_polyline(&layout.points, SERIES_COLOR, 2.0);
    for point in &layout.points {
        surface.fill_circle(*point, MARKER_RADIUS, SERIES_COLOR);
    }

    surface.draw_text(
        &layout.title,
        Point::new(layout.margin, layout.margin - 20.0),
        &TextStyle::new(14.0, AXIS_COLOR),
    );
    surface.draw_text(
        &layout.y_label,
        Point::new(10.0, layout.margin + layout.chart_height / 2.0),
        &small.clone().rotated(-FRAC_PI_2),
    );
    surface.draw_text(
        &layout.x_label,
        Point::new(layout.margin + layout.chart_width / 2.0 - 20.0, origin.y + 35.0),
        &small,
    );
}
