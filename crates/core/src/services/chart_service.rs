use std::f64::consts::{FRAC_PI_2, TAU};

use crate::models::chart::{
    AxisTick, ChartSize, Color, LegendEntry, LineChartLayout, PieLayout, PieWedge, Point,
};
use crate::models::portfolio::Distribution;

/// Gap between the pie and the edge of the surface.
pub const PIE_PADDING: f64 = 10.0;
/// Legend column starts this far from the right edge.
pub const LEGEND_OFFSET_X: f64 = 150.0;
pub const LEGEND_TOP: f64 = 20.0;
pub const LEGEND_ROW_HEIGHT: f64 = 18.0;
pub const LEGEND_SWATCH: f64 = 12.0;

/// Space left around the line chart's plotting area on every side.
pub const LINE_CHART_MARGIN: f64 = 50.0;
/// Number of intervals on the Y axis (six labelled ticks).
pub const Y_TICK_INTERVALS: u32 = 5;
/// Headroom above the highest value.
pub const Y_HEADROOM: f64 = 1.1;

const BASE_PALETTE: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

/// Deterministic slice color for the `index`-th category.
///
/// The first ten come from a fixed qualitative palette; later ones walk
/// the hue circle by the golden angle so neighbours never collide.
pub fn palette_color(index: usize) -> Color {
    if let Some(color) = BASE_PALETTE.get(index) {
        return *color;
    }
    let step = (index - BASE_PALETTE.len()) as f64;
    let hue = (15.0 + step * 137.507_764) % 360.0;
    hsl_to_rgb(hue, 0.55, 0.5)
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Color {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::rgb(channel(r), channel(g), channel(b))
}

/// Computes chart geometry. The numbers live here; drawing lives in `render`.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Lay out the distribution pie.
    ///
    /// Wedges start at 12 o'clock and run clockwise in distribution order.
    /// Returns `None` when there is nothing to draw (empty distribution or
    /// a total that is not strictly positive).
    pub fn pie_layout(&self, size: ChartSize, distribution: &Distribution) -> Option<PieLayout> {
        let total = distribution.total();
        if !(total.is_finite() && total > 0.0) {
            return None;
        }

        let center = Point::new(size.width / 2.0, size.height / 2.0);
        let radius = (size.width.min(size.height) / 2.0 - PIE_PADDING).max(0.0);
        let legend_x = size.width - LEGEND_OFFSET_X;

        let mut wedges = Vec::with_capacity(distribution.len());
        let mut legend = Vec::with_capacity(distribution.len());
        let mut start_angle = -FRAC_PI_2;

        for (idx, entry) in distribution.entries().iter().enumerate() {
            let value = entry.value.max(0.0);
            let share = value / total;
            let sweep = share * TAU;
            let color = palette_color(idx);
            let row_y = LEGEND_TOP + idx as f64 * LEGEND_ROW_HEIGHT;

            wedges.push(PieWedge {
                category: entry.category.clone(),
                value,
                start_angle,
                sweep,
                color,
            });
            legend.push(LegendEntry {
                category: entry.category.clone(),
                color,
                percent: share * 100.0,
                swatch: Point::new(legend_x, row_y),
                label_at: Point::new(legend_x + 20.0, row_y + 10.0),
            });
            start_angle += sweep;
        }

        Some(PieLayout {
            size,
            center,
            radius,
            total,
            wedges,
            legend,
        })
    }

    /// Lay out the projection line chart.
    ///
    /// Points are spread evenly by index over the full chart width; X ticks
    /// mark whole years. A single point sits on the Y axis, and an all-zero
    /// series keeps a unit Y scale so nothing divides by zero.
    pub fn line_layout(&self, size: ChartSize, values: &[f64], duration_years: u32) -> LineChartLayout {
        let margin = LINE_CHART_MARGIN;
        let chart_width = (size.width - 2.0 * margin).max(0.0);
        let chart_height = (size.height - 2.0 * margin).max(0.0);
        let bottom = margin + chart_height;

        let peak = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        let max_y = if peak.is_finite() && peak > 0.0 {
            peak * Y_HEADROOM
        } else {
            1.0
        };

        let y_ticks = (0..=Y_TICK_INTERVALS)
            .map(|i| {
                let fraction = f64::from(i) / f64::from(Y_TICK_INTERVALS);
                AxisTick {
                    at: Point::new(margin, bottom - fraction * chart_height),
                    label: format!("{:.0}", (max_y * fraction).round()),
                }
            })
            .collect();

        let years = duration_years.max(1);
        let x_ticks = (0..=years)
            .map(|i| AxisTick {
                at: Point::new(margin + f64::from(i) / f64::from(years) * chart_width, bottom),
                label: i.to_string(),
            })
            .collect();

        let last_index = values.len().saturating_sub(1);
        let points = values
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let x = if last_index == 0 {
                    margin
                } else {
                    margin + idx as f64 / last_index as f64 * chart_width
                };
                let y = bottom - (value / max_y) * chart_height;
                Point::new(x, y)
            })
            .collect();

        LineChartLayout {
            size,
            margin,
            chart_width,
            chart_height,
            max_y,
            y_ticks,
            x_ticks,
            points,
            title: format!("Monthly projection over {duration_years} years"),
            y_label: "Amount (€)".to_string(),
            x_label: "Years".to_string(),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
