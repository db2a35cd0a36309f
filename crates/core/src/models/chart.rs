use serde::{Deserialize, Serialize};

/// A position on the drawing surface (origin top-left, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Width × height of a chart surface, in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
}

impl ChartSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ── Pie chart ───────────────────────────────────────────────────────

/// One filled sector of the pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieWedge {
    pub category: String,
    pub value: f64,
    /// Start angle in radians (0 = 3 o'clock, clockwise positive)
    pub start_angle: f64,
    /// Angular extent in radians
    pub sweep: f64,
    pub color: Color,
}

impl PieWedge {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }
}

/// One legend row: swatch + "{category} ({percent}%)".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub category: String,
    pub color: Color,
    /// Share of the total, 0–100
    pub percent: f64,
    /// Top-left corner of the swatch
    pub swatch: Point,
    /// Baseline position of the label
    pub label_at: Point,
}

impl LegendEntry {
    /// Share with one decimal, e.g. "50.0%"
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }

    /// Full legend text, e.g. "ETF (50.0%)"
    pub fn text(&self) -> String {
        format!("{} ({})", self.category, self.percent_label())
    }
}

/// Computed pie geometry, independent of any drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieLayout {
    pub size: ChartSize,
    pub center: Point,
    pub radius: f64,
    pub total: f64,
    pub wedges: Vec<PieWedge>,
    pub legend: Vec<LegendEntry>,
}

// ── Line chart ──────────────────────────────────────────────────────

/// A tick mark with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Where the tick meets the axis
    pub at: Point,
    pub label: String,
}

/// Computed line-chart geometry, independent of any drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChartLayout {
    pub size: ChartSize,
    pub margin: f64,
    pub chart_width: f64,
    pub chart_height: f64,
    /// Upper bound of the Y scale (lower bound is 0)
    pub max_y: f64,
    pub y_ticks: Vec<AxisTick>,
    pub x_ticks: Vec<AxisTick>,
    /// Data points in surface coordinates, in series order
    pub points: Vec<Point>,
    pub title: String,
    pub y_label: String,
    pub x_label: String,
}

impl LineChartLayout {
    /// Bottom-left corner of the plotting area.
    pub fn origin(&self) -> Point {
        Point::new(self.margin, self.margin + self.chart_height)
    }
}
