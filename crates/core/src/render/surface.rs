use crate::models::chart::{Color, Point};

/// Text drawing options.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in surface units
    pub size: f64,
    pub color: Color,
    /// Rotation in radians around the anchor point (clockwise positive)
    pub rotation: f64,
}

impl TextStyle {
    pub fn new(size: f64, color: Color) -> Self {
        Self {
            size,
            color,
            rotation: 0.0,
        }
    }

    pub fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

/// The handful of 2D primitives the chart renderers need.
///
/// Coordinates have their origin top-left with y growing downwards; angles
/// are radians measured clockwise from 3 o'clock, as on an HTML canvas.
pub trait DrawingSurface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Filled circular sector from `start` to `end`.
    fn fill_wedge(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Color);

    fn fill_rect(&mut self, top_left: Point, width: f64, height: f64, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    /// Open polyline through `points`.
    fn stroke_polyline(&mut self, points: &[Point], color: Color, line_width: f64);

    /// Straight segment from `from` to `to`.
    fn stroke_segment(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        self.stroke_polyline(&[from, to], color, line_width);
    }

    /// Text whose baseline starts at `anchor`.
    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle);
}
