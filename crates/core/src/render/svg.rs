use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::models::chart::{ChartSize, Color, Point};

use super::surface::{DrawingSurface, TextStyle};

const FONT_FAMILY: &str = "Arial, sans-serif";

/// Draws into an in-memory SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(size: ChartSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            body: String::new(),
        }
    }

    /// Elements drawn so far, without the `<svg>` wrapper.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Complete standalone SVG document.
    pub fn to_svg(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">{body}</svg>",
            w = num(self.width),
            h = num(self.height),
            body = self.body,
        )
    }

    fn push(&mut self, element: std::fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = self.body.write_fmt(element);
    }
}

impl DrawingSurface for SvgSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.body.clear();
    }

    fn fill_wedge(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Color) {
        let sweep = end - start;
        if radius <= 0.0 || sweep <= 0.0 {
            return;
        }
        if sweep >= TAU - 1e-9 {
            // An arc cannot start and end on the same point.
            self.fill_circle(center, radius, color);
            return;
        }
        let from = polar(center, radius, start);
        let to = polar(center, radius, end);
        let large_arc = u8::from(sweep > PI);
        self.push(format_args!(
            "<path d=\"M{cx} {cy} L{x1} {y1} A{r} {r} 0 {large_arc} 1 {x2} {y2} Z\" fill=\"{color}\"/>",
            cx = num(center.x),
            cy = num(center.y),
            x1 = num(from.x),
            y1 = num(from.y),
            r = num(radius),
            x2 = num(to.x),
            y2 = num(to.y),
        ));
    }

    fn fill_rect(&mut self, top_left: Point, width: f64, height: f64, color: Color) {
        self.push(format_args!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{color}\"/>",
            num(top_left.x),
            num(top_left.y),
            num(width),
            num(height),
        ));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.push(format_args!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{color}\"/>",
            num(center.x),
            num(center.y),
            num(radius),
        ));
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Color, line_width: f64) {
        if points.is_empty() {
            return;
        }
        let coords = points
            .iter()
            .map(|p| format!("{},{}", num(p.x), num(p.y)))
            .collect::<Vec<_>>()
            .join(" ");
        self.push(format_args!(
            "<polyline points=\"{coords}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{}\"/>",
            num(line_width),
        ));
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        let x = num(anchor.x);
        let y = num(anchor.y);
        let transform = if style.rotation == 0.0 {
            String::new()
        } else {
            format!(" transform=\"rotate({} {x} {y})\"", num(style.rotation.to_degrees()))
        };
        self.push(format_args!(
            "<text x=\"{x}\" y=\"{y}\" font-family=\"{FONT_FAMILY}\" font-size=\"{}\" fill=\"{}\"{transform}>{}</text>",
            num(style.size),
            style.color,
            escape(text),
        ));
    }
}

fn polar(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Compact coordinate: at most two decimals, no trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
