use crate::models::chart::{Color, PieLayout};

use super::surface::{DrawingSurface, TextStyle};

pub const LEGEND_TEXT_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);
pub const LEGEND_FONT_SIZE: f64 = 14.0;

/// Clear the surface and draw the pie plus its legend.
///
/// With no layout (no data) the surface is only cleared. Returns whether
/// anything was drawn.
pub fn draw_pie_chart<S: DrawingSurface>(surface: &mut S, layout: Option<&PieLayout>) -> bool {
    surface.clear();
    let Some(layout) = layout else {
        return false;
    };

    for wedge in &layout.wedges {
        surface.fill_wedge(
            layout.center,
            layout.radius,
            wedge.start_angle,
            wedge.end_angle(),
            wedge.color,
        );
    }

    let style = TextStyle::new(LEGEND_FONT_SIZE, LEGEND_TEXT_COLOR);
    let swatch = crate::services::chart_service::LEGEND_SWATCH;
    for entry in &layout.legend {
        surface.fill_rect(entry.swatch, swatch, swatch, entry.color);
        surface.draw_text(&entry.text(), entry.label_at, &style);
    }
    true
}
