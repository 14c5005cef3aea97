use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use magnolia_map::magnolia::Point;

pub(super) const CANVAS_BACKGROUND: Color32 = Color32::from_rgb(250, 248, 244);
pub(super) const INK: Color32 = Color32::from_rgb(48, 44, 52);
pub(super) const SELECTED: Color32 = Color32::from_rgb(196, 72, 120);
pub(super) const SEARCH_MATCH: Color32 = Color32::from_rgb(64, 140, 210);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| ((a as f32 * (1.0 - amount)) + (b as f32 * amount)) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Faint concentric guides, one per tree depth.
pub(super) fn draw_background(
    painter: &Painter,
    rect: Rect,
    center: Pos2,
    ring_step: f32,
    rings: usize,
) {
    painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);

    if ring_step <= f32::EPSILON {
        return;
    }

    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 110, 130, 28));
    for ring in 1..=rings {
        painter.circle_stroke(center, ring_step * ring as f32, stroke);
    }
}

pub(super) fn to_world(point: Point) -> Vec2 {
    vec2(point.x as f32, point.y as f32)
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    rect.intersects(Rect::from_two_pos(start, end))
}

/// Zoom that fits a map of `extent` world units into `rect` with a margin.
pub(super) fn fit_zoom(rect: Rect, extent: f32) -> f32 {
    if extent <= f32::EPSILON {
        return 1.0;
    }
    let half = rect.width().min(rect.height()) * 0.5;
    ((half - 60.0).max(40.0) / extent).clamp(0.05, 6.0)
}

/// Node colour darkens slightly with depth.
pub(super) fn depth_color(depth: usize, max_depth: usize) -> Color32 {
    let t = if max_depth == 0 {
        0.0
    } else {
        depth as f32 / max_depth as f32
    };
    blend_color(Color32::from_rgb(122, 92, 150), INK, t * 0.6)
}
