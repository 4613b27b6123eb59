//! # Editor Utility Functions
//!
//! Geometry, colour and rendering helpers shared by the canvas widgets.
//!
//! ### Geometry
//! - [`distance_to_segment`]: distance from a point to a line segment
//! - [`cubic_point`]: sample a cubic bezier
//! - [`draw_dashed_line`] / [`draw_dashed_rect`]: dashed outlines
//!
//! ### Colours
//! - [`contrast_text_color`]: readable text colour on a background
//! - [`color_to_hex`] / [`parse_hex_color`]: `#rrggbb` conversion

use egui::{Color32, Pos2, Rect, Stroke};

/// Calculate the distance from a point to a line segment.
pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    if ab.length_sq() < 1e-6 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / ab.length_sq()).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Point at `t` on the cubic bezier `[p0, c1, c2, p3]`.
pub fn cubic_point(points: [Pos2; 4], t: f32) -> Pos2 {
    let it = 1.0 - t;
    (it.powi(3) * points[0].to_vec2()
        + 3.0 * it.powi(2) * t * points[1].to_vec2()
        + 3.0 * it * t.powi(2) * points[2].to_vec2()
        + t.powi(3) * points[3].to_vec2())
    .to_pos2()
}

/// Draw a dashed line on a painter.
pub fn draw_dashed_line(
    painter: &egui::Painter,
    start: Pos2,
    end: Pos2,
    dash_length: f32,
    gap_length: f32,
    stroke: Stroke,
) {
    let dir = end - start;
    let total_length = dir.length();
    if total_length < 0.001 {
        return;
    }

    let unit = dir / total_length;
    let mut pos = 0.0;
    let mut drawing = true;
    while pos < total_length {
        let segment_end = (pos + if drawing { dash_length } else { gap_length }).min(total_length);
        if drawing {
            painter.line_segment([start + unit * pos, start + unit * segment_end], stroke);
        }
        pos = segment_end;
        drawing = !drawing;
    }
}

pub fn draw_dashed_rect(painter: &egui::Painter, rect: Rect, dash_length: f32, stroke: Stroke) {
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    for i in 0..4 {
        draw_dashed_line(
            painter,
            corners[i],
            corners[(i + 1) % 4],
            dash_length,
            dash_length * 0.6,
            stroke,
        );
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text_color(background: Color32) -> Color32 {
    let luminance = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luminance > 150.0 {
        Color32::from_gray(30)
    } else {
        Color32::WHITE
    }
}

pub fn color_to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Parses `#rrggbb` (the `#` is optional). Alpha is ignored.
pub fn parse_hex_color(text: &str) -> Option<Color32> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_segment_clamps_to_endpoints() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Pos2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Pos2::new(13.0, 4.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Pos2::new(0.0, 2.0), a, a), 2.0);
    }

    #[test]
    fn cubic_point_hits_endpoints() {
        let points = [
            Pos2::new(0.0, 0.0),
            Pos2::new(-50.0, 0.0),
            Pos2::new(150.0, 40.0),
            Pos2::new(100.0, 40.0),
        ];
        assert_eq!(cubic_point(points, 0.0), points[0]);
        assert_eq!(cubic_point(points, 1.0), points[3]);
    }

    #[test]
    fn hex_colors_convert_both_ways() {
        let color = Color32::from_rgb(0x11, 0x22, 0x33);
        assert_eq!(color_to_hex(color), "#112233");
        assert_eq!(parse_hex_color("#112233"), Some(color));
        assert_eq!(parse_hex_color("112233"), Some(color));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zz2233"), None);
    }

    #[test]
    fn text_contrasts_with_background() {
        assert_ne!(contrast_text_color(Color32::WHITE), Color32::WHITE);
        assert_eq!(contrast_text_color(Color32::BLACK), Color32::WHITE);
    }
}
