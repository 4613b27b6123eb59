//! The removable tag badge under a node's label.

use super::style::EditorStyle;
use crate::node::badge_tag;
use egui::{Align2, FontId, Pos2, Rect, Sense, Vec2};

/// Badge height in graph units.
pub const TAG_BADGE_HEIGHT: f32 = 18.0;

/// Draws the first tag as a badge `width` screen pixels wide, centred on `top_center`.
///
/// Returns `None` without drawing anything when there are no tags.
pub fn show_tag_badge(
    ui: &egui::Ui,
    id: egui::Id,
    top_center: Pos2,
    width: f32,
    tags: &[String],
    style: &EditorStyle,
    zoom: f32,
) -> Option<egui::Response> {
    let tag = badge_tag(tags)?;
    let rect = Rect::from_min_size(
        Pos2::new(top_center.x - width * 0.5, top_center.y),
        Vec2::new(width, TAG_BADGE_HEIGHT * zoom),
    );
    let response = ui
        .interact(rect, id, Sense::click())
        .on_hover_text("Click to remove tag");

    let background = if response.hovered() {
        style.tag_background.gamma_multiply(0.8)
    } else {
        style.tag_background
    };
    let painter = ui.painter().with_clip_rect(rect);
    painter.rect_filled(rect, 4.0 * zoom, background);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        tag,
        FontId::proportional(11.0 * zoom),
        style.tag_text,
    );
    Some(response)
}
