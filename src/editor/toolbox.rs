//! Floating toolbox shown above a single selected node.

use super::style::COLOR_PALETTE;
use super::utils::{color_to_hex, parse_hex_color};
use crate::graph::NodeId;
use crate::node::ToolboxItems;
use egui::{Align2, Color32, Rect, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub enum ToolboxAction {
    ToggleColorPicker,
    ChangeColor(Color32),
    RequestTagging,
    RequestSuggestion,
}

#[allow(clippy::too_many_arguments)]
pub fn show_toolbox(
    ctx: &egui::Context,
    node_id: &NodeId,
    anchor: Rect,
    items: ToolboxItems,
    current: Color32,
    picker_open: bool,
    hex_buffer: &mut String,
    zoom: f32,
) -> Vec<ToolboxAction> {
    let mut actions = Vec::new();
    egui::Area::new(egui::Id::new(("node_toolbox", node_id.as_str())))
        .order(egui::Order::Foreground)
        .fixed_pos(anchor.center_top() - Vec2::new(0.0, 8.0 * zoom))
        .pivot(Align2::CENTER_BOTTOM)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    if items.color {
                        let swatch = egui::Button::new("")
                            .fill(current)
                            .min_size(Vec2::splat(18.0));
                        if ui.add(swatch).on_hover_text("Color").clicked() {
                            actions.push(ToolboxAction::ToggleColorPicker);
                        }
                    }
                    if items.tagging && ui.button("🏷 Tag").on_hover_text("Tag this node").clicked() {
                        actions.push(ToolboxAction::RequestTagging);
                    }
                    if items.suggest_label
                        && ui.button("✨ Suggest").on_hover_text("Suggest a label").clicked()
                    {
                        actions.push(ToolboxAction::RequestSuggestion);
                    }
                });

                if items.color && picker_open {
                    ui.separator();
                    ui.horizontal_wrapped(|ui| {
                        for color in COLOR_PALETTE {
                            let swatch = egui::Button::new("").fill(color).min_size(Vec2::splat(20.0));
                            if ui.add(swatch).clicked() {
                                *hex_buffer = color_to_hex(color);
                                actions.push(ToolboxAction::ChangeColor(color));
                            }
                        }
                    });
                    ui.horizontal(|ui| {
                        let edit = ui.add(egui::TextEdit::singleline(hex_buffer).desired_width(64.0));
                        if edit.changed() {
                            if let Some(color) = parse_hex_color(hex_buffer) {
                                actions.push(ToolboxAction::ChangeColor(color));
                            }
                        }
                        let mut custom = current;
                        if ui.color_edit_button_srgba(&mut custom).changed() {
                            *hex_buffer = color_to_hex(custom);
                            actions.push(ToolboxAction::ChangeColor(custom));
                        }
                    });
                }
            });
        });
    actions
}
