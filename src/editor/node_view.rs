//! Immediate-mode views for custom and magic nodes.
//!
//! Views never touch the graph. They report what happened as [`NodeEvent`]s
//! and the editor applies them after the frame's nodes are drawn.

use super::style::EditorStyle;
use super::tag_badge::{TAG_BADGE_HEIGHT, show_tag_badge};
use super::toolbox::{ToolboxAction, show_toolbox};
use super::utils::{color_to_hex, contrast_text_color, draw_dashed_rect};
use crate::context::FlowContext;
use crate::graph::{CustomNodeData, HandleId, HandleSide, MagicNodeData, Node, NodeId};
use crate::magic::MAGIC_NODE_SIZE;
use crate::node::{HARDCODED_NODE_SIZE, NodeFlags, ToolboxItems, badge_tag, node_width_estimation};
use crate::viewport::Viewport;
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};

/// Inner padding around the label, graph units.
const PADDING: Vec2 = Vec2::new(16.0, 10.0);
const TAG_GAP: f32 = 4.0;
/// Side of the square around a handle that reacts to the pointer, graph units.
pub const HANDLE_HITBOX: f32 = 16.0;
/// Enlarged hitbox for the target handle while a connection is being dragged.
const TARGET_HITBOX: f32 = 28.0;
const CORNER_RADIUS: f32 = 6.0;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeEvent {
    Clicked,
    /// Moved by this much, graph units.
    Dragged(Vec2),
    StartEditing,
    LabelCommitted(String),
    /// Edit mode left with Escape; the typed text is dropped.
    LabelEditCancelled,
    ChangeColor(Color32),
    RemoveTags,
    RequestTagging,
    RequestSuggestion,
    ConnectionStarted { handle: HandleId, side: HandleSide },
    /// Measured size differs from the stored one.
    Measured(Vec2),
}

/// Widget state that outlives a single frame.
#[derive(Debug, Default)]
pub struct NodeViewState {
    pub color_picker_for: Option<NodeId>,
    pub hex_buffer: String,
    /// Text of the label currently in edit mode.
    pub label_buffer: Option<(NodeId, String)>,
}

/// Measured geometry of a custom node, graph units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CustomNodeLayout {
    pub size: Vec2,
    pub label_size: Vec2,
}

impl CustomNodeLayout {
    pub fn from_label_size(label: &str, label_size: Vec2, has_tag: bool) -> Self {
        let width = node_width_estimation(label).max(label_size.x + PADDING.x * 2.0);
        let mut height = HARDCODED_NODE_SIZE.y.max(label_size.y + PADDING.y * 2.0);
        if has_tag {
            height += TAG_BADGE_HEIGHT + TAG_GAP;
        }
        Self {
            size: Vec2::new(width, height),
            label_size,
        }
    }
}

/// Where a handle sits on a node's screen rectangle.
pub fn handle_screen_pos(rect: Rect, side: HandleSide) -> Pos2 {
    match side {
        HandleSide::Source => rect.left_center(),
        HandleSide::Target => rect.right_center(),
    }
}

fn selection_outline(painter: &egui::Painter, rect: Rect, style: &EditorStyle, zoom: f32) {
    painter.rect_stroke(
        rect.expand(3.0 * zoom),
        CORNER_RADIUS * zoom,
        Stroke::new(2.0 * zoom, style.selected_stroke),
        StrokeKind::Outside,
    );
}

/// Click and drag handling shared by both node kinds.
fn body_events(
    response: &egui::Response,
    events: &mut Vec<NodeEvent>,
    meta_pressed: bool,
    zoom: f32,
) {
    if response.dragged() && !meta_pressed {
        events.push(NodeEvent::Dragged(response.drag_delta() / zoom));
    }
    if response.clicked() {
        events.push(NodeEvent::Clicked);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn show_custom_node(
    ui: &mut egui::Ui,
    state: &mut NodeViewState,
    node: &Node,
    data: &CustomNodeData,
    ctx: &FlowContext,
    style: &EditorStyle,
    viewport: &Viewport,
    canvas_offset: Pos2,
) -> Vec<NodeEvent> {
    let mut events = Vec::new();
    let flags = NodeFlags::derive(&node.id, ctx);
    let zoom = ctx.zoom;
    let painter = ui.painter().clone();
    let text_color = contrast_text_color(data.style_background);

    if data.editing && state.label_buffer.as_ref().is_none_or(|(id, _)| id != &node.id) {
        state.label_buffer = Some((node.id.clone(), data.label.clone()));
    }
    let label_text = match &state.label_buffer {
        Some((id, buffer)) if data.editing && id == &node.id => buffer.clone(),
        _ => data.label.clone(),
    };

    let measured = painter
        .layout_no_wrap(label_text.clone(), FontId::proportional(style.font_size), text_color)
        .size();
    let layout = CustomNodeLayout::from_label_size(
        &label_text,
        measured,
        badge_tag(&data.tags).is_some(),
    );
    if layout.size != node.size() {
        events.push(NodeEvent::Measured(layout.size));
    }
    let rect = viewport.rect_to_screen(Rect::from_min_size(node.position, layout.size), canvas_offset);

    // Body first so the label editor, badge and handles placed later win the pointer.
    let port_zone = HANDLE_HITBOX * 0.5 * zoom;
    let body = ui.interact(
        rect.shrink2(Vec2::new(port_zone, 0.0)),
        ui.id().with(node.id.as_str()).with("body"),
        Sense::click_and_drag(),
    );
    if ctx.meta_pressed && body.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::Crosshair);
    }
    if ctx.meta_pressed && body.drag_started() {
        events.push(NodeEvent::ConnectionStarted {
            handle: data.source_handle_id.clone(),
            side: HandleSide::Source,
        });
    }
    if body.double_clicked() && !data.editing {
        events.push(NodeEvent::StartEditing);
    } else {
        body_events(&body, &mut events, ctx.meta_pressed, zoom);
    }

    // Content
    let radius = CORNER_RADIUS * zoom;
    painter.rect_filled(rect, radius, data.style_background);
    let border = if flags.is_explained_by_magic_node {
        Some(Stroke::new(2.5 * zoom, style.explained_highlight))
    } else if flags.is_target {
        Some(Stroke::new(2.0 * zoom, style.target_highlight))
    } else if data.generated.temporary {
        None
    } else {
        Some(Stroke::new(1.0 * zoom, style.node_border))
    };
    if let Some(stroke) = border {
        painter.rect_stroke(rect, radius, stroke, StrokeKind::Inside);
    }
    if data.generated.temporary {
        draw_dashed_rect(&painter, rect, 6.0 * zoom, Stroke::new(1.5 * zoom, style.temporary_stroke));
    }
    if node.selected {
        selection_outline(&painter, rect, style, zoom);
    }

    // Label
    let badge_space = if badge_tag(&data.tags).is_some() {
        (TAG_BADGE_HEIGHT + TAG_GAP) * zoom
    } else {
        0.0
    };
    let label_rect = Rect::from_min_max(
        rect.min + PADDING * zoom,
        Pos2::new(rect.max.x - PADDING.x * zoom, rect.max.y - PADDING.y * zoom - badge_space),
    );
    let font = FontId::proportional(style.font_size * zoom);
    if data.editing {
        if let Some((_, buffer)) = state.label_buffer.as_mut() {
            let edit = ui.put(
                label_rect,
                egui::TextEdit::singleline(buffer)
                    .font(font.clone())
                    .text_color(text_color)
                    .frame(false)
                    .desired_width(label_rect.width()),
            );
            if !edit.has_focus() && !edit.lost_focus() {
                edit.request_focus();
            }
            if edit.lost_focus() {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    events.push(NodeEvent::LabelEditCancelled);
                } else {
                    events.push(NodeEvent::LabelCommitted(buffer.clone()));
                }
                state.label_buffer = None;
            }
        }
    } else if data.label.is_empty() {
        painter.text(
            label_rect.center(),
            Align2::CENTER_CENTER,
            "Double-click to edit",
            font.clone(),
            text_color.gamma_multiply(0.4),
        );
    } else {
        painter.text(label_rect.center(), Align2::CENTER_CENTER, &data.label, font.clone(), text_color);
    }

    // Tag badge follows the rendered label width.
    let badge_width = (layout.label_size.x * zoom).ceil().max(24.0 * zoom);
    let badge_top = Pos2::new(rect.center().x, rect.max.y - PADDING.y * zoom - TAG_BADGE_HEIGHT * zoom);
    if let Some(badge) = show_tag_badge(
        ui,
        ui.id().with(node.id.as_str()).with("tag"),
        badge_top,
        badge_width,
        &data.tags,
        style,
        zoom,
    ) {
        if badge.clicked() {
            events.push(NodeEvent::RemoveTags);
        }
    }

    // Handles
    for side in [HandleSide::Source, HandleSide::Target] {
        let pos = handle_screen_pos(rect, side);
        let emphasized = flags.is_target && side == HandleSide::Target;
        let hitbox = if emphasized { TARGET_HITBOX } else { HANDLE_HITBOX } * zoom;
        let handle = data.handle(side);
        let response = ui.interact(
            Rect::from_center_size(pos, Vec2::splat(hitbox)),
            ui.id().with(handle.as_str()),
            Sense::drag(),
        );
        if response.drag_started() {
            events.push(NodeEvent::ConnectionStarted {
                handle: handle.clone(),
                side,
            });
        }
        let radius = if emphasized || response.hovered() { 6.0 } else { 4.0 } * zoom;
        let fill = if emphasized { style.target_highlight } else { style.handle };
        painter.circle(pos, radius, fill, Stroke::new(1.5 * zoom, Color32::WHITE));
    }

    // Toolbox
    let items = ToolboxItems::for_node(data, node.selected, &flags);
    if items.is_visible() {
        let picker_open = state.color_picker_for.as_ref() == Some(&node.id);
        let actions = show_toolbox(
            ui.ctx(),
            &node.id,
            rect,
            items,
            data.style_background,
            picker_open,
            &mut state.hex_buffer,
            zoom,
        );
        for action in actions {
            match action {
                ToolboxAction::ToggleColorPicker => {
                    if picker_open {
                        state.color_picker_for = None;
                    } else {
                        state.color_picker_for = Some(node.id.clone());
                        state.hex_buffer = color_to_hex(data.style_background);
                    }
                }
                ToolboxAction::ChangeColor(color) => events.push(NodeEvent::ChangeColor(color)),
                ToolboxAction::RequestTagging => events.push(NodeEvent::RequestTagging),
                ToolboxAction::RequestSuggestion => events.push(NodeEvent::RequestSuggestion),
            }
        }
    } else if state.color_picker_for.as_ref() == Some(&node.id) {
        state.color_picker_for = None;
    }

    events
}

pub fn show_magic_node(
    ui: &mut egui::Ui,
    node: &Node,
    data: &MagicNodeData,
    ctx: &FlowContext,
    style: &EditorStyle,
    viewport: &Viewport,
    canvas_offset: Pos2,
) -> Vec<NodeEvent> {
    let mut events = Vec::new();
    let zoom = ctx.zoom;
    if node.size() != MAGIC_NODE_SIZE {
        events.push(NodeEvent::Measured(MAGIC_NODE_SIZE));
    }
    let rect = viewport.rect_to_screen(Rect::from_min_size(node.position, MAGIC_NODE_SIZE), canvas_offset);
    let body = ui.interact(rect, ui.id().with(node.id.as_str()).with("body"), Sense::click_and_drag());
    body_events(&body, &mut events, false, zoom);

    let painter = ui.painter().clone();
    let radius = CORNER_RADIUS * zoom;
    painter.rect_filled(rect, radius, style.magic_background);
    if data.generated.temporary {
        draw_dashed_rect(&painter, rect, 6.0 * zoom, Stroke::new(1.5 * zoom, style.explained_highlight));
    } else {
        painter.rect_stroke(
            rect,
            radius,
            Stroke::new(1.0 * zoom, style.explained_highlight),
            StrokeKind::Inside,
        );
    }
    if node.selected {
        selection_outline(&painter, rect, style, zoom);
    }

    let inner = rect.shrink(PADDING.y * zoom);
    let text_color = contrast_text_color(style.magic_background);
    painter.text(
        inner.left_top(),
        Align2::LEFT_TOP,
        "✨ Explanation",
        FontId::proportional(style.font_size * zoom),
        style.explained_highlight,
    );
    let summary = if data.summary.is_empty() {
        "Summary pending"
    } else {
        data.summary.as_str()
    };
    let galley = painter.layout(
        summary.to_string(),
        FontId::proportional((style.font_size - 2.0) * zoom),
        text_color,
        inner.width(),
    );
    painter
        .with_clip_rect(rect)
        .galley(inner.left_top() + Vec2::new(0.0, 22.0 * zoom), galley, text_color);
    let explained = data.source_components.nodes.len();
    let footer = if ctx.selected_components.nodes.contains(&node.id) {
        format!("Explains {explained} highlighted node(s)")
    } else {
        format!("Explains {explained} node(s)")
    };
    painter.text(
        inner.left_bottom(),
        Align2::LEFT_BOTTOM,
        footer,
        FontId::proportional(11.0 * zoom),
        text_color.gamma_multiply(0.6),
    );

    events
}
