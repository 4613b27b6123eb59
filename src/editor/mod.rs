//! # Flow Editor
//!
//! The canvas widget: pans and zooms the view, draws edges and nodes, turns
//! node events into graph updates and runs post-layout work at the end of
//! each frame.
//!
//! ## Submodules
//! - [`node_view`]: custom and magic node widgets
//! - [`tag_badge`]: the removable tag badge
//! - [`toolbox`]: floating per-node actions
//! - [`connection_renderer`]: edge drawing and hit testing
//! - [`style`]: colours and fonts
//! - [`utils`]: geometry and colour helpers

pub mod connection_renderer;
pub mod node_view;
pub mod style;
pub mod tag_badge;
pub mod toolbox;
pub mod utils;

pub use style::EditorStyle;

use crate::context::{FlowContext, MagicExplanations};
use crate::graph::{EdgeId, FlowGraph, HandleId, HandleSide, NodeData, NodeId};
use crate::ids;
use crate::layout::{PostLayoutAction, PostLayoutQueue};
use crate::magic::{self, MagicRequest};
use crate::node::{self, AddedNode, CustomAddNodesOptions};
use crate::viewport::{FitViewOptions, Viewport};
use connection_renderer::{draw_edge, hit_test_edge};
use egui::{Color32, Pos2, Rect, Stroke, StrokeKind, Vec2};
use node_view::{HANDLE_HITBOX, NodeEvent, NodeViewState, handle_screen_pos};

/// A connection being dragged out of a handle.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionDrag {
    pub node_id: NodeId,
    pub handle: HandleId,
    pub side: HandleSide,
}

pub struct FlowEditor {
    pub viewport: Viewport,
    pub style: EditorStyle,
    pub default_background: Color32,
    pub connection: Option<ConnectionDrag>,
    pub selection_box: Option<Rect>,
    pub post_layout: PostLayoutQueue,
    magic_requests: Vec<MagicRequest>,
    explanations: MagicExplanations,
    view_state: NodeViewState,
    canvas_rect: Rect,
}

impl Default for FlowEditor {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            style: EditorStyle::default(),
            default_background: node::DEFAULT_NODE_BACKGROUND,
            connection: None,
            selection_box: None,
            post_layout: PostLayoutQueue::default(),
            magic_requests: Vec::new(),
            explanations: MagicExplanations::default(),
            view_state: NodeViewState::default(),
            canvas_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(1200.0, 800.0)),
        }
    }
}

impl FlowEditor {
    pub fn show(&mut self, ui: &mut egui::Ui, graph: &mut FlowGraph) {
        let clip_rect = ui.max_rect();
        self.canvas_rect = clip_rect;
        let canvas_offset = clip_rect.min;
        let pointer_in_bounds = ui.rect_contains_pointer(clip_rect);
        let pointer_pos = ui.ctx().pointer_latest_pos();
        let over_canvas_layer =
            pointer_pos.and_then(|p| ui.ctx().layer_id_at(p)) == Some(ui.layer_id());

        let mut input_escape = false;
        let mut input_delete = false;
        let mut input_primary_down = false;
        let mut input_primary_pressed = false;
        let mut input_primary_released = false;
        let mut input_double_clicked = false;
        let mut input_modifiers = egui::Modifiers::default();

        ui.input(|i| {
            // Pan with Middle Mouse or Alt + Left Mouse
            if i.pointer.middle_down() || (i.modifiers.alt && i.pointer.primary_down()) {
                self.viewport.pan += i.pointer.delta();
            }
            if let Some(hover) = i.pointer.hover_pos() {
                if pointer_in_bounds {
                    let anchor = hover - canvas_offset;
                    let zoom_delta = i.zoom_delta();
                    if zoom_delta != 1.0 {
                        self.viewport.zoom_about(anchor, zoom_delta);
                    }
                    let scroll = i.raw_scroll_delta;
                    if scroll.y != 0.0 && !i.modifiers.shift && !i.modifiers.command {
                        self.viewport.zoom_about(anchor, 1.0 + scroll.y * 0.001);
                    }
                }
            }
            if i.modifiers.command {
                let center = clip_rect.size() / 2.0;
                if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                    self.viewport.zoom_about(center, 1.1);
                }
                if i.key_pressed(egui::Key::Minus) {
                    self.viewport.zoom_about(center, 0.9);
                }
                if i.key_pressed(egui::Key::Num0) {
                    self.viewport.reset();
                }
            }

            input_escape = i.key_pressed(egui::Key::Escape);
            input_delete = i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace);
            input_primary_down = i.pointer.primary_down();
            input_primary_pressed = i.pointer.primary_pressed();
            input_primary_released = i.pointer.primary_released();
            input_double_clicked = i.pointer.button_double_clicked(egui::PointerButton::Primary);
            input_modifiers = i.modifiers;
        });

        let painter = ui.painter().clone();
        painter.rect_filled(clip_rect, 0.0, self.style.canvas_background);
        self.draw_grid(&painter, clip_rect);

        let ctx = FlowContext::build(
            graph,
            &mut self.explanations,
            input_modifiers.command,
            self.connection.as_ref().map(|c| c.node_id.clone()),
            self.viewport.zoom,
        );

        self.draw_edges(&painter, graph, canvas_offset);

        if let (Some(drag), Some(pos)) = (&self.connection, pointer_pos) {
            if let Some(start) = self.handle_pos(graph, &drag.node_id, drag.side, canvas_offset) {
                let stroke = Stroke::new(2.0 * self.viewport.zoom, self.style.target_highlight);
                match drag.side {
                    HandleSide::Source => draw_edge(&painter, start, pos, stroke),
                    HandleSide::Target => draw_edge(&painter, pos, start, stroke),
                }
            }
        }

        let over_node = pointer_pos.is_some_and(|p| self.node_at(graph, p, canvas_offset).is_some());

        // Draw nodes, collecting what happened to each of them
        let mut node_events: Vec<(NodeId, NodeEvent)> = Vec::new();
        for node in graph.nodes_in_order() {
            let events = match &node.data {
                NodeData::Custom(data) => node_view::show_custom_node(
                    ui,
                    &mut self.view_state,
                    node,
                    data,
                    &ctx,
                    &self.style,
                    &self.viewport,
                    canvas_offset,
                ),
                NodeData::Magic(data) => node_view::show_magic_node(
                    ui,
                    node,
                    data,
                    &ctx,
                    &self.style,
                    &self.viewport,
                    canvas_offset,
                ),
            };
            node_events.extend(events.into_iter().map(|e| (node.id.clone(), e)));
        }

        for (id, event) in node_events {
            self.apply_node_event(graph, &id, event, input_modifiers.shift);
        }

        // Geometry of everything drawn above is measured now. Work queued
        // further down waits for the next frame to draw its nodes first.
        if !self.post_layout.is_empty() {
            self.post_layout.run(graph, &mut self.viewport, clip_rect.size());
        }

        // Edge picking and selection box on empty canvas
        if input_primary_pressed
            && over_canvas_layer
            && pointer_in_bounds
            && !over_node
            && self.connection.is_none()
            && !input_modifiers.alt
        {
            if let Some(pos) = pointer_pos {
                if let Some(edge_id) = self.edge_at(graph, pos, canvas_offset) {
                    graph.select_edge(&edge_id, input_modifiers.shift);
                } else {
                    self.selection_box = Some(Rect::from_min_max(pos, pos));
                    if !input_modifiers.shift {
                        graph.clear_selection();
                    }
                }
            }
        }
        if input_primary_down {
            if let (Some(rect), Some(pos)) = (self.selection_box.as_mut(), pointer_pos) {
                rect.max = pos;
            }
        }
        if input_primary_released {
            if let Some(rect) = self.selection_box.take() {
                let selection_rect = Rect::from_two_pos(rect.min, rect.max);
                let hits: Vec<NodeId> = graph
                    .nodes
                    .values()
                    .filter(|n| {
                        self.viewport
                            .rect_to_screen(n.rect(), canvas_offset)
                            .intersects(selection_rect)
                    })
                    .map(|n| n.id.clone())
                    .collect();
                for id in &hits {
                    graph.add_to_selection(id);
                }
            }
        }
        if let Some(rect) = self.selection_box {
            let r = Rect::from_two_pos(rect.min, rect.max);
            painter.rect_filled(r, 0.0, self.style.selected_stroke.gamma_multiply(0.1));
            painter.rect_stroke(
                r,
                0.0,
                Stroke::new(1.0, self.style.selected_stroke),
                StrokeKind::Middle,
            );
        }

        // Finish or cancel a connection drag
        if input_primary_released {
            if let (Some(drag), Some(pos)) = (self.connection.take(), pointer_pos) {
                let radius = HANDLE_HITBOX * self.viewport.zoom;
                if let Some(target) =
                    drop_target(graph, &self.viewport, canvas_offset, pos, &drag, radius)
                {
                    graph.connect(&drag.handle, &target, ids::edge_id());
                }
            }
        }
        if input_escape && self.connection.take().is_some() {
            log::debug!("Connection cancelled");
        }

        // Double click on empty canvas adds a node in edit mode
        if input_double_clicked && over_canvas_layer && !over_node {
            if let Some(pos) = pointer_pos {
                let graph_pos = self.viewport.from_screen(pos, canvas_offset);
                self.add_node_on_canvas(graph, graph_pos);
            }
        }

        if input_delete && !ui.ctx().wants_keyboard_input() {
            let (nodes, edges) = graph.remove_selected();
            if nodes + edges > 0 {
                self.explanations.invalidate();
            }
        }

        if !self.post_layout.is_empty() {
            ui.ctx().request_repaint();
        }
    }

    /// Adds an empty node in edit mode at `graph_pos`, selected once it has been drawn.
    pub fn add_node_on_canvas(&mut self, graph: &mut FlowGraph, graph_pos: Pos2) -> AddedNode {
        node::custom_add_nodes(
            graph,
            &mut self.post_layout,
            graph_pos,
            CustomAddNodesOptions {
                label: Some(String::new()),
                select: true,
                editing: true,
                style_background: self.default_background,
                fit_view: None,
                to_fit_view: false,
            },
        )
    }

    /// Adds a node in the middle of the visible canvas.
    pub fn add_node_at_center(
        &mut self,
        graph: &mut FlowGraph,
        options: CustomAddNodesOptions,
    ) -> AddedNode {
        let center = self
            .viewport
            .from_screen(self.canvas_rect.center(), self.canvas_rect.min)
            - node::HARDCODED_NODE_SIZE / 2.0;
        node::custom_add_nodes(graph, &mut self.post_layout, center, options)
    }

    /// Fits all content into view once the next frame has been laid out.
    pub fn fit_view(&mut self, options: FitViewOptions) {
        self.post_layout.push(PostLayoutAction::FitView(options));
    }

    /// Adds a magic node explaining the current selection and selects it.
    pub fn explain_selection(&mut self, graph: &mut FlowGraph) -> Option<NodeId> {
        let selected = graph.selected_components();
        let id = magic::explain_selection(graph, &selected)?;
        self.post_layout
            .push(PostLayoutAction::SelectNodes(vec![id.clone()]));
        Some(id)
    }

    /// Requests raised by node toolboxes since the last call.
    pub fn take_magic_requests(&mut self) -> Vec<MagicRequest> {
        std::mem::take(&mut self.magic_requests)
    }

    fn apply_node_event(&mut self, graph: &mut FlowGraph, id: &NodeId, event: NodeEvent, shift: bool) {
        match event {
            NodeEvent::Clicked => {
                if shift {
                    graph.toggle_node_selection(id);
                } else if !graph.node(id).is_some_and(|n| n.selected) {
                    graph.select_nodes(std::slice::from_ref(id));
                }
                graph.bring_to_front(id);
            }
            NodeEvent::Dragged(delta) => self.drag_node(graph, id, delta, shift),
            NodeEvent::StartEditing => {
                node::start_editing(graph, id);
            }
            NodeEvent::LabelCommitted(label) => {
                node::commit_label(graph, id, label);
            }
            NodeEvent::LabelEditCancelled => {
                node::cancel_editing(graph, id);
            }
            NodeEvent::ChangeColor(color) => {
                node::change_color(graph, id, color);
            }
            NodeEvent::RemoveTags => {
                node::remove_tags(graph, id);
            }
            NodeEvent::RequestTagging => {
                if let Some(data) = graph.node(id).and_then(|n| n.as_custom()) {
                    self.magic_requests
                        .push(MagicRequest::tagging(id, &data.label));
                }
            }
            NodeEvent::RequestSuggestion => {
                self.magic_requests
                    .push(MagicRequest::suggest_label(graph, id));
            }
            NodeEvent::ConnectionStarted { handle, side } => {
                self.connection = Some(ConnectionDrag {
                    node_id: id.clone(),
                    handle,
                    side,
                });
            }
            NodeEvent::Measured(size) => {
                graph.set_dimensions(id, size);
            }
        }
    }

    /// Moves the whole selection, selecting the dragged node first if needed.
    fn drag_node(&mut self, graph: &mut FlowGraph, id: &NodeId, delta: Vec2, shift: bool) {
        if !graph.node(id).is_some_and(|n| n.selected) {
            if shift {
                graph.add_to_selection(id);
            } else {
                graph.select_nodes(std::slice::from_ref(id));
            }
        }
        let selected = graph.selected_components().nodes;
        graph.move_nodes(&selected, delta);
    }

    fn draw_grid(&self, painter: &egui::Painter, clip_rect: Rect) {
        let spacing = 24.0 * self.viewport.zoom;
        if spacing < 8.0 {
            return;
        }
        let origin = clip_rect.min + self.viewport.pan;
        let start_x = clip_rect.min.x + (origin.x - clip_rect.min.x).rem_euclid(spacing);
        let start_y = clip_rect.min.y + (origin.y - clip_rect.min.y).rem_euclid(spacing);
        let mut x = start_x;
        while x < clip_rect.max.x {
            let mut y = start_y;
            while y < clip_rect.max.y {
                painter.circle_filled(Pos2::new(x, y), 1.0, self.style.grid_dot);
                y += spacing;
            }
            x += spacing;
        }
    }

    fn draw_edges(&self, painter: &egui::Painter, graph: &FlowGraph, canvas_offset: Pos2) {
        for edge in &graph.edges {
            let (Some(p1), Some(p2)) = (
                self.handle_pos(graph, &edge.source, HandleSide::Source, canvas_offset),
                self.handle_pos(graph, &edge.target, HandleSide::Target, canvas_offset),
            ) else {
                continue;
            };
            let (width, color) = if edge.selected {
                (3.0, self.style.selected_edge)
            } else {
                (2.0, self.style.edge)
            };
            draw_edge(painter, p1, p2, Stroke::new(width * self.viewport.zoom, color));
        }
    }

    fn handle_pos(
        &self,
        graph: &FlowGraph,
        node_id: &NodeId,
        side: HandleSide,
        canvas_offset: Pos2,
    ) -> Option<Pos2> {
        let node = graph.node(node_id)?;
        let rect = self.viewport.rect_to_screen(node.rect(), canvas_offset);
        Some(handle_screen_pos(rect, side))
    }

    fn node_at(&self, graph: &FlowGraph, pos: Pos2, canvas_offset: Pos2) -> Option<NodeId> {
        let margin = HANDLE_HITBOX * 0.5 * self.viewport.zoom;
        graph
            .nodes_in_order()
            .into_iter()
            .rev()
            .find(|n| {
                self.viewport
                    .rect_to_screen(n.rect(), canvas_offset)
                    .expand2(Vec2::new(margin, 0.0))
                    .contains(pos)
            })
            .map(|n| n.id.clone())
    }

    fn edge_at(&self, graph: &FlowGraph, pos: Pos2, canvas_offset: Pos2) -> Option<EdgeId> {
        let threshold = 6.0_f32.max(4.0 * self.viewport.zoom);
        graph
            .edges
            .iter()
            .rev()
            .find(|edge| {
                match (
                    self.handle_pos(graph, &edge.source, HandleSide::Source, canvas_offset),
                    self.handle_pos(graph, &edge.target, HandleSide::Target, canvas_offset),
                ) {
                    (Some(p1), Some(p2)) => hit_test_edge(pos, p1, p2, threshold),
                    _ => false,
                }
            })
            .map(|edge| edge.id.clone())
    }
}

/// Picks the handle a connection dropped at `pos` should attach to.
///
/// A handle of the opposite kind within `radius` wins; otherwise dropping
/// anywhere on another custom node attaches to its opposite-kind handle.
pub fn drop_target(
    graph: &FlowGraph,
    viewport: &Viewport,
    canvas_offset: Pos2,
    pos: Pos2,
    drag: &ConnectionDrag,
    radius: f32,
) -> Option<HandleId> {
    let wanted = drag.side.opposite();
    let mut body_hit = None;
    for node in graph.nodes_in_order().into_iter().rev() {
        if node.id == drag.node_id {
            continue;
        }
        let Some(data) = node.as_custom() else {
            continue;
        };
        let rect = viewport.rect_to_screen(node.rect(), canvas_offset);
        if handle_screen_pos(rect, wanted).distance(pos) <= radius {
            return Some(data.handle(wanted).clone());
        }
        if body_hit.is_none() && rect.contains(pos) {
            body_hit = Some(data.handle(wanted).clone());
        }
    }
    body_hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::custom;

    fn two_nodes() -> FlowGraph {
        let mut graph = FlowGraph::new();
        graph.add_node(custom("a", "alpha"));
        let mut b = custom("b", "beta");
        b.position = Pos2::new(400.0, 0.0);
        graph.add_node(b);
        graph
    }

    fn drag_from(handle: &str, side: HandleSide) -> ConnectionDrag {
        ConnectionDrag {
            node_id: NodeId::from("a"),
            handle: HandleId::from(handle),
            side,
        }
    }

    #[test]
    fn drop_on_handle_picks_it() {
        let graph = two_nodes();
        let drag = drag_from("a-source", HandleSide::Source);
        // Right edge (target handle) of node b.
        let pos = Pos2::new(561.0, 21.5);

        let target = drop_target(&graph, &Viewport::default(), Pos2::ZERO, pos, &drag, 8.0);

        assert_eq!(target, Some(HandleId::from("b-target")));
    }

    #[test]
    fn drop_on_body_uses_opposite_handle() {
        let graph = two_nodes();
        let drag = drag_from("a-target", HandleSide::Target);

        let target =
            drop_target(&graph, &Viewport::default(), Pos2::ZERO, Pos2::new(480.0, 20.0), &drag, 8.0);

        assert_eq!(target, Some(HandleId::from("b-source")));
    }

    #[test]
    fn drop_on_own_node_or_empty_canvas_is_ignored() {
        let graph = two_nodes();
        let drag = drag_from("a-source", HandleSide::Source);
        let viewport = Viewport::default();

        assert_eq!(drop_target(&graph, &viewport, Pos2::ZERO, Pos2::new(80.0, 20.0), &drag, 8.0), None);
        assert_eq!(drop_target(&graph, &viewport, Pos2::ZERO, Pos2::new(300.0, 300.0), &drag, 8.0), None);
    }

    #[test]
    fn dragging_moves_the_whole_selection() {
        let mut graph = two_nodes();
        let mut editor = FlowEditor::default();
        graph.select_nodes(&[NodeId::from("a"), NodeId::from("b")]);

        editor.drag_node(&mut graph, &NodeId::from("a"), Vec2::new(10.0, 5.0), false);

        assert_eq!(graph.node(&NodeId::from("a")).unwrap().position, Pos2::new(10.0, 5.0));
        assert_eq!(graph.node(&NodeId::from("b")).unwrap().position, Pos2::new(410.0, 5.0));
    }

    #[test]
    fn dragging_an_unselected_node_selects_only_it() {
        let mut graph = two_nodes();
        let mut editor = FlowEditor::default();
        graph.select_nodes(&[NodeId::from("b")]);

        editor.drag_node(&mut graph, &NodeId::from("a"), Vec2::new(10.0, 0.0), false);

        assert_eq!(graph.selected_components().nodes, vec![NodeId::from("a")]);
        assert_eq!(graph.node(&NodeId::from("b")).unwrap().position, Pos2::new(400.0, 0.0));
    }

    #[test]
    fn toolbox_requests_reach_the_host() {
        let mut graph = two_nodes();
        let mut editor = FlowEditor::default();

        editor.apply_node_event(&mut graph, &NodeId::from("a"), NodeEvent::RequestTagging, false);
        editor.apply_node_event(&mut graph, &NodeId::from("b"), NodeEvent::RequestSuggestion, false);

        let requests = editor.take_magic_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], MagicRequest::tagging(&NodeId::from("a"), "alpha"));
        assert_eq!(requests[1].target_id(), &NodeId::from("b"));
        assert!(editor.take_magic_requests().is_empty());
    }

    #[test]
    fn badge_click_clears_tags() {
        let mut graph = two_nodes();
        let mut editor = FlowEditor::default();
        graph.update_one(
            &NodeId::from("a"),
            crate::graph::CustomNodePatch::tags(vec!["x".into()]),
        );

        editor.apply_node_event(&mut graph, &NodeId::from("a"), NodeEvent::RemoveTags, false);

        let data = graph.node(&NodeId::from("a")).and_then(|n| n.as_custom()).unwrap();
        assert!(data.tags.is_empty());
    }

    #[test]
    fn escaping_an_edit_keeps_the_old_label() {
        let mut graph = two_nodes();
        let mut editor = FlowEditor::default();
        let a = NodeId::from("a");

        editor.apply_node_event(&mut graph, &a, NodeEvent::StartEditing, false);
        editor.apply_node_event(&mut graph, &a, NodeEvent::LabelEditCancelled, false);

        let data = graph.node(&a).and_then(|n| n.as_custom()).unwrap();
        assert_eq!(data.label, "alpha");
        assert!(!data.editing);
    }

    #[test]
    fn connection_start_records_the_drag() {
        let mut graph = two_nodes();
        let mut editor = FlowEditor::default();

        editor.apply_node_event(
            &mut graph,
            &NodeId::from("a"),
            NodeEvent::ConnectionStarted {
                handle: HandleId::from("a-source"),
                side: HandleSide::Source,
            },
            false,
        );

        assert_eq!(editor.connection, Some(drag_from("a-source", HandleSide::Source)));
    }

    fn run_frame(ctx: &egui::Context, mut frame: impl FnMut(&mut egui::Ui)) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| frame(ui));
        });
    }

    #[test]
    fn queued_selection_runs_after_the_node_is_drawn() {
        let ctx = egui::Context::default();
        let mut graph = two_nodes();
        let mut editor = FlowEditor::default();
        let mut added = None;

        run_frame(&ctx, |ui| {
            editor.show(ui, &mut graph);
            if added.is_none() {
                added = Some(editor.add_node_on_canvas(&mut graph, Pos2::new(0.0, 200.0)));
            }
        });
        let id = added.map(|a| a.node_id).unwrap();
        assert!(!graph.node(&id).unwrap().selected);
        assert!(!editor.post_layout.is_empty());

        run_frame(&ctx, |ui| editor.show(ui, &mut graph));
        assert_eq!(graph.selected_components().nodes, vec![id]);
        assert!(editor.post_layout.is_empty());
    }

    #[test]
    fn explain_selection_selects_the_magic_node_after_layout() {
        let mut graph = two_nodes();
        let mut editor = FlowEditor::default();
        graph.select_nodes(&[NodeId::from("a")]);

        let id = editor.explain_selection(&mut graph).unwrap();
        editor
            .post_layout
            .run(&mut graph, &mut editor.viewport, Vec2::new(800.0, 600.0));

        assert_eq!(graph.selected_components().nodes, vec![id]);
    }
}
