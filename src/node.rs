//! # Custom Node
//!
//! Construction and behaviour of the editable, taggable, colourable node.
//! Rendering lives in [`crate::editor::node_view`]; everything here is
//! independent of egui's UI state so it can be driven directly.

use crate::context::FlowContext;
use crate::graph::{
    CustomNodeData, CustomNodePatch, FlowGraph, GeneratedInformation, HandleId, Node, NodeData,
    NodeId,
};
use crate::ids;
use crate::layout::{PostLayoutAction, PostLayoutQueue};
use crate::phrases::random_phrase;
use crate::viewport::FitViewOptions;
use egui::{Color32, Pos2, Vec2};

/// Size given to a node before the editor has measured it.
pub const HARDCODED_NODE_SIZE: Vec2 = Vec2::new(160.0, 43.0);

pub const DEFAULT_NODE_BACKGROUND: Color32 = Color32::WHITE;

/// Rough width for a label. Kept as-is so existing layouts stay stable.
///
/// Length is measured in UTF-16 code units, so an emoji counts twice.
pub fn node_width_estimation(content: &str) -> f32 {
    let length = content.encode_utf16().count();
    if length <= 10 {
        return HARDCODED_NODE_SIZE.x;
    }
    (64.0 + length as f32 * 8.0).max(210.0)
}

#[allow(clippy::too_many_arguments)]
pub fn new_custom_node(
    node_id: NodeId,
    label: String,
    position: Pos2,
    source_handle_id: HandleId,
    target_handle_id: HandleId,
    selected: bool,
    editing: bool,
    style_background: Color32,
    generated: GeneratedInformation,
) -> Node {
    let width = node_width_estimation(&label);
    Node {
        id: node_id,
        data: NodeData::Custom(CustomNodeData {
            label,
            tags: Vec::new(),
            source_handle_id,
            target_handle_id,
            editing,
            style_background,
            generated,
        }),
        position,
        selected,
        width,
        height: HARDCODED_NODE_SIZE.y,
        z_order: 0,
    }
}

#[derive(Clone, Debug)]
pub struct CustomAddNodesOptions {
    /// A random placeholder phrase is used when absent.
    pub label: Option<String>,
    pub select: bool,
    pub editing: bool,
    pub style_background: Color32,
    /// `None` when there is no viewport to fit.
    pub fit_view: Option<FitViewOptions>,
    pub to_fit_view: bool,
}

impl Default for CustomAddNodesOptions {
    fn default() -> Self {
        Self {
            label: None,
            select: false,
            editing: false,
            style_background: DEFAULT_NODE_BACKGROUND,
            fit_view: None,
            to_fit_view: false,
        }
    }
}

/// Ids of a freshly added node, for wiring edges to it straight away.
#[derive(Clone, Debug, PartialEq)]
pub struct AddedNode {
    pub node_id: NodeId,
    pub source_handle_id: HandleId,
    pub target_handle_id: HandleId,
}

/// Adds one custom node at `position`.
///
/// Fitting the view and selecting the node wait for the next layout pass so
/// they see the node's measured size.
pub fn custom_add_nodes(
    graph: &mut FlowGraph,
    post_layout: &mut PostLayoutQueue,
    position: Pos2,
    options: CustomAddNodesOptions,
) -> AddedNode {
    let node_id = ids::node_id();
    let source_handle_id = ids::handle_id();
    let target_handle_id = ids::handle_id();

    let label = options.label.unwrap_or_else(random_phrase);

    let node = new_custom_node(
        node_id.clone(),
        label,
        position,
        source_handle_id.clone(),
        target_handle_id.clone(),
        options.select,
        options.editing,
        options.style_background,
        GeneratedInformation { temporary: false },
    );
    log::info!("Added node {} at ({:.0}, {:.0})", node_id, position.x, position.y);
    graph.add_node(node);

    if options.to_fit_view {
        if let Some(fit_view) = options.fit_view {
            post_layout.push(PostLayoutAction::FitView(fit_view));
        }
    }
    if options.select {
        post_layout.push(PostLayoutAction::SelectNodes(vec![node_id.clone()]));
    }

    AddedNode {
        node_id,
        source_handle_id,
        target_handle_id,
    }
}

/// Transient display state of one node, derived every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeFlags {
    /// Another node is dragging a connection, so this one is a drop target.
    pub is_target: bool,
    pub is_explained_by_magic_node: bool,
    pub more_than_one_components_selected: bool,
}

impl NodeFlags {
    pub fn derive(id: &NodeId, ctx: &FlowContext) -> Self {
        Self {
            is_target: ctx.connection_node_id.as_ref().is_some_and(|dragging| dragging != id),
            is_explained_by_magic_node: ctx.explained_nodes.contains(id),
            more_than_one_components_selected: ctx.more_than_one_components_selected(),
        }
    }
}

/// Which toolbox entries a node offers. All `false` hides the toolbox.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolboxItems {
    pub color: bool,
    pub tagging: bool,
    pub suggest_label: bool,
}

impl ToolboxItems {
    pub fn for_node(data: &CustomNodeData, selected: bool, flags: &NodeFlags) -> Self {
        if !selected || flags.more_than_one_components_selected {
            return Self::default();
        }
        Self {
            color: true,
            tagging: !data.label.is_empty() && data.tags.is_empty(),
            suggest_label: data.label.is_empty(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.color || self.tagging || self.suggest_label
    }
}

/// The tag shown on the badge, if any.
pub fn badge_tag(tags: &[String]) -> Option<&str> {
    tags.first().map(String::as_str)
}

pub fn remove_tags(graph: &mut FlowGraph, id: &NodeId) -> bool {
    graph.update_one(id, CustomNodePatch::tags(Vec::new()))
}

pub fn change_color(graph: &mut FlowGraph, id: &NodeId, color: Color32) -> bool {
    graph.update_one(id, CustomNodePatch::style_background(color))
}

/// Writes the edited label back and leaves edit mode.
pub fn commit_label(graph: &mut FlowGraph, id: &NodeId, label: String) -> bool {
    graph.update_one(
        id,
        CustomNodePatch {
            editing: Some(false),
            ..CustomNodePatch::label(label)
        },
    )
}

pub fn start_editing(graph: &mut FlowGraph, id: &NodeId) -> bool {
    graph.update_one(id, CustomNodePatch::editing(true))
}

/// Leaves edit mode keeping the stored label.
pub fn cancel_editing(graph: &mut FlowGraph, id: &NodeId) -> bool {
    graph.update_one(id, CustomNodePatch::editing(false))
}
