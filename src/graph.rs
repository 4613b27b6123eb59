//! # Flow Graph
//!
//! The shared graph state every view reads from and every action writes to.
//! Nodes live in an arena keyed by their stable [`NodeId`]; single-node edits
//! go through [`FlowGraph::update_one`] instead of rebuilding the collection.

use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Substring carried by the ids of assistive "magic" nodes.
pub const MAGIC_NODE_MARKER: &str = "magic-node";

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(NodeId);
string_id!(HandleId);
string_id!(EdgeId);

impl NodeId {
    pub fn is_magic(&self) -> bool {
        self.0.contains(MAGIC_NODE_MARKER)
    }
}

/// Which side of a node a handle sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleSide {
    /// Left side, edges leave from here.
    Source,
    /// Right side, edges arrive here.
    Target,
}

impl HandleSide {
    pub fn opposite(self) -> Self {
        match self {
            HandleSide::Source => HandleSide::Target,
            HandleSide::Target => HandleSide::Source,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedInformation {
    /// Produced by a generation feature and not yet confirmed.
    pub temporary: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomNodeData {
    pub label: String,
    /// Only the first tag is shown.
    pub tags: Vec<String>,
    pub source_handle_id: HandleId,
    pub target_handle_id: HandleId,
    pub editing: bool,
    pub style_background: Color32,
    pub generated: GeneratedInformation,
}

impl CustomNodeData {
    pub fn handle(&self, side: HandleSide) -> &HandleId {
        match side {
            HandleSide::Source => &self.source_handle_id,
            HandleSide::Target => &self.target_handle_id,
        }
    }
}

/// The nodes and edges a magic node summarizes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceComponents {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagicNodeData {
    pub summary: String,
    pub source_components: SourceComponents,
    pub generated: GeneratedInformation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeData {
    Custom(CustomNodeData),
    Magic(MagicNodeData),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Custom,
    Magic,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Custom => "custom",
            NodeType::Magic => "magic",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub data: NodeData,
    pub position: Pos2,
    pub selected: bool,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub z_order: u64,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Custom(_) => NodeType::Custom,
            NodeData::Magic(_) => NodeType::Magic,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomNodeData> {
        match &self.data {
            NodeData::Custom(data) => Some(data),
            NodeData::Magic(_) => None,
        }
    }

    pub fn as_magic(&self) -> Option<&MagicNodeData> {
        match &self.data {
            NodeData::Magic(data) => Some(data),
            NodeData::Custom(_) => None,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Bounding box in graph space.
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub source_handle: HandleId,
    pub target: NodeId,
    pub target_handle: HandleId,
    #[serde(default)]
    pub selected: bool,
}

/// Ids of everything currently selected, in drawing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectedComponents {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl SelectedComponents {
    pub fn count(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }
}

/// Partial update for a custom node's data. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomNodePatch {
    pub label: Option<String>,
    pub tags: Option<Vec<String>>,
    pub editing: Option<bool>,
    pub style_background: Option<Color32>,
    pub generated: Option<GeneratedInformation>,
}

impl CustomNodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn tags(tags: Vec<String>) -> Self {
        Self {
            tags: Some(tags),
            ..Default::default()
        }
    }

    pub fn editing(editing: bool) -> Self {
        Self {
            editing: Some(editing),
            ..Default::default()
        }
    }

    pub fn style_background(color: Color32) -> Self {
        Self {
            style_background: Some(color),
            ..Default::default()
        }
    }

    fn apply(self, data: &mut CustomNodeData) {
        if let Some(label) = self.label {
            data.label = label;
        }
        if let Some(tags) = self.tags {
            data.tags = tags;
        }
        if let Some(editing) = self.editing {
            data.editing = editing;
        }
        if let Some(color) = self.style_background {
            data.style_background = color;
        }
        if let Some(generated) = self.generated {
            data.generated = generated;
        }
    }
}

/// Label and tags of one node, handed to the suggestion tooling as context.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeLabelAndTags {
    pub label: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    next_z_order: u64,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, mut node: Node) {
        node.z_order = self.next_z_order;
        self.next_z_order += 1;
        log::debug!("Adding {} node {}", node.node_type(), node.id);
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes sorted back to front.
    pub fn nodes_in_order(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by_key(|n| n.z_order);
        nodes
    }

    /// Shallow-merges `patch` into one custom node's data.
    ///
    /// Returns `false` when the id is unknown or refers to a magic node.
    pub fn update_one(&mut self, id: &NodeId, patch: CustomNodePatch) -> bool {
        match self.nodes.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Custom(data)) => {
                log::debug!("Updating node {}: {:?}", id, patch);
                patch.apply(data);
                true
            }
            _ => false,
        }
    }

    pub fn set_dimensions(&mut self, id: &NodeId, size: Vec2) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.size() != size => {
                node.width = size.x;
                node.height = size.y;
                true
            }
            _ => false,
        }
    }

    pub fn move_nodes<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>, delta: Vec2) {
        for id in ids {
            if let Some(node) = self.nodes.get_mut(id) {
                node.position += delta;
            }
        }
    }

    pub fn bring_to_front(&mut self, id: &NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.z_order = self.next_z_order;
            self.next_z_order += 1;
        }
    }

    /// Selects exactly `ids`, dropping every other node and edge from the selection.
    pub fn select_nodes(&mut self, ids: &[NodeId]) {
        let wanted: HashSet<&NodeId> = ids.iter().collect();
        for node in self.nodes.values_mut() {
            node.selected = wanted.contains(&node.id);
        }
        for edge in &mut self.edges {
            edge.selected = false;
        }
    }

    pub fn add_to_selection(&mut self, id: &NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.selected = true;
        }
    }

    pub fn toggle_node_selection(&mut self, id: &NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.selected = !node.selected;
        }
    }

    /// Selects one edge. Without `additive` everything else is deselected.
    pub fn select_edge(&mut self, id: &EdgeId, additive: bool) {
        if !additive {
            self.clear_selection();
        }
        if let Some(edge) = self.edges.iter_mut().find(|e| &e.id == id) {
            edge.selected = if additive { !edge.selected } else { true };
        }
    }

    pub fn clear_selection(&mut self) {
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
        for edge in &mut self.edges {
            edge.selected = false;
        }
    }

    pub fn selected_components(&self) -> SelectedComponents {
        SelectedComponents {
            nodes: self
                .nodes_in_order()
                .into_iter()
                .filter(|n| n.selected)
                .map(|n| n.id.clone())
                .collect(),
            edges: self
                .edges
                .iter()
                .filter(|e| e.selected)
                .map(|e| e.id.clone())
                .collect(),
        }
    }

    /// Finds the node owning a handle and which side the handle is on.
    pub fn handle_owner(&self, handle: &HandleId) -> Option<(&NodeId, HandleSide)> {
        self.nodes.values().find_map(|node| {
            let data = node.as_custom()?;
            if &data.source_handle_id == handle {
                Some((&node.id, HandleSide::Source))
            } else if &data.target_handle_id == handle {
                Some((&node.id, HandleSide::Target))
            } else {
                None
            }
        })
    }

    /// Connects two handles, ordering the endpoints so the edge runs from the
    /// source handle to the target handle.
    ///
    /// Returns `None` for same-side pairs, self connections, unknown handles or
    /// an edge that already exists.
    pub fn connect(&mut self, from: &HandleId, to: &HandleId, edge_id: EdgeId) -> Option<EdgeId> {
        let (from_node, from_side) = self.handle_owner(from)?;
        let (to_node, to_side) = self.handle_owner(to)?;
        if from_side == to_side || from_node == to_node {
            return None;
        }
        let (source, source_handle, target, target_handle) = match from_side {
            HandleSide::Source => (from_node.clone(), from.clone(), to_node.clone(), to.clone()),
            HandleSide::Target => (to_node.clone(), to.clone(), from_node.clone(), from.clone()),
        };
        if self
            .edges
            .iter()
            .any(|e| e.source_handle == source_handle && e.target_handle == target_handle)
        {
            return None;
        }
        log::debug!("Connecting {} -> {}", source, target);
        self.edges.push(Edge {
            id: edge_id.clone(),
            source,
            source_handle,
            target,
            target_handle,
            selected: false,
        });
        Some(edge_id)
    }

    /// Removes selected nodes (with their edges) and selected edges.
    ///
    /// Returns the number of nodes and edges removed.
    pub fn remove_selected(&mut self) -> (usize, usize) {
        let doomed: HashSet<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect();
        self.nodes.retain(|id, _| !doomed.contains(id));
        let edges_before = self.edges.len();
        self.edges
            .retain(|e| !e.selected && !doomed.contains(&e.source) && !doomed.contains(&e.target));
        let removed = (doomed.len(), edges_before - self.edges.len());
        if removed != (0, 0) {
            log::info!("Removed {} node(s) and {} edge(s)", removed.0, removed.1);
        }
        removed
    }

    /// Union of every node rectangle, or `None` for an empty graph.
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes
            .values()
            .map(Node::rect)
            .reduce(|acc, rect| acc.union(rect))
    }

    pub fn node_label_and_tags(&self) -> Vec<NodeLabelAndTags> {
        self.nodes_in_order()
            .into_iter()
            .filter_map(Node::as_custom)
            .map(|data| NodeLabelAndTags {
                label: data.label.clone(),
                tags: data.tags.clone(),
            })
            .collect()
    }
}
