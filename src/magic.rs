//! Hooks for the assistive ("magic") tooling.
//!
//! The editor only gathers the context for a request and hands it to the
//! host; producing tags, labels or summaries happens elsewhere.

use crate::graph::{
    FlowGraph, GeneratedInformation, MagicNodeData, Node, NodeData, NodeId, NodeLabelAndTags,
    SelectedComponents, SourceComponents,
};
use crate::ids;
use egui::{Pos2, Vec2};

pub const MAGIC_NODE_SIZE: Vec2 = Vec2::new(240.0, 120.0);

#[derive(Clone, Debug, PartialEq)]
pub enum MagicRequest {
    /// Suggest tags for a labelled node.
    Tagging { target_id: NodeId, label: String },
    /// Suggest a label for an empty node.
    SuggestLabel {
        target_id: NodeId,
        node_label_and_tags: Vec<NodeLabelAndTags>,
        /// Always empty: edge labels are not collected yet.
        edge_labels: Vec<String>,
    },
}

impl MagicRequest {
    pub fn tagging(target_id: &NodeId, label: &str) -> Self {
        MagicRequest::Tagging {
            target_id: target_id.clone(),
            label: label.to_string(),
        }
    }

    pub fn suggest_label(graph: &FlowGraph, target_id: &NodeId) -> Self {
        MagicRequest::SuggestLabel {
            target_id: target_id.clone(),
            node_label_and_tags: graph.node_label_and_tags(),
            edge_labels: Vec::new(),
        }
    }

    pub fn target_id(&self) -> &NodeId {
        match self {
            MagicRequest::Tagging { target_id, .. } | MagicRequest::SuggestLabel { target_id, .. } => {
                target_id
            }
        }
    }
}

/// Creates a temporary magic node explaining the current selection, placed
/// to the right of it. Returns `None` when nothing custom is selected.
pub fn explain_selection(graph: &mut FlowGraph, selected: &SelectedComponents) -> Option<NodeId> {
    let sources: Vec<NodeId> = selected
        .nodes
        .iter()
        .filter(|id| graph.node(id).is_some_and(|n| n.as_custom().is_some()))
        .cloned()
        .collect();
    let bounds = sources
        .iter()
        .filter_map(|id| graph.node(id).map(Node::rect))
        .reduce(|acc, rect| acc.union(rect))?;

    let id = ids::magic_node_id();
    let node = Node {
        id: id.clone(),
        data: NodeData::Magic(MagicNodeData {
            summary: String::new(),
            source_components: SourceComponents {
                nodes: sources,
                edges: selected.edges.clone(),
            },
            generated: GeneratedInformation { temporary: true },
        }),
        position: Pos2::new(bounds.max.x + 64.0, bounds.min.y),
        selected: false,
        width: MAGIC_NODE_SIZE.x,
        height: MAGIC_NODE_SIZE.y,
        z_order: 0,
    };
    log::info!("Explaining {} node(s) with {}", selected.nodes.len(), id);
    graph.add_node(node);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::custom;
    use crate::graph::CustomNodePatch;

    #[test]
    fn suggestion_carries_every_label_and_no_edge_labels() {
        let mut graph = FlowGraph::new();
        graph.add_node(custom("a", "alpha"));
        graph.add_node(custom("b", ""));
        graph.update_one(&NodeId::from("a"), CustomNodePatch::tags(vec!["t".into()]));

        let request = MagicRequest::suggest_label(&graph, &NodeId::from("b"));

        let MagicRequest::SuggestLabel {
            target_id,
            node_label_and_tags,
            edge_labels,
        } = request
        else {
            panic!("expected a label suggestion");
        };
        assert_eq!(target_id, NodeId::from("b"));
        assert_eq!(node_label_and_tags.len(), 2);
        assert_eq!(node_label_and_tags[0].label, "alpha");
        assert_eq!(node_label_and_tags[0].tags, vec!["t".to_string()]);
        assert!(edge_labels.is_empty());
    }

    #[test]
    fn explain_selection_records_sources() {
        let mut graph = FlowGraph::new();
        graph.add_node(custom("a", "alpha"));
        graph.add_node(custom("b", "beta"));
        graph.select_nodes(&[NodeId::from("a"), NodeId::from("b")]);
        let selected = graph.selected_components();

        let id = explain_selection(&mut graph, &selected).unwrap();

        assert!(id.is_magic());
        let magic = graph.node(&id).and_then(Node::as_magic).unwrap();
        assert_eq!(magic.source_components.nodes, selected.nodes);
        assert!(magic.generated.temporary);
    }

    #[test]
    fn explain_selection_needs_a_selection() {
        let mut graph = FlowGraph::new();
        graph.add_node(custom("a", "alpha"));
        assert_eq!(explain_selection(&mut graph, &SelectedComponents::default()), None);
        assert_eq!(graph.nodes.len(), 1);
    }
}
