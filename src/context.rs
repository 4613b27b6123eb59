//! Per-frame session state handed to every node view.

use crate::graph::{FlowGraph, NodeId, SelectedComponents};
use std::collections::HashSet;

/// Session-wide UI state, rebuilt once per frame and passed explicitly to each view.
#[derive(Clone, Debug, Default)]
pub struct FlowContext {
    /// Command/meta key held: node bodies start connections instead of moving.
    pub meta_pressed: bool,
    pub selected_components: SelectedComponents,
    /// Node a connection is currently being dragged from.
    pub connection_node_id: Option<NodeId>,
    pub zoom: f32,
    /// Nodes listed as sources by a selected magic node.
    pub explained_nodes: HashSet<NodeId>,
}

impl FlowContext {
    pub fn build(
        graph: &FlowGraph,
        explanations: &mut MagicExplanations,
        meta_pressed: bool,
        connection_node_id: Option<NodeId>,
        zoom: f32,
    ) -> Self {
        let selected_components = graph.selected_components();
        let explained_nodes = explanations.refresh(graph, &selected_components).clone();
        Self {
            meta_pressed,
            selected_components,
            connection_node_id,
            zoom,
            explained_nodes,
        }
    }

    pub fn more_than_one_components_selected(&self) -> bool {
        self.selected_components.count() > 1
    }
}

/// Memoized set of nodes explained by the selected magic nodes.
///
/// Recomputed only when the set of selected magic nodes changes.
#[derive(Debug, Default)]
pub struct MagicExplanations {
    selected_magic: Vec<NodeId>,
    explained: HashSet<NodeId>,
}

impl MagicExplanations {
    pub fn refresh(&mut self, graph: &FlowGraph, selected: &SelectedComponents) -> &HashSet<NodeId> {
        let selected_magic: Vec<NodeId> = selected
            .nodes
            .iter()
            .filter(|id| id.is_magic())
            .cloned()
            .collect();
        if selected_magic != self.selected_magic {
            self.explained = explained_by(graph, &selected_magic);
            self.selected_magic = selected_magic;
        }
        &self.explained
    }

    /// Drops the cached result so the next refresh recomputes it.
    pub fn invalidate(&mut self) {
        self.selected_magic.clear();
        self.explained.clear();
    }
}

/// Every existing node listed as a source component of one of `magic_ids`.
///
/// Ids that are missing or not magic nodes contribute nothing.
pub fn explained_by(graph: &FlowGraph, magic_ids: &[NodeId]) -> HashSet<NodeId> {
    magic_ids
        .iter()
        .filter_map(|id| graph.node(id)?.as_magic())
        .flat_map(|magic| magic.source_components.nodes.iter())
        .filter(|id| graph.node(id).is_some())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{custom, magic};

    fn sample_graph() -> FlowGraph {
        let mut graph = FlowGraph::new();
        graph.add_node(custom("a", "alpha"));
        graph.add_node(custom("b", "beta"));
        graph.add_node(magic("magic-node-1", &["a", "gone"]));
        graph
    }

    #[test]
    fn explained_by_skips_missing_nodes() {
        let graph = sample_graph();
        let explained = explained_by(
            &graph,
            &[NodeId::from("magic-node-1"), NodeId::from("magic-node-missing")],
        );
        assert_eq!(explained, HashSet::from([NodeId::from("a")]));
    }

    #[test]
    fn explanations_follow_magic_selection() {
        let mut graph = sample_graph();
        let mut explanations = MagicExplanations::default();

        assert!(explanations.refresh(&graph, &graph.selected_components()).is_empty());

        graph.select_nodes(&[NodeId::from("magic-node-1")]);
        let explained = explanations.refresh(&graph, &graph.selected_components()).clone();
        assert!(explained.contains(&NodeId::from("a")));
        assert!(!explained.contains(&NodeId::from("b")));

        graph.select_nodes(&[NodeId::from("b")]);
        assert!(explanations.refresh(&graph, &graph.selected_components()).is_empty());
    }

    #[test]
    fn context_counts_all_selected_components() {
        let mut graph = sample_graph();
        let mut explanations = MagicExplanations::default();
        graph.select_nodes(&[NodeId::from("a")]);
        let single = FlowContext::build(&graph, &mut explanations, false, None, 1.0);
        assert!(!single.more_than_one_components_selected());

        graph.add_to_selection(&NodeId::from("b"));
        let multi = FlowContext::build(&graph, &mut explanations, false, None, 1.0);
        assert!(multi.more_than_one_components_selected());
    }
}
