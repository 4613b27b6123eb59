//! Work deferred until after the next layout pass.
//!
//! Freshly inserted nodes only get their measured size once the editor has
//! drawn them, so anything depending on geometry (fitting the view) and the
//! selection that goes with it is queued here and run at the end of the frame.

use crate::graph::{FlowGraph, NodeId};
use crate::viewport::{FitViewOptions, Viewport};
use egui::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub enum PostLayoutAction {
    FitView(FitViewOptions),
    SelectNodes(Vec<NodeId>),
}

#[derive(Debug, Default)]
pub struct PostLayoutQueue {
    pending: Vec<PostLayoutAction>,
}

impl PostLayoutQueue {
    pub fn push(&mut self, action: PostLayoutAction) {
        self.pending.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[PostLayoutAction] {
        &self.pending
    }

    /// Runs and clears every queued action, in the order they were queued.
    pub fn run(&mut self, graph: &mut FlowGraph, viewport: &mut Viewport, canvas_size: Vec2) {
        for action in self.pending.drain(..) {
            match action {
                PostLayoutAction::FitView(options) => {
                    if let Some(bounds) = graph.bounds() {
                        viewport.fit_view(bounds, canvas_size, &options);
                    }
                }
                PostLayoutAction::SelectNodes(ids) => graph.select_nodes(&ids),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::custom;
    use egui::Pos2;

    #[test]
    fn run_applies_actions_and_empties_the_queue() {
        let mut graph = FlowGraph::new();
        let mut node = custom("a", "alpha");
        node.position = Pos2::new(500.0, 500.0);
        graph.add_node(node);
        let mut viewport = Viewport::default();
        let mut queue = PostLayoutQueue::default();
        queue.push(PostLayoutAction::FitView(FitViewOptions::default()));
        queue.push(PostLayoutAction::SelectNodes(vec![NodeId::from("a")]));

        queue.run(&mut graph, &mut viewport, Vec2::new(800.0, 600.0));

        assert!(queue.is_empty());
        assert_ne!(viewport, Viewport::default());
        assert_eq!(graph.selected_components().nodes, vec![NodeId::from("a")]);
    }

    #[test]
    fn fit_view_on_empty_graph_leaves_viewport_alone() {
        let mut queue = PostLayoutQueue::default();
        queue.push(PostLayoutAction::FitView(FitViewOptions::default()));
        let mut viewport = Viewport::default();

        queue.run(&mut FlowGraph::new(), &mut viewport, Vec2::new(800.0, 600.0));

        assert_eq!(viewport, Viewport::default());
    }
}
