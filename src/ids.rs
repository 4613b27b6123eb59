//! Session-unique identifiers for nodes, handles and edges.

use crate::graph::{EdgeId, HandleId, MAGIC_NODE_MARKER, NodeId};
use uuid::Uuid;

pub fn node_id() -> NodeId {
    NodeId(format!("node-{}", Uuid::new_v4()))
}

pub fn handle_id() -> HandleId {
    HandleId(format!("handle-{}", Uuid::new_v4()))
}

pub fn edge_id() -> EdgeId {
    EdgeId(format!("edge-{}", Uuid::new_v4()))
}

/// Magic node ids carry [`MAGIC_NODE_MARKER`] so selections can be filtered by id alone.
pub fn magic_node_id() -> NodeId {
    NodeId(format!("{}-{}", MAGIC_NODE_MARKER, Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..100)
            .flat_map(|_| [node_id().0, handle_id().0, edge_id().0])
            .collect();
        assert_eq!(ids.len(), 300);
    }

    #[test]
    fn only_magic_ids_are_marked() {
        assert!(magic_node_id().is_magic());
        assert!(!node_id().is_magic());
    }
}
