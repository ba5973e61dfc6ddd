//! Snapshot module - the read-only output of a reconciliation run

use crate::graph::{CanonicalEdge, CanonicalNode};
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};

/// The finished graph handed to downstream consumers
///
/// Nodes and edges appear in first-insertion order, which is
/// deterministic for a given chunk sequence. The snapshot is a plain
/// serializable value; consumers (stores, renderers) receive it
/// read-only and the reconciler retains no claim on it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Deduplicated nodes
    pub nodes: Vec<CanonicalNode>,

    /// Deduplicated edges
    pub edges: Vec<CanonicalEdge>,

    /// Labels and relationship types observed during the run
    pub vocabulary: Vocabulary,
}

impl GraphSnapshot {
    /// Whether the snapshot contains no nodes and no edges
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Look up a node by its canonical id
    pub fn node(&self, id: crate::graph::NodeId) -> Option<&CanonicalNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeId, Properties};

    #[test]
    fn test_empty_snapshot() {
        let snapshot = GraphSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.node(NodeId::from_value(0)).is_none());
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = GraphSnapshot {
            nodes: vec![CanonicalNode {
                id: NodeId::from_value(0),
                name_key: "alice".to_string(),
                label: "Person".to_string(),
                properties: Properties::new(),
            }],
            edges: Vec::new(),
            vocabulary: Vocabulary::seeded(&["Person".to_string()], &[]),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GraphSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}
