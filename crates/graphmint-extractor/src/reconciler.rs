//! Cross-chunk identifier reconciliation
//!
//! The reconciler is the single owner of the run-global canonical node
//! table, canonical edge table, and vocabulary. Chunk results must be
//! applied sequentially (ascending chunk index) so that "first
//! occurrence wins" is reproducible; concurrent extraction is fine,
//! concurrent reconciliation is not.

use graphmint_domain::{
    CanonicalEdge, CanonicalNode, ExtractedEdge, ExtractedNode, GraphSnapshot, NodeId, Properties,
    Vocabulary,
};
use std::collections::HashMap;
use tracing::warn;

/// Merges per-chunk extractions into one deduplicated graph
///
/// Nodes are keyed on their case-folded, whitespace-trimmed entity
/// name, so "Barack Obama" and "barack obama" collapse into one
/// canonical node no matter which chunk or document they came from.
#[derive(Debug, Default)]
pub struct Reconciler {
    /// Canonical key -> position in `nodes`
    node_index: HashMap<String, usize>,

    /// Canonical nodes in first-insertion order
    nodes: Vec<CanonicalNode>,

    /// Edge dedup key -> position in `edges`
    edge_index: HashMap<(NodeId, String, NodeId), usize>,

    /// Canonical edges in first-insertion order
    edges: Vec<CanonicalEdge>,

    vocabulary: Vocabulary,

    /// Next NodeId counter value; never decremented or reused
    next_id: u64,
}

/// Outcome of reconciling one chunk's extraction
#[derive(Debug, Clone, Default)]
pub struct ChunkReconciliation {
    /// This chunk's local id -> canonical id mapping
    pub local_to_canonical: HashMap<String, NodeId>,

    /// Nodes that minted a new canonical id
    pub nodes_created: usize,

    /// Nodes merged into an existing canonical node
    pub nodes_merged: usize,

    /// Edges added to the canonical edge set
    pub edges_created: usize,

    /// Edges merged into an existing canonical edge
    pub edges_merged: usize,

    /// Edges dropped because an endpoint did not resolve
    pub unresolved_edges: usize,

    /// Nodes whose label disagreed with the first occurrence
    pub label_conflicts: usize,
}

impl Reconciler {
    /// Create an empty reconciler
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the vocabulary (e.g. from configured schema hints)
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Apply one chunk's extraction to the canonical graph
    ///
    /// The local->canonical map is built from this chunk's nodes before
    /// its edges are resolved, so edges may reference any node of the
    /// same chunk regardless of entry order.
    pub fn reconcile_chunk(
        &mut self,
        chunk_index: usize,
        nodes: &[ExtractedNode],
        edges: &[ExtractedEdge],
    ) -> ChunkReconciliation {
        let mut outcome = ChunkReconciliation::default();

        for node in nodes {
            let key = canonical_key(node);
            let id = match self.node_index.get(&key) {
                Some(&pos) => {
                    let existing = &mut self.nodes[pos];
                    if existing.label != node.label {
                        warn!(
                            chunk = chunk_index,
                            entity = %key,
                            kept = %existing.label,
                            seen = %node.label,
                            "label conflict; keeping first occurrence"
                        );
                        outcome.label_conflicts += 1;
                    }
                    merge_properties(&mut existing.properties, &node.properties);
                    outcome.nodes_merged += 1;
                    existing.id
                }
                None => {
                    let id = NodeId::from_value(self.next_id);
                    self.next_id += 1;
                    self.vocabulary.observe_label(&node.label);

                    let mut properties = Properties::new();
                    merge_properties(&mut properties, &node.properties);

                    self.node_index.insert(key.clone(), self.nodes.len());
                    self.nodes.push(CanonicalNode {
                        id,
                        name_key: key,
                        label: node.label.clone(),
                        properties,
                    });
                    outcome.nodes_created += 1;
                    id
                }
            };
            outcome.local_to_canonical.insert(node.local_id.clone(), id);
        }

        for edge in edges {
            let (start, end) = match (
                outcome.local_to_canonical.get(&edge.start_local_id),
                outcome.local_to_canonical.get(&edge.end_local_id),
            ) {
                (Some(&start), Some(&end)) => (start, end),
                _ => {
                    warn!(
                        chunk = chunk_index,
                        start = %edge.start_local_id,
                        end = %edge.end_local_id,
                        rel_type = %edge.rel_type,
                        "unresolved edge endpoint; dropping edge"
                    );
                    outcome.unresolved_edges += 1;
                    continue;
                }
            };

            self.vocabulary.observe_rel_type(&edge.rel_type);

            let key = (start, edge.rel_type.clone(), end);
            match self.edge_index.get(&key) {
                Some(&pos) => {
                    merge_properties(&mut self.edges[pos].properties, &edge.properties);
                    outcome.edges_merged += 1;
                }
                None => {
                    let mut properties = Properties::new();
                    merge_properties(&mut properties, &edge.properties);

                    self.edge_index.insert(key, self.edges.len());
                    self.edges.push(CanonicalEdge {
                        start,
                        rel_type: edge.rel_type.clone(),
                        end,
                        properties,
                    });
                    outcome.edges_created += 1;
                }
            }
        }

        outcome
    }

    /// Number of canonical nodes so far
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of canonical edges so far
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The vocabulary accumulated so far
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Copy out the current canonical graph
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            vocabulary: self.vocabulary.clone(),
        }
    }

    /// Consume the reconciler, yielding the canonical graph
    pub fn into_snapshot(self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes,
            edges: self.edges,
            vocabulary: self.vocabulary,
        }
    }
}

/// Dedup key for a node: case-folded, whitespace-trimmed entity name
///
/// Taken from the node's `name` property when it is a string, else the
/// local identifier.
fn canonical_key(node: &ExtractedNode) -> String {
    node.name()
        .unwrap_or(&node.local_id)
        .trim()
        .to_lowercase()
}

/// Last-write-wins property merge
///
/// Non-null values from `incoming` overwrite; null values never erase
/// what an earlier occurrence established; keys absent from `incoming`
/// are preserved.
fn merge_properties(existing: &mut Properties, incoming: &Properties) {
    for (key, value) in incoming {
        if !value.is_null() {
            existing.insert(key.clone(), value.clone());
        }
    }
}
