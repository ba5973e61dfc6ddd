//! Run summary reporting

use graphmint_domain::RunId;
use serde::{Deserialize, Serialize};

/// Summary of one ingestion call
///
/// Counts cover what the run saw, kept, merged, and dropped; the
/// non-fatal diagnostics (skipped entries, unresolved endpoints, label
/// conflicts) are tallied here in addition to being logged as they
/// happen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// The run this ingestion belongs to
    pub run_id: RunId,

    /// Chunks produced by the splitter
    pub chunks_total: usize,

    /// Chunks lost to extraction failures, timeouts, or unparseable output
    pub chunks_failed: usize,

    /// Node entries dropped as malformed during parsing
    pub nodes_skipped: usize,

    /// Edge entries dropped as malformed or dangling during parsing
    pub edges_skipped: usize,

    /// Nodes that minted a new canonical id
    pub nodes_created: usize,

    /// Nodes merged into an existing canonical node
    pub nodes_merged: usize,

    /// Edges added to the canonical edge set
    pub edges_created: usize,

    /// Edges merged into an existing canonical edge
    pub edges_merged: usize,

    /// Edges dropped at reconciliation because an endpoint did not resolve
    pub unresolved_edges: usize,

    /// Label disagreements resolved in favor of the first occurrence
    pub label_conflicts: usize,

    /// Wall-clock time for the ingestion call (milliseconds)
    pub processing_time_ms: u64,
}

impl IngestReport {
    /// Create an empty report for a run
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            chunks_total: 0,
            chunks_failed: 0,
            nodes_skipped: 0,
            edges_skipped: 0,
            nodes_created: 0,
            nodes_merged: 0,
            edges_created: 0,
            edges_merged: 0,
            unresolved_edges: 0,
            label_conflicts: 0,
            processing_time_ms: 0,
        }
    }

    /// Whether every chunk contributed to the graph
    pub fn is_complete(&self) -> bool {
        self.chunks_failed == 0
    }
}
