//! Graph module - extracted (chunk-local) and canonical (run-global) nodes and edges

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Property bag attached to nodes and edges
///
/// Extraction models return free-form JSON objects here, so values stay
/// dynamically typed all the way to the output boundary.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Identifier of a canonical node, stable for the duration of a run
///
/// Ids are minted from a monotonically increasing counter by the
/// reconciler and never reused within a run, even if nodes are later
/// removed. The counter (rather than a random UUID) keeps
/// reconciliation reproducible: the same chunk sequence always yields
/// the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a NodeId from a raw counter value
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// Parse a NodeId from its string form (`n<counter>`)
    ///
    /// # Examples
    ///
    /// ```
    /// use graphmint_domain::NodeId;
    ///
    /// let id = NodeId::from_value(7);
    /// assert_eq!(id.to_string(), "n7");
    /// assert_eq!(NodeId::from_string("n7").unwrap(), id);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        let digits = s
            .strip_prefix('n')
            .ok_or_else(|| format!("Invalid node id '{}': missing 'n' prefix", s))?;
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|e| format!("Invalid node id '{}': {}", s, e))
    }

    /// Get the raw counter value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// Serialized as the `n<counter>` string so downstream consumers see the
// same identifier they would read in logs.
impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        NodeId::from_string(&s).map_err(D::Error::custom)
    }
}

/// A node as returned by one extraction call
///
/// `local_id` is only meaningful within the same call's result; the
/// reconciler maps it to a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedNode {
    /// Identifier assigned by the model, unique within this result only
    pub local_id: String,

    /// Entity label (e.g. "Person", "Organization")
    pub label: String,

    /// Free-form properties; by convention carries a `name` entry
    pub properties: Properties,
}

impl ExtractedNode {
    /// The node's `name` property, when present and a string
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(|v| v.as_str())
    }
}

/// An edge as returned by one extraction call
///
/// Endpoints reference `local_id`s from the same result's node set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEdge {
    /// Local id of the start node
    pub start_local_id: String,

    /// Relationship type (e.g. "owns", "works_at")
    #[serde(rename = "type")]
    pub rel_type: String,

    /// Local id of the end node
    pub end_local_id: String,

    /// Free-form properties
    pub properties: Properties,
}

/// A deduplicated node in the run-global graph
///
/// Exactly one canonical node exists per normalized entity name;
/// properties from later occurrences are merged in, never dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalNode {
    /// Run-stable identifier
    pub id: NodeId,

    /// Case-folded, whitespace-trimmed name this node is keyed on
    pub name_key: String,

    /// Entity label from the node's first occurrence
    pub label: String,

    /// Merged properties across all occurrences
    pub properties: Properties,
}

/// A deduplicated edge in the run-global graph
///
/// `(start, rel_type, end)` is unique; repeated sightings merge their
/// properties instead of duplicating the edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEdge {
    /// Canonical id of the start node
    pub start: NodeId,

    /// Relationship type
    #[serde(rename = "type")]
    pub rel_type: String,

    /// Canonical id of the end node
    pub end: NodeId,

    /// Merged properties across all occurrences
    pub properties: Properties,
}
