//! Lineage nodes, edges, and records.

use serde::{Deserialize, Serialize};

/// Kind of entity a lineage node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Catalog table.
    Table,
    /// Transformation job.
    Job,
    /// Logical dataset.
    Dataset,
}

impl EntityKind {
    /// Returns the id prefix for this kind.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Job => "job",
            Self::Dataset => "dataset",
        }
    }

    /// Builds the stable node id for an entity of this kind.
    ///
    /// Ids are a deterministic function of (kind, name) so the same entity
    /// resolves to the same id across separate tracking calls.
    #[must_use]
    pub fn entity_id(&self, name: &str) -> String {
        format!("{}_{name}", self.prefix())
    }
}

/// A node in a lineage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageNode {
    /// Stable entity id, `{kind_prefix}_{name}`.
    pub id: String,
    /// Entity kind.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Entity name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arbitrary properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

impl LineageNode {
    /// Creates a node of the given kind.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: kind.entity_id(&name),
            kind,
            name,
            description: None,
            properties: None,
        }
    }

    /// Creates a TABLE node.
    pub fn table(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Table, name)
    }

    /// Creates a JOB node.
    pub fn job(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Job, name)
    }

    /// Creates a DATASET node.
    pub fn dataset(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Dataset, name)
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the properties.
    #[must_use]
    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// A directed edge between two lineage nodes.
///
/// Edges carry no uniqueness constraint: duplicates across separate
/// tracking calls are expected and accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageEdge {
    /// Source node id.
    pub source_id: String,
    /// Target node id.
    pub target_id: String,
    /// Edge type (e.g. `READ`, `WRITE`, or a transformation type).
    pub edge_type: String,
    /// Arbitrary properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

impl LineageEdge {
    /// Creates an edge.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            edge_type: edge_type.into(),
            properties: None,
        }
    }

    /// Sets the properties.
    #[must_use]
    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Returns true if the edge touches the entity id.
    #[must_use]
    pub fn touches(&self, entity_id: &str) -> bool {
        self.source_id == entity_id || self.target_id == entity_id
    }
}

/// One persisted lineage record: the nodes and edges written by a single
/// tracking call, never mutated or merged afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageRecord {
    /// Nodes in this record.
    pub nodes: Vec<LineageNode>,
    /// Edges in this record.
    pub edges: Vec<LineageEdge>,
    /// Write timestamp, RFC 3339.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_are_stable() {
        assert_eq!(EntityKind::Table.entity_id("raw_t"), "table_raw_t");
        assert_eq!(LineageNode::job("etl").id, "job_etl");
        assert_eq!(
            LineageNode::dataset("enrollment").id,
            LineageNode::dataset("enrollment").id
        );
    }

    #[test]
    fn test_edge_touches() {
        let edge = LineageEdge::new("table_a", "job_b", "READ");
        assert!(edge.touches("table_a"));
        assert!(edge.touches("job_b"));
        assert!(!edge.touches("table_c"));
    }

    #[test]
    fn test_kind_serializes_upper() {
        let json = serde_json::to_string(&EntityKind::Dataset).unwrap();
        assert_eq!(json, "\"DATASET\"");
    }
}
