//! Lineage recorder over the object store.

use crate::graph::{LineageEdge, LineageNode, LineageRecord};
use crate::{LineageError, LineageResult};
use bytes::Bytes;
use chrono::Utc;
use lakegov_store::ObjectStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default key prefix for lineage objects.
pub const DEFAULT_PREFIX: &str = "lineage/";

/// Lineage for one entity: every persisted record that touches it, filtered
/// down to the relevant nodes and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityLineage {
    /// The entity looked up.
    pub entity_id: String,
    /// Matching record slices, oldest first.
    pub records: Vec<LineageRecord>,
}

/// Records lineage facts as append-only objects and looks them up by entity.
pub struct LineageRecorder {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl LineageRecorder {
    /// Creates a recorder writing under the default `lineage/` prefix.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Overrides the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Records lineage for a table-to-table transformation run by a job:
    /// source --READ--> job --WRITE--> target.
    pub async fn track_table_lineage(
        &self,
        source_table: &str,
        target_table: &str,
        job_name: &str,
        transformation_details: serde_json::Value,
    ) -> LineageResult<String> {
        let source = LineageNode::table(source_table);
        let target = LineageNode::table(target_table);
        let job = LineageNode::job(job_name).with_properties(transformation_details);

        let edges = vec![
            LineageEdge::new(&source.id, &job.id, "READ"),
            LineageEdge::new(&job.id, &target.id, "WRITE"),
        ];

        self.append(vec![source, target, job], edges).await
    }

    /// Records lineage between two datasets with a caller-supplied edge type.
    pub async fn track_dataset_lineage(
        &self,
        source_dataset: &str,
        target_dataset: &str,
        transformation_type: &str,
        properties: serde_json::Value,
    ) -> LineageResult<String> {
        let source = LineageNode::dataset(source_dataset);
        let target = LineageNode::dataset(target_dataset);
        let edge = LineageEdge::new(&source.id, &target.id, transformation_type)
            .with_properties(properties);

        self.append(vec![source, target], vec![edge]).await
    }

    /// Persists one record and returns its object key.
    async fn append(
        &self,
        nodes: Vec<LineageNode>,
        edges: Vec<LineageEdge>,
    ) -> LineageResult<String> {
        let now = Utc::now();
        let record = LineageRecord {
            nodes,
            edges,
            timestamp: now.to_rfc3339(),
        };
        let body = serde_json::to_vec_pretty(&record)?;

        // Microsecond timestamp plus a content-hash suffix: two tracking
        // calls in the same second must not collide and silently overwrite
        // each other's records.
        let digest = blake3::hash(&body).to_hex();
        let suffix = &digest[..8];
        let key = format!(
            "{}{}-{}.json",
            self.prefix,
            now.format("%Y%m%dT%H%M%S%.6fZ"),
            suffix
        );

        self.store.put(&key, Bytes::from(body)).await?;
        tracing::info!(key, "recorded lineage");
        Ok(key)
    }

    /// Looks up every record touching the entity id.
    ///
    /// This is a full scan of all records ever written — O(total records)
    /// per lookup, acceptable at small scale only. An incremental entity-id
    /// index would remove the scan; it is deliberately not built here.
    pub async fn get_lineage(&self, entity_id: &str) -> LineageResult<EntityLineage> {
        let mut keys = self.store.list(Some(&self.prefix)).await?;
        keys.sort();

        let mut records = Vec::new();
        for key in keys {
            let body = self.store.get(&key).await?;
            let record: LineageRecord =
                serde_json::from_slice(&body).map_err(|e| LineageError::CorruptRecord {
                    key: key.clone(),
                    message: e.to_string(),
                })?;

            let edges: Vec<LineageEdge> = record
                .edges
                .iter()
                .filter(|e| e.touches(entity_id))
                .cloned()
                .collect();

            let nodes: Vec<LineageNode> = record
                .nodes
                .iter()
                .filter(|n| {
                    n.id == entity_id
                        || edges
                            .iter()
                            .any(|e| e.source_id == n.id || e.target_id == n.id)
                })
                .cloned()
                .collect();

            if !nodes.is_empty() || !edges.is_empty() {
                records.push(LineageRecord {
                    nodes,
                    edges,
                    timestamp: record.timestamp,
                });
            }
        }

        Ok(EntityLineage {
            entity_id: entity_id.to_string(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EntityKind;
    use lakegov_store::InMemoryStore;
    use serde_json::json;

    fn recorder() -> (Arc<InMemoryStore>, LineageRecorder) {
        let store = Arc::new(InMemoryStore::new());
        let recorder = LineageRecorder::new(store.clone());
        (store, recorder)
    }

    #[tokio::test]
    async fn test_table_lineage_roundtrip() {
        let (_, recorder) = recorder();
        recorder
            .track_table_lineage(
                "raw_t",
                "curated_t",
                "etl_job",
                json!({"transformation_type": "ETL"}),
            )
            .await
            .unwrap();

        let lineage = recorder.get_lineage("table_raw_t").await.unwrap();
        assert_eq!(lineage.records.len(), 1);

        let record = &lineage.records[0];
        assert!(record.nodes.iter().any(|n| n.id == "table_raw_t"));
        let edge = &record.edges[0];
        assert_eq!(edge.source_id, "table_raw_t");
        assert_eq!(edge.target_id, "job_etl_job");
        assert_eq!(edge.edge_type, "READ");
    }

    #[tokio::test]
    async fn test_same_second_writes_do_not_collide() {
        let (store, recorder) = recorder();
        recorder
            .track_dataset_lineage("a", "b", "COPY", json!({}))
            .await
            .unwrap();
        recorder
            .track_dataset_lineage("c", "d", "COPY", json!({}))
            .await
            .unwrap();

        assert_eq!(store.list(Some("lineage/")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_edges_accumulate() {
        let (_, recorder) = recorder();
        for _ in 0..2 {
            recorder
                .track_dataset_lineage("enrollment", "analytics", "AGGREGATION", json!({}))
                .await
                .unwrap();
        }

        let lineage = recorder.get_lineage("dataset_enrollment").await.unwrap();
        assert_eq!(lineage.records.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_is_idempotent() {
        let (_, recorder) = recorder();
        recorder
            .track_table_lineage("raw_t", "curated_t", "etl_job", json!({}))
            .await
            .unwrap();

        let first = recorder.get_lineage("job_etl_job").await.unwrap();
        let second = recorder.get_lineage("job_etl_job").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unrelated_entity_matches_nothing() {
        let (_, recorder) = recorder();
        recorder
            .track_table_lineage("raw_t", "curated_t", "etl_job", json!({}))
            .await
            .unwrap();

        let lineage = recorder
            .get_lineage(&EntityKind::Table.entity_id("other"))
            .await
            .unwrap();
        assert!(lineage.records.is_empty());
    }
}
