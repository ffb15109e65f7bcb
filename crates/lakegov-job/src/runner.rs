//! Job configuration and the transformation pipeline.

use crate::masking::{apply_masking, MaskingRule};
use crate::tags::{add_pii_tags, add_quality_tags};
use crate::JobResult;
use bytes::Bytes;
use lakegov_core::{Cell, Frame};
use lakegov_lineage::LineageRecorder;
use lakegov_quality::{QualityRule, RuleSuite};
use lakegov_store::ObjectStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Partition path segment for null partition values.
const NULL_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Batch job wiring: where the data comes from, where it goes, and how the
/// run is named in lineage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job name, used for the lineage JOB node.
    pub job_name: String,
    /// Dataset whose quality rule suite the job applies.
    pub dataset: String,
    /// Source table name for lineage.
    pub source_table: String,
    /// Target table name for lineage.
    pub target_table: String,
    /// Object key of the raw CSV input.
    pub input_key: String,
    /// Key prefix for partitioned output objects.
    pub output_prefix: String,
    /// Columns to partition the output by, in order.
    #[serde(default)]
    pub partition_keys: Vec<String>,
}

/// What a job run did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Rows read from the input.
    pub rows_read: usize,
    /// Rows that survived the quality filter.
    pub rows_written: usize,
    /// Output objects written.
    pub partitions_written: usize,
    /// Object key of the recorded lineage fact.
    pub lineage_key: String,
}

/// The batch transformation pipeline: quality filter, masking, governance
/// tags, partitioned write, lineage fact.
pub struct TransformJob {
    config: JobConfig,
    quality_rules: Vec<QualityRule>,
    masking_rules: Vec<MaskingRule>,
    sensitive_fields: Vec<String>,
}

impl TransformJob {
    /// Creates a job from its configuration pieces.
    pub fn new(
        config: JobConfig,
        quality_rules: Vec<QualityRule>,
        masking_rules: Vec<MaskingRule>,
        sensitive_fields: Vec<String>,
    ) -> Self {
        Self {
            config,
            quality_rules,
            masking_rules,
            sensitive_fields,
        }
    }

    /// Runs the pipeline end to end.
    pub async fn run(
        &self,
        store: &dyn ObjectStore,
        recorder: &LineageRecorder,
    ) -> JobResult<JobOutcome> {
        let body = store.get(&self.config.input_key).await?;
        let mut frame = Frame::from_csv(body.as_ref())?;
        let rows_read = frame.row_count();
        tracing::info!(
            job = %self.config.job_name,
            input = %self.config.input_key,
            rows = rows_read,
            "loaded raw data"
        );

        let suite = RuleSuite::compile(self.quality_rules.clone())?;
        self.filter_rows(&suite, &mut frame)?;
        let rows_written = frame.row_count();
        if rows_written < rows_read {
            tracing::warn!(
                job = %self.config.job_name,
                dropped = rows_read - rows_written,
                "dropped rows failing quality rules"
            );
        }

        apply_masking(&mut frame, &self.masking_rules)?;
        add_pii_tags(&mut frame, &self.sensitive_fields)?;
        add_quality_tags(&mut frame, suite.rules())?;

        let partitions_written = self.write_partitions(store, &frame).await?;

        let lineage_key = recorder
            .track_table_lineage(
                &self.config.source_table,
                &self.config.target_table,
                &self.config.job_name,
                json!({
                    "transformation_type": "ETL",
                    "quality_checks_applied": true,
                    "masking_applied": true,
                    "governance_tags_added": true,
                    "rows_read": rows_read,
                    "rows_written": rows_written,
                }),
            )
            .await?;

        Ok(JobOutcome {
            rows_read,
            rows_written,
            partitions_written,
            lineage_key,
        })
    }

    /// Drops rows failing the quality rules. The per-row predicate is pure,
    /// so rows can be evaluated in any order.
    #[cfg(not(feature = "rayon"))]
    fn filter_rows(&self, suite: &RuleSuite, frame: &mut Frame) -> JobResult<()> {
        let bound = suite.bind(frame)?;
        frame.retain_rows(|row| bound.row_passes(row));
        Ok(())
    }

    /// Drops rows failing the quality rules, evaluating the predicate in
    /// parallel.
    #[cfg(feature = "rayon")]
    fn filter_rows(&self, suite: &RuleSuite, frame: &mut Frame) -> JobResult<()> {
        use rayon::prelude::*;

        let bound = suite.bind(frame)?;
        let keep: Vec<bool> = frame
            .rows()
            .par_iter()
            .map(|row| bound.row_passes(row))
            .collect();

        let mut index = 0;
        frame.retain_rows(|_| {
            let kept = keep[index];
            index += 1;
            kept
        });
        Ok(())
    }

    /// Writes the frame as JSON-lines objects partitioned by the configured
    /// keys, `k=v/` path segments in key order.
    async fn write_partitions(
        &self,
        store: &dyn ObjectStore,
        frame: &Frame,
    ) -> JobResult<usize> {
        let partition_indexes = self
            .config
            .partition_keys
            .iter()
            .map(|k| frame.column_index(k))
            .collect::<Result<Vec<_>, _>>()?;

        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (row_idx, row) in frame.rows().iter().enumerate() {
            let path: String = self
                .config
                .partition_keys
                .iter()
                .zip(&partition_indexes)
                .map(|(key, &idx)| format!("{key}={}/", partition_value(&row[idx])))
                .collect();
            groups.entry(path).or_default().push(row_idx);
        }

        let partitions = groups.len();
        for (path, row_indexes) in groups {
            let mut body = String::new();
            for &row_idx in &row_indexes {
                let object: serde_json::Map<String, serde_json::Value> = frame
                    .columns()
                    .iter()
                    .zip(&frame.rows()[row_idx])
                    .map(|(column, cell)| {
                        Ok((column.clone(), serde_json::to_value(cell)?))
                    })
                    .collect::<Result<_, serde_json::Error>>()?;
                body.push_str(&serde_json::to_string(&object)?);
                body.push('\n');
            }

            let key = format!("{}{}part-00000.jsonl", self.config.output_prefix, path);
            store.put(&key, Bytes::from(body)).await?;
            tracing::debug!(key, rows = row_indexes.len(), "wrote partition");
        }

        Ok(partitions)
    }
}

fn partition_value(cell: &Cell) -> String {
    if cell.is_null() {
        NULL_PARTITION.to_string()
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_value_rendering() {
        assert_eq!(partition_value(&Cell::Text("physics".into())), "physics");
        assert_eq!(partition_value(&Cell::Null), NULL_PARTITION);
    }

    #[test]
    fn test_job_config_yaml_shape() {
        let yaml = r#"
job_name: student_records_etl
dataset: student_records
source_table: raw_student_records
target_table: curated_student_records
input_key: raw/student_records/part-00000.csv
output_prefix: curated/student_records/
partition_keys: [department, enrollment_status]
"#;
        let config: JobConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.partition_keys.len(), 2);
        assert_eq!(config.job_name, "student_records_etl");
    }
}
