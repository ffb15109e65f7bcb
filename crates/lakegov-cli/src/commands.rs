//! CLI command definitions and implementations.
//!
//! One subcommand per governance operation:
//! - `lakegov deploy --config <path>` - deploy access-control policies
//! - `lakegov classify --config <path>` - classify a field
//! - `lakegov validate --config <path>` - validate a dataset
//! - `lakegov lineage <track-table|track-dataset|get> --config <path>`
//! - `lakegov job --config <path>` - run the batch transformation

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use lakegov_classify::FieldClassifier;
use lakegov_core::Frame;
use lakegov_lineage::LineageRecorder;
use lakegov_policy::PolicyDeployer;
use lakegov_quality::QualityEngine;
use lakegov_job::TransformJob;

use crate::config::GovernanceConfig;
use crate::output::{success, CliError};

/// lakegov CLI
///
/// Data-governance toolkit: classification, quality validation, lineage,
/// and policy deployment for a cloud data lake.
#[derive(Parser)]
#[command(name = "lakegov")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Path to the governance configuration document
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Deploy access-control policies to the catalog
    Deploy(DeployCommand),

    /// Classify a field for privacy sensitivity
    Classify(ClassifyCommand),

    /// Validate a dataset against its declared quality rules
    Validate(ValidateCommand),

    /// Record and inspect dataset/job lineage
    #[command(subcommand)]
    Lineage(LineageCommands),

    /// Run the batch transformation job end to end
    Job(JobCommand),
}

impl Cli {
    /// Runs the selected command.
    pub async fn run(self) -> Result<(), CliError> {
        let config = GovernanceConfig::load(&self.config)?;

        match self.command {
            Commands::Deploy(cmd) => cmd.run(&config).await,
            Commands::Classify(cmd) => cmd.run(&config).await,
            Commands::Validate(cmd) => cmd.run(&config).await,
            Commands::Lineage(cmd) => cmd.run(&config).await,
            Commands::Job(cmd) => cmd.run(&config).await,
        }
    }
}

async fn build_recorder(config: &GovernanceConfig) -> Result<LineageRecorder, CliError> {
    let store = config.build_store().await?;
    let mut recorder = LineageRecorder::new(store);
    if let Some(ref prefix) = config.settings.lineage_prefix {
        recorder = recorder.with_prefix(prefix.clone());
    }
    Ok(recorder)
}

/// Deploy command.
#[derive(Args)]
pub struct DeployCommand {}

impl DeployCommand {
    /// Deploys the policy slice of the document.
    pub async fn run(self, config: &GovernanceConfig) -> Result<(), CliError> {
        let catalog = config.build_catalog().await?;
        let deployer = PolicyDeployer::new(catalog);

        let summary = deployer.deploy(&config.policy_config()).await?;
        success(&format!(
            "deployed policies: {} database(s), {} grant(s), {} row filter(s)",
            summary.databases_created, summary.grants_issued, summary.row_filters_created
        ));
        Ok(())
    }
}

/// Classify command.
#[derive(Args)]
pub struct ClassifyCommand {
    /// Field name to classify
    #[arg(long)]
    pub field: String,

    /// Sample values, comma separated
    #[arg(long, value_delimiter = ',')]
    pub samples: Vec<String>,

    /// Persist the classification onto this catalog database
    #[arg(long, requires = "table")]
    pub database: Option<String>,

    /// Persist the classification onto this catalog table
    #[arg(long, requires = "database")]
    pub table: Option<String>,
}

impl ClassifyCommand {
    /// Classifies the field and optionally persists the result.
    pub async fn run(self, config: &GovernanceConfig) -> Result<(), CliError> {
        let classifier = FieldClassifier::new(config.classifier_config())?;
        let classification = classifier.classify_field(&self.field, &self.samples);

        println!("{:<18} {}", "Field:".bold(), classification.field_name);
        println!(
            "{:<18} {}",
            "Privacy level:".bold(),
            classification.privacy_level
        );
        println!(
            "{:<18} {}",
            "PII type:".bold(),
            classification.pii_type.as_deref().unwrap_or("none")
        );
        println!(
            "{:<18} {}",
            "Masking required:".bold(),
            classification.masking_required
        );
        println!("{:<18} {}", "Description:".bold(), classification.description);

        if let (Some(database), Some(table)) = (&self.database, &self.table) {
            let catalog = config.build_catalog().await?;
            classifier
                .apply_to_table(catalog.as_ref(), database, table, &[classification])
                .await?;
            success(&format!("persisted classification to {database}.{table}"));
        }

        Ok(())
    }
}

/// Validate command.
#[derive(Args)]
pub struct ValidateCommand {
    /// Dataset name (selects the quality_rules entry)
    #[arg(long)]
    pub dataset: String,

    /// Path to the CSV file to validate
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Persist the report to the object store under reports/<dataset>.json
    #[arg(long)]
    pub save_report: bool,

    /// Exit non-zero when any rule fails
    #[arg(long)]
    pub fail_on_failure: bool,
}

impl ValidateCommand {
    /// Validates the input file against the dataset's rule suite.
    pub async fn run(self, config: &GovernanceConfig) -> Result<(), CliError> {
        let rules = config.quality_rules_for(&self.dataset)?;
        let engine = QualityEngine::with_rules(rules)?;

        let file = std::fs::File::open(&self.input)?;
        let frame = Frame::from_csv(file)?;
        let report = engine.validate(&frame)?;

        if report.success {
            success(&format!(
                "all {} checks passed over {} rows",
                report.stats.checks_evaluated, report.stats.rows_evaluated
            ));
        } else {
            println!(
                "{} {:.1}% of {} checks passed",
                "validation failed:".red().bold(),
                report.stats.success_percent,
                report.stats.checks_evaluated
            );
            for outcome in report.failures() {
                println!(
                    "  {} {} rule on '{}': {} failing value(s)",
                    "✗".red(),
                    outcome.rule_type,
                    outcome.column,
                    outcome.failing_values
                );
            }
        }

        if self.save_report {
            let store = config.build_store().await?;
            let key = format!("reports/{}.json", self.dataset);
            report.persist(store.as_ref(), &key).await?;
            success(&format!("report saved to {key}"));
        }

        if !report.success && self.fail_on_failure {
            return Err(CliError::validation(format!(
                "{} of {} checks failed",
                report.stats.checks_failed, report.stats.checks_evaluated
            )));
        }
        Ok(())
    }
}

/// Lineage commands.
#[derive(Subcommand)]
pub enum LineageCommands {
    /// Record table-to-table lineage for a job run
    TrackTable(TrackTableCommand),

    /// Record dataset-to-dataset lineage
    TrackDataset(TrackDatasetCommand),

    /// Look up every lineage record touching an entity id
    Get(GetLineageCommand),
}

impl LineageCommands {
    /// Runs the selected lineage command.
    pub async fn run(self, config: &GovernanceConfig) -> Result<(), CliError> {
        match self {
            Self::TrackTable(cmd) => cmd.run(config).await,
            Self::TrackDataset(cmd) => cmd.run(config).await,
            Self::Get(cmd) => cmd.run(config).await,
        }
    }
}

/// Track-table command.
#[derive(Args)]
pub struct TrackTableCommand {
    /// Source table name
    #[arg(long)]
    pub source: String,

    /// Target table name
    #[arg(long)]
    pub target: String,

    /// Job that performed the transformation
    #[arg(long)]
    pub job_name: String,

    /// Transformation details as a JSON object
    #[arg(long)]
    pub details: Option<String>,
}

impl TrackTableCommand {
    /// Records one table-lineage fact.
    pub async fn run(self, config: &GovernanceConfig) -> Result<(), CliError> {
        let details = parse_json_arg(self.details.as_deref(), "--details")?;
        let recorder = build_recorder(config).await?;

        let key = recorder
            .track_table_lineage(&self.source, &self.target, &self.job_name, details)
            .await?;
        success(&format!("recorded lineage at {key}"));
        Ok(())
    }
}

/// Track-dataset command.
#[derive(Args)]
pub struct TrackDatasetCommand {
    /// Source dataset name
    #[arg(long)]
    pub source: String,

    /// Target dataset name
    #[arg(long)]
    pub target: String,

    /// Transformation type, used as the edge type
    #[arg(long)]
    pub transformation_type: String,

    /// Edge properties as a JSON object
    #[arg(long)]
    pub properties: Option<String>,
}

impl TrackDatasetCommand {
    /// Records one dataset-lineage fact.
    pub async fn run(self, config: &GovernanceConfig) -> Result<(), CliError> {
        let properties = parse_json_arg(self.properties.as_deref(), "--properties")?;
        let recorder = build_recorder(config).await?;

        let key = recorder
            .track_dataset_lineage(
                &self.source,
                &self.target,
                &self.transformation_type,
                properties,
            )
            .await?;
        success(&format!("recorded lineage at {key}"));
        Ok(())
    }
}

/// Get-lineage command.
#[derive(Args)]
pub struct GetLineageCommand {
    /// Entity id, e.g. table_curated_student_records
    pub entity_id: String,
}

impl GetLineageCommand {
    /// Prints every record touching the entity as JSON.
    pub async fn run(self, config: &GovernanceConfig) -> Result<(), CliError> {
        let recorder = build_recorder(config).await?;
        let lineage = recorder.get_lineage(&self.entity_id).await?;
        println!("{}", serde_json::to_string_pretty(&lineage)?);
        Ok(())
    }
}

/// Job command.
#[derive(Args)]
pub struct JobCommand {}

impl JobCommand {
    /// Runs the batch transformation described by the document's job section.
    pub async fn run(self, config: &GovernanceConfig) -> Result<(), CliError> {
        let job_config = config
            .job
            .clone()
            .ok_or_else(|| CliError::config("the document has no job section"))?;
        let rules = config.quality_rules_for(&job_config.dataset)?;

        let store = config.build_store().await?;
        let mut recorder = LineageRecorder::new(store.clone());
        if let Some(ref prefix) = config.settings.lineage_prefix {
            recorder = recorder.with_prefix(prefix.clone());
        }
        let job = TransformJob::new(
            job_config,
            rules,
            config.masking_rules.clone(),
            config.all_sensitive_fields(),
        );

        let outcome = job.run(store.as_ref(), &recorder).await?;
        success(&format!(
            "job complete: {} of {} rows written across {} partition(s), lineage at {}",
            outcome.rows_written, outcome.rows_read, outcome.partitions_written,
            outcome.lineage_key
        ));
        Ok(())
    }
}

fn parse_json_arg(value: Option<&str>, flag: &str) -> Result<serde_json::Value, CliError> {
    match value {
        None => Ok(serde_json::json!({})),
        Some(raw) => {
            let parsed: serde_json::Value = serde_json::from_str(raw)
                .map_err(|e| CliError::config(format!("{flag} is not valid JSON: {e}")))?;
            if !parsed.is_object() {
                return Err(CliError::config(format!("{flag} must be a JSON object")));
            }
            Ok(parsed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_flag_is_required() {
        let result = Cli::try_parse_from(["lakegov", "deploy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_deploy() {
        let cli = Cli::try_parse_from(["lakegov", "--config", "gov.yaml", "deploy"]).unwrap();
        assert!(matches!(cli.command, Commands::Deploy(_)));
        assert_eq!(cli.config, PathBuf::from("gov.yaml"));
    }

    #[test]
    fn test_parse_classify_samples() {
        let cli = Cli::try_parse_from([
            "lakegov",
            "--config",
            "gov.yaml",
            "classify",
            "--field",
            "student_gpa",
            "--samples",
            "3.85,3.92,4.00",
        ])
        .unwrap();

        match cli.command {
            Commands::Classify(cmd) => {
                assert_eq!(cmd.field, "student_gpa");
                assert_eq!(cmd.samples, vec!["3.85", "3.92", "4.00"]);
            }
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn test_parse_json_arg() {
        assert_eq!(
            parse_json_arg(None, "--details").unwrap(),
            serde_json::json!({})
        );
        assert!(parse_json_arg(Some("{\"a\": 1}"), "--details").is_ok());
        assert!(parse_json_arg(Some("[1]"), "--details").is_err());
        assert!(parse_json_arg(Some("not json"), "--details").is_err());
    }
}
