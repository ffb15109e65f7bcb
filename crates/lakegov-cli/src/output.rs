//! CLI error types and reporting.

use std::process::ExitCode;

use colored::Colorize;

/// CLI error type.
#[derive(Debug)]
pub struct CliError {
    /// Error kind.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
    /// Underlying cause.
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Error kind, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed configuration.
    Config,
    /// Data failed declared rules and the caller asked for that to be fatal.
    Validation,
    /// An external catalog/security/object-store call failed.
    Service,
    /// Local IO error.
    Io,
    /// Internal error.
    Internal,
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a new CLI error with a cause.
    pub fn with_cause<E>(kind: ErrorKind, message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind,
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a service error.
    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Service, message)
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self.kind {
            ErrorKind::Config => ExitCode::from(2),
            ErrorKind::Validation => ExitCode::from(3),
            ErrorKind::Service => ExitCode::from(4),
            ErrorKind::Io => ExitCode::from(5),
            ErrorKind::Internal => ExitCode::from(255),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref cause) = self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|e| e.as_ref() as _)
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::with_cause(ErrorKind::Io, "IO error", error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::with_cause(ErrorKind::Internal, "JSON error", error)
    }
}

impl From<lakegov_core::CoreError> for CliError {
    fn from(error: lakegov_core::CoreError) -> Self {
        Self::with_cause(ErrorKind::Config, "data error", error)
    }
}

impl From<lakegov_store::StoreError> for CliError {
    fn from(error: lakegov_store::StoreError) -> Self {
        let kind = match &error {
            lakegov_store::StoreError::Configuration(_) => ErrorKind::Config,
            lakegov_store::StoreError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Service,
        };
        Self::with_cause(kind, "object store failure", error)
    }
}

impl From<lakegov_catalog::CatalogError> for CliError {
    fn from(error: lakegov_catalog::CatalogError) -> Self {
        let kind = match &error {
            lakegov_catalog::CatalogError::Configuration(_) => ErrorKind::Config,
            _ => ErrorKind::Service,
        };
        Self::with_cause(kind, "catalog failure", error)
    }
}

impl From<lakegov_classify::ClassifyError> for CliError {
    fn from(error: lakegov_classify::ClassifyError) -> Self {
        let kind = match &error {
            lakegov_classify::ClassifyError::Catalog(_) => ErrorKind::Service,
            _ => ErrorKind::Config,
        };
        Self::with_cause(kind, "classification failure", error)
    }
}

impl From<lakegov_quality::QualityError> for CliError {
    fn from(error: lakegov_quality::QualityError) -> Self {
        let kind = match &error {
            lakegov_quality::QualityError::Store(_) => ErrorKind::Service,
            _ => ErrorKind::Config,
        };
        Self::with_cause(kind, "validation setup failure", error)
    }
}

impl From<lakegov_lineage::LineageError> for CliError {
    fn from(error: lakegov_lineage::LineageError) -> Self {
        Self::with_cause(ErrorKind::Service, "lineage failure", error)
    }
}

impl From<lakegov_policy::PolicyError> for CliError {
    fn from(error: lakegov_policy::PolicyError) -> Self {
        let kind = match &error {
            lakegov_policy::PolicyError::Configuration(_) => ErrorKind::Config,
            lakegov_policy::PolicyError::Catalog(_) => ErrorKind::Service,
        };
        Self::with_cause(kind, "policy deploy failure", error)
    }
}

impl From<lakegov_job::JobError> for CliError {
    fn from(error: lakegov_job::JobError) -> Self {
        let kind = match &error {
            lakegov_job::JobError::Configuration(_) | lakegov_job::JobError::Quality(_) => {
                ErrorKind::Config
            }
            lakegov_job::JobError::Store(_) | lakegov_job::JobError::Lineage(_) => {
                ErrorKind::Service
            }
            _ => ErrorKind::Internal,
        };
        Self::with_cause(kind, "job failure", error)
    }
}

/// Prints an error to stderr.
pub fn print_error(error: &CliError) {
    let prefix = match error.kind {
        ErrorKind::Config => "Configuration error",
        ErrorKind::Validation => "Validation failed",
        ErrorKind::Service => "Service error",
        ErrorKind::Io => "IO error",
        ErrorKind::Internal => "Internal error",
    };

    eprintln!("{} {}", format!("{prefix}:").red().bold(), error.message);

    if let Some(ref cause) = error.cause {
        eprintln!("  {}", format!("Caused by: {cause}").dimmed());
    }

    if error.kind == ErrorKind::Config {
        eprintln!();
        eprintln!(
            "{}",
            "Hint: check the document passed via --config.".dimmed()
        );
    }
}

/// Prints a success line to stdout.
pub fn success(message: &str) {
    println!("{} {message}", "✓".green().bold());
}
