//! [`CliError`]: everything a command can fail with, plus how it is shown
//! to the user and which exit status it maps to.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use strata_core::error::StrataError;

pub use strata_core::error::ErrorCategory as CoreCategory;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// `init` found an existing file and was not allowed to replace it.
    #[error("Configuration already exists at {path}")]
    ConfigExists { path: PathBuf },

    /// A configuration value could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Anything raised by `strata-core` or an adapter; keeps the core's own
    /// suggestions and category.
    #[error("{0}")]
    Core(#[from] StrataError),

    /// Filesystem or terminal I/O outside the core.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Machine-readable output could not be produced.
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// The user declined a confirmation prompt.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Hints printed under the message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ConfigExists { path } => vec![
                format!("Edit {} directly", path.display()),
                "Use --force to replace it with the defaults".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Check the file shown by 'strata config path' and any STRATA__* variables".into(),
                "Use 'strata init --force' to restore the defaults".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Encode(_) => vec!["Retry without --output-format json".into()],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::ConfigExists { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Conflict => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::External | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::Encode(_) => ErrorCategory::Internal,
        }
    }

    /// 2 user error, 3 not found, 4 configuration, 1 everything else.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Message, cause chain (when `verbose`) and hints, with ANSI styling.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));

        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Decides the exit status and the heading colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

/// Attach a context message to an `io::Result` while converting it.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use strata_core::{application::ApplicationError, domain::DomainError};

    fn core(err: impl Into<StrataError>) -> CliError {
        CliError::Core(err.into())
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn module_not_found_exits_three() {
        let err = core(ApplicationError::ModuleNotFound {
            path: PathBuf::from("/work/Shop"),
        });
        assert_eq!(err.exit_code(), 3);
        assert!(err.suggestions().iter().any(|s| s.contains("--module")));
    }

    #[test]
    fn validation_and_conflict_are_user_errors() {
        let invalid = core(DomainError::InvalidModuleName {
            name: "1Shop".into(),
            reason: "starts with a digit".into(),
        });
        assert_eq!(invalid.exit_code(), 2);

        let corrupt = core(ApplicationError::RegistryCorrupt {
            path: PathBuf::from("r.json"),
            reason: "invalid JSON".into(),
        });
        assert_eq!(corrupt.exit_code(), 2);
    }

    #[test]
    fn write_and_tool_failures_are_internal() {
        let write = core(ApplicationError::ArtifactWriteFailure {
            entity: "Order".into(),
            path: PathBuf::from("OrderService.cs"),
            reason: "read-only".into(),
        });
        assert_eq!(write.exit_code(), 1);

        let tool = core(ApplicationError::ScaffoldFailed {
            name: "Shop".into(),
            reason: "'dotnet' was not found on PATH".into(),
        });
        assert_eq!(tool.exit_code(), 1);
    }

    #[test]
    fn configuration_exits_four() {
        let err = CliError::ConfigError {
            message: "x".into(),
            source: None,
        };
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn io_error_is_internal() {
        let err = CliError::IoError {
            message: "x".into(),
            source: io::Error::other("e"),
        };
        assert_eq!(err.exit_code(), 1);
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header_and_suggestions() {
        let err = CliError::ConfigExists {
            path: PathBuf::from("/tmp/config.toml"),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error: Configuration already exists"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--force"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause_and_omits_hint() {
        let result: Result<(), io::Error> = Err(io::Error::other("disk full"));
        let err = result.with_cli_context(|| "writing config").unwrap_err();
        let s = err.format_plain(true);
        assert!(s.contains("I/O error: writing config"));
        assert!(s.contains("Caused by: disk full"));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn core_message_is_not_double_prefixed() {
        let err = core(ApplicationError::ModuleNotFound {
            path: PathBuf::from("/x"),
        });
        assert_eq!(err.to_string(), "Application error: Module not found at /x");
    }
}
