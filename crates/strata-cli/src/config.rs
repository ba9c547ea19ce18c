//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the
//! [`GenerationOptions`] built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STRATA__GENERATOR__PROVIDER=oracle`
//! 3. Config file: `--config FILE`, else the platform config directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use strata_core::{
    application::{DEFAULT_TEMPLATE, GenerationOptions},
    domain::{DEFAULT_MARKER, KeyType, Provider, QualifiedName, value_objects::is_identifier},
};

use crate::error::{CliError, CliResult};

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "STRATA";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub scaffold: ScaffoldConfig,
    pub output: OutputConfig,
}

/// Settings for `generate` and `wire`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Qualified name of the marker annotation type.
    pub marker: String,
    /// Key type for entities without an `Id` member.
    pub fallback_key_type: String,
    pub include_soft_delete: bool,
    /// Provider name or alias, parsed on use.
    pub provider: String,
}

/// Settings for `new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Templating tool executable.
    pub program: String,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; `--output-format` wins.
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig {
                marker: DEFAULT_MARKER.into(),
                fallback_key_type: KeyType::DEFAULT_FALLBACK.into(),
                include_soft_delete: false,
                provider: Provider::default().to_string(),
            },
            scaffold: ScaffoldConfig {
                program: "dotnet".into(),
                template: DEFAULT_TEMPLATE.into(),
            },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// `config_file` is the path passed via `--config`; it must exist.  The
    /// default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);
        Self::load_from(&path, config_file.is_some(), Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("encoding built-in defaults")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                env.prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("reading configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.strata.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "strata", "strata")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".strata.toml"))
    }

    /// The configured provider.
    pub fn provider(&self) -> CliResult<Provider> {
        self.generator
            .provider
            .parse()
            .map_err(|e| CliError::ConfigError {
                message: format!("generator.provider: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Options for one generation pass.
    pub fn generation_options(&self) -> CliResult<GenerationOptions> {
        let marker = QualifiedName::parse(&self.generator.marker).map_err(|e| {
            CliError::ConfigError {
                message: format!("generator.marker: {e}"),
                source: Some(Box::new(e)),
            }
        })?;

        let key = self.generator.fallback_key_type.trim();
        if !is_identifier(key) {
            return Err(CliError::ConfigError {
                message: format!(
                    "generator.fallback_key_type: '{key}' is not a type name"
                ),
                source: None,
            });
        }

        Ok(GenerationOptions {
            marker,
            fallback_key: KeyType::new(key),
            include_soft_delete: self.generator.include_soft_delete,
        })
    }
}
