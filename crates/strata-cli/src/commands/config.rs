//! `strata config`: inspect the effective configuration.

use std::path::PathBuf;

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Every key `config get` understands.
const KEYS: &[&str] = &[
    "generator.marker",
    "generator.fallback_key_type",
    "generator.include_soft_delete",
    "generator.provider",
    "scaffold.program",
    "scaffold.template",
    "output.no_color",
    "output.format",
];

/// Dispatch to the correct config subcommand.
///
/// `explicit_path` is the `--config` flag, shown by `config path` in place
/// of the default location.
pub fn execute(
    cmd: ConfigCommands,
    explicit_path: Option<PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let json = output.format() == OutputFormat::Json;

    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if json {
                output.json(&serde_json::json!({ "key": key, "value": value }))?;
            } else {
                output.print(&value)?;
            }
        }

        ConfigCommands::List => {
            if json {
                output.json(&serde_json::to_value(&config)?)?;
            } else {
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.header("Current Configuration:")?;
                output.print(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            let path = explicit_path.unwrap_or_else(AppConfig::config_path);
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let value = match key {
        "generator.marker" => config.generator.marker.clone(),
        "generator.fallback_key_type" => config.generator.fallback_key_type.clone(),
        "generator.include_soft_delete" => config.generator.include_soft_delete.to_string(),
        "generator.provider" => config.generator.provider.clone(),
        "scaffold.program" => config.scaffold.program.clone(),
        "scaffold.template" => config.scaffold.template.clone(),
        "output.no_color" => config.output.no_color.to_string(),
        "output.format" => config.output.format.clone(),
        _ => {
            return Err(CliError::ConfigError {
                message: format!("Unknown config key '{key}' (known: {})", KEYS.join(", ")),
                source: None,
            });
        }
    };
    Ok(value)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_resolves() {
        let cfg = AppConfig::default();
        for key in KEYS {
            assert!(get_config_value(&cfg, key).is_ok(), "{key}");
        }
    }

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "generator.provider").unwrap(), "postgresql");
        assert_eq!(get_config_value(&cfg, "generator.include_soft_delete").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "scaffold.program").unwrap(), "dotnet");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        let err = get_config_value(&cfg, "defaults.lang").unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
        assert!(err.to_string().contains("generator.marker"));
    }
}
