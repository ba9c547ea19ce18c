//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use strata_core::domain::Provider;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Incremental service and controller generation for layered .NET solutions",
    long_about = "Strata scans a module's domain project for entities marked for \
                  generation, writes a service and a controller for each new one \
                  exactly once, and keeps the project files wired to the generated \
                  code and the selected data-access provider.",
    after_help = "EXAMPLES:\n\
        \x20 strata new Shop --provider postgresql\n\
        \x20 strata generate ./Shop\n\
        \x20 strata wire ./Shop --provider sqlserver\n\
        \x20 strata completions bash > /usr/share/bash-completion/completions/strata",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate artifacts for newly marked entities, then wire the module.
    #[command(
        visible_alias = "gen",
        about = "Generate services and controllers for new entities",
        after_help = "EXAMPLES:\n\
            \x20 strata generate\n\
            \x20 strata generate ./Shop --provider oracle\n\
            \x20 strata generate ./services/billing --module Acme.Billing --no-wire"
    )]
    Generate(GenerateArgs),

    /// Rewrite the marked regions of project files for a provider.
    #[command(
        about = "Wire generated code and a data-access provider into the project",
        after_help = "EXAMPLES:\n\
            \x20 strata wire --provider sqlserver\n\
            \x20 strata wire ./Shop --provider postgresql"
    )]
    Wire(WireArgs),

    /// Create a new solution with the templating tool, then wire it.
    #[command(
        visible_alias = "n",
        about = "Create a new layered solution",
        after_help = "EXAMPLES:\n\
            \x20 strata new Shop\n\
            \x20 strata new Acme.Billing --provider oracle --output ./services"
    )]
    New(NewArgs),

    /// Initialise a Strata configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 strata init\n\
            \x20 strata init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 strata config get generator.provider\n\
            \x20 strata config list\n\
            \x20 strata config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `strata generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Solution root containing `src/<Module>.Domain`.
    #[arg(value_name = "ROOT", help = "Module root (default: current directory)")]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub module: ModuleArgs,

    /// Provider to wire after generation; overrides `generator.provider`.
    #[arg(
        short = 'p',
        long = "provider",
        value_name = "PROVIDER",
        value_parser = parse_provider,
        help = "Data-access provider (postgresql, sqlserver, oracle)"
    )]
    pub provider: Option<Provider>,

    /// Skip the wiring pass.
    #[arg(long = "no-wire", help = "Generate artifacts only, leave project files alone")]
    pub no_wire: bool,

    /// Marker annotation type; overrides `generator.marker`.
    #[arg(long = "marker", value_name = "TYPE", help = "Qualified marker type name")]
    pub marker: Option<String>,

    /// Emit soft-delete services for the entities generated by this run.
    #[arg(long = "soft-delete", help = "Generate soft-delete services")]
    pub soft_delete: bool,
}

// ── wire ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata wire`.
#[derive(Debug, Args)]
pub struct WireArgs {
    #[arg(value_name = "ROOT", help = "Module root (default: current directory)")]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub module: ModuleArgs,

    #[arg(
        short = 'p',
        long = "provider",
        value_name = "PROVIDER",
        value_parser = parse_provider,
        help = "Data-access provider (postgresql, sqlserver, oracle)"
    )]
    pub provider: Option<Provider>,
}

/// Module name override shared by `generate` and `wire`.
#[derive(Debug, Args)]
pub struct ModuleArgs {
    /// Defaults to the last component of ROOT.
    #[arg(
        short = 'm',
        long = "module",
        value_name = "NAME",
        help = "Module name when it differs from the directory name"
    )]
    pub name: Option<String>,
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `strata new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Solution and module name; must be a dotted C# identifier.
    #[arg(value_name = "NAME", help = "Solution name, e.g. Shop or Acme.Billing")]
    pub name: String,

    /// Templating tool template; overrides `scaffold.template`.
    #[arg(long = "template", value_name = "TEMPLATE", help = "Template to instantiate")]
    pub template: Option<String>,

    #[arg(
        short = 'p',
        long = "provider",
        value_name = "PROVIDER",
        value_parser = parse_provider,
        help = "Data-access provider (postgresql, sqlserver, oracle)"
    )]
    pub provider: Option<Provider>,

    /// Directory the solution is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Parent directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `strata completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `strata config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generator.provider`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value parsers ─────────────────────────────────────────────────────────────

/// Accepts the provider names and aliases the core understands.
pub fn parse_provider(value: &str) -> Result<Provider, String> {
    value.parse::<Provider>().map_err(|e| {
        let known: Vec<_> = Provider::ALL.iter().map(Provider::as_str).collect();
        format!("{e} (expected one of: {})", known.join(", "))
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_defaults() {
        let cli = Cli::try_parse_from(["strata", "generate"]).unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert!(args.root.is_none());
                assert!(args.module.name.is_none());
                assert!(args.provider.is_none());
                assert!(!args.no_wire);
                assert!(!args.soft_delete);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn generate_accepts_provider_alias_and_module() {
        let cli = Cli::try_parse_from([
            "strata", "gen", "./Shop", "-m", "Acme.Shop", "--provider", "mssql", "--no-wire",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.root, Some(PathBuf::from("./Shop")));
                assert_eq!(args.module.name.as_deref(), Some("Acme.Shop"));
                assert_eq!(args.provider, Some(Provider::SqlServer));
                assert!(args.no_wire);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_provider_is_rejected_by_clap() {
        let err = Cli::try_parse_from(["strata", "wire", "--provider", "mysql"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("postgresql"));
    }

    #[test]
    fn new_requires_name() {
        assert!(Cli::try_parse_from(["strata", "new"]).is_err());
        let cli = Cli::try_parse_from(["strata", "new", "Shop", "--template", "custom"]).unwrap();
        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.name, "Shop");
                assert_eq!(args.template.as_deref(), Some("custom"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["strata", "-q", "-v", "config", "list"]).is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["strata", "config", "path", "-vv"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
    }
}
