//! Flags accepted before or after any subcommand.

use clap::Args;
use std::path::PathBuf;

/// Flattened into [`super::Cli`]; every field is `global = true`.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log level step count; any value above zero also prints skip events.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More log output; repeat up to three times",
        long_help = "Raise the log level one step per occurrence: \
-v shows info and skipped entities, -vv debug, -vvv trace. \
RUST_LOG overrides the level."
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,

    /// Set by a non-empty, non-falsey `NO_COLOR` as well.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Never emit ANSI colours"
    )]
    pub no_color: bool,

    /// Configuration file; a missing explicit file is an error.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read configuration from FILE"
    )]
    pub config: Option<PathBuf>,

    /// `json` prints the run summary and every progress event as one document.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "How to render results"
    )]
    pub output_format: OutputFormat,
}

/// Rendering mode for stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise.
    #[default]
    Auto,
    /// Coloured text with symbols.
    Human,
    /// Uncoloured text.
    Plain,
    /// One JSON document per command.
    Json,
}
