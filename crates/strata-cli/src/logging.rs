//! Subscriber setup for the `strata` binary.
//!
//! The core and adapter crates emit spans and events but never install a
//! subscriber. Level comes from `-v`/`-q`: warn by default, then info, debug
//! and trace for one to three `-v`, error under `--quiet`. `RUST_LOG`, when
//! set, replaces that filter entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

/// Install the stderr subscriber. Errors if one is already installed.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = derive_level(args);

    // RUST_LOG wins; otherwise every workspace crate gets the same level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "strata={level},strata_core={level},strata_adapters={level}"
        ))
    });

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    // machine-readable runs get machine-readable logs
    let fmt_layer = if args.output_format == OutputFormat::Json {
        fmt_layer.json().with_ansi(false).boxed()
    } else {
        fmt_layer.with_ansi(use_ansi).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Filter level for the `-v` count and `--quiet`.
fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            output_format: OutputFormat::Plain,
        }
    }

    #[test]
    fn verbosity_levels() {
        let cases = [(0, "warn"), (1, "info"), (2, "debug"), (3, "trace"), (9, "trace")];
        for (verbose, level) in cases {
            assert_eq!(derive_level(&args_with(verbose, false)), level, "-v x{verbose}");
        }
    }

    #[test]
    fn quiet_wins() {
        assert_eq!(derive_level(&args_with(0, true)), "error");
        assert_eq!(derive_level(&args_with(3, true)), "error");
    }
}
