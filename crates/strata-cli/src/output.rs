//! Everything the CLI prints for a person, and the host reporter.
//!
//! [`OutputManager`] writes everything meant for a person to stdout.
//! [`EventSink`] is the host side of the core `Reporter` port: it either
//! prints each progress event as it arrives or collects them for the JSON
//! document printed at the end of the run.

use std::borrow::Cow;
use std::io::{self, IsTerminal};
use std::time::Duration;

use clap::ValueEnum;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};
use tracing::debug;

use strata_adapters::CollectingReporter;
use strata_core::application::{GenerationEvent, Reporter, Severity};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Resolved rendering settings plus the stdout handle.
#[derive(Debug, Clone)]
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    verbose: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // an explicit flag beats the config file
        let requested = match args.output_format {
            OutputFormat::Auto => OutputFormat::from_str(&config.output.format, true)
                .unwrap_or(OutputFormat::Auto),
            explicit => explicit,
        };

        let resolved_format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            verbose: args.verbose > 0,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    fn silenced(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }

    /// Generic message; suppressed in quiet and JSON mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{2713}', msg, Style::new().green())
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{26a0}', msg, Style::new().yellow())
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{2139}', msg, Style::new().blue())
    }

    /// `<symbol> <msg>`, symbol in bold when colours are on.
    fn marked(&self, symbol: char, msg: &str, style: Style) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{symbol} {msg}")
        } else {
            format!("{} {}", symbol.style(style.bold()), msg.style(style))
        };
        self.term.write_line(&line)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON document; written in every mode, quiet included.
    pub fn json(&self, value: &serde_json::Value) -> crate::error::CliResult<()> {
        let text = serde_json::to_string_pretty(value)?;
        self.term.write_line(&text)?;
        Ok(())
    }

    /// Spinner for long external steps; hidden unless a person is watching.
    pub fn spinner(&self, message: impl Into<Cow<'static, str>>) -> ProgressBar {
        if self.silenced() || self.resolved_format != OutputFormat::Human || !self.term.is_term()
        {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    /// Reporter handed to the core services for this run.
    pub fn event_sink(&self) -> EventSink {
        if self.resolved_format == OutputFormat::Json {
            EventSink::Collect(CollectingReporter::new())
        } else {
            EventSink::Console(self.clone())
        }
    }

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Host implementation of the core `Reporter` port.
#[derive(Debug, Clone)]
pub enum EventSink {
    /// Print by severity; skips only show with `-v`.
    Console(OutputManager),
    /// Keep events for the JSON document.
    Collect(CollectingReporter),
}

impl EventSink {
    /// Events gathered so far; always empty for the console sink.
    pub fn collected(&self) -> Vec<GenerationEvent> {
        match self {
            Self::Console(_) => Vec::new(),
            Self::Collect(collector) => collector.events(),
        }
    }
}

impl Reporter for EventSink {
    fn report(&self, event: GenerationEvent) {
        let out = match self {
            Self::Collect(collector) => return collector.report(event),
            Self::Console(out) => out,
        };

        let message = event.to_string();
        let result = match event.severity() {
            Severity::Info => out.success(&message),
            Severity::Skip if out.verbose => out.info(&message),
            Severity::Skip => Ok(()),
            Severity::Warning => out.warning(&message),
        };
        if let Err(e) = result {
            debug!(error = %e, "Failed to print progress event");
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args(format: OutputFormat, quiet: bool, no_color: bool) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format: format,
        }
    }

    fn make_manager(format: OutputFormat, quiet: bool, no_color: bool) -> OutputManager {
        OutputManager::new(&args(format, quiet, no_color), &AppConfig::default())
    }

    #[test]
    fn explicit_format_is_kept() {
        assert_eq!(make_manager(OutputFormat::Json, false, false).format(), OutputFormat::Json);
        assert_eq!(make_manager(OutputFormat::Plain, false, false).format(), OutputFormat::Plain);
    }

    #[test]
    fn config_format_applies_when_flag_is_auto() {
        let mut config = AppConfig::default();
        config.output.format = "JSON".into();
        let out = OutputManager::new(&args(OutputFormat::Auto, false, false), &config);
        assert_eq!(out.format(), OutputFormat::Json);

        config.output.format = "nonsense".into();
        let out = OutputManager::new(&args(OutputFormat::Auto, false, false), &config);
        assert_ne!(out.format(), OutputFormat::Auto);
    }

    #[test]
    fn color_follows_flags_and_format() {
        assert!(make_manager(OutputFormat::Human, false, false).supports_color());
        assert!(!make_manager(OutputFormat::Human, false, true).supports_color());
        assert!(!make_manager(OutputFormat::Plain, false, false).supports_color());

        let mut config = AppConfig::default();
        config.output.no_color = true;
        let out = OutputManager::new(&args(OutputFormat::Human, false, false), &config);
        assert!(!out.supports_color());
    }

    #[test]
    fn quiet_writes_are_ok() {
        let out = make_manager(OutputFormat::Plain, true, true);
        assert!(out.is_quiet());
        assert!(out.print("hello").is_ok());
        assert!(out.success("done").is_ok());
    }

    #[test]
    fn json_mode_collects_events() {
        let sink = make_manager(OutputFormat::Json, false, true).event_sink();
        sink.report(GenerationEvent::NoNewEntities);
        sink.report(GenerationEvent::MarkerUnresolved { marker: "X".into() });
        assert_eq!(sink.collected().len(), 2);
    }

    #[test]
    fn console_sink_collects_nothing() {
        let sink = make_manager(OutputFormat::Plain, true, true).event_sink();
        sink.report(GenerationEvent::NoNewEntities);
        assert!(matches!(sink, EventSink::Console(_)));
        assert!(sink.collected().is_empty());
    }

    #[test]
    fn spinner_is_hidden_off_terminal() {
        let bar = make_manager(OutputFormat::Plain, false, true).spinner("working");
        assert!(bar.is_hidden());
    }
}
