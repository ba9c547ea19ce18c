//! Command handlers.  Each translates parsed arguments into core calls and
//! renders the result; no business logic lives here.

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod new;
pub mod wire;

use std::path::PathBuf;

use serde_json::{Value, json};
use tracing::debug;

use strata_core::{
    application::{ApplicationError, StepStatus, WiringReport},
    domain::ModuleLayout,
    error::StrataError,
};

use crate::{
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Resolve `ROOT` (default: current directory) and the module name.
///
/// The root is canonicalised so `.` yields a usable default module name.
pub(crate) fn resolve_layout(
    root: Option<PathBuf>,
    module: Option<&str>,
) -> CliResult<ModuleLayout> {
    let root = root.unwrap_or_else(|| PathBuf::from("."));
    if !root.is_dir() {
        return Err(StrataError::from(ApplicationError::ModuleNotFound { path: root }).into());
    }

    let root = root
        .canonicalize()
        .with_cli_context(|| format!("Failed to resolve {}", root.display()))?;
    let layout = ModuleLayout::new(root, module).map_err(StrataError::from)?;

    debug!(module = %layout.name(), root = %layout.root().display(), "Module resolved");
    Ok(layout)
}

/// Summary line for a wiring pass; per-step detail arrives as events.
pub(crate) fn print_wiring(output: &OutputManager, report: &WiringReport) -> CliResult<()> {
    if report.is_complete() {
        output.success(&format!("Wired provider {}", report.provider))?;
    } else {
        output.warning(&format!(
            "Wiring for {} is incomplete; see the warnings above",
            report.provider
        ))?;
    }
    Ok(())
}

/// JSON view of a wiring report.
pub(crate) fn wiring_json(report: &WiringReport) -> Value {
    let steps: Vec<Value> = report
        .steps
        .iter()
        .map(|step| {
            let (status, detail) = match &step.status {
                StepStatus::Applied(_) => ("applied", None),
                StepStatus::Unchanged => ("unchanged", None),
                StepStatus::Missing => ("missing", None),
                StepStatus::Failed(reason) => ("failed", Some(reason.as_str())),
            };
            json!({
                "block": step.block,
                "file": step.file,
                "status": status,
                "detail": detail,
            })
        })
        .collect();

    json!({
        "provider": report.provider,
        "complete": report.is_complete(),
        "steps": steps,
    })
}
