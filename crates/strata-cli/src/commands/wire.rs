//! `strata wire`: rewrite the marked regions for a provider, nothing else.

use serde_json::json;
use tracing::instrument;

use strata_adapters::LocalFilesystem;
use strata_core::application::WiringService;

use crate::{
    cli::{OutputFormat, WireArgs},
    commands::{print_wiring, resolve_layout, wiring_json},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute `strata wire`.
///
/// Missing target files and unbalanced blocks are warnings, not errors; the
/// command still exits 0 so it can be rerun once the files are fixed.
#[instrument(skip_all, fields(root = ?args.root))]
pub fn execute(args: WireArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let layout = resolve_layout(args.root, args.module.name.as_deref())?;
    let provider = match args.provider {
        Some(provider) => provider,
        None => config.provider()?,
    };

    let sink = output.event_sink();
    output.header(&format!("Wiring {} for {}", layout.name(), provider))?;

    let service = WiringService::new(Box::new(LocalFilesystem::new()), Box::new(sink.clone()));
    let report = service.wire(&layout, provider)?;

    if output.format() == OutputFormat::Json {
        return output.json(&json!({
            "command": "wire",
            "module": layout.name(),
            "root": layout.root().display().to_string(),
            "wiring": wiring_json(&report),
            "events": serde_json::to_value(sink.collected())?,
        }));
    }

    print_wiring(&output, &report)
}
