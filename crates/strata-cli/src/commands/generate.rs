//! `strata generate`: one generation pass, then wiring.

use serde_json::{Value, json};
use tracing::{info, instrument};

use strata_adapters::{
    CSharpArtifactRenderer, CSharpSourceLoader, JsonRegistryStore, LocalFilesystem,
};
use strata_core::{
    application::{GenerationReport, GenerationService, WiringService},
    domain::QualifiedName,
};

use crate::{
    cli::{GenerateArgs, OutputFormat},
    commands::{print_wiring, resolve_layout, wiring_json},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute `strata generate`.
///
/// A missing marker type is reported as a warning; wiring still runs.
/// An artifact write failure ends the command after the entities written
/// before it have been registered.
#[instrument(skip_all, fields(root = ?args.root))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let layout = resolve_layout(args.root, args.module.name.as_deref())?;

    let mut options = config.generation_options()?;
    if let Some(marker) = &args.marker {
        options.marker = QualifiedName::parse(marker).map_err(|e| CliError::InvalidInput {
            message: format!("--marker: {e}"),
            source: Some(Box::new(e)),
        })?;
    }
    options.include_soft_delete |= args.soft_delete;

    let provider = match args.provider {
        Some(provider) => provider,
        None => config.provider()?,
    };

    let sink = output.event_sink();
    let filesystem = LocalFilesystem::new();

    output.header(&format!("Generating for module {}", layout.name()))?;

    let service = GenerationService::new(
        Box::new(CSharpSourceLoader::new(Box::new(filesystem))),
        Box::new(JsonRegistryStore::new(Box::new(filesystem))),
        Box::new(CSharpArtifactRenderer::new()),
        Box::new(filesystem),
        Box::new(sink.clone()),
    );
    let report = service.generate(&layout, &options)?;
    info!(
        run_id = %report.run_id,
        generated = report.generated.len(),
        files = report.written.len(),
        "Generation pass finished"
    );

    let wiring = if args.no_wire {
        None
    } else {
        let service = WiringService::new(Box::new(filesystem), Box::new(sink.clone()));
        Some(service.wire(&layout, provider)?)
    };

    if output.format() == OutputFormat::Json {
        return output.json(&json!({
            "command": "generate",
            "module": layout.name(),
            "root": layout.root().display().to_string(),
            "generation": generation_json(&report),
            "wiring": wiring.as_ref().map(wiring_json),
            "events": serde_json::to_value(sink.collected())?,
        }));
    }

    summarize(&output, &report)?;
    if let Some(wiring) = &wiring {
        print_wiring(&output, wiring)?;
    }
    Ok(())
}

fn summarize(output: &OutputManager, report: &GenerationReport) -> CliResult<()> {
    // the unresolved-marker warning has already been printed
    if report.marker.marker().is_none() {
        return Ok(());
    }

    match report.generated.len() {
        0 => output.info(&format!(
            "Nothing new: {} marked {} already generated",
            report.already_generated.len(),
            entities(report.already_generated.len())
        ))?,
        n => output.success(&format!(
            "Generated {n} {} ({} files written)",
            entities(n),
            report.written.len()
        ))?,
    }
    Ok(())
}

fn entities(n: usize) -> &'static str {
    if n == 1 { "entity" } else { "entities" }
}

fn generation_json(report: &GenerationReport) -> Value {
    json!({
        "run_id": report.run_id.to_string(),
        "marker": report.marker,
        "discovered": report.discovered,
        "generated": report.generated,
        "already_generated": report.already_generated,
        "written": report
            .written
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>(),
        "registry_updated": report.registry_updated,
    })
}
