//! Implementation of the `strata new` command.
//!
//! Responsibility: translate CLI arguments into a `ScaffoldRequest`, call the
//! core scaffold service, and display results.  The skeleton itself comes
//! from the external templating tool.

use std::path::PathBuf;

use serde_json::json;
use tracing::{debug, info, instrument};

use strata_adapters::{LocalFilesystem, ProcessScaffolder};
use strata_core::application::{ScaffoldRequest, ScaffoldService, WiringService};

use crate::{
    cli::{GlobalArgs, NewArgs, OutputFormat},
    commands::{print_wiring, wiring_json},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `strata new` command.
#[instrument(skip_all, fields(name = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let working_dir = args.output.unwrap_or_else(|| PathBuf::from("."));
    if !working_dir.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("output directory {} does not exist", working_dir.display()),
            source: None,
        });
    }

    let provider = match args.provider {
        Some(provider) => provider,
        None => config.provider()?,
    };
    let request = ScaffoldRequest {
        name: args.name,
        template: args.template.unwrap_or(config.scaffold.template),
        working_dir,
    };
    let program = config.scaffold.program;
    debug!(%program, template = %request.template, %provider, "Scaffold request built");

    let sink = output.event_sink();
    let filesystem = LocalFilesystem::new();
    let service = ScaffoldService::new(
        Box::new(ProcessScaffolder::with_program(program.as_str())),
        Box::new(filesystem),
        WiringService::new(Box::new(filesystem), Box::new(sink.clone())),
    );

    output.header(&format!("Creating '{}'...", request.name))?;
    let spinner = output.spinner(format!("Running {program} new {}", request.template));
    let result = service.new_project(&request, provider);
    spinner.finish_and_clear();
    let report = result?;

    info!(root = %report.root.display(), "Scaffold completed");

    if output.format() == OutputFormat::Json {
        return output.json(&json!({
            "command": "new",
            "name": request.name,
            "root": report.root.display().to_string(),
            "template": request.template,
            "wiring": wiring_json(&report.wiring),
            "events": serde_json::to_value(sink.collected())?,
        }));
    }

    if global.verbose > 0 {
        let tool_output = report.tool_output.stdout.trim();
        if !tool_output.is_empty() {
            output.print(tool_output)?;
        }
    }

    output.success(&format!(
        "Solution '{}' created at {}",
        request.name,
        report.root.display()
    ))?;
    print_wiring(&output, &report.wiring)?;

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", request.name))?;
    output.print("  # mark an entity with [GenerateCrud], then")?;
    output.print("  strata generate")?;

    Ok(())
}
