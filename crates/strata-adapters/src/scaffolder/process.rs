use std::{ffi::OsString, io, process::Command};

use tracing::{debug, instrument};

use strata_core::{
    application::{
        ApplicationError,
        ports::{ScaffoldOutcome, ScaffoldRequest, Scaffolder},
    },
    error::StrataResult,
};

/// Runs `<program> new <template> -n <name> -o <name>` in the request's
/// working directory and captures its output.
#[derive(Debug, Clone)]
pub struct ProcessScaffolder {
    program: OsString,
}

impl ProcessScaffolder {
    pub const DEFAULT_PROGRAM: &'static str = "dotnet";

    pub fn new() -> Self {
        Self::with_program(Self::DEFAULT_PROGRAM)
    }

    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ProcessScaffolder {
    fn default() -> Self {
        Self::new()
    }
}

impl Scaffolder for ProcessScaffolder {
    #[instrument(skip_all, fields(name = %request.name, template = %request.template))]
    fn scaffold(&self, request: &ScaffoldRequest) -> StrataResult<ScaffoldOutcome> {
        let output = Command::new(&self.program)
            .arg("new")
            .arg(&request.template)
            .args(["-n", &request.name, "-o", &request.name])
            .current_dir(&request.working_dir)
            .output()
            .map_err(|e| {
                let reason = match e.kind() {
                    io::ErrorKind::NotFound => format!(
                        "'{}' was not found on PATH",
                        self.program.to_string_lossy()
                    ),
                    _ => format!("failed to start '{}': {e}", self.program.to_string_lossy()),
                };
                ApplicationError::ScaffoldFailed {
                    name: request.name.clone(),
                    reason,
                }
            })?;

        debug!(status = ?output.status, "Templating tool finished");
        Ok(ScaffoldOutcome {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
