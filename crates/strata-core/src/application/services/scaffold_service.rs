//! Scaffold Service - lay down a new solution, then wire it.
//!
//! The skeleton itself comes from an external templating tool behind the
//! [`Scaffolder`] port. This service only decides what to ask for, checks
//! the answer, and runs the wiring pass on the result.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ScaffoldOutcome, ScaffoldRequest, Scaffolder},
        services::wiring_service::{WiringReport, WiringService},
    },
    domain::{ModuleLayout, Provider},
    error::StrataResult,
};

/// Template name passed to the tool when none is configured.
pub const DEFAULT_TEMPLATE: &str = "strata-layered";

/// What `new_project` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    pub tool_output: ScaffoldOutcome,
    pub wiring: WiringReport,
}

pub struct ScaffoldService {
    scaffolder: Box<dyn Scaffolder>,
    filesystem: Box<dyn Filesystem>,
    wiring: WiringService,
}

impl ScaffoldService {
    pub fn new(
        scaffolder: Box<dyn Scaffolder>,
        filesystem: Box<dyn Filesystem>,
        wiring: WiringService,
    ) -> Self {
        Self {
            scaffolder,
            filesystem,
            wiring,
        }
    }

    /// Create `<working_dir>/<name>` with the templating tool and wire the
    /// selected provider into it.
    #[instrument(skip_all, fields(name = %request.name, template = %request.template))]
    pub fn new_project(
        &self,
        request: &ScaffoldRequest,
        provider: Provider,
    ) -> StrataResult<ScaffoldReport> {
        // validates the name before anything runs
        let root = request.working_dir.join(&request.name);
        let layout = ModuleLayout::new(&root, Some(&request.name))?;

        if self.filesystem.exists(&root) {
            return Err(ApplicationError::ScaffoldFailed {
                name: request.name.clone(),
                reason: format!("{} already exists", root.display()),
            }
            .into());
        }

        let outcome = self.scaffolder.scaffold(request)?;
        if !outcome.success {
            warn!(exit_code = ?outcome.exit_code, "Templating tool failed");
            let detail = outcome.stderr.trim();
            return Err(ApplicationError::ScaffoldFailed {
                name: request.name.clone(),
                reason: if detail.is_empty() {
                    format!("tool exited with {:?}", outcome.exit_code)
                } else {
                    detail.to_string()
                },
            }
            .into());
        }
        info!(root = %root.display(), "Skeleton created");

        let wiring = self.wiring.wire(&layout, provider)?;
        Ok(ScaffoldReport {
            root,
            tool_output: outcome,
            wiring,
        })
    }
}
