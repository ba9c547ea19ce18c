//! Wiring Service - keeps project files pointing at generated code and the
//! selected data-access provider.
//!
//! Three independent steps, each re-runnable:
//! 1. Services include in the application project
//! 2. Provider package reference in the infrastructure project
//! 3. Provider registration in the API entry point
//!
//! A missing target file or an unbalanced tag pair is reported and the
//! remaining steps still run. Filesystem errors are fatal.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        events::{BlockKind, GenerationEvent, Placement},
        ports::{Filesystem, Reporter},
    },
    domain::{
        DomainError, MarkedDocument, ModuleLayout, Provider, find_provider,
        wiring::{self, IncludeOutcome, SERVICES_INCLUDE},
    },
    error::StrataResult,
};

/// Outcome of one wiring step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// File content changed.
    Applied(Placement),
    /// Step ran; the file already had the wanted content.
    Unchanged,
    /// Target file does not exist.
    Missing,
    /// Tags in the file are unbalanced; the file was left alone.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringStep {
    pub block: BlockKind,
    pub file: PathBuf,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringReport {
    pub provider: Provider,
    pub steps: Vec<WiringStep>,
}

impl WiringReport {
    /// `true` when every target file existed and could be patched.
    pub fn is_complete(&self) -> bool {
        self.steps
            .iter()
            .all(|s| matches!(s.status, StepStatus::Applied(_) | StepStatus::Unchanged))
    }
}

pub struct WiringService {
    filesystem: Box<dyn Filesystem>,
    reporter: Box<dyn Reporter>,
}

impl WiringService {
    pub fn new(filesystem: Box<dyn Filesystem>, reporter: Box<dyn Reporter>) -> Self {
        Self {
            filesystem,
            reporter,
        }
    }

    #[instrument(skip_all, fields(module = %layout.name(), provider = %provider))]
    pub fn wire(&self, layout: &ModuleLayout, provider: Provider) -> StrataResult<WiringReport> {
        let def = find_provider(provider);

        let include = self.patch(
            &layout.application_project(),
            BlockKind::ServicesInclude,
            |doc| {
                Ok(match wiring::ensure_include(doc, SERVICES_INCLUDE) {
                    IncludeOutcome::AlreadyPresent => None,
                    outcome => Some(Placement::Include(outcome)),
                })
            },
        )?;
        if include.status == StepStatus::Unchanged {
            self.reporter.report(GenerationEvent::IncludeAlreadyPresent {
                path: include.file.clone(),
            });
        }

        let reference = self.patch(
            &layout.infrastructure_project(),
            BlockKind::ProviderReference,
            |doc| wiring::inject_provider_reference(doc, def).map(|p| Some(Placement::Section(p))),
        )?;

        let registration = self.patch(&layout.program_file(), BlockKind::Registration, |doc| {
            let anchor = wiring::inject_registration(doc, def)?;
            Ok(Some(Placement::Anchor(anchor)))
        })?;
        if let StepStatus::Applied(Placement::Anchor(anchor)) = &registration.status {
            if anchor.is_fallback() {
                warn!(file = %registration.file.display(), "No registration anchor, appended at end of file");
                self.reporter.report(GenerationEvent::AnchorNotFound {
                    path: registration.file.clone(),
                });
            }
        }

        for step in [&reference, &registration] {
            if let StepStatus::Applied(placement) = &step.status {
                self.reporter.report(GenerationEvent::BlockInjected {
                    path: step.file.clone(),
                    block: step.block,
                    placement: *placement,
                    provider: Some(provider),
                });
            }
        }
        if let StepStatus::Applied(placement) = &include.status {
            self.reporter.report(GenerationEvent::BlockInjected {
                path: include.file.clone(),
                block: include.block,
                placement: *placement,
                provider: None,
            });
        }

        let report = WiringReport {
            provider,
            steps: vec![include, reference, registration],
        };
        info!(complete = report.is_complete(), "Wiring finished");
        Ok(report)
    }

    /// Read `path`, apply `edit`, write back only if the text changed.
    ///
    /// `edit` returns the placement to report, or `None` when it decided
    /// nothing needed doing.
    fn patch<F>(&self, path: &Path, block: BlockKind, edit: F) -> StrataResult<WiringStep>
    where
        F: FnOnce(&mut MarkedDocument) -> Result<Option<Placement>, DomainError>,
    {
        let step = |status| WiringStep {
            block,
            file: path.to_path_buf(),
            status,
        };

        if !self.filesystem.exists(path) {
            warn!(file = %path.display(), %block, "Target file not found");
            self.reporter.report(GenerationEvent::TargetFileNotFound {
                path: path.to_path_buf(),
            });
            return Ok(step(StepStatus::Missing));
        }

        let original = self.filesystem.read_file(path)?;
        let mut doc = MarkedDocument::parse(&original);

        let placement = match edit(&mut doc) {
            Ok(placement) => placement,
            Err(e) => {
                warn!(file = %path.display(), %block, error = %e, "Cannot patch file");
                self.reporter.report(GenerationEvent::BlockUnbalanced {
                    path: path.to_path_buf(),
                    block,
                    reason: e.to_string(),
                });
                return Ok(step(StepStatus::Failed(e.to_string())));
            }
        };

        let updated = doc.render();
        match placement {
            Some(placement) => {
                if updated != original {
                    self.filesystem.write_file(path, &updated)?;
                    debug!(file = %path.display(), %block, "File patched");
                } else {
                    debug!(file = %path.display(), %block, "Block already current");
                }
                Ok(step(StepStatus::Applied(placement)))
            }
            None => Ok(step(StepStatus::Unchanged)),
        }
    }
}
