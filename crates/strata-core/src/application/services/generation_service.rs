//! Generation Service - the incremental entity-artifact pipeline.
//!
//! 1. Load the module source into a symbol table
//! 2. Resolve the marker type (exact, then by simple name)
//! 3. Discover marked entities and drop the ones the registry knows
//! 4. Emit a service and a controller per new entity, never overwriting
//! 5. Commit the newly written entities to the registry

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        events::GenerationEvent,
        ports::{ArtifactRenderer, Filesystem, RegistryStore, Reporter, SourceLoader},
    },
    domain::{
        ArtifactKind, DEFAULT_MARKER, DomainValidator as validator, EmissionContext,
        EntityCandidate, GeneratedArtifact, KeyType, MarkerResolution, ModuleLayout, QualifiedName,
        RegistryEntry, discover_entities, partition_new, resolve_marker,
    },
    error::{StrataError, StrataResult},
};

/// Knobs for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub marker: QualifiedName,
    pub fallback_key: KeyType,
    pub include_soft_delete: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            marker: QualifiedName::new(DEFAULT_MARKER),
            fallback_key: KeyType::default(),
            include_soft_delete: false,
        }
    }
}

/// Summary of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub marker: MarkerResolution,
    /// Marked entities found in source, new or not.
    pub discovered: usize,
    /// Entities registered by this pass, in emission order.
    pub generated: Vec<String>,
    /// Entities the registry already knew.
    pub already_generated: Vec<String>,
    /// Files created by this pass.
    pub written: Vec<PathBuf>,
    pub registry_updated: bool,
}

impl GenerationReport {
    fn new(run_id: Uuid, marker: MarkerResolution) -> Self {
        Self {
            run_id,
            marker,
            discovered: 0,
            generated: Vec::new(),
            already_generated: Vec::new(),
            written: Vec::new(),
            registry_updated: false,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.written.is_empty() && !self.registry_updated
    }
}

/// Result of emitting one entity.
enum Emission {
    /// At least one file was written; the entity gets registered.
    Written(Vec<PathBuf>),
    /// Both files already existed.
    Skipped,
}

pub struct GenerationService {
    loader: Box<dyn SourceLoader>,
    store: Box<dyn RegistryStore>,
    renderer: Box<dyn ArtifactRenderer>,
    filesystem: Box<dyn Filesystem>,
    reporter: Box<dyn Reporter>,
}

impl GenerationService {
    pub fn new(
        loader: Box<dyn SourceLoader>,
        store: Box<dyn RegistryStore>,
        renderer: Box<dyn ArtifactRenderer>,
        filesystem: Box<dyn Filesystem>,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            loader,
            store,
            renderer,
            filesystem,
            reporter,
        }
    }

    /// Run one generation pass over `layout`.
    ///
    /// A missing marker is not an error: the pass reports it and returns
    /// without touching anything. A write failure stops the pass, commits
    /// the entities written so far, then returns the failure.
    #[instrument(
        skip_all,
        fields(
            module = %layout.name(),
            root = %layout.root().display(),
            run_id = tracing::field::Empty
        )
    )]
    pub fn generate(
        &self,
        layout: &ModuleLayout,
        options: &GenerationOptions,
    ) -> StrataResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let table = self.loader.load(layout)?;
        debug!(types = table.len(), "Source model loaded");

        let resolution = resolve_marker(&table, &options.marker);
        let mut report = GenerationReport::new(run_id, resolution.clone());

        let marker = match &resolution {
            MarkerResolution::Exact(name) => name.clone(),
            MarkerResolution::Fallback(name) => {
                warn!(expected = %options.marker, resolved = %name, "Marker resolved by simple name");
                self.reporter.report(GenerationEvent::MarkerFallback {
                    expected: options.marker.to_string(),
                    resolved: name.to_string(),
                });
                name.clone()
            }
            MarkerResolution::Absent => {
                warn!(marker = %options.marker, "Marker type not found, skipping generation");
                self.reporter.report(GenerationEvent::MarkerUnresolved {
                    marker: options.marker.to_string(),
                });
                return Ok(report);
            }
        };

        let candidates = discover_entities(&table, &marker, &options.fallback_key);
        for candidate in &candidates {
            validator::validate_entity(candidate)?;
        }
        report.discovered = candidates.len();
        info!(count = candidates.len(), "Entities discovered");

        let registry_path = layout.registry_file();
        let registry = self.store.load(&registry_path)?;

        let (fresh, known) = partition_new(candidates, &registry);
        for candidate in known {
            self.reporter.report(GenerationEvent::AlreadyGenerated {
                entity: candidate.name.clone(),
            });
            report.already_generated.push(candidate.name);
        }

        if fresh.is_empty() {
            info!("No new entities");
            self.reporter.report(GenerationEvent::NoNewEntities);
            return Ok(report);
        }

        let mut entries = Vec::new();
        let mut failure: Option<StrataError> = None;

        for candidate in &fresh {
            match self.emit(layout, candidate, options.include_soft_delete) {
                Ok(Emission::Written(files)) => {
                    self.reporter.report(GenerationEvent::EntityGenerated {
                        entity: candidate.name.clone(),
                        key_type: candidate.primary_key.to_string(),
                        files: files.clone(),
                    });
                    entries.push(RegistryEntry::new(
                        &candidate.name,
                        options.include_soft_delete,
                        Utc::now(),
                    ));
                    report.generated.push(candidate.name.clone());
                    report.written.extend(files);
                }
                Ok(Emission::Skipped) => {
                    debug!(entity = %candidate.name, "Both artifacts exist, not registering");
                }
                Err(e) => {
                    warn!(entity = %candidate.name, error = %e, "Artifact write failed, stopping pass");
                    self.reporter.report(GenerationEvent::ArtifactWriteFailed {
                        entity: candidate.name.clone(),
                        reason: e.to_string(),
                    });
                    failure = Some(e);
                    break;
                }
            }
        }

        if !entries.is_empty() {
            let updated = registry.append(entries);
            if let Err(save_error) = self.store.save(&registry_path, &updated) {
                if let Some(write_error) = &failure {
                    error!(error = %write_error, "Registry not committed after an artifact write failure");
                }
                return Err(save_error);
            }
            report.registry_updated = true;
            self.reporter.report(GenerationEvent::RegistryUpdated {
                path: registry_path,
                added: report.generated.clone(),
            });
            info!(added = report.generated.len(), total = updated.len(), "Registry committed");
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Write whichever of the entity's two artifacts do not exist yet.
    fn emit(
        &self,
        layout: &ModuleLayout,
        candidate: &EntityCandidate,
        soft_delete: bool,
    ) -> StrataResult<Emission> {
        let context = EmissionContext::new(layout, candidate, soft_delete);
        let mut written = Vec::new();

        for kind in ArtifactKind::ALL {
            let path = kind.path_for(layout, &candidate.name);
            if self.filesystem.exists(&path) {
                info!(entity = %candidate.name, path = %path.display(), "Artifact exists, leaving it untouched");
                self.reporter.report(GenerationEvent::ArtifactSkipped {
                    entity: candidate.name.clone(),
                    kind,
                    path,
                });
                continue;
            }

            let artifact = GeneratedArtifact {
                kind,
                entity: candidate.name.clone(),
                path,
                content: self.renderer.render(kind, &context)?,
            };
            self.write_artifact(&artifact)?;
            debug!(entity = %artifact.entity, %kind, path = %artifact.path.display(), "Artifact written");
            written.push(artifact.path);
        }

        if written.is_empty() {
            Ok(Emission::Skipped)
        } else {
            Ok(Emission::Written(written))
        }
    }

    fn write_artifact(&self, artifact: &GeneratedArtifact) -> StrataResult<()> {
        let to_failure = |e: StrataError| -> StrataError {
            ApplicationError::ArtifactWriteFailure {
                entity: artifact.entity.clone(),
                path: artifact.path.clone(),
                reason: e.to_string(),
            }
            .into()
        };

        if let Some(parent) = artifact.path.parent() {
            self.filesystem.create_dir_all(parent).map_err(to_failure)?;
        }
        self.filesystem
            .write_file(&artifact.path, &artifact.content)
            .map_err(to_failure)
    }
}
