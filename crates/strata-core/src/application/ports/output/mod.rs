//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::application::events::GenerationEvent;
use crate::domain::{ArtifactKind, EmissionContext, ModuleLayout, Registry, SymbolTable};
use crate::error::StrataResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StrataResult<()>;

    /// Write content to a file, replacing whatever is there.
    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()>;

    /// Read a whole file as UTF-8.
    fn read_file(&self, path: &Path) -> StrataResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Files under `root` (recursively) with the given extension, sorted by
    /// path. `bin` and `obj` build-output directories are skipped.
    fn list_files(&self, root: &Path, extension: &str) -> StrataResult<Vec<PathBuf>>;
}

/// Port that turns a module's source tree into a symbol table.
///
/// Implemented by `strata_adapters::source::CSharpSourceLoader`.
#[cfg_attr(test, mockall::automock)]
pub trait SourceLoader: Send + Sync {
    /// Fails with `ApplicationError::ModuleNotFound` when the domain module
    /// root or its descriptor is missing.
    fn load(&self, layout: &ModuleLayout) -> StrataResult<SymbolTable>;
}

/// Port for the persisted generation registry.
#[cfg_attr(test, mockall::automock)]
pub trait RegistryStore: Send + Sync {
    /// A missing document yields an empty registry.
    fn load(&self, path: &Path) -> StrataResult<Registry>;

    fn save(&self, path: &Path, registry: &Registry) -> StrataResult<()>;
}

/// Port for artifact text rendering.
///
/// Must be deterministic: the same context always renders the same bytes.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactRenderer: Send + Sync {
    fn render(&self, kind: ArtifactKind, context: &EmissionContext) -> StrataResult<String>;
}

/// Port through which the host receives progress.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    fn report(&self, event: GenerationEvent);
}

/// Request for the external project templating tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub name: String,
    pub template: String,
    /// Directory the tool runs in; the project lands in `<working_dir>/<name>`.
    pub working_dir: PathBuf,
}

/// What the templating tool reported back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScaffoldOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Port for laying down the initial project skeleton.
///
/// Implemented by `strata_adapters::scaffolder::ProcessScaffolder`.
#[cfg_attr(test, mockall::automock)]
pub trait Scaffolder: Send + Sync {
    fn scaffold(&self, request: &ScaffoldRequest) -> StrataResult<ScaffoldOutcome>;
}
