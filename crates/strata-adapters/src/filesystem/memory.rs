//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    error::StrataResult,
};

use super::is_build_output;

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to a service and inspect
/// another afterwards.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    /// Paths whose writes fail, for exercising partial-failure handling.
    failing: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Add a file, creating its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file, creating its parent directories.
    pub fn insert(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                add_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
        }
    }

    /// File content, if present (testing helper).
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Make every later write to `path` fail.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(path.as_ref().to_path_buf());
        }
    }

    /// Remove all injected write failures.
    pub fn clear_failures(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.clear();
        }
    }

    /// All files, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn file_count(&self) -> usize {
        self.inner.read().map(|i| i.files.len()).unwrap_or(0)
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn add_ancestors(directories: &mut HashSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        add_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.failing.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Injected write failure".into(),
            }
            .into());
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> StrataResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn list_files(&self, root: &Path, extension: &str) -> StrataResult<Vec<PathBuf>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        // BTreeMap keys are already in path order
        Ok(inner
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .filter(|p| p.extension().and_then(|x| x.to_str()) == Some(extension))
            .filter(|p| !p.parent().is_some_and(|dir| is_build_output(dir, root)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.cs"), "x").is_err());
        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.cs"), "x").unwrap();
        assert_eq!(fs.get("/a/b.cs").as_deref(), Some("x"));
    }

    #[test]
    fn injected_failures_apply_until_cleared() {
        let fs = MemoryFilesystem::new().with_file("/a/keep.cs", "");
        fs.fail_writes_to("/a/b.cs");
        assert!(fs.write_file(Path::new("/a/b.cs"), "x").is_err());
        fs.clear_failures();
        assert!(fs.write_file(Path::new("/a/b.cs"), "x").is_ok());
    }

    #[test]
    fn list_files_filters_and_sorts() {
        let fs = MemoryFilesystem::new()
            .with_file("/m/Z.cs", "")
            .with_file("/m/A.cs", "")
            .with_file("/m/obj/G.cs", "")
            .with_file("/m/A.csproj", "")
            .with_file("/other/B.cs", "");

        let files = fs.list_files(Path::new("/m"), "cs").unwrap();
        assert_eq!(files, vec![PathBuf::from("/m/A.cs"), PathBuf::from("/m/Z.cs")]);
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let other = fs.clone();
        other.insert("/x.cs", "1");
        assert!(fs.exists(Path::new("/x.cs")));
        assert_eq!(fs.file_count(), 1);
    }
}
