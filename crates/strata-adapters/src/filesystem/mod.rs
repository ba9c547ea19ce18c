//! Filesystem adapters.

use std::path::{Component, Path};

mod local;
mod memory;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;

/// Directories holding compiler output rather than source.
const BUILD_OUTPUT_DIRS: [&str; 2] = ["bin", "obj"];

/// `true` when `path` sits inside a `bin`/`obj` directory below `root`.
fn is_build_output(path: &Path, root: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| matches!(c, Component::Normal(name) if BUILD_OUTPUT_DIRS.iter().any(|d| name.eq_ignore_ascii_case(d))))
}
