use std::{collections::HashMap, path::PathBuf};

use tracing::{debug, instrument, trace};

use strata_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, SourceLoader},
    },
    domain::{ModuleLayout, QualifiedName, ResolutionScope, SymbolTable, TypeDeclaration},
    error::StrataResult,
};

use super::parser::{ParsedFile, ParsedType, parse_file};

/// Builds a [`SymbolTable`] from the `.cs` files of a module's domain project.
///
/// Files are read in sorted path order and `bin`/`obj` output is ignored, so
/// the table (and therefore discovery order) is stable between runs.
pub struct CSharpSourceLoader {
    filesystem: Box<dyn Filesystem>,
}

impl CSharpSourceLoader {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }
}

impl SourceLoader for CSharpSourceLoader {
    #[instrument(skip_all, fields(module = %layout.name()))]
    fn load(&self, layout: &ModuleLayout) -> StrataResult<SymbolTable> {
        let domain_dir = layout.domain_dir();
        if !self.filesystem.exists(&domain_dir) || !self.filesystem.exists(&layout.domain_project())
        {
            return Err(ApplicationError::ModuleNotFound { path: domain_dir }.into());
        }

        let files = self.filesystem.list_files(&domain_dir, "cs")?;
        debug!(count = files.len(), dir = %domain_dir.display(), "Parsing domain sources");

        let mut parsed = Vec::with_capacity(files.len());
        for path in files {
            let text = self.filesystem.read_file(&path)?;
            let file = parse_file(&text);
            trace!(file = %path.display(), types = file.types.len(), "Parsed source file");
            parsed.push((path, file));
        }

        let table = build_table(parsed);
        debug!(types = table.len(), "Symbol table built");
        Ok(table)
    }
}

/// A declaration merged across `partial` parts, with each written annotation
/// paired with the scope it was written in.
struct Pending {
    declaration: TypeDeclaration,
    annotations: Vec<(String, ResolutionScope)>,
}

/// Two passes: collect every declaration, then qualify annotations against
/// the complete set so attributes declared in later files still resolve.
pub(crate) fn build_table(files: Vec<(PathBuf, ParsedFile)>) -> SymbolTable {
    let global_usings: Vec<String> = files
        .iter()
        .flat_map(|(_, f)| f.global_usings.iter().cloned())
        .collect();

    let mut pending: Vec<Pending> = Vec::new();
    let mut by_name: HashMap<QualifiedName, usize> = HashMap::new();

    for (path, file) in files {
        for ParsedType {
            mut declaration,
            annotations,
            mut scope,
        } in file.types
        {
            scope.imports.extend(global_usings.iter().cloned());
            let written: Vec<_> = annotations
                .into_iter()
                .map(|a| (a, scope.clone()))
                .collect();

            let key = declaration.qualified_name();
            match by_name.get(&key) {
                Some(&index) => {
                    let existing = &mut pending[index];
                    for member in declaration.members {
                        if existing.declaration.member(&member.name).is_none() {
                            existing.declaration.members.push(member);
                        }
                    }
                    existing.annotations.extend(written);
                }
                None => {
                    declaration.source = Some(path.clone());
                    by_name.insert(key, pending.len());
                    pending.push(Pending {
                        declaration,
                        annotations: written,
                    });
                }
            }
        }
    }

    let mut draft = SymbolTable::new();
    for p in &pending {
        draft.insert(p.declaration.clone());
    }

    let mut table = SymbolTable::new();
    for Pending {
        mut declaration,
        annotations,
    } in pending
    {
        for (written, scope) in &annotations {
            let qualified = draft.qualify_annotation(written, scope);
            if !declaration.annotations.contains(&qualified) {
                declaration.annotations.push(qualified);
            }
        }
        table.insert(declaration);
    }
    table
}
