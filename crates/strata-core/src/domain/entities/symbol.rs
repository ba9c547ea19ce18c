//! Symbol model recovered from a module's source tree.
//!
//! The loader produces one [`TypeDeclaration`] per declared type (nested
//! types included) and files them into a [`SymbolTable`], a namespace tree
//! that remembers declaration order. Nothing here parses text; see the
//! source adapter for that.

use std::fmt;
use std::path::PathBuf;

use crate::domain::value_objects::QualifiedName;

/// Conventional suffix of attribute classes; `[Foo]` may refer to `FooAttribute`.
pub const ATTRIBUTE_SUFFIX: &str = "Attribute";

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Record,
    RecordStruct,
}

impl TypeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::RecordStruct => "record struct",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property, field or positional record parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub type_ref: String,
}

impl Member {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
        }
    }
}

/// One declared type. Read-only once the loader has built the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub simple_name: String,
    pub containing_namespace: String,
    /// Dotted path of enclosing types for nested declarations (`Outer.Mid`).
    pub declaring_type: Option<String>,
    pub kind: TypeKind,
    pub members: Vec<Member>,
    /// Qualified annotation names after resolution.
    pub annotations: Vec<QualifiedName>,
    /// File the declaration came from, when known.
    pub source: Option<PathBuf>,
}

impl TypeDeclaration {
    pub fn new(
        simple_name: impl Into<String>,
        containing_namespace: impl Into<String>,
        kind: TypeKind,
    ) -> Self {
        Self {
            simple_name: simple_name.into(),
            containing_namespace: containing_namespace.into(),
            declaring_type: None,
            kind,
            members: Vec::new(),
            annotations: Vec::new(),
            source: None,
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        self.members.push(Member::new(name, type_ref));
        self
    }

    pub fn with_annotation(mut self, name: impl Into<String>) -> Self {
        self.annotations.push(QualifiedName::new(name));
        self
    }

    pub fn nested_in(mut self, outer: impl Into<String>) -> Self {
        self.declaring_type = Some(outer.into());
        self
    }

    /// `Namespace.Outer.Name`, with empty parts dropped.
    pub fn qualified_name(&self) -> QualifiedName {
        let local = match &self.declaring_type {
            Some(outer) => format!("{outer}.{}", self.simple_name),
            None => self.simple_name.clone(),
        };
        QualifiedName::join(&self.containing_namespace, &local)
    }

    /// Case-insensitive member lookup.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn has_annotation(&self, marker: &QualifiedName) -> bool {
        self.annotations.iter().any(|a| a.matches(marker))
    }
}

/// Lexical context used to qualify a written annotation name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionScope {
    pub namespace: String,
    pub imports: Vec<String>,
}

impl ResolutionScope {
    pub fn new(namespace: impl Into<String>, imports: Vec<String>) -> Self {
        Self {
            namespace: namespace.into(),
            imports,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct NamespaceNode {
    /// Full dotted name; empty for the global namespace.
    name: String,
    types: Vec<TypeDeclaration>,
    children: Vec<NamespaceNode>,
}

impl NamespaceNode {
    fn child_mut(&mut self, segment: &str) -> &mut NamespaceNode {
        let full = if self.name.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{segment}", self.name)
        };
        let index = match self.children.iter().position(|c| c.name == full) {
            Some(index) => index,
            None => {
                self.children.push(NamespaceNode {
                    name: full,
                    ..Default::default()
                });
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a TypeDeclaration>) {
        out.extend(self.types.iter());
        for child in &self.children {
            child.walk(out);
        }
    }
}

/// Namespace tree of declared types.
///
/// Namespaces and types keep first-declaration order, so traversal order
/// follows the order files were loaded in. Reordering source files can change
/// traversal order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    root: NamespaceNode,
    len: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, declaration: TypeDeclaration) {
        let mut node = &mut self.root;
        if !declaration.containing_namespace.is_empty() {
            let segments: Vec<String> = declaration
                .containing_namespace
                .split('.')
                .map(str::to_string)
                .collect();
            for segment in &segments {
                node = node.child_mut(segment);
            }
        }
        node.types.push(declaration);
        self.len += 1;
    }

    pub fn with(mut self, declaration: TypeDeclaration) -> Self {
        self.insert(declaration);
        self
    }

    /// All types, depth-first: a namespace's own types, then its child
    /// namespaces in declaration order.
    pub fn types(&self) -> Vec<&TypeDeclaration> {
        let mut out = Vec::with_capacity(self.len);
        self.root.walk(&mut out);
        out
    }

    /// Exact (case-sensitive) lookup by fully-qualified name.
    pub fn find(&self, qualified: &str) -> Option<&TypeDeclaration> {
        self.types()
            .into_iter()
            .find(|t| t.qualified_name().as_str() == qualified)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Qualify an annotation name as written in source (`GenerateCrud`,
    /// `Annotations.GenerateCrudAttribute`, `global::X.Y`).
    ///
    /// Candidates are tried with the `Attribute` suffix first, then as
    /// written. Each candidate is looked up as a fully-qualified name, then
    /// in the enclosing namespaces from innermost outwards, then in the
    /// imported namespaces. Names that match no declared type are returned
    /// as written with the suffix appended.
    pub fn qualify_annotation(&self, written: &str, scope: &ResolutionScope) -> QualifiedName {
        let written = written.trim().trim_start_matches("global::");
        let suffixed = if written.ends_with(ATTRIBUTE_SUFFIX) {
            written.to_string()
        } else {
            format!("{written}{ATTRIBUTE_SUFFIX}")
        };

        let mut candidates = vec![suffixed.clone()];
        if suffixed != written {
            candidates.push(written.to_string());
        }

        for candidate in &candidates {
            for prefix in lookup_prefixes(scope) {
                let full = if prefix.is_empty() {
                    candidate.clone()
                } else {
                    format!("{prefix}.{candidate}")
                };
                if let Some(found) = self.find(&full) {
                    return found.qualified_name();
                }
            }
        }

        QualifiedName::new(suffixed)
    }
}

/// Namespace prefixes in lookup order: global (for already-qualified names),
/// enclosing namespaces innermost first, then imports.
fn lookup_prefixes(scope: &ResolutionScope) -> Vec<String> {
    let mut prefixes = vec![String::new()];
    let mut namespace = scope.namespace.as_str();
    while !namespace.is_empty() {
        prefixes.push(namespace.to_string());
        namespace = namespace.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("");
    }
    prefixes.extend(scope.imports.iter().cloned());
    prefixes
}
