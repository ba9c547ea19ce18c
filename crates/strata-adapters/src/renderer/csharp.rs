//! Placeholder-substitution renderer for the C# service and controller.

use tracing::instrument;

use strata_core::{
    application::ports::ArtifactRenderer,
    domain::{ArtifactKind, EmissionContext},
    error::{StrataError, StrataResult},
};

use super::templates;

/// C# keywords that cannot be used bare as a parameter name.
const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Renders artifacts from the built-in templates.
///
/// Output depends only on the emission context, so identical inputs always
/// produce byte-identical files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpArtifactRenderer;

impl CSharpArtifactRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn parameter_name(context: &EmissionContext) -> String {
    let camel = context.get("ENTITY_CAMEL").unwrap_or("entity");
    if RESERVED.contains(&camel) {
        format!("@{camel}")
    } else {
        camel.to_string()
    }
}

/// Location for a `201 Created`: the new record when the entity declares
/// `Id`, otherwise the collection.
fn created_route(context: &EmissionContext) -> &'static str {
    if context.entity().key_inferred {
        "nameof(GetById), new { id = created.Id }"
    } else {
        "nameof(GetAll)"
    }
}

impl ArtifactRenderer for CSharpArtifactRenderer {
    #[instrument(skip_all, fields(kind = %kind, entity = %context.entity().name))]
    fn render(&self, kind: ArtifactKind, context: &EmissionContext) -> StrataResult<String> {
        let template = match (kind, context.soft_delete()) {
            (ArtifactKind::Service, false) => templates::SERVICE,
            (ArtifactKind::Service, true) => templates::SERVICE_SOFT_DELETE,
            (ArtifactKind::Controller, _) => templates::CONTROLLER,
        };

        let text = context
            .render(template)
            .replace("{{ENTITY_PARAM}}", &parameter_name(context))
            .replace("{{CREATED_ROUTE}}", created_route(context));

        if let Some(offset) = text.find("{{") {
            let tail: String = text[offset..].chars().take(32).collect();
            return Err(StrataError::Internal {
                message: format!("unresolved placeholder in {kind} template near '{tail}'"),
            });
        }
        Ok(text)
    }
}
