//! Patch policies for project files and the API entry point.
//!
//! Pure functions over [`MarkedDocument`]. Every function here is
//! idempotent: applying it twice with the same input leaves the document
//! byte-identical to applying it once.

use serde::Serialize;

use crate::domain::{
    entities::document::{MarkedDocument, PROVIDER_TAGS, REGISTRATION_TAGS},
    error::DomainError,
    providers::ProviderDef,
};

/// Include line that pulls generated services into the application project.
pub const SERVICES_INCLUDE: &str = r#"<Compile Update="Services\**\*.cs" />"#;

/// Comment marking where logging is configured in `Program.cs`.
pub const LOGGING_SETUP_MARKER: &str = "// Logging setup";

const SECTION_OPEN: &str = "<ItemGroup";
const SECTION_CLOSE: &str = "</ItemGroup>";
const PROJECT_CLOSE: &str = "</Project>";
const BUILDER_CREATE: &str = "WebApplication.CreateBuilder(";
const BUILDER_BUILD: &str = "builder.Build()";

const CHILD_INDENT: &str = "  ";

/// Result of [`ensure_include`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeOutcome {
    AlreadyPresent,
    AddedToSection,
    AddedNewSection,
}

/// Where a registration block ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationAnchor {
    BeforeLoggingSetup,
    AfterBuilderCreation,
    BeforeBuild,
    EndOfFile,
}

impl RegistrationAnchor {
    /// `true` when none of the textual anchors matched.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }
}

/// Where a provider reference block ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPlacement {
    ExistingSection,
    NewSection,
}

/// Make sure `line` appears once inside the first `<ItemGroup>`.
pub fn ensure_include(doc: &mut MarkedDocument, line: &str) -> IncludeOutcome {
    if doc.contains_line(line) {
        return IncludeOutcome::AlreadyPresent;
    }
    match insert_into_first_section(doc, vec![line.trim().to_string()]) {
        SectionPlacement::ExistingSection => IncludeOutcome::AddedToSection,
        SectionPlacement::NewSection => IncludeOutcome::AddedNewSection,
    }
}

/// Replace the provider reference block with the one for `provider`.
pub fn inject_provider_reference(
    doc: &mut MarkedDocument,
    provider: &ProviderDef,
) -> Result<SectionPlacement, DomainError> {
    doc.remove_blocks(PROVIDER_TAGS)?;

    let mut block = Vec::with_capacity(3);
    block.push(PROVIDER_TAGS.start.to_string());
    block.push(provider.reference_line());
    block.push(PROVIDER_TAGS.end.to_string());

    Ok(insert_into_first_section(doc, block))
}

/// Replace the registration block with the one for `provider`, placed at the
/// first anchor that exists.
pub fn inject_registration(
    doc: &mut MarkedDocument,
    provider: &ProviderDef,
) -> Result<RegistrationAnchor, DomainError> {
    doc.remove_blocks(REGISTRATION_TAGS)?;
    let content = [provider.registration_statement()];

    if let Some(index) = doc.find_line(|l| l.trim_start().starts_with(LOGGING_SETUP_MARKER)) {
        let indent = doc.indent_of(index);
        doc.insert_block(index, REGISTRATION_TAGS, &content, &indent);
        return Ok(RegistrationAnchor::BeforeLoggingSetup);
    }

    if let Some(index) = doc.find_line(|l| l.contains(BUILDER_CREATE)) {
        let indent = doc.indent_of(index);
        doc.insert_block(index + 1, REGISTRATION_TAGS, &content, &indent);
        return Ok(RegistrationAnchor::AfterBuilderCreation);
    }

    if let Some(index) = doc.find_line(|l| l.contains(BUILDER_BUILD)) {
        let indent = doc.indent_of(index);
        doc.insert_block(index, REGISTRATION_TAGS, &content, &indent);
        return Ok(RegistrationAnchor::BeforeBuild);
    }

    let end = doc.line_count();
    doc.insert_block(end, REGISTRATION_TAGS, &content, "");
    Ok(RegistrationAnchor::EndOfFile)
}

/// Insert `lines` just before the close of the first `<ItemGroup>`; when the
/// file has none, add a section before `</Project>` (or at the end).
fn insert_into_first_section(doc: &mut MarkedDocument, lines: Vec<String>) -> SectionPlacement {
    if let Some(open) = doc.find_line(is_section_open) {
        expand_single_line_section(doc, open);
        let close = doc.lines()[open..]
            .iter()
            .position(|l| l.contains(SECTION_CLOSE))
            .map(|offset| open + offset);

        if let Some(close) = close {
            let indent = format!("{}{CHILD_INDENT}", doc.indent_of(open));
            doc.insert_lines(close, indented(&lines, &indent));
            return SectionPlacement::ExistingSection;
        }
    }

    let project_close = doc.find_line(|l| l.trim_start().starts_with(PROJECT_CLOSE));
    let base = project_close
        .map(|i| format!("{}{CHILD_INDENT}", doc.indent_of(i)))
        .unwrap_or_else(|| CHILD_INDENT.to_string());
    let inner = format!("{base}{CHILD_INDENT}");

    let mut section = Vec::with_capacity(lines.len() + 2);
    section.push(format!("{base}<ItemGroup>"));
    section.extend(indented(&lines, &inner));
    section.push(format!("{base}{SECTION_CLOSE}"));

    match project_close {
        Some(index) => doc.insert_lines(index, section),
        None => doc.push_lines(section),
    }
    SectionPlacement::NewSection
}

/// Rewrite `<ItemGroup></ItemGroup>` or `<ItemGroup />` at `index` as an
/// open line and a close line so children can go between them.
fn expand_single_line_section(doc: &mut MarkedDocument, index: usize) {
    let line = doc.lines()[index].trim().to_string();
    let indent = doc.indent_of(index);

    let (open_tag, inner) = if let Some(close_at) = line.rfind(SECTION_CLOSE) {
        let Some(tag_end) = line.find('>') else {
            return;
        };
        if tag_end >= close_at {
            return;
        }
        (line[..=tag_end].to_string(), line[tag_end + 1..close_at].trim().to_string())
    } else if let Some(head) = line.strip_suffix("/>") {
        (format!("{}>", head.trim_end()), String::new())
    } else {
        return;
    };

    let mut expanded = vec![format!("{indent}{open_tag}")];
    if !inner.is_empty() {
        expanded.push(format!("{indent}{CHILD_INDENT}{inner}"));
    }
    expanded.push(format!("{indent}{SECTION_CLOSE}"));
    doc.replace_line(index, expanded);
}

fn is_section_open(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with(SECTION_OPEN)
        && matches!(
            trimmed[SECTION_OPEN.len()..].chars().next(),
            Some('>') | Some(' ') | Some('\t')
        )
}

fn indented(lines: &[String], indent: &str) -> Vec<String> {
    lines.iter().map(|l| format!("{indent}{l}")).collect()
}
