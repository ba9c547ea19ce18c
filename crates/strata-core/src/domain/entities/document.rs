//! Text documents with named, replaceable regions.
//!
//! A [`MarkedDocument`] is a line-oriented view of a hand-maintained file
//! (project file, entry point). A region is the run of lines from the line
//! holding a [`TagPair`]'s start tag through the line holding its end tag.
//! Everything outside a region is preserved byte-for-byte.

use crate::domain::error::DomainError;

/// A matched start/end tag pair delimiting a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPair {
    pub start: &'static str,
    pub end: &'static str,
}

impl TagPair {
    pub const fn new(start: &'static str, end: &'static str) -> Self {
        Self { start, end }
    }
}

/// Data-access provider reference inside a project file.
pub const PROVIDER_TAGS: TagPair =
    TagPair::new("<!-- BEGIN_EF_PROVIDER -->", "<!-- END_EF_PROVIDER -->");

/// Provider registration statement inside the entry point.
pub const REGISTRATION_TAGS: TagPair =
    TagPair::new("/*<EF_REGISTRATION>*/", "/*</EF_REGISTRATION>*/");

/// Line-oriented document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedDocument {
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl MarkedDocument {
    pub fn parse(text: &str) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = text.ends_with('\n');
        let body = text
            .strip_suffix(line_ending)
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text);

        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split(line_ending)
                .map(|l| l.trim_end_matches('\r').to_string())
                .collect()
        };

        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join(self.line_ending);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.line_ending);
        }
        out
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Index of the first line satisfying `predicate`.
    pub fn find_line(&self, predicate: impl Fn(&str) -> bool) -> Option<usize> {
        self.lines.iter().position(|l| predicate(l))
    }

    /// `true` when some line, trimmed, equals `line` trimmed.
    pub fn contains_line(&self, line: &str) -> bool {
        let line = line.trim();
        self.lines.iter().any(|l| l.trim() == line)
    }

    /// Count complete regions for `tags`.
    pub fn count_blocks(&self, tags: TagPair) -> Result<usize, DomainError> {
        Ok(self.block_spans(tags)?.len())
    }

    /// Remove every region for `tags`. Returns the line index where the
    /// first removed region started.
    pub fn remove_blocks(&mut self, tags: TagPair) -> Result<Option<usize>, DomainError> {
        let spans = self.block_spans(tags)?;
        let first = spans.first().map(|&(start, _)| start);
        for &(start, end) in spans.iter().rev() {
            self.lines.drain(start..=end);
        }
        Ok(first)
    }

    /// Insert a region at `index` (clamped to the end), each line prefixed
    /// with `indent`.
    pub fn insert_block(&mut self, index: usize, tags: TagPair, content: &[String], indent: &str) {
        let mut block = Vec::with_capacity(content.len() + 2);
        block.push(format!("{indent}{}", tags.start));
        block.extend(content.iter().map(|l| format!("{indent}{l}")));
        block.push(format!("{indent}{}", tags.end));
        self.insert_lines(index, block);
    }

    pub fn insert_lines(&mut self, index: usize, lines: Vec<String>) {
        let index = index.min(self.lines.len());
        if self.lines.is_empty() {
            self.trailing_newline = true;
        }
        self.lines.splice(index..index, lines);
    }

    /// Swap line `index` for `lines`; out of range is a no-op.
    pub fn replace_line(&mut self, index: usize, lines: Vec<String>) {
        if index < self.lines.len() {
            self.lines.splice(index..=index, lines);
        }
    }

    pub fn push_lines(&mut self, lines: Vec<String>) {
        let end = self.lines.len();
        self.insert_lines(end, lines);
    }

    /// Leading whitespace of line `index`.
    pub fn indent_of(&self, index: usize) -> String {
        self.lines
            .get(index)
            .map(|l| l.chars().take_while(|c| c.is_whitespace()).collect())
            .unwrap_or_default()
    }

    /// Line spans (inclusive) of complete regions, in order.
    fn block_spans(&self, tags: TagPair) -> Result<Vec<(usize, usize)>, DomainError> {
        let mut spans = Vec::new();
        let mut open: Option<usize> = None;

        for (index, line) in self.lines.iter().enumerate() {
            let has_start = line.contains(tags.start);
            let has_end = line.contains(tags.end);

            match (open, has_start, has_end) {
                (None, true, true) => spans.push((index, index)),
                (None, true, false) => open = Some(index),
                (None, false, true) => {
                    return Err(unbalanced(tags, format!("end tag without start on line {}", index + 1)));
                }
                (Some(_), true, _) => {
                    return Err(unbalanced(tags, format!("nested start tag on line {}", index + 1)));
                }
                (Some(start), false, true) => {
                    spans.push((start, index));
                    open = None;
                }
                _ => {}
            }
        }

        if let Some(start) = open {
            return Err(unbalanced(tags, format!("start tag on line {} is never closed", start + 1)));
        }
        Ok(spans)
    }
}

fn unbalanced(tags: TagPair, reason: String) -> DomainError {
    DomainError::UnbalancedBlock {
        start: tags.start.to_string(),
        end: tags.end.to_string(),
        reason,
    }
}
