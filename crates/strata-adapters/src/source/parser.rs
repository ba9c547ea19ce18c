//! Structural C# parser.
//!
//! Recovers only what discovery needs: using directives, namespaces, type
//! declarations with their attributes, and the names and types of
//! properties, fields and positional record parameters. Method and accessor
//! bodies are skipped by bracket matching.

use std::mem;

use strata_core::domain::{Member, ResolutionScope, TypeDeclaration, TypeKind};

use super::lexer::{Lexer, Token, TokenKind};

/// Declaration modifiers; skipped wherever they appear at member start.
const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "file", "static", "sealed", "abstract",
    "partial", "readonly", "unsafe", "new", "virtual", "override", "extern", "async", "volatile",
    "const", "required", "fixed", "ref",
];

/// Parameter modifiers that precede the parameter type.
const PARAMETER_MODIFIERS: &[&str] = &["this", "ref", "in", "out", "params", "scoped", "readonly"];

/// A type declaration before its annotations are qualified.
#[derive(Debug, Clone)]
pub struct ParsedType {
    /// Declaration with `annotations` left empty.
    pub declaration: TypeDeclaration,
    /// Attribute names as written, aliases expanded.
    pub annotations: Vec<String>,
    pub scope: ResolutionScope,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// `global using` namespaces; visible in every file of the module.
    pub global_usings: Vec<String>,
    /// Types in declaration order, enclosing types before nested ones.
    pub types: Vec<ParsedType>,
}

pub fn parse_file(src: &str) -> ParsedFile {
    let mut parser = Parser::new(src);
    parser.parse_namespace_body("", false);
    ParsedFile {
        global_usings: parser.global_usings,
        types: parser.types,
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    imports: Vec<String>,
    aliases: Vec<(String, String)>,
    global_usings: Vec<String>,
    types: Vec<ParsedType>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            tokens: Lexer::new(src).tokenize(),
            pos: 0,
            imports: Vec::new(),
            aliases: Vec::new(),
            global_usings: Vec::new(),
            types: Vec::new(),
        }
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind<'a>> {
        self.peek().map(|t| t.kind)
    }

    fn peek_at(&self, ahead: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + ahead).copied()
    }

    fn at_symbol(&self, ch: char) -> bool {
        self.peek().is_some_and(|t| t.is_symbol(ch))
    }

    fn eat_symbol(&mut self, ch: char) -> bool {
        if self.at_symbol(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Skipping
    // ------------------------------------------------------------------

    /// Skip a bracketed group starting at an opening `(`, `[` or `{`.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            self.pos += 1;
            match tok.kind {
                TokenKind::Symbol('(' | '[' | '{') => depth += 1,
                TokenKind::Symbol(')' | ']' | '}') => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
            if depth == 0 {
                return;
            }
        }
    }

    /// Skip `<...>`; gives up at statement punctuation.
    fn skip_angles(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Symbol('<') => depth += 1,
                TokenKind::Symbol('>') => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                TokenKind::Symbol(';' | '{' | '}') => return,
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Skip through the next `;` at bracket depth zero. Stops before an
    /// unmatched `}` so the enclosing block still closes.
    fn skip_past_semicolon(&mut self) {
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Symbol(';') => {
                    self.pos += 1;
                    return;
                }
                TokenKind::Symbol('(' | '[' | '{') => self.skip_balanced(),
                TokenKind::Symbol('}') => return,
                _ => self.pos += 1,
            }
        }
    }

    /// Skip an expression up to a `,` `)` `;` or `}` at depth zero.
    fn skip_expression(&mut self) {
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Symbol(',' | ')' | ';' | '}') => return,
                TokenKind::Symbol('(' | '[' | '{') => self.skip_balanced(),
                _ => self.pos += 1,
            }
        }
    }

    /// Skip whatever follows a parameter list: constraints, constructor
    /// initializers and the body.
    fn skip_member_tail(&mut self) {
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Symbol('{') => {
                    self.skip_balanced();
                    return;
                }
                TokenKind::Symbol(';') => {
                    self.pos += 1;
                    return;
                }
                TokenKind::Arrow => {
                    self.skip_past_semicolon();
                    return;
                }
                TokenKind::Symbol('}') => return,
                TokenKind::Symbol('(' | '[') => self.skip_balanced(),
                _ => self.pos += 1,
            }
        }
    }

    /// Skip to the `{` or `;` that starts a type body.
    fn skip_to_body(&mut self) {
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Symbol('{' | ';' | '}') => return,
                TokenKind::Symbol('(' | '[') => self.skip_balanced(),
                _ => self.pos += 1,
            }
        }
    }

    /// Collect tokens up to the first depth-zero token accepted by `stop`.
    /// `(`, `[` and `<` nest.
    fn collect_until(&mut self, stop: impl Fn(&TokenKind<'a>) -> bool) -> Vec<Token<'a>> {
        let mut out = Vec::new();
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if depth == 0 && stop(&tok.kind) {
                break;
            }
            match tok.kind {
                TokenKind::Symbol('(' | '[' | '<') => depth += 1,
                TokenKind::Symbol(')' | ']' | '>') => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Symbol('{' | '}' | ';') if depth > 0 => break,
                _ => {}
            }
            out.push(tok);
            self.pos += 1;
        }
        out
    }

    // ------------------------------------------------------------------
    // Names and attributes
    // ------------------------------------------------------------------

    /// Dotted name, with a leading `global::` dropped.
    fn read_name(&mut self) -> String {
        if self.peek().is_some_and(|t| t.is_ident("global"))
            && self
                .peek_at(1)
                .is_some_and(|t| t.kind == TokenKind::DoubleColon)
        {
            self.pos += 2;
        }

        let mut name = String::new();
        while let Some(TokenKind::Ident(part)) = self.peek_kind() {
            name.push_str(part);
            self.pos += 1;
            let dotted = self.at_symbol('.')
                && matches!(self.peek_at(1).map(|t| t.kind), Some(TokenKind::Ident(_)));
            if !dotted {
                break;
            }
            name.push('.');
            self.pos += 1;
        }
        name
    }

    fn expand_alias(&self, name: String) -> String {
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name.as_str(), None),
        };
        match self.aliases.iter().rev().find(|(alias, _)| alias == head) {
            Some((_, target)) => match rest {
                Some(rest) => format!("{target}.{rest}"),
                None => target.clone(),
            },
            None => name,
        }
    }

    /// `[target: A, B(args)]`. Assembly and module attributes are dropped.
    fn parse_attribute_section(&mut self) -> Vec<String> {
        self.pos += 1;
        let mut keep = true;
        if let (Some(TokenKind::Ident(target)), Some(colon)) =
            (self.peek_kind(), self.peek_at(1))
        {
            if colon.is_symbol(':') {
                keep = !matches!(target, "assembly" | "module");
                self.pos += 2;
            }
        }

        let mut names = Vec::new();
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::Symbol(']') => {
                    self.pos += 1;
                    break;
                }
                TokenKind::Symbol('{' | '}' | ';') => break,
                TokenKind::Ident(_) => {
                    let name = self.read_name();
                    if self.at_symbol('<') {
                        self.skip_angles();
                    }
                    if self.at_symbol('(') {
                        self.skip_balanced();
                    }
                    names.push(self.expand_alias(name));
                }
                _ => self.pos += 1,
            }
        }

        if keep { names } else { Vec::new() }
    }

    fn parse_using(&mut self, global: bool) {
        self.pos += 1;
        if self.peek().is_some_and(|t| t.is_ident("static")) {
            self.skip_past_semicolon();
            return;
        }

        if let (Some(TokenKind::Ident(alias)), Some(eq)) = (self.peek_kind(), self.peek_at(1)) {
            if eq.is_symbol('=') {
                self.pos += 2;
                let target = self.read_name();
                self.aliases.push((alias.to_string(), target));
                self.skip_past_semicolon();
                return;
            }
        }

        let name = self.read_name();
        if !self.at_symbol(';') {
            // `using var x = ...;` or a using statement
            self.skip_past_semicolon();
            return;
        }
        self.pos += 1;
        if name.is_empty() {
            return;
        }
        if global {
            self.global_usings.push(name);
        } else {
            self.imports.push(name);
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Type keyword at the cursor and how many tokens it spans.
    fn type_keyword(&self) -> Option<(TypeKind, usize)> {
        let TokenKind::Ident(word) = self.peek_kind()? else {
            return None;
        };
        match word {
            "class" => Some((TypeKind::Class, 1)),
            "struct" => Some((TypeKind::Struct, 1)),
            "interface" => Some((TypeKind::Interface, 1)),
            "enum" => Some((TypeKind::Enum, 1)),
            "record" => match self.peek_at(1)?.kind {
                TokenKind::Ident("struct") => Some((TypeKind::RecordStruct, 2)),
                TokenKind::Ident("class") => Some((TypeKind::Record, 2)),
                TokenKind::Ident(_) => Some((TypeKind::Record, 1)),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_namespace_body(&mut self, namespace: &str, braced: bool) {
        let saved_imports = self.imports.len();
        let saved_aliases = self.aliases.len();
        let mut namespace = namespace.to_string();
        let mut attributes = Vec::new();

        while let Some(tok) = self.peek() {
            if let Some((kind, span)) = self.type_keyword() {
                self.pos += span;
                self.parse_type(kind, mem::take(&mut attributes), &namespace, None);
                continue;
            }

            match tok.kind {
                TokenKind::Symbol('}') => {
                    self.pos += 1;
                    if braced {
                        break;
                    }
                }
                TokenKind::Symbol('[') => {
                    let names = self.parse_attribute_section();
                    attributes.extend(names);
                }
                TokenKind::Ident("global")
                    if self.peek_at(1).is_some_and(|t| t.is_ident("using")) =>
                {
                    self.pos += 1;
                    self.parse_using(true);
                }
                TokenKind::Ident("using") => self.parse_using(false),
                TokenKind::Ident("namespace") => {
                    self.pos += 1;
                    let name = self.read_name();
                    let full = join(&namespace, &name);
                    if self.eat_symbol(';') {
                        namespace = full;
                    } else if self.eat_symbol('{') {
                        self.parse_namespace_body(&full, true);
                    }
                    attributes.clear();
                }
                TokenKind::Ident(word) if MODIFIERS.contains(&word) => self.pos += 1,
                TokenKind::Symbol('{') => {
                    attributes.clear();
                    self.skip_balanced();
                }
                _ => {
                    // delegates, top-level statements
                    attributes.clear();
                    let start = self.pos;
                    self.skip_past_semicolon();
                    if self.pos == start {
                        self.pos += 1;
                    }
                }
            }
        }

        self.imports.truncate(saved_imports);
        self.aliases.truncate(saved_aliases);
    }

    /// Parse a type whose keyword has been consumed.
    fn parse_type(
        &mut self,
        kind: TypeKind,
        annotations: Vec<String>,
        namespace: &str,
        outer: Option<&str>,
    ) {
        let Some(TokenKind::Ident(name)) = self.peek_kind() else {
            return;
        };
        self.pos += 1;
        if self.at_symbol('<') {
            self.skip_angles();
        }

        let mut declaration = TypeDeclaration::new(name, namespace, kind);
        if let Some(outer) = outer {
            declaration = declaration.nested_in(outer);
        }

        if self.at_symbol('(') {
            let parameters = self.parse_parameters();
            // primary constructor parameters of classes are not members
            if matches!(kind, TypeKind::Record | TypeKind::RecordStruct) {
                declaration.members.extend(parameters);
            }
        }

        self.skip_to_body();

        let local = match outer {
            Some(outer) => format!("{outer}.{name}"),
            None => name.to_string(),
        };
        let index = self.types.len();
        self.types.push(ParsedType {
            declaration,
            annotations,
            scope: ResolutionScope::new(namespace, self.imports.clone()),
        });

        if !self.at_symbol('{') {
            self.eat_symbol(';');
            return;
        }
        if kind == TypeKind::Enum {
            self.skip_balanced();
        } else {
            self.parse_type_body(index, namespace, &local);
        }
        // `record R { }` may be followed by a stray `;`
        self.eat_symbol(';');
    }

    fn parse_parameters(&mut self) -> Vec<Member> {
        self.pos += 1;
        let mut members = Vec::new();
        loop {
            while self.at_symbol('[') {
                self.skip_balanced();
            }
            let header = self.collect_until(|k| matches!(k, TokenKind::Symbol(',' | ')' | '=')));
            members.extend(member_from_header(&header, PARAMETER_MODIFIERS));

            if self.eat_symbol('=') {
                self.skip_expression();
            }
            if !self.eat_symbol(',') {
                self.eat_symbol(')');
                break;
            }
        }
        members
    }

    fn parse_type_body(&mut self, index: usize, namespace: &str, local: &str) {
        self.pos += 1;
        let mut attributes = Vec::new();

        while let Some(tok) = self.peek() {
            if let Some((kind, span)) = self.type_keyword() {
                self.pos += span;
                self.parse_type(kind, mem::take(&mut attributes), namespace, Some(local));
                continue;
            }

            match tok.kind {
                TokenKind::Symbol('}') => {
                    self.pos += 1;
                    return;
                }
                TokenKind::Symbol('[') => {
                    let names = self.parse_attribute_section();
                    attributes.extend(names);
                }
                TokenKind::Symbol(';') => self.pos += 1,
                TokenKind::Ident(word) if MODIFIERS.contains(&word) => self.pos += 1,
                TokenKind::Ident("delegate") => {
                    attributes.clear();
                    self.skip_past_semicolon();
                }
                _ => {
                    attributes.clear();
                    let start = self.pos;
                    let members = self.parse_member();
                    self.types[index].declaration.members.extend(members);
                    if self.pos == start {
                        self.pos += 1;
                    }
                }
            }
        }
    }

    /// Parse one member; returns the properties or fields it declares.
    fn parse_member(&mut self) -> Vec<Member> {
        let header = self.collect_until(|k| {
            matches!(
                k,
                TokenKind::Symbol('{' | ';' | '(' | '=' | ',' | '}') | TokenKind::Arrow
            )
        });
        let Some(terminator) = self.peek() else {
            return Vec::new();
        };

        let skip_only = header
            .iter()
            .any(|t| t.is_ident("operator") || t.is_ident("event"));
        if skip_only {
            self.skip_member_tail();
            return Vec::new();
        }

        match terminator.kind {
            TokenKind::Symbol('(') => {
                self.skip_balanced();
                self.skip_member_tail();
                Vec::new()
            }
            TokenKind::Symbol('{') => {
                let member = member_from_header(&header, &[]);
                self.skip_balanced();
                if self.eat_symbol('=') {
                    self.skip_past_semicolon();
                }
                // indexers have no name of their own
                member.into_iter().filter(|m| m.name != "this").collect()
            }
            TokenKind::Arrow => {
                let member = member_from_header(&header, &[]);
                self.skip_past_semicolon();
                member.into_iter().collect()
            }
            TokenKind::Symbol('=' | ';' | ',') => self.parse_field_tail(&header),
            _ => Vec::new(),
        }
    }

    /// `T a = 1, b, c = 2;` with the cursor after the first declarator's name.
    fn parse_field_tail(&mut self, header: &[Token<'a>]) -> Vec<Member> {
        let Some(first) = member_from_header(header, &[]) else {
            self.skip_past_semicolon();
            return Vec::new();
        };
        let type_ref = first.type_ref.clone();
        let mut members = vec![first];

        loop {
            if self.eat_symbol('=') {
                self.skip_expression();
            }
            if self.eat_symbol(',') {
                if let Some(TokenKind::Ident(name)) = self.peek_kind() {
                    self.pos += 1;
                    members.push(Member::new(name, type_ref.clone()));
                    continue;
                }
            }
            self.eat_symbol(';');
            return members;
        }
    }
}

fn join(namespace: &str, name: &str) -> String {
    match (namespace.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => namespace.to_string(),
        _ => format!("{namespace}.{name}"),
    }
}

/// `[modifiers] Type Name` to a member; `None` when the last token is not a name.
fn member_from_header(header: &[Token<'_>], modifiers: &[&str]) -> Option<Member> {
    let start = header
        .iter()
        .position(|t| !matches!(t.kind, TokenKind::Ident(w) if modifiers.contains(&w)))?;
    let (last, type_tokens) = header[start..].split_last()?;
    let TokenKind::Ident(name) = last.kind else {
        return None;
    };
    if type_tokens.is_empty() {
        return None;
    }
    Some(Member::new(name, render_type(type_tokens)))
}

/// Type reference text as it would be written, normalized spacing.
fn render_type(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut after_word = false;
    for tok in tokens {
        match tok.kind {
            TokenKind::Ident(word) => {
                if after_word {
                    out.push(' ');
                }
                out.push_str(word);
                after_word = true;
                continue;
            }
            TokenKind::DoubleColon => out.push_str("::"),
            TokenKind::Symbol(',') => out.push_str(", "),
            TokenKind::Symbol(ch) => out.push(ch),
            TokenKind::Arrow => out.push_str("=>"),
            TokenKind::Literal => {}
        }
        after_word = false;
    }
    out
}
