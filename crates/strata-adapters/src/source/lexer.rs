//! Small C# lexer: yields identifiers and punctuation while skipping
//! whitespace, comments, preprocessor lines and literal contents.
//!
//! Literals collapse into a single [`TokenKind::Literal`] so that the
//! structural parser never sees braces or quotes that live inside strings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Identifier or keyword; a verbatim `@` prefix is stripped.
    Ident(&'a str),
    Symbol(char),
    /// `=>`
    Arrow,
    /// `::`
    DoubleColon,
    /// String, char or numeric literal.
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
}

impl Token<'_> {
    pub fn is_ident(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Ident(w) if w == word)
    }

    pub fn is_symbol(&self, ch: char) -> bool {
        self.kind == TokenKind::Symbol(ch)
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    /// Only whitespace seen since the last newline.
    line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self {
            src,
            pos: 0,
            line_start: true,
        }
    }

    /// Lex the whole input.
    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes().get(self.pos + ahead).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes()
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(s.as_bytes()))
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.pos += 1;
                    self.line_start = true;
                }
                b' ' | b'\t' | b'\r' | 0x0C => self.pos += 1,
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\n' {
                self.line_start = true;
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.src.len() {
            if self.starts_with("*/") {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    /// `"..."` or `'...'` with backslash escapes. Stops at end of line for
    /// unterminated literals.
    fn skip_quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'\\' => self.pos += 1,
                b'\n' => return,
                _ if b == quote => return,
                _ => {}
            }
        }
    }

    /// `@"..."`; `""` is an escaped quote. Expects `pos` on the opening quote.
    fn skip_verbatim(&mut self) {
        self.pos += 1;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'"' {
                if self.peek() == Some(b'"') {
                    self.pos += 1;
                } else {
                    return;
                }
            }
        }
    }

    /// `"""..."""` with at least three quotes; closes on the same count.
    fn skip_raw(&mut self) {
        let mut open = 0;
        while self.peek() == Some(b'"') {
            open += 1;
            self.pos += 1;
        }
        while self.pos < self.src.len() {
            if self.peek() == Some(b'"') {
                let mut run = 0;
                while self.peek() == Some(b'"') {
                    run += 1;
                    self.pos += 1;
                }
                if run >= open {
                    return;
                }
            } else {
                self.pos += 1;
            }
        }
    }

    /// `$"..."` / `$@"..."`. Holes may nest further literals.
    fn skip_interpolated(&mut self, verbatim: bool) {
        self.pos += 1;
        let mut holes = 0usize;
        while let Some(b) = self.peek() {
            if holes > 0 {
                match b {
                    b'"' => {
                        self.skip_string_at_quote();
                        continue;
                    }
                    b'\'' => {
                        self.skip_quoted(b'\'');
                        continue;
                    }
                    b'{' => holes += 1,
                    b'}' => holes -= 1,
                    _ => {}
                }
                self.pos += 1;
                continue;
            }

            self.pos += 1;
            match b {
                b'{' if self.peek() == Some(b'{') => self.pos += 1,
                b'{' => holes = 1,
                b'\\' if !verbatim => self.pos += 1,
                b'"' if verbatim && self.peek() == Some(b'"') => self.pos += 1,
                b'"' => return,
                b'\n' if !verbatim => return,
                _ => {}
            }
        }
    }

    /// Skip a string whose first quote is at `pos`, choosing raw or regular.
    fn skip_string_at_quote(&mut self) {
        if self.starts_with("\"\"\"") {
            self.skip_raw();
        } else {
            self.skip_quoted(b'"');
        }
    }

    /// String literal with `$`/`@` prefixes starting at `pos`, if any.
    fn try_skip_prefixed_string(&mut self) -> bool {
        let mut ahead = 0;
        let mut dollars = 0;
        let mut verbatim = false;
        while let Some(b) = self.peek_at(ahead) {
            match b {
                b'$' => dollars += 1,
                b'@' if !verbatim => verbatim = true,
                _ => break,
            }
            ahead += 1;
        }
        if ahead == 0 || self.peek_at(ahead) != Some(b'"') {
            return false;
        }

        self.pos += ahead;
        if self.starts_with("\"\"\"") {
            self.skip_raw();
        } else if dollars > 0 {
            self.skip_interpolated(verbatim);
        } else {
            self.skip_verbatim();
        }
        true
    }

    fn lex_ident(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_ident_part(b) {
                self.pos += 1;
            } else if b >= 0x80 {
                // non-ASCII identifier characters; advance a whole char
                let ch = self.src[self.pos..].chars().next();
                match ch {
                    Some(c) if c.is_alphanumeric() => self.pos += c.len_utf8(),
                    _ => break,
                }
            } else {
                break;
            }
        }
        &src[start..self.pos]
    }

    fn skip_number(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                // `1.ToString()` is rare enough to ignore
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            self.skip_whitespace();
            let b = self.peek()?;

            if b == b'#' && self.line_start {
                self.skip_line();
                continue;
            }
            self.line_start = false;

            if self.starts_with("//") {
                self.skip_line();
                continue;
            }
            if self.starts_with("/*") {
                self.skip_block_comment();
                continue;
            }

            let offset = self.pos;
            let token = |kind| Some(Token { kind, offset });

            match b {
                b'"' => {
                    self.skip_string_at_quote();
                    return token(TokenKind::Literal);
                }
                b'\'' => {
                    self.skip_quoted(b'\'');
                    return token(TokenKind::Literal);
                }
                b'$' | b'@' if self.try_skip_prefixed_string() => {
                    return token(TokenKind::Literal);
                }
                b'@' if self.peek_at(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    let ident = self.lex_ident();
                    return token(TokenKind::Ident(ident));
                }
                b'0'..=b'9' => {
                    self.skip_number();
                    return token(TokenKind::Literal);
                }
                b'=' if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    return token(TokenKind::Arrow);
                }
                b':' if self.peek_at(1) == Some(b':') => {
                    self.pos += 2;
                    return token(TokenKind::DoubleColon);
                }
                b if is_ident_start(b) => {
                    let ident = self.lex_ident();
                    return token(TokenKind::Ident(ident));
                }
                b if b >= 0x80 => {
                    let ch = self.src[self.pos..].chars().next()?;
                    if ch.is_alphabetic() {
                        let ident = self.lex_ident();
                        return token(TokenKind::Ident(ident));
                    }
                    self.pos += ch.len_utf8();
                    return token(TokenKind::Symbol(ch));
                }
                _ => {
                    self.pos += 1;
                    return token(TokenKind::Symbol(b as char));
                }
            }
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_part(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}
