//! Best-effort Tcl word scanner.
//!
//! A single left-to-right pass splits raw text into verbatim word tokens
//! under Tcl's quoting rules: `{...}` groups match by brace depth with
//! backslash suppressing the count for one character, `"..."` runs to the
//! next unescaped quote, `[...]` spans nest, and `$name`, `${name}`,
//! `$name(key)` stay inside their containing word. Unmatched delimiters
//! are never errors here; the token simply spans to end of input and the
//! enclosing command is flagged for the builder.

use crate::position::{Position, Range};
use crate::token::Token;

/// Default bound on brace/bracket nesting depth.
///
/// Depth is tracked with counters, not a real stack, so the bound exists
/// to keep pathological input from looking meaningful forever: past it
/// the scanner stops counting and consumes the remainder as literal text.
pub const DEFAULT_MAX_NESTING: usize = 50_000;

/// Split a source string into verbatim word tokens.
///
/// Total over any input, including the empty string. Whitespace,
/// semicolons, and newlines outside any open delimiter separate words
/// and produce no tokens of their own.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_at(source, Position::origin(), DEFAULT_MAX_NESTING)
}

/// Number of word tokens in `source`.
#[must_use]
pub fn count_tokens(source: &str) -> usize {
    tokenize(source).len()
}

/// Text of the token at `index`, or `""` when out of range.
#[must_use]
pub fn get_token(source: &str, index: usize) -> String {
    tokenize(source)
        .into_iter()
        .nth(index)
        .map_or_else(String::new, |token| token.text)
}

pub(crate) fn tokenize_at(source: &str, origin: Position, max_nesting: usize) -> Vec<Token> {
    let mut scanner = Scanner::new(source, origin, max_nesting);
    let mut tokens = Vec::new();
    loop {
        while matches!(scanner.peek(), Some(b' ' | b'\t' | b'\r' | b'\n' | b';')) {
            scanner.advance();
        }
        if scanner.peek().is_none() {
            break;
        }
        tokens.push(scanner.read_word());
    }
    tokens
}

/// One raw command produced by [`split_commands`], ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawCommand {
    pub tokens: Vec<Token>,
    pub text: String,
    pub range: Range,
    pub is_comment: bool,
    /// A delimiter inside this command stayed open to end of input.
    pub unclosed: bool,
}

/// Walk a script and yield its top-level commands.
///
/// An unquoted `;` or newline terminates a command; a backslash-newline
/// continues one. A `#` in command position starts a comment running to
/// end of line. Word scanning uses the same rules as [`tokenize`], so a
/// command's tokens carry absolute positions within the document.
pub(crate) fn split_commands(
    source: &str,
    origin: Position,
    max_nesting: usize,
) -> Vec<RawCommand> {
    let mut scanner = Scanner::new(source, origin, max_nesting);
    let mut commands = Vec::new();

    loop {
        while matches!(scanner.peek(), Some(b' ' | b'\t' | b'\r' | b'\n' | b';')) {
            scanner.advance();
        }
        let Some(first) = scanner.peek() else { break };

        scanner.unclosed = false;
        let start = scanner.pos;
        let start_loc = scanner.loc;

        if first == b'#' {
            scanner.consume_comment();
            commands.push(RawCommand {
                tokens: Vec::new(),
                text: scanner.src[start..scanner.pos].to_string(),
                range: Range::new(start_loc, scanner.loc),
                is_comment: true,
                unclosed: scanner.unclosed,
            });
            continue;
        }

        let mut tokens = Vec::new();
        let mut end = start;
        let mut end_loc = start_loc;
        loop {
            scanner.skip_inline_space();
            match scanner.peek() {
                None | Some(b'\n' | b'\r' | b';') => break,
                Some(_) => {
                    tokens.push(scanner.read_word());
                    end = scanner.pos;
                    end_loc = scanner.loc;
                }
            }
        }

        commands.push(RawCommand {
            tokens,
            text: scanner.src[start..end].to_string(),
            range: Range::new(start_loc, end_loc),
            is_comment: false,
            unclosed: scanner.unclosed,
        });
    }

    commands
}

/// Strip one matching layer of braces or quotes from a token's text.
pub(crate) fn strip_group(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let matched = (bytes[0] == b'{' && bytes[bytes.len() - 1] == b'}')
            || (bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"');
        if matched {
            return &text[1..text.len() - 1];
        }
    }
    text
}

struct Scanner<'a> {
    src: &'a str,
    input: &'a [u8],
    pos: usize,
    loc: Position,
    max_nesting: usize,
    unclosed: bool,
}

impl<'a> Scanner<'a> {
    const fn new(src: &'a str, origin: Position, max_nesting: usize) -> Self {
        Self {
            src,
            input: src.as_bytes(),
            pos: 0,
            loc: origin,
            max_nesting,
            unclosed: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(&byte) = self.input.get(self.pos) {
            if byte == b'\n' {
                self.loc.line += 1;
                self.loc.column = 1;
            } else if byte & 0xC0 != 0x80 {
                // continuation bytes share their character's column
                self.loc.column += 1;
            }
            self.pos += 1;
        }
    }

    fn consume_rest(&mut self) {
        while self.pos < self.input.len() {
            self.advance();
        }
    }

    /// One word: a brace or quote group may open it, bare characters
    /// (with `[...]` and `$...` tracked) continue it to the next
    /// unquoted separator.
    fn read_word(&mut self) -> Token {
        let start = self.pos;
        let start_loc = self.loc;
        match self.peek() {
            Some(b'{') => {
                self.consume_braced();
                self.consume_bare();
            }
            Some(b'"') => {
                self.consume_quoted();
                self.consume_bare();
            }
            _ => self.consume_bare(),
        }
        Token {
            text: self.src[start..self.pos].to_string(),
            range: Range::new(start_loc, self.loc),
        }
    }

    fn consume_bare(&mut self) {
        loop {
            match self.peek() {
                None | Some(b' ' | b'\t' | b'\r' | b'\n' | b';') => break,
                Some(b'\\') => {
                    self.advance();
                    self.advance();
                }
                Some(b'[') => self.consume_bracketed(),
                Some(b'$') => self.consume_dollar(),
                Some(_) => self.advance(),
            }
        }
    }

    fn consume_braced(&mut self) {
        self.consume_matched(b'{', b'}');
    }

    fn consume_bracketed(&mut self) {
        self.consume_matched(b'[', b']');
    }

    fn consume_matched(&mut self, open: u8, close: u8) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => {
                    self.unclosed = true;
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    self.advance();
                }
                Some(byte) if byte == open => {
                    if depth == self.max_nesting {
                        // depth guard: remainder is literal
                        self.consume_rest();
                        self.unclosed = true;
                        break;
                    }
                    depth += 1;
                    self.advance();
                }
                Some(byte) if byte == close => {
                    self.advance();
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn consume_quoted(&mut self) {
        self.advance(); // opening quote
        loop {
            match self.peek() {
                None => {
                    self.unclosed = true;
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    self.advance();
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// `$name`, `${name}`, or `$name(key)` stays inside its word.
    fn consume_dollar(&mut self) {
        self.advance(); // $
        if self.peek() == Some(b'{') {
            self.advance();
            loop {
                match self.peek() {
                    None => {
                        self.unclosed = true;
                        break;
                    }
                    Some(b'}') => {
                        self.advance();
                        break;
                    }
                    Some(_) => self.advance(),
                }
            }
            return;
        }

        let mut name_len = 0usize;
        while matches!(
            self.peek(),
            Some(byte) if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b':'
        ) {
            self.advance();
            name_len += 1;
        }
        if name_len > 0 && self.peek() == Some(b'(') {
            self.advance();
            loop {
                match self.peek() {
                    None => {
                        self.unclosed = true;
                        break;
                    }
                    Some(b'\\') => {
                        self.advance();
                        self.advance();
                    }
                    Some(b')') => {
                        self.advance();
                        break;
                    }
                    Some(_) => self.advance(),
                }
            }
        }
    }

    /// Spaces, tabs, and backslash-newline continuations within a command.
    fn skip_inline_space(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t') => self.advance(),
                Some(b'\\') if matches!(self.peek_at(1), Some(b'\n' | b'\r')) => {
                    self.advance();
                    if self.peek() == Some(b'\r') {
                        self.advance();
                    }
                    if self.peek() == Some(b'\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Comment to end of line; a trailing backslash continues it.
    fn consume_comment(&mut self) {
        loop {
            match self.peek() {
                None | Some(b'\n') => break,
                Some(b'\\') => {
                    self.advance();
                    if self.peek() == Some(b'\r') {
                        self.advance();
                    }
                    self.advance();
                }
                Some(_) => self.advance(),
            }
        }
    }
}
