//! Command walk and error accumulation.
//!
//! [`build`] is total: any input string yields a [`Root`]. A malformed
//! command becomes an [`Node::Error`] in place, its error is appended to
//! [`Root::errors`], and the walk continues with the next command.

use crate::ast::{Comment, Node, ParseError, ParseErrorKind, Root};
use crate::position::Position;
use crate::token::Token;
use crate::tokenizer::{self, RawCommand};

/// Default bound on body recursion depth.
///
/// Separate from the tokenizer's nesting guard: delimiter matching is
/// iterative, but each nested body costs native stack frames.
pub const DEFAULT_MAX_BODY_DEPTH: usize = 400;

/// Tunable guards for [`build_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Brace/bracket nesting bound for the scanner.
    pub max_nesting: usize,
    /// Recursion bound for nested bodies; past it a depth-exceeded
    /// marker node is emitted instead of descending.
    pub max_body_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_nesting: tokenizer::DEFAULT_MAX_NESTING,
            max_body_depth: DEFAULT_MAX_BODY_DEPTH,
        }
    }
}

/// Parse a script into a [`Root`] with default guards.
#[must_use]
pub fn build(source: &str, filepath: &str) -> Root {
    build_with(source, filepath, &BuildOptions::default())
}

/// Parse a script into a [`Root`].
///
/// Total over any input: tokenizer anomalies become best-effort tokens,
/// malformed commands become error nodes, and the rest of the document
/// still parses.
#[must_use]
pub fn build_with(source: &str, filepath: &str, options: &BuildOptions) -> Root {
    let mut builder = Builder {
        errors: Vec::new(),
        options,
    };
    let nodes = builder.parse_script(source, Position::origin(), 0);

    let mut comments = Vec::new();
    let mut children = Vec::new();
    for node in nodes {
        match node {
            Node::Comment { text, range } => comments.push(Comment { text, range }),
            other => children.push(other),
        }
    }

    let errors = builder.errors;
    Root {
        filepath: filepath.to_string(),
        comments,
        children,
        had_error: !errors.is_empty(),
        errors,
    }
}

pub(crate) struct Builder<'a> {
    pub(crate) errors: Vec<ParseError>,
    pub(crate) options: &'a BuildOptions,
}

impl Builder<'_> {
    /// Walk the commands of one script level, in source order.
    pub(crate) fn parse_script(
        &mut self,
        source: &str,
        origin: Position,
        depth: usize,
    ) -> Vec<Node> {
        let mut nodes = Vec::new();
        for command in tokenizer::split_commands(source, origin, self.options.max_nesting) {
            if command.is_comment {
                nodes.push(Node::Comment {
                    text: command.text,
                    range: command.range,
                });
                continue;
            }
            if command.unclosed {
                self.errors.push(ParseError {
                    kind: ParseErrorKind::UnterminatedInput,
                    range: command.range,
                });
            }
            match self.parse_command(&command, depth) {
                Ok(node) => nodes.push(node),
                Err(error) => {
                    self.errors.push(error.clone());
                    nodes.push(Node::Error(error));
                }
            }
        }
        nodes
    }

    /// Dispatch one command on its first token.
    fn parse_command(&mut self, command: &RawCommand, depth: usize) -> Result<Node, ParseError> {
        let Some(first) = command.tokens.first() else {
            return Ok(Node::Command {
                name: String::new(),
                args: Vec::new(),
                range: command.range,
            });
        };
        match first.text.as_str() {
            "proc" => self.parse_proc(command, depth),
            "set" => Self::parse_set(command),
            "global" | "variable" | "upvar" => Self::parse_variable(command),
            "if" => self.parse_if(command, depth),
            "for" => self.parse_for(command, depth),
            "while" => self.parse_while(command, depth),
            "foreach" => self.parse_foreach(command, depth),
            "switch" => self.parse_switch(command, depth),
            "catch" => self.parse_catch(command, depth),
            "namespace" => self.parse_namespace(command, depth),
            "expr" => Self::parse_expr(command),
            _ => Ok(Self::parse_generic(command)),
        }
    }

    /// Recursively parse a braced body token into child nodes.
    ///
    /// Past the depth guard this emits the deterministic depth-exceeded
    /// marker instead of descending further.
    pub(crate) fn parse_body(
        &mut self,
        token: &Token,
        depth: usize,
    ) -> Result<Vec<Node>, ParseError> {
        let Some((inner, origin)) = braced_inner(token) else {
            return Err(ParseError {
                kind: ParseErrorKind::ExpectedBracedBlock {
                    found: preview(&token.text),
                },
                range: token.range,
            });
        };
        if depth >= self.options.max_body_depth {
            let error = ParseError {
                kind: ParseErrorKind::DepthExceeded {
                    limit: self.options.max_body_depth,
                },
                range: token.range,
            };
            self.errors.push(error.clone());
            return Ok(vec![Node::Error(error)]);
        }
        Ok(self.parse_script(inner, origin, depth + 1))
    }
}

/// Inner text and origin of a braced token, or `None` if not braced.
///
/// The trailing brace may be missing on best-effort tokens; the inner
/// text then runs to the end of the token.
pub(crate) fn braced_inner(token: &Token) -> Option<(&str, Position)> {
    let inner = token.text.strip_prefix('{')?;
    let inner = inner.strip_suffix('}').unwrap_or(inner);
    Some((inner, token.range.start.advanced("{")))
}

/// Shorten a token's text for an error message.
pub(crate) fn preview(text: &str) -> String {
    const LIMIT: usize = 24;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let mut shortened: String = text.chars().take(LIMIT).collect();
        shortened.push_str("...");
        shortened
    }
}
