use std::fmt;

use crate::position::Range;

/// A variable reference: a plain name or an array element.
///
/// Consumers must match on the variant; a plain name is never silently
/// interchangeable with an array access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarRef {
    Plain(String),
    ArrayAccess { name: String, key: String },
}

/// Classify a variable name as written in source.
///
/// `arr(key)` becomes a [`VarRef::ArrayAccess`]; anything else stays a
/// plain name.
#[must_use]
pub fn parse_var_ref(text: &str) -> VarRef {
    if let Some(open) = text.find('(') {
        if open > 0 && text.ends_with(')') {
            return VarRef::ArrayAccess {
                name: text[..open].to_string(),
                key: text[open + 1..text.len() - 1].to_string(),
            };
        }
    }
    VarRef::Plain(text.to_string())
}

/// One formal parameter of a procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub default: Option<String>,
    /// True for the trailing `args` parameter.
    pub variadic: bool,
}

/// A comment with its source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub range: Range,
}

/// One branch of an `if` chain; `condition` is `None` for `else`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfBranch {
    pub condition: Option<String>,
    pub children: Vec<Node>,
    pub range: Range,
}

/// One `pattern body` arm of a `switch`; a `-` body leaves `children`
/// empty (fallthrough).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchArm {
    pub pattern: String,
    pub children: Vec<Node>,
    pub range: Range,
}

/// Classifies a structural error found while building the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Wrong number or shape of arguments for a known construct.
    #[error("{command} expects {expected}")]
    Arity { command: String, expected: String },
    /// A body or arm list was not a braced block.
    #[error("expected a braced block, found '{found}'")]
    ExpectedBracedBlock { found: String },
    /// Trailing or misplaced token inside a known construct.
    #[error("unexpected '{found}' in {command} command")]
    UnexpectedToken { command: String, found: String },
    /// A switch arm pattern with no body after it.
    #[error("switch arm '{pattern}' has no body")]
    SwitchArmMissingBody { pattern: String },
    /// Body recursion stopped at the configured bound.
    #[error("nesting depth limit of {limit} exceeded")]
    DepthExceeded { limit: usize },
    /// A brace, bracket, or quote stayed open to end of input.
    #[error("input ends inside an unclosed block or quote")]
    UnterminatedInput,
}

/// A structural error, positioned in the source.
///
/// Never returned as `Err` from the public API; `build` accumulates
/// these into [`Root::errors`] and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", range.start.line, range.start.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub range: Range,
}

/// A parsed command, tagged by construct kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `proc name {params} {body}`.
    Proc {
        name: String,
        params: Vec<Param>,
        children: Vec<Node>,
        range: Range,
    },
    /// `set name ?value?`.
    Set {
        var: VarRef,
        value: Option<String>,
        range: Range,
    },
    /// `global`, `variable`, or `upvar` declaration.
    Variable {
        keyword: String,
        refs: Vec<VarRef>,
        value: Option<String>,
        range: Range,
    },
    /// `namespace eval name {body}`.
    Namespace {
        name: String,
        children: Vec<Node>,
        range: Range,
    },
    /// `if {cond} {body} ?elseif ...? ?else {body}?`.
    If { branches: Vec<IfBranch>, range: Range },
    /// `for {init} {cond} {next} {body}`.
    For {
        init: String,
        condition: String,
        next: String,
        children: Vec<Node>,
        range: Range,
    },
    /// `while {cond} {body}`.
    While {
        condition: String,
        children: Vec<Node>,
        range: Range,
    },
    /// `foreach varlist list {body}`.
    Foreach {
        vars: String,
        list: String,
        children: Vec<Node>,
        range: Range,
    },
    /// `switch ?flags? subject {pattern body ...}`.
    Switch {
        subject: String,
        arms: Vec<SwitchArm>,
        range: Range,
    },
    /// `catch {script} ?resultVar?`.
    Catch {
        children: Vec<Node>,
        result_var: Option<VarRef>,
        range: Range,
    },
    /// Any command without a dedicated construct parser.
    Command {
        name: String,
        args: Vec<String>,
        range: Range,
    },
    /// `expr ...` with the expression kept as an unparsed leaf.
    Expr { expression: String, range: Range },
    /// A `#` comment inside a nested body.
    Comment { text: String, range: Range },
    /// A malformed command, kept in place of the node it failed to be.
    Error(ParseError),
}

impl Node {
    /// Source range of this node.
    #[must_use]
    pub const fn range(&self) -> &Range {
        match self {
            Self::Proc { range, .. }
            | Self::Set { range, .. }
            | Self::Variable { range, .. }
            | Self::Namespace { range, .. }
            | Self::If { range, .. }
            | Self::For { range, .. }
            | Self::While { range, .. }
            | Self::Foreach { range, .. }
            | Self::Switch { range, .. }
            | Self::Catch { range, .. }
            | Self::Command { range, .. }
            | Self::Expr { range, .. }
            | Self::Comment { range, .. } => range,
            Self::Error(err) => &err.range,
        }
    }

    /// Lower-case kind name, as used in the JSON wire format.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Proc { .. } => "proc",
            Self::Set { .. } => "set",
            Self::Variable { .. } => "variable",
            Self::Namespace { .. } => "namespace",
            Self::If { .. } => "if",
            Self::For { .. } => "for",
            Self::While { .. } => "while",
            Self::Foreach { .. } => "foreach",
            Self::Switch { .. } => "switch",
            Self::Catch { .. } => "catch",
            Self::Command { .. } => "command",
            Self::Expr { .. } => "expr",
            Self::Comment { .. } => "comment",
            Self::Error(_) => "error",
        }
    }
}

/// Result of building one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub filepath: String,
    /// Top-level comments, in source order, separate from `children`.
    pub comments: Vec<Comment>,
    /// Top-level commands in source order.
    pub children: Vec<Node>,
    /// Always equal to `!errors.is_empty()`.
    pub had_error: bool,
    /// Every error in the document, including those inside nested bodies.
    pub errors: Vec<ParseError>,
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(name) => write!(f, "{name}"),
            Self::ArrayAccess { name, key } => write!(f, "{name}({key})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn plain_var_ref() {
        assert_eq!(parse_var_ref("counter"), VarRef::Plain("counter".into()));
    }

    #[test]
    fn array_var_ref() {
        assert_eq!(parse_var_ref("arr(key)"), VarRef::ArrayAccess {
            name: "arr".into(),
            key: "key".into(),
        });
    }

    #[test]
    fn array_key_may_hold_anything() {
        assert_eq!(parse_var_ref("a(x,y)"), VarRef::ArrayAccess {
            name: "a".into(),
            key: "x,y".into(),
        });
    }

    #[test]
    fn paren_without_name_stays_plain() {
        assert_eq!(parse_var_ref("(key)"), VarRef::Plain("(key)".into()));
    }

    #[test]
    fn unclosed_paren_stays_plain() {
        assert_eq!(parse_var_ref("arr(key"), VarRef::Plain("arr(key".into()));
    }

    #[test]
    fn error_display_carries_position() {
        let err = ParseError {
            kind: ParseErrorKind::Arity {
                command: "proc".into(),
                expected: "a name, a parameter list, and a body".into(),
            },
            range: Range::new(Position::new(3, 5), Position::new(3, 9)),
        };
        assert_eq!(
            err.to_string(),
            "proc expects a name, a parameter list, and a body at line 3, column 5"
        );
    }
}
