//! Error-tolerant Tcl tokenizer, AST builder, and JSON serializer.
//!
//! A typed AST for Tcl-style scripts with best-effort tokenization,
//! per-command error recovery, and a stable JSON interchange format.
//! [`build`] never fails: malformed commands become error nodes in the
//! tree and the rest of the document still parses.
//!
//! # Quick start
//!
//! ## Parse a script and render it as JSON
//!
//! ```
//! use tclparse::{build, to_json};
//!
//! let root = build("proc hello {} { puts \"Hi\" }", "hello.tcl");
//! assert!(!root.had_error);
//! assert_eq!(root.children.len(), 1);
//!
//! let json = to_json(&root);
//! assert!(json.contains("\"type\":\"proc\""));
//! ```
//!
//! ## Recover from malformed input
//!
//! ```
//! use tclparse::build;
//!
//! let root = build("proc broken {\nset x 1", "broken.tcl");
//! assert!(root.had_error);
//! assert!(!root.errors.is_empty());
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod builder;
mod constructs;
pub mod json;
pub mod position;
pub mod token;
pub mod tokenizer;

pub use ast::{
    Comment, IfBranch, Node, Param, ParseError, ParseErrorKind, Root, SwitchArm, VarRef,
    parse_var_ref,
};
pub use builder::{BuildOptions, DEFAULT_MAX_BODY_DEPTH, build, build_with};
pub use json::{node_to_json, to_json};
pub use position::{Position, Range};
pub use token::Token;
pub use tokenizer::{DEFAULT_MAX_NESTING, count_tokens, get_token, tokenize};
