//! Property-based tests with proptest.
//!
//! The central property is totality: `build` must return a tree for
//! ANY input, and the emitted JSON must always be valid. On top of
//! that, generated well-formed scripts must come back with the
//! structure they were generated from.

use proptest::prelude::*;
use tclparse::{Node, VarRef, build, count_tokens, to_json, tokenize};

// -- Leaf strategies --

/// Command name that never collides with a recognised construct.
fn command_name() -> impl Strategy<Value = String> {
    "x[a-z0-9_]{0,11}".prop_map(|s| s)
}

/// Bare argument: no separators, no quoting characters.
fn bare_arg() -> impl Strategy<Value = String> {
    "[a-z0-9._:-]{1,12}".prop_map(|s| s)
}

/// One generic command line.
fn command_line() -> impl Strategy<Value = (String, Vec<String>)> {
    (command_name(), prop::collection::vec(bare_arg(), 0..=4))
}

/// A whole script of generic commands, one per line.
fn script() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec(command_line(), 0..=20)
}

fn render(lines: &[(String, Vec<String>)]) -> String {
    let mut out = String::new();
    for (name, args) in lines {
        out.push_str(name);
        for arg in args {
            out.push(' ');
            out.push_str(arg);
        }
        out.push('\n');
    }
    out
}

/// Concentrated delimiter soup, heavy on the characters the scanner
/// treats specially.
fn delimiter_soup() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[{}\\[\\]\"$();\\\\ \n\t#a-z0-9]{0,80}")
        .unwrap_or_else(|e| panic!("strategy regex: {e}"))
}

// -- Property tests --

proptest! {
    /// `build` is total: any string at all yields a tree whose error
    /// flag mirrors its error list.
    #[test]
    fn build_never_fails(source in any::<String>()) {
        let root = build(&source, "fuzz.tcl");
        prop_assert_eq!(root.had_error, !root.errors.is_empty());
    }

    /// The emitted JSON always parses, whatever went in.
    #[test]
    fn emitted_json_always_parses(source in any::<String>()) {
        let rendered = to_json(&build(&source, "fuzz.tcl"));
        serde_json::from_str::<serde_json::Value>(&rendered).map_err(|e| {
            TestCaseError::fail(
                std::format!("invalid JSON for {source:?}: {e}\n--- output ---\n{rendered}"))
        })?;
    }

    /// Delimiter-heavy input never faults the scanner or the builder.
    #[test]
    fn delimiter_soup_never_faults(source in delimiter_soup()) {
        let root = build(&source, "soup.tcl");
        let rendered = to_json(&root);
        serde_json::from_str::<serde_json::Value>(&rendered).map_err(|e| {
            TestCaseError::fail(std::format!("invalid JSON for {source:?}: {e}"))
        })?;
    }

    /// `count_tokens` agrees with `tokenize` on arbitrary input.
    #[test]
    fn count_matches_tokenize(source in any::<String>()) {
        prop_assert_eq!(count_tokens(&source), tokenize(&source).len());
    }

    /// Token ranges are ordered and never regress, whatever went in.
    #[test]
    fn token_ranges_monotonic(source in delimiter_soup()) {
        let tokens = tokenize(&source);
        for token in &tokens {
            prop_assert!(token.range.start <= token.range.end);
        }
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].range.end <= pair[1].range.start);
        }
    }

    /// Generated command scripts parse clean, one node per line, with
    /// names and argument counts intact.
    #[test]
    fn generated_scripts_survive(lines in script()) {
        let source = render(&lines);
        let root = build(&source, "gen.tcl");
        prop_assert!(!root.had_error, "errors: {:?}", root.errors);
        prop_assert_eq!(root.children.len(), lines.len());
        for (node, (name, args)) in root.children.iter().zip(&lines) {
            match node {
                Node::Command { name: got, args: got_args, .. } => {
                    prop_assert_eq!(got, name);
                    prop_assert_eq!(got_args, args);
                }
                other => prop_assert!(false, "expected command, got {:?}", other),
            }
        }
    }

    /// `set name value` round-trips its variable name through the tree.
    #[test]
    fn generated_sets_keep_their_names(name in "[a-z][a-z0-9_]{0,9}", value in bare_arg()) {
        let root = build(&std::format!("set {name} {value}"), "gen.tcl");
        prop_assert!(!root.had_error);
        match &root.children[0] {
            Node::Set { var: VarRef::Plain(got), value: Some(v), .. } => {
                prop_assert_eq!(got, &name);
                prop_assert_eq!(v, &value);
            }
            other => prop_assert!(false, "expected set, got {:?}", other),
        }
    }

    /// Building twice gives the same tree: no hidden state.
    #[test]
    fn build_is_deterministic(source in delimiter_soup()) {
        prop_assert_eq!(build(&source, "a.tcl"), build(&source, "a.tcl"));
    }
}
