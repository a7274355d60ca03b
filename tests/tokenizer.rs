//! Tokenizer edge cases and adversarial input.

use tclparse::{Position, count_tokens, get_token, tokenize};

fn texts(source: &str) -> Vec<String> {
    tokenize(source).into_iter().map(|t| t.text).collect()
}

// -----------------------------------------------------------
// Basic behaviour.
// -----------------------------------------------------------

#[test]
fn whitespace_only_yields_nothing() {
    assert!(tokenize(" \t \n ; \r\n").is_empty());
}

#[test]
fn count_matches_tokenize() {
    let source = "proc f {a b} { puts $a }";
    assert_eq!(count_tokens(source), tokenize(source).len());
    assert_eq!(count_tokens(source), 4);
}

#[test]
fn get_token_by_index() {
    let source = "set arr(key) {a value}";
    assert_eq!(get_token(source, 0), "set");
    assert_eq!(get_token(source, 1), "arr(key)");
    assert_eq!(get_token(source, 2), "{a value}");
    assert_eq!(get_token(source, 3), "");
}

#[test]
fn crlf_separates_like_lf() {
    assert_eq!(texts("a\r\nb"), ["a", "b"]);
}

// -----------------------------------------------------------
// Quoting and grouping.
// -----------------------------------------------------------

#[test]
fn brace_group_swallows_separators() {
    assert_eq!(texts("{a; b\nc}"), ["{a; b\nc}"]);
}

#[test]
fn quote_group_swallows_separators() {
    assert_eq!(texts("\"a; b\nc\""), ["\"a; b\nc\""]);
}

#[test]
fn bracket_swallows_separators() {
    assert_eq!(texts("[cmd a; b]"), ["[cmd a; b]"]);
}

#[test]
fn word_continues_after_closed_group() {
    assert_eq!(texts("{a}b c"), ["{a}b", "c"]);
    assert_eq!(texts("\"a\"b c"), ["\"a\"b", "c"]);
}

#[test]
fn mid_word_brace_is_literal() {
    assert_eq!(texts("a{b c"), ["a{b", "c"]);
}

#[test]
fn escaped_space_stays_in_word() {
    assert_eq!(texts(r"one\ word two"), [r"one\ word", "two"]);
}

#[test]
fn escape_at_end_of_input() {
    assert_eq!(texts("word\\"), ["word\\"]);
}

#[test]
fn deeply_mixed_nesting() {
    let source = r#"set x [lindex {a {b [c "d e"]} f} 1]"#;
    assert_eq!(texts(source), ["set", "x", r#"[lindex {a {b [c "d e"]} f} 1]"#]);
}

// -----------------------------------------------------------
// Dollar forms.
// -----------------------------------------------------------

#[test]
fn lone_dollar_is_a_word() {
    assert_eq!(texts("$ x"), ["$", "x"]);
}

#[test]
fn namespace_qualified_variable() {
    assert_eq!(texts("puts $::ns::value"), ["puts", "$::ns::value"]);
}

#[test]
fn adjacent_substitutions_share_a_word() {
    assert_eq!(texts("puts $a$b"), ["puts", "$a$b"]);
}

#[test]
fn array_access_with_nested_dollar() {
    assert_eq!(texts("puts $arr($key)"), ["puts", "$arr($key)"]);
}

#[test]
fn braced_variable_may_hold_spaces() {
    assert_eq!(texts("puts ${a b}x"), ["puts", "${a b}x"]);
}

// -----------------------------------------------------------
// Best-effort tokens and adversarial input.
// -----------------------------------------------------------

#[test]
fn unmatched_open_delimiters_span_to_end() {
    assert_eq!(texts("{a b"), ["{a b"]);
    assert_eq!(texts("\"a b"), ["\"a b"]);
    assert_eq!(texts("[a b"), ["[a b"]);
    assert_eq!(texts("${never"), ["${never"]);
    assert_eq!(texts("$a(never"), ["$a(never"]);
}

#[test]
fn control_characters_are_opaque() {
    let tokens = tokenize("a\u{1}b \u{7f}");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].text, "a\u{1}b");
}

#[test]
fn huge_flat_input_is_linear() {
    let source = "word ".repeat(10_000);
    assert_eq!(count_tokens(&source), 10_000);
}

#[test]
fn ten_thousand_level_nesting_no_overflow() {
    let depth = 10_000;
    let source = "{".repeat(depth) + &"}".repeat(depth);
    let tokens = tokenize(&source);
    assert_eq!(tokens.len(), 1);
}

// -----------------------------------------------------------
// Position stamping.
// -----------------------------------------------------------

#[test]
fn ranges_are_one_based_and_monotonic() {
    let tokens = tokenize("set x 1\n  set y 2");
    assert_eq!(tokens[0].range.start, Position::new(1, 1));
    assert_eq!(tokens[3].range.start, Position::new(2, 3));
    for pair in tokens.windows(2) {
        assert!(pair[0].range.end <= pair[1].range.start);
    }
    for token in &tokens {
        assert!(token.range.start <= token.range.end);
    }
}

#[test]
fn multibyte_advances_one_column_per_character() {
    let tokens = tokenize("ü x");
    assert_eq!(tokens[1].range.start, Position::new(1, 3));
}
