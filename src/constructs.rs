//! Construct parsers: one per command family.
//!
//! Each takes the tokens of a single command and either produces a typed
//! node or reports one positioned error; the caller turns the error into
//! an in-place `Error` node and moves on.

use crate::ast::{IfBranch, Node, Param, ParseError, ParseErrorKind, SwitchArm, parse_var_ref};
use crate::builder::{Builder, braced_inner, preview};
use crate::position::Range;
use crate::token::Token;
use crate::tokenizer::{RawCommand, strip_group, tokenize_at};

impl Builder<'_> {
    /// `proc name {params} {body}`.
    pub(crate) fn parse_proc(
        &mut self,
        command: &RawCommand,
        depth: usize,
    ) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        if tokens.len() != 4 {
            return Err(arity(
                "proc",
                "a name, a parameter list, and a body",
                command.range,
            ));
        }
        let params = Self::parse_params(&tokens[2]);
        let children = self.parse_body(&tokens[3], depth)?;
        Ok(Node::Proc {
            name: tokens[1].text.clone(),
            params,
            children,
            range: command.range,
        })
    }

    /// Parameter list: bare names or `{name default}` pairs; a trailing
    /// `args` is the variadic marker.
    fn parse_params(token: &Token) -> Vec<Param> {
        let words = tokenize_at(strip_group(&token.text), token.range.start, usize::MAX);
        let last = words.len().saturating_sub(1);
        words
            .iter()
            .enumerate()
            .map(|(index, word)| {
                let (name, default) = if word.text.starts_with('{') {
                    let parts = tokenize_at(strip_group(&word.text), word.range.start, usize::MAX);
                    let name = parts.first().map(|p| p.text.clone()).unwrap_or_default();
                    let default = parts.get(1).map(|p| strip_group(&p.text).to_string());
                    (name, default)
                } else {
                    (word.text.clone(), None)
                };
                Param {
                    variadic: index == last && name == "args",
                    name,
                    default,
                }
            })
            .collect()
    }

    /// `set name ?value?`.
    pub(crate) fn parse_set(command: &RawCommand) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        if !(2..=3).contains(&tokens.len()) {
            return Err(arity(
                "set",
                "a variable name and an optional value",
                command.range,
            ));
        }
        Ok(Node::Set {
            var: parse_var_ref(&tokens[1].text),
            value: tokens.get(2).map(|t| strip_group(&t.text).to_string()),
            range: command.range,
        })
    }

    /// `global`, `variable`, or `upvar`: every name becomes a `VarRef`.
    pub(crate) fn parse_variable(command: &RawCommand) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        let keyword = tokens[0].text.clone();
        if tokens.len() < 2 {
            return Err(arity(&keyword, "at least one variable name", command.range));
        }
        // `variable name value` declares one name with an initial value;
        // every other form is a list of names.
        let (refs, value) = if keyword == "variable" && tokens.len() == 3 {
            (vec![parse_var_ref(&tokens[1].text)], Some(
                strip_group(&tokens[2].text).to_string(),
            ))
        } else {
            (
                tokens[1..]
                    .iter()
                    .map(|t| parse_var_ref(&t.text))
                    .collect(),
                None,
            )
        };
        Ok(Node::Variable {
            keyword,
            refs,
            value,
            range: command.range,
        })
    }

    /// `if {cond} ?then? {body} ?elseif {cond} {body}?* ?else? ?{body}?`.
    pub(crate) fn parse_if(
        &mut self,
        command: &RawCommand,
        depth: usize,
    ) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        let mut branches = Vec::new();
        let mut index = 1;

        self.parse_if_branch(tokens, &mut index, &mut branches, "if", command.range, depth)?;

        while index < tokens.len() {
            match tokens[index].text.as_str() {
                "elseif" => {
                    index += 1;
                    self.parse_if_branch(
                        tokens,
                        &mut index,
                        &mut branches,
                        "elseif",
                        command.range,
                        depth,
                    )?;
                }
                "else" => {
                    let keyword_start = tokens[index].range.start;
                    index += 1;
                    let body = tokens
                        .get(index)
                        .ok_or_else(|| arity("else", "a body", command.range))?;
                    let children = self.parse_body(body, depth)?;
                    branches.push(IfBranch {
                        condition: None,
                        children,
                        range: Range::new(keyword_start, body.range.end),
                    });
                    index += 1;
                }
                // Tcl allows the final else body without the keyword.
                text if text.starts_with('{') && index == tokens.len() - 1 => {
                    let body = &tokens[index];
                    let children = self.parse_body(body, depth)?;
                    branches.push(IfBranch {
                        condition: None,
                        children,
                        range: body.range,
                    });
                    index += 1;
                }
                text => {
                    return Err(ParseError {
                        kind: ParseErrorKind::UnexpectedToken {
                            command: "if".to_string(),
                            found: preview(text),
                        },
                        range: tokens[index].range,
                    });
                }
            }
        }

        Ok(Node::If {
            branches,
            range: command.range,
        })
    }

    fn parse_if_branch(
        &mut self,
        tokens: &[Token],
        index: &mut usize,
        branches: &mut Vec<IfBranch>,
        keyword: &str,
        command_range: Range,
        depth: usize,
    ) -> Result<(), ParseError> {
        let condition = tokens
            .get(*index)
            .ok_or_else(|| arity(keyword, "a condition and a body", command_range))?;
        *index += 1;
        if tokens.get(*index).is_some_and(|t| t.text == "then") {
            *index += 1;
        }
        let body = tokens
            .get(*index)
            .ok_or_else(|| arity(keyword, "a condition and a body", command_range))?;
        let children = self.parse_body(body, depth)?;
        branches.push(IfBranch {
            condition: Some(strip_group(&condition.text).to_string()),
            children,
            range: Range::new(condition.range.start, body.range.end),
        });
        *index += 1;
        Ok(())
    }

    /// `for {init} {cond} {next} {body}`.
    pub(crate) fn parse_for(
        &mut self,
        command: &RawCommand,
        depth: usize,
    ) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        if tokens.len() != 5 {
            return Err(arity(
                "for",
                "an init script, a condition, a next script, and a body",
                command.range,
            ));
        }
        let children = self.parse_body(&tokens[4], depth)?;
        Ok(Node::For {
            init: strip_group(&tokens[1].text).to_string(),
            condition: strip_group(&tokens[2].text).to_string(),
            next: strip_group(&tokens[3].text).to_string(),
            children,
            range: command.range,
        })
    }

    /// `while {cond} {body}`.
    pub(crate) fn parse_while(
        &mut self,
        command: &RawCommand,
        depth: usize,
    ) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        if tokens.len() != 3 {
            return Err(arity("while", "a condition and a body", command.range));
        }
        let children = self.parse_body(&tokens[2], depth)?;
        Ok(Node::While {
            condition: strip_group(&tokens[1].text).to_string(),
            children,
            range: command.range,
        })
    }

    /// `foreach varlist list {body}`.
    pub(crate) fn parse_foreach(
        &mut self,
        command: &RawCommand,
        depth: usize,
    ) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        if tokens.len() != 4 {
            return Err(arity(
                "foreach",
                "a variable list, a value list, and a body",
                command.range,
            ));
        }
        let children = self.parse_body(&tokens[3], depth)?;
        Ok(Node::Foreach {
            vars: strip_group(&tokens[1].text).to_string(),
            list: strip_group(&tokens[2].text).to_string(),
            children,
            range: command.range,
        })
    }

    /// `switch ?flags? ?--? subject {pattern body ...}`.
    pub(crate) fn parse_switch(
        &mut self,
        command: &RawCommand,
        depth: usize,
    ) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        let mut index = 1;
        while let Some(token) = tokens.get(index) {
            if token.text == "--" {
                index += 1;
                break;
            }
            if token.text.starts_with('-') {
                index += 1;
            } else {
                break;
            }
        }
        let expected = "optional flags, a subject, and a braced arm list";
        let subject = tokens
            .get(index)
            .ok_or_else(|| arity("switch", expected, command.range))?;
        let arm_list = tokens
            .get(index + 1)
            .ok_or_else(|| arity("switch", expected, command.range))?;
        if let Some(extra) = tokens.get(index + 2) {
            return Err(ParseError {
                kind: ParseErrorKind::UnexpectedToken {
                    command: "switch".to_string(),
                    found: preview(&extra.text),
                },
                range: extra.range,
            });
        }

        let Some((inner, origin)) = braced_inner(arm_list) else {
            return Err(ParseError {
                kind: ParseErrorKind::ExpectedBracedBlock {
                    found: preview(&arm_list.text),
                },
                range: arm_list.range,
            });
        };
        let arm_tokens = tokenize_at(inner, origin, self.options.max_nesting);

        let mut arms = Vec::new();
        let mut at = 0;
        while at < arm_tokens.len() {
            let pattern = &arm_tokens[at];
            let Some(body) = arm_tokens.get(at + 1) else {
                return Err(ParseError {
                    kind: ParseErrorKind::SwitchArmMissingBody {
                        pattern: preview(&pattern.text),
                    },
                    range: pattern.range,
                });
            };
            // `-` falls through to the next arm's body.
            let children = if body.text == "-" {
                Vec::new()
            } else {
                self.parse_body(body, depth)?
            };
            arms.push(SwitchArm {
                pattern: strip_group(&pattern.text).to_string(),
                children,
                range: Range::new(pattern.range.start, body.range.end),
            });
            at += 2;
        }

        Ok(Node::Switch {
            subject: strip_group(&subject.text).to_string(),
            arms,
            range: command.range,
        })
    }

    /// `catch {script} ?resultVar? ?optionsVar?`.
    pub(crate) fn parse_catch(
        &mut self,
        command: &RawCommand,
        depth: usize,
    ) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        if !(2..=4).contains(&tokens.len()) {
            return Err(arity(
                "catch",
                "a script and an optional result variable",
                command.range,
            ));
        }
        let children = self.parse_body(&tokens[1], depth)?;
        Ok(Node::Catch {
            children,
            result_var: tokens.get(2).map(|t| parse_var_ref(&t.text)),
            range: command.range,
        })
    }

    /// `namespace eval name {body}`; other subcommands stay generic.
    pub(crate) fn parse_namespace(
        &mut self,
        command: &RawCommand,
        depth: usize,
    ) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        if tokens.get(1).is_none_or(|t| t.text != "eval") {
            return Ok(Self::parse_generic(command));
        }
        if tokens.len() != 4 {
            return Err(arity(
                "namespace eval",
                "a namespace name and a body",
                command.range,
            ));
        }
        let children = self.parse_body(&tokens[3], depth)?;
        Ok(Node::Namespace {
            name: tokens[2].text.clone(),
            children,
            range: command.range,
        })
    }

    /// `expr ...`: the expression is kept as an unparsed leaf.
    pub(crate) fn parse_expr(command: &RawCommand) -> Result<Node, ParseError> {
        let tokens = &command.tokens;
        if tokens.len() < 2 {
            return Err(arity("expr", "an expression", command.range));
        }
        let expression = tokens[1..]
            .iter()
            .map(|t| strip_group(&t.text))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Node::Expr {
            expression,
            range: command.range,
        })
    }

    /// Any command without a dedicated parser.
    pub(crate) fn parse_generic(command: &RawCommand) -> Node {
        let tokens = &command.tokens;
        Node::Command {
            name: tokens.first().map(|t| t.text.clone()).unwrap_or_default(),
            args: tokens[1..].iter().map(|t| t.text.clone()).collect(),
            range: command.range,
        }
    }
}

fn arity(command: &str, expected: &str, range: Range) -> ParseError {
    ParseError {
        kind: ParseErrorKind::Arity {
            command: command.to_string(),
            expected: expected.to_string(),
        },
        range,
    }
}
