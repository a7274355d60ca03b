//! JSON rendering of the tree — the interchange contract.
//!
//! Consumers treat the emitted shape as a stable schema:
//!
//! - Every node object carries `"type"` (the lower-case kind) and
//!   `"range"` (`{"start": {"line", "column"}, "end": ...}`).
//! - Fields on the array allow-list (`children`, `params`, `comments`,
//!   `errors`, `branches`, `arms`, `refs`) are always arrays, `[]` when
//!   empty, never `{}`.
//! - A variable reference is a bare string (plain name) or an object
//!   `{"name", "key"}` (array element); consumers discriminate on the
//!   JSON type.
//! - `Command.args` is the one field shaped by the word-list heuristic:
//!   an even element count where every even-position element looks like
//!   a field name (non-empty, no whitespace or control characters)
//!   renders as an object of pairs, anything else as an array of
//!   strings. Two plain strings such as `["a", "b"]` are therefore
//!   indistinguishable from a single key/value pair; that ambiguity is
//!   a deliberate, documented policy tradeoff.
//! - Numeric-looking strings stay JSON strings; absent optional fields
//!   are `null`; escaping is strict JSON (`\"`, `\\`, control
//!   characters as `\u00XX`), multi-byte text passes through.
//!
//! Rendering is infallible by exhaustive construction over the node
//! enum; there is no value the builder can produce that fails here.

use serde_json::{Map, Value};

use crate::ast::{Comment, IfBranch, Node, Param, ParseError, Root, SwitchArm, VarRef};
use crate::position::{Position, Range};

/// Render a [`Root`] as compact JSON text.
#[must_use]
pub fn to_json(root: &Root) -> String {
    root_value(root).to_string()
}

/// Render a single [`Node`] as compact JSON text.
#[must_use]
pub fn node_to_json(node: &Node) -> String {
    node_value(node).to_string()
}

fn root_value(root: &Root) -> Value {
    let mut object = Map::new();
    object.insert("type".into(), text("root"));
    object.insert("filepath".into(), text(&root.filepath));
    object.insert(
        "comments".into(),
        Value::Array(root.comments.iter().map(comment_value).collect()),
    );
    object.insert("children".into(), nodes_value(&root.children));
    object.insert("had_error".into(), Value::Bool(root.had_error));
    object.insert(
        "errors".into(),
        Value::Array(root.errors.iter().map(error_value).collect()),
    );
    Value::Object(object)
}

fn node_value(node: &Node) -> Value {
    let mut object = Map::new();
    object.insert("type".into(), text(node.kind()));
    match node {
        Node::Proc {
            name,
            params,
            children,
            ..
        } => {
            object.insert("name".into(), text(name));
            object.insert(
                "params".into(),
                Value::Array(params.iter().map(param_value).collect()),
            );
            object.insert("children".into(), nodes_value(children));
        }
        Node::Set { var, value, .. } => {
            object.insert("var".into(), var_ref_value(var));
            object.insert("value".into(), optional_text(value.as_deref()));
        }
        Node::Variable {
            keyword,
            refs,
            value,
            ..
        } => {
            object.insert("keyword".into(), text(keyword));
            object.insert(
                "refs".into(),
                Value::Array(refs.iter().map(var_ref_value).collect()),
            );
            object.insert("value".into(), optional_text(value.as_deref()));
        }
        Node::Namespace { name, children, .. } => {
            object.insert("name".into(), text(name));
            object.insert("children".into(), nodes_value(children));
        }
        Node::If { branches, .. } => {
            object.insert(
                "branches".into(),
                Value::Array(branches.iter().map(branch_value).collect()),
            );
        }
        Node::For {
            init,
            condition,
            next,
            children,
            ..
        } => {
            object.insert("init".into(), text(init));
            object.insert("condition".into(), text(condition));
            object.insert("next".into(), text(next));
            object.insert("children".into(), nodes_value(children));
        }
        Node::While {
            condition,
            children,
            ..
        } => {
            object.insert("condition".into(), text(condition));
            object.insert("children".into(), nodes_value(children));
        }
        Node::Foreach {
            vars,
            list,
            children,
            ..
        } => {
            object.insert("vars".into(), text(vars));
            object.insert("list".into(), text(list));
            object.insert("children".into(), nodes_value(children));
        }
        Node::Switch { subject, arms, .. } => {
            object.insert("subject".into(), text(subject));
            object.insert(
                "arms".into(),
                Value::Array(arms.iter().map(arm_value).collect()),
            );
        }
        Node::Catch {
            children,
            result_var,
            ..
        } => {
            object.insert("children".into(), nodes_value(children));
            object.insert(
                "result_var".into(),
                result_var.as_ref().map_or(Value::Null, var_ref_value),
            );
        }
        Node::Command { name, args, .. } => {
            object.insert("name".into(), text(name));
            object.insert("args".into(), word_list(args));
        }
        Node::Expr { expression, .. } => {
            object.insert("expression".into(), text(expression));
        }
        Node::Comment { text: body, .. } => {
            object.insert("text".into(), text(body));
        }
        Node::Error(error) => {
            object.insert("message".into(), text(&error.kind.to_string()));
        }
    }
    object.insert("range".into(), range_value(node.range()));
    Value::Object(object)
}

/// Shape a flat word list by the documented heuristic.
///
/// Non-empty, even-length lists whose even-position words all look like
/// field names become objects of pairs; everything else, including the
/// empty list, stays an array.
fn word_list(words: &[String]) -> Value {
    let dict_shaped = !words.is_empty()
        && words.len() % 2 == 0
        && words.iter().step_by(2).all(|w| plausible_field_name(w));
    if dict_shaped {
        let mut object = Map::new();
        for pair in words.chunks_exact(2) {
            object.insert(pair[0].clone(), text(&pair[1]));
        }
        Value::Object(object)
    } else {
        Value::Array(words.iter().map(|w| text(w)).collect())
    }
}

fn plausible_field_name(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control())
}

fn nodes_value(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(node_value).collect())
}

fn var_ref_value(var: &VarRef) -> Value {
    match var {
        VarRef::Plain(name) => text(name),
        VarRef::ArrayAccess { name, key } => {
            let mut object = Map::new();
            object.insert("name".into(), text(name));
            object.insert("key".into(), text(key));
            Value::Object(object)
        }
    }
}

fn param_value(param: &Param) -> Value {
    let mut object = Map::new();
    object.insert("name".into(), text(&param.name));
    object.insert("default".into(), optional_text(param.default.as_deref()));
    object.insert("variadic".into(), Value::Bool(param.variadic));
    Value::Object(object)
}

fn comment_value(comment: &Comment) -> Value {
    let mut object = Map::new();
    object.insert("type".into(), text("comment"));
    object.insert("text".into(), text(&comment.text));
    object.insert("range".into(), range_value(&comment.range));
    Value::Object(object)
}

fn error_value(error: &ParseError) -> Value {
    let mut object = Map::new();
    object.insert("type".into(), text("error"));
    object.insert("message".into(), text(&error.kind.to_string()));
    object.insert("range".into(), range_value(&error.range));
    Value::Object(object)
}

fn branch_value(branch: &IfBranch) -> Value {
    let mut object = Map::new();
    object.insert(
        "condition".into(),
        optional_text(branch.condition.as_deref()),
    );
    object.insert("children".into(), nodes_value(&branch.children));
    object.insert("range".into(), range_value(&branch.range));
    Value::Object(object)
}

fn arm_value(arm: &SwitchArm) -> Value {
    let mut object = Map::new();
    object.insert("pattern".into(), text(&arm.pattern));
    object.insert("children".into(), nodes_value(&arm.children));
    object.insert("range".into(), range_value(&arm.range));
    Value::Object(object)
}

fn range_value(range: &Range) -> Value {
    let mut object = Map::new();
    object.insert("start".into(), position_value(range.start));
    object.insert("end".into(), position_value(range.end));
    Value::Object(object)
}

fn position_value(position: Position) -> Value {
    let mut object = Map::new();
    object.insert("line".into(), Value::from(position.line));
    object.insert("column".into(), Value::from(position.column));
    Value::Object(object)
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}
