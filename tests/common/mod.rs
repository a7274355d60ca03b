#![allow(dead_code)]

use tclparse::{Node, Root, build, to_json};

/// Build a script and assert it parsed without errors.
pub fn build_clean(source: &str) -> Root {
    let root = build(source, "test.tcl");
    assert!(
        !root.had_error,
        "unexpected errors in {source:?}: {:?}",
        root.errors
    );
    root
}

/// Structural invariants that hold for every tree the builder returns.
pub fn assert_well_formed(root: &Root) {
    assert_eq!(
        root.had_error,
        !root.errors.is_empty(),
        "had_error must mirror the error list"
    );

    let rendered = to_json(root);
    serde_json::from_str::<serde_json::Value>(&rendered).unwrap_or_else(|e| {
        panic!("emitted JSON failed to parse: {e}\n--- output ---\n{rendered}")
    });

    for comment in &root.comments {
        assert!(comment.range.start <= comment.range.end);
    }
    assert_sibling_order(&root.children);
}

/// Ranges are internally ordered and never regress across siblings.
fn assert_sibling_order(nodes: &[Node]) {
    let mut previous = None;
    for node in nodes {
        let range = node.range();
        assert!(
            range.start <= range.end,
            "range regressed within node: {node:?}"
        );
        if let Some(last) = previous {
            assert!(
                last <= range.start,
                "sibling ranges regressed before {node:?}"
            );
        }
        previous = Some(range.start);
        for children in child_lists(node) {
            assert_sibling_order(children);
        }
    }
}

/// Every nested child list of a node, in order.
pub fn child_lists(node: &Node) -> Vec<&[Node]> {
    match node {
        Node::Proc { children, .. }
        | Node::Namespace { children, .. }
        | Node::For { children, .. }
        | Node::While { children, .. }
        | Node::Foreach { children, .. }
        | Node::Catch { children, .. } => vec![children.as_slice()],
        Node::If { branches, .. } => branches.iter().map(|b| b.children.as_slice()).collect(),
        Node::Switch { arms, .. } => arms.iter().map(|a| a.children.as_slice()).collect(),
        _ => Vec::new(),
    }
}

/// Visit every node of the tree, depth first.
pub fn walk<'a>(nodes: &'a [Node], visit: &mut impl FnMut(&'a Node)) {
    for node in nodes {
        visit(node);
        for children in child_lists(node) {
            walk(children, visit);
        }
    }
}
