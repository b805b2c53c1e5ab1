#![allow(dead_code)]

use tclscan_rs::{AstNode, Root, parse};

/// Parse and assert the tree came back clean.
pub fn parse_ok(source: &str) -> Root {
    let root = parse(source, "test.tcl");
    assert!(
        !root.had_error,
        "unexpected parse errors:\n--- source ---\n{source}\n--- errors ---\n{:?}",
        root.errors
    );
    root
}

/// Parse and return the single top-level node.
pub fn parse_one(source: &str) -> AstNode {
    let root = parse(source, "test.tcl");
    assert_eq!(
        root.children.len(),
        1,
        "expected exactly one top-level node:\n{source}"
    );
    root.children.into_iter().next().expect("child")
}

/// Serialize to a JSON value for structural assertions.
pub fn json_of(source: &str) -> serde_json::Value {
    let root = parse(source, "test.tcl");
    let text = tclscan_rs::to_json(&root).expect("serialize failed");
    serde_json::from_str(&text).expect("serializer emitted invalid JSON")
}
