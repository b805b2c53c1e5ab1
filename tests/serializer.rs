//! Wire-contract tests: the typed schema decides what is an array, a
//! boolean, or a number; everything else is a string.

mod common;

use common::json_of;
use serde_json::Value;
use tclscan_rs::{parse, parse_to_json, to_json, to_json_pretty};

#[test]
fn version_round_trips_byte_for_byte() {
    let v = json_of("package require Tcl 8.6\n");
    assert_eq!(v["children"][0]["version"], Value::String("8.6".into()));
    // Serialized text must contain the quoted string, not a float.
    let root = parse("package require Tcl 8.6\n", "t.tcl");
    let text = to_json(&root).expect("serialize");
    assert!(text.contains("\"version\":\"8.6\""));
    assert!(!text.contains("\"version\":8.6"));
}

#[test]
fn numeric_looking_strings_stay_strings() {
    let v = json_of("set x 42\nset y 3.14\nset z 0xff\n");
    for child in v["children"].as_array().expect("children") {
        assert!(child["value"]["text"].is_string());
    }
}

#[test]
fn array_fields_are_always_arrays() {
    let v = json_of("proc f {} {}\nglobal a b\nlist\nnamespace export\n");
    assert!(v["children"][0]["params"].is_array());
    assert!(v["children"][0]["body"].is_array());
    assert!(v["children"][1]["vars"].is_array());
    assert!(v["children"][2]["elements"].is_array());
    assert!(v["children"][3]["patterns"].is_array());
    assert!(v["comments"].is_array());
    assert!(v["children"].is_array());
    assert!(v["errors"].is_array());
}

#[test]
fn empty_collections_are_brackets_not_strings() {
    let v = json_of("proc foo {} {}\n");
    assert_eq!(v["children"][0]["params"], serde_json::json!([]));
    assert_eq!(v["children"][0]["body"], serde_json::json!([]));
}

#[test]
fn boolean_fields() {
    let v = json_of("proc f {args} {}\nputs -nonewline x\n");
    assert_eq!(v["had_error"], Value::Bool(false));
    assert_eq!(v["children"][0]["params"][0]["variadic"], Value::Bool(true));
    assert_eq!(v["children"][1]["newline"], Value::Bool(false));
}

#[test]
fn numeric_fields() {
    let v = json_of("set x 1\n");
    let node = &v["children"][0];
    assert!(node["depth"].is_u64());
    for key in ["start", "end"] {
        assert!(node["range"][key]["line"].is_u64());
        assert!(node["range"][key]["column"].is_u64());
    }
}

#[test]
fn escaping_covers_control_characters() {
    let root = parse("set x {a\\\\b \"q\"\t}\n", "t.tcl");
    let text = to_json(&root).expect("serialize");
    // Output must be valid JSON despite quotes, backslashes, and tabs
    // in the value text.
    let reparsed: Value = serde_json::from_str(&text).expect("valid json");
    assert!(reparsed["children"][0]["value"]["text"].is_string());
}

#[test]
fn substitution_values_are_nested_nodes() {
    let v = json_of("set n [llength $items]\n");
    let value = &v["children"][0]["value"];
    assert_eq!(value["kind"], "substitution");
    assert_eq!(value["command"]["type"], "generic_command");
    assert_eq!(value["command"]["depth"], 1);
}

#[test]
fn comments_serialize_with_ranges() {
    let v = json_of("# top note\nset x 1\n");
    assert_eq!(v["comments"][0]["text"], "# top note");
    assert_eq!(v["comments"][0]["range"]["start"]["line"], 1);
}

#[test]
fn pretty_and_compact_agree() {
    let root = parse("proc f {a} {\n    puts $a\n}\n", "t.tcl");
    let compact: Value =
        serde_json::from_str(&to_json(&root).expect("compact")).expect("compact json");
    let pretty: Value =
        serde_json::from_str(&to_json_pretty(&root).expect("pretty")).expect("pretty json");
    assert_eq!(compact, pretty);
}

#[test]
fn one_step_helper_matches_two_steps() {
    let src = "set x 1\n";
    let one = parse_to_json(src, "t.tcl").expect("one step");
    let two = to_json(&parse(src, "t.tcl")).expect("two steps");
    assert_eq!(one, two);
}

#[test]
fn serialization_is_deterministic() {
    let src = "namespace eval a {\n    proc f {} { set x [list 1 2] }\n}\n";
    let first = parse_to_json(src, "a.tcl").expect("first");
    let second = parse_to_json(src, "a.tcl").expect("second");
    assert_eq!(first, second);
}
