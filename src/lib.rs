//! Structural TCL parser with a JSON exchange format.
//!
//! TCL has no fixed grammar: statement structure is decided by
//! brace/quote/bracket balance and word counting, not by context-free
//! rules. This crate splits source text into syntactically complete
//! command spans, tokenizes each span into delimiter-classified words
//! without evaluating any substitution, and builds a typed,
//! position-annotated AST guaranteed to terminate on arbitrary input.
//! The tree serializes to JSON for consumption by editor tooling.
//!
//! # Quick start
//!
//! ```
//! use tclscan_rs::{parse, to_json, AstNode};
//!
//! let source = "proc greet {name} {\n    puts $name\n}\n";
//! let root = parse(source, "greet.tcl");
//! assert!(!root.had_error);
//! assert!(matches!(root.children[0], AstNode::Proc(_)));
//!
//! let json = to_json(&root).unwrap();
//! assert!(json.contains("\"type\":\"proc\""));
//! ```
//!
//! Malformed input is data, not a programming error: a bad command
//! becomes an `Error` node among intact siblings, and a file with
//! unbalanced top-level braces yields a `Root` with a single
//! `incomplete` error instead of guessed command boundaries.

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod extractor;
pub mod parser;
pub mod position;
pub mod serializer;
pub mod token;
pub mod tokenizer;

pub use ast::{
    Array, AstNode, Comment, ElseifBranch, ErrorNode, Expr, For, Foreach, GenericCommand, Global,
    If, Lappend, List, NamespaceEval, NamespaceExport, NamespaceImport, PackageProvide,
    PackageRequire, Param, Proc, Puts, Root, Set, Source, Switch, SwitchCase, Upvar, Value,
    Variable, While,
};
pub use extractor::{Command, extract_commands, is_complete};
pub use parser::{MAX_DEPTH, parse};
pub use position::{LineMap, Position, Range};
pub use serializer::{SerializeError, to_json, to_json_pretty};
pub use token::{Token, TokenKind};
pub use tokenizer::{count_tokens, get_token, tokenize};

/// Parse source text and serialize the tree to compact JSON in one
/// step.
pub fn parse_to_json(source: &str, filepath: &str) -> Result<String, SerializeError> {
    to_json(&parse(source, filepath))
}
