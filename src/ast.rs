//! Typed AST for TCL source.
//!
//! Field types double as the serialization schema: `Vec` fields always
//! emit JSON arrays (empty as `[]`, never omitted), `bool` fields emit
//! booleans, `usize` fields emit numbers, and everything else is a
//! string no matter how numeric its text looks. A package version of
//! `"8.6"` therefore round-trips byte-for-byte and can never decay into
//! a float.

use serde::Serialize;

use crate::position::Range;

/// Root of a parsed file.
///
/// `errors` is a flattened view over every `Error` node in the tree;
/// `had_error` is true exactly when that view is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Root {
    pub filepath: String,
    pub comments: Vec<Comment>,
    pub children: Vec<AstNode>,
    pub had_error: bool,
    pub errors: Vec<AstNode>,
}

/// One statement node. The `type` tag in the exchange format is the
/// snake_case variant name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AstNode {
    Comment(Comment),
    Error(ErrorNode),
    Proc(Proc),
    Set(Set),
    Variable(Variable),
    Global(Global),
    Upvar(Upvar),
    Array(Array),
    If(If),
    While(While),
    For(For),
    Foreach(Foreach),
    Switch(Switch),
    NamespaceEval(NamespaceEval),
    NamespaceImport(NamespaceImport),
    NamespaceExport(NamespaceExport),
    PackageRequire(PackageRequire),
    PackageProvide(PackageProvide),
    Source(Source),
    Expr(Expr),
    List(List),
    Lappend(Lappend),
    Puts(Puts),
    GenericCommand(GenericCommand),
}

/// `# ...` line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub text: String,
    pub range: Range,
    pub depth: usize,
}

/// Localized parse failure; siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNode {
    pub message: String,
    pub range: Range,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// `proc name {params} {body}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proc {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<AstNode>,
    pub range: Range,
    pub depth: usize,
}

/// One procedure parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub variadic: bool,
}

/// A resolved word value: either a delimiter-stripped literal or a
/// recursively parsed command substitution. The raw literal (with its
/// original delimiters) stays recoverable through the owning node's
/// range and the source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Value {
    Literal { text: String },
    Substitution { command: Box<AstNode> },
}

/// `set name ?value?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Set {
    pub var_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub range: Range,
    pub depth: usize,
}

/// `variable name ?value?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub var_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub range: Range,
    pub depth: usize,
}

/// `global name ?name ...?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Global {
    pub vars: Vec<String>,
    pub range: Range,
    pub depth: usize,
}

/// `upvar ?level? otherVar myVar ...`. `level` is kept verbatim;
/// `#0` must never be coerced to a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Upvar {
    pub level: String,
    pub vars: Vec<String>,
    pub range: Range,
    pub depth: usize,
}

/// `array operation name ?arg ...?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Array {
    pub operation: String,
    pub array_name: String,
    pub args: Vec<String>,
    pub range: Range,
    pub depth: usize,
}

/// `if cond body ?elseif cond body ...? ?else body?`. Conditions are
/// literal text; bodies are always parsed child sequences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct If {
    pub condition: String,
    pub then_body: Vec<AstNode>,
    pub elseif_branches: Vec<ElseifBranch>,
    pub else_body: Vec<AstNode>,
    pub range: Range,
    pub depth: usize,
}

/// One `elseif` arm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElseifBranch {
    pub condition: String,
    pub body: Vec<AstNode>,
}

/// `while cond body`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct While {
    pub condition: String,
    pub body: Vec<AstNode>,
    pub range: Range,
    pub depth: usize,
}

/// `for init cond next body`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct For {
    pub init: String,
    pub condition: String,
    pub next: String,
    pub body: Vec<AstNode>,
    pub range: Range,
    pub depth: usize,
}

/// `foreach varlist list body`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Foreach {
    pub vars: Vec<String>,
    pub list_expr: String,
    pub body: Vec<AstNode>,
    pub range: Range,
    pub depth: usize,
}

/// `switch ?mode? ?--? subject {pattern body ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Switch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<String>,
    pub subject: String,
    pub cases: Vec<SwitchCase>,
    pub range: Range,
    pub depth: usize,
}

/// One pattern/body pair of a `switch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    pub pattern: String,
    pub body: Vec<AstNode>,
}

/// `namespace eval name {body}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceEval {
    pub name: String,
    pub body: Vec<AstNode>,
    pub range: Range,
    pub depth: usize,
}

/// `namespace import ?pattern ...?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceImport {
    pub patterns: Vec<String>,
    pub range: Range,
    pub depth: usize,
}

/// `namespace export ?pattern ...?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceExport {
    pub patterns: Vec<String>,
    pub range: Range,
    pub depth: usize,
}

/// `package require name ?version?`. Version is a literal string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageRequire {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub range: Range,
    pub depth: usize,
}

/// `package provide name ?version?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageProvide {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub range: Range,
    pub depth: usize,
}

/// `source path`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub path: String,
    pub range: Range,
    pub depth: usize,
}

/// `expr arg ...` with the expression text kept literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub expression: String,
    pub range: Range,
    pub depth: usize,
}

/// `list ?element ...?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub elements: Vec<String>,
    pub range: Range,
    pub depth: usize,
}

/// `lappend name ?value ...?`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lappend {
    pub var_name: String,
    pub values: Vec<String>,
    pub range: Range,
    pub depth: usize,
}

/// `puts ?-nonewline? ?channel? string`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Puts {
    pub newline: bool,
    pub args: Vec<String>,
    pub range: Range,
    pub depth: usize,
}

/// Any command without a dedicated construct parser. Never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericCommand {
    pub name: String,
    pub text: String,
    pub range: Range,
    pub depth: usize,
}

impl AstNode {
    /// Source range of the node.
    #[must_use]
    pub const fn range(&self) -> Range {
        match self {
            Self::Comment(n) => n.range,
            Self::Error(n) => n.range,
            Self::Proc(n) => n.range,
            Self::Set(n) => n.range,
            Self::Variable(n) => n.range,
            Self::Global(n) => n.range,
            Self::Upvar(n) => n.range,
            Self::Array(n) => n.range,
            Self::If(n) => n.range,
            Self::While(n) => n.range,
            Self::For(n) => n.range,
            Self::Foreach(n) => n.range,
            Self::Switch(n) => n.range,
            Self::NamespaceEval(n) => n.range,
            Self::NamespaceImport(n) => n.range,
            Self::NamespaceExport(n) => n.range,
            Self::PackageRequire(n) => n.range,
            Self::PackageProvide(n) => n.range,
            Self::Source(n) => n.range,
            Self::Expr(n) => n.range,
            Self::List(n) => n.range,
            Self::Lappend(n) => n.range,
            Self::Puts(n) => n.range,
            Self::GenericCommand(n) => n.range,
        }
    }

    /// Nesting level, 0 at file top level.
    #[must_use]
    pub const fn depth(&self) -> usize {
        match self {
            Self::Comment(n) => n.depth,
            Self::Error(n) => n.depth,
            Self::Proc(n) => n.depth,
            Self::Set(n) => n.depth,
            Self::Variable(n) => n.depth,
            Self::Global(n) => n.depth,
            Self::Upvar(n) => n.depth,
            Self::Array(n) => n.depth,
            Self::If(n) => n.depth,
            Self::While(n) => n.depth,
            Self::For(n) => n.depth,
            Self::Foreach(n) => n.depth,
            Self::Switch(n) => n.depth,
            Self::NamespaceEval(n) => n.depth,
            Self::NamespaceImport(n) => n.depth,
            Self::NamespaceExport(n) => n.depth,
            Self::PackageRequire(n) => n.depth,
            Self::PackageProvide(n) => n.depth,
            Self::Source(n) => n.depth,
            Self::Expr(n) => n.depth,
            Self::List(n) => n.depth,
            Self::Lappend(n) => n.depth,
            Self::Puts(n) => n.depth,
            Self::GenericCommand(n) => n.depth,
        }
    }

    /// Collect clones of every `Error` node in this subtree.
    pub fn collect_errors(&self, out: &mut Vec<Self>) {
        match self {
            Self::Error(_) => out.push(self.clone()),
            Self::Proc(n) => collect_from(&n.body, out),
            Self::Set(n) => collect_from_value(n.value.as_ref(), out),
            Self::Variable(n) => collect_from_value(n.value.as_ref(), out),
            Self::If(n) => {
                collect_from(&n.then_body, out);
                for branch in &n.elseif_branches {
                    collect_from(&branch.body, out);
                }
                collect_from(&n.else_body, out);
            }
            Self::While(n) => collect_from(&n.body, out),
            Self::For(n) => collect_from(&n.body, out),
            Self::Foreach(n) => collect_from(&n.body, out),
            Self::Switch(n) => {
                for case in &n.cases {
                    collect_from(&case.body, out);
                }
            }
            Self::NamespaceEval(n) => collect_from(&n.body, out),
            Self::Comment(_)
            | Self::Global(_)
            | Self::Upvar(_)
            | Self::Array(_)
            | Self::NamespaceImport(_)
            | Self::NamespaceExport(_)
            | Self::PackageRequire(_)
            | Self::PackageProvide(_)
            | Self::Source(_)
            | Self::Expr(_)
            | Self::List(_)
            | Self::Lappend(_)
            | Self::Puts(_)
            | Self::GenericCommand(_) => {}
        }
    }
}

fn collect_from(body: &[AstNode], out: &mut Vec<AstNode>) {
    for child in body {
        child.collect_errors(out);
    }
}

fn collect_from_value(value: Option<&Value>, out: &mut Vec<AstNode>) {
    if let Some(Value::Substitution { command }) = value {
        command.collect_errors(out);
    }
}
