//! Construct parsers, command dispatch, and tree building.
//!
//! Each command parse is independent: the only state threaded through
//! recursion is the nesting depth and the starting line, so one
//! malformed command can never corrupt its siblings. Recognized command
//! names map to dedicated construct parsers through an exhaustive
//! match; everything else becomes a `GenericCommand` node, never a
//! failure.

use crate::ast::{
    Array, AstNode, Comment, ElseifBranch, ErrorNode, Expr, For, Foreach, GenericCommand, Global,
    If, Lappend, List, NamespaceEval, NamespaceExport, NamespaceImport, PackageProvide,
    PackageRequire, Param, Proc, Puts, Root, Set, Source, Switch, SwitchCase, Upvar, Value,
    Variable, While,
};
use crate::extractor::{self, Command};
use crate::position::{LineMap, Range};
use crate::token::{Token, TokenKind};
use crate::tokenizer;

/// Hard ceiling on body nesting. Bodies past this depth produce a
/// localized error node instead of recursing further, keeping the
/// parse bounded on adversarial input.
pub const MAX_DEPTH: usize = 64;

/// Immutable per-parse settings threaded through the recursion instead
/// of living in process-wide state, so concurrent parses never
/// interfere.
#[derive(Debug, Clone, Copy)]
struct ParseContext {
    max_depth: usize,
}

/// Parse TCL source text into a [`Root`] tree.
///
/// `filepath` is carried for reporting only; the text is never read
/// from disk here. This function always returns a tree: malformed
/// input surfaces as `Error` nodes (or, for a top-level imbalance, a
/// single synthetic incomplete error), never as a panic.
#[must_use]
pub fn parse(source: &str, filepath: &str) -> Root {
    let line_map = LineMap::new(source);

    // An unbalanced file has no trustworthy command boundaries, so the
    // whole parse short-circuits rather than guessing.
    if !extractor::is_complete(source) {
        let end = line_map.offset_to_line_col(source.len());
        let error = AstNode::Error(ErrorNode {
            message: "source is not a syntactically complete script".to_string(),
            range: Range::new(1, 1, end.line, end.column.max(1)),
            depth: 0,
            error_type: Some("incomplete".to_string()),
            suggestion: Some("check for a missing closing brace or quote".to_string()),
        });
        return Root {
            filepath: filepath.to_string(),
            comments: Vec::new(),
            children: Vec::new(),
            had_error: true,
            errors: vec![error],
        };
    }

    let ctx = ParseContext {
        max_depth: MAX_DEPTH,
    };
    let comments = collect_comments(source, &line_map);
    let children: Vec<AstNode> = extractor::extract_commands(source, 1)
        .iter()
        .map(|cmd| dispatch(ctx, cmd, 0))
        .collect();

    let mut errors = Vec::new();
    for child in &children {
        child.collect_errors(&mut errors);
    }

    Root {
        filepath: filepath.to_string(),
        comments,
        children,
        had_error: !errors.is_empty(),
        errors,
    }
}

/// One comment entry per `#`-led line, indent-insensitive.
fn collect_comments(source: &str, line_map: &LineMap) -> Vec<Comment> {
    let mut comments = Vec::new();
    let mut offset = 0;

    for line in source.split('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            let indent = line.len() - trimmed.len();
            let text = trimmed.trim_end().to_string();
            let start = line_map.offset_to_line_col(offset + indent);
            let end = line_map.offset_to_line_col(offset + line.trim_end().len() - 1);
            comments.push(Comment {
                text,
                range: Range { start, end },
                depth: 0,
            });
        }
        offset += line.len() + 1;
    }

    comments
}

// -----------------------------------------------------------
// Dispatch.
// -----------------------------------------------------------

fn dispatch(ctx: ParseContext, cmd: &Command, depth: usize) -> AstNode {
    // A trailing unterminated command from the extractor gets a
    // localized error; its siblings stay intact.
    if !extractor::is_complete(&cmd.text) {
        return AstNode::Error(ErrorNode {
            message: "unterminated command".to_string(),
            range: command_range(cmd),
            depth,
            error_type: Some("incomplete".to_string()),
            suggestion: Some("check for a missing closing brace or quote".to_string()),
        });
    }

    let tokens = tokenizer::tokenize(&cmd.text);
    let Some(name) = tokens.first().map(|t| t.text.clone()) else {
        return generic(cmd, depth, "");
    };

    match name.as_str() {
        "proc" => parse_proc(ctx, cmd, &tokens, depth),
        "set" => parse_set(ctx, cmd, &tokens, depth),
        "variable" => parse_variable(ctx, cmd, &tokens, depth),
        "global" => parse_global(cmd, &tokens, depth),
        "upvar" => parse_upvar(cmd, &tokens, depth),
        "array" => parse_array(cmd, &tokens, depth),
        "if" => parse_if(ctx, cmd, &tokens, depth),
        "while" => parse_while(ctx, cmd, &tokens, depth),
        "for" => parse_for(ctx, cmd, &tokens, depth),
        "foreach" => parse_foreach(ctx, cmd, &tokens, depth),
        "switch" => parse_switch(ctx, cmd, &tokens, depth),
        "namespace" => parse_namespace(ctx, cmd, &tokens, depth),
        "package" => parse_package(cmd, &tokens, depth),
        "source" => parse_source(cmd, &tokens, depth),
        "expr" => parse_expr(cmd, &tokens, depth),
        "list" => parse_list(cmd, &tokens, depth),
        "lappend" => parse_lappend(cmd, &tokens, depth),
        "puts" => parse_puts(cmd, &tokens, depth),
        _ => generic(cmd, depth, &name),
    }
}

// -----------------------------------------------------------
// Shared helpers.
// -----------------------------------------------------------

/// Range of a command span: first non-whitespace column of the first
/// line through the last column of the last line.
fn command_range(cmd: &Command) -> Range {
    let first = cmd.text.lines().next().unwrap_or("");
    let last = cmd.text.lines().last().unwrap_or("");
    let indent = first.len() - first.trim_start().len();
    Range::new(cmd.start_line, indent + 1, cmd.end_line, last.len().max(1))
}

/// File line on which the byte at `offset` of the command text sits.
fn line_at(cmd: &Command, offset: usize) -> usize {
    let newlines = cmd.text.as_bytes()[..offset.min(cmd.text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    cmd.start_line + newlines
}

fn generic(cmd: &Command, depth: usize, name: &str) -> AstNode {
    AstNode::GenericCommand(GenericCommand {
        name: name.to_string(),
        text: cmd.text.trim().to_string(),
        range: command_range(cmd),
        depth,
    })
}

fn invalid(cmd: &Command, depth: usize, message: &str) -> AstNode {
    AstNode::Error(ErrorNode {
        message: message.to_string(),
        range: command_range(cmd),
        depth,
        error_type: Some("invalid_construct".to_string()),
        suggestion: None,
    })
}

fn depth_exceeded(start_line: usize, depth: usize) -> AstNode {
    AstNode::Error(ErrorNode {
        message: format!("maximum nesting depth ({MAX_DEPTH}) exceeded"),
        range: Range::new(start_line, 1, start_line, 1),
        depth,
        error_type: Some("depth_limit".to_string()),
        suggestion: None,
    })
}

/// Parse a braced body token into its child nodes. The body is
/// anchored at the file line its opening delimiter sits on, so nested
/// nodes keep file-accurate positions.
fn parse_nested_body(ctx: ParseContext, cmd: &Command, tok: &Token, depth: usize) -> Vec<AstNode> {
    let anchor = line_at(cmd, tok.offset);
    parse_body_text(ctx, tok.strip_outer(), anchor, depth + 1)
}

fn parse_body_text(
    ctx: ParseContext,
    text: &str,
    start_line: usize,
    depth: usize,
) -> Vec<AstNode> {
    if depth > ctx.max_depth {
        return vec![depth_exceeded(start_line, depth)];
    }
    extractor::extract_commands(text, start_line)
        .iter()
        .map(|c| dispatch(ctx, c, depth))
        .collect()
}

/// Resolve a word into a [`Value`]: bracketed words become recursively
/// parsed substitutions, everything else a delimiter-stripped literal.
fn parse_value(ctx: ParseContext, cmd: &Command, tok: &Token, depth: usize) -> Value {
    tok.inner_command().map_or_else(
        || Value::Literal {
            text: tok.strip_outer().to_string(),
        },
        |inner| {
            let line = line_at(cmd, tok.offset);
            if depth + 1 > ctx.max_depth {
                return Value::Substitution {
                    command: Box::new(depth_exceeded(line, depth + 1)),
                };
            }
            let inner_cmd = Command {
                text: inner.to_string(),
                start_line: line,
                end_line: line + inner.bytes().filter(|&b| b == b'\n').count(),
            };
            Value::Substitution {
                command: Box::new(dispatch(ctx, &inner_cmd, depth + 1)),
            }
        },
    )
}

/// Delimiter-normalize a word: quotes and braces are stripped,
/// brackets are preserved as substitution markers.
fn normalize(tok: &Token) -> String {
    tok.strip_outer().to_string()
}

// -----------------------------------------------------------
// Construct parsers.
// -----------------------------------------------------------

fn parse_proc(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 4 {
        return invalid(cmd, depth, "proc requires a name, parameter list, and body");
    }

    let name = tokens[1].strip_outer().to_string();
    let params = parse_params(&tokens[2]);
    let body = parse_nested_body(ctx, cmd, &tokens[3], depth);

    AstNode::Proc(Proc {
        name,
        params,
        body,
        range: command_range(cmd),
        depth,
    })
}

fn parse_params(tok: &Token) -> Vec<Param> {
    tokenizer::tokenize(tok.strip_outer())
        .iter()
        .map(|param| {
            if param.kind == TokenKind::Braced {
                let parts = tokenizer::tokenize(param.strip_outer());
                let name = parts
                    .first()
                    .map_or_else(String::new, |t| t.strip_outer().to_string());
                let default = parts.get(1).map(|t| t.strip_outer().to_string());
                Param {
                    variadic: name == "args",
                    name,
                    default,
                }
            } else {
                let name = param.strip_outer().to_string();
                Param {
                    variadic: name == "args",
                    name,
                    default: None,
                }
            }
        })
        .collect()
}

fn parse_set(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 2 {
        return invalid(cmd, depth, "set requires a variable name");
    }
    AstNode::Set(Set {
        var_name: tokens[1].strip_outer().to_string(),
        value: tokens.get(2).map(|t| parse_value(ctx, cmd, t, depth)),
        range: command_range(cmd),
        depth,
    })
}

fn parse_variable(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 2 {
        return invalid(cmd, depth, "variable requires a variable name");
    }
    AstNode::Variable(Variable {
        var_name: tokens[1].strip_outer().to_string(),
        value: tokens.get(2).map(|t| parse_value(ctx, cmd, t, depth)),
        range: command_range(cmd),
        depth,
    })
}

fn parse_global(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 2 {
        return invalid(cmd, depth, "global requires at least one variable name");
    }
    AstNode::Global(Global {
        vars: tokens[1..].iter().map(normalize).collect(),
        range: command_range(cmd),
        depth,
    })
}

/// `level` is recognized structurally (`#0` or digits) and preserved
/// verbatim; it defaults to `"1"` when absent, matching TCL semantics.
fn parse_upvar(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 3 {
        return invalid(cmd, depth, "upvar requires a source and target variable");
    }

    let looks_like_level = tokens[1].kind == TokenKind::Bare
        && (tokens[1].text.starts_with('#') || tokens[1].text.bytes().all(|b| b.is_ascii_digit()));

    let (level, rest) = if looks_like_level {
        (tokens[1].text.clone(), &tokens[2..])
    } else {
        ("1".to_string(), &tokens[1..])
    };

    AstNode::Upvar(Upvar {
        level,
        vars: rest.iter().map(normalize).collect(),
        range: command_range(cmd),
        depth,
    })
}

fn parse_array(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 3 {
        return invalid(cmd, depth, "array requires an operation and an array name");
    }
    AstNode::Array(Array {
        operation: tokens[1].strip_outer().to_string(),
        array_name: tokens[2].strip_outer().to_string(),
        args: tokens[3..].iter().map(normalize).collect(),
        range: command_range(cmd),
        depth,
    })
}

fn parse_if(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 3 {
        return invalid(cmd, depth, "if requires a condition and a body");
    }

    let condition = tokens[1].strip_outer().to_string();
    let mut idx = 2;
    if tokens.get(idx).is_some_and(|t| t.text == "then") {
        idx += 1;
    }
    let Some(then_tok) = tokens.get(idx) else {
        return invalid(cmd, depth, "if requires a body after its condition");
    };
    let then_body = parse_nested_body(ctx, cmd, then_tok, depth);
    idx += 1;

    let mut elseif_branches = Vec::new();
    let mut else_body = Vec::new();

    while let Some(tok) = tokens.get(idx) {
        match tok.text.as_str() {
            "elseif" => {
                let Some(cond_tok) = tokens.get(idx + 1) else {
                    return invalid(cmd, depth, "elseif requires a condition and a body");
                };
                let mut body_idx = idx + 2;
                if tokens.get(body_idx).is_some_and(|t| t.text == "then") {
                    body_idx += 1;
                }
                let Some(body_tok) = tokens.get(body_idx) else {
                    return invalid(cmd, depth, "elseif requires a condition and a body");
                };
                elseif_branches.push(ElseifBranch {
                    condition: cond_tok.strip_outer().to_string(),
                    body: parse_nested_body(ctx, cmd, body_tok, depth),
                });
                idx = body_idx + 1;
            }
            "else" => {
                let Some(body_tok) = tokens.get(idx + 1) else {
                    return invalid(cmd, depth, "else requires a body");
                };
                else_body = parse_nested_body(ctx, cmd, body_tok, depth);
                break;
            }
            // Anything else ends the chain.
            _ => break,
        }
    }

    AstNode::If(If {
        condition,
        then_body,
        elseif_branches,
        else_body,
        range: command_range(cmd),
        depth,
    })
}

fn parse_while(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 3 {
        return invalid(cmd, depth, "while requires a condition and a body");
    }
    AstNode::While(While {
        condition: tokens[1].strip_outer().to_string(),
        body: parse_nested_body(ctx, cmd, &tokens[2], depth),
        range: command_range(cmd),
        depth,
    })
}

fn parse_for(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 5 {
        return invalid(cmd, depth, "for requires init, condition, next, and a body");
    }
    AstNode::For(For {
        init: tokens[1].strip_outer().to_string(),
        condition: tokens[2].strip_outer().to_string(),
        next: tokens[3].strip_outer().to_string(),
        body: parse_nested_body(ctx, cmd, &tokens[4], depth),
        range: command_range(cmd),
        depth,
    })
}

fn parse_foreach(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 4 {
        return invalid(cmd, depth, "foreach requires variables, a list, and a body");
    }
    let vars = tokenizer::tokenize(tokens[1].strip_outer())
        .iter()
        .map(normalize)
        .collect();
    AstNode::Foreach(Foreach {
        vars,
        list_expr: tokens[2].strip_outer().to_string(),
        body: parse_nested_body(ctx, cmd, &tokens[3], depth),
        range: command_range(cmd),
        depth,
    })
}

fn parse_switch(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    let mut idx = 1;
    let mut match_mode = None;

    // Optional match-mode flag, optionally closed by `--`.
    while let Some(tok) = tokens.get(idx) {
        if tok.kind == TokenKind::Bare && tok.text.starts_with('-') {
            if tok.text == "--" {
                idx += 1;
                break;
            }
            match_mode = Some(tok.text.clone());
            idx += 1;
        } else {
            break;
        }
    }

    let Some(subject_tok) = tokens.get(idx) else {
        return invalid(cmd, depth, "switch requires a subject and case block");
    };
    let subject = subject_tok.strip_outer().to_string();
    idx += 1;

    if tokens.len() <= idx {
        return invalid(cmd, depth, "switch requires a case block");
    }

    let cases = if tokens.len() == idx + 1 && tokens[idx].kind == TokenKind::Braced {
        // Braced form: pattern/body pairs inside one block. Offsets of
        // the inner tokens are relative to the block's interior.
        let block = &tokens[idx];
        let base = block.offset + 1;
        let pairs = tokenizer::tokenize(block.strip_outer());
        parse_cases(ctx, cmd, &pairs, base, depth)
    } else {
        // Inline form: pairs follow directly.
        parse_cases(ctx, cmd, &tokens[idx..], 0, depth)
    };

    AstNode::Switch(Switch {
        match_mode,
        subject,
        cases,
        range: command_range(cmd),
        depth,
    })
}

fn parse_cases(
    ctx: ParseContext,
    cmd: &Command,
    pairs: &[Token],
    base_offset: usize,
    depth: usize,
) -> Vec<SwitchCase> {
    let mut cases = Vec::new();
    let mut i = 0;
    while i < pairs.len() {
        let pattern = pairs[i].strip_outer().to_string();
        let body = pairs.get(i + 1).map_or_else(Vec::new, |body_tok| {
            let anchor = line_at(cmd, base_offset + body_tok.offset);
            parse_body_text(ctx, body_tok.strip_outer(), anchor, depth + 1)
        });
        cases.push(SwitchCase { pattern, body });
        i += 2;
    }
    cases
}

fn parse_namespace(ctx: ParseContext, cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    let Some(sub) = tokens.get(1) else {
        return invalid(cmd, depth, "namespace requires a subcommand");
    };

    match sub.text.as_str() {
        "eval" => {
            if tokens.len() < 4 {
                return invalid(cmd, depth, "namespace eval requires a name and a body");
            }
            AstNode::NamespaceEval(NamespaceEval {
                name: tokens[2].strip_outer().to_string(),
                body: parse_nested_body(ctx, cmd, &tokens[3], depth),
                range: command_range(cmd),
                depth,
            })
        }
        "import" => AstNode::NamespaceImport(NamespaceImport {
            patterns: tokens[2..].iter().map(normalize).collect(),
            range: command_range(cmd),
            depth,
        }),
        "export" => AstNode::NamespaceExport(NamespaceExport {
            patterns: tokens[2..].iter().map(normalize).collect(),
            range: command_range(cmd),
            depth,
        }),
        _ => generic(cmd, depth, "namespace"),
    }
}

fn parse_package(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    let Some(sub) = tokens.get(1) else {
        return invalid(cmd, depth, "package requires a subcommand");
    };

    match sub.text.as_str() {
        "require" | "provide" => {
            let Some(name_tok) = tokens.get(2) else {
                return invalid(cmd, depth, "package requires a package name");
            };
            let name = name_tok.strip_outer().to_string();
            // Version stays a literal string; "8.6" must never become
            // a float.
            let version = tokens.get(3).map(|t| t.strip_outer().to_string());
            let range = command_range(cmd);
            if sub.text == "require" {
                AstNode::PackageRequire(PackageRequire {
                    name,
                    version,
                    range,
                    depth,
                })
            } else {
                AstNode::PackageProvide(PackageProvide {
                    name,
                    version,
                    range,
                    depth,
                })
            }
        }
        _ => generic(cmd, depth, "package"),
    }
}

fn parse_source(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 2 {
        return invalid(cmd, depth, "source requires a file path");
    }
    AstNode::Source(Source {
        path: tokens[1].strip_outer().to_string(),
        range: command_range(cmd),
        depth,
    })
}

fn parse_expr(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 2 {
        return invalid(cmd, depth, "expr requires an expression");
    }
    // A single delimited argument reads better stripped; a multi-word
    // expression is kept as the literal source slice.
    let expression = if tokens.len() == 2 {
        tokens[1].strip_outer().to_string()
    } else {
        cmd.text[tokens[1].offset..].trim().to_string()
    };
    AstNode::Expr(Expr {
        expression,
        range: command_range(cmd),
        depth,
    })
}

fn parse_list(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    AstNode::List(List {
        elements: tokens[1..].iter().map(normalize).collect(),
        range: command_range(cmd),
        depth,
    })
}

fn parse_lappend(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 2 {
        return invalid(cmd, depth, "lappend requires a variable name");
    }
    AstNode::Lappend(Lappend {
        var_name: tokens[1].strip_outer().to_string(),
        values: tokens[2..].iter().map(normalize).collect(),
        range: command_range(cmd),
        depth,
    })
}

fn parse_puts(cmd: &Command, tokens: &[Token], depth: usize) -> AstNode {
    if tokens.len() < 2 {
        return invalid(cmd, depth, "puts requires an argument");
    }
    let mut rest = &tokens[1..];
    let mut newline = true;
    if rest[0].text == "-nonewline" {
        newline = false;
        rest = &rest[1..];
    }
    AstNode::Puts(Puts {
        newline,
        args: rest.iter().map(normalize).collect(),
        range: command_range(cmd),
        depth,
    })
}
