//! Tokenizer and command-extractor behavior through the public API.

use tclscan_rs::{
    Token, TokenKind, count_tokens, extract_commands, get_token, is_complete, tokenize,
};

// -----------------------------------------------------------
// Word splitting.
// -----------------------------------------------------------

#[test]
fn word_count_is_structural() {
    assert_eq!(count_tokens("set x 1"), 3);
    assert_eq!(count_tokens("proc f {a b} {puts hi}"), 4);
    assert_eq!(count_tokens(""), 0);
    assert_eq!(count_tokens("   \t  "), 0);
}

#[test]
fn word_count_never_evaluates() {
    // Undefined variables, invalid arithmetic, and commands that would
    // error at runtime must still count cleanly.
    assert_eq!(count_tokens("puts $undefined_var"), 2);
    assert_eq!(count_tokens("expr {1 / 0}"), 2);
    assert_eq!(count_tokens("exec rm -rf /"), 4);
}

#[test]
fn delimiters_group_atomically() {
    let tokens = tokenize("cmd {a {b c}} \"d e\" [f g]");
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].kind, TokenKind::Braced);
    assert_eq!(tokens[2].kind, TokenKind::Quoted);
    assert_eq!(tokens[3].kind, TokenKind::Bracketed);
}

#[test]
fn get_token_matches_tokenize() {
    let text = "switch -glob $x { a {puts 1} }";
    let all = tokenize(text);
    for (i, tok) in all.iter().enumerate() {
        assert_eq!(get_token(text, i).as_ref(), Some(tok));
    }
    assert_eq!(get_token(text, all.len()), None);
}

#[test]
fn out_of_range_index_is_not_a_crash() {
    assert!(get_token("set x", usize::MAX).is_none());
}

#[test]
fn classification_is_lexical() {
    let tok = Token::new("{not executed [rm -rf /]}", 0);
    assert_eq!(tok.kind, TokenKind::Braced);
    assert_eq!(tok.strip_outer(), "not executed [rm -rf /]");
}

// -----------------------------------------------------------
// Command extraction.
// -----------------------------------------------------------

#[test]
fn extracts_one_command_per_statement() {
    let src = "package require Tcl 8.6\nset x 1\nputs $x\n";
    let cmds = extract_commands(src, 1);
    assert_eq!(cmds.len(), 3);
    assert_eq!(cmds[0].start_line, 1);
    assert_eq!(cmds[2].start_line, 3);
}

#[test]
fn multiline_body_is_one_command() {
    let src = "proc f {} {\n    set a 1\n    set b 2\n}\n";
    let cmds = extract_commands(src, 1);
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].start_line, 1);
    assert_eq!(cmds[0].end_line, 4);
}

#[test]
fn comment_lines_never_join_commands() {
    let src = "set a 1\n# set b 2\nset c 3\n";
    let cmds = extract_commands(src, 1);
    assert_eq!(cmds.len(), 2);
    assert!(!cmds.iter().any(|c| c.text.contains("set b")));
}

#[test]
fn completeness_is_a_balance_check() {
    assert!(is_complete("proc f {} { puts hi }"));
    assert!(!is_complete("proc f {} { puts hi"));
    assert!(!is_complete("set s \"open"));
    assert!(!is_complete("set v [llength $l"));
    assert!(is_complete(""));
}

#[test]
fn brace_in_comment_does_not_break_extraction() {
    let src = "proc f {} {\n    # closing } in comment\n    puts hi\n}\nset x 1\n";
    let cmds = extract_commands(src, 1);
    assert_eq!(cmds.len(), 2);
    assert_eq!(cmds[1].text, "set x 1");
}

#[test]
fn megabyte_single_line_terminates() {
    let mut src = String::from("list");
    for i in 0..20_000 {
        src.push_str(&format!(" item{i}"));
    }
    assert_eq!(count_tokens(&src), 20_001);
    let cmds = extract_commands(&src, 1);
    assert_eq!(cmds.len(), 1);
}
