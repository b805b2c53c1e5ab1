//! Command-boundary extraction.
//!
//! Splits a block of source text into syntactically complete command
//! spans using brace-depth tracking plus a structural completeness
//! check. Nothing here evaluates the text: boundaries are decided by
//! delimiter balance alone, so undefined variables and commands that
//! would fail at runtime still split correctly.

/// One syntactically complete unit of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Structural completeness check: true when every brace, bracket, and
/// quote in `text` is balanced and no line continuation is pending.
///
/// Braces dominate: inside a braced group quotes and brackets are
/// literal. Inside quotes, brackets still open substitutions and must
/// balance.
#[must_use]
pub fn is_complete(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut brace = 0i64;
    let mut bracket = 0i64;
    let mut in_quote = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        if brace > 0 {
            match b {
                b'{' => brace += 1,
                b'}' => brace -= 1,
                _ => {}
            }
        } else if in_quote {
            match b {
                b'"' => in_quote = false,
                b'[' => bracket += 1,
                b']' => bracket -= 1,
                _ => {}
            }
        } else {
            match b {
                b'{' => brace += 1,
                b'}' => brace -= 1,
                b'[' => bracket += 1,
                b']' => bracket -= 1,
                b'"' => in_quote = true,
                _ => {}
            }
        }
        i += 1;
    }

    brace == 0 && bracket == 0 && !in_quote && !ends_with_continuation(text)
}

/// Whether the text ends in an unescaped backslash, continuing the
/// command onto a following line.
fn ends_with_continuation(text: &str) -> bool {
    let trimmed = text.trim_end();
    let trailing = trimmed.bytes().rev().take_while(|&b| b == b'\\').count();
    trailing % 2 == 1
}

/// Whether a line is a comment start: optional leading whitespace then
/// `#`.
#[must_use]
pub fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Split source text into top-level command spans.
///
/// Lines are numbered from `start_line` so body text extracted from a
/// nested construct keeps file-accurate positions. Comment and blank
/// lines between commands are skipped; a comment line ending in a
/// backslash swallows its continuation line(s) too. A command left
/// unterminated at end of input is still emitted so downstream error
/// reporting can localize it.
#[must_use]
pub fn extract_commands(text: &str, start_line: usize) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut cmd_start = 0usize;
    let mut last_line = 0usize;
    let mut depth = 0i64;
    let mut comment_continues = false;

    for (i, line) in text.lines().enumerate() {
        last_line = i;

        if current.is_empty() {
            if comment_continues {
                comment_continues = ends_with_continuation(line);
                continue;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') {
                comment_continues = ends_with_continuation(line);
                continue;
            }
            cmd_start = i;
        } else if comment_continues {
            // Comment continuation inside a command span: keep the
            // line number, drop the text.
            comment_continues = ends_with_continuation(line);
            current.push("");
            continue;
        } else if is_comment_line(line) {
            comment_continues = ends_with_continuation(line);
            current.push("");
            continue;
        }

        depth += brace_delta(line);
        current.push(line);

        if depth <= 0 {
            let candidate = current.join("\n");
            if is_complete(&candidate) {
                commands.push(Command {
                    text: candidate,
                    start_line: start_line + cmd_start,
                    end_line: start_line + i,
                });
                current.clear();
                depth = 0;
            }
        }
    }

    if !current.is_empty() {
        commands.push(Command {
            text: current.join("\n"),
            start_line: start_line + cmd_start,
            end_line: start_line + last_line,
        });
    }

    commands
}

/// Net brace count of one line, skipping escaped characters and braces
/// inside a same-line quoted string.
fn brace_delta(line: &str) -> i64 {
    let bytes = line.as_bytes();
    let mut delta = 0i64;
    let mut in_quote = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'"' => in_quote = !in_quote,
            b'{' if !in_quote => delta += 1,
            b'}' if !in_quote => delta -= 1,
            _ => {}
        }
        i += 1;
    }
    delta
}
