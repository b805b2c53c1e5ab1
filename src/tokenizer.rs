//! Structural word splitter for a single command's text.
//!
//! Splits delimiter-aware words exactly as a non-evaluating reader
//! would: braces, quotes, and brackets group atomically, substitutions
//! and variable references are never expanded, and word count is a
//! purely lexical property. Malformed input (unterminated delimiters)
//! never errors here; the open word simply runs to the end of the text
//! and the completeness check in the extractor reports the problem.

use crate::token::Token;

/// Split a command's text into delimiter-classified words.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    Words::new(text)
        .map(|(offset, word)| Token::new(word, offset))
        .collect()
}

/// Number of words in a command's text.
#[must_use]
pub fn count_tokens(text: &str) -> usize {
    Words::new(text).count()
}

/// The word at `index`, or `None` when the index is out of range.
///
/// Out-of-range access is an expected condition for construct parsers
/// probing optional arguments, so this never panics.
#[must_use]
pub fn get_token(text: &str, index: usize) -> Option<Token> {
    Words::new(text)
        .nth(index)
        .map(|(offset, word)| Token::new(word, offset))
}

/// Lazy word iterator over a command's text.
struct Words<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Words<'a> {
    const fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                // A backslash-newline joins words across lines.
                b'\\' if matches!(self.bytes.get(self.pos + 1), Some(b'\n' | b'\r')) => {
                    self.pos += 2;
                }
                _ => break,
            }
        }
    }

    /// Consume a balanced `{...}` group. The closing brace may be
    /// missing; the word then extends to the end of the text.
    fn scan_braced(&mut self) {
        let mut depth = 0usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Consume a `"..."` group up to the closing unescaped quote.
    fn scan_quoted(&mut self) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'"' => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Consume a balanced `[...]` group.
    fn scan_bracketed(&mut self) {
        let mut depth = 0usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'[' => {
                    depth += 1;
                    self.pos += 1;
                }
                b']' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Consume a bare word. Embedded `[...]` groups stay part of the
    /// word, so `a[id $x]b` is one token.
    fn scan_bare(&mut self) {
        let mut bracket = 0usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' if bracket == 0 => return,
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'[' => {
                    bracket += 1;
                    self.pos += 1;
                }
                b']' => {
                    bracket = bracket.saturating_sub(1);
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.pos >= self.bytes.len() {
            return None;
        }

        let start = self.pos;
        match self.bytes[self.pos] {
            b'{' => self.scan_braced(),
            b'"' => self.scan_quoted(),
            b'[' => self.scan_bracketed(),
            _ => self.scan_bare(),
        }

        Some((start, &self.text[start..self.pos]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn simple_words() {
        let tokens = tokenize("set x 1");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "set");
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[2].text, "1");
    }

    #[test]
    fn braced_group_is_one_word() {
        let tokens = tokenize("proc foo {a b c} {puts hi}");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[2].text, "{a b c}");
        assert_eq!(tokens[3].text, "{puts hi}");
    }

    #[test]
    fn nested_braces_stay_atomic() {
        let tokens = tokenize("proc f {} { if {1} { puts x } }");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].text, "{ if {1} { puts x } }");
    }

    #[test]
    fn quoted_word_with_spaces() {
        let tokens = tokenize("set msg \"hello world\"");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "\"hello world\"");
        assert_eq!(tokens[2].kind, TokenKind::Quoted);
    }

    #[test]
    fn escaped_quote_inside_string() {
        let tokens = tokenize(r#"set msg "say \"hi\"""#);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, r#""say \"hi\"""#);
    }

    #[test]
    fn bracketed_word_is_atomic() {
        let tokens = tokenize("set x [string length $y]");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "[string length $y]");
        assert_eq!(tokens[2].kind, TokenKind::Bracketed);
    }

    #[test]
    fn nested_brackets() {
        let tokens = tokenize("set x [expr [llength $l] + 1]");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "[expr [llength $l] + 1]");
    }

    #[test]
    fn bare_word_with_embedded_substitution() {
        let tokens = tokenize("set x a[id $y]b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "a[id $y]b");
    }

    #[test]
    fn undefined_variables_are_not_evaluated() {
        // Word counting must not depend on any variable existing.
        assert_eq!(count_tokens("puts $no_such_var $another"), 3);
    }

    #[test]
    fn count_matches_tokenize() {
        let text = "foreach {k v} $pairs { puts $k }";
        assert_eq!(count_tokens(text), tokenize(text).len());
    }

    #[test]
    fn get_token_by_index() {
        let tok = get_token("package require Tcl 8.6", 3).expect("token 3");
        assert_eq!(tok.text, "8.6");
    }

    #[test]
    fn get_token_out_of_range_is_none() {
        assert!(get_token("set x", 5).is_none());
        assert!(get_token("", 0).is_none());
    }

    #[test]
    fn offsets_point_into_source() {
        let text = "set  x  {a b}";
        let tokens = tokenize(text);
        assert_eq!(tokens[1].offset, 5);
        assert_eq!(&text[tokens[2].offset..], "{a b}");
    }

    #[test]
    fn unterminated_brace_runs_to_end() {
        let tokens = tokenize("proc f {a b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "{a b");
    }

    #[test]
    fn multiline_command_text() {
        let tokens = tokenize("if {$x} {\n    puts hi\n}");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "{\n    puts hi\n}");
    }

    #[test]
    fn line_continuation_joins_arguments() {
        let tokens = tokenize("set x \\\n    1");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "1");
    }
}
