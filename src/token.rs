/// Delimiter classification of a single word, decided by its first and
/// last characters only. Classification never evaluates the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Undelimited word.
    Bare,
    /// Double-quoted word (`"..."`).
    Quoted,
    /// Brace-quoted word (`{...}`).
    Braced,
    /// Command substitution (`[...]`); must be parsed, never flattened.
    Bracketed,
}

impl TokenKind {
    /// Classify a word by inspecting its outermost characters.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let bytes = text.as_bytes();
        if bytes.len() < 2 {
            return Self::Bare;
        }
        match (bytes[0], bytes[bytes.len() - 1]) {
            (b'"', b'"') => Self::Quoted,
            (b'{', b'}') => Self::Braced,
            (b'[', b']') => Self::Bracketed,
            _ => Self::Bare,
        }
    }
}

/// A delimiter-classified word from a command's text.
///
/// `offset` is the byte position of the word (including delimiters)
/// inside the command text it was read from, which lets callers recover
/// the word's source line without re-scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    #[must_use]
    pub fn new(text: &str, offset: usize) -> Self {
        Self {
            text: text.to_string(),
            kind: TokenKind::classify(text),
            offset,
        }
    }

    /// Remove one layer of quote or brace delimiters.
    ///
    /// Bare words pass through unchanged. Bracketed words are *not*
    /// stripped: they denote nested command substitution and must go
    /// through [`Token::inner_command`] and a recursive parse instead.
    #[must_use]
    pub fn strip_outer(&self) -> &str {
        match self.kind {
            TokenKind::Quoted | TokenKind::Braced => &self.text[1..self.text.len() - 1],
            TokenKind::Bare | TokenKind::Bracketed => &self.text,
        }
    }

    /// Whether this word requires a recursive parse.
    #[must_use]
    pub const fn needs_parsing(&self) -> bool {
        matches!(self.kind, TokenKind::Bracketed)
    }

    /// Inner command text of a bracketed word, without the enclosing
    /// `[`/`]`. Returns `None` for every other kind.
    #[must_use]
    pub fn inner_command(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Bracketed => Some(&self.text[1..self.text.len() - 1]),
            _ => None,
        }
    }
}
