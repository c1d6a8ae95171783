#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word,          // command or argument
    Pipe,          // |
    RedirectOut,   // >
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,       // Resolved text (quotes removed, escapes decoded)
    pub span: (usize, usize), // Position info [start, end)
    pub single_quoted: bool,  // First character came from a '...' region
}

impl Token {
    pub fn word(lexeme: &str, span: (usize, usize)) -> Self {
        Token {
            kind: TokenKind::Word,
            lexeme: lexeme.to_string(),
            span,
            single_quoted: false,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}
