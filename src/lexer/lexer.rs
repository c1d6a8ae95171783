use std::fmt;
use log::{debug, warn};
use super::token::{Token, TokenKind};

/// Upper bound on tokens accepted from one line. Control tokens count.
pub const MAX_ARGS: usize = 63;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LexError {
    UnterminatedQuote(char, usize),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedQuote(c, q) => write!(f, "Unterminated quote '{}' starting at position {}", c, q),
        }
    }
}

impl std::error::Error for LexError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InSingleQuote,
    InDoubleQuote,
}

/// A word being accumulated. `quoted` is set as soon as any quote or
/// backslash contributes to it, which keeps `">"` and `\|` out of the
/// control token classes.
struct PendingWord {
    buf: String,
    start: usize,
    quoted: bool,
    single_quoted: bool,
}

impl PendingWord {
    fn new(start: usize) -> Self {
        PendingWord {
            buf: String::new(),
            start,
            quoted: false,
            single_quoted: false,
        }
    }
}

/// Splits one input line into words and the two control tokens `>` and `|`.
///
/// The scan is a single pass over the characters. Whitespace outside quotes
/// ends a word; quotes may open anywhere inside a word and their content is
/// concatenated with the surrounding text. Backslash escapes are decoded
/// outside quotes and inside double quotes (`\n` and `\t` become newline and
/// tab, anything else stands for itself). Single-quoted text is literal.
pub struct Lexer<'a> {
    input: &'a str,
    max_args: usize,
    truncated: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            max_args: MAX_ARGS,
            truncated: false,
        }
    }

    pub fn with_max_args(mut self, max_args: usize) -> Self {
        self.max_args = max_args;
        self
    }

    /// Whether the last `tokenize` call dropped tokens beyond `max_args`.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut word: Option<PendingWord> = None;
        let mut state = State::Normal;
        let mut quote_start = 0;
        let mut escaped = false;
        let mut pos = 0;

        let input = self.input;
        self.truncated = false;

        for ch in input.chars() {
            if escaped {
                escaped = false;
                if let Some(w) = word.as_mut() {
                    w.buf.push(decode_escape(ch));
                }
                pos += 1;
                continue;
            }

            match state {
                State::InSingleQuote => {
                    if ch == '\'' {
                        state = State::Normal;
                    } else if let Some(w) = word.as_mut() {
                        w.buf.push(ch);
                    }
                }
                State::InDoubleQuote => match ch {
                    '"' => state = State::Normal,
                    '\\' => escaped = true,
                    _ => {
                        if let Some(w) = word.as_mut() {
                            w.buf.push(ch);
                        }
                    }
                },
                State::Normal => match ch {
                    ' ' | '\t' | '\n' => {
                        if let Some(w) = word.take() {
                            self.push_word(&mut tokens, w, pos);
                        }
                    }
                    '\\' => {
                        word.get_or_insert_with(|| PendingWord::new(pos)).quoted = true;
                        escaped = true;
                    }
                    '\'' | '"' => {
                        let w = word.get_or_insert_with(|| PendingWord::new(pos));
                        if !w.quoted && w.buf.is_empty() && ch == '\'' {
                            w.single_quoted = true;
                        }
                        w.quoted = true;
                        quote_start = pos;
                        state = if ch == '\'' { State::InSingleQuote } else { State::InDoubleQuote };
                    }
                    _ => word.get_or_insert_with(|| PendingWord::new(pos)).buf.push(ch),
                },
            }
            pos += 1;
        }

        match state {
            State::InSingleQuote => return Err(LexError::UnterminatedQuote('\'', quote_start)),
            State::InDoubleQuote => return Err(LexError::UnterminatedQuote('"', quote_start)),
            State::Normal => {}
        }
        if escaped {
            debug!("dropping trailing backslash at position {}", pos - 1);
        }
        if let Some(w) = word.take() {
            self.push_word(&mut tokens, w, pos);
        }

        if self.truncated {
            warn!("too many arguments, keeping the first {}", self.max_args);
        }
        Ok(tokens)
    }

    fn push_word(&mut self, tokens: &mut Vec<Token>, word: PendingWord, end: usize) {
        if tokens.len() >= self.max_args {
            self.truncated = true;
            return;
        }
        let kind = match word.buf.as_str() {
            ">" if !word.quoted => TokenKind::RedirectOut,
            "|" if !word.quoted => TokenKind::Pipe,
            _ => TokenKind::Word,
        };
        tokens.push(Token {
            kind,
            lexeme: word.buf,
            span: (word.start, end),
            single_quoted: word.single_quoted,
        });
    }
}

fn decode_escape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        other => other,
    }
}
