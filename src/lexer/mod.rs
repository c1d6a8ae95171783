mod lexer;
mod token;

pub use lexer::{Lexer, LexError, MAX_ARGS};
pub use token::{Token, TokenKind};
