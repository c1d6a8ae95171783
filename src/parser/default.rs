use log::{debug, warn};
use crate::ast::{CommandNode, ControlSplit};
use crate::lexer::{Token, TokenKind};
use crate::parser::{Parser, ParseError};

/// Scans the tokens left to right and stops at the first `>` or `|`.
///
/// After `>`, the next token is the target file and the rest of the line is
/// dropped. After `|`, every remaining token (operators included) belongs to
/// the right-hand command.
pub struct DefaultParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> DefaultParser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn rest(&mut self) -> Vec<String> {
        let rest = self.tokens[self.pos..].iter().map(|t| t.lexeme.clone()).collect();
        self.pos = self.tokens.len();
        rest
    }
}

impl<'a> Parser for DefaultParser<'a> {
    fn parse(&mut self) -> Result<Option<ControlSplit>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let mut args = Vec::new();
        while let Some(tok) = self.next() {
            match tok.kind {
                TokenKind::Word => args.push(tok.lexeme.clone()),
                TokenKind::RedirectOut => {
                    let Some(target) = self.next() else {
                        return Err(ParseError::MissingRedirectTarget { pos: tok.span.0 });
                    };
                    let ignored = self.rest();
                    if !ignored.is_empty() {
                        warn!("ignoring arguments after redirect target: {:?}", ignored);
                    }
                    let split = ControlSplit::Redirect {
                        node: CommandNode::new(args),
                        file: target.lexeme.clone(),
                    };
                    debug!("parsed {:?}", split);
                    return Ok(Some(split));
                }
                TokenKind::Pipe => {
                    let right = self.rest();
                    let split = ControlSplit::Pipeline(CommandNode::new(args), CommandNode::new(right));
                    debug!("parsed {:?}", split);
                    return Ok(Some(split));
                }
            }
        }

        let split = ControlSplit::Plain(CommandNode::new(args));
        debug!("parsed {:?}", split);
        Ok(Some(split))
    }
}
