pub mod default;

use std::fmt;
use crate::ast::ControlSplit;

pub trait Parser {
    /// `Ok(None)` when the line held no tokens at all.
    fn parse(&mut self) -> Result<Option<ControlSplit>, ParseError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingRedirectTarget {
        pos: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingRedirectTarget { pos } => {
                write!(f, "Missing file name after '>' at position {}", pos)
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CommandNode;
    use crate::parser::default::DefaultParser;
    use crate::lexer::Lexer;

    fn lex_and_parse(src: &str) -> Result<Option<ControlSplit>, ParseError> {
        let tokens = Lexer::new(src).tokenize().expect("Failed to tokenize input");
        DefaultParser::new(&tokens).parse()
    }

    fn cmd(args: &[&str]) -> CommandNode {
        CommandNode::new(args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(lex_and_parse(""), Ok(None));
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(
            lex_and_parse("ls -la /tmp"),
            Ok(Some(ControlSplit::Plain(cmd(&["ls", "-la", "/tmp"]))))
        );
    }

    #[test]
    fn test_redirect() {
        assert_eq!(
            lex_and_parse("echo hi > /tmp/out.txt"),
            Ok(Some(ControlSplit::Redirect {
                node: cmd(&["echo", "hi"]),
                file: "/tmp/out.txt".to_string(),
            }))
        );
    }

    #[test]
    fn test_redirect_ignores_trailing_words() {
        assert_eq!(
            lex_and_parse("echo hi > out.txt extra | cat"),
            Ok(Some(ControlSplit::Redirect {
                node: cmd(&["echo", "hi"]),
                file: "out.txt".to_string(),
            }))
        );
    }

    #[test]
    fn test_redirect_without_target() {
        assert_eq!(
            lex_and_parse("echo hi >"),
            Err(ParseError::MissingRedirectTarget { pos: 8 })
        );
    }

    #[test]
    fn test_redirect_target_may_be_an_operator() {
        assert_eq!(
            lex_and_parse("echo hi > |"),
            Ok(Some(ControlSplit::Redirect {
                node: cmd(&["echo", "hi"]),
                file: "|".to_string(),
            }))
        );
    }

    #[test]
    fn test_pipeline() {
        assert_eq!(
            lex_and_parse("printf foo | cat"),
            Ok(Some(ControlSplit::Pipeline(cmd(&["printf", "foo"]), cmd(&["cat"]))))
        );
    }

    #[test]
    fn test_first_operator_wins() {
        // Everything after the pipe is taken verbatim by the right command
        assert_eq!(
            lex_and_parse("ls | grep x > out.txt"),
            Ok(Some(ControlSplit::Pipeline(
                cmd(&["ls"]),
                cmd(&["grep", "x", ">", "out.txt"]),
            )))
        );
    }

    #[test]
    fn test_empty_pipe_segments_parse() {
        assert_eq!(
            lex_and_parse("| cat"),
            Ok(Some(ControlSplit::Pipeline(cmd(&[]), cmd(&["cat"]))))
        );
        assert_eq!(
            lex_and_parse("ls |"),
            Ok(Some(ControlSplit::Pipeline(cmd(&["ls"]), cmd(&[]))))
        );
    }

    #[test]
    fn test_quoted_operator_is_plain_argument() {
        assert_eq!(
            lex_and_parse("echo '>' \"|\""),
            Ok(Some(ControlSplit::Plain(cmd(&["echo", ">", "|"]))))
        );
    }
}
