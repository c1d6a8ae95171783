use log::debug;
use crate::environment::Environment;
use crate::lexer::Token;

/// Replaces every `$NAME` word with the value of `NAME`.
///
/// Unset variables and a lone `$` are left as they are. Words that start with
/// single-quoted text are never expanded.
pub fn expand(tokens: Vec<Token>, env: &Environment) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|mut token| {
            if !token.is_word() || token.single_quoted {
                return token;
            }
            let Some(name) = token.lexeme.strip_prefix('$').filter(|n| !n.is_empty()) else {
                return token;
            };
            match env.get(name).map(str::to_string) {
                Some(value) => token.lexeme = value,
                None => debug!("variable '{}' is not set", name),
            }
            token
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, TokenKind};

    fn expand_line(line: &str, env: &Environment) -> Vec<String> {
        let tokens = Lexer::new(line).tokenize().unwrap();
        expand(tokens, env).into_iter().map(|t| t.lexeme).collect()
    }

    #[test]
    fn test_set_variable_is_substituted() {
        let env = Environment::from_vars([("FOO", "bar")]);
        assert_eq!(expand_line("echo $FOO", &env), vec!["echo", "bar"]);
    }

    #[test]
    fn test_unset_variable_is_kept() {
        let env = Environment::from_vars([("FOO", "bar")]);
        assert_eq!(expand_line("echo $NOPE", &env), vec!["echo", "$NOPE"]);
    }

    #[test]
    fn test_lone_dollar_is_literal() {
        let env = Environment::from_vars([("", "empty-name")]);
        assert_eq!(expand_line("echo $", &env), vec!["echo", "$"]);
    }

    #[test]
    fn test_only_leading_dollar_expands() {
        let env = Environment::from_vars([("FOO", "bar")]);
        assert_eq!(expand_line("echo x$FOO", &env), vec!["echo", "x$FOO"]);
    }

    #[test]
    fn test_double_quoted_expands_single_quoted_does_not() {
        let env = Environment::from_vars([("FOO", "bar")]);
        assert_eq!(expand_line("echo \"$FOO\" '$FOO'", &env), vec!["echo", "bar", "$FOO"]);
    }

    #[test]
    fn test_expanded_value_stays_a_word() {
        let env = Environment::from_vars([("P", "|")]);
        let tokens = expand(Lexer::new("echo $P").tokenize().unwrap(), &env);
        assert_eq!(tokens[1].lexeme, "|");
        assert_eq!(tokens[1].kind, TokenKind::Word);
    }
}
