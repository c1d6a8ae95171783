use std::io::{self, BufRead, Write};
use log::debug;
use crate::config::Config;
use crate::environment::Environment;
use crate::error::ShellError;
use crate::executor::{self, Executor};
use crate::expander;
use crate::lexer::Lexer;
use crate::parser::{Parser, default::DefaultParser};
use crate::prompt::ShellPrompt;

pub struct Repl {
    config: Config,
    env: Environment,
    prompt: ShellPrompt,
    executor: Box<dyn Executor>,
}

impl Repl {
    pub fn new(config: Config) -> Self {
        let prompt = ShellPrompt::new(&config.prompt);
        let executor = executor::new_executor(&config.executor_type);
        Repl {
            config,
            env: Environment::new(),
            prompt,
            executor,
        }
    }

    /// Replaces the variables `$NAME` words are looked up in.
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();
        self.run_with(&mut input, &mut out)
    }

    /// Prompts, reads and runs lines until `exit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        loop {
            self.prompt.show_prompt(out)?;
            let line = match self.prompt.read_line(input) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    // End with EOF (e.g. Ctrl+D)
                    writeln!(out)?;
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    eprintln!("pipe-shell: error reading input: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if line == "exit" {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            if let Err(e) = self.process_line(&line) {
                eprintln!("pipe-shell: {}", e);
            }
        }
        Ok(())
    }

    /// Tokenizes, expands, parses and executes one line.
    ///
    /// Returns the exit status of the command, or `None` if the line held
    /// nothing to run.
    pub fn process_line(&mut self, line: &str) -> Result<Option<i32>, ShellError> {
        let mut lexer = Lexer::new(line).with_max_args(self.config.max_args);
        let tokens = expander::expand(lexer.tokenize()?, &self.env);
        debug!("tokens: {:?}", tokens);

        let Some(split) = DefaultParser::new(&tokens).parse()? else {
            return Ok(None);
        };
        let status = self.executor.exec(&split)?;
        debug!("status: {}", status);
        Ok(Some(status))
    }
}
