#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    pub args: Vec<String>,
}

impl CommandNode {
    pub fn new(args: Vec<String>) -> Self {
        CommandNode { args }
    }

    /// Program name, or `""` for an empty command.
    pub fn name(&self) -> &str {
        self.args.first().map(|s| s.as_str()).unwrap_or("")
    }

    pub fn args(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// How one input line is executed. At most one control token is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSplit {
    Plain(CommandNode),
    Redirect {
        node: CommandNode,
        file: String,
    },
    Pipeline(CommandNode, CommandNode),
}
