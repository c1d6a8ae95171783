use std::{io, fmt};
use std::process::ExitStatus;
use crate::ast::ControlSplit;

pub type ExecStatus = Result<i32, ExecError>;

#[derive(Debug)]
pub enum ExecError {
    CommandNotFound(String),
    Io(io::Error),
    PermissionDenied(String),
    InvalidArgument(String),
    EmptyCommand,
    PipelineError(String),
    RedirectError(String),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::CommandNotFound(cmd) => write!(f, "Command not found: {}", cmd),
            ExecError::Io(e) => write!(f, "IO error: {}", e),
            ExecError::PermissionDenied(cmd) => write!(f, "Permission denied: {}", cmd),
            ExecError::InvalidArgument(arg) => write!(f, "Invalid argument: {}", arg),
            ExecError::EmptyCommand => write!(f, "Empty command"),
            ExecError::PipelineError(msg) => write!(f, "Pipeline error: {}", msg),
            ExecError::RedirectError(msg) => write!(f, "Redirect error: {}", msg),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        ExecError::Io(e)
    }
}

impl From<nix::Error> for ExecError {
    fn from(e: nix::Error) -> Self {
        ExecError::Io(io::Error::from_raw_os_error(e as i32))
    }
}

/// Runs one parsed line and blocks until every child it started has exited.
pub trait Executor {
    fn exec(&mut self, node: &ControlSplit) -> ExecStatus;
}

/// Exit code of a finished child; `128 + signal` when it was killed.
pub fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(code) = status.code() {
        code
    } else if let Some(signal) = status.signal() {
        128 + signal
    } else {
        1
    }
}

/// Maps a failed spawn of `name` onto the shell's error kinds.
pub(crate) fn spawn_error(name: &str, e: io::Error) -> ExecError {
    match e.kind() {
        io::ErrorKind::NotFound => ExecError::CommandNotFound(name.to_string()),
        io::ErrorKind::PermissionDenied => ExecError::PermissionDenied(name.to_string()),
        _ => ExecError::Io(e),
    }
}
