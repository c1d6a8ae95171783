use std::fs::{File, OpenOptions};
use std::os::fd::OwnedFd;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use log::debug;
use nix::fcntl::OFlag;
use nix::unistd::pipe2;
use crate::ast::{CommandNode, ControlSplit};
use super::executor::{exit_code, spawn_error, ExecError, ExecStatus, Executor};
use super::path_resolver::PathResolver;

/// Runs commands through `std::process::Command`.
///
/// Redirection and pipe ends are handed to the child as `Stdio`, so the
/// shell's own descriptors are never touched.
pub struct DefaultExecutor;

impl Executor for DefaultExecutor {
    fn exec(&mut self, node: &ControlSplit) -> ExecStatus {
        match node {
            ControlSplit::Plain(cmd) => self.exec_command(cmd),
            ControlSplit::Redirect { node, file } => self.exec_redirect(node, file),
            ControlSplit::Pipeline(left, right) => self.exec_pipeline(left, right),
        }
    }
}

impl DefaultExecutor {
    fn exec_command(&mut self, cmd: &CommandNode) -> ExecStatus {
        let child = self.spawn(cmd, None, None)?;
        wait_child(cmd, child)
    }

    fn exec_redirect(&mut self, cmd: &CommandNode, file: &str) -> ExecStatus {
        let out = open_redirect_target(file)?;
        let child = self.spawn(cmd, None, Some(Stdio::from(out)))?;
        wait_child(cmd, child)
    }

    fn exec_pipeline(&mut self, left: &CommandNode, right: &CommandNode) -> ExecStatus {
        let (pipe_read, pipe_write) = create_pipe()?;

        // Each end is moved into its Command and closed in the shell when
        // spawn returns, so the reader sees EOF once the writer exits.
        let left_child = self.spawn(left, None, Some(Stdio::from(pipe_write)));
        let right_child = self.spawn(right, Some(Stdio::from(pipe_read)), None);

        let left_status = left_child.and_then(|child| wait_child(left, child));
        let right_status = right_child.and_then(|child| wait_child(right, child));

        if let Err(e) = left_status {
            eprintln!("pipe-shell: {}", e);
        }
        right_status
    }

    fn spawn(
        &mut self,
        cmd: &CommandNode,
        stdin: Option<Stdio>,
        stdout: Option<Stdio>,
    ) -> Result<Child, ExecError> {
        let mut command = self.prepare_command(cmd)?;
        if let Some(stdin) = stdin {
            command.stdin(stdin);
        }
        if let Some(stdout) = stdout {
            command.stdout(stdout);
        }
        command.spawn().map_err(|e| spawn_error(cmd.name(), e))
    }

    fn prepare_command(&self, cmd: &CommandNode) -> Result<Command, ExecError> {
        if cmd.is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        let path = PathResolver
            .resolve(cmd.name())
            .ok_or_else(|| ExecError::CommandNotFound(cmd.name().to_string()))?;

        let mut command = Command::new(path);
        command.arg0(cmd.name()).args(cmd.args());
        Ok(command)
    }
}

fn wait_child(cmd: &CommandNode, mut child: Child) -> ExecStatus {
    let status = child.wait().map_err(ExecError::Io)?;
    let code = exit_code(status);
    debug!("{} (pid {}) exited with {}", cmd.name(), child.id(), code);
    Ok(code)
}

/// Both ends are close-on-exec; the child only keeps the end dup'ed onto
/// its stdin or stdout.
pub(crate) fn create_pipe() -> Result<(OwnedFd, OwnedFd), ExecError> {
    pipe2(OFlag::O_CLOEXEC).map_err(|e| ExecError::PipelineError(format!("cannot create pipe: {}", e)))
}

/// Opens `>` targets with create + truncate semantics.
pub(crate) fn open_redirect_target(file: &str) -> Result<File, ExecError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file)
        .map_err(|e| ExecError::RedirectError(format!("{}: {}", file, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn cmd(args: &[&str]) -> CommandNode {
        CommandNode::new(args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_plain_command_status() {
        let mut exec = DefaultExecutor;
        assert_eq!(exec.exec(&ControlSplit::Plain(cmd(&["true"]))).unwrap(), 0);
        assert_eq!(exec.exec(&ControlSplit::Plain(cmd(&["sh", "-c", "exit 7"]))).unwrap(), 7);
    }

    #[test]
    fn test_command_not_found() {
        let mut exec = DefaultExecutor;
        let res = exec.exec(&ControlSplit::Plain(cmd(&["no-such-program-9931"])));
        assert!(matches!(res, Err(ExecError::CommandNotFound(name)) if name == "no-such-program-9931"));
    }

    #[test]
    fn test_empty_command() {
        let mut exec = DefaultExecutor;
        assert!(matches!(exec.exec(&ControlSplit::Plain(cmd(&[]))), Err(ExecError::EmptyCommand)));
    }

    #[test]
    fn test_redirect_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        fs::write(&out, "old contents that must disappear\n").unwrap();

        let mut exec = DefaultExecutor;
        let node = ControlSplit::Redirect {
            node: cmd(&["echo", "hi"]),
            file: out.to_str().unwrap().to_string(),
        };
        assert_eq!(exec.exec(&node).unwrap(), 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "hi\n");
    }

    #[test]
    fn test_redirect_open_failure_spawns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let node = ControlSplit::Redirect {
            node: cmd(&["touch", marker.to_str().unwrap()]),
            file: dir.path().join("missing/out.txt").to_str().unwrap().to_string(),
        };
        let mut exec = DefaultExecutor;
        assert!(matches!(exec.exec(&node), Err(ExecError::RedirectError(_))));
        assert!(!marker.exists());
    }

    #[test]
    fn test_pipeline_connects_stdout_to_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("piped.txt");
        let script = format!("cat > {}", out.to_str().unwrap());
        let node = ControlSplit::Pipeline(cmd(&["printf", "foo"]), cmd(&["sh", "-c", &script]));
        let mut exec = DefaultExecutor;
        assert_eq!(exec.exec(&node).unwrap(), 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "foo");
    }

    #[test]
    fn test_pipeline_status_is_right_side() {
        let node = ControlSplit::Pipeline(cmd(&["true"]), cmd(&["sh", "-c", "cat >/dev/null; exit 4"]));
        let mut exec = DefaultExecutor;
        assert_eq!(exec.exec(&node).unwrap(), 4);
    }

    #[test]
    fn test_pipeline_missing_left_still_runs_right() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("right.txt");
        let script = format!("cat; echo done > {}", out.to_str().unwrap());
        let node = ControlSplit::Pipeline(cmd(&["no-such-program-9931"]), cmd(&["sh", "-c", &script]));
        let mut exec = DefaultExecutor;
        assert_eq!(exec.exec(&node).unwrap(), 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "done\n");
    }

    #[test]
    fn test_pipeline_missing_right_is_reported() {
        let node = ControlSplit::Pipeline(cmd(&["echo", "x"]), cmd(&[]));
        let mut exec = DefaultExecutor;
        assert!(matches!(exec.exec(&node), Err(ExecError::EmptyCommand)));
    }
}
