use std::convert::Infallible;
use std::ffi::CString;
use std::os::fd::{AsRawFd, RawFd};
use log::debug;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, dup2, execvp, fork, ForkResult, Pid};
use crate::ast::{CommandNode, ControlSplit};
use super::default_executor::{create_pipe, open_redirect_target};
use super::executor::{ExecError, ExecStatus, Executor};

/// Exit status of a child whose `execvp` failed.
const EXEC_FAILED: i32 = 127;

/// Runs commands with `fork` + `execvp`, wiring descriptors with `dup2` in
/// the child between the two calls.
///
/// Program lookup happens in the child: an unknown program is reported on
/// stderr by the child itself, which then exits with status 127.
pub struct ForkExecutor;

/// Arguments converted up front so nothing is allocated between fork and exec.
struct Program {
    argv: Vec<CString>,
}

impl Program {
    fn new(cmd: &CommandNode) -> Result<Self, ExecError> {
        if cmd.is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        let argv = cmd
            .args
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ExecError::InvalidArgument(e.to_string()))?;
        Ok(Program { argv })
    }
}

#[derive(Default)]
struct Wiring {
    stdin: Option<RawFd>,
    stdout: Option<RawFd>,
    unused: Option<RawFd>,
}

impl Executor for ForkExecutor {
    fn exec(&mut self, node: &ControlSplit) -> ExecStatus {
        match node {
            ControlSplit::Plain(cmd) => {
                let program = Program::new(cmd)?;
                let pid = spawn(&program, Wiring::default())?;
                wait_pid(pid)
            }
            ControlSplit::Redirect { node, file } => {
                let program = Program::new(node)?;
                let out = open_redirect_target(file)?;
                let pid = spawn(&program, Wiring {
                    stdout: Some(out.as_raw_fd()),
                    ..Wiring::default()
                })?;
                drop(out);
                wait_pid(pid)
            }
            ControlSplit::Pipeline(left, right) => self.exec_pipeline(left, right),
        }
    }
}

impl ForkExecutor {
    fn exec_pipeline(&mut self, left: &CommandNode, right: &CommandNode) -> ExecStatus {
        let left = Program::new(left)?;
        let right = Program::new(right)?;
        let (pipe_read, pipe_write) = create_pipe()?;

        let left_pid = spawn(&left, Wiring {
            stdout: Some(pipe_write.as_raw_fd()),
            unused: Some(pipe_read.as_raw_fd()),
            ..Wiring::default()
        })?;
        let right_pid = spawn(&right, Wiring {
            stdin: Some(pipe_read.as_raw_fd()),
            unused: Some(pipe_write.as_raw_fd()),
            ..Wiring::default()
        });

        // The shell neither reads nor writes the pipe
        drop(pipe_read);
        drop(pipe_write);

        let left_status = wait_pid(left_pid);
        let right_pid = right_pid?;
        if let Err(e) = left_status {
            eprintln!("pipe-shell: {}", e);
        }
        wait_pid(right_pid)
    }
}

fn spawn(program: &Program, wiring: Wiring) -> Result<Pid, ExecError> {
    // Safety: the shell is single-threaded, and the child only calls
    // dup2/close/execvp before either exec'ing or `_exit`ing.
    match unsafe { fork() }? {
        ForkResult::Parent { child } => {
            debug!("forked {:?} as pid {}", program.argv, child);
            Ok(child)
        }
        ForkResult::Child => {
            let Err(err) = exec_child(program, wiring);
            let parts: [&[u8]; 4] = [program.argv[0].as_bytes(), b": ", err.desc().as_bytes(), b"\n"];
            for part in parts {
                write_stderr(part);
            }
            unsafe { libc::_exit(EXEC_FAILED) }
        }
    }
}

fn exec_child(program: &Program, wiring: Wiring) -> Result<Infallible, Errno> {
    // Rust ignores SIGPIPE at startup and ignored signals survive exec
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
    if let Some(fd) = wiring.unused {
        close(fd)?;
    }
    if let Some(fd) = wiring.stdin {
        dup2(fd, libc::STDIN_FILENO)?;
        close(fd)?;
    }
    if let Some(fd) = wiring.stdout {
        dup2(fd, libc::STDOUT_FILENO)?;
        close(fd)?;
    }
    execvp(&program.argv[0], &program.argv)
}

/// Unbuffered and lock-free, unlike `eprintln!`, so it is safe after fork.
fn write_stderr(bytes: &[u8]) {
    unsafe {
        libc::write(libc::STDERR_FILENO, bytes.as_ptr().cast(), bytes.len());
    }
}

fn wait_pid(pid: Pid) -> ExecStatus {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                debug!("pid {} exited with {}", pid, code);
                return Ok(code);
            }
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                debug!("pid {} killed by {:?}", pid, signal);
                return Ok(128 + signal as i32);
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
