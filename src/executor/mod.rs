mod executor;
mod default_executor;
mod fork_executor;
mod path_resolver;

pub use executor::{exit_code, Executor, ExecError, ExecStatus};
pub use default_executor::DefaultExecutor;
pub use fork_executor::ForkExecutor;
pub use path_resolver::PathResolver;

use crate::config::ExecutorType;

pub fn new_executor(kind: &ExecutorType) -> Box<dyn Executor> {
    match kind {
        ExecutorType::Spawn => Box::new(DefaultExecutor),
        ExecutorType::Fork => Box::new(ForkExecutor),
    }
}
