use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Locates programs the way `execvp` does: names containing `/` are taken as
/// paths, anything else is searched for in `PATH`.
pub struct PathResolver;

impl PathResolver {
    pub fn resolve(&self, command: &str) -> Option<PathBuf> {
        if command.is_empty() {
            return None;
        }

        if command.contains('/') {
            let path = Path::new(command);
            // Non-executable files are returned so that spawning reports EACCES
            if path.is_file() {
                return Some(PathBuf::from(command));
            } else {
                return None;
            }
        }

        let paths = env::var_os("PATH")?;
        env::split_paths(&paths)
            .map(|dir| dir.join(command))
            .find(|full_path| is_executable(full_path))
    }
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
