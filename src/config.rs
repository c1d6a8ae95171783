use std::path::{Path, PathBuf};
use std::{ env, fs, io, fmt };
use log::LevelFilter;
use crate::lexer::MAX_ARGS;

pub const CONFIG_ENV_VAR: &str = "PIPE_SHELL_CONFIG";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    pub max_args: usize,
    pub executor_type: ExecutorType,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        ConfigLoader::default_config()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: ">> ".to_string(),
            max_args: MAX_ARGS,
            executor_type: ExecutorType::Spawn,
            log_level: LevelFilter::Warn,
            log_file: None,
        }
    }

    /// `$PIPE_SHELL_CONFIG`, else `~/.pipeshellrc`, else nothing.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        let home = env::var_os("HOME")?;
        let path = Path::new(&home).join(".pipeshellrc");
        path.is_file().then_some(path)
    }

    /// Loads the file at `default_path`, or the defaults if there is none.
    pub fn load() -> Result<Config, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default_config()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Self::default_config();

        for (lineno, line) in src.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!("Line {}: No '=' found: {}", lineno+1, line)));
            };

            // The prompt keeps its trailing spaces, everything else is trimmed
            match key.trim() {
                "prompt" => config.prompt = value.to_string(),
                "max_args" => match value.trim().parse::<usize>() {
                    Ok(n) if n > 0 => config.max_args = n,
                    _ => return Err(ConfigError::Parse(format!("Line {}: Invalid max_args: {}", lineno+1, line))),
                },
                "executor_type" => {
                    config.executor_type = match value.trim() {
                        "spawn" => ExecutorType::Spawn,
                        "fork" => ExecutorType::Fork,
                        other => return Err(ConfigError::Parse(format!("Line {}: Unknown executor_type: {}", lineno+1, other))),
                    };
                }
                "log_level" => match value.trim().parse::<LevelFilter>() {
                    Ok(level) => config.log_level = level,
                    Err(_) => return Err(ConfigError::Parse(format!("Line {}: Invalid log_level: {}", lineno+1, line))),
                },
                "log_file" => {
                    let value = value.trim();
                    config.log_file = (!value.is_empty()).then(|| PathBuf::from(value));
                }
                k => return Err(ConfigError::Parse(format!("Line {}: Unknown key: {}", lineno+1, k))),
            }
        }

        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutorType {
    Spawn,
    Fork,
}
