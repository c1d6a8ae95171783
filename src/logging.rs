use std::fs::OpenOptions;
use std::io;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use crate::config::Config;

/// Installs the global logger: appends to `log_file` when one is configured,
/// otherwise writes to stderr so program output on stdout stays clean.
pub fn init(config: &Config) -> io::Result<()> {
    let log_config = ConfigBuilder::new()
        .set_thread_level(log::LevelFilter::Off)
        .build();

    let result = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            WriteLogger::init(config.log_level, log_config, file)
        }
        None => TermLogger::init(config.log_level, log_config, TerminalMode::Stderr, ColorChoice::Auto),
    };
    result.map_err(io::Error::other)
}
