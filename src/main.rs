fn main() {
    use pipe_shell::config::ConfigLoader;
    use pipe_shell::logging;
    use pipe_shell::repl::Repl;

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pipe-shell: config error: {}, using defaults", e);
            ConfigLoader::default_config()
        }
    };

    if let Err(e) = logging::init(&config) {
        eprintln!("pipe-shell: cannot set up logging: {}", e);
    }

    let mut repl = Repl::new(config);
    if let Err(e) = repl.run() {
        eprintln!("pipe-shell: {}", e);
        std::process::exit(1);
    }
}
