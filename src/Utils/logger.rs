use log::{LevelFilter, info};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

/// Starts logging to stderr and, if `log_file` is given, into that file.
/// Terminal output is kept short, the file gets targets and thread ids.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file_config = ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .set_thread_level(LevelFilter::Error)
            .build();
        loggers.push(WriteLogger::new(level, file_config, File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    info!("logging started at level {}", level);
    Ok(())
}
