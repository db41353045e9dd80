use crate::Concentration::calc_error::CalcResult;
use crate::settings::Settings;
use log::debug;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;

/// Logs go to the terminal and, if `log_file` is set, to that file too.
pub fn init_logging(settings: &Settings) -> CalcResult<()> {
    let level = settings.level_filter()?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &settings.log_file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    // a logger may already be set (tests, embedding), that is not an error
    if let Err(e) = CombinedLogger::init(loggers) {
        debug!("logger already installed, keeping it: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_not_an_error() {
        let settings = Settings::default();
        init_logging(&settings).unwrap();
        init_logging(&settings).unwrap();
    }

    #[test]
    fn test_unknown_level() {
        let settings = Settings {
            log_level: "loud".to_string(),
            ..Settings::default()
        };
        assert!(init_logging(&settings).is_err());
    }
}
