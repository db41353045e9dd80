use molprep::app::App;
use molprep::cli::cli_input::Console;
use molprep::cli::cli_main::run_interactive_menu;
use molprep::logging::init_logging;
use molprep::settings::SettingsManager;
use std::io;
use std::process::ExitCode;

pub fn main() -> ExitCode {
    let mut manager = match SettingsManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Failed to read settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(manager.settings()) {
        eprintln!("Failed to start logging: {}", e);
        return ExitCode::FAILURE;
    }
    let mut app = match App::from_settings(manager.settings().clone()) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut console = Console::new(io::stdin().lock(), io::stdout());
    run_interactive_menu(&mut app, &mut manager, &mut console);
    ExitCode::SUCCESS
}
