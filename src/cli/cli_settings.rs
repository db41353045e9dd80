use super::cli_input::Console;
use crate::app::App;
use crate::settings::SettingsManager;
use std::io::{BufRead, Write};

/// Shows the settings and changes one of them. Changes are saved to the config file
/// and passed on to the running app.
pub fn settings_menu<R: BufRead, W: Write>(
    app: &mut App,
    manager: &mut SettingsManager,
    console: &mut Console<R, W>,
) {
    if let Err(e) = run_settings(app, manager, console) {
        console.say(&format!("\x1b[31mError: {}\x1b[0m", e));
    }
}

fn show_settings<R: BufRead, W: Write>(manager: &SettingsManager, console: &mut Console<R, W>) {
    let settings = manager.settings();
    let catalogue = match &settings.substance_catalogue {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    };
    console.say(&format!("\n=== Settings ({}) ===", manager.config_file().display()));
    console.say(&format!("Substance catalogue: {}", catalogue));
    console.say(&format!(
        "Acceptable error: ±{}%",
        settings.acceptable_error_percent
    ));
    console.say(&format!("Export directory: {}", settings.export_dir.display()));
    console.say("\x1b[33m1. Set substance catalogue file\x1b[0m");
    console.say("\x1b[33m2. Set acceptable error, %\x1b[0m");
    console.say("\x1b[33m3. Set export directory\x1b[0m");
    console.say("\x1b[33m4. Reset to defaults\x1b[0m");
    console.say("\x1b[33m0. Back\x1b[0m");
}

fn run_settings<R: BufRead, W: Write>(
    app: &mut App,
    manager: &mut SettingsManager,
    console: &mut Console<R, W>,
) -> Result<(), String> {
    show_settings(manager, console);
    let choice = console.ask("Enter your choice: ").unwrap_or_default();
    let changed = match choice.as_str() {
        "1" => {
            let Some(path) = console.ask("Catalogue file (JSON): ") else {
                return Ok(());
            };
            manager.set_substance_catalogue(&path)
        }
        "2" => {
            let Some(value) = console.ask_value("Acceptable error, %: ", str::parse::<f64>)? else {
                return Ok(());
            };
            manager.set_acceptable_error_percent(value)
        }
        "3" => {
            let Some(path) = console.ask("Export directory: ") else {
                return Ok(());
            };
            manager.set_export_dir(&path)
        }
        "4" => manager.reset_to_defaults(),
        "0" | "" => return Ok(()),
        _ => return Err("invalid choice".to_string()),
    };
    changed.map_err(|e| e.to_string())?;
    app.apply_settings(manager.settings().clone())
        .map_err(|e| e.to_string())?;
    console.say(&format!(
        "Settings saved to {}",
        manager.config_file().display()
    ));
    Ok(())
}
