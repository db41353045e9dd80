use super::cli_correction::correction_menu;
use super::cli_input::Console;
use super::cli_settings::settings_menu;
use super::cli_stock::stock_menu;
use crate::app::App;
use crate::report::catalogue_table;
use crate::settings::SettingsManager;
use std::io::{BufRead, Write};

pub fn run_interactive_menu<R: BufRead, W: Write>(
    app: &mut App,
    manager: &mut SettingsManager,
    console: &mut Console<R, W>,
) {
    loop {
        show_main_menu(console);
        let Some(choice) = console.ask("\nEnter your choice: ") else {
            break;
        };

        match choice.as_str() {
            "1" => console.say(&catalogue_table(app.catalogue()).to_string()),
            "2" => stock_menu(app, console),
            "3" => correction_menu(app, console),
            "4" => match app.export_results() {
                Ok(path) => console.say(&format!("Results saved to {}", path.display())),
                Err(e) => console.say(&format!("\x1b[31mError: {}\x1b[0m", e)),
            },
            "5" => {
                app.clear_rows();
                console.say("Form cleared");
            }
            "6" => settings_menu(app, manager, console),
            "0" => {
                console.say("Goodbye!");
                break;
            }
            _ => console.say("Invalid choice. Please try again."),
        }
    }
}

fn show_main_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) {
    console.say("\x1b[34m\n molprep: how much to weigh out for a solution of given molarity \x1b[0m");
    console.say("\x1b[33m1. Substances\x1b[0m");
    console.say("\x1b[33m2. Required masses\x1b[0m");
    console.say("\x1b[33m3. Actual concentrations and correction\x1b[0m");
    console.say("\x1b[33m4. Export results (JSON)\x1b[0m");
    console.say("\x1b[33m5. Clear form\x1b[0m");
    console.say("\x1b[33m6. Settings\x1b[0m");
    console.say("\x1b[33m0. Exit\x1b[0m");
}
