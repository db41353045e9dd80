use super::cli_input::Console;
use crate::Concentration::units::parse_mass_g;
use crate::app::App;
use crate::report::actual_table;
use std::io::{BufRead, Write};

/// Asks for the weighed masses, prints actual concentrations, errors and corrections.
pub fn correction_menu<R: BufRead, W: Write>(app: &mut App, console: &mut Console<R, W>) {
    if let Err(e) = run_correction(app, console) {
        console.say(&format!("\x1b[31mError: {}\x1b[0m", e));
    }
}

fn run_correction<R: BufRead, W: Write>(
    app: &mut App,
    console: &mut Console<R, W>,
) -> Result<(), String> {
    console.say("\n=== Actual concentrations ===");
    if app.rows().is_empty() {
        return Err("calculate the required masses first".to_string());
    }
    let rows: Vec<(usize, String)> = app
        .rows()
        .iter()
        .map(|r| (r.row_id, r.substance_id.clone()))
        .collect();
    for (row_id, substance_id) in rows {
        let prompt = format!("Weighed mass of {} (e.g. 1.42 mg): ", substance_id);
        let mass = console.ask_value(&prompt, parse_mass_g)?;
        app.set_actual_mass(row_id, mass).map_err(|e| e.to_string())?;
    }
    let results = app.calculate_actual_results().map_err(|e| e.to_string())?;
    console.say(&actual_table(&results).to_string());
    console.say(&format!(
        "acceptable error: ±{}%",
        app.settings().acceptable_error_percent
    ));
    Ok(())
}
