use super::cli_input::Console;
use crate::Concentration::units::{parse_concentration_m, parse_volume_ml};
use crate::app::App;
use crate::report::stock_table;
use std::io::{BufRead, Write};

/// Asks for the volume and the target concentrations, prints the masses to weigh out.
pub fn stock_menu<R: BufRead, W: Write>(app: &mut App, console: &mut Console<R, W>) {
    if let Err(e) = run_stock(app, console) {
        console.say(&format!("\x1b[31mError: {}\x1b[0m", e));
    }
}

fn run_stock<R: BufRead, W: Write>(app: &mut App, console: &mut Console<R, W>) -> Result<(), String> {
    console.say("\n=== Required masses ===");
    if app.rows().is_empty() {
        app.add_all_substances();
    }
    let volume = console.ask_value("Volume of the medium (e.g. 250 ml, 1 l): ", parse_volume_ml)?;
    app.set_volume_all(volume);

    let rows: Vec<(usize, String, Option<f64>)> = app
        .rows()
        .iter()
        .map(|r| (r.row_id, r.substance_id.clone(), r.target_concentration_m))
        .collect();
    for (row_id, substance_id, current) in rows {
        let default = current.map_or("-".to_string(), |c| format!("{} M", c));
        let prompt = format!(
            "Target concentration of {} (e.g. 5 uM) [{}]: ",
            substance_id, default
        );
        if let Some(target) = console.ask_value(&prompt, parse_concentration_m)? {
            app.set_target(row_id, Some(target)).map_err(|e| e.to_string())?;
        }
    }

    let results = app
        .calculate_stock_requirements()
        .map_err(|e| e.to_string())?;
    let table = stock_table(results);
    console.say(&table.to_string());
    Ok(())
}
