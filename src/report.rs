//! Terminal tables for the results
use crate::app::{ActualResultRow, StockRequirementRow};
use crate::substances::SubstanceCatalogue;
use prettytable::{Table, row};

fn optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => "-".to_string(),
    }
}

pub fn catalogue_table(catalogue: &SubstanceCatalogue) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "id",
        "name",
        "formula",
        "molar mass, g/mol",
        "stock, M",
        "target, M"
    ]);
    for s in catalogue.iter() {
        table.add_row(row![
            s.id,
            s.name,
            s.formula.as_deref().unwrap_or("-"),
            format!("{:.3}", s.molar_mass),
            optional(s.stock_concentration),
            optional(s.target_concentration)
        ]);
    }
    table
}

pub fn stock_table(rows: &[StockRequirementRow]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "row",
        "substance",
        "volume, ml",
        "target, M",
        "mass, g",
        "mass, mg"
    ]);
    for r in rows {
        match (&r.result, &r.error) {
            (Some(result), _) => table.add_row(row![
                r.row_id,
                r.substance_name,
                optional(r.volume_ml),
                optional(r.target_concentration_m),
                result.formatted_mass,
                result.formatted_mass_mg
            ]),
            (None, error) => table.add_row(row![
                r.row_id,
                r.substance_name,
                optional(r.volume_ml),
                optional(r.target_concentration_m),
                "error",
                error.as_deref().unwrap_or("-")
            ]),
        };
    }
    table
}

pub fn actual_table(rows: &[ActualResultRow]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "row",
        "substance",
        "actual, M",
        "error, %",
        "acceptable",
        "correction, ml",
        "recommendation"
    ]);
    for r in rows {
        match (&r.result, &r.error) {
            (Some(result), _) => table.add_row(row![
                r.row_id,
                r.substance_name,
                result.formatted_concentration,
                result.formatted_error,
                if result.is_acceptable { "yes" } else { "no" },
                format!("{:.2}", result.volume_correction_ml),
                result.recommendation
            ]),
            (None, error) => table.add_row(row![
                r.row_id,
                r.substance_name,
                "-",
                "-",
                "-",
                "-",
                error.as_deref().unwrap_or("-")
            ]),
        };
    }
    table
}
