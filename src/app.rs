//! # Application controller
//!
//! `App` owns everything the front end works with: the calculator, the substance
//! catalogue, the settings, the rows of the form and the results of the last
//! required-mass calculation (kept for export). The CLI gets `&mut App` and has no
//! state of its own.
//!
//! Two calculations are offered, in the order a user works at the bench:
//! 1) required masses for every row (`calculate_stock_requirements`);
//! 2) after weighing, actual concentrations, errors and corrections (`calculate_actual_results`).
use crate::Concentration::calc_error::{CalcError, CalcResult};
use crate::Concentration::calculator::{
    ConcentrationCalculator, CorrectionRequest, CorrectionResult, MassRequest, MassResult,
};
use crate::Concentration::formulas::FormulaSet;
use crate::export;
use crate::settings::Settings;
use crate::substances::SubstanceCatalogue;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of the form: a substance and what the user has typed in for it.
/// Empty fields are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRow {
    pub row_id: usize,
    pub substance_id: String,
    pub volume_ml: Option<f64>,
    pub target_concentration_m: Option<f64>,
    pub actual_mass_g: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRequirementRow {
    pub row_id: usize,
    pub substance_id: String,
    pub substance_name: String,
    pub volume_ml: Option<f64>,
    pub target_concentration_m: Option<f64>,
    pub molar_mass: f64,
    pub result: Option<MassResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualResultRow {
    pub row_id: usize,
    pub substance_id: String,
    pub substance_name: String,
    pub result: Option<CorrectionResult>,
    pub error: Option<String>,
}

// NaN makes the calculator report the field as missing
fn or_missing(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

#[derive(Debug)]
pub struct App {
    calculator: ConcentrationCalculator,
    catalogue: SubstanceCatalogue,
    settings: Settings,
    rows: Vec<FormRow>,
    next_row_id: usize,
    current_results: Vec<StockRequirementRow>,
}

impl App {
    pub fn new(settings: Settings, catalogue: SubstanceCatalogue) -> Self {
        let calculator = ConcentrationCalculator::new().with_precision(settings.precision());
        Self {
            calculator,
            catalogue,
            settings,
            rows: Vec::new(),
            next_row_id: 1,
            current_results: Vec::new(),
        }
    }

    /// App with the catalogue named in the settings, or the built-in one.
    pub fn from_settings(settings: Settings) -> CalcResult<Self> {
        let catalogue = match &settings.substance_catalogue {
            Some(path) => SubstanceCatalogue::load(path)?,
            None => SubstanceCatalogue::builtin(),
        };
        info!("app started with {} substances", catalogue.len());
        Ok(Self::new(settings, catalogue))
    }

    /// Replaces the formulas, e.g. for a special case; precision is kept.
    pub fn set_custom_formulas(&mut self, formulas: Box<dyn FormulaSet>) {
        let precision = self.calculator.precision;
        self.calculator = ConcentrationCalculator::with_formulas(formulas).with_precision(precision);
        info!("formulas replaced by '{}'", self.calculator.formulas_name());
    }

    /// Takes over changed settings. A different catalogue file is loaded and the form
    /// is cleared, since its rows point into the old catalogue.
    pub fn apply_settings(&mut self, settings: Settings) -> CalcResult<()> {
        if settings.substance_catalogue != self.settings.substance_catalogue {
            self.catalogue = match &settings.substance_catalogue {
                Some(path) => SubstanceCatalogue::load(path)?,
                None => SubstanceCatalogue::builtin(),
            };
            self.rows.clear();
            self.current_results.clear();
            info!("catalogue replaced, {} substances", self.catalogue.len());
        }
        self.calculator.precision = settings.precision();
        self.settings = settings;
        Ok(())
    }

    pub fn calculator(&self) -> &ConcentrationCalculator {
        &self.calculator
    }

    pub fn catalogue(&self) -> &SubstanceCatalogue {
        &self.catalogue
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn current_results(&self) -> &[StockRequirementRow] {
        &self.current_results
    }

    /// Adds a row for the substance; the target concentration is taken from the catalogue.
    pub fn add_row(&mut self, substance_id: &str) -> CalcResult<usize> {
        let substance = self.catalogue.get(substance_id)?;
        let row_id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.push(FormRow {
            row_id,
            substance_id: substance.id.clone(),
            volume_ml: None,
            target_concentration_m: substance.target_concentration,
            actual_mass_g: None,
        });
        Ok(row_id)
    }

    /// One row for every substance of the catalogue, returns their ids.
    pub fn add_all_substances(&mut self) -> Vec<usize> {
        let ids: Vec<String> = self.catalogue.iter().map(|s| s.id.clone()).collect();
        ids.iter().filter_map(|id| self.add_row(id).ok()).collect()
    }

    pub fn remove_row(&mut self, row_id: usize) -> CalcResult<()> {
        let before = self.rows.len();
        self.rows.retain(|r| r.row_id != row_id);
        if self.rows.len() == before {
            return Err(CalcError::invalid(format!("no row {}", row_id)));
        }
        Ok(())
    }

    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn row_mut(&mut self, row_id: usize) -> CalcResult<&mut FormRow> {
        self.rows
            .iter_mut()
            .find(|r| r.row_id == row_id)
            .ok_or_else(|| CalcError::invalid(format!("no row {}", row_id)))
    }

    pub fn set_volume(&mut self, row_id: usize, volume_ml: Option<f64>) -> CalcResult<()> {
        self.row_mut(row_id)?.volume_ml = volume_ml;
        Ok(())
    }

    /// same volume for every row
    pub fn set_volume_all(&mut self, volume_ml: Option<f64>) {
        for row in self.rows.iter_mut() {
            row.volume_ml = volume_ml;
        }
    }

    pub fn set_target(&mut self, row_id: usize, concentration_m: Option<f64>) -> CalcResult<()> {
        self.row_mut(row_id)?.target_concentration_m = concentration_m;
        Ok(())
    }

    pub fn set_actual_mass(&mut self, row_id: usize, mass_g: Option<f64>) -> CalcResult<()> {
        self.row_mut(row_id)?.actual_mass_g = mass_g;
        Ok(())
    }

    /// Required mass for every row. Rows with bad input get an error and do not stop
    /// the others. The result replaces the previous one and is what gets exported.
    pub fn calculate_stock_requirements(&mut self) -> CalcResult<&[StockRequirementRow]> {
        let mut requests = Vec::with_capacity(self.rows.len());
        let mut molar_masses = Vec::with_capacity(self.rows.len());
        let mut names = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let substance = self.catalogue.get(&row.substance_id)?;
            requests.push(MassRequest::new(
                or_missing(row.volume_ml),
                or_missing(row.target_concentration_m),
                substance.molar_mass,
            ));
            molar_masses.push(substance.molar_mass);
            names.push(substance.name.clone());
        }

        let items = self.calculator.calculate_batch(&requests);
        let results: Vec<StockRequirementRow> = self
            .rows
            .iter()
            .zip(items)
            .zip(molar_masses.into_iter().zip(names))
            .map(|((row, item), (molar_mass, substance_name))| StockRequirementRow {
                row_id: row.row_id,
                substance_id: row.substance_id.clone(),
                substance_name,
                volume_ml: row.volume_ml,
                target_concentration_m: row.target_concentration_m,
                molar_mass,
                result: item.result,
                error: item.error,
            })
            .collect();

        let failed = results.iter().filter(|r| r.error.is_some()).count();
        if failed > 0 {
            warn!("{} of {} rows could not be calculated", failed, results.len());
        }
        info!("required masses calculated for {} rows", results.len());
        self.current_results = results;
        Ok(&self.current_results)
    }

    /// Actual concentration, error and correction for every row, using the weighed
    /// masses and the tolerance from the settings. Errors are kept per row.
    pub fn calculate_actual_results(&self) -> CalcResult<Vec<ActualResultRow>> {
        let tolerance = self.settings.acceptable_error_percent;
        let mut results = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let substance = self.catalogue.get(&row.substance_id)?;
            let outcome = match row.actual_mass_g {
                None => Err(CalcError::invalid("missing actual mass")),
                Some(mass) => {
                    let request = CorrectionRequest::new(
                        or_missing(row.target_concentration_m),
                        mass,
                        or_missing(row.volume_ml),
                        substance.molar_mass,
                    )
                    .with_tolerance(tolerance);
                    self.calculator.calculate_complete_results(&request)
                }
            };
            let (result, error) = match outcome {
                Ok(result) => (Some(result), None),
                Err(e) => (None, Some(e.to_string())),
            };
            results.push(ActualResultRow {
                row_id: row.row_id,
                substance_id: row.substance_id.clone(),
                substance_name: substance.name.clone(),
                result,
                error,
            });
        }
        info!("actual concentrations calculated for {} rows", results.len());
        Ok(results)
    }

    /// Writes the last required-mass results to the export directory.
    pub fn export_results(&self) -> CalcResult<PathBuf> {
        export::export_results(&self.current_results, &self.settings.export_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    fn app() -> App {
        App::new(Settings::default(), SubstanceCatalogue::builtin())
    }

    #[test]
    fn test_rows() {
        let mut app = app();
        let ids = app.add_all_substances();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(app.rows()[1].target_concentration_m, Some(5e-4));
        assert!(matches!(
            app.add_row("unobtainium"),
            Err(CalcError::UnknownSubstance(_))
        ));
        app.remove_row(1).unwrap();
        assert!(app.remove_row(1).is_err());
        assert_eq!(app.rows().len(), 1);
        // ids are not reused
        assert_eq!(app.add_row("iptg").unwrap(), 3);
        assert!(app.set_volume(42, Some(1.0)).is_err());
    }

    #[test]
    fn test_stock_requirements_with_bad_row() {
        let mut app = app();
        app.add_all_substances();
        let third = app.add_row("iptg").unwrap();
        app.set_volume_all(Some(1000.0));
        app.set_target(2, None).unwrap();
        app.set_target(third, Some(1e-3)).unwrap();

        let results = app.calculate_stock_requirements().unwrap().to_vec();
        assert_eq!(results.len(), 3);
        assert_relative_eq!(
            results[0].result.as_ref().unwrap().required_mass_g,
            0.0014222,
            epsilon = 1e-12
        );
        assert!(results[1].result.is_none());
        assert!(results[1].error.as_ref().unwrap().contains("missing target concentration"));
        assert_relative_eq!(
            results[2].result.as_ref().unwrap().required_mass_g,
            0.2383,
            epsilon = 1e-9
        );
        assert_eq!(app.current_results().len(), 3);

        // a new calculation replaces the previous results
        app.remove_row(third).unwrap();
        app.calculate_stock_requirements().unwrap();
        assert_eq!(app.current_results().len(), 2);
    }

    #[test]
    fn test_actual_results() {
        let mut app = app();
        app.add_all_substances();
        app.set_volume_all(Some(1000.0));
        app.set_actual_mass(1, Some(0.00142)).unwrap();

        let results = app.calculate_actual_results().unwrap();
        assert_eq!(results.len(), 2);
        let retinal = results[0].result.as_ref().unwrap();
        assert!(retinal.is_acceptable);
        assert_relative_eq!(retinal.error_percent, -0.1547, epsilon = 1e-3);
        assert_eq!(results[1].error.as_deref(), Some("Invalid input: missing actual mass"));
    }

    #[test]
    fn test_tolerance_from_settings() {
        let settings = Settings {
            acceptable_error_percent: 0.1,
            ..Settings::default()
        };
        let mut app = App::new(settings, SubstanceCatalogue::builtin());
        let row = app.add_row("all-trans-retinal").unwrap();
        app.set_volume(row, Some(1000.0)).unwrap();
        app.set_actual_mass(row, Some(0.00142)).unwrap();
        let results = app.calculate_actual_results().unwrap();
        assert!(!results[0].result.as_ref().unwrap().is_acceptable);
    }

    #[test]
    fn test_apply_settings() {
        let dir = tempdir().unwrap();
        let catalogue = dir.path().join("substances.json");
        fs::write(
            &catalogue,
            r#"[{"id": "nacl", "name": "Sodium chloride", "formula": "NaCl"}]"#,
        )
        .unwrap();

        let mut app = app();
        app.add_all_substances();
        let settings = Settings {
            acceptable_error_percent: 0.1,
            mass_decimals: 2,
            ..Settings::default()
        };
        app.apply_settings(settings).unwrap();
        // same catalogue: the form survives
        assert_eq!(app.rows().len(), 2);
        assert_eq!(app.calculator().precision.mass_decimals, 2);
        assert_eq!(app.settings().acceptable_error_percent, 0.1);

        let settings = Settings {
            substance_catalogue: Some(catalogue),
            ..Settings::default()
        };
        app.apply_settings(settings).unwrap();
        assert!(app.rows().is_empty());
        assert_eq!(app.catalogue().len(), 1);
        assert!(app.add_row("nacl").is_ok());

        let broken = Settings {
            substance_catalogue: Some(dir.path().join("absent.json")),
            ..Settings::default()
        };
        assert!(app.apply_settings(broken).is_err());
        assert_eq!(app.catalogue().len(), 1);
    }

    struct Tenfold;
    impl FormulaSet for Tenfold {
        fn name(&self) -> &str {
            "tenfold"
        }
        fn required_mass(&self, volume_ml: f64, concentration_m: f64, molar_mass: f64) -> f64 {
            10.0 * concentration_m * molar_mass * volume_ml / 1000.0
        }
    }

    #[test]
    fn test_custom_formulas() {
        let mut app = app();
        let row = app.add_row("iptg").unwrap();
        app.set_volume(row, Some(100.0)).unwrap();
        app.set_custom_formulas(Box::new(Tenfold));
        assert_eq!(app.calculator().formulas_name(), "tenfold");
        let results = app.calculate_stock_requirements().unwrap();
        assert_relative_eq!(
            results[0].result.as_ref().unwrap().required_mass_g,
            0.11915,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_export() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            export_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let mut app = App::new(settings, SubstanceCatalogue::builtin());
        assert!(matches!(app.export_results(), Err(CalcError::NothingToExport)));

        app.add_all_substances();
        app.set_volume_all(Some(500.0));
        app.calculate_stock_requirements().unwrap();
        let path = app.export_results().unwrap();
        let json: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["substance_name"], "IPTG");
        assert_eq!(results[1]["result"]["formatted_mass"], "0.0596");
        assert!(results[1]["error"].is_null());
    }
}
