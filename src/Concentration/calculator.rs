use super::calc_error::CalcResult;
use super::formulas::{
    DEFAULT_ACCEPTABLE_ERROR_PERCENT, FormulaSet, StandardFormulas, is_acceptable,
    require_non_negative, require_positive,
};
use super::units::MassUnit;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input of the required mass calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassRequest {
    pub volume_ml: f64,
    pub target_concentration_m: f64,
    pub molar_mass: f64,
}

impl MassRequest {
    pub fn new(volume_ml: f64, target_concentration_m: f64, molar_mass: f64) -> Self {
        Self {
            volume_ml,
            target_concentration_m,
            molar_mass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassResult {
    pub required_mass_g: f64,
    pub required_mass_mg: f64,
    pub formatted_mass: String,
    pub formatted_mass_mg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationResult {
    pub actual_concentration_m: f64,
    pub formatted_concentration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error_percent: f64,
    pub formatted_error: String,
    pub is_acceptable: bool,
    /// tolerance the error was compared with, %
    pub acceptable_range: f64,
}

/// Input of the correction calculation: what was required and what was actually weighed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRequest {
    pub required_concentration_m: f64,
    pub actual_mass_g: f64,
    pub volume_ml: f64,
    pub molar_mass: f64,
    pub acceptable_error_percent: f64,
}

impl CorrectionRequest {
    /// request with the default tolerance of 10 %
    pub fn new(
        required_concentration_m: f64,
        actual_mass_g: f64,
        volume_ml: f64,
        molar_mass: f64,
    ) -> Self {
        Self {
            required_concentration_m,
            actual_mass_g,
            volume_ml,
            molar_mass,
            acceptable_error_percent: DEFAULT_ACCEPTABLE_ERROR_PERCENT,
        }
    }

    pub fn with_tolerance(mut self, acceptable_error_percent: f64) -> Self {
        self.acceptable_error_percent = acceptable_error_percent;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub actual_concentration_m: f64,
    pub formatted_concentration: String,
    pub error_percent: f64,
    pub formatted_error: String,
    pub is_acceptable: bool,
    /// positive: ml of solvent to add, negative: shortfall expressed as volume
    pub volume_correction_ml: f64,
    pub recommendation: String,
}

/// One element of a batch. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub request: MassRequest,
    pub result: Option<MassResult>,
    pub error: Option<String>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}

/// number of decimal places used in formatted strings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Precision {
    pub mass_decimals: usize,
    pub concentration_decimals: usize,
    pub percent_decimals: usize,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            mass_decimals: 4,
            concentration_decimals: 6,
            percent_decimals: 2,
        }
    }
}

/// Calculator of masses and concentrations.
///
/// The formulas are injected at construction, by default [`StandardFormulas`] is used.
/// All methods are pure: the calculator keeps no results between calls.
pub struct ConcentrationCalculator {
    formulas: Box<dyn FormulaSet>,
    pub precision: Precision,
}

impl fmt::Debug for ConcentrationCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcentrationCalculator")
            .field("formulas", &self.formulas.name())
            .field("precision", &self.precision)
            .finish()
    }
}

impl Default for ConcentrationCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcentrationCalculator {
    pub fn new() -> Self {
        Self::with_formulas(Box::new(StandardFormulas))
    }

    pub fn with_formulas(formulas: Box<dyn FormulaSet>) -> Self {
        Self {
            formulas,
            precision: Precision::default(),
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn formulas_name(&self) -> &str {
        self.formulas.name()
    }

    /// mass of substance to weigh out for the given volume and target concentration
    pub fn calculate_required_mass(&self, request: &MassRequest) -> CalcResult<MassResult> {
        let volume_ml = require_positive("volume", request.volume_ml)?;
        let concentration = require_positive("target concentration", request.target_concentration_m)?;
        let molar_mass = require_positive("molar mass", request.molar_mass)?;

        let mass_g = self
            .formulas
            .required_mass(volume_ml, concentration, molar_mass);
        let mass_mg = MassUnit::Milligram.from_g(mass_g);
        Ok(MassResult {
            required_mass_g: mass_g,
            required_mass_mg: mass_mg,
            formatted_mass: format!("{:.*}", self.precision.mass_decimals, mass_g),
            formatted_mass_mg: format!("{:.2}", mass_mg),
        })
    }

    /// concentration actually reached with the weighed mass; zero mass is allowed
    pub fn calculate_actual_concentration(
        &self,
        actual_mass_g: f64,
        volume_ml: f64,
        molar_mass: f64,
    ) -> CalcResult<ConcentrationResult> {
        let actual_mass_g = require_non_negative("actual mass", actual_mass_g)?;
        let volume_ml = require_positive("volume", volume_ml)?;
        let molar_mass = require_positive("molar mass", molar_mass)?;

        let concentration = self
            .formulas
            .actual_concentration(actual_mass_g, volume_ml, molar_mass);
        Ok(ConcentrationResult {
            actual_concentration_m: concentration,
            formatted_concentration: format!(
                "{:.*}",
                self.precision.concentration_decimals, concentration
            ),
        })
    }

    pub fn calculate_error_percent(
        &self,
        required_value: f64,
        actual_value: f64,
        acceptable_error_percent: f64,
    ) -> ErrorResult {
        let error_percent = self.formulas.error_percent(required_value, actual_value);
        ErrorResult {
            error_percent,
            formatted_error: format!("{:.*}", self.precision.percent_decimals, error_percent),
            is_acceptable: is_acceptable(error_percent, acceptable_error_percent),
            acceptable_range: acceptable_error_percent,
        }
    }

    /// Actual concentration, error, acceptability and volume correction for the weighed mass.
    ///
    /// The steps run in this order and the first invalid input stops the calculation.
    pub fn calculate_complete_results(
        &self,
        request: &CorrectionRequest,
    ) -> CalcResult<CorrectionResult> {
        let required = require_positive(
            "required concentration",
            request.required_concentration_m,
        )?;
        require_non_negative("acceptable error", request.acceptable_error_percent)?;

        let actual = self.calculate_actual_concentration(
            request.actual_mass_g,
            request.volume_ml,
            request.molar_mass,
        )?;
        let error = self.calculate_error_percent(
            required,
            actual.actual_concentration_m,
            request.acceptable_error_percent,
        );
        let correction_ml = self.formulas.volume_correction(
            required,
            actual.actual_concentration_m,
            request.volume_ml,
        );

        Ok(CorrectionResult {
            actual_concentration_m: actual.actual_concentration_m,
            formatted_concentration: actual.formatted_concentration,
            error_percent: error.error_percent,
            formatted_error: error.formatted_error,
            is_acceptable: error.is_acceptable,
            volume_correction_ml: correction_ml,
            recommendation: if actual.actual_concentration_m == 0.0 {
                "Nothing weighed: no correction possible".to_string()
            } else {
                recommendation(correction_ml, request.volume_ml)
            },
        })
    }

    /// Required masses for several substances. A bad request is reported in its own
    /// item and the rest are still calculated; output order follows the input.
    pub fn calculate_batch(&self, requests: &[MassRequest]) -> Vec<BatchItem> {
        requests
            .iter()
            .enumerate()
            .map(|(i, request)| match self.calculate_required_mass(request) {
                Ok(result) => BatchItem {
                    request: *request,
                    result: Some(result),
                    error: None,
                },
                Err(e) => {
                    debug!("batch item {} rejected: {}", i, e);
                    BatchItem {
                        request: *request,
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect()
    }
}

/// text advice built from the sign and size of the volume correction
pub fn recommendation(volume_correction_ml: f64, volume_ml: f64) -> String {
    if volume_correction_ml > 0.0 {
        format!("Add ≈ {:.2} ml of buffer", volume_correction_ml)
    } else if volume_correction_ml < 0.0 {
        let shortfall = (volume_correction_ml / volume_ml * 100.0).abs();
        format!("Below target by {:.1}%: add more substance", shortfall)
    } else {
        "No correction needed".to_string()
    }
}
