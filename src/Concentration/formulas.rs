//! # Formulas
//!
//! Relations used by the calculator. Volume is always in ml, mass in g,
//! concentration in mol/l (M) and molar mass in g/mol.
//!
//! | quantity | formula |
//! |----------|---------|
//! | required mass, g | m = c * M * V / 1000 |
//! | actual concentration, M | c = m * 1000 / (M * V) |
//! | error, % | (c_actual - c_required) / c_required * 100 |
//! | volume correction, ml | V * (c_actual / c_required - 1) |
//!
//! The volume correction assumes the prepared solution is diluted as a whole:
//! a positive value is the volume of solvent to add, a negative value means the
//! solution is below target and cannot be fixed by dilution.
use super::calc_error::{CalcError, CalcResult};

/// tolerance used when the caller does not provide one, %
pub const DEFAULT_ACCEPTABLE_ERROR_PERCENT: f64 = 10.0;

/// Bundle of formulas used by [`super::calculator::ConcentrationCalculator`].
///
/// Every method has the standard implementation, so a custom set only overrides
/// what it needs. Methods do plain arithmetic, validation of inputs is done by the caller.
pub trait FormulaSet {
    /// short name shown in logs and in the CLI
    fn name(&self) -> &str {
        "standard"
    }

    fn required_mass(&self, volume_ml: f64, concentration_m: f64, molar_mass: f64) -> f64 {
        concentration_m * molar_mass * volume_ml / 1000.0
    }

    fn actual_concentration(&self, actual_mass_g: f64, volume_ml: f64, molar_mass: f64) -> f64 {
        (actual_mass_g * 1000.0) / (molar_mass * volume_ml)
    }

    /// zero required value gives zero error instead of division by zero
    fn error_percent(&self, required_value: f64, actual_value: f64) -> f64 {
        if required_value == 0.0 {
            return 0.0;
        }
        (actual_value - required_value) / required_value * 100.0
    }

    /// a solution with zero concentration cannot be corrected by dilution, so 0 is returned
    fn volume_correction(
        &self,
        required_concentration: f64,
        actual_concentration: f64,
        volume_ml: f64,
    ) -> f64 {
        if actual_concentration == 0.0 {
            return 0.0;
        }
        volume_ml * (actual_concentration / required_concentration - 1.0)
    }
}

/// default formulas
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormulas;

impl FormulaSet for StandardFormulas {}

/// value must be finite and strictly positive
pub fn require_positive(name: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid(format!("missing {}", name)));
    }
    if value <= 0.0 {
        return Err(CalcError::invalid(format!(
            "non-positive {}: {}",
            name, value
        )));
    }
    Ok(value)
}

/// value must be finite and not negative, zero is allowed
pub fn require_non_negative(name: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid(format!("missing {}", name)));
    }
    if value < 0.0 {
        return Err(CalcError::invalid(format!("negative {}: {}", name, value)));
    }
    Ok(value)
}

/// mass of substance in g needed to get `target_concentration_m` in `volume_ml`
pub fn required_mass(
    volume_ml: f64,
    target_concentration_m: f64,
    molar_mass: f64,
) -> CalcResult<f64> {
    require_positive("volume", volume_ml)?;
    require_positive("target concentration", target_concentration_m)?;
    require_positive("molar mass", molar_mass)?;
    Ok(StandardFormulas.required_mass(volume_ml, target_concentration_m, molar_mass))
}

/// concentration in M obtained after dissolving `actual_mass_g` in `volume_ml`
pub fn actual_concentration(actual_mass_g: f64, volume_ml: f64, molar_mass: f64) -> CalcResult<f64> {
    require_non_negative("actual mass", actual_mass_g)?;
    require_positive("volume", volume_ml)?;
    require_positive("molar mass", molar_mass)?;
    Ok(StandardFormulas.actual_concentration(actual_mass_g, volume_ml, molar_mass))
}

pub fn error_percent(required_value: f64, actual_value: f64) -> f64 {
    StandardFormulas.error_percent(required_value, actual_value)
}

pub fn is_acceptable(error_percent: f64, tolerance_percent: f64) -> bool {
    error_percent.abs() <= tolerance_percent
}

pub fn volume_correction(
    required_concentration: f64,
    actual_concentration: f64,
    volume_ml: f64,
) -> f64 {
    StandardFormulas.volume_correction(required_concentration, actual_concentration, volume_ml)
}
