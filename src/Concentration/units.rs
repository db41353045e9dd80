use super::calc_error::{CalcError, CalcResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// units of volume; the calculator works in ml
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeUnit {
    Milliliter,
    Liter,
}

impl VolumeUnit {
    /// how many ml in one unit
    pub fn factor(&self) -> f64 {
        match self {
            VolumeUnit::Milliliter => 1.0,
            VolumeUnit::Liter => 1000.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "ml",
            VolumeUnit::Liter => "l",
        }
    }

    pub fn to_ml(&self, value: f64) -> f64 {
        value * self.factor()
    }
}

impl FromStr for VolumeUnit {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" | "мл" => Ok(VolumeUnit::Milliliter),
            "l" | "л" => Ok(VolumeUnit::Liter),
            other => Err(CalcError::invalid(format!("unknown volume unit: {}", other))),
        }
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// units of mass; the calculator works in g
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassUnit {
    Gram,
    Milligram,
}

impl MassUnit {
    /// how many units in one gram
    pub fn factor(&self) -> f64 {
        match self {
            MassUnit::Gram => 1.0,
            MassUnit::Milligram => 1000.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MassUnit::Gram => "g",
            MassUnit::Milligram => "mg",
        }
    }

    pub fn to_g(&self, value: f64) -> f64 {
        value / self.factor()
    }

    pub fn from_g(&self, grams: f64) -> f64 {
        grams * self.factor()
    }
}

impl FromStr for MassUnit {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" | "г" => Ok(MassUnit::Gram),
            "mg" | "мг" => Ok(MassUnit::Milligram),
            other => Err(CalcError::invalid(format!("unknown mass unit: {}", other))),
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// units of molar concentration; the calculator works in M (mol/l)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcentrationUnit {
    Molar,
    Millimolar,
    Micromolar,
    Nanomolar,
}

impl ConcentrationUnit {
    /// how many M in one unit
    pub fn factor(&self) -> f64 {
        match self {
            ConcentrationUnit::Molar => 1.0,
            ConcentrationUnit::Millimolar => 1e-3,
            ConcentrationUnit::Micromolar => 1e-6,
            ConcentrationUnit::Nanomolar => 1e-9,
        }
    }

    pub fn to_molar(&self, value: f64) -> f64 {
        value * self.factor()
    }
}

impl FromStr for ConcentrationUnit {
    type Err = CalcError;
    // case matters here: "mM" is not "MM"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" | "mol/l" | "mol/L" => Ok(ConcentrationUnit::Molar),
            "mM" => Ok(ConcentrationUnit::Millimolar),
            "uM" | "µM" | "μM" => Ok(ConcentrationUnit::Micromolar),
            "nM" => Ok(ConcentrationUnit::Nanomolar),
            other => Err(CalcError::invalid(format!(
                "unknown concentration unit: {}",
                other
            ))),
        }
    }
}

fn quantity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*([^\s\d]*)\s*$")
            .expect("quantity regex is valid")
    })
}

/// splits "250 ml", "0.5l" or "12" into the number and the (possibly empty) unit
fn split_quantity(input: &str) -> CalcResult<(f64, String)> {
    let caps = quantity_regex()
        .captures(input)
        .ok_or_else(|| CalcError::invalid(format!("not a number: '{}'", input.trim())))?;
    let value: f64 = caps[1]
        .parse()
        .map_err(|_| CalcError::invalid(format!("not a number: '{}'", &caps[1])))?;
    Ok((value, caps[2].to_string()))
}

/// volume in ml from user input; a bare number is taken as ml
pub fn parse_volume_ml(input: &str) -> CalcResult<f64> {
    let (value, unit) = split_quantity(input)?;
    if unit.is_empty() {
        return Ok(value);
    }
    Ok(unit.parse::<VolumeUnit>()?.to_ml(value))
}

/// mass in g from user input; a bare number is taken as g
pub fn parse_mass_g(input: &str) -> CalcResult<f64> {
    let (value, unit) = split_quantity(input)?;
    if unit.is_empty() {
        return Ok(value);
    }
    Ok(unit.parse::<MassUnit>()?.to_g(value))
}

/// concentration in M from user input; a bare number is taken as M
pub fn parse_concentration_m(input: &str) -> CalcResult<f64> {
    let (value, unit) = split_quantity(input)?;
    if unit.is_empty() {
        return Ok(value);
    }
    Ok(unit.parse::<ConcentrationUnit>()?.to_molar(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_factors() {
        assert_eq!(VolumeUnit::Liter.to_ml(0.25), 250.0);
        assert_eq!(VolumeUnit::Milliliter.to_ml(12.0), 12.0);
        assert_relative_eq!(MassUnit::Milligram.to_g(1.42), 0.00142, epsilon = 1e-15);
        assert_eq!(MassUnit::Milligram.from_g(0.5), 500.0);
        assert_eq!("ML".parse::<VolumeUnit>().unwrap(), VolumeUnit::Milliliter);
        assert_eq!("мг".parse::<MassUnit>().unwrap(), MassUnit::Milligram);
        assert!("kg".parse::<MassUnit>().is_err());
    }

    #[test]
    fn test_parse_quantities() {
        assert_eq!(parse_volume_ml("250").unwrap(), 250.0);
        assert_eq!(parse_volume_ml(" 0.5 l ").unwrap(), 500.0);
        assert_eq!(parse_volume_ml("1e3ml").unwrap(), 1000.0);
        assert_relative_eq!(parse_mass_g("1.42 mg").unwrap(), 0.00142, epsilon = 1e-15);
        assert_eq!(parse_mass_g("0").unwrap(), 0.0);
        assert!(parse_volume_ml("abc").is_err());
        assert!(parse_volume_ml("10 gallons").is_err());
        assert!(parse_mass_g("").is_err());
    }

    #[test]
    fn test_parse_concentration() {
        assert_eq!(parse_concentration_m("0.5").unwrap(), 0.5);
        assert_relative_eq!(parse_concentration_m("5 µM").unwrap(), 5e-6, epsilon = 1e-18);
        assert_relative_eq!(parse_concentration_m("0.5mM").unwrap(), 5e-4, epsilon = 1e-15);
        assert_relative_eq!(parse_concentration_m("5e-3 mol/l").unwrap(), 5e-3, epsilon = 1e-15);
        assert!(parse_concentration_m("5 MM").is_err());
    }
}
