//! # Substance catalogue
//!
//! Reference data about the substances the user prepares solutions of: display name,
//! molar mass and optional stock and target concentrations. The catalogue is loaded once
//! at start and never changed afterwards.
//!
//! ## File format
//! ```json
//! [
//!   { "id": "iptg", "name": "IPTG", "formula": "C9H18O5S",
//!     "stock_concentration": 1.0, "target_concentration": 5e-4 },
//!   { "id": "all-trans-retinal", "name": "all-trans-retinal", "molar_mass": 284.44,
//!     "stock_concentration": 5e-3, "target_concentration": 5e-6 }
//! ]
//! ```
//! When `molar_mass` is omitted it is calculated from `formula`.
use crate::Concentration::calc_error::{CalcError, CalcResult};
use crate::Concentration::formulas::require_positive;
use crate::Concentration::molmass::calculate_molar_mass;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstanceSpec {
    pub id: String,
    pub name: String,
    /// g/mol
    pub molar_mass: f64,
    /// M
    pub stock_concentration: Option<f64>,
    /// M
    pub target_concentration: Option<f64>,
    pub formula: Option<String>,
}

/// record as it is written in the catalogue file
#[derive(Debug, Clone, Deserialize)]
struct SubstanceEntry {
    id: String,
    name: Option<String>,
    molar_mass: Option<f64>,
    formula: Option<String>,
    stock_concentration: Option<f64>,
    target_concentration: Option<f64>,
}

impl SubstanceEntry {
    fn into_spec(self) -> CalcResult<SubstanceSpec> {
        if self.id.trim().is_empty() {
            return Err(CalcError::invalid("substance without id"));
        }
        let molar_mass = match (self.molar_mass, &self.formula) {
            (Some(mw), formula) => {
                if let Some(formula) = formula {
                    if let Ok(from_formula) = calculate_molar_mass(formula) {
                        if (from_formula - mw).abs() / mw > 0.01 {
                            warn!(
                                "{}: molar mass {} differs from {:.3} calculated for {}",
                                self.id, mw, from_formula, formula
                            );
                        }
                    }
                }
                mw
            }
            (None, Some(formula)) => calculate_molar_mass(formula)?,
            (None, None) => {
                return Err(CalcError::invalid(format!(
                    "{}: neither molar mass nor formula given",
                    self.id
                )));
            }
        };
        require_positive(&format!("molar mass of {}", self.id), molar_mass)?;
        for c in [self.stock_concentration, self.target_concentration]
            .into_iter()
            .flatten()
        {
            require_positive(&format!("concentration of {}", self.id), c)?;
        }
        Ok(SubstanceSpec {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            molar_mass,
            stock_concentration: self.stock_concentration,
            target_concentration: self.target_concentration,
            formula: self.formula,
        })
    }
}

/// read-only list of substances, order as in the source
#[derive(Debug, Clone, PartialEq)]
pub struct SubstanceCatalogue {
    substances: Vec<SubstanceSpec>,
}

impl Default for SubstanceCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SubstanceCatalogue {
    /// substances shipped with the program
    pub fn builtin() -> Self {
        Self {
            substances: vec![
                SubstanceSpec {
                    id: "all-trans-retinal".to_string(),
                    name: "all-trans-retinal".to_string(),
                    molar_mass: 284.44,
                    stock_concentration: Some(5e-3),
                    target_concentration: Some(5e-6),
                    formula: Some("C20H28O".to_string()),
                },
                SubstanceSpec {
                    id: "iptg".to_string(),
                    name: "IPTG".to_string(),
                    molar_mass: 238.3,
                    stock_concentration: Some(1.0),
                    target_concentration: Some(5e-4),
                    formula: Some("C9H18O5S".to_string()),
                },
            ],
        }
    }

    pub fn from_json_str(content: &str) -> CalcResult<Self> {
        let entries: Vec<SubstanceEntry> = serde_json::from_str(content)?;
        let mut seen = HashSet::new();
        let mut substances = Vec::with_capacity(entries.len());
        for entry in entries {
            if !seen.insert(entry.id.clone()) {
                return Err(CalcError::invalid(format!("duplicate substance id: {}", entry.id)));
            }
            substances.push(entry.into_spec()?);
        }
        Ok(Self { substances })
    }

    pub fn load(path: &Path) -> CalcResult<Self> {
        let content = fs::read_to_string(path)?;
        let catalogue = Self::from_json_str(&content)?;
        info!(
            "loaded {} substances from {}",
            catalogue.len(),
            path.display()
        );
        Ok(catalogue)
    }

    pub fn get(&self, id: &str) -> CalcResult<&SubstanceSpec> {
        self.substances
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CalcError::UnknownSubstance(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubstanceSpec> {
        self.substances.iter()
    }

    pub fn len(&self) -> usize {
        self.substances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substances.is_empty()
    }
}
