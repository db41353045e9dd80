//! Atomic composition and molar mass of a chemical formula.
//!
//! Supported notation: element symbols with counts (`C9H18O5S`), nested groups in
//! round or square brackets (`Ca(NO3)2`, `K4[Fe(CN)6]`), hydrates separated by `·` or `*`
//! with a leading coefficient (`CuSO4·5H2O`) and a trailing phase mark (`NaCl(s)`, `H2O(l)`).
use super::calc_error::{CalcError, CalcResult};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// standard atomic weights, g/mol
const ATOMIC_MASSES: &[(&str, f64)] = &[
    ("H", 1.008),
    ("He", 4.0026),
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.180),
    ("Na", 22.990),
    ("Mg", 24.305),
    ("Al", 26.982),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.065),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.098),
    ("Ca", 40.078),
    ("Ti", 47.867),
    ("V", 50.942),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.693),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("As", 74.922),
    ("Se", 78.971),
    ("Br", 79.904),
    ("Rb", 85.468),
    ("Sr", 87.62),
    ("Mo", 95.95),
    ("Ag", 107.87),
    ("Cd", 112.41),
    ("Sn", 118.71),
    ("I", 126.90),
    ("Cs", 132.91),
    ("Ba", 137.33),
    ("Gd", 157.25),
    ("W", 183.84),
    ("Pt", 195.08),
    ("Au", 196.97),
    ("Hg", 200.59),
    ("Pb", 207.2),
];

pub fn atomic_mass(symbol: &str) -> Option<f64> {
    ATOMIC_MASSES
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, mass)| *mass)
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z][a-z]?|\d+|[()\[\]]").expect("token regex is valid"))
}

fn phase_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // lowercase only, "(Cr)" or "(S)" are element groups
    RE.get_or_init(|| Regex::new(r"\((?:s|l|g|aq|c|cr)\)$").expect("phase regex is valid"))
}

// count after an element or a closing bracket, 1 if there is none
fn read_count(tokens: &[&str], i: &mut usize) -> CalcResult<usize> {
    match tokens.get(*i) {
        Some(t) if t.chars().all(|c| c.is_ascii_digit()) => {
            *i += 1;
            t.parse()
                .map_err(|_| CalcError::invalid(format!("bad count: {}", t)))
        }
        _ => Ok(1),
    }
}

fn add_atoms(into: &mut HashMap<String, usize>, element: String, n: usize) -> CalcResult<()> {
    let count = into.entry(element).or_insert(0);
    *count = count
        .checked_add(n)
        .ok_or_else(|| CalcError::invalid("count overflow in formula"))?;
    Ok(())
}

fn add_counts(
    into: &mut HashMap<String, usize>,
    from: HashMap<String, usize>,
    times: usize,
) -> CalcResult<()> {
    for (element, n) in from {
        let n = n
            .checked_mul(times)
            .ok_or_else(|| CalcError::invalid("count overflow in formula"))?;
        add_atoms(into, element, n)?;
    }
    Ok(())
}

fn parse_part(part: &str) -> CalcResult<HashMap<String, usize>> {
    let tokens: Vec<&str> = token_regex().find_iter(part).map(|m| m.as_str()).collect();
    let covered: usize = tokens.iter().map(|t| t.len()).sum();
    if covered != part.len() {
        return Err(CalcError::invalid(format!(
            "unexpected characters in formula: {}",
            part
        )));
    }

    let mut stack: Vec<HashMap<String, usize>> = vec![HashMap::new()];
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        i += 1;
        match token {
            "(" | "[" => stack.push(HashMap::new()),
            ")" | "]" => {
                if stack.len() < 2 {
                    return Err(CalcError::invalid(format!("unbalanced brackets: {}", part)));
                }
                let group = stack.pop().unwrap_or_default();
                let times = read_count(&tokens, &mut i)?;
                if let Some(top) = stack.last_mut() {
                    add_counts(top, group, times)?;
                }
            }
            t if t.chars().all(|c| c.is_ascii_digit()) => {
                return Err(CalcError::invalid(format!(
                    "unexpected number {} in formula: {}",
                    t, part
                )));
            }
            symbol => {
                if atomic_mass(symbol).is_none() {
                    return Err(CalcError::invalid(format!("unknown element: {}", symbol)));
                }
                let n = read_count(&tokens, &mut i)?;
                if let Some(top) = stack.last_mut() {
                    add_atoms(top, symbol.to_string(), n)?;
                }
            }
        }
    }
    if stack.len() != 1 {
        return Err(CalcError::invalid(format!("unbalanced brackets: {}", part)));
    }
    Ok(stack.pop().unwrap_or_default())
}

/// number of atoms of every element in the formula
pub fn parse_formula(formula: &str) -> CalcResult<HashMap<String, usize>> {
    let formula: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
    let formula = phase_regex().replace(&formula, "").to_string();
    if formula.is_empty() {
        return Err(CalcError::invalid("missing formula"));
    }

    let mut counts = HashMap::new();
    for part in formula.split(['·', '*']) {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        let body = &part[digits.len()..];
        if body.is_empty() {
            return Err(CalcError::invalid(format!("empty part in formula: {}", formula)));
        }
        let coefficient = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| CalcError::invalid(format!("bad coefficient: {}", digits)))?
        };
        add_counts(&mut counts, parse_part(body)?, coefficient)?;
    }
    Ok(counts)
}

/// molar mass in g/mol
pub fn calculate_molar_mass(formula: &str) -> CalcResult<f64> {
    let counts = parse_formula(formula)?;
    let mut molar_mass = 0.0;
    for (element, n) in counts {
        // parse_formula only lets known elements through
        let mass = atomic_mass(&element)
            .ok_or_else(|| CalcError::invalid(format!("unknown element: {}", element)))?;
        molar_mass += mass * n as f64;
    }
    Ok(molar_mass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_formula() {
        let expected = HashMap::from([
            ("C".to_string(), 6),
            ("H".to_string(), 8),
            ("O".to_string(), 6),
        ]);
        assert_eq!(parse_formula("C6H8O6").unwrap(), expected);

        let expected = HashMap::from([
            ("Na".to_string(), 1),
            ("N".to_string(), 2),
            ("O".to_string(), 6),
        ]);
        assert_eq!(parse_formula("Na(NO3)2").unwrap(), expected);

        let expected = HashMap::from([
            ("K".to_string(), 4),
            ("Fe".to_string(), 1),
            ("C".to_string(), 6),
            ("N".to_string(), 6),
        ]);
        assert_eq!(parse_formula("K4[Fe(CN)6]").unwrap(), expected);

        let expected = HashMap::from([("H".to_string(), 2), ("O".to_string(), 1)]);
        assert_eq!(parse_formula("H2O(l)").unwrap(), expected);
    }

    #[test]
    fn test_hydrate() {
        let counts = parse_formula("CuSO4·5H2O").unwrap();
        assert_eq!(counts["Cu"], 1);
        assert_eq!(counts["H"], 10);
        assert_eq!(counts["O"], 9);
        assert_relative_eq!(
            calculate_molar_mass("CuSO4*5H2O").unwrap(),
            249.68,
            epsilon = 1e-1
        );
    }

    #[test]
    fn test_calculate_molar_mass() {
        // IPTG
        assert_relative_eq!(calculate_molar_mass("C9H18O5S").unwrap(), 238.3, epsilon = 1e-2);
        // all-trans-retinal
        assert_relative_eq!(calculate_molar_mass("C20H28O").unwrap(), 284.44, epsilon = 1e-2);
        assert_relative_eq!(calculate_molar_mass("NaCl").unwrap(), 58.44, epsilon = 1e-2);
        assert_relative_eq!(calculate_molar_mass("Ca(NO3)2").unwrap(), 164.09, epsilon = 1e-2);
    }

    #[test]
    fn test_bad_formulas() {
        assert!(parse_formula("").is_err());
        assert!(parse_formula("Xx2").is_err());
        assert!(parse_formula("Ca(NO3").is_err());
        assert!(parse_formula("CaNO3)2").is_err());
        assert!(parse_formula("H2O-").is_err());
        assert!(parse_formula("CuSO4·").is_err());
        assert!(matches!(
            calculate_molar_mass("Qq"),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_huge_counts() {
        let big = usize::MAX.to_string();
        assert!(matches!(
            calculate_molar_mass(&format!("(C{})2", big)),
            Err(CalcError::InvalidInput(msg)) if msg.contains("overflow")
        ));
        assert!(matches!(
            calculate_molar_mass(&format!("C{}C", big)),
            Err(CalcError::InvalidInput(msg)) if msg.contains("overflow")
        ));
        assert!(matches!(
            calculate_molar_mass(&format!("2C{}", big)),
            Err(CalcError::InvalidInput(msg)) if msg.contains("overflow")
        ));
    }

    #[test]
    fn test_phase_marks_and_element_groups() {
        assert_relative_eq!(calculate_molar_mass("NaCl(s)").unwrap(), 58.44, epsilon = 1e-2);
        assert_relative_eq!(calculate_molar_mass("NaCl(aq)").unwrap(), 58.44, epsilon = 1e-2);
        assert_relative_eq!(calculate_molar_mass("Pb(Cr)").unwrap(), 259.196, epsilon = 1e-3);
        assert_relative_eq!(calculate_molar_mass("Ba(S)").unwrap(), 169.395, epsilon = 1e-3);
    }
}
