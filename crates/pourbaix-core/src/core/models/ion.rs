use super::composition::{Composition, CompositionError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const AQUEOUS_SUFFIX: &str = "(aq)";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum IonFormulaError {
    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error("Invalid charge '{charge}' in ion formula '{formula}'")]
    InvalidCharge { charge: String, formula: String },
}

/// A dissolved species: a composition plus an integer net charge.
///
/// Accepted notations: `MoO4[-2]`, `MoO4[2-]`, `Fe[+3]`, `Cu[+]`,
/// trailing sign runs such as `Fe+++`, and the neutral suffix `H2S(aq)`.
#[derive(Debug, Clone, PartialEq)]
pub struct IonFormula {
    name: String,
    composition: Composition,
    charge: i32,
}

impl IonFormula {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }
}

impl fmt::Display for IonFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for IonFormula {
    type Err = IonFormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let body = name.strip_suffix(AQUEOUS_SUFFIX).unwrap_or(name);
        let (body, charge) = split_charge(body, name)?;
        let composition: Composition = body.parse()?;
        Ok(Self {
            name: name.to_string(),
            composition,
            charge,
        })
    }
}

fn split_charge<'a>(body: &'a str, formula: &str) -> Result<(&'a str, i32), IonFormulaError> {
    if let Some(stripped) = body.strip_suffix(']') {
        if let Some(open) = stripped.rfind('[') {
            let charge_text = &stripped[open + 1..];
            if let Some(charge) = parse_charge(charge_text) {
                return Ok((&body[..open], charge));
            }
            if charge_text.contains(['+', '-']) {
                return Err(IonFormulaError::InvalidCharge {
                    charge: charge_text.to_string(),
                    formula: formula.to_string(),
                });
            }
        }
        return Ok((body, 0));
    }

    let trimmed = body.trim_end_matches(['+', '-']);
    let signs = &body[trimmed.len()..];
    if signs.is_empty() {
        return Ok((body, 0));
    }
    let charge = parse_charge(signs).ok_or_else(|| IonFormulaError::InvalidCharge {
        charge: signs.to_string(),
        formula: formula.to_string(),
    })?;
    Ok((trimmed, charge))
}

/// Parses `+2`, `-2`, `2+`, `2-`, `+`, `-`, `+++` and `--`.
fn parse_charge(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.chars().all(|c| c == '+') {
        return Some(text.len() as i32);
    }
    if text.chars().all(|c| c == '-') {
        return Some(-(text.len() as i32));
    }

    let sign_of = |c: char| match c {
        '+' => Some(1),
        '-' => Some(-1),
        _ => None,
    };
    let first = text.chars().next()?;
    let last = text.chars().last()?;
    let (sign, digits) = if let Some(sign) = sign_of(first) {
        (sign, &text[1..])
    } else if let Some(sign) = sign_of(last) {
        (sign, &text[..text.len() - 1])
    } else {
        return None;
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ion(s: &str) -> IonFormula {
        s.parse().unwrap()
    }

    #[test]
    fn parses_bracketed_charges_in_both_orders() {
        assert_eq!(ion("MoO4[-2]").charge(), -2);
        assert_eq!(ion("MoO4[2-]").charge(), -2);
        assert_eq!(ion("Fe[+3]").charge(), 3);
        assert_eq!(ion("Fe[3+]").charge(), 3);
        assert_eq!(ion("Cu[+]").charge(), 1);
    }

    #[test]
    fn parses_trailing_sign_runs() {
        let fe = ion("Fe+++");
        assert_eq!(fe.charge(), 3);
        assert_eq!(fe.composition().amount("Fe"), 1.0);

        let sulfate = ion("SO4--");
        assert_eq!(sulfate.charge(), -2);
        assert_eq!(sulfate.composition().amount("O"), 4.0);
    }

    #[test]
    fn aqueous_suffix_is_neutral() {
        let h2s = ion("H2S(aq)");
        assert_eq!(h2s.charge(), 0);
        assert_eq!(h2s.composition().amount("H"), 2.0);
        assert_eq!(h2s.name(), "H2S(aq)");
    }

    #[test]
    fn composition_excludes_the_charge_group() {
        let hmo = ion("HMoO4[-1]");
        assert_eq!(hmo.composition().amount("H"), 1.0);
        assert_eq!(hmo.composition().amount("Mo"), 1.0);
        assert_eq!(hmo.composition().amount("O"), 4.0);
        assert_eq!(hmo.composition().num_atoms(), 6.0);
    }

    #[test]
    fn bracketed_groups_that_are_not_charges_stay_in_the_composition() {
        let complex = ion("[Fe(CN)6][-4]");
        assert_eq!(complex.charge(), -4);
        assert_eq!(complex.composition().amount("C"), 6.0);

        let neutral = ion("K3[Fe(CN)6]");
        assert_eq!(neutral.charge(), 0);
        assert_eq!(neutral.composition().amount("K"), 3.0);
    }

    #[test]
    fn rejects_malformed_charges() {
        assert!(matches!(
            "Fe[+x]".parse::<IonFormula>(),
            Err(IonFormulaError::InvalidCharge { .. })
        ));
        assert!(matches!(
            "Fe+-".parse::<IonFormula>(),
            Err(IonFormulaError::InvalidCharge { .. })
        ));
        assert!(matches!(
            "Qq[+2]".parse::<IonFormula>(),
            Err(IonFormulaError::Composition(_))
        ));
    }
}
