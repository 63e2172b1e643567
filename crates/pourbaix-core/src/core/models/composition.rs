use super::element::{self, formula_order};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const AMOUNT_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum CompositionError {
    #[error("Formula is empty")]
    Empty,

    #[error("Unknown element symbol '{symbol}' in formula '{formula}'")]
    UnknownElement { symbol: String, formula: String },

    #[error("Unbalanced group in formula '{0}'")]
    Unbalanced(String),

    #[error("Unexpected character '{character}' at position {position} in formula '{formula}'")]
    UnexpectedCharacter {
        character: char,
        position: usize,
        formula: String,
    },

    #[error("Invalid amount '{amount}' in formula '{formula}'")]
    InvalidAmount { amount: String, formula: String },

    #[error("Negative amount {amount} for element '{symbol}'")]
    NegativeAmount { symbol: String, amount: f64 },
}

/// An immutable mapping from element symbol to stoichiometric amount.
///
/// Amounts are kept in a sorted map so iteration order, and therefore every
/// derived quantity, is deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Composition {
    amounts: BTreeMap<String, f64>,
}

impl Composition {
    /// Builds a composition from `(symbol, amount)` pairs, summing repeats.
    pub fn from_amounts<I, S>(amounts: I) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut map: BTreeMap<String, f64> = BTreeMap::new();
        for (symbol, amount) in amounts {
            let symbol = symbol.into();
            if !element::is_element(&symbol) {
                return Err(CompositionError::UnknownElement {
                    formula: symbol.clone(),
                    symbol,
                });
            }
            if amount < 0.0 {
                return Err(CompositionError::NegativeAmount { symbol, amount });
            }
            *map.entry(symbol).or_insert(0.0) += amount;
        }
        map.retain(|_, v| *v > AMOUNT_TOLERANCE);
        Ok(Self { amounts: map })
    }

    pub fn amount(&self, symbol: &str) -> f64 {
        self.amounts.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.amounts.contains_key(symbol)
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.amounts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn num_atoms(&self) -> f64 {
        self.amounts.values().sum()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            amounts: self
                .amounts
                .iter()
                .map(|(k, v)| (k.clone(), v * factor))
                .collect(),
        }
    }

    /// Divides every amount by the greatest common divisor when all amounts
    /// are integral; otherwise the composition is already reduced.
    pub fn reduced_composition_and_factor(&self) -> (Self, f64) {
        let integral: Option<Vec<u64>> = self
            .amounts
            .values()
            .map(|&v| {
                let r = v.round();
                ((v - r).abs() < AMOUNT_TOLERANCE && r >= 1.0).then_some(r as u64)
            })
            .collect();

        match integral {
            Some(values) if !values.is_empty() => {
                let divisor = values.into_iter().fold(0, gcd).max(1) as f64;
                (self.scaled(1.0 / divisor), divisor)
            }
            _ => (self.clone(), 1.0),
        }
    }

    pub fn reduced_formula(&self) -> String {
        self.reduced_composition_and_factor().0.formula()
    }

    /// Hill-like formula with elements ordered by electronegativity.
    pub fn formula(&self) -> String {
        let mut symbols: Vec<&str> = self.elements().collect();
        symbols.sort_by(|a, b| formula_order(a, b));
        symbols
            .into_iter()
            .map(|s| format!("{}{}", s, format_amount(self.amount(s))))
            .collect()
    }

    /// Alphabetically sorted element symbols joined by `-`, e.g. `Mo-S`.
    pub fn chemical_system(&self) -> String {
        self.elements().collect::<Vec<_>>().join("-")
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formula())
    }
}

impl FromStr for Composition {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let formula = s.trim();
        if formula.is_empty() {
            return Err(CompositionError::Empty);
        }
        let chars: Vec<char> = formula.chars().collect();
        let mut parser = FormulaParser {
            chars: &chars,
            pos: 0,
            formula,
        };
        let amounts = parser.parse_group(None)?;
        let composition = Composition::from_amounts(amounts)?;
        if composition.is_empty() {
            return Err(CompositionError::Empty);
        }
        Ok(composition)
    }
}

struct FormulaParser<'a> {
    chars: &'a [char],
    pos: usize,
    formula: &'a str,
}

impl FormulaParser<'_> {
    fn parse_group(&mut self, closing: Option<char>) -> Result<Vec<(String, f64)>, CompositionError> {
        let mut amounts = Vec::new();
        loop {
            let Some(&c) = self.chars.get(self.pos) else {
                if closing.is_some() {
                    return Err(CompositionError::Unbalanced(self.formula.to_string()));
                }
                return Ok(amounts);
            };

            match c {
                c if c.is_ascii_uppercase() => {
                    let symbol = self.read_symbol();
                    if !element::is_element(&symbol) {
                        return Err(CompositionError::UnknownElement {
                            symbol,
                            formula: self.formula.to_string(),
                        });
                    }
                    let amount = self.read_amount()?;
                    amounts.push((symbol, amount));
                }
                '(' | '[' => {
                    self.pos += 1;
                    let inner = self.parse_group(Some(if c == '(' { ')' } else { ']' }))?;
                    let multiplier = self.read_amount()?;
                    amounts.extend(inner.into_iter().map(|(s, a)| (s, a * multiplier)));
                }
                c if Some(c) == closing => {
                    self.pos += 1;
                    return Ok(amounts);
                }
                ')' | ']' => {
                    return Err(CompositionError::Unbalanced(self.formula.to_string()));
                }
                c if c.is_whitespace() => self.pos += 1,
                other => {
                    return Err(CompositionError::UnexpectedCharacter {
                        character: other,
                        position: self.pos,
                        formula: self.formula.to_string(),
                    });
                }
            }
        }
    }

    fn read_symbol(&mut self) -> String {
        let mut symbol = String::new();
        symbol.push(self.chars[self.pos]);
        self.pos += 1;
        while let Some(&c) = self.chars.get(self.pos) {
            if !c.is_ascii_lowercase() {
                break;
            }
            symbol.push(c);
            self.pos += 1;
        }
        symbol
    }

    fn read_amount(&mut self) -> Result<f64, CompositionError> {
        let start = self.pos;
        while let Some(&c) = self.chars.get(self.pos) {
            if !(c.is_ascii_digit() || c == '.') {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(1.0);
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map_err(|_| CompositionError::InvalidAmount {
                amount: text.clone(),
                formula: self.formula.to_string(),
            })
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    if (amount - rounded).abs() < AMOUNT_TOLERANCE {
        if rounded == 1.0 {
            String::new()
        } else {
            format!("{}", rounded as i64)
        }
    } else {
        let text = format!("{:.4}", amount);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_binary_formula() {
        let comp: Composition = "MoS2".parse().unwrap();
        assert_eq!(comp.amount("Mo"), 1.0);
        assert_eq!(comp.amount("S"), 2.0);
        assert_eq!(comp.num_atoms(), 3.0);
    }

    #[test]
    fn parses_nested_groups_with_multipliers() {
        let comp: Composition = "Mo(SO4)2".parse().unwrap();
        assert_eq!(comp.amount("Mo"), 1.0);
        assert_eq!(comp.amount("S"), 2.0);
        assert_eq!(comp.amount("O"), 8.0);

        let comp: Composition = "K3[Fe(CN)6]".parse().unwrap();
        assert_eq!(comp.amount("Fe"), 1.0);
        assert_eq!(comp.amount("C"), 6.0);
        assert_eq!(comp.amount("N"), 6.0);
        assert_eq!(comp.amount("K"), 3.0);
    }

    #[test]
    fn parses_decimal_amounts_and_repeated_elements() {
        let comp: Composition = "Mo0.5S".parse().unwrap();
        assert_eq!(comp.amount("Mo"), 0.5);

        let comp: Composition = "HOH".parse().unwrap();
        assert_eq!(comp.amount("H"), 2.0);
        assert_eq!(comp.amount("O"), 1.0);
    }

    #[test]
    fn rejects_malformed_formulas() {
        assert_eq!("".parse::<Composition>(), Err(CompositionError::Empty));
        assert!(matches!(
            "Xx2".parse::<Composition>(),
            Err(CompositionError::UnknownElement { .. })
        ));
        assert!(matches!(
            "Mo(S2".parse::<Composition>(),
            Err(CompositionError::Unbalanced(_))
        ));
        assert!(matches!(
            "MoS2)".parse::<Composition>(),
            Err(CompositionError::Unbalanced(_))
        ));
        assert!(matches!(
            "Mo-S2".parse::<Composition>(),
            Err(CompositionError::UnexpectedCharacter { character: '-', .. })
        ));
        assert!(matches!(
            "MoS2.3.1".parse::<Composition>(),
            Err(CompositionError::InvalidAmount { .. })
        ));
        assert!(matches!(
            "mos2".parse::<Composition>(),
            Err(CompositionError::UnexpectedCharacter { .. })
        ));
    }

    #[test]
    fn reduced_formula_divides_by_gcd_and_orders_by_electronegativity() {
        let comp: Composition = "S4Mo2".parse().unwrap();
        let (reduced, factor) = comp.reduced_composition_and_factor();
        assert_eq!(factor, 2.0);
        assert_eq!(reduced.amount("S"), 2.0);
        assert_eq!(comp.reduced_formula(), "MoS2");
        assert_eq!(comp.formula(), "Mo2S4");
    }

    #[test]
    fn reduced_formula_keeps_fractional_compositions() {
        let comp: Composition = "Mo0.5S".parse().unwrap();
        let (_, factor) = comp.reduced_composition_and_factor();
        assert_eq!(factor, 1.0);
        assert_eq!(comp.reduced_formula(), "Mo0.5S");
    }

    #[test]
    fn chemical_system_is_alphabetical() {
        let comp: Composition = "WSe2".parse().unwrap();
        assert_eq!(comp.chemical_system(), "Se-W");
    }

    #[test]
    fn from_amounts_validates_symbols_and_signs() {
        assert!(Composition::from_amounts([("Mo", 1.0), ("S", 2.0)]).is_ok());
        assert!(matches!(
            Composition::from_amounts([("Q", 1.0)]),
            Err(CompositionError::UnknownElement { .. })
        ));
        assert!(matches!(
            Composition::from_amounts([("S", -1.0)]),
            Err(CompositionError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn display_uses_formula() {
        let comp: Composition = "SnS2".parse().unwrap();
        assert_eq!(comp.to_string(), "SnS2");
    }
}
