/// Module to split a chemical formula like "CdCu4Ho" or "Fe2.5O3" into element symbols and
/// their stoichiometric coefficients.
///
/// Element token: one uppercase letter followed by any number of lowercase letters, optionally
/// followed by a decimal coefficient. Everything the pattern does not match (spaces, brackets,
/// punctuation, lowercase garbage) is skipped. Validity of the symbols is not checked here:
/// compare the result with a MolarMassTable.
use crate::Composition::element_map::Ratios;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static ELEMENT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-z]*)([0-9]*\.?[0-9]*)").expect("element token pattern is valid")
});

/// Parses a formula into an ordered element -> coefficient map.
///
/// A symbol without a number gets coefficient 1.0. If a symbol occurs more than once the last
/// coefficient wins (no summation) and the symbol keeps the position of its first occurrence.
/// An empty or fully non-matching string gives an empty map.
///
/// # Examples
/// ```
/// use ElemMass::Composition::formula_parser::parse_formula;
/// let ratios = parse_formula("H2O");
/// assert_eq!(ratios.get("H"), Some(2.0));
/// assert_eq!(ratios.get("O"), Some(1.0));
/// ```
pub fn parse_formula(formula: &str) -> Ratios {
    let mut ratios = Ratios::new();
    for cap in ELEMENT_TOKEN.captures_iter(formula) {
        let element = &cap[1];
        let coefficient = parse_coefficient(&cap[2]);
        ratios.insert(element, coefficient);
    }
    debug!("parsed formula {:?} into {:?}", formula, ratios);
    ratios
}

// "" and a lone "." both mean the coefficient was omitted
fn parse_coefficient(raw: &str) -> f64 {
    raw.parse::<f64>().unwrap_or(1.0)
}

/// Parses a list of formulas, keeping the input order
pub fn parse_vector_of_formulas(formulas: &[String]) -> Vec<Ratios> {
    formulas.iter().map(|f| parse_formula(f)).collect()
}
