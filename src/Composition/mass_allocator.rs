/// Distribution of a compound's mass over its elements.
///
/// Two modes:
/// 1) total mass is known: every element gets its molar fraction of it,
///    m_e = (n_e * M_e / sum_i n_i * M_i) * m_total
/// 2) mass of one element of the formula is known: all masses are scaled from it,
///    m_e = (m_known / (n_known * M_known)) * n_e * M_e
///
/// Both are pure functions of their inputs; results keep the element order of the ratios.
use crate::Composition::element_map::{MassResult, Ratios};
use crate::Composition::errors::MassError;
use crate::Composition::formula_parser::parse_formula;
use crate::Composition::molar_mass_table::MolarMassTable;
use log::info;

// coefficient * molar mass of every element, in ratios order
fn molar_contributions(ratios: &Ratios, table: &MolarMassTable) -> Result<Vec<f64>, MassError> {
    table.check_elements(ratios)?;
    Ok(ratios
        .iter()
        .filter_map(|(element, ratio)| table.get(element).map(|m| ratio * m))
        .collect())
}

/// Masses of the elements of `ratios` adding up to `total_mass` grams.
///
/// `total_mass` is not range-checked: zero and negative values are distributed as given.
pub fn allocate_by_total_mass(
    ratios: &Ratios,
    total_mass: f64,
    table: &MolarMassTable,
) -> Result<MassResult, MassError> {
    if ratios.is_empty() {
        return Err(MassError::ParseYieldsEmpty {
            formula: String::new(),
        });
    }
    let contributions = molar_contributions(ratios, table)?;
    let total_molar_mass: f64 = contributions.iter().sum();
    if total_molar_mass == 0.0 {
        return Err(MassError::DegenerateDenominator {
            quantity: "total molar mass",
        });
    }
    let masses: MassResult = ratios
        .symbols()
        .iter()
        .zip(contributions.iter())
        .map(|(element, contribution)| (element, contribution / total_molar_mass * total_mass))
        .collect();
    info!("Masses calculated: {:?}", masses);
    Ok(masses)
}

/// Masses of the elements of `ratios` given that `known_element` weighs `known_mass` grams.
pub fn allocate_by_known_element_mass(
    ratios: &Ratios,
    known_element: &str,
    known_mass: f64,
    table: &MolarMassTable,
) -> Result<MassResult, MassError> {
    allocate_from_anchor(ratios, &formula_text(ratios), known_element, known_mass, table)
}

// compact formula for error messages, e.g. "Gd2In"; coefficient 1 is omitted
fn formula_text(ratios: &Ratios) -> String {
    ratios
        .iter()
        .map(|(element, ratio)| {
            if ratio == 1.0 {
                element.to_string()
            } else {
                format!("{}{}", element, ratio)
            }
        })
        .collect()
}

// `formula` is only used to name the formula in `ElementNotInFormula`
fn allocate_from_anchor(
    ratios: &Ratios,
    formula: &str,
    known_element: &str,
    known_mass: f64,
    table: &MolarMassTable,
) -> Result<MassResult, MassError> {
    if ratios.is_empty() {
        return Err(MassError::ParseYieldsEmpty {
            formula: formula.to_string(),
        });
    }
    let Some(known_ratio) = ratios.get(known_element) else {
        return Err(MassError::ElementNotInFormula {
            element: known_element.to_string(),
            formula: formula.to_string(),
        });
    };
    let contributions = molar_contributions(ratios, table)?;
    let known_molar_mass = table.get(known_element).unwrap_or(0.0);
    let known_contribution = known_ratio * known_molar_mass;
    if known_contribution == 0.0 {
        return Err(MassError::DegenerateDenominator {
            quantity: "molar contribution of the known element",
        });
    }
    let scaling_factor = known_mass / known_contribution;
    let masses: MassResult = ratios
        .symbols()
        .iter()
        .zip(contributions.iter())
        .map(|(element, contribution)| (element, scaling_factor * contribution))
        .collect();
    info!("Masses calculated: {:?}", masses);
    Ok(masses)
}

// parse + reject formulas that cannot be computed at all
fn parse_checked(formula: &str, table: &MolarMassTable) -> Result<Ratios, MassError> {
    let ratios = parse_formula(formula);
    if ratios.is_empty() {
        return Err(MassError::ParseYieldsEmpty {
            formula: formula.to_string(),
        });
    }
    table.check_elements(&ratios)?;
    Ok(ratios)
}

/// Single-formula request: parse, validate every element against the table, distribute `total_mass`.
///
/// # Examples
/// ```
/// use ElemMass::Composition::mass_allocator::mass_for_total;
/// use ElemMass::Composition::molar_mass_table::MolarMassTable;
/// let table = MolarMassTable::builtin();
/// let masses = mass_for_total("H2O", 1.0, &table).unwrap();
/// assert!((masses.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn mass_for_total(
    formula: &str,
    total_mass: f64,
    table: &MolarMassTable,
) -> Result<MassResult, MassError> {
    let ratios = parse_checked(formula, table)?;
    allocate_by_total_mass(&ratios, total_mass, table)
}

/// Known-element request: parse, validate, then scale every element from the mass of
/// `known_element`, which must occur in the formula.
pub fn mass_for_known_element(
    formula: &str,
    known_element: &str,
    known_mass: f64,
    table: &MolarMassTable,
) -> Result<MassResult, MassError> {
    let ratios = parse_checked(formula, table)?;
    allocate_from_anchor(&ratios, formula, known_element, known_mass, table)
}
