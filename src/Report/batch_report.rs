//! # Batch Report
//!
//! ## Purpose
//! Runs the total-mass allocation for a list of formulas over a list of total masses and
//! collects the results as a plain tabular value: one sheet per total mass, one row per formula.
//!
//! ## Layout of a sheet
//! | Formula | Total Mass | Element1 | Mass1 | Element2 | Mass2 | ... |
//! |---------|------------|----------|-------|----------|-------|-----|
//! | H2O     | 0.5        | H        | 0.0560| O        | 0.4440|     |
//!
//! The number of Element/Mass column pairs is the largest element count among the formulas.
//! Rows of formulas with fewer elements stay short; renderers fill the gap with blank cells.
//! Masses are written with 4 decimals. Sheet titles are the total mass with 2 decimals; when
//! two total masses round to the same title the later sheet gets the full-precision value
//! (and a `_<n>` suffix for an exact repeat), so titles stay unique within a report.
//!
//! ## Input contract
//! Formulas must already be filtered for validity (see `filter_valid_formulas`); an unknown
//! element in the input is returned as an error, not skipped.
use crate::Composition::element_map::MassResult;
use crate::Composition::errors::MassError;
use crate::Composition::formula_parser::{parse_formula, parse_vector_of_formulas};
use crate::Composition::mass_allocator::allocate_by_total_mass;
use crate::Composition::molar_mass_table::MolarMassTable;
use log::{info, warn};
use serde::Serialize;

/// total masses (g) of the sheets of a batch report
pub const DEFAULT_TOTAL_MASSES: [f64; 7] = [0.10, 0.15, 0.20, 0.25, 0.30, 0.40, 0.50];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub formula: String,
    pub total_mass: f64,
    pub masses: MassResult,
}

impl ReportRow {
    /// formula, total mass, then element/mass pairs in formula order
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.formula.clone(), self.total_mass.to_string()];
        for (element, mass) in self.masses.iter() {
            cells.push(element.to_string());
            cells.push(format_mass(mass));
        }
        cells
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub title: String,
    pub total_mass: f64,
    pub header: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl Sheet {
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// zero-based indices of the MassN columns
    pub fn mass_columns(&self) -> Vec<usize> {
        (3..self.width()).step_by(2).collect()
    }

    /// data rows padded with empty cells up to the header width
    pub fn padded_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = row.cells();
                cells.resize(self.width().max(cells.len()), String::new());
                cells
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub sheets: Vec<Sheet>,
}

/// A formula dropped before building a report, with the symbols that made it invalid.
/// `unknown_elements` is empty when the formula contained no element at all.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFormula {
    pub formula: String,
    pub unknown_elements: Vec<String>,
}

pub fn format_mass(mass: f64) -> String {
    format!("{:.4}", mass)
}

/// sheet title for a total mass, e.g. "0.10"
pub fn sheet_title(total_mass: f64) -> String {
    format!("{:.2}", total_mass)
}

// `sheet_title`, or a longer form of it if a previous sheet already has that title
fn unique_sheet_title(total_mass: f64, sheets: &[Sheet]) -> String {
    let taken = |title: &str| sheets.iter().any(|s| s.title == title);
    let title = sheet_title(total_mass);
    if !taken(&title) {
        return title;
    }
    let precise = total_mass.to_string();
    if !taken(&precise) {
        return precise;
    }
    (2..)
        .map(|n| format!("{}_{}", precise, n))
        .find(|t| !taken(t))
        .unwrap_or(precise)
}

fn header_row(max_elements: usize) -> Vec<String> {
    let mut header = vec!["Formula".to_string(), "Total Mass".to_string()];
    for i in 1..=max_elements {
        header.push(format!("Element{}", i));
        header.push(format!("Mass{}", i));
    }
    header
}

/// Splits raw formulas into the ones whose every element has a molar mass and the rejected
/// rest. Blank lines are dropped silently, order is kept.
pub fn filter_valid_formulas(
    formulas: &[String],
    table: &MolarMassTable,
) -> (Vec<String>, Vec<RejectedFormula>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();
    for formula in formulas.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
        let ratios = parse_formula(formula);
        let unknown_elements = table.unknown_elements(&ratios);
        if ratios.is_empty() || !unknown_elements.is_empty() {
            warn!(
                "The formula '{}' is wrong. Wrong elements: {}",
                formula,
                unknown_elements.join(", ")
            );
            rejected.push(RejectedFormula {
                formula: formula.to_string(),
                unknown_elements,
            });
        } else {
            valid.push(formula.to_string());
        }
    }
    (valid, rejected)
}

/// Builds one sheet per total mass (in the given order) with one row per formula.
///
/// # Errors
/// * `EmptyBatchInput` - no formulas or no total masses
/// * any error of `allocate_by_total_mass` for a formula of the batch
pub fn build_batch_report(
    formulas: &[String],
    total_masses: &[f64],
    table: &MolarMassTable,
) -> Result<BatchReport, MassError> {
    if formulas.is_empty() || total_masses.is_empty() {
        return Err(MassError::EmptyBatchInput);
    }
    let parsed = parse_vector_of_formulas(formulas);
    let max_elements = parsed.iter().map(|r| r.len()).max().unwrap_or(0);

    let mut sheets = Vec::with_capacity(total_masses.len());
    for &total_mass in total_masses {
        let mut rows = Vec::with_capacity(formulas.len());
        for (formula, ratios) in formulas.iter().zip(parsed.iter()) {
            let masses = allocate_by_total_mass(ratios, total_mass, table).map_err(|e| match e {
                MassError::ParseYieldsEmpty { .. } => MassError::ParseYieldsEmpty {
                    formula: formula.clone(),
                },
                other => other,
            })?;
            rows.push(ReportRow {
                formula: formula.clone(),
                total_mass,
                masses,
            });
        }
        sheets.push(Sheet {
            title: unique_sheet_title(total_mass, &sheets),
            total_mass,
            header: header_row(max_elements),
            rows,
        });
    }
    info!(
        "Batch report built: {} formulas x {} total masses",
        formulas.len(),
        total_masses.len()
    );
    Ok(BatchReport { sheets })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formulas(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_formulas_one_total_mass() {
        let table = MolarMassTable::builtin();
        let report = build_batch_report(&formulas(&["H2O", "NaCl"]), &[0.5], &table).unwrap();
        assert_eq!(report.sheets.len(), 1);
        let sheet = &report.sheets[0];
        assert_eq!(sheet.title, "0.50");
        assert_eq!(sheet.width(), 6);
        assert_eq!(
            sheet.header,
            vec!["Formula", "Total Mass", "Element1", "Mass1", "Element2", "Mass2"]
        );
        assert_eq!(sheet.rows.len(), 2);
        let cells = sheet.rows[0].cells();
        assert_eq!(cells[0], "H2O");
        assert_eq!(cells[1], "0.5");
        assert_eq!(cells[2], "H");
        assert_eq!(cells[3], "0.0560");
        assert_eq!(cells[4], "O");
        assert_eq!(cells[5], "0.4440");
    }

    #[test]
    fn test_default_total_masses_give_seven_sheets() {
        let table = MolarMassTable::builtin();
        let report =
            build_batch_report(&formulas(&["CdCu4Ho", "DyCo2"]), &DEFAULT_TOTAL_MASSES, &table)
                .unwrap();
        let titles: Vec<&str> = report.sheets.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["0.10", "0.15", "0.20", "0.25", "0.30", "0.40", "0.50"]);
        for sheet in &report.sheets {
            assert_eq!(sheet.width(), 2 + 2 * 3);
            assert_eq!(sheet.rows[0].formula, "CdCu4Ho");
            assert_eq!(sheet.rows[1].formula, "DyCo2");
        }
    }

    #[test]
    fn test_colliding_titles_are_made_unique() {
        let table = MolarMassTable::builtin();
        let report =
            build_batch_report(&formulas(&["H2O"]), &[0.101, 0.104, 0.104, 0.5], &table).unwrap();
        let titles: Vec<&str> = report.sheets.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["0.10", "0.104", "0.104_2", "0.50"]);
        assert_eq!(report.sheets[1].total_mass, 0.104);
    }

    #[test]
    fn test_short_rows_are_ragged_and_padded_on_request() {
        let table = MolarMassTable::builtin();
        let report = build_batch_report(&formulas(&["GdOsIn", "Fe"]), &[0.1], &table).unwrap();
        let sheet = &report.sheets[0];
        assert_eq!(sheet.width(), 8);
        assert_eq!(sheet.rows[1].cells().len(), 4);
        assert_eq!(sheet.rows[1].cells()[3], "0.1000");
        let padded = sheet.padded_rows();
        assert_eq!(padded[1].len(), 8);
        assert_eq!(padded[1][4], "");
    }

    #[test]
    fn test_mass_columns() {
        let table = MolarMassTable::builtin();
        let report = build_batch_report(&formulas(&["GdOsIn"]), &[0.2], &table).unwrap();
        let sheet = &report.sheets[0];
        assert_eq!(sheet.mass_columns(), vec![3, 5, 7]);
        for i in sheet.mass_columns() {
            assert!(sheet.header[i].starts_with("Mass"));
        }
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let table = MolarMassTable::builtin();
        let err = build_batch_report(&[], &DEFAULT_TOTAL_MASSES, &table).unwrap_err();
        assert!(matches!(err, MassError::EmptyBatchInput));
        let err = build_batch_report(&formulas(&["H2O"]), &[], &table).unwrap_err();
        assert!(matches!(err, MassError::EmptyBatchInput));
    }

    #[test]
    fn test_unknown_element_in_batch_fails() {
        let table = MolarMassTable::builtin();
        let err = build_batch_report(&formulas(&["H2O", "Xy2"]), &[0.1], &table).unwrap_err();
        assert!(matches!(err, MassError::UnknownElement { .. }));
    }

    #[test]
    fn test_filter_valid_formulas() {
        let table = MolarMassTable::builtin();
        let input = formulas(&["H2O", "  ", "CdCu4Hx", "NaCl ", "123"]);
        let (valid, rejected) = filter_valid_formulas(&input, &table);
        assert_eq!(valid, vec!["H2O", "NaCl"]);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].formula, "CdCu4Hx");
        assert_eq!(rejected[0].unknown_elements, vec!["Hx"]);
        assert_eq!(rejected[1].formula, "123");
        assert!(rejected[1].unknown_elements.is_empty());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let table = MolarMassTable::builtin();
        let report = build_batch_report(&formulas(&["H2O"]), &[0.5], &table).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sheets"][0]["title"], "0.50");
        assert_eq!(json["sheets"][0]["rows"][0]["formula"], "H2O");
        assert!(json["sheets"][0]["rows"][0]["masses"]["H"].is_number());
    }
}
