//! One-shot commands: the three request modes (single formula, known element, batch file)
//! without the interactive menu.
use crate::Composition::errors::MassError;
use crate::Composition::formula_parser::parse_formula;
use crate::Composition::mass_allocator::{mass_for_known_element, mass_for_total};
use crate::Composition::molar_mass_table::MolarMassTable;
use crate::Report::batch_report::{
    BatchReport, build_batch_report, filter_valid_formulas, format_mass,
};
use crate::Report::report_writers::{
    print_masses, print_report, write_csv_workbook, write_json_report,
};
use crate::Utils::formula_sources::{read_formulas_from_csv_column, read_formulas_from_txt_file};
use crate::settings::AppConfig;
use log::warn;
use std::path::{Path, PathBuf};

pub fn run_single(formula: &str, total_mass: f64, table: &MolarMassTable) -> Result<(), MassError> {
    let masses = mass_for_total(formula, total_mass, table)?;
    let molar_mass = table.formula_molar_mass(&parse_formula(formula))?;
    print_masses(&masses);
    println!("Total mass: {} g", total_mass);
    println!("Molar mass: {} g/mol", format_mass(molar_mass));
    Ok(())
}

pub fn run_known(
    formula: &str,
    known_element: &str,
    known_mass: f64,
    table: &MolarMassTable,
) -> Result<(), MassError> {
    let masses = mass_for_known_element(formula, known_element, known_mass, table)?;
    print_masses(&masses);
    Ok(())
}

/// Formulas of a file: first CSV column for `.csv`, one per line otherwise
pub fn read_formula_file(input: &Path) -> Result<Vec<String>, MassError> {
    let is_csv = input
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        read_formulas_from_csv_column(input)
    } else {
        read_formulas_from_txt_file(input)
    }
}

/// Reads, filters and reports a formula file over `config.total_masses`;
/// returns the report and the saved workbook
pub fn batch_from_file(
    input: &Path,
    config: &AppConfig,
    table: &MolarMassTable,
) -> Result<(BatchReport, PathBuf), MassError> {
    let formulas = read_formula_file(input)?;
    let (valid, rejected) = filter_valid_formulas(&formulas, table);
    for r in &rejected {
        eprintln!(
            "The formula '{}' is wrong. Wrong elements: {}",
            r.formula,
            r.unknown_elements.join(", ")
        );
    }
    if valid.is_empty() {
        warn!("No valid formulas found in '{}'", input.display());
        return Err(MassError::EmptyBatchInput);
    }
    let report = build_batch_report(&valid, &config.total_masses, table)?;
    let saved = write_csv_workbook(
        &report,
        Path::new(&config.output_dir),
        &config.output_base_name,
    )?;
    Ok((report, saved))
}

pub fn run_batch(
    input: &Path,
    json: Option<&Path>,
    config: &AppConfig,
    table: &MolarMassTable,
) -> Result<(), MassError> {
    let (report, saved) = batch_from_file(input, config, table)?;
    print_report(&report);
    println!("File saved as {}", saved.display());
    if let Some(json_path) = json {
        write_json_report(&report, json_path)?;
        println!("Report written to {}", json_path.display());
    }
    Ok(())
}
