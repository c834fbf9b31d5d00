//! Output of mass results and batch reports: terminal tables (prettytable),
//! CSV "workbooks" (a directory with one CSV file per sheet) and JSON.
use crate::Composition::element_map::MassResult;
use crate::Composition::errors::MassError;
use crate::Report::batch_report::{BatchReport, Sheet, format_mass};
use log::info;
use prettytable::{Cell, Row, Table};
use std::fs;
use std::path::{Path, PathBuf};

/// prettytable style of highlighted MassN cells (yellow foreground)
const HIGHLIGHT_STYLE: &str = "Fy";

/// Lines "Element: mass g" with masses rounded to 4 decimals
pub fn mass_lines(masses: &MassResult) -> Vec<String> {
    masses
        .iter()
        .map(|(element, mass)| format!("{}: {} g", element, format_mass(mass)))
        .collect()
}

pub fn print_masses(masses: &MassResult) {
    println!("Element masses:");
    for line in mass_lines(masses) {
        println!("{}", line);
    }
}

/// Terminal table of one sheet; MassN data cells are highlighted
pub fn sheet_table(sheet: &Sheet) -> Table {
    let mut table = Table::new();
    let header: Vec<Cell> = sheet
        .header
        .iter()
        .map(|h| Cell::new(h).style_spec("b"))
        .collect();
    table.add_row(Row::new(header));

    let mass_columns = sheet.mass_columns();
    for row in sheet.padded_rows() {
        let cells: Vec<Cell> = row
            .iter()
            .enumerate()
            .map(|(i, value)| {
                if mass_columns.contains(&i) {
                    Cell::new(value).style_spec(HIGHLIGHT_STYLE)
                } else {
                    Cell::new(value)
                }
            })
            .collect();
        table.add_row(Row::new(cells));
    }
    table
}

pub fn print_report(report: &BatchReport) {
    for sheet in &report.sheets {
        println!("\nTotal mass {} g", sheet.title);
        sheet_table(sheet).printstd();
    }
}

/// First `<dir>/<base>_<n>` with n = 1, 2, ... that does not exist yet
pub fn next_free_path(dir: &Path, base_name: &str) -> PathBuf {
    let mut n = 1;
    loop {
        let candidate = dir.join(format!("{}_{}", base_name, n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Writes every sheet of the report to `<sheet title>.csv` inside a fresh directory
/// `<output_dir>/<base_name>_<n>`; returns that directory.
/// Short rows are padded with empty cells to the header width.
pub fn write_csv_workbook(
    report: &BatchReport,
    output_dir: &Path,
    base_name: &str,
) -> Result<PathBuf, MassError> {
    fs::create_dir_all(output_dir)?;
    let workbook_dir = next_free_path(output_dir, base_name);
    fs::create_dir(&workbook_dir)?;
    for sheet in &report.sheets {
        let sheet_path = workbook_dir.join(format!("{}.csv", sheet.title));
        let mut writer = csv::Writer::from_path(&sheet_path)?;
        writer.write_record(&sheet.header)?;
        for row in sheet.padded_rows() {
            writer.write_record(&row)?;
        }
        writer.flush()?;
    }
    info!("File saved as {}", workbook_dir.display());
    Ok(workbook_dir)
}

pub fn write_json_report(report: &BatchReport, path: &Path) -> Result<(), MassError> {
    let content = serde_json::to_string_pretty(report)?;
    fs::write(path, content)?;
    info!("Report written to {}", path.display());
    Ok(())
}
