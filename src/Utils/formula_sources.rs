use crate::Composition::errors::MassError;
use log::info;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads one formula per line from a text file. Lines are trimmed, blank lines dropped.
pub fn read_formulas_from_txt_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, MassError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut formulas = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let formula = line.trim();
        if !formula.is_empty() {
            formulas.push(formula.to_string());
        }
    }
    info!("Read {} formulas from '{}'", formulas.len(), path.display());
    Ok(formulas)
}

/// Reads pasted formulas, one per line, until the first empty line (or end of input).
pub fn read_pasted_formulas<R: BufRead>(input: R) -> Result<Vec<String>, MassError> {
    let mut formulas = Vec::new();
    for line in input.lines() {
        let line = line?;
        let formula = line.trim();
        if formula.is_empty() {
            break;
        }
        formulas.push(formula.to_string());
    }
    Ok(formulas)
}

/// Reads the first column of a CSV file without header row; empty cells are skipped.
pub fn read_formulas_from_csv_column<P: AsRef<Path>>(path: P) -> Result<Vec<String>, MassError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut formulas = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(cell) = record.get(0) {
            let formula = cell.trim();
            if !formula.is_empty() {
                formulas.push(formula.to_string());
            }
        }
    }
    info!("Read {} formulas from '{}'", formulas.len(), path.display());
    Ok(formulas)
}

/// true for names like "calculated_3" or "calculated_3.csv" produced by earlier runs
pub fn is_generated_output(file_name: &str, base_name: &str) -> bool {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    match stem.strip_prefix(base_name).and_then(|rest| rest.strip_prefix('_')) {
        Some(n) => !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Names of the files in `dir` ending with `extension`, minus `exclude`, sorted
pub fn list_files_by_extension(
    dir: &Path,
    extension: &str,
    exclude: &[&str],
) -> Result<Vec<String>, MassError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(extension) && !exclude.contains(&name.as_str()) {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}
