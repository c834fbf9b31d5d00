//! # Molar Mass Table
//!
//! Mapping from element symbol to molar mass (g/mol). A table is loaded once per request or
//! CLI session and is never mutated afterwards; every computation borrows it.
//!
//! ## CSV format
//! Two columns `symbol,molar mass`, no header row: every row is data.
//! ```text
//! H, 1.008
//! He, 4.0026
//! ```
//! The symbol is trimmed, the mass parsed as f64. A row with a field count other than two or a
//! non-numeric mass fails the whole load. Duplicate symbols: the last row wins.
use crate::Composition::element_map::Ratios;
use crate::Composition::errors::MassError;
use log::info;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MolarMassTable {
    masses: HashMap<String, f64>,
}

// standard atomic weights, g/mol
const BUILTIN_MOLAR_MASSES: &[(&str, f64)] = &[
    ("H", 1.008),
    ("He", 4.0026),
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.18),
    ("Na", 22.99),
    ("Mg", 24.305),
    ("Al", 26.982),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.06),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.098),
    ("Ca", 40.078),
    ("Sc", 44.956),
    ("Ti", 47.867),
    ("V", 50.942),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.693),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Ga", 69.723),
    ("Ge", 72.63),
    ("As", 74.922),
    ("Se", 78.971),
    ("Br", 79.904),
    ("Kr", 83.798),
    ("Rb", 85.468),
    ("Sr", 87.62),
    ("Y", 88.906),
    ("Zr", 91.224),
    ("Nb", 92.906),
    ("Mo", 95.95),
    ("Tc", 98.0),
    ("Ru", 101.07),
    ("Rh", 102.91),
    ("Pd", 106.42),
    ("Ag", 107.87),
    ("Cd", 112.41),
    ("In", 114.82),
    ("Sn", 118.71),
    ("Sb", 121.76),
    ("Te", 127.6),
    ("I", 126.9),
    ("Xe", 131.29),
    ("Cs", 132.91),
    ("Ba", 137.33),
    ("La", 138.91),
    ("Ce", 140.12),
    ("Pr", 140.91),
    ("Nd", 144.24),
    ("Pm", 145.0),
    ("Sm", 150.36),
    ("Eu", 151.96),
    ("Gd", 157.25),
    ("Tb", 158.93),
    ("Dy", 162.5),
    ("Ho", 164.93),
    ("Er", 167.26),
    ("Tm", 168.93),
    ("Yb", 173.05),
    ("Lu", 174.97),
    ("Hf", 178.49),
    ("Ta", 180.95),
    ("W", 183.84),
    ("Re", 186.21),
    ("Os", 190.23),
    ("Ir", 192.22),
    ("Pt", 195.08),
    ("Au", 196.97),
    ("Hg", 200.59),
    ("Tl", 204.38),
    ("Pb", 207.2),
    ("Bi", 208.98),
    ("Th", 232.04),
    ("U", 238.03),
];

impl MolarMassTable {
    pub fn new() -> Self {
        Self {
            masses: HashMap::new(),
        }
    }

    /// Table of standard atomic weights, used when no CSV file is available
    pub fn builtin() -> Self {
        BUILTIN_MOLAR_MASSES.iter().copied().collect()
    }

    /// Loads a two-column CSV file (no header) of element symbols and molar masses.
    pub fn load_from_csv<P: AsRef<Path>>(path: P) -> Result<Self, MassError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_csv_reader(file)?;
        info!(
            "Loaded {} molar masses from '{}'",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, MassError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut table = MolarMassTable::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 1);
            if record.len() != 2 {
                return Err(MassError::InvalidTableRow {
                    line,
                    details: format!("expected 2 fields, found {}", record.len()),
                });
            }
            let element = record[0].trim();
            let raw_mass = record[1].trim();
            let molar_mass: f64 = raw_mass.parse().map_err(|_| MassError::InvalidTableRow {
                line,
                details: format!("molar mass '{}' of '{}' is not a number", raw_mass, element),
            })?;
            table.insert(element, molar_mass);
        }
        Ok(table)
    }

    pub fn insert(&mut self, element: &str, molar_mass: f64) {
        self.masses.insert(element.to_string(), molar_mass);
    }

    pub fn get(&self, element: &str) -> Option<f64> {
        self.masses.get(element).copied()
    }

    pub fn contains(&self, element: &str) -> bool {
        self.masses.contains_key(element)
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Symbols of `ratios` that have no molar mass, in formula order
    pub fn unknown_elements(&self, ratios: &Ratios) -> Vec<String> {
        ratios
            .symbols()
            .iter()
            .filter(|s| !self.contains(s))
            .cloned()
            .collect()
    }

    /// Fails with `UnknownElement` naming every symbol of `ratios` missing from the table
    pub fn check_elements(&self, ratios: &Ratios) -> Result<(), MassError> {
        let unknown = self.unknown_elements(ratios);
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(MassError::UnknownElement { elements: unknown })
        }
    }

    /// molar mass of a whole formula: sum of coefficient * molar mass
    pub fn formula_molar_mass(&self, ratios: &Ratios) -> Result<f64, MassError> {
        self.check_elements(ratios)?;
        Ok(ratios
            .iter()
            .map(|(element, ratio)| ratio * self.masses[element])
            .sum())
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for MolarMassTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = MolarMassTable::new();
        for (element, molar_mass) in iter {
            table.insert(element.as_ref(), molar_mass);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Composition::formula_parser::parse_formula;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_csv() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"H, 1.008\n O ,15.999\nNa,22.99\n").unwrap();
        let table = MolarMassTable::load_from_csv(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("H"), Some(1.008));
        assert_eq!(table.get("O"), Some(15.999));
        assert_eq!(table.get("Na"), Some(22.99));
    }

    #[test]
    fn test_first_row_is_data() {
        let table = MolarMassTable::from_csv_reader("Cl,35.45\nNa,22.99\n".as_bytes()).unwrap();
        assert!(table.contains("Cl"));
    }

    #[test]
    fn test_duplicate_symbols_last_wins() {
        let table = MolarMassTable::from_csv_reader("H,1.0\nH,1.008\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("H"), Some(1.008));
    }

    #[test]
    fn test_wrong_field_count_fails() {
        let err = MolarMassTable::from_csv_reader("H,1.008\nO,15.999,extra\n".as_bytes())
            .unwrap_err();
        match err {
            MassError::InvalidTableRow { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(MolarMassTable::from_csv_reader("H\n".as_bytes()).is_err());
    }

    #[test]
    fn test_non_numeric_mass_fails() {
        let err = MolarMassTable::from_csv_reader("Element,Mass\nH,1.008\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, MassError::InvalidTableRow { line: 1, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MolarMassTable::load_from_csv("no_such_molar_mass_table.csv").unwrap_err();
        assert!(matches!(err, MassError::Io(_)));
    }

    #[test]
    fn test_unknown_elements() {
        let table: MolarMassTable = vec![("Cd", 112.41), ("Cu", 63.546)].into_iter().collect();
        let ratios = parse_formula("CdCu4Ho");
        assert_eq!(table.unknown_elements(&ratios), vec!["Ho".to_string()]);
        let err = table.check_elements(&ratios).unwrap_err();
        match err {
            MassError::UnknownElement { elements } => assert_eq!(elements, vec!["Ho"]),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_builtin_table_molar_mass() {
        let table = MolarMassTable::builtin();
        assert!(table.contains("Os"));
        assert!(table.contains("Ho"));
        let water = table.formula_molar_mass(&parse_formula("H2O")).unwrap();
        assert_relative_eq!(water, 18.015, epsilon = 1e-3);
        let salt = table.formula_molar_mass(&parse_formula("NaCl")).unwrap();
        assert_relative_eq!(salt, 58.44, epsilon = 1e-3);
    }
}
