/// Batch report: formulas x total masses, one sheet per total mass
///
///  # Examples
/// ```
/// use ElemMass::Composition::molar_mass_table::MolarMassTable;
/// use ElemMass::Report::batch_report::build_batch_report;
/// let formulas = vec!["H2O".to_string(), "NaCl".to_string()];
/// let report = build_batch_report(&formulas, &[0.5], &MolarMassTable::builtin()).unwrap();
/// assert_eq!(report.sheets[0].header.len(), 6);
/// ```
pub mod batch_report;
/// Terminal tables, CSV workbooks and JSON output
pub mod report_writers;
