use crate::Composition::element_map::MassResult;
use crate::Composition::errors::MassError;
use crate::Composition::formula_parser::parse_formula;
use crate::Composition::mass_allocator::{mass_for_known_element, mass_for_total};
use crate::Composition::molar_mass_table::MolarMassTable;
use crate::Report::batch_report::{build_batch_report, filter_valid_formulas, format_mass};
use crate::Report::report_writers::{mass_lines, sheet_table, write_csv_workbook};
use crate::Utils::formula_sources::{
    is_generated_output, list_files_by_extension, read_formulas_from_csv_column,
    read_formulas_from_txt_file, read_pasted_formulas,
};
use crate::cli::args::{Args, Command};
use crate::cli::cli_commands::{run_batch, run_known, run_single};
use crate::settings::{AppConfig, Settings};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Resolves settings and molar masses, then runs a subcommand or the interactive menu.
pub fn run_app(args: Args) -> Result<(), MassError> {
    let mut settings = Settings::with_config_file(&args.config);
    if let Some(filename) = &args.filename {
        settings.set_molar_mass_file(filename)?;
    }
    if let Some(dir) = &args.output_dir {
        settings.set_output_dir(dir);
    }
    if let Some(Command::Batch {
        total_masses: Some(total_masses),
        ..
    }) = &args.command
    {
        settings.set_total_masses(total_masses.clone())?;
    }
    if args.save_settings {
        settings.save_config()?;
        println!("Settings saved to {}", settings.config_file());
    }
    let config = settings.config().clone();
    let table = load_molar_masses(&config.molar_mass_file)?;

    match args.command {
        Some(Command::Single {
            formula,
            total_mass,
        }) => run_single(&formula, total_mass, &table),
        Some(Command::Known {
            formula,
            element,
            mass,
        }) => run_known(&formula, &element, mass, &table),
        Some(Command::Batch { input, json, .. }) => {
            run_batch(&input, json.as_deref(), &config, &table)
        }
        None => {
            let work_dir = std::env::current_dir()?;
            let stdin = io::stdin();
            let mut shell = Shell::new(stdin.lock(), io::stdout(), &table, &config, work_dir);
            shell.run()
        }
    }
}

/// Loads the molar mass CSV; falls back to the built-in table if the file does not exist.
/// A file that exists but is malformed is an error.
pub fn load_molar_masses(path: &str) -> Result<MolarMassTable, MassError> {
    if Path::new(path).exists() {
        MolarMassTable::load_from_csv(path)
    } else {
        warn!(
            "Molar mass file '{}' not found, using built-in standard atomic weights",
            path
        );
        Ok(MolarMassTable::builtin())
    }
}

/* colors
Blue (\x1b[34m) - Welcome header text
Yellow (\x1b[33m) - Menu options
Cyan (\x1b[36m) - prompts
Reset (\x1b[0m) - Returns to normal color after each colored section
*/

/// Interactive menu over any input/output pair, stdin/stdout in the binary.
/// Holds the session state (molar masses, settings); every computation gets it as arguments.
pub struct Shell<'a, R: BufRead, W: Write> {
    input: R,
    out: W,
    table: &'a MolarMassTable,
    config: &'a AppConfig,
    work_dir: PathBuf,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        input: R,
        out: W,
        table: &'a MolarMassTable,
        config: &'a AppConfig,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            input,
            out,
            table,
            config,
            work_dir,
        }
    }

    /// Main loop; returns when the user finishes or the input ends
    pub fn run(&mut self) -> Result<(), MassError> {
        loop {
            self.show_main_menu()?;
            let Some(choice) = self.prompt("Enter your choice")? else {
                return Ok(());
            };
            let finished_input = match choice.trim() {
                "1" => self.single_formula()?,
                "2" => self.pasted_formulas()?,
                "3" => self.formulas_from_file(".txt")?,
                "4" => self.formulas_from_file(".csv")?,
                "5" => self.known_element_loop()?,
                "0" => {
                    writeln!(self.out, "Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.out, "Invalid choice. Please try again.")?;
                    continue;
                }
            };
            if finished_input {
                return Ok(());
            }
            if self.confirm("\x1b[1mDo you want to finish?\x1b[0m", true)? {
                return Ok(());
            }
        }
    }

    fn show_main_menu(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "\x1b[34m\nElemMass: elemental mass breakdown of chemical compounds\x1b[0m"
        )?;
        writeln!(self.out, "Choose an input method:")?;
        writeln!(self.out, "\x1b[33m1. Enter the chemical formula\x1b[0m")?;
        writeln!(self.out, "\x1b[33m2. Paste column of text with formulas\x1b[0m")?;
        writeln!(self.out, "\x1b[33m3. Read from txt file with formulas\x1b[0m")?;
        writeln!(self.out, "\x1b[33m4. Read from csv file with formulas (first column)\x1b[0m")?;
        writeln!(
            self.out,
            "\x1b[33m5. Calculate masses based on the known mass of one element\x1b[0m"
        )?;
        writeln!(self.out, "\x1b[33m0. Exit\x1b[0m")
    }

    // None at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "\x1b[36m{}: \x1b[0m", text)?;
        self.out.flush()?;
        self.read_line()
    }

    /// asks again until a number is entered
    fn prompt_f64(&mut self, text: &str) -> io::Result<Option<f64>> {
        loop {
            let Some(answer) = self.prompt(text)? else {
                return Ok(None);
            };
            match answer.parse::<f64>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.out, "Error: '{}' is not a valid number.", answer)?,
            }
        }
    }

    fn confirm(&mut self, text: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let Some(answer) = self.prompt(&format!("{} {}", text, hint))? else {
                return Ok(true);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.out, "Error: invalid input")?,
            }
        }
    }

    fn print_masses(&mut self, masses: &MassResult) -> io::Result<()> {
        writeln!(self.out, "Element masses:")?;
        for line in mass_lines(masses) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    // returns Ok(true) if the input ended
    fn single_formula(&mut self) -> Result<bool, MassError> {
        let Some(formula) =
            self.prompt("Enter the chemical formula of the mixture (e.g., CdCu4Ho, DyCo2)")?
        else {
            return Ok(true);
        };
        let wrong_elements = self.table.unknown_elements(&parse_formula(&formula));
        if !wrong_elements.is_empty() {
            writeln!(
                self.out,
                "The formula you entered is wrong. Wrong elements: {}",
                wrong_elements.join(", ")
            )?;
            return Ok(false);
        }
        let Some(total_mass) = self.prompt_f64("Enter the total mass of the mixture in grams")?
        else {
            return Ok(true);
        };
        match mass_for_total(&formula, total_mass, self.table) {
            Ok(masses) => {
                self.print_masses(&masses)?;
                writeln!(self.out, "Total mass: {} g", total_mass)?;
                let molar_mass = self.table.formula_molar_mass(&parse_formula(&formula))?;
                writeln!(self.out, "Molar mass: {} g/mol", format_mass(molar_mass))?;
            }
            Err(e) => writeln!(self.out, "An error occurred: {}", e)?,
        }
        Ok(false)
    }

    fn pasted_formulas(&mut self) -> Result<bool, MassError> {
        writeln!(
            self.out,
            "Paste the formulas (one per line), and press 'Enter' on an empty line when finished:"
        )?;
        self.out.flush()?;
        let formulas = read_pasted_formulas(&mut self.input)?;
        self.process_batch(formulas)?;
        Ok(false)
    }

    fn formulas_from_file(&mut self, extension: &str) -> Result<bool, MassError> {
        let base_name = self.config.output_base_name.clone();
        let mut exclude: Vec<String> = vec!["README.txt".to_string()];
        if let Some(name) = Path::new(&self.config.molar_mass_file).file_name() {
            exclude.push(name.to_string_lossy().to_string());
        }
        let exclude: Vec<&str> = exclude.iter().map(|s| s.as_str()).collect();
        let files: Vec<String> = list_files_by_extension(&self.work_dir, extension, &exclude)?
            .into_iter()
            .filter(|f| !is_generated_output(f, &base_name))
            .collect();
        if files.is_empty() {
            writeln!(
                self.out,
                "No {} files found in the current directory.",
                extension
            )?;
            return Ok(false);
        }
        writeln!(self.out, "Available {} files:", extension)?;
        for (i, file) in files.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, file)?;
        }
        let Some(answer) = self.prompt(&format!("Choose a {} file by number", extension))? else {
            return Ok(true);
        };
        let file = match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= files.len() => &files[n - 1],
            _ => {
                writeln!(self.out, "Invalid choice.")?;
                return Ok(false);
            }
        };
        let path = self.work_dir.join(file);
        let formulas = if extension == ".csv" {
            read_formulas_from_csv_column(&path)?
        } else {
            read_formulas_from_txt_file(&path)?
        };
        self.process_batch(formulas)?;
        Ok(false)
    }

    fn process_batch(&mut self, formulas: Vec<String>) -> Result<(), MassError> {
        let (valid, rejected) = filter_valid_formulas(&formulas, self.table);
        for r in &rejected {
            writeln!(
                self.out,
                "The formula '{}' is wrong. Wrong elements: {}",
                r.formula,
                r.unknown_elements.join(", ")
            )?;
        }
        if valid.is_empty() {
            writeln!(self.out, "No valid formulas found.")?;
            return Ok(());
        }
        let report = match build_batch_report(&valid, &self.config.total_masses, self.table) {
            Ok(report) => report,
            Err(e) => {
                writeln!(self.out, "An error occurred: {}", e)?;
                return Ok(());
            }
        };
        for sheet in &report.sheets {
            writeln!(self.out, "\nTotal mass {} g", sheet.title)?;
            sheet_table(sheet).print(&mut self.out)?;
        }
        let saved = write_csv_workbook(
            &report,
            Path::new(&self.config.output_dir),
            &self.config.output_base_name,
        )?;
        writeln!(self.out, "File saved as {}", saved.display())?;
        info!("batch of {} formulas saved to {}", valid.len(), saved.display());
        Ok(())
    }

    fn known_element_loop(&mut self) -> Result<bool, MassError> {
        loop {
            let Some(known_element) =
                self.prompt("Enter the element with known mass (e.g., Os)")?
            else {
                return Ok(true);
            };
            loop {
                let Some(formula) =
                    self.prompt("Enter the chemical formula of the mixture (e.g., GdOsIn)")?
                else {
                    return Ok(true);
                };
                let Some(known_mass) = self
                    .prompt_f64(&format!("Enter the known mass of {} in grams", known_element))?
                else {
                    return Ok(true);
                };
                match mass_for_known_element(&formula, &known_element, known_mass, self.table) {
                    Ok(masses) => self.print_masses(&masses)?,
                    Err(MassError::UnknownElement { elements }) => writeln!(
                        self.out,
                        "The formula you entered is wrong. Wrong elements: {}",
                        elements.join(", ")
                    )?,
                    Err(MassError::ElementNotInFormula { element, .. }) => writeln!(
                        self.out,
                        "The element '{}' is not present in the formula.",
                        element
                    )?,
                    Err(e) => writeln!(self.out, "An error occurred: {}", e)?,
                }
                if self.confirm("Do you want to change the element or finish?", true)? {
                    break;
                }
            }
            if self.confirm("Finish?", true)? {
                return Ok(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn run_script(script: &str, work_dir: &Path, config: &AppConfig) -> String {
        let table = MolarMassTable::builtin();
        let mut out: Vec<u8> = Vec::new();
        {
            let mut shell =
                Shell::new(script.as_bytes(), &mut out, &table, config, work_dir.to_path_buf());
            shell.run().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn config_in(dir: &Path) -> AppConfig {
        AppConfig {
            output_dir: dir.to_str().unwrap().to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_single_formula() {
        let dir = tempdir().unwrap();
        let output = run_script("1\nNaCl\n1.0\ny\n", dir.path(), &config_in(dir.path()));
        assert!(output.contains("Na: 0.3934 g"));
        assert!(output.contains("Cl: 0.6066 g"));
        assert!(output.contains("Total mass: 1 g"));
        assert!(output.contains("Molar mass: 58.4400 g/mol"));
    }

    #[test]
    fn test_single_formula_with_wrong_element() {
        let dir = tempdir().unwrap();
        let output = run_script("1\nCdCu4Hx\n\n", dir.path(), &config_in(dir.path()));
        assert!(output.contains("Wrong elements: Hx"));
    }

    #[test]
    fn test_invalid_number_is_asked_again() {
        let dir = tempdir().unwrap();
        let output = run_script("1\nH2O\nabc\n2\n", dir.path(), &config_in(dir.path()));
        assert!(output.contains("'abc' is not a valid number"));
        assert!(output.contains("Total mass: 2 g"));
    }

    #[test]
    fn test_pasted_formulas_create_workbook() {
        let dir = tempdir().unwrap();
        let output = run_script(
            "2\nH2O\nXq2\nNaCl\n\ny\n",
            dir.path(),
            &config_in(dir.path()),
        );
        assert!(output.contains("The formula 'Xq2' is wrong. Wrong elements: Xq"));
        assert!(output.contains("File saved as"));
        let workbook = dir.path().join("calculated_1");
        assert!(workbook.join("0.10.csv").exists());
        assert!(workbook.join("0.50.csv").exists());
    }

    #[test]
    fn test_batch_error_does_not_end_session() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            total_masses: vec![],
            ..config_in(dir.path())
        };
        let output = run_script("2\nH2O\n\nn\n0\n", dir.path(), &config);
        assert!(output.contains("An error occurred: Nothing to process"));
        assert!(output.contains("Goodbye!"));
        assert!(!dir.path().join("calculated_1").exists());
    }

    #[test]
    fn test_txt_file_choice() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("formulas.txt"), "GdOsIn\nDyCo2\n").unwrap();
        fs::write(dir.path().join("README.txt"), "not formulas").unwrap();
        let output = run_script("3\n1\n0\n", dir.path(), &config_in(dir.path()));
        assert!(output.contains("1. formulas.txt"));
        assert!(!output.contains("README.txt"));
        assert!(output.contains("File saved as"));
        assert!(dir.path().join("calculated_1").join("0.30.csv").exists());
    }

    #[test]
    fn test_missing_csv_files() {
        let dir = tempdir().unwrap();
        let output = run_script("4\nn\n0\n", dir.path(), &config_in(dir.path()));
        assert!(output.contains("No .csv files found in the current directory."));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_known_element_loop() {
        let dir = tempdir().unwrap();
        let script = "5\nOs\nGdOsIn\n1.0\nn\nGdIn\n1.0\ny\ny\ny\n";
        let output = run_script(script, dir.path(), &config_in(dir.path()));
        assert!(output.contains("Os: 1.0000 g"));
        assert!(output.contains("The element 'Os' is not present in the formula."));
    }

    #[test]
    fn test_invalid_choice_and_end_of_input() {
        let dir = tempdir().unwrap();
        let output = run_script("9\n", dir.path(), &config_in(dir.path()));
        assert!(output.contains("Invalid choice. Please try again."));
    }

    #[test]
    fn test_run_app_rejects_non_finite_total_masses() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.json");
        let args = Args::try_parse_from([
            "elemmass",
            "--config",
            config_path.to_str().unwrap(),
            "batch",
            "--input",
            dir.path().join("formulas.txt").to_str().unwrap(),
            "--total-masses",
            "0.1,inf",
        ])
        .unwrap();
        assert!(matches!(run_app(args), Err(MassError::InvalidInput(_))));
    }

    #[test]
    fn test_run_app_saves_settings_with_overrides() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.json");
        let input = dir.path().join("formulas.txt");
        fs::write(&input, "NaCl\n").unwrap();
        let args = Args::try_parse_from([
            "elemmass",
            "--config",
            config_path.to_str().unwrap(),
            "--output-dir",
            dir.path().to_str().unwrap(),
            "--save-settings",
            "batch",
            "--input",
            input.to_str().unwrap(),
            "--total-masses",
            "0.25,0.5",
        ])
        .unwrap();
        run_app(args).unwrap();

        let saved = Settings::with_config_file(config_path.to_str().unwrap());
        assert_eq!(saved.config().total_masses, vec![0.25, 0.5]);
        assert_eq!(saved.config().output_dir, dir.path().to_str().unwrap());
        assert!(dir.path().join("calculated_1").join("0.25.csv").exists());
    }

    #[test]
    fn test_load_molar_masses_falls_back_to_builtin() {
        let table = load_molar_masses("definitely_missing_table.csv").unwrap();
        assert!(table.contains("H"));

        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "H,1.008\nO,15.999\n").unwrap();
        let table = load_molar_masses(path.to_str().unwrap()).unwrap();
        assert_eq!(table.len(), 2);

        fs::write(&path, "H,one\n").unwrap();
        assert!(load_molar_masses(path.to_str().unwrap()).is_err());
    }
}
