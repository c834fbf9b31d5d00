//! # Settings Module
//!
//! ## Purpose
//! Keeps the user's choices between runs: which molar mass table to load, which total masses a
//! batch report covers and where generated reports go. Settings are resolved once by the
//! command-line layer and then passed down explicitly; the computational core never reads them.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "molar_mass_file": "Periodic Table of Elements.csv",
//!   "total_masses": [0.1, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5],
//!   "output_dir": ".",
//!   "output_base_name": "calculated"
//! }
//! ```
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use ElemMass::settings::Settings;
//!
//! let mut settings = Settings::with_config_file("elemmass_config.json");
//! settings.set_total_masses(vec![0.5, 1.0])?;
//! settings.save_config()?;
//! ```

use crate::Composition::errors::MassError;
use crate::Report::batch_report::DEFAULT_TOTAL_MASSES;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "elemmass_config.json";
pub const DEFAULT_MOLAR_MASS_FILE: &str = "Periodic Table of Elements.csv";

/// Serializable configuration.
///
/// # Fields
/// * `molar_mass_file` - CSV file with element symbols and molar masses
/// * `total_masses` - total masses (g) of the sheets of batch reports
/// * `output_dir` - directory for generated reports
/// * `output_base_name` - reports are saved as `<output_base_name>_<n>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub molar_mass_file: String,
    pub total_masses: Vec<f64>,
    pub output_dir: String,
    pub output_base_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            molar_mass_file: DEFAULT_MOLAR_MASS_FILE.to_string(),
            total_masses: DEFAULT_TOTAL_MASSES.to_vec(),
            output_dir: ".".to_string(),
            output_base_name: "calculated".to_string(),
        }
    }
}

impl AppConfig {
    /// Fails on an empty or non-finite `total_masses`
    pub fn validate(&self) -> Result<(), MassError> {
        validate_total_masses(&self.total_masses)
    }
}

fn validate_total_masses(total_masses: &[f64]) -> Result<(), MassError> {
    if total_masses.is_empty() {
        return Err(MassError::EmptyBatchInput);
    }
    if let Some(bad) = total_masses.iter().find(|m| !m.is_finite()) {
        return Err(MassError::InvalidInput(format!(
            "total mass {} is not a finite number",
            bad
        )));
    }
    Ok(())
}

/// Configuration together with the file it is persisted to.
#[derive(Debug, Clone)]
pub struct Settings {
    config: AppConfig,
    config_file: String,
}

impl Settings {
    /// Loads settings from `elemmass_config.json` in the current directory, defaults if absent.
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    /// Loads settings from a custom file. A missing file gives the defaults;
    /// an unreadable, malformed or invalid one gives the defaults with a warning.
    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Could not read settings from '{}': {}. Using defaults",
                    config_file, e
                );
                AppConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<AppConfig, MassError> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let config: AppConfig = serde_json::from_str(&content)?;
            config.validate()?;
            info!("Settings loaded from '{}'", config_file);
            Ok(config)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn save_config(&self) -> Result<(), MassError> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        info!("Settings saved to '{}'", self.config_file);
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Switches to another molar mass table; the file must exist
    pub fn set_molar_mass_file(&mut self, path: &str) -> Result<(), MassError> {
        if !Path::new(path).exists() {
            return Err(MassError::InvalidInput(format!(
                "File '{}' does not exist",
                path
            )));
        }
        self.config.molar_mass_file = path.to_string();
        Ok(())
    }

    /// Total masses of batch reports; must be non-empty and finite
    pub fn set_total_masses(&mut self, total_masses: Vec<f64>) -> Result<(), MassError> {
        validate_total_masses(&total_masses)?;
        self.config.total_masses = total_masses;
        Ok(())
    }

    pub fn set_output_dir(&mut self, dir: &str) {
        self.config.output_dir = dir.to_string();
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
