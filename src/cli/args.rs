//! Command-line arguments of the ElemMass binary

use crate::settings::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

/// Elemental mass breakdown of chemical compounds.
/// Without a subcommand an interactive menu is started.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file containing element molar masses (overrides the settings file)
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Path to the JSON settings file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Directory for generated reports (overrides the settings file)
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Write the settings, with the overrides of this run applied, back to the settings file
    #[arg(long)]
    pub save_settings: bool,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Distribute a total mass over the elements of a formula
    Single {
        /// Chemical formula, e.g. CdCu4Ho
        #[arg(short, long)]
        formula: String,
        /// Total mass of the mixture in grams
        #[arg(short, long, allow_negative_numbers = true)]
        total_mass: f64,
    },
    /// Compute all element masses from the known mass of one element
    Known {
        /// Chemical formula, e.g. GdOsIn
        #[arg(short, long)]
        formula: String,
        /// Element with known mass, e.g. Os
        #[arg(short, long)]
        element: String,
        /// Known mass of the element in grams
        #[arg(short, long, allow_negative_numbers = true)]
        mass: f64,
    },
    /// Build a report for a file of formulas (.txt: one per line, .csv: first column)
    Batch {
        /// File with formulas
        #[arg(short, long)]
        input: PathBuf,
        /// Comma separated total masses, e.g. 0.1,0.2,0.5 (overrides the settings file)
        #[arg(long, value_delimiter = ',')]
        total_masses: Option<Vec<f64>>,
        /// Also write the report as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
}
