use std::path::PathBuf;

use clap::Parser;

/// Command-line options for the dashboard.
#[derive(Parser, Debug, Clone)]
#[command(name = "salary-dash", about = "Data science salaries dashboard")]
pub struct Config {
    /// Salary table to load (.csv, .json or .parquet)
    #[arg(long, env = "SALARY_DASH_DATA", default_value = "ds_salaries_final.csv")]
    pub data: PathBuf,
}
