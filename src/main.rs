//! Course Analyst - Student score validation, summary reporting and grade plots
//!
//! Reads a CSV of student course scores, validates and cleans it, then writes
//! a text summary report and two grade charts.

mod charts;
mod config;
mod data;
mod logging;
mod pipeline;
mod report;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use config::AnalysisConfig;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "course_analyst")]
#[command(
    about = "UCDA: University Course Data Analyst - Automate analysis and visualization of student grades."
)]
#[command(after_help = "Example: course_analyst data/sample_grades.csv")]
#[command(version)]
struct Args {
    /// Path to the raw CSV file containing student course data
    #[arg(required_unless_present = "log")]
    input_file: Option<PathBuf>,

    /// View the contents of the last execution log file
    #[arg(long)]
    log: bool,

    /// JSON file overriding output locations and the low performance threshold
    #[arg(short, long, env = "UCDA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the summary report
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Directory for the plot images
    #[arg(long)]
    plot_dir: Option<PathBuf>,
}

impl Args {
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(dir) = &self.report_dir {
            config.report_dir = dir.clone();
        }
        if let Some(dir) = &self.plot_dir {
            config.plot_dir = dir.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = args.analysis_config()?;

    if args.log {
        logging::show_log(&config.log_file)?;
        return Ok(ExitCode::SUCCESS);
    }

    logging::init(&config.log_file).context("Failed to initialize logging")?;

    let input = args.input_file.context("An input CSV file is required")?;
    if pipeline::process_analysis(&input, &config) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_required_without_log_flag() {
        assert!(Args::try_parse_from(["course_analyst"]).is_err());
        let args = Args::try_parse_from(["course_analyst", "--log"]).unwrap();
        assert!(args.log);
        assert!(args.input_file.is_none());
    }

    #[test]
    fn cli_directories_override_defaults() {
        let args = Args::try_parse_from([
            "course_analyst",
            "grades.csv",
            "--plot-dir",
            "out/plots",
        ])
        .unwrap();

        let config = args.analysis_config().unwrap();
        assert_eq!(config.plot_dir, PathBuf::from("out/plots"));
        assert_eq!(config.report_dir, PathBuf::from(config::REPORT_OUTPUT_DIR));
        assert_eq!(args.input_file, Some(PathBuf::from("grades.csv")));
    }
}
