//! Analysis Pipeline
//! Load, validate and clean, then report and plot. Failures are reported to
//! the console and the run log.

use crate::charts::{PlotError, Plotter};
use crate::config::AnalysisConfig;
use crate::data::{DataLoader, DataValidator, LoaderError, ValidationError};
use crate::report::{ReportError, ReportGenerator};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Plot(#[from] PlotError),
}

/// Files written by a successful run.
#[derive(Debug, Clone)]
pub struct AnalysisOutputs {
    pub report: PathBuf,
    pub distribution_plot: PathBuf,
    pub course_boxplot: PathBuf,
}

/// Load the input file and return the validated, cleaned table.
pub fn prepare_data(input: &Path) -> Result<DataFrame, AnalysisError> {
    let raw = DataLoader::new(input).load_data()?;
    let mut validator = DataValidator::new(raw);
    if !validator.is_valid() {
        return Err(ValidationError::Invalid(validator.errors().to_vec()).into());
    }
    let cleaned = validator.clean_data()?;

    info!("Data validated and cleaned successfully.");
    println!("Data is valid and clean. Proceeding to analysis...");
    Ok(cleaned)
}

/// Run every stage, stopping at the first failure.
pub fn run_analysis(input: &Path, config: &AnalysisConfig) -> Result<AnalysisOutputs, AnalysisError> {
    let df = prepare_data(input)?;

    let reporter = ReportGenerator::new(&df, config);
    let report = reporter.generate_class_summary()?;
    reporter.generate_individual_reports();
    info!("Reports generated successfully.");

    let plotter = Plotter::new(&df, config)?;
    let distribution_plot = plotter.generate_grade_distribution()?;
    let course_boxplot = plotter.generate_course_boxplot()?;
    info!("Plots generated successfully.");

    Ok(AnalysisOutputs {
        report,
        distribution_plot,
        course_boxplot,
    })
}

/// Run the analysis with console banners. Returns whether it succeeded.
pub fn process_analysis(input: &Path, config: &AnalysisConfig) -> bool {
    println!("\n--- Starting UCDA Analysis ---");
    let succeeded = match run_analysis(input, config) {
        Ok(outputs) => {
            info!(
                report = %outputs.report.display(),
                distribution_plot = %outputs.distribution_plot.display(),
                course_boxplot = %outputs.course_boxplot.display(),
                "Analysis outputs written"
            );
            true
        }
        Err(e) => {
            report_failure(&e);
            false
        }
    };
    println!("\n--- UCDA Analysis Complete ---\n");
    succeeded
}

fn report_failure(err: &AnalysisError) {
    match err {
        AnalysisError::Load(LoaderError::FileNotFound(_)) => {
            println!("\n❌ ERROR: {}", err);
            error!(severity = "CRITICAL", "Critical Error: {}", err);
        }
        AnalysisError::Validation(ValidationError::Invalid(errors)) => {
            println!("\n❌ DATA VALIDATION FAILED:");
            for item in errors {
                println!("  - {}", item);
                error!("Validation Error: {}", item);
            }
            println!("\nPlease fix the input file and try again.");
        }
        AnalysisError::Load(LoaderError::Parse(_))
        | AnalysisError::Validation(ValidationError::PolarsError(_)) => {
            println!("\n❌ ERROR: Data processing failed. {}", err);
            error!("Processing Error: {}", err);
        }
        _ => {
            println!("\n❌ An unexpected system error occurred: {}", err);
            error!(severity = "CRITICAL", "System Error: {}", err);
        }
    }
}
