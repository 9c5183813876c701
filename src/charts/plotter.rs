//! Chart Plotter Module
//! Prepares grade data for the static charts and saves them as PNG files.

use crate::charts::StaticChartRenderer;
use crate::config::AnalysisConfig;
use crate::data::schema::{COURSE_ID, FINAL_GRADE};
use crate::stats::StatsCalculator;
use plotters::prelude::Quartiles;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Number of histogram bins for the grade distribution.
pub const HISTOGRAM_BINS: usize = 10;

pub const DISTRIBUTION_FILE: &str = "final_grade_distribution.png";
pub const BOXPLOT_FILE: &str = "course_grade_boxplot.png";

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to prepare plot directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

/// Equal-width histogram over a closed value range.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeHistogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl GradeHistogram {
    /// Bin values into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// Every bin is half-open except the last, which also holds the maximum.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (lo, hi) = Self::range(values);
        let width = (hi - lo) / bins as f64;

        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    fn range(values: &[f64]) -> (f64, f64) {
        if values.is_empty() {
            return (0.0, 1.0);
        }
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Final grades of one course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseGroup {
    pub course: String,
    pub grades: Vec<f64>,
}

impl CourseGroup {
    /// Box and whisker summary of the course grades, `None` without grades.
    pub fn box_stats(&self) -> Option<BoxStats> {
        BoxStats::from_grades(&self.grades)
    }
}

/// Box plot geometry for one course.
///
/// Whiskers end at the furthest grades inside `1.5 * IQR` of the box; grades
/// beyond them are outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_grades(grades: &[f64]) -> Option<Self> {
        if grades.is_empty() {
            return None;
        }

        let [lower_fence, q1, median, q3, upper_fence] =
            Quartiles::new(grades).values().map(f64::from);
        let inside = |v: &f64| *v >= lower_fence && *v <= upper_fence;

        let lower_whisker = grades.iter().copied().filter(inside).fold(f64::INFINITY, f64::min);
        let upper_whisker = grades
            .iter()
            .copied()
            .filter(inside)
            .fold(f64::NEG_INFINITY, f64::max);
        let outliers = grades.iter().copied().filter(|v| !inside(v)).collect();

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    /// Lowest and highest value drawn for this box.
    pub fn extent(&self) -> (f64, f64) {
        self.outliers.iter().fold(
            (self.lower_whisker, self.upper_whisker),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
    }
}

/// Group final grades by course, with courses in sorted order.
pub fn course_groups(df: &DataFrame) -> PolarsResult<Vec<CourseGroup>> {
    let courses = df.column(COURSE_ID)?.cast(&DataType::String)?;
    let grades = df.column(FINAL_GRADE)?.cast(&DataType::Float64)?;

    let mut by_course: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (course, grade) in courses
        .as_materialized_series()
        .str()?
        .into_iter()
        .zip(grades.f64()?.into_iter())
    {
        if let (Some(course), Some(grade)) = (course, grade) {
            if !grade.is_nan() {
                by_course.entry(course.to_string()).or_default().push(grade);
            }
        }
    }

    Ok(by_course
        .into_iter()
        .map(|(course, grades)| CourseGroup { course, grades })
        .collect())
}

/// Renders the grade charts for a cleaned table.
pub struct Plotter<'a> {
    df: &'a DataFrame,
    plot_dir: PathBuf,
}

impl<'a> Plotter<'a> {
    pub fn new(df: &'a DataFrame, config: &AnalysisConfig) -> Result<Self, PlotError> {
        fs::create_dir_all(&config.plot_dir)?;
        Ok(Self {
            df,
            plot_dir: config.plot_dir.clone(),
        })
    }

    /// Histogram of final grades across all courses.
    pub fn generate_grade_distribution(&self) -> Result<PathBuf, PlotError> {
        let grades = StatsCalculator::column_values(self.df, FINAL_GRADE)?;
        let histogram = GradeHistogram::from_values(&grades, HISTOGRAM_BINS);

        let plot_path = self.plot_dir.join(DISTRIBUTION_FILE);
        StaticChartRenderer::draw_histogram(&plot_path, &histogram)?;

        println!("✅ Grade Distribution Plot saved to: {}", plot_path.display());
        info!(path = %plot_path.display(), records = histogram.total(), "Grade distribution plot saved");
        Ok(plot_path)
    }

    /// Box plot of final grade spread per course.
    pub fn generate_course_boxplot(&self) -> Result<PathBuf, PlotError> {
        let groups = course_groups(self.df)?;

        let plot_path = self.plot_dir.join(BOXPLOT_FILE);
        StaticChartRenderer::draw_course_boxplot(&plot_path, &groups)?;

        println!("✅ Course Box Plot saved to: {}", plot_path.display());
        info!(path = %plot_path.display(), "Course box plot saved");
        Ok(plot_path)
    }
}
