//! Summary Report Module
//! Writes the class summary text report: record counts, per-column statistics
//! and the low performance alert.

use crate::config::AnalysisConfig;
use crate::data::schema::{is_score_column, COURSE_ID, FINAL_GRADE, STUDENT_ID};
use crate::stats::{ColumnStats, StatsCalculator};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

const BANNER_WIDTH: usize = 60;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// A student whose final grade fell below the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct LowPerformer {
    pub student_id: i64,
    pub course_id: String,
    pub final_grade: f64,
}

/// Generates the analytical summary report from a cleaned table.
pub struct ReportGenerator<'a> {
    df: &'a DataFrame,
    report_path: PathBuf,
    threshold: f64,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(df: &'a DataFrame, config: &AnalysisConfig) -> Self {
        Self {
            df,
            report_path: config.report_path(),
            threshold: config.low_performance_threshold,
        }
    }

    /// Write the class summary report, returning its path.
    pub fn generate_class_summary(&self) -> Result<PathBuf, ReportError> {
        if let Some(dir) = self.report_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut out = BufWriter::new(File::create(&self.report_path)?);
        self.write_summary(&mut out)?;
        out.flush()?;

        println!("✅ Class Summary Report generated at: {}", self.report_path.display());
        info!(path = %self.report_path.display(), "Class summary report written");
        Ok(self.report_path.clone())
    }

    /// Per-student reports are not produced.
    pub fn generate_individual_reports(&self) {
        println!("\nNote: Individual student report generation skipped in this version.");
        info!("Individual student report generation skipped");
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        let banner = "=".repeat(BANNER_WIDTH);
        writeln!(out, "{}", banner)?;
        writeln!(out, "      UCDA: UNIVERSITY COURSE DATA ANALYST SUMMARY REPORT")?;
        writeln!(out, "{}", banner)?;
        writeln!(out)?;
        writeln!(out, "Total Records Analyzed: {}", self.df.height())?;
        writeln!(out, "Unique Courses: {}", self.unique_courses()?)?;
        writeln!(out)?;

        for stats in self.score_column_stats()? {
            writeln!(out, "-- {} Statistics --", stats.column)?;
            for (label, value) in stats.rows() {
                writeln!(out, "  {:<10}: {}", label, format_stat(value))?;
            }
            writeln!(out, "{}", "-".repeat(25))?;
        }

        self.write_low_performers(out)
    }

    /// Columns whose name mentions a score or grade, in table order.
    pub fn score_columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| is_score_column(name))
            .collect()
    }

    pub fn score_column_stats(&self) -> Result<Vec<ColumnStats>, ReportError> {
        Ok(StatsCalculator::compute_column_stats(self.df, &self.score_columns())?)
    }

    /// Number of distinct non-missing course identifiers.
    pub fn unique_courses(&self) -> Result<usize, ReportError> {
        let courses = self.df.column(COURSE_ID)?.as_materialized_series().drop_nulls();
        Ok(courses.n_unique()?)
    }

    /// Students below the threshold, sorted ascending by final grade.
    pub fn low_performers(&self) -> Result<Vec<LowPerformer>, ReportError> {
        let low = self
            .df
            .clone()
            .lazy()
            .filter(col(FINAL_GRADE).lt(lit(self.threshold)))
            .collect()?;

        let ids = low.column(STUDENT_ID)?.cast(&DataType::Int64)?;
        let courses = low.column(COURSE_ID)?.cast(&DataType::String)?;
        let grades = low.column(FINAL_GRADE)?.cast(&DataType::Float64)?;

        let mut records: Vec<LowPerformer> = ids
            .i64()?
            .into_iter()
            .zip(courses.as_materialized_series().str()?.into_iter())
            .zip(grades.f64()?.into_iter())
            .filter_map(|((id, course), grade)| {
                Some(LowPerformer {
                    student_id: id?,
                    course_id: course.unwrap_or_default().to_string(),
                    final_grade: grade?,
                })
            })
            .collect();

        records.sort_by(|a, b| a.final_grade.total_cmp(&b.final_grade));
        Ok(records)
    }

    fn write_low_performers<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        writeln!(
            out,
            "\n--- Low Performance Alert ({} < {}) ---",
            FINAL_GRADE,
            format_threshold(self.threshold)
        )?;

        let low = self.low_performers()?;
        if low.is_empty() {
            writeln!(out, "No students identified below the threshold.")?;
            return Ok(());
        }

        writeln!(out, "Total Low Performers: {}", low.len())?;
        let rows: Vec<[String; 3]> = low
            .iter()
            .map(|r| {
                [
                    r.student_id.to_string(),
                    r.course_id.clone(),
                    format!("{:.2}", r.final_grade),
                ]
            })
            .collect();
        write!(out, "{}", render_table([STUDENT_ID, COURSE_ID, FINAL_GRADE], &rows))?;
        Ok(())
    }
}

/// Right-aligned plain text table without an index column.
fn render_table(headers: [&str; 3], rows: &[[String; 3]]) -> String {
    let mut widths = headers.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: [&str; 3]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = width))
            .collect();
        padded.join(" ")
    };

    let mut table = line(headers);
    table.push('\n');
    for row in rows {
        table.push_str(&line([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
        table.push('\n');
    }
    table
}

/// Shortest form that keeps at least one decimal, so `70` prints as `70.0`.
fn format_threshold(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Two decimals with thousands separators.
fn format_stat(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string().to_lowercase();
    }

    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn cleaned_df() -> DataFrame {
        df!(
            "StudentID" => [1i64, 2, 3],
            "CourseID" => ["CS101", "CS101", "MA201"],
            "Quiz1_Score" => [80.0, 85.0, 90.0],
            "Midterm_Score" => [70.0, 75.0, 80.0],
            "Final_Score" => [60.0, 80.0, 100.0],
            "FinalGrade" => [90.0, 60.0, 75.0]
        )
        .unwrap()
    }

    fn config_in(dir: &Path) -> AnalysisConfig {
        AnalysisConfig {
            report_dir: dir.join("reports"),
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn only_grades_below_threshold_are_flagged() {
        let df = cleaned_df();
        let generator = ReportGenerator::new(&df, &AnalysisConfig::default());

        let low = generator.low_performers().unwrap();
        assert_eq!(
            low,
            vec![LowPerformer {
                student_id: 2,
                course_id: "CS101".to_string(),
                final_grade: 60.0,
            }]
        );
    }

    #[test]
    fn low_performers_sorted_ascending() {
        let df = df!(
            "StudentID" => [1i64, 2, 3, 4],
            "CourseID" => ["A", "B", "A", "C"],
            "FinalGrade" => [65.0, 40.0, 69.9, 55.0]
        )
        .unwrap();
        let generator = ReportGenerator::new(&df, &AnalysisConfig::default());

        let ids: Vec<i64> = generator
            .low_performers()
            .unwrap()
            .iter()
            .map(|r| r.student_id)
            .collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn score_columns_exclude_identifiers() {
        let df = cleaned_df();
        let generator = ReportGenerator::new(&df, &AnalysisConfig::default());
        assert_eq!(
            generator.score_columns(),
            vec!["Quiz1_Score", "Midterm_Score", "Final_Score", "FinalGrade"]
        );
    }

    #[test]
    fn report_file_contains_counts_and_sections() {
        let dir = tempfile::tempdir().unwrap();
        let df = cleaned_df();
        let generator = ReportGenerator::new(&df, &config_in(dir.path()));

        let path = generator.generate_class_summary().unwrap();
        let text = fs::read_to_string(path).unwrap();

        assert!(text.contains("Total Records Analyzed: 3\n"));
        assert!(text.contains("Unique Courses: 2\n"));
        assert!(text.contains("-- FinalGrade Statistics --"));
        assert!(text.contains("  Mean      : 75.00"));
        assert!(text.contains("  Count     : 3.00"));
        assert!(text.contains("--- Low Performance Alert (FinalGrade < 70.0) ---"));
        assert!(text.contains("Total Low Performers: 1"));
        assert!(text.contains("StudentID CourseID FinalGrade\n        2    CS101      60.00\n"));
    }

    #[test]
    fn report_without_low_performers() {
        let df = df!(
            "StudentID" => [1i64, 2],
            "CourseID" => ["CS101", "CS102"],
            "FinalGrade" => [88.0, 92.0]
        )
        .unwrap();
        let generator = ReportGenerator::new(&df, &AnalysisConfig::default());

        let mut buf = Vec::new();
        generator.write_summary(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("No students identified below the threshold."));
    }

    #[test]
    fn missing_courses_are_not_counted() {
        let df = df!(
            "StudentID" => [1i64, 2, 3, 4],
            "CourseID" => [Some("CS101"), None, Some("CS101"), Some("MA201")],
            "FinalGrade" => [80.0, 70.0, 90.0, 60.0]
        )
        .unwrap();
        let generator = ReportGenerator::new(&df, &AnalysisConfig::default());
        assert_eq!(generator.unique_courses().unwrap(), 2);
    }

    #[test]
    fn alert_header_keeps_threshold_precision() {
        let df = cleaned_df();
        let config = AnalysisConfig {
            low_performance_threshold: 65.25,
            ..AnalysisConfig::default()
        };
        let generator = ReportGenerator::new(&df, &config);

        let mut buf = Vec::new();
        generator.write_summary(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("--- Low Performance Alert (FinalGrade < 65.25) ---"));
        assert!(text.contains("Total Low Performers: 1"));

        assert_eq!(format_threshold(70.0), "70.0");
        assert_eq!(format_threshold(0.5), "0.5");
    }

    #[test]
    fn stats_are_grouped_by_thousands() {
        assert_eq!(format_stat(1234567.891), "1,234,567.89");
        assert_eq!(format_stat(999.0), "999.00");
        assert_eq!(format_stat(-1500.5), "-1,500.50");
        assert_eq!(format_stat(f64::NAN), "nan");
    }
}
