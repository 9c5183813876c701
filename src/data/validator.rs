//! Data Validator Module
//! Schema checks, type coercion and mean imputation for the raw score table.

use crate::data::schema::{ColumnKind, REQUIRED_COLUMNS};
use crate::stats::StatsCalculator;
use polars::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Data validation failed with {} error(s)", .0.len())]
    Invalid(Vec<String>),
}

/// Runs validation checks against a loaded table and collects every problem found.
pub struct DataValidator {
    df: DataFrame,
    errors: Vec<String>,
}

impl DataValidator {
    pub fn new(df: DataFrame) -> Self {
        Self {
            df,
            errors: Vec::new(),
        }
    }

    /// Check that every required column is present.
    pub fn validate_columns(&mut self) -> bool {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| self.df.column(name).is_err())
            .collect();

        if !missing.is_empty() {
            self.errors
                .push(format!("Missing required columns: {}", missing.join(", ")));
        }
        missing.is_empty()
    }

    /// Coerce each present required column to its expected type.
    ///
    /// Successfully coerced columns replace the originals in the held table.
    pub fn validate_dtypes(&mut self) -> bool {
        let mut type_errors = Vec::new();

        for (name, kind) in REQUIRED_COLUMNS {
            let Ok(column) = self.df.column(name) else {
                continue;
            };

            match Self::coerce(column, kind) {
                Some(series) => {
                    if let Err(e) = self.df.with_column(series) {
                        type_errors.push(format!("Column '{}' could not be replaced: {}", name, e));
                    }
                }
                None => type_errors.push(format!(
                    "Column '{}' failed to cast to {}. Contains invalid values.",
                    name, kind
                )),
            }
        }

        let ok = type_errors.is_empty();
        self.errors.extend(type_errors);
        ok
    }

    /// Strict cast. Integer columns may not contain missing values.
    fn coerce(column: &Column, kind: ColumnKind) -> Option<Series> {
        let series = column
            .as_materialized_series()
            .strict_cast(&kind.dtype())
            .ok()?;
        if kind == ColumnKind::Integer && series.null_count() > 0 {
            return None;
        }
        Some(series)
    }

    /// Run all validation checks.
    pub fn is_valid(&mut self) -> bool {
        self.validate_columns();
        self.validate_dtypes();
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Return a copy of the table with missing numeric values replaced by the column mean.
    pub fn clean_data(&self) -> Result<DataFrame, ValidationError> {
        let mut cleaned = self.df.clone();

        for (name, kind) in REQUIRED_COLUMNS {
            if !kind.is_numeric() {
                continue;
            }
            let Ok(column) = cleaned.column(name) else {
                continue;
            };

            let values = column.cast(&DataType::Float64)?;
            let ca = values.f64()?;
            let present: Vec<f64> = ca.into_iter().flatten().filter(|v| !v.is_nan()).collect();

            let Some(mean) = StatsCalculator::mean(&present) else {
                warn!("Column '{}' has no values to compute a fill mean from", name);
                continue;
            };

            let filled: Vec<f64> = ca
                .into_iter()
                .map(|v| match v {
                    Some(x) if !x.is_nan() => x,
                    _ => mean,
                })
                .collect();

            let replacement = match kind {
                ColumnKind::Integer => Column::new(
                    name.into(),
                    filled.iter().map(|v| v.round() as i64).collect::<Vec<i64>>(),
                ),
                _ => Column::new(name.into(), filled),
            };
            cleaned.with_column(replacement)?;

            println!("Info: Filled missing values in '{}' with mean ({:.2}).", name, mean);
            info!(column = name, mean, "Filled missing values with column mean");
        }

        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "StudentID" => [1i64, 2, 3],
            "CourseID" => ["CS101", "CS101", "MA201"],
            "Quiz1_Score" => [Some(80.0), None, Some(90.0)],
            "Midterm_Score" => [70.0, 75.0, 80.0],
            "Final_Score" => [Some(60.0), Some(f64::NAN), Some(100.0)],
            "FinalGrade" => [60.0, 75.0, 90.0]
        )
        .unwrap()
    }

    #[test]
    fn complete_table_is_valid() {
        let mut validator = DataValidator::new(sample_df());
        assert!(validator.is_valid());
        assert!(validator.errors().is_empty());
    }

    #[test]
    fn missing_column_is_named() {
        let df = sample_df().drop("Midterm_Score").unwrap();
        let mut validator = DataValidator::new(df);

        assert!(!validator.is_valid());
        assert_eq!(validator.errors().len(), 1);
        assert!(validator.errors()[0].contains("Midterm_Score"));
    }

    #[test]
    fn every_missing_column_is_listed_in_schema_order() {
        let df = df!("StudentID" => [1i64], "FinalGrade" => [80.0]).unwrap();
        let mut validator = DataValidator::new(df);

        assert!(!validator.validate_columns());
        assert_eq!(
            validator.errors()[0],
            "Missing required columns: CourseID, Quiz1_Score, Midterm_Score, Final_Score"
        );
    }

    #[test]
    fn text_in_numeric_column_fails_dtype_check() {
        let mut df = sample_df();
        df.with_column(Column::new("Quiz1_Score".into(), ["80", "abc", "90"]))
            .unwrap();
        let mut validator = DataValidator::new(df);

        assert!(!validator.is_valid());
        assert_eq!(
            validator.errors(),
            ["Column 'Quiz1_Score' failed to cast to float64. Contains invalid values."]
        );
    }

    #[test]
    fn numeric_text_is_coerced() {
        let mut df = sample_df();
        df.with_column(Column::new("Midterm_Score".into(), ["70", "75.5", "80"]))
            .unwrap();
        let mut validator = DataValidator::new(df);

        assert!(validator.validate_dtypes());
        let cleaned = validator.clean_data().unwrap();
        assert_eq!(cleaned.column("Midterm_Score").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn missing_student_id_fails_integer_cast() {
        let mut df = sample_df();
        df.with_column(Column::new("StudentID".into(), [Some(1i64), None, Some(3)]))
            .unwrap();
        let mut validator = DataValidator::new(df);

        assert!(!validator.validate_dtypes());
        assert!(validator.errors()[0].contains("StudentID"));
    }

    #[test]
    fn cleaning_fills_null_and_nan_with_mean() {
        let mut validator = DataValidator::new(sample_df());
        assert!(validator.is_valid());
        let cleaned = validator.clean_data().unwrap();

        for (name, kind) in REQUIRED_COLUMNS {
            if !kind.is_numeric() {
                continue;
            }
            let values = cleaned.column(name).unwrap().cast(&DataType::Float64).unwrap();
            let ca = values.f64().unwrap();
            assert_eq!(ca.null_count(), 0, "{name} still has nulls");
            assert!(ca.into_iter().flatten().all(|v| !v.is_nan()), "{name} still has NaN");
        }

        let quiz = cleaned.column("Quiz1_Score").unwrap().f64().unwrap().get(1);
        assert_eq!(quiz, Some(85.0));
        let final_score = cleaned.column("Final_Score").unwrap().f64().unwrap().get(1);
        assert_eq!(final_score, Some(80.0));
    }

    #[test]
    fn cleaning_does_not_touch_validity() {
        let df = sample_df().drop("CourseID").unwrap();
        let mut validator = DataValidator::new(df);
        assert!(!validator.is_valid());

        validator.clean_data().unwrap();
        assert_eq!(validator.errors().len(), 1);
    }
}
