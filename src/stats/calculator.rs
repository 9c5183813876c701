//! Statistics Calculator Module
//! Descriptive statistics for score columns.

use polars::prelude::*;
use statrs::statistics::{Data, Median, Statistics};

/// Descriptive statistics for a single score column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl ColumnStats {
    /// Rows in report order.
    pub fn rows(&self) -> [(&'static str, f64); 6] {
        [
            ("Mean", self.mean),
            ("Median", self.median),
            ("StdDev", self.std),
            ("Min", self.min),
            ("Max", self.max),
            ("Count", self.count as f64),
        ]
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    ///
    /// Standard deviation is the sample deviation and is NaN below two values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats::default();
        }

        let median = Data::new(values.to_vec()).median();

        ColumnStats {
            column: String::new(),
            count: n,
            mean: values.mean(),
            median,
            std: values.std_dev(),
            min: values.min(),
            max: values.max(),
        }
    }

    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.mean())
        }
    }

    /// Non-missing values of a column as f64.
    pub fn column_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
        let values = df.column(column)?.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect())
    }

    /// Statistics for each named column, in the given order.
    pub fn compute_column_stats(df: &DataFrame, columns: &[String]) -> PolarsResult<Vec<ColumnStats>> {
        columns
            .iter()
            .map(|name| {
                let values = Self::column_values(df, name)?;
                let mut stats = Self::compute_descriptive_stats(&values);
                stats.column = name.clone();
                Ok(stats)
            })
            .collect()
    }
}
