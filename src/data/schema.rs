//! Required input schema for course score files.

use polars::prelude::DataType;
use std::fmt;

pub const STUDENT_ID: &str = "StudentID";
pub const COURSE_ID: &str = "CourseID";
pub const FINAL_GRADE: &str = "FinalGrade";

/// Target type a required column must coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    Float,
}

impl ColumnKind {
    pub fn dtype(self) -> DataType {
        match self {
            ColumnKind::Integer => DataType::Int64,
            ColumnKind::Text => DataType::String,
            ColumnKind::Float => DataType::Float64,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Text => "string",
            ColumnKind::Float => "float64",
        };
        f.write_str(name)
    }
}

/// Required columns in schema order.
pub const REQUIRED_COLUMNS: [(&str, ColumnKind); 6] = [
    (STUDENT_ID, ColumnKind::Integer),
    (COURSE_ID, ColumnKind::Text),
    ("Quiz1_Score", ColumnKind::Float),
    ("Midterm_Score", ColumnKind::Float),
    ("Final_Score", ColumnKind::Float),
    (FINAL_GRADE, ColumnKind::Float),
];

/// Columns that get descriptive statistics in the report.
pub fn is_score_column(name: &str) -> bool {
    name.contains("Score") || name.contains("Grade")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_columns_match_by_name() {
        assert!(is_score_column("Quiz1_Score"));
        assert!(is_score_column(FINAL_GRADE));
        assert!(!is_score_column(STUDENT_ID));
        assert!(!is_score_column(COURSE_ID));
    }
}
