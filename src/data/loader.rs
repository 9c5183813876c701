//! CSV Data Loader Module
//! Reads the raw score table from disk using Polars.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found at: {0}")]
    FileNotFound(PathBuf),
    #[error("Error parsing CSV file: {0}")]
    Parse(#[source] PolarsError),
    #[error("An unexpected error occurred during loading: {0}")]
    Other(#[source] PolarsError),
}

impl From<PolarsError> for LoaderError {
    fn from(err: PolarsError) -> Self {
        match err {
            PolarsError::IO { .. } => LoaderError::Other(err),
            other => LoaderError::Parse(other),
        }
    }
}

/// Loads the raw table for one input file.
pub struct DataLoader {
    file_path: PathBuf,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Read the whole CSV file.
    ///
    /// Column types are inferred from every row so that a stray text value
    /// late in a numeric column is kept as text for the validator to report.
    pub fn load_data(&self) -> Result<DataFrame, LoaderError> {
        if !self.file_path.exists() {
            return Err(LoaderError::FileNotFound(self.file_path.clone()));
        }

        println!("Loading data from {}...", self.file_path.display());

        let df = LazyCsvReader::new(&self.file_path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        info!("Successfully loaded {} records.", df.height());
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_is_reported() {
        let loader = DataLoader::new("/nonexistent/grades.csv");
        let err = loader.load_data().unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
        assert!(err.to_string().contains("/nonexistent/grades.csv"));
    }

    #[test]
    fn loads_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        fs::write(
            &path,
            "StudentID,CourseID,FinalGrade\n1,CS101,88.5\n2,CS102,64\n",
        )
        .unwrap();

        let df = DataLoader::new(&path).load_data().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn ragged_rows_are_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "a,b\n1,2,3,4\n5\n").unwrap();

        let err = DataLoader::new(&path).load_data().unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
    }
}
