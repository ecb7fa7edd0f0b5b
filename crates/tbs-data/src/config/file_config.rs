//! File configuration for dataset loading

use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use crate::DataError;

/// Default dataset file name
pub const DEFAULT_DATASET_FILE: &str = "ta_irv.csv";

/// Header names of the five verse columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub book_name: String,
    pub book_number: String,
    pub chapter: String,
    pub verse: String,
    pub text: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            book_name: "Book Name".to_string(),
            book_number: "Book Number".to_string(),
            chapter: "Chapter".to_string(),
            verse: "Verse".to_string(),
            text: "Text".to_string(),
        }
    }
}

impl ColumnNames {
    /// All column names, in row field order
    pub fn all(&self) -> [&str; 5] {
        [
            self.book_name.as_str(),
            self.book_number.as_str(),
            self.chapter.as_str(),
            self.verse.as_str(),
            self.text.as_str(),
        ]
    }
}

/// Configuration for the verse dataset file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the CSV file
    pub path: PathBuf,

    /// Field delimiter
    pub delimiter: u8,

    /// Header names to read the verse fields from
    pub columns: ColumnNames,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_FILE),
            delimiter: b',',
            columns: ColumnNames::default(),
        }
    }
}

impl DatasetConfig {
    /// Create a configuration for a file with default columns
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can describe a readable dataset
    pub fn validate(&self) -> Result<(), DataError> {
        if self.path.as_os_str().is_empty() {
            return Err(DataError::Config("dataset path is empty".to_string()));
        }
        if self.columns.all().iter().any(|name| name.trim().is_empty()) {
            return Err(DataError::Config("column names must not be empty".to_string()));
        }
        Ok(())
    }
}
