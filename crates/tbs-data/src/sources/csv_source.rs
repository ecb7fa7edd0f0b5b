use std::fs::File;
use std::io::{BufReader, Read};
use anyhow::Context;
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};
use tbs_core::{Dataset, Row, VerseSource};

use crate::config::{ColumnNames, DatasetConfig};
use crate::DataError;

/// Column positions resolved from the header row
#[derive(Debug, Clone, Default)]
struct ColumnIndex {
    book_name: Option<usize>,
    book_number: Option<usize>,
    chapter: Option<usize>,
    verse: Option<usize>,
    text: Option<usize>,
}

impl ColumnIndex {
    /// Match header names to columns. Order in the file does not matter.
    fn from_headers(headers: &StringRecord, names: &ColumnNames) -> Self {
        let cleaned: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |name: &str| {
            let position = cleaned.iter().position(|h| *h == name.trim());
            if position.is_none() {
                warn!("Dataset has no '{}' column; its values will be empty", name);
            }
            position
        };

        Self {
            book_name: find(names.book_name.as_str()),
            book_number: find(names.book_number.as_str()),
            chapter: find(names.chapter.as_str()),
            verse: find(names.verse.as_str()),
            text: find(names.text.as_str()),
        }
    }

    fn row(&self, record: &StringRecord) -> Row {
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        Row::new(
            field(self.book_name),
            parse_book_number(field(self.book_number)),
            field(self.chapter),
            field(self.verse),
            field(self.text),
        )
    }
}

fn parse_book_number(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// CSV verse source reading one header-described file
pub struct CsvVerseSource {
    config: DatasetConfig,
    name: String,
}

impl CsvVerseSource {
    pub fn new(config: DatasetConfig) -> Self {
        let name = config
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string();
        Self { config, name }
    }

    /// Read and parse the configured file (blocking)
    pub fn read_dataset(config: &DatasetConfig) -> Result<Dataset, DataError> {
        let file = File::open(&config.path)?;
        Self::parse_reader(BufReader::new(file), config)
    }

    /// Parse verse rows from any reader.
    ///
    /// Records shorter than the header are accepted; missing fields read as
    /// empty strings.
    pub fn parse_reader<R: Read>(reader: R, config: &DatasetConfig) -> Result<Dataset, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(config.delimiter)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers, &config.columns);

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(columns.row(&record));
        }

        debug!("Parsed {} verse rows", rows.len());
        Ok(Dataset::new(rows))
    }
}

#[async_trait]
impl VerseSource for CsvVerseSource {
    async fn load(&self) -> anyhow::Result<Dataset> {
        let config = self.config.clone();
        info!("Loading verses from {}", config.path.display());

        let dataset = tokio::task::spawn_blocking(move || Self::read_dataset(&config))
            .await
            .map_err(DataError::from)
            .and_then(|result| result)
            .with_context(|| format!("Failed to load verses from {}", self.config.path.display()))?;

        info!("Loaded {} verse rows from {}", dataset.len(), self.name);
        Ok(dataset)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;
    use tbs_core::{AppState, LoadStatus};

    fn parse(content: &str) -> Dataset {
        CsvVerseSource::parse_reader(content.as_bytes(), &DatasetConfig::default()).unwrap()
    }

    fn sample_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/ta_irv_sample.csv")
    }

    #[test]
    fn test_parse_header_driven() {
        let dataset = parse(
            "Text,Verse,Chapter,Book Number,Book Name\n\
             In the beginning,1,1,1,Genesis\n",
        );
        assert_eq!(
            dataset.rows(),
            &[Row::new("Genesis", Some(1), "1", "1", "In the beginning")]
        );
    }

    #[test]
    fn test_parse_short_record_and_bad_number() {
        let dataset = parse(
            "Book Name,Book Number,Chapter,Verse,Text\n\
             Genesis,x,1\n\
             Genesis,0,1,2,b\n",
        );
        assert_eq!(dataset.rows()[0], Row::new("Genesis", None, "1", "", ""));
        assert_eq!(dataset.rows()[1].book_number, None);
    }

    #[test]
    fn test_parse_missing_column_and_bom() {
        let dataset = parse("\u{feff}Book Name , Chapter,Verse,Text\nJohn,3,16,\"For God, so\"\n");
        let row = &dataset.rows()[0];
        assert_eq!(row.book_name, "John");
        assert_eq!(row.book_number, None);
        assert_eq!(row.chapter.as_str(), "3");
        assert_eq!(row.text, "For God, so");
    }

    #[test]
    fn test_parse_custom_delimiter_and_columns() {
        let mut config = DatasetConfig::default().with_delimiter(b'\t');
        config.columns.text = "Verse Text".to_string();
        let dataset = CsvVerseSource::parse_reader(
            "Book Name\tBook Number\tChapter\tVerse\tVerse Text\nRuth\t8\t1\t1\tt\n".as_bytes(),
            &config,
        )
        .unwrap();
        assert_eq!(dataset.rows()[0], Row::new("Ruth", Some(8), "1", "1", "t"));
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Book Name,Chapter\nGenesis,1\n").unwrap();
        file.write_all(&[0xff, 0xfe, b',', b'\n']).unwrap();

        let result = CsvVerseSource::read_dataset(&DatasetConfig::new(file.path()));
        assert!(matches!(result, Err(DataError::Csv(_))));
    }

    #[tokio::test]
    async fn test_load_sample_dataset() {
        let source = CsvVerseSource::new(DatasetConfig::new(sample_path()));
        assert_eq!(source.source_name(), "ta_irv_sample.csv");

        let dataset = source.load().await.unwrap();
        assert!(!dataset.is_empty());
        assert!(dataset.iter().any(|r| r.book_name == "Genesis"));
    }

    #[tokio::test]
    async fn test_missing_file_is_load_failure() {
        let state = AppState::default();
        let source = CsvVerseSource::new(DatasetConfig::new("/nonexistent/ta_irv.csv"));

        assert_eq!(state.load_book(&source, 0).await, Ok(true));
        match state.status() {
            LoadStatus::Failed { book_index, error } => {
                assert_eq!(book_index, 0);
                assert!(error.contains("/nonexistent/ta_irv.csv"));
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_genesis_from_sample() {
        let state = AppState::default();
        let source = CsvVerseSource::new(DatasetConfig::new(sample_path()));

        state.load_book(&source, 0).await.unwrap();
        let context = state.navigation.get_context();
        let chapters = context.chapter_group().unwrap();
        let labels: Vec<_> = chapters.labels().map(|c| c.as_str()).collect();
        assert_eq!(labels, vec!["1", "2"]);
        assert_eq!(context.state.expanded_chapter().map(|c| c.as_str()), Some("1"));

        state.navigation.jump_to_end();
        let context = state.navigation.get_context();
        assert_eq!(context.current_row().map(|r| r.reference()), Some("2:1".to_string()));
    }
}
