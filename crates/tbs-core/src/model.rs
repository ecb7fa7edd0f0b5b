//! Verse rows as read from the dataset

use std::borrow::Borrow;
use std::fmt;
use serde::{Serialize, Deserialize};

/// Chapter label exactly as it appears in the dataset.
///
/// Labels are opaque grouping keys: `"10"` and `"010"` are different
/// chapters and no numeric ordering is implied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterLabel(String);

impl ChapterLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChapterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ChapterLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChapterLabel {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for ChapterLabel {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// One verse record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Book name in the dataset's own naming (the dataset key)
    pub book_name: String,

    /// 1-based book number, when present and numeric
    pub book_number: Option<u32>,

    /// Chapter label
    pub chapter: ChapterLabel,

    /// Verse label, opaque
    pub verse: String,

    /// Display text
    pub text: String,
}

impl Row {
    /// Create a new row
    pub fn new(
        book_name: impl Into<String>,
        book_number: Option<u32>,
        chapter: impl Into<ChapterLabel>,
        verse: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            book_name: book_name.into(),
            book_number,
            chapter: chapter.into(),
            verse: verse.into(),
            text: text.into(),
        }
    }

    /// `chapter:verse` reference shown under the verse text
    pub fn reference(&self) -> String {
        format!("{}:{}", self.chapter, self.verse)
    }
}

/// Ordered sequence of rows from one load. Source order is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_chapter_label_lookup_by_str() {
        let mut counts: HashMap<ChapterLabel, usize> = HashMap::new();
        counts.insert(ChapterLabel::from("3"), 16);

        assert_eq!(counts.get("3"), Some(&16));
        assert_eq!(counts.get("03"), None);
    }

    #[test]
    fn test_row_reference() {
        let row = Row::new("John", Some(43), "3", "16", "...");
        assert_eq!(row.reference(), "3:16");
    }
}
