//! Book registry: ordered display names and their dataset keys
//!
//! The registry is built from two tables: the ordered list of display names
//! (index-addressable, 0-based) and a mapping from the dataset's book key to
//! a display name. The inverse of that mapping is computed once here so
//! resolving a book never scans the table.

use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::error::CoreError;

/// Number of books in the canonical registry
pub const CANONICAL_BOOK_COUNT: usize = 66;

/// Books at indices below this belong to the Old Testament
pub const OLD_TESTAMENT_BOOKS: usize = 39;

/// Canonical (display name, dataset key) pairs in registry order.
const CANONICAL_BOOKS: [(&str, &str); CANONICAL_BOOK_COUNT] = [
    ("ஆதியாகமம்", "Genesis"),
    ("யாத்திராகமம்", "Exodus"),
    ("லேவியராகமம்", "Leviticus"),
    ("எண்ணாகமம்", "Numbers"),
    ("உபாகமம்", "Deuteronomy"),
    ("யோசுவா", "Joshua"),
    ("நியாயாதிபதிகள்", "Judges"),
    ("ரூத்", "Ruth"),
    ("1 சாமுவேல்", "1 Samuel"),
    ("2 சாமுவேல்", "2 Samuel"),
    ("1 இராஜாக்கள்", "1 Kings"),
    ("2 இராஜாக்கள்", "2 Kings"),
    ("1 நாளாகமம்", "1 Chronicles"),
    ("2 நாளாகமம்", "2 Chronicles"),
    ("எஸ்றா", "Ezra"),
    ("நெகேமியா", "Nehemiah"),
    ("எஸ்தர்", "Esther"),
    ("யோபு", "Job"),
    ("சங்கீதம்", "Psalms"),
    ("நீதிமொழிகள்", "Proverbs"),
    ("பிரசங்கி", "Ecclesiastes"),
    ("உன்னதப்பாட்டு", "Song of Solomon"),
    ("ஏசாயா", "Isaiah"),
    ("எரேமியா", "Jeremiah"),
    ("புலம்பல்", "Lamentations"),
    ("எசேக்கியேல்", "Ezekiel"),
    ("தானியேல்", "Daniel"),
    ("ஓசியா", "Hosea"),
    ("யோவேல்", "Joel"),
    ("ஆமோஸ்", "Amos"),
    ("ஒபதியா", "Obadiah"),
    ("யோனா", "Jonah"),
    ("மீகா", "Micah"),
    ("நாகூம்", "Nahum"),
    ("ஆபகூக்", "Habakkuk"),
    ("செப்பனியா", "Zephaniah"),
    ("ஆகாய்", "Haggai"),
    ("சகரியா", "Zechariah"),
    ("மல்கியா", "Malachi"),
    ("மத்தேயு", "Matthew"),
    ("மாற்கு", "Mark"),
    ("லூக்கா", "Luke"),
    ("யோவான்", "John"),
    ("அப்போஸ்தலருடைய நடபடிகள்", "Acts"),
    ("ரோமர்", "Romans"),
    ("1 கொரிந்தியர்", "1 Corinthians"),
    ("2 கொரிந்தியர்", "2 Corinthians"),
    ("கலாத்தியர்", "Galatians"),
    ("எபேசியர்", "Ephesians"),
    ("பிலிப்பியர்", "Philippians"),
    ("கொலோசெயர்", "Colossians"),
    ("1 தெசலோனிக்கேயர்", "1 Thessalonians"),
    ("2 தெசலோனிக்கேயர்", "2 Thessalonians"),
    ("1 தீமோத்தேயு", "1 Timothy"),
    ("2 தீமோத்தேயு", "2 Timothy"),
    ("தீத்து", "Titus"),
    ("பிலேமோன்", "Philemon"),
    ("எபிரெயர்", "Hebrews"),
    ("யாக்கோபு", "James"),
    ("1 பேதுரு", "1 Peter"),
    ("2 பேதுரு", "2 Peter"),
    ("1 யோவான்", "1 John"),
    ("2 யோவான்", "2 John"),
    ("3 யோவான்", "3 John"),
    ("யூதா", "Jude"),
    ("வெளிப்படுத்தின விசேஷம்", "Revelation"),
];

static CANONICAL: Lazy<BookRegistry> = Lazy::new(|| {
    let entries = CANONICAL_BOOKS
        .iter()
        .map(|(display, key)| BookEntry {
            display_name: display.to_string(),
            dataset_key: Some(key.to_string()),
        })
        .collect();
    BookRegistry::from_entries(entries)
});

/// Errors raised while building a registry from custom tables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate display name '{0}'")]
    DuplicateDisplayName(String),

    #[error("Duplicate dataset key '{0}'")]
    DuplicateDatasetKey(String),

    #[error("Dataset key '{key}' maps to unknown display name '{display_name}'")]
    UnknownDisplayName { key: String, display_name: String },

    #[error("Display name '{0}' is mapped from more than one dataset key")]
    AmbiguousDisplayName(String),
}

/// Testament a book belongs to (by registry position, convention only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Testament {
    Old,
    New,
}

/// A display name and the dataset key that maps to it, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub display_name: String,
    pub dataset_key: Option<String>,
}

/// Ordered, index-addressable book registry
#[derive(Debug, Clone)]
pub struct BookRegistry {
    entries: Vec<BookEntry>,
    index_by_key: AHashMap<String, usize>,
}

impl BookRegistry {
    /// The built-in 66-book registry (Tamil display names, English dataset keys)
    pub fn canonical() -> &'static BookRegistry {
        &CANONICAL
    }

    /// Build a registry from the two tables supplied by the embedding
    /// application.
    ///
    /// Display names must be unique, dataset keys must be unique, and every
    /// mapped display name must appear in `display_names` exactly once on
    /// the mapping side. Display names without a key are allowed; they
    /// resolve to an empty book.
    pub fn from_tables(
        display_names: Vec<String>,
        key_to_display: Vec<(String, String)>,
    ) -> Result<Self, RegistryError> {
        let mut position_by_name: AHashMap<&str, usize> = AHashMap::new();
        for (idx, name) in display_names.iter().enumerate() {
            if position_by_name.insert(name.as_str(), idx).is_some() {
                return Err(RegistryError::DuplicateDisplayName(name.clone()));
            }
        }

        let mut keys: Vec<Option<String>> = vec![None; display_names.len()];
        let mut seen_keys: AHashSet<&str> = AHashSet::new();
        for (key, display_name) in &key_to_display {
            if !seen_keys.insert(key.as_str()) {
                return Err(RegistryError::DuplicateDatasetKey(key.clone()));
            }
            let idx = *position_by_name.get(display_name.as_str()).ok_or_else(|| {
                RegistryError::UnknownDisplayName {
                    key: key.clone(),
                    display_name: display_name.clone(),
                }
            })?;
            if keys[idx].is_some() {
                return Err(RegistryError::AmbiguousDisplayName(display_name.clone()));
            }
            keys[idx] = Some(key.clone());
        }

        let entries = display_names
            .into_iter()
            .zip(keys)
            .map(|(display_name, dataset_key)| BookEntry { display_name, dataset_key })
            .collect();

        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: Vec<BookEntry>) -> Self {
        let index_by_key = entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| entry.dataset_key.clone().map(|key| (key, idx)))
            .collect();

        Self { entries, index_by_key }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BookEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    /// Display name at a registry index
    pub fn display_name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.display_name.as_str())
    }

    /// Dataset key whose display name sits at `index`
    pub fn dataset_key(&self, index: usize) -> Option<&str> {
        self.entries.get(index).and_then(|e| e.dataset_key.as_deref())
    }

    /// Registry index of a dataset key
    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        self.index_by_key.get(key).copied()
    }

    /// Display name for a 1-based dataset book number
    pub fn display_name_for_number(&self, book_number: u32) -> Option<&str> {
        let index = (book_number as usize).checked_sub(1)?;
        self.display_name(index)
    }

    pub fn testament(&self, index: usize) -> Option<Testament> {
        if index >= self.entries.len() {
            return None;
        }
        Some(if index < OLD_TESTAMENT_BOOKS { Testament::Old } else { Testament::New })
    }

    /// Books of one testament with their registry indices
    pub fn books_in(&self, testament: Testament) -> impl Iterator<Item = (usize, &BookEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(idx, _)| self.testament(*idx) == Some(testament))
    }

    /// Check a raw (possibly negative) book selection against the registry
    pub fn validate_index(&self, requested: i64) -> Result<usize, CoreError> {
        usize::try_from(requested)
            .map_err(|_| self.invalid_index(requested))
            .and_then(|index| self.check_index(index))
    }

    /// Check a book index against the registry bounds
    pub fn check_index(&self, index: usize) -> Result<usize, CoreError> {
        if index < self.entries.len() {
            Ok(index)
        } else {
            Err(self.invalid_index(index))
        }
    }

    fn invalid_index(&self, requested: impl ToString) -> CoreError {
        CoreError::InvalidBookIndex {
            requested: requested.to_string(),
            len: self.entries.len(),
        }
    }
}
