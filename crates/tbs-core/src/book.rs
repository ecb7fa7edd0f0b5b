//! Book resolution and chapter grouping
//!
//! A requested registry index is resolved to the rows of one book
//! ([`FilteredBook`]), which are then partitioned by chapter label
//! ([`ChapterGroup`]). Both keep dataset order; nothing is sorted.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::model::{ChapterLabel, Dataset, Row};
use crate::registry::BookRegistry;

/// Rows of one selected book, in dataset order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredBook {
    rows: Vec<Row>,
}

impl FilteredBook {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    /// Chapter label of the row at `position`
    pub fn chapter_at(&self, position: usize) -> Option<&ChapterLabel> {
        self.rows.get(position).map(|row| &row.chapter)
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

/// Resolve a registry index to the rows of that book.
///
/// Rows match when their book name, trimmed, equals the dataset key mapped
/// to the display name at `book_index` (case-sensitive). A display name
/// without a key, an index outside the registry, or a key with no rows all
/// give an empty book.
pub fn resolve(book_index: usize, registry: &BookRegistry, dataset: &Dataset) -> FilteredBook {
    let Some(key) = registry.dataset_key(book_index) else {
        debug!("No dataset key for book index {}", book_index);
        return FilteredBook::default();
    };

    let rows: Vec<Row> = dataset
        .iter()
        .filter(|row| row.book_name.trim() == key)
        .cloned()
        .collect();

    debug!("Resolved book {} ('{}') to {} rows", book_index, key, rows.len());
    FilteredBook::new(rows)
}

/// Book names in the dataset that no registry key matches, first-seen order.
///
/// Rows under these names can never be selected.
pub fn unknown_books<'a>(registry: &BookRegistry, dataset: &'a Dataset) -> Vec<&'a str> {
    dataset
        .iter()
        .map(|row| row.book_name.trim())
        .filter(|name| !name.is_empty() && registry.index_of_key(name).is_none())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// A row together with its position in the filtered book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRow {
    pub row: Row,
    pub position: usize,
}

/// Rows of a book partitioned by chapter label.
///
/// Iteration follows the first occurrence of each label in the book; within
/// a chapter, rows are in position order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterGroup {
    chapters: IndexMap<ChapterLabel, Vec<GroupedRow>>,
}

impl ChapterGroup {
    /// Group a book's rows with a single forward pass
    pub fn from_book(book: &FilteredBook) -> Self {
        let mut chapters: IndexMap<ChapterLabel, Vec<GroupedRow>> = IndexMap::new();
        for (position, row) in book.iter().enumerate() {
            chapters
                .entry(row.chapter.clone())
                .or_default()
                .push(GroupedRow { row: row.clone(), position });
        }
        Self { chapters }
    }

    pub fn get(&self, chapter: &str) -> Option<&[GroupedRow]> {
        self.chapters.get(chapter).map(Vec::as_slice)
    }

    pub fn labels(&self) -> impl Iterator<Item = &ChapterLabel> {
        self.chapters.keys()
    }

    pub fn first_label(&self) -> Option<&ChapterLabel> {
        self.chapters.keys().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChapterLabel, &[GroupedRow])> {
        self.chapters.iter().map(|(label, rows)| (label, rows.as_slice()))
    }

    /// Number of chapters
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

/// Group a filtered book by chapter
pub fn group(book: &FilteredBook) -> ChapterGroup {
    ChapterGroup::from_book(book)
}

/// Everything the presentation needs about one opened book.
///
/// Built in one go from a loaded dataset and swapped as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookView {
    pub book_index: usize,
    pub display_name: String,
    pub filtered: FilteredBook,
    pub chapters: ChapterGroup,
}

impl BookView {
    pub fn build(book_index: usize, registry: &BookRegistry, dataset: &Dataset) -> Self {
        let filtered = resolve(book_index, registry, dataset);
        let chapters = group(&filtered);

        // The dataset's own book number names the book when it is usable
        let display_name = filtered
            .get(0)
            .and_then(|row| row.book_number)
            .and_then(|number| registry.display_name_for_number(number))
            .or_else(|| registry.display_name(book_index))
            .unwrap_or_default()
            .to_string();

        Self {
            book_index,
            display_name,
            filtered,
            chapters,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(book: &str, chapter: &str, verse: &str) -> Row {
        Row::new(book, None, chapter, verse, format!("{} {}:{}", book, chapter, verse))
    }

    #[test]
    fn test_unknown_books_are_distinct_and_ordered() {
        let dataset = Dataset::new(vec![
            row("Genesis", "1", "1"),
            row(" Enoch ", "1", "1"),
            row("genesis", "1", "1"),
            row("Enoch", "1", "2"),
            row("", "1", "1"),
        ]);
        assert_eq!(unknown_books(BookRegistry::canonical(), &dataset), vec!["Enoch", "genesis"]);
    }

    fn genesis_dataset() -> Dataset {
        Dataset::new(vec![
            row("Genesis", "1", "1"),
            row("Exodus", "1", "1"),
            row(" Genesis ", "1", "2"),
            row("genesis", "1", "3"),
            row("Genesis", "2", "1"),
        ])
    }

    #[test]
    fn test_resolve_filters_by_trimmed_key() {
        let book = resolve(0, BookRegistry::canonical(), &genesis_dataset());

        let verses: Vec<_> = book.iter().map(|r| (r.chapter.as_str(), r.verse.as_str())).collect();
        assert_eq!(verses, vec![("1", "1"), ("1", "2"), ("2", "1")]);
        assert!(book.iter().all(|r| r.book_name.trim() == "Genesis"));
    }

    #[test]
    fn test_resolve_unmatched_book_is_empty() {
        let registry = BookRegistry::canonical();
        assert!(resolve(65, registry, &genesis_dataset()).is_empty());
        assert!(resolve(1000, registry, &genesis_dataset()).is_empty());
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let book = FilteredBook::new(vec![
            row("Psalms", "10", "1"),
            row("Psalms", "2", "1"),
            row("Psalms", "10", "2"),
            row("Psalms", "02", "1"),
        ]);
        let chapters = group(&book);

        let labels: Vec<_> = chapters.labels().map(ChapterLabel::as_str).collect();
        assert_eq!(labels, vec!["10", "2", "02"]);

        let positions: Vec<_> = chapters.get("10").unwrap().iter().map(|g| g.position).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_genesis_scenario() {
        let dataset = Dataset::new(vec![
            row("Genesis", "1", "1"),
            row("Genesis", "1", "2"),
            row("Genesis", "2", "1"),
        ]);
        let book = resolve(0, BookRegistry::canonical(), &dataset);
        assert_eq!(book.len(), 3);

        let chapters = group(&book);
        assert_eq!(chapters.len(), 2);
        let first: Vec<_> = chapters.get("1").unwrap().iter().map(|g| (g.row.clone(), g.position)).collect();
        assert_eq!(first, vec![(dataset.rows()[0].clone(), 0), (dataset.rows()[1].clone(), 1)]);
        let second: Vec<_> = chapters.get("2").unwrap().iter().map(|g| (g.row.clone(), g.position)).collect();
        assert_eq!(second, vec![(dataset.rows()[2].clone(), 2)]);
    }

    #[test]
    fn test_book_view_display_name_from_book_number() {
        let registry = BookRegistry::canonical();
        let dataset = Dataset::new(vec![Row::new("John", Some(43), "3", "16", "...")]);

        let view = BookView::build(42, registry, &dataset);
        assert_eq!(view.display_name, registry.display_name(42).unwrap());
        assert_eq!(view.chapters.first_label().map(ChapterLabel::as_str), Some("3"));
    }

    #[test]
    fn test_book_view_falls_back_to_registry_name() {
        let registry = BookRegistry::canonical();
        let dataset = Dataset::new(vec![Row::new("John", Some(400), "3", "16", "...")]);
        assert_eq!(BookView::build(42, registry, &dataset).display_name, registry.display_name(42).unwrap());

        let empty = BookView::build(1, registry, &dataset);
        assert!(empty.is_empty());
        assert_eq!(empty.display_name, registry.display_name(1).unwrap());
    }

    fn arb_book() -> impl Strategy<Value = FilteredBook> {
        prop::collection::vec(("[1-4]", "[1-9]"), 0..40).prop_map(|pairs| {
            FilteredBook::new(pairs.into_iter().map(|(c, v)| row("Genesis", &c, &v)).collect())
        })
    }

    proptest! {
        #[test]
        fn prop_group_reconstructs_book(book in arb_book()) {
            let chapters = group(&book);
            let mut flattened: Vec<&GroupedRow> = chapters.iter().flat_map(|(_, rows)| rows.iter()).collect();
            flattened.sort_by_key(|g| g.position);

            prop_assert_eq!(flattened.len(), book.len());
            for (expected_position, grouped) in flattened.iter().enumerate() {
                prop_assert_eq!(grouped.position, expected_position);
                prop_assert_eq!(&grouped.row, &book.rows()[expected_position]);
            }
        }

        #[test]
        fn prop_resolve_never_leaks_other_books(
            names in prop::collection::vec(prop::sample::select(vec!["Genesis", " Genesis", "Exodus", "John", "genesis"]), 0..30)
        ) {
            let dataset: Dataset = names.iter().map(|n| row(n, "1", "1")).collect();
            let book = resolve(0, BookRegistry::canonical(), &dataset);

            prop_assert!(book.iter().all(|r| r.book_name.trim() == "Genesis"));
            let expected = names.iter().filter(|n| n.trim() == "Genesis").count();
            prop_assert_eq!(book.len(), expected);
        }
    }
}
