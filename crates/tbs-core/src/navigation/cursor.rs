//! Cursor transitions over a filtered book
//!
//! Every transition takes the current state and returns the next one; the
//! engine swaps the result in. After any move the expanded chapter follows
//! the row at the new index.

use serde::{Serialize, Deserialize};

use crate::book::FilteredBook;
use crate::error::CoreError;
use crate::model::ChapterLabel;

/// Cursor position and the chapter expanded in the navigation tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    current_index: usize,
    expanded_chapter: Option<ChapterLabel>,
}

impl NavigationState {
    /// State for a freshly opened book: first row, its chapter expanded
    pub fn initial(book: &FilteredBook) -> Self {
        Self::at(book, 0)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn expanded_chapter(&self) -> Option<&ChapterLabel> {
        self.expanded_chapter.as_ref()
    }

    pub fn move_backward(&self, book: &FilteredBook) -> Self {
        if book.is_empty() || self.current_index == 0 {
            return self.clone();
        }
        Self::at(book, self.current_index - 1)
    }

    pub fn move_forward(&self, book: &FilteredBook) -> Self {
        if self.current_index + 1 >= book.len() {
            return self.clone();
        }
        Self::at(book, self.current_index + 1)
    }

    pub fn jump_to_start(&self, book: &FilteredBook) -> Self {
        if book.is_empty() {
            return self.clone();
        }
        Self::at(book, 0)
    }

    pub fn jump_to_end(&self, book: &FilteredBook) -> Self {
        if book.is_empty() {
            return self.clone();
        }
        Self::at(book, book.len() - 1)
    }

    /// Move to a verse picked in the tree. The chapter is taken as given.
    pub fn jump_to_row(
        &self,
        book: &FilteredBook,
        position: usize,
        chapter: ChapterLabel,
    ) -> Result<Self, CoreError> {
        if position >= book.len() {
            return Err(CoreError::PositionOutOfBounds {
                position,
                len: book.len(),
            });
        }
        Ok(Self {
            current_index: position,
            expanded_chapter: Some(chapter),
        })
    }

    /// Expand or collapse a chapter without moving the cursor
    pub fn toggle_chapter(&self, chapter: &ChapterLabel) -> Self {
        let expanded_chapter = if self.expanded_chapter.as_ref() == Some(chapter) {
            None
        } else {
            Some(chapter.clone())
        };
        Self {
            current_index: self.current_index,
            expanded_chapter,
        }
    }

    fn at(book: &FilteredBook, index: usize) -> Self {
        Self {
            current_index: index,
            expanded_chapter: book.chapter_at(index).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;
    use proptest::prelude::*;

    fn book(chapters: &[&str]) -> FilteredBook {
        FilteredBook::new(
            chapters
                .iter()
                .enumerate()
                .map(|(i, c)| Row::new("Genesis", Some(1), *c, (i + 1).to_string(), "text"))
                .collect(),
        )
    }

    fn state(index: usize, chapter: Option<&str>) -> NavigationState {
        NavigationState {
            current_index: index,
            expanded_chapter: chapter.map(ChapterLabel::from),
        }
    }

    #[test]
    fn test_scenario_forward_to_end() {
        let book = book(&["1", "1", "2"]);

        let s0 = NavigationState::initial(&book);
        assert_eq!(s0, state(0, Some("1")));

        let s1 = s0.move_forward(&book);
        assert_eq!(s1, state(1, Some("1")));

        let s2 = s1.move_forward(&book);
        assert_eq!(s2, state(2, Some("2")));

        assert_eq!(s2.move_forward(&book), s2);
    }

    #[test]
    fn test_move_backward_resolves_chapter_after_move() {
        let book = book(&["1", "2", "2"]);
        let s = state(1, Some("2")).move_backward(&book);
        assert_eq!(s, state(0, Some("1")));
    }

    #[test]
    fn test_move_backward_at_start_is_noop() {
        let book = book(&["1", "2"]);
        let collapsed = state(0, None);
        assert_eq!(collapsed.move_backward(&book), collapsed);
    }

    #[test]
    fn test_jump_to_end_then_start() {
        let book = book(&["1", "2", "3"]);
        let s = NavigationState::initial(&book).jump_to_end(&book);
        assert_eq!(s, state(2, Some("3")));
        assert_eq!(s.jump_to_start(&book), state(0, Some("1")));
    }

    #[test]
    fn test_jump_to_row_uses_given_chapter() {
        let book = book(&["1", "2", "3"]);
        let s = NavigationState::initial(&book)
            .jump_to_row(&book, 2, ChapterLabel::from("3"))
            .unwrap();
        assert_eq!(s, state(2, Some("3")));

        assert_eq!(
            s.jump_to_row(&book, 3, ChapterLabel::from("3")),
            Err(CoreError::PositionOutOfBounds { position: 3, len: 3 })
        );
    }

    #[test]
    fn test_toggle_chapter_keeps_cursor() {
        let book = book(&["1", "2"]);
        let s = NavigationState::initial(&book);

        let collapsed = s.toggle_chapter(&ChapterLabel::from("1"));
        assert_eq!(collapsed, state(0, None));

        let other = s.toggle_chapter(&ChapterLabel::from("2"));
        assert_eq!(other, state(0, Some("2")));
    }

    #[test]
    fn test_toggle_other_chapter_twice_collapses() {
        let book = book(&["1", "2"]);
        let s = NavigationState::initial(&book);
        let two = ChapterLabel::from("2");

        let expanded = s.toggle_chapter(&two);
        assert_eq!(expanded, state(0, Some("2")));
        assert_eq!(expanded.toggle_chapter(&two), state(0, None));
    }

    #[test]
    fn test_empty_book() {
        let empty = FilteredBook::default();
        let s = NavigationState::initial(&empty);
        assert_eq!(s, state(0, None));
        assert_eq!(s.move_forward(&empty), s);
        assert_eq!(s.move_backward(&empty), s);
        assert_eq!(s.jump_to_start(&empty), s);
        assert_eq!(s.jump_to_end(&empty), s);
        assert!(s.jump_to_row(&empty, 0, ChapterLabel::from("1")).is_err());
    }

    fn arb_book_and_index() -> impl Strategy<Value = (FilteredBook, usize)> {
        prop::collection::vec("[1-5]", 3..30).prop_flat_map(|chapters| {
            let len = chapters.len();
            let refs: Vec<&str> = chapters.iter().map(String::as_str).collect();
            (Just(book(&refs)), 1..len - 1)
        })
    }

    proptest! {
        #[test]
        fn prop_forward_then_backward_restores(
            (book, index) in arb_book_and_index()
        ) {
            let start = NavigationState::at(&book, index);
            let back = start.move_forward(&book).move_backward(&book);
            prop_assert_eq!(back, start);
        }

        #[test]
        fn prop_toggle_twice_restores(
            (book, index) in arb_book_and_index(),
            chapter in "[1-5]",
            collapsed in any::<bool>(),
        ) {
            // Holds only when the chapter starts collapsed or is the expanded one
            let label = ChapterLabel::from(chapter);
            let start = NavigationState {
                current_index: index,
                expanded_chapter: if collapsed { None } else { Some(label.clone()) },
            };
            prop_assert!(start.current_index() < book.len());
            prop_assert_eq!(start.toggle_chapter(&label).toggle_chapter(&label), start);
        }

        #[test]
        fn prop_index_stays_in_bounds(
            (book, index) in arb_book_and_index(),
            moves in prop::collection::vec(0u8..4, 0..50),
        ) {
            let mut s = NavigationState::at(&book, index);
            for m in moves {
                s = match m {
                    0 => s.move_forward(&book),
                    1 => s.move_backward(&book),
                    2 => s.jump_to_start(&book),
                    _ => s.jump_to_end(&book),
                };
                prop_assert!(s.current_index() < book.len());
                prop_assert_eq!(s.expanded_chapter(), book.chapter_at(s.current_index()));
            }
        }
    }
}
