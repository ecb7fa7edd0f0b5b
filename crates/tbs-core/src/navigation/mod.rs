use std::sync::Arc;
use serde::{Serialize, Deserialize};

mod cursor;
mod engine;
mod subscriber;

pub use cursor::NavigationState;
pub use engine::NavigationEngine;
pub use subscriber::NavigationSubscriber;

use crate::book::{BookView, ChapterGroup, FilteredBook};
use crate::model::{ChapterLabel, Row};

/// User intents the presentation dispatches into the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavIntent {
    MoveBackward,
    MoveForward,
    JumpToStart,
    JumpToEnd,
    /// A specific verse was picked in the navigation tree
    JumpToRow {
        position: usize,
        chapter: ChapterLabel,
    },
    ToggleChapter(ChapterLabel),
}

/// Snapshot handed to the presentation and to subscribers.
///
/// The book and the state always come from the same transition.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    pub book: Option<Arc<BookView>>,
    pub state: NavigationState,
}

impl NavigationContext {
    /// Row under the cursor; `None` while nothing (or an empty book) is open
    pub fn current_row(&self) -> Option<&Row> {
        self.book.as_ref()?.filtered.get(self.state.current_index())
    }

    pub fn filtered_book(&self) -> Option<&FilteredBook> {
        self.book.as_deref().map(|b| &b.filtered)
    }

    pub fn chapter_group(&self) -> Option<&ChapterGroup> {
        self.book.as_deref().map(|b| &b.chapters)
    }

    pub fn total_rows(&self) -> usize {
        self.filtered_book().map_or(0, FilteredBook::len)
    }

    pub fn is_at_start(&self) -> bool {
        self.state.current_index() == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.state.current_index() + 1 >= self.total_rows()
    }
}
