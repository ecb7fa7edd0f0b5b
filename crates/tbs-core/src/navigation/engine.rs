//! Navigation engine implementation

use super::{NavIntent, NavigationContext, NavigationState, NavigationSubscriber};
use crate::book::{BookView, FilteredBook};
use crate::error::CoreError;
use crate::model::ChapterLabel;
use std::sync::{Arc, Weak};
use parking_lot::RwLock;
use tracing::debug;

/// Navigation state stored internally
#[derive(Debug, Clone, Default)]
struct EngineState {
    book: Option<Arc<BookView>>,
    navigation: NavigationState,
}

/// The single writer of the navigation state.
///
/// The opened book and the cursor live behind one lock so a reader never
/// sees a new book paired with a stale cursor.
pub struct NavigationEngine {
    state: Arc<RwLock<EngineState>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn NavigationSubscriber>>>>,
}

impl NavigationEngine {
    /// Create a new navigation engine with no book open
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(EngineState::default())),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Open a book, resetting the cursor to its first row
    pub fn load_book(&self, book: BookView) -> NavigationContext {
        self.replace_book(Some(book));
        self.notify_subscribers();
        self.get_context()
    }

    /// Swap the open book without notifying. Returns whether anything changed.
    ///
    /// Callers holding their own locks notify with
    /// [`NavigationEngine::notify_subscribers`] once those are released.
    pub(crate) fn replace_book(&self, book: Option<BookView>) -> bool {
        let mut state = self.state.write();
        match book {
            Some(book) => {
                state.navigation = NavigationState::initial(&book.filtered);
                state.book = Some(Arc::new(book));
                true
            }
            None if state.book.is_none() => false,
            None => {
                *state = EngineState::default();
                true
            }
        }
    }

    /// Index of the open book, if any
    pub fn book_index(&self) -> Option<usize> {
        self.state.read().book.as_ref().map(|b| b.book_index)
    }

    pub fn move_backward(&self) -> bool {
        self.update(|book, nav| nav.move_backward(book))
    }

    pub fn move_forward(&self) -> bool {
        self.update(|book, nav| nav.move_forward(book))
    }

    pub fn jump_to_start(&self) -> bool {
        self.update(|book, nav| nav.jump_to_start(book))
    }

    pub fn jump_to_end(&self) -> bool {
        self.update(|book, nav| nav.jump_to_end(book))
    }

    /// Jump to a verse picked in the navigation tree
    pub fn jump_to_row(&self, position: usize, chapter: ChapterLabel) -> Result<bool, CoreError> {
        self.try_update(|book, nav| nav.jump_to_row(book, position, chapter))
    }

    pub fn toggle_chapter(&self, chapter: &ChapterLabel) -> bool {
        self.update(|book, nav| {
            if book.is_empty() {
                return nav.clone();
            }
            nav.toggle_chapter(chapter)
        })
    }

    /// Dispatch a presentation intent. Returns whether the state changed.
    pub fn apply(&self, intent: NavIntent) -> Result<bool, CoreError> {
        debug!("Navigation intent: {:?}", intent);
        match intent {
            NavIntent::MoveBackward => Ok(self.move_backward()),
            NavIntent::MoveForward => Ok(self.move_forward()),
            NavIntent::JumpToStart => Ok(self.jump_to_start()),
            NavIntent::JumpToEnd => Ok(self.jump_to_end()),
            NavIntent::JumpToRow { position, chapter } => self.jump_to_row(position, chapter),
            NavIntent::ToggleChapter(chapter) => Ok(self.toggle_chapter(&chapter)),
        }
    }

    /// Get current navigation context
    pub fn get_context(&self) -> NavigationContext {
        let state = self.state.read();
        NavigationContext {
            book: state.book.clone(),
            state: state.navigation.clone(),
        }
    }

    /// Add a subscriber
    pub fn add_subscriber(&self, subscriber: Arc<dyn NavigationSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    fn update(&self, transition: impl FnOnce(&FilteredBook, &NavigationState) -> NavigationState) -> bool {
        self.try_update(|book, nav| Ok(transition(book, nav)))
            .unwrap_or(false)
    }

    fn try_update(
        &self,
        transition: impl FnOnce(&FilteredBook, &NavigationState) -> Result<NavigationState, CoreError>,
    ) -> Result<bool, CoreError> {
        let mut state = self.state.write();
        let next = match &state.book {
            Some(book) => transition(&book.filtered, &state.navigation)?,
            None => transition(&FilteredBook::default(), &state.navigation)?,
        };

        if next == state.navigation {
            return Ok(false);
        }
        state.navigation = next;
        drop(state);

        self.notify_subscribers();
        Ok(true)
    }

    /// Notify all subscribers of navigation change
    pub(crate) fn notify_subscribers(&self) {
        let context = self.get_context();
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_navigation_change(&context);
            }
        }
    }
}

impl Default for NavigationEngine {
    fn default() -> Self {
        Self::new()
    }
}
