//! Application state: book-selection sessions and their loads
//!
//! Each selection starts a load with a fresh generation number. Only the
//! load holding the latest generation may open its book; anything that
//! finishes later for an older selection is dropped.

use std::sync::Arc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::book::{unknown_books, BookView};
use crate::data::VerseSource;
use crate::error::CoreError;
use crate::events::events::{BookOpened, BookSelectionRejected, DatasetLoadFailed, DatasetLoaded, LoadDiscarded};
use crate::events::EventBus;
use crate::model::Dataset;
use crate::navigation::NavigationEngine;
use crate::registry::BookRegistry;

/// Status of the current book-selection session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing selected yet
    Idle,
    Loading { book_index: usize },
    Ready { book_index: usize },
    /// The dataset could not be loaded; there is no automatic retry
    Failed { book_index: usize, error: String },
}

/// Handle for one in-flight load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub book_index: usize,
    generation: u64,
}

#[derive(Debug)]
struct LoadSession {
    generation: u64,
    status: LoadStatus,
}

/// The main application state
pub struct AppState {
    /// The book registry
    pub registry: Arc<BookRegistry>,

    /// The navigation engine
    pub navigation: Arc<NavigationEngine>,

    /// The event bus
    pub event_bus: Arc<EventBus>,

    session: RwLock<LoadSession>,
}

impl AppState {
    /// Create a new application state
    pub fn new(registry: Arc<BookRegistry>) -> Self {
        Self {
            registry,
            navigation: Arc::new(NavigationEngine::new()),
            event_bus: Arc::new(EventBus::new()),
            session: RwLock::new(LoadSession {
                generation: 0,
                status: LoadStatus::Idle,
            }),
        }
    }

    /// State backed by the built-in registry
    pub fn with_canonical_registry() -> Self {
        Self::new(Arc::new(BookRegistry::canonical().clone()))
    }

    pub fn status(&self) -> LoadStatus {
        self.session.read().status.clone()
    }

    /// Check a raw selection against the registry, publishing a rejection
    pub fn validate_selection(&self, requested: i64) -> Result<usize, CoreError> {
        self.registry
            .validate_index(requested)
            .map_err(|err| self.reject_selection(err))
    }

    fn reject_selection(&self, err: CoreError) -> CoreError {
        if let CoreError::InvalidBookIndex { requested, .. } = &err {
            warn!("Rejected book selection {}: {}", requested, err);
            self.event_bus.publish(BookSelectionRejected {
                requested: requested.clone(),
                reason: err.to_string(),
            });
        }
        err
    }

    /// Start a new selection session, superseding any load in flight.
    ///
    /// A different book than the one open is closed right away so the
    /// navigation context never shows a book other than the selection.
    pub fn begin_load(&self, book_index: usize) -> Result<LoadTicket, CoreError> {
        let book_index = self
            .registry
            .check_index(book_index)
            .map_err(|err| self.reject_selection(err))?;

        let mut session = self.session.write();
        session.generation += 1;
        session.status = LoadStatus::Loading { book_index };
        let ticket = LoadTicket {
            book_index,
            generation: session.generation,
        };
        let closed = self.navigation.book_index().is_some_and(|open| open != book_index)
            && self.navigation.replace_book(None);
        drop(session);

        debug!("Load {} started for book {}", ticket.generation, book_index);
        if closed {
            self.navigation.notify_subscribers();
        }
        Ok(ticket)
    }

    /// Close the open book. Any load in flight is superseded.
    pub fn close_book(&self) {
        let mut session = self.session.write();
        session.generation += 1;
        session.status = LoadStatus::Idle;
        let closed = self.navigation.replace_book(None);
        drop(session);

        if closed {
            self.navigation.notify_subscribers();
        }
    }

    /// Whether `ticket` still belongs to the latest selection
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.session.read().generation == ticket.generation
    }

    /// Apply the outcome of a load.
    ///
    /// Returns `false` when the ticket was superseded and the result dropped.
    /// The book is swapped under the session lock; navigation subscribers
    /// are notified after it is released.
    pub fn finish_load(
        &self,
        ticket: LoadTicket,
        source_name: &str,
        result: anyhow::Result<Dataset>,
    ) -> bool {
        let mut session = self.session.write();
        if session.generation != ticket.generation {
            drop(session);
            debug!(
                "Discarding load {} for book {} (superseded)",
                ticket.generation, ticket.book_index
            );
            self.event_bus.publish(LoadDiscarded {
                book_index: ticket.book_index,
                generation: ticket.generation,
            });
            return false;
        }

        match result {
            Ok(dataset) => {
                let row_count = dataset.len();
                let view = BookView::build(ticket.book_index, &self.registry, &dataset);
                let opened = BookOpened {
                    book_index: view.book_index,
                    display_name: view.display_name.clone(),
                    verse_count: view.filtered.len(),
                    chapter_count: view.chapters.len(),
                };

                self.navigation.replace_book(Some(view));
                session.status = LoadStatus::Ready { book_index: ticket.book_index };
                drop(session);
                self.navigation.notify_subscribers();

                let unknown = unknown_books(&self.registry, &dataset);
                if !unknown.is_empty() {
                    warn!(
                        "{} book names in {} match no registry entry: {}",
                        unknown.len(), source_name, unknown.join(", ")
                    );
                }
                info!(
                    "Opened book {} '{}' ({} verses, {} chapters) from {} rows of {}",
                    opened.book_index, opened.display_name, opened.verse_count,
                    opened.chapter_count, row_count, source_name
                );
                self.event_bus.publish(DatasetLoaded {
                    source_name: source_name.to_string(),
                    row_count,
                });
                self.event_bus.publish(opened);
            }
            Err(err) => {
                let error = format!("{:#}", err);
                session.status = LoadStatus::Failed {
                    book_index: ticket.book_index,
                    error: error.clone(),
                };
                let closed = self.navigation.replace_book(None);
                drop(session);
                if closed {
                    self.navigation.notify_subscribers();
                }

                warn!("Failed to load {} for book {}: {}", source_name, ticket.book_index, error);
                self.event_bus.publish(DatasetLoadFailed {
                    source_name: source_name.to_string(),
                    book_index: ticket.book_index,
                    error,
                });
            }
        }
        true
    }

    /// Select a book and load it from `source` in one step.
    ///
    /// Returns whether this load's result was applied.
    pub async fn load_book(&self, source: &dyn VerseSource, book_index: usize) -> Result<bool, CoreError> {
        let ticket = self.begin_load(book_index)?;
        let result = source.load().await;
        Ok(self.finish_load(ticket, source.source_name(), result))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_canonical_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::handler_from_fn;
    use crate::model::Row;
    use parking_lot::Mutex;

    struct StaticSource {
        rows: Vec<Row>,
    }

    #[async_trait::async_trait]
    impl VerseSource for StaticSource {
        async fn load(&self) -> anyhow::Result<Dataset> {
            Ok(Dataset::new(self.rows.clone()))
        }

        fn source_name(&self) -> &str {
            "static"
        }
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl VerseSource for FailingSource {
        async fn load(&self) -> anyhow::Result<Dataset> {
            anyhow::bail!("connection refused")
        }

        fn source_name(&self) -> &str {
            "failing"
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new("Genesis", Some(1), "1", "1", "g1"),
            Row::new("Genesis", Some(1), "1", "2", "g2"),
            Row::new("John", Some(43), "3", "16", "j1"),
        ]
    }

    #[tokio::test]
    async fn test_load_book_opens_selection() {
        let state = AppState::default();
        let source = StaticSource { rows: rows() };

        assert_eq!(state.load_book(&source, 42).await, Ok(true));
        assert_eq!(state.status(), LoadStatus::Ready { book_index: 42 });

        let context = state.navigation.get_context();
        assert_eq!(context.total_rows(), 1);
        assert_eq!(context.current_row().map(|r| r.text.as_str()), Some("j1"));
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let state = AppState::default();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        state.event_bus.subscribe::<DatasetLoadFailed>(handler_from_fn(move |event| {
            if let Some(e) = event.as_any().downcast_ref::<DatasetLoadFailed>() {
                sink.lock().push(e.error.clone());
            }
        }));

        assert_eq!(state.load_book(&FailingSource, 0).await, Ok(true));
        assert_eq!(
            state.status(),
            LoadStatus::Failed { book_index: 0, error: "connection refused".to_string() }
        );
        assert_eq!(*failures.lock(), vec!["connection refused".to_string()]);
        assert!(state.navigation.get_context().book.is_none());
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let state = AppState::default();
        let first = state.begin_load(0).unwrap();
        let second = state.begin_load(42).unwrap();
        assert!(!state.is_current(&first));

        assert!(state.finish_load(second, "static", Ok(Dataset::new(rows()))));
        assert!(!state.finish_load(first, "static", Ok(Dataset::new(rows()))));

        assert_eq!(state.status(), LoadStatus::Ready { book_index: 42 });
        let context = state.navigation.get_context();
        assert_eq!(context.book.as_ref().map(|b| b.book_index), Some(42));
    }

    #[test]
    fn test_invalid_selection_starts_nothing() {
        let state = AppState::default();
        assert_eq!(
            state.begin_load(66),
            Err(CoreError::InvalidBookIndex { requested: "66".to_string(), len: 66 })
        );
        assert_eq!(state.status(), LoadStatus::Idle);
        assert!(state.validate_selection(-3).is_err());
    }

    #[test]
    fn test_unresolved_book_is_ready_but_empty() {
        let state = AppState::default();
        let ticket = state.begin_load(1).unwrap();
        assert!(state.finish_load(ticket, "static", Ok(Dataset::new(rows()))));

        assert_eq!(state.status(), LoadStatus::Ready { book_index: 1 });
        let context = state.navigation.get_context();
        assert!(context.book.as_ref().is_some_and(|b| b.is_empty()));
        assert!(context.current_row().is_none());
    }

    #[test]
    fn test_close_book_supersedes_pending_load() {
        let state = AppState::default();
        let opened = state.begin_load(0).unwrap();
        assert!(state.finish_load(opened, "static", Ok(Dataset::new(rows()))));

        let pending = state.begin_load(42).unwrap();
        state.close_book();
        assert_eq!(state.status(), LoadStatus::Idle);
        assert!(state.navigation.get_context().book.is_none());

        assert!(!state.finish_load(pending, "static", Ok(Dataset::new(rows()))));
        assert!(state.navigation.get_context().book.is_none());
    }

    #[test]
    fn test_failed_load_does_not_expose_previous_book() {
        let state = AppState::default();
        let opened = state.begin_load(0).unwrap();
        assert!(state.finish_load(opened, "static", Ok(Dataset::new(rows()))));
        assert_eq!(state.navigation.book_index(), Some(0));

        let next = state.begin_load(42).unwrap();
        assert_eq!(state.status(), LoadStatus::Loading { book_index: 42 });
        assert_eq!(state.navigation.book_index(), None);
        assert!(state.navigation.get_context().current_row().is_none());

        assert!(state.finish_load(next, "static", Err(anyhow::anyhow!("boom"))));
        assert!(matches!(state.status(), LoadStatus::Failed { book_index: 42, .. }));
        assert_eq!(state.navigation.book_index(), None);
    }

    #[test]
    fn test_failed_reload_of_same_book_closes_it() {
        let state = AppState::default();
        let opened = state.begin_load(42).unwrap();
        assert!(state.finish_load(opened, "static", Ok(Dataset::new(rows()))));

        let reload = state.begin_load(42).unwrap();
        assert_eq!(state.navigation.book_index(), Some(42));
        assert!(state.finish_load(reload, "static", Err(anyhow::anyhow!("gone"))));
        assert!(state.navigation.get_context().book.is_none());
    }

    #[test]
    fn test_huge_index_is_rejected_verbatim() {
        let state = AppState::default();
        assert_eq!(
            state.begin_load(usize::MAX),
            Err(CoreError::InvalidBookIndex { requested: usize::MAX.to_string(), len: 66 })
        );
        assert_eq!(state.status(), LoadStatus::Idle);
    }

    struct StatusReader {
        state: std::sync::Weak<AppState>,
        seen: Mutex<Vec<LoadStatus>>,
    }

    impl crate::navigation::NavigationSubscriber for StatusReader {
        fn on_navigation_change(&self, _context: &crate::navigation::NavigationContext) {
            if let Some(state) = self.state.upgrade() {
                self.seen.lock().push(state.status());
            }
        }
    }

    #[test]
    fn test_subscribers_may_read_status() {
        let state = Arc::new(AppState::default());
        let reader = Arc::new(StatusReader {
            state: Arc::downgrade(&state),
            seen: Mutex::new(Vec::new()),
        });
        state.navigation.add_subscriber(reader.clone());

        let first = state.begin_load(0).unwrap();
        assert!(state.finish_load(first, "static", Ok(Dataset::new(rows()))));
        let second = state.begin_load(42).unwrap();
        assert!(state.finish_load(second, "static", Err(anyhow::anyhow!("boom"))));

        assert_eq!(
            *reader.seen.lock(),
            vec![
                LoadStatus::Ready { book_index: 0 },
                LoadStatus::Loading { book_index: 42 },
            ]
        );
    }
}
