//! Core functionality for the verse slideshow
//! 
//! This crate provides the verse model, the book registry, book resolution
//! and chapter grouping, and the navigation state machine driven by the
//! presentation layer.

pub mod book;
pub mod error;
pub mod events;
pub mod model;
pub mod navigation;
pub mod registry;
pub mod state;

// Re-export commonly used types
pub use book::{group, resolve, unknown_books, BookView, ChapterGroup, FilteredBook, GroupedRow};
pub use data::VerseSource;
pub use error::CoreError;
pub use model::{ChapterLabel, Dataset, Row};
pub use navigation::{
    NavIntent, NavigationContext, NavigationEngine, NavigationState, NavigationSubscriber,
};
pub use registry::{BookEntry, BookRegistry, RegistryError, Testament};
pub use state::{AppState, LoadStatus, LoadTicket};

/// Data source seam implemented by the data crate
pub mod data {
    use crate::model::Dataset;

    /// Trait for verse data sources
    #[async_trait::async_trait]
    pub trait VerseSource: Send + Sync {
        /// Load the whole dataset. Called once per book-selection session.
        async fn load(&self) -> anyhow::Result<Dataset>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}
