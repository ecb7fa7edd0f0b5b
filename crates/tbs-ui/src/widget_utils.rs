//! Widget utilities for managing IDs and preventing conflicts
//!
//! The navigation tree repeats the same button labels across chapters
//! ("1", "2", ...), so every chapter and verse widget gets an ID built from
//! its position rather than from its text.

use egui::{Id, ScrollArea};
use std::fmt::Display;

/// Widget ID builder that ensures unique IDs by combining multiple components
pub struct WidgetId {
    components: Vec<String>,
}

impl WidgetId {
    /// Create a new widget ID builder
    pub fn new(base: impl Display) -> Self {
        Self {
            components: vec![base.to_string()],
        }
    }

    /// Add a component to the ID
    pub fn with(mut self, component: impl Display) -> Self {
        self.components.push(component.to_string());
        self
    }

    /// Add an index to the ID (useful in loops)
    pub fn index(self, idx: usize) -> Self {
        self.with(format!("idx_{}", idx))
    }

    /// Build the final ID string
    pub fn build(&self) -> String {
        self.components.join("_")
    }

    /// Create an egui ID from this widget ID
    pub fn id(&self) -> Id {
        Id::new(self.build())
    }
}

/// ID of a chapter header in the navigation tree of one book
pub fn chapter_widget_id(book_index: usize, chapter_position: usize) -> WidgetId {
    WidgetId::new("chapter").index(book_index).index(chapter_position)
}

/// ID of a verse button, keyed by its position in the filtered book
pub fn verse_widget_id(book_index: usize, position: usize) -> WidgetId {
    WidgetId::new("verse").index(book_index).index(position)
}

/// Extension trait for ScrollArea to easily add unique IDs
pub trait ScrollAreaExt {
    /// Set the ID source using a WidgetId builder
    fn id_builder(self, builder: WidgetId) -> Self;
}

impl ScrollAreaExt for ScrollArea {
    fn id_builder(self, builder: WidgetId) -> Self {
        self.id_source(builder.build())
    }
}
