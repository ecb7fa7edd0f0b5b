use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// System-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Common system events
pub mod events {
    use super::Event;

    /// A dataset finished loading for the current selection
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub row_count: usize,
    }

    /// Loading the dataset failed for the current selection
    #[derive(Debug, Clone)]
    pub struct DatasetLoadFailed {
        pub source_name: String,
        pub book_index: usize,
        pub error: String,
    }

    /// A book was opened and the cursor reset
    #[derive(Debug, Clone)]
    pub struct BookOpened {
        pub book_index: usize,
        pub display_name: String,
        pub verse_count: usize,
        pub chapter_count: usize,
    }

    /// A load finished after a newer selection superseded it
    #[derive(Debug, Clone)]
    pub struct LoadDiscarded {
        pub book_index: usize,
        pub generation: u64,
    }

    /// A selection outside the registry was refused
    #[derive(Debug, Clone)]
    pub struct BookSelectionRejected {
        pub requested: String,
        pub reason: String,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        DatasetLoadFailed,
        BookOpened,
        LoadDiscarded,
        BookSelectionRejected
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event. Handlers must not publish from inside `handle`.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::{BookOpened, LoadDiscarded};
    use super::*;

    #[test]
    fn test_publish_reaches_typed_subscribers() {
        let bus = EventBus::new();
        let opened = Arc::new(Mutex::new(Vec::new()));

        let sink = opened.clone();
        bus.subscribe::<BookOpened>(handler_from_fn(move |event| {
            if let Some(e) = event.as_any().downcast_ref::<BookOpened>() {
                sink.lock().push(e.book_index);
            }
        }));

        bus.publish(BookOpened {
            book_index: 42,
            display_name: "யோவான்".to_string(),
            verse_count: 879,
            chapter_count: 21,
        });
        bus.publish(LoadDiscarded { book_index: 1, generation: 3 });

        assert_eq!(*opened.lock(), vec![42]);
    }
}
