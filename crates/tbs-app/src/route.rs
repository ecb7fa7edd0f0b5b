//! Screen routing: `/` is the book picker, `/book/<id>` the slideshow

use std::fmt;
use tbs_core::{BookRegistry, CoreError};

const BOOK_PREFIX: &str = "/book/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Book(usize),
    /// A path or book id that does not name a book; no load is started
    InvalidSelection(String),
}

impl Route {
    /// Resolve a path against the registry.
    ///
    /// The id must be a plain decimal integer: signs, whitespace and
    /// trailing characters are rejected.
    pub fn parse(path: &str, registry: &BookRegistry) -> Self {
        if path == "/" || path.is_empty() {
            return Route::Home;
        }

        let Some(id) = path.strip_prefix(BOOK_PREFIX) else {
            return Route::InvalidSelection(path.to_string());
        };
        Self::for_book_id(id, registry)
    }

    /// Where a book selection ends up once its load was (or was not) started
    pub fn after_open(book_index: usize, opened: &Result<(), CoreError>) -> Self {
        match opened {
            Ok(()) => Route::Book(book_index),
            Err(_) => Route::InvalidSelection(book_index.to_string()),
        }
    }

    /// Route for a raw book id, as given to `--book`
    pub fn for_book_id(id: &str, registry: &BookRegistry) -> Self {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Route::InvalidSelection(id.to_string());
        }
        match id.parse::<i64>().map(|n| registry.validate_index(n)) {
            Ok(Ok(index)) => Route::Book(index),
            _ => Route::InvalidSelection(id.to_string()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Book(index) => write!(f, "{}{}", BOOK_PREFIX, index),
            Route::InvalidSelection(raw) => write!(f, "{}{}", BOOK_PREFIX, raw),
        }
    }
}
