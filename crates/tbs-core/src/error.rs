use thiserror::Error;

/// Errors that can occur in core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid book selection: {requested} (registry has {len} books)")]
    InvalidBookIndex { requested: String, len: usize },

    #[error("Position {position} out of bounds (book has {len} verses)")]
    PositionOutOfBounds { position: usize, len: usize },
}
