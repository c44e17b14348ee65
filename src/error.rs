use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoldTodoError {
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Classification type '{0}' is not registered")]
    UnknownClassification(String),

    #[error("Classification type '{0}' is already registered")]
    DuplicateClassification(String),

    #[error("Span {start}..{end} is outside the document (length {len}) or splits a character")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
}
