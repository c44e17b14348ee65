//! Find `todo` and `hack` markers inside source comments and draw them in bold.

pub mod classifier;
pub mod error;
pub mod markers;
pub mod parser;
pub mod render;
pub mod scanner;

pub use error::BoldTodoError;
pub use markers::TokenSet;
pub use parser::{scan, CommentMarkerScanner, MatchRange, ScanInput};
