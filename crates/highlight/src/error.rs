//! Error types for glint-highlight.

use thiserror::Error;

/// Result type alias for glint-highlight operations.
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Errors reported while building highlighting metadata.
///
/// Both variants indicate a bug in a language definition, so callers are
/// expected to treat them as fatal. Everything that runs per highlight
/// pass is total and has no error path.
#[derive(Error, Debug)]
pub enum HighlightError {
    /// A selector string did not follow the path grammar.
    #[error("invalid selector path: {0}")]
    InvalidSelector(String),

    /// A tag was derived from a modified parent.
    #[error("cannot derive tag {child} from modified tag {parent}")]
    IllegalTagDerivation { parent: String, child: String },
}
