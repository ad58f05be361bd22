use std::io;

use thiserror::Error;

use super::file_operations::FileOperationError;

/// The library's error enum.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The operation is not supported by this query or component,
    /// e.g. asking an un-rewritten `PrefixQuery` for a weight.
    #[error("Unsupported operation: '{0}'")]
    Unsupported(String),

    /// Failure while reading postings, positions or norms.
    #[error("An IO error occurred: '{0}'")]
    Io(#[from] io::Error),

    /// Invalid argument was passed by the caller.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),

    /// A boolean query (or a rewrite expanding into one) exceeded its clause limit.
    #[error("Too many boolean clauses, the limit is {0}")]
    TooManyClauses(usize),

    /// `Weight::scorer` was asked for before `Weight::normalize`.
    #[error("Weight for query '{0}' is not normalized")]
    UnnormalizedWeight(String),

    #[error(transparent)]
    Config(#[from] FileOperationError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
