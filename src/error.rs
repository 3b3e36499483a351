//! Error types shared by index construction and query evaluation.

use std::ffi::OsString;

/// Fatal errors from building or reading an index. Per-query problems
/// (invalid syntax, unknown terms, oversize queries) are not modeled here —
/// they are recovered locally by the query driver and turned into output
/// lines instead of propagated.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus entry {0:?} is not a valid decimal document ID")]
    InvalidDocId(OsString),

    #[error("malformed block dictionary line: {0:?}")]
    MalformedBlockLine(String),

    #[error("malformed final dictionary line: {0:?}")]
    MalformedDictLine(String),

    #[error("term {term:?} has no corresponding postings line")]
    MissingPostings { term: String },
}

pub type Result<T> = std::result::Result<T, IndexError>;
