pub mod common;
pub mod config;
pub mod core;
mod macros;

pub use common::errors::{Result, SearchError};
pub use common::{DocId, Position, ScoreType};
pub use config::SearchConfig;
pub use crate::core::index::{Document, IndexReader, MemoryIndex, Term};
pub use crate::core::query::{BooleanQuery, MatchAllDocsQuery, Occur, PhraseQuery, PrefixQuery, Query, TermQuery};
pub use crate::core::searcher::IndexSearcher;
pub use crate::core::Explanation;
