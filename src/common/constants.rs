use super::DocId;

/// Sentinel returned by every doc-id iterator once it is exhausted.
pub const NO_MORE_DOCS: DocId = DocId::MAX;

/// Doc id reported by an iterator before its first `next_doc`/`advance`.
pub const UNPOSITIONED_DOC: DocId = -1;

/// `TermScorer` precomputes `tf(freq) * weight` for freqs below this.
pub const SCORE_CACHE_SIZE: usize = 32;

pub const DEFAULT_MAX_CLAUSE_COUNT: usize = 1024;

pub const SEARCH_CONFIG_FILE: &str = "search_config.json";

/// Name used by log4rs to scope crate-only logging.
pub const CRATE_LOG_TARGET: &str = "lexical_search";
