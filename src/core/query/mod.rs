mod boolean_clause;
mod boolean_query;
mod constant_score_query;
mod match_all_query;
mod phrase_query;
mod prefix_query;
mod term_query;
mod weight;

use std::collections::BTreeSet;
use std::fmt;

use enum_dispatch::enum_dispatch;

pub use boolean_clause::{BooleanClause, Occur};
pub use boolean_query::{BooleanQuery, BooleanWeight};
pub use constant_score_query::{ConstantScoreQuery, ConstantWeight};
pub use match_all_query::{MatchAllDocsQuery, MatchAllWeight};
pub use phrase_query::{PhraseQuery, PhraseWeight};
pub use prefix_query::{PrefixQuery, RewriteMethod};
pub use term_query::{TermQuery, TermWeight};
pub use weight::{Weight, WeightEnum};

use crate::core::index::Term;
use crate::core::searcher::IndexSearcher;
use crate::{Result, SearchError};

/// Behaviour shared by every query type.
#[enum_dispatch]
pub trait QueryNode {
    fn boost(&self) -> f32;

    fn set_boost(&mut self, boost: f32);

    /// Rewrites into queries that can build a weight. Queries with nothing to
    /// rewrite return an equal copy of themselves.
    fn rewrite(&self, searcher: &IndexSearcher<'_>) -> Result<Query>;

    fn create_weight(&self, searcher: &IndexSearcher<'_>) -> Result<WeightEnum>;

    /// Adds the terms this query scores on. Only valid on rewritten queries.
    fn extract_terms(&self, terms: &mut BTreeSet<Term>) -> Result<()>;

    /// Query syntax form. The field prefix is left out for terms of `default_field`.
    fn to_query_string(&self, default_field: &str) -> String;
}

#[enum_dispatch(QueryNode)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Term(TermQuery),
    Phrase(PhraseQuery),
    Boolean(BooleanQuery),
    Prefix(PrefixQuery),
    ConstantScore(ConstantScoreQuery),
    MatchAll(MatchAllDocsQuery),
}

impl Query {
    /// Only multi-term queries pick their rewrite; the others score one fixed way.
    pub fn set_rewrite_method(&mut self, method: RewriteMethod) -> Result<()> {
        match self {
            Query::Prefix(prefix) => {
                prefix.set_rewrite_method(method);
                Ok(())
            }
            other => Err(SearchError::Unsupported(format!("{} has no rewrite method to set", other))),
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.set_boost(boost);
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string(""))
    }
}

/// `^boost` suffix, empty for the default boost.
pub(crate) fn boost_suffix(boost: f32) -> String {
    match boost == 1.0 {
        true => String::new(),
        false => format!("^{:?}", boost),
    }
}

/// `field:` prefix unless `field` is the default one.
pub(crate) fn field_prefix(field: &str, default_field: &str) -> String {
    match field == default_field {
        true => String::new(),
        false => format!("{}:", field),
    }
}
