use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::filter::PrefixFilter;
use crate::core::index::Term;
use crate::core::query::{
    boost_suffix, field_prefix, BooleanQuery, ConstantScoreQuery, Occur, Query, QueryNode, TermQuery, WeightEnum,
};
use crate::core::searcher::IndexSearcher;
use crate::{Result, SearchError};

/// How a multi-term query turns into something that can score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewriteMethod {
    /// One `Should` term clause per expanded term, scored like a disjunction without coord.
    ScoringBoolean,
    /// Every matching doc gets the query boost.
    #[default]
    ConstantScoreFilter,
}

/// Matches docs containing a term starting with the prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixQuery {
    prefix: Term,
    boost: OrderedFloat<f32>,
    rewrite_method: RewriteMethod,
}

impl PrefixQuery {
    pub fn new(prefix: Term) -> Self {
        Self { prefix, boost: OrderedFloat(1.0), rewrite_method: RewriteMethod::default() }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = OrderedFloat(boost);
        self
    }

    pub fn prefix(&self) -> &Term {
        &self.prefix
    }

    pub fn rewrite_method(&self) -> RewriteMethod {
        self.rewrite_method
    }

    pub fn set_rewrite_method(&mut self, method: RewriteMethod) {
        self.rewrite_method = method;
    }

    fn unrewritten(&self) -> SearchError {
        SearchError::Unsupported(format!("{} must be rewritten before use", self.to_query_string("")))
    }
}

impl QueryNode for PrefixQuery {
    fn boost(&self) -> f32 {
        self.boost.0
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = OrderedFloat(boost);
    }

    fn rewrite(&self, searcher: &IndexSearcher<'_>) -> Result<Query> {
        let filter = PrefixFilter::new(self.prefix.clone());
        match self.rewrite_method {
            RewriteMethod::ConstantScoreFilter => {
                Ok(ConstantScoreQuery::new(Arc::new(filter)).with_boost(self.boost()).into())
            }
            RewriteMethod::ScoringBoolean => {
                let terms = filter.matching_terms(searcher.reader())?;
                debug!("rewriting {} into {} term clauses", self.to_query_string(""), terms.len());
                let mut query = BooleanQuery::new().with_disable_coord(true);
                query.set_max_clause_count(searcher.config().max_clause_count);
                for term in terms {
                    query.add(TermQuery::new(term).with_boost(self.boost()).into(), Occur::Should)?;
                }
                Ok(query.into())
            }
        }
    }

    fn create_weight(&self, _searcher: &IndexSearcher<'_>) -> Result<WeightEnum> {
        Err(self.unrewritten())
    }

    fn extract_terms(&self, _terms: &mut BTreeSet<Term>) -> Result<()> {
        Err(self.unrewritten())
    }

    fn to_query_string(&self, default_field: &str) -> String {
        format!("{}{}*{}", field_prefix(self.prefix.field(), default_field), self.prefix.text(), boost_suffix(self.boost()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DocId;
    use crate::config::SearchConfig;
    use crate::core::index::{Document, MemoryIndex};
    use crate::core::similarity::DefaultSimilarity;

    fn index() -> MemoryIndex {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        builder.add_documents(
            ["apple pie", "apricot", "banana", "apple apple", "cherry ape"]
                .iter()
                .map(|text| Document::new().with_text("body", text)),
        );
        builder.build()
    }

    fn prefix(text: &str) -> PrefixQuery {
        PrefixQuery::new(Term::new("body", text))
    }

    #[test]
    fn test_constant_score_rewrite() {
        let index = index();
        let searcher = IndexSearcher::new(&index);
        let query: Query = prefix("ap").into();
        let top_docs = searcher.search(&query.with_boost(3.0), None, 10).unwrap();

        let mut docs: Vec<DocId> = top_docs.score_docs.iter().map(|hit| hit.doc).collect();
        docs.sort();
        assert_eq!(docs, vec![0, 1, 3, 4]);
        // a lone constant score query normalizes to 1.0
        assert!(top_docs.score_docs.iter().all(|hit| (hit.score - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_scoring_boolean_rewrite() {
        let index = index();
        let searcher = IndexSearcher::new(&index);
        let mut query: Query = prefix("ap").into();
        query.set_rewrite_method(RewriteMethod::ScoringBoolean).unwrap();

        let Query::Boolean(rewritten) = query.rewrite(&searcher).unwrap() else { panic!("expected a boolean query") };
        assert!(rewritten.is_coord_disabled());
        let texts: Vec<&str> = rewritten
            .clauses()
            .iter()
            .map(|clause| match clause.query() {
                Query::Term(term) => term.term().text(),
                other => panic!("unexpected clause {}", other),
            })
            .collect();
        assert_eq!(texts, vec!["ape", "apple", "apricot"]);

        let top_docs = searcher.search(&query, None, 10).unwrap();
        assert_eq!(top_docs.total_hits, 4);
        // tf 2 beats tf 1 on the same term
        let score_of = |doc: DocId| top_docs.score_docs.iter().find(|hit| hit.doc == doc).unwrap().score;
        assert!(score_of(3) > score_of(0));
    }

    #[test]
    fn test_expansion_over_clause_limit() {
        let index = index();
        let config = SearchConfig { max_clause_count: 2, ..SearchConfig::default() };
        let searcher = IndexSearcher::with_config(&index, config);
        let mut query: Query = prefix("ap").into();
        query.set_rewrite_method(RewriteMethod::ScoringBoolean).unwrap();
        assert!(matches!(searcher.search(&query, None, 10), Err(SearchError::TooManyClauses(2))));
    }

    #[test]
    fn test_unrewritten_use_and_display() {
        let index = index();
        let searcher = IndexSearcher::new(&index);
        let query = prefix("ap").with_boost(2.0);
        assert!(matches!(query.create_weight(&searcher), Err(SearchError::Unsupported(_))));
        assert!(matches!(query.extract_terms(&mut BTreeSet::new()), Err(SearchError::Unsupported(_))));
        assert_eq!(query.to_query_string(""), "body:ap*^2.0");
        assert_eq!(query.to_query_string("body"), "ap*^2.0");
    }
}
