use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use crate::common::DocId;
use crate::core::index::{IndexReader, Term};
use crate::core::query::weight::ensure_normalized;
use crate::core::query::{boost_suffix, Query, QueryNode, Weight, WeightEnum};
use crate::core::scorer::{ConstantScorer, MatchAllDocsIterator, ScorerEnum};
use crate::core::searcher::IndexSearcher;
use crate::core::Explanation;
use crate::Result;

/// Matches every live doc with the same score.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchAllDocsQuery {
    boost: OrderedFloat<f32>,
}

impl MatchAllDocsQuery {
    pub fn new() -> Self {
        Self { boost: OrderedFloat(1.0) }
    }
}

impl Default for MatchAllDocsQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryNode for MatchAllDocsQuery {
    fn boost(&self) -> f32 {
        self.boost.0
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = OrderedFloat(boost);
    }

    fn rewrite(&self, _searcher: &IndexSearcher<'_>) -> Result<Query> {
        Ok(self.clone().into())
    }

    fn create_weight(&self, _searcher: &IndexSearcher<'_>) -> Result<WeightEnum> {
        Ok(MatchAllWeight::new(self.clone()).into())
    }

    fn extract_terms(&self, _terms: &mut BTreeSet<Term>) -> Result<()> {
        Ok(())
    }

    fn to_query_string(&self, _default_field: &str) -> String {
        format!("*:*{}", boost_suffix(self.boost()))
    }
}

pub struct MatchAllWeight {
    query: MatchAllDocsQuery,
    query_norm: f32,
    query_weight: f32,
    normalized: bool,
}

impl MatchAllWeight {
    pub fn new(query: MatchAllDocsQuery) -> Self {
        Self { query, query_norm: 1.0, query_weight: 0.0, normalized: false }
    }
}

impl Weight for MatchAllWeight {
    fn value(&self) -> f32 {
        self.query_weight
    }

    fn sum_of_squared_weights(&mut self) -> Result<f32> {
        self.query_weight = self.query.boost();
        Ok(self.query_weight * self.query_weight)
    }

    fn normalize(&mut self, norm: f32) {
        self.query_norm = norm;
        self.query_weight *= norm;
        self.normalized = true;
    }

    fn is_normalized(&self) -> bool {
        self.normalized
    }

    fn scorer<'r>(&self, reader: &'r dyn IndexReader) -> Result<Option<ScorerEnum<'r>>> {
        ensure_normalized(self.normalized, &self.query.to_query_string(""))?;
        let iterator = Box::new(MatchAllDocsIterator::new(reader));
        Ok(Some(ConstantScorer::new(iterator, self.query_weight).into()))
    }

    fn explain(&self, reader: &dyn IndexReader, doc: DocId) -> Result<Explanation> {
        if doc < 0 || doc >= reader.max_doc() || reader.is_deleted(doc) {
            return Ok(Explanation::no_match(format!("MatchAllDocsQuery doesn't match id {}", doc)));
        }
        let mut explanation = Explanation::new(self.query_weight, "MatchAllDocsQuery, product of:");
        if self.query.boost() != 1.0 {
            explanation.add_detail(Explanation::new(self.query.boost(), "boost"));
        }
        explanation.add_detail(Explanation::new(self.query_norm, "queryNorm"));
        Ok(explanation)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::index::{Document, MemoryIndex};
    use crate::core::query::{BooleanQuery, Occur, TermQuery};
    use crate::core::similarity::DefaultSimilarity;

    #[test]
    fn test_match_all() {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        builder.add_documents(["a", "b", "a b", "c"].iter().map(|text| Document::new().with_text("body", text)));
        let mut index = builder.build();
        index.delete_document(1).unwrap();
        let searcher = IndexSearcher::new(&index);

        let query = Query::from(MatchAllDocsQuery::new()).with_boost(4.0);
        let top_docs = searcher.search(&query, None, 10).unwrap();
        assert_eq!(top_docs.total_hits, 3);
        // equal scores come back in doc order
        assert_eq!(top_docs.score_docs.iter().map(|hit| hit.doc).collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!(top_docs.score_docs.iter().all(|hit| (hit.score - 1.0).abs() < 1e-6));

        let explanation = searcher.explain(&query, 2).unwrap();
        assert_eq!(explanation.description(), "MatchAllDocsQuery, product of:");
        assert_eq!(explanation.details().len(), 2);
        assert!(!searcher.explain(&query, 1).unwrap().is_match());
        assert!(!searcher.explain(&query, 9).unwrap().is_match());
        assert_eq!(query.to_string(), "*:*^4.0");
    }

    #[test]
    fn test_match_all_excluding_term() {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        builder.add_documents(["a", "b", "a b", "c"].iter().map(|text| Document::new().with_text("body", text)));
        let index = builder.build();
        let searcher = IndexSearcher::new(&index);

        let mut query = BooleanQuery::new();
        query.add(MatchAllDocsQuery::new().into(), Occur::Must).unwrap();
        query.add(TermQuery::new(Term::new("body", "a")).into(), Occur::MustNot).unwrap();
        let top_docs = searcher.search(&query.into(), None, 10).unwrap();
        assert_eq!(top_docs.score_docs.iter().map(|hit| hit.doc).collect::<Vec<_>>(), vec![1, 3]);
    }
}
