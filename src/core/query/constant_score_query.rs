use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::common::DocId;
use crate::core::docset::DocIdSetIterator;
use crate::core::filter::Filter;
use crate::core::index::{IndexReader, Term};
use crate::core::query::weight::ensure_normalized;
use crate::core::query::{boost_suffix, Query, QueryNode, Weight, WeightEnum};
use crate::core::scorer::{ConstantScorer, ScorerEnum};
use crate::core::searcher::IndexSearcher;
use crate::core::Explanation;
use crate::Result;

/// Gives every doc admitted by a filter the query weight as score.
#[derive(Debug, Clone)]
pub struct ConstantScoreQuery {
    filter: Arc<dyn Filter>,
    boost: OrderedFloat<f32>,
}

impl ConstantScoreQuery {
    pub fn new(filter: Arc<dyn Filter>) -> Self {
        Self { filter, boost: OrderedFloat(1.0) }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = OrderedFloat(boost);
        self
    }

    pub fn filter(&self) -> &Arc<dyn Filter> {
        &self.filter
    }
}

// Filters have no value equality, two queries are equal when they share one.
impl PartialEq for ConstantScoreQuery {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.filter, &other.filter) && self.boost == other.boost
    }
}

impl Eq for ConstantScoreQuery {}

impl Hash for ConstantScoreQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.filter) as *const () as usize).hash(state);
        self.boost.hash(state);
    }
}

impl QueryNode for ConstantScoreQuery {
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
        Ok(ConstantWeight::new(self.clone()).into())
    }

    fn extract_terms(&self, _terms: &mut BTreeSet<Term>) -> Result<()> {
        Ok(())
    }

    fn to_query_string(&self, _default_field: &str) -> String {
        format!("ConstantScore({}){}", self.filter, boost_suffix(self.boost()))
    }
}

pub struct ConstantWeight {
    query: ConstantScoreQuery,
    query_norm: f32,
    query_weight: f32,
    normalized: bool,
}

impl ConstantWeight {
    pub fn new(query: ConstantScoreQuery) -> Self {
        Self { query, query_norm: 1.0, query_weight: 0.0, normalized: false }
    }

    fn iterator(&self, reader: &dyn IndexReader) -> Result<Option<Box<dyn DocIdSetIterator>>> {
        match self.query.filter.doc_id_set(reader)? {
            Some(set) => set.iterator(),
            None => Ok(None),
        }
    }
}

impl Weight for ConstantWeight {
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
        Ok(self.iterator(reader)?.map(|iterator| ConstantScorer::new(iterator, self.query_weight).into()))
    }

    fn explain(&self, reader: &dyn IndexReader, doc: DocId) -> Result<Explanation> {
        let matches = match self.iterator(reader)? {
            Some(mut iterator) => iterator.advance(doc)? == doc,
            None => false,
        };
        let filter = &self.query.filter;
        if !matches {
            return Ok(Explanation::no_match(format!("ConstantScoreQuery({}) doesn't match id {}", filter, doc)));
        }
        Ok(Explanation::new(self.query_weight, format!("ConstantScoreQuery({}), product of:", filter))
            .with_detail(Explanation::new(self.query.boost(), "boost"))
            .with_detail(Explanation::new(self.query_norm, "queryNorm")))
    }
}
