use std::collections::BTreeSet;
use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::common::DocId;
use crate::core::index::{IndexReader, Term};
use crate::core::query::weight::{ensure_normalized, explain_weighted, field_norm, WeightFactors};
use crate::core::query::{boost_suffix, field_prefix, Query, QueryNode, Weight, WeightEnum};
use crate::core::scorer::{Scorer, ScorerEnum, TermScorer};
use crate::core::searcher::IndexSearcher;
use crate::core::similarity::Similarity;
use crate::core::Explanation;
use crate::Result;

/// Matches docs containing a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermQuery {
    term: Term,
    boost: OrderedFloat<f32>,
}

impl TermQuery {
    pub fn new(term: Term) -> Self {
        Self { term, boost: OrderedFloat(1.0) }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = OrderedFloat(boost);
        self
    }

    pub fn term(&self) -> &Term {
        &self.term
    }
}

impl QueryNode for TermQuery {
    fn boost(&self) -> f32 {
        self.boost.0
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = OrderedFloat(boost);
    }

    fn rewrite(&self, _searcher: &IndexSearcher<'_>) -> Result<Query> {
        Ok(self.clone().into())
    }

    fn create_weight(&self, searcher: &IndexSearcher<'_>) -> Result<WeightEnum> {
        Ok(TermWeight::new(self.clone(), searcher)?.into())
    }

    fn extract_terms(&self, terms: &mut BTreeSet<Term>) -> Result<()> {
        terms.insert(self.term.clone());
        Ok(())
    }

    fn to_query_string(&self, default_field: &str) -> String {
        format!("{}{}{}", field_prefix(self.term.field(), default_field), self.term.text(), boost_suffix(self.boost()))
    }
}

/// Scores a term as `(idf * boost * query_norm) * idf * tf * norm`.
pub struct TermWeight {
    query: TermQuery,
    similarity: Arc<dyn Similarity>,
    doc_freq: u32,
    max_doc: u32,
    idf: f32,
    query_norm: f32,
    query_weight: f32,
    value: f32,
    normalized: bool,
}

impl TermWeight {
    pub fn new(query: TermQuery, searcher: &IndexSearcher<'_>) -> Result<Self> {
        let similarity = searcher.similarity().clone();
        let doc_freq = searcher.doc_freq(query.term())?;
        let max_doc = searcher.max_doc().max(0) as u32;
        let idf = similarity.idf(doc_freq, max_doc);
        Ok(Self { query, similarity, doc_freq, max_doc, idf, query_norm: 1.0, query_weight: 0.0, value: 0.0, normalized: false })
    }

    fn idf_explanation(&self) -> Explanation {
        Explanation::new(self.idf, format!("idf(docFreq={}, maxDocs={})", self.doc_freq, self.max_doc))
    }

    fn term_scorer<'r>(&self, reader: &'r dyn IndexReader) -> Result<Option<TermScorer<'r>>> {
        let term = self.query.term();
        let postings = match reader.postings(term)? {
            Some(postings) => postings,
            None => return Ok(None),
        };
        let norms = reader.norms(term.field())?;
        Ok(Some(TermScorer::new(term.clone(), postings, norms, self.similarity.clone(), self.value)))
    }
}

impl Weight for TermWeight {
    fn value(&self) -> f32 {
        self.value
    }

    fn sum_of_squared_weights(&mut self) -> Result<f32> {
        self.query_weight = self.idf * self.query.boost();
        Ok(self.query_weight * self.query_weight)
    }

    fn normalize(&mut self, norm: f32) {
        self.query_norm = norm;
        self.query_weight *= norm;
        self.value = self.query_weight * self.idf;
        self.normalized = true;
    }

    fn is_normalized(&self) -> bool {
        self.normalized
    }

    fn scorer<'r>(&self, reader: &'r dyn IndexReader) -> Result<Option<ScorerEnum<'r>>> {
        ensure_normalized(self.normalized, &self.query.to_query_string(""))?;
        Ok(self.term_scorer(reader)?.map(ScorerEnum::from))
    }

    fn explain(&self, reader: &dyn IndexReader, doc: DocId) -> Result<Explanation> {
        let term = self.query.term();
        let tf = match self.term_scorer(reader)? {
            Some(mut scorer) => scorer.explain(doc)?,
            None => Explanation::no_match("no matching term"),
        };
        let factors = WeightFactors {
            boost: self.query.boost(),
            idf: self.idf_explanation(),
            query_norm: self.query_norm,
            tf,
            field_norm: field_norm(reader, self.similarity.as_ref(), term.field(), doc)?,
        };
        Ok(explain_weighted(&self.query.to_query_string(""), &term.to_string(), term.field(), doc, factors))
    }
}
