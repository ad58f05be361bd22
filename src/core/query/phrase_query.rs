use std::collections::BTreeSet;
use std::sync::Arc;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::common::{DocId, Position};
use crate::core::index::{IndexReader, Term};
use crate::core::posting_list::PostingIterator;
use crate::core::query::weight::{ensure_normalized, explain_weighted, field_norm, WeightFactors};
use crate::core::query::{boost_suffix, field_prefix, BooleanQuery, Query, QueryNode, TermQuery, Weight, WeightEnum};
use crate::core::scorer::{PhraseScorer, Scorer, ScorerEnum};
use crate::core::searcher::IndexSearcher;
use crate::core::similarity::Similarity;
use crate::core::Explanation;
use crate::{Result, SearchError};

/// Matches docs containing terms at given relative positions, within `slop` moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhraseQuery {
    field: Option<String>,
    terms: Vec<Term>,
    positions: Vec<Position>,
    max_position: Position,
    slop: u32,
    boost: OrderedFloat<f32>,
}

impl PhraseQuery {
    pub fn new() -> Self {
        Self { field: None, terms: vec![], positions: vec![], max_position: 0, slop: 0, boost: OrderedFloat(1.0) }
    }

    /// Consecutive words of one field.
    pub fn from_words(field: &str, words: &[&str]) -> Self {
        let mut query = Self::new();
        for (position, word) in words.iter().enumerate() {
            query.push(Term::new(field, *word), position as Position);
        }
        query
    }

    /// Adds `term` right after the last one.
    pub fn add(&mut self, term: Term) -> Result<()> {
        let position = self.positions.last().map_or(0, |last| last + 1);
        self.add_at(term, position)
    }

    /// Adds `term` at `position`; several terms may share a position.
    pub fn add_at(&mut self, term: Term, position: Position) -> Result<()> {
        if let Some(field) = &self.field {
            if field != term.field() {
                return Err(SearchError::InvalidArgument(format!(
                    "all phrase terms must be in the same field ({}): {}",
                    field, term
                )));
            }
        }
        if position < 0 {
            return Err(SearchError::InvalidArgument(format!("negative phrase position {}", position)));
        }
        self.push(term, position);
        Ok(())
    }

    fn push(&mut self, term: Term, position: Position) {
        if self.field.is_none() {
            self.field = Some(term.field().to_string());
        }
        self.terms.push(term);
        self.positions.push(position);
        self.max_position = self.max_position.max(position);
    }

    pub fn with_slop(mut self, slop: u32) -> Self {
        self.slop = slop;
        self
    }

    pub fn set_slop(&mut self, slop: u32) {
        self.slop = slop;
    }

    pub fn slop(&self) -> u32 {
        self.slop
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }
}

impl Default for PhraseQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryNode for PhraseQuery {
    fn boost(&self) -> f32 {
        self.boost.0
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = OrderedFloat(boost);
    }

    fn rewrite(&self, _searcher: &IndexSearcher<'_>) -> Result<Query> {
        Ok(match self.terms.as_slice() {
            [] => Query::from(BooleanQuery::new()),
            [term] => Query::from(TermQuery::new(term.clone())),
            _ => return Ok(self.clone().into()),
        }
        .with_boost(self.boost()))
    }

    fn create_weight(&self, searcher: &IndexSearcher<'_>) -> Result<WeightEnum> {
        Ok(PhraseWeight::new(self.clone(), searcher)?.into())
    }

    fn extract_terms(&self, terms: &mut BTreeSet<Term>) -> Result<()> {
        terms.extend(self.terms.iter().cloned());
        Ok(())
    }

    fn to_query_string(&self, default_field: &str) -> String {
        let mut pieces: Vec<Option<String>> = vec![None; self.max_position.max(0) as usize + 1];
        for (term, &position) in self.terms.iter().zip(self.positions.iter()) {
            let piece = &mut pieces[position as usize];
            *piece = Some(match piece.take() {
                Some(existing) => format!("{}|{}", existing, term.text()),
                None => term.text().to_string(),
            });
        }
        let phrase = match self.terms.is_empty() {
            true => String::new(),
            false => pieces.iter().map(|piece| piece.as_deref().unwrap_or("?")).join(" "),
        };
        let field = self.field.as_deref().map_or(String::new(), |field| field_prefix(field, default_field));
        let slop = match self.slop {
            0 => String::new(),
            slop => format!("~{}", slop),
        };
        format!("{}\"{}\"{}{}", field, phrase, slop, boost_suffix(self.boost()))
    }
}

/// Phrase weight: the idf is the sum of the term idfs.
pub struct PhraseWeight {
    query: PhraseQuery,
    similarity: Arc<dyn Similarity>,
    idf: f32,
    /// ` text=doc_freq` for every term.
    doc_freqs: String,
    query_norm: f32,
    query_weight: f32,
    value: f32,
    normalized: bool,
}

impl PhraseWeight {
    pub fn new(query: PhraseQuery, searcher: &IndexSearcher<'_>) -> Result<Self> {
        let similarity = searcher.similarity().clone();
        let max_doc = searcher.max_doc().max(0) as u32;
        let mut idf = 0.0;
        let mut doc_freqs = String::new();
        for term in query.terms() {
            let doc_freq = searcher.doc_freq(term)?;
            idf += similarity.idf(doc_freq, max_doc);
            doc_freqs.push_str(&format!(" {}={}", term.text(), doc_freq));
        }
        Ok(Self { query, similarity, idf, doc_freqs, query_norm: 1.0, query_weight: 0.0, value: 0.0, normalized: false })
    }

    fn field(&self) -> &str {
        self.query.field.as_deref().unwrap_or_default()
    }

    fn phrase_scorer<'r>(&self, reader: &'r dyn IndexReader) -> Result<Option<ScorerEnum<'r>>> {
        if self.query.terms.is_empty() {
            return Ok(None);
        }
        let mut postings: Vec<(Term, Box<dyn PostingIterator + 'r>, Position)> = Vec::with_capacity(self.query.terms.len());
        for (term, &position) in self.query.terms.iter().zip(self.query.positions.iter()) {
            match reader.postings(term)? {
                Some(term_postings) => postings.push((term.clone(), term_postings, position)),
                None => return Ok(None),
            }
        }
        let norms = reader.norms(self.field())?;
        let similarity = self.similarity.clone();
        Ok(Some(match self.query.slop {
            0 => PhraseScorer::exact(postings, norms, similarity, self.value)?.into(),
            slop => PhraseScorer::sloppy(postings, norms, similarity, self.value, slop)?.into(),
        }))
    }
}

impl Weight for PhraseWeight {
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
        self.phrase_scorer(reader)
    }

    fn explain(&self, reader: &dyn IndexReader, doc: DocId) -> Result<Explanation> {
        let mut scorer = match self.phrase_scorer(reader)? {
            Some(scorer) => scorer,
            None => return Ok(Explanation::no_match("no matching docs")),
        };
        let field = self.field();
        let idf = Explanation::new(self.idf, format!("idf({}:{})", field, self.doc_freqs));
        let field_query = format!("{}:\"{}\"", field, self.query.terms.iter().map(Term::text).join(" "));
        let factors = WeightFactors {
            boost: self.query.boost(),
            idf,
            query_norm: self.query_norm,
            tf: scorer.explain(doc)?,
            field_norm: field_norm(reader, self.similarity.as_ref(), field, doc)?,
        };
        Ok(explain_weighted(&self.query.to_query_string(""), &field_query, field, doc, factors))
    }
}
