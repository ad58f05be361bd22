use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{DocId, ScoreType};
use crate::core::collector::SortValue;

/// A hit: doc id and score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDoc {
    pub doc: DocId,
    pub score: ScoreType,
}

impl ScoreDoc {
    pub fn new(doc: DocId, score: ScoreType) -> Self {
        Self { doc, score }
    }

    /// Placeholder that every real hit outranks.
    pub fn sentinel() -> Self {
        Self { doc: DocId::MAX, score: ScoreType::NEG_INFINITY }
    }

    pub fn is_sentinel(&self) -> bool {
        self.doc == DocId::MAX && self.score == ScoreType::NEG_INFINITY
    }
}

impl fmt::Display for ScoreDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc={} score={}", self.doc, self.score)
    }
}

/// A hit sorted by field values. `score` is NaN unless scores were tracked,
/// `fields` is `None` unless they were filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDoc {
    pub doc: DocId,
    pub score: ScoreType,
    pub fields: Option<Vec<SortValue>>,
}

impl fmt::Display for FieldDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc={} score={}", self.doc, self.score)?;
        if let Some(fields) = &self.fields {
            write!(f, " fields={:?}", fields)?;
        }
        Ok(())
    }
}

/// Ranked hits of a search. `max_score` is NaN when it wasn't tracked or
/// nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDocs<D = ScoreDoc> {
    pub total_hits: usize,
    pub score_docs: Vec<D>,
    pub max_score: ScoreType,
}

pub type TopFieldDocs = TopDocs<FieldDoc>;

impl<D> TopDocs<D> {
    pub fn new(total_hits: usize, score_docs: Vec<D>, max_score: ScoreType) -> Self {
        Self { total_hits, score_docs, max_score }
    }

    pub fn empty(total_hits: usize) -> Self {
        Self::new(total_hits, vec![], ScoreType::NAN)
    }
}
