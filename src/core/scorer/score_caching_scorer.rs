use crate::common::constants::UNPOSITIONED_DOC;
use crate::common::{DocId, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::scorer::Scorer;
use crate::core::Explanation;
use crate::Result;

/// Computes the wrapped scorer's score at most once per doc.
pub struct ScoreCachingWrappingScorer<S> {
    scorer: S,
    cur_doc: DocId,
    cur_score: ScoreType,
}

impl<S: Scorer> ScoreCachingWrappingScorer<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer, cur_doc: UNPOSITIONED_DOC, cur_score: f32::NAN }
    }

    pub fn into_inner(self) -> S {
        self.scorer
    }
}

impl<S: Scorer> DocIdSetIterator for ScoreCachingWrappingScorer<S> {
    fn doc_id(&self) -> DocId {
        self.scorer.doc_id()
    }

    fn next_doc(&mut self) -> Result<DocId> {
        self.scorer.next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        self.scorer.advance(target)
    }
}

impl<S: Scorer> Scorer for ScoreCachingWrappingScorer<S> {
    fn score(&mut self) -> Result<ScoreType> {
        let doc = self.scorer.doc_id();
        if doc != self.cur_doc {
            self.cur_score = self.scorer.score()?;
            self.cur_doc = doc;
        }
        Ok(self.cur_score)
    }

    fn explain(&mut self, doc: DocId) -> Result<Explanation> {
        self.scorer.explain(doc)
    }
}
