use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::{DocId, ScoreType};
use crate::core::collector::{HeapOrder, PriorityQueue};
use crate::core::docset::DocIdSetIterator;
use crate::core::scorer::{Scorer, ScorerEnum};
use crate::{Result, SearchError};

/// Orders sub-scorers by their current doc.
pub struct ScorerDocOrder;

impl<'a> HeapOrder<ScorerEnum<'a>> for ScorerDocOrder {
    fn less_than(&self, a: &ScorerEnum<'a>, b: &ScorerEnum<'a>) -> bool {
        a.doc_id() < b.doc_id()
    }
}

/// Docs matched by at least `minimum_nr_matchers` sub-scorers, scored with
/// the sum of the matching sub-scores.
pub struct DisjunctionSumScorer<'a> {
    queue: PriorityQueue<ScorerEnum<'a>, ScorerDocOrder>,
    minimum_nr_matchers: usize,
    current_doc: DocId,
    current_score: f64,
    nr_matchers: usize,
}

impl<'a> DisjunctionSumScorer<'a> {
    pub fn new(scorers: Vec<ScorerEnum<'a>>, minimum_nr_matchers: usize) -> Result<Self> {
        if minimum_nr_matchers == 0 {
            return Err(SearchError::InvalidArgument("minimum nr of matchers must be positive".to_string()));
        }
        if scorers.len() <= 1 {
            return Err(SearchError::InvalidArgument("a disjunction needs at least 2 sub-scorers".to_string()));
        }
        let mut queue = PriorityQueue::new(scorers.len(), ScorerDocOrder);
        for mut scorer in scorers {
            if scorer.next_doc()? != NO_MORE_DOCS {
                queue.add(scorer);
            }
        }
        Ok(Self { queue, minimum_nr_matchers, current_doc: UNPOSITIONED_DOC, current_score: f64::NAN, nr_matchers: 0 })
    }

    /// Sub-scorers matching the current doc.
    pub fn nr_matchers(&self) -> usize {
        self.nr_matchers
    }

    fn top_doc(&self) -> DocId {
        self.queue.top().map_or(NO_MORE_DOCS, |s| s.doc_id())
    }

    fn top_score(&mut self) -> Result<ScoreType> {
        match self.queue.top_mut() {
            Some(top) => top.score(),
            None => Ok(0.0),
        }
    }

    fn top_next_and_adjust_else_pop(&mut self) -> Result<bool> {
        let top = match self.queue.top_mut() {
            Some(top) => top,
            None => return Ok(false),
        };
        if top.next_doc()? != NO_MORE_DOCS {
            self.queue.update_top();
            return Ok(true);
        }
        self.queue.pop();
        Ok(false)
    }

    fn top_advance_and_adjust_else_pop(&mut self, target: DocId) -> Result<bool> {
        let top = match self.queue.top_mut() {
            Some(top) => top,
            None => return Ok(false),
        };
        if top.advance(target)? != NO_MORE_DOCS {
            self.queue.update_top();
            return Ok(true);
        }
        self.queue.pop();
        Ok(false)
    }

    /// Moves to the next doc with enough matchers, summing the scores on the way.
    /// Returns `false` when no such doc is left.
    fn advance_after_current(&mut self) -> Result<bool> {
        loop {
            self.current_doc = self.top_doc();
            self.current_score = self.top_score()? as f64;
            self.nr_matchers = 1;
            loop {
                if !self.top_next_and_adjust_else_pop()? && self.queue.is_empty() {
                    break;
                }
                if self.top_doc() != self.current_doc {
                    break;
                }
                self.current_score += self.top_score()? as f64;
                self.nr_matchers += 1;
            }

            if self.nr_matchers >= self.minimum_nr_matchers {
                return Ok(true);
            } else if self.queue.size() < self.minimum_nr_matchers {
                return Ok(false);
            }
        }
    }
}

impl<'a> DocIdSetIterator for DisjunctionSumScorer<'a> {
    fn doc_id(&self) -> DocId {
        self.current_doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        if self.queue.size() < self.minimum_nr_matchers || !self.advance_after_current()? {
            self.current_doc = NO_MORE_DOCS;
        }
        Ok(self.current_doc)
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.queue.size() < self.minimum_nr_matchers {
            self.current_doc = NO_MORE_DOCS;
            return Ok(self.current_doc);
        }
        if target <= self.current_doc {
            return Ok(self.current_doc);
        }
        loop {
            if self.top_doc() >= target {
                if !self.advance_after_current()? {
                    self.current_doc = NO_MORE_DOCS;
                }
                return Ok(self.current_doc);
            } else if !self.top_advance_and_adjust_else_pop(target)? && self.queue.size() < self.minimum_nr_matchers {
                self.current_doc = NO_MORE_DOCS;
                return Ok(self.current_doc);
            }
        }
    }
}

impl<'a> Scorer for DisjunctionSumScorer<'a> {
    fn score(&mut self) -> Result<ScoreType> {
        Ok(self.current_score as ScoreType)
    }
}
