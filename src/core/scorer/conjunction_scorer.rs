use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::{DocId, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::scorer::{Scorer, ScorerEnum};
use crate::{Result, SearchError};

/// Docs matched by all sub-scorers, leap-frogging them against each other.
/// Score is the sum of sub-scores times `coord`.
pub struct ConjunctionScorer<'a> {
    scorers: Vec<ScorerEnum<'a>>,
    coord: f32,
    last_doc: DocId,
}

impl<'a> ConjunctionScorer<'a> {
    /// Positions every sub-scorer on its first doc.
    pub fn new(mut scorers: Vec<ScorerEnum<'a>>, coord: f32) -> Result<Self> {
        if scorers.is_empty() {
            return Err(SearchError::InvalidArgument("a conjunction needs at least one sub-scorer".to_string()));
        }
        let mut exhausted = false;
        for scorer in scorers.iter_mut() {
            if scorer.next_doc()? == NO_MORE_DOCS {
                exhausted = true;
                break;
            }
        }
        let mut conjunction = Self { scorers, coord, last_doc: UNPOSITIONED_DOC };
        if exhausted {
            conjunction.last_doc = NO_MORE_DOCS;
            return Ok(conjunction);
        }

        // the leap-frog needs the furthest scorer last
        conjunction.scorers.sort_by_key(|s| s.doc_id());
        if conjunction.do_next()? == NO_MORE_DOCS {
            conjunction.last_doc = NO_MORE_DOCS;
            return Ok(conjunction);
        }
        // the first skip distance predicts later ones, start with the most selective scorers
        conjunction.scorers.reverse();
        Ok(conjunction)
    }

    /// Expects the last scorer to be the furthest one.
    fn do_next(&mut self) -> Result<DocId> {
        let len = self.scorers.len();
        let mut first = 0;
        let mut doc = self.scorers[len - 1].doc_id();
        while self.scorers[first].doc_id() < doc {
            doc = self.scorers[first].advance(doc)?;
            first = if first == len - 1 { 0 } else { first + 1 };
        }
        Ok(doc)
    }
}

impl<'a> DocIdSetIterator for ConjunctionScorer<'a> {
    fn doc_id(&self) -> DocId {
        self.last_doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        if self.last_doc == NO_MORE_DOCS {
            return Ok(NO_MORE_DOCS);
        }
        let last = self.scorers.len() - 1;
        if self.last_doc == UNPOSITIONED_DOC {
            // the constructor already found the first match
            self.last_doc = self.scorers[last].doc_id();
            return Ok(self.last_doc);
        }
        self.scorers[last].next_doc()?;
        self.last_doc = self.do_next()?;
        Ok(self.last_doc)
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.last_doc == NO_MORE_DOCS {
            return Ok(NO_MORE_DOCS);
        }
        let last = self.scorers.len() - 1;
        if self.scorers[last].doc_id() < target {
            self.scorers[last].advance(target)?;
        }
        self.last_doc = self.do_next()?;
        Ok(self.last_doc)
    }
}

impl<'a> Scorer for ConjunctionScorer<'a> {
    fn score(&mut self) -> Result<ScoreType> {
        let mut sum = 0.0;
        for scorer in self.scorers.iter_mut() {
            sum += scorer.score()?;
        }
        Ok(sum * self.coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scorer::test_util::{collect_all, scripted_scorer};

    #[test]
    fn test_intersection() {
        let scorers = vec![
            scripted_scorer(&[1, 3, 5, 7, 9, 11], 1.0),
            scripted_scorer(&[2, 3, 4, 9, 10, 11], 2.0),
            scripted_scorer(&[0, 3, 9, 11, 20], 0.5),
        ];
        let mut scorer = ConjunctionScorer::new(scorers, 1.0).unwrap();
        assert_eq!(collect_all(&mut scorer), vec![(3, 3.5), (9, 3.5), (11, 3.5)]);
        assert_eq!(scorer.next_doc().unwrap(), NO_MORE_DOCS);
    }

    #[test]
    fn test_advance_and_coord() {
        let scorers = vec![scripted_scorer(&[1, 4, 6, 8], 1.0), scripted_scorer(&[4, 6, 8], 1.0)];
        let mut scorer = ConjunctionScorer::new(scorers, 0.5).unwrap();
        assert_eq!(scorer.advance(5).unwrap(), 6);
        assert_eq!(scorer.score().unwrap(), 1.0);
        assert_eq!(scorer.advance(6).unwrap(), 6);
        assert_eq!(scorer.next_doc().unwrap(), 8);
        assert_eq!(scorer.advance(9).unwrap(), NO_MORE_DOCS);
    }

    #[test]
    fn test_disjoint_and_empty() {
        let scorers = vec![scripted_scorer(&[1, 3], 1.0), scripted_scorer(&[2, 4], 1.0)];
        let mut scorer = ConjunctionScorer::new(scorers, 1.0).unwrap();
        assert_eq!(scorer.next_doc().unwrap(), NO_MORE_DOCS);

        let scorers = vec![scripted_scorer(&[1, 3], 1.0), scripted_scorer(&[], 1.0)];
        let mut scorer = ConjunctionScorer::new(scorers, 1.0).unwrap();
        assert_eq!(scorer.next_doc().unwrap(), NO_MORE_DOCS);

        assert!(matches!(ConjunctionScorer::new(vec![], 1.0), Err(SearchError::InvalidArgument(_))));
    }
}
