use crate::common::constants::NO_MORE_DOCS;
use crate::common::{DocId, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::scorer::{Scorer, ScorerEnum};
use crate::Result;

/// Docs of the required scorer; the optional scorer only adds to the score.
///
/// The optional scorer is advanced lazily from `score`, never past the
/// required doc, and dropped once it runs out.
pub struct ReqOptSumScorer<'a> {
    req: Box<ScorerEnum<'a>>,
    opt: Option<Box<ScorerEnum<'a>>>,
}

impl<'a> ReqOptSumScorer<'a> {
    pub fn new(req: ScorerEnum<'a>, opt: ScorerEnum<'a>) -> Self {
        Self { req: Box::new(req), opt: Some(Box::new(opt)) }
    }
}

impl<'a> DocIdSetIterator for ReqOptSumScorer<'a> {
    fn doc_id(&self) -> DocId {
        self.req.doc_id()
    }

    fn next_doc(&mut self) -> Result<DocId> {
        self.req.next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        self.req.advance(target)
    }
}

impl<'a> Scorer for ReqOptSumScorer<'a> {
    fn score(&mut self) -> Result<ScoreType> {
        let cur_doc = self.req.doc_id();
        let req_score = self.req.score()?;
        let opt = match self.opt.as_mut() {
            Some(opt) => opt,
            None => return Ok(req_score),
        };

        let mut opt_doc = opt.doc_id();
        if opt_doc < cur_doc {
            opt_doc = opt.advance(cur_doc)?;
            if opt_doc == NO_MORE_DOCS {
                self.opt = None;
                return Ok(req_score);
            }
        }
        match opt_doc == cur_doc {
            true => Ok(req_score + opt.score()?),
            false => Ok(req_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scorer::test_util::{collect_all, scripted_scorer, TracingIterator};
    use crate::core::scorer::ConstantScorer;

    #[test]
    fn test_score_law() {
        let req = scripted_scorer(&[1, 4, 6, 9], 1.0);
        let opt = scripted_scorer(&[0, 4, 5, 9, 12], 0.5);
        let mut scorer = ReqOptSumScorer::new(req, opt);
        // docs come from the required scorer only
        assert_eq!(collect_all(&mut scorer), vec![(1, 1.0), (4, 1.5), (6, 1.0), (9, 1.5)]);
    }

    #[test]
    fn test_optional_is_lazy_and_bounded() {
        let (tracing, targets) = TracingIterator::new(vec![1, 2, 3, 7, 8, 30]);
        let opt: ScorerEnum = ConstantScorer::new(Box::new(tracing), 0.5).into();
        let req = scripted_scorer(&[2, 7, 20], 1.0);
        let mut scorer = ReqOptSumScorer::new(req, opt);

        assert_eq!(scorer.next_doc().unwrap(), 2);
        // not touched until a score is asked for
        assert!(targets.borrow().is_empty());
        assert_eq!(scorer.score().unwrap(), 1.5);
        assert_eq!(scorer.next_doc().unwrap(), 7);
        assert_eq!(scorer.score().unwrap(), 1.5);
        assert_eq!(scorer.next_doc().unwrap(), 20);
        assert_eq!(scorer.score().unwrap(), 1.0);
        assert_eq!(*targets.borrow(), vec![2, 7, 20]);
    }

    #[test]
    fn test_exhausted_optional_is_retired() {
        let req = scripted_scorer(&[3, 5, 8], 2.0);
        let opt = scripted_scorer(&[3], 1.0);
        let mut scorer = ReqOptSumScorer::new(req, opt);
        assert_eq!(collect_all(&mut scorer), vec![(3, 3.0), (5, 2.0), (8, 2.0)]);
        assert!(scorer.opt.is_none());
    }
}
