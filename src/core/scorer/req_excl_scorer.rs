use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::{DocId, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::scorer::{Scorer, ScorerEnum};
use crate::{Result, SearchError};

/// Docs of the required scorer that the excluded scorer doesn't match.
/// Either side is dropped as soon as it runs out.
pub struct ReqExclScorer<'a> {
    req: Option<Box<ScorerEnum<'a>>>,
    excl: Option<Box<ScorerEnum<'a>>>,
    doc: DocId,
}

impl<'a> ReqExclScorer<'a> {
    pub fn new(req: ScorerEnum<'a>, excl: ScorerEnum<'a>) -> Self {
        Self { req: Some(Box::new(req)), excl: Some(Box::new(excl)), doc: UNPOSITIONED_DOC }
    }

    /// Moves the required scorer from its current doc to the first doc not excluded.
    fn to_non_excluded(&mut self) -> Result<DocId> {
        let (req, excl) = match (self.req.as_mut(), self.excl.as_mut()) {
            (Some(req), Some(excl)) => (req, excl),
            (Some(req), None) => return Ok(req.doc_id()),
            (None, _) => return Ok(NO_MORE_DOCS),
        };
        let mut excl_doc = excl.doc_id();
        let mut req_doc = req.doc_id();
        loop {
            if req_doc < excl_doc {
                return Ok(req_doc);
            } else if req_doc > excl_doc {
                excl_doc = excl.advance(req_doc)?;
                if excl_doc == NO_MORE_DOCS {
                    self.excl = None;
                    return Ok(req_doc);
                }
                if excl_doc > req_doc {
                    return Ok(req_doc);
                }
            }
            req_doc = req.next_doc()?;
            if req_doc == NO_MORE_DOCS {
                break;
            }
        }
        self.req = None;
        Ok(NO_MORE_DOCS)
    }
}

impl<'a> DocIdSetIterator for ReqExclScorer<'a> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        let req = match self.req.as_mut() {
            Some(req) => req,
            None => return Ok(self.doc),
        };
        self.doc = req.next_doc()?;
        if self.doc == NO_MORE_DOCS {
            self.req = None;
            return Ok(self.doc);
        }
        self.doc = self.to_non_excluded()?;
        Ok(self.doc)
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.doc >= target {
            return Ok(self.doc);
        }
        let req = match self.req.as_mut() {
            Some(req) => req,
            None => {
                self.doc = NO_MORE_DOCS;
                return Ok(self.doc);
            }
        };
        if req.advance(target)? == NO_MORE_DOCS {
            self.req = None;
            self.doc = NO_MORE_DOCS;
            return Ok(self.doc);
        }
        self.doc = self.to_non_excluded()?;
        Ok(self.doc)
    }
}

impl<'a> Scorer for ReqExclScorer<'a> {
    fn score(&mut self) -> Result<ScoreType> {
        match self.req.as_mut() {
            Some(req) => req.score(),
            None => Err(SearchError::InvalidArgument("score requested from an exhausted scorer".to_string())),
        }
    }
}
