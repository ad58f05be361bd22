use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::{DocId, Position};
use crate::core::posting_list::PostingIterator;
use crate::Result;

/// One term of a phrase, stored in the phrase arena and linked by handle.
pub(crate) struct PhrasePositions<'a> {
    /// Dropped as soon as the term runs out of docs.
    postings: Option<Box<dyn PostingIterator + 'a>>,
    pub(crate) doc: DocId,
    /// Term position minus `offset`.
    pub(crate) position: Position,
    /// Positions left to read in the current doc.
    count: u32,
    pub(crate) offset: Position,
    pub(crate) next: Option<usize>,
    /// Set when the same term appears more than once in the phrase.
    pub(crate) repeat_group: Option<usize>,
}

impl<'a> PhrasePositions<'a> {
    pub(crate) fn new(postings: Box<dyn PostingIterator + 'a>, offset: Position) -> Self {
        Self {
            postings: Some(postings),
            doc: UNPOSITIONED_DOC,
            position: 0,
            count: 0,
            offset,
            next: None,
            repeat_group: None,
        }
    }

    pub(crate) fn next_doc(&mut self) -> Result<bool> {
        let doc = match self.postings.as_mut() {
            Some(postings) => postings.next_doc()?,
            None => NO_MORE_DOCS,
        };
        Ok(self.moved_to(doc))
    }

    pub(crate) fn skip_to(&mut self, target: DocId) -> Result<bool> {
        let doc = match self.postings.as_mut() {
            Some(postings) => postings.advance(target)?,
            None => NO_MORE_DOCS,
        };
        Ok(self.moved_to(doc))
    }

    fn moved_to(&mut self, doc: DocId) -> bool {
        self.doc = doc;
        self.position = 0;
        self.count = 0;
        if doc == NO_MORE_DOCS {
            self.postings = None;
            return false;
        }
        true
    }

    pub(crate) fn first_position(&mut self) -> Result<()> {
        self.count = match self.postings.as_ref() {
            Some(postings) => postings.freq()?,
            None => 0,
        };
        self.next_position()?;
        Ok(())
    }

    /// Moves to the next position in the current doc, `false` when there is none.
    pub(crate) fn next_position(&mut self) -> Result<bool> {
        let postings = match self.postings.as_mut() {
            Some(postings) if self.count > 0 => postings,
            _ => return Ok(false),
        };
        self.count -= 1;
        self.position = postings.next_position()? - self.offset;
        Ok(true)
    }

    /// Position of the term inside the doc.
    pub(crate) fn term_position(&self) -> Position {
        self.position + self.offset
    }
}
