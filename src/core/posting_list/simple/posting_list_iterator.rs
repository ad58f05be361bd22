use std::io;

use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::{DocId, Position};
use crate::core::docset::{BitDocIdSet, DocIdSetIterator};
use crate::core::posting_list::{OpenPostingHandle, PostingIterator};
use crate::Result;

use super::PostingEntry;

/// Cursor over an in-memory posting list, skipping deleted docs.
#[derive(Debug)]
pub struct PostingListIterator<'a> {
    posting: &'a [PostingEntry],
    deleted: Option<&'a BitDocIdSet>,
    /// Index of the current entry, only meaningful once positioned.
    cursor: usize,
    position_cursor: usize,
    doc: DocId,
    _handle: OpenPostingHandle<'a>,
}

impl<'a> PostingListIterator<'a> {
    pub fn new(posting: &'a [PostingEntry], deleted: Option<&'a BitDocIdSet>, handle: OpenPostingHandle<'a>) -> Self {
        Self { posting, deleted, cursor: 0, position_cursor: 0, doc: UNPOSITIONED_DOC, _handle: handle }
    }

    /// Positions on the first live entry at or after `cursor`.
    fn settle(&mut self, mut cursor: usize) -> DocId {
        while let Some(entry) = self.posting.get(cursor) {
            if !self.deleted.map_or(false, |deleted| deleted.contains(entry.doc)) {
                break;
            }
            cursor += 1;
        }
        self.cursor = cursor;
        self.position_cursor = 0;
        self.doc = self.posting.get(cursor).map_or(NO_MORE_DOCS, |e| e.doc);
        self.doc
    }

    fn current(&self) -> Option<&'a PostingEntry> {
        match self.doc {
            UNPOSITIONED_DOC | NO_MORE_DOCS => None,
            _ => self.posting.get(self.cursor),
        }
    }

    pub fn remains(&self) -> usize {
        self.posting.len().saturating_sub(self.cursor)
    }
}

impl<'a> DocIdSetIterator for PostingListIterator<'a> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        let next = match self.doc {
            UNPOSITIONED_DOC => 0,
            NO_MORE_DOCS => return Ok(NO_MORE_DOCS),
            _ => self.cursor + 1,
        };
        Ok(self.settle(next))
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.doc >= target {
            return Ok(self.doc);
        }
        let start = if self.doc == UNPOSITIONED_DOC { 0 } else { self.cursor };
        // binary search from the cursor for the first entry with doc >= target
        let offset = self.posting[start..].partition_point(|e| e.doc < target);
        Ok(self.settle(start + offset))
    }
}

impl<'a> PostingIterator for PostingListIterator<'a> {
    fn freq(&self) -> Result<u32> {
        Ok(self.current().map_or(0, |e| e.freq()))
    }

    fn next_position(&mut self) -> Result<Position> {
        let entry = self.current().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "posting iterator is not positioned on a doc")
        })?;
        let position = entry.positions.get(self.position_cursor).copied().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, format!("read past the last position of doc {}", entry.doc))
        })?;
        self.position_cursor += 1;
        Ok(position)
    }
}
