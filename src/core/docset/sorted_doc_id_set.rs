use std::sync::Arc;

use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::DocId;
use crate::core::docset::{DocIdSet, DocIdSetIterator};
use crate::Result;

/// Sorted, de-duplicated doc ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedDocIdSet {
    docs: Arc<[DocId]>,
}

impl SortedDocIdSet {
    pub fn new(mut docs: Vec<DocId>) -> Self {
        docs.sort_unstable();
        docs.dedup();
        Self { docs: docs.into() }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocIdSet for SortedDocIdSet {
    fn iterator(&self) -> Result<Option<Box<dyn DocIdSetIterator>>> {
        if self.docs.is_empty() {
            return Ok(None);
        }
        Ok(Some(Box::new(SortedDocIdSetIterator::new(self.docs.clone()))))
    }

    fn is_cacheable(&self) -> bool {
        true
    }
}

pub struct SortedDocIdSetIterator {
    docs: Arc<[DocId]>,
    /// Index of the current doc, `docs.len()` once exhausted.
    cursor: usize,
    doc: DocId,
}

impl SortedDocIdSetIterator {
    pub fn new(docs: Arc<[DocId]>) -> Self {
        Self { docs, cursor: 0, doc: UNPOSITIONED_DOC }
    }

    fn position_at(&mut self, cursor: usize) -> DocId {
        self.cursor = cursor;
        self.doc = self.docs.get(cursor).copied().unwrap_or(NO_MORE_DOCS);
        self.doc
    }
}

impl DocIdSetIterator for SortedDocIdSetIterator {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        let next = match self.doc {
            UNPOSITIONED_DOC => 0,
            NO_MORE_DOCS => return Ok(NO_MORE_DOCS),
            _ => self.cursor + 1,
        };
        Ok(self.position_at(next))
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.doc >= target {
            return Ok(self.doc);
        }
        let start = if self.doc == UNPOSITIONED_DOC { 0 } else { self.cursor };
        // binary search for the first doc >= target, starting from the cursor
        let offset = self.docs[start..].partition_point(|&doc| doc < target);
        Ok(self.position_at(start + offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_set_dedups() {
        let set = SortedDocIdSet::new(vec![9, 1, 5, 5, 1]);
        assert_eq!(set.len(), 3);
        let mut it = set.iterator().unwrap().unwrap();
        assert_eq!(it.next_doc().unwrap(), 1);
        assert_eq!(it.next_doc().unwrap(), 5);
        assert_eq!(it.next_doc().unwrap(), 9);
        assert_eq!(it.next_doc().unwrap(), NO_MORE_DOCS);
    }

    #[test]
    fn test_advance_binary_search() {
        let set = SortedDocIdSet::new((0..100).map(|i| i * 3).collect());
        let mut it = set.iterator().unwrap().unwrap();
        assert_eq!(it.advance(10).unwrap(), 12);
        assert_eq!(it.advance(12).unwrap(), 12);
        assert_eq!(it.next_doc().unwrap(), 15);
        assert_eq!(it.advance(297).unwrap(), 297);
        assert_eq!(it.advance(298).unwrap(), NO_MORE_DOCS);
        assert_eq!(it.advance(400).unwrap(), NO_MORE_DOCS);
    }

    #[test]
    fn test_empty_set_has_no_iterator() {
        assert!(SortedDocIdSet::new(vec![]).iterator().unwrap().is_none());
    }
}
