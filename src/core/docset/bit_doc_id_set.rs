use std::sync::Arc;

use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::DocId;
use crate::core::docset::{DocIdSet, DocIdSetIterator};
use crate::Result;

/// One bit per document, little-endian inside each byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitDocIdSet {
    bits: Arc<Vec<u8>>,
    cardinality: usize,
}

impl BitDocIdSet {
    pub fn with_max_doc(max_doc: DocId) -> Self {
        let size = (max_doc.max(0) as usize + 7) / 8;
        Self { bits: Arc::new(vec![0u8; size]), cardinality: 0 }
    }

    /// Drains `iterator` into a new set.
    pub fn from_iterator(iterator: &mut dyn DocIdSetIterator, max_doc: DocId) -> Result<Self> {
        let mut set = Self::with_max_doc(max_doc);
        let mut doc = iterator.next_doc()?;
        while doc != NO_MORE_DOCS {
            set.insert(doc);
            doc = iterator.next_doc()?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, doc: DocId) {
        debug_assert!(doc >= 0);
        let byte_index = doc as usize / 8;
        let bits = Arc::make_mut(&mut self.bits);
        if byte_index >= bits.len() {
            bits.resize(byte_index + 1, 0);
        }
        let mask = 1u8 << (doc % 8);
        if bits[byte_index] & mask == 0 {
            bits[byte_index] |= mask;
            self.cardinality += 1;
        }
    }

    pub fn contains(&self, doc: DocId) -> bool {
        if doc < 0 {
            return false;
        }
        match self.bits.get(doc as usize / 8) {
            Some(byte) => byte & (1 << (doc % 8)) != 0,
            None => false,
        }
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub fn is_empty(&self) -> bool {
        self.cardinality == 0
    }

    pub fn doc_ids(&self) -> Vec<DocId> {
        let mut doc_ids = Vec::with_capacity(self.cardinality);
        for (i, &byte) in self.bits.iter().enumerate() {
            for j in 0..8 {
                if byte & (1 << j) != 0 {
                    doc_ids.push((i * 8 + j) as DocId);
                }
            }
        }
        doc_ids
    }
}

impl From<Vec<DocId>> for BitDocIdSet {
    fn from(value: Vec<DocId>) -> Self {
        let max_doc = match value.iter().max() {
            Some(&max) => max + 1,
            None => return Self::default(),
        };
        let mut set = Self::with_max_doc(max_doc);
        for doc in value {
            set.insert(doc);
        }
        set
    }
}

impl DocIdSet for BitDocIdSet {
    fn iterator(&self) -> Result<Option<Box<dyn DocIdSetIterator>>> {
        Ok(Some(Box::new(BitDocIdSetIterator { bits: self.bits.clone(), doc: UNPOSITIONED_DOC })))
    }

    fn is_cacheable(&self) -> bool {
        true
    }
}

pub struct BitDocIdSetIterator {
    bits: Arc<Vec<u8>>,
    doc: DocId,
}

impl BitDocIdSetIterator {
    /// First set bit at or after `from`.
    fn scan_from(&self, from: DocId) -> DocId {
        let mut byte_index = from as usize / 8;
        if byte_index >= self.bits.len() {
            return NO_MORE_DOCS;
        }
        // mask off bits below `from` in the first byte
        let mut byte = self.bits[byte_index] & (0xFFu8 << (from % 8));
        loop {
            if byte != 0 {
                return (byte_index * 8) as DocId + byte.trailing_zeros() as DocId;
            }
            byte_index += 1;
            match self.bits.get(byte_index) {
                Some(&next) => byte = next,
                None => return NO_MORE_DOCS,
            }
        }
    }
}

impl DocIdSetIterator for BitDocIdSetIterator {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        if self.doc != NO_MORE_DOCS {
            self.doc = self.scan_from(self.doc + 1);
        }
        Ok(self.doc)
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.doc < target {
            self.doc = self.scan_from(target.max(0));
        }
        Ok(self.doc)
    }
}
