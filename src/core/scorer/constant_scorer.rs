use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::{DocId, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::index::IndexReader;
use crate::core::scorer::Scorer;
use crate::Result;

/// Gives every doc of an iterator the same score.
pub struct ConstantScorer<'a> {
    iterator: Box<dyn DocIdSetIterator + 'a>,
    score: ScoreType,
}

impl<'a> ConstantScorer<'a> {
    pub fn new(iterator: Box<dyn DocIdSetIterator + 'a>, score: ScoreType) -> Self {
        Self { iterator, score }
    }
}

impl<'a> DocIdSetIterator for ConstantScorer<'a> {
    fn doc_id(&self) -> DocId {
        self.iterator.doc_id()
    }

    fn next_doc(&mut self) -> Result<DocId> {
        self.iterator.next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        self.iterator.advance(target)
    }
}

impl<'a> Scorer for ConstantScorer<'a> {
    fn score(&mut self) -> Result<ScoreType> {
        Ok(self.score)
    }
}

/// Every live doc of a reader.
pub struct MatchAllDocsIterator<'a> {
    reader: &'a dyn IndexReader,
    max_doc: DocId,
    doc: DocId,
}

impl<'a> MatchAllDocsIterator<'a> {
    pub fn new(reader: &'a dyn IndexReader) -> Self {
        Self { reader, max_doc: reader.max_doc(), doc: UNPOSITIONED_DOC }
    }

    fn settle(&mut self, mut doc: DocId) -> DocId {
        while doc < self.max_doc && self.reader.is_deleted(doc) {
            doc += 1;
        }
        self.doc = if doc < self.max_doc { doc } else { NO_MORE_DOCS };
        self.doc
    }
}

impl<'a> DocIdSetIterator for MatchAllDocsIterator<'a> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        if self.doc == NO_MORE_DOCS {
            return Ok(NO_MORE_DOCS);
        }
        Ok(self.settle(self.doc + 1))
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.doc >= target {
            return Ok(self.doc);
        }
        Ok(self.settle(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::index::{Document, MemoryIndex};
    use crate::core::scorer::test_util::collect_all;
    use crate::core::similarity::DefaultSimilarity;
    use std::sync::Arc;

    #[test]
    fn test_match_all_skips_deleted() {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        for _ in 0..5 {
            builder.add_document(Document::new().with_text("body", "x"));
        }
        let mut index = builder.build();
        index.delete_document(0).unwrap();
        index.delete_document(3).unwrap();

        let mut scorer = ConstantScorer::new(Box::new(MatchAllDocsIterator::new(&index)), 0.5);
        assert_eq!(collect_all(&mut scorer), vec![(1, 0.5), (2, 0.5), (4, 0.5)]);

        let mut iter = MatchAllDocsIterator::new(&index);
        assert_eq!(iter.advance(3).unwrap(), 4);
        assert_eq!(iter.advance(5).unwrap(), NO_MORE_DOCS);
    }
}
