use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;

use crate::common::DocId;
use crate::core::collector::SortValue;
use crate::core::docset::BitDocIdSet;
use crate::core::index::{IndexReader, MemoryIndexBuilder, Term};
use crate::core::posting_list::{OpenPostingsCounter, PostingIterator, PostingList, PostingListIterator};
use crate::core::similarity::Similarity;
use crate::{Result, SearchError};

static NEXT_CACHE_KEY: AtomicU64 = AtomicU64::new(1);

fn next_cache_key() -> u64 {
    NEXT_CACHE_KEY.fetch_add(1, Ordering::Relaxed)
}

/// A fully in-memory [`IndexReader`].
#[derive(Debug)]
pub struct MemoryIndex {
    cache_key: u64,
    postings: BTreeMap<Term, PostingList>,
    norms: HashMap<String, Vec<u8>>,
    sort_values: HashMap<String, Vec<SortValue>>,
    deleted: BitDocIdSet,
    max_doc: DocId,
    open_postings: OpenPostingsCounter,
}

impl MemoryIndex {
    pub fn builder(similarity: Arc<dyn Similarity>) -> MemoryIndexBuilder {
        MemoryIndexBuilder::new(similarity)
    }

    pub(super) fn new(
        postings: BTreeMap<Term, PostingList>,
        norms: HashMap<String, Vec<u8>>,
        sort_values: HashMap<String, Vec<SortValue>>,
        max_doc: DocId,
    ) -> Self {
        Self {
            cache_key: next_cache_key(),
            postings,
            norms,
            sort_values,
            deleted: BitDocIdSet::with_max_doc(max_doc),
            max_doc,
            open_postings: OpenPostingsCounter::default(),
        }
    }

    /// Marks `doc` deleted, returns `false` if it already was.
    pub fn delete_document(&mut self, doc: DocId) -> Result<bool> {
        if doc < 0 || doc >= self.max_doc {
            return Err(SearchError::InvalidArgument(format!("doc {} is out of range [0, {})", doc, self.max_doc)));
        }
        if self.deleted.contains(doc) {
            return Ok(false);
        }
        self.deleted.insert(doc);
        // cached filters of the old content must not be reused
        self.cache_key = next_cache_key();
        debug!("deleted doc {}, {} live docs left", doc, self.num_docs());
        Ok(true)
    }

    /// Posting iterators handed out and not dropped yet.
    pub fn open_postings(&self) -> usize {
        self.open_postings.open()
    }

    pub fn posting_list(&self, term: &Term) -> Option<&PostingList> {
        self.postings.get(term)
    }
}

impl IndexReader for MemoryIndex {
    fn cache_key(&self) -> u64 {
        self.cache_key
    }

    fn max_doc(&self) -> DocId {
        self.max_doc
    }

    fn num_docs(&self) -> usize {
        self.max_doc as usize - self.deleted.cardinality()
    }

    fn is_deleted(&self, doc: DocId) -> bool {
        self.deleted.contains(doc)
    }

    fn doc_freq(&self, term: &Term) -> Result<u32> {
        Ok(self.postings.get(term).map_or(0, |p| p.len() as u32))
    }

    fn postings(&self, term: &Term) -> Result<Option<Box<dyn PostingIterator + '_>>> {
        let posting = match self.postings.get(term) {
            Some(posting) => posting,
            None => return Ok(None),
        };
        let deleted = match self.deleted.is_empty() {
            true => None,
            false => Some(&self.deleted),
        };
        Ok(Some(Box::new(PostingListIterator::new(&posting.entries, deleted, self.open_postings.acquire()))))
    }

    fn norms(&self, field: &str) -> Result<Option<&[u8]>> {
        Ok(self.norms.get(field).map(|n| n.as_slice()))
    }

    fn terms(&self, field: &str) -> Result<Vec<Term>> {
        Ok(self
            .postings
            .range(Term::new(field, "")..)
            .take_while(|(term, _)| term.field() == field)
            .map(|(term, _)| term.clone())
            .collect())
    }

    fn sort_value(&self, field: &str, doc: DocId) -> Result<SortValue> {
        if doc < 0 || doc >= self.max_doc {
            return Err(SearchError::InvalidArgument(format!("doc {} is out of range [0, {})", doc, self.max_doc)));
        }
        Ok(self.sort_values.get(field).and_then(|values| values.get(doc as usize)).cloned().unwrap_or(SortValue::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::NO_MORE_DOCS;
    use crate::core::index::{Document, Token};
    use crate::core::similarity::{decode_norm, DefaultSimilarity};

    fn mock_index() -> MemoryIndex {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        builder.add_documents(vec![
            Document::new().with_text("body", "the quick brown fox").with_sort_value("price", SortValue::Int(30)),
            Document::new().with_text("body", "quick quick").with_text("title", "fox"),
            Document::new()
                .with_token_stream("body", vec![Token::new("fast", 1), Token::new("quick", 0), Token::new("fox", 1)])
                .with_field_boost("body", 2.0),
        ]);
        builder.build()
    }

    #[test]
    fn test_postings_and_positions() {
        let index = mock_index();
        assert_eq!(index.max_doc(), 3);
        assert_eq!(index.doc_freq(&Term::new("body", "quick")).unwrap(), 3);
        assert_eq!(index.doc_freq(&Term::new("body", "missing")).unwrap(), 0);
        assert!(index.postings(&Term::new("body", "missing")).unwrap().is_none());

        let mut postings = index.postings(&Term::new("body", "quick")).unwrap().unwrap();
        assert_eq!(postings.next_doc().unwrap(), 0);
        assert_eq!(postings.next_position().unwrap(), 1);
        assert_eq!(postings.next_doc().unwrap(), 1);
        assert_eq!(postings.freq().unwrap(), 2);
        assert_eq!(postings.next_doc().unwrap(), 2);
        // stacked on "fast"
        assert_eq!(postings.next_position().unwrap(), 0);
        assert_eq!(postings.next_doc().unwrap(), NO_MORE_DOCS);
        assert_eq!(index.open_postings(), 1);
        drop(postings);
        assert_eq!(index.open_postings(), 0);
    }

    #[test]
    fn test_norms() {
        let index = mock_index();
        let norms = index.norms("body").unwrap().unwrap();
        assert_eq!(decode_norm(norms[0]), 0.5);
        // boost 2 over three tokens: 2/sqrt(3) ~ 1.15, stored lossy
        assert_eq!(decode_norm(norms[2]), 1.0);
        // doc 0 and 2 have no title, they keep the default norm
        let title_norms = index.norms("title").unwrap().unwrap();
        assert_eq!(title_norms.len(), 3);
        assert_eq!(decode_norm(title_norms[0]), 1.0);
        assert!(index.norms("missing").unwrap().is_none());
    }

    #[test]
    fn test_terms_and_sort_values() {
        let index = mock_index();
        let texts: Vec<String> = index.terms("body").unwrap().iter().map(|t| t.text().to_string()).collect();
        assert_eq!(texts, vec!["brown", "fast", "fox", "quick", "the"]);
        assert_eq!(index.terms("title").unwrap(), vec![Term::new("title", "fox")]);
        assert!(index.terms("nothing").unwrap().is_empty());

        assert_eq!(index.sort_value("price", 0).unwrap(), SortValue::Int(30));
        assert_eq!(index.sort_value("price", 2).unwrap(), SortValue::Null);
        assert!(index.sort_value("price", 3).is_err());
    }

    #[test]
    fn test_deletions() {
        let mut index = mock_index();
        let key = index.cache_key();
        assert!(index.delete_document(1).unwrap());
        assert!(!index.delete_document(1).unwrap());
        assert!(index.delete_document(7).is_err());
        assert_ne!(index.cache_key(), key);
        assert_eq!(index.num_docs(), 2);
        assert!(index.has_deletions());
        // doc_freq still counts deleted docs
        assert_eq!(index.doc_freq(&Term::new("body", "quick")).unwrap(), 3);

        let mut postings = index.postings(&Term::new("body", "quick")).unwrap().unwrap();
        assert_eq!(postings.next_doc().unwrap(), 0);
        assert_eq!(postings.next_doc().unwrap(), 2);
    }
}
