use crate::common::DocId;
use crate::core::collector::SortValue;
use crate::core::index::Term;
use crate::core::posting_list::PostingIterator;
use crate::Result;

/// Read access to an inverted index, as needed by query evaluation.
///
/// Readers are shared between concurrently running searches; everything a
/// search mutates (iterators, scorers) is created per search.
pub trait IndexReader: Send + Sync {
    /// Identity of the reader's content, changes whenever the content does.
    fn cache_key(&self) -> u64;

    /// One greater than the largest doc id.
    fn max_doc(&self) -> DocId;

    /// Live (not deleted) documents.
    fn num_docs(&self) -> usize;

    fn has_deletions(&self) -> bool {
        self.num_docs() < self.max_doc().max(0) as usize
    }

    fn is_deleted(&self, doc: DocId) -> bool;

    /// Docs containing `term`, deleted ones included.
    fn doc_freq(&self, term: &Term) -> Result<u32>;

    /// `None` when the term doesn't occur. Deleted docs are skipped.
    fn postings(&self, term: &Term) -> Result<Option<Box<dyn PostingIterator + '_>>>;

    /// Encoded norm of every doc for `field`, `None` if the field has no norms.
    fn norms(&self, field: &str) -> Result<Option<&[u8]>>;

    /// Every term of `field`, in term order.
    fn terms(&self, field: &str) -> Result<Vec<Term>>;

    fn sort_value(&self, field: &str, doc: DocId) -> Result<SortValue>;
}
