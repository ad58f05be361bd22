use std::fmt;
use std::sync::Arc;

use crate::common::constants::NO_MORE_DOCS;
use crate::common::DocId;
use crate::core::docset::{DocIdSet, DocIdSetIterator};
use crate::Result;

/// Admits only the docs of `inner` for which `matches` holds.
pub struct FilteredDocIdSetIterator<I, F> {
    inner: I,
    matches: F,
    doc: DocId,
}

impl<I, F> FilteredDocIdSetIterator<I, F>
where
    I: DocIdSetIterator,
    F: Fn(DocId) -> bool,
{
    pub fn new(inner: I, matches: F) -> Self {
        let doc = inner.doc_id();
        Self { inner, matches, doc }
    }

    /// Walks the inner iterator from `doc` until a doc is admitted.
    fn settle(&mut self, mut doc: DocId) -> Result<DocId> {
        while doc != NO_MORE_DOCS && !(self.matches)(doc) {
            doc = self.inner.next_doc()?;
        }
        self.doc = doc;
        Ok(doc)
    }
}

impl<I, F> DocIdSetIterator for FilteredDocIdSetIterator<I, F>
where
    I: DocIdSetIterator,
    F: Fn(DocId) -> bool,
{
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        let doc = self.inner.next_doc()?;
        self.settle(doc)
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.doc >= target {
            return Ok(self.doc);
        }
        let doc = self.inner.advance(target)?;
        self.settle(doc)
    }
}

type DocPredicate = Arc<dyn Fn(DocId) -> bool + Send + Sync>;

/// Lazily filtered view over another set.
#[derive(Clone)]
pub struct FilteredDocIdSet {
    inner: Arc<dyn DocIdSet>,
    matches: DocPredicate,
}

impl FilteredDocIdSet {
    pub fn new<F>(inner: Arc<dyn DocIdSet>, matches: F) -> Self
    where
        F: Fn(DocId) -> bool + Send + Sync + 'static,
    {
        Self { inner, matches: Arc::new(matches) }
    }
}

impl fmt::Debug for FilteredDocIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredDocIdSet").field("cacheable", &self.inner.is_cacheable()).finish()
    }
}

impl DocIdSet for FilteredDocIdSet {
    fn iterator(&self) -> Result<Option<Box<dyn DocIdSetIterator>>> {
        let inner = match self.inner.iterator()? {
            Some(inner) => inner,
            None => return Ok(None),
        };
        let matches = self.matches.clone();
        Ok(Some(Box::new(FilteredDocIdSetIterator::new(inner, move |doc| matches(doc)))))
    }

    fn is_cacheable(&self) -> bool {
        self.inner.is_cacheable()
    }
}
