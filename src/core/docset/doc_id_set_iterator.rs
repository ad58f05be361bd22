use enum_dispatch::enum_dispatch;

use crate::common::DocId;
use crate::Result;

/// Forward-only cursor over strictly increasing doc ids.
///
/// A fresh iterator reports `-1`, an exhausted one reports
/// [`NO_MORE_DOCS`](crate::common::constants::NO_MORE_DOCS) forever.
#[enum_dispatch]
pub trait DocIdSetIterator {
    /// Current doc id, without moving.
    fn doc_id(&self) -> DocId;

    /// Moves to the next doc and returns it.
    fn next_doc(&mut self) -> Result<DocId>;

    /// Moves to the first doc `>= target` and returns it.
    ///
    /// When the iterator already sits on a doc `>= target` it stays there.
    fn advance(&mut self, target: DocId) -> Result<DocId> {
        let mut doc = self.doc_id();
        while doc < target {
            doc = self.next_doc()?;
        }
        Ok(doc)
    }
}

impl<T: DocIdSetIterator + ?Sized> DocIdSetIterator for Box<T> {
    fn doc_id(&self) -> DocId {
        (**self).doc_id()
    }

    fn next_doc(&mut self) -> Result<DocId> {
        (**self).next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        (**self).advance(target)
    }
}

impl<T: DocIdSetIterator + ?Sized> DocIdSetIterator for &mut T {
    fn doc_id(&self) -> DocId {
        (**self).doc_id()
    }

    fn next_doc(&mut self) -> Result<DocId> {
        (**self).next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        (**self).advance(target)
    }
}
