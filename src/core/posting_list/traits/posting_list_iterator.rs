use crate::common::Position;
use crate::core::docset::DocIdSetIterator;
use crate::Result;

/// Docs and positions of one term.
///
/// Positions of the current doc are read with `next_position`, at most
/// `freq()` times, in increasing order. Moving to another doc discards the
/// unread positions of the previous one.
pub trait PostingIterator: DocIdSetIterator {
    /// Number of occurrences of the term in the current doc.
    fn freq(&self) -> Result<u32>;

    /// Next position of the term in the current doc.
    fn next_position(&mut self) -> Result<Position>;
}

impl<T: PostingIterator + ?Sized> PostingIterator for Box<T> {
    fn freq(&self) -> Result<u32> {
        (**self).freq()
    }

    fn next_position(&mut self) -> Result<Position> {
        (**self).next_position()
    }
}
