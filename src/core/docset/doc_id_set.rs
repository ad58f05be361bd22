use crate::core::docset::DocIdSetIterator;
use crate::Result;

/// A set of doc ids that can be iterated any number of times.
pub trait DocIdSet: Send + Sync {
    /// `None` means the set is empty.
    fn iterator(&self) -> Result<Option<Box<dyn DocIdSetIterator>>>;

    /// Whether the set can be kept around cheaply (no index handles, fast random access).
    fn is_cacheable(&self) -> bool {
        false
    }
}
