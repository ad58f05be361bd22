mod bit_doc_id_set;
mod doc_id_set;
mod doc_id_set_iterator;
mod filtered;
mod sorted_doc_id_set;

pub use bit_doc_id_set::{BitDocIdSet, BitDocIdSetIterator};
pub use doc_id_set::DocIdSet;
pub use doc_id_set_iterator::DocIdSetIterator;
pub use filtered::{FilteredDocIdSet, FilteredDocIdSetIterator};
pub use sorted_doc_id_set::{SortedDocIdSet, SortedDocIdSetIterator};
