mod posting_list_iterator;

pub use posting_list_iterator::PostingIterator;
