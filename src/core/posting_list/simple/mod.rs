mod posting_list;
mod posting_list_builder;
mod posting_list_iterator;

pub use posting_list::{PostingEntry, PostingList};
pub use posting_list_builder::PostingListBuilder;
pub use posting_list_iterator::PostingListIterator;
