mod open_postings;
mod simple;
mod traits;

pub use open_postings::{OpenPostingHandle, OpenPostingsCounter};
pub use simple::{PostingEntry, PostingList, PostingListBuilder, PostingListIterator};
pub use traits::*;
