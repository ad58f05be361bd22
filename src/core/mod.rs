pub mod collector;
pub mod docset;
mod explanation;
pub mod filter;
pub mod index;
pub mod posting_list;
pub mod query;
pub mod scorer;
pub mod searcher;
pub mod similarity;

pub use explanation::Explanation;
