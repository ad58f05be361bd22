mod index_searcher;

pub use index_searcher::IndexSearcher;
