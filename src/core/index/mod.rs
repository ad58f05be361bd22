mod document;
mod index_reader;
mod memory_index;
mod memory_index_builder;
mod term;

pub use document::{Document, Token};
pub use index_reader::IndexReader;
pub use memory_index::MemoryIndex;
pub use memory_index_builder::MemoryIndexBuilder;
pub use term::Term;
