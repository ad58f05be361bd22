use super::{PostingEntry, PostingList};
use crate::common::{DocId, Position};

#[derive(Debug, Default)]
pub struct PostingListBuilder {
    posting: PostingList,
    /// Docs may arrive out of order, sort them in `build`.
    finally_sort: bool,
}

// Builder pattern
impl PostingListBuilder {
    pub fn new() -> Self {
        Self { posting: PostingList::default(), finally_sort: false }
    }

    pub fn with_finally_sort(mut self, sort: bool) -> Self {
        self.finally_sort = sort;
        self
    }
}

impl PostingListBuilder {
    /// Records one occurrence of the term, at `position` inside `doc`.
    pub fn add(&mut self, doc: DocId, position: Position) {
        match self.posting.entries.last_mut() {
            Some(last) if last.doc == doc => last.positions.push(position),
            _ => self.posting.entries.push(PostingEntry { doc, positions: vec![position] }),
        }
    }

    pub fn build(mut self) -> PostingList {
        if self.finally_sort {
            self.posting.entries.sort_by_key(|e| e.doc);
            // merge entries of the same doc that were added apart
            let mut merged: Vec<PostingEntry> = Vec::with_capacity(self.posting.entries.len());
            for entry in self.posting.entries {
                match merged.last_mut() {
                    Some(last) if last.doc == entry.doc => last.positions.extend(entry.positions),
                    _ => merged.push(entry),
                }
            }
            self.posting.entries = merged;
        }
        for entry in self.posting.entries.iter_mut() {
            entry.positions.sort_unstable();
        }
        self.posting
    }
}
