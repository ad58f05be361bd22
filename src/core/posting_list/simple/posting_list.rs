use std::fmt;

use crate::common::{DocId, Position};

/// Positions of one term inside one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingEntry {
    pub doc: DocId,
    pub positions: Vec<Position>,
}

impl PostingEntry {
    pub fn freq(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Entries sorted by doc id, positions sorted inside each entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    pub entries: Vec<PostingEntry>,
}

impl fmt::Display for PostingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Posting[")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{:?}", entry.doc, entry.positions)?;
        }
        write!(f, "]")
    }
}

impl PostingList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, doc: DocId) -> Option<&PostingEntry> {
        self.entries.binary_search_by_key(&doc, |e| e.doc).ok().map(|idx| &self.entries[idx])
    }
}
