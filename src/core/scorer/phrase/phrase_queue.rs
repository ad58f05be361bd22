use crate::common::{DocId, Position};
use crate::core::collector::{HeapOrder, PriorityQueue};

/// Snapshot of a phrase node taken when it enters the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueuedPositions {
    pub(crate) doc: DocId,
    pub(crate) position: Position,
    pub(crate) offset: Position,
    pub(crate) handle: usize,
}

/// Orders by doc, then position, then offset.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PhraseOrder;

impl HeapOrder<QueuedPositions> for PhraseOrder {
    fn less_than(&self, a: &QueuedPositions, b: &QueuedPositions) -> bool {
        (a.doc, a.position, a.offset) < (b.doc, b.position, b.offset)
    }
}

pub(crate) type PhraseQueue = PriorityQueue<QueuedPositions, PhraseOrder>;

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(doc: DocId, position: Position, offset: Position, handle: usize) -> QueuedPositions {
        QueuedPositions { doc, position, offset, handle }
    }

    #[test]
    fn test_phrase_order() {
        let mut queue = PhraseQueue::new(4, PhraseOrder);
        queue.add(entry(2, 0, 0, 0));
        queue.add(entry(1, 5, 1, 1));
        queue.add(entry(1, 5, 0, 2));
        queue.add(entry(1, 3, 2, 3));
        let handles: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|e| e.handle).collect();
        assert_eq!(handles, vec![3, 2, 1, 0]);
    }
}
