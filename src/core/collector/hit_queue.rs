use crate::core::collector::{HeapOrder, PriorityQueue, ScoreDoc};

/// Worst hit on top: lowest score, larger doc id on equal scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitOrder;

impl HeapOrder<ScoreDoc> for HitOrder {
    fn less_than(&self, a: &ScoreDoc, b: &ScoreDoc) -> bool {
        if a.score == b.score {
            a.doc > b.doc
        } else {
            a.score < b.score
        }
    }
}

pub type HitQueue = PriorityQueue<ScoreDoc, HitOrder>;

impl HitQueue {
    /// With `pre_populate` the queue starts full of sentinels that any real
    /// hit beats, so collectors only ever replace the top.
    pub fn hits(size: usize, pre_populate: bool) -> Self {
        match pre_populate {
            true => PriorityQueue::with_sentinels(size, HitOrder, ScoreDoc::sentinel),
            false => PriorityQueue::new(size, HitOrder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_hit_on_top() {
        let mut queue = HitQueue::hits(3, false);
        queue.add(ScoreDoc::new(4, 1.0));
        queue.add(ScoreDoc::new(2, 1.0));
        queue.add(ScoreDoc::new(7, 3.0));
        assert_eq!(queue.top(), Some(&ScoreDoc::new(4, 1.0)));
        queue.pop();
        assert_eq!(queue.top(), Some(&ScoreDoc::new(2, 1.0)));
    }

    #[test]
    fn test_pre_populated() {
        let mut queue = HitQueue::hits(3, true);
        assert_eq!(queue.size(), 3);
        assert!(queue.top().map_or(false, ScoreDoc::is_sentinel));
        if let Some(top) = queue.top_mut() {
            *top = ScoreDoc::new(1, 0.5);
        }
        queue.update_top();
        // still full, a sentinel is back on top
        assert_eq!(queue.size(), 3);
        assert!(queue.top().map_or(false, ScoreDoc::is_sentinel));
    }
}
