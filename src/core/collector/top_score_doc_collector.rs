use crate::common::DocId;
use crate::core::collector::{Collector, HitQueue, ScoreDoc, TopDocs};
use crate::core::scorer::Scorer;
use crate::{Result, SearchError};

/// Keeps the `num_hits` best scoring docs, ties going to the smaller doc id.
#[derive(Debug)]
pub struct TopScoreDocCollector {
    queue: HitQueue,
    total_hits: usize,
    docs_in_order: bool,
}

impl TopScoreDocCollector {
    /// `docs_in_order` lets the collector drop a hit that only ties the worst
    /// one kept, since a later doc always loses that tie.
    pub fn create(num_hits: usize, docs_in_order: bool, pre_populate: bool) -> Result<Self> {
        if num_hits == 0 {
            return Err(SearchError::InvalidArgument("num_hits must be > 0".to_string()));
        }
        Ok(Self { queue: HitQueue::hits(num_hits, pre_populate), total_hits: 0, docs_in_order })
    }

    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    /// Number of real hits held by the queue.
    fn top_docs_size(&self) -> usize {
        self.total_hits.min(self.queue.size())
    }

    pub fn into_top_docs(self) -> TopDocs {
        let size = self.top_docs_size();
        self.into_top_docs_range(0, size)
    }

    /// Hits ranked `start..start + how_many`, best first.
    pub fn into_top_docs_range(mut self, start: usize, how_many: usize) -> TopDocs {
        let size = self.top_docs_size();
        if start >= size || how_many == 0 {
            return TopDocs::empty(self.total_hits);
        }
        let how_many = how_many.min(size - start);

        // pops come worst first: sentinels, then hits ranked below the range
        for _ in 0..(self.queue.size() - start - how_many) {
            self.queue.pop();
        }
        let mut score_docs: Vec<ScoreDoc> = std::iter::from_fn(|| self.queue.pop()).take(how_many).collect();
        score_docs.reverse();

        let max_score = match start {
            0 => score_docs.first().map_or(f32::NAN, |hit| hit.score),
            _ => std::iter::from_fn(|| self.queue.pop()).last().map_or(f32::NAN, |hit| hit.score),
        };
        TopDocs::new(self.total_hits, score_docs, max_score)
    }
}

impl Collector for TopScoreDocCollector {
    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> Result<()> {
        let score = scorer.score()?;
        debug_assert!(!score.is_nan(), "NaN score for doc {}", doc);
        self.total_hits += 1;

        if self.queue.size() < self.queue.max_size() {
            self.queue.add(ScoreDoc::new(doc, score));
            return Ok(());
        }
        let docs_in_order = self.docs_in_order;
        if let Some(top) = self.queue.top_mut() {
            // any real hit beats a sentinel, even one scoring -inf
            let competitive = top.is_sentinel()
                || match docs_in_order {
                    true => score > top.score,
                    false => score > top.score || (score == top.score && doc < top.doc),
                };
            if !competitive {
                return Ok(());
            }
            *top = ScoreDoc::new(doc, score);
            self.queue.update_top();
        }
        Ok(())
    }

    fn accepts_docs_out_of_order(&self) -> bool {
        !self.docs_in_order
    }
}
