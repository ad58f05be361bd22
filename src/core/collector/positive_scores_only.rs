use crate::common::DocId;
use crate::core::collector::Collector;
use crate::core::scorer::{ScoreCachingWrappingScorer, Scorer};
use crate::Result;

/// Passes on only the docs scoring above zero.
#[derive(Debug)]
pub struct PositiveScoresOnlyCollector<C> {
    inner: C,
}

impl<C: Collector> PositiveScoresOnlyCollector<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Collector> Collector for PositiveScoresOnlyCollector<C> {
    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> Result<()> {
        // the downstream collector reads the score again
        let mut scorer = ScoreCachingWrappingScorer::new(scorer);
        if scorer.score()? > 0.0 {
            self.inner.collect(doc, &mut scorer)?;
        }
        Ok(())
    }

    fn accepts_docs_out_of_order(&self) -> bool {
        self.inner.accepts_docs_out_of_order()
    }
}
