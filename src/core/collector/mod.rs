mod hit_queue;
mod positive_scores_only;
mod priority_queue;
mod sort;
mod top_docs;
mod top_field_collector;
mod top_score_doc_collector;

pub use hit_queue::{HitOrder, HitQueue};
pub use positive_scores_only::PositiveScoresOnlyCollector;
pub use priority_queue::{HeapOrder, PriorityQueue};
pub use sort::{Sort, SortField, SortFieldType, SortValue};
pub use top_docs::{FieldDoc, ScoreDoc, TopDocs, TopFieldDocs};
pub use top_field_collector::{TopFieldCollector, TopFieldOptions};
pub use top_score_doc_collector::TopScoreDocCollector;

use crate::common::DocId;
use crate::core::scorer::Scorer;
use crate::Result;

/// Receives matching docs from the searcher, one at a time.
pub trait Collector {
    /// `scorer` is positioned on `doc`.
    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> Result<()>;

    /// Whether docs may arrive in any order.
    fn accepts_docs_out_of_order(&self) -> bool;
}

impl<C: Collector + ?Sized> Collector for &mut C {
    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> Result<()> {
        (**self).collect(doc, scorer)
    }

    fn accepts_docs_out_of_order(&self) -> bool {
        (**self).accepts_docs_out_of_order()
    }
}
