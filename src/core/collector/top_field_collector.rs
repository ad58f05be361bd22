use std::cmp::Ordering;

use typed_builder::TypedBuilder;

use crate::common::{DocId, ScoreType};
use crate::core::collector::{Collector, FieldDoc, HeapOrder, PriorityQueue, Sort, SortFieldType, SortValue, TopFieldDocs};
use crate::core::index::IndexReader;
use crate::core::scorer::Scorer;
use crate::{Result, SearchError};

#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct TopFieldOptions {
    /// Return the sort values with every hit.
    #[builder(default = true)]
    pub fill_fields: bool,
    /// Score every hit even when the sort doesn't need it.
    #[builder(default = false)]
    pub track_doc_scores: bool,
    #[builder(default = false)]
    pub track_max_score: bool,
}

impl Default for TopFieldOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
struct FieldEntry {
    doc: DocId,
    score: ScoreType,
    values: Vec<SortValue>,
}

#[derive(Debug, Clone)]
struct FieldOrder {
    sort: Sort,
}

impl FieldOrder {
    /// `Less` means `a` ranks before `b`.
    fn rank(&self, a: &FieldEntry, b: &FieldEntry) -> Ordering {
        self.sort
            .fields()
            .iter()
            .zip(a.values.iter().zip(b.values.iter()))
            .map(|(field, (x, y))| field.compare(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then(a.doc.cmp(&b.doc))
    }
}

impl HeapOrder<FieldEntry> for FieldOrder {
    fn less_than(&self, a: &FieldEntry, b: &FieldEntry) -> bool {
        // the worst ranked entry sits on top
        self.rank(a, b) == Ordering::Greater
    }
}

/// Keeps the `num_hits` first docs under a [`Sort`], doc id breaking ties.
pub struct TopFieldCollector<'r> {
    reader: &'r dyn IndexReader,
    queue: PriorityQueue<FieldEntry, FieldOrder>,
    options: TopFieldOptions,
    needs_scores: bool,
    total_hits: usize,
    max_score: ScoreType,
}

impl<'r> TopFieldCollector<'r> {
    pub fn create(reader: &'r dyn IndexReader, sort: Sort, num_hits: usize, options: TopFieldOptions) -> Result<Self> {
        if num_hits == 0 {
            return Err(SearchError::InvalidArgument("num_hits must be > 0".to_string()));
        }
        let needs_scores = sort.needs_scores() || options.track_doc_scores || options.track_max_score;
        Ok(Self {
            reader,
            queue: PriorityQueue::new(num_hits, FieldOrder { sort }),
            options,
            needs_scores,
            total_hits: 0,
            max_score: ScoreType::NEG_INFINITY,
        })
    }

    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    fn sort_values(&self, doc: DocId, score: ScoreType) -> Result<Vec<SortValue>> {
        self.queue
            .order()
            .sort
            .fields()
            .iter()
            .map(|field| match (field.field_type(), field.field()) {
                (SortFieldType::Score, _) => Ok(SortValue::Score(score)),
                (SortFieldType::Doc, _) => Ok(SortValue::Doc(doc)),
                (_, Some(name)) => self.reader.sort_value(name, doc),
                (_, None) => Ok(SortValue::Null),
            })
            .collect()
    }

    /// Hits best first.
    pub fn into_top_docs(mut self) -> TopFieldDocs {
        let mut entries: Vec<FieldEntry> = std::iter::from_fn(|| self.queue.pop()).collect();
        entries.reverse();

        let track_scores = self.needs_scores && (self.options.track_doc_scores || self.queue.order().sort.needs_scores());
        let score_docs = entries
            .into_iter()
            .map(|entry| FieldDoc {
                doc: entry.doc,
                score: if track_scores { entry.score } else { ScoreType::NAN },
                fields: self.options.fill_fields.then_some(entry.values),
            })
            .collect();
        let max_score = match self.options.track_max_score && self.total_hits > 0 {
            true => self.max_score,
            false => ScoreType::NAN,
        };
        TopFieldDocs::new(self.total_hits, score_docs, max_score)
    }
}

impl<'r> Collector for TopFieldCollector<'r> {
    fn collect(&mut self, doc: DocId, scorer: &mut dyn Scorer) -> Result<()> {
        self.total_hits += 1;
        let score = match self.needs_scores {
            true => scorer.score()?,
            false => ScoreType::NAN,
        };
        if self.options.track_max_score && score > self.max_score {
            self.max_score = score;
        }

        let entry = FieldEntry { doc, score, values: self.sort_values(doc, score)? };
        if self.queue.size() < self.queue.max_size() {
            self.queue.add(entry);
            return Ok(());
        }
        let competitive = self.queue.top().map_or(false, |top| self.queue.order().less_than(top, &entry));
        if competitive {
            if let Some(top) = self.queue.top_mut() {
                *top = entry;
            }
            self.queue.update_top();
        }
        Ok(())
    }

    fn accepts_docs_out_of_order(&self) -> bool {
        true
    }
}
