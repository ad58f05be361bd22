use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{debug, warn};

use crate::common::DocId;
use crate::core::collector::SortValue;
use crate::core::index::{Document, MemoryIndex, Term};
use crate::core::posting_list::PostingListBuilder;
use crate::core::similarity::{FieldInvertState, Similarity};

/// Inverts documents into a [`MemoryIndex`]. Doc ids are assigned in insertion order.
pub struct MemoryIndexBuilder {
    similarity: Arc<dyn Similarity>,
    postings: BTreeMap<Term, PostingListBuilder>,
    norms: HashMap<String, Vec<u8>>,
    sort_values: HashMap<String, Vec<SortValue>>,
    next_doc: DocId,
}

impl MemoryIndexBuilder {
    pub fn new(similarity: Arc<dyn Similarity>) -> Self {
        Self {
            similarity,
            postings: BTreeMap::new(),
            norms: HashMap::new(),
            sort_values: HashMap::new(),
            next_doc: 0,
        }
    }

    fn default_norm(&self) -> u8 {
        self.similarity.encode_norm(1.0)
    }

    /// Returns the doc id given to `document`.
    pub fn add_document(&mut self, document: Document) -> DocId {
        let doc = self.next_doc;
        self.next_doc += 1;

        for field in &document.fields {
            let mut state = FieldInvertState { boost: field.boost, ..Default::default() };
            for token in &field.tokens {
                if token.position_increment == 0 {
                    state.num_overlap += 1;
                }
                state.position = (state.position + token.position_increment as i32).max(0);
                state.length += 1;
                self.postings.entry(Term::new(field.name.as_str(), token.text.as_str())).or_default().add(doc, state.position);
            }

            let norm = self.similarity.compute_norm(&field.name, &state);
            if !norm.is_finite() {
                warn!("non-finite norm {} for field `{}` of doc {}, clamped by encoding", norm, field.name, doc);
            }
            let encoded = self.similarity.encode_norm(norm);
            let default_norm = self.default_norm();
            let field_norms = self.norms.entry(field.name.clone()).or_default();
            field_norms.resize(doc as usize + 1, default_norm);
            field_norms[doc as usize] = encoded;
        }

        for (field, value) in document.sort_values {
            let values = self.sort_values.entry(field).or_default();
            values.resize(doc as usize + 1, SortValue::Null);
            values[doc as usize] = value;
        }
        doc
    }

    pub fn add_documents(&mut self, documents: impl IntoIterator<Item = Document>) -> &mut Self {
        for document in documents {
            self.add_document(document);
        }
        self
    }

    pub fn build(self) -> MemoryIndex {
        let max_doc = self.next_doc;
        let default_norm = self.default_norm();

        let postings: BTreeMap<Term, _> = self.postings.into_iter().map(|(term, builder)| (term, builder.build())).collect();
        let mut norms = self.norms;
        for field_norms in norms.values_mut() {
            field_norms.resize(max_doc as usize, default_norm);
        }
        let mut sort_values = self.sort_values;
        for values in sort_values.values_mut() {
            values.resize(max_doc as usize, SortValue::Null);
        }

        debug!("built memory index with {} docs, {} terms, {} normed fields", max_doc, postings.len(), norms.len());
        MemoryIndex::new(postings, norms, sort_values, max_doc)
    }
}
