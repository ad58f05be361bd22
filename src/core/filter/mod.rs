mod caching_wrapper_filter;
mod prefix_filter;
mod query_wrapper_filter;
mod terms_filter;

use std::fmt;
use std::sync::Arc;

pub use caching_wrapper_filter::CachingWrapperFilter;
pub use prefix_filter::PrefixFilter;
pub use query_wrapper_filter::QueryWrapperFilter;
pub use terms_filter::TermsFilter;

use crate::common::constants::NO_MORE_DOCS;
use crate::core::docset::{BitDocIdSet, DocIdSet, DocIdSetIterator};
use crate::core::index::{IndexReader, Term};
use crate::Result;

/// Restricts which documents a search may return.
pub trait Filter: Send + Sync + fmt::Debug + fmt::Display {
    /// The admitted docs of `reader`, `None` when there are none.
    fn doc_id_set(&self, reader: &dyn IndexReader) -> Result<Option<Arc<dyn DocIdSet>>>;
}

/// Docs holding any of `terms`, deleted docs left out.
pub(crate) fn docs_with_any_term<'t>(
    reader: &dyn IndexReader,
    terms: impl IntoIterator<Item = &'t Term>,
) -> Result<Option<Arc<dyn DocIdSet>>> {
    let mut docs = BitDocIdSet::with_max_doc(reader.max_doc());
    for term in terms {
        let mut postings = match reader.postings(term)? {
            Some(postings) => postings,
            None => continue,
        };
        let mut doc = postings.next_doc()?;
        while doc != NO_MORE_DOCS {
            docs.insert(doc);
            doc = postings.next_doc()?;
        }
    }
    match docs.is_empty() {
        true => Ok(None),
        false => Ok(Some(Arc::new(docs))),
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::common::DocId;

    pub(crate) fn filtered_docs(filter: &dyn Filter, reader: &dyn IndexReader) -> Vec<DocId> {
        let set = match filter.doc_id_set(reader).unwrap() {
            Some(set) => set,
            None => return vec![],
        };
        let mut iterator = match set.iterator().unwrap() {
            Some(iterator) => iterator,
            None => return vec![],
        };
        let mut docs = vec![];
        while iterator.next_doc().unwrap() != NO_MORE_DOCS {
            docs.push(iterator.doc_id());
        }
        docs
    }
}
