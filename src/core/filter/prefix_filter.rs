use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::core::docset::DocIdSet;
use crate::core::filter::{docs_with_any_term, Filter};
use crate::core::index::{IndexReader, Term};
use crate::Result;

/// Admits docs containing a term that starts with the prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixFilter {
    prefix: Term,
}

impl PrefixFilter {
    pub fn new(prefix: Term) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> &Term {
        &self.prefix
    }

    /// Terms of the reader matching the prefix, in term order.
    pub fn matching_terms(&self, reader: &dyn IndexReader) -> Result<Vec<Term>> {
        let terms: Vec<Term> = reader
            .terms(self.prefix.field())?
            .into_iter()
            .filter(|term| term.text().starts_with(self.prefix.text()))
            .collect();
        trace!("prefix {} expands to {} terms", self.prefix, terms.len());
        Ok(terms)
    }
}

impl Filter for PrefixFilter {
    fn doc_id_set(&self, reader: &dyn IndexReader) -> Result<Option<Arc<dyn DocIdSet>>> {
        docs_with_any_term(reader, &self.matching_terms(reader)?)
    }
}

impl fmt::Display for PrefixFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrefixFilter({})", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::test_util::filtered_docs;
    use crate::core::index::{Document, MemoryIndex};
    use crate::core::similarity::DefaultSimilarity;

    #[test]
    fn test_prefix_expansion() {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        builder.add_documents(
            ["apple pie", "banana", "apricot jam", "grape"].iter().map(|text| Document::new().with_text("body", text)),
        );
        builder.add_document(Document::new().with_text("title", "apple"));
        let index = builder.build();

        let filter = PrefixFilter::new(Term::new("body", "ap"));
        assert_eq!(filter.matching_terms(&index).unwrap(), vec![Term::new("body", "apple"), Term::new("body", "apricot")]);
        assert_eq!(filtered_docs(&filter, &index), vec![0, 2]);
        assert_eq!(filter.to_string(), "PrefixFilter(body:ap)");
        assert!(PrefixFilter::new(Term::new("body", "kiwi")).doc_id_set(&index).unwrap().is_none());
    }
}
