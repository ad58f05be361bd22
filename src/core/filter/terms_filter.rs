use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

use crate::core::docset::DocIdSet;
use crate::core::filter::{docs_with_any_term, Filter};
use crate::core::index::{IndexReader, Term};
use crate::Result;

/// Admits docs containing at least one of a set of terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TermsFilter {
    terms: BTreeSet<Term>,
}

impl TermsFilter {
    pub fn new(terms: impl IntoIterator<Item = Term>) -> Self {
        Self { terms: terms.into_iter().collect() }
    }

    pub fn add_term(&mut self, term: Term) {
        self.terms.insert(term);
    }

    pub fn terms(&self) -> &BTreeSet<Term> {
        &self.terms
    }
}

impl Filter for TermsFilter {
    fn doc_id_set(&self, reader: &dyn IndexReader) -> Result<Option<Arc<dyn DocIdSet>>> {
        docs_with_any_term(reader, &self.terms)
    }
}

impl fmt::Display for TermsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TermsFilter({})", self.terms.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::test_util::filtered_docs;
    use crate::core::index::{Document, MemoryIndex};
    use crate::core::similarity::DefaultSimilarity;

    #[test]
    fn test_union_of_terms() {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        builder.add_documents(["a b", "c", "b d", "e"].iter().map(|text| Document::new().with_text("body", text)));
        let mut index = builder.build();

        let filter = TermsFilter::new(vec![Term::new("body", "b"), Term::new("body", "e"), Term::new("body", "zzz")]);
        assert_eq!(filtered_docs(&filter, &index), vec![0, 2, 3]);
        assert_eq!(filter.to_string(), "TermsFilter(body:b body:e body:zzz)");

        index.delete_document(2).unwrap();
        assert_eq!(filtered_docs(&filter, &index), vec![0, 3]);
        assert!(TermsFilter::new(vec![Term::new("body", "zzz")]).doc_id_set(&index).unwrap().is_none());
    }
}
