use std::fmt;
use std::sync::Arc;

use crate::core::docset::{BitDocIdSet, DocIdSet};
use crate::core::filter::Filter;
use crate::core::index::IndexReader;
use crate::core::query::{Query, Weight};
use crate::core::searcher::IndexSearcher;
use crate::Result;

/// Admits the docs a query matches, scores ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryWrapperFilter {
    query: Query,
}

impl QueryWrapperFilter {
    pub fn new(query: Query) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

impl Filter for QueryWrapperFilter {
    fn doc_id_set(&self, reader: &dyn IndexReader) -> Result<Option<Arc<dyn DocIdSet>>> {
        let searcher = IndexSearcher::new(reader);
        let weight = searcher.create_normalized_weight(&self.query)?;
        let mut scorer = match weight.scorer(reader)? {
            Some(scorer) => scorer,
            None => return Ok(None),
        };
        // materialized so the set outlives the scorer and its postings
        let docs = BitDocIdSet::from_iterator(&mut scorer, reader.max_doc())?;
        Ok(Some(Arc::new(docs)))
    }
}

impl fmt::Display for QueryWrapperFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryWrapperFilter({})", self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::test_util::filtered_docs;
    use crate::core::index::{Document, MemoryIndex, Term};
    use crate::core::query::{BooleanQuery, Occur, TermQuery};
    use crate::core::similarity::DefaultSimilarity;

    #[test]
    fn test_wraps_query_matches() {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        builder.add_documents(["a b", "a", "b c", "a c"].iter().map(|text| Document::new().with_text("body", text)));
        let index = builder.build();

        let mut query = BooleanQuery::new();
        query.add(TermQuery::new(Term::new("body", "a")).into(), Occur::Must).unwrap();
        query.add(TermQuery::new(Term::new("body", "c")).into(), Occur::MustNot).unwrap();
        let filter = QueryWrapperFilter::new(query.into());

        assert_eq!(filtered_docs(&filter, &index), vec![0, 1]);
        assert_eq!(filter.to_string(), "QueryWrapperFilter(+body:a -body:c)");
        assert_eq!(index.open_postings(), 0);

        let nothing = QueryWrapperFilter::new(TermQuery::new(Term::new("body", "zzz")).into());
        assert!(nothing.doc_id_set(&index).unwrap().is_none());
    }
}
