use std::sync::Arc;

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::common::constants::NO_MORE_DOCS;
use crate::common::DocId;
use crate::config::SearchConfig;
use crate::core::collector::{Collector, Sort, TopDocs, TopFieldCollector, TopFieldDocs, TopFieldOptions, TopScoreDocCollector};
use crate::core::docset::DocIdSetIterator;
use crate::core::filter::Filter;
use crate::core::index::{IndexReader, Term};
use crate::core::query::{Query, QueryNode, Weight, WeightEnum};
use crate::core::scorer::ScorerEnum;
use crate::core::similarity::{DefaultSimilarity, Similarity};
use crate::core::Explanation;
use crate::{Result, SearchError};

/// Runs queries against one reader.
///
/// Cheap to build; holds the reader by reference so several searchers may
/// share it across threads.
pub struct IndexSearcher<'r> {
    reader: &'r dyn IndexReader,
    similarity: Arc<dyn Similarity>,
    config: SearchConfig,
}

impl<'r> IndexSearcher<'r> {
    pub fn new(reader: &'r dyn IndexReader) -> Self {
        Self::with_config(reader, SearchConfig::default())
    }

    pub fn with_config(reader: &'r dyn IndexReader, config: SearchConfig) -> Self {
        let similarity: DefaultSimilarity = config.similarity.into();
        Self { reader, similarity: Arc::new(similarity), config }
    }

    pub fn set_similarity(&mut self, similarity: Arc<dyn Similarity>) {
        self.similarity = similarity;
    }

    pub fn reader(&self) -> &'r dyn IndexReader {
        self.reader
    }

    pub fn similarity(&self) -> &Arc<dyn Similarity> {
        &self.similarity
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn max_doc(&self) -> DocId {
        self.reader.max_doc()
    }

    pub fn doc_freq(&self, term: &Term) -> Result<u32> {
        self.reader.doc_freq(term)
    }

    /// Rewrites until the query stops changing.
    pub fn rewrite(&self, query: &Query) -> Result<Query> {
        let mut current = query.clone();
        loop {
            let rewritten = current.rewrite(self)?;
            if rewritten == current {
                return Ok(rewritten);
            }
            trace!("rewrote {} into {}", current, rewritten);
            current = rewritten;
        }
    }

    /// Rewritten, weighted and normalized, ready to hand out scorers.
    pub fn create_normalized_weight(&self, query: &Query) -> Result<WeightEnum> {
        let query = self.rewrite(query)?;
        let mut weight = query.create_weight(self)?;
        let sum = weight.sum_of_squared_weights()?;
        let mut norm = self.similarity.query_norm(sum);
        if !norm.is_finite() {
            warn!("query norm of {} is {} (sum of squared weights {}), using 1.0", query, norm, sum);
            norm = 1.0;
        }
        weight.normalize(norm);
        Ok(weight)
    }

    /// Top `k` hits by score, ties broken by doc id.
    pub fn search(&self, query: &Query, filter: Option<&dyn Filter>, k: usize) -> Result<TopDocs> {
        let num_hits = self.num_hits(k)?;
        let collector_config = self.config.collector;
        let mut collector =
            TopScoreDocCollector::create(num_hits, collector_config.docs_in_order, collector_config.pre_populate)?;
        self.search_with_collector(query, filter, &mut collector)?;
        let top_docs = collector.into_top_docs();
        debug!("query {} matched {} docs", query, top_docs.total_hits);
        Ok(top_docs)
    }

    /// Top `k` hits under `sort`.
    pub fn search_sorted(&self, query: &Query, filter: Option<&dyn Filter>, k: usize, sort: Sort) -> Result<TopFieldDocs> {
        let num_hits = self.num_hits(k)?;
        let options = TopFieldOptions::builder().track_max_score(self.config.track_max_score).build();
        let mut collector = TopFieldCollector::create(self.reader, sort, num_hits, options)?;
        self.search_with_collector(query, filter, &mut collector)?;
        let top_docs = collector.into_top_docs();
        debug!("sorted query {} matched {} docs", query, top_docs.total_hits);
        Ok(top_docs)
    }

    /// Feeds every match, restricted to `filter` if given, to `collector`.
    pub fn search_with_collector(&self, query: &Query, filter: Option<&dyn Filter>, collector: &mut dyn Collector) -> Result<()> {
        let weight = self.create_normalized_weight(query)?;
        let mut scorer = match weight.scorer(self.reader)? {
            Some(scorer) => scorer,
            None => return Ok(()),
        };
        match filter {
            None => {
                while scorer.next_doc()? != NO_MORE_DOCS {
                    let doc = scorer.doc_id();
                    collector.collect(doc, &mut scorer)?;
                }
                Ok(())
            }
            Some(filter) => {
                let filter_iter = match filter.doc_id_set(self.reader)? {
                    Some(set) => set.iterator()?,
                    None => None,
                };
                match filter_iter {
                    Some(mut filter_iter) => Self::collect_filtered(&mut scorer, filter_iter.as_mut(), collector),
                    None => Ok(()),
                }
            }
        }
    }

    /// Leapfrogs scorer and filter until both sit on the same doc.
    fn collect_filtered(
        scorer: &mut ScorerEnum<'_>,
        filter_iter: &mut dyn DocIdSetIterator,
        collector: &mut dyn Collector,
    ) -> Result<()> {
        let mut filter_doc = filter_iter.next_doc()?;
        let mut scorer_doc = scorer.advance(filter_doc)?;
        loop {
            if scorer_doc == filter_doc {
                if scorer_doc == NO_MORE_DOCS {
                    return Ok(());
                }
                collector.collect(scorer_doc, scorer)?;
                filter_doc = filter_iter.next_doc()?;
                scorer_doc = scorer.advance(filter_doc)?;
            } else if scorer_doc > filter_doc {
                filter_doc = filter_iter.advance(scorer_doc)?;
            } else {
                scorer_doc = scorer.advance(filter_doc)?;
            }
        }
    }

    /// Runs independent queries on the rayon pool.
    pub fn search_batch(&self, queries: &[Query], k: usize) -> Result<Vec<TopDocs>> {
        queries.par_iter().map(|query| self.search(query, None, k)).collect()
    }

    pub fn explain(&self, query: &Query, doc: DocId) -> Result<Explanation> {
        self.create_normalized_weight(query)?.explain(self.reader, doc)
    }

    fn num_hits(&self, k: usize) -> Result<usize> {
        if k == 0 {
            return Err(SearchError::InvalidArgument("k must be > 0".to_string()));
        }
        Ok(k.min(self.reader.max_doc().max(1) as usize))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::core::collector::{SortField, SortFieldType, SortValue};
    use crate::core::filter::{QueryWrapperFilter, TermsFilter};
    use crate::core::index::{Document, MemoryIndex};
    use crate::core::posting_list::PostingIterator;
    use crate::core::query::{BooleanQuery, MatchAllDocsQuery, Occur, PhraseQuery, PrefixQuery, TermQuery};

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env().filter(None, log::LevelFilter::Debug).is_test(true).try_init();
    }

    fn term(text: &str) -> Query {
        TermQuery::new(Term::new("body", text)).into()
    }

    fn index() -> MemoryIndex {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        let texts = ["a b c", "b c", "a a", "c d e", "a d", "b", "a b d"];
        for (i, text) in texts.iter().enumerate() {
            builder.add_document(
                Document::new().with_text("body", text).with_sort_value("rank", SortValue::Int((i as i64 * 5) % 7)),
            );
        }
        builder.build()
    }

    fn docs(top_docs: &TopDocs) -> Vec<DocId> {
        let mut docs: Vec<DocId> = top_docs.score_docs.iter().map(|hit| hit.doc).collect();
        docs.sort();
        docs
    }

    #[test]
    fn test_search_with_filter() {
        init_logger();
        let index = index();
        let searcher = IndexSearcher::new(&index);
        let filter = TermsFilter::new([Term::new("body", "d")]);

        let top_docs = searcher.search(&term("a"), Some(&filter), 10).unwrap();
        assert_eq!(docs(&top_docs), vec![4, 6]);
        assert_eq!(top_docs.total_hits, 2);

        let empty = TermsFilter::new([Term::new("body", "zzz")]);
        assert_eq!(searcher.search(&term("a"), Some(&empty), 10).unwrap().total_hits, 0);

        let filter = QueryWrapperFilter::new(term("b"));
        let top_docs = searcher.search(&MatchAllDocsQuery::new().into(), Some(&filter), 10).unwrap();
        assert_eq!(docs(&top_docs), vec![0, 1, 5, 6]);
        assert_eq!(index.open_postings(), 0);
    }

    #[test]
    fn test_search_k_bounds() {
        let index = index();
        let searcher = IndexSearcher::new(&index);
        assert!(matches!(searcher.search(&term("a"), None, 0), Err(SearchError::InvalidArgument(_))));

        // k beyond max_doc is clamped
        let top_docs = searcher.search(&MatchAllDocsQuery::new().into(), None, 1000).unwrap();
        assert_eq!(top_docs.score_docs.len(), 7);
        assert_eq!(top_docs.total_hits, 7);

        let top_docs = searcher.search(&term("a"), None, 2).unwrap();
        assert_eq!(top_docs.total_hits, 4);
        assert_eq!(top_docs.score_docs.len(), 2);
        // "a a" has the highest tf
        assert_eq!(top_docs.score_docs[0].doc, 2);
        assert_eq!(top_docs.max_score, top_docs.score_docs[0].score);
    }

    #[test]
    fn test_search_sorted() {
        let index = index();
        let searcher = IndexSearcher::new(&index);
        let sort = Sort::new(vec![SortField::new("rank", SortFieldType::Int)]).unwrap();
        let top_docs = searcher.search_sorted(&term("a"), None, 3, sort).unwrap();
        assert_eq!(top_docs.total_hits, 4);
        // ranks of docs 0, 2, 4, 6 are 0, 3, 6, 2
        let sorted: Vec<DocId> = top_docs.score_docs.iter().map(|hit| hit.doc).collect();
        assert_eq!(sorted, vec![0, 6, 2]);
        assert_eq!(top_docs.score_docs[0].fields, Some(vec![SortValue::Int(0)]));
    }

    #[test]
    fn test_explain_matches_scores() {
        let index = index();
        let searcher = IndexSearcher::new(&index);

        let mut query = BooleanQuery::new();
        query.add(term("a").with_boost(2.0), Occur::Should).unwrap();
        query.add(PhraseQuery::from_words("body", &["b", "c"]).into(), Occur::Should).unwrap();
        query.add(PrefixQuery::new(Term::new("body", "d")).into(), Occur::Should).unwrap();
        query.add(term("e"), Occur::MustNot).unwrap();
        let query: Query = query.into();

        let top_docs = searcher.search(&query, None, 10).unwrap();
        assert_eq!(docs(&top_docs), vec![0, 1, 2, 4, 6]);
        for hit in &top_docs.score_docs {
            let explanation = searcher.explain(&query, hit.doc).unwrap();
            assert!(explanation.is_match());
            assert!((explanation.value() - hit.score).abs() < 1e-5, "doc {}: {}", hit.doc, explanation);
        }
        assert!(!searcher.explain(&query, 3).unwrap().is_match());
        assert!(!searcher.explain(&query, 5).unwrap().is_match());
    }

    #[test]
    fn test_search_batch() {
        let index = index();
        let searcher = IndexSearcher::new(&index);
        let queries = vec![term("a"), term("b"), term("zzz")];
        let results = searcher.search_batch(&queries, 10).unwrap();
        assert_eq!(results.iter().map(|top_docs| top_docs.total_hits).collect::<Vec<_>>(), vec![4, 4, 0]);
        assert!(results[2].max_score.is_nan());
    }

    #[test]
    fn test_rewrite_until_stable() {
        let index = index();
        let searcher = IndexSearcher::new(&index);
        // boolean -> phrase -> term
        let mut query = BooleanQuery::new();
        query.add(PhraseQuery::from_words("body", &["a"]).into(), Occur::Must).unwrap();
        assert_eq!(searcher.rewrite(&query.into()).unwrap(), term("a"));
    }

    /// Serves one healthy posting list and fails on every other term.
    struct FailingReader {
        inner: MemoryIndex,
    }

    impl IndexReader for FailingReader {
        fn cache_key(&self) -> u64 {
            self.inner.cache_key()
        }

        fn max_doc(&self) -> DocId {
            self.inner.max_doc()
        }

        fn num_docs(&self) -> usize {
            self.inner.num_docs()
        }

        fn is_deleted(&self, doc: DocId) -> bool {
            self.inner.is_deleted(doc)
        }

        fn doc_freq(&self, term: &Term) -> Result<u32> {
            self.inner.doc_freq(term)
        }

        fn postings(&self, term: &Term) -> Result<Option<Box<dyn PostingIterator + '_>>> {
            match term.text() {
                "a" => self.inner.postings(term),
                _ => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated posting list").into()),
            }
        }

        fn norms(&self, field: &str) -> Result<Option<&[u8]>> {
            self.inner.norms(field)
        }

        fn terms(&self, field: &str) -> Result<Vec<Term>> {
            self.inner.terms(field)
        }

        fn sort_value(&self, field: &str, doc: DocId) -> Result<SortValue> {
            self.inner.sort_value(field, doc)
        }
    }

    #[test]
    fn test_io_error_aborts_search() {
        init_logger();
        let reader = FailingReader { inner: index() };
        let searcher = IndexSearcher::new(&reader);
        assert_eq!(searcher.search(&term("a"), None, 10).unwrap().total_hits, 4);

        let mut query = BooleanQuery::new();
        query.add(term("a"), Occur::Must).unwrap();
        query.add(term("b"), Occur::Should).unwrap();
        assert!(matches!(searcher.search(&query.into(), None, 10), Err(SearchError::Io(_))));
        // the "a" postings opened before the failure are released
        assert_eq!(reader.inner.open_postings(), 0);
    }
}
