use std::sync::Arc;

use crate::common::constants::SCORE_CACHE_SIZE;
use crate::common::{DocId, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::index::Term;
use crate::core::posting_list::PostingIterator;
use crate::core::scorer::Scorer;
use crate::core::similarity::Similarity;
use crate::core::Explanation;
use crate::Result;

/// Scores the docs of a single term: `tf(freq) * weight * norm`.
pub struct TermScorer<'a> {
    term: Term,
    postings: Box<dyn PostingIterator + 'a>,
    norms: Option<&'a [u8]>,
    similarity: Arc<dyn Similarity>,
    weight_value: f32,
    score_cache: [f32; SCORE_CACHE_SIZE],
}

impl<'a> TermScorer<'a> {
    pub fn new(
        term: Term,
        postings: Box<dyn PostingIterator + 'a>,
        norms: Option<&'a [u8]>,
        similarity: Arc<dyn Similarity>,
        weight_value: f32,
    ) -> Self {
        let mut score_cache = [0f32; SCORE_CACHE_SIZE];
        for (freq, slot) in score_cache.iter_mut().enumerate() {
            *slot = similarity.tf(freq as f32) * weight_value;
        }
        Self { term, postings, norms, similarity, weight_value, score_cache }
    }

    fn norm(&self, doc: DocId) -> f32 {
        match self.norms.and_then(|norms| norms.get(doc as usize)) {
            Some(&norm) => self.similarity.decode_norm(norm),
            None => 1.0,
        }
    }
}

impl<'a> DocIdSetIterator for TermScorer<'a> {
    fn doc_id(&self) -> DocId {
        self.postings.doc_id()
    }

    fn next_doc(&mut self) -> Result<DocId> {
        self.postings.next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        self.postings.advance(target)
    }
}

impl<'a> Scorer for TermScorer<'a> {
    fn score(&mut self) -> Result<ScoreType> {
        let freq = self.postings.freq()? as usize;
        let raw = match freq < SCORE_CACHE_SIZE {
            true => self.score_cache[freq],
            false => self.similarity.tf(freq as f32) * self.weight_value,
        };
        Ok(raw * self.norm(self.postings.doc_id()))
    }

    fn explain(&mut self, doc: DocId) -> Result<Explanation> {
        let freq = match self.advance(doc)? == doc {
            true => self.postings.freq()?,
            false => 0,
        };
        Ok(Explanation::new(self.similarity.tf(freq as f32), format!("tf(termFreq({})={})", self.term, freq)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::index::{Document, IndexReader, MemoryIndex};
    use crate::core::scorer::test_util::collect_all;
    use crate::core::similarity::DefaultSimilarity;

    fn mock_index() -> MemoryIndex {
        let mut builder = MemoryIndex::builder(Arc::new(DefaultSimilarity::default()));
        builder.add_document(Document::new().with_text("body", "a b c d"));
        builder.add_document(Document::new().with_text("body", "b"));
        // 40 occurrences, beyond the score cache
        builder.add_document(Document::new().with_tokens("body", std::iter::repeat("a").take(40)));
        builder.add_document(Document::new().with_text("body", "a a a a"));
        builder.build()
    }

    fn term_scorer<'a>(index: &'a MemoryIndex, text: &str, weight: f32) -> TermScorer<'a> {
        let term = Term::new("body", text);
        let postings = index.postings(&term).unwrap().unwrap();
        let norms = index.norms("body").unwrap();
        TermScorer::new(term, postings, norms, Arc::new(DefaultSimilarity::default()), weight)
    }

    #[test]
    fn test_scores() {
        let index = mock_index();
        let mut scorer = term_scorer(&index, "a", 2.0);
        let hits = collect_all(&mut scorer);
        assert_eq!(hits.iter().map(|h| h.0).collect::<Vec<_>>(), vec![0, 2, 3]);
        // tf(1) * 2 * norm(4 tokens = 0.5)
        assert_eq!(hits[0].1, 1.0);
        // tf(40) * 2 * decode(encode(1/sqrt(40)))
        let expected = 40f32.sqrt() * 2.0 * DefaultSimilarity::default().decode_norm(index.norms("body").unwrap().unwrap()[2]);
        assert!((hits[1].1 - expected).abs() < 1e-5);
        // tf(4) * 2 * 0.5
        assert_eq!(hits[2].1, 2.0);
    }

    #[test]
    fn test_advance_and_explain() {
        let index = mock_index();
        let mut scorer = term_scorer(&index, "a", 1.0);
        assert_eq!(scorer.advance(1).unwrap(), 2);

        let mut scorer = term_scorer(&index, "a", 1.0);
        let explanation = scorer.explain(3).unwrap();
        assert_eq!(explanation.value(), 2.0);
        assert_eq!(explanation.description(), "tf(termFreq(body:a)=4)");

        let mut scorer = term_scorer(&index, "b", 1.0);
        let explanation = scorer.explain(2).unwrap();
        assert_eq!(explanation.value(), 0.0);
        assert!(!explanation.is_match());
    }
}
