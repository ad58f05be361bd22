use std::sync::Arc;

use crate::common::Position;
use crate::core::index::Term;
use crate::core::posting_list::PostingIterator;
use crate::core::similarity::Similarity;
use crate::Result;

use super::phrase_queue::QueuedPositions;
use super::phrase_scorer::{PhraseMatcher, PhraseState};
use super::PhraseScorer;

/// Scores every window where the terms appear within `slop` moves of the
/// phrase, closer windows weighing more through `Similarity::sloppy_freq`.
#[derive(Debug, Clone, Default)]
pub struct SloppyMatcher {
    slop: u32,
    popped: Vec<QueuedPositions>,
}

impl SloppyMatcher {
    pub fn new(slop: u32) -> Self {
        Self { slop, popped: vec![] }
    }

    pub fn slop(&self) -> u32 {
        self.slop
    }

    /// Seeds the first positions and fills the queue. Returns the largest
    /// position, or `None` if repeated terms ran out of distinct positions.
    fn init_positions(&mut self, state: &mut PhraseState<'_>) -> Result<Option<Position>> {
        for handle in 0..state.len() {
            state.arena[handle].first_position()?;
        }
        // repeated terms must start on distinct term positions
        for handle in 0..state.len() {
            while let Some(behind) = state.colliding_repeat(handle) {
                if !state.arena[behind].next_position()? {
                    return Ok(None);
                }
            }
        }

        state.queue.clear();
        let mut end = Position::MIN;
        for handle in 0..state.len() {
            end = end.max(state.arena[handle].position);
            state.put(handle);
        }
        Ok(Some(end))
    }

    /// Swaps `current` (popped) with `other` (queued): `other` leaves the queue and
    /// `current` goes back in.
    fn flip(&mut self, state: &mut PhraseState<'_>, current: usize, other: usize) -> usize {
        self.popped.clear();
        while let Some(entry) = state.queue.pop() {
            if entry.handle == other {
                break;
            }
            self.popped.push(entry);
        }
        for entry in self.popped.drain(..) {
            state.queue.add(entry);
        }
        state.put(current);
        other
    }
}

impl PhraseMatcher for SloppyMatcher {
    fn phrase_freq(&mut self, state: &mut PhraseState<'_>) -> Result<f32> {
        let mut end = match self.init_positions(state)? {
            Some(end) => end,
            None => return Ok(0.0),
        };

        let mut freq = 0.0;
        let mut done = false;
        while !done {
            let mut pp = match state.queue.pop() {
                Some(entry) => entry.handle,
                None => break,
            };
            let mut start = state.arena[pp].position;
            let next = state.queue.top().map_or(start, |top| top.position);

            let mut positions_differ = true;
            let mut pos = start;
            while pos <= next || !positions_differ {
                if pos <= next && positions_differ {
                    start = pos;
                }
                if !state.arena[pp].next_position()? {
                    done = true;
                    break;
                }
                let collision = state.colliding_repeat(pp);
                positions_differ = collision.is_none();
                if let Some(other) = collision.filter(|other| *other != pp) {
                    pp = self.flip(state, pp, other);
                }
                pos = state.arena[pp].position;
            }

            // window length is taken before `end` moves
            let match_length = end - start;
            if match_length >= 0 && match_length as u32 <= self.slop {
                freq += state.similarity.sloppy_freq(match_length as u32);
            }
            end = end.max(state.arena[pp].position);
            state.put(pp);
        }
        Ok(freq)
    }
}

impl<'a> PhraseScorer<'a, SloppyMatcher> {
    pub fn sloppy(
        postings: Vec<(Term, Box<dyn PostingIterator + 'a>, Position)>,
        norms: Option<&'a [u8]>,
        similarity: Arc<dyn Similarity>,
        weight_value: f32,
        slop: u32,
    ) -> Result<Self> {
        Self::new(postings, norms, similarity, weight_value, SloppyMatcher::new(slop))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
    use crate::common::DocId;
    use crate::core::docset::DocIdSetIterator;
    use crate::core::index::{Document, IndexReader, MemoryIndex};
    use crate::core::posting_list::{OpenPostingHandle, OpenPostingsCounter};
    use crate::core::scorer::test_util::collect_all;
    use crate::core::scorer::{ExactPhraseScorer, Scorer, SloppyPhraseScorer};
    use crate::core::similarity::DefaultSimilarity;
    use crate::SearchError;

    fn similarity() -> Arc<dyn Similarity> {
        Arc::new(DefaultSimilarity::default())
    }

    fn index_of(texts: &[&str]) -> MemoryIndex {
        let mut builder = MemoryIndex::builder(similarity());
        builder.add_documents(texts.iter().map(|text| Document::new().with_text("body", text)));
        builder.build()
    }

    fn phrase_postings<'a>(index: &'a MemoryIndex, words: &[&str]) -> Vec<(Term, Box<dyn PostingIterator + 'a>, Position)> {
        words
            .iter()
            .enumerate()
            .map(|(offset, word)| {
                let term = Term::new("body", *word);
                let postings = index.postings(&term).unwrap().unwrap();
                (term, postings, offset as Position)
            })
            .collect()
    }

    /// Phrase frequency per matching doc, norms left out.
    fn exact_freqs(index: &MemoryIndex, words: &[&str]) -> Vec<(DocId, f32)> {
        let mut scorer = ExactPhraseScorer::exact(phrase_postings(index, words), None, similarity(), 1.0).unwrap();
        collect_all(&mut scorer).into_iter().map(|(doc, score)| (doc, score * score)).collect()
    }

    fn sloppy_freqs(index: &MemoryIndex, words: &[&str], slop: u32) -> Vec<(DocId, f32)> {
        let mut scorer = SloppyPhraseScorer::sloppy(phrase_postings(index, words), None, similarity(), 1.0, slop).unwrap();
        let mut freqs = vec![];
        while scorer.next_doc().unwrap() != NO_MORE_DOCS {
            freqs.push((scorer.doc_id(), scorer.freq()));
        }
        freqs
    }

    #[test]
    fn test_exact_counts_aligned_offsets() {
        let index = index_of(&["a b a b", "b a", "a c b", "x a b y a b a b"]);
        let freqs = exact_freqs(&index, &["a", "b"]);
        let expected = vec![(0, 2.0), (3, 3.0)];
        assert_eq!(freqs.len(), expected.len());
        for ((doc, freq), (expected_doc, expected_freq)) in freqs.iter().zip(expected.iter()) {
            assert_eq!(doc, expected_doc);
            assert!((freq - expected_freq).abs() < 1e-4);
        }
        // repeated term in the phrase
        let index = index_of(&["a b a", "a b b a"]);
        let freqs = exact_freqs(&index, &["a", "b", "a"]);
        assert_eq!(freqs.iter().map(|f| f.0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_slop_zero_equals_exact() {
        let index = index_of(&["a b a b", "b a", "a c b"]);
        assert_eq!(sloppy_freqs(&index, &["a", "b"], 0), vec![(0, 2.0)]);
        // "b a" needs two moves, "a c b" one
        let slop_one = sloppy_freqs(&index, &["a", "b"], 1);
        assert_eq!(slop_one.iter().map(|f| f.0).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(slop_one[1].1, 0.5);
        let slop_two = sloppy_freqs(&index, &["a", "b"], 2);
        assert_eq!(slop_two.iter().map(|f| f.0).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_repeated_terms() {
        let index = index_of(&["a b a", "a b"]);
        assert_eq!(sloppy_freqs(&index, &["a", "b", "a"], 0), vec![(0, 1.0)]);
        assert!(sloppy_freqs(&index, &["a", "a"], 0).is_empty());
    }

    #[test]
    fn test_slop_monotonicity() {
        let mut rng = StdRng::seed_from_u64(7);
        let words = ["a", "b", "c"];
        let texts: Vec<String> = (0..60)
            .map(|_| (0..rng.gen_range(3..12)).map(|_| words[rng.gen_range(0..3)]).collect::<Vec<_>>().join(" "))
            .collect();
        let index = index_of(&texts.iter().map(String::as_str).collect::<Vec<_>>());

        let freq_of = |freqs: &[(DocId, f32)], doc: DocId| freqs.iter().find(|f| f.0 == doc).map_or(0.0, |f| f.1);
        let exact = exact_freqs(&index, &["a", "b", "c"]);
        let mut previous = sloppy_freqs(&index, &["a", "b", "c"], 0);
        for doc in 0..60 {
            assert!((freq_of(&exact, doc) - freq_of(&previous, doc)).abs() < 1e-4, "doc {}", doc);
        }
        for slop in 1..6 {
            let current = sloppy_freqs(&index, &["a", "b", "c"], slop);
            for doc in 0..60 {
                assert!(freq_of(&current, doc) >= freq_of(&previous, doc), "doc {} slop {}", doc, slop);
            }
            previous = current;
        }
    }

    #[test]
    fn test_advance_and_explain() {
        let index = index_of(&["a b", "c", "a b a b", "b a"]);
        let mut scorer = ExactPhraseScorer::exact(phrase_postings(&index, &["a", "b"]), None, similarity(), 1.0).unwrap();
        assert_eq!(scorer.doc_id(), UNPOSITIONED_DOC);
        assert_eq!(scorer.advance(1).unwrap(), 2);
        // staying put keeps the frequency
        assert_eq!(scorer.advance(2).unwrap(), 2);
        assert_eq!(scorer.freq(), 2.0);
        assert_eq!(scorer.explain(2).unwrap().description(), "tf(phraseFreq=2.0)");
        assert!(!scorer.explain(3).unwrap().is_match());
        assert_eq!(scorer.doc_id(), NO_MORE_DOCS);
    }

    /// Fails when asked for positions.
    struct FailingPostings<'a> {
        doc: DocId,
        _handle: OpenPostingHandle<'a>,
    }

    impl<'a> DocIdSetIterator for FailingPostings<'a> {
        fn doc_id(&self) -> DocId {
            self.doc
        }

        fn next_doc(&mut self) -> crate::Result<DocId> {
            self.doc = match self.doc {
                UNPOSITIONED_DOC => 0,
                _ => NO_MORE_DOCS,
            };
            Ok(self.doc)
        }
    }

    impl<'a> PostingIterator for FailingPostings<'a> {
        fn freq(&self) -> crate::Result<u32> {
            Ok(1)
        }

        fn next_position(&mut self) -> crate::Result<Position> {
            Err(io::Error::new(io::ErrorKind::Other, "corrupt positions").into())
        }
    }

    #[test]
    fn test_io_error_releases_postings() {
        let index = index_of(&["a b"]);
        let counter = OpenPostingsCounter::default();
        {
            let mut postings = phrase_postings(&index, &["a"]);
            let failing = FailingPostings { doc: UNPOSITIONED_DOC, _handle: counter.acquire() };
            postings.push((Term::new("body", "b"), Box::new(failing), 1));
            let mut scorer = SloppyPhraseScorer::sloppy(postings, None, similarity(), 1.0, 2).unwrap();
            assert_eq!(index.open_postings(), 1);
            assert!(matches!(scorer.next_doc(), Err(SearchError::Io(_))));
        }
        assert_eq!(counter.open(), 0);
        assert_eq!(index.open_postings(), 0);
    }

    #[test]
    fn test_empty_phrase_rejected() {
        assert!(matches!(
            ExactPhraseScorer::exact(vec![], None, similarity(), 1.0),
            Err(SearchError::InvalidArgument(_))
        ));
    }
}
