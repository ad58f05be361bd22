use std::sync::Arc;

use crate::common::Position;
use crate::core::index::Term;
use crate::core::posting_list::PostingIterator;
use crate::core::similarity::Similarity;
use crate::Result;

use super::phrase_scorer::{PhraseMatcher, PhraseState};
use super::PhraseScorer;

/// Counts the places where every term sits exactly at its phrase offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl PhraseMatcher for ExactMatcher {
    fn phrase_freq(&mut self, state: &mut PhraseState<'_>) -> Result<f32> {
        state.queue.clear();
        for handle in 0..state.len() {
            state.arena[handle].first_position()?;
            state.put(handle);
        }
        state.queue_to_list();

        let mut freq = 0u32;
        loop {
            while state.arena[state.first].position < state.arena[state.last].position {
                loop {
                    let first = state.first;
                    if !state.arena[first].next_position()? {
                        return Ok(freq as f32);
                    }
                    if state.arena[first].position >= state.arena[state.last].position {
                        break;
                    }
                }
                state.first_to_last();
            }
            // head caught up with the tail: all aligned
            freq += 1;
            let last = state.last;
            if !state.arena[last].next_position()? {
                break;
            }
        }
        Ok(freq as f32)
    }
}

impl<'a> PhraseScorer<'a, ExactMatcher> {
    pub fn exact(
        postings: Vec<(Term, Box<dyn PostingIterator + 'a>, Position)>,
        norms: Option<&'a [u8]>,
        similarity: Arc<dyn Similarity>,
        weight_value: f32,
    ) -> Result<Self> {
        Self::new(postings, norms, similarity, weight_value, ExactMatcher)
    }
}
