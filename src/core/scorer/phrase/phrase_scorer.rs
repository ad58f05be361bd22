use std::sync::Arc;

use log::trace;

use crate::common::constants::{NO_MORE_DOCS, UNPOSITIONED_DOC};
use crate::common::{DocId, Position, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::index::Term;
use crate::core::posting_list::PostingIterator;
use crate::core::scorer::Scorer;
use crate::core::similarity::Similarity;
use crate::core::Explanation;
use crate::{Result, SearchError};

use super::phrase_positions::PhrasePositions;
use super::phrase_queue::{PhraseOrder, PhraseQueue, QueuedPositions};

/// Computes the phrase frequency of the doc every term is positioned on.
pub trait PhraseMatcher {
    /// Returns 0 when the terms don't form the phrase in this doc.
    fn phrase_freq(&mut self, state: &mut PhraseState<'_>) -> Result<f32>;
}

/// Phrase nodes in an arena, linked as a list (`first`..`last`) and
/// ordered by a queue that is reused for every doc.
pub struct PhraseState<'a> {
    pub(crate) arena: Vec<PhrasePositions<'a>>,
    pub(crate) first: usize,
    pub(crate) last: usize,
    pub(crate) queue: PhraseQueue,
    pub(crate) similarity: Arc<dyn Similarity>,
}

impl<'a> PhraseState<'a> {
    fn new(arena: Vec<PhrasePositions<'a>>, similarity: Arc<dyn Similarity>) -> Self {
        let mut state = Self { first: 0, last: 0, queue: PhraseQueue::new(arena.len(), PhraseOrder), arena, similarity };
        for handle in 0..state.arena.len() {
            state.arena[handle].next = None;
            if handle > 0 {
                state.arena[handle - 1].next = Some(handle);
            }
        }
        state.last = state.arena.len() - 1;
        state
    }

    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn snapshot(&self, handle: usize) -> QueuedPositions {
        let node = &self.arena[handle];
        QueuedPositions { doc: node.doc, position: node.position, offset: node.offset, handle }
    }

    pub(crate) fn put(&mut self, handle: usize) {
        let entry = self.snapshot(handle);
        self.queue.add(entry);
    }

    /// Drains the queue into the list, smallest first.
    pub(crate) fn queue_to_list(&mut self) {
        let mut previous: Option<usize> = None;
        while let Some(entry) = self.queue.pop() {
            match previous {
                Some(prev) => self.arena[prev].next = Some(entry.handle),
                None => self.first = entry.handle,
            }
            self.arena[entry.handle].next = None;
            previous = Some(entry.handle);
        }
        if let Some(last) = previous {
            self.last = last;
        }
    }

    pub(crate) fn first_to_last(&mut self) {
        let first = self.first;
        if let Some(next) = self.arena[first].next {
            self.arena[self.last].next = Some(first);
            self.last = first;
            self.first = next;
            self.arena[first].next = None;
        }
    }

    fn sort(&mut self) {
        self.queue.clear();
        for handle in 0..self.arena.len() {
            self.put(handle);
        }
        self.queue_to_list();
    }

    /// Another node of the same repeated term sitting on the same term position,
    /// resolved to whichever of the two has the larger offset.
    pub(crate) fn colliding_repeat(&self, handle: usize) -> Option<usize> {
        let node = &self.arena[handle];
        let group = node.repeat_group?;
        let term_position = node.term_position();
        self.arena
            .iter()
            .enumerate()
            .find(|(other, pp)| *other != handle && pp.repeat_group == Some(group) && pp.term_position() == term_position)
            .map(|(other, pp)| match node.offset > pp.offset {
                true => handle,
                false => other,
            })
    }
}

/// Scores docs containing all the terms of a phrase at matching positions.
/// The matcher decides what "matching" means and how often it happens.
pub struct PhraseScorer<'a, M> {
    state: PhraseState<'a>,
    matcher: M,
    norms: Option<&'a [u8]>,
    weight_value: f32,
    doc: DocId,
    first_time: bool,
    more: bool,
    freq: f32,
}

impl<'a, M: PhraseMatcher> PhraseScorer<'a, M> {
    /// `postings` holds each phrase term with its iterator and its position inside the phrase.
    pub fn new(
        postings: Vec<(Term, Box<dyn PostingIterator + 'a>, Position)>,
        norms: Option<&'a [u8]>,
        similarity: Arc<dyn Similarity>,
        weight_value: f32,
        matcher: M,
    ) -> Result<Self> {
        if postings.is_empty() {
            return Err(SearchError::InvalidArgument("a phrase scorer needs at least one term".to_string()));
        }
        let terms: Vec<Term> = postings.iter().map(|(term, _, _)| term.clone()).collect();
        let mut arena: Vec<PhrasePositions<'a>> =
            postings.into_iter().map(|(_, postings, offset)| PhrasePositions::new(postings, offset)).collect();
        for (handle, term) in terms.iter().enumerate() {
            let first_seen = terms.iter().position(|t| t == term).unwrap_or(handle);
            if terms.iter().filter(|t| *t == term).count() > 1 {
                arena[handle].repeat_group = Some(first_seen);
            }
        }
        Ok(Self {
            state: PhraseState::new(arena, similarity),
            matcher,
            norms,
            weight_value,
            doc: UNPOSITIONED_DOC,
            first_time: true,
            more: true,
            freq: 0.0,
        })
    }

    /// Phrase frequency of the current doc.
    pub fn freq(&self) -> f32 {
        self.freq
    }

    fn init(&mut self) -> Result<()> {
        for handle in 0..self.state.len() {
            if !self.more {
                break;
            }
            self.more = self.state.arena[handle].next_doc()?;
        }
        if self.more {
            self.state.sort();
        }
        Ok(())
    }

    /// Leap-frogs until all terms share a doc with a non-zero phrase frequency.
    fn do_next(&mut self) -> Result<bool> {
        while self.more {
            while self.more && self.state.arena[self.state.first].doc < self.state.arena[self.state.last].doc {
                let target = self.state.arena[self.state.last].doc;
                let first = self.state.first;
                self.more = self.state.arena[first].skip_to(target)?;
                self.state.first_to_last();
            }
            if self.more {
                self.freq = self.matcher.phrase_freq(&mut self.state)?;
                if self.freq != 0.0 {
                    return Ok(true);
                }
                trace!("doc {} holds every phrase term but no match", self.state.arena[self.state.first].doc);
                let last = self.state.last;
                self.more = self.state.arena[last].next_doc()?;
            }
        }
        Ok(false)
    }

    fn settle(&mut self) -> Result<DocId> {
        self.doc = match self.do_next()? {
            true => self.state.arena[self.state.first].doc,
            false => NO_MORE_DOCS,
        };
        Ok(self.doc)
    }

    fn norm(&self) -> f32 {
        match self.norms.and_then(|norms| norms.get(self.doc as usize)) {
            Some(&norm) => self.state.similarity.decode_norm(norm),
            None => 1.0,
        }
    }
}

impl<'a, M: PhraseMatcher> DocIdSetIterator for PhraseScorer<'a, M> {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> Result<DocId> {
        if self.first_time {
            self.init()?;
            self.first_time = false;
        } else if self.more {
            let last = self.state.last;
            self.more = self.state.arena[last].next_doc()?;
        }
        self.settle()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.doc >= target {
            return Ok(self.doc);
        }
        self.first_time = false;
        for handle in 0..self.state.len() {
            if !self.more {
                break;
            }
            self.more = self.state.arena[handle].skip_to(target)?;
        }
        if self.more {
            self.state.sort();
        }
        self.settle()
    }
}

impl<'a, M: PhraseMatcher> Scorer for PhraseScorer<'a, M> {
    fn score(&mut self) -> Result<ScoreType> {
        let raw = self.state.similarity.tf(self.freq) * self.weight_value;
        Ok(raw * self.norm())
    }

    fn explain(&mut self, doc: DocId) -> Result<Explanation> {
        let freq = match self.advance(doc)? == doc {
            true => self.freq,
            false => 0.0,
        };
        Ok(Explanation::new(self.state.similarity.tf(freq), format!("tf(phraseFreq={:?})", freq)))
    }
}
