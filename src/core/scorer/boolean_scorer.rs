use std::cell::Cell;
use std::rc::Rc;

use crate::common::constants::UNPOSITIONED_DOC;
use crate::common::{DocId, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::scorer::{ConjunctionScorer, DisjunctionSumScorer, ReqExclScorer, ReqOptSumScorer, Scorer, ScorerEnum};
use crate::{Result, SearchError};

/// How many clauses a counting scorer matched on its current doc.
#[derive(Debug, Clone, Copy)]
enum MatchCount {
    Fixed(usize),
    /// Read from the wrapped disjunction.
    Disjunction,
}

/// Adds the number of clauses it matched to the shared coordinator counter,
/// once per doc, whenever it is scored.
pub struct CountingScorer<'a> {
    inner: Box<ScorerEnum<'a>>,
    count: MatchCount,
    nr_matchers: Rc<Cell<usize>>,
    last_scored_doc: DocId,
    last_doc_score: ScoreType,
}

impl<'a> CountingScorer<'a> {
    fn new(inner: ScorerEnum<'a>, count: MatchCount, nr_matchers: Rc<Cell<usize>>) -> Self {
        Self { inner: Box::new(inner), count, nr_matchers, last_scored_doc: UNPOSITIONED_DOC, last_doc_score: f32::NAN }
    }

    fn single(scorer: ScorerEnum<'a>, nr_matchers: Rc<Cell<usize>>) -> Self {
        Self::new(scorer, MatchCount::Fixed(1), nr_matchers)
    }

    fn conjunction(scorers: Vec<ScorerEnum<'a>>, nr_matchers: Rc<Cell<usize>>) -> Result<Self> {
        let required = scorers.len();
        let conjunction = ConjunctionScorer::new(scorers, 1.0)?;
        Ok(Self::new(conjunction.into(), MatchCount::Fixed(required), nr_matchers))
    }

    fn disjunction(scorers: Vec<ScorerEnum<'a>>, minimum: usize, nr_matchers: Rc<Cell<usize>>) -> Result<Self> {
        let disjunction = DisjunctionSumScorer::new(scorers, minimum)?;
        Ok(Self::new(disjunction.into(), MatchCount::Disjunction, nr_matchers))
    }

    fn matched(&self) -> usize {
        match (self.count, self.inner.as_ref()) {
            (MatchCount::Fixed(n), _) => n,
            (MatchCount::Disjunction, ScorerEnum::DisjunctionSum(disjunction)) => disjunction.nr_matchers(),
            (MatchCount::Disjunction, _) => 1,
        }
    }
}

impl<'a> DocIdSetIterator for CountingScorer<'a> {
    fn doc_id(&self) -> DocId {
        self.inner.doc_id()
    }

    fn next_doc(&mut self) -> Result<DocId> {
        self.inner.next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        self.inner.advance(target)
    }
}

impl<'a> Scorer for CountingScorer<'a> {
    fn score(&mut self) -> Result<ScoreType> {
        let doc = self.inner.doc_id();
        if doc >= self.last_scored_doc {
            if doc > self.last_scored_doc {
                self.last_doc_score = self.inner.score()?;
                self.last_scored_doc = doc;
            }
            self.nr_matchers.set(self.nr_matchers.get() + self.matched());
        }
        Ok(self.last_doc_score)
    }
}

/// Combines required, optional and prohibited sub-scorers and applies the
/// coordination factor `coord(nr_matchers, max_coord)` to the summed score.
pub struct BooleanScorer<'a> {
    counting_sum: Box<ScorerEnum<'a>>,
    nr_matchers: Rc<Cell<usize>>,
    /// Indexed by number of matching clauses.
    coord_factors: Vec<f32>,
}

impl<'a> BooleanScorer<'a> {
    pub fn new(
        required: Vec<ScorerEnum<'a>>,
        prohibited: Vec<ScorerEnum<'a>>,
        optional: Vec<ScorerEnum<'a>>,
        minimum_should_match: usize,
        coord_factors: Vec<f32>,
    ) -> Result<Self> {
        if required.is_empty() && optional.is_empty() {
            return Err(SearchError::InvalidArgument("a boolean scorer needs a required or optional sub-scorer".to_string()));
        }
        if optional.len() < minimum_should_match {
            return Err(SearchError::InvalidArgument(format!(
                "{} optional sub-scorers can't satisfy minimum_should_match={}",
                optional.len(),
                minimum_should_match
            )));
        }
        if coord_factors.len() <= required.len() + optional.len() {
            return Err(SearchError::InvalidArgument("missing coord factors".to_string()));
        }

        let nr_matchers = Rc::new(Cell::new(0));
        let counting_sum = match required.is_empty() {
            true => Self::counting_sum_no_required(optional, prohibited, minimum_should_match, &nr_matchers)?,
            false => Self::counting_sum_some_required(required, optional, prohibited, minimum_should_match, &nr_matchers)?,
        };
        Ok(Self { counting_sum: Box::new(counting_sum), nr_matchers, coord_factors })
    }

    fn counting_sum_no_required(
        mut optional: Vec<ScorerEnum<'a>>,
        prohibited: Vec<ScorerEnum<'a>>,
        minimum_should_match: usize,
        nr_matchers: &Rc<Cell<usize>>,
    ) -> Result<ScorerEnum<'a>> {
        let nr_opt_required = minimum_should_match.max(1);
        let counting: ScorerEnum<'a> = if optional.len() > nr_opt_required {
            CountingScorer::disjunction(optional, nr_opt_required, nr_matchers.clone())?.into()
        } else if optional.len() == 1 {
            CountingScorer::single(optional.remove(0), nr_matchers.clone()).into()
        } else {
            // every optional scorer is needed
            CountingScorer::conjunction(optional, nr_matchers.clone())?.into()
        };
        Self::add_prohibited(counting, prohibited)
    }

    fn counting_sum_some_required(
        mut required: Vec<ScorerEnum<'a>>,
        mut optional: Vec<ScorerEnum<'a>>,
        prohibited: Vec<ScorerEnum<'a>>,
        minimum_should_match: usize,
        nr_matchers: &Rc<Cell<usize>>,
    ) -> Result<ScorerEnum<'a>> {
        if optional.len() == minimum_should_match {
            // all optional scorers are required as well
            required.append(&mut optional);
            let counting = CountingScorer::conjunction(required, nr_matchers.clone())?;
            return Self::add_prohibited(counting.into(), prohibited);
        }

        let required_counting: ScorerEnum<'a> = match required.len() {
            1 => CountingScorer::single(required.remove(0), nr_matchers.clone()).into(),
            _ => CountingScorer::conjunction(required, nr_matchers.clone())?.into(),
        };
        if minimum_should_match > 0 {
            let optional_counting = CountingScorer::disjunction(optional, minimum_should_match, nr_matchers.clone())?;
            let dual = ConjunctionScorer::new(vec![required_counting, optional_counting.into()], 1.0)?;
            return Self::add_prohibited(dual.into(), prohibited);
        }

        let optional_counting: ScorerEnum<'a> = match optional.len() {
            1 => CountingScorer::single(optional.remove(0), nr_matchers.clone()).into(),
            _ => CountingScorer::disjunction(optional, 1, nr_matchers.clone())?.into(),
        };
        let required_scorer = Self::add_prohibited(required_counting, prohibited)?;
        Ok(ReqOptSumScorer::new(required_scorer, optional_counting).into())
    }

    fn add_prohibited(required: ScorerEnum<'a>, mut prohibited: Vec<ScorerEnum<'a>>) -> Result<ScorerEnum<'a>> {
        let excluded: ScorerEnum<'a> = match prohibited.len() {
            0 => return Ok(required),
            1 => prohibited.remove(0),
            _ => DisjunctionSumScorer::new(prohibited, 1)?.into(),
        };
        Ok(ReqExclScorer::new(required, excluded).into())
    }
}

impl<'a> DocIdSetIterator for BooleanScorer<'a> {
    fn doc_id(&self) -> DocId {
        self.counting_sum.doc_id()
    }

    fn next_doc(&mut self) -> Result<DocId> {
        self.counting_sum.next_doc()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        self.counting_sum.advance(target)
    }
}

impl<'a> Scorer for BooleanScorer<'a> {
    fn score(&mut self) -> Result<ScoreType> {
        self.nr_matchers.set(0);
        let sum = self.counting_sum.score()?;
        let matched = self.nr_matchers.get().min(self.coord_factors.len() - 1);
        Ok(sum * self.coord_factors[matched])
    }
}
