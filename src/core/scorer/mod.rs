mod boolean_scorer;
mod conjunction_scorer;
mod constant_scorer;
mod disjunction_sum_scorer;
mod phrase;
mod req_excl_scorer;
mod req_opt_sum_scorer;
mod score_caching_scorer;
mod term_scorer;

use enum_dispatch::enum_dispatch;

pub use boolean_scorer::{BooleanScorer, CountingScorer};
pub use conjunction_scorer::ConjunctionScorer;
pub use constant_scorer::{ConstantScorer, MatchAllDocsIterator};
pub use disjunction_sum_scorer::DisjunctionSumScorer;
pub use phrase::{ExactMatcher, ExactPhraseScorer, PhraseMatcher, PhraseScorer, PhraseState, SloppyMatcher, SloppyPhraseScorer};
pub use req_excl_scorer::ReqExclScorer;
pub use req_opt_sum_scorer::ReqOptSumScorer;
pub use score_caching_scorer::ScoreCachingWrappingScorer;
pub use term_scorer::TermScorer;

use crate::common::{DocId, ScoreType};
use crate::core::docset::DocIdSetIterator;
use crate::core::Explanation;
use crate::Result;

/// Iterates matching docs in increasing order and scores the current one.
#[enum_dispatch]
pub trait Scorer: DocIdSetIterator {
    /// Score of the current doc. Only valid while positioned on a doc.
    fn score(&mut self) -> Result<ScoreType>;

    /// Moves to `doc` and explains its score. The scorer is left positioned
    /// at or after `doc`.
    fn explain(&mut self, doc: DocId) -> Result<Explanation> {
        if self.advance(doc)? == doc {
            Ok(Explanation::new(self.score()?, "score"))
        } else {
            Ok(Explanation::no_match(format!("no match on doc {}", doc)))
        }
    }
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn score(&mut self) -> Result<ScoreType> {
        (**self).score()
    }

    fn explain(&mut self, doc: DocId) -> Result<Explanation> {
        (**self).explain(doc)
    }
}

impl<S: Scorer + ?Sized> Scorer for &mut S {
    fn score(&mut self) -> Result<ScoreType> {
        (**self).score()
    }

    fn explain(&mut self, doc: DocId) -> Result<Explanation> {
        (**self).explain(doc)
    }
}

/// The closed set of scorers a weight can produce.
#[enum_dispatch(DocIdSetIterator, Scorer)]
pub enum ScorerEnum<'a> {
    Term(TermScorer<'a>),
    ExactPhrase(ExactPhraseScorer<'a>),
    SloppyPhrase(SloppyPhraseScorer<'a>),
    Conjunction(ConjunctionScorer<'a>),
    DisjunctionSum(DisjunctionSumScorer<'a>),
    ReqOptSum(ReqOptSumScorer<'a>),
    ReqExcl(ReqExclScorer<'a>),
    Boolean(BooleanScorer<'a>),
    Counting(CountingScorer<'a>),
    Constant(ConstantScorer<'a>),
}
