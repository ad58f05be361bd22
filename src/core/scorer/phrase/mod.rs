mod exact_phrase;
mod phrase_positions;
mod phrase_queue;
mod phrase_scorer;
mod sloppy_phrase;

pub use exact_phrase::ExactMatcher;
pub use phrase_scorer::{PhraseMatcher, PhraseScorer, PhraseState};
pub use sloppy_phrase::SloppyMatcher;

pub type ExactPhraseScorer<'a> = PhraseScorer<'a, ExactMatcher>;
pub type SloppyPhraseScorer<'a> = PhraseScorer<'a, SloppyMatcher>;
