use enum_dispatch::enum_dispatch;

use crate::common::DocId;
use crate::core::index::IndexReader;
use crate::core::query::{BooleanWeight, ConstantWeight, MatchAllWeight, PhraseWeight, TermWeight};
use crate::core::scorer::ScorerEnum;
use crate::core::similarity::Similarity;
use crate::core::Explanation;
use crate::{Result, SearchError};

/// Per search state of a query.
///
/// Normalization runs in two phases: the searcher collects
/// `sum_of_squared_weights` bottom-up, turns it into a query norm and pushes
/// that back down with `normalize`. Scorers are only handed out afterwards.
#[enum_dispatch]
pub trait Weight {
    /// Factor applied to every score of the query.
    fn value(&self) -> f32;

    fn sum_of_squared_weights(&mut self) -> Result<f32>;

    fn normalize(&mut self, norm: f32);

    fn is_normalized(&self) -> bool;

    /// `None` when no doc can match.
    fn scorer<'r>(&self, reader: &'r dyn IndexReader) -> Result<Option<ScorerEnum<'r>>>;

    fn explain(&self, reader: &dyn IndexReader, doc: DocId) -> Result<Explanation>;
}

#[enum_dispatch(Weight)]
pub enum WeightEnum {
    Term(TermWeight),
    Phrase(PhraseWeight),
    Boolean(BooleanWeight),
    ConstantScore(ConstantWeight),
    MatchAll(MatchAllWeight),
}

pub(crate) fn ensure_normalized(normalized: bool, query: &dyn std::fmt::Display) -> Result<()> {
    match normalized {
        true => Ok(()),
        false => Err(SearchError::UnnormalizedWeight(query.to_string())),
    }
}

/// Decoded norm of `doc`, 1.0 when the field keeps none.
pub(crate) fn field_norm(reader: &dyn IndexReader, similarity: &dyn Similarity, field: &str, doc: DocId) -> Result<f32> {
    let norms = reader.norms(field)?;
    Ok(match norms.and_then(|norms| norms.get(doc as usize)) {
        Some(&norm) => similarity.decode_norm(norm),
        None => 1.0,
    })
}

/// Factors of a `queryWeight * fieldWeight` breakdown.
pub(crate) struct WeightFactors {
    pub(crate) boost: f32,
    pub(crate) idf: Explanation,
    pub(crate) query_norm: f32,
    pub(crate) tf: Explanation,
    pub(crate) field_norm: f32,
}

/// Explains `boost * idf * queryNorm` times `tf * idf * fieldNorm`.
/// `field_query` names what was counted, like `body:a` or `body:"a b"`.
pub(crate) fn explain_weighted(query: &str, field_query: &str, field: &str, doc: DocId, factors: WeightFactors) -> Explanation {
    let query_value = factors.boost * factors.idf.value() * factors.query_norm;
    let mut query_expl = Explanation::new(query_value, format!("queryWeight({}), product of:", query));
    if factors.boost != 1.0 {
        query_expl.add_detail(Explanation::new(factors.boost, "boost"));
    }
    query_expl.add_detail(factors.idf.clone());
    query_expl.add_detail(Explanation::new(factors.query_norm, "queryNorm"));

    let is_match = factors.tf.is_match();
    let field_value = factors.tf.value() * factors.idf.value() * factors.field_norm;
    let field_expl =
        Explanation::with_match(is_match, field_value, format!("fieldWeight({} in {}), product of:", field_query, doc))
            .with_detail(factors.tf)
            .with_detail(factors.idf)
            .with_detail(Explanation::new(factors.field_norm, format!("fieldNorm(field={}, doc={})", field, doc)));

    if query_value == 1.0 {
        return field_expl;
    }
    Explanation::with_match(is_match, query_value * field_value, format!("weight({} in {}), product of:", query, doc))
        .with_detail(query_expl)
        .with_detail(field_expl)
}
