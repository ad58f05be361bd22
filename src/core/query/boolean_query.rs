use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::common::constants::DEFAULT_MAX_CLAUSE_COUNT;
use crate::common::DocId;
use crate::core::index::{IndexReader, Term};
use crate::core::query::weight::ensure_normalized;
use crate::core::query::{boost_suffix, BooleanClause, Occur, Query, QueryNode, Weight, WeightEnum};
use crate::core::scorer::{BooleanScorer, ScorerEnum};
use crate::core::searcher::IndexSearcher;
use crate::core::similarity::Similarity;
use crate::core::Explanation;
use crate::{Result, SearchError};

/// Combines clauses with [`Occur`] rules.
#[derive(Debug, Clone)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
    minimum_should_match: usize,
    disable_coord: bool,
    boost: OrderedFloat<f32>,
    max_clause_count: usize,
}

impl BooleanQuery {
    pub fn new() -> Self {
        Self {
            clauses: vec![],
            minimum_should_match: 0,
            disable_coord: false,
            boost: OrderedFloat(1.0),
            max_clause_count: DEFAULT_MAX_CLAUSE_COUNT,
        }
    }

    /// Without coord, matching more clauses doesn't raise the score beyond the sum.
    pub fn with_disable_coord(mut self, disable_coord: bool) -> Self {
        self.disable_coord = disable_coord;
        self
    }

    pub fn is_coord_disabled(&self) -> bool {
        self.disable_coord
    }

    /// At least this many `Should` clauses must match.
    pub fn set_minimum_should_match(&mut self, minimum: usize) {
        self.minimum_should_match = minimum;
    }

    pub fn minimum_should_match(&self) -> usize {
        self.minimum_should_match
    }

    pub fn set_max_clause_count(&mut self, max_clause_count: usize) {
        self.max_clause_count = max_clause_count;
    }

    pub fn add(&mut self, query: Query, occur: Occur) -> Result<()> {
        self.add_clause(BooleanClause::new(query, occur))
    }

    pub fn add_clause(&mut self, clause: BooleanClause) -> Result<()> {
        if self.clauses.len() >= self.max_clause_count {
            return Err(SearchError::TooManyClauses(self.max_clause_count));
        }
        self.clauses.push(clause);
        Ok(())
    }

    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }
}

impl Default for BooleanQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BooleanQuery {
    fn eq(&self, other: &Self) -> bool {
        self.clauses == other.clauses
            && self.minimum_should_match == other.minimum_should_match
            && self.disable_coord == other.disable_coord
            && self.boost == other.boost
    }
}

impl Eq for BooleanQuery {}

impl Hash for BooleanQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.clauses.hash(state);
        self.minimum_should_match.hash(state);
        self.disable_coord.hash(state);
        self.boost.hash(state);
    }
}

impl QueryNode for BooleanQuery {
    fn boost(&self) -> f32 {
        self.boost.0
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = OrderedFloat(boost);
    }

    fn rewrite(&self, searcher: &IndexSearcher<'_>) -> Result<Query> {
        if let [clause] = self.clauses.as_slice() {
            if self.minimum_should_match == 0 && !clause.is_prohibited() {
                let mut query = clause.query().rewrite(searcher)?;
                if self.boost() != 1.0 {
                    query.set_boost(query.boost() * self.boost());
                }
                return Ok(query);
            }
        }
        let mut rewritten = self.clone();
        for clause in rewritten.clauses.iter_mut() {
            let query = clause.query().rewrite(searcher)?;
            *clause.query_mut() = query;
        }
        Ok(rewritten.into())
    }

    fn create_weight(&self, searcher: &IndexSearcher<'_>) -> Result<WeightEnum> {
        Ok(BooleanWeight::new(self.clone(), searcher)?.into())
    }

    fn extract_terms(&self, terms: &mut BTreeSet<Term>) -> Result<()> {
        for clause in &self.clauses {
            clause.query().extract_terms(terms)?;
        }
        Ok(())
    }

    fn to_query_string(&self, default_field: &str) -> String {
        let clauses: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| match clause.query() {
                Query::Boolean(nested) => format!("{}({})", clause.occur(), nested.to_query_string(default_field)),
                query => format!("{}{}", clause.occur(), query.to_query_string(default_field)),
            })
            .collect();
        let mut out = clauses.join(" ");
        if self.boost() != 1.0 || self.minimum_should_match > 0 {
            out = format!("({})", out);
        }
        if self.minimum_should_match > 0 {
            out.push_str(&format!("~{}", self.minimum_should_match));
        }
        out.push_str(&boost_suffix(self.boost()));
        out
    }
}

pub struct BooleanWeight {
    query: BooleanQuery,
    similarity: Arc<dyn Similarity>,
    weights: Vec<WeightEnum>,
    normalized: bool,
}

impl BooleanWeight {
    pub fn new(query: BooleanQuery, searcher: &IndexSearcher<'_>) -> Result<Self> {
        let max_clause_count = searcher.config().max_clause_count;
        if query.clauses.len() > max_clause_count {
            return Err(SearchError::TooManyClauses(max_clause_count));
        }
        let weights = query.clauses.iter().map(|clause| clause.query().create_weight(searcher)).collect::<Result<_>>()?;
        Ok(Self { similarity: searcher.similarity().clone(), query, weights, normalized: false })
    }

    fn coord(&self, overlap: usize, max_overlap: usize) -> f32 {
        match self.query.disable_coord || max_overlap == 0 {
            true => 1.0,
            false => self.similarity.coord(overlap, max_overlap),
        }
    }

    /// Non-prohibited clauses, matched or not.
    fn max_coord(&self) -> usize {
        self.query.clauses.iter().filter(|clause| !clause.is_prohibited()).count()
    }

    fn clauses(&self) -> impl Iterator<Item = (&BooleanClause, &WeightEnum)> {
        self.query.clauses.iter().zip(self.weights.iter())
    }
}

impl Weight for BooleanWeight {
    fn value(&self) -> f32 {
        self.query.boost()
    }

    fn sum_of_squared_weights(&mut self) -> Result<f32> {
        let mut sum = 0.0;
        for (clause, weight) in self.query.clauses.iter().zip(self.weights.iter_mut()) {
            let squared = weight.sum_of_squared_weights()?;
            if !clause.is_prohibited() {
                sum += squared;
            }
        }
        let boost = self.query.boost();
        Ok(sum * boost * boost)
    }

    fn normalize(&mut self, norm: f32) {
        let norm = norm * self.query.boost();
        for weight in self.weights.iter_mut() {
            weight.normalize(norm);
        }
        self.normalized = true;
    }

    fn is_normalized(&self) -> bool {
        self.normalized
    }

    fn scorer<'r>(&self, reader: &'r dyn IndexReader) -> Result<Option<ScorerEnum<'r>>> {
        ensure_normalized(self.normalized, &self.query.to_query_string(""))?;
        let mut required = vec![];
        let mut prohibited = vec![];
        let mut optional = vec![];
        for (clause, weight) in self.clauses() {
            match (weight.scorer(reader)?, clause.occur()) {
                (None, Occur::Must) => return Ok(None),
                (None, _) => {}
                (Some(scorer), Occur::Must) => required.push(scorer),
                (Some(scorer), Occur::MustNot) => prohibited.push(scorer),
                (Some(scorer), Occur::Should) => optional.push(scorer),
            }
        }
        let minimum_should_match = self.query.minimum_should_match;
        if (required.is_empty() && optional.is_empty()) || optional.len() < minimum_should_match {
            return Ok(None);
        }

        let max_coord = self.max_coord();
        let coord_factors = (0..=max_coord).map(|overlap| self.coord(overlap, max_coord)).collect();
        let scorer = BooleanScorer::new(required, prohibited, optional, minimum_should_match, coord_factors)?;
        Ok(Some(scorer.into()))
    }

    fn explain(&self, reader: &dyn IndexReader, doc: DocId) -> Result<Explanation> {
        let mut sum_expl = Explanation::new(0.0, "sum of:");
        let mut coord = 0;
        let mut sum = 0.0;
        let mut fail = false;
        let mut should_match_count = 0;
        for (clause, weight) in self.clauses() {
            let expl = weight.explain(reader, doc)?;
            if expl.is_match() {
                if clause.is_prohibited() {
                    let detail = Explanation::new(0.0, format!("match on prohibited clause ({})", clause.query()));
                    sum_expl.add_detail(detail.with_detail(expl));
                    fail = true;
                } else {
                    sum += expl.value();
                    coord += 1;
                    sum_expl.add_detail(expl);
                }
                if clause.occur() == Occur::Should {
                    should_match_count += 1;
                }
            } else if clause.is_required() {
                let detail = Explanation::new(0.0, format!("no match on required clause ({})", clause.query()));
                sum_expl.add_detail(detail.with_detail(expl));
                fail = true;
            }
        }

        if fail {
            sum_expl.set_match(false);
            sum_expl.set_value(0.0);
            sum_expl.set_description("Failure to meet condition(s) of required/prohibited clause(s)");
            return Ok(sum_expl);
        }
        if should_match_count < self.query.minimum_should_match {
            sum_expl.set_match(false);
            sum_expl.set_value(0.0);
            sum_expl.set_description(format!(
                "Failure to match minimum number of optional clauses: {}",
                self.query.minimum_should_match
            ));
            return Ok(sum_expl);
        }

        sum_expl.set_match(coord > 0);
        sum_expl.set_value(sum);
        let max_coord = self.max_coord();
        let coord_factor = self.coord(coord, max_coord);
        if coord_factor == 1.0 {
            return Ok(sum_expl);
        }
        let is_match = sum_expl.is_match();
        Ok(Explanation::with_match(is_match, sum * coord_factor, "product of:")
            .with_detail(sum_expl)
            .with_detail(Explanation::new(coord_factor, format!("coord({}/{})", coord, max_coord))))
    }
}
