use std::fmt;

use crate::core::similarity::norm;

/// Per field statistics gathered while a document is indexed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldInvertState {
    /// Number of tokens.
    pub length: u32,
    /// Tokens with a zero position increment.
    pub num_overlap: u32,
    /// Last position written.
    pub position: i32,
    pub boost: f32,
}

impl Default for FieldInvertState {
    fn default() -> Self {
        Self { length: 0, num_overlap: 0, position: -1, boost: 1.0 }
    }
}

/// Scoring formula family, shared by every weight and scorer of a search.
pub trait Similarity: Send + Sync + fmt::Debug {
    /// Normalization factor for a field with `num_terms` tokens.
    fn length_norm(&self, field: &str, num_terms: u32) -> f32;

    /// Norm stored for a field once it is indexed.
    fn compute_norm(&self, field: &str, state: &FieldInvertState) -> f32 {
        state.boost * self.length_norm(field, state.length)
    }

    fn query_norm(&self, sum_of_squared_weights: f32) -> f32;

    fn tf(&self, freq: f32) -> f32;

    /// Contribution of a sloppy phrase match spanning `distance` extra positions.
    fn sloppy_freq(&self, distance: u32) -> f32;

    fn idf(&self, doc_freq: u32, num_docs: u32) -> f32;

    /// Score factor based on how many of the query clauses a doc matches.
    fn coord(&self, overlap: usize, max_overlap: usize) -> f32;

    fn encode_norm(&self, f: f32) -> u8 {
        norm::encode_norm(f)
    }

    fn decode_norm(&self, b: u8) -> f32 {
        norm::decode_norm(b)
    }
}
