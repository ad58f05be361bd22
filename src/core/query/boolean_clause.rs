use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::query::Query;

/// How a clause takes part in a boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occur {
    /// Docs must match the clause.
    Must,
    /// Docs should match the clause; matching ones score higher.
    Should,
    /// Docs matching the clause are excluded.
    MustNot,
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occur::Must => write!(f, "+"),
            Occur::Should => Ok(()),
            Occur::MustNot => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BooleanClause {
    query: Query,
    occur: Occur,
}

impl BooleanClause {
    pub fn new(query: Query, occur: Occur) -> Self {
        Self { query, occur }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub(crate) fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    pub fn occur(&self) -> Occur {
        self.occur
    }

    pub fn is_required(&self) -> bool {
        self.occur == Occur::Must
    }

    pub fn is_prohibited(&self) -> bool {
        self.occur == Occur::MustNot
    }
}

impl fmt::Display for BooleanClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.occur, self.query)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;
    use crate::core::index::Term;
    use crate::core::query::TermQuery;

    fn hash_of(clause: &BooleanClause) -> u64 {
        let mut hasher = DefaultHasher::new();
        clause.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality_and_hash() {
        let term = || Query::from(TermQuery::new(Term::new("body", "a")));
        let a = BooleanClause::new(term(), Occur::Must);
        let b = BooleanClause::new(term(), Occur::Must);
        assert_eq!(a.occur(), Occur::Must);
        assert_eq!(a.query(), &term());
        assert!(a.is_required());
        assert!(!a.is_prohibited());
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        assert_ne!(a, BooleanClause::new(term(), Occur::Should));
        assert_ne!(a, BooleanClause::new(term().with_boost(2.0), Occur::Must));
        assert_ne!(a, BooleanClause::new(TermQuery::new(Term::new("body", "b")).into(), Occur::Must));

        assert_eq!(a.to_string(), "+body:a");
        assert_eq!(BooleanClause::new(term(), Occur::MustNot).to_string(), "-body:a");
        assert_eq!(BooleanClause::new(term(), Occur::Should).to_string(), "body:a");
    }
}
