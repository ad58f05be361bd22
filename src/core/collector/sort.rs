use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::common::{DocId, ScoreType};
use crate::{Result, SearchError};

/// A per document sort key, as stored by the index or computed while collecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SortValue {
    /// Document has no value for the field, sorts before everything else.
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Score(ScoreType),
    Doc(DocId),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Null => 0,
            SortValue::Int(_) => 1,
            SortValue::Float(_) => 2,
            SortValue::Str(_) => 3,
            SortValue::Score(_) => 4,
            SortValue::Doc(_) => 5,
        }
    }

    /// Natural ascending order; values of different kinds order by kind.
    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Float(a), SortValue::Float(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (SortValue::Str(a), SortValue::Str(b)) => a.cmp(b),
            (SortValue::Score(a), SortValue::Score(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (SortValue::Doc(a), SortValue::Doc(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortFieldType {
    /// Relevance, highest score first.
    Score,
    /// Index order.
    Doc,
    Int,
    Float,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    field: Option<String>,
    field_type: SortFieldType,
    reverse: bool,
}

impl SortField {
    pub fn score() -> Self {
        Self { field: None, field_type: SortFieldType::Score, reverse: false }
    }

    pub fn doc() -> Self {
        Self { field: None, field_type: SortFieldType::Doc, reverse: false }
    }

    /// Sorts on the values the index stores for `field`.
    pub fn new(field: impl Into<String>, field_type: SortFieldType) -> Self {
        match field_type {
            SortFieldType::Score => Self::score(),
            SortFieldType::Doc => Self::doc(),
            _ => Self { field: Some(field.into()), field_type, reverse: false },
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = !self.reverse;
        self
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn field_type(&self) -> SortFieldType {
        self.field_type
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// `Less` means `a` ranks before `b`.
    pub fn compare(&self, a: &SortValue, b: &SortValue) -> Ordering {
        let ordering = match self.field_type {
            SortFieldType::Score => b.compare(a),
            _ => a.compare(b),
        };
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.field, self.field_type) {
            (_, SortFieldType::Score) => write!(f, "<score>")?,
            (_, SortFieldType::Doc) => write!(f, "<doc>")?,
            (Some(field), SortFieldType::Int) => write!(f, "\"{}\"<int>", field)?,
            (Some(field), SortFieldType::Float) => write!(f, "\"{}\"<float>", field)?,
            (Some(field), SortFieldType::String) => write!(f, "\"{}\"<string>", field)?,
            (None, field_type) => write!(f, "<{:?}>", field_type)?,
        }
        if self.reverse {
            write!(f, "!")?;
        }
        Ok(())
    }
}

/// Ordered list of sort criteria, doc id ascending breaks remaining ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    fields: Vec<SortField>,
}

impl Sort {
    pub fn new(fields: Vec<SortField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(SearchError::InvalidArgument("a sort needs at least one sort field".to_string()));
        }
        Ok(Self { fields })
    }

    pub fn relevance() -> Self {
        Self { fields: vec![SortField::score()] }
    }

    pub fn index_order() -> Self {
        Self { fields: vec![SortField::doc()] }
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn needs_scores(&self) -> bool {
        self.fields.iter().any(|f| f.field_type == SortFieldType::Score)
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.iter().join(","))
    }
}
