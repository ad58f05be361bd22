use std::fmt;

use serde::Serialize;

/// How a score was computed, as a tree of factors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    value: f32,
    description: String,
    details: Vec<Explanation>,
    is_match: bool,
}

impl Explanation {
    /// A positive value counts as a match.
    pub fn new(value: f32, description: impl Into<String>) -> Self {
        Self { value, description: description.into(), details: vec![], is_match: value > 0.0 }
    }

    pub fn with_match(is_match: bool, value: f32, description: impl Into<String>) -> Self {
        Self { value, description: description.into(), details: vec![], is_match }
    }

    pub fn no_match(description: impl Into<String>) -> Self {
        Self::with_match(false, 0.0, description)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &[Explanation] {
        &self.details
    }

    pub fn is_match(&self) -> bool {
        self.is_match
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    pub fn set_match(&mut self, is_match: bool) {
        self.is_match = is_match;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn add_detail(&mut self, detail: Explanation) {
        self.details.push(detail);
    }

    pub fn with_detail(mut self, detail: Explanation) -> Self {
        self.details.push(detail);
        self
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{} = {}", "", self.value, self.description, indent = depth * 2)?;
        for detail in &self.details {
            detail.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
