use crate::core::collector::SortValue;

/// An analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// 0 stacks the token on the previous position (synonyms).
    pub position_increment: u32,
}

impl Token {
    pub fn new(text: impl Into<String>, position_increment: u32) -> Self {
        Self { text: text.into(), position_increment }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FieldTokens {
    pub(crate) name: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) boost: f32,
}

/// Pre-analyzed document handed to the [`MemoryIndexBuilder`](crate::core::MemoryIndexBuilder).
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub(crate) fields: Vec<FieldTokens>,
    pub(crate) sort_values: Vec<(String, SortValue)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_mut(&mut self, field: &str) -> &mut FieldTokens {
        let idx = match self.fields.iter().position(|f| f.name == field) {
            Some(idx) => idx,
            None => {
                self.fields.push(FieldTokens { name: field.to_string(), tokens: vec![], boost: 1.0 });
                self.fields.len() - 1
            }
        };
        &mut self.fields[idx]
    }

    /// Appends tokens at consecutive positions.
    pub fn with_tokens<I, S>(mut self, field: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = self.field_mut(field);
        target.tokens.extend(tokens.into_iter().map(|t| Token::new(t, 1)));
        self
    }

    /// Shorthand for whitespace separated tokens.
    pub fn with_text(self, field: &str, text: &str) -> Self {
        self.with_tokens(field, text.split_whitespace())
    }

    pub fn with_token_stream(mut self, field: &str, tokens: Vec<Token>) -> Self {
        self.field_mut(field).tokens.extend(tokens);
        self
    }

    pub fn with_field_boost(mut self, field: &str, boost: f32) -> Self {
        self.field_mut(field).boost = boost;
        self
    }

    pub fn with_sort_value(mut self, field: &str, value: SortValue) -> Self {
        self.sort_values.push((field.to_string(), value));
        self
    }
}
