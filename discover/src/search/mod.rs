//! Search query language: free text, `key:value` filters, boolean operators
//! and parenthesized groups.
//!
//! # Syntax Overview
//!
//! - **Filters**: `transaction:/api/users`, `message:"hello world"`
//! - **Free text**: `timeout`, `"connection reset"`
//! - **Boolean operators**: `OR`, `AND` (case-insensitive)
//! - **Grouping**: `(a:1 OR b:2)`
//!
//! [`MutableSearch`] parses a query once into an ordered token list that can
//! be edited and serialized back with [`MutableSearch::format_string`].
//! Nothing here returns an error; malformed input degrades to a best-effort
//! token list.

mod tokenizer;

use std::collections::BTreeMap;
use std::fmt;

use crate::location::{Query, QueryValue};

pub use tokenizer::{
    escape_double_quotes, escape_filter_value, remove_surrounding_quotes, split_search_into_tokens,
};

/// Kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Operator,
    Filter,
    FreeText,
}

impl TokenType {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Operator => "operator",
            TokenType::Filter => "filter",
            TokenType::FreeText => "text",
        }
    }
}

/// A single element of a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `AND`, `OR`, `(` or `)`.
    Operator(String),
    Filter { key: String, value: String },
    FreeText(String),
}

impl Token {
    pub fn token_type(&self) -> TokenType {
        match self {
            Token::Operator(_) => TokenType::Operator,
            Token::Filter { .. } => TokenType::Filter,
            Token::FreeText(_) => TokenType::FreeText,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Token::Operator(value) | Token::FreeText(value) => value,
            Token::Filter { value, .. } => value,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Token::Filter { key, .. } => Some(key),
            _ => None,
        }
    }

    fn is_op(&self) -> bool {
        matches!(self, Token::Operator(_))
    }

    fn is_paren(&self, paren: char) -> bool {
        match self {
            Token::Operator(value) => value.len() == 1 && value.starts_with(paren),
            _ => false,
        }
    }

    fn is_boolean_op(&self) -> bool {
        matches!(self, Token::Operator(value) if is_boolean_op(value))
    }
}

fn is_boolean_op(value: &str) -> bool {
    value.eq_ignore_ascii_case("OR") || value.eq_ignore_ascii_case("AND")
}

/// Classification of a chunk after its leading parens are stripped.
fn classify(chunk: &str) -> TokenType {
    for (i, c) in chunk.char_indices() {
        if i == 0 && (c == '"' || c == ':') {
            break;
        }
        if c == ':' {
            return match chunk[i + 1..].chars().next() {
                Some(':') | Some(' ') => TokenType::FreeText,
                _ => TokenType::Filter,
            };
        }
    }
    TokenType::FreeText
}

/// Split `key:value` at the first colon, removing surrounding quotes.
fn parse_filter(filter: &str) -> (String, String) {
    let (key, value) = filter.split_once(':').unwrap_or(("", filter));
    (remove_surrounding_quotes(key), remove_surrounding_quotes(value))
}

/// An editable, ordered token list for a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutableSearch {
    tokens: Vec<Token>,
}

impl MutableSearch {
    /// Parse a query string.
    pub fn new(query: &str) -> Self {
        Self::from_chunks(split_search_into_tokens(query))
    }

    /// An empty search.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from pre-split chunks, classifying each one.
    pub fn from_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut search = Self::default();

        for chunk in chunks {
            let mut chunk = chunk.as_ref();

            if is_boolean_op(chunk) {
                search.add_op(chunk.to_ascii_uppercase());
                continue;
            }

            let stripped = chunk.trim_start_matches('(');
            for _ in 0..(chunk.len() - stripped.len()) {
                search.add_op("(");
            }
            chunk = stripped;

            let kind = classify(chunk);

            let mut trailing_parens = 0;
            if chunk.ends_with(')') && !chunk.contains('(') {
                let stripped = chunk.trim_end_matches(')');
                trailing_parens = chunk.len() - stripped.len();
                chunk = stripped;
            }

            match kind {
                TokenType::Filter => {
                    search.add_string_filter(chunk, false);
                }
                _ if !chunk.is_empty() => {
                    search.add_free_text(chunk);
                }
                _ => {}
            }

            for _ in 0..trailing_parens {
                search.add_op(")");
            }
        }

        search
    }

    /// Build a search from URL-style parameters.
    ///
    /// The `query` key is added as free text; every other key becomes one
    /// filter per value.
    pub fn from_query_object(params: &Query) -> Self {
        let mut search = Self::default();
        for (key, value) in params {
            match value {
                QueryValue::Scalar(v) if v.is_empty() => {}
                QueryValue::List(values) if values.is_empty() => {}
                QueryValue::Scalar(v) if key == "query" => {
                    search.add_free_text(v);
                }
                QueryValue::Scalar(v) => {
                    search.add_filter_value(key, v, true);
                }
                QueryValue::List(values) if key == "query" => {
                    for v in values {
                        search.add_free_text(v);
                    }
                }
                QueryValue::List(values) => {
                    search.add_filter_values(key, values, true);
                }
            }
        }
        search
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append a `key:value` string as a filter.
    pub fn add_string_filter(&mut self, filter: &str, should_escape: bool) -> &mut Self {
        let (key, value) = parse_filter(filter);
        self.add_filter_value(&key, &value, should_escape)
    }

    pub fn add_filter_value(&mut self, key: &str, value: &str, should_escape: bool) -> &mut Self {
        // Values inserted by the UI are escaped; user typed ones are not.
        let value = if should_escape {
            escape_filter_value(value)
        } else {
            value.to_string()
        };
        self.tokens.push(Token::Filter { key: key.to_string(), value });
        self
    }

    pub fn add_filter_values<S: AsRef<str>>(
        &mut self,
        key: &str,
        values: &[S],
        should_escape: bool,
    ) -> &mut Self {
        for value in values {
            self.add_filter_value(key, value.as_ref(), should_escape);
        }
        self
    }

    /// Replace every filter for `key` with the given values.
    pub fn set_filter_values<S: AsRef<str>>(
        &mut self,
        key: &str,
        values: &[S],
        should_escape: bool,
    ) -> &mut Self {
        self.remove_filter(key);
        self.add_filter_values(key, values, should_escape)
    }

    /// Append `(key:a OR key:b OR ...)`.
    pub fn add_disjunction_filter_values<S: AsRef<str>>(
        &mut self,
        key: &str,
        values: &[S],
        should_escape: bool,
    ) -> &mut Self {
        if values.is_empty() {
            return self;
        }

        self.add_op("(");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.add_op("OR");
            }
            self.add_filter_value(key, value.as_ref(), should_escape);
        }
        self.add_op(")")
    }

    pub fn add_free_text(&mut self, value: &str) -> &mut Self {
        self.tokens
            .push(Token::FreeText(remove_surrounding_quotes(value.trim())));
        self
    }

    pub fn add_op(&mut self, value: impl Into<String>) -> &mut Self {
        self.tokens.push(Token::Operator(value.into()));
        self
    }

    /// Filter values grouped by key.
    pub fn filters(&self) -> BTreeMap<String, Vec<String>> {
        let mut filters: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for token in &self.tokens {
            if let Token::Filter { key, value } = token {
                filters.entry(key.clone()).or_default().push(value.clone());
            }
        }
        filters
    }

    pub fn get_filter_values(&self, key: &str) -> Vec<String> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Filter { key: k, value } if k == key => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Filter keys in order of first appearance.
    pub fn get_filter_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for token in &self.tokens {
            if let Token::Filter { key, .. } = token {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    pub fn has_filter(&self, key: &str) -> bool {
        self.tokens.iter().any(|token| token.key() == Some(key))
    }

    pub fn free_text(&self) -> Vec<String> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::FreeText(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Replace all free text tokens, appending the new ones at the end.
    pub fn set_free_text<S: AsRef<str>>(&mut self, values: &[S]) -> &mut Self {
        self.tokens.retain(|token| !matches!(token, Token::FreeText(_)));
        for value in values {
            self.add_free_text(value.as_ref());
        }
        self
    }

    /// Remove a single value of a filter, keeping the others.
    pub fn remove_filter_value(&mut self, key: &str, value: &str) -> &mut Self {
        let values = self.get_filter_values(key);
        if !values.is_empty() {
            let kept: Vec<String> = values.into_iter().filter(|v| v != value).collect();
            self.set_filter_values(key, &kept, false);
        }
        self
    }

    /// Remove every filter for `key` and repair the operators and groups
    /// around it.
    ///
    /// Cleanup runs to a fixpoint: dangling `AND`/`OR` first, then
    /// parentheses wrapping at most one term, then dangling operators again,
    /// repeating while parentheses are still being removed. Each round that
    /// continues deletes at least one token, so the loop terminates.
    pub fn remove_filter(&mut self, key: &str) -> &mut Self {
        self.tokens.retain(|token| token.key() != Some(key));

        self.remove_dangling_operators();
        loop {
            let redundant = self.redundant_paren_indices();
            if redundant.is_empty() {
                break;
            }
            let mut idx = 0;
            self.tokens.retain(|_| {
                let keep = !redundant.contains(&idx);
                idx += 1;
                keep
            });
            self.remove_dangling_operators();
        }

        self
    }

    /// Delete `AND`/`OR` tokens without a term on both sides.
    ///
    /// `(a) OR (b)` and `a OR (b)` are kept: a closing paren on the left or an
    /// opening paren on the right still counts as a term.
    fn remove_dangling_operators(&mut self) {
        while let Some(idx) = self.find_dangling_operator() {
            self.tokens.remove(idx);
        }
    }

    fn find_dangling_operator(&self) -> Option<usize> {
        (0..self.tokens.len()).find(|&i| {
            if !self.tokens[i].is_boolean_op() {
                return false;
            }
            let prev = i.checked_sub(1).and_then(|p| self.tokens.get(p));
            let next = self.tokens.get(i + 1);

            let (Some(prev), Some(next)) = (prev, next) else {
                return true;
            };
            if !prev.is_op() && !next.is_op() {
                return false;
            }
            let prev_ok = prev.is_paren(')') || !prev.is_op();
            let next_ok = next.is_paren('(') || !next.is_op();
            !(prev_ok && next_ok)
        })
    }

    /// Indices of innermost paren pairs that wrap at most one term.
    fn redundant_paren_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();

        for (i, token) in self.tokens.iter().enumerate() {
            if !token.is_paren('(') {
                continue;
            }

            let mut terms = 0;
            for (j, inner) in self.tokens.iter().enumerate().skip(i + 1) {
                if inner.is_paren('(') {
                    break;
                }
                if inner.is_paren(')') {
                    if terms <= 1 {
                        indices.push(i);
                        indices.push(j);
                    }
                    break;
                }
                if !inner.is_op() {
                    terms += 1;
                }
            }
        }

        indices
    }

    /// Serialize back into a query string.
    pub fn format_string(&self) -> String {
        let formatted: Vec<String> = self
            .tokens
            .iter()
            .map(|token| match token {
                Token::Filter { key, value } if value.is_empty() => format!("{}:\"\"", key),
                Token::Filter { key, value } if tokenizer::needs_quoting(value) => {
                    format!("{}:\"{}\"", key, escape_double_quotes(value))
                }
                Token::Filter { key, value } => format!("{}:{}", key, value),
                Token::FreeText(value) if tokenizer::needs_quoting(value) => {
                    format!("\"{}\"", escape_double_quotes(value))
                }
                Token::FreeText(value) | Token::Operator(value) => value.clone(),
            })
            .collect();

        formatted.join(" ").trim().to_string()
    }
}

impl fmt::Display for MutableSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_string())
    }
}
