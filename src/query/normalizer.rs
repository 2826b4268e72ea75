// file: src/query/normalizer.rs
// description: turns pasted error text or questions into a search-ready cache key
// reference: stack trace formats of common runtimes

use super::patterns::noise_patterns;
use crate::error::{LookupError, Result};
use serde::Serialize;
use std::fmt;

/// A raw input paired with its normalized form. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    raw: String,
    normalized: String,
}

impl Query {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryNormalizer;

impl QueryNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: &str) -> Result<String> {
        let stripped = self.strip_trace_noise(raw);
        let lowered = stripped.to_lowercase();
        let collapsed = self.collapse_whitespace(&lowered);

        if collapsed.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        Ok(collapsed)
    }

    pub fn normalize_query(&self, raw: &str) -> Result<Query> {
        let normalized = self.normalize(raw)?;
        Ok(Query {
            raw: raw.to_string(),
            normalized,
        })
    }

    fn strip_trace_noise(&self, content: &str) -> String {
        noise_patterns()
            .iter()
            .fold(content.to_string(), |text, pattern| {
                pattern.replace_all(&text, " ").into_owned()
            })
    }

    fn collapse_whitespace(&self, content: &str) -> String {
        content.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
