// file: src/service.rs
// description: network seam to the question-and-answer service
// reference: https://docs.rs/async-trait

use crate::error::Result;
use crate::models::{Answer, QuestionPage, SearchHit};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Filters for the tag-scoped question listing.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionListing {
    pub tag: String,
    pub in_title: String,
    pub from_date: DateTime<Utc>,
    pub page_size: u32,
    /// Stack Exchange field filter; must include `total`.
    pub filter: String,
}

#[async_trait]
pub trait QaBackend: Send + Sync {
    /// One search request; no retries, no validation.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;

    async fn answers(&self, hit: &SearchHit) -> Result<Vec<Answer>>;

    async fn question_page(&self, listing: &QuestionListing, page: u32) -> Result<QuestionPage>;
}
