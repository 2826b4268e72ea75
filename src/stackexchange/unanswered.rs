// file: src/stackexchange/unanswered.rs
// description: top-N unanswered questions for a tag, scanned page by page in concurrent batches
// reference: https://api.stackexchange.com/docs/search

use crate::config::UnansweredConfig;
use crate::error::Result;
use crate::models::Question;
use crate::pipeline::ProgressTracker;
use crate::service::{QaBackend, QuestionListing};
use crate::utils::{OperationTimer, Validator};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct UnansweredRequest {
    pub tag: String,
    pub in_title: String,
    pub from_date: DateTime<Utc>,
    pub top_n: usize,
}

impl UnansweredRequest {
    /// Uses the configured look-back window ending at `now`.
    pub fn new(tag: impl Into<String>, config: &UnansweredConfig, now: DateTime<Utc>) -> Self {
        Self {
            tag: tag.into(),
            in_title: String::new(),
            from_date: now - ChronoDuration::days(config.lookback_days),
            top_n: config.top_n,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnansweredReport {
    pub tag: String,
    pub questions: Vec<Question>,
    pub total_questions: u64,
    pub pages_fetched: usize,
}

pub struct UnansweredScanner {
    backend: Arc<dyn QaBackend>,
    page_size: u32,
    batch_size: u32,
    filter: String,
}

impl UnansweredScanner {
    pub fn new(backend: Arc<dyn QaBackend>, config: &UnansweredConfig) -> Self {
        Self {
            backend,
            page_size: config.page_size.max(1),
            batch_size: config.batch_size.max(1),
            filter: config.question_filter.clone(),
        }
    }

    pub async fn scan(
        &self,
        request: &UnansweredRequest,
        progress: &ProgressTracker,
    ) -> Result<UnansweredReport> {
        Validator::validate_tag(&request.tag)?;
        let timer = OperationTimer::new(&format!("unanswered scan [{}]", request.tag));

        let listing = QuestionListing {
            tag: request.tag.clone(),
            in_title: request.in_title.clone(),
            from_date: request.from_date,
            page_size: self.page_size,
            filter: self.filter.clone(),
        };

        let first = self.backend.question_page(&listing, 1).await?;
        let total_pages = first.total.div_ceil(self.page_size as u64);
        progress.set_total(total_pages.max(1));
        progress.inc_pages_fetched();

        let mut top = top_unanswered(first.questions, request.top_n);
        let mut remaining = total_pages.saturating_sub(1);
        let mut page: u32 = 1;

        while remaining > 0 {
            let batch = next_batch_size(remaining, self.batch_size as u64);
            remaining -= batch;

            let pages: Vec<u32> = (1..=batch as u32).map(|offset| page + offset).collect();
            page += batch as u32;
            debug!("Fetching pages {:?}", pages);
            progress.set_message(format!("pages {}-{}", pages[0], page));

            let fetched = try_join_all(pages.iter().map(|&p| {
                let listing = &listing;
                async move {
                    let result = self.backend.question_page(listing, p).await;
                    match &result {
                        Ok(_) => progress.inc_pages_fetched(),
                        Err(_) => progress.inc_pages_failed(),
                    }
                    result
                }
            }))
            .await?;

            for questions in fetched.into_iter().map(|page| page.questions) {
                top.extend(questions);
                top = top_unanswered(top, request.top_n);
            }
        }

        progress.finish();
        let pages_fetched = progress.pages_fetched();
        timer.finish_with_count(pages_fetched);
        info!(
            "Scanned {} pages of [{}], kept {} unanswered questions",
            pages_fetched,
            request.tag,
            top.len()
        );

        Ok(UnansweredReport {
            tag: request.tag.clone(),
            questions: top,
            total_questions: first.total,
            pages_fetched,
        })
    }
}

/// Pages fetched in the next round: the remainder first, then full batches.
fn next_batch_size(remaining: u64, batch_size: u64) -> u64 {
    match remaining % batch_size {
        0 => batch_size,
        partial => partial,
    }
}

/// Drops answered questions and keeps the `n` most viewed, stable on ties.
pub fn top_unanswered(questions: Vec<Question>, n: usize) -> Vec<Question> {
    let mut unanswered: Vec<Question> = questions.into_iter().filter(|q| !q.is_answered()).collect();
    unanswered.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    unanswered.truncate(n);
    unanswered
}
