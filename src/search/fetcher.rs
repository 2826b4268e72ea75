// file: src/search/fetcher.rs
// description: concurrent answer retrieval that tolerates per-hit failures
// reference: bounded stream concurrency with futures::StreamExt::buffered

use crate::error::{LookupError, Result};
use crate::models::{Answer, SearchHit};
use crate::service::QaBackend;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub question_id: u64,
    pub error: String,
    pub kind: &'static str,
    #[serde(skip)]
    pub source: LookupError,
}

#[derive(Debug, Default)]
pub struct FetchBatch {
    pub answers: Vec<Answer>,
    pub failures: Vec<FetchFailure>,
    pub hits_succeeded: usize,
}

impl FetchBatch {
    pub fn all_failed(&self) -> bool {
        self.hits_succeeded == 0 && !self.failures.is_empty()
    }
}

pub struct AnswerFetcher {
    backend: Arc<dyn QaBackend>,
    max_concurrent: usize,
}

impl AnswerFetcher {
    pub fn new(backend: Arc<dyn QaBackend>, max_concurrent: usize) -> Self {
        Self {
            backend,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn fetch(&self, hit: &SearchHit) -> Result<Vec<Answer>> {
        let answers = self.backend.answers(hit).await?;
        debug!(
            "Fetched {} answers for question {}",
            answers.len(),
            hit.question_id
        );
        Ok(answers)
    }

    /// Fetches every hit, at most `max_concurrent` at a time, keeping hit order.
    pub async fn fetch_all(&self, hits: &[SearchHit]) -> FetchBatch {
        let results: Vec<(u64, Result<Vec<Answer>>)> = stream::iter(hits.iter().cloned())
            .map(|hit| async move { (hit.question_id, self.fetch(&hit).await) })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut batch = FetchBatch::default();

        for (question_id, result) in results {
            match result {
                Ok(answers) => {
                    batch.hits_succeeded += 1;
                    batch.answers.extend(answers);
                }
                Err(e) => {
                    warn!("Skipping question {}: {}", question_id, e);
                    batch.failures.push(FetchFailure {
                        question_id,
                        error: e.to_string(),
                        kind: e.kind(),
                        source: e,
                    });
                }
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, answer, hit};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_fetch_single_hit() {
        let backend = Arc::new(FakeBackend::new().with_answers(7, vec![answer(70, 7, 3, false)]));
        let fetcher = AnswerFetcher::new(backend, 4);

        let answers = fetcher.fetch(&hit(7)).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer_id, 70);
    }

    #[tokio::test]
    async fn test_not_found_propagates_for_single_fetch() {
        let backend = Arc::new(FakeBackend::new().failing_answers(9, LookupError::NotFound(9)));
        let fetcher = AnswerFetcher::new(backend, 4);

        assert_eq!(fetcher.fetch(&hit(9)).await, Err(LookupError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_partial_failure_skips_failed_hit() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_answers(1, vec![answer(10, 1, 5, false), answer(11, 1, 2, true)])
                .failing_answers(2, LookupError::Network("reset by peer".to_string()))
                .with_answers(3, vec![answer(30, 3, 9, false)]),
        );
        let fetcher = AnswerFetcher::new(backend, 4);

        let batch = fetcher.fetch_all(&[hit(1), hit(2), hit(3)]).await;

        let ids: Vec<u64> = batch.answers.iter().map(|a| a.answer_id).collect();
        assert_eq!(ids, vec![10, 11, 30]);
        assert_eq!(batch.hits_succeeded, 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].question_id, 2);
        assert_eq!(batch.failures[0].kind, "NetworkError");
        assert!(!batch.all_failed());
    }

    #[tokio::test]
    async fn test_all_failed() {
        let backend = Arc::new(
            FakeBackend::new()
                .failing_answers(1, LookupError::NotFound(1))
                .failing_answers(2, LookupError::NotFound(2)),
        );
        let fetcher = AnswerFetcher::new(backend, 2);

        let batch = fetcher.fetch_all(&[hit(1), hit(2)]).await;
        assert!(batch.all_failed());
        assert!(batch.answers.is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let backend = Arc::new(FakeBackend::new().with_answer_delay(std::time::Duration::from_millis(10)));
        let fetcher = AnswerFetcher::new(backend.clone(), 3);
        let hits: Vec<SearchHit> = (1..=9).map(hit).collect();

        let batch = fetcher.fetch_all(&hits).await;
        assert_eq!(batch.hits_succeeded, 9);
        assert!(backend.peak_concurrent_answers() <= 3);
        assert!(backend.peak_concurrent_answers() >= 2);
    }

    #[tokio::test]
    async fn test_fetch_all_runs_on_spawned_task() {
        let backend = Arc::new(FakeBackend::new().with_answers(1, vec![answer(10, 1, 5, false)]));
        let fetcher = Arc::new(AnswerFetcher::new(backend, 2));

        let task = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_all(&[hit(1), hit(2)]).await }
        });

        let batch = task.await.unwrap();
        assert_eq!(batch.hits_succeeded, 2);
        assert_eq!(batch.answers.len(), 1);
    }
}
