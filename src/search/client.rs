// file: src/search/client.rs
// description: validated search with bounded retry on rate limiting
// reference: exponential backoff on throttled API calls

use super::retry::RetryPolicy;
use crate::error::{LookupError, Result};
use crate::models::SearchHit;
use crate::service::QaBackend;
use crate::utils::{Clock, Validator};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SearchClient {
    backend: Arc<dyn QaBackend>,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl SearchClient {
    pub fn new(backend: Arc<dyn QaBackend>, retry: RetryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            retry,
            clock,
        }
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        Validator::validate_limit(limit)?;

        let mut attempt = 1;
        let hits = loop {
            match self.backend.search(query, limit).await {
                Ok(hits) => break hits,
                Err(LookupError::RateLimit(reason)) => match self.retry.delay_after(attempt) {
                    Some(delay) => {
                        warn!(
                            "Search rate limited ({}), retrying in {:?} (attempt {}/{})",
                            reason, delay, attempt, self.retry.max_attempts
                        );
                        self.clock.sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(LookupError::RateLimit(reason)),
                },
                Err(e) => return Err(e),
            }
        };

        if hits.is_empty() {
            return Err(LookupError::NoResults(query.to_string()));
        }

        debug!("Search for \"{}\" returned {} hits", query, hits.len());
        Ok(hits.into_iter().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, ManualClock, hit};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn client(backend: Arc<FakeBackend>, clock: Arc<ManualClock>) -> SearchClient {
        SearchClient::new(backend, RetryPolicy::default(), clock)
    }

    #[tokio::test]
    async fn test_zero_limit_rejected_before_network() {
        let backend = Arc::new(FakeBackend::new().with_hits(vec![hit(1)]));
        let search = client(backend.clone(), Arc::new(ManualClock::new()));

        let result = search.search("npe", 0).await;
        assert!(matches!(result, Err(LookupError::Validation(_))));
        assert_eq!(backend.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_results() {
        let backend = Arc::new(FakeBackend::new());
        let search = client(backend, Arc::new(ManualClock::new()));

        assert_eq!(
            search.search("npe", 10).await,
            Err(LookupError::NoResults("npe".to_string()))
        );
    }

    #[tokio::test]
    async fn test_rate_limit_retries_then_succeeds() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_hits(vec![hit(1), hit(2)])
                .rate_limited_for(1),
        );
        let clock = Arc::new(ManualClock::new());
        let search = client(backend.clone(), clock.clone());

        let hits = search.search("npe", 10).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(backend.search_calls(), 2);
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(500)]);
    }

    #[tokio::test]
    async fn test_rate_limit_gives_up_after_three_attempts() {
        let backend = Arc::new(FakeBackend::new().with_hits(vec![hit(1)]).rate_limited_for(10));
        let clock = Arc::new(ManualClock::new());
        let search = client(backend.clone(), clock.clone());

        let result = search.search("npe", 10).await;
        assert!(matches!(result, Err(LookupError::RateLimit(_))));
        assert_eq!(backend.search_calls(), 3);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(500), Duration::from_millis(1000)]
        );
    }

    #[tokio::test]
    async fn test_network_error_not_retried() {
        let backend = Arc::new(
            FakeBackend::new().failing_search(LookupError::Network("connection refused".to_string())),
        );
        let clock = Arc::new(ManualClock::new());
        let search = client(backend.clone(), clock.clone());

        let result = search.search("npe", 10).await;
        assert!(matches!(result, Err(LookupError::Network(_))));
        assert_eq!(backend.search_calls(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_truncates_to_limit() {
        let backend = Arc::new(FakeBackend::new().with_hits(vec![hit(1), hit(2), hit(3)]));
        let search = client(backend, Arc::new(ManualClock::new()));

        let hits = search.search("npe", 2).await.unwrap();
        assert_eq!(hits.iter().map(|h| h.question_id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
