// file: src/pipeline/orchestrator.rs
// description: coordinates normalization, caching, search, answer retrieval and ranking
// reference: orchestrates the asynchronous lookup workflow

use crate::cache::{CacheStats, InflightRegistry, LruResultCache, ResultStore};
use crate::config::{Config, SearchConfig};
use crate::error::{LookupError, Result};
use crate::models::RankedResult;
use crate::pipeline::progress::{LookupCounters, LookupStats};
use crate::query::QueryNormalizer;
use crate::ranking::Ranker;
use crate::search::{AnswerFetcher, FetchFailure, RetryPolicy, SearchClient};
use crate::service::QaBackend;
use crate::stackexchange::StackExchangeClient;
use crate::utils::{Clock, OperationTimer, SystemClock};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct LookupOutcome {
    pub run_id: Uuid,
    pub result: RankedResult,
    pub from_cache: bool,
    /// Hits whose answers could not be fetched and were skipped.
    pub failures: Vec<FetchFailure>,
}

pub struct LookupPipeline {
    normalizer: QueryNormalizer,
    search: SearchClient,
    fetcher: AnswerFetcher,
    cache: Arc<dyn ResultStore>,
    inflight: InflightRegistry,
    clock: Arc<dyn Clock>,
    limit: usize,
    total_timeout: Duration,
    counters: LookupCounters,
}

impl LookupPipeline {
    pub fn new(
        config: &SearchConfig,
        backend: Arc<dyn QaBackend>,
        cache: Arc<dyn ResultStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let search = SearchClient::new(
            backend.clone(),
            RetryPolicy::from_config(config),
            clock.clone(),
        );
        let fetcher = AnswerFetcher::new(backend, config.max_concurrent_fetches);

        Self {
            normalizer: QueryNormalizer::new(),
            search,
            fetcher,
            cache,
            inflight: InflightRegistry::new(),
            clock,
            limit: config.result_limit,
            total_timeout: config.total_timeout(),
            counters: LookupCounters::default(),
        }
    }

    /// Wires the Stack Exchange backend, system clock and configured cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = StackExchangeClient::new(config.api.clone(), config.search.request_timeout())?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = LruResultCache::from_config(&config.cache, clock.clone());

        Ok(Self::new(&config.search, Arc::new(backend), cache, clock))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_total_timeout(mut self, timeout: Duration) -> Self {
        self.total_timeout = timeout;
        self
    }

    pub async fn lookup(&self, raw: &str) -> Result<LookupOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("lookup", %run_id);
        self.counters.record_lookup();

        let outcome = self.run(run_id, raw).instrument(span).await;
        if let Err(e) = &outcome {
            self.counters.record_failure();
            warn!("Lookup {} failed: {}", run_id, e);
        }
        outcome
    }

    async fn run(&self, run_id: Uuid, raw: &str) -> Result<LookupOutcome> {
        let query = self.normalizer.normalize_query(raw)?;
        let key = query.normalized();

        if let Some(result) = self.cache.get(key) {
            self.counters.record_cache_hit();
            info!("Serving \"{}\" from cache", key);
            return Ok(cached(run_id, result));
        }

        match tokio::time::timeout(self.total_timeout, self.populate(run_id, key)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(LookupError::Timeout(self.total_timeout.as_millis() as u64)),
        }
    }

    async fn populate(&self, run_id: Uuid, key: &str) -> Result<LookupOutcome> {
        let _guard = self.inflight.acquire(key).await;
        // another caller may have populated the key since the first check
        if let Some(result) = self.cache.get(key) {
            self.counters.record_cache_hit();
            return Ok(cached(run_id, result));
        }

        let timer = OperationTimer::new(&format!("lookup \"{}\"", key));

        self.counters.record_search();
        let hits = self.search.search(key, self.limit).await?;
        info!("Found {} candidate questions", hits.len());

        let batch = self.fetcher.fetch_all(&hits).await;
        self.counters
            .record_fetches(batch.hits_succeeded, batch.failures.len());

        if batch.all_failed() {
            if let Some(first) = batch.failures.first() {
                return Err(first.source.clone());
            }
        }

        let ranker = Ranker::new(self.clock.utc_now());
        let result = ranker.rank(key, batch.answers)?;

        self.cache.put(key, result.clone());
        timer.warn_if_slow(self.total_timeout / 2, "ranked lookup");
        timer.finish_with_count(result.len());

        Ok(LookupOutcome {
            run_id,
            result,
            from_cache: false,
            failures: batch.failures,
        })
    }

    pub fn stats(&self) -> LookupStats {
        self.counters.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn log_final_stats(&self) {
        let stats = self.stats();
        let cache = self.cache_stats();

        info!("=== Lookup Summary ===");
        info!("Lookups: {}", stats.lookups);
        info!("Served from cache: {}", stats.served_from_cache);
        info!("Searches issued: {}", stats.searches);
        info!("Questions fetched: {}", stats.hits_fetched);
        info!("Fetch failures: {}", stats.fetch_failures);
        info!("Success rate: {:.2}%", stats.success_rate());
        info!(
            "Cache: {} entries, {} hits, {} misses, {} expired, {} evicted",
            cache.entries, cache.hits, cache.misses, cache.expirations, cache.evictions
        );
        info!("======================");
    }
}

fn cached(run_id: Uuid, result: RankedResult) -> LookupOutcome {
    LookupOutcome {
        run_id,
        result,
        from_cache: true,
        failures: Vec::new(),
    }
}
