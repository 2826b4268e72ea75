// file: src/pipeline/progress.rs
// description: progress tracking and statistics for lookups and page scans
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters accumulated over the lifetime of one pipeline.
#[derive(Debug, Default)]
pub struct LookupCounters {
    lookups: AtomicU64,
    served_from_cache: AtomicU64,
    searches: AtomicU64,
    hits_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    failed_lookups: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LookupStats {
    pub lookups: u64,
    pub served_from_cache: u64,
    pub searches: u64,
    pub hits_fetched: u64,
    pub fetch_failures: u64,
    pub failed_lookups: u64,
}

impl LookupCounters {
    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.served_from_cache.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetches(&self, succeeded: usize, failed: usize) {
        self.hits_fetched.fetch_add(succeeded as u64, Ordering::Relaxed);
        self.fetch_failures.fetch_add(failed as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LookupStats {
        LookupStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            served_from_cache: self.served_from_cache.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            hits_fetched: self.hits_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            failed_lookups: self.failed_lookups.load(Ordering::Relaxed),
        }
    }
}

impl LookupStats {
    pub fn success_rate(&self) -> f64 {
        if self.lookups == 0 {
            return 0.0;
        }
        ((self.lookups - self.failed_lookups) as f64 / self.lookups as f64) * 100.0
    }
}

/// Page-level progress for the unanswered scan.
pub struct ProgressTracker {
    bar: ProgressBar,
    pages_fetched: AtomicUsize,
    pages_failed: AtomicUsize,
}

impl ProgressTracker {
    pub fn new(total_pages: u64, colored: bool) -> Self {
        let bar = ProgressBar::new(total_pages);
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.set_style(progress_style(colored));
        Self::from_bar(bar)
    }

    /// Tracks counts without drawing anything.
    pub fn hidden() -> Self {
        Self::from_bar(ProgressBar::hidden())
    }

    fn from_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            pages_fetched: AtomicUsize::new(0),
            pages_failed: AtomicUsize::new(0),
        }
    }

    pub fn set_total(&self, total_pages: u64) {
        self.bar.set_length(total_pages);
    }

    pub fn inc_pages_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
    }

    pub fn inc_pages_failed(&self) {
        self.pages_failed.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
    }

    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched.load(Ordering::SeqCst)
    }

    pub fn pages_failed(&self) -> usize {
        self.pages_failed.load(Ordering::SeqCst)
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn progress_style(colored: bool) -> ProgressStyle {
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} pages {msg}", "=>-")
    };

    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_counters_snapshot() {
        let counters = LookupCounters::default();
        counters.record_lookup();
        counters.record_lookup();
        counters.record_cache_hit();
        counters.record_search();
        counters.record_fetches(2, 1);
        counters.record_failure();

        let stats = counters.snapshot();
        assert_eq!(stats.lookups, 2);
        assert_eq!(stats.served_from_cache, 1);
        assert_eq!(stats.hits_fetched, 2);
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.success_rate(), 50.0);
    }

    #[test]
    fn test_success_rate_without_lookups() {
        assert_eq!(LookupStats::default().success_rate(), 0.0);
    }

    #[test]
    fn test_progress_tracker_counts() {
        let tracker = ProgressTracker::hidden();
        tracker.set_total(3);
        tracker.inc_pages_fetched();
        tracker.inc_pages_fetched();
        tracker.inc_pages_failed();

        assert_eq!(tracker.pages_fetched(), 2);
        assert_eq!(tracker.pages_failed(), 1);
    }
}
