// file: src/cache/mod.rs
// description: result cache module exports
// reference: internal module structure

pub mod inflight;
pub mod result_cache;

pub use inflight::{InflightRegistry, PopulationGuard};
pub use result_cache::{CacheStats, LruResultCache, NoopCache, ResultStore};
