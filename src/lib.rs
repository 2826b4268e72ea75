// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod cache;
pub mod config;
pub mod error;
pub mod exporter;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod ranking;
pub mod search;
pub mod service;
pub mod stackexchange;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use cache::{CacheStats, LruResultCache, NoopCache, ResultStore};
pub use config::{ApiConfig, CacheConfig, Config, SearchConfig, UnansweredConfig};
pub use error::{LookupError, Result};
pub use exporter::{ExportedLookup, JsonExporter};
pub use models::{Answer, Question, RankedAnswer, RankedResult, SearchHit};
pub use pipeline::{LookupOutcome, LookupPipeline, LookupStats, ProgressTracker};
pub use query::{Query, QueryNormalizer};
pub use ranking::Ranker;
pub use service::QaBackend;
pub use stackexchange::{StackExchangeClient, UnansweredReport, UnansweredRequest, UnansweredScanner};
pub use utils::{Clock, OperationTimer, SystemClock, Validator};
