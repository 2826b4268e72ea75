// file: src/search/mod.rs
// description: search and answer retrieval module exports
// reference: internal module structure

pub mod client;
pub mod fetcher;
pub mod retry;

pub use client::SearchClient;
pub use fetcher::{AnswerFetcher, FetchBatch, FetchFailure};
pub use retry::RetryPolicy;
