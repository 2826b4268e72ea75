// file: src/query/mod.rs
// description: query normalization module exports
// reference: internal module structure

pub mod normalizer;
pub mod patterns;

pub use normalizer::{Query, QueryNormalizer};
