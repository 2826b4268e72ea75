// file: src/ranking/mod.rs
// description: answer ranking module exports
// reference: internal module structure

pub mod ranker;

pub use ranker::{ACCEPTED_BONUS, Ranker};
