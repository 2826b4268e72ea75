// file: src/stackexchange/mod.rs
// description: Stack Exchange API backend module exports
// reference: https://api.stackexchange.com/docs

pub mod client;
pub mod html;
pub mod unanswered;
pub mod wire;

pub use client::StackExchangeClient;
pub use unanswered::{UnansweredReport, UnansweredRequest, UnansweredScanner};
