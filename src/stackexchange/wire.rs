// file: src/stackexchange/wire.rs
// description: Stack Exchange API 2.3 response envelope and item types
// reference: https://api.stackexchange.com/docs/wrapper

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub quota_remaining: Option<u32>,
    /// Seconds the service asks callers to wait before repeating this method
    pub backoff: Option<u64>,
    pub total: Option<u64>,
    pub error_id: Option<u32>,
    pub error_name: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireQuestion {
    pub question_id: u64,
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub score: i64,
    pub body: Option<String>,
    #[serde(default)]
    pub answer_count: u32,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub creation_date: i64,
}

#[derive(Debug, Deserialize)]
pub struct WireAnswer {
    pub answer_id: u64,
    pub question_id: u64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub is_accepted: bool,
    #[serde(default)]
    pub creation_date: i64,
    pub body: Option<String>,
}

/// Stack Exchange `error_id` for throttling.
pub const THROTTLE_VIOLATION: u32 = 502;
/// Stack Exchange `error_id` for an unknown method or id.
pub const NO_METHOD: u32 = 404;
