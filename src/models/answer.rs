// file: src/models/answer.rs
// description: answer model fetched for a search hit
// reference: Stack Exchange answer object

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer_id: u64,
    pub question_id: u64,
    pub question_title: String,
    pub link: String,
    /// Body with markup stripped
    pub body: String,
    pub vote_count: i64,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    /// Fractional days between creation and `reference`, never negative.
    pub fn age_days(&self, reference: DateTime<Utc>) -> f64 {
        let seconds = (reference - self.created_at).num_seconds().max(0);
        seconds as f64 / 86_400.0
    }
}
