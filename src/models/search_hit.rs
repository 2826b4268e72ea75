// file: src/models/search_hit.rs
// description: candidate question returned by the search step
// reference: Stack Exchange question object

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Stack Exchange question id
    pub question_id: u64,

    pub title: String,

    /// Plain-text excerpt of the question body
    pub snippet: String,

    pub link: String,

    /// Question score as reported by the search endpoint
    pub source_score: i64,

    pub answer_count: u32,
}

impl SearchHit {
    pub fn new(question_id: u64, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            question_id,
            title: title.into(),
            snippet: String::new(),
            link: link.into(),
            source_score: 0,
            answer_count: 0,
        }
    }
}
