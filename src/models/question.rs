// file: src/models/question.rs
// description: question listing entry used by the unanswered scan

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub question_id: u64,
    pub title: Option<String>,
    pub link: String,
    pub view_count: u64,
    pub answer_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn is_answered(&self) -> bool {
        self.answer_count > 0
    }
}

/// One page of the question listing together with the listing's total size.
#[derive(Debug, Clone, Default)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total: u64,
}
