// file: src/models/ranked_result.rs
// description: ranked answers returned to the caller
// reference: Used for scored search results

use super::Answer;
use crate::utils::Validator;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAnswer {
    pub answer: Answer,
    pub score: f64,
}

/// Answers sorted descending by score. Only the ranker builds these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub query: String,
    pub answers: Vec<RankedAnswer>,
}

impl RankedResult {
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn top(&self) -> Option<&RankedAnswer> {
        self.answers.first()
    }

}

impl RankedAnswer {
    /// Format as a summary block for terminal display
    pub fn format_summary(&self, max_body_len: usize) -> String {
        let accepted = if self.answer.accepted { " | accepted" } else { "" };
        let excerpt = Validator::truncate_text(&self.answer.body, max_body_len);

        format!(
            "Score: {:.2} | votes {}{}\n{}\n{}\n{}\n",
            self.score,
            self.answer.vote_count,
            accepted,
            self.answer.question_title,
            excerpt,
            self.answer.link
        )
    }
}
