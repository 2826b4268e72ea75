// file: src/ranking/ranker.rs
// description: scores answers by votes, acceptance and age and orders them
// reference: search ranking with deterministic tie-breaking

use crate::error::{LookupError, Result};
use crate::models::{Answer, RankedAnswer, RankedResult};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;

pub const ACCEPTED_BONUS: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    reference_time: DateTime<Utc>,
}

impl Ranker {
    /// Answer ages are measured against `reference_time`, so equal inputs rank identically.
    pub fn new(reference_time: DateTime<Utc>) -> Self {
        Self { reference_time }
    }

    pub fn rank(&self, query: &str, answers: Vec<Answer>) -> Result<RankedResult> {
        if answers.is_empty() {
            return Err(LookupError::EmptyInput);
        }

        let mut ranked: Vec<RankedAnswer> = answers
            .into_iter()
            .map(|answer| RankedAnswer {
                score: self.score(&answer),
                answer,
            })
            .collect();

        ranked.sort_by(compare_ranked);

        debug!("Ranked {} answers for \"{}\"", ranked.len(), query);

        Ok(RankedResult {
            query: query.to_string(),
            answers: ranked,
        })
    }

    pub fn score(&self, answer: &Answer) -> f64 {
        let bonus = if answer.accepted { ACCEPTED_BONUS } else { 0.0 };
        answer.vote_count as f64 + bonus - self.age_penalty(answer)
    }

    /// ln(1 + age in days): a ten year old answer loses about 8 points.
    pub fn age_penalty(&self, answer: &Answer) -> f64 {
        answer.age_days(self.reference_time).ln_1p()
    }
}

fn compare_ranked(a: &RankedAnswer, b: &RankedAnswer) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.answer.vote_count.cmp(&a.answer.vote_count))
        .then_with(|| b.answer.accepted.cmp(&a.answer.accepted))
        .then_with(|| a.answer.answer_id.cmp(&b.answer.answer_id))
}
