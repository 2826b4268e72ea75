// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod answer;
pub mod question;
pub mod ranked_result;
pub mod search_hit;

pub use answer::Answer;
pub use question::{Question, QuestionPage};
pub use ranked_result::{RankedAnswer, RankedResult};
pub use search_hit::SearchHit;
