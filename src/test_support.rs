// file: src/test_support.rs
// description: in-memory backend and manual clock shared by unit tests

use crate::error::{LookupError, Result};
use crate::models::{Answer, Question, QuestionPage, SearchHit};
use crate::service::{QaBackend, QuestionListing};
use crate::utils::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn hit(question_id: u64) -> SearchHit {
    SearchHit::new(
        question_id,
        format!("Question {}", question_id),
        format!("https://stackoverflow.com/questions/{}", question_id),
    )
}

pub fn answer(answer_id: u64, question_id: u64, votes: i64, accepted: bool) -> Answer {
    Answer {
        answer_id,
        question_id,
        question_title: format!("Question {}", question_id),
        link: format!("https://stackoverflow.com/questions/{}#{}", question_id, answer_id),
        body: format!("Answer {} body", answer_id),
        vote_count: votes,
        accepted,
        created_at: reference_time() - ChronoDuration::days(30),
    }
}

pub fn question(question_id: u64, views: u64, answers: u32) -> Question {
    Question {
        question_id,
        title: None,
        link: format!("https://stackoverflow.com/questions/{}", question_id),
        view_count: views,
        answer_count: answers,
        created_at: reference_time(),
    }
}

/// Clock whose time only moves when a test advances it or something sleeps on it.
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        let offset = *self.offset.lock().unwrap();
        reference_time() + ChronoDuration::from_std(offset).unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        self.advance(duration);
    }
}

#[derive(Default)]
pub struct FakeBackend {
    hits: Vec<SearchHit>,
    search_error: Option<LookupError>,
    search_delay: Option<Duration>,
    rate_limited: AtomicU32,
    search_calls: AtomicUsize,
    answers: HashMap<u64, Result<Vec<Answer>>>,
    answer_delay: Option<Duration>,
    active_answers: AtomicUsize,
    peak_answers: AtomicUsize,
    pages: HashMap<u32, Result<QuestionPage>>,
    page_calls: Mutex<Vec<u32>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.hits = hits;
        self
    }

    pub fn failing_search(mut self, error: LookupError) -> Self {
        self.search_error = Some(error);
        self
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    /// The first `times` searches fail with a rate-limit error.
    pub fn rate_limited_for(self, times: u32) -> Self {
        self.rate_limited.store(times, Ordering::SeqCst);
        self
    }

    pub fn with_answers(mut self, question_id: u64, answers: Vec<Answer>) -> Self {
        self.answers.insert(question_id, Ok(answers));
        self
    }

    pub fn failing_answers(mut self, question_id: u64, error: LookupError) -> Self {
        self.answers.insert(question_id, Err(error));
        self
    }

    pub fn with_answer_delay(mut self, delay: Duration) -> Self {
        self.answer_delay = Some(delay);
        self
    }

    pub fn with_page(mut self, page: u32, result: Result<QuestionPage>) -> Self {
        self.pages.insert(page, result);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn peak_concurrent_answers(&self) -> usize {
        self.peak_answers.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> Vec<u32> {
        let mut calls = self.page_calls.lock().unwrap().clone();
        calls.sort_unstable();
        calls
    }
}

#[async_trait]
impl QaBackend for FakeBackend {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }

        let limited = self
            .rate_limited
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if limited {
            return Err(LookupError::RateLimit("throttle_violation".to_string()));
        }

        match &self.search_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.hits.clone()),
        }
    }

    async fn answers(&self, hit: &SearchHit) -> Result<Vec<Answer>> {
        let active = self.active_answers.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_answers.fetch_max(active, Ordering::SeqCst);

        if let Some(delay) = self.answer_delay {
            tokio::time::sleep(delay).await;
        }

        self.active_answers.fetch_sub(1, Ordering::SeqCst);

        self.answers
            .get(&hit.question_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn question_page(&self, _listing: &QuestionListing, page: u32) -> Result<QuestionPage> {
        self.page_calls.lock().unwrap().push(page);
        self.pages.get(&page).cloned().unwrap_or_else(|| {
            Err(LookupError::Api {
                code: 400,
                message: format!("page {} out of range", page),
            })
        })
    }
}
