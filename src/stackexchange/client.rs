// file: src/stackexchange/client.rs
// description: Stack Exchange API 2.3 client implementing the search backend
// reference: https://api.stackexchange.com/docs

use super::html;
use super::wire::{Envelope, NO_METHOD, THROTTLE_VIOLATION, WireAnswer, WireQuestion};
use crate::config::ApiConfig;
use crate::error::{LookupError, Result};
use crate::models::{Answer, Question, QuestionPage, SearchHit};
use crate::service::{QaBackend, QuestionListing};
use crate::utils::Validator;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SNIPPET_CHARS: usize = 240;
const ANSWERS_PAGE_SIZE: usize = 100;

const SEARCH_METHOD: &str = "search/advanced";
const ANSWERS_METHOD: &str = "questions/answers";
const LISTING_METHOD: &str = "search";

/// Per-method deadlines set by the API's `backoff` field.
#[derive(Debug, Default)]
struct BackoffGate {
    until: Mutex<HashMap<&'static str, Instant>>,
}

impl BackoffGate {
    fn record(&self, method: &'static str, now: Instant, seconds: u64) {
        let deadline = now + Duration::from_secs(seconds);
        let mut until = self.until.lock().unwrap_or_else(|p| p.into_inner());
        let entry = until.entry(method).or_insert(deadline);
        *entry = (*entry).max(deadline);
    }

    fn remaining(&self, method: &'static str, now: Instant) -> Option<Duration> {
        let until = self.until.lock().unwrap_or_else(|p| p.into_inner());
        until
            .get(method)
            .map(|deadline| deadline.saturating_duration_since(now))
            .filter(|wait| !wait.is_zero())
    }
}

#[derive(Clone)]
pub struct StackExchangeClient {
    client: Client,
    config: ApiConfig,
    backoff: Arc<BackoffGate>,
}

impl StackExchangeClient {
    /// `request_timeout` bounds every individual HTTP call.
    pub fn new(config: ApiConfig, request_timeout: Duration) -> Result<Self> {
        Validator::validate_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("stackrank/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(|e| LookupError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            backoff: Arc::default(),
        })
    }

    /// `method` names the API method whose backoff applies to this call.
    async fn get<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Envelope<T>> {
        if let Some(wait) = self.backoff.remaining(method, Instant::now()) {
            warn!("Waiting {:?} before calling {} again", wait, method);
            tokio::time::sleep(wait).await;
        }

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("site", self.config.site.clone()));
        if let Some(key) = &self.config.key {
            query.push(("key", key.clone()));
        }

        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| LookupError::Network(describe_transport_error(&e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::RateLimit(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(describe_transport_error(&e)))?;

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if status == StatusCode::NOT_FOUND => {
                return Err(LookupError::Api {
                    code: status.as_u16() as u32,
                    message: format!("{} not found", path),
                });
            }
            Err(_) if !status.is_success() => {
                return Err(LookupError::Network(format!(
                    "Search service returned {}",
                    status
                )));
            }
            Err(e) => {
                return Err(LookupError::Serialization(format!(
                    "Failed to parse response from {}: {}",
                    path, e
                )));
            }
        };

        if let Some(backoff) = envelope.backoff {
            warn!("Search service asked to back off {}s on {}", backoff, method);
            self.backoff.record(method, Instant::now(), backoff);
        }

        if let Some(error_id) = envelope.error_id {
            let message = envelope
                .error_message
                .clone()
                .or_else(|| envelope.error_name.clone())
                .unwrap_or_else(|| "Something went wrong.".to_string());
            return Err(match error_id {
                THROTTLE_VIOLATION => LookupError::RateLimit(message),
                code => LookupError::Api { code, message },
            });
        }

        if !status.is_success() {
            return Err(LookupError::Api {
                code: status.as_u16() as u32,
                message: format!("Search service returned {}", status),
            });
        }

        if let Some(quota) = envelope.quota_remaining {
            debug!("API quota remaining: {}", quota);
        }

        Ok(envelope)
    }

    fn to_hit(&self, question: WireQuestion) -> SearchHit {
        let snippet = question
            .body
            .as_deref()
            .map(html::to_plain_text)
            .map(|text| Validator::truncate_text(&text, SNIPPET_CHARS))
            .unwrap_or_default();

        let title = question
            .title
            .as_deref()
            .map(html::decode_entities)
            .unwrap_or_default();
        let link = question
            .link
            .unwrap_or_else(|| self.question_link(question.question_id));

        SearchHit {
            snippet,
            source_score: question.score,
            answer_count: question.answer_count,
            ..SearchHit::new(question.question_id, title, link)
        }
    }

    fn question_link(&self, question_id: u64) -> String {
        format!("https://{}.com/questions/{}", self.config.site, question_id)
    }
}

#[async_trait]
impl QaBackend for StackExchangeClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let params = [
            ("q", query.to_string()),
            ("order", "desc".to_string()),
            ("sort", "relevance".to_string()),
            ("pagesize", limit.to_string()),
            ("filter", "withbody".to_string()),
        ];

        let envelope: Envelope<WireQuestion> = self.get(SEARCH_METHOD, "/search/advanced", &params).await?;

        Ok(envelope
            .items
            .into_iter()
            .map(|question| self.to_hit(question))
            .collect())
    }

    async fn answers(&self, hit: &SearchHit) -> Result<Vec<Answer>> {
        let params = [
            ("order", "desc".to_string()),
            ("sort", "votes".to_string()),
            ("pagesize", ANSWERS_PAGE_SIZE.to_string()),
            ("filter", "withbody".to_string()),
        ];
        let path = format!("/questions/{}/answers", hit.question_id);

        let envelope: Envelope<WireAnswer> = match self.get(ANSWERS_METHOD, &path, &params).await {
            Err(LookupError::Api { code, .. }) if code == NO_METHOD => {
                return Err(LookupError::NotFound(hit.question_id));
            }
            other => other?,
        };

        Ok(envelope
            .items
            .into_iter()
            .map(|answer| Answer {
                answer_id: answer.answer_id,
                question_id: answer.question_id,
                question_title: hit.title.clone(),
                link: format!("{}#{}", hit.link, answer.answer_id),
                body: answer
                    .body
                    .as_deref()
                    .map(html::to_plain_text)
                    .unwrap_or_default(),
                vote_count: answer.score,
                accepted: answer.is_accepted,
                created_at: from_epoch(answer.creation_date),
            })
            .collect())
    }

    async fn question_page(&self, listing: &QuestionListing, page: u32) -> Result<QuestionPage> {
        let params = [
            ("tagged", listing.tag.clone()),
            ("intitle", listing.in_title.clone()),
            ("fromdate", listing.from_date.timestamp().to_string()),
            ("page", page.to_string()),
            ("pagesize", listing.page_size.to_string()),
            ("sort", "creation".to_string()),
            ("filter", listing.filter.clone()),
        ];

        debug!("Fetching page {}", page);
        let envelope: Envelope<WireQuestion> = self.get(LISTING_METHOD, "/search", &params).await?;
        let total = envelope.total.unwrap_or(0);

        let questions = envelope
            .items
            .into_iter()
            .map(|question| Question {
                question_id: question.question_id,
                title: question.title.as_deref().map(html::decode_entities),
                link: question
                    .link
                    .unwrap_or_else(|| self.question_link(question.question_id)),
                view_count: question.view_count,
                answer_count: question.answer_count,
                created_at: from_epoch(question.creation_date),
            })
            .collect();

        Ok(QuestionPage { questions, total })
    }
}

fn from_epoch(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}
