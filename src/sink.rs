use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::time::Duration;

use serde::Serialize;

use crate::drill::SessionResult;

/// Row shipped to the remote `results` table at session end.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionRecord {
    pub level: u8,
    pub total_words: usize,
    pub total_chars: usize,
    pub total_mistakes: u32,
    pub time_taken: f64,
    pub mistakes_by_char: HashMap<String, u32>,
}

impl SessionRecord {
    pub fn new(level: u8, result: &SessionResult) -> Self {
        Self {
            level,
            total_words: result.word_count,
            total_chars: result.total_chars,
            total_mistakes: result.total_mistakes,
            time_taken: result.elapsed_secs,
            mistakes_by_char: result
                .mistakes
                .iter()
                .map(|(c, count)| (c.to_string(), *count))
                .collect(),
        }
    }
}

/// Session-end persistence. Best effort: the local results are already
/// on screen by the time this runs, so implementations must never fail
/// the caller.
pub trait ResultSink {
    fn record_session(&self, record: &SessionRecord);
}

/// Null-object default when no backend is configured.
pub struct NoopSink;

impl ResultSink for NoopSink {
    fn record_session(&self, _record: &SessionRecord) {}
}

/// Remote sink posting one blocking insert to a Supabase REST endpoint.
pub struct SupabaseSink {
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl SupabaseSink {
    /// Built from `SUPABASE_URL` / `SUPABASE_KEY`; returns None when
    /// either is missing, which callers treat as "no sink configured".
    pub fn from_env() -> Option<Self> {
        let url = env::var("SUPABASE_URL").ok().filter(|s| !s.is_empty())?;
        let key = env::var("SUPABASE_KEY").ok().filter(|s| !s.is_empty())?;
        Some(Self::new(&url, &key))
    }

    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            endpoint: format!("{}/rest/v1/results", url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, record: &SessionRecord) -> Result<(), Box<dyn Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

impl ResultSink for SupabaseSink {
    fn record_session(&self, record: &SessionRecord) {
        // Fire and forget; a one-shot call with no retries.
        let _ = self.post(record);
    }
}
