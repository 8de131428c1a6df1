//! Test double for `CandidateSource`: canned JSON payloads and error
//! factories keyed by query/login, with call counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::CandidateSource;
use crate::errors::ScoutError;

type ErrorFactory = Box<dyn Fn() -> ScoutError + Send + Sync>;

#[derive(Default)]
pub struct StubSource {
    searches: Mutex<HashMap<String, Value>>,
    users: Mutex<HashMap<String, Value>>,
    repos: Mutex<HashMap<String, Value>>,
    events: Mutex<HashMap<String, Value>>,
    search_errors: Mutex<HashMap<String, ErrorFactory>>,
    user_errors: Mutex<HashMap<String, ErrorFactory>>,
    events_errors: Mutex<HashMap<String, ErrorFactory>>,
    search_count: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, query: &str, payload: Value) -> Self {
        self.searches.lock().unwrap().insert(query.to_string(), payload);
        self
    }

    pub fn with_search_error(
        self,
        query: &str,
        factory: impl Fn() -> ScoutError + Send + Sync + 'static,
    ) -> Self {
        self.search_errors
            .lock()
            .unwrap()
            .insert(query.to_string(), Box::new(factory));
        self
    }

    pub fn with_user(self, login: &str, payload: Value) -> Self {
        self.users.lock().unwrap().insert(login.to_string(), payload);
        self
    }

    pub fn with_user_error(
        self,
        login: &str,
        factory: impl Fn() -> ScoutError + Send + Sync + 'static,
    ) -> Self {
        self.user_errors
            .lock()
            .unwrap()
            .insert(login.to_string(), Box::new(factory));
        self
    }

    pub fn with_repos(self, login: &str, payload: Value) -> Self {
        self.repos.lock().unwrap().insert(login.to_string(), payload);
        self
    }

    pub fn with_events(self, login: &str, payload: Value) -> Self {
        self.events.lock().unwrap().insert(login.to_string(), payload);
        self
    }

    pub fn with_events_error(
        self,
        login: &str,
        factory: impl Fn() -> ScoutError + Send + Sync + 'static,
    ) -> Self {
        self.events_errors
            .lock()
            .unwrap()
            .insert(login.to_string(), Box::new(factory));
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_count.load(Ordering::SeqCst)
    }

    fn lookup(
        table: &Mutex<HashMap<String, Value>>,
        errors: &Mutex<HashMap<String, ErrorFactory>>,
        key: &str,
    ) -> Result<Value, ScoutError> {
        if let Some(factory) = errors.lock().unwrap().get(key) {
            return Err(factory());
        }
        table
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| ScoutError::Remote {
                status: 404,
                message: format!("no stub payload for '{key}'"),
            })
    }
}

#[async_trait]
impl CandidateSource for StubSource {
    async fn search_users(&self, query: &str) -> Result<Value, ScoutError> {
        self.search_count.fetch_add(1, Ordering::SeqCst);
        Self::lookup(&self.searches, &self.search_errors, query)
    }

    async fn user(&self, login: &str) -> Result<Value, ScoutError> {
        Self::lookup(&self.users, &self.user_errors, login)
    }

    async fn user_repos(&self, login: &str) -> Result<Value, ScoutError> {
        // Missing repo stubs mean "no repositories" rather than an error,
        // matching how most tests want a minimal candidate.
        if let Some(payload) = self.repos.lock().unwrap().get(login).cloned() {
            return Ok(payload);
        }
        Ok(Value::Array(vec![]))
    }

    async fn user_events(&self, login: &str) -> Result<Value, ScoutError> {
        if let Some(factory) = self.events_errors.lock().unwrap().get(login) {
            return Err(factory());
        }
        if let Some(payload) = self.events.lock().unwrap().get(login).cloned() {
            return Ok(payload);
        }
        Ok(Value::Array(vec![]))
    }
}
