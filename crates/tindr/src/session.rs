//! Session client
//!
//! `Tindr` owns the session token and last-activity marker for one logical
//! session and exposes one method per API capability. Every method is a
//! single call through `Executor::execute`; only `authenticate` writes state,
//! and only after a successful response.
//!
//! State is behind a `std::sync::RwLock` that is held just long enough to
//! snapshot or replace the values, never across an `.await`. Concurrent calls
//! on one instance therefore each see the token as it was when their headers
//! were built, and racing `authenticate` calls resolve last-writer-wins.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use common::Secret;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::BASE_URL;
use crate::error::{Error, Result};
use crate::request::{Executor, RequestDescriptor};

#[derive(Debug)]
struct SessionState {
    token: Option<Secret<String>>,
    /// `Null` until the first successful `authenticate`; `None` when that
    /// response carried no `create_date`.
    last_activity_date: Option<Value>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            token: None,
            last_activity_date: Some(Value::Null),
        }
    }
}

/// One authenticated (or not yet authenticated) API session.
#[derive(Debug)]
pub struct Tindr {
    executor: Executor,
    state: RwLock<SessionState>,
}

impl Default for Tindr {
    fn default() -> Self {
        Self::new()
    }
}

impl Tindr {
    /// Session against the production API with a default HTTP client.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new(), BASE_URL)
    }

    /// Session using a caller-configured client (timeouts, proxies) and base URL.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            executor: Executor::new(client, base_url),
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().token.is_some()
    }

    /// The held session token, if any.
    pub fn token(&self) -> Option<Secret<String>> {
        self.read_state().token.clone()
    }

    /// The `create_date` returned by the last successful `authenticate`.
    pub fn last_activity_date(&self) -> Option<Value> {
        self.read_state()
            .last_activity_date
            .clone()
            .filter(|marker| !marker.is_null())
    }

    /// Exchange a Facebook token for a session token.
    ///
    /// On success the response's `token` and `create_date` replace the held
    /// values (a field missing from the response clears the held one). On
    /// failure the error is returned unchanged and state is left as it was.
    pub async fn authenticate(&self, facebook_token: &str, facebook_id: &str) -> Result<Value> {
        let payload = fields([
            ("facebook_token", Value::from(facebook_token)),
            ("facebook_id", Value::from(facebook_id)),
        ]);
        let data = self.send(RequestDescriptor::post("/auth", payload)).await?;

        let token: Option<Secret<String>> = data
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(Secret::from);
        if token.is_none() {
            warn!("auth response did not include a session token");
        }
        let last_activity_date = data.get("create_date").cloned();

        {
            let mut state = self.write_state();
            state.token = token;
            state.last_activity_date = last_activity_date;
        }
        debug!(authenticated = self.is_authenticated(), "session state updated");

        Ok(data)
    }

    /// Ask the service to text a confirmation code to `phone_number`.
    pub async fn send_token(&self, phone_number: &str) -> Result<Value> {
        let payload = fields([("phone_number", Value::from(phone_number))]);
        self.send(RequestDescriptor::post("/sendtoken", payload)).await
    }

    pub async fn my_profile(&self) -> Result<Value> {
        self.send(RequestDescriptor::get("/profile")).await
    }

    /// Post profile changes. `profile` must be a JSON object; anything else
    /// fails with `InvalidArgument` without sending a request.
    pub async fn update_profile(&self, profile: Value) -> Result<Value> {
        let changes = match profile {
            Value::Object(changes) => changes,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "expected a JSON object for profile update, got {}",
                    kind(&other)
                )));
            }
        };
        self.send(RequestDescriptor::post("/profile", changes)).await
    }

    /// Profiles near the current location.
    pub async fn get_recommendations(&self) -> Result<Value> {
        self.send(RequestDescriptor::get("/recs/core")).await
    }

    /// Groups near the current location.
    pub async fn get_groups(&self) -> Result<Value> {
        self.send(RequestDescriptor::get("/recs/social")).await
    }

    pub async fn like(&self, user_id: &str) -> Result<Value> {
        self.send(RequestDescriptor::get(format!("/like/{user_id}")))
            .await
    }

    pub async fn pass(&self, user_id: &str) -> Result<Value> {
        self.send(RequestDescriptor::get(format!("/pass/{user_id}")))
            .await
    }

    /// Matches, blocks and other activity since the held marker.
    ///
    /// Before any `authenticate` the marker is sent empty; after an auth
    /// reply without `create_date` the key is left out.
    pub async fn update(&self) -> Result<Value> {
        let mut payload = Map::new();
        let marker = self.read_state().last_activity_date.clone();
        if let Some(marker) = marker {
            payload.insert("last_activity_date".to_string(), marker);
        }
        self.send(RequestDescriptor::post("/updates", payload)).await
    }

    async fn send(&self, descriptor: RequestDescriptor) -> Result<Value> {
        // Snapshot now; the lock must not be held across the await below
        let token = self.token();
        self.executor
            .execute(&descriptor, token.as_ref().map(|t| t.expose().as_str()))
            .await
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        // Writers only assign whole fields, so a poisoned lock still holds consistent data
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn fields<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
