//! Request execution against the Tinder API
//!
//! `Executor` turns a `RequestDescriptor` into one HTTP round-trip. Option
//! construction (`configure_options`) is pure so header and body rules can be
//! checked without a network; `execute` sends the request and normalizes the
//! outcome. The executor never touches session state: the caller passes the
//! credential it wants attached, read at the moment the request is built.

use std::fmt;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::{AUTH_HEADER, CONTENT_TYPE_JSON};
use crate::error::{Error, Result};
use crate::form;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// One outgoing call: method, path relative to the base URL, optional payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub payload: Option<Map<String, Value>>,
}

impl RequestDescriptor {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            payload: None,
        }
    }

    pub fn post(path: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            payload: Some(payload),
        }
    }
}

/// A descriptor rendered into everything needed to send it.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    /// Form pairs for the body; always `None` for GET
    pub form: Option<Vec<(String, String)>>,
}

/// Sends requests to a fixed base URL.
#[derive(Debug, Clone)]
pub struct Executor {
    client: reqwest::Client,
    base_url: String,
}

impl Executor {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build URL, headers and body for `descriptor`.
    ///
    /// `Content-Type: application/json` is always set, even though POST
    /// bodies are form-encoded; the service expects exactly that pairing.
    /// `X-Auth-Token` is present if and only if `credential` is a non-empty token.
    pub fn configure_options(
        &self,
        descriptor: &RequestDescriptor,
        credential: Option<&str>,
    ) -> Result<RequestOptions> {
        if !descriptor.path.starts_with('/') {
            return Err(Error::InvalidArgument(format!(
                "request path must start with '/', got: {:?}",
                descriptor.path
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        if let Some(token) = credential.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(token).map_err(|e| {
                Error::InvalidArgument(format!("session token is not a valid header value: {e}"))
            })?;
            value.set_sensitive(true);
            headers.insert(AUTH_HEADER, value);
        }

        // GET endpoints carry their parameters in the path
        let form = match descriptor.method {
            Method::Get => None,
            Method::Post => Some(
                descriptor
                    .payload
                    .as_ref()
                    .map(form::encode)
                    .unwrap_or_default(),
            ),
        };

        Ok(RequestOptions {
            method: descriptor.method,
            url: format!("{}{}", self.base_url, descriptor.path),
            headers,
            form,
        })
    }

    /// Send one request and normalize the outcome. No retries.
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        credential: Option<&str>,
    ) -> Result<Value> {
        let options = self.configure_options(descriptor, credential)?;

        debug!(
            method = %options.method,
            path = %descriptor.path,
            authenticated = credential.is_some(),
            "sending request"
        );

        let mut builder = self.client.request(options.method.into(), &options.url);
        if let Some(pairs) = &options.form {
            builder = builder.form(pairs);
        }
        // Applied after the form so the announced content type wins
        let response = builder.headers(options.headers).send().await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(
            method = %options.method,
            path = %descriptor.path,
            status,
            "received response"
        );

        parse_response(status, &body)
    }
}

/// Parse first, then check the status.
///
/// An unparseable body is a `Parse` error even on 200; a parseable body on
/// anything other than exactly 200 is an `Api` error carrying that body.
pub fn parse_response(status: u16, body: &[u8]) -> Result<Value> {
    let data: Value = serde_json::from_slice(body).map_err(Error::Parse)?;
    if status == 200 {
        Ok(data)
    } else {
        Err(Error::Api { status, body: data })
    }
}
