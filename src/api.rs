// API client module: a small blocking HTTP client for the time-tracking
// server's REST API, plus the server-owned data shapes the rest of the
// crate reads. All mutations are round-tripped through the server; the
// client never edits these records locally.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::ServerSettings;
use crate::error::ApiError;

/// Every request carries these two discrete auth headers (not a bearer
/// scheme).
const AUTH_USER_HEADER: &str = "X-AUTH-USER";
const AUTH_TOKEN_HEADER: &str = "X-AUTH-TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A project as returned by the `projects` list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

/// An activity as returned by the `activities` list endpoint. Activities
/// are scoped to a project via the `project` query filter.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    pub id: i64,
    pub name: String,
    pub customer: Customer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRef {
    pub id: i64,
    pub name: String,
}

/// A time-tracking entry. "Active" means `end` is absent (or not a valid
/// timestamp, which the server can produce for in-progress entries).
#[derive(Debug, Clone, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub project: ProjectRef,
    pub activity: ActivityRef,
    pub begin: String,
    #[serde(default)]
    pub end: Option<String>,
}

impl Measurement {
    pub fn begin_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.begin).ok()
    }

    /// The end timestamp, if present and parseable. `None` means the
    /// measurement is still running.
    pub fn end_time(&self) -> Option<DateTime<FixedOffset>> {
        self.end
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    pub fn is_active(&self) -> bool {
        self.end_time().is_none()
    }

    /// `Project | Activity`, the label used by pickers and plain output.
    pub fn label(&self) -> String {
        format!("{} | {}", self.project.name, self.activity.name)
    }
}

/// Blocking HTTP client holding the reqwest client and connection
/// settings. Cheap to clone; one logical call in flight at a time.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_headers: HeaderMap,
}

impl ApiClient {
    /// Build a client from server settings. Trailing slashes on the base
    /// URL are stripped so endpoint concatenation stays predictable; the
    /// auth headers are built once here.
    pub fn new(settings: &ServerSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        let mut auth_headers = HeaderMap::new();
        auth_headers.insert(
            AUTH_USER_HEADER,
            HeaderValue::from_str(&settings.username)
                .context("Username is not a valid header value")?,
        );
        auth_headers.insert(
            AUTH_TOKEN_HEADER,
            HeaderValue::from_str(&settings.api_token)
                .context("API token is not a valid header value")?,
        );

        Ok(ApiClient {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            auth_headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one authenticated call against `{base}/api/{endpoint}` and
    /// return the parsed JSON payload.
    ///
    /// A payload containing a `message` field signals a server-reported
    /// application error and is surfaced as `ApiError::Server`, whatever
    /// the HTTP method or status was. Transport failures and non-JSON
    /// bodies map to `Transport` and `Parse` respectively. No retries.
    pub fn call(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        debug!(%method, %url, "calling server");

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.auth_headers.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = request.send()?;
        let text = response.text()?;
        let payload: Value = serde_json::from_str(&text)?;
        debug!(?payload, "server response");

        if let Some(message) = payload.get("message").and_then(Value::as_str) {
            return Err(ApiError::Server {
                code: payload.get("code").and_then(Value::as_i64),
                message: message.to_string(),
            });
        }
        Ok(payload)
    }

    /// GET a list endpoint and deserialize the returned array.
    pub fn get_list<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let value = self.call(Method::GET, endpoint, query, None)?;
        Ok(serde_json::from_value(value)?)
    }
}
