// Error taxonomy for API interactions. Every variant aborts only the
// current operation; the interactive menu loop catches at the operation
// boundary and keeps running.

use thiserror::Error;

/// Errors surfaced by the API client and the domain operations built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response (DNS, connection,
    /// timeout). Carries the underlying reqwest cause.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a JSON payload containing a `message`
    /// field. This is an application-level error regardless of the HTTP
    /// status or method used.
    #[error("server error: {message}")]
    Server {
        code: Option<i64>,
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("invalid JSON in response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// A name-to-id lookup matched nothing.
    #[error("no {kind} named \"{name}\"")]
    NotFound { kind: &'static str, name: String },
}
