//
//  gitlab-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types and Error Definitions
//!
//! This module provides the error taxonomy shared by every part of the API
//! layer, the explicit "found or absent" lookup type, and the user reference
//! record embedded in most GitLab payloads.
//!
//! # Overview
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`ApiError`] | Every failure the dispatcher, pager, and facades can surface |
//! | [`Lookup`] | Result of an optional lookup (`Found` or `Absent`) |
//! | [`Author`] | Minimal user reference (authors, assignees, participants) |
//!
//! Pagination header parsing lives in the [`pagination`] submodule and is
//! re-exported here.
//!
//! # Error Taxonomy
//!
//! ```text
//! MissingRequiredParameter  client-side, before any network call
//! Transport                 connection / DNS / timeout
//! UnexpectedStatus          the server answered with a code the call does not accept
//! Decode                    the payload did not match the requested type
//! IndexOutOfRange           pager random access beyond the known total
//! InvalidUrl                the configured host URL cannot be parsed
//! ```
//!
//! Nothing in this crate retries. Callers that want to retry can branch on
//! [`ApiError::is_transport`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Boxed error used as the cause of transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the API layer.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the GitLab API layer.
///
/// Every variant carries enough context (status, body, parameter or type
/// name) for a caller to act on it without re-issuing the request.
///
/// # Example
///
/// ```rust,no_run
/// use gitlab_client::api::{ApiError, ApiVersion, GitLabClient};
///
/// let client = GitLabClient::new("https://gitlab.example.com", ApiVersion::V4, None)?;
/// match client.merge_requests().accept(42, 7, &Default::default()) {
///     Ok(mr) => println!("merged !{}", mr.iid),
///     Err(ApiError::UnexpectedStatus { actual: 406, .. }) => println!("not mergeable"),
///     Err(e) => return Err(e),
/// }
/// # Ok::<(), ApiError>(())
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A parameter flagged as required had no value. Raised while building the
    /// parameter set, so the request never reaches the network.
    #[error("Missing required parameter: {name}")]
    MissingRequiredParameter {
        /// The wire name of the missing parameter.
        name: String,
    },

    /// The HTTP exchange itself failed (connection refused, DNS, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server responded, but not with a status the call accepts.
    #[error("{}", describe_status(.actual, .expected, .message, .body))]
    UnexpectedStatus {
        /// The status code the server returned.
        actual: u16,
        /// The status codes the call would have accepted.
        expected: Vec<u16>,
        /// The raw response body.
        body: String,
        /// The human readable message extracted from a GitLab error document.
        message: Option<String>,
    },

    /// The response body could not be decoded into the requested type.
    #[error("Failed to decode response as {target_type}: {source}")]
    Decode {
        /// Name of the Rust type the body was decoded into.
        target_type: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Random access into a pager beyond its known size.
    #[error("{}", describe_range(.index, .total))]
    IndexOutOfRange {
        /// The requested absolute item index.
        index: u64,
        /// The total item count, if the server reported one.
        total: Option<u64>,
    },

    /// The configured host URL is not a valid base URL.
    #[error("Invalid GitLab URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

fn describe_status(actual: &u16, expected: &[u16], message: &Option<String>, body: &str) -> String {
    let expected = expected
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    match message.as_deref() {
        Some(message) => format!("HTTP {} (expected {}): {}", actual, expected, message),
        None if body.is_empty() => format!("HTTP {} (expected {})", actual, expected),
        None => format!("HTTP {} (expected {}): {}", actual, expected, body),
    }
}

fn describe_range(index: &u64, total: &Option<u64>) -> String {
    match total {
        Some(total) => format!("Index {} is out of range (total items: {})", index, total),
        None => format!("Index {} is out of range", index),
    }
}

impl ApiError {
    /// Wraps any transport-level failure.
    pub fn transport<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Transport(cause.into())
    }

    /// Builds an [`ApiError::UnexpectedStatus`], extracting the platform's
    /// error message from the body when there is one.
    pub fn unexpected_status(actual: u16, expected: &[u16], body: String) -> Self {
        let message = extract_error_message(&body);
        Self::UnexpectedStatus {
            actual,
            expected: expected.to_vec(),
            body,
            message,
        }
    }

    /// The HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }

    /// Returns `true` for a 404 answer.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` for 401 and 403 answers.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns `true` when the exchange failed below HTTP, which is the only
    /// class of failure that is safe to consider retrying.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Extracts a human readable message from a GitLab error body.
///
/// GitLab returns errors in a handful of shapes:
///
/// ```json
/// {"message": "404 Project Not Found"}
/// {"message": ["Another open merge request already exists"]}
/// {"message": {"title": ["can't be blank"]}}
/// {"error": "invalid_token", "error_description": "Token was revoked"}
/// ```
///
/// Returns `None` when the body is not JSON or matches none of them.
pub fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(message) = json.get("message") {
        return flatten_message(message);
    }

    if let Some(description) = json.get("error_description").and_then(|d| d.as_str()) {
        return Some(description.to_string());
    }

    json.get("error")
        .and_then(|e| e.as_str())
        .map(|e| e.to_string())
}

fn flatten_message(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_message).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        serde_json::Value::Object(fields) => {
            let parts: Vec<String> = fields
                .iter()
                .filter_map(|(field, errors)| {
                    flatten_message(errors).map(|e| format!("{} {}", field, e))
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

/// The outcome of an optional lookup.
///
/// Returned by the `get_optional` family of facade methods. Only a 404 from
/// the server becomes [`Lookup::Absent`]; transport failures and every other
/// status still surface as errors.
///
/// # Example
///
/// ```rust,no_run
/// use gitlab_client::api::{ApiVersion, GitLabClient, Lookup};
///
/// let client = GitLabClient::new("https://gitlab.com", ApiVersion::V4, None)?;
/// match client.snippets().get_optional(1234)? {
///     Lookup::Found(snippet) => println!("{}", snippet.title),
///     Lookup::Absent => println!("no such snippet"),
/// }
/// # Ok::<(), gitlab_client::api::ApiError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The resource exists.
    Found(T),
    /// The server answered 404.
    Absent,
}

impl<T> Lookup<T> {
    /// Returns `true` if the resource was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Converts into a plain [`Option`].
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Maps the found value.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::Absent => Lookup::Absent,
        }
    }
}

impl<T> From<Lookup<T>> for Option<T> {
    fn from(lookup: Lookup<T>) -> Self {
        lookup.into_option()
    }
}

/// Minimal user reference embedded in GitLab payloads.
///
/// Used for merge request authors and assignees, snippet authors, and
/// merge request participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Global numeric user ID.
    pub id: u64,

    /// Login name.
    pub username: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Account state (`active`, `blocked`).
    #[serde(default)]
    pub state: Option<String>,

    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Profile page URL.
    #[serde(default)]
    pub web_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_string_message() {
        let body = r#"{"message": "404 Project Not Found"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("404 Project Not Found")
        );
    }

    #[test]
    fn test_extract_list_and_field_messages() {
        let body = r#"{"message": ["Another open merge request already exists"]}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Another open merge request already exists")
        );

        let body = r#"{"message": {"title": ["can't be blank"]}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("title can't be blank")
        );
    }

    #[test]
    fn test_extract_oauth_error() {
        let body = r#"{"error": "invalid_token", "error_description": "Token was revoked"}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Token was revoked"));
        assert_eq!(
            extract_error_message(r#"{"error": "insufficient_scope"}"#).as_deref(),
            Some("insufficient_scope")
        );
    }

    #[test]
    fn test_extract_non_json() {
        assert_eq!(extract_error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(extract_error_message(""), None);
    }

    #[test]
    fn test_unexpected_status_display() {
        let err = ApiError::unexpected_status(
            406,
            &[200],
            r#"{"message": "405 Method Not Allowed"}"#.to_string(),
        );
        assert_eq!(err.status(), Some(406));
        assert_eq!(err.to_string(), "HTTP 406 (expected 200): 405 Method Not Allowed");

        let err = ApiError::unexpected_status(500, &[200, 204], String::new());
        assert_eq!(err.to_string(), "HTTP 500 (expected 200 or 204)");
    }

    #[test]
    fn test_error_classification() {
        assert!(ApiError::unexpected_status(404, &[200], String::new()).is_not_found());
        assert!(ApiError::unexpected_status(401, &[200], String::new()).is_auth_failure());
        assert!(ApiError::transport("connection refused").is_transport());
        assert!(!ApiError::transport("connection refused").is_not_found());
        let missing = ApiError::MissingRequiredParameter {
            name: "title".to_string(),
        };
        assert_eq!(missing.status(), None);
        assert_eq!(missing.to_string(), "Missing required parameter: title");
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = ApiError::IndexOutOfRange {
            index: 300,
            total: Some(250),
        };
        assert_eq!(err.to_string(), "Index 300 is out of range (total items: 250)");
    }

    #[test]
    fn test_lookup_conversions() {
        let found = Lookup::Found(3).map(|v| v * 2);
        assert!(found.is_found());
        assert_eq!(found.into_option(), Some(6));
        let absent: Option<u32> = Lookup::<u32>::Absent.into();
        assert_eq!(absent, None);
    }
}
