//
//  gitlab-client
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! The request dispatcher describes each call as a plain-data [`HttpRequest`]
//! and receives a plain-data [`HttpResponse`]. Executing the exchange is the
//! job of an [`HttpTransport`], injected into the client at construction.
//!
//! ## Why a Trait
//!
//! TLS, connection pooling, proxies, timeouts, and attaching the
//! authentication header all live behind this seam. The default
//! implementation is [`ReqwestTransport`], a blocking `reqwest` client. Tests
//! swap in a recording transport that never touches the network.
//!
//! ## Decoding
//!
//! A successful response is handed back un-decoded. Facades call
//! [`HttpResponse::decode`] or [`HttpResponse::decode_list`] to turn the JSON
//! body into a typed value; a shape mismatch surfaces as
//! [`ApiError::Decode`](crate::api::ApiError::Decode), distinct from
//! transport and status failures.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::api::common::{ApiError, PageHeaders, Result};
use crate::auth::Credential;

/// Content type of form-encoded request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// The verb as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether parameters travel in the body (`POST`, `PUT`) rather than the
    /// query string (`GET`, `DELETE`).
    pub fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The verb.
    pub method: Method,
    /// Absolute URL, query string included.
    pub url: String,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// Form-encoded body for `POST` / `PUT`.
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers in the order received.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Looks up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The pagination headers carried by this response.
    pub fn page_headers(&self) -> PageHeaders {
        PageHeaders::from_headers(&self.headers)
    }

    /// Decodes the JSON body into a single value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] naming `T` if the body does not match.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| ApiError::Decode {
            target_type: std::any::type_name::<T>(),
            source,
        })
    }

    /// Decodes the JSON body into an ordered list of `T`.
    ///
    /// A single object where a list was expected is a decode failure, never
    /// a one-element list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] naming `T` if the body is not a JSON
    /// array of `T`.
    pub fn decode_list<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        serde_json::from_str(&self.body).map_err(|source| ApiError::Decode {
            target_type: std::any::type_name::<T>(),
            source,
        })
    }

    /// The raw body text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Consumes the response, returning the raw body text.
    pub fn into_text(self) -> String {
        self.body
    }
}

/// Executes HTTP exchanges on behalf of the request dispatcher.
///
/// Implementations block until the exchange completes or times out. Any
/// status code is a successful exchange; only failures below HTTP
/// (connection, DNS, TLS, timeout) are reported as [`ApiError::Transport`].
pub trait HttpTransport: Send + Sync {
    /// Performs one request.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// The default transport: a blocking `reqwest` client.
///
/// Sets the `User-Agent` and `Accept` headers, applies the configured
/// [`Credential`], and enforces the timeout.
pub struct ReqwestTransport {
    http: Client,
    credential: Option<Credential>,
}

impl ReqwestTransport {
    /// Creates a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(credential: Option<Credential>) -> Result<Self> {
        Self::with_timeout(credential, DEFAULT_TIMEOUT)
    }

    /// Creates a transport with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn with_timeout(credential: Option<Credential>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .timeout(timeout)
            .build()
            .map_err(ApiError::transport)?;
        Ok(Self { http, credential })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .http
            .request(method, &request.url)
            .header(reqwest::header::ACCEPT, "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.clone());
        }

        if let Some(credential) = &self.credential {
            builder = credential.apply_to_request(builder);
        }

        let response = builder.send().map_err(ApiError::transport)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().map_err(ApiError::transport)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A transport that records requests and replays canned responses.
#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    pub(crate) struct MockTransport {
        requests: Arc<Mutex<Vec<HttpRequest>>>,
        responses: Arc<Mutex<VecDeque<Result<HttpResponse>>>>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(&self, status: u16, headers: &[(&str, &str)], body: &str) {
            let response = HttpResponse {
                status,
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.to_string(),
            };
            self.responses.lock().unwrap().push_back(Ok(response));
        }

        pub(crate) fn fail(&self, message: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(ApiError::transport(message.to_string())));
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl HttpTransport for MockTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("no canned response for {} {}", request.method, request.url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
    }

    fn response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![("X-Total".to_string(), "2".to_string())],
            body: body.to_string(),
        }
    }

    #[test]
    fn test_decode_single_and_list() {
        assert_eq!(response(r#"{"id": 7}"#).decode::<Item>().unwrap(), Item { id: 7 });
        assert_eq!(
            response(r#"[{"id": 1}, {"id": 2}]"#).decode_list::<Item>().unwrap(),
            vec![Item { id: 1 }, Item { id: 2 }]
        );
    }

    #[test]
    fn test_no_shape_coercion() {
        let err = response(r#"{"id": 7}"#).decode_list::<Item>().unwrap_err();
        match err {
            ApiError::Decode { target_type, .. } => assert!(target_type.ends_with("Item")),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(response(r#"[{"id": 7}]"#).decode::<Item>().is_err());
    }

    #[test]
    fn test_header_lookup() {
        let resp = response("[]");
        assert_eq!(resp.header("x-total"), Some("2"));
        assert_eq!(resp.page_headers().total, Some(2));
        assert_eq!(resp.header("Link"), None);
    }

    #[test]
    fn test_method_body_placement() {
        assert!(Method::Post.carries_body());
        assert!(Method::Put.carries_body());
        assert!(!Method::Get.carries_body());
        assert!(!Method::Delete.carries_body());
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
