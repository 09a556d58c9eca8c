//
//  gitlab-client
//  api/snippets.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Personal snippet API types and operations.
//!
//! Snippets are small, single-file pastes owned by the authenticated user.
//! The listing and lookup endpoints return metadata only; the file body is
//! served separately from `snippets/:id/raw`. Passing `download_content =
//! true` makes the facade fetch that body and store it in
//! [`Snippet::content`], one extra request per snippet.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab_client::api::{ApiVersion, CreateSnippet, GitLabClient, Visibility};
//!
//! let client = GitLabClient::new("https://gitlab.com", ApiVersion::V4, None)?;
//!
//! let request = CreateSnippet {
//!     visibility: Some(Visibility::Private),
//!     ..CreateSnippet::new("hello", "hello.rs", "fn main() {}")
//! };
//! let snippet = client.snippets().create(&request)?;
//!
//! let body = client.snippets().content(snippet.id)?;
//! assert_eq!(body, "fn main() {}");
//! # Ok::<(), gitlab_client::api::ApiError>(())
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::{Expected, GitLabClient};
use super::common::{Author, Lookup, Result};
use super::form::{ApiForm, ParamValue, Params};
use super::pager::Pager;

/// Who can see a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Anyone, without authentication.
    Public,
    /// Any signed-in user.
    Internal,
    /// Only the owner.
    Private,
}

impl Visibility {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "private" => Ok(Self::Private),
            other => Err(format!(
                "unknown visibility '{}' (expected public, internal, or private)",
                other
            )),
        }
    }
}

impl ParamValue for Visibility {
    fn to_param_value(&self) -> Option<String> {
        Some(self.as_str().to_string())
    }
}

/// A personal snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    /// Global ID.
    pub id: u64,

    /// Title.
    pub title: String,

    /// Name of the single file.
    #[serde(default)]
    pub file_name: Option<String>,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Visibility level.
    #[serde(default)]
    pub visibility: Option<Visibility>,

    /// Owner.
    #[serde(default)]
    pub author: Option<Author>,

    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Browser URL.
    #[serde(default)]
    pub web_url: Option<String>,

    /// URL of the raw file body.
    #[serde(default)]
    pub raw_url: Option<String>,

    /// File body, filled in locally when requested with `download_content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Input of [`SnippetsApi::create`].
///
/// `title`, `file_name`, and `content` are required.
#[derive(Debug, Clone, Default)]
pub struct CreateSnippet {
    /// Title.
    pub title: Option<String>,
    /// File name, used for syntax highlighting.
    pub file_name: Option<String>,
    /// File body.
    pub content: Option<String>,
    /// Visibility; the instance default when unset.
    pub visibility: Option<Visibility>,
    /// Description.
    pub description: Option<String>,
}

impl CreateSnippet {
    /// Creates a request with the three required fields set.
    pub fn new(
        title: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            file_name: Some(file_name.into()),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    fn to_params(&self) -> Result<Params> {
        ApiForm::new()
            .with_required_param("title", self.title.as_deref())
            .with_required_param("file_name", self.file_name.as_deref())
            .with_required_param("content", self.content.as_deref())
            .with_param("visibility", self.visibility)
            .with_param("description", self.description.as_deref())
            .build()
    }
}

/// Snippet operations. Obtained from [`GitLabClient::snippets`].
#[derive(Debug, Clone, Copy)]
pub struct SnippetsApi<'a> {
    client: &'a GitLabClient,
}

impl<'a> SnippetsApi<'a> {
    pub(crate) fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// Creates a snippet.
    ///
    /// `POST /snippets`
    ///
    /// # Errors
    ///
    /// [`MissingRequiredParameter`](crate::api::ApiError::MissingRequiredParameter)
    /// before any request if `title`, `file_name`, or `content` is unset or
    /// blank; otherwise any dispatch or decode failure.
    pub fn create(&self, request: &CreateSnippet) -> Result<Snippet> {
        let params = request.to_params()?;
        self.client
            .post(Expected::CREATED, Some(&params), &[&"snippets"])?
            .decode()
    }

    /// Deletes a snippet.
    ///
    /// `DELETE /snippets/:id`
    ///
    /// # Errors
    ///
    /// Returns an error unless the server answers `204 No Content`.
    pub fn delete(&self, id: u64) -> Result<()> {
        self.client
            .delete(Expected::NO_CONTENT, None, &[&"snippets", &id])?;
        Ok(())
    }

    /// Lists the authenticated user's snippets, first page at the client's
    /// default page size.
    ///
    /// `GET /snippets`
    ///
    /// With `download_content`, each snippet's body is fetched as well.
    ///
    /// # Errors
    ///
    /// Returns the first failure, including a failed content download.
    pub fn list(&self, download_content: bool) -> Result<Vec<Snippet>> {
        let params = Params::per_page_param(self.client.default_per_page());
        let mut snippets: Vec<Snippet> = self
            .client
            .get(Expected::OK, Some(&params), &[&"snippets"])?
            .decode_list()?;

        if download_content {
            for snippet in &mut snippets {
                snippet.content = Some(self.content(snippet.id)?);
            }
        }
        Ok(snippets)
    }

    /// A lazy pager over the authenticated user's snippets.
    ///
    /// `GET /snippets`
    pub fn pager(&self, items_per_page: u32) -> Pager<'a, Snippet> {
        self.client.pager(items_per_page, None, &[&"snippets"])
    }

    /// Fetches a snippet's raw file body.
    ///
    /// `GET /snippets/:id/raw`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn content(&self, id: u64) -> Result<String> {
        Ok(self
            .client
            .get(Expected::OK, None, &[&"snippets", &id, &"raw"])?
            .into_text())
    }

    /// Fetches one snippet, with its body if `download_content` is set.
    ///
    /// `GET /snippets/:id`
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails or the response cannot be
    /// decoded.
    pub fn get(&self, id: u64, download_content: bool) -> Result<Snippet> {
        let mut snippet: Snippet = self
            .client
            .get(Expected::OK, None, &[&"snippets", &id])?
            .decode()?;

        if download_content {
            snippet.content = Some(self.content(snippet.id)?);
        }
        Ok(snippet)
    }

    /// Fetches one snippet's metadata, reporting a `404` as
    /// [`Lookup::Absent`].
    ///
    /// # Errors
    ///
    /// Every failure other than not-found propagates.
    pub fn get_optional(&self, id: u64) -> Result<Lookup<Snippet>> {
        GitLabClient::optional(self.get(id, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiVersion;
    use crate::api::common::ApiError;
    use crate::api::transport::mock::MockTransport;
    use crate::api::transport::Method;

    fn client() -> (GitLabClient, MockTransport) {
        let transport = MockTransport::new();
        let client = GitLabClient::with_transport(
            "https://gitlab.example.com",
            ApiVersion::V4,
            Box::new(transport.clone()),
        )
        .unwrap();
        (client, transport)
    }

    fn snippet_json(id: u64, title: &str) -> String {
        format!(
            r#"{{"id": {}, "title": "{}", "file_name": "main.rs", "visibility": "private",
                "author": {{"id": 1, "username": "root"}},
                "web_url": "https://gitlab.example.com/snippets/{}"}}"#,
            id, title, id
        )
    }

    #[test]
    fn test_create_requires_content() {
        let (client, transport) = client();
        let request = CreateSnippet {
            title: Some("t".to_string()),
            file_name: Some("f.rs".to_string()),
            content: Some(String::new()),
            ..Default::default()
        };

        let err = client.snippets().create(&request).unwrap_err();
        assert!(matches!(err, ApiError::MissingRequiredParameter { name } if name == "content"));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_create() {
        let (client, transport) = client();
        transport.respond(201, &[], &snippet_json(9, "hello"));

        let request = CreateSnippet {
            visibility: Some(Visibility::Private),
            ..CreateSnippet::new("hello", "main.rs", "fn main() {}")
        };
        let snippet = client.snippets().create(&request).unwrap();
        assert_eq!(snippet.id, 9);
        assert_eq!(snippet.visibility, Some(Visibility::Private));

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.body.as_deref(),
            Some("title=hello&file_name=main.rs&content=fn+main%28%29+%7B%7D&visibility=private")
        );
    }

    #[test]
    fn test_delete_expects_no_content() {
        let (client, transport) = client();
        transport.respond(204, &[], "");
        transport.respond(200, &[], "");

        assert!(client.snippets().delete(9).is_ok());
        assert_eq!(client.snippets().delete(9).unwrap_err().status(), Some(200));
        assert_eq!(transport.requests()[0].url, "https://gitlab.example.com/api/v4/snippets/9");
    }

    #[test]
    fn test_list_uses_default_page_size() {
        let (client, transport) = client();
        transport.respond(200, &[], &format!("[{}, {}]", snippet_json(1, "a"), snippet_json(2, "b")));

        let snippets = client.snippets().list(false).unwrap();
        assert_eq!(snippets.len(), 2);
        assert!(snippets.iter().all(|s| s.content.is_none()));
        assert_eq!(transport.requests()[0].url, "https://gitlab.example.com/api/v4/snippets?per_page=96");
    }

    #[test]
    fn test_list_with_content_downloads_each() {
        let (client, transport) = client();
        transport.respond(200, &[], &format!("[{}, {}]", snippet_json(1, "a"), snippet_json(2, "b")));
        transport.respond(200, &[], "first body");
        transport.respond(200, &[], "second body");

        let snippets = client.snippets().list(true).unwrap();
        assert_eq!(snippets[0].content.as_deref(), Some("first body"));
        assert_eq!(snippets[1].content.as_deref(), Some("second body"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[1].url.ends_with("/snippets/1/raw"));
        assert!(requests[2].url.ends_with("/snippets/2/raw"));
    }

    #[test]
    fn test_get_with_and_without_content() {
        let (client, transport) = client();
        transport.respond(200, &[], &snippet_json(4, "x"));
        transport.respond(200, &[], &snippet_json(4, "x"));
        transport.respond(200, &[], "body");

        assert!(client.snippets().get(4, false).unwrap().content.is_none());
        assert_eq!(client.snippets().get(4, true).unwrap().content.as_deref(), Some("body"));
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn test_get_optional_absent() {
        let (client, transport) = client();
        transport.respond(404, &[], r#"{"message": "404 Snippet Not Found"}"#);

        assert_eq!(client.snippets().get_optional(4).unwrap().into_option().map(|s| s.id), None);
    }

    #[test]
    fn test_pager() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "1")], &format!("[{}]", snippet_json(1, "a")));

        let all = client.snippets().pager(500).all().unwrap();
        assert_eq!(all.len(), 1);
        assert!(transport.requests()[0].url.ends_with("/snippets?page=1&per_page=100"));
    }
}
