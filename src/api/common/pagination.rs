//
//  gitlab-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Headers for GitLab API Responses
//!
//! GitLab list endpoints return a bare JSON array and describe the pagination
//! state in response headers instead of a wrapping envelope. This module reads
//! those headers into a [`PageHeaders`] value that the [`Pager`](crate::api::Pager)
//! uses to drive its cursor.
//!
//! # Headers
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `X-Total` | Total number of items (omitted by GitLab above 10,000 items) |
//! | `X-Total-Pages` | Total number of pages (omitted with `X-Total`) |
//! | `X-Next-Page` | The next page number, empty on the last page |
//! | `Link` | RFC 5988 links with `rel="next"`, `"prev"`, `"first"`, `"last"` |
//!
//! # Offset vs Link Pagination
//!
//! **Offset pagination** (`page` / `per_page` query parameters) works on both
//! API generations and is what random access relies on.
//!
//! **Link pagination** follows the `next` URL from the `Link` header. V4
//! servers always send it; V3 servers may not, in which case the pager falls
//! back to `X-Next-Page` or to the "full page means more pages" heuristic.
//!
//! # Example
//!
//! ```rust
//! use gitlab_client::api::common::parse_link_header;
//!
//! let links = parse_link_header(
//!     r#"<https://gitlab.example.com/api/v4/snippets?page=2&per_page=20>; rel="next", <https://gitlab.example.com/api/v4/snippets?page=1&per_page=20>; rel="first""#,
//! );
//! assert_eq!(
//!     links.next.as_deref(),
//!     Some("https://gitlab.example.com/api/v4/snippets?page=2&per_page=20")
//! );
//! assert!(links.prev.is_none());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches one `<url>; rel="name"` entry of a `Link` header.
static LINK_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([^>]*)>\s*;\s*rel\s*=\s*"?([A-Za-z]+)"?"#).expect("valid link regex")
});

/// Header carrying the total item count.
pub const TOTAL_HEADER: &str = "X-Total";

/// Header carrying the total page count.
pub const TOTAL_PAGES_HEADER: &str = "X-Total-Pages";

/// Header carrying the next page number.
pub const NEXT_PAGE_HEADER: &str = "X-Next-Page";

/// RFC 5988 link header.
pub const LINK_HEADER: &str = "Link";

/// Navigation links parsed from a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// URL of the following page.
    pub next: Option<String>,
    /// URL of the preceding page.
    pub prev: Option<String>,
    /// URL of the first page.
    pub first: Option<String>,
    /// URL of the last page.
    pub last: Option<String>,
}

/// Parses a `Link` header value.
///
/// Unknown relations are ignored. A header with no recognizable entry yields
/// an empty [`PageLinks`].
pub fn parse_link_header(value: &str) -> PageLinks {
    let mut links = PageLinks::default();
    for caps in LINK_ENTRY.captures_iter(value) {
        let url = caps[1].trim().to_string();
        match caps[2].to_ascii_lowercase().as_str() {
            "next" => links.next = Some(url),
            "prev" | "previous" => links.prev = Some(url),
            "first" => links.first = Some(url),
            "last" => links.last = Some(url),
            _ => {}
        }
    }
    links
}

/// Pagination state reported by one list response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageHeaders {
    /// `X-Total`.
    pub total: Option<u64>,
    /// `X-Total-Pages`.
    pub total_pages: Option<u32>,
    /// `X-Next-Page`.
    pub next_page: Option<u32>,
    /// Whether `X-Next-Page` was sent at all, even empty.
    pub next_page_header: bool,
    /// `Link`, when the server sent one.
    pub links: Option<PageLinks>,
}

impl PageHeaders {
    /// Reads the pagination headers out of a response header list.
    ///
    /// Header names are matched case-insensitively. Empty or non-numeric
    /// values are treated as absent; an empty `X-Next-Page` is how GitLab
    /// signals the last page.
    pub fn from_headers(headers: &[(String, String)]) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.trim())
        };

        Self {
            total: find(TOTAL_HEADER).and_then(|v| v.parse().ok()),
            total_pages: find(TOTAL_PAGES_HEADER).and_then(|v| v.parse().ok()),
            next_page: find(NEXT_PAGE_HEADER).and_then(|v| v.parse().ok()),
            next_page_header: find(NEXT_PAGE_HEADER).is_some(),
            links: find(LINK_HEADER).map(parse_link_header),
        }
    }

    /// The `next` link, if the server sent a `Link` header that names one.
    pub fn next_link(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.next.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_link_header_all_relations() {
        let value = concat!(
            r#"<https://gitlab.example.com/api/v4/projects/8/merge_requests?page=2&per_page=3>; rel="prev", "#,
            r#"<https://gitlab.example.com/api/v4/projects/8/merge_requests?page=4&per_page=3>; rel="next", "#,
            r#"<https://gitlab.example.com/api/v4/projects/8/merge_requests?page=1&per_page=3>; rel="first", "#,
            r#"<https://gitlab.example.com/api/v4/projects/8/merge_requests?page=5&per_page=3>; rel="last""#,
        );
        let links = parse_link_header(value);
        assert!(links.next.as_deref().unwrap().ends_with("page=4&per_page=3"));
        assert!(links.prev.as_deref().unwrap().ends_with("page=2&per_page=3"));
        assert!(links.first.as_deref().unwrap().ends_with("page=1&per_page=3"));
        assert!(links.last.as_deref().unwrap().ends_with("page=5&per_page=3"));
    }

    #[test]
    fn test_parse_link_header_garbage() {
        assert_eq!(parse_link_header("not a link header"), PageLinks::default());
        assert_eq!(parse_link_header(""), PageLinks::default());
    }

    #[test]
    fn test_page_headers_case_insensitive() {
        let parsed = PageHeaders::from_headers(&headers(&[
            ("x-total", "250"),
            ("X-TOTAL-PAGES", "3"),
            ("x-next-page", "2"),
        ]));
        assert_eq!(parsed.total, Some(250));
        assert_eq!(parsed.total_pages, Some(3));
        assert_eq!(parsed.next_page, Some(2));
        assert!(parsed.next_page_header);
        assert!(parsed.links.is_none());
        assert!(parsed.next_link().is_none());
    }

    #[test]
    fn test_empty_next_page_is_absent() {
        let parsed = PageHeaders::from_headers(&headers(&[("X-Next-Page", "")]));
        assert_eq!(parsed.next_page, None);
        assert!(parsed.next_page_header);
        assert_eq!(parsed.total, None);

        let parsed = PageHeaders::from_headers(&headers(&[("X-Total", "3")]));
        assert!(!parsed.next_page_header);
    }

    #[test]
    fn test_link_without_next() {
        let parsed = PageHeaders::from_headers(&headers(&[(
            "Link",
            r#"<https://gitlab.example.com/api/v4/snippets?page=1>; rel="first""#,
        )]));
        assert!(parsed.links.is_some());
        assert_eq!(parsed.next_link(), None);
    }
}
