//
//  gitlab-client
//  api/pager.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Lazy Page Iterator
//!
//! A [`Pager`] turns a paginated GitLab list endpoint into a sequence that is
//! fetched on demand. It supports walking page by page, random access by
//! absolute item index, and total-count introspection.
//!
//! ## States
//!
//! ```text
//!  Unfetched ──first()/next_page()/get()/total_items()──▶ Buffered ──▶ Exhausted
//!                                                          ▲    │
//!                                                          └────┘ next_page() / get() / page()
//! ```
//!
//! - **Unfetched**: constructed, nothing requested yet
//! - **Buffered**: one page is in memory and more pages may follow
//! - **Exhausted**: the buffered page is the last one (or came back empty)
//!
//! Only one page is held at a time. Random access to another page discards
//! the buffer and fetches the owning page directly, without walking the pages
//! in between.
//!
//! ## Page Size
//!
//! GitLab accepts at most [`MAX_ITEMS_PER_PAGE`] items per page. Larger
//! requests are capped silently: asking for 500 per page fetches 100 per
//! page and is not an error.
//!
//! ## Total Count
//!
//! The total comes from the `X-Total` header of the first response that
//! carries it and is then trusted for the pager's lifetime. GitLab omits it
//! for very large collections; the pager then relies on the `Link` header,
//! then `X-Next-Page`, and failing those on "a full page means there may be
//! another".
//!
//! ## Failures
//!
//! A failed fetch (transport, status, or decode) propagates unchanged and
//! leaves the pager exactly as it was before the call.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gitlab_client::api::{ApiVersion, GitLabClient};
//!
//! let client = GitLabClient::new("https://gitlab.com", ApiVersion::V4, None)?;
//! let mut pager = client.merge_requests().project_merge_requests_pager(42, None, 100)?;
//!
//! println!("{:?} merge requests", pager.total_items()?);
//! let last = pager.get(249)?;
//! println!("!{} {}", last.iid, last.title);
//!
//! while let Some(page) = pager.next_page()? {
//!     for mr in page {
//!         println!("!{} {}", mr.iid, mr.title);
//!     }
//! }
//! # Ok::<(), gitlab_client::api::ApiError>(())
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::client::{Expected, GitLabClient};
use super::common::{ApiError, PageHeaders, Result};
use super::form::Params;

/// The largest page size GitLab accepts.
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

/// Where a [`Pager`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing has been fetched.
    Unfetched,
    /// A page is buffered and more may follow.
    Buffered,
    /// The buffered page is the last one.
    Exhausted,
}

struct PageCursor<T> {
    state: PagerState,
    /// 1-based; 0 while unfetched
    current_page: u32,
    total_items: Option<u64>,
    total_pages: Option<u32>,
    next_link: Option<String>,
    link_header_seen: bool,
    /// `Some` when the last response carried `X-Next-Page`
    next_page_reported: Option<bool>,
    items: Vec<T>,
}

impl<T> PageCursor<T> {
    fn new() -> Self {
        Self {
            state: PagerState::Unfetched,
            current_page: 0,
            total_items: None,
            total_pages: None,
            next_link: None,
            link_header_seen: false,
            next_page_reported: None,
            items: Vec::new(),
        }
    }

    fn has_more_after_current(&self, items_per_page: u32) -> bool {
        if let Some(total) = self.total_items {
            return u64::from(self.current_page) * u64::from(items_per_page) < total;
        }
        if self.link_header_seen {
            return self.next_link.is_some();
        }
        if let Some(reported) = self.next_page_reported {
            return reported;
        }
        if let Some(total_pages) = self.total_pages {
            return self.current_page < total_pages;
        }
        self.items.len() >= items_per_page as usize
    }

    /// Installs a freshly fetched page. Only called once the fetch fully
    /// succeeded.
    fn commit(&mut self, page: u32, items: Vec<T>, headers: PageHeaders, items_per_page: u32) {
        if self.total_items.is_none() {
            self.total_items = headers.total;
        }
        if self.total_pages.is_none() {
            self.total_pages = headers.total_pages;
        }
        self.link_header_seen = headers.links.is_some();
        self.next_link = headers.next_link().map(str::to_string);
        self.next_page_reported = headers
            .next_page_header
            .then_some(headers.next_page.is_some());
        self.current_page = page;
        self.items = items;
        self.state = if self.items.is_empty() || !self.has_more_after_current(items_per_page) {
            PagerState::Exhausted
        } else {
            PagerState::Buffered
        };
    }
}

/// A lazy, page-buffering view over a GitLab list endpoint.
///
/// Created through [`GitLabClient::pager`] or the `*_pager` methods of the
/// facades. Borrows the client; not meant to be shared between threads.
pub struct Pager<'a, T> {
    client: &'a GitLabClient,
    segments: Vec<String>,
    params: Params,
    items_per_page: u32,
    cursor: PageCursor<T>,
}

impl<T> fmt::Debug for Pager<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager")
            .field("path", &self.segments.join("/"))
            .field("items_per_page", &self.items_per_page)
            .field("state", &self.cursor.state)
            .field("current_page", &self.cursor.current_page)
            .field("total_items", &self.cursor.total_items)
            .finish()
    }
}

impl<'a, T: DeserializeOwned> Pager<'a, T> {
    pub(crate) fn new(
        client: &'a GitLabClient,
        items_per_page: u32,
        params: Params,
        segments: Vec<String>,
    ) -> Self {
        let capped = items_per_page.clamp(1, MAX_ITEMS_PER_PAGE);
        if capped != items_per_page {
            debug!(requested = items_per_page, applied = capped, "items per page adjusted to the platform limit");
        }
        Self {
            client,
            segments,
            params,
            items_per_page: capped,
            cursor: PageCursor::new(),
        }
    }

    /// The page size actually used, after capping.
    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// The current state.
    pub fn state(&self) -> PagerState {
        self.cursor.state
    }

    /// The number of the buffered page, or `None` before the first fetch.
    pub fn current_page(&self) -> Option<u32> {
        (self.cursor.state != PagerState::Unfetched).then_some(self.cursor.current_page)
    }

    /// The buffered items. Empty before the first fetch.
    pub fn current(&self) -> &[T] {
        &self.cursor.items
    }

    /// The total item count if it is already known, without fetching.
    pub fn known_total_items(&self) -> Option<u64> {
        self.cursor.total_items
    }

    /// Whether another page may follow the buffered one.
    ///
    /// Always `true` before the first fetch.
    pub fn has_next(&self) -> bool {
        match self.cursor.state {
            PagerState::Unfetched | PagerState::Buffered => true,
            PagerState::Exhausted => false,
        }
    }

    /// Fetches page 1 (a no-op if page 1 is already buffered).
    ///
    /// # Errors
    ///
    /// Propagates the dispatcher's or decoder's failure; the pager is left
    /// unchanged.
    pub fn first(&mut self) -> Result<&[T]> {
        self.fetch(1)?;
        Ok(&self.cursor.items)
    }

    /// Fetches the page after the buffered one.
    ///
    /// Before the first fetch this fetches page 1. Follows the server's
    /// `next` link when one was supplied and points at the client's host,
    /// otherwise asks for the next page number. Returns `None`, without a
    /// request, once the pager is exhausted, and also when the fetched page
    /// comes back empty.
    ///
    /// # Errors
    ///
    /// Propagates the dispatcher's or decoder's failure; the pager is left
    /// unchanged.
    pub fn next_page(&mut self) -> Result<Option<&[T]>> {
        let page = match self.cursor.state {
            PagerState::Unfetched => 1,
            PagerState::Buffered => match self.cursor.current_page.checked_add(1) {
                Some(next) => next,
                None => {
                    self.cursor.state = PagerState::Exhausted;
                    return Ok(None);
                }
            },
            PagerState::Exhausted => return Ok(None),
        };
        self.fetch(page)?;
        if self.cursor.items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(&self.cursor.items))
        }
    }

    /// Fetches an explicit page number (1-based; 0 is treated as 1).
    ///
    /// # Errors
    ///
    /// Propagates the dispatcher's or decoder's failure; the pager is left
    /// unchanged.
    pub fn page(&mut self, page: u32) -> Result<&[T]> {
        self.fetch(page.max(1))?;
        Ok(&self.cursor.items)
    }

    /// Returns the item at an absolute index.
    ///
    /// The owning page is `index / items_per_page + 1`. It is fetched only if
    /// it is not the buffered page; pages in between are never requested.
    ///
    /// # Errors
    ///
    /// - [`ApiError::IndexOutOfRange`] if `index` is at or beyond the known
    ///   total (checked before any request), or beyond the end of the
    ///   fetched page
    /// - the dispatcher's or decoder's failure, leaving the pager unchanged
    pub fn get(&mut self, index: u64) -> Result<&T> {
        self.check_range(index)?;

        let per_page = u64::from(self.items_per_page);
        let page = (index / per_page)
            .checked_add(1)
            .and_then(|page| u32::try_from(page).ok())
            .ok_or(ApiError::IndexOutOfRange {
                index,
                total: self.cursor.total_items,
            })?;
        self.fetch(page)?;
        self.check_range(index)?;

        let total = self.cursor.total_items;
        usize::try_from(index % per_page)
            .ok()
            .and_then(|offset| self.cursor.items.get(offset))
            .ok_or(ApiError::IndexOutOfRange { index, total })
    }

    /// The total item count, fetching page 1 first if nothing has been
    /// fetched yet.
    ///
    /// Returns `None` when the server does not report a total.
    ///
    /// # Errors
    ///
    /// Propagates the failure of the initial fetch.
    pub fn total_items(&mut self) -> Result<Option<u64>> {
        if self.cursor.state == PagerState::Unfetched {
            self.fetch(1)?;
        }
        Ok(self.cursor.total_items)
    }

    /// The total page count, fetching page 1 first if nothing has been
    /// fetched yet.
    ///
    /// # Errors
    ///
    /// Propagates the failure of the initial fetch.
    pub fn total_pages(&mut self) -> Result<Option<u32>> {
        let total_items = self.total_items()?;
        Ok(self.cursor.total_pages.or_else(|| {
            total_items.and_then(|total| {
                u32::try_from(total.div_ceil(u64::from(self.items_per_page))).ok()
            })
        }))
    }

    /// Consumes the pager and collects every item, starting from page 1.
    ///
    /// # Errors
    ///
    /// Stops at the first failed fetch and returns its error.
    pub fn all(self) -> Result<Vec<T>> {
        self.into_items().collect()
    }

    /// Consumes the pager into an iterator over every item, starting from
    /// page 1 and fetching pages as it goes.
    ///
    /// A buffered page 1 is reused. After a failed fetch the iterator yields
    /// the error once and then ends.
    pub fn into_items(mut self) -> PagerItems<'a, T> {
        let buffer = if self.cursor.state != PagerState::Unfetched && self.cursor.current_page == 1 {
            std::mem::take(&mut self.cursor.items)
        } else {
            self.reset();
            Vec::new()
        };
        PagerItems {
            pager: self,
            buffer: buffer.into_iter(),
            done: false,
        }
    }

    fn check_range(&self, index: u64) -> Result<()> {
        match self.cursor.total_items {
            Some(total) if index >= total => Err(ApiError::IndexOutOfRange {
                index,
                total: Some(total),
            }),
            _ => Ok(()),
        }
    }

    fn reset(&mut self) {
        self.cursor.state = PagerState::Unfetched;
        self.cursor.current_page = 0;
        self.cursor.next_link = None;
        self.cursor.link_header_seen = false;
        self.cursor.next_page_reported = None;
        self.cursor.items.clear();
    }

    fn fetch(&mut self, page: u32) -> Result<()> {
        if self.cursor.state != PagerState::Unfetched && self.cursor.current_page == page {
            return Ok(());
        }

        let follow_link = self.cursor.state != PagerState::Unfetched
            && self.cursor.current_page.checked_add(1) == Some(page);
        let link = self
            .cursor
            .next_link
            .as_deref()
            .filter(|_| follow_link)
            .filter(|link| {
                let same_origin = self.client.is_same_origin(link);
                if !same_origin {
                    warn!(link, "ignoring next link to another host");
                }
                same_origin
            });
        let response = match link {
            Some(link) => {
                debug!(page, link, "fetching page via next link");
                self.client.get_url(Expected::OK, link)?
            }
            None => {
                debug!(page, per_page = self.items_per_page, path = %self.segments.join("/"), "fetching page");
                let params = self.params.with_page(page, self.items_per_page);
                let segments: Vec<&dyn fmt::Display> =
                    self.segments.iter().map(|s| s as &dyn fmt::Display).collect();
                self.client.get(Expected::OK, Some(&params), &segments)?
            }
        };

        let items: Vec<T> = response.decode_list()?;
        let headers = response.page_headers();
        self.cursor.commit(page, items, headers, self.items_per_page);
        debug!(
            page,
            items = self.cursor.items.len(),
            total = ?self.cursor.total_items,
            state = ?self.cursor.state,
            "page buffered"
        );
        Ok(())
    }
}

impl<'a, T: DeserializeOwned> IntoIterator for Pager<'a, T> {
    type Item = Result<T>;
    type IntoIter = PagerItems<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_items()
    }
}

/// Item iterator returned by [`Pager::into_items`].
pub struct PagerItems<'a, T> {
    pager: Pager<'a, T>,
    buffer: std::vec::IntoIter<T>,
    done: bool,
}

impl<T: DeserializeOwned> Iterator for PagerItems<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }
            match self.pager.next_page().map(|page| page.is_some()) {
                Ok(true) => {
                    self.buffer = std::mem::take(&mut self.pager.cursor.items).into_iter();
                }
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiVersion;
    use crate::api::form::ApiForm;
    use crate::api::transport::mock::MockTransport;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        id: u64,
    }

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

    fn body(ids: std::ops::Range<u64>) -> String {
        let items: Vec<String> = ids.map(|id| format!(r#"{{"id": {}}}"#, id)).collect();
        format!("[{}]", items.join(","))
    }

    fn pager(client: &GitLabClient, per_page: u32) -> Pager<'_, Item> {
        client.pager(per_page, None, &[&"projects", &1, &"merge_requests"])
    }

    #[test]
    fn test_construction_is_lazy() {
        let (client, transport) = client();
        let pager = pager(&client, 20);
        assert_eq!(pager.state(), PagerState::Unfetched);
        assert!(pager.has_next());
        assert_eq!(pager.current_page(), None);
        assert!(pager.current().is_empty());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_walk_250_items_in_three_fetches() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "250")], &body(0..100));
        transport.respond(200, &[("X-Total", "250")], &body(100..200));
        transport.respond(200, &[("X-Total", "250")], &body(200..250));

        let mut pager = pager(&client, 100);
        let mut sizes = Vec::new();
        while let Some(page) = pager.next_page().unwrap() {
            sizes.push(page.len());
        }

        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(sizes.iter().sum::<usize>() as u64, 250);
        assert_eq!(pager.state(), PagerState::Exhausted);
        assert!(!pager.has_next());
        assert_eq!(transport.request_count(), 3);
        assert!(transport.requests()[2].url.ends_with("page=3&per_page=100"));
    }

    #[test]
    fn test_random_access_fetches_owning_page_only() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "250")], &body(200..250));

        let mut pager = pager(&client, 100);
        assert_eq!(pager.get(249).unwrap(), &Item { id: 249 });

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://gitlab.example.com/api/v4/projects/1/merge_requests?page=3&per_page=100"
        );
        assert_eq!(pager.current_page(), Some(3));
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_get_matches_sequential_walk() {
        let (client, transport) = client();
        for _ in 0..2 {
            transport.respond(200, &[("X-Total", "7")], &body(0..3));
            transport.respond(200, &[("X-Total", "7")], &body(3..6));
            transport.respond(200, &[("X-Total", "7")], &body(6..7));
        }

        let walked: Vec<Item> = pager(&client, 3).all().unwrap();
        assert_eq!(walked.len(), 7);

        let mut random = pager(&client, 3);
        for index in [0u64, 1, 2, 3, 4, 5, 6] {
            assert_eq!(random.get(index).unwrap(), &walked[index as usize]);
        }
        // pages 1, 2, 3 of the first walk, then 1, 2, 3 once each for the random pass
        assert_eq!(transport.request_count(), 6);
    }

    #[test]
    fn test_same_page_is_not_refetched() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "40")], &body(0..20));

        let mut pager = pager(&client, 20);
        pager.get(0).unwrap();
        pager.get(19).unwrap();
        pager.first().unwrap();
        pager.page(1).unwrap();
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_items_per_page_is_capped() {
        let (client, transport) = client();
        transport.respond(200, &[], &body(0..3));

        let mut pager = pager(&client, 500);
        assert_eq!(pager.items_per_page(), MAX_ITEMS_PER_PAGE);
        pager.first().unwrap();
        assert!(transport.requests()[0].url.ends_with("page=1&per_page=100"));

        assert_eq!(self::pager(&client, 0).items_per_page(), 1);
    }

    #[test]
    fn test_out_of_range_with_known_total_skips_network() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "5")], &body(0..5));

        let mut pager = pager(&client, 10);
        assert_eq!(pager.total_items().unwrap(), Some(5));
        let err = pager.get(5).unwrap_err();
        assert!(matches!(err, ApiError::IndexOutOfRange { index: 5, total: Some(5) }));
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_out_of_range_discovered_after_fetch() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "12")], &body(10..12));

        let mut pager = pager(&client, 10);
        let err = pager.get(15).unwrap_err();
        assert!(matches!(err, ApiError::IndexOutOfRange { index: 15, total: Some(12) }));
    }

    #[test]
    fn test_short_page_without_total() {
        let (client, transport) = client();
        transport.respond(200, &[], &body(0..2));

        let mut pager = pager(&client, 10);
        let err = pager.get(4).unwrap_err();
        assert!(matches!(err, ApiError::IndexOutOfRange { index: 4, total: None }));
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_total_items_triggers_first_fetch() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "42"), ("X-Total-Pages", "5")], &body(0..10));

        let mut pager = pager(&client, 10);
        assert_eq!(pager.known_total_items(), None);
        assert_eq!(pager.total_items().unwrap(), Some(42));
        assert_eq!(pager.total_pages().unwrap(), Some(5));
        assert_eq!(pager.state(), PagerState::Buffered);
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_total_is_not_revalidated() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "4")], &body(0..2));
        transport.respond(200, &[("X-Total", "99")], &body(2..4));

        let mut pager = pager(&client, 2);
        pager.first().unwrap();
        pager.next_page().unwrap();
        assert_eq!(pager.known_total_items(), Some(4));
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_full_page_heuristic_without_headers() {
        let (client, transport) = client();
        transport.respond(200, &[], &body(0..2));
        transport.respond(200, &[], &body(2..4));
        transport.respond(200, &[], "[]");

        let mut pager = pager(&client, 2);
        assert_eq!(pager.next_page().unwrap().map(|p| p.len()), Some(2));
        assert!(pager.has_next());
        assert_eq!(pager.next_page().unwrap().map(|p| p.len()), Some(2));
        assert!(pager.has_next());
        assert!(pager.next_page().unwrap().is_none());
        assert_eq!(pager.state(), PagerState::Exhausted);
        assert!(pager.next_page().unwrap().is_none());
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn test_follows_next_link() {
        let (client, transport) = client();
        let next = "https://gitlab.example.com/api/v4/projects/1/merge_requests?id=1&page=2&per_page=2";
        let link = format!(r#"<{}>; rel="next""#, next);
        transport.respond(200, &[("Link", link.as_str())], &body(0..2));
        transport.respond(
            200,
            &[("Link", r#"<https://gitlab.example.com/api/v4/projects/1/merge_requests?page=1&per_page=2>; rel="first""#)],
            &body(2..4),
        );

        let mut pager = pager(&client, 2);
        pager.first().unwrap();
        assert!(pager.has_next());
        pager.next_page().unwrap();

        let requests = transport.requests();
        assert_eq!(requests[1].url, next);
        // a Link header without rel="next" ends the walk even on a full page
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_failure_leaves_state_unchanged() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "4")], &body(0..2));
        transport.fail("connection reset");
        transport.respond(500, &[], "oops");
        transport.respond(200, &[("X-Total", "4")], "{\"not\": \"a list\"}");
        transport.respond(200, &[("X-Total", "4")], &body(2..4));

        let mut pager = pager(&client, 2);
        pager.first().unwrap();

        assert!(pager.next_page().unwrap_err().is_transport());
        assert_eq!(pager.current_page(), Some(1));
        assert_eq!(pager.current()[0], Item { id: 0 });

        assert_eq!(pager.next_page().unwrap_err().status(), Some(500));
        assert_eq!(pager.state(), PagerState::Buffered);

        assert!(matches!(pager.get(3).unwrap_err(), ApiError::Decode { .. }));
        assert_eq!(pager.current_page(), Some(1));

        assert_eq!(pager.get(3).unwrap(), &Item { id: 3 });
        assert_eq!(pager.state(), PagerState::Exhausted);
    }

    #[test]
    fn test_params_are_carried_on_every_page() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "3")], &body(0..2));
        transport.respond(200, &[("X-Total", "3")], &body(2..3));

        let params = ApiForm::new().with_param("state", "opened").build().unwrap();
        let pager: Pager<'_, Item> = client.pager(2, Some(params), &[&"merge_requests"]);
        let ids: Vec<u64> = pager.into_iter().map(|item| item.unwrap().id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        for request in transport.requests() {
            assert!(request.url.contains("state=opened"));
        }
    }

    #[test]
    fn test_into_items_restarts_from_first_page() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "4")], &body(2..4));
        transport.respond(200, &[("X-Total", "4")], &body(0..2));
        transport.respond(200, &[("X-Total", "4")], &body(2..4));

        let mut pager = pager(&client, 2);
        pager.page(2).unwrap();
        let all = pager.all().unwrap();
        assert_eq!(all.iter().map(|i| i.id).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn test_into_items_yields_error_once() {
        let (client, transport) = client();
        transport.respond(200, &[], &body(0..2));
        transport.fail("timed out");

        let mut items = pager(&client, 2).into_items();
        assert!(items.next().unwrap().is_ok());
        assert!(items.next().unwrap().is_ok());
        assert!(items.next().unwrap().unwrap_err().is_transport());
        assert!(items.next().is_none());
    }

    #[test]
    fn test_get_beyond_addressable_pages() {
        let (client, transport) = client();

        let mut pager = pager(&client, 1);
        let err = pager.get(u64::MAX).unwrap_err();
        assert!(matches!(err, ApiError::IndexOutOfRange { index: u64::MAX, total: None }));

        let err = pager.get(u64::from(u32::MAX)).unwrap_err();
        assert!(matches!(err, ApiError::IndexOutOfRange { .. }));
        assert_eq!(pager.state(), PagerState::Unfetched);
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_next_page_after_last_page_number() {
        let (client, transport) = client();
        transport.respond(200, &[], &body(0..1));

        let mut pager = pager(&client, 1);
        pager.page(u32::MAX).unwrap();
        assert_eq!(pager.state(), PagerState::Buffered);

        assert!(pager.next_page().unwrap().is_none());
        assert_eq!(pager.state(), PagerState::Exhausted);
        assert_eq!(transport.request_count(), 1);
        assert!(transport.requests()[0].url.ends_with("page=4294967295&per_page=1"));
    }

    #[test]
    fn test_next_page_header_drives_has_next() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Next-Page", "2")], &body(0..1));
        transport.respond(200, &[("X-Next-Page", "")], &body(2..4));

        let mut pager = pager(&client, 2);
        pager.first().unwrap();
        // short page, but the server says another follows
        assert_eq!(pager.state(), PagerState::Buffered);

        pager.next_page().unwrap();
        // full page, but the server says it is the last
        assert_eq!(pager.state(), PagerState::Exhausted);
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn test_next_link_to_another_host_is_not_followed() {
        let (client, transport) = client();
        transport.respond(
            200,
            &[("Link", r#"<https://elsewhere.example.net/api/v4/projects/1/merge_requests?page=2>; rel="next""#)],
            &body(0..2),
        );
        transport.respond(200, &[], &body(2..3));

        let mut pager = pager(&client, 2);
        pager.first().unwrap();
        pager.next_page().unwrap();

        let requests = transport.requests();
        assert_eq!(
            requests[1].url,
            "https://gitlab.example.com/api/v4/projects/1/merge_requests?page=2&per_page=2"
        );
        assert_eq!(pager.current(), &[Item { id: 2 }]);
    }

    #[test]
    fn test_empty_collection() {
        let (client, transport) = client();
        transport.respond(200, &[("X-Total", "0")], "[]");

        let mut pager = pager(&client, 20);
        assert!(pager.next_page().unwrap().is_none());
        assert_eq!(pager.state(), PagerState::Exhausted);
        assert_eq!(pager.known_total_items(), Some(0));
        assert!(matches!(pager.get(0), Err(ApiError::IndexOutOfRange { .. })));
    }
}
