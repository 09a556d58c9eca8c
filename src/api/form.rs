//
//  gitlab-client
//  api/form.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Parameter Builder
//!
//! GitLab takes every input as a flat list of named string parameters, sent
//! as the query string of GET/DELETE requests and as a form-encoded body of
//! POST/PUT requests. This module turns typed Rust values into that list.
//!
//! ## Components
//!
//! - [`ParamValue`]: how a typed value is written on the wire
//! - [`ApiForm`]: fluent builder that drops absent optional values and
//!   records missing required ones
//! - [`Params`]: the immutable, ordered result of [`ApiForm::build`]
//!
//! ## Wire Format
//!
//! | Rust value | Wire value |
//! |------------|------------|
//! | `bool` | `true` / `false` |
//! | integers | decimal |
//! | `Vec<T>` / `[T]` | comma-joined (`bug,ui`) |
//! | `DateTime<Utc>` | `2017-06-01T12:00:00Z` |
//! | `NaiveDate` | `2017-06-01` |
//! | enums | their wire name (`opened`, `created_by_me`, ...) |
//! | `None` | parameter omitted |
//!
//! ## Example
//!
//! ```rust
//! use gitlab_client::api::{ApiError, ApiForm};
//!
//! let params = ApiForm::new()
//!     .with_required_param("title", "Fix login")
//!     .with_param("description", None::<String>)
//!     .with_param("labels", vec!["bug", "ui"])
//!     .with_param("remove_source_branch", true)
//!     .build()?;
//!
//! assert_eq!(params.as_form_body(), "title=Fix+login&labels=bug%2Cui&remove_source_branch=true");
//!
//! let missing = ApiForm::new().with_required_param("title", None::<&str>).build();
//! assert!(matches!(missing, Err(ApiError::MissingRequiredParameter { .. })));
//! # Ok::<(), ApiError>(())
//! ```

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::api::common::{ApiError, Result};

/// Query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the page size.
pub const PER_PAGE_PARAM: &str = "per_page";

/// A value that can be written as a GitLab request parameter.
///
/// Returning `None` means "absent": the parameter is left out of the request
/// entirely.
pub trait ParamValue {
    /// Converts the value to its wire representation.
    fn to_param_value(&self) -> Option<String>;
}

impl ParamValue for str {
    fn to_param_value(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ParamValue for String {
    fn to_param_value(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ParamValue for bool {
    fn to_param_value(&self) -> Option<String> {
        Some(if *self { "true" } else { "false" }.to_string())
    }
}

macro_rules! decimal_param {
    ($($ty:ty),*) => {
        $(
            impl ParamValue for $ty {
                fn to_param_value(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

decimal_param!(u8, u16, u32, u64, usize, i32, i64);

impl ParamValue for DateTime<Utc> {
    fn to_param_value(&self) -> Option<String> {
        Some(self.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl ParamValue for NaiveDate {
    fn to_param_value(&self) -> Option<String> {
        Some(self.format("%Y-%m-%d").to_string())
    }
}

impl<T: ParamValue + ?Sized> ParamValue for &T {
    fn to_param_value(&self) -> Option<String> {
        (**self).to_param_value()
    }
}

impl<T: ParamValue> ParamValue for Option<T> {
    fn to_param_value(&self) -> Option<String> {
        self.as_ref().and_then(ParamValue::to_param_value)
    }
}

impl<T: ParamValue> ParamValue for [T] {
    fn to_param_value(&self) -> Option<String> {
        let parts: Vec<String> = self.iter().filter_map(ParamValue::to_param_value).collect();
        Some(parts.join(","))
    }
}

impl<T: ParamValue> ParamValue for Vec<T> {
    fn to_param_value(&self) -> Option<String> {
        self.as_slice().to_param_value()
    }
}

/// Fluent builder for request parameters.
///
/// Chaining never fails; a required parameter without a value is remembered
/// and reported by [`build`](Self::build), before anything is sent.
#[derive(Debug, Clone, Default)]
pub struct ApiForm {
    entries: Vec<(String, String)>,
    missing: Vec<String>,
}

impl ApiForm {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an optional parameter. Absent values are dropped.
    ///
    /// Adding a name that is already present replaces the earlier value and
    /// keeps its position.
    pub fn with_param(mut self, name: &str, value: impl ParamValue) -> Self {
        if let Some(value) = value.to_param_value() {
            self.insert(name, value);
        }
        self
    }

    /// Adds a required parameter.
    ///
    /// An absent value, or a string that is empty after trimming, makes
    /// [`build`](Self::build) fail with [`ApiError::MissingRequiredParameter`].
    pub fn with_required_param(mut self, name: &str, value: impl ParamValue) -> Self {
        match value.to_param_value() {
            Some(value) if !value.trim().is_empty() => self.insert(name, value),
            _ => self.missing.push(name.to_string()),
        }
        self
    }

    /// Adds `page` and `per_page`.
    pub fn with_page(self, page: u32, per_page: u32) -> Self {
        self.with_param(PAGE_PARAM, page)
            .with_param(PER_PAGE_PARAM, per_page)
    }

    /// Finishes the builder.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingRequiredParameter`] naming the first required
    /// parameter that had no value.
    pub fn build(self) -> Result<Params> {
        if let Some(name) = self.missing.into_iter().next() {
            return Err(ApiError::MissingRequiredParameter { name });
        }
        Ok(Params {
            entries: self.entries,
        })
    }

    fn insert(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }
}

/// An immutable, ordered set of request parameters.
///
/// Produced by [`ApiForm::build`]. Safe to reuse read-only across any number
/// of requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// An empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `page` and `per_page`.
    pub fn page_params(page: u32, per_page: u32) -> Self {
        Self {
            entries: vec![
                (PAGE_PARAM.to_string(), page.to_string()),
                (PER_PAGE_PARAM.to_string(), per_page.to_string()),
            ],
        }
    }

    /// Only `per_page`.
    pub fn per_page_param(per_page: u32) -> Self {
        Self {
            entries: vec![(PER_PAGE_PARAM.to_string(), per_page.to_string())],
        }
    }

    /// The value of a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A copy with `page` and `per_page` set to the given values.
    ///
    /// Existing page parameters are replaced in place; other parameters are
    /// untouched.
    pub fn with_page(&self, page: u32, per_page: u32) -> Self {
        let mut form = ApiForm {
            entries: self.entries.clone(),
            missing: Vec::new(),
        };
        form.insert(PAGE_PARAM, page.to_string());
        form.insert(PER_PAGE_PARAM, per_page.to_string());
        Self {
            entries: form.entries,
        }
    }

    /// Encodes the parameters for a URL query string.
    pub fn as_query_string(&self) -> String {
        self.encode()
    }

    /// Encodes the parameters as an `application/x-www-form-urlencoded` body.
    pub fn as_form_body(&self) -> String {
        self.encode()
    }

    fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_absent_optional_is_dropped() {
        let params = ApiForm::new()
            .with_param("title", "x")
            .with_param("description", None::<String>)
            .with_param("assignee_id", None::<u64>)
            .build()
            .unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("description"), None);
        assert_eq!(params.as_query_string(), "title=x");
    }

    #[test]
    fn test_missing_required_fails_at_build() {
        let result = ApiForm::new()
            .with_required_param("source_branch", None::<&str>)
            .with_required_param("title", "ok")
            .build();
        match result {
            Err(ApiError::MissingRequiredParameter { name }) => assert_eq!(name, "source_branch"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_blank_required_string_is_missing() {
        let result = ApiForm::new().with_required_param("title", "   ").build();
        assert!(matches!(result, Err(ApiError::MissingRequiredParameter { .. })));
    }

    #[test]
    fn test_value_stringification() {
        let when = Utc.with_ymd_and_hms(2017, 6, 1, 12, 30, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
        let params = ApiForm::new()
            .with_param("flag", false)
            .with_param("id", 42u64)
            .with_param("labels", vec!["bug".to_string(), "ui".to_string()])
            .with_param("created_after", when)
            .with_param("due", day)
            .build()
            .unwrap();
        assert_eq!(params.get("flag"), Some("false"));
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("labels"), Some("bug,ui"));
        assert_eq!(params.get("created_after"), Some("2017-06-01T12:30:00Z"));
        assert_eq!(params.get("due"), Some("2017-06-01"));
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let params = ApiForm::new()
            .with_param("a", 1u32)
            .with_param("b", 2u32)
            .with_param("a", 3u32)
            .build()
            .unwrap();
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_with_page_keeps_other_params() {
        let params = ApiForm::new()
            .with_param("state", "opened")
            .with_page(1, 20)
            .build()
            .unwrap();
        let paged = params.with_page(3, 50);
        assert_eq!(paged.get("state"), Some("opened"));
        assert_eq!(paged.get("page"), Some("3"));
        assert_eq!(paged.get("per_page"), Some("50"));
        assert_eq!(paged.len(), 3);
        assert_eq!(params.get("page"), Some("1"));
    }

    #[test]
    fn test_encoding() {
        let params = ApiForm::new()
            .with_param("title", "a & b")
            .with_param("path", "group/project")
            .build()
            .unwrap();
        assert_eq!(params.as_form_body(), "title=a+%26+b&path=group%2Fproject");
        assert_eq!(params.as_query_string(), params.as_form_body());
    }

    #[test]
    fn test_page_param_helpers() {
        assert_eq!(Params::page_params(2, 10).as_query_string(), "page=2&per_page=10");
        assert_eq!(Params::per_page_param(96).as_query_string(), "per_page=96");
        assert!(Params::new().is_empty());
    }
}
