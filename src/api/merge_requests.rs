//
//  gitlab-client
//  api/merge_requests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Merge request API types and operations.
//!
//! This module provides the merge request facade: listing, creating,
//! updating, merging, approving, and inspecting merge requests on a GitLab
//! instance.
//!
//! # Overview
//!
//! Merge requests are GitLab's unit of code review. Each one is addressed by
//! its project (numeric ID or URL-encoded `group/project` path) and its IID,
//! the per-project sequential number shown in the UI as `!7`.
//!
//! # Merge Request Lifecycle
//!
//! 1. **opened** - Initial state when created
//! 2. **merged** - Successfully merged into the target branch
//! 3. **closed** - Closed without merging (can be reopened)
//! 4. **locked** - Temporarily locked while a merge is in progress
//!
//! # API Generations
//!
//! The facade hides the differences between V3 and V4: the auto-merge
//! parameter is sent as `merge_when_build_succeeds` or
//! `merge_when_pipeline_succeeds`, and a delete succeeds with `200` or `204`,
//! depending on the client's [`ApiVersion`](crate::api::ApiVersion).
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab_client::api::{ApiVersion, CreateMergeRequest, GitLabClient};
//!
//! let client = GitLabClient::new("https://gitlab.com", ApiVersion::V4, None)?;
//! let mrs = client.merge_requests();
//!
//! let request = CreateMergeRequest {
//!     description: Some("Implements OAuth2 login flow".to_string()),
//!     labels: Some(vec!["feature".to_string(), "auth".to_string()]),
//!     remove_source_branch: Some(true),
//!     ..CreateMergeRequest::new("feature/auth", "main", "Add user authentication")
//! };
//! let mr = mrs.create("group/project", &request)?;
//! println!("opened !{} at {}", mr.iid, mr.web_url.unwrap_or_default());
//! # Ok::<(), gitlab_client::api::ApiError>(())
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::{ApiVersion, Expected, GitLabClient};
use super::common::{Author, Lookup, Result};
use super::form::{ApiForm, ParamValue, Params};
use super::pager::Pager;

macro_rules! wire_name {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl ParamValue for $ty {
                fn to_param_value(&self) -> Option<String> {
                    Some(self.as_str().to_string())
                }
            }
        )*
    };
}

/// State of a merge request.
///
/// `All` is only meaningful as a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    /// Open for review.
    Opened,
    /// Closed without merging.
    Closed,
    /// Locked while a merge is in progress.
    Locked,
    /// Merged into the target branch.
    Merged,
    /// Any state (filter only).
    All,
}

impl MergeRequestState {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Closed => "closed",
            Self::Locked => "locked",
            Self::Merged => "merged",
            Self::All => "all",
        }
    }
}

impl std::str::FromStr for MergeRequestState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opened" | "open" => Ok(Self::Opened),
            "closed" => Ok(Self::Closed),
            "locked" => Ok(Self::Locked),
            "merged" => Ok(Self::Merged),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown merge request state '{}' (expected opened, closed, locked, merged, or all)",
                other
            )),
        }
    }
}

/// Transition applied by [`MergeRequestApi::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateEvent {
    /// Close the merge request.
    Close,
    /// Reopen a closed merge request.
    Reopen,
}

impl StateEvent {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Reopen => "reopen",
        }
    }
}

/// Scope of the global merge request listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeRequestScope {
    /// Created by the authenticated user.
    CreatedByMe,
    /// Assigned to the authenticated user.
    AssignedToMe,
    /// Everything the user can see.
    All,
}

impl MergeRequestScope {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedByMe => "created_by_me",
            Self::AssignedToMe => "assigned_to_me",
            Self::All => "all",
        }
    }
}

/// Ordering field for merge request listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeRequestOrderBy {
    /// Creation time.
    CreatedAt,
    /// Last update time.
    UpdatedAt,
}

impl MergeRequestOrderBy {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

wire_name!(
    MergeRequestState,
    StateEvent,
    MergeRequestScope,
    MergeRequestOrderBy,
    SortOrder
);

/// A merge request as returned by GitLab.
///
/// Approval and change fields are only filled by the endpoints that return
/// them ([`MergeRequestApi::approvals`], [`MergeRequestApi::changes`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Global ID.
    pub id: u64,

    /// Per-project sequential number (`!iid`).
    pub iid: u64,

    /// ID of the project the merge request lives in.
    #[serde(default)]
    pub project_id: Option<u64>,

    /// Title.
    pub title: String,

    /// Markdown description.
    #[serde(default)]
    pub description: Option<String>,

    /// Current state.
    pub state: MergeRequestState,

    /// Mergeability (`can_be_merged`, `cannot_be_merged`, `unchecked`).
    #[serde(default)]
    pub merge_status: Option<String>,

    /// Branch containing the changes.
    #[serde(default)]
    pub source_branch: String,

    /// Branch the changes merge into.
    #[serde(default)]
    pub target_branch: String,

    /// Project of the source branch (differs for forks).
    #[serde(default)]
    pub source_project_id: Option<u64>,

    /// Project of the target branch.
    #[serde(default)]
    pub target_project_id: Option<u64>,

    /// Creator.
    #[serde(default)]
    pub author: Option<Author>,

    /// Assignee.
    #[serde(default)]
    pub assignee: Option<Author>,

    /// Label names.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Head commit of the source branch.
    #[serde(default)]
    pub sha: Option<String>,

    /// The merge commit, once merged.
    #[serde(default)]
    pub merge_commit_sha: Option<String>,

    /// Browser URL.
    #[serde(default)]
    pub web_url: Option<String>,

    /// Marked as draft / work in progress.
    #[serde(default)]
    pub work_in_progress: bool,

    /// Thumbs-up count.
    #[serde(default)]
    pub upvotes: u32,

    /// Thumbs-down count.
    #[serde(default)]
    pub downvotes: u32,

    /// Number of user comments.
    #[serde(default)]
    pub user_notes_count: u32,

    /// Whether the author asked for the source branch to be removed.
    #[serde(default)]
    pub should_remove_source_branch: Option<bool>,

    /// Whether the source branch is removed on merge.
    #[serde(default)]
    pub force_remove_source_branch: Option<bool>,

    /// Whether the merge waits for the pipeline.
    #[serde(default, alias = "merge_when_build_succeeds")]
    pub merge_when_pipeline_succeeds: Option<bool>,

    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Diff entries (only from [`MergeRequestApi::changes`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<Diff>>,

    /// Approvals required before merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approvals_required: Option<u32>,

    /// Approvals still missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approvals_left: Option<u32>,

    /// Users who approved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub approved_by: Vec<Approver>,
}

/// One entry of a merge request's `approved_by` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approver {
    /// The approving user.
    pub user: Author,
}

/// A commit belonging to a merge request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Full SHA.
    pub id: String,

    /// Abbreviated SHA.
    #[serde(default)]
    pub short_id: String,

    /// First line of the message.
    #[serde(default)]
    pub title: String,

    /// Full message.
    #[serde(default)]
    pub message: Option<String>,

    /// Author name.
    #[serde(default)]
    pub author_name: Option<String>,

    /// Author email.
    #[serde(default)]
    pub author_email: Option<String>,

    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Parent SHAs.
    #[serde(default)]
    pub parent_ids: Vec<String>,
}

/// A file change within a merge request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diff {
    /// Path before the change.
    #[serde(default)]
    pub old_path: String,

    /// Path after the change.
    #[serde(default)]
    pub new_path: String,

    /// Mode before.
    #[serde(default)]
    pub a_mode: Option<String>,

    /// Mode after.
    #[serde(default)]
    pub b_mode: Option<String>,

    /// Unified diff text.
    #[serde(default)]
    pub diff: String,

    /// File was added.
    #[serde(default)]
    pub new_file: bool,

    /// File was renamed.
    #[serde(default)]
    pub renamed_file: bool,

    /// File was deleted.
    #[serde(default)]
    pub deleted_file: bool,
}

/// A user who took part in a merge request.
pub type Participant = Author;

/// Input of [`MergeRequestApi::create`].
///
/// `source_branch`, `target_branch`, and `title` are required; leaving one
/// unset fails with
/// [`ApiError::MissingRequiredParameter`](crate::api::ApiError::MissingRequiredParameter)
/// before anything is sent.
#[derive(Debug, Clone, Default)]
pub struct CreateMergeRequest {
    /// Branch containing the changes.
    pub source_branch: Option<String>,
    /// Branch to merge into.
    pub target_branch: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Markdown description.
    pub description: Option<String>,
    /// User to assign.
    pub assignee_id: Option<u64>,
    /// Target project, for merge requests from a fork.
    pub target_project_id: Option<u64>,
    /// Labels, sent comma-joined.
    pub labels: Option<Vec<String>>,
    /// Milestone to attach.
    pub milestone_id: Option<u64>,
    /// Remove the source branch once merged.
    pub remove_source_branch: Option<bool>,
}

impl CreateMergeRequest {
    /// Creates a request with the three required fields set.
    pub fn new(
        source_branch: impl Into<String>,
        target_branch: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source_branch: Some(source_branch.into()),
            target_branch: Some(target_branch.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    fn to_params(&self) -> Result<Params> {
        ApiForm::new()
            .with_required_param("source_branch", self.source_branch.as_deref())
            .with_required_param("target_branch", self.target_branch.as_deref())
            .with_required_param("title", self.title.as_deref())
            .with_param("description", self.description.as_deref())
            .with_param("assignee_id", self.assignee_id)
            .with_param("target_project_id", self.target_project_id)
            .with_param("labels", self.labels.as_deref())
            .with_param("milestone_id", self.milestone_id)
            .with_param("remove_source_branch", self.remove_source_branch)
            .build()
    }
}

/// Input of [`MergeRequestApi::update`]. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateMergeRequest {
    /// New target branch.
    pub target_branch: Option<String>,
    /// New title.
    pub title: Option<String>,
    /// New assignee.
    pub assignee_id: Option<u64>,
    /// New description.
    pub description: Option<String>,
    /// Close or reopen.
    pub state_event: Option<StateEvent>,
    /// Replacement labels; an empty list clears them.
    pub labels: Option<Vec<String>>,
    /// New milestone.
    pub milestone_id: Option<u64>,
}

impl UpdateMergeRequest {
    /// An update that only applies a state transition.
    pub fn transition(event: StateEvent) -> Self {
        Self {
            state_event: Some(event),
            ..Self::default()
        }
    }

    fn to_params(&self) -> Result<Params> {
        ApiForm::new()
            .with_param("target_branch", self.target_branch.as_deref())
            .with_param("title", self.title.as_deref())
            .with_param("assignee_id", self.assignee_id)
            .with_param("description", self.description.as_deref())
            .with_param("state_event", self.state_event)
            .with_param("labels", self.labels.as_deref())
            .with_param("milestone_id", self.milestone_id)
            .build()
    }
}

/// Input of [`MergeRequestApi::accept`]. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct AcceptMergeRequest {
    /// Custom merge commit message.
    pub merge_commit_message: Option<String>,
    /// Remove the source branch after merging.
    pub should_remove_source_branch: Option<bool>,
    /// Defer the merge until the pipeline succeeds.
    pub merge_when_pipeline_succeeds: Option<bool>,
    /// Merge only if the source branch head is still this SHA.
    pub sha: Option<String>,
}

impl AcceptMergeRequest {
    fn to_params(&self, version: ApiVersion) -> Result<Params> {
        ApiForm::new()
            .with_param("merge_commit_message", self.merge_commit_message.as_deref())
            .with_param("should_remove_source_branch", self.should_remove_source_branch)
            .with_param(
                version.merge_when_pipeline_succeeds_param(),
                self.merge_when_pipeline_succeeds,
            )
            .with_param("sha", self.sha.as_deref())
            .build()
    }
}

/// Filters for the global `GET /merge_requests` listing.
///
/// # Example
///
/// ```rust
/// use gitlab_client::api::{MergeRequestFilter, MergeRequestScope, MergeRequestState};
///
/// let filter = MergeRequestFilter {
///     state: Some(MergeRequestState::Opened),
///     scope: Some(MergeRequestScope::AssignedToMe),
///     labels: Some(vec!["bug".to_string()]),
///     ..Default::default()
/// };
/// let params = filter.to_page_params(1, 20)?;
/// assert_eq!(params.as_query_string(), "state=opened&scope=assigned_to_me&labels=bug&page=1&per_page=20");
/// # Ok::<(), gitlab_client::api::ApiError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MergeRequestFilter {
    /// Only this state.
    pub state: Option<MergeRequestState>,
    /// Whose merge requests.
    pub scope: Option<MergeRequestScope>,
    /// Only by this author.
    pub author_id: Option<u64>,
    /// Only assigned to this user.
    pub assignee_id: Option<u64>,
    /// Only in this milestone (by title).
    pub milestone: Option<String>,
    /// Only with all of these labels.
    pub labels: Option<Vec<String>>,
    /// Created on or after.
    pub created_after: Option<DateTime<Utc>>,
    /// Created on or before.
    pub created_before: Option<DateTime<Utc>>,
    /// Updated on or after.
    pub updated_after: Option<DateTime<Utc>>,
    /// Updated on or before.
    pub updated_before: Option<DateTime<Utc>>,
    /// Ordering field.
    pub order_by: Option<MergeRequestOrderBy>,
    /// Sort direction.
    pub sort: Option<SortOrder>,
    /// Only from this source branch.
    pub source_branch: Option<String>,
    /// Only into this target branch.
    pub target_branch: Option<String>,
    /// Full-text search in title and description.
    pub search: Option<String>,
}

impl MergeRequestFilter {
    /// The filter as request parameters.
    ///
    /// # Errors
    ///
    /// Infallible in practice; returns the form builder's result.
    pub fn to_params(&self) -> Result<Params> {
        self.form().build()
    }

    /// The filter as request parameters, plus `page` and `per_page`.
    ///
    /// # Errors
    ///
    /// Infallible in practice; returns the form builder's result.
    pub fn to_page_params(&self, page: u32, per_page: u32) -> Result<Params> {
        self.form().with_page(page, per_page).build()
    }

    fn form(&self) -> ApiForm {
        ApiForm::new()
            .with_param("state", self.state)
            .with_param("scope", self.scope)
            .with_param("author_id", self.author_id)
            .with_param("assignee_id", self.assignee_id)
            .with_param("milestone", self.milestone.as_deref())
            .with_param("labels", self.labels.as_deref())
            .with_param("created_after", self.created_after)
            .with_param("created_before", self.created_before)
            .with_param("updated_after", self.updated_after)
            .with_param("updated_before", self.updated_before)
            .with_param("order_by", self.order_by)
            .with_param("sort", self.sort)
            .with_param("source_branch", self.source_branch.as_deref())
            .with_param("target_branch", self.target_branch.as_deref())
            .with_param("search", self.search.as_deref())
    }
}

/// Merge request operations.
///
/// Obtained from [`GitLabClient::merge_requests`]. The `project` argument of
/// every method is either a numeric ID or a `group/project` path; paths are
/// URL-encoded as a single segment.
#[derive(Debug, Clone, Copy)]
pub struct MergeRequestApi<'a> {
    client: &'a GitLabClient,
}

impl<'a> MergeRequestApi<'a> {
    pub(crate) fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// Lists merge requests across all projects, first page at the client's
    /// default page size.
    ///
    /// `GET /merge_requests`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn list(&self, filter: Option<&MergeRequestFilter>) -> Result<Vec<MergeRequest>> {
        self.list_page(filter, 1, self.client.default_per_page())
    }

    /// Lists one page of merge requests across all projects.
    ///
    /// `GET /merge_requests`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn list_page(
        &self,
        filter: Option<&MergeRequestFilter>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<MergeRequest>> {
        let params = match filter {
            Some(filter) => filter.to_page_params(page, per_page)?,
            None => Params::page_params(page, per_page),
        };
        self.client
            .get(Expected::OK, Some(&params), &[&"merge_requests"])?
            .decode_list()
    }

    /// A lazy pager over merge requests across all projects.
    ///
    /// `GET /merge_requests`
    ///
    /// # Errors
    ///
    /// Returns an error only if the filter cannot be turned into parameters.
    pub fn pager(
        &self,
        filter: Option<&MergeRequestFilter>,
        items_per_page: u32,
    ) -> Result<Pager<'a, MergeRequest>> {
        let params = filter.map(MergeRequestFilter::to_params).transpose()?;
        Ok(self.client.pager(items_per_page, params, &[&"merge_requests"]))
    }

    /// Lists a project's merge requests, first page at the client's default
    /// page size.
    ///
    /// `GET /projects/:id/merge_requests`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn project_merge_requests(
        &self,
        project: impl fmt::Display,
        state: Option<MergeRequestState>,
    ) -> Result<Vec<MergeRequest>> {
        self.project_merge_requests_page(project, state, 1, self.client.default_per_page())
    }

    /// Lists one page of a project's merge requests.
    ///
    /// `GET /projects/:id/merge_requests`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn project_merge_requests_page(
        &self,
        project: impl fmt::Display,
        state: Option<MergeRequestState>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<MergeRequest>> {
        let params = ApiForm::new()
            .with_param("state", state)
            .with_page(page, per_page)
            .build()?;
        self.client
            .get(Expected::OK, Some(&params), &[&"projects", &project, &"merge_requests"])?
            .decode_list()
    }

    /// A lazy pager over a project's merge requests.
    ///
    /// `GET /projects/:id/merge_requests`
    ///
    /// # Errors
    ///
    /// Returns an error only if the parameters cannot be built.
    pub fn project_merge_requests_pager(
        &self,
        project: impl fmt::Display,
        state: Option<MergeRequestState>,
        items_per_page: u32,
    ) -> Result<Pager<'a, MergeRequest>> {
        let params = ApiForm::new().with_param("state", state).build()?;
        Ok(self.client.pager(
            items_per_page,
            Some(params),
            &[&"projects", &project, &"merge_requests"],
        ))
    }

    /// Fetches one merge request.
    ///
    /// `GET /projects/:id/merge_requests/:iid`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (a missing merge request is a
    /// `404` [`UnexpectedStatus`](crate::api::ApiError::UnexpectedStatus)) or
    /// the response cannot be decoded.
    pub fn get(&self, project: impl fmt::Display, iid: u64) -> Result<MergeRequest> {
        self.client
            .get(Expected::OK, None, &[&"projects", &project, &"merge_requests", &iid])?
            .decode()
    }

    /// Fetches one merge request, reporting a `404` as [`Lookup::Absent`].
    ///
    /// # Errors
    ///
    /// Every failure other than not-found propagates.
    pub fn get_optional(
        &self,
        project: impl fmt::Display,
        iid: u64,
    ) -> Result<Lookup<MergeRequest>> {
        GitLabClient::optional(self.get(project, iid))
    }

    /// Lists the commits of a merge request, first page at the client's
    /// default page size.
    ///
    /// `GET /projects/:id/merge_requests/:iid/commits`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn commits(&self, project: impl fmt::Display, iid: u64) -> Result<Vec<Commit>> {
        self.commits_page(project, iid, 1, self.client.default_per_page())
    }

    /// Lists one page of a merge request's commits.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn commits_page(
        &self,
        project: impl fmt::Display,
        iid: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Commit>> {
        let params = Params::page_params(page, per_page);
        self.client
            .get(
                Expected::OK,
                Some(&params),
                &[&"projects", &project, &"merge_requests", &iid, &"commits"],
            )?
            .decode_list()
    }

    /// A lazy pager over a merge request's commits.
    pub fn commits_pager(
        &self,
        project: impl fmt::Display,
        iid: u64,
        items_per_page: u32,
    ) -> Pager<'a, Commit> {
        self.client.pager(
            items_per_page,
            None,
            &[&"projects", &project, &"merge_requests", &iid, &"commits"],
        )
    }

    /// Opens a merge request.
    ///
    /// `POST /projects/:id/merge_requests`
    ///
    /// # Errors
    ///
    /// - [`MissingRequiredParameter`](crate::api::ApiError::MissingRequiredParameter)
    ///   if `source_branch`, `target_branch`, or `title` is unset; nothing is
    ///   sent
    /// - any dispatch or decode failure
    pub fn create(
        &self,
        project: impl fmt::Display,
        request: &CreateMergeRequest,
    ) -> Result<MergeRequest> {
        let params = request.to_params()?;
        self.client
            .post(Expected::CREATED, Some(&params), &[&"projects", &project, &"merge_requests"])?
            .decode()
    }

    /// Updates a merge request, including closing or reopening it.
    ///
    /// `PUT /projects/:id/merge_requests/:iid`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn update(
        &self,
        project: impl fmt::Display,
        iid: u64,
        update: &UpdateMergeRequest,
    ) -> Result<MergeRequest> {
        let params = update.to_params()?;
        self.client
            .put(
                Expected::OK,
                Some(&params),
                &[&"projects", &project, &"merge_requests", &iid],
            )?
            .decode()
    }

    /// Deletes a merge request (administrators and project owners only).
    ///
    /// `DELETE /projects/:id/merge_requests/:iid`
    ///
    /// # Errors
    ///
    /// Returns an error unless the server answers `200` (V3) or `204` (V4).
    pub fn delete(&self, project: impl fmt::Display, iid: u64) -> Result<()> {
        self.client.delete(
            self.client.api_version().delete_status(),
            None,
            &[&"projects", &project, &"merge_requests", &iid],
        )?;
        Ok(())
    }

    /// Merges a merge request.
    ///
    /// `PUT /projects/:id/merge_requests/:iid/merge`
    ///
    /// # Errors
    ///
    /// Surfaces GitLab's refusals as
    /// [`UnexpectedStatus`](crate::api::ApiError::UnexpectedStatus):
    /// `405` or `406` when the merge request cannot be merged (already merged,
    /// closed, conflicts), `409` when `sha` no longer matches the source
    /// branch head, `401` when the user may not merge.
    pub fn accept(
        &self,
        project: impl fmt::Display,
        iid: u64,
        accept: &AcceptMergeRequest,
    ) -> Result<MergeRequest> {
        let params = accept.to_params(self.client.api_version())?;
        self.client
            .put(
                Expected::OK,
                Some(&params),
                &[&"projects", &project, &"merge_requests", &iid, &"merge"],
            )?
            .decode()
    }

    /// Cancels a pending "merge when pipeline succeeds".
    ///
    /// `PUT /projects/:id/merge_requests/:iid/cancel_merge_when_pipeline_succeeds`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn cancel_merge_when_pipeline_succeeds(
        &self,
        project: impl fmt::Display,
        iid: u64,
    ) -> Result<MergeRequest> {
        self.client
            .put(
                Expected::OK,
                None,
                &[
                    &"projects",
                    &project,
                    &"merge_requests",
                    &iid,
                    &"cancel_merge_when_pipeline_succeeds",
                ],
            )?
            .decode()
    }

    /// Fetches the approval state of a merge request.
    ///
    /// `GET /projects/:id/merge_requests/:iid/approvals`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn approvals(&self, project: impl fmt::Display, iid: u64) -> Result<MergeRequest> {
        self.client
            .get(
                Expected::OK,
                None,
                &[&"projects", &project, &"merge_requests", &iid, &"approvals"],
            )?
            .decode()
    }

    /// Approves a merge request, optionally only if its head is still `sha`.
    ///
    /// `POST /projects/:id/merge_requests/:iid/approve`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn approve(
        &self,
        project: impl fmt::Display,
        iid: u64,
        sha: Option<&str>,
    ) -> Result<MergeRequest> {
        let params = ApiForm::new().with_param("sha", sha).build()?;
        self.client
            .post(
                Expected::OK,
                Some(&params),
                &[&"projects", &project, &"merge_requests", &iid, &"approve"],
            )?
            .decode()
    }

    /// Withdraws the authenticated user's approval.
    ///
    /// `POST /projects/:id/merge_requests/:iid/unapprove`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn unapprove(&self, project: impl fmt::Display, iid: u64) -> Result<MergeRequest> {
        self.client
            .post(
                Expected::OK,
                None,
                &[&"projects", &project, &"merge_requests", &iid, &"unapprove"],
            )?
            .decode()
    }

    /// Fetches a merge request together with its file changes.
    ///
    /// `GET /projects/:id/merge_requests/:iid/changes`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn changes(&self, project: impl fmt::Display, iid: u64) -> Result<MergeRequest> {
        self.client
            .get(
                Expected::OK,
                None,
                &[&"projects", &project, &"merge_requests", &iid, &"changes"],
            )?
            .decode()
    }

    /// Lists the participants of a merge request, first page at the client's
    /// default page size.
    ///
    /// `GET /projects/:id/merge_requests/:iid/participants`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn participants(&self, project: impl fmt::Display, iid: u64) -> Result<Vec<Participant>> {
        self.participants_page(project, iid, 1, self.client.default_per_page())
    }

    /// Lists one page of a merge request's participants.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub fn participants_page(
        &self,
        project: impl fmt::Display,
        iid: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Participant>> {
        let params = Params::page_params(page, per_page);
        self.client
            .get(
                Expected::OK,
                Some(&params),
                &[&"projects", &project, &"merge_requests", &iid, &"participants"],
            )?
            .decode_list()
    }

    /// A lazy pager over a merge request's participants.
    pub fn participants_pager(
        &self,
        project: impl fmt::Display,
        iid: u64,
        items_per_page: u32,
    ) -> Pager<'a, Participant> {
        self.client.pager(
            items_per_page,
            None,
            &[&"projects", &project, &"merge_requests", &iid, &"participants"],
        )
    }
}
