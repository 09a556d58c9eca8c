//
//  gitlab-client
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Host name helpers.
//!
//! Hosts are stored in the configuration without the default `https://`
//! scheme and without a trailing slash, so `https://GitLab.com/` and
//! `gitlab.com` name the same entry. A plain-HTTP host keeps its `http://`
//! prefix; it is a different endpoint. Only the host name is case-folded: a
//! relative URL root such as `/GitLab` is kept as written.

/// The public GitLab instance.
pub const DEFAULT_HOST: &str = "gitlab.com";

/// Normalises a host for use as a configuration key.
///
/// # Example
///
/// ```rust
/// use gitlab_client::config::normalize_host;
///
/// assert_eq!(normalize_host("https://GitLab.Example.com/"), "gitlab.example.com");
/// assert_eq!(normalize_host("http://localhost:8080/"), "http://localhost:8080");
/// assert_eq!(normalize_host("https://Example.com/GitLab"), "example.com/GitLab");
/// ```
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_suffix('/').unwrap_or(host);
    if let Some(rest) = strip_scheme(host, "https://") {
        return lowercase_authority(rest);
    }
    if let Some(rest) = strip_scheme(host, "http://") {
        return format!("http://{}", lowercase_authority(rest));
    }
    lowercase_authority(host)
}

/// The base URL for a host, adding `https://` unless a scheme is present.
///
/// # Example
///
/// ```rust
/// use gitlab_client::config::host_url;
///
/// assert_eq!(host_url("gitlab.com"), "https://gitlab.com");
/// assert_eq!(host_url("http://localhost:8080/"), "http://localhost:8080");
/// ```
pub fn host_url(host: &str) -> String {
    let host = normalize_host(host);
    if host.starts_with("http://") {
        host
    } else {
        format!("https://{}", host)
    }
}

fn lowercase_authority(host: &str) -> String {
    match host.split_once('/') {
        Some((authority, path)) => format!("{}/{}", authority.to_lowercase(), path),
        None => host.to_lowercase(),
    }
}

fn strip_scheme<'a>(host: &'a str, scheme: &str) -> Option<&'a str> {
    let head = host.get(..scheme.len())?;
    head.eq_ignore_ascii_case(scheme).then(|| &host[scheme.len()..])
}
