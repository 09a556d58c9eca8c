//
//  gitlab-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Command-Line Interface
//!
//! The `glc` binary, defined with the clap derive API.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mr` | List, view, create, merge, close, reopen, approve, and delete merge requests |
//! | `snippet` | List, view, create, and delete personal snippets |
//! | `version` | Print the version |
//!
//! ## Global Options
//!
//! | Option | Environment | Description |
//! |--------|-------------|-------------|
//! | `--host` | `GLC_HOST` | GitLab instance (default: configured host, then `gitlab.com`) |
//! | `--api-version` | `GLC_API_VERSION` | `v3` or `v4` |
//! | `--token` | `GITLAB_TOKEN` | Personal access token |
//! | `--config` | `GLC_CONFIG` | Configuration file path |
//! | `--json` | | JSON output |

mod mr;
mod snippet;

pub use mr::MrCommand;
pub use snippet::SnippetCommand;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::api::{ApiVersion, GitLabClient};
use crate::auth::validate_token;
use crate::config::{Config, HostConfig};
use crate::output::{OutputFormat, OutputWriter};

/// `glc`: work with GitLab from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "glc",
    version,
    about = "Work with GitLab merge requests and snippets from the command line",
    propagate_version = true,
    after_help = "Use 'glc <command> --help' for more information about a command."
)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Options shared by every command
    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options accepted by every command.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// GitLab host, e.g. gitlab.example.com or http://localhost:8080
    #[arg(long, global = true, env = "GLC_HOST")]
    pub host: Option<String>,

    /// API generation to use (v3 or v4)
    #[arg(long, global = true, env = "GLC_API_VERSION")]
    pub api_version: Option<ApiVersion>,

    /// Personal access token
    #[arg(long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file (default: the platform config directory)
    #[arg(long, global = true, env = "GLC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Loads the configuration file named by `--config`, or the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// The effective host settings: the configured entry for the selected
    /// host, with command-line values taking precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the token
    /// is malformed.
    pub fn host_config(&self) -> Result<HostConfig> {
        let config = self.load_config()?;
        let mut host = config.resolve_host(self.host.as_deref());

        if let Some(version) = self.api_version {
            host.api_version = Some(version);
        }
        if let Some(token) = &self.token {
            host.token = Some(token.trim().to_string());
        }
        if let Some(token) = &host.token {
            if !validate_token(token) {
                anyhow::bail!("Invalid token for {}: tokens cannot be empty or contain whitespace", host.host);
            }
        }

        debug!(
            host = %host.host_url(),
            api_version = %host.api_version.unwrap_or_default(),
            authenticated = host.token.is_some(),
            "resolved host"
        );
        Ok(host)
    }

    /// Builds an API client for the effective host.
    ///
    /// # Errors
    ///
    /// Returns an error if the host settings cannot be resolved or the host
    /// URL is invalid.
    pub fn client(&self) -> Result<GitLabClient> {
        let host = self.host_config()?;
        GitLabClient::from_config(&host)
            .with_context(|| format!("Failed to create client for {}", host.host_url()))
    }

    /// The output writer for the selected format.
    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(OutputFormat::from_json_flag(self.json))
    }
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with merge requests
    Mr(MrCommand),

    /// Work with personal snippets
    Snippet(SnippetCommand),

    /// Print the version
    Version,
}
