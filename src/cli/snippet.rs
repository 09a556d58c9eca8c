//
//  gitlab-client
//  cli/snippet.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `glc snippet`: personal snippet commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::GlobalOptions;
use crate::api::{CreateSnippet, Snippet, Visibility, MAX_ITEMS_PER_PAGE};
use crate::output::{print_field, print_header, truncate, TableOutput, TableRow};

/// Snippet commands.
#[derive(Args, Debug)]
pub struct SnippetCommand {
    #[command(subcommand)]
    pub command: SnippetSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SnippetSubcommand {
    /// List your snippets
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a snippet
    View(ViewArgs),

    /// Create a snippet
    Create(CreateArgs),

    /// Delete a snippet
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of snippets to list
    #[arg(long, short = 'L', default_value_t = 30)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Snippet ID
    pub id: u64,

    /// Print only the raw file content
    #[arg(long, short = 'c')]
    pub content: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title
    #[arg(long)]
    pub title: String,

    /// File name (used for syntax highlighting)
    #[arg(long, short = 'f')]
    pub file_name: String,

    /// File content
    #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
    pub content: Option<String>,

    /// Read the file content from this path
    #[arg(long)]
    pub content_file: Option<PathBuf>,

    /// Visibility (public, internal, private)
    #[arg(long, short = 'v')]
    pub visibility: Option<Visibility>,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Snippet ID
    pub id: u64,
}

impl TableRow for Snippet {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "TITLE", "FILE", "VISIBILITY"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.title, 50),
            self.file_name.clone().unwrap_or_default(),
            self.visibility.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }
}

impl TableOutput for Snippet {
    fn print_table(&self, color: bool) {
        print_header(&format!("${}: {}", self.id, self.title));
        println!();

        if let Some(file_name) = &self.file_name {
            print_field("File", file_name, color);
        }
        if let Some(visibility) = self.visibility {
            print_field("Visibility", visibility.as_str(), color);
        }
        if let Some(author) = &self.author {
            print_field("Author", &author.username, color);
        }
        if let Some(created) = self.created_at {
            print_field("Created", &created.format("%Y-%m-%d %H:%M").to_string(), color);
        }
        if let Some(url) = &self.web_url {
            print_field("URL", url, color);
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            println!();
            println!("{}", description);
        }
    }
}

impl SnippetCommand {
    /// Runs the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns the API failure; `main` maps it to an exit code.
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            SnippetSubcommand::List(args) => self.list(args, global),
            SnippetSubcommand::View(args) => self.view(args, global),
            SnippetSubcommand::Create(args) => self.create(args, global),
            SnippetSubcommand::Delete(args) => self.delete(args, global),
        }
    }

    fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let per_page = u32::try_from(args.limit)
            .unwrap_or(MAX_ITEMS_PER_PAGE)
            .clamp(1, MAX_ITEMS_PER_PAGE);

        let snippets = client
            .snippets()
            .pager(per_page)
            .into_items()
            .take(args.limit)
            .collect::<crate::api::Result<Vec<_>>>()
            .context("Failed to list snippets")?;

        global.output().write_list(&snippets)
    }

    fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let output = global.output();

        if args.content && !global.json {
            let content = client
                .snippets()
                .content(args.id)
                .with_context(|| format!("Failed to fetch content of snippet {}", args.id))?;
            output.write_raw(&content);
            return Ok(());
        }

        let snippet = client
            .snippets()
            .get(args.id, args.content)
            .with_context(|| format!("Failed to fetch snippet {}", args.id))?;
        output.write(&snippet)
    }

    fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let content = match (&args.content, &args.content_file) {
            (Some(content), _) => content.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => anyhow::bail!("Either --content or --content-file is required"),
        };

        let client = global.client()?;
        let request = CreateSnippet {
            visibility: args.visibility,
            description: args.description.clone(),
            ..CreateSnippet::new(&args.title, &args.file_name, content)
        };
        let created = client
            .snippets()
            .create(&request)
            .context("Failed to create snippet")?;

        let output = global.output();
        if global.json {
            return output.write(&created);
        }
        output.write_success(&format!("Created snippet {}: {}", created.id, created.title));
        if let Some(url) = &created.web_url {
            output.write_info(url);
        }
        Ok(())
    }

    fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        client
            .snippets()
            .delete(args.id)
            .with_context(|| format!("Failed to delete snippet {}", args.id))?;
        global
            .output()
            .write_success(&format!("Deleted snippet {}", args.id));
        Ok(())
    }
}
