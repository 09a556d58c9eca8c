//
//  gitlab-client
//  cli/mr.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `glc mr`: merge request commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;

use super::GlobalOptions;
use crate::api::{
    AcceptMergeRequest, Commit, CreateMergeRequest, MergeRequest, MergeRequestFilter,
    MergeRequestState, Participant, StateEvent, UpdateMergeRequest, MAX_ITEMS_PER_PAGE,
};
use crate::output::{format_state, print_field, print_header, truncate, TableOutput, TableRow};

/// Merge request commands.
#[derive(Args, Debug)]
pub struct MrCommand {
    #[command(subcommand)]
    pub command: MrSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MrSubcommand {
    /// List merge requests
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a merge request
    View(MrRef),

    /// Open a merge request
    Create(CreateArgs),

    /// Merge a merge request
    Merge(MergeArgs),

    /// Close a merge request
    Close(MrRef),

    /// Reopen a closed merge request
    Reopen(MrRef),

    /// Approve a merge request
    Approve(ApproveArgs),

    /// Withdraw your approval
    Unapprove(MrRef),

    /// Delete a merge request
    Delete(MrRef),

    /// List the users taking part in a merge request
    Participants(MrRef),

    /// List the commits of a merge request
    Commits(MrRef),
}

/// A merge request reference: project and IID.
#[derive(Args, Debug)]
pub struct MrRef {
    /// Project ID or path (group/project)
    pub project: String,

    /// Merge request IID
    pub iid: u64,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only this project (ID or path); all visible projects otherwise
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Filter by state (opened, closed, locked, merged, all)
    #[arg(long, short = 's', default_value = "opened")]
    pub state: MergeRequestState,

    /// Maximum number of merge requests to list
    #[arg(long, short = 'L', default_value_t = 30)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project ID or path (group/project)
    pub project: String,

    /// Source branch
    #[arg(long, short = 's')]
    pub source: String,

    /// Target branch
    #[arg(long, short = 't')]
    pub target: String,

    /// Title
    #[arg(long)]
    pub title: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Label to add (repeatable)
    #[arg(long = "label", short = 'l')]
    pub labels: Vec<String>,

    /// User ID to assign
    #[arg(long)]
    pub assignee_id: Option<u64>,

    /// Remove the source branch once merged
    #[arg(long)]
    pub remove_source_branch: bool,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub mr: MrRef,

    /// Merge commit message
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Remove the source branch after merging
    #[arg(long)]
    pub remove_source_branch: bool,

    /// Merge once the pipeline succeeds
    #[arg(long)]
    pub when_pipeline_succeeds: bool,

    /// Only merge if the source branch head is this SHA
    #[arg(long)]
    pub sha: Option<String>,
}

#[derive(Args, Debug)]
pub struct ApproveArgs {
    #[command(flatten)]
    pub mr: MrRef,

    /// Only approve if the source branch head is this SHA
    #[arg(long)]
    pub sha: Option<String>,
}

impl TableRow for MergeRequest {
    fn headers() -> Vec<&'static str> {
        vec!["IID", "TITLE", "STATE", "AUTHOR", "BRANCHES"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let iid = format!("!{}", self.iid);
        vec![
            if color { style(iid).cyan().to_string() } else { iid },
            truncate(&self.title, 50),
            format_state(self.state.as_str(), color),
            self.author
                .as_ref()
                .map(|a| a.username.clone())
                .unwrap_or_default(),
            format!(
                "{} → {}",
                truncate(&self.source_branch, 24),
                truncate(&self.target_branch, 16)
            ),
        ]
    }
}

impl TableOutput for MergeRequest {
    fn print_table(&self, color: bool) {
        print_header(&format!("!{}: {}", self.iid, self.title));
        println!();

        print_field("State", &format_state(self.state.as_str(), color), color);
        if let Some(status) = &self.merge_status {
            print_field("Merge status", status, color);
        }
        if let Some(author) = &self.author {
            print_field("Author", &author.username, color);
        }
        if let Some(assignee) = &self.assignee {
            print_field("Assignee", &assignee.username, color);
        }
        print_field(
            "Branches",
            &format!("{} → {}", self.source_branch, self.target_branch),
            color,
        );
        if !self.labels.is_empty() {
            print_field("Labels", &self.labels.join(", "), color);
        }
        if self.work_in_progress {
            print_field("Draft", "yes", color);
        }
        print_field(
            "Votes",
            &format!("+{} / -{}", self.upvotes, self.downvotes),
            color,
        );
        print_field("Comments", &self.user_notes_count.to_string(), color);
        if let Some(created) = self.created_at {
            print_field("Created", &created.format("%Y-%m-%d %H:%M").to_string(), color);
        }
        if let Some(updated) = self.updated_at {
            print_field("Updated", &updated.format("%Y-%m-%d %H:%M").to_string(), color);
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

impl TableRow for Participant {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "USERNAME", "NAME"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![self.id.to_string(), self.username.clone(), self.name.clone()]
    }
}

impl TableRow for Commit {
    fn headers() -> Vec<&'static str> {
        vec!["SHA", "TITLE", "AUTHOR"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let sha = if self.short_id.is_empty() {
            self.id.chars().take(8).collect()
        } else {
            self.short_id.clone()
        };
        vec![
            if color { style(sha).yellow().to_string() } else { sha },
            truncate(&self.title, 60),
            self.author_name.clone().unwrap_or_default(),
        ]
    }
}

impl MrCommand {
    /// Runs the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns the API failure; `main` maps it to an exit code.
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            MrSubcommand::List(args) => self.list(args, global),
            MrSubcommand::View(mr) => self.view(mr, global),
            MrSubcommand::Create(args) => self.create(args, global),
            MrSubcommand::Merge(args) => self.merge(args, global),
            MrSubcommand::Close(mr) => self.transition(mr, StateEvent::Close, global),
            MrSubcommand::Reopen(mr) => self.transition(mr, StateEvent::Reopen, global),
            MrSubcommand::Approve(args) => self.approve(args, global),
            MrSubcommand::Unapprove(mr) => self.unapprove(mr, global),
            MrSubcommand::Delete(mr) => self.delete(mr, global),
            MrSubcommand::Participants(mr) => self.participants(mr, global),
            MrSubcommand::Commits(mr) => self.commits(mr, global),
        }
    }

    fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let api = client.merge_requests();
        let per_page = u32::try_from(args.limit)
            .unwrap_or(MAX_ITEMS_PER_PAGE)
            .clamp(1, MAX_ITEMS_PER_PAGE);

        let pager = match &args.project {
            Some(project) => api.project_merge_requests_pager(project, Some(args.state), per_page)?,
            None => {
                let filter = MergeRequestFilter {
                    state: Some(args.state),
                    ..Default::default()
                };
                api.pager(Some(&filter), per_page)?
            }
        };

        let mrs = pager
            .into_items()
            .take(args.limit)
            .collect::<crate::api::Result<Vec<_>>>()
            .context("Failed to list merge requests")?;

        global.output().write_list(&mrs)
    }

    fn view(&self, mr: &MrRef, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let found = client
            .merge_requests()
            .get(&mr.project, mr.iid)
            .with_context(|| format!("Failed to fetch merge request !{}", mr.iid))?;
        global.output().write(&found)
    }

    fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let request = CreateMergeRequest {
            description: args.description.clone(),
            labels: (!args.labels.is_empty()).then(|| args.labels.clone()),
            assignee_id: args.assignee_id,
            remove_source_branch: args.remove_source_branch.then_some(true),
            ..CreateMergeRequest::new(&args.source, &args.target, &args.title)
        };

        let created = client
            .merge_requests()
            .create(&args.project, &request)
            .context("Failed to create merge request")?;

        let output = global.output();
        if global.json {
            return output.write(&created);
        }
        output.write_success(&format!("Created merge request !{}: {}", created.iid, created.title));
        if let Some(url) = &created.web_url {
            output.write_info(url);
        }
        Ok(())
    }

    fn merge(&self, args: &MergeArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let accept = AcceptMergeRequest {
            merge_commit_message: args.message.clone(),
            should_remove_source_branch: args.remove_source_branch.then_some(true),
            merge_when_pipeline_succeeds: args.when_pipeline_succeeds.then_some(true),
            sha: args.sha.clone(),
        };

        let merged = client
            .merge_requests()
            .accept(&args.mr.project, args.mr.iid, &accept)
            .with_context(|| format!("Failed to merge merge request !{}", args.mr.iid))?;

        let output = global.output();
        if global.json {
            return output.write(&merged);
        }
        if args.when_pipeline_succeeds && merged.state != MergeRequestState::Merged {
            output.write_success(&format!(
                "Merge request !{} will be merged when the pipeline succeeds",
                merged.iid
            ));
        } else {
            output.write_success(&format!("Merged merge request !{}", merged.iid));
        }
        Ok(())
    }

    fn transition(&self, mr: &MrRef, event: StateEvent, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let updated = client
            .merge_requests()
            .update(&mr.project, mr.iid, &UpdateMergeRequest::transition(event))
            .with_context(|| format!("Failed to {} merge request !{}", event, mr.iid))?;

        let output = global.output();
        if global.json {
            return output.write(&updated);
        }
        let verb = match event {
            StateEvent::Close => "Closed",
            StateEvent::Reopen => "Reopened",
        };
        output.write_success(&format!("{} merge request !{}", verb, updated.iid));
        Ok(())
    }

    fn approve(&self, args: &ApproveArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let approved = client
            .merge_requests()
            .approve(&args.mr.project, args.mr.iid, args.sha.as_deref())
            .with_context(|| format!("Failed to approve merge request !{}", args.mr.iid))?;

        let output = global.output();
        if global.json {
            return output.write(&approved);
        }
        output.write_success(&format!("Approved merge request !{}", args.mr.iid));
        Ok(())
    }

    fn unapprove(&self, mr: &MrRef, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let unapproved = client
            .merge_requests()
            .unapprove(&mr.project, mr.iid)
            .with_context(|| format!("Failed to unapprove merge request !{}", mr.iid))?;

        let output = global.output();
        if global.json {
            return output.write(&unapproved);
        }
        output.write_success(&format!("Removed approval from merge request !{}", mr.iid));
        Ok(())
    }

    fn delete(&self, mr: &MrRef, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        client
            .merge_requests()
            .delete(&mr.project, mr.iid)
            .with_context(|| format!("Failed to delete merge request !{}", mr.iid))?;
        global
            .output()
            .write_success(&format!("Deleted merge request !{}", mr.iid));
        Ok(())
    }

    fn participants(&self, mr: &MrRef, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let participants = client
            .merge_requests()
            .participants_pager(&mr.project, mr.iid, MAX_ITEMS_PER_PAGE)
            .all()
            .context("Failed to list participants")?;
        global.output().write_list(&participants)
    }

    fn commits(&self, mr: &MrRef, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let commits = client
            .merge_requests()
            .commits_pager(&mr.project, mr.iid, MAX_ITEMS_PER_PAGE)
            .all()
            .context("Failed to list commits")?;
        global.output().write_list(&commits)
    }
}
