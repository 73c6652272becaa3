//! Handlers for the three subcommands.
//!
//! Each handler is generic over [`DistGitForge`] and writes to a
//! caller-supplied writer, so the integration tests drive them against a
//! mock forge and inspect the output.

use std::io::Write;

use anyhow::Result;

use crate::{
    cli::Command,
    types::{DistGitForge, Package, PullRequest},
};

/// Dispatches a parsed command to its handler.
pub async fn run<F, W>(command: Command, forge: &F, out: &mut W) -> Result<()>
where
    F: DistGitForge + Sync,
    W: Write,
{
    match command {
        Command::PrintPr {
            package,
            version,
            dist_git_branch,
        } => print_pr_info(forge, out, package, &version, &dist_git_branch).await,
        Command::Close { package, pr_id } => close_pr(forge, out, package, pr_id).await,
        Command::Merge { package, pr_id } => merge_pr(forge, out, package, pr_id).await,
    }
}

/// Whether a PR is an update for the given version targeting the given
/// branch: substring match on the title, exact match on the target branch.
pub fn pr_matches(pr: &PullRequest, version: &str, dist_git_branch: &str) -> bool {
    pr.title.contains(version) && pr.target_branch == dist_git_branch
}

/// Prints details of every open PR matching the version and branch.
pub async fn print_pr_info<F, W>(
    forge: &F,
    out: &mut W,
    package: Package,
    version: &str,
    dist_git_branch: &str,
) -> Result<()>
where
    F: DistGitForge + Sync,
    W: Write,
{
    let prs = forge.list_open_pull_requests(package).await?;

    let mut found = false;
    for pr in prs.iter().filter(|pr| pr_matches(pr, version, dist_git_branch)) {
        write_pr_details(forge, out, package, pr).await?;
        found = true;
    }

    if !found {
        writeln!(out, "No open PRs found for {package} on {dist_git_branch}")?;
    }

    Ok(())
}

async fn write_pr_details<F, W>(
    forge: &F,
    out: &mut W,
    package: Package,
    pr: &PullRequest,
) -> Result<()>
where
    F: DistGitForge + Sync,
    W: Write,
{
    let patch = forge.pull_request_patch(package, pr.id).await?;
    let flags = forge.pull_request_flags(package, pr.id).await?;

    writeln!(out, "PR {}: {}, Source branch: {}", pr.id, pr.title, pr.source_branch)?;
    writeln!(out, "Target branch: {}", pr.target_branch)?;
    writeln!(out, "Description: {}", pr.description.as_deref().unwrap_or(""))?;
    writeln!(out, "File diff: {patch}")?;
    for flag in flags.iter().filter(|flag| flag.is_failed()) {
        writeln!(out, "Failed CI job: {}", flag.name)?;
    }
    writeln!(out)?;

    Ok(())
}

/// Closes a PR by id and prints a confirmation.
pub async fn close_pr<F, W>(forge: &F, out: &mut W, package: Package, pr_id: u64) -> Result<()>
where
    F: DistGitForge + Sync,
    W: Write,
{
    let pr = forge.get_pull_request(package, pr_id).await?;
    forge.close_pull_request(package, pr.id).await?;
    writeln!(out, "Closed PR {} for {package}", pr.id)?;
    Ok(())
}

/// Merges a PR by id and prints a confirmation.
pub async fn merge_pr<F, W>(forge: &F, out: &mut W, package: Package, pr_id: u64) -> Result<()>
where
    F: DistGitForge + Sync,
    W: Write,
{
    let pr = forge.get_pull_request(package, pr_id).await?;
    forge.merge_pull_request(package, pr.id).await?;
    writeln!(out, "Merged PR {} for {package}", pr.id)?;
    Ok(())
}
