use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::types::Package;

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Parser, Debug)]
#[command(name = "distgit-review")]
#[command(about = "Review, close, or merge Fedora dist-git PRs for Packit projects")]
#[command(long_version = BUILD_INFO_HUMAN)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print info for PRs that are opened for a given version and dist-git branch
    #[command(name = "print-pr")]
    PrintPr {
        /// Package name to print info for
        #[arg(value_enum)]
        package: Package,

        /// Version to review
        version: String,

        /// Dist-git branch to filter PRs for
        dist_git_branch: String,
    },

    /// Close a dist-git PR
    Close {
        /// Package name to close a PR for
        #[arg(value_enum)]
        package: Package,

        /// PR to close
        pr_id: u64,
    },

    /// Merge a dist-git PR
    Merge {
        /// Package name to merge a PR for
        #[arg(value_enum)]
        package: Package,

        /// PR to merge
        pr_id: u64,
    },
}

/// Parses command-line arguments into a [`Command`].
///
/// clap errors (including help/version requests) propagate as
/// `anyhow::Error` and are downcast by the caller.
pub fn parse_args<I, T>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    Ok(cli.command)
}
