//! Distgit-review: review, close, and merge Fedora dist-git pull requests.
//!
//! Provides functionality for listing the open pull requests of a Packit
//! project's dist-git repository, filtering them by version and target
//! branch, printing their details together with failed CI flags, and
//! closing or merging a pull request by id.

pub mod cli;
pub mod commands;
pub mod config;
pub mod pagure;
pub mod types;

pub use cli::{Cli, Command, parse_args};
pub use commands::{close_pr, merge_pr, print_pr_info, run};
pub use config::{resolve_token, resolve_token_from};
pub use pagure::Pagure;
pub use types::{
    DISTGIT_NAMESPACE, DistGitForge, FEDORA_DISTGIT_URL, Flag, FlagState, Package, PullRequest,
};
