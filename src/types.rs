use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Base URL of the Fedora dist-git Pagure instance.
pub const FEDORA_DISTGIT_URL: &str = "https://src.fedoraproject.org";

/// Namespace holding package repositories on dist-git.
pub const DISTGIT_NAMESPACE: &str = "rpms";

/// Packages whose dist-git pull requests this tool is allowed to touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Package {
    Packit,
    PythonOgr,
    PythonSpecfile,
}

impl Package {
    /// Repository name under the `rpms/` namespace.
    pub fn repo(&self) -> &'static str {
        match self {
            Package::Packit => "packit",
            Package::PythonOgr => "python-ogr",
            Package::PythonSpecfile => "python-specfile",
        }
    }
}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.repo())
    }
}

/// An open pull request on dist-git, as reported by the forge.
///
/// Field names follow the Pagure API payload: `branch` is the target branch,
/// `branch_from` the source branch, and `initial_comment` the description.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    #[serde(rename = "branch_from")]
    pub source_branch: String,
    #[serde(rename = "branch")]
    pub target_branch: String,
    #[serde(rename = "initial_comment", default)]
    pub description: Option<String>,
}

/// A CI flag attached to a pull request.
///
/// Pagure reports the CI system's account name as `username` and the state
/// as a free-form `status` string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Flag {
    #[serde(rename = "username")]
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Flag {
    pub fn state(&self) -> FlagState {
        FlagState::from_status(&self.status)
    }

    /// Whether this flag reports a failed CI run.
    pub fn is_failed(&self) -> bool {
        self.state().is_failed()
    }
}

/// Classified CI flag state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagState {
    Error,
    Failure,
    Warning,
    Success,
    Pending,
    /// Anything the forge reports that we do not classify (e.g. canceled).
    Other,
}

impl FlagState {
    pub fn from_status(status: &str) -> Self {
        match status {
            "error" => FlagState::Error,
            "failure" => FlagState::Failure,
            "warning" => FlagState::Warning,
            "success" => FlagState::Success,
            "pending" => FlagState::Pending,
            _ => FlagState::Other,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            FlagState::Error | FlagState::Failure | FlagState::Warning
        )
    }
}

impl std::fmt::Display for FlagState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlagState::Error => "error",
            FlagState::Failure => "failure",
            FlagState::Warning => "warning",
            FlagState::Success => "success",
            FlagState::Pending => "pending",
            FlagState::Other => "other",
        };
        f.write_str(name)
    }
}

/// Operations the command handlers need from a dist-git forge.
///
/// `Pagure` is the production implementation; tests substitute a mock.
#[async_trait]
pub trait DistGitForge {
    /// Lists the open pull requests of `rpms/<package>`.
    async fn list_open_pull_requests(&self, package: Package) -> Result<Vec<PullRequest>>;

    /// Fetches a single pull request by id.
    async fn get_pull_request(&self, package: Package, id: u64) -> Result<PullRequest>;

    /// Closes the pull request with the given id.
    async fn close_pull_request(&self, package: Package, id: u64) -> Result<()>;

    /// Merges the pull request with the given id.
    async fn merge_pull_request(&self, package: Package, id: u64) -> Result<()>;

    /// Fetches the CI flags attached to a pull request.
    async fn pull_request_flags(&self, package: Package, id: u64) -> Result<Vec<Flag>>;

    /// Fetches the raw patch text of a pull request.
    async fn pull_request_patch(&self, package: Package, id: u64) -> Result<String>;
}
