//! Minimal client for the Pagure REST API as deployed on Fedora dist-git.
//!
//! Covers exactly the operations the command handlers need: listing open
//! pull requests (following the server's pagination links), fetching a
//! single pull request, closing and merging, and reading CI flags and the
//! raw patch text. Wire-format types stay private to this module.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, header};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::types::{DISTGIT_NAMESPACE, DistGitForge, Flag, Package, PullRequest};

// Safety cap on following `pagination.next` links from a misbehaving server.
const MAX_LIST_PAGES: usize = 20;

/// Authenticated handle to a Pagure instance.
///
/// Constructed once at startup and read-only afterwards.
pub struct Pagure {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl Pagure {
    pub fn new(token: impl Into<String>, instance_url: &str) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            anyhow::bail!("Forge token must not be empty");
        }

        let base_url = Url::parse(instance_url)
            .with_context(|| format!("Invalid forge URL: '{instance_url}'"))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// URL under the `/api/0` namespace.
    fn api_url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/api/0/{path}", self.base());
        Url::parse(&raw).with_context(|| format!("Invalid forge URL: '{raw}'"))
    }

    /// URL outside the API namespace (the patch endpoint lives there).
    fn repo_url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{path}", self.base());
        Url::parse(&raw).with_context(|| format!("Invalid forge URL: '{raw}'"))
    }

    fn pr_path(package: Package, id: u64) -> String {
        format!("{DISTGIT_NAMESPACE}/{}/pull-request/{id}", package.repo())
    }

    /// Sends an authenticated request and turns non-2xx replies into errors
    /// carrying the status code and the forge's `error` message if present.
    async fn request(&self, method: Method, url: Url) -> Result<reqwest::Response> {
        debug!(%method, %url, "forge request");

        let response = self
            .http
            .request(method, url.clone())
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiError>(&body)
            .map(|reply| reply.error)
            .unwrap_or(body);
        if detail.trim().is_empty() {
            anyhow::bail!("Forge returned {status} for {url}");
        }
        anyhow::bail!("Forge returned {status} for {url}: {detail}");
    }

    async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.request(Method::GET, url)
            .await?
            .json::<T>()
            .await
            .context("Failed to decode forge response")
    }

    async fn post_action(&self, url: Url) -> Result<()> {
        let response = self.request(Method::POST, url).await?;
        let reply = response.text().await.unwrap_or_default();
        debug!(%reply, "forge action reply");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestListPage {
    requests: Vec<PullRequest>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlagListPage {
    flags: Vec<Flag>,
}

#[async_trait]
impl DistGitForge for Pagure {
    async fn list_open_pull_requests(&self, package: Package) -> Result<Vec<PullRequest>> {
        let mut url = self.api_url(&format!(
            "{DISTGIT_NAMESPACE}/{}/pull-requests?status=Open",
            package.repo()
        ))?;

        let mut requests = Vec::new();
        let mut pages = 0;
        loop {
            pages += 1;
            let page: PullRequestListPage = self.get_json(url).await?;
            requests.extend(page.requests);

            let Some(next) = page.pagination.next else {
                break;
            };
            if pages >= MAX_LIST_PAGES {
                warn!("Stopping after {MAX_LIST_PAGES} pages of pull requests");
                break;
            }
            url = Url::parse(&next)
                .with_context(|| format!("Invalid pagination URL from forge: '{next}'"))?;
        }

        Ok(requests)
    }

    async fn get_pull_request(&self, package: Package, id: u64) -> Result<PullRequest> {
        let url = self.api_url(&Self::pr_path(package, id))?;
        self.get_json(url).await
    }

    async fn close_pull_request(&self, package: Package, id: u64) -> Result<()> {
        let url = self.api_url(&format!("{}/close", Self::pr_path(package, id)))?;
        self.post_action(url).await
    }

    async fn merge_pull_request(&self, package: Package, id: u64) -> Result<()> {
        let url = self.api_url(&format!("{}/merge", Self::pr_path(package, id)))?;
        self.post_action(url).await
    }

    async fn pull_request_flags(&self, package: Package, id: u64) -> Result<Vec<Flag>> {
        let url = self.api_url(&format!("{}/flag", Self::pr_path(package, id)))?;
        let page: FlagListPage = self.get_json(url).await?;
        Ok(page.flags)
    }

    async fn pull_request_patch(&self, package: Package, id: u64) -> Result<String> {
        let url = self.repo_url(&format!("{}.patch", Self::pr_path(package, id)))?;
        self.request(Method::GET, url)
            .await?
            .text()
            .await
            .context("Failed to read pull request patch")
    }
}
