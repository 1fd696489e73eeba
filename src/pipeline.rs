//! Runs the stages in order: credentials, listing, collection, report.

use std::io::Write;

use tracing::info;

use crate::config::{self, CredentialSource};
use crate::error::{RenderError, Result};
use crate::github::{DEFAULT_API_URL, GithubClient};
use crate::report::{self, RenderOptions, RenderOutcome};
use crate::traffic;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub api_url: String,
    pub render: RenderOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            render: RenderOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The account owns no repositories; collection was skipped.
    NoRepositories,
    Report(RenderOutcome),
}

pub async fn run(
    source: &impl CredentialSource,
    options: &RunOptions,
    out: &mut impl Write,
) -> Result<RunOutcome> {
    let credentials = config::load(source)?;
    info!(account = %credentials.account, "loaded credentials");

    let client = GithubClient::with_base_url(&credentials, &options.api_url)?;

    let repos = client.list_repositories(&credentials.account).await?;
    info!(account = %credentials.account, count = repos.len(), "listed repositories");

    if repos.is_empty() {
        writeln!(out, "No repositories found for {}.", credentials.account)
            .map_err(RenderError::Output)?;
        return Ok(RunOutcome::NoRepositories);
    }

    let records = traffic::collect(&client, &repos).await;
    let outcome = report::render(&records, &credentials.account, &options.render, out)?;

    Ok(RunOutcome::Report(outcome))
}
