//! Error types for each stage of the traffic pipeline.
//!
//! Fatal kinds (configuration, repository listing, rendering) are folded into
//! [`Error`] and unwind to `main`. [`TrafficFetchError`] is per repository and
//! never leaves the collector.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{key} is not set or empty; add it to the .env file or the environment")]
    MissingValue { key: &'static str },

    #[error("failed to read env file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
}

#[derive(Debug, Error)]
pub enum RepositoryListError {
    #[error("network error listing repositories for {account}: {source}")]
    Transport {
        account: String,
        source: reqwest::Error,
    },

    #[error("listing repositories for {account} returned HTTP {}", .status.as_u16())]
    Status { account: String, status: StatusCode },

    #[error("unexpected repository listing for {account}: {source}")]
    Decode {
        account: String,
        source: serde_json::Error,
    },
}

impl RepositoryListError {
    /// HTTP status observed on the listing call, if the platform answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TrafficFetchError {
    #[error("network error fetching traffic for {repository}: {source}")]
    Transport {
        repository: String,
        source: reqwest::Error,
    },

    #[error("traffic for {repository} returned HTTP {}", .status.as_u16())]
    Status {
        repository: String,
        status: StatusCode,
    },

    #[error("unexpected traffic payload for {repository}: {source}")]
    Decode {
        repository: String,
        source: serde_json::Error,
    },

    #[error("inconsistent traffic for {repository}: {uniques} unique visitors exceed {count} views")]
    Invalid {
        repository: String,
        count: u64,
        uniques: u64,
    },
}

impl TrafficFetchError {
    pub fn repository(&self) -> &str {
        match self {
            Self::Transport { repository, .. }
            | Self::Status { repository, .. }
            | Self::Decode { repository, .. }
            | Self::Invalid { repository, .. } => repository,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write chart to {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to print report: {0}")]
    Output(#[source] std::io::Error),
}

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    RepositoryList(#[from] RepositoryListError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
