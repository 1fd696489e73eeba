//! Page-view traffic for every repository an account owns, printed as a
//! table and drawn as a bar chart.

pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod svg;
pub mod table;
pub mod traffic;

pub use config::{CredentialSource, Credentials, EnvFileSource};
pub use error::{ConfigurationError, Error, RenderError, RepositoryListError, TrafficFetchError};
pub use github::GithubClient;
pub use pipeline::{RunOptions, RunOutcome, run};
pub use report::{RenderOptions, RenderOutcome, render};
pub use traffic::{DailyViewSample, TrafficRecord, collect};
