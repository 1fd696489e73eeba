//! Per-repository traffic collection.
//!
//! Each repository is fetched on its own; a failure is logged and that
//! repository is left out, the rest of the run is unaffected.

use tracing::{info, warn};

use crate::github::{GithubClient, TrafficResponse};

/// Views reported for a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyViewSample {
    pub timestamp: String,
    pub count: u64,
}

/// Flattened traffic for one repository. `total_views >= unique_visitors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficRecord {
    pub repository: String,
    pub total_views: u64,
    pub unique_visitors: u64,
    pub daily_samples: Vec<DailyViewSample>,
}

impl TrafficRecord {
    pub fn from_response(repository: &str, resp: TrafficResponse) -> Self {
        let daily_samples = resp
            .views
            .unwrap_or_default()
            .into_iter()
            .map(|v| DailyViewSample {
                timestamp: v.timestamp,
                count: v.count,
            })
            .collect();

        Self {
            repository: repository.to_string(),
            total_views: resp.count,
            unique_visitors: resp.uniques,
            daily_samples,
        }
    }
}

/// Fetch traffic for every repository, in input order, skipping the ones that fail.
pub async fn collect(client: &GithubClient, repositories: &[String]) -> Vec<TrafficRecord> {
    let mut records = Vec::with_capacity(repositories.len());

    for repo in repositories {
        match client.repo_traffic(repo).await {
            Ok(resp) => records.push(TrafficRecord::from_response(repo, resp)),
            Err(e) => {
                warn!(repository = %repo, error = %e, "skipping repository, traffic fetch failed");
            }
        }
    }

    info!(
        requested = repositories.len(),
        collected = records.len(),
        "collected traffic"
    );

    records
}
