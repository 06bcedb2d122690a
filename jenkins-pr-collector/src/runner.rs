//! Orchestrates a collection run: registry, search, persistence.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_FOUND_PRS_FILE, DEFAULT_OUTPUT_FILE};
pub use error::RunnerError;

use crate::graphql::GraphQlClient;
use crate::output::write_json_file;
use crate::rate_limit::{Cancellation, RequestThrottle};
use crate::registry::{fetch_registry, http_client};
use crate::search::{Collector, SearchOutcome, DATE_FORMAT};
use crate::summary::RunSummary;
use tracing::info;

/// Runs one collection pass.
pub struct Runner {
    config: RunnerConfig,
    github: GraphQlClient,
    http: reqwest::Client,
    throttle: RequestThrottle,
}

impl Runner {
    /// Validates the configuration and builds the HTTP clients.
    ///
    /// No network call is made here.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::MissingToken`] or [`RunnerError::InvalidRange`]
    /// for unusable configuration, or a client construction error.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        if config.token().trim().is_empty() {
            return Err(RunnerError::MissingToken);
        }

        let range = config.range();
        if range.start_date() > range.end_date() {
            return Err(RunnerError::InvalidRange {
                start: range.start_date().format(DATE_FORMAT).to_string(),
                end: range.end_date().format(DATE_FORMAT).to_string(),
            });
        }

        let github = GraphQlClient::new(
            config.token(),
            config.api_url(),
            config.request_timeout(),
        )?;
        let http = http_client(config.request_timeout())?;
        let throttle = RequestThrottle::per_second(config.requests_per_second());

        Ok(Self {
            config,
            github,
            http,
            throttle,
        })
    }

    /// Executes the full flow and writes the result files.
    ///
    /// Files are only written once the whole search succeeded. The found-PRs
    /// file is skipped when no pull request was seen. Firing `cancellation`
    /// aborts the run at the next pending request, backoff or throttle wait.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on the first unrecoverable failure.
    pub async fn run(&self, cancellation: Cancellation) -> Result<RunSummary, RunnerError> {
        let registry = fetch_registry(
            &self.http,
            self.config.update_center_url(),
            self.config.registry_retry(),
            &cancellation,
        )
        .await?;
        info!(count = registry.len(), "Found plugins in the update center");

        info!("Fetching pull requests using GraphQL");
        let SearchOutcome {
            matched,
            all_found,
            mut summary,
        } = Collector::new(&self.github, &self.throttle, &registry)
            .with_organization(self.config.organization())
            .with_retry_policy(*self.config.search_retry())
            .with_cancellation(cancellation)
            .collect(self.config.range())
            .await?;
        summary.plugins_in_registry = registry.len();
        info!(count = matched.len(), "Found pull requests");

        info!(path = %self.config.output_path().display(), "Writing results");
        write_json_file(self.config.output_path(), &matched)?;

        if all_found.is_empty() {
            info!(
                path = %self.config.found_prs_path().display(),
                "No pull requests found, not writing found PRs file"
            );
        } else {
            info!(path = %self.config.found_prs_path().display(), "Writing all found PRs");
            write_json_file(self.config.found_prs_path(), &all_found)?;
            summary.found_prs_written = true;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::DateRange;
    use chrono::NaiveDate;

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::inclusive(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
    }

    #[test]
    fn rejects_missing_token() {
        let config = RunnerConfig::new(String::new(), range((2024, 1, 1), (2024, 1, 31)));
        assert!(matches!(Runner::new(config), Err(RunnerError::MissingToken)));
    }

    #[test]
    fn rejects_inverted_range() {
        let config = RunnerConfig::new("token".to_string(), range((2024, 2, 1), (2024, 1, 1)));
        let err = Runner::new(config).err().unwrap();

        assert!(matches!(err, RunnerError::InvalidRange { .. }));
        assert_eq!(
            err.to_string(),
            "Start date 2024-02-01 is after end date 2024-01-01"
        );
    }

    #[test]
    fn config_defaults() {
        let config = RunnerConfig::new("token".to_string(), range((2024, 1, 1), (2024, 1, 31)));

        assert_eq!(config.output_path().to_str(), Some(DEFAULT_OUTPUT_FILE));
        assert_eq!(config.found_prs_path().to_str(), Some(DEFAULT_FOUND_PRS_FILE));
        assert_eq!(config.organization(), "jenkinsci");
        assert_eq!(config.requests_per_second().get(), 1);
        assert_eq!(
            config.update_center_url(),
            "https://updates.jenkins.io/current/update-center.actual.json"
        );
    }
}
