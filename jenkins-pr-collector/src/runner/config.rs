//! Runner configuration.

use crate::graphql::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::rate_limit::DEFAULT_REQUESTS_PER_SECOND;
use crate::registry::DEFAULT_UPDATE_CENTER_URL;
use crate::retry::RetryPolicy;
use crate::search::{DateRange, DEFAULT_ORGANIZATION};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default path of the matched pull requests file.
pub const DEFAULT_OUTPUT_FILE: &str = "jenkins_prs.json";

/// Default path of the all-found pull requests file.
pub const DEFAULT_FOUND_PRS_FILE: &str = "found_prs.json";

/// Configuration for one collection run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// GitHub token used for GraphQL calls.
    token: String,
    /// Period to search.
    range: DateRange,
    /// Matched pull requests file.
    output_path: PathBuf,
    /// All found pull requests file.
    found_prs_path: PathBuf,
    /// Update-center document URL.
    update_center_url: String,
    /// GitHub API base URL.
    api_url: String,
    /// Organisation to search.
    organization: String,
    /// GraphQL request rate.
    requests_per_second: NonZeroU32,
    /// Per-request timeout for both remote APIs.
    request_timeout: Duration,
    /// Retry policy for search pages.
    search_retry: RetryPolicy,
    /// Retry policy for the update-center download.
    registry_retry: RetryPolicy,
}

impl RunnerConfig {
    /// Creates a configuration with default paths, endpoints and limits.
    pub fn new(token: String, range: DateRange) -> Self {
        Self {
            token,
            range,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            found_prs_path: PathBuf::from(DEFAULT_FOUND_PRS_FILE),
            update_center_url: DEFAULT_UPDATE_CENTER_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            search_retry: RetryPolicy::search(),
            registry_retry: RetryPolicy::registry(),
        }
    }

    /// Sets the output file paths.
    pub fn with_output_paths(mut self, output_path: PathBuf, found_prs_path: PathBuf) -> Self {
        self.output_path = output_path;
        self.found_prs_path = found_prs_path;
        self
    }

    /// Sets a custom update-center URL.
    pub fn with_update_center_url(mut self, url: impl Into<String>) -> Self {
        self.update_center_url = url.into();
        self
    }

    /// Sets a custom GitHub API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Searches a different organisation.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Sets the GraphQL request rate.
    pub fn with_requests_per_second(mut self, requests_per_second: NonZeroU32) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides both retry policies.
    pub fn with_retry_policies(mut self, search: RetryPolicy, registry: RetryPolicy) -> Self {
        self.search_retry = search;
        self.registry_retry = registry;
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the period to search.
    pub fn range(&self) -> &DateRange {
        &self.range
    }

    /// Returns the matched pull requests file path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns the all-found pull requests file path.
    pub fn found_prs_path(&self) -> &Path {
        &self.found_prs_path
    }

    /// Returns the update-center URL.
    pub fn update_center_url(&self) -> &str {
        &self.update_center_url
    }

    /// Returns the GitHub API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the organisation to search.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the GraphQL request rate.
    pub fn requests_per_second(&self) -> NonZeroU32 {
        self.requests_per_second
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the search retry policy.
    pub fn search_retry(&self) -> &RetryPolicy {
        &self.search_retry
    }

    /// Returns the update-center retry policy.
    pub fn registry_retry(&self) -> &RetryPolicy {
        &self.registry_retry
    }
}
