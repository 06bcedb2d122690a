//! Pull-request collection using the GitHub GraphQL search API.
//!
//! The requested date range is split into calendar-month windows. Each window
//! is searched page by page (100 results per page) through the request
//! throttle and the retry policy. Every result lands in the "all found" set;
//! results that pass [`classify`] also land in the "matched" set.

mod classify;
mod error;
mod query;
mod record;
mod window;

pub use classify::{classify, Disposition, BODY_MARKERS, BOT_AUTHORS};
pub use error::SearchError;
pub use query::{
    search_variables, PageInfo, PullRequestNode, SearchConnection, SearchData, SEARCH_QUERY,
    UNKNOWN_CHECK_STATUS,
};
pub use record::CollectedPullRequest;
pub use window::{DateRange, Window, DATE_FORMAT};

use crate::graphql::GraphQlClient;
use crate::rate_limit::{Cancellation, RequestThrottle};
use crate::registry::PluginRegistry;
use crate::retry::{retry, RetryPolicy};
use crate::summary::RunSummary;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, info_span, warn, Instrument};

/// GitHub organisation searched by default.
pub const DEFAULT_ORGANIZATION: &str = "jenkinsci";

/// Everything collected by one run.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Pull requests that passed every filter, with labels.
    pub matched: Vec<CollectedPullRequest>,

    /// Every pull request seen, without labels.
    pub all_found: Vec<CollectedPullRequest>,

    /// Counters for the run.
    pub summary: RunSummary,
}

/// Builds the search string for one window.
///
/// Format: `org:{organization} is:pr created:{start}..{end}`
#[must_use]
pub fn search_query(organization: &str, window: &Window) -> String {
    format!("org:{organization} is:pr {}", window.created_qualifier())
}

/// Drives the month-by-month, page-by-page search.
pub struct Collector<'a> {
    client: &'a GraphQlClient,
    throttle: &'a RequestThrottle,
    registry: &'a PluginRegistry,
    policy: RetryPolicy,
    organization: String,
    cancellation: Cancellation,
}

impl<'a> Collector<'a> {
    /// Creates a collector for the default organisation with the search
    /// retry policy and no cancellation.
    #[must_use]
    pub fn new(
        client: &'a GraphQlClient,
        throttle: &'a RequestThrottle,
        registry: &'a PluginRegistry,
    ) -> Self {
        Self {
            client,
            throttle,
            registry,
            policy: RetryPolicy::search(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            cancellation: Cancellation::never(),
        }
    }

    /// Searches `organization` instead of the default.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Uses `policy` for page fetches.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Aborts pending page fetches, throttle waits and backoff when
    /// `cancellation` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Collects every pull request created within `range`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] as soon as one page fails after retries. No
    /// partial results are returned.
    pub async fn collect(&self, range: &DateRange) -> Result<SearchOutcome, SearchError> {
        info!(
            organization = %self.organization,
            start = %range.start_date().format(DATE_FORMAT),
            end = %range.end_date().format(DATE_FORMAT),
            "Searching for pull requests"
        );

        let sink = Mutex::new(SearchOutcome::default());
        for window in range.windows() {
            let span = info_span!("window", window = %window);
            self.collect_window(&window, &sink).instrument(span).await?;
        }

        let outcome = sink.into_inner().unwrap_or_else(PoisonError::into_inner);
        info!(
            found = outcome.all_found.len(),
            matched = outcome.matched.len(),
            "Search complete"
        );
        Ok(outcome)
    }

    async fn collect_window(
        &self,
        window: &Window,
        sink: &Mutex<SearchOutcome>,
    ) -> Result<(), SearchError> {
        let query = search_query(&self.organization, window);
        debug!(query = %query, "Executing pull request search");

        let mut cursor: Option<String> = None;
        let mut total_found = 0;
        loop {
            debug!(cursor = ?cursor, "Fetching page");
            let page = self.fetch_page(&query, cursor.as_deref()).await?;
            let connection = page.search;
            let nodes: Vec<PullRequestNode> = connection.nodes.into_iter().flatten().collect();
            debug!(results = nodes.len(), "Received page");
            total_found += nodes.len();

            process_page(nodes, self.registry, sink);
            lock(sink).summary.pages_fetched += 1;

            if !connection.page_info.has_next_page {
                break;
            }
            match connection.page_info.end_cursor {
                Some(next) => {
                    debug!(cursor = %next, "Moving to next page");
                    cursor = Some(next);
                }
                None => {
                    warn!("Search reported a next page without a cursor, stopping window");
                    break;
                }
            }
        }

        lock(sink).summary.windows_searched += 1;
        info!(total_found, "Window complete");
        Ok(())
    }

    async fn fetch_page(
        &self,
        query: &str,
        cursor: Option<&str>,
    ) -> Result<SearchData, SearchError> {
        let variables = search_variables(query, cursor);
        retry(
            &self.policy,
            "GraphQL search",
            &self.cancellation,
            || {
                let variables = variables.clone();
                async move {
                    self.throttle.acquire(&self.cancellation).await?;
                    let data: SearchData = self.client.execute(SEARCH_QUERY, variables).await?;
                    Ok::<_, SearchError>(data)
                }
            },
            SearchError::failure_kind,
        )
        .await
    }
}

/// Records one page of results into `sink`.
///
/// Every node is appended to `all_found` without labels. Nodes classified as
/// [`Disposition::Matched`] are also appended to `matched` with their labels.
/// Both appends for a node happen under a single lock acquisition.
pub fn process_page(
    nodes: Vec<PullRequestNode>,
    registry: &PluginRegistry,
    sink: &Mutex<SearchOutcome>,
) {
    for node in nodes {
        debug!(
            number = node.number,
            title = %node.title,
            repository = %node.full_name(),
            author = %node.author_login(),
            "Pull request"
        );

        let plugin = registry.get(&node.repository.name);
        let found = CollectedPullRequest::from_node(&node, plugin, Vec::new());
        let disposition = classify(&node, registry);
        let matched = (disposition == Disposition::Matched)
            .then(|| CollectedPullRequest::from_node(&node, plugin, node.label_names()));

        let mut outcome = lock(sink);
        outcome.all_found.push(found);
        if let Some(record) = matched {
            info!(
                number = record.number,
                repository = %node.repository.name,
                "Matched pull request with plugin-modernizer traces"
            );
            outcome.matched.push(record);
        }
        outcome.summary.record(disposition);
    }
}

fn lock(sink: &Mutex<SearchOutcome>) -> MutexGuard<'_, SearchOutcome> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}
