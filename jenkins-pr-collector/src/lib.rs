#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod graphql;
pub mod output;
pub mod rate_limit;
pub mod registry;
pub mod retry;
pub mod runner;
pub mod search;
pub mod summary;

pub use graphql::{decode_response, GraphQlClient, QueryError};
pub use output::{write_json_file, OutputError};
pub use rate_limit::{CancelHandle, Cancellation, Cancelled, RequestThrottle};
pub use registry::{
    extract_json_span, fetch_registry, parse_registry, repository_short_name, PluginInfo,
    PluginRegistry, RegistryError,
};
pub use retry::{retry, FailureKind, RetryPolicy};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use search::{
    classify, process_page, search_query, CollectedPullRequest, Collector, DateRange,
    Disposition, PullRequestNode, SearchError, SearchOutcome, Window, DATE_FORMAT,
};
pub use summary::RunSummary;
