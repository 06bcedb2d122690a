//! Normalised pull-request records written to the output files.

use super::query::PullRequestNode;
use crate::registry::PluginInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request as persisted in `jenkins_prs.json` and `found_prs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedPullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Author login.
    pub user: String,

    /// `owner/name` of the repository.
    pub repository: String,

    /// Plugin built from the repository, empty when it is not a plugin.
    pub plugin_name: String,

    /// Always serialised, empty when labels were not collected.
    pub labels: Vec<String>,

    pub url: String,

    /// Body text of the pull request.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Rollup state of the latest commit.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub check_status: String,
}

impl CollectedPullRequest {
    /// Builds a record from a search result.
    #[must_use]
    pub fn from_node(
        node: &PullRequestNode,
        plugin: Option<&PluginInfo>,
        labels: Vec<String>,
    ) -> Self {
        Self {
            number: node.number,
            title: node.title.clone(),
            state: node.state.clone(),
            created_at: node.created_at,
            updated_at: node.updated_at,
            user: node.author_login().to_string(),
            repository: node.full_name(),
            plugin_name: plugin.map(|p| p.name.clone()).unwrap_or_default(),
            labels,
            url: node.url.clone(),
            description: node.body_text.clone(),
            check_status: node.check_status(),
        }
    }
}
