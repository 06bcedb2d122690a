//! GraphQL search document and the shape of its results.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Check status reported when the latest commit has no rollup.
pub const UNKNOWN_CHECK_STATUS: &str = "UNKNOWN";

/// Paged pull-request search.
pub const SEARCH_QUERY: &str = r"
query SearchPullRequests($query: String!, $cursor: String) {
  search(query: $query, type: ISSUE, first: 100, after: $cursor) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      ... on PullRequest {
        number
        title
        state
        createdAt
        updatedAt
        url
        repository {
          name
          owner {
            login
          }
        }
        author {
          login
        }
        bodyText
        labels(first: 100) {
          nodes {
            name
          }
        }
        commits(last: 1) {
          nodes {
            commit {
              statusCheckRollup {
                state
              }
            }
          }
        }
      }
    }
  }
}";

/// `data` member of a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
    pub search: SearchConnection,
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConnection {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<Option<PullRequestNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// A pull request as returned by the search query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestNode {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub url: String,
    pub repository: RepositoryRef,
    /// Null for deleted accounts.
    pub author: Option<Actor>,
    #[serde(default)]
    pub body_text: String,
    pub labels: Option<Connection<Label>>,
    pub commits: Option<Connection<CommitNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub owner: Actor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub login: String,
}

/// A `{ nodes: [...] }` connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitNode {
    pub commit: Commit,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub status_check_rollup: Option<StatusCheckRollup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCheckRollup {
    #[serde(default)]
    pub state: String,
}

impl PullRequestNode {
    /// `owner/name` of the repository.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.repository.owner.login, self.repository.name)
    }

    /// Author login, empty when the author is unknown.
    #[must_use]
    pub fn author_login(&self) -> &str {
        self.author.as_ref().map_or("", |author| author.login.as_str())
    }

    /// Label names in the order returned.
    #[must_use]
    pub fn label_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .flat_map(|labels| labels.nodes.iter())
            .map(|label| label.name.clone())
            .collect()
    }

    /// Rollup state of the most recent commit, or `UNKNOWN`.
    #[must_use]
    pub fn check_status(&self) -> String {
        self.commits
            .as_ref()
            .and_then(|commits| commits.nodes.first())
            .and_then(|node| node.commit.status_check_rollup.as_ref())
            .map(|rollup| rollup.state.as_str())
            .filter(|state| !state.is_empty())
            .unwrap_or(UNKNOWN_CHECK_STATUS)
            .to_string()
    }
}

/// Builds the variables for one search page.
#[must_use]
pub fn search_variables(query: &str, cursor: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "query": query,
        "cursor": cursor,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn node_json(
        number: u64,
        repo: &str,
        author: &str,
        body: &str,
        labels: &[&str],
    ) -> serde_json::Value {
        json!({
            "number": number,
            "title": format!("PR {number}"),
            "state": "OPEN",
            "createdAt": "2024-01-20T10:00:00Z",
            "updatedAt": "2024-01-21T11:30:00Z",
            "url": format!("https://github.com/jenkinsci/{repo}/pull/{number}"),
            "repository": {"name": repo, "owner": {"login": "jenkinsci"}},
            "author": {"login": author},
            "bodyText": body,
            "labels": {"nodes": labels.iter().map(|name| json!({"name": name})).collect::<Vec<_>>()},
            "commits": {"nodes": [{"commit": {"statusCheckRollup": {"state": "SUCCESS"}}}]}
        })
    }

    pub(crate) fn node(
        number: u64,
        repo: &str,
        author: &str,
        body: &str,
        labels: &[&str],
    ) -> PullRequestNode {
        serde_json::from_value(node_json(number, repo, author, body, labels)).unwrap()
    }

    #[test]
    fn decodes_full_node() {
        let pr = node(7, "git-plugin", "alice", "body", &["dependencies", "chore"]);

        assert_eq!(pr.full_name(), "jenkinsci/git-plugin");
        assert_eq!(pr.author_login(), "alice");
        assert_eq!(pr.label_names(), vec!["dependencies", "chore"]);
        assert_eq!(pr.check_status(), "SUCCESS");
    }

    #[test]
    fn absent_rollup_is_unknown() {
        let mut value = node_json(1, "git-plugin", "alice", "", &[]);
        value["commits"] = json!({"nodes": [{"commit": {"statusCheckRollup": null}}]});
        let pr: PullRequestNode = serde_json::from_value(value).unwrap();
        assert_eq!(pr.check_status(), UNKNOWN_CHECK_STATUS);

        let mut value = node_json(2, "git-plugin", "alice", "", &[]);
        value["commits"] = json!({"nodes": []});
        let pr: PullRequestNode = serde_json::from_value(value).unwrap();
        assert_eq!(pr.check_status(), UNKNOWN_CHECK_STATUS);
    }

    #[test]
    fn null_author_and_labels_are_tolerated() {
        let mut value = node_json(3, "git-plugin", "ghost", "", &[]);
        value["author"] = serde_json::Value::Null;
        value["labels"] = serde_json::Value::Null;
        let pr: PullRequestNode = serde_json::from_value(value).unwrap();

        assert_eq!(pr.author_login(), "");
        assert!(pr.label_names().is_empty());
    }

    #[test]
    fn first_page_has_null_cursor() {
        let variables = search_variables("org:jenkinsci is:pr", None);
        assert_eq!(variables, json!({"query": "org:jenkinsci is:pr", "cursor": null}));

        let variables = search_variables("org:jenkinsci is:pr", Some("Y3Vyc29y"));
        assert_eq!(variables["cursor"], "Y3Vyc29y");
    }
}
