//! Run summary types.

use crate::search::Disposition;

/// Summary of a complete collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of plugin repositories in the registry.
    pub plugins_in_registry: usize,

    /// Number of month windows searched.
    pub windows_searched: usize,

    /// Number of search pages fetched.
    pub pages_fetched: usize,

    /// Number of pull requests seen, regardless of repository.
    pub pull_requests_found: usize,

    /// Number of pull requests in the matched set.
    pub matched: usize,

    /// Pull requests outside known plugin repositories.
    pub skipped_not_plugin: usize,

    /// Pull requests opened by excluded bot accounts.
    pub skipped_bot_author: usize,

    /// Pull requests whose body has no marker.
    pub skipped_no_marker: usize,

    /// Whether the found-PRs file was written.
    pub found_prs_written: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with the disposition of one pull request.
    pub fn record(&mut self, disposition: Disposition) {
        self.pull_requests_found += 1;
        match disposition {
            Disposition::NotPlugin => self.skipped_not_plugin += 1,
            Disposition::BotAuthor => self.skipped_bot_author += 1,
            Disposition::NoMarker => self.skipped_no_marker += 1,
            Disposition::Matched => self.matched += 1,
        }
    }
}
