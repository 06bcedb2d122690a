//! Decides whether a search result belongs to the matched set.

use super::query::PullRequestNode;
use crate::registry::PluginRegistry;

/// Author logins excluded from the matched set (exact match).
pub const BOT_AUTHORS: [&str; 2] = ["dependabot", "renovate"];

/// Body substrings that mark a pull request as relevant. `odernizer` matches
/// both "Modernizer" and "modernizer".
pub const BODY_MARKERS: [&str; 2] = ["odernizer", "recipe"];

/// Outcome of classifying one search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Repository is not a known plugin repository.
    NotPlugin,
    /// Opened by an excluded bot account.
    BotAuthor,
    /// Body has none of the markers.
    NoMarker,
    /// Belongs to the matched set.
    Matched,
}

/// Classifies `node`. Checks run in order: registry, author, body.
#[must_use]
pub fn classify(node: &PullRequestNode, registry: &PluginRegistry) -> Disposition {
    if registry.get(&node.repository.name).is_none() {
        return Disposition::NotPlugin;
    }
    if BOT_AUTHORS.contains(&node.author_login()) {
        return Disposition::BotAuthor;
    }
    if !BODY_MARKERS
        .iter()
        .any(|marker| node.body_text.contains(marker))
    {
        return Disposition::NoMarker;
    }
    Disposition::Matched
}
