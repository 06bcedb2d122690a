//! Plugin metadata keyed by repository short-name.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A plugin published in the update center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    /// Plugin identifier, e.g. `git`.
    pub name: String,

    /// SCM URL as published.
    pub scm_url: String,
}

/// Read-only map from repository short-name to the plugin built from it.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, PluginInfo>,
}

impl PluginRegistry {
    /// Adds a plugin unless the repository is already claimed.
    ///
    /// Returns false if an earlier plugin owns `short_name`.
    pub fn insert(&mut self, short_name: String, plugin: PluginInfo) -> bool {
        match self.plugins.entry(short_name) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(plugin);
                true
            }
        }
    }

    /// Looks up the plugin built from repository `short_name`.
    #[must_use]
    pub fn get(&self, short_name: &str) -> Option<&PluginInfo> {
        self.plugins.get(short_name)
    }

    /// Number of plugin repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugin repository is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl FromIterator<(String, PluginInfo)> for PluginRegistry {
    fn from_iter<I: IntoIterator<Item = (String, PluginInfo)>>(iter: I) -> Self {
        let mut registry = Self::default();
        for (short_name, plugin) in iter {
            registry.insert(short_name, plugin);
        }
        registry
    }
}
