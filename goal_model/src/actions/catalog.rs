//! Action catalog - the read-only set of actions an agent can choose from.

use serde::{Deserialize, Serialize};

use super::{Action, Category};

/// Every action available to an agent.
///
/// A catalog holds categorised actions, flat (uncategorised) actions, or
/// both. It is loaded once and never mutated by the planners.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionCatalog {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    categories: Vec<Category>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    actions: Vec<Action>,
}

impl ActionCatalog {
    /// Create a catalog from categories.
    pub fn categorized(categories: Vec<Category>) -> Self {
        Self {
            categories,
            actions: Vec::new(),
        }
    }

    /// Create a catalog of uncategorised actions.
    pub fn flat(actions: Vec<Action>) -> Self {
        Self {
            categories: Vec::new(),
            actions,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn flat_actions(&self) -> &[Action] {
        &self.actions
    }

    /// Iterate over every action, ignoring grouping.
    ///
    /// Flat actions come first, then each category's actions in catalog order.
    pub fn iter_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions
            .iter()
            .chain(self.categories.iter().flat_map(|c| c.actions.iter()))
    }

    /// Get a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Find an action anywhere in the catalog.
    pub fn find_action(&self, name: &str) -> Option<&Action> {
        self.iter_actions().find(|a| a.name == name)
    }

    /// Get the category an action belongs to, if it is categorised.
    pub fn category_of(&self, action_name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.contains(action_name))
    }

    /// Total number of actions, across categories and the flat list.
    pub fn action_count(&self) -> usize {
        self.iter_actions().count()
    }

    /// Check if the catalog has no actions at all.
    pub fn is_empty(&self) -> bool {
        self.iter_actions().next().is_none()
    }
}
