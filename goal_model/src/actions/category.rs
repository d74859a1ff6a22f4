//! Categories - named groupings of actions that share a higher-level intent.

use serde::{Deserialize, Serialize};

use super::Action;

/// A higher-level intent (e.g. "Take Cover") and the actions available under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Category {
    /// Create a new empty category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    /// Append an action to this category.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Find an action in this category by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, action_name: &str) -> bool {
        self.action(action_name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
