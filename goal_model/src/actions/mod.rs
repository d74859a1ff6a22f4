//! Action definitions and the catalogs that group them.

mod catalog;
mod category;

pub use catalog::*;
pub use category::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named operation with fixed effects on one or more goals.
///
/// Effects map a goal name to the signed change in its insistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub effects: BTreeMap<String, i32>,
}

impl Action {
    /// Create a new action with no effects.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effects: BTreeMap::new(),
        }
    }

    /// Add an effect on a goal.
    pub fn with_effect(mut self, goal: impl Into<String>, delta: i32) -> Self {
        self.effects.insert(goal.into(), delta);
        self
    }

    /// Get the delta this action applies to a goal.
    pub fn effect_on(&self, goal: &str) -> Option<i32> {
        self.effects.get(goal).copied()
    }

    /// Iterate over the goals this action touches.
    pub fn goals(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_builder() {
        let action = Action::new("Use Pills")
            .with_effect("Heal", -2)
            .with_effect("Energy", -2)
            .with_effect("Attack", 1);

        assert_eq!(action.effect_on("Heal"), Some(-2));
        assert_eq!(action.effect_on("Attack"), Some(1));
        assert_eq!(action.effect_on("Reload"), None);
        assert_eq!(action.goals().count(), 3);
    }

    #[test]
    fn test_action_deserialize_without_effects() {
        let action: Action = serde_json::from_str(r#"{"name": "Idle"}"#).unwrap();
        assert_eq!(action.name, "Idle");
        assert!(action.effects.is_empty());
    }
}
