//! Load-time checks that a catalog fits the goal state it will plan over.

use goal_model::{ActionCatalog, GoalState};
use std::collections::HashSet;

use crate::error::{PlannerError, Result};

/// Check a catalog against the goals it will be planned over.
///
/// Fails on the first problem found, in catalog order:
/// duplicate category names, duplicate action names (across the whole
/// catalog), or effects naming a goal that is not registered.
pub fn validate_catalog(catalog: &ActionCatalog, goal_state: &GoalState) -> Result<()> {
    let mut categories = HashSet::new();
    for category in catalog.categories() {
        if !categories.insert(category.name.as_str()) {
            return Err(PlannerError::DuplicateCategory(category.name.clone()));
        }
    }

    let mut actions = HashSet::new();
    for action in catalog.iter_actions() {
        if !actions.insert(action.name.as_str()) {
            return Err(PlannerError::DuplicateAction(action.name.clone()));
        }

        if let Some(goal) = action.goals().find(|goal| !goal_state.contains(goal)) {
            return Err(PlannerError::UndefinedGoalReference {
                action: action.name.clone(),
                goal: goal.to_string(),
            });
        }
    }

    tracing::debug!(
        categories = catalog.categories().len(),
        actions = actions.len(),
        goals = goal_state.len(),
        "Catalog validated"
    );
    Ok(())
}

/// Check a catalog can drive the category selector.
///
/// The selector only ranks categories, so flat actions would never be chosen.
pub fn validate_categorized(catalog: &ActionCatalog) -> Result<()> {
    match catalog.flat_actions().first() {
        Some(action) => Err(PlannerError::UncategorizedAction(action.name.clone())),
        None => Ok(()),
    }
}
