//! Discontentment - the quadratic penalty used to score every candidate.
//!
//! The penalty for a goal is the square of its insistence after a proposed
//! change. It is taken on the raw sum, before the floor clamp the executor
//! applies, so overshooting below zero is still penalised.

use goal_model::{Action, Category, GoalState};

use crate::error::{PlannerError, Result};

/// Penalty for moving a goal from `current_insistence` by `delta`.
pub fn discontent(current_insistence: u32, delta: i32) -> u64 {
    let proposed = i64::from(current_insistence) + i64::from(delta);
    proposed.unsigned_abs().saturating_pow(2)
}

/// Sum of [`discontent`] over every effect of an action.
pub fn action_discontent(action: &Action, goal_state: &GoalState) -> Result<u64> {
    let mut total = 0u64;
    for (goal, delta) in &action.effects {
        let insistence =
            goal_state
                .get(goal)
                .ok_or_else(|| PlannerError::UndefinedGoalReference {
                    action: action.name.clone(),
                    goal: goal.clone(),
                })?;
        total = total.saturating_add(discontent(insistence, *delta));
    }
    Ok(total)
}

/// Sum of [`action_discontent`] over every action in a category.
///
/// Each action is scored independently against the same `goal_state`; the
/// actions are not chained.
pub fn category_discontent(category: &Category, goal_state: &GoalState) -> Result<u64> {
    category.actions.iter().try_fold(0u64, |total, action| {
        Ok(total.saturating_add(action_discontent(action, goal_state)?))
    })
}
