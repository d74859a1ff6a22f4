//! Error types raised while planning or committing a decision.

use goal_model::UnknownGoal;
use thiserror::Error;

/// Errors surfaced by the planners and the executor.
///
/// None of these are fatal: a failed `decide()` leaves the goal state
/// untouched and the caller can fall back to an idle tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("catalog has no categories or actions to rank")]
    EmptyCatalog,

    #[error("action '{0}' is not in the catalog")]
    UnknownAction(String),

    #[error("lookahead depth must be at least 1 (got {0})")]
    InvalidDepth(usize),

    #[error("action '{action}' affects undefined goal '{goal}'")]
    UndefinedGoalReference { action: String, goal: String },

    #[error("action '{0}' is defined more than once")]
    DuplicateAction(String),

    #[error("category '{0}' is defined more than once")]
    DuplicateCategory(String),

    #[error("action '{0}' has no category but the selector only ranks categories")]
    UncategorizedAction(String),
}

impl From<UnknownGoal> for PlannerError {
    fn from(err: UnknownGoal) -> Self {
        PlannerError::UndefinedGoalReference {
            action: err.action,
            goal: err.goal,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
