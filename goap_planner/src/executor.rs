//! Plan Executor - commits a decision to the authoritative goal state.

use goal_model::{ActionCatalog, GoalState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::decision::PlannerDecision;
use crate::error::{PlannerError, Result};

/// Which sign of delta makes an effect significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDirection {
    /// Only negative deltas (the need is being satisfied).
    #[default]
    Decrease,
    /// Only positive deltas.
    Increase,
    Any,
}

impl DeltaDirection {
    pub fn matches(&self, delta: i32) -> bool {
        match self {
            DeltaDirection::Decrease => delta < 0,
            DeltaDirection::Increase => delta > 0,
            DeltaDirection::Any => delta != 0,
        }
    }
}

/// An effect the host wants to hear about when it is committed.
///
/// For example, reducing an "Attack" need may mean an enemy was hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificantEffect {
    pub goal: String,
    #[serde(default)]
    pub direction: DeltaDirection,
}

impl SignificantEffect {
    pub fn new(goal: impl Into<String>, direction: DeltaDirection) -> Self {
        Self {
            goal: goal.into(),
            direction,
        }
    }

    pub fn matches(&self, goal: &str, delta: i32) -> bool {
        self.goal == goal && self.direction.matches(delta)
    }
}

/// Receives committed effects that were registered as significant.
pub trait DomainEffectHook {
    fn on_domain_effect(&mut self, goal_name: &str, delta: i32);
}

impl<F> DomainEffectHook for F
where
    F: FnMut(&str, i32),
{
    fn on_domain_effect(&mut self, goal_name: &str, delta: i32) {
        self(goal_name, delta)
    }
}

/// Applies decisions to the live goal state.
#[derive(Debug, Clone)]
pub struct PlanExecutor {
    catalog: Arc<ActionCatalog>,
    significant_effects: Vec<SignificantEffect>,
}

impl PlanExecutor {
    /// Create a new executor for a catalog.
    pub fn new(catalog: Arc<ActionCatalog>) -> Self {
        Self {
            catalog,
            significant_effects: Vec::new(),
        }
    }

    /// Register an effect that should be reported to the hook.
    pub fn with_significant_effect(mut self, effect: SignificantEffect) -> Self {
        self.significant_effects.push(effect);
        self
    }

    pub fn significant_effects(&self) -> &[SignificantEffect] {
        &self.significant_effects
    }

    /// Apply a decision without a side-effect hook.
    pub fn apply(&self, goal_state: &mut GoalState, decision: &PlannerDecision) -> Result<()> {
        self.commit(goal_state, decision, None)
    }

    /// Apply a decision and report significant effects to `hook`.
    pub fn apply_with_hook(
        &self,
        goal_state: &mut GoalState,
        decision: &PlannerDecision,
        hook: &mut dyn DomainEffectHook,
    ) -> Result<()> {
        self.commit(goal_state, decision, Some(hook))
    }

    fn commit(
        &self,
        goal_state: &mut GoalState,
        decision: &PlannerDecision,
        hook: Option<&mut dyn DomainEffectHook>,
    ) -> Result<()> {
        let Some(action_name) = decision.chosen_action() else {
            tracing::debug!(resolution = ?decision.resolution, "Nothing to apply this tick");
            return Ok(());
        };

        let action = self
            .catalog
            .find_action(action_name)
            .ok_or_else(|| PlannerError::UnknownAction(action_name.to_string()))?;

        goal_state.apply_effects(action)?;
        tracing::debug!(action = %action.name, goals = %goal_state, "Applied action");

        if let Some(hook) = hook {
            for (goal, delta) in &action.effects {
                if self.significant_effects.iter().any(|e| e.matches(goal, *delta)) {
                    hook.on_domain_effect(goal, *delta);
                }
            }
        }

        Ok(())
    }
}
