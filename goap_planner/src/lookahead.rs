//! Lookahead Planner - ranks starting actions by bounded greedy rollouts.
//!
//! For every action in the catalog:
//! 1. **Start**: Copy the goal state and commit the starting action to the copy
//! 2. **Rollout**: Until the chain reaches `depth`, greedily append the cheapest
//!    action against the simulated state and commit it to the copy
//! 3. **Cost**: Sum the discontent of every step in the chain
//!
//! The starting action with the cheapest chain wins. Only that first action is
//! committed for real; the rest of the chain is a prediction.
//!
//! # Complexity
//!
//! Each rollout does one argmin over the catalog per step, so a tick costs
//! `O(depth × |actions|²)` discontent evaluations. The inner steps are greedy on
//! purpose: exhaustive search over `|actions|^depth` sequences is not
//! affordable once per tick.

use goal_model::{Action, ActionCatalog, GoalState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::decision::{
    argmin, rank, CandidateKind, Planner, PlannerDecision, RankedCandidate, Resolution,
};
use crate::discontent::action_discontent;
use crate::error::{PlannerError, Result};

/// Default number of simulated steps per starting action.
pub const DEFAULT_LOOKAHEAD_DEPTH: usize = 5;

/// Configuration for the lookahead planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookaheadConfig {
    /// Length of every simulated chain, including the starting action.
    pub depth: usize,
}

impl Default for LookaheadConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_LOOKAHEAD_DEPTH,
        }
    }
}

/// A simulated chain of actions from one starting action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollout {
    pub start: String,
    pub chain: Vec<String>,
    /// Discontent of each step, measured against the state before that step.
    pub step_costs: Vec<u64>,
    /// Total path cost.
    pub cost: u64,
    /// Simulated goal state after the whole chain.
    pub final_state: GoalState,
}

/// Plans over a flat view of the catalog, ignoring categories.
#[derive(Debug, Clone)]
pub struct LookaheadPlanner {
    catalog: Arc<ActionCatalog>,
    config: LookaheadConfig,
}

impl LookaheadPlanner {
    /// Create a new lookahead planner with the given configuration.
    pub fn new(catalog: Arc<ActionCatalog>, config: LookaheadConfig) -> Self {
        Self { catalog, config }
    }

    /// Create a lookahead planner with the default depth.
    pub fn with_defaults(catalog: Arc<ActionCatalog>) -> Self {
        Self::new(catalog, LookaheadConfig::default())
    }

    pub fn config(&self) -> &LookaheadConfig {
        &self.config
    }

    fn actions(&self) -> Result<Vec<&Action>> {
        if self.config.depth < 1 {
            return Err(PlannerError::InvalidDepth(self.config.depth));
        }

        let actions: Vec<&Action> = self.catalog.iter_actions().collect();
        if actions.is_empty() {
            return Err(PlannerError::EmptyCatalog);
        }
        Ok(actions)
    }

    /// Simulate the chain that starts with `start`.
    ///
    /// `goal_state` is only read; the simulation runs on a private copy.
    pub fn rollout(&self, start: &str, goal_state: &GoalState) -> Result<Rollout> {
        let actions = self.actions()?;
        let first = actions
            .iter()
            .copied()
            .find(|a| a.name == start)
            .ok_or_else(|| PlannerError::UnknownAction(start.to_string()))?;

        simulate(first, &actions, goal_state, self.config.depth)
    }

    /// Simulate a chain for every starting action, in catalog order.
    pub fn rollouts(&self, goal_state: &GoalState) -> Result<Vec<Rollout>> {
        let actions = self.actions()?;
        actions
            .iter()
            .map(|&first| simulate(first, &actions, goal_state, self.config.depth))
            .collect()
    }

    /// Decide which action to start with this tick.
    pub fn decide(&self, goal_state: &GoalState) -> Result<PlannerDecision> {
        let rollouts = self.rollouts(goal_state)?;

        let scored: Vec<(&Rollout, u64)> = rollouts.iter().map(|r| (r, r.cost)).collect();
        let best_index = argmin(&scored).ok_or(PlannerError::EmptyCatalog)?;
        let best = &rollouts[best_index];

        tracing::debug!(
            start = %best.start,
            cost = best.cost,
            depth = self.config.depth,
            chain = ?best.chain,
            "Selected cheapest rollout"
        );

        let candidates = rank(
            rollouts
                .iter()
                .map(|r| {
                    RankedCandidate::new(&r.start, CandidateKind::Rollout, r.cost)
                        .with_chain(r.chain.clone())
                })
                .collect(),
        );

        Ok(PlannerDecision {
            resolution: Resolution::ResolvedAction(best.start.clone()),
            chosen_category: self.catalog.category_of(&best.start).map(|c| c.name.clone()),
            category_switched: false,
            predicted_cost: best.cost,
            chain: best.chain.clone(),
            candidates,
        })
    }
}

impl Planner for LookaheadPlanner {
    fn decide(&mut self, goal_state: &GoalState) -> Result<PlannerDecision> {
        LookaheadPlanner::decide(self, goal_state)
    }
}

fn simulate<'a>(
    first: &'a Action,
    actions: &[&'a Action],
    goal_state: &GoalState,
    depth: usize,
) -> Result<Rollout> {
    let mut state = goal_state.clone();
    let mut chain = Vec::with_capacity(depth);
    let mut step_costs = Vec::with_capacity(depth);

    let mut next = first;
    let mut next_cost = action_discontent(first, &state)?;

    loop {
        chain.push(next.name.clone());
        step_costs.push(next_cost);
        state.apply_effects(next)?;

        tracing::trace!(
            start = %first.name,
            step = chain.len(),
            action = %next.name,
            cost = next_cost,
            state = %state,
            "Rollout step"
        );

        if chain.len() >= depth {
            break;
        }

        let scored = actions
            .iter()
            .map(|a| Ok((*a, action_discontent(a, &state)?)))
            .collect::<Result<Vec<_>>>()?;
        let index = argmin(&scored).ok_or(PlannerError::EmptyCatalog)?;
        (next, next_cost) = scored[index];
    }

    let cost = step_costs.iter().fold(0u64, |total, c| total.saturating_add(*c));
    Ok(Rollout {
        start: first.name.clone(),
        chain,
        step_costs,
        cost,
        final_state: state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use goal_model::Category;

    fn gunfight_catalog() -> Arc<ActionCatalog> {
        Arc::new(ActionCatalog::flat(vec![
            Action::new("Shoot").with_effect("Attack", -2).with_effect("Ammo", 3),
            Action::new("Heal").with_effect("Health", -5).with_effect("Attack", 3),
            Action::new("Reload").with_effect("Ammo", -2).with_effect("Health", 5),
        ]))
    }

    fn gunfight_goals() -> GoalState {
        GoalState::from_pairs([("Attack", 4), ("Health", 2), ("Ammo", 3)])
    }

    fn planner(depth: usize) -> LookaheadPlanner {
        LookaheadPlanner::new(gunfight_catalog(), LookaheadConfig { depth })
    }

    #[test]
    fn test_default_depth() {
        assert_eq!(LookaheadPlanner::with_defaults(gunfight_catalog()).config().depth, 5);
    }

    #[test]
    fn test_five_step_rollouts() {
        let rollouts = planner(5).rollouts(&gunfight_goals()).unwrap();

        assert_eq!(rollouts[0].chain, vec!["Shoot", "Heal", "Reload", "Shoot", "Heal"]);
        assert_eq!(rollouts[0].step_costs, vec![40, 34, 41, 58, 36]);
        assert_eq!(rollouts[0].cost, 209);
        assert_eq!(rollouts[1].cost, 219);
        assert_eq!(rollouts[2].chain, vec!["Reload", "Shoot", "Heal", "Reload", "Shoot"]);
        assert_eq!(rollouts[2].cost, 186);
    }

    #[test]
    fn test_decide_picks_cheapest_chain() {
        let goals = gunfight_goals();
        let decision = planner(5).decide(&goals).unwrap();

        // One step ahead Shoot looks best (40), but its chain costs more.
        assert_eq!(decision.chosen_action(), Some("Reload"));
        assert_eq!(decision.predicted_cost, 186);
        assert_eq!(decision.chain.len(), 5);
        assert_eq!(decision.chosen_category, None);

        let ranking: Vec<_> = decision
            .candidates
            .iter()
            .map(|c| (c.name.as_str(), c.cost))
            .collect();
        assert_eq!(ranking, vec![("Reload", 186), ("Shoot", 209), ("Heal", 219)]);
        assert_eq!(goals, gunfight_goals());
    }

    #[test]
    fn test_depth_one_is_plain_argmin() {
        let decision = planner(1).decide(&gunfight_goals()).unwrap();

        assert_eq!(decision.chosen_action(), Some("Shoot"));
        assert_eq!(decision.predicted_cost, 40);
        assert_eq!(decision.chain, vec!["Shoot".to_string()]);
    }

    #[test]
    fn test_chain_length_and_cost_invariants() {
        for depth in 1..=8 {
            for rollout in planner(depth).rollouts(&gunfight_goals()).unwrap() {
                assert_eq!(rollout.chain.len(), depth);
                assert_eq!(rollout.step_costs.len(), depth);
                assert_eq!(rollout.cost, rollout.step_costs.iter().sum::<u64>());
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let goals = gunfight_goals();
        let first = planner(4).decide(&goals).unwrap();
        let second = planner(4).decide(&goals).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_start_restarts_from_original_state() {
        let goals = gunfight_goals();
        let planner = planner(3);

        let together = planner.rollouts(&goals).unwrap();
        let reload_alone = planner.rollout("Reload", &goals).unwrap();
        assert_eq!(together[2], reload_alone);
    }

    #[test]
    fn test_rollout_clamps_simulated_state() {
        // Heal drives Health 2 -> 0 rather than -3
        let rollout = planner(1).rollout("Heal", &gunfight_goals()).unwrap();
        assert_eq!(rollout.final_state.get("Health"), Some(0));
        assert_eq!(rollout.final_state.get("Attack"), Some(7));
    }

    #[test]
    fn test_rollout_unknown_start() {
        assert_eq!(
            planner(2).rollout("Dance", &gunfight_goals()),
            Err(PlannerError::UnknownAction("Dance".to_string()))
        );
    }

    #[test]
    fn test_invalid_depth() {
        assert_eq!(
            planner(0).decide(&gunfight_goals()),
            Err(PlannerError::InvalidDepth(0))
        );
    }

    #[test]
    fn test_empty_catalog() {
        let planner = LookaheadPlanner::with_defaults(Arc::new(ActionCatalog::default()));
        let goals = gunfight_goals();

        assert_eq!(planner.decide(&goals), Err(PlannerError::EmptyCatalog));
        assert_eq!(goals, gunfight_goals());
    }

    #[test]
    fn test_flattens_categories() {
        let catalog = Arc::new(ActionCatalog::categorized(vec![
            Category::new("Fight").with_action(Action::new("Shoot").with_effect("Attack", -2)),
            Category::new("Recover").with_action(Action::new("Rest").with_effect("Health", -1)),
        ]));
        let planner = LookaheadPlanner::new(catalog, LookaheadConfig { depth: 1 });

        let decision = planner.decide(&gunfight_goals()).unwrap();
        // Shoot: (4-2)^2 = 4, Rest: (2-1)^2 = 1
        assert_eq!(decision.chosen_action(), Some("Rest"));
        assert_eq!(decision.chosen_category.as_deref(), Some("Recover"));
        assert_eq!(decision.candidates.len(), 2);
    }
}
