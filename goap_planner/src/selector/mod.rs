//! Category Plan Selector - two-level action selection with hysteresis.
//!
//! The selector works in two tiers:
//! 1. **Category**: Score every category by the summed discontent of its actions
//! 2. **Switch check**: Compare the cheapest category against the remembered one
//! 3. **Action**: Rank only the actions inside the remembered category
//!
//! The remembered category only changes when a different category becomes the
//! cheapest, so the agent drills into concrete actions once its high-level
//! intent is stable instead of re-deciding both tiers from scratch every tick.

mod memory;

pub use memory::*;

use goal_model::{Action, ActionCatalog, Category, GoalState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::decision::{
    argmin, rank, CandidateKind, Planner, PlannerDecision, RankedCandidate, Resolution,
};
use crate::discontent::{action_discontent, category_discontent};
use crate::error::{PlannerError, Result};

/// What the selector does on the tick it changes category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchPolicy {
    /// Rank the new category's actions and commit the cheapest on the same tick.
    #[default]
    ResolveImmediately,
    /// Report only the new category; the first action is chosen next tick.
    DeferOneTick,
}

/// Configuration for the category selector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default)]
    pub switch_policy: SwitchPolicy,
}

/// Selects one action per tick from a categorised catalog.
#[derive(Debug, Clone)]
pub struct CategoryPlanSelector {
    catalog: Arc<ActionCatalog>,
    config: SelectorConfig,
    memory: SelectorMemory,
}

impl CategoryPlanSelector {
    /// Create a new selector with the given configuration.
    pub fn new(catalog: Arc<ActionCatalog>, config: SelectorConfig) -> Self {
        Self {
            catalog,
            config,
            memory: SelectorMemory::new(),
        }
    }

    /// Create a selector with default configuration.
    pub fn with_defaults(catalog: Arc<ActionCatalog>) -> Self {
        Self::new(catalog, SelectorConfig::default())
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn memory(&self) -> &SelectorMemory {
        &self.memory
    }

    /// Forget the current category; the next tick is treated as a switch.
    pub fn reset(&mut self) {
        self.memory.clear();
    }

    /// Decide what to do this tick.
    ///
    /// Neither the goal state nor the selector memory change on error.
    pub fn decide(&mut self, goal_state: &GoalState) -> Result<PlannerDecision> {
        let catalog = Arc::clone(&self.catalog);
        let scored = score_categories(&catalog, goal_state)?;
        let best_index = argmin(&scored).ok_or(PlannerError::EmptyCatalog)?;
        let (best, best_cost) = scored[best_index];

        // An unchanged best category is the remembered one, so the action tier
        // always works inside `best`.
        let switched = self.memory.current_category() != Some(best.name.as_str());

        let actions = score_actions(best, goal_state)?;
        let action_index = argmin(&actions).ok_or(PlannerError::EmptyCatalog)?;
        let (action, action_cost) = actions[action_index];

        let action_ranking = rank(
            actions
                .iter()
                .map(|(a, cost)| RankedCandidate::new(&a.name, CandidateKind::Action, *cost))
                .collect(),
        );

        if !switched {
            tracing::debug!(
                category = %best.name,
                action = %action.name,
                cost = action_cost,
                "Settled category, resolved action"
            );

            let decision = PlannerDecision {
                resolution: Resolution::ResolvedAction(action.name.clone()),
                chosen_category: Some(best.name.clone()),
                category_switched: false,
                predicted_cost: action_cost,
                chain: vec![action.name.clone()],
                candidates: action_ranking,
            };
            self.memory.record_settled_tick();
            return Ok(decision);
        }

        let mut candidates = rank(
            scored
                .iter()
                .map(|(c, cost)| RankedCandidate::new(&c.name, CandidateKind::Category, *cost))
                .collect(),
        );
        candidates.extend(action_ranking);

        tracing::debug!(
            from = ?self.memory.current_category(),
            to = %best.name,
            cost = best_cost,
            policy = ?self.config.switch_policy,
            "Switching category"
        );

        let decision = match self.config.switch_policy {
            SwitchPolicy::ResolveImmediately => PlannerDecision {
                resolution: Resolution::ResolvedAction(action.name.clone()),
                chosen_category: Some(best.name.clone()),
                category_switched: true,
                predicted_cost: action_cost,
                chain: vec![action.name.clone()],
                candidates,
            },
            SwitchPolicy::DeferOneTick => PlannerDecision {
                resolution: Resolution::NeedsCategorySwitch(best.name.clone()),
                chosen_category: Some(best.name.clone()),
                category_switched: true,
                predicted_cost: best_cost,
                chain: Vec::new(),
                candidates,
            },
        };

        self.memory.switch_to(best.name.clone());
        Ok(decision)
    }
}

impl Planner for CategoryPlanSelector {
    fn decide(&mut self, goal_state: &GoalState) -> Result<PlannerDecision> {
        CategoryPlanSelector::decide(self, goal_state)
    }
}

/// Score every category against the live goal state, in catalog order.
fn score_categories<'c>(
    catalog: &'c ActionCatalog,
    goal_state: &GoalState,
) -> Result<Vec<(&'c Category, u64)>> {
    let categories = catalog.categories();
    if categories.is_empty() || categories.iter().any(Category::is_empty) {
        return Err(PlannerError::EmptyCatalog);
    }

    categories
        .iter()
        .map(|category| Ok((category, category_discontent(category, goal_state)?)))
        .collect()
}

/// Score each action of a category independently against the goal state.
fn score_actions<'c>(
    category: &'c Category,
    goal_state: &GoalState,
) -> Result<Vec<(&'c Action, u64)>> {
    category
        .actions
        .iter()
        .map(|action| Ok((action, action_discontent(action, goal_state)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cover_catalog() -> Arc<ActionCatalog> {
        Arc::new(ActionCatalog::categorized(vec![
            Category::new("Take Cover")
                .with_action(
                    Action::new("Attack using Pistol")
                        .with_effect("Attack", -2)
                        .with_effect("Reload", 1),
                )
                .with_action(
                    Action::new("Use First Aid")
                        .with_effect("Heal", -5)
                        .with_effect("Attack", 5),
                )
                .with_action(
                    Action::new("Reload Pistol")
                        .with_effect("Reload", -4)
                        .with_effect("Attack", 4)
                        .with_effect("Heal", 1),
                ),
            Category::new("Leave Cover")
                .with_action(
                    Action::new("Attack using Knife")
                        .with_effect("Attack", -4)
                        .with_effect("Energy", 3)
                        .with_effect("Heal", 1),
                )
                .with_action(
                    Action::new("Use Pills")
                        .with_effect("Heal", -2)
                        .with_effect("Energy", -2)
                        .with_effect("Attack", 1),
                )
                .with_action(
                    Action::new("Evade Enemy")
                        .with_effect("Energy", -3)
                        .with_effect("Reload", 3),
                ),
        ]))
    }

    fn combat_goals() -> GoalState {
        GoalState::from_pairs([("Attack", 4), ("Heal", 2), ("Reload", 6), ("Energy", 1)])
    }

    fn eating_catalog() -> Arc<ActionCatalog> {
        Arc::new(ActionCatalog::categorized(vec![
            Category::new("Eat")
                .with_action(Action::new("Snack").with_effect("Hunger", -1))
                .with_action(Action::new("Meal").with_effect("Hunger", -3)),
            Category::new("Rest").with_action(Action::new("Nap").with_effect("Fatigue", 2)),
        ]))
    }

    #[test]
    fn test_first_tick_is_a_switch() {
        let mut selector = CategoryPlanSelector::with_defaults(cover_catalog());
        let decision = selector.decide(&combat_goals()).unwrap();

        // Take Cover = 53 + 90 + 77 = 220, Leave Cover = 25 + 26 + 85 = 136
        assert!(decision.category_switched);
        assert_eq!(decision.chosen_category.as_deref(), Some("Leave Cover"));
        assert_eq!(decision.chosen_action(), Some("Attack using Knife"));
        assert_eq!(decision.predicted_cost, 25);
        assert_eq!(decision.chain, vec!["Attack using Knife".to_string()]);
        assert_eq!(selector.memory().current_category(), Some("Leave Cover"));
    }

    #[test]
    fn test_switch_tick_ranks_categories_and_actions() {
        let mut selector = CategoryPlanSelector::with_defaults(cover_catalog());
        let decision = selector.decide(&combat_goals()).unwrap();

        let categories: Vec<_> = decision
            .candidates_of(CandidateKind::Category)
            .map(|c| (c.name.as_str(), c.cost))
            .collect();
        assert_eq!(categories, vec![("Leave Cover", 136), ("Take Cover", 220)]);

        let actions: Vec<_> = decision
            .candidates_of(CandidateKind::Action)
            .map(|c| (c.name.as_str(), c.cost))
            .collect();
        assert_eq!(
            actions,
            vec![
                ("Attack using Knife", 25),
                ("Use Pills", 26),
                ("Evade Enemy", 85)
            ]
        );
    }

    #[test]
    fn test_switches_when_best_category_changes() {
        let mut selector = CategoryPlanSelector::with_defaults(cover_catalog());
        // Goals after the knife attack: Attack 0, Heal 3, Reload 6, Energy 4
        let after_knife =
            GoalState::from_pairs([("Attack", 0), ("Heal", 3), ("Reload", 6), ("Energy", 4)]);

        selector.decide(&combat_goals()).unwrap();
        let decision = selector.decide(&after_knife).unwrap();

        // Take Cover = 53 + 29 + 36 = 118, Leave Cover = 81 + 6 + 82 = 169
        assert!(decision.category_switched);
        assert_eq!(decision.chosen_category.as_deref(), Some("Take Cover"));
        assert_eq!(decision.chosen_action(), Some("Use First Aid"));
        assert_eq!(selector.memory().switch_count(), 2);
    }

    #[test]
    fn test_hysteresis_keeps_category() {
        let mut selector = CategoryPlanSelector::with_defaults(eating_catalog());

        // Eat = 81 + 49 = 130, Rest = 144
        let first = selector.decide(&GoalState::from_pairs([("Hunger", 10), ("Fatigue", 10)]));
        assert!(first.unwrap().category_switched);

        // Eat = 36 + 16 = 52, still cheapest
        let second = selector
            .decide(&GoalState::from_pairs([("Hunger", 7), ("Fatigue", 10)]))
            .unwrap();
        let third = selector
            .decide(&GoalState::from_pairs([("Hunger", 4), ("Fatigue", 10)]))
            .unwrap();

        for decision in [&second, &third] {
            assert!(!decision.category_switched);
            assert_eq!(decision.chosen_category.as_deref(), Some("Eat"));
            assert_eq!(decision.chosen_action(), Some("Meal"));
            assert_eq!(decision.candidates_of(CandidateKind::Category).count(), 0);
        }
        assert_eq!(second.predicted_cost, 16);
        assert_eq!(third.predicted_cost, 1);
        assert_eq!(selector.memory().current_category(), Some("Eat"));
        assert_eq!(selector.memory().switch_count(), 1);
        assert_eq!(selector.memory().settled_ticks(), 2);
    }

    #[test]
    fn test_defer_one_tick_policy() {
        let config = SelectorConfig {
            switch_policy: SwitchPolicy::DeferOneTick,
        };
        let mut selector = CategoryPlanSelector::new(eating_catalog(), config);
        let goals = GoalState::from_pairs([("Hunger", 10), ("Fatigue", 10)]);

        let switch = selector.decide(&goals).unwrap();
        assert_eq!(
            switch.resolution,
            Resolution::NeedsCategorySwitch("Eat".to_string())
        );
        assert_eq!(switch.predicted_cost, 130);
        assert!(switch.is_idle());
        assert!(switch.chain.is_empty());

        let settled = selector.decide(&goals).unwrap();
        assert_eq!(settled.chosen_action(), Some("Meal"));
        assert_eq!(settled.predicted_cost, 49);
    }

    #[test]
    fn test_category_tie_goes_to_first() {
        let catalog = Arc::new(ActionCatalog::categorized(vec![
            Category::new("Left").with_action(Action::new("Step Left").with_effect("Boredom", -1)),
            Category::new("Right").with_action(Action::new("Step Right").with_effect("Boredom", -1)),
        ]));
        let mut selector = CategoryPlanSelector::with_defaults(catalog);

        let decision = selector
            .decide(&GoalState::from_pairs([("Boredom", 3)]))
            .unwrap();
        assert_eq!(decision.chosen_category.as_deref(), Some("Left"));
    }

    #[test]
    fn test_tied_categories_stay_settled() {
        let catalog = Arc::new(ActionCatalog::categorized(vec![
            Category::new("Left").with_action(Action::new("Step Left").with_effect("Boredom", -1)),
            Category::new("Right").with_action(Action::new("Step Right").with_effect("Boredom", -1)),
        ]));
        let mut selector = CategoryPlanSelector::with_defaults(catalog);

        // Both categories cost the same on every tick
        for boredom in [5, 4, 3, 2, 1] {
            let decision = selector
                .decide(&GoalState::from_pairs([("Boredom", boredom)]))
                .unwrap();
            assert_eq!(decision.chosen_category.as_deref(), Some("Left"));
            assert_eq!(decision.chosen_action(), Some("Step Left"));
        }

        assert_eq!(selector.memory().switch_count(), 1);
        assert_eq!(selector.memory().settled_ticks(), 4);
    }

    #[test]
    fn test_empty_catalog() {
        let mut selector = CategoryPlanSelector::with_defaults(Arc::new(ActionCatalog::default()));
        let goals = combat_goals();

        assert_eq!(selector.decide(&goals), Err(PlannerError::EmptyCatalog));
        assert_eq!(goals, combat_goals());
        assert!(!selector.memory().is_initialized());
    }

    #[test]
    fn test_empty_category() {
        let catalog = Arc::new(ActionCatalog::categorized(vec![
            Category::new("Eat").with_action(Action::new("Snack").with_effect("Hunger", -1)),
            Category::new("Nothing"),
        ]));
        let mut selector = CategoryPlanSelector::with_defaults(catalog);

        assert_eq!(
            selector.decide(&GoalState::from_pairs([("Hunger", 1)])),
            Err(PlannerError::EmptyCatalog)
        );
    }

    #[test]
    fn test_undefined_goal_leaves_memory_untouched() {
        let mut selector = CategoryPlanSelector::with_defaults(cover_catalog());
        let goals = GoalState::from_pairs([("Attack", 4)]);

        assert!(matches!(
            selector.decide(&goals),
            Err(PlannerError::UndefinedGoalReference { .. })
        ));
        assert!(!selector.memory().is_initialized());
    }

    #[test]
    fn test_reset_forces_switch() {
        let mut selector = CategoryPlanSelector::with_defaults(eating_catalog());
        let goals = GoalState::from_pairs([("Hunger", 10), ("Fatigue", 10)]);

        selector.decide(&goals).unwrap();
        selector.reset();

        assert!(selector.decide(&goals).unwrap().category_switched);
    }
}
