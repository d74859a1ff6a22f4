//! Tick loop - owns the goal state and drives the planner once per tick.

use goal_model::GoalState;
use goap_planner::{
    validate_catalog, validate_categorized, CandidateKind, CategoryPlanSelector, DomainEffectHook,
    LookaheadConfig, LookaheadPlanner, PlanExecutor, Planner, PlannerDecision, PlannerError,
    SelectorConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{OpponentConfig, PlannerMode, ScenarioConfig};

/// Unique identifier for simulated entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The entity the agent is fighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opponent {
    pub id: EntityId,
    pub name: String,
    pub health: i32,
}

impl Opponent {
    pub fn new(name: impl Into<String>, health: i32) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            health,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

impl From<&OpponentConfig> for Opponent {
    fn from(config: &OpponentConfig) -> Self {
        Self::new(config.name.clone(), config.health)
    }
}

impl DomainEffectHook for Opponent {
    fn on_domain_effect(&mut self, goal_name: &str, delta: i32) {
        let damage = i32::try_from(delta.unsigned_abs()).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(damage).max(0);
        tracing::info!(
            opponent = %self.name,
            id = %self.id,
            goal = goal_name,
            damage,
            health = self.health,
            "Opponent hit"
        );
    }
}

/// What happened on one tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u32,
    pub decision: PlannerDecision,
    /// Set when planning or applying failed and the tick fell back to idle.
    pub error: Option<PlannerError>,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub ticks: u32,
    pub final_goals: GoalState,
    pub final_discontent: u64,
    pub last_cost: u64,
    pub last_chain: Vec<String>,
    pub opponent_health: Option<i32>,
    pub opponent_defeated: bool,
}

/// A running scenario.
pub struct Simulation {
    name: String,
    goals: GoalState,
    planner: Box<dyn Planner>,
    executor: PlanExecutor,
    opponent: Option<Opponent>,
    max_ticks: u32,
    tick: u32,
    last_decision: Option<PlannerDecision>,
}

impl Simulation {
    /// Build a simulation from a scenario, validating its catalog first.
    pub fn from_config(config: ScenarioConfig) -> Result<Self, PlannerError> {
        validate_catalog(&config.catalog, &config.goals)?;
        if let PlannerMode::Categorized { .. } = config.planner {
            validate_categorized(&config.catalog)?;
        }

        let catalog = Arc::new(config.catalog);
        let planner: Box<dyn Planner> = match config.planner {
            PlannerMode::Categorized { switch_policy } => Box::new(CategoryPlanSelector::new(
                Arc::clone(&catalog),
                SelectorConfig { switch_policy },
            )),
            PlannerMode::Lookahead { depth } => Box::new(LookaheadPlanner::new(
                Arc::clone(&catalog),
                LookaheadConfig { depth },
            )),
        };

        let executor = config
            .significant_effects
            .into_iter()
            .fold(PlanExecutor::new(catalog), PlanExecutor::with_significant_effect);

        Ok(Self {
            name: config.name,
            goals: config.goals,
            planner,
            executor,
            opponent: config.opponent.as_ref().map(Opponent::from),
            max_ticks: config.max_ticks,
            tick: 0,
            last_decision: None,
        })
    }

    pub fn goals(&self) -> &GoalState {
        &self.goals
    }

    pub fn opponent(&self) -> Option<&Opponent> {
        self.opponent.as_ref()
    }

    /// Check if the run is over.
    pub fn is_finished(&self) -> bool {
        if self.tick >= self.max_ticks {
            return true;
        }
        self.opponent.as_ref().is_some_and(Opponent::is_defeated)
    }

    /// Run one decide/apply cycle.
    pub fn step(&mut self) -> TickReport {
        self.tick += 1;

        tracing::info!(
            tick = self.tick,
            opponent_health = ?self.opponent.as_ref().map(|o| o.health),
            goals = %self.goals,
            discontent = self.goals.total_discontent(),
            "Tick start"
        );

        let (decision, mut error) = match self.planner.decide(&self.goals) {
            Ok(decision) => (decision, None),
            Err(err) => {
                tracing::warn!(tick = self.tick, error = %err, "Planning failed, idling");
                (PlannerDecision::idle(), Some(err))
            }
        };

        log_candidates(&decision);

        let applied = match self.opponent.as_mut() {
            Some(opponent) => self.executor.apply_with_hook(&mut self.goals, &decision, opponent),
            None => self.executor.apply(&mut self.goals, &decision),
        };
        if let Err(err) = applied {
            tracing::warn!(tick = self.tick, error = %err, "Applying decision failed");
            error = Some(err);
        }

        tracing::info!(
            tick = self.tick,
            action = decision.chosen_action().unwrap_or("<none>"),
            category = ?decision.chosen_category,
            switched = decision.category_switched,
            cost = decision.predicted_cost,
            "Best action"
        );

        self.last_decision = Some(decision.clone());
        TickReport {
            tick: self.tick,
            decision,
            error,
        }
    }

    /// Step until the opponent is defeated or the tick budget runs out.
    pub fn run(&mut self) -> SimulationReport {
        while !self.is_finished() {
            self.step();
        }
        self.report()
    }

    pub fn report(&self) -> SimulationReport {
        let last = self.last_decision.as_ref();
        SimulationReport {
            scenario: self.name.clone(),
            ticks: self.tick,
            final_goals: self.goals.clone(),
            final_discontent: self.goals.total_discontent(),
            last_cost: last.map(|d| d.predicted_cost).unwrap_or_default(),
            last_chain: last.map(|d| d.chain.clone()).unwrap_or_default(),
            opponent_health: self.opponent.as_ref().map(|o| o.health),
            opponent_defeated: self.opponent.as_ref().is_some_and(Opponent::is_defeated),
        }
    }
}

fn log_candidates(decision: &PlannerDecision) {
    for candidate in &decision.candidates {
        match candidate.kind {
            CandidateKind::Category => {
                tracing::debug!(category = %candidate.name, cost = candidate.cost, "+->")
            }
            CandidateKind::Action => {
                tracing::debug!(action = %candidate.name, cost = candidate.cost, " +->")
            }
            CandidateKind::Rollout => tracing::debug!(
                start = %candidate.name,
                cost = candidate.cost,
                chain = ?candidate.chain,
                "path"
            ),
        }
    }
}
