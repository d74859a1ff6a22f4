//! Planner output - the decision for one tick and the ranking behind it.

use goal_model::GoalState;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What a decision resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// A concrete action to commit this tick.
    ResolvedAction(String),
    /// The selector moved to a new category and chose not to act this tick.
    NeedsCategorySwitch(String),
    /// No decision could be made; nothing is applied.
    Idle,
}

/// Kinds of candidates that appear in a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKind {
    Category,
    Action,
    /// A starting action scored by a simulated multi-step chain.
    Rollout,
}

/// One scored entry in a tick's ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub name: String,
    pub kind: CandidateKind,
    pub cost: u64,
    /// Simulated chain for rollouts; empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,
}

impl RankedCandidate {
    pub fn new(name: impl Into<String>, kind: CandidateKind, cost: u64) -> Self {
        Self {
            name: name.into(),
            kind,
            cost,
            chain: Vec::new(),
        }
    }

    pub fn with_chain(mut self, chain: Vec<String>) -> Self {
        self.chain = chain;
        self
    }
}

/// The outcome of one `decide()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerDecision {
    pub resolution: Resolution,

    /// Category the decision was made under, if the catalog is categorised.
    pub chosen_category: Option<String>,

    /// Whether this tick moved the selector to a different category.
    pub category_switched: bool,

    /// Discontent of the chosen action, or total path cost for a rollout.
    pub predicted_cost: u64,

    /// Actions the planner expects to take, starting with this tick's.
    /// Empty when nothing is committed.
    pub chain: Vec<String>,

    /// Every candidate considered this tick, cheapest first.
    pub candidates: Vec<RankedCandidate>,
}

impl PlannerDecision {
    /// A decision that applies nothing.
    pub fn idle() -> Self {
        Self {
            resolution: Resolution::Idle,
            chosen_category: None,
            category_switched: false,
            predicted_cost: 0,
            chain: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// The action to commit, if the decision resolved to one.
    pub fn chosen_action(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::ResolvedAction(name) => Some(name),
            Resolution::NeedsCategorySwitch(_) | Resolution::Idle => None,
        }
    }

    /// Check if this decision commits nothing to the goal state.
    pub fn is_idle(&self) -> bool {
        self.chosen_action().is_none()
    }

    /// Candidates of a given kind, cheapest first.
    pub fn candidates_of(&self, kind: CandidateKind) -> impl Iterator<Item = &RankedCandidate> {
        self.candidates.iter().filter(move |c| c.kind == kind)
    }
}

/// Anything that can choose an action for the current goal state.
pub trait Planner {
    /// Decide what to do this tick. Must not mutate `goal_state`.
    fn decide(&mut self, goal_state: &GoalState) -> Result<PlannerDecision>;
}

/// Index of the cheapest entry; ties go to the earliest one.
pub(crate) fn argmin<T>(items: &[(T, u64)]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (index, (_, cost)) in items.iter().enumerate() {
        match best {
            Some((_, best_cost)) if *cost >= best_cost => {}
            _ => best = Some((index, *cost)),
        }
    }
    best.map(|(index, _)| index)
}

/// Sort candidates by cost, keeping catalog order among equals.
pub(crate) fn rank(mut candidates: Vec<RankedCandidate>) -> Vec<RankedCandidate> {
    candidates.sort_by_key(|c| c.cost);
    candidates
}
