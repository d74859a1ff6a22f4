//! Goal state - the registry of needs an agent is trying to satisfy.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::actions::Action;

/// Insistence levels never drop below this value.
pub const INSISTENCE_FLOOR: u32 = 0;

/// A named need and how strongly it is currently unmet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub insistence: u32,
}

impl Goal {
    /// Create a new goal.
    pub fn new(name: impl Into<String>, insistence: u32) -> Self {
        Self {
            name: name.into(),
            insistence,
        }
    }
}

/// An action referenced a goal that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("goal '{goal}' referenced by action '{action}' is not defined")]
pub struct UnknownGoal {
    pub action: String,
    pub goal: String,
}

/// Add a signed delta to an insistence level, clamping at the floor.
pub fn clamp_insistence(current: u32, delta: i32) -> u32 {
    let next = i64::from(current) + i64::from(delta);
    next.clamp(i64::from(INSISTENCE_FLOOR), i64::from(u32::MAX)) as u32
}

/// The current insistence of every goal, in registration order.
///
/// Registration order is kept so that iteration, display and tie-breaking
/// stay deterministic across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoalState {
    goals: Vec<Goal>,
}

impl GoalState {
    /// Create a new empty goal state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a goal state from `(name, insistence)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut state = Self::new();
        for (name, insistence) in pairs {
            state.insert(name, insistence);
        }
        state
    }

    /// Register a goal, or overwrite the insistence of an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, insistence: u32) {
        let name = name.into();
        match self.goals.iter_mut().find(|g| g.name == name) {
            Some(goal) => goal.insistence = insistence,
            None => self.goals.push(Goal::new(name, insistence)),
        }
    }

    /// Get the insistence of a goal.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.goals
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.insistence)
    }

    /// Check if a goal is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.goals.iter().any(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Iterate over all goals in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    /// Iterate over goal names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.goals.iter().map(|g| g.name.as_str())
    }

    /// Shift a goal's insistence by `delta`, clamped at the floor.
    ///
    /// Returns the new insistence, or `None` if the goal is unknown.
    pub fn apply_delta(&mut self, name: &str, delta: i32) -> Option<u32> {
        let goal = self.goals.iter_mut().find(|g| g.name == name)?;
        goal.insistence = clamp_insistence(goal.insistence, delta);
        Some(goal.insistence)
    }

    /// Apply every effect of an action.
    ///
    /// All referenced goals are checked before anything changes, so a failed
    /// call leaves the state untouched.
    pub fn apply_effects(&mut self, action: &Action) -> Result<(), UnknownGoal> {
        if let Some(goal) = action.goals().find(|goal| !self.contains(goal)) {
            return Err(UnknownGoal {
                action: action.name.clone(),
                goal: goal.to_string(),
            });
        }

        for (goal, delta) in &action.effects {
            self.apply_delta(goal, *delta);
        }
        Ok(())
    }

    /// Sum of squared insistence over all goals.
    pub fn total_discontent(&self) -> u64 {
        self.goals
            .iter()
            .map(|g| u64::from(g.insistence).saturating_pow(2))
            .fold(0u64, u64::saturating_add)
    }
}

impl fmt::Display for GoalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, goal) in self.goals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", goal.name, goal.insistence)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for GoalState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.goals.len()))?;
        for goal in &self.goals {
            map.serialize_entry(&goal.name, &goal.insistence)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GoalState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GoalStateVisitor;

        impl<'de> Visitor<'de> for GoalStateVisitor {
            type Value = GoalState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of goal names to insistence levels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<GoalState, A::Error> {
                let mut state = GoalState::new();
                while let Some((name, insistence)) = access.next_entry::<String, u32>()? {
                    state.insert(name, insistence);
                }
                Ok(state)
            }
        }

        deserializer.deserialize_map(GoalStateVisitor)
    }
}
