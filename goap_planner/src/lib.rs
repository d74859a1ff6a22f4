//! # GOAP Planner
//!
//! Discontentment-based action selection over a [`goal_model`] catalog.
//!
//! ## Core Components
//!
//! - **discontent**: Quadratic utility penalty for goals, actions and categories
//! - **selector**: Two-level category/action selection with hysteresis
//! - **lookahead**: Bounded-depth greedy rollouts over a flat catalog
//! - **executor**: Commits a decision to the authoritative goal state
//!
//! ## Tick Contract
//!
//! Planners only ever read the live [`GoalState`](goal_model::GoalState) and
//! simulate on private copies. The [`PlanExecutor`] is the single writer, and
//! runs once per tick after the decision is final.

pub mod decision;
pub mod discontent;
pub mod error;
pub mod executor;
pub mod lookahead;
pub mod selector;
pub mod validation;

pub use decision::*;
pub use discontent::*;
pub use error::*;
pub use executor::*;
pub use lookahead::*;
pub use selector::*;
pub use validation::*;
