//! # Goal Model
//!
//! The data layer for discontentment-based planning: named goals with their
//! current insistence, and the catalog of actions that shift them.
//! This crate holds no planning logic; see `goap_planner` for that.

pub mod actions;
pub mod goals;

pub use actions::*;
pub use goals::*;
