//! Selector memory - what the category selector remembers between ticks.

use serde::{Deserialize, Serialize};

/// Persistent state of a [`CategoryPlanSelector`](super::CategoryPlanSelector).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectorMemory {
    current_category: Option<String>,
    switch_count: u32,
    settled_ticks: u32,
}

impl SelectorMemory {
    /// Create memory with no category chosen yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The category the selector has settled on, if any.
    pub fn current_category(&self) -> Option<&str> {
        self.current_category.as_deref()
    }

    /// Check if a category has been chosen yet.
    pub fn is_initialized(&self) -> bool {
        self.current_category.is_some()
    }

    /// Number of times the selector has changed category (including the first pick).
    pub fn switch_count(&self) -> u32 {
        self.switch_count
    }

    /// Consecutive ticks spent in the current category after the switch tick.
    pub fn settled_ticks(&self) -> u32 {
        self.settled_ticks
    }

    /// Move to a new category.
    pub fn switch_to(&mut self, category: impl Into<String>) {
        self.current_category = Some(category.into());
        self.switch_count += 1;
        self.settled_ticks = 0;
    }

    /// Record a tick that stayed in the current category.
    pub fn record_settled_tick(&mut self) {
        self.settled_ticks += 1;
    }

    /// Forget the current category.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_memory_is_uninitialized() {
        let memory = SelectorMemory::new();
        assert!(!memory.is_initialized());
        assert_eq!(memory.current_category(), None);
        assert_eq!(memory.switch_count(), 0);
    }

    #[test]
    fn test_switch_resets_settled_ticks() {
        let mut memory = SelectorMemory::new();

        memory.switch_to("Take Cover");
        memory.record_settled_tick();
        memory.record_settled_tick();
        assert_eq!(memory.settled_ticks(), 2);

        memory.switch_to("Leave Cover");
        assert_eq!(memory.current_category(), Some("Leave Cover"));
        assert_eq!(memory.settled_ticks(), 0);
        assert_eq!(memory.switch_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut memory = SelectorMemory::new();
        memory.switch_to("Take Cover");
        memory.clear();

        assert_eq!(memory, SelectorMemory::new());
    }
}
