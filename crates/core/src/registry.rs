//! Ordered collection of clocks keyed by unique label.

use crate::clock::Clock;
use crate::offset::UtcOffset;

/// Clocks in insertion order, which is also display and persistence order.
///
/// Labels are unique; lookups are linear since a handful of clocks is the
/// expected population.
#[derive(Debug, Clone, Default)]
pub struct ClockRegistry {
    clocks: Vec<Clock>,
}

impl ClockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clock at the end of the display order.
    ///
    /// Returns `false` without mutating when the label is empty or already
    /// present.
    pub fn add(&mut self, label: &str, offset: UtcOffset) -> bool {
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.clocks.push(Clock::new(label, offset));
        true
    }

    /// Remove a clock by exact label; `false` when absent.
    pub fn remove(&mut self, label: &str) -> bool {
        match self.position(label) {
            Some(index) => {
                self.clocks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether a clock with this label exists.
    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Display-order index of a label.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.clocks.iter().position(|clock| clock.label == label)
    }

    /// Clock for a label, if present.
    pub fn get(&self, label: &str) -> Option<&Clock> {
        self.clocks.iter().find(|clock| clock.label == label)
    }

    /// All clocks in display order.
    pub fn clocks(&self) -> &[Clock] {
        &self.clocks
    }

    /// Mutable view, used to refresh display caches during rendering.
    pub fn clocks_mut(&mut self) -> &mut [Clock] {
        &mut self.clocks
    }

    /// Labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.clocks.iter().map(|clock| clock.label.as_str())
    }

    /// Number of tracked clocks.
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// Whether no clocks are tracked.
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_remove_restores_prior_state() {
        let mut registry = ClockRegistry::new();
        assert!(registry.add("local", UtcOffset::Local));
        assert!(registry.add("tokyo", UtcOffset::Hours(9.0)));

        assert!(registry.add("paris", UtcOffset::Hours(1.0)));
        assert!(registry.remove("paris"));

        let labels: Vec<&str> = registry.labels().collect();
        assert_eq!(labels, vec!["local", "tokyo"]);
    }

    #[test]
    fn duplicate_add_leaves_existing_entry_untouched() {
        let mut registry = ClockRegistry::new();
        assert!(registry.add("tokyo", UtcOffset::Hours(9.0)));
        assert!(!registry.add("tokyo", UtcOffset::Hours(-5.0)));

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("tokyo").map(|clock| clock.offset),
            Some(UtcOffset::Hours(9.0))
        );
    }

    #[test]
    fn rejects_empty_labels() {
        let mut registry = ClockRegistry::new();
        assert!(!registry.add("", UtcOffset::Local));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_of_unknown_label_is_a_noop() {
        let mut registry = ClockRegistry::new();
        registry.add("local", UtcOffset::Local);
        assert!(!registry.remove("tokyo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn preserves_insertion_order_across_mutations() {
        let mut registry = ClockRegistry::new();
        for label in ["a", "b", "c", "d"] {
            registry.add(label, UtcOffset::Hours(0.0));
        }
        registry.remove("b");
        registry.add("e", UtcOffset::Hours(1.0));

        let labels: Vec<&str> = registry.labels().collect();
        assert_eq!(labels, vec!["a", "c", "d", "e"]);
        assert_eq!(registry.position("e"), Some(3));
    }
}
