//! Opt-in shared default rules.
//!
//! Nothing in the engine reads a global rule set. Applications that want one
//! replaceable default across many documents create a [`RuleRegistry`], hand
//! it around, and build documents from its snapshots.
use std::sync::{PoisonError, RwLock};

use super::Rules;

/// A replaceable, thread-safe default rule set.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: RwLock<Rules>,
}

impl RuleRegistry {
    /// Create a registry holding `rules`.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    /// Return a copy of the current rules.
    #[must_use]
    pub fn snapshot(&self) -> Rules {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current rules, returning the previous ones.
    pub fn replace(&self, rules: Rules) -> Rules {
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, rules)
    }

    /// Restore the built-in rules.
    pub fn reset(&self) {
        self.replace(Rules::default());
    }
}
