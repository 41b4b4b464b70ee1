//! The rule table: exact `(state, symbol)` rules plus per-state default rules.
//!
//! Resolution order is exact rule, then the default rule of the state, then the
//! default rule of the wildcard state `-`.

use crate::types::{RuleKey, Token, Transition, BLANK};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    rules: BTreeMap<RuleKey, Transition>,
    defaults: BTreeMap<Token, Transition>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule for `key`, replacing any previous one.
    pub fn set_rule(&mut self, key: RuleKey, transition: Transition) {
        self.rules.insert(key, transition);
    }

    /// Deletes the rule for `key`, returning it if it existed.
    pub fn remove_rule(&mut self, key: &RuleKey) -> Option<Transition> {
        self.rules.remove(key)
    }

    /// Sets the default rule for `state` (or for every state when `state` is `-`).
    pub fn set_default(&mut self, state: impl Into<Token>, transition: Transition) {
        self.defaults.insert(state.into(), transition);
    }

    pub fn remove_default(&mut self, state: &str) -> Option<Transition> {
        self.defaults.remove(state)
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    pub fn clear_defaults(&mut self) {
        self.defaults.clear();
    }

    pub fn clear(&mut self) {
        self.clear_rules();
        self.clear_defaults();
    }

    /// Exact rules in `(state, symbol)` order.
    pub fn rules(&self) -> impl Iterator<Item = (&RuleKey, &Transition)> {
        self.rules.iter()
    }

    /// Default rules in state order.
    pub fn defaults(&self) -> impl Iterator<Item = (&Token, &Transition)> {
        self.defaults.iter()
    }

    /// Finds the transition for `state` reading `symbol`.
    ///
    /// Halt states are not considered here; the machine checks them first.
    pub fn resolve(&self, state: &str, symbol: &str) -> Option<&Transition> {
        // BTreeMap lookups need an owned key.
        let key = RuleKey::new(state, symbol);
        self.rules
            .get(&key)
            .or_else(|| self.defaults.get(state))
            .or_else(|| self.defaults.get(BLANK))
    }
}
