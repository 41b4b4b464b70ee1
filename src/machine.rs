//! This module defines the `TuringMachine` struct, which owns the head, the tape, the
//! rule tables and the halt set, and executes transitions over them.

use crate::cancel::CancelToken;
use crate::rules::RuleTable;
use crate::tape::Tape;
use crate::types::{Halt, Run, Step, Token, TuringMachineError, INITIAL_STATE};
use std::collections::BTreeSet;

/// A single-tape Turing machine with a mutable rule set.
///
/// The machine starts in state `start` over an all-blank tape with no rules. Every
/// part of it can be changed between steps; `reset` restores that initial shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TuringMachine {
    state: Token,
    tape: Tape,
    rules: RuleTable,
    halt_states: BTreeSet<Token>,
    step_count: usize,
}

impl Default for TuringMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TuringMachine {
    pub fn new() -> Self {
        Self {
            state: INITIAL_STATE.to_string(),
            tape: Tape::new(),
            rules: RuleTable::new(),
            halt_states: BTreeSet::new(),
            step_count: 0,
        }
    }

    /// Executes a single transition.
    ///
    /// The halt set is checked before anything else, so entering a halt state only
    /// stops the machine on the following call.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a rule was applied.
    /// * `Step::Halt(Halt::Ok)` if the current state is a halt state.
    /// * `Step::Halt(Halt::Err(_))` if no rule matches the current state and symbol.
    pub fn step(&mut self) -> Step {
        if self.is_halted() {
            return Step::Halt(Halt::Ok);
        }

        let transition = match self.rules.resolve(&self.state, self.tape.read()) {
            Some(t) => t.clone(),
            None => {
                return Step::Halt(Halt::Err(TuringMachineError::UndefinedTransition {
                    state: self.state.clone(),
                    symbol: self.tape.read().to_string(),
                }))
            }
        };

        self.state = transition.next_state;
        self.tape.write(transition.write);
        self.tape.shift(transition.direction.delta());
        self.step_count += 1;

        Step::Continue
    }

    /// Steps until the machine halts, finds no rule, or `cancel` is triggered.
    ///
    /// `on_step` is called after every applied transition that is not followed by a
    /// cancellation. The token is only polled between steps.
    pub fn run<F>(&mut self, cancel: &CancelToken, mut on_step: F) -> Run
    where
        F: FnMut(&TuringMachine),
    {
        let _guard = cancel.arm();
        let started_at = self.step_count;

        let outcome = loop {
            match self.step() {
                Step::Continue => {
                    if cancel.is_cancelled() {
                        break Run::Interrupted;
                    }
                    on_step(self);
                }
                Step::Halt(halt) => break Run::Halt(halt),
            }
        };

        log::debug!(
            "run finished after {} steps: {:?}",
            self.step_count - started_at,
            outcome
        );
        outcome
    }

    /// Restores the initial state: state `start`, blank tape, no rules, no halt states.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn set_state(&mut self, state: impl Into<Token>) {
        self.state = state.into();
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> &str {
        self.tape.read()
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn tape_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleTable {
        &mut self.rules
    }

    pub fn halt_states(&self) -> impl Iterator<Item = &Token> {
        self.halt_states.iter()
    }

    pub fn add_halt_state(&mut self, state: impl Into<Token>) {
        self.halt_states.insert(state.into());
    }

    pub fn remove_halt_state(&mut self, state: &str) {
        self.halt_states.remove(state);
    }

    /// Checks if the current state is a declared halt state.
    pub fn is_halted(&self) -> bool {
        self.halt_states.contains(&self.state)
    }

    /// Returns the number of transitions applied since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }
}
