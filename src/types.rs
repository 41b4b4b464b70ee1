//! This module defines the core data structures shared by the simulator: tokens, movement
//! directions, rule keys and targets, execution outcomes and the error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An opaque tape symbol or state name.
pub type Token = String;

/// The reserved blank token. Depending on context it means "no symbol" or "no movement".
pub const BLANK: &str = "-";
/// The state every freshly reset machine starts in.
pub const INITIAL_STATE: &str = "start";

/// Returns `true` if `token` is the blank token.
pub fn is_blank(token: &str) -> bool {
    token == BLANK
}

/// Represents the possible directions the head can move after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    Left,
    /// Keep the head where it is.
    Stay,
    /// Move the head one cell to the right.
    Right,
}

impl Direction {
    /// Parses a movement token.
    ///
    /// Right: `r R > -> =>`, left: `l L < <- <=`, stay: `- 0 . --`.
    pub fn parse(token: &str) -> Result<Self, TuringMachineError> {
        match token {
            "r" | "R" | ">" | "->" | "=>" => Ok(Direction::Right),
            "l" | "L" | "<" | "<-" | "<=" => Ok(Direction::Left),
            "-" | "0" | "." | "--" => Ok(Direction::Stay),
            other => Err(TuringMachineError::UnknownMovement(other.to_string())),
        }
    }

    /// The signed cell offset of this direction.
    pub fn delta(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Stay => 0,
            Direction::Right => 1,
        }
    }

    /// The canonical token written by `dump`.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "<-",
            Direction::Stay => BLANK,
            Direction::Right => "->",
        }
    }
}

/// Key of an exact-match rule: the current state and the symbol under the head.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub state: Token,
    pub symbol: Token,
}

impl RuleKey {
    pub fn new(state: impl Into<Token>, symbol: impl Into<Token>) -> Self {
        Self {
            state: state.into(),
            symbol: symbol.into(),
        }
    }
}

/// The right-hand side of a rule or default rule.
///
/// Applying a transition sets the head to `(next_state, write)` and then moves it
/// one cell in `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The next state the machine transitions to.
    pub next_state: Token,
    /// The symbol written under the head.
    pub write: Token,
    /// Where the head moves after writing.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<Token>, write: impl Into<Token>, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write: write.into(),
            direction,
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A rule applied; the machine may continue.
    Continue,
    /// The machine stopped.
    Halt(Halt),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// The current state is a declared halt state.
    Ok,
    /// No rule applies to the current situation.
    Err(TuringMachineError),
}

/// Represents the outcome of a `run`.
#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    Halt(Halt),
    /// The cancellation token fired between two steps.
    Interrupted,
}

/// Represents the errors reported by the interpreter and the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// A required positional argument was missing.
    #[error("No {0} given.")]
    MissingArgument(&'static str),
    /// A movement token was not recognized.
    #[error("Unknown movement `{0}'.")]
    UnknownMovement(String),
    /// The first token of a line is not a command.
    #[error("Unknown command `{0}'.")]
    UnknownCommand(String),
    /// A named source could not be opened.
    #[error("Unable to open file `{0}'.")]
    OpenFailed(String),
    /// Reading from an open source failed with something other than end of input.
    #[error("Unable to read from `{0}'.")]
    ReadFailed(String),
    /// No exact rule, per-state default or wildcard default matches the head.
    #[error("No rule for the current situation.")]
    UndefinedTransition { state: Token, symbol: Token },
}
