//! This crate provides the core logic for an interactive Turing machine simulator.
//! It includes the two-stack tape, the rule table with default rules, the execution
//! engine with cooperative cancellation, and the line-oriented command interpreter
//! together with its dump/replay format.

pub mod cancel;
pub mod command;
pub mod dump;
pub mod interpreter;
pub mod loader;
pub mod machine;
pub mod rules;
pub mod source;
pub mod tape;
pub mod types;

/// Re-exports the `CancelToken` used to interrupt a running machine.
pub use cancel::CancelToken;
/// Re-exports the `dump` encoder and its `Display` form.
pub use dump::{dump, Dump};
/// Re-exports the `Interpreter` and its per-line control flow.
pub use interpreter::{Flow, Interpreter};
/// Re-exports the `SourceLoader` and the `Input` handle it opens.
pub use loader::{Input, SourceLoader};
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
pub use rules::RuleTable;
pub use source::SourceStack;
pub use tape::Tape;
/// Re-exports the shared data types and the error type.
pub use types::{
    Direction, Halt, Run, RuleKey, Step, Token, Transition, TuringMachineError, BLANK,
};
