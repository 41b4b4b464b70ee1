//! The dump format: the whole machine written as interpreter commands.
//!
//! Every line is a command with tab-separated fields, so feeding the output back
//! through the interpreter rebuilds an equivalent machine:
//!
//! ```text
//! state	<state>
//! tape	<left cells> <head> <right cells, nearest first>
//! move	<cells left of the head>
//! rule	<state>	<symbol>	<new state>	<new symbol>	<move>
//! defaultrule	<state>	<new state>	<new symbol>	<move>
//! halt	<state>
//! ```
//!
//! `tape` leaves the head on the first cell, and the following `move` line puts it
//! back where it was. `move` is omitted when the head is already leftmost.

use crate::machine::TuringMachine;
use crate::types::Transition;
use std::fmt;

/// Encodes `machine` in the dump format.
pub fn dump(machine: &TuringMachine) -> String {
    Dump(machine).to_string()
}

/// Displays a machine in the dump format.
pub struct Dump<'a>(pub &'a TuringMachine);

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let machine = self.0;
        writeln!(f, "state\t{}", machine.state())?;
        writeln!(f, "tape\t{}", machine.tape().render_plain())?;

        let left = machine.tape().left().len();
        if left > 0 {
            writeln!(f, "move\t{left}")?;
        }

        for (key, t) in machine.rules().rules() {
            writeln!(f, "rule\t{}\t{}\t{}", key.state, key.symbol, encode_target(t))?;
        }
        for (state, t) in machine.rules().defaults() {
            writeln!(f, "defaultrule\t{}\t{}", state, encode_target(t))?;
        }
        for state in machine.halt_states() {
            writeln!(f, "halt\t{state}")?;
        }
        Ok(())
    }
}

fn encode_target(t: &Transition) -> String {
    format!("{}\t{}\t{}", t.next_state, t.write, t.direction.as_str())
}
