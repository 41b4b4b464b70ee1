//! The command interpreter: reads lines from the source stack and applies them to
//! the machine.
//!
//! Normal output (queried values, rendered tapes, traces, dumps) goes to `out`.
//! Diagnostics go to `err`: every command error is reported there as a single line
//! and the interpreter carries on with the next line.

use crate::cancel::CancelToken;
use crate::command::{Args, Command};
use crate::dump::Dump;
use crate::loader::{characters, symbols, Extent, SourceLoader, STDIN_NAME};
use crate::machine::TuringMachine;
use crate::source::SourceStack;
use crate::types::{
    is_blank, Direction, Halt, RuleKey, Run, Step, Transition, TuringMachineError, BLANK,
};
use std::io::{self, Write};
use thiserror::Error;

/// Whether the interpreter should keep reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
enum Failure {
    /// Reported on the error stream; the interpreter continues.
    #[error(transparent)]
    Command(#[from] TuringMachineError),
    /// Writing to one of the output streams failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Interpreter<O: Write, E: Write> {
    machine: TuringMachine,
    sources: SourceStack,
    cancel: CancelToken,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Interpreter<O, E> {
    pub fn new(sources: SourceStack, cancel: CancelToken, out: O, err: E) -> Self {
        Self {
            machine: TuringMachine::new(),
            sources,
            cancel,
            out,
            err,
        }
    }

    pub fn machine(&self) -> &TuringMachine {
        &self.machine
    }

    pub fn sources_mut(&mut self) -> &mut SourceStack {
        &mut self.sources
    }

    /// Returns the output and error streams.
    pub fn into_streams(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Executes lines until every source is exhausted or `exit` is read.
    ///
    /// Only failures to write output are returned as errors.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let mut read_errors = Vec::new();
            let line = self.sources.next_line(|e| read_errors.push(e));
            for e in read_errors {
                self.report(&e)?;
            }

            let Some(line) = line else {
                log::debug!("all sources exhausted");
                return Ok(());
            };
            if self.execute(&line)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Executes a single command line.
    pub fn execute(&mut self, line: &str) -> io::Result<Flow> {
        let mut args = Args::new(line);
        let Some(name) = args.next() else {
            return Ok(Flow::Continue);
        };
        let Some(command) = Command::parse(name) else {
            self.report(&TuringMachineError::UnknownCommand(name.to_string()))?;
            return Ok(Flow::Continue);
        };

        let flow = match self.dispatch(command, &mut args) {
            Ok(flow) => flow,
            Err(Failure::Command(e)) => {
                self.report(&e)?;
                Flow::Continue
            }
            Err(Failure::Io(e)) => return Err(e),
        };

        if flow == Flow::Continue && args.has_remaining() {
            self.report(&"Extra character(s) ignored.")?;
        }
        Ok(flow)
    }

    fn dispatch(&mut self, command: Command, args: &mut Args) -> Result<Flow, Failure> {
        match command {
            Command::Version => {
                writeln!(self.out, "{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?
            }
            Command::Reset => {
                log::debug!("machine reset");
                self.machine.reset();
            }
            Command::Rule => self.rule(args)?,
            Command::ClearRules => self.machine.rules_mut().clear_rules(),
            Command::DefaultRule => self.default_rule(args)?,
            Command::ClearDefaultRules => self.machine.rules_mut().clear_defaults(),
            Command::ClearAllRules => self.machine.rules_mut().clear(),
            Command::Halt => {
                let state = args.required("state")?;
                self.machine.add_halt_state(state);
            }
            Command::NoHalt => {
                let state = args.required("state")?;
                self.machine.remove_halt_state(state);
            }
            Command::Dump => write!(self.out, "{}", Dump(&self.machine))?,
            Command::Begin => self.machine.tape_mut().rewind(),
            Command::End => self.machine.tape_mut().fast_forward(),
            Command::Right => self.machine.tape_mut().shift(args.number(1i64)),
            Command::Left => {
                let cells = args.number(1i64);
                self.machine.tape_mut().shift(cells.saturating_neg());
            }
            Command::ClearLeft => self.machine.tape_mut().clear_left(),
            Command::ClearRight => self.machine.tape_mut().clear_right(),
            Command::Clear => self.machine.tape_mut().clear(),
            Command::Tape => {
                let cells = args.rest();
                if cells.is_empty() {
                    writeln!(self.out, "{}", self.machine.tape().render())?;
                } else {
                    self.machine.tape_mut().load(cells);
                }
            }
            Command::TapeString => {
                let cells = characters(&args.rest().concat());
                self.machine.tape_mut().load(cells);
            }
            Command::ReadTape => self.read_tape(args, Extent::All, symbols)?,
            Command::ReadString => self.read_tape(args, Extent::All, characters)?,
            Command::ReadLine => self.read_tape(args, Extent::Line, characters)?,
            Command::State => match args.next() {
                Some(state) => self.machine.set_state(state),
                None => writeln!(self.out, "{}", self.machine.state())?,
            },
            Command::Read => writeln!(self.out, "{}", self.machine.symbol())?,
            Command::Write => self.machine.tape_mut().write(args.next_or_blank()),
            Command::PutRight => self.machine.tape_mut().put(args.rest(), 1),
            Command::PutLeft => self.machine.tape_mut().put(args.rest(), -1),
            Command::InsertRight => self.machine.tape_mut().insert_right(args.next_or_blank()),
            Command::InsertLeft => self.machine.tape_mut().insert_left(args.next_or_blank()),
            Command::Step { trace } => {
                let steps = args.number(1u64);
                self.step(steps, trace)?;
            }
            Command::Run { trace } => self.run_machine(trace)?,
            Command::Input => {
                let name = args.next().unwrap_or(STDIN_NAME);
                self.sources.push_named(name)?;
            }
            Command::Return => {
                self.sources.pop();
            }
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// `rule <state> <symbol> [<new state> [<new symbol> [<move>]]]`
    fn rule(&mut self, args: &mut Args) -> Result<(), TuringMachineError> {
        let state = args.required("state")?;
        let symbol = args.required("tape symbol")?;
        let key = RuleKey::new(state, symbol);

        match args.next() {
            None => {
                self.machine.rules_mut().remove_rule(&key);
            }
            Some(next_state) => {
                let transition = Self::target(next_state, args)?;
                self.machine.rules_mut().set_rule(key, transition);
            }
        }
        Ok(())
    }

    /// `defaultrule <state> [<new state> [<new symbol> [<move>]]]`
    ///
    /// With a single argument it names the new state of the wildcard default rule.
    fn default_rule(&mut self, args: &mut Args) -> Result<(), TuringMachineError> {
        let first = args.required("state")?;
        let (state, next_state) = match args.next() {
            Some(next_state) => (first, next_state),
            None => (BLANK, first),
        };

        if is_blank(next_state) {
            self.machine.rules_mut().remove_default(state);
        } else {
            let transition = Self::target(next_state, args)?;
            self.machine.rules_mut().set_default(state, transition);
        }
        Ok(())
    }

    fn target(next_state: &str, args: &mut Args) -> Result<Transition, TuringMachineError> {
        let write = args.next_or_blank();
        let direction = Direction::parse(args.next().unwrap_or(BLANK))?;
        Ok(Transition::new(next_state, write, direction))
    }

    fn read_tape(
        &mut self,
        args: &mut Args,
        extent: Extent,
        split: fn(&str) -> Vec<String>,
    ) -> Result<(), TuringMachineError> {
        let name = args.next().unwrap_or(STDIN_NAME);
        let mut input = SourceLoader::open(name)?;
        let result = SourceLoader::read(&mut input, name, extent);
        self.machine.tape_mut().load(split(&result.text));
        match result.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn step(&mut self, steps: u64, trace: bool) -> io::Result<()> {
        for _ in 0..steps {
            match self.machine.step() {
                Step::Continue => {
                    if trace {
                        write_trace(&mut self.out, &self.machine)?;
                    }
                }
                Step::Halt(Halt::Ok) => {
                    self.report(&"Halted.")?;
                    break;
                }
                Step::Halt(Halt::Err(e)) => {
                    self.report(&e)?;
                    break;
                }
            }
        }
        Ok(())
    }

    fn run_machine(&mut self, trace: bool) -> io::Result<()> {
        write!(self.err, "Running . . . ")?;
        if trace {
            writeln!(self.err)?;
        }
        self.err.flush()?;

        let Self {
            machine,
            cancel,
            out,
            ..
        } = self;
        let mut write_error = None;
        let outcome = machine.run(cancel, |m| {
            if trace && write_error.is_none() {
                write_error = write_trace(&mut *out, m).err();
            }
        });
        if let Some(e) = write_error {
            return Err(e);
        }

        match outcome {
            Run::Halt(Halt::Ok) => writeln!(self.err, "Done."),
            Run::Halt(Halt::Err(e)) => writeln!(self.err, "Error.\n{e}"),
            Run::Interrupted => writeln!(self.err, "Interrupted."),
        }
    }

    fn report(&mut self, message: &dyn std::fmt::Display) -> io::Result<()> {
        writeln!(self.err, "{message}")
    }
}

fn write_trace<W: Write>(out: &mut W, machine: &TuringMachine) -> io::Result<()> {
    writeln!(out, "{}: {}", machine.state(), machine.tape().render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::dump;
    use crate::loader::Input;
    use std::fs;
    use tempfile::tempdir;

    type TestInterpreter = Interpreter<Vec<u8>, Vec<u8>>;

    fn interpreter() -> TestInterpreter {
        Interpreter::new(SourceStack::new(), CancelToken::new(), Vec::new(), Vec::new())
    }

    /// Runs `script` on a fresh interpreter and returns it with its output and errors.
    fn run_script(script: &str) -> (TestInterpreter, String, String) {
        let mut interpreter = interpreter();
        interpreter
            .sources_mut()
            .queue("script", Input::from_text(script));
        interpreter.run().unwrap();
        let out = String::from_utf8(interpreter.out.clone()).unwrap();
        let err = String::from_utf8(interpreter.err.clone()).unwrap();
        (interpreter, out, err)
    }

    #[test]
    fn test_exact_rule_then_state_query() {
        let (_, out, err) = run_script("rule start - mid 1 -\nstate\nstep\nstate\nread\n");
        assert_eq!(out, "start\nmid\n1\n");
        assert_eq!(err, "");
    }

    #[test]
    fn test_tapestring_renders() {
        let (_, out, _) = run_script("tapestring abc\ntape\n");
        assert_eq!(out, "[a] b c\n");

        let (_, out, _) = run_script("tapestring ab cd\ntape\n");
        assert_eq!(out, "[a] b c d\n");
    }

    #[test]
    fn test_run_until_no_rule() {
        let script = "rule s0 0 s0 1 ->\nrule s0 1 s1 0 <-\nhalt s1\nstate s0\ntape 0 0 0\nrun\ntape\n";
        let (interpreter, out, err) = run_script(script);
        assert_eq!(err, "Running . . . Error.\nNo rule for the current situation.\n");
        assert_eq!(out, "1 1 1 [-]\n");
        assert_eq!(interpreter.machine().state(), "s0");
    }

    #[test]
    fn test_run_until_halt_then_step_reports_halted() {
        let script = "rule s0 0 s0 1 ->\nrule s0 1 s1 0 <-\nhalt s1\nstate s0\ntape 0 0 1\nrun\nstep\n";
        let (interpreter, _, err) = run_script(script);
        assert_eq!(err, "Running . . . Done.\nHalted.\n");
        assert_eq!(interpreter.machine().state(), "s1");
        assert_eq!(interpreter.machine().tape().render(), "1 [1] 0");
    }

    #[test]
    fn test_trace_output() {
        let script = "rule s0 0 s0 1 ->\nrule s0 1 s1 0 <-\nhalt s1\nstate s0\ntape 0 1\ntrace\n";
        let (_, out, err) = run_script(script);
        assert_eq!(out, "s0: 1 [1]\ns1: [1] 0\n");
        assert_eq!(err, "Running . . . \nDone.\n");
    }

    #[test]
    fn test_step_count_and_steptrace() {
        let script = "defaultrule walk walk x ->\nstate walk\nsteptrace 2\nstep 5\n";
        let (interpreter, out, err) = run_script(script);
        assert_eq!(out, "walk: x [-]\nwalk: x x [-]\n");
        assert_eq!(err, "");
        assert_eq!(interpreter.machine().step_count(), 7);
    }

    #[test]
    fn test_step_stops_without_rule() {
        let (interpreter, _, err) = run_script("rule start - a - ->\nstep 10\n");
        assert_eq!(err, "No rule for the current situation.\n");
        assert_eq!(interpreter.machine().step_count(), 1);
    }

    #[test]
    fn test_rule_argument_errors() {
        let (interpreter, _, err) = run_script("rule\nrule s\nrule s a b c up\nhalt\nnohalt\ndefaultrule\n");
        assert_eq!(
            err,
            "No state given.\nNo tape symbol given.\nUnknown movement `up'.\nNo state given.\nNo state given.\nNo state given.\n"
        );
        assert_eq!(interpreter.machine().rules().rules().count(), 0);
    }

    #[test]
    fn test_rule_defaults_and_delete() {
        let (interpreter, _, _) = run_script("rule s a t\n");
        let (key, t) = interpreter.machine().rules().rules().next().unwrap();
        assert_eq!(key, &RuleKey::new("s", "a"));
        assert_eq!(t, &Transition::new("t", "-", Direction::Stay));

        let (interpreter, _, _) = run_script("rule s a t\nrule s a\n");
        assert_eq!(interpreter.machine().rules().rules().count(), 0);
    }

    #[test]
    fn test_default_rule_forms() {
        let (interpreter, _, _) = run_script("defaultrule any\ndefaultrule s t x <\n");
        let defaults: Vec<_> = interpreter.machine().rules().defaults().collect();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults[0].0, "-");
        assert_eq!(defaults[0].1, &Transition::new("any", "-", Direction::Stay));
        assert_eq!(defaults[1].0, "s");
        assert_eq!(defaults[1].1, &Transition::new("t", "x", Direction::Left));

        let (interpreter, _, _) = run_script("defaultrule any\ndefaultrule s t\ndefaultrule s -\ndefaultrule -\n");
        assert_eq!(interpreter.machine().rules().defaults().count(), 0);
    }

    #[test]
    fn test_clear_rule_tables() {
        let counts = |script: &str| {
            let (i, _, _) = run_script(&format!("rule a b c\ndefaultrule d\n{script}\n"));
            let rules = i.machine().rules();
            let counts = (rules.rules().count(), rules.defaults().count());
            counts
        };
        assert_eq!(counts("clearrules"), (0, 1));
        assert_eq!(counts("cleardefaultrules"), (1, 0));
        assert_eq!(counts("clearallrules"), (0, 0));
    }

    #[test]
    fn test_halt_and_nohalt() {
        let (interpreter, _, _) = run_script("halt a\nhalt b\nnohalt a\n");
        let halts: Vec<_> = interpreter.machine().halt_states().cloned().collect();
        assert_eq!(halts, vec!["b".to_string()]);
    }

    #[test]
    fn test_head_movement_commands() {
        let script = "tape a b c d\nright\ntape\nmove 2\ntape\nleft 3\ntape\nend\ntape\nbegin\ntape\nright -1\ntape\n";
        let (_, out, err) = run_script(script);
        assert_eq!(
            out,
            "a [b] c d\na b c [d]\n[a] b c d\na b c [d]\n[a] b c d\n[-] a b c d\n"
        );
        assert_eq!(err, "");
    }

    #[test]
    fn test_unparsable_count_falls_back_to_one() {
        let (interpreter, out, err) = run_script("tape a b c\nright x\nread\nleft y\nread\n");
        assert_eq!(out, "b\na\n");
        assert_eq!(err, "");
        assert_eq!(interpreter.machine().step_count(), 0);

        let (interpreter, _, err) = run_script("rule start - start 1 ->\nstep x\nstep -1\n");
        assert_eq!(err, "");
        assert_eq!(interpreter.machine().step_count(), 2);
    }

    #[test]
    fn test_write_put_and_insert() {
        let script = "write x\ntape\nw\ntape\nput 1 2 3\ntape\nputl 9 8\ntape\ninsert l\ninsertr r\ntape\ni\ninsertr\ntape\n";
        let (_, out, _) = run_script(script);
        assert_eq!(
            out,
            "[x]\n[-]\n1 2 3 [-]\n1 [2] 8 9\n1 l [2] r 8 9\n1 l - [2] - r 8 9\n"
        );
    }

    #[test]
    fn test_clear_commands() {
        let (_, out, _) = run_script("tape a b c\nright\nclearl\ntape\nclearr\ntape\nclear\ntape\n");
        assert_eq!(out, "[b] c\n[b]\n[-]\n");
    }

    #[test]
    fn test_state_set_and_reset() {
        let (interpreter, out, _) = run_script("state q7\nstate\ntape a\nrule a b c\nhalt h\nreset\nstate\n");
        assert_eq!(out, "q7\nstart\n");
        assert_eq!(interpreter.machine(), &TuringMachine::new());
    }

    #[test]
    fn test_unknown_command_and_extra_tokens() {
        let (_, out, err) = run_script("frobnicate now\nread extra\n\n   \n");
        assert_eq!(out, "-\n");
        assert_eq!(err, "Unknown command `frobnicate'.\nExtra character(s) ignored.\n");
    }

    #[test]
    fn test_exit_stops_reading() {
        let (_, out, _) = run_script("read\nexit\nread\n");
        assert_eq!(out, "-\n");
    }

    /// Output stream that interrupts the run the first time it is written to.
    struct InterruptingOut {
        token: CancelToken,
        bytes: Vec<u8>,
    }

    impl Write for InterruptingOut {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.token.interrupt();
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_interrupted_run_is_reported() {
        let cancel = CancelToken::new();
        let out = InterruptingOut {
            token: cancel.clone(),
            bytes: Vec::new(),
        };
        let mut sources = SourceStack::new();
        sources.queue("script", Input::from_text("defaultrule walk walk x ->\nstate walk\ntrace\nstate\n"));

        let mut interpreter = Interpreter::new(sources, cancel.clone(), out, Vec::new());
        interpreter.run().unwrap();
        assert!(cancel.is_idle());
        assert_eq!(interpreter.machine().step_count(), 2);

        let (out, err) = interpreter.into_streams();
        assert_eq!(String::from_utf8(out.bytes).unwrap(), "walk: x [-]\nwalk\n");
        assert_eq!(String::from_utf8(err).unwrap(), "Running . . . \nInterrupted.\n");
    }

    #[test]
    fn test_invalid_utf8_line_still_runs() {
        let mut interpreter = interpreter();
        let bytes = b"tape \xe9 b\ntape\nread\n".to_vec();
        interpreter
            .sources_mut()
            .queue("script", Input::Reader(Box::new(io::Cursor::new(bytes))));
        interpreter.run().unwrap();

        let (out, err) = interpreter.into_streams();
        assert_eq!(String::from_utf8(out).unwrap(), "[\u{FFFD}] b\n\u{FFFD}\n");
        assert_eq!(String::from_utf8(err).unwrap(), "");
    }

    #[test]
    fn test_return_in_literal_discards_next_source() {
        let mut interpreter = interpreter();
        let sources = interpreter.sources_mut();
        sources.queue_literal("return");
        sources.queue("script", Input::from_text("read\n"));
        sources.queue_literal("state");
        interpreter.run().unwrap();

        let (out, _) = interpreter.into_streams();
        assert_eq!(String::from_utf8(out).unwrap(), "start\n");
    }

    #[test]
    fn test_version() {
        let (_, out, _) = run_script("version\n");
        assert_eq!(out, format!("tmt {}\n", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_dump_replays_to_equivalent_machine() {
        let script = "rule s0 0 s0 1 ->\nrule s0 1 s1 0 <-\ndefaultrule s0 err - -\ndefaultrule any\nhalt s1\nhalt err\nstate s0\ntape 0 0 1 0\nright 2\n";
        let (original, _, _) = run_script(script);
        let dumped = dump(original.machine());

        let (replayed, _, err) = run_script(&format!("reset\n{dumped}"));
        assert_eq!(err, "");
        assert_eq!(replayed.machine(), original.machine());
        assert_eq!(dump(replayed.machine()), dumped);
    }

    #[test]
    fn test_dump_command_output() {
        let (_, out, _) = run_script("halt h\ndump\n");
        assert_eq!(out, "state\tstart\ntape\t-\nhalt\th\n");
    }

    #[test]
    fn test_read_tape_commands_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cells.txt");
        fs::write(&path, "ab c\nde\n").unwrap();
        let name = path.to_string_lossy();

        let script = format!(
            "readtape {name}\ntape\nreadstring {name}\ntape\nreadline {name}\ntape\n"
        );
        let (_, out, err) = run_script(&script);
        assert_eq!(out, "[ab] c de\n[a] b c d e\n[a] b c\n");
        assert_eq!(err, "");
    }

    #[test]
    fn test_read_tape_missing_file_keeps_tape() {
        let (interpreter, _, err) = run_script("tape x y\nreadtape /nonexistent/cells.txt\n");
        assert_eq!(err, "Unable to open file `/nonexistent/cells.txt'.\n");
        assert_eq!(interpreter.machine().tape().render(), "[x] y");
    }

    #[test]
    fn test_input_and_return() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inner.tm");
        fs::write(&path, "state inner\nstate\nreturn\nstate never\n").unwrap();

        let script = format!("input {}\nstate\ninput /nonexistent/x.tm\n", path.to_string_lossy());
        let (interpreter, out, err) = run_script(&script);
        assert_eq!(out, "inner\ninner\n");
        assert_eq!(err, "Unable to open file `/nonexistent/x.tm'.\n");
        assert_eq!(interpreter.machine().state(), "inner");
    }
}
