//! Command names and the argument cursor used to read a command line.

use crate::types::{Token, TuringMachineError, BLANK};
use std::iter::Peekable;
use std::str::{FromStr, SplitWhitespace};

/// Every command the interpreter understands. Aliases map to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Version,
    Reset,
    Rule,
    ClearRules,
    DefaultRule,
    ClearDefaultRules,
    ClearAllRules,
    Halt,
    NoHalt,
    Dump,
    Begin,
    End,
    /// `right`, `move`
    Right,
    Left,
    ClearLeft,
    ClearRight,
    Clear,
    Tape,
    TapeString,
    ReadTape,
    ReadString,
    ReadLine,
    State,
    /// `read`, `r`
    Read,
    /// `write`, `w`
    Write,
    /// `put`, `putr`, `p`
    PutRight,
    PutLeft,
    InsertRight,
    /// `insertl`, `insert`, `i`
    InsertLeft,
    /// `step`, `s`, `steptrace`, `ts`
    Step { trace: bool },
    /// `run`, `trace`, `runtrace`
    Run { trace: bool },
    Input,
    Return,
    Exit,
}

impl Command {
    /// Looks up a command by name.
    pub fn parse(name: &str) -> Option<Self> {
        let command = match name {
            "version" => Command::Version,
            "reset" => Command::Reset,
            "rule" => Command::Rule,
            "clearrules" => Command::ClearRules,
            "defaultrule" => Command::DefaultRule,
            "cleardefaultrules" => Command::ClearDefaultRules,
            "clearallrules" => Command::ClearAllRules,
            "halt" => Command::Halt,
            "nohalt" => Command::NoHalt,
            "dump" => Command::Dump,
            "begin" => Command::Begin,
            "end" => Command::End,
            "right" | "move" => Command::Right,
            "left" => Command::Left,
            "clearl" => Command::ClearLeft,
            "clearr" => Command::ClearRight,
            "clear" => Command::Clear,
            "tape" => Command::Tape,
            "tapestring" => Command::TapeString,
            "readtape" => Command::ReadTape,
            "readstring" => Command::ReadString,
            "readline" => Command::ReadLine,
            "state" => Command::State,
            "read" | "r" => Command::Read,
            "write" | "w" => Command::Write,
            "put" | "putr" | "p" => Command::PutRight,
            "putl" => Command::PutLeft,
            "insertr" => Command::InsertRight,
            "insertl" | "insert" | "i" => Command::InsertLeft,
            "step" | "s" => Command::Step { trace: false },
            "steptrace" | "ts" => Command::Step { trace: true },
            "run" => Command::Run { trace: false },
            "trace" | "runtrace" => Command::Run { trace: true },
            "input" => Command::Input,
            "return" => Command::Return,
            "exit" => Command::Exit,
            _ => return None,
        };
        Some(command)
    }
}

/// Left-to-right cursor over the whitespace-separated tokens of a line.
pub struct Args<'a> {
    tokens: Peekable<SplitWhitespace<'a>>,
}

impl<'a> Args<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace().peekable(),
        }
    }

    /// Takes the next token, or the blank token when the line is used up.
    pub fn next_or_blank(&mut self) -> Token {
        self.next().unwrap_or(BLANK).to_string()
    }

    /// Takes the next token, which the command cannot do without.
    pub fn required(&mut self, what: &'static str) -> Result<&'a str, TuringMachineError> {
        self.next().ok_or(TuringMachineError::MissingArgument(what))
    }

    /// Takes a numeric argument. A missing or unparsable token yields `default`;
    /// an unparsable token is still consumed.
    pub fn number<T: FromStr>(&mut self, default: T) -> T {
        self.next()
            .and_then(|token| token.parse().ok())
            .unwrap_or(default)
    }

    /// Takes every remaining token.
    pub fn rest(&mut self) -> Vec<&'a str> {
        self.tokens.by_ref().collect()
    }

    pub fn has_remaining(&mut self) -> bool {
        self.tokens.peek().is_some()
    }
}

impl<'a> Iterator for Args<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(Command::parse("move"), Some(Command::Right));
        assert_eq!(Command::parse("r"), Some(Command::Read));
        assert_eq!(Command::parse("p"), Some(Command::PutRight));
        assert_eq!(Command::parse("i"), Some(Command::InsertLeft));
        assert_eq!(Command::parse("ts"), Some(Command::Step { trace: true }));
        assert_eq!(Command::parse("runtrace"), Some(Command::Run { trace: true }));
        assert_eq!(Command::parse("Run"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_args_cursor() {
        let mut args = Args::new("  a\tb  c ");
        assert_eq!(args.next(), Some("a"));
        assert!(args.has_remaining());
        assert_eq!(args.rest(), vec!["b", "c"]);
        assert!(!args.has_remaining());
        assert_eq!(args.next_or_blank(), BLANK);
    }

    #[test]
    fn test_required_and_number() {
        let mut args = Args::new("7 x");
        assert_eq!(args.number(1i64), 7);
        assert_eq!(args.number(1i64), 1);
        assert!(!args.has_remaining());
        assert_eq!(args.number(1i64), 1);
        assert_eq!(
            args.required("state"),
            Err(TuringMachineError::MissingArgument("state"))
        );
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(Args::new("-3").number(1i64), -3);
        assert_eq!(Args::new("-3").number(1u64), 1);
    }
}
