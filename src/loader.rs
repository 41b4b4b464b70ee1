//! This module provides `SourceLoader`, which opens named line sources and reads tape
//! contents out of them. The name `-` always refers to standard input.

use crate::types::{Token, TuringMachineError};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;

/// The name that stands for standard input.
pub const STDIN_NAME: &str = "-";

/// An open line source.
///
/// Standard input is read through the process-wide handle on every call so that
/// several sources naming `-` never hold separate buffers over the same stream.
pub enum Input {
    Stdin(io::Stdin),
    Reader(Box<dyn BufRead>),
}

impl Input {
    /// A source that yields `text` and then ends.
    pub fn from_text(text: impl Into<String>) -> Self {
        Input::Reader(Box::new(Cursor::new(text.into())))
    }

    /// Reads one line including its terminator. Returns `0` at end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD; they never fail the read.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        let mut bytes = Vec::new();
        let read = match self {
            Input::Stdin(stdin) => stdin.lock().read_until(b'\n', &mut bytes)?,
            Input::Reader(reader) => reader.read_until(b'\n', &mut bytes)?,
        };
        buf.push_str(&String::from_utf8_lossy(&bytes));
        Ok(read)
    }
}

/// How much of a source a tape-loading command consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// Everything up to end of input.
    All,
    /// A single line.
    Line,
}

/// Text read from a source, with the error that cut the read short, if any.
#[derive(Debug, Default)]
pub struct ReadResult {
    pub text: String,
    pub error: Option<TuringMachineError>,
}

/// `SourceLoader` is a utility struct for opening sources and reading tape contents.
pub struct SourceLoader;

impl SourceLoader {
    /// Opens the named source.
    ///
    /// # Returns
    ///
    /// * `Ok(Input)` for `-` (standard input) or a readable file.
    /// * `Err(TuringMachineError::OpenFailed)` if the file cannot be opened.
    pub fn open(name: &str) -> Result<Input, TuringMachineError> {
        if name == STDIN_NAME {
            return Ok(Self::stdin());
        }

        let file = File::open(Path::new(name)).map_err(|e| {
            log::debug!("failed to open {}: {}", name, e);
            TuringMachineError::OpenFailed(name.to_string())
        })?;
        Ok(Input::Reader(Box::new(BufReader::new(file))))
    }

    pub fn stdin() -> Input {
        Input::Stdin(io::stdin())
    }

    /// Reads `extent` worth of text from `input`.
    ///
    /// A read error stops reading; the text gathered so far is kept alongside the error.
    pub fn read(input: &mut Input, name: &str, extent: Extent) -> ReadResult {
        let mut result = ReadResult::default();
        loop {
            match input.read_line(&mut result.text) {
                Ok(0) => break,
                Ok(_) if extent == Extent::Line => break,
                Ok(_) => {}
                Err(e) => {
                    log::debug!("read from {} failed: {}", name, e);
                    result.error = Some(TuringMachineError::ReadFailed(name.to_string()));
                    break;
                }
            }
        }
        result
    }
}

/// Splits text into whitespace-separated symbols.
pub fn symbols(text: &str) -> Vec<Token> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Splits text into one symbol per non-whitespace character.
pub fn characters(text: &str) -> Vec<Token> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(String::from)
        .collect()
}
