//! The queue of pending command sources.
//!
//! Lines are always taken from the front source. Sources given on the command line
//! are queued in order; `input` puts a new source in front of everything else, so
//! a script can include another one and resume afterwards.
//!
//! A literal source is removed as soon as its line is taken, so a `return` on that
//! line discards the source queued after it.

use crate::loader::{Input, SourceLoader};
use crate::types::TuringMachineError;
use std::collections::VecDeque;

struct Source {
    name: String,
    input: Input,
    literal: bool,
}

#[derive(Default)]
pub struct SourceStack {
    sources: VecDeque<Source>,
}

impl SourceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the named source and queues it after the existing ones.
    pub fn queue_named(&mut self, name: &str) -> Result<(), TuringMachineError> {
        let input = SourceLoader::open(name)?;
        self.queue(name, input);
        Ok(())
    }

    /// Queues a one-line source holding `line`.
    pub fn queue_literal(&mut self, line: &str) {
        log::debug!("queued literal {}", line);
        self.sources.push_back(Source {
            name: line.to_string(),
            input: Input::from_text(line),
            literal: true,
        });
    }

    pub fn queue(&mut self, name: impl Into<String>, input: Input) {
        let name = name.into();
        log::debug!("queued source {}", name);
        self.sources.push_back(Source {
            name,
            input,
            literal: false,
        });
    }

    /// Opens the named source and makes it the active one.
    pub fn push_named(&mut self, name: &str) -> Result<(), TuringMachineError> {
        let input = SourceLoader::open(name)?;
        self.push(name, input);
        Ok(())
    }

    pub fn push(&mut self, name: impl Into<String>, input: Input) {
        let name = name.into();
        log::debug!("entering source {}", name);
        self.sources.push_front(Source {
            name,
            input,
            literal: false,
        });
    }

    /// Discards the active source. Returns `false` if there was none.
    pub fn pop(&mut self) -> bool {
        match self.sources.pop_front() {
            Some(source) => {
                log::debug!("leaving source {}", source.name);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Reads the next line, without its terminator, from the first source that has one.
    ///
    /// Exhausted sources are dropped. A source that fails to read is reported
    /// through `on_error` and dropped too. Returns `None` once every source is gone.
    pub fn next_line<F>(&mut self, mut on_error: F) -> Option<String>
    where
        F: FnMut(TuringMachineError),
    {
        while let Some(source) = self.sources.front_mut() {
            let mut line = String::new();
            match source.input.read_line(&mut line) {
                Ok(0) => {
                    log::debug!("source {} exhausted", source.name);
                }
                Ok(_) => {
                    if source.literal {
                        self.sources.pop_front();
                    }
                    let trimmed = line.trim_end_matches(['\n', '\r']).len();
                    line.truncate(trimmed);
                    return Some(line);
                }
                Err(e) => {
                    log::warn!("reading {} failed: {}", source.name, e);
                    on_error(TuringMachineError::ReadFailed(source.name.clone()));
                }
            }
            self.sources.pop_front();
        }
        None
    }
}
