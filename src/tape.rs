//! The tape store: an unbounded tape of tokens kept as two stacks around the head.
//!
//! `left` holds the cells strictly left of the head and `right` the cells strictly
//! right of it, each with the cell nearest the head at the end. Anything past the
//! end of either stack is blank. A blank is never pushed onto an empty stack, so a
//! tape that is blank beyond some point is represented without storing those blanks.

use crate::types::{is_blank, Token, BLANK};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    left: Vec<Token>,
    head: Token,
    right: Vec<Token>,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// Creates an all-blank tape.
    pub fn new() -> Self {
        Self {
            left: Vec::new(),
            head: BLANK.to_string(),
            right: Vec::new(),
        }
    }

    /// Moves the head `|delta|` cells, rightward for positive `delta`.
    pub fn shift(&mut self, delta: i64) {
        for _ in 0..delta.unsigned_abs() {
            if delta > 0 {
                Self::shift_one(&mut self.head, &mut self.right, &mut self.left);
            } else {
                Self::shift_one(&mut self.head, &mut self.left, &mut self.right);
            }
        }
    }

    fn shift_one(head: &mut Token, from: &mut Vec<Token>, to: &mut Vec<Token>) {
        let next = from.pop().unwrap_or_else(|| BLANK.to_string());
        let current = std::mem::replace(head, next);
        if !to.is_empty() || !is_blank(&current) {
            to.push(current);
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> &str {
        &self.head
    }

    /// Replaces the symbol under the head without moving.
    pub fn write(&mut self, symbol: impl Into<Token>) {
        self.head = symbol.into();
    }

    /// Cells left of the head, nearest last.
    pub fn left(&self) -> &[Token] {
        &self.left
    }

    /// Cells right of the head, nearest last.
    pub fn right(&self) -> &[Token] {
        &self.right
    }

    pub fn clear_left(&mut self) {
        self.left.clear();
    }

    pub fn clear_right(&mut self) {
        self.right.clear();
    }

    /// Clears both sides and blanks the head.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.head = BLANK.to_string();
    }

    /// Inserts a cell directly left of the head.
    pub fn insert_left(&mut self, symbol: impl Into<Token>) {
        self.left.push(symbol.into());
    }

    /// Inserts a cell directly right of the head.
    pub fn insert_right(&mut self, symbol: impl Into<Token>) {
        self.right.push(symbol.into());
    }

    /// Moves the head to the leftmost stored cell.
    pub fn rewind(&mut self) {
        self.shift(-(self.left.len() as i64));
    }

    /// Moves the head to the rightmost stored cell.
    pub fn fast_forward(&mut self) {
        self.shift(self.right.len() as i64);
    }

    /// Writes each symbol and then moves one cell in the sign direction of `step`.
    pub fn put<I>(&mut self, symbols: I, step: i64)
    where
        I: IntoIterator,
        I::Item: Into<Token>,
    {
        for symbol in symbols {
            self.write(symbol);
            self.shift(step);
        }
    }

    /// Replaces the whole tape with `symbols` and leaves the head on the first one.
    pub fn load<I>(&mut self, symbols: I)
    where
        I: IntoIterator,
        I::Item: Into<Token>,
    {
        self.clear();
        self.put(symbols, 1);
        self.rewind();
    }

    /// Renders the tape as `l1 l2 [head] r1 r2`, with the right side nearest first.
    pub fn render(&self) -> String {
        self.render_with(|head| format!("[{head}]"))
    }

    /// Renders the tape without brackets, the form `dump` emits after `tape`.
    pub fn render_plain(&self) -> String {
        self.render_with(|head| head.to_string())
    }

    fn render_with(&self, head: impl Fn(&str) -> String) -> String {
        let mut out = String::new();
        for cell in &self.left {
            out.push_str(cell);
            out.push(' ');
        }
        out.push_str(&head(&self.head));
        for cell in self.right.iter().rev() {
            out.push(' ');
            out.push_str(cell);
        }
        out
    }
}
