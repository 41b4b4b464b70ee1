//! Cooperative cancellation for `run`.
//!
//! The token is shared between the interpreter and whatever delivers interrupts
//! (the CLI's SIGINT handler). It distinguishes an idle interpreter from one inside
//! a run loop: interrupting a running loop asks it to stop after the current step,
//! while interrupting an idle interpreter, or one already asked to stop, means the
//! process should exit.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const INTERRUPTED: u8 = 2;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<AtomicU8>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a run loop as active until the returned guard is dropped.
    pub fn arm(&self) -> RunGuard<'_> {
        self.state.store(RUNNING, Ordering::SeqCst);
        RunGuard { token: self }
    }

    /// Delivers an interrupt.
    ///
    /// Returns `true` when the caller should terminate the process.
    pub fn interrupt(&self) -> bool {
        self.state
            .compare_exchange(RUNNING, INTERRUPTED, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
    }

    /// Checks whether the active run loop has been asked to stop.
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::SeqCst) == INTERRUPTED
    }

    pub fn is_idle(&self) -> bool {
        self.state.load(Ordering::SeqCst) == IDLE
    }
}

/// Restores the token to idle when the run loop exits, however it exits.
pub struct RunGuard<'a> {
    token: &'a CancelToken,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.token.state.store(IDLE, Ordering::SeqCst);
    }
}
