use std::collections::{TryReserveError, VecDeque};
use std::time::Instant;

use super::command::{Command, Transition};
use super::error::TransactionError;
use super::kinematics::AxisState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bracket {
    Idle,
    Open,
}

/// Buffers commands between a `start` and an `end`, then applies them in FIFO order.
///
/// The queue is empty whenever no bracket is open. Application aborts on the first failing
/// command, discarding everything queued after it.
#[derive(Debug)]
pub struct TransactionQueue<C = Command> {
    bracket: Bracket,
    pending: VecDeque<C>,
}

impl<C: Transition> TransactionQueue<C> {
    pub fn new() -> Self {
        Self {
            bracket: Bracket::Idle,
            pending: VecDeque::new(),
        }
    }

    /// Reserve room for `additional` queued commands up front.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.pending.try_reserve(additional)
    }

    pub fn is_open(&self) -> bool {
        self.bracket == Bracket::Open
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Open a bracket, dropping anything left over from a previous one.
    pub fn start(&mut self) {
        self.pending.clear();
        self.bracket = Bracket::Open;
    }

    /// Fails with [`TransactionError::NotOpen`] unless a bracket is open.
    pub fn ensure_open(&self) -> Result<(), TransactionError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(TransactionError::NotOpen)
        }
    }

    /// Queue `command` in the open bracket.
    pub fn build(&mut self, command: C) -> Result<(), TransactionError> {
        self.ensure_open()?;
        self.pending.push_back(command);
        Ok(())
    }

    /// Close the bracket without applying anything.
    pub fn abandon(&mut self) {
        self.pending.clear();
        self.bracket = Bracket::Idle;
    }

    /// Close the bracket and apply every queued command to `state` in order.
    ///
    /// Returns the number of commands applied. The queue is empty afterwards whether or not a
    /// command failed.
    pub fn end(&mut self, state: &mut AxisState, now: Instant) -> Result<usize, TransactionError> {
        self.ensure_open()?;
        self.bracket = Bracket::Idle;

        let mut applied = 0;
        while let Some(command) = self.pending.pop_front() {
            if let Err(source) = command.apply(state, now) {
                self.pending.clear();
                return Err(TransactionError::Aborted { applied, source });
            }
            applied += 1;
        }

        Ok(applied)
    }
}

impl<C: Transition> Default for TransactionQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
