use std::collections::TryReserveError;
use std::time::Instant;

use super::StateMachine;
use super::command::{Command, CommandKind};
use super::error::TransactionError;
use super::kinematics::AxisState;
use super::transaction::TransactionQueue;

/// The values a consumer reads back from an axis once per poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readback {
    pub position: i32,
    pub limit_low_hit: bool,
    pub limit_high_hit: bool,
    pub moving: bool,
    pub data_ready: bool,
}

/// One simulated axis: its kinematic state, its transaction queue and the data-ready flag.
#[derive(Debug)]
pub struct AxisMachine {
    state: AxisState,
    transaction: TransactionQueue<Command>,
    data_ready: bool,
}

impl AxisMachine {
    pub fn new(limit_low: i32, limit_high: i32) -> Self {
        Self {
            state: AxisState::new(limit_low, limit_high),
            transaction: TransactionQueue::new(),
            data_ready: false,
        }
    }

    pub fn state(&self) -> &AxisState {
        &self.state
    }

    pub fn is_data_ready(&self) -> bool {
        self.data_ready
    }

    /// Reserve room for `additional` queued commands.
    pub fn reserve_pending(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.transaction.try_reserve(additional)
    }

    pub fn start_transaction(&mut self) {
        self.transaction.start();
    }

    /// Queue a host command in the open transaction.
    ///
    /// Kinds the simulation does not model are accepted and dropped.
    pub fn build_transaction(&mut self, kind: CommandKind, value: f64) -> Result<(), TransactionError> {
        match Command::from_kind(kind, value) {
            Some(command) => self.transaction.build(command),
            None => self.transaction.ensure_open(),
        }
    }

    pub fn end_transaction(&mut self, now: Instant) -> Result<usize, TransactionError> {
        self.transaction.end(&mut self.state, now)
    }

    pub fn abandon_transaction(&mut self) {
        self.transaction.abandon();
    }

    /// The current readback without consuming the data-ready flag.
    pub fn readback(&self) -> Readback {
        Readback {
            position: self.state.position(),
            limit_low_hit: self.state.limit_low_hit(),
            limit_high_hit: self.state.limit_high_hit(),
            moving: self.state.is_moving(),
            data_ready: self.data_ready,
        }
    }

    pub fn clear_data_ready(&mut self) {
        self.data_ready = false;
    }

    fn tick(&mut self, now: Instant) {
        self.state.advance(now);
        self.data_ready = true;
    }

    fn take_readback(&mut self) -> Option<Readback> {
        if self.data_ready {
            let readback = self.readback();
            self.data_ready = false;
            Some(readback)
        } else {
            None
        }
    }
}

pub enum AxisInput {
    Tick(Instant),
}

pub enum AxisOutput {
    Readback(Readback),
}

impl StateMachine for AxisMachine {
    type Input = AxisInput;
    type Output = AxisOutput;

    fn process_input(&mut self, input: Self::Input) {
        match input {
            AxisInput::Tick(now) => self.tick(now),
        }
    }

    fn poll_output(&mut self) -> Option<Self::Output> {
        self.take_readback().map(AxisOutput::Readback)
    }
}
