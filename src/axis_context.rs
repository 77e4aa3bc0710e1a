use std::collections::TryReserveError;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::sync::Notify;
use tracing::{debug, trace, warn};

use crate::axis::AxisId;
use crate::scheduler::Pollable;
use crate::state_machine::StateMachine;
use crate::state_machine::axis::{AxisInput, AxisMachine, AxisOutput, Readback};
use crate::state_machine::command::CommandKind;
use crate::state_machine::error::TransactionError;
use crate::state_machine::wrappers::input::system::SystemResource;

/// Commands reserved per axis when it is created, covering a typical transaction.
const PENDING_CAPACITY: usize = 8;

/// The runner around one [`AxisMachine`].
///
/// All access to the machine goes through a single lock, so a poll tick and a transaction
/// commit never interleave. Time comes from the tokio clock.
pub struct AxisContext {
    id: AxisId,
    poll_interval: Duration,
    machine: Mutex<AxisMachine>,
    data_ready: Arc<Notify>,
}

impl std::fmt::Debug for AxisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisContext")
            .field("id", &self.id)
            .field("poll_interval", &self.poll_interval)
            .field("machine", &"<AxisMachine>")
            .finish()
    }
}

impl AxisContext {
    pub fn new(
        id: AxisId,
        limit_low: i32,
        limit_high: i32,
        poll_interval: Duration,
    ) -> Result<Self, TryReserveError> {
        let mut machine = AxisMachine::new(limit_low, limit_high);
        machine.reserve_pending(PENDING_CAPACITY)?;

        Ok(Self {
            id,
            poll_interval,
            machine: Mutex::new(machine),
            data_ready: Arc::new(Notify::new()),
        })
    }

    pub fn id(&self) -> AxisId {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, AxisMachine> {
        self.machine.lock().expect("axis machine lock poisoned")
    }

    fn now() -> Instant {
        <tokio::time::Instant as SystemResource>::generate().into_std()
    }

    pub fn start_transaction(&self) {
        self.lock().start_transaction();
    }

    pub fn build_transaction(&self, kind: CommandKind, value: f64) -> Result<(), TransactionError> {
        self.lock().build_transaction(kind, value)
    }

    pub fn end_transaction(&self) -> Result<usize, TransactionError> {
        let result = self.lock().end_transaction(Self::now());
        self.log_commit(&result);
        result
    }

    /// Run a whole `start`/`build`/`end` bracket while holding the axis lock.
    ///
    /// If `build_fn` fails the bracket is abandoned and nothing is applied.
    pub fn transaction<F>(&self, build_fn: F) -> Result<usize, TransactionError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<(), TransactionError>,
    {
        let mut machine = self.lock();
        machine.start_transaction();

        let mut transaction = Transaction {
            machine: &mut *machine,
        };
        if let Err(err) = build_fn(&mut transaction) {
            machine.abandon_transaction();
            return Err(err);
        }

        let result = machine.end_transaction(Self::now());
        drop(machine);

        self.log_commit(&result);
        result
    }

    fn log_commit(&self, result: &Result<usize, TransactionError>) {
        match result {
            Ok(applied) => debug!(axis_id = %self.id, applied, "Transaction committed"),
            Err(err) => warn!(axis_id = %self.id, error = %err, "Transaction failed"),
        }
    }

    /// Advance the kinematics to now and raise the data-ready flag.
    pub fn tick(&self) {
        let readback = {
            let mut machine = self.lock();
            machine.process_input(AxisInput::Tick(Self::now()));
            machine.readback()
        };
        trace!(
            axis_id = %self.id,
            position = readback.position,
            moving = readback.moving,
            "Tick"
        );

        self.data_ready.notify_one();
    }

    /// The current readback, leaving the data-ready flag as it is.
    pub fn snapshot(&self) -> Readback {
        self.lock().readback()
    }

    pub fn clear_data_ready(&self) {
        self.lock().clear_data_ready();
    }

    /// Read the values produced by the last tick and clear the data-ready flag.
    ///
    /// Returns `None` if no tick happened since the previous read.
    pub fn read_values(&self) -> Option<Readback> {
        self.lock().poll_output().map(|out| match out {
            AxisOutput::Readback(readback) => readback,
        })
    }

    /// A signal notified after every tick, for consumers waiting on new values.
    pub fn data_ready_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.data_ready)
    }
}

impl Pollable for AxisContext {
    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn on_tick(&self) {
        self.tick();
    }
}

/// An open transaction on a locked axis, handed out by [`AxisContext::transaction`].
pub struct Transaction<'a> {
    machine: &'a mut AxisMachine,
}

impl Transaction<'_> {
    /// Queue a host command; unsupported kinds are accepted and dropped.
    pub fn build(&mut self, kind: CommandKind, value: f64) -> Result<(), TransactionError> {
        self.machine.build_transaction(kind, value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;

    use super::*;

    fn context() -> AxisContext {
        AxisContext::new(AxisId::new(1), -100, 100, Duration::from_millis(100)).unwrap()
    }

    #[test]
    fn test_bracket_through_context() {
        let ctx = context();

        ctx.start_transaction();
        ctx.build_transaction(CommandKind::LoadPosition, 42.0).unwrap();
        assert_eq!(ctx.snapshot().position, 0);

        assert_eq!(ctx.end_transaction(), Ok(1));
        assert_eq!(ctx.snapshot().position, 42);
    }

    #[test]
    fn test_build_without_start_rejected() {
        let ctx = context();

        assert_eq!(
            ctx.build_transaction(CommandKind::Go, 0.0),
            Err(TransactionError::NotOpen)
        );
        assert_eq!(ctx.end_transaction(), Err(TransactionError::NotOpen));
    }

    #[test]
    fn test_failed_build_abandons_bracket() {
        let ctx = context();

        let result = ctx.transaction(|tx| {
            tx.build(CommandKind::LoadPosition, 9.0)?;
            Err(TransactionError::NotOpen)
        });

        assert_eq!(result, Err(TransactionError::NotOpen));
        assert_eq!(ctx.snapshot().position, 0);
        assert_eq!(ctx.end_transaction(), Err(TransactionError::NotOpen));
    }

    #[test]
    fn test_reader_sees_whole_transaction() {
        let ctx = Arc::new(context());
        let (tx_snapshot, rx_snapshot) = mpsc::channel();

        let applied = ctx
            .transaction(|tx| {
                tx.build(CommandKind::MoveRelative, 50.0)?;
                tx.build(CommandKind::SetVelocity, 5.0)?;

                // This reader blocks on the axis lock until the bracket is committed.
                let reader = Arc::clone(&ctx);
                let sender = tx_snapshot.clone();
                thread::spawn(move || {
                    let _ = sender.send(reader.snapshot());
                });

                tx.build(CommandKind::Go, 0.0)
            })
            .unwrap();

        assert_eq!(applied, 3);
        let seen = rx_snapshot.recv().unwrap();
        assert!(seen.moving);
    }

    #[test]
    fn test_tick_and_read_values() {
        let ctx = context();
        assert!(ctx.read_values().is_none());

        ctx.tick();
        assert!(ctx.snapshot().data_ready);

        let readback = ctx.read_values().unwrap();
        assert!(readback.data_ready);
        assert!(ctx.read_values().is_none());

        ctx.tick();
        ctx.clear_data_ready();
        assert!(ctx.read_values().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_motion_follows_tokio_clock() {
        let ctx = context();
        ctx.transaction(|tx| {
            tx.build(CommandKind::MoveAbsolute, 30.0)?;
            tx.build(CommandKind::SetVelocity, 10.0)?;
            tx.build(CommandKind::Go, 0.0)
        })
        .unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        ctx.tick();
        assert_eq!(ctx.snapshot().position, 20);

        tokio::time::advance(Duration::from_secs(2)).await;
        ctx.tick();
        let readback = ctx.read_values().unwrap();
        assert_eq!(readback.position, 30);
        assert!(!readback.moving);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_notifies_consumer() {
        let ctx = context();
        let signal = ctx.data_ready_signal();

        ctx.tick();
        signal.notified().await;

        assert!(ctx.read_values().is_some());
    }
}
