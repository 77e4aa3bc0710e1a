use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::axis_map::AxisMap;
use crate::axis_map::axis_ref::AxisRef;

/// Something refreshed on a fixed interval by the [`PollScheduler`].
pub trait Pollable: Send + Sync + 'static {
    /// Time to wait before each tick.
    fn poll_interval(&self) -> Duration;

    /// Called once per interval.
    fn on_tick(&self);
}

/// Runs one self-rescheduling poll task per registered entry.
///
/// Each task sleeps for the entry's poll interval, fires, then re-arms, so timing drift adds up
/// rather than compounding. Tasks end when their entry is dropped or on
/// [`shutdown`](Self::shutdown).
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct PollScheduler {
    tasks: JoinSet<()>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start polling every entry currently in `axes`.
    ///
    /// Call this once all axes are registered; entries added later are not picked up.
    pub fn spawn_all<T: Pollable>(axes: &AxisMap<T>) -> Self {
        let mut scheduler = Self::new();
        for axis in axes.axes() {
            scheduler.schedule(axis);
        }

        info!(axes = scheduler.len(), "Poll scheduler started");
        scheduler
    }

    /// Start polling a single entry.
    pub fn schedule<T: Pollable>(&mut self, axis: AxisRef<T>) {
        self.tasks.spawn(run_poll_loop(axis));
    }

    /// Number of poll tasks still tracked.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancel every poll task and wait for them to finish.
    pub async fn shutdown(mut self) {
        self.tasks.shutdown().await;
        info!("Poll scheduler stopped");
    }
}

async fn run_poll_loop<T: Pollable>(axis: AxisRef<T>) {
    debug!(axis_id = %axis.id(), "Poll task started");

    loop {
        let interval = match axis.view(T::poll_interval) {
            Ok(interval) => interval,
            Err(err) => {
                warn!(axis_id = %axis.id(), error = %err, "Poll task exiting");
                return;
            }
        };

        tokio::time::sleep(interval).await;

        if let Err(err) = axis.view(T::on_tick) {
            warn!(axis_id = %axis.id(), error = %err, "Poll task exiting");
            return;
        }
    }
}
