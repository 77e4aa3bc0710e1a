//! The device registry: configured axes keyed by id.

use tracing::info;

use crate::axis::AxisId;
use crate::axis_context::AxisContext;
use crate::axis_map::AxisMap;
use crate::axis_map::axis_ref::AxisRef;
use crate::axis_map::error::AxisAlreadyPresent;
use crate::config::AxisConfig;
use crate::state_machine::axis::Readback;
use crate::state_machine::command::CommandKind;

pub use self::error::RegistryError;

pub mod error;

/// Every configured axis, created once and kept for the life of the registry.
#[derive(Debug, Default)]
pub struct AxisRegistry {
    axes: AxisMap<AxisContext>,
}

impl AxisRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an axis from `config` and add it under its id.
    ///
    /// The new axis is idle at position zero unless the configuration carries an initial
    /// position, which is applied as an ordinary load-position transaction before the axis
    /// becomes visible.
    pub fn register(&self, config: AxisConfig) -> Result<AxisRef<AxisContext>, RegistryError> {
        let axis_id = config.id;
        let poll_interval = config
            .validate()
            .map_err(|source| RegistryError::InvalidConfig { axis_id, source })?;

        if self.axes.contains(axis_id) {
            return Err(AxisAlreadyPresent { axis_id }.into());
        }

        let context = AxisContext::new(axis_id, config.limit_low, config.limit_high, poll_interval)
            .map_err(|source| RegistryError::AllocationFailure { axis_id, source })?;

        if let Some(position) = config.initial_position {
            context
                .transaction(|tx| tx.build(CommandKind::LoadPosition, position))
                .map_err(|source| RegistryError::InitialLoad { axis_id, source })?;
        }

        self.axes.insert_axis(axis_id, context)?;

        info!(
            axis_id = %axis_id,
            limit_low = config.limit_low,
            limit_high = config.limit_high,
            poll_interval = ?poll_interval,
            "Axis registered"
        );

        Ok(self.axes.get_axis(axis_id)?)
    }

    /// Resolve an id to its axis.
    pub fn lookup(&self, axis_id: AxisId) -> Result<AxisRef<AxisContext>, RegistryError> {
        Ok(self.axes.get_axis(axis_id)?)
    }

    /// The underlying map, for handing to the [`PollScheduler`](crate::scheduler::PollScheduler).
    pub fn axes(&self) -> &AxisMap<AxisContext> {
        &self.axes
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<AxisId> {
        self.axes.axes().iter().map(AxisRef::id).collect()
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// The current readback of every axis, ordered by id. Does not consume data-ready flags.
    pub fn report(&self) -> Vec<(AxisId, Readback)> {
        self.axes
            .axes()
            .iter()
            .filter_map(|axis| {
                axis.view(AxisContext::snapshot)
                    .ok()
                    .map(|readback| (axis.id(), readback))
            })
            .collect()
    }
}
