use std::collections::TryReserveError;

use crate::axis::AxisId;
use crate::axis_map::error::{AxisAlreadyPresent, AxisNotFound};
use crate::config::ConfigError;
use crate::state_machine::error::TransactionError;

/// Errors reported by the [`AxisRegistry`](super::AxisRegistry).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Registration with an id already in use; the registry is unchanged.
    #[error(transparent)]
    DuplicateId(#[from] AxisAlreadyPresent),

    /// Lookup of an id that was never registered.
    #[error(transparent)]
    UnknownId(#[from] AxisNotFound),

    /// The axis could not be allocated; registration was aborted.
    #[error("failed to allocate axis {axis_id}")]
    AllocationFailure {
        axis_id: AxisId,
        #[source]
        source: TryReserveError,
    },

    /// The configuration was rejected before anything was allocated.
    #[error("invalid configuration for axis {axis_id}")]
    InvalidConfig {
        axis_id: AxisId,
        #[source]
        source: ConfigError,
    },

    /// Restoring the initial position failed; the axis was not registered.
    #[error("failed to restore the position of axis {axis_id}")]
    InitialLoad {
        axis_id: AxisId,
        #[source]
        source: TransactionError,
    },
}
