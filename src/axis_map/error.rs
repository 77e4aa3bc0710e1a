use super::AxisId;

/// Indicates that an axis could not be added because its id is already taken.
#[derive(Debug, thiserror::Error)]
#[error("axis id {axis_id} is already registered")]
pub struct AxisAlreadyPresent {
    pub axis_id: AxisId,
}

/// Indicates that no axis is registered under the requested id.
#[derive(Debug, thiserror::Error)]
#[error("no axis is registered with id {axis_id}")]
pub struct AxisNotFound {
    pub axis_id: AxisId,
}
