use super::AxisId;

/// Indicates that an axis context was dropped by the map that owned it.
#[derive(Debug, thiserror::Error)]
#[error("the axis context ({axis_id}) is no longer valid")]
pub struct AxisViewInvalid {
    pub axis_id: AxisId,
}
