use std::fmt::Display;

/// An ID for a simulated axis, assigned once when the axis is configured.
///
/// Ids are plain signed integers as handed out by the host configuration; uniqueness is enforced
/// by the [`AxisMap`](crate::axis_map::AxisMap) the axis is registered into.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AxisId(i32);

impl AxisId {
    /// Create a new [`AxisId`] from the raw integer identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the underlying integer identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for AxisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i32> for AxisId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}
