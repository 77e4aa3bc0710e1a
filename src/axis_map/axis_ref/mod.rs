use std::fmt;
use std::sync::Weak;

use self::error::AxisViewInvalid;
use super::AxisId;

pub mod error;

/// A handle on a registered axis that does not keep it alive.
///
/// Poll tasks and consumers hold these; once the owning [`AxisMap`](super::AxisMap) is dropped
/// every [`view`](Self::view) fails and the holder is expected to stop.
pub struct AxisRef<T> {
    axis_id: AxisId,
    axis: Weak<T>,
}

impl<T> AxisRef<T> {
    pub(super) fn new(axis_id: AxisId, axis: Weak<T>) -> Self {
        Self { axis_id, axis }
    }

    pub fn id(&self) -> AxisId {
        self.axis_id
    }

    /// Run `view_fn` against the axis if it is still registered.
    pub fn view<F: FnOnce(&T) -> R, R>(&self, view_fn: F) -> Result<R, AxisViewInvalid> {
        let axis = self.axis.upgrade().ok_or(AxisViewInvalid {
            axis_id: self.axis_id,
        })?;

        Ok(view_fn(&axis))
    }
}

impl<T> fmt::Debug for AxisRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisRef")
            .field("axis_id", &self.axis_id)
            .field("registered", &(self.axis.strong_count() > 0))
            .finish()
    }
}

impl<T> Clone for AxisRef<T> {
    fn clone(&self) -> Self {
        Self {
            axis_id: self.axis_id,
            axis: Weak::clone(&self.axis),
        }
    }
}
