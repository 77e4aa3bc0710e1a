use std::sync::Arc;

pub use crate::axis::AxisId;
use dashmap::{DashMap, Entry};

use self::{
    axis_ref::AxisRef,
    error::{AxisAlreadyPresent, AxisNotFound},
};

pub mod axis_ref;
pub mod error;

/// A map of axes identified by an [`AxisId`] and their associated context `T`.
///
/// Once added, an axis becomes a shared resource that can only be reached through the weak
/// [`AxisRef`] interface, so the map alone decides how long the context lives. Entries are never
/// removed.
#[derive(Debug)]
pub struct AxisMap<T> {
    entries: DashMap<AxisId, Arc<T>, ahash::RandomState>,
}

impl<T> AxisMap<T> {
    /// Construct a new empty [`AxisMap`].
    pub fn new() -> AxisMap<T> {
        Self::default()
    }

    /// Track `axis_context` under `axis_id`, failing if the id is already taken.
    ///
    /// On failure the existing entry is left untouched.
    pub fn insert_axis(&self, axis_id: AxisId, axis_context: T) -> Result<(), AxisAlreadyPresent> {
        match self.entries.entry(axis_id) {
            Entry::Occupied(entry) => Err(AxisAlreadyPresent {
                axis_id: *entry.key(),
            }),

            Entry::Vacant(slot) => {
                slot.insert(Arc::new(axis_context));
                Ok(())
            }
        }
    }

    /// Lend the axis context for the provided `axis_id`.
    pub fn get_axis(&self, axis_id: AxisId) -> Result<AxisRef<T>, AxisNotFound> {
        self.entries
            .view(&axis_id, |_, axis| {
                AxisRef::new(axis_id, Arc::downgrade(axis))
            })
            .ok_or(AxisNotFound { axis_id })
    }

    /// Lend every registered axis, ordered by id.
    pub fn axes(&self) -> Vec<AxisRef<T>> {
        let mut axes: Vec<_> = self
            .entries
            .iter()
            .map(|entry| AxisRef::new(*entry.key(), Arc::downgrade(entry.value())))
            .collect();
        axes.sort_by_key(AxisRef::id);
        axes
    }

    pub fn contains(&self, axis_id: AxisId) -> bool {
        self.entries.contains_key(&axis_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for AxisMap<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::default(),
        }
    }
}
