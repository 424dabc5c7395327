//! Change-notification protocol.
//!
//! Subscriptions are stored as plain ids on the observed node: a dependent
//! state is referenced by [`StateId`], an external observer by
//! [`ObserverId`]. Lists are copy-on-write, so a dispatch iterates a
//! snapshot while callbacks add or remove subscriptions.

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{Side, StateId, TimeRange};

/// Handle of an external observer registered on a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverId(pub u64);

/// External listener for activity and range changes.
///
/// Callbacks receive shared references only; they cannot mutate the
/// timeline they observe.
pub trait StateObserver: Send + Sync + Debug {
    /// The activity value of `state` changed to `active`.
    fn on_state_changed(&self, state: StateId, active: bool);

    /// The range of `state` moved to `range`.
    fn on_range_changed(&self, state: StateId, range: TimeRange);
}

/// External listener for destruction.
pub trait DestroyObserver: Send + Sync + Debug {
    /// `state` was destroyed.
    fn on_destroy(&self, state: StateId);
}

/// Entry in a node's change-subscription list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeSubscriber {
    /// `state` holds the observed node in its `side` dependency set.
    Dependent { state: StateId, side: Side },
    External(ObserverId),
}

/// Entry in a node's destruction-subscription list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestroySubscriber {
    /// `state` holds the observed node on at least one side.
    Dependent(StateId),
    External(ObserverId),
}

/// Copy-on-write subscription list, notified in registration order.
#[derive(Debug, Clone)]
pub struct ObserverList<T> {
    items: Arc<Vec<T>>,
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
        }
    }
}

impl<T: Clone + PartialEq> ObserverList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` unless already present. Returns whether it was added.
    pub fn add(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        Arc::make_mut(&mut self.items).push(item);
        true
    }

    /// Removes `item`. Returns whether it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(pos) = self.items.iter().position(|i| i == item) else {
            return false;
        };
        Arc::make_mut(&mut self.items).remove(pos);
        true
    }

    /// Keeps only the entries matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        Arc::make_mut(&mut self.items).retain(keep);
    }

    /// Whether `item` is subscribed.
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Immutable view for dispatch; later mutations do not affect it.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.items)
    }

    /// Iterates in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
