//! Timeline configuration.

use serde::{Deserialize, Serialize};

/// What a dependent drops when a dependency change leaves it unresolvable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Clear the whole side: dependency set and constraint function (default).
    #[default]
    WholeSide,
    /// Drop only the dependency that broke consistency.
    ///
    /// Falls back to [`WholeSide`](Self::WholeSide) when the remaining set
    /// still cannot be resolved.
    OffendingOnly,
}

/// Behavior switches for a [`Timeline`](crate::dependency::Timeline).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Forced-eviction scope during propagation.
    #[serde(default)]
    pub eviction: EvictionPolicy,
    /// Notify range observers after a resolution even when the range did not move.
    #[serde(default)]
    pub notify_unchanged_ranges: bool,
}

impl TimelineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the forced-eviction scope.
    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    /// Sets whether unchanged resolutions still notify range observers.
    pub fn with_notify_unchanged_ranges(mut self, notify: bool) -> Self {
        self.notify_unchanged_ranges = notify;
        self
    }
}
