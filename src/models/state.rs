//! State condition model.
//!
//! A state is a boolean condition attached to a time range. It is
//! *defined* when it must be active over its whole range, *undefined* when it
//! may become active only for a trailing part of it. Once a state has been
//! active it is *extinct*: it can never become active again.
//!
//! # Layers
//!
//! | Layer | Type | Adds |
//! |-------|------|------|
//! | Base | [`FixedState`] | condition, undefined flag, extinction |
//! | Bounded | [`BoundState`](super::BoundState) | validated range moves, resolution |
//! | Dependent | [`Timeline`](crate::dependency::Timeline) node | dependency points, notifications |

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{TimeRange, UNBOUNDED_END};

/// Stable identifier of a state inside a [`Timeline`](crate::dependency::Timeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u64);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Base state: a condition over a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedState {
    range: TimeRange,
    undefined: bool,
    active: bool,
    extinct: bool,
}

impl FixedState {
    /// Creates an inactive, non-extinct state.
    pub fn new(range: TimeRange, undefined: bool) -> Self {
        Self {
            range,
            undefined,
            active: false,
            extinct: false,
        }
    }

    /// Current range.
    #[inline]
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Whether the state may be active only for a trailing part of its range.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        self.undefined
    }

    /// Current condition value.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the condition can never become true again.
    #[inline]
    pub fn is_extinct(&self) -> bool {
        self.extinct
    }

    /// Duration of the range, `None` when unbounded.
    pub fn duration(&self) -> Option<i64> {
        self.range.duration()
    }

    /// Assigns the condition value.
    ///
    /// Returns `false` when the value is unchanged, or when activation is
    /// attempted on an extinct state. Activation marks the state extinct.
    pub fn set_value(&mut self, value: bool) -> bool {
        if self.active == value {
            return false;
        }
        if value {
            if self.extinct {
                return false;
            }
            self.active = true;
            self.extinct = true;
        } else {
            self.active = false;
        }
        true
    }

    /// Replaces the range. Extinct states keep their range.
    pub(crate) fn replace_range(&mut self, range: TimeRange) -> bool {
        if self.extinct {
            return false;
        }
        self.range = range;
        true
    }
}

// ================================
// Views handed to constraint functions
// ================================

/// Inactive remainders of a reversible state.
///
/// `left` is the open interval before the state, `right` the open interval
/// after it; either may be absent when that side is already unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reversal {
    /// Remainder ending where the state starts.
    pub left: Option<TimeRange>,
    /// Remainder starting where the state ends.
    pub right: Option<TimeRange>,
}

impl Reversal {
    /// Remainders of a state bounded on both sides.
    pub fn of_bounded(range: TimeRange) -> Self {
        Self {
            left: Some(TimeRange::until(range.start())),
            right: Some(TimeRange::from_start(range.end())),
        }
    }
}

/// Read-only view of a dependency, as seen by a constraint function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateView {
    pub id: StateId,
    pub range: TimeRange,
    pub active: bool,
    pub extinct: bool,
    pub undefined: bool,
    /// `None` when the state has no reversible capability.
    pub reversal: Option<Reversal>,
}

impl StateView {
    /// Builds a view of a plain state with no reversible capability.
    pub fn of(id: StateId, state: &FixedState) -> Self {
        Self {
            id,
            range: state.range(),
            active: state.is_active(),
            extinct: state.is_extinct(),
            undefined: state.is_undefined(),
            reversal: None,
        }
    }

    /// Attaches reversible remainders.
    pub fn with_reversal(mut self, reversal: Reversal) -> Self {
        self.reversal = Some(reversal);
        self
    }

    /// Whether the state exposes left/right remainders.
    pub fn is_reversible(&self) -> bool {
        self.reversal.is_some()
    }

    /// Whether the range extends to the end sentinel.
    pub fn has_open_end(&self) -> bool {
        self.range.end() == UNBOUNDED_END
    }
}
