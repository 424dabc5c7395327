//! Range-bounded states.
//!
//! A [`BoundState`] restricts each of its sides to a set of constraint
//! ranges ([`BoundedRange`]). Moving the range by hand is validated against
//! those ranges; replacing the constraint ranges triggers a *resolution*
//! through the state's [`RangeAdjuster`], which either yields a consistent
//! range or leaves the state untouched.

use serde::{Deserialize, Serialize};

use super::{any_match, FixedState, Side, TimeRange, UNDEF_RANGE};
use crate::adjuster::RangeAdjuster;
use crate::error::StateResult;

/// Per-side constraint ranges a state's sides must lie within.
///
/// An empty side is normalized to the unbounded range: no ranges means no
/// restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedRange {
    start: Vec<TimeRange>,
    end: Vec<TimeRange>,
}

impl BoundedRange {
    /// Creates a bounded range from start-side and end-side constraint ranges.
    pub fn new(start: Vec<TimeRange>, end: Vec<TimeRange>) -> Self {
        Self {
            start: normalize(start),
            end: normalize(end),
        }
    }

    /// No restriction on either side.
    pub fn unbounded() -> Self {
        Self::new(vec![UNDEF_RANGE], vec![UNDEF_RANGE])
    }

    /// Start-side constraint ranges.
    pub fn start_ranges(&self) -> &[TimeRange] {
        &self.start
    }

    /// End-side constraint ranges.
    pub fn end_ranges(&self) -> &[TimeRange] {
        &self.end
    }

    /// Constraint ranges of the given side.
    pub fn side(&self, side: Side) -> &[TimeRange] {
        match side {
            Side::Start => &self.start,
            Side::End => &self.end,
        }
    }

    /// Replaces one side, keeping the other.
    pub fn with_side(mut self, side: Side, ranges: Vec<TimeRange>) -> Self {
        match side {
            Side::Start => self.start = normalize(ranges),
            Side::End => self.end = normalize(ranges),
        }
        self
    }

    /// Whether `range` satisfies both sides.
    pub fn admits(&self, range: TimeRange) -> bool {
        any_match(range.start(), &self.start) && any_match(range.end(), &self.end)
    }
}

impl Default for BoundedRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

fn normalize(ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    if ranges.is_empty() {
        vec![UNDEF_RANGE]
    } else {
        ranges
    }
}

/// Outcome of replacing a state's constraint ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The adjuster produced no consistent range; nothing changed.
    Failed,
    /// Constraint ranges replaced; the range stayed where it was.
    Unchanged,
    /// Constraint ranges replaced and the range moved away from `from`.
    Moved { from: TimeRange },
}

impl Resolution {
    /// Whether the new constraint ranges were committed.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Failed)
    }
}

/// A state whose sides are restricted to constraint ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundState {
    state: FixedState,
    bounds: BoundedRange,
    adjuster: RangeAdjuster,
    #[serde(skip, default = "validation_enabled")]
    validation: bool,
}

fn validation_enabled() -> bool {
    true
}

impl BoundState {
    /// Creates an unrestricted bound state.
    pub fn new(range: TimeRange, undefined: bool, adjuster: RangeAdjuster) -> Self {
        Self {
            state: FixedState::new(range, undefined),
            bounds: BoundedRange::unbounded(),
            adjuster,
            validation: true,
        }
    }

    /// Underlying condition state.
    pub fn state(&self) -> &FixedState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut FixedState {
        &mut self.state
    }

    /// Current range.
    pub fn range(&self) -> TimeRange {
        self.state.range()
    }

    /// Currently committed constraint ranges.
    pub fn bounds(&self) -> &BoundedRange {
        &self.bounds
    }

    /// Resolution strategy in use.
    pub fn adjuster(&self) -> &RangeAdjuster {
        &self.adjuster
    }

    /// Swaps the resolution strategy. Takes effect on the next resolution.
    pub fn set_adjuster(&mut self, adjuster: RangeAdjuster) {
        self.adjuster = adjuster;
    }

    /// Moves the range to `[start, end]`.
    ///
    /// Returns `Ok(false)` if either side falls outside its constraint
    /// ranges (while validation is enabled) or the state is extinct.
    pub fn set_range(&mut self, start: i64, end: i64) -> StateResult<bool> {
        let range = TimeRange::new(start, end)?;
        Ok(self.apply(range))
    }

    /// Runs the adjuster against the given constraint ranges without committing.
    pub fn adjust(&self, bounds: &BoundedRange) -> Option<TimeRange> {
        self.adjuster
            .adjust(self.range(), bounds.start_ranges(), bounds.end_ranges())
    }

    /// Replaces the constraint ranges, resolving the range against them.
    ///
    /// On failure both the constraint ranges and the range stay as they were.
    pub fn set_validation_range(&mut self, bounds: BoundedRange) -> Resolution {
        let Some(resolved) = self.adjust(&bounds) else {
            return Resolution::Failed;
        };
        let from = self.range();
        self.bounds = bounds;

        // The adjuster output is authoritative; skip the per-point check.
        self.set_validation(false);
        let applied = self.apply(resolved);
        self.set_validation(true);

        if applied && resolved != from {
            Resolution::Moved { from }
        } else {
            Resolution::Unchanged
        }
    }

    /// Replaces the constraint ranges and moves back to `range`.
    ///
    /// Falls back to [`set_validation_range`](Self::set_validation_range)
    /// when the new ranges do not admit `range`.
    pub fn restore(&mut self, bounds: BoundedRange, range: TimeRange) -> Resolution {
        if !bounds.admits(range) {
            return self.set_validation_range(bounds);
        }
        let from = self.range();
        self.bounds = bounds;
        if self.apply(range) && range != from {
            Resolution::Moved { from }
        } else {
            Resolution::Unchanged
        }
    }

    pub(crate) fn set_validation(&mut self, enabled: bool) {
        self.validation = enabled;
    }

    fn apply(&mut self, range: TimeRange) -> bool {
        if self.validation && !self.bounds.admits(range) {
            return false;
        }
        self.state.replace_range(range)
    }
}
