//! Time range primitive.
//!
//! A [`TimeRange`] is an immutable closed interval `[start, end]` over an
//! opaque `i64` coordinate. `i64::MIN` and `i64::MAX` act as the unbounded
//! sentinels for the start and end side respectively.
//!
//! # Ordering
//! Ranges order lexicographically by `(start, end)`: the end breaks ties
//! between equal starts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};

/// Sentinel for an unbounded start side.
pub const UNBOUNDED_START: i64 = i64::MIN;

/// Sentinel for an unbounded end side.
pub const UNBOUNDED_END: i64 = i64::MAX;

/// The range spanning the full coordinate space.
pub const UNDEF_RANGE: TimeRange = TimeRange {
    start: UNBOUNDED_START,
    end: UNBOUNDED_END,
};

/// A closed time interval `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct TimeRange {
    start: i64,
    end: i64,
}

#[derive(Deserialize)]
struct RawRange {
    start: i64,
    end: i64,
}

impl TryFrom<RawRange> for TimeRange {
    type Error = StateError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Creates a new range.
    ///
    /// Fails with [`StateError::InvalidRange`] if `end < start`.
    pub fn new(start: i64, end: i64) -> StateResult<Self> {
        if end < start {
            return Err(StateError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a zero-width range at `at`.
    pub const fn point(at: i64) -> Self {
        Self { start: at, end: at }
    }

    /// Range with an unbounded end: `[start, +inf]`.
    pub const fn from_start(start: i64) -> Self {
        Self {
            start,
            end: UNBOUNDED_END,
        }
    }

    /// Range with an unbounded start: `[-inf, end]`.
    pub const fn until(end: i64) -> Self {
        Self {
            start: UNBOUNDED_START,
            end,
        }
    }

    /// Start side value.
    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// End side value.
    #[inline]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Value of the given side.
    #[inline]
    pub fn side(&self, side: Side) -> i64 {
        match side {
            Side::Start => self.start,
            Side::End => self.end,
        }
    }

    /// Duration `end - start`.
    ///
    /// Returns `None` ("unbounded") when either side is a sentinel, or when
    /// the difference does not fit in the coordinate domain.
    pub fn duration(&self) -> Option<i64> {
        if self.start == UNBOUNDED_START || self.end == UNBOUNDED_END {
            return None;
        }
        self.end.checked_sub(self.start)
    }

    /// Whether either side is a sentinel.
    pub fn is_unbounded(&self) -> bool {
        self.start == UNBOUNDED_START || self.end == UNBOUNDED_END
    }

    /// Whether `at` lies within the range (inclusive on both sides).
    #[inline]
    pub fn contains(&self, at: i64) -> bool {
        at >= self.start && at <= self.end
    }

    /// Whether two ranges share at least one coordinate.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        UNDEF_RANGE
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (UNBOUNDED_START, UNBOUNDED_END) => write!(f, "[-inf, +inf]"),
            (UNBOUNDED_START, end) => write!(f, "[-inf, {end}]"),
            (start, UNBOUNDED_END) => write!(f, "[{start}, +inf]"),
            (start, end) => write!(f, "[{start}, {end}]"),
        }
    }
}

/// Whether `at` lies within any of `ranges`.
pub fn any_match(at: i64, ranges: &[TimeRange]) -> bool {
    ranges.iter().any(|r| r.contains(at))
}

/// Whether `at` lies outside every one of `ranges`.
pub fn none_match(at: i64, ranges: &[TimeRange]) -> bool {
    !any_match(at, ranges)
}

// ================================
// Side
// ================================

/// One of the two boundaries of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Start,
    End,
}

impl Side {
    /// Both sides, start first.
    pub const BOTH: [Side; 2] = [Side::Start, Side::End];

    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Start => Side::End,
            Side::End => Side::Start,
        }
    }

    /// Signed unit used in duration-preserving arithmetic (`Start = -1`, `End = +1`).
    pub fn unit(self) -> i64 {
        match self {
            Side::Start => -1,
            Side::End => 1,
        }
    }

    /// Whether `value` lies in this side's forward direction from `from`.
    ///
    /// The start side moves forward toward greater values, the end side
    /// toward lower values (both toward the opposite side).
    pub fn is_forward(self, from: i64, value: i64) -> bool {
        match self {
            Side::Start => value > from,
            Side::End => value < from,
        }
    }
}
