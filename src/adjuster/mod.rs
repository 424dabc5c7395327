//! Range adjusters: resolution strategies.
//!
//! A range adjuster maps `(current range, start constraint ranges, end
//! constraint ranges)` to a replacement range, or to `None` when no
//! consistent range exists under its rules. Adjusters are pure: they never
//! touch the state they are computing for.
//!
//! # Strategies
//!
//! | Strategy | Duration | Both sides invalid |
//! |----------|----------|--------------------|
//! | [`RangeAdjuster::Static`] | preserved | fails |
//! | [`RangeAdjuster::Dynamic`] | may change | `[max starts, min ends]` |
//! | [`RangeAdjuster::Fail`] | per delegate | fails |
//!
//! Each side moves to its *first available boundary*: the lowest start
//! among the start constraint ranges, the highest end among the end
//! constraint ranges.
//!
//! # Reference
//! Dechter, Meiri & Pearl (1991), "Temporal Constraint Networks"

mod dynamic;
mod fail;
mod static_adjuster;

use serde::{Deserialize, Serialize};

use crate::models::{none_match, Side, TimeRange, UNBOUNDED_END, UNBOUNDED_START};

/// Classification of a resolution request.
///
/// Exactly one variant applies to every input: [`Impossible`] is checked
/// first, then side validity.
///
/// [`Impossible`]: ResolutionType::Impossible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionType {
    /// The latest admissible end precedes the earliest admissible start.
    Impossible,
    /// Both sides lie outside their constraint ranges.
    Both,
    /// Only the start side is invalid.
    StartOnly,
    /// Only the end side is invalid.
    EndOnly,
    /// The range already satisfies both sides.
    None,
}

/// Classifies a resolution request.
///
/// Empty constraint arrays are treated as unbounded.
pub fn resolution_type(range: TimeRange, start: &[TimeRange], end: &[TimeRange]) -> ResolutionType {
    let earliest_start = start
        .iter()
        .map(TimeRange::start)
        .min()
        .unwrap_or(UNBOUNDED_START);
    let latest_end = end.iter().map(TimeRange::end).max().unwrap_or(UNBOUNDED_END);
    if latest_end < earliest_start {
        return ResolutionType::Impossible;
    }

    let start_invalid = !start.is_empty() && none_match(range.start(), start);
    let end_invalid = !end.is_empty() && none_match(range.end(), end);
    match (start_invalid, end_invalid) {
        (true, true) => ResolutionType::Both,
        (true, false) => ResolutionType::StartOnly,
        (false, true) => ResolutionType::EndOnly,
        (false, false) => ResolutionType::None,
    }
}

/// First available boundary of `side` within `ranges`.
pub(crate) fn first_boundary(side: Side, ranges: &[TimeRange]) -> i64 {
    match side {
        Side::Start => ranges
            .iter()
            .map(TimeRange::start)
            .min()
            .unwrap_or(UNBOUNDED_START),
        Side::End => ranges.iter().map(TimeRange::end).max().unwrap_or(UNBOUNDED_END),
    }
}

/// Resolution strategy attached to a bound state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeAdjuster {
    /// Preserves duration; fails whenever it cannot.
    Static,
    /// Flexible, falling back to static moves past the opposite side.
    #[default]
    Dynamic,
    /// Resolves only a single invalid `side` through `delegate`.
    ///
    /// Without a side only already-consistent ranges pass.
    Fail {
        side: Option<Side>,
        delegate: Option<Box<RangeAdjuster>>,
    },
}

impl RangeAdjuster {
    /// Creates a fail adjuster delegating one side.
    pub fn fail(side: Side, delegate: RangeAdjuster) -> Self {
        Self::Fail {
            side: Some(side),
            delegate: Some(Box::new(delegate)),
        }
    }

    /// Creates a fail adjuster that rejects every move.
    pub fn fail_all() -> Self {
        Self::Fail {
            side: None,
            delegate: None,
        }
    }

    /// Computes the replacement range, `None` on failure.
    pub fn adjust(&self, range: TimeRange, start: &[TimeRange], end: &[TimeRange]) -> Option<TimeRange> {
        match self {
            Self::Static => static_adjuster::adjust(range, start, end),
            Self::Dynamic => dynamic::adjust(range, start, end),
            Self::Fail { side, delegate } => {
                fail::adjust(*side, delegate.as_deref(), range, start, end)
            }
        }
    }

    /// Strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Fail { .. } => "fail",
        }
    }
}
