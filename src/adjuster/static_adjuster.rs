//! Duration-preserving resolution.
//!
//! Moves the invalid side to its first available boundary and recomputes the
//! opposite side as `boundary - unit(side) * duration`. The move fails when
//! the duration is unbounded, the arithmetic overflows, the result touches a
//! sentinel, or the recomputed opposite side leaves its own constraint
//! ranges.

use super::{first_boundary, resolution_type, ResolutionType};
use crate::models::{none_match, Side, TimeRange, UNBOUNDED_END, UNBOUNDED_START};

pub(crate) fn adjust(range: TimeRange, start: &[TimeRange], end: &[TimeRange]) -> Option<TimeRange> {
    match resolution_type(range, start, end) {
        ResolutionType::Impossible | ResolutionType::Both => None,
        ResolutionType::None => Some(range),
        ResolutionType::StartOnly => shift(range, Side::Start, start, end),
        ResolutionType::EndOnly => shift(range, Side::End, end, start),
    }
}

/// Moves `side` into `ranges`, carrying the opposite side along.
pub(crate) fn shift(
    range: TimeRange,
    side: Side,
    ranges: &[TimeRange],
    opposite_ranges: &[TimeRange],
) -> Option<TimeRange> {
    let duration = range.duration()?;
    let boundary = first_boundary(side, ranges);
    let opposite = boundary.checked_sub(side.unit().checked_mul(duration)?)?;

    if [boundary, opposite]
        .iter()
        .any(|v| *v == UNBOUNDED_START || *v == UNBOUNDED_END)
    {
        return None;
    }
    if !opposite_ranges.is_empty() && none_match(opposite, opposite_ranges) {
        return None;
    }

    match side {
        Side::Start => TimeRange::new(boundary, opposite).ok(),
        Side::End => TimeRange::new(opposite, boundary).ok(),
    }
}
