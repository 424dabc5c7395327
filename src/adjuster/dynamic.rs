//! Flexible resolution.
//!
//! A single invalid side moves to its first available boundary while the
//! opposite side stays put. When the boundary lies in the side's forward
//! direction *past* the opposite side, a flexible move would invert the
//! range, so the move becomes a static (duration-preserving) one.

use super::{first_boundary, resolution_type, static_adjuster, ResolutionType};
use crate::models::{none_match, Side, TimeRange};

pub(crate) fn adjust(range: TimeRange, start: &[TimeRange], end: &[TimeRange]) -> Option<TimeRange> {
    match resolution_type(range, start, end) {
        ResolutionType::Impossible => None,
        ResolutionType::None => Some(range),
        ResolutionType::StartOnly => adjust_side(range, Side::Start, start, end),
        ResolutionType::EndOnly => adjust_side(range, Side::End, end, start),
        ResolutionType::Both => {
            let latest_start = start.iter().map(TimeRange::start).max()?;
            let earliest_end = end.iter().map(TimeRange::end).min()?;
            TimeRange::new(latest_start, earliest_end).ok()
        }
    }
}

fn adjust_side(
    range: TimeRange,
    side: Side,
    ranges: &[TimeRange],
    opposite_ranges: &[TimeRange],
) -> Option<TimeRange> {
    let boundary = first_boundary(side, ranges);
    let opposite = range.side(side.opposite());

    if side.is_forward(opposite, boundary) {
        return static_adjuster::shift(range, side, ranges, opposite_ranges);
    }
    if !opposite_ranges.is_empty() && none_match(opposite, opposite_ranges) {
        return None;
    }
    match side {
        Side::Start => TimeRange::new(boundary, opposite).ok(),
        Side::End => TimeRange::new(opposite, boundary).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNDEF_RANGE;

    fn range(start: i64, end: i64) -> TimeRange {
        TimeRange::new(start, end).unwrap()
    }

    #[test]
    fn test_forward_start_within_range_is_flexible() {
        let out = adjust(range(10, 20), &[TimeRange::from_start(15)], &[UNDEF_RANGE]);
        assert_eq!(out, Some(range(15, 20)));
    }

    #[test]
    fn test_forward_start_past_end_is_static() {
        let out = adjust(range(10, 20), &[TimeRange::from_start(30)], &[UNDEF_RANGE]);
        assert_eq!(out, Some(range(30, 40)));
    }

    #[test]
    fn test_backward_start_is_flexible() {
        let out = adjust(range(10, 20), &[range(2, 4)], &[UNDEF_RANGE]);
        assert_eq!(out, Some(range(2, 20)));
    }

    #[test]
    fn test_end_side_is_symmetric() {
        // Forward for the end side is toward lower values.
        assert_eq!(
            adjust(range(10, 20), &[UNDEF_RANGE], &[TimeRange::until(15)]),
            Some(range(10, 15))
        );
        assert_eq!(
            adjust(range(10, 20), &[UNDEF_RANGE], &[TimeRange::until(5)]),
            Some(range(-5, 5))
        );
        assert_eq!(
            adjust(range(10, 20), &[UNDEF_RANGE], &[range(30, 40)]),
            Some(range(10, 40))
        );
    }

    #[test]
    fn test_both_takes_latest_start_and_earliest_end() {
        let start = [range(12, 14), range(16, 17)];
        let end = [range(25, 30), range(22, 23)];
        assert_eq!(adjust(range(10, 20), &start, &end), Some(range(16, 23)));
    }

    #[test]
    fn test_both_inverted_pair_fails() {
        // max start 18 > min end 16 without being impossible overall.
        let start = [range(12, 14), range(18, 19)];
        let end = [range(16, 16), range(30, 40)];
        assert_eq!(adjust(range(0, 5), &start, &end), None);
    }

    #[test]
    fn test_static_fallback_can_fail() {
        // Jump past the end, but the carried end overshoots its window.
        let out = adjust(range(10, 20), &[TimeRange::from_start(30)], &[range(0, 35)]);
        assert_eq!(out, None);
    }
}
