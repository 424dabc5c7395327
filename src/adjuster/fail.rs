//! Side-gated resolution.

use super::{resolution_type, RangeAdjuster, ResolutionType};
use crate::models::{Side, TimeRange};

/// Resolves only when exactly the configured side is invalid, via `delegate`.
pub(crate) fn adjust(
    side: Option<Side>,
    delegate: Option<&RangeAdjuster>,
    range: TimeRange,
    start: &[TimeRange],
    end: &[TimeRange],
) -> Option<TimeRange> {
    match (resolution_type(range, start, end), side) {
        (ResolutionType::None, _) => Some(range),
        (ResolutionType::StartOnly, Some(Side::Start))
        | (ResolutionType::EndOnly, Some(Side::End)) => delegate?.adjust(range, start, end),
        _ => None,
    }
}
