//! Property-based invariant tests for ranges and resolution strategies.
//!
//! These tests verify structural invariants that must hold for any valid inputs:
//!
//! 1. Range construction succeeds exactly when `start <= end`.
//! 2. Duration is `end - start` for bounded ranges.
//! 3. Classification is total and agrees with the constraint arrays.
//! 4. Static resolution preserves duration.
//! 5. Dynamic resolution of `Both` yields `[max starts, min ends]`.
//! 6. A consistent range is returned unchanged by every adjuster.
//! 7. Every successful resolution is itself consistent (idempotence).
//! 8. Inverted constraints are impossible for every adjuster.

use proptest::prelude::*;
use u_timeline::adjuster::{resolution_type, RangeAdjuster, ResolutionType};
use u_timeline::models::{any_match, Side, TimeRange};

// ── Helpers ─────────────────────────────────────────────────────────────

fn range_strategy() -> impl Strategy<Value = TimeRange> {
    (-1_000i64..1_000, 0i64..200).prop_map(|(start, len)| TimeRange::new(start, start + len).unwrap())
}

fn ranges_strategy() -> impl Strategy<Value = Vec<TimeRange>> {
    proptest::collection::vec(range_strategy(), 0..4)
}

fn adjuster_strategy() -> impl Strategy<Value = RangeAdjuster> {
    prop_oneof![
        Just(RangeAdjuster::Static),
        Just(RangeAdjuster::Dynamic),
        Just(RangeAdjuster::fail(Side::Start, RangeAdjuster::Dynamic)),
        Just(RangeAdjuster::fail(Side::End, RangeAdjuster::Static)),
        Just(RangeAdjuster::fail_all()),
    ]
}

fn admitted(at: i64, ranges: &[TimeRange]) -> bool {
    ranges.is_empty() || any_match(at, ranges)
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Construction and duration
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn construction_law(start in any::<i32>(), end in any::<i32>()) {
        let (start, end) = (i64::from(start), i64::from(end));
        let built = TimeRange::new(start, end);
        prop_assert_eq!(built.is_ok(), start <= end);
        if let Ok(r) = built {
            prop_assert_eq!(r.duration(), Some(end - start));
            prop_assert!(r.contains(start) && r.contains(end));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Classification
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn classification_agrees_with_constraints(
        range in range_strategy(),
        start in ranges_strategy(),
        end in ranges_strategy(),
    ) {
        let kind = resolution_type(range, &start, &end);
        let earliest_start = start.iter().map(TimeRange::start).min();
        let latest_end = end.iter().map(TimeRange::end).max();
        let impossible = matches!((earliest_start, latest_end), (Some(s), Some(e)) if e < s);

        let start_ok = admitted(range.start(), &start);
        let end_ok = admitted(range.end(), &end);
        let expected = if impossible {
            ResolutionType::Impossible
        } else {
            match (start_ok, end_ok) {
                (false, false) => ResolutionType::Both,
                (false, true) => ResolutionType::StartOnly,
                (true, false) => ResolutionType::EndOnly,
                (true, true) => ResolutionType::None,
            }
        };
        prop_assert_eq!(kind, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Static preserves duration
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn static_preserves_duration(
        range in range_strategy(),
        start in ranges_strategy(),
        end in ranges_strategy(),
    ) {
        if let Some(out) = RangeAdjuster::Static.adjust(range, &start, &end) {
            prop_assert_eq!(out.duration(), range.duration());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Dynamic `Both`
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dynamic_both_takes_extremes(
        range in range_strategy(),
        start in ranges_strategy(),
        end in ranges_strategy(),
    ) {
        if resolution_type(range, &start, &end) == ResolutionType::Both {
            let latest_start = start.iter().map(TimeRange::start).max().unwrap();
            let earliest_end = end.iter().map(TimeRange::end).min().unwrap();
            let out = RangeAdjuster::Dynamic.adjust(range, &start, &end);
            prop_assert_eq!(out, TimeRange::new(latest_start, earliest_end).ok());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6–7. Consistency and idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn consistent_range_is_kept(
        adjuster in adjuster_strategy(),
        range in range_strategy(),
        mut start in ranges_strategy(),
        mut end in ranges_strategy(),
    ) {
        start.push(TimeRange::point(range.start()));
        end.push(TimeRange::point(range.end()));
        prop_assert_eq!(resolution_type(range, &start, &end), ResolutionType::None);
        prop_assert_eq!(adjuster.adjust(range, &start, &end), Some(range));
    }

    #[test]
    fn resolution_output_is_consistent(
        adjuster in adjuster_strategy(),
        range in range_strategy(),
        start in ranges_strategy(),
        end in ranges_strategy(),
    ) {
        if let Some(out) = adjuster.adjust(range, &start, &end) {
            prop_assert_eq!(resolution_type(out, &start, &end), ResolutionType::None);
            prop_assert_eq!(adjuster.adjust(out, &start, &end), Some(out));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Inverted constraints
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn inverted_constraints_are_impossible(
        adjuster in adjuster_strategy(),
        range in range_strategy(),
        pivot in -500i64..500,
        gap in 1i64..100,
    ) {
        let start = [TimeRange::from_start(pivot + gap)];
        let end = [TimeRange::until(pivot)];
        prop_assert_eq!(resolution_type(range, &start, &end), ResolutionType::Impossible);
        prop_assert_eq!(adjuster.adjust(range, &start, &end), None);
    }
}
