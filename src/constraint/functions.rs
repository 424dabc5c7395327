//! Built-in constraint functions.
//!
//! - **Disjunction**: the side may sit inside any dependency's range.
//! - **ExactSide**: the side is pinned to one side of the dependencies.
//! - **NoEnd**: the side starts once every dependency has ended.

use serde::{Deserialize, Serialize};

use super::Constraint;
use crate::error::{StateError, StateResult};
use crate::models::{Side, StateView, TimeRange, UNBOUNDED_END, UNBOUNDED_START, UNDEF_RANGE};

// ======================== Disjunction ========================

/// Union of the dependencies' ranges. The condition always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disjunction;

impl Constraint for Disjunction {
    fn name(&self) -> &'static str {
        "disjunction"
    }

    fn resolve(&self, _states: &[StateView]) -> StateResult<bool> {
        Ok(true)
    }

    fn constraint_ranges(&self, states: &[StateView]) -> StateResult<Vec<TimeRange>> {
        Ok(states.iter().map(|s| s.range).collect())
    }
}

// ======================== Exact side ========================

/// A single zero-width range at one side of the dependency set.
///
/// Targets the lowest start (`Start`) or the highest end (`End`) among the
/// dependencies. A sentinel value yields the unbounded range instead.
///
/// The condition is free (always true) unless [`strict`](Self::strict) is
/// set, in which case it requires the targeted dependency to be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactSide {
    side: Side,
    one_only: bool,
    free: bool,
}

impl ExactSide {
    /// Creates a free exact-side function.
    ///
    /// With `one_only` the dependency set is limited to a single state.
    pub fn new(side: Side, one_only: bool) -> Self {
        Self {
            side,
            one_only,
            free: true,
        }
    }

    /// Enables the activity predicate.
    pub fn strict(mut self) -> Self {
        self.free = false;
        self
    }

    /// Targeted side.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Whether more than one dependency is rejected.
    pub fn is_one_only(&self) -> bool {
        self.one_only
    }

    /// Whether the condition always holds.
    pub fn is_free(&self) -> bool {
        self.free
    }

    fn check_arity(&self, states: &[StateView]) -> StateResult<()> {
        if states.is_empty() {
            return Err(StateError::evaluation("exact-side needs at least one state"));
        }
        if self.one_only && states.len() > 1 {
            return Err(StateError::evaluation("exact-side supports only one state"));
        }
        Ok(())
    }

    fn target<'a>(&self, states: &'a [StateView]) -> Option<&'a StateView> {
        match self.side {
            Side::Start => states.iter().min_by_key(|s| s.range.start()),
            Side::End => states.iter().max_by_key(|s| s.range.end()),
        }
    }
}

impl Constraint for ExactSide {
    fn name(&self) -> &'static str {
        "exact-side"
    }

    fn resolve(&self, states: &[StateView]) -> StateResult<bool> {
        self.check_arity(states)?;
        if self.free {
            return Ok(true);
        }
        Ok(self.target(states).is_some_and(|s| s.active))
    }

    fn constraint_ranges(&self, states: &[StateView]) -> StateResult<Vec<TimeRange>> {
        self.check_arity(states)?;
        let Some(target) = self.target(states) else {
            return Ok(vec![UNDEF_RANGE]);
        };
        let at = target.range.side(self.side);
        let range = if at == UNBOUNDED_START || at == UNBOUNDED_END {
            UNDEF_RANGE
        } else {
            TimeRange::point(at)
        };
        Ok(vec![range])
    }
}

// ======================== No end ========================

/// Open range starting where the last dependency's right remainder starts.
///
/// Every dependency must be reversible. The condition holds once each
/// dependency is extinct (or, without a right remainder, active).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoEnd;

impl Constraint for NoEnd {
    fn name(&self) -> &'static str {
        "no-end"
    }

    fn resolve(&self, states: &[StateView]) -> StateResult<bool> {
        Ok(states.iter().all(|s| match s.reversal {
            Some(reversal) if reversal.right.is_some() => s.extinct,
            Some(_) => s.active,
            None => false,
        }))
    }

    fn constraint_ranges(&self, states: &[StateView]) -> StateResult<Vec<TimeRange>> {
        let mut latest = UNBOUNDED_START;
        for s in states {
            let reversal = s
                .reversal
                .ok_or_else(|| StateError::evaluation(format!("no-end requires reversible states, {} is not", s.id)))?;
            let start = reversal.right.map_or(s.range.start(), |r| r.start());
            latest = latest.max(start);
        }
        Ok(vec![TimeRange::from_start(latest)])
    }
}
