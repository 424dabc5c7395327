//! Constraint functions.
//!
//! A constraint function turns a side's dependency set into the constraint
//! ranges the side must lie within, and into a validity predicate (the
//! *constraint condition*) gating the dependent's activation.
//!
//! # Usage
//!
//! ```
//! use u_timeline::constraint::{Constraint, ConstraintFn, ExactSide};
//! use u_timeline::models::{FixedState, Side, StateId, StateView, TimeRange};
//!
//! let upstream = FixedState::new(TimeRange::new(10, 20).unwrap(), false);
//! let views = [StateView::of(StateId(0), &upstream)];
//!
//! // Finish-to-start: start exactly where the upstream state ends.
//! let f = ConstraintFn::from(ExactSide::new(Side::End, true));
//! assert_eq!(f.constraint_ranges(&views).unwrap(), vec![TimeRange::point(20)]);
//! ```

mod functions;

pub use functions::{Disjunction, ExactSide, NoEnd};

use serde::{Deserialize, Serialize};

use crate::error::StateResult;
use crate::models::{StateView, TimeRange};

/// Per-side constraint logic over a dependency set.
///
/// # Errors
/// Both methods return [`StateError::ConstraintEvaluation`] when the
/// dependency set is not supported by the function.
///
/// [`StateError::ConstraintEvaluation`]: crate::error::StateError::ConstraintEvaluation
pub trait Constraint {
    /// Function name (e.g., "disjunction").
    fn name(&self) -> &'static str;

    /// Whether the constraint condition holds for `states`.
    fn resolve(&self, states: &[StateView]) -> StateResult<bool>;

    /// Ranges the dependent side must lie within.
    fn constraint_ranges(&self, states: &[StateView]) -> StateResult<Vec<TimeRange>>;
}

/// Closed set of constraint functions a dependency point can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintFn {
    Disjunction(Disjunction),
    ExactSide(ExactSide),
    NoEnd(NoEnd),
}

impl ConstraintFn {
    fn inner(&self) -> &dyn Constraint {
        match self {
            Self::Disjunction(f) => f,
            Self::ExactSide(f) => f,
            Self::NoEnd(f) => f,
        }
    }
}

impl Constraint for ConstraintFn {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn resolve(&self, states: &[StateView]) -> StateResult<bool> {
        self.inner().resolve(states)
    }

    fn constraint_ranges(&self, states: &[StateView]) -> StateResult<Vec<TimeRange>> {
        self.inner().constraint_ranges(states)
    }
}

impl From<Disjunction> for ConstraintFn {
    fn from(f: Disjunction) -> Self {
        Self::Disjunction(f)
    }
}

impl From<ExactSide> for ConstraintFn {
    fn from(f: ExactSide) -> Self {
        Self::ExactSide(f)
    }
}

impl From<NoEnd> for ConstraintFn {
    fn from(f: NoEnd) -> Self {
        Self::NoEnd(f)
    }
}
