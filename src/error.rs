//! Error types for the constraint engine.
//!
//! Mutating operations return [`StateResult<bool>`]: `Ok(false)` is an
//! ordinary refusal (state left untouched), `Err(_)` is an exceptional
//! condition the caller is expected to branch on.

use thiserror::Error;

use crate::models::{Side, StateId};

/// Result type alias for engine operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors raised by ranges, constraint functions and the dependency orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A range was built with `end < start`.
    #[error("invalid range: end {end} precedes start {start}")]
    InvalidRange { start: i64, end: i64 },

    /// The candidate dependency (transitively) depends on the target, or is the target.
    #[error("loop dependency: {dependency} already depends on {state}")]
    LoopDependency { state: StateId, dependency: StateId },

    /// The side's constraint function (or the state kind) rejects the candidate.
    #[error("unsupported dependency: {reason}")]
    UnsupportedDependency { reason: String },

    /// A resolution step required by the mutation produced no consistent range.
    #[error("state {state} cannot be adjusted to its {side:?} constraint ranges")]
    NotAdjustable { state: StateId, side: Side },

    /// A constraint function could not compute ranges for the dependency set.
    #[error("constraint evaluation failed: {reason}")]
    ConstraintEvaluation { reason: String },

    /// A dependency was added to a side that has no constraint function.
    #[error("no constraint function attached to the {side:?} side of {state}")]
    MissingConstraint { state: StateId, side: Side },

    /// The id does not belong to this timeline.
    #[error("unknown state: {0}")]
    UnknownState(StateId),
}

/// Fieldless classification of [`StateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRange,
    LoopDependency,
    UnsupportedDependency,
    NotAdjustable,
    ConstraintEvaluation,
    MissingConstraint,
    UnknownState,
}

impl StateError {
    /// Creates an unsupported-dependency error.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedDependency {
            reason: reason.into(),
        }
    }

    /// Creates a constraint-evaluation error.
    pub fn evaluation(reason: impl Into<String>) -> Self {
        Self::ConstraintEvaluation {
            reason: reason.into(),
        }
    }

    /// Kind of this error, for callers that only branch on the category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRange { .. } => ErrorKind::InvalidRange,
            Self::LoopDependency { .. } => ErrorKind::LoopDependency,
            Self::UnsupportedDependency { .. } => ErrorKind::UnsupportedDependency,
            Self::NotAdjustable { .. } => ErrorKind::NotAdjustable,
            Self::ConstraintEvaluation { .. } => ErrorKind::ConstraintEvaluation,
            Self::MissingConstraint { .. } => ErrorKind::MissingConstraint,
            Self::UnknownState(_) => ErrorKind::UnknownState,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            StateError::InvalidRange { start: 5, end: 1 }.kind(),
            ErrorKind::InvalidRange
        );
        assert_eq!(
            StateError::unsupported("no").kind(),
            ErrorKind::UnsupportedDependency
        );
        assert_eq!(
            StateError::evaluation("bad").kind(),
            ErrorKind::ConstraintEvaluation
        );
        assert_eq!(
            StateError::UnknownState(StateId(7)).kind(),
            ErrorKind::UnknownState
        );
    }

    #[test]
    fn test_error_messages() {
        let e = StateError::InvalidRange { start: 10, end: 3 };
        assert!(e.to_string().contains("end 3 precedes start 10"));

        let e = StateError::LoopDependency {
            state: StateId(1),
            dependency: StateId(2),
        };
        assert_eq!(e.to_string(), "loop dependency: #2 already depends on #1");

        let e = StateError::NotAdjustable {
            state: StateId(4),
            side: Side::End,
        };
        assert!(e.to_string().contains("#4"));
        assert!(e.to_string().contains("End"));
    }
}
