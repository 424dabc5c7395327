//! Per-side dependency holder.

use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, ConstraintFn};
use crate::error::{StateError, StateResult};
use crate::models::{Side, StateId, StateView, TimeRange, UNDEF_RANGE};

/// One side of a dependent state: a constraint function and the dependency
/// set it is evaluated over.
///
/// The constraint function can be attached once. Membership is checked
/// against the function at insertion time over the prospective set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyPoint {
    side: Side,
    constraint: Option<ConstraintFn>,
    dependencies: Vec<StateId>,
}

impl DependencyPoint {
    /// Creates an empty point for `side`.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            constraint: None,
            dependencies: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Attached constraint function, if any.
    pub fn constraint(&self) -> Option<&ConstraintFn> {
        self.constraint.as_ref()
    }

    /// Dependency set in insertion order.
    pub fn dependencies(&self) -> &[StateId] {
        &self.dependencies
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.dependencies.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Attaches `constraint`. Returns `false` if one is already attached.
    pub fn set_constraint(&mut self, constraint: ConstraintFn) -> bool {
        if self.constraint.is_some() {
            return false;
        }
        self.constraint = Some(constraint);
        true
    }

    /// Adds `candidate` to the dependency set.
    ///
    /// `prospective` must hold views of the current set followed by the
    /// candidate. Returns `Ok(false)` if the candidate is already present.
    ///
    /// # Errors
    /// - [`StateError::MissingConstraint`] without a constraint function
    /// - [`StateError::UnsupportedDependency`] if the function rejects the
    ///   prospective set
    pub fn add_dependency(
        &mut self,
        owner: StateId,
        candidate: StateId,
        prospective: &[StateView],
    ) -> StateResult<bool> {
        let Some(constraint) = &self.constraint else {
            return Err(StateError::MissingConstraint {
                state: owner,
                side: self.side,
            });
        };
        if self.contains(candidate) {
            return Ok(false);
        }
        constraint
            .resolve(prospective)
            .and_then(|_| constraint.constraint_ranges(prospective))
            .map_err(|e| {
                StateError::unsupported(format!("{} rejects {candidate}: {e}", constraint.name()))
            })?;
        self.dependencies.push(candidate);
        Ok(true)
    }

    /// Removes `id` unconditionally. Returns whether it was present.
    pub fn remove_dependency(&mut self, id: StateId) -> bool {
        let before = self.dependencies.len();
        self.dependencies.retain(|d| *d != id);
        before != self.dependencies.len()
    }

    /// Constraint ranges for the side, or the universal range when the set is empty.
    ///
    /// `views` must describe the current dependency set.
    pub fn validation_ranges(&self, views: &[StateView]) -> StateResult<Vec<TimeRange>> {
        match &self.constraint {
            Some(constraint) if !self.dependencies.is_empty() => {
                let ranges = constraint.constraint_ranges(views)?;
                Ok(if ranges.is_empty() { vec![UNDEF_RANGE] } else { ranges })
            }
            _ => Ok(vec![UNDEF_RANGE]),
        }
    }

    /// Whether the constraint condition holds. Evaluation errors count as `false`.
    pub fn is_resolvable(&self, views: &[StateView]) -> bool {
        match &self.constraint {
            Some(constraint) if !self.dependencies.is_empty() => {
                constraint.resolve(views).unwrap_or(false)
            }
            _ => true,
        }
    }

    /// Detaches the constraint function and clears the set, returning the evicted ids.
    pub fn reset(&mut self) -> Vec<StateId> {
        self.constraint = None;
        std::mem::take(&mut self.dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Disjunction, ExactSide, NoEnd};
    use crate::error::ErrorKind;
    use crate::models::FixedState;

    fn view(id: u64, start: i64, end: i64) -> StateView {
        StateView::of(
            StateId(id),
            &FixedState::new(TimeRange::new(start, end).unwrap(), false),
        )
    }

    #[test]
    fn test_add_requires_constraint() {
        let mut point = DependencyPoint::new(Side::Start);
        let err = point
            .add_dependency(StateId(0), StateId(1), &[view(1, 0, 5)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingConstraint);
        assert!(point.is_empty());
    }

    #[test]
    fn test_constraint_set_once() {
        let mut point = DependencyPoint::new(Side::End);
        assert!(point.set_constraint(Disjunction.into()));
        assert!(!point.set_constraint(NoEnd.into()));
        assert_eq!(point.constraint(), Some(&ConstraintFn::Disjunction(Disjunction)));
    }

    #[test]
    fn test_add_and_duplicate() {
        let mut point = DependencyPoint::new(Side::Start);
        point.set_constraint(Disjunction.into());
        assert!(point.add_dependency(StateId(0), StateId(1), &[view(1, 0, 5)]).unwrap());
        assert!(!point.add_dependency(StateId(0), StateId(1), &[view(1, 0, 5)]).unwrap());
        assert_eq!(point.dependencies(), &[StateId(1)]);
    }

    #[test]
    fn test_rejected_candidate_is_unsupported() {
        let mut point = DependencyPoint::new(Side::Start);
        point.set_constraint(ExactSide::new(Side::End, true).into());
        point.add_dependency(StateId(0), StateId(1), &[view(1, 0, 5)]).unwrap();

        let err = point
            .add_dependency(StateId(0), StateId(2), &[view(1, 0, 5), view(2, 3, 9)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedDependency);
        assert_eq!(point.dependencies(), &[StateId(1)]);

        // Non-reversible states are rejected by the no-end function.
        let mut point = DependencyPoint::new(Side::Start);
        point.set_constraint(NoEnd.into());
        assert!(point.add_dependency(StateId(0), StateId(1), &[view(1, 0, 5)]).is_err());
    }

    #[test]
    fn test_validation_ranges_and_resolvability() {
        let mut point = DependencyPoint::new(Side::Start);
        assert_eq!(point.validation_ranges(&[]).unwrap(), vec![UNDEF_RANGE]);
        assert!(point.is_resolvable(&[]));

        point.set_constraint(ExactSide::new(Side::End, false).strict().into());
        assert_eq!(point.validation_ranges(&[]).unwrap(), vec![UNDEF_RANGE]);

        let views = [view(1, 0, 5)];
        point.add_dependency(StateId(0), StateId(1), &views).unwrap();
        assert_eq!(point.validation_ranges(&views).unwrap(), vec![TimeRange::point(5)]);
        assert!(!point.is_resolvable(&views));
    }

    #[test]
    fn test_remove_and_reset() {
        let mut point = DependencyPoint::new(Side::End);
        point.set_constraint(Disjunction.into());
        point.add_dependency(StateId(0), StateId(1), &[view(1, 0, 5)]).unwrap();
        point
            .add_dependency(StateId(0), StateId(2), &[view(1, 0, 5), view(2, 6, 9)])
            .unwrap();

        assert!(point.remove_dependency(StateId(1)));
        assert!(!point.remove_dependency(StateId(1)));
        assert_eq!(point.reset(), vec![StateId(2)]);
        assert!(point.constraint().is_none());
        assert!(point.is_empty());
    }
}
