//! Dependent state node stored in the timeline arena.

use super::observer::{ChangeSubscriber, DestroySubscriber, ObserverList};
use super::{DependencyPoint, StateKind};
use crate::models::{BoundState, Reversal, Side, StateId, StateView, TimeRange};

/// Range-bounded, constraint-derived, observable state.
///
/// `active_allowed` caches the start point's resolvability and gates
/// activation.
#[derive(Debug, Clone)]
pub(crate) struct DependencyState {
    pub(crate) kind: StateKind,
    pub(crate) bound: BoundState,
    pub(crate) start: DependencyPoint,
    pub(crate) end: DependencyPoint,
    pub(crate) active_allowed: bool,
    pub(crate) destroyed: bool,
    pub(crate) change_subscribers: ObserverList<ChangeSubscriber>,
    pub(crate) destroy_subscribers: ObserverList<DestroySubscriber>,
}

impl DependencyState {
    pub(crate) fn new(kind: StateKind, bound: BoundState) -> Self {
        Self {
            kind,
            bound,
            start: DependencyPoint::new(Side::Start),
            end: DependencyPoint::new(Side::End),
            active_allowed: true,
            destroyed: false,
            change_subscribers: ObserverList::new(),
            destroy_subscribers: ObserverList::new(),
        }
    }

    pub(crate) fn point(&self, side: Side) -> &DependencyPoint {
        match side {
            Side::Start => &self.start,
            Side::End => &self.end,
        }
    }

    pub(crate) fn point_mut(&mut self, side: Side) -> &mut DependencyPoint {
        match side {
            Side::Start => &mut self.start,
            Side::End => &mut self.end,
        }
    }

    pub(crate) fn range(&self) -> TimeRange {
        self.bound.range()
    }

    pub(crate) fn is_extinct(&self) -> bool {
        self.bound.state().is_extinct()
    }

    /// Whether `id` sits in either dependency set.
    pub(crate) fn depends_directly_on(&self, id: StateId) -> bool {
        self.start.contains(id) || self.end.contains(id)
    }

    /// Inactive remainders, for reversible kinds.
    pub(crate) fn reversal(&self) -> Option<Reversal> {
        let range = self.range();
        match self.kind {
            StateKind::Plain | StateKind::Instant => None,
            StateKind::Range => Some(Reversal::of_bounded(range)),
            StateKind::NoEnd => Some(Reversal {
                left: Some(TimeRange::until(range.start())),
                right: None,
            }),
            StateKind::NoStart => Some(Reversal {
                left: None,
                right: Some(TimeRange::from_start(range.end())),
            }),
        }
    }

    pub(crate) fn view(&self, id: StateId) -> StateView {
        let view = StateView::of(id, self.bound.state());
        match self.reversal() {
            Some(reversal) => view.with_reversal(reversal),
            None => view,
        }
    }
}
