//! Dependency orchestrator.
//!
//! # Lifecycle
//!
//! A live state accepts dependency mutations; each mutation re-derives the
//! side's constraint ranges and runs a resolution. A failed resolution
//! leaves the state exactly as it was. Once extinct, a state ignores
//! dependency changes and drops dependencies without resolving.
//!
//! # Propagation
//!
//! When a range moves, every change subscriber is visited in registration
//! order over a snapshot of the list. Dependent states re-resolve against
//! their live constraint ranges; a dependent that fails evicts dependencies
//! per the configured [`EvictionPolicy`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::node::DependencyState;
use super::observer::{ChangeSubscriber, DestroySubscriber, ObserverList};
use super::{DestroyObserver, ObserverId, StateKind, StateObserver, StateSnapshot};
use crate::adjuster::RangeAdjuster;
use crate::config::{EvictionPolicy, TimelineConfig};
use crate::constraint::{Constraint, ConstraintFn};
use crate::error::{StateError, StateResult};
use crate::models::{
    BoundState, BoundedRange, Resolution, Reversal, Side, StateId, StateView, TimeRange,
    UNBOUNDED_END, UNBOUNDED_START, UNDEF_RANGE,
};

/// Arena of dependent states and the observers attached to them.
#[derive(Debug, Default)]
pub struct Timeline {
    config: TimelineConfig,
    nodes: HashMap<StateId, DependencyState>,
    next_state: u64,
    next_observer: u64,
    state_observers: HashMap<ObserverId, Arc<dyn StateObserver>>,
    destroy_observers: HashMap<ObserverId, Arc<dyn DestroyObserver>>,
    last_added: Option<AddedDependency>,
}

/// The most recent committed dependency addition and the range it replaced.
///
/// Cleared by every other mutation, so only an immediate removal of the
/// same dependency can restore the range.
#[derive(Debug, Clone, Copy)]
struct AddedDependency {
    state: StateId,
    side: Side,
    dependency: StateId,
    range: TimeRange,
}

/// Why `kind` cannot depend on `side`, if it cannot.
fn side_gate(kind: StateKind, side: Side, undefined: bool) -> Option<&'static str> {
    match (kind, side) {
        (StateKind::NoEnd, Side::End) => Some("no-end states have no dependable end side"),
        (StateKind::Instant, Side::End) => Some("instant states have no dependable end side"),
        (StateKind::NoStart | StateKind::Instant, Side::Start) if !undefined => {
            Some("start dependencies require an undefined state")
        }
        _ => None,
    }
}

impl Timeline {
    /// Creates an empty timeline with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty timeline with `config`.
    pub fn with_config(config: TimelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Number of states, destroyed ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All state ids, ascending.
    pub fn state_ids(&self) -> Vec<StateId> {
        let mut ids: Vec<StateId> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    // ================================
    // Construction
    // ================================

    fn insert(&mut self, kind: StateKind, bound: BoundState) -> StateId {
        let id = StateId(self.next_state);
        self.next_state += 1;
        trace!(state = %id, ?kind, range = %bound.range(), "Inserted state");
        self.nodes.insert(id, DependencyState::new(kind, bound));
        id
    }

    /// Inserts a plain state.
    pub fn insert_state(
        &mut self,
        range: TimeRange,
        undefined: bool,
        adjuster: RangeAdjuster,
    ) -> StateId {
        self.insert(StateKind::Plain, BoundState::new(range, undefined, adjuster))
    }

    /// Inserts a reversible bounded state `[start, end]`.
    pub fn insert_range_state(
        &mut self,
        start: i64,
        end: i64,
        undefined: bool,
        adjuster: RangeAdjuster,
    ) -> StateResult<StateId> {
        let range = TimeRange::new(start, end)?;
        Ok(self.insert(StateKind::Range, BoundState::new(range, undefined, adjuster)))
    }

    /// Inserts a state open toward the future: `[start, +inf]`.
    pub fn insert_no_end(&mut self, start: i64, undefined: bool) -> StateId {
        let bound = BoundState::new(TimeRange::from_start(start), undefined, RangeAdjuster::Dynamic);
        self.insert(StateKind::NoEnd, bound)
    }

    /// Inserts a state open toward the past: `[-inf, end]`.
    pub fn insert_no_start(&mut self, end: i64, undefined: bool) -> StateId {
        let adjuster = RangeAdjuster::fail(Side::End, RangeAdjuster::Dynamic);
        self.insert(StateKind::NoStart, BoundState::new(TimeRange::until(end), undefined, adjuster))
    }

    /// Inserts an undefined state spanning the whole coordinate space.
    pub fn insert_instant(&mut self) -> StateId {
        self.insert(
            StateKind::Instant,
            BoundState::new(UNDEF_RANGE, true, RangeAdjuster::fail_all()),
        )
    }

    // ================================
    // Queries
    // ================================

    fn node(&self, id: StateId) -> StateResult<&DependencyState> {
        self.nodes.get(&id).ok_or(StateError::UnknownState(id))
    }

    fn node_mut(&mut self, id: StateId) -> StateResult<&mut DependencyState> {
        self.nodes.get_mut(&id).ok_or(StateError::UnknownState(id))
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = (StateId, &DependencyState)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Unchecked node access for corrupting fixtures in integrity tests.
    #[cfg(test)]
    pub(crate) fn raw_node_mut(&mut self, id: StateId) -> Option<&mut DependencyState> {
        self.nodes.get_mut(&id)
    }

    pub fn range(&self, id: StateId) -> StateResult<TimeRange> {
        Ok(self.node(id)?.range())
    }

    pub fn activity(&self, id: StateId) -> StateResult<bool> {
        Ok(self.node(id)?.bound.state().is_active())
    }

    pub fn is_extinct(&self, id: StateId) -> StateResult<bool> {
        Ok(self.node(id)?.is_extinct())
    }

    pub fn is_undefined(&self, id: StateId) -> StateResult<bool> {
        Ok(self.node(id)?.bound.state().is_undefined())
    }

    pub fn is_destroyed(&self, id: StateId) -> StateResult<bool> {
        Ok(self.node(id)?.destroyed)
    }

    /// Whether the start side's constraint condition currently permits activation.
    pub fn is_active_allowed(&self, id: StateId) -> StateResult<bool> {
        Ok(self.node(id)?.active_allowed)
    }

    pub fn kind(&self, id: StateId) -> StateResult<StateKind> {
        Ok(self.node(id)?.kind)
    }

    pub fn adjuster(&self, id: StateId) -> StateResult<&RangeAdjuster> {
        Ok(self.node(id)?.bound.adjuster())
    }

    /// Constraint ranges derived now from both dependency points.
    pub fn bounded_range(&self, id: StateId) -> StateResult<BoundedRange> {
        self.live_bounds(id)
    }

    /// Constraint ranges committed by the last successful resolution.
    pub fn committed_bounds(&self, id: StateId) -> StateResult<&BoundedRange> {
        Ok(self.node(id)?.bound.bounds())
    }

    pub fn constraint(&self, id: StateId, side: Side) -> StateResult<Option<&ConstraintFn>> {
        Ok(self.node(id)?.point(side).constraint())
    }

    pub fn start_constraint(&self, id: StateId) -> StateResult<Option<&ConstraintFn>> {
        self.constraint(id, Side::Start)
    }

    pub fn end_constraint(&self, id: StateId) -> StateResult<Option<&ConstraintFn>> {
        self.constraint(id, Side::End)
    }

    /// Dependency set of `side`, in insertion order.
    pub fn dependencies(&self, id: StateId, side: Side) -> StateResult<&[StateId]> {
        Ok(self.node(id)?.point(side).dependencies())
    }

    pub fn start_dependencies(&self, id: StateId) -> StateResult<&[StateId]> {
        self.dependencies(id, Side::Start)
    }

    pub fn end_dependencies(&self, id: StateId) -> StateResult<&[StateId]> {
        self.dependencies(id, Side::End)
    }

    /// Inactive remainders; `None` for non-reversible kinds.
    pub fn reversal(&self, id: StateId) -> StateResult<Option<Reversal>> {
        Ok(self.node(id)?.reversal())
    }

    /// Constraint-function view of a state.
    pub fn view(&self, id: StateId) -> StateResult<StateView> {
        Ok(self.node(id)?.view(id))
    }

    pub fn change_subscribers(&self, id: StateId) -> StateResult<&ObserverList<ChangeSubscriber>> {
        Ok(&self.node(id)?.change_subscribers)
    }

    pub fn destroy_subscribers(&self, id: StateId) -> StateResult<&ObserverList<DestroySubscriber>> {
        Ok(&self.node(id)?.destroy_subscribers)
    }

    pub fn snapshot(&self, id: StateId) -> StateResult<StateSnapshot> {
        let node = self.node(id)?;
        let state = node.bound.state();
        Ok(StateSnapshot {
            id,
            kind: node.kind,
            range: state.range(),
            active: state.is_active(),
            extinct: state.is_extinct(),
            undefined: state.is_undefined(),
            active_allowed: node.active_allowed,
            destroyed: node.destroyed,
            adjuster: node.bound.adjuster().clone(),
            start_constraint: node.start.constraint().cloned(),
            end_constraint: node.end.constraint().cloned(),
            start_dependencies: node.start.dependencies().to_vec(),
            end_dependencies: node.end.dependencies().to_vec(),
            bounds: node.bound.bounds().clone(),
        })
    }

    /// Whether `target` is reachable from `from` through dependency sets.
    pub fn depends_on(&self, from: StateId, target: StateId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                stack.extend_from_slice(node.start.dependencies());
                stack.extend_from_slice(node.end.dependencies());
            }
        }
        false
    }

    // ================================
    // Range and activity
    // ================================

    /// Moves a state's range by hand.
    ///
    /// Returns `Ok(false)` if the range violates the committed constraint
    /// ranges or the state's shape, or if the state is extinct.
    pub fn set_range(&mut self, id: StateId, start: i64, end: i64) -> StateResult<bool> {
        self.last_added = None;
        let notify_unchanged = self.config.notify_unchanged_ranges;
        let node = self.node_mut(id)?;
        let shape_ok = match node.kind {
            StateKind::NoEnd => end == UNBOUNDED_END,
            StateKind::NoStart => start == UNBOUNDED_START,
            _ => true,
        };
        if !shape_ok {
            return Ok(false);
        }

        let from = node.range();
        if !node.bound.set_range(start, end)? {
            return Ok(false);
        }
        let to = node.range();
        trace!(state = %id, %from, %to, "Range set");
        if to != from || notify_unchanged {
            self.notify_range_changed(id, to);
        }
        Ok(true)
    }

    /// Moves the start of a no-end state.
    pub fn set_no_end_start(&mut self, id: StateId, start: i64) -> StateResult<bool> {
        if self.kind(id)? != StateKind::NoEnd {
            return Ok(false);
        }
        self.set_range(id, start, UNBOUNDED_END)
    }

    /// Moves the end of a no-start state.
    pub fn set_no_start_end(&mut self, id: StateId, end: i64) -> StateResult<bool> {
        if self.kind(id)? != StateKind::NoStart {
            return Ok(false);
        }
        self.set_range(id, UNBOUNDED_START, end)
    }

    /// Assigns the activity value.
    ///
    /// Activation requires the start side's constraint condition to hold and
    /// the state not to be extinct. A successful deactivation stops the
    /// state from listening to its dependencies' changes.
    pub fn set_activity(&mut self, id: StateId, value: bool) -> StateResult<bool> {
        self.last_added = None;
        let node = self.node_mut(id)?;
        if value && !node.active_allowed {
            return Ok(false);
        }
        if !value && node.kind == StateKind::NoEnd && node.bound.state().is_active() {
            return Ok(false);
        }
        if !node.bound.state_mut().set_value(value) {
            return Ok(false);
        }

        if !value {
            let mut listened = Vec::new();
            for side in Side::BOTH {
                for dependency in node.point(side).dependencies() {
                    listened.push((side, *dependency));
                }
            }
            for (side, dependency) in listened {
                if let Some(dep) = self.nodes.get_mut(&dependency) {
                    dep.change_subscribers
                        .remove(&ChangeSubscriber::Dependent { state: id, side });
                }
            }
        }

        trace!(state = %id, active = value, "Activity set");
        self.notify_state_changed(id, value);
        Ok(true)
    }

    /// Swaps the resolution strategy. The range is not re-resolved.
    pub fn set_adjuster(&mut self, id: StateId, adjuster: RangeAdjuster) -> StateResult<()> {
        self.last_added = None;
        self.node_mut(id)?.bound.set_adjuster(adjuster);
        Ok(())
    }

    // ================================
    // Constraint functions and dependency sets
    // ================================

    /// Attaches a constraint function to `side`.
    ///
    /// Returns `Ok(false)` if one is already attached or the state kind
    /// cannot depend on that side.
    pub fn set_constraint(
        &mut self,
        id: StateId,
        side: Side,
        constraint: ConstraintFn,
    ) -> StateResult<bool> {
        self.last_added = None;
        let node = self.node_mut(id)?;
        if side_gate(node.kind, side, node.bound.state().is_undefined()).is_some() {
            return Ok(false);
        }
        let name = constraint.name();
        let attached = node.point_mut(side).set_constraint(constraint);
        if attached {
            debug!(state = %id, ?side, constraint = name, "Attached constraint");
        }
        Ok(attached)
    }

    pub fn set_start_constraint(&mut self, id: StateId, constraint: ConstraintFn) -> StateResult<bool> {
        self.set_constraint(id, Side::Start, constraint)
    }

    pub fn set_end_constraint(&mut self, id: StateId, constraint: ConstraintFn) -> StateResult<bool> {
        self.set_constraint(id, Side::End, constraint)
    }

    /// Adds `dependency` to the `side` dependency set of `id`.
    ///
    /// Returns `Ok(false)` if `id` is extinct or already holds the dependency.
    ///
    /// # Errors
    /// - [`StateError::LoopDependency`] if `dependency` is `id` or depends on it
    /// - [`StateError::MissingConstraint`] without a constraint function on `side`
    /// - [`StateError::UnsupportedDependency`] if the kind, the constraint
    ///   function or the dependency's destruction rules it out
    /// - [`StateError::NotAdjustable`] if no consistent range exists with it
    pub fn add_dependency(
        &mut self,
        id: StateId,
        side: Side,
        dependency: StateId,
    ) -> StateResult<bool> {
        self.last_added = None;
        let target = self.node(id)?;
        let candidate = self.node(dependency)?;
        if let Some(reason) = side_gate(target.kind, side, target.bound.state().is_undefined()) {
            return Err(StateError::unsupported(reason));
        }
        if candidate.destroyed {
            return Err(StateError::unsupported(format!("{dependency} is destroyed")));
        }
        if target.is_extinct() {
            return Ok(false);
        }
        if self.depends_on(dependency, id) {
            return Err(StateError::LoopDependency {
                state: id,
                dependency,
            });
        }

        let before = target.range();
        let mut prospective = target.point(side).dependencies().to_vec();
        prospective.push(dependency);
        let views = self.views(&prospective)?;
        if !self
            .node_mut(id)?
            .point_mut(side)
            .add_dependency(id, dependency, &views)?
        {
            return Ok(false);
        }

        let resolved = match self.live_bounds(id) {
            Ok(bounds) => self.resolve(id, bounds)?,
            Err(e) => {
                self.node_mut(id)?.point_mut(side).remove_dependency(dependency);
                return Err(e);
            }
        };
        if !resolved {
            self.node_mut(id)?.point_mut(side).remove_dependency(dependency);
            debug!(state = %id, ?side, dependency = %dependency, "Rejected dependency: not adjustable");
            return Err(StateError::NotAdjustable { state: id, side });
        }

        let dep = self.node_mut(dependency)?;
        dep.change_subscribers
            .add(ChangeSubscriber::Dependent { state: id, side });
        dep.destroy_subscribers.add(DestroySubscriber::Dependent(id));
        self.refresh_active_allowed(id);
        self.last_added = Some(AddedDependency {
            state: id,
            side,
            dependency,
            range: before,
        });
        debug!(state = %id, ?side, dependency = %dependency, "Added dependency");
        Ok(true)
    }

    pub fn add_start_dependency(&mut self, id: StateId, dependency: StateId) -> StateResult<bool> {
        self.add_dependency(id, Side::Start, dependency)
    }

    pub fn add_end_dependency(&mut self, id: StateId, dependency: StateId) -> StateResult<bool> {
        self.add_dependency(id, Side::End, dependency)
    }

    /// Removes `dependency` from the `side` dependency set of `id`.
    ///
    /// The removal is tried speculatively first; it is committed only if the
    /// state resolves against the reduced constraint set. Removing the
    /// dependency added by the immediately preceding mutation moves the state
    /// back to its pre-add range. Extinct states drop the dependency without
    /// resolving.
    ///
    /// # Errors
    /// - [`StateError::NotAdjustable`] if the reduced set cannot be resolved
    /// - [`StateError::ConstraintEvaluation`] if the reduced set cannot be evaluated
    pub fn remove_dependency(
        &mut self,
        id: StateId,
        side: Side,
        dependency: StateId,
    ) -> StateResult<bool> {
        let restore = self
            .last_added
            .take()
            .filter(|added| {
                added.state == id && added.side == side && added.dependency == dependency
            })
            .map(|added| added.range);

        let node = self.node(id)?;
        if node.is_extinct() {
            let removed = self.node_mut(id)?.point_mut(side).remove_dependency(dependency);
            if removed {
                self.detach(id, side, dependency);
            }
            return Ok(removed);
        }

        let point = node.point(side);
        if !point.contains(dependency) {
            return Ok(false);
        }
        let remaining: Vec<StateId> = point
            .dependencies()
            .iter()
            .copied()
            .filter(|d| *d != dependency)
            .collect();
        let ranges = match point.constraint() {
            Some(constraint) if !remaining.is_empty() => {
                constraint.constraint_ranges(&self.views(&remaining)?)?
            }
            _ => vec![UNDEF_RANGE],
        };
        let candidate = self.live_bounds(id)?.with_side(side, ranges);

        if !self.resolve_to(id, candidate, restore)? {
            debug!(state = %id, ?side, dependency = %dependency, "Rejected removal: not adjustable");
            return Err(StateError::NotAdjustable { state: id, side });
        }
        self.node_mut(id)?.point_mut(side).remove_dependency(dependency);
        self.detach(id, side, dependency);
        self.refresh_active_allowed(id);
        debug!(state = %id, ?side, dependency = %dependency, "Removed dependency");
        Ok(true)
    }

    pub fn remove_start_dependency(&mut self, id: StateId, dependency: StateId) -> StateResult<bool> {
        self.remove_dependency(id, Side::Start, dependency)
    }

    pub fn remove_end_dependency(&mut self, id: StateId, dependency: StateId) -> StateResult<bool> {
        self.remove_dependency(id, Side::End, dependency)
    }

    // ================================
    // Observers and destruction
    // ================================

    /// Registers an external activity/range observer on `id`.
    pub fn add_change_observer(
        &mut self,
        id: StateId,
        observer: Arc<dyn StateObserver>,
    ) -> StateResult<ObserverId> {
        self.node(id)?;
        let handle = self.next_observer_id();
        self.node_mut(id)?
            .change_subscribers
            .add(ChangeSubscriber::External(handle));
        self.state_observers.insert(handle, observer);
        Ok(handle)
    }

    /// Unregisters an observer added with [`add_change_observer`](Self::add_change_observer).
    pub fn remove_change_observer(&mut self, id: StateId, handle: ObserverId) -> StateResult<bool> {
        let removed = self
            .node_mut(id)?
            .change_subscribers
            .remove(&ChangeSubscriber::External(handle));
        if removed {
            self.state_observers.remove(&handle);
        }
        Ok(removed)
    }

    /// Registers an external destruction observer on `id`.
    pub fn add_destroy_observer(
        &mut self,
        id: StateId,
        observer: Arc<dyn DestroyObserver>,
    ) -> StateResult<ObserverId> {
        self.node(id)?;
        let handle = self.next_observer_id();
        self.node_mut(id)?
            .destroy_subscribers
            .add(DestroySubscriber::External(handle));
        self.destroy_observers.insert(handle, observer);
        Ok(handle)
    }

    pub fn remove_destroy_observer(&mut self, id: StateId, handle: ObserverId) -> StateResult<bool> {
        let removed = self
            .node_mut(id)?
            .destroy_subscribers
            .remove(&DestroySubscriber::External(handle));
        if removed {
            self.destroy_observers.remove(&handle);
        }
        Ok(removed)
    }

    /// Announces that `id` leaves the timeline.
    ///
    /// Dependents evict it; external destruction observers are called. The
    /// state keeps its own dependency sets. Returns `Ok(false)` if it was
    /// already destroyed.
    pub fn destroy(&mut self, id: StateId) -> StateResult<bool> {
        self.last_added = None;
        let node = self.node_mut(id)?;
        if node.destroyed {
            return Ok(false);
        }
        node.destroyed = true;
        let subscribers = node.destroy_subscribers.snapshot();
        debug!(state = %id, subscribers = subscribers.len(), "Destroying state");

        for subscriber in subscribers.iter() {
            match *subscriber {
                DestroySubscriber::Dependent(dependent) => {
                    for side in Side::BOTH {
                        self.force_remove(dependent, side, id);
                    }
                }
                DestroySubscriber::External(handle) => match self.destroy_observers.get(&handle) {
                    Some(observer) => observer.on_destroy(id),
                    None => warn!(state = %id, observer = handle.0, "Dangling destroy observer"),
                },
            }
        }
        Ok(true)
    }

    fn next_observer_id(&mut self) -> ObserverId {
        let handle = ObserverId(self.next_observer);
        self.next_observer += 1;
        handle
    }

    // ================================
    // Resolution and propagation
    // ================================

    fn views(&self, ids: &[StateId]) -> StateResult<Vec<StateView>> {
        ids.iter()
            .map(|d| self.node(*d).map(|node| node.view(*d)))
            .collect()
    }

    fn side_ranges(&self, id: StateId, side: Side) -> StateResult<Vec<TimeRange>> {
        let point = self.node(id)?.point(side);
        let views = self.views(point.dependencies())?;
        point.validation_ranges(&views)
    }

    fn live_bounds(&self, id: StateId) -> StateResult<BoundedRange> {
        Ok(BoundedRange::new(
            self.side_ranges(id, Side::Start)?,
            self.side_ranges(id, Side::End)?,
        ))
    }

    /// Runs the adjuster against `bounds`, notifying on success.
    fn resolve(&mut self, id: StateId, bounds: BoundedRange) -> StateResult<bool> {
        self.resolve_to(id, bounds, None)
    }

    /// Like [`resolve`](Self::resolve), but moves back to `restore` when
    /// `bounds` admit it.
    fn resolve_to(
        &mut self,
        id: StateId,
        bounds: BoundedRange,
        restore: Option<TimeRange>,
    ) -> StateResult<bool> {
        let node = self.node_mut(id)?;
        let outcome = match restore {
            Some(range) => node.bound.restore(bounds, range),
            None => node.bound.set_validation_range(bounds),
        };
        let range = node.range();
        trace!(state = %id, ?outcome, %range, "Resolution");

        match outcome {
            Resolution::Failed => return Ok(false),
            Resolution::Moved { .. } => self.notify_range_changed(id, range),
            Resolution::Unchanged if self.config.notify_unchanged_ranges => {
                self.notify_range_changed(id, range)
            }
            Resolution::Unchanged => {}
        }
        Ok(true)
    }

    /// Resolves against the live constraint ranges. Evaluation errors count as failure.
    fn resolve_live(&mut self, id: StateId) -> bool {
        match self.live_bounds(id) {
            Ok(bounds) => self.resolve(id, bounds).unwrap_or(false),
            Err(e) => {
                warn!(state = %id, error = %e, "Constraint evaluation failed during propagation");
                false
            }
        }
    }

    fn notify_range_changed(&mut self, id: StateId, range: TimeRange) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let subscribers = node.change_subscribers.snapshot();
        for subscriber in subscribers.iter() {
            match *subscriber {
                ChangeSubscriber::Dependent { state, side } => {
                    self.on_dependency_range_changed(state, side, id)
                }
                ChangeSubscriber::External(handle) => match self.state_observers.get(&handle) {
                    Some(observer) => observer.on_range_changed(id, range),
                    None => warn!(state = %id, observer = handle.0, "Dangling change observer"),
                },
            }
        }
    }

    fn notify_state_changed(&mut self, id: StateId, value: bool) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let subscribers = node.change_subscribers.snapshot();
        for subscriber in subscribers.iter() {
            match *subscriber {
                ChangeSubscriber::Dependent { state, .. } => self.refresh_active_allowed(state),
                ChangeSubscriber::External(handle) => match self.state_observers.get(&handle) {
                    Some(observer) => observer.on_state_changed(id, value),
                    None => warn!(state = %id, observer = handle.0, "Dangling change observer"),
                },
            }
        }
    }

    fn on_dependency_range_changed(&mut self, dependent: StateId, side: Side, changed: StateId) {
        let Some(node) = self.nodes.get(&dependent) else {
            warn!(state = %changed, dependent = %dependent, "Dangling dependent subscription");
            return;
        };
        if node.is_extinct() || !node.point(side).contains(changed) {
            return;
        }
        if !self.resolve_live(dependent) {
            self.force_remove(dependent, side, changed);
        }
    }

    /// Drops `dependency` from `side` of `id` without failing.
    ///
    /// Used by propagation and destruction callbacks. Scope follows the
    /// configured [`EvictionPolicy`]; the state is re-resolved afterwards.
    pub(crate) fn force_remove(&mut self, id: StateId, side: Side, dependency: StateId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if !node.point(side).contains(dependency) {
            return;
        }
        if node.is_extinct() {
            node.point_mut(side).remove_dependency(dependency);
            self.detach(id, side, dependency);
            return;
        }

        let policy = self.config.eviction;
        warn!(state = %id, ?side, dependency = %dependency, ?policy, "Forced eviction");

        if policy == EvictionPolicy::OffendingOnly {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.point_mut(side).remove_dependency(dependency);
            }
            self.detach(id, side, dependency);
            if self.resolve_live(id) {
                self.refresh_active_allowed(id);
                return;
            }
        }

        let evicted = match self.nodes.get_mut(&id) {
            Some(node) => node.point_mut(side).reset(),
            None => return,
        };
        for d in evicted {
            self.detach(id, side, d);
        }
        if !self.resolve_live(id) {
            warn!(state = %id, ?side, "State left unresolved after eviction");
        }
        self.refresh_active_allowed(id);
    }

    /// Removes the subscriptions `dependent` holds on `dependency` for `side`.
    fn detach(&mut self, dependent: StateId, side: Side, dependency: StateId) {
        let still_depends = self
            .nodes
            .get(&dependent)
            .is_some_and(|node| node.depends_directly_on(dependency));
        if let Some(dep) = self.nodes.get_mut(&dependency) {
            dep.change_subscribers.remove(&ChangeSubscriber::Dependent {
                state: dependent,
                side,
            });
            if !still_depends {
                dep.destroy_subscribers
                    .remove(&DestroySubscriber::Dependent(dependent));
            }
        }
    }

    fn refresh_active_allowed(&mut self, id: StateId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let allowed = match self.views(node.start.dependencies()) {
            Ok(views) => node.start.is_resolvable(&views),
            Err(_) => false,
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.active_allowed = allowed;
        }
    }
}
