//! Dependent states and the timeline orchestrator.
//!
//! A [`Timeline`] owns every state in an arena keyed by [`StateId`]. Each
//! state carries two [`DependencyPoint`]s (start and end side); adding or
//! removing a dependency re-derives the side's constraint ranges and runs
//! the state's range adjuster. A successful move notifies every dependent,
//! recursively; a dependent that can no longer resolve evicts the offending
//! dependencies (see [`EvictionPolicy`](crate::config::EvictionPolicy)).
//!
//! # Usage
//!
//! ```
//! use u_timeline::adjuster::RangeAdjuster;
//! use u_timeline::constraint::ExactSide;
//! use u_timeline::dependency::Timeline;
//! use u_timeline::models::{Side, TimeRange};
//!
//! let mut timeline = Timeline::new();
//! let design = timeline.insert_state(TimeRange::new(0, 10).unwrap(), false, RangeAdjuster::Static);
//! let build = timeline.insert_state(TimeRange::new(0, 5).unwrap(), false, RangeAdjuster::Static);
//!
//! // Finish-to-start: build starts when design ends.
//! timeline.set_start_constraint(build, ExactSide::new(Side::End, true).into()).unwrap();
//! timeline.add_start_dependency(build, design).unwrap();
//! assert_eq!(timeline.range(build).unwrap(), TimeRange::new(10, 15).unwrap());
//!
//! // Moving design drags build along.
//! timeline.set_range(design, 0, 20).unwrap();
//! assert_eq!(timeline.range(build).unwrap(), TimeRange::new(20, 25).unwrap());
//! ```
//!
//! # State kinds
//!
//! | Kind | Range | Dependable sides |
//! |------|-------|------------------|
//! | `Plain` | any | both |
//! | `Range` | bounded | both, reversible |
//! | `NoEnd` | `[start, +inf]` | start, reversible |
//! | `NoStart` | `[-inf, end]` | end (start only if undefined), reversible |
//! | `Instant` | `[-inf, +inf]` | start |

mod node;
mod observer;
mod point;
mod timeline;

pub use observer::{
    ChangeSubscriber, DestroyObserver, DestroySubscriber, ObserverId, ObserverList, StateObserver,
};
pub use point::DependencyPoint;
pub use timeline::Timeline;

use serde::{Deserialize, Serialize};

use crate::adjuster::RangeAdjuster;
use crate::constraint::ConstraintFn;
use crate::models::{BoundedRange, StateId, TimeRange};

/// Specialization of a state, fixing its range shape and dependable sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    #[default]
    Plain,
    Range,
    NoEnd,
    NoStart,
    Instant,
}

impl StateKind {
    /// Whether the kind exposes left/right inactive remainders.
    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Range | Self::NoEnd | Self::NoStart)
    }
}

/// Read-only record of one state, comparable and serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub id: StateId,
    pub kind: StateKind,
    pub range: TimeRange,
    pub active: bool,
    pub extinct: bool,
    pub undefined: bool,
    pub active_allowed: bool,
    pub destroyed: bool,
    pub adjuster: RangeAdjuster,
    pub start_constraint: Option<ConstraintFn>,
    pub end_constraint: Option<ConstraintFn>,
    pub start_dependencies: Vec<StateId>,
    pub end_dependencies: Vec<StateId>,
    /// Constraint ranges committed by the last successful resolution.
    pub bounds: BoundedRange,
}
