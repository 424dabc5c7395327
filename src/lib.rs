//! Temporal constraint propagation for the U-Engine ecosystem.
//!
//! Models *states*: boolean conditions attached to a time range. A state's
//! range can be made dependent on other states' ranges through per-side
//! constraint functions. Every dependency mutation runs a *resolution*
//! step that either yields a new consistent range or fails and leaves the
//! state untouched. Range moves cascade to dependents.
//!
//! # Modules
//!
//! - **`models`**: Value types — `TimeRange`, `Side`, `FixedState`,
//!   `BoundedRange`, `BoundState`, `StateView`
//! - **`adjuster`**: Resolution strategies — `Static`, `Dynamic`, `Fail`
//! - **`constraint`**: Constraint functions — `Disjunction`, `ExactSide`, `NoEnd`
//! - **`dependency`**: The `Timeline` orchestrator, dependency points, observers
//! - **`config`**: `TimelineConfig` and the forced-eviction policy
//! - **`error`**: `StateError` and the `StateResult` alias
//! - **`validation`**: Whole-graph integrity checks (dangling ids, cycles, bounds)
//!
//! # Architecture
//!
//! This crate sits next to `u-schedule` at Layer 3 (Frameworks) in the
//! U-Engine ecosystem. It provides the dependency-network engine behind
//! finish-to-start style relationships, with no task or calendar vocabulary.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Dechter, Meiri & Pearl (1991), "Temporal Constraint Networks"

pub mod adjuster;
pub mod config;
pub mod constraint;
pub mod dependency;
pub mod error;
pub mod models;
pub mod validation;

pub use adjuster::RangeAdjuster;
pub use config::{EvictionPolicy, TimelineConfig};
pub use constraint::ConstraintFn;
pub use dependency::{StateKind, Timeline};
pub use error::{StateError, StateResult};
pub use models::{Side, StateId, TimeRange};
