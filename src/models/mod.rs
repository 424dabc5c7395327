//! Timeline value models.
//!
//! Provides the core data types shared by the adjusters, constraint
//! functions and the orchestrator. Time is an opaque integral coordinate;
//! `i64::MIN` and `i64::MAX` are the unbounded sentinels.
//!
//! # Layers
//!
//! | Type | Role |
//! |------|------|
//! | [`TimeRange`] | closed interval, `start <= end` |
//! | [`FixedState`] | condition over a range, extinction flag |
//! | [`BoundState`] | range moves validated against a [`BoundedRange`] |
//! | [`StateView`] | read-only snapshot handed to constraint functions |

mod bound;
mod range;
mod state;

pub use bound::{BoundState, BoundedRange, Resolution};
pub use range::{
    any_match, none_match, Side, TimeRange, UNBOUNDED_END, UNBOUNDED_START, UNDEF_RANGE,
};
pub use state::{FixedState, Reversal, StateId, StateView};
