//! Integrity validation for timelines.
//!
//! Checks the structural invariants the orchestrator maintains across
//! mutations. Detects:
//! - Dangling state references
//! - Circular dependencies (DAG validation)
//! - Live states outside their committed constraint ranges
//! - Dependency sets without a constraint function
//! - Dependencies missing the dependent's subscriptions
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::dependency::{ChangeSubscriber, DestroySubscriber, Timeline};
use crate::models::{Side, StateId};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A dependency or subscriber id is not in the timeline.
    DanglingReference,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// A live state's range lies outside its committed constraint ranges.
    OutOfBounds,
    /// A non-empty dependency set has no constraint function.
    MissingConstraint,
    /// A dependency does not carry the dependent's subscription.
    MissingSubscription,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the integrity of a timeline.
///
/// Checks:
/// 1. All dependency and dependent-subscriber ids exist
/// 2. No circular dependencies
/// 3. Every live state lies within its committed constraint ranges
/// 4. Every non-empty dependency set has a constraint function
/// 5. Every dependency carries the dependent's change subscription (live
///    dependents) and destruction subscription (all dependents)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_timeline(timeline: &Timeline) -> ValidationResult {
    let mut errors = Vec::new();

    let mut nodes: Vec<_> = timeline.nodes().collect();
    nodes.sort_by_key(|(id, _)| *id);

    for (id, node) in &nodes {
        let id = *id;

        if !node.is_extinct() && !node.bound.bounds().admits(node.range()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfBounds,
                format!("State {id} range {} violates its constraint ranges", node.range()),
            ));
        }

        for subscriber in node.change_subscribers.iter() {
            if let ChangeSubscriber::Dependent { state, .. } = subscriber {
                if !timeline.contains(*state) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DanglingReference,
                        format!("State {id} notifies unknown dependent {state}"),
                    ));
                }
            }
        }

        for side in Side::BOTH {
            let point = node.point(side);
            if !point.is_empty() && point.constraint().is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingConstraint,
                    format!("State {id} has {side:?} dependencies but no constraint function"),
                ));
            }

            for &dep in point.dependencies() {
                let (Ok(changes), Ok(destroys)) = (
                    timeline.change_subscribers(dep),
                    timeline.destroy_subscribers(dep),
                ) else {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DanglingReference,
                        format!("State {id} depends on unknown state {dep} ({side:?} side)"),
                    ));
                    continue;
                };

                let change = ChangeSubscriber::Dependent { state: id, side };
                if !node.is_extinct() && !changes.contains(&change) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MissingSubscription,
                        format!("State {dep} does not notify dependent {id} ({side:?} side)"),
                    ));
                }
                if !destroys.contains(&DestroySubscriber::Dependent(id)) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MissingSubscription,
                        format!("State {dep} does not announce destruction to {id}"),
                    ));
                }
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(timeline) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency graph using DFS.
///
/// # Algorithm
/// If a back-edge is found (visiting a node currently in the recursion
/// stack), a cycle exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(timeline: &Timeline) -> Option<ValidationError> {
    // Adjacency: state → its dependencies, both sides.
    let mut adj: HashMap<StateId, Vec<StateId>> = HashMap::new();
    for (id, node) in timeline.nodes() {
        let deps = adj.entry(id).or_default();
        deps.extend_from_slice(node.start.dependencies());
        deps.extend_from_slice(node.end.dependencies());
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for id in timeline.state_ids() {
        if !visited.contains(&id) && has_cycle_dfs(id, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving state {id}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: StateId,
    adj: &HashMap<StateId, Vec<StateId>>,
    visited: &mut HashSet<StateId>,
    in_stack: &mut HashSet<StateId>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(&node) {
        for &next in neighbors {
            if in_stack.contains(&next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(&next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(&node);
    false
}
