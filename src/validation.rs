//! Input validation for task collections.
//!
//! The scheduling passes are lenient: they skip dangling references and
//! fail only on cycles they cannot walk through. This module is the strict
//! counterpart, for callers that want every structural problem reported
//! before committing a collection. Detects:
//! - Duplicate IDs
//! - Parent and predecessor references to unknown tasks
//! - Self-dependencies
//! - Inconsistent dates, durations and progress
//! - Circular parent chains and circular precedence links
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::calendar::day_count;
use crate::models::Task;

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
    /// Two tasks share the same ID.
    DuplicateId,
    /// A task names a parent that doesn't exist.
    InvalidParent,
    /// A link names a predecessor that doesn't exist.
    InvalidPredecessor,
    /// A task lists itself as predecessor.
    SelfDependency,
    /// End date before start date.
    InvalidDateRange,
    /// Stored duration disagrees with the inclusive day count.
    DurationMismatch,
    /// Progress above 100.
    ProgressOutOfRange,
    /// Parent chain loops back on itself.
    CyclicHierarchy,
    /// Precedence graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a task collection.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. Every parent and predecessor reference resolves
/// 3. No task depends on itself
/// 4. `start <= end`, `duration` equals the inclusive day count, `progress <= 100`
/// 5. Neither the parent graph nor the precedence graph has a cycle
///
/// All problems are collected; the first one does not stop the scan.
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for task in tasks {
        if !ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    for task in tasks {
        if let Some(parent) = &task.parent_id {
            if !ids.contains(parent.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidParent,
                    format!("Task '{}' references unknown parent '{}'", task.id, parent),
                ));
            }
        }

        for dep in &task.dependencies {
            if dep.predecessor_id == task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task '{}' depends on itself", task.id),
                ));
            } else if !ids.contains(dep.predecessor_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!(
                        "Task '{}' references unknown predecessor '{}'",
                        task.id, dep.predecessor_id
                    ),
                ));
            }
        }

        if task.end_date < task.start_date {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDateRange,
                format!(
                    "Task '{}' ends {} before it starts {}",
                    task.id, task.end_date, task.start_date
                ),
            ));
        } else if task.duration != day_count(task.start_date, task.end_date) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DurationMismatch,
                format!(
                    "Task '{}' has duration {} but spans {} days",
                    task.id,
                    task.duration,
                    day_count(task.start_date, task.end_date)
                ),
            ));
        }

        if task.progress > 100 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ProgressOutOfRange,
                format!("Task '{}' has progress {}", task.id, task.progress),
            ));
        }
    }

    // Parent edges point child → parent, so a cycle there is a parent loop.
    let mut parent_adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut precedence_adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for task in tasks {
        if let Some(parent) = &task.parent_id {
            parent_adj
                .entry(task.id.as_str())
                .or_default()
                .push(parent.as_str());
        }
        for dep in &task.dependencies {
            if dep.predecessor_id != task.id {
                precedence_adj
                    .entry(dep.predecessor_id.as_str())
                    .or_default()
                    .push(task.id.as_str());
            }
        }
    }

    if let Some(node) = detect_cycle(tasks, &parent_adj) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicHierarchy,
            format!("Circular parent chain detected involving task '{node}'"),
        ));
    }
    if let Some(node) = detect_cycle(tasks, &precedence_adj) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("Circular dependency detected involving task '{node}'"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Returns a node on a cycle of `adj`, if any.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists. Roots are tried in
/// collection order so the reported node is deterministic.
fn detect_cycle<'a>(tasks: &'a [Task], adj: &HashMap<&'a str, Vec<&'a str>>) -> Option<&'a str> {
    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    tasks.iter().map(|t| t.id.as_str()).find(|&node| {
        !visited.contains(node) && has_cycle_dfs(node, adj, &mut visited, &mut in_stack)
    })
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true;
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
