//! Forward dependency propagation ("delays cascade forward").
//!
//! When a leaf task's dates change, leaf successors whose start violates
//! a precedence link are pushed later, transitively, in a single pass, and
//! the hierarchy is rolled up again.
//!
//! # Rules
//! - Only **leaf** tasks act as source or target. Links whose predecessor
//!   or successor is a summary task are ignored; summary dates belong to
//!   rollup.
//! - A successor is only ever moved **later**. A start that already
//!   satisfies the link is left alone, so propagation never pulls work
//!   earlier.
//! - A moved successor keeps its duration; its end is rederived.
//!
//! # Algorithm
//! Breadth-first work queue seeded with the edited task, plus a
//! "processed in this pass" set that bounds the pass even when the
//! precedence graph is redundant or cyclic.
//!
//! Each task has its successors checked at most once per pass. A task
//! pushed again after it was processed does not cascade that second push;
//! its successors may still be violated until the next edit of that task.
//! The pass is a bounded cascade, not a fixed point.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-path planning and scheduling"
//! (forward pass)

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::error::ScheduleError;
use crate::hierarchy::TaskTree;
use crate::models::Task;
use crate::rollup::rollup_hierarchy;

/// Pushes successors of `edited_id` later in one processed-set cascade,
/// then rolls up the hierarchy.
///
/// An unknown `edited_id` propagates nothing; the result is still rolled up.
///
/// # Errors
/// [`ScheduleError::CyclicHierarchy`] from the final rollup.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gantt_core::models::{Dependency, Task};
/// use gantt_core::propagate_changes;
///
/// let d = |day| NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
/// let tasks = vec![
///     Task::new("A", d(1)).with_duration(10),
///     Task::new("B", d(6)).with_duration(3).with_dependency(Dependency::finish_to_start("A")),
/// ];
/// let updated = propagate_changes(&tasks, "A").unwrap();
/// assert_eq!(updated[1].start_date, d(11));
/// assert_eq!(updated[1].end_date, d(13));
/// ```
pub fn propagate_changes(tasks: &[Task], edited_id: &str) -> Result<Vec<Task>, ScheduleError> {
    let tree = TaskTree::build(tasks);
    let links = tree.successor_links();
    let mut updated = tasks.to_vec();

    let mut queue: VecDeque<usize> = tree.position(edited_id).into_iter().collect();
    let mut processed = HashSet::new();
    let mut pushes = 0usize;

    while let Some(pos) = queue.pop_front() {
        if !processed.insert(pos) {
            continue;
        }
        let id = tasks[pos].id.as_str();
        if tree.is_parent(id) {
            continue;
        }
        let Some(successors) = links.get(id) else {
            continue;
        };

        for &(succ_pos, dep) in successors {
            if tree.is_parent(&tasks[succ_pos].id) {
                continue;
            }
            let (pred_start, pred_end) = (updated[pos].start_date, updated[pos].end_date);
            let succ = &mut updated[succ_pos];
            let earliest = dep.earliest_start(pred_start, pred_end, succ.duration);
            if succ.start_date < earliest {
                trace!(
                    predecessor = id,
                    successor = %succ.id,
                    from = %succ.start_date,
                    to = %earliest,
                    "pushing successor"
                );
                succ.set_start(earliest);
                pushes += 1;
                queue.push_back(succ_pos);
            }
        }
    }

    debug!(edited = edited_id, pushes, "dependency propagation complete");
    rollup_hierarchy(&updated)
}
