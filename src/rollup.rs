//! Bottom-up hierarchy rollup.
//!
//! Aggregates leaf state into every summary (parent) task:
//!
//! 1. **Leaf normalization**: each leaf's health is forced from its
//!    status and risk flag ([`TaskStatus::leaf_health`]).
//! 2. **Parent aggregation**: each parent, after all its descendants,
//!    takes from its **direct** children the date span (min start, max
//!    end), the duration-weighted progress, the worst health and the
//!    summary status ([`TaskStatus::aggregate`]).
//!
//! # Algorithm
//! Depth-first from every root. Each node's summary is a pure function of
//! its children's finalized summaries; the summaries are written into a
//! fresh collection only after the whole forest has been computed. A
//! "visiting" set turns a parent cycle into
//! [`ScheduleError::CyclicHierarchy`] instead of unbounded recursion.
//!
//! # Properties
//! - Idempotent: `rollup(rollup(x)) == rollup(x)`.
//! - Span containment: every parent starts at its earliest child start
//!   and ends at its latest child end.
//! - The input slice is never modified.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::day_count;
use crate::error::ScheduleError;
use crate::hierarchy::TaskTree;
use crate::models::{weighted_progress, Health, Task, TaskStatus};

/// Aggregated values a task contributes to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Summary {
    start: NaiveDate,
    end: NaiveDate,
    duration: i64,
    progress: u8,
    status: TaskStatus,
    health: Health,
}

impl Summary {
    fn of_leaf(task: &Task) -> Self {
        Self {
            start: task.start_date,
            end: task.end_date,
            duration: task.duration,
            progress: task.progress,
            status: task.status,
            health: task.status.leaf_health(task.health, task.is_at_risk),
        }
    }

    /// Summary of a parent from its children's summaries. `None` if empty.
    fn aggregate(children: &[Summary]) -> Option<Self> {
        let start = children.iter().map(|c| c.start).min()?;
        let end = children.iter().map(|c| c.end).max()?;

        Some(Self {
            start,
            end,
            duration: day_count(start, end),
            progress: weighted_progress(children.iter().map(|c| (c.progress, c.duration))),
            status: TaskStatus::aggregate(children.iter().map(|c| c.status)),
            health: Health::aggregate(children.iter().map(|c| c.health)),
        })
    }

    fn apply(self, task: &mut Task) {
        task.start_date = self.start;
        task.end_date = self.end;
        task.duration = self.duration;
        task.progress = self.progress;
        task.status = self.status;
        task.health = self.health;
    }
}

struct Rollup<'t, 'a> {
    tree: &'t TaskTree<'a>,
    summaries: HashMap<usize, Summary>,
    visiting: HashSet<usize>,
}

impl Rollup<'_, '_> {
    fn summarize(&mut self, pos: usize) -> Result<Summary, ScheduleError> {
        if let Some(summary) = self.summaries.get(&pos) {
            return Ok(*summary);
        }
        let tree = self.tree;
        let task = &tree.tasks()[pos];
        if !self.visiting.insert(pos) {
            return Err(ScheduleError::CyclicHierarchy {
                id: task.id.clone(),
            });
        }

        let children = tree.children(&task.id);
        let summary = if children.is_empty() {
            Summary::of_leaf(task)
        } else {
            let mut child_summaries = Vec::with_capacity(children.len());
            for &child in children {
                child_summaries.push(self.summarize(child)?);
            }
            Summary::aggregate(&child_summaries).unwrap_or_else(|| Summary::of_leaf(task))
        };

        self.visiting.remove(&pos);
        self.summaries.insert(pos, summary);
        Ok(summary)
    }
}

/// Recomputes every parent from its children and normalizes leaf health.
///
/// Returns a new collection in the same order as the input.
///
/// # Errors
/// [`ScheduleError::CyclicHierarchy`] if `parent_id` links form a cycle.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gantt_core::models::Task;
/// use gantt_core::rollup_hierarchy;
///
/// let d = |day| NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
/// let tasks = vec![
///     Task::new("P", d(1)),
///     Task::new("C1", d(1)).with_parent("P").with_duration(4).with_progress(100),
///     Task::new("C2", d(5)).with_parent("P").with_duration(6),
/// ];
/// let rolled = rollup_hierarchy(&tasks).unwrap();
/// assert_eq!(rolled[0].end_date, d(10));
/// assert_eq!(rolled[0].progress, 40);
/// ```
pub fn rollup_hierarchy(tasks: &[Task]) -> Result<Vec<Task>, ScheduleError> {
    let tree = TaskTree::build(tasks);
    let mut pass = Rollup {
        tree: &tree,
        summaries: HashMap::with_capacity(tasks.len()),
        visiting: HashSet::new(),
    };

    for &root in tree.roots() {
        pass.summarize(root)?;
    }

    if let Some(stray) = (0..tasks.len()).find(|pos| !pass.summaries.contains_key(pos)) {
        return Err(ScheduleError::CyclicHierarchy {
            id: tasks[stray].id.clone(),
        });
    }

    let mut rolled = tasks.to_vec();
    let mut parents = 0usize;
    for (pos, task) in rolled.iter_mut().enumerate() {
        if tree.is_parent(&task.id) {
            pass.summaries[&pos].apply(task);
            parents += 1;
        } else {
            task.health = pass.summaries[&pos].health;
        }
    }

    debug!(tasks = tasks.len(), parents, "hierarchy rollup complete");
    Ok(rolled)
}
