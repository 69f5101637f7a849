//! Critical path and total float.
//!
//! A backward pass over leaf tasks computes each leaf's latest allowable
//! finish without delaying the project end; the gap between that and the
//! scheduled end is the task's **total float**. Leaves with zero float
//! are **critical**. Summary tasks inherit from their leaf descendants.
//!
//! # Algorithm
//!
//! 1. `project_end = max(leaf.end_date)`.
//! 2. `late_finish(leaf)`:
//!    - no leaf successors → `project_end`;
//!    - otherwise the minimum over outgoing links of the latest finish
//!      the link allows ([`Dependency::latest_finish`]), never later than
//!      `project_end`. For a zero-lag Finish-to-Start link this is the
//!      successor's latest start minus one day.
//! 3. `float = max(0, late_finish - end_date)` in days;
//!    `critical = (float == 0)`.
//! 4. Parents: critical iff any leaf descendant is critical; float is the
//!    minimum leaf-descendant float (0 and not critical if there is none).
//!    Computed bottom-up once over the outline, each parent from its
//!    children's results.
//!
//! # Link Semantics
//! Step 2 deliberately differs from the plain Finish-to-Start
//! back-translation `late_start(successor) - 1`. Each link is inverted
//! according to its own type and lag, and the result is capped at
//! `project_end`. Without lag on FS links the two agree; with SS, FF or SF
//! links, or with lags, only the type-aware form keeps a driving
//! predecessor at zero float.
//!
//! Late finishes are memoized, so shared predecessors (diamonds) are
//! computed once. A "visiting" set turns a precedence cycle into
//! [`ScheduleError::CyclicDependency`].
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-path planning and scheduling"
//! (backward pass)
//!
//! [`Dependency::latest_finish`]: crate::models::Dependency::latest_finish

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::days_between;
use crate::error::ScheduleError;
use crate::hierarchy::TaskTree;
use crate::models::{Dependency, Task};

struct BackwardPass<'t, 'a> {
    tree: &'t TaskTree<'a>,
    links: HashMap<&'a str, Vec<(usize, &'a Dependency)>>,
    project_end: NaiveDate,
    late_finish: HashMap<usize, NaiveDate>,
    visiting: HashSet<usize>,
}

impl BackwardPass<'_, '_> {
    fn late_finish(&mut self, pos: usize) -> Result<NaiveDate, ScheduleError> {
        if let Some(&lf) = self.late_finish.get(&pos) {
            return Ok(lf);
        }
        let tree = self.tree;
        let task = &tree.tasks()[pos];
        if !self.visiting.insert(pos) {
            return Err(ScheduleError::CyclicDependency {
                id: task.id.clone(),
            });
        }

        let successors: Vec<(usize, &Dependency)> = self
            .links
            .get(task.id.as_str())
            .map(|s| {
                s.iter()
                    .copied()
                    .filter(|&(succ, _)| !tree.is_parent(&tree.tasks()[succ].id))
                    .collect()
            })
            .unwrap_or_default();

        let mut lf = self.project_end;
        for (succ_pos, dep) in successors {
            let succ_lf = self.late_finish(succ_pos)?;
            let succ_duration = tree.tasks()[succ_pos].duration;
            lf = lf.min(dep.latest_finish(succ_lf, succ_duration, task.duration));
        }

        self.visiting.remove(&pos);
        self.late_finish.insert(pos, lf);
        Ok(lf)
    }
}

/// Computes `total_float` and `is_critical` for every task.
///
/// Returns a new collection in the same order as the input. Only the two
/// derived fields are changed.
///
/// # Errors
/// [`ScheduleError::CyclicDependency`] if leaf precedence links form a cycle.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gantt_core::models::{Dependency, Task};
/// use gantt_core::identify_critical_path;
///
/// let d = |day| NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
/// let tasks = vec![
///     Task::new("A", d(1)).with_duration(5),
///     Task::new("B", d(6)).with_duration(5).with_dependency(Dependency::finish_to_start("A")),
///     Task::new("C", d(1)).with_duration(3),
/// ];
/// let result = identify_critical_path(&tasks).unwrap();
/// assert!(result[0].is_critical && result[1].is_critical);
/// assert_eq!(result[2].total_float, 7);
/// ```
pub fn identify_critical_path(tasks: &[Task]) -> Result<Vec<Task>, ScheduleError> {
    let tree = TaskTree::build(tasks);
    let leaves: Vec<usize> = (0..tasks.len())
        .filter(|&pos| !tree.is_parent(&tasks[pos].id))
        .collect();

    let mut result = tasks.to_vec();
    for task in &mut result {
        task.is_critical = false;
        task.total_float = 0;
    }

    let Some(project_end) = leaves.iter().map(|&pos| tasks[pos].end_date).max() else {
        return Ok(result);
    };

    let mut pass = BackwardPass {
        tree: &tree,
        links: tree.successor_links(),
        project_end,
        late_finish: HashMap::with_capacity(leaves.len()),
        visiting: HashSet::new(),
    };

    let mut floats: HashMap<usize, i64> = HashMap::with_capacity(leaves.len());
    for &pos in &leaves {
        let lf = pass.late_finish(pos)?;
        let float = days_between(tasks[pos].end_date, lf).max(0);
        floats.insert(pos, float);
        result[pos].total_float = float;
        result[pos].is_critical = float == 0;
    }

    // Reverse pre-order visits every child before its parent.
    let mut subtree: HashMap<usize, (Option<i64>, bool)> = HashMap::with_capacity(tasks.len());
    for pos in tree.outline_order().into_iter().rev() {
        let id = tasks[pos].id.as_str();
        let summary = if tree.is_parent(id) {
            tree.children(id)
                .iter()
                .filter_map(|child| subtree.get(child))
                .fold((None, false), |(min, critical), &(float, child_critical)| {
                    (min.into_iter().chain(float).min(), critical || child_critical)
                })
        } else {
            let float = floats.get(&pos).copied();
            (float, float == Some(0))
        };
        subtree.insert(pos, summary);

        if tree.is_parent(id) {
            result[pos].total_float = summary.0.unwrap_or(0);
            result[pos].is_critical = summary.1;
        }
    }

    let critical = result.iter().filter(|t| t.is_critical).count();
    debug!(%project_end, leaves = leaves.len(), critical, "critical path computed");
    Ok(result)
}
