//! Edit transactions over a task collection.
//!
//! [`ScheduleEngine`] is the single entry point a caller needs: every
//! operation takes the current collection, returns a new one, and leaves
//! the input untouched. Each result has been rolled up and carries fresh
//! critical-path flags.
//!
//! # Pipeline
//!
//! | Operation | Passes |
//! |-----------|--------|
//! | Date or duration edit | propagate → rollup → critical path |
//! | Link edit | enforce new links on the edited task → propagate if it moved → rollup → critical path |
//! | Any other edit | rollup → critical path |
//!
//! A link edit only ever moves the edited task and its own successors.
//! Other successors of the new predecessors keep their dates until that
//! predecessor is next edited.
//! | Insert / delete / recompute | rollup → critical path |

use chrono::{NaiveDate, Utc};
use rand::Rng;
use tracing::debug;

use crate::calendar::end_from_duration;
use crate::config::EngineConfig;
use crate::critical_path::identify_critical_path;
use crate::error::ScheduleError;
use crate::hierarchy::TaskTree;
use crate::models::{Dependency, Health, Task, TaskStatus};
use crate::notation::parse_dependencies;
use crate::propagation::propagate_changes;
use crate::rollup::rollup_hierarchy;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 5;

/// A single field change to one task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEdit {
    /// Move the start, keeping the duration.
    SetStart(NaiveDate),
    /// Move the end, keeping the start.
    SetEnd(NaiveDate),
    /// Change the duration (floored at 1), keeping the start.
    SetDuration(i64),
    /// Set progress (clamped to 100).
    SetProgress(u8),
    /// Set the lifecycle status.
    SetStatus(TaskStatus),
    /// Set the manual health. Rollup may override it from the status.
    SetHealth(Health),
    /// Raise or clear the manual risk flag.
    SetAtRisk(bool),
    /// Mark or unmark as milestone.
    SetMilestone(bool),
    /// Replace all predecessor links.
    SetDependencies(Vec<Dependency>),
    /// Replace all predecessor links from short-hand notation.
    SetDependencyNotation(String),
    /// Change the display name.
    Rename(String),
    /// Reassign the task.
    SetOwner {
        /// Responsible person.
        owner: String,
        /// Owner's role on the project.
        role: String,
    },
    /// Expand or collapse the task's children in the outline.
    SetExpanded(bool),
}

impl TaskEdit {
    fn moves_dates(&self) -> bool {
        matches!(
            self,
            Self::SetStart(_) | Self::SetEnd(_) | Self::SetDuration(_)
        )
    }
}

/// Applies edits and structural changes to task collections.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: EngineConfig,
}

impl ScheduleEngine {
    /// Creates an engine using `config` for new tasks.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration new tasks are created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates a not-started task with the configured defaults.
    ///
    /// The ID is `task-<unix millis>-<5 base-36 chars>`.
    pub fn create_task(&self, parent_id: Option<&str>, start_date: NaiveDate) -> Task {
        self.create_task_with_rng(parent_id, start_date, &mut rand::rng())
    }

    /// [`create_task`](Self::create_task) with a caller-supplied RNG.
    pub fn create_task_with_rng<R: Rng>(
        &self,
        parent_id: Option<&str>,
        start_date: NaiveDate,
        rng: &mut R,
    ) -> Task {
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
            .collect();
        let id = format!("task-{}-{suffix}", Utc::now().timestamp_millis());

        let duration = self.config.default_duration_days.max(1);
        let mut task = Task::new(id, start_date)
            .with_name(self.config.default_name.clone())
            .with_owner(
                self.config.default_owner.clone(),
                self.config.default_role.clone(),
            )
            .with_health(self.config.default_health);
        task.parent_id = parent_id.map(str::to_string);
        task.duration = duration;
        task.end_date = end_from_duration(start_date, duration);
        task
    }

    /// Applies one edit to task `id` and recomputes the schedule.
    ///
    /// Date and duration edits on parents are ignored; rollup owns their
    /// dates. Notation edits are atomic: a parse failure returns the error
    /// and nothing is changed. Replacing links pushes the edited task past
    /// its new predecessors and cascades from it; no other task is
    /// re-checked against those predecessors.
    ///
    /// # Errors
    /// - [`ScheduleError::TaskNotFound`] if `id` is unknown
    /// - [`ScheduleError::Parse`] for bad dependency notation
    /// - cycle errors from the recompute passes
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use gantt_core::engine::{ScheduleEngine, TaskEdit};
    /// use gantt_core::models::{Dependency, Task};
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
    /// let tasks = vec![
    ///     Task::new("A", d(1)).with_duration(5),
    ///     Task::new("B", d(6)).with_duration(3).with_dependency(Dependency::finish_to_start("A")),
    /// ];
    /// let engine = ScheduleEngine::default();
    /// let updated = engine.apply_edit(&tasks, "A", TaskEdit::SetEnd(d(10))).unwrap();
    /// assert_eq!(updated[1].start_date, d(11));
    /// ```
    pub fn apply_edit(
        &self,
        tasks: &[Task],
        id: &str,
        edit: TaskEdit,
    ) -> Result<Vec<Task>, ScheduleError> {
        let tree = TaskTree::build(tasks);
        let pos = tree
            .position(id)
            .ok_or_else(|| ScheduleError::TaskNotFound { id: id.to_string() })?;
        let is_parent = tree.is_parent(id);

        if edit.moves_dates() && is_parent {
            debug!(task = id, "ignoring date edit on summary task");
            return self.recompute(tasks);
        }

        let edit = match edit {
            TaskEdit::SetDependencyNotation(text) => {
                TaskEdit::SetDependencies(parse_dependencies(&text, tasks, id)?)
            }
            other => other,
        };
        let mut moves_dates = edit.moves_dates();
        let relinks = matches!(edit, TaskEdit::SetDependencies(_));

        let mut updated = tasks.to_vec();
        let task = &mut updated[pos];
        match edit {
            TaskEdit::SetStart(date) => task.set_start(date),
            TaskEdit::SetEnd(date) => task.set_end(date),
            TaskEdit::SetDuration(days) => task.set_duration(days),
            TaskEdit::SetProgress(progress) => task.progress = progress.min(100),
            TaskEdit::SetStatus(status) => task.status = status,
            TaskEdit::SetHealth(health) => task.health = health,
            TaskEdit::SetAtRisk(flag) => task.is_at_risk = flag,
            TaskEdit::SetMilestone(flag) => task.is_milestone = flag,
            TaskEdit::SetDependencies(dependencies) => task.dependencies = dependencies,
            TaskEdit::SetDependencyNotation(_) => {}
            TaskEdit::Rename(name) => task.name = name,
            TaskEdit::SetOwner { owner, role } => {
                task.owner = owner;
                task.role = role;
            }
            TaskEdit::SetExpanded(flag) => task.is_expanded = flag,
        }

        if relinks && !is_parent {
            if let Some(earliest) = earliest_allowed_start(&tree, &updated[pos]) {
                if updated[pos].start_date < earliest {
                    debug!(task = id, to = %earliest, "new links push edited task");
                    updated[pos].set_start(earliest);
                    moves_dates = true;
                }
            }
        }

        let rolled = if moves_dates {
            propagate_changes(&updated, id)?
        } else {
            rollup_hierarchy(&updated)?
        };
        identify_critical_path(&rolled)
    }

    /// Inserts `task` directly after the last descendant of its parent
    /// (or at the end for roots), then recomputes.
    pub fn insert_task(&self, tasks: &[Task], task: Task) -> Result<Vec<Task>, ScheduleError> {
        let tree = TaskTree::build(tasks);
        let at = task
            .parent_id
            .as_deref()
            .and_then(|parent| {
                let parent_pos = tree.position(parent)?;
                tree.descendants(parent)
                    .into_iter()
                    .chain(std::iter::once(parent_pos))
                    .max()
            })
            .map_or(tasks.len(), |last| last + 1);

        debug!(task = %task.id, at, "inserting task");
        let mut updated = tasks.to_vec();
        updated.insert(at, task);
        self.recompute(&updated)
    }

    /// Removes `id` with all its descendants and every link pointing at
    /// them, then recomputes.
    ///
    /// # Errors
    /// [`ScheduleError::TaskNotFound`] if `id` is unknown.
    pub fn delete_task(&self, tasks: &[Task], id: &str) -> Result<Vec<Task>, ScheduleError> {
        let tree = TaskTree::build(tasks);
        let pos = tree
            .position(id)
            .ok_or_else(|| ScheduleError::TaskNotFound { id: id.to_string() })?;

        let mut removed: std::collections::HashSet<&str> = tree
            .descendants(id)
            .into_iter()
            .map(|p| tasks[p].id.as_str())
            .collect();
        removed.insert(tasks[pos].id.as_str());

        let updated: Vec<Task> = tasks
            .iter()
            .filter(|t| !removed.contains(t.id.as_str()))
            .cloned()
            .map(|mut t| {
                t.dependencies
                    .retain(|d| !removed.contains(d.predecessor_id.as_str()));
                t
            })
            .collect();

        debug!(task = id, removed = removed.len(), "deleted subtree");
        self.recompute(&updated)
    }

    /// Full recompute: rollup, then critical path. Used on initial load.
    pub fn recompute(&self, tasks: &[Task]) -> Result<Vec<Task>, ScheduleError> {
        identify_critical_path(&rollup_hierarchy(tasks)?)
    }
}

/// Latest of the earliest starts `task`'s links allow, over leaf
/// predecessors other than itself. Predecessor dates are read from `tree`,
/// which differs from the edited collection only in `task`.
fn earliest_allowed_start(tree: &TaskTree<'_>, task: &Task) -> Option<NaiveDate> {
    task.dependencies
        .iter()
        .filter(|dep| dep.predecessor_id != task.id && !tree.is_parent(&dep.predecessor_id))
        .filter_map(|dep| {
            let pred = tree.get(&dep.predecessor_id)?;
            Some(dep.earliest_start(pred.start_date, pred.end_date, task.duration))
        })
        .max()
}
