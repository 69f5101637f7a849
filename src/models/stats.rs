//! Project-level summary indicators.
//!
//! Computes the dashboard figures shown alongside a schedule from a
//! recomputed task collection.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total | Number of tasks (parents included) |
//! | Completed | Tasks with status Completed |
//! | At Risk | Tasks with Red health |
//! | Average Progress | Duration-weighted mean progress, rounded |
//! | Critical Path | IDs flagged critical, in collection order |
//! | Project Span | Earliest leaf start to latest leaf end |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Health, Task, TaskStatus};
use crate::hierarchy::TaskTree;

/// Schedule summary indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    /// Number of tasks in the collection.
    pub total_tasks: usize,
    /// Tasks whose status is Completed.
    pub completed_tasks: usize,
    /// Tasks whose health is Red.
    pub at_risk_tasks: usize,
    /// Duration-weighted average progress (0-100).
    pub average_progress: u8,
    /// IDs of critical tasks.
    pub critical_path: Vec<String>,
    /// Earliest leaf start.
    pub project_start: Option<NaiveDate>,
    /// Latest leaf end.
    pub project_end: Option<NaiveDate>,
}

impl ProjectStats {
    /// Computes the indicators for a collection.
    ///
    /// Expects a collection already passed through rollup and the
    /// critical-path pass; it does not recompute anything itself.
    pub fn calculate(tasks: &[Task]) -> Self {
        let tree = TaskTree::build(tasks);

        let completed_tasks = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        let at_risk_tasks = tasks.iter().filter(|t| t.health == Health::Red).count();

        let leaves = || tasks.iter().filter(|t| !tree.is_parent(&t.id));

        Self {
            total_tasks: tasks.len(),
            completed_tasks,
            at_risk_tasks,
            average_progress: weighted_progress(tasks.iter().map(|t| (t.progress, t.duration))),
            critical_path: tasks
                .iter()
                .filter(|t| t.is_critical)
                .map(|t| t.id.clone())
                .collect(),
            project_start: leaves().map(|t| t.start_date).min(),
            project_end: leaves().map(|t| t.end_date).max(),
        }
    }

    /// Share of tasks completed (0.0..1.0). Empty collections yield 0.0.
    pub fn completion_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            self.completed_tasks as f64 / self.total_tasks as f64
        }
    }
}

/// Duration-weighted mean of `(progress, duration)` pairs, rounded half up.
///
/// Returns 0 when the total duration is not positive.
pub(crate) fn weighted_progress<I>(items: I) -> u8
where
    I: IntoIterator<Item = (u8, i64)>,
{
    let (weighted, total) = items
        .into_iter()
        .fold((0i64, 0i64), |(w, t), (progress, duration)| {
            (
                w.saturating_add(i64::from(progress).saturating_mul(duration)),
                t.saturating_add(duration),
            )
        });
    if total <= 0 {
        return 0;
    }
    let rounded = weighted
        .saturating_mul(2)
        .saturating_add(total)
        / total.saturating_mul(2);
    rounded.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn test_stats_basic() {
        let mut a = Task::new("A", date(1))
            .with_duration(4)
            .with_progress(100)
            .with_status(TaskStatus::Completed);
        a.is_critical = true;
        let b = Task::new("B", date(5))
            .with_duration(6)
            .with_health(Health::Red);

        let stats = ProjectStats::calculate(&[a, b]);
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.at_risk_tasks, 1);
        assert_eq!(stats.average_progress, 40);
        assert_eq!(stats.critical_path, vec!["A".to_string()]);
        assert_eq!(stats.project_start, Some(date(1)));
        assert_eq!(stats.project_end, Some(date(10)));
        assert!((stats.completion_rate() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_stats_span_ignores_parents() {
        // Stale parent dates must not widen the span.
        let parent = Task::new("P", date(1)).with_duration(30);
        let child = Task::new("C", date(3)).with_parent("P").with_duration(2);
        let stats = ProjectStats::calculate(&[parent, child]);
        assert_eq!(stats.project_start, Some(date(3)));
        assert_eq!(stats.project_end, Some(date(4)));
    }

    #[test]
    fn test_stats_empty() {
        let stats = ProjectStats::calculate(&[]);
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.average_progress, 0);
        assert!(stats.critical_path.is_empty());
        assert_eq!(stats.project_end, None);
        assert!((stats.completion_rate() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_weighted_progress_rounds_half_up() {
        // 0.5 → 1
        assert_eq!(weighted_progress([(0, 1), (1, 1)]), 1);
        assert_eq!(weighted_progress([(100, 4), (0, 6)]), 40);
        assert_eq!(weighted_progress([(50, 0)]), 0);
    }
}
