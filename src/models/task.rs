//! Task (work item) model.
//!
//! A task is a node in a work breakdown forest: it may have a parent and
//! any number of children. Whether a task is a **parent** (summary) or a
//! **leaf** is never stored on the task; it is derived from the current
//! collection on every pass (see [`TaskTree`](crate::hierarchy::TaskTree)).
//!
//! # Date Representation
//! Dates have day resolution. `duration` counts days inclusively, so
//! `duration == day_count(start_date, end_date)` holds for every task the
//! engine returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Dependency, Health, TaskStatus};
use crate::calendar::{day_count, days_between, end_from_duration};

/// A unit of work in the project plan.
///
/// Fields above `is_critical` are caller-owned inputs (though parent
/// dates, progress, status and health are overwritten by rollup).
/// `is_critical` and `total_float` are derived by the critical-path pass
/// and never hand-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, stable identifier.
    pub id: String,
    /// Containing task, or `None` for a root.
    pub parent_id: Option<String>,
    /// Human-readable name.
    pub name: String,
    /// Responsible person.
    pub owner: String,
    /// Owner's role on the project.
    pub role: String,
    /// First working day.
    pub start_date: NaiveDate,
    /// Last working day (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive day count from `start_date` to `end_date`.
    pub duration: i64,
    /// Percent complete, 0-100.
    pub progress: u8,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Traffic-light indicator.
    #[serde(rename = "rag")]
    pub health: Health,
    /// Precedence links to predecessors.
    pub dependencies: Vec<Dependency>,
    /// Zero-duration visual marker; does not change scheduling.
    pub is_milestone: bool,
    /// Manual risk flag, independent of `status`.
    #[serde(default)]
    pub is_at_risk: bool,
    /// Whether children are shown in the outline.
    #[serde(default = "default_expanded")]
    pub is_expanded: bool,
    /// Planned start, for variance reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_start: Option<NaiveDate>,
    /// Planned end, for variance reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_end: Option<NaiveDate>,
    /// Derived: zero total float.
    #[serde(default)]
    pub is_critical: bool,
    /// Derived: days this task can slip without moving the project end.
    #[serde(default)]
    pub total_float: i64,
}

fn default_expanded() -> bool {
    true
}

impl Task {
    /// Creates a one-day, not-started root task.
    pub fn new(id: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            name: String::new(),
            owner: String::new(),
            role: String::new(),
            start_date,
            end_date: start_date,
            duration: 1,
            progress: 0,
            status: TaskStatus::NotStarted,
            health: Health::Gray,
            dependencies: Vec::new(),
            is_milestone: false,
            is_at_risk: false,
            is_expanded: true,
            baseline_start: None,
            baseline_end: None,
            is_critical: false,
            total_float: 0,
        }
    }

    /// Sets the parent task.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owner and role.
    pub fn with_owner(mut self, owner: impl Into<String>, role: impl Into<String>) -> Self {
        self.owner = owner.into();
        self.role = role.into();
        self
    }

    /// Sets the duration, keeping the start and rederiving the end.
    pub fn with_duration(mut self, duration: i64) -> Self {
        self.set_duration(duration);
        self
    }

    /// Sets both dates, rederiving the duration.
    pub fn with_dates(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self.set_end(end_date);
        self
    }

    /// Sets the progress (clamped to 100).
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the health indicator.
    pub fn with_health(mut self, health: Health) -> Self {
        self.health = health;
        self
    }

    /// Adds a predecessor link.
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Marks the task as a milestone.
    pub fn as_milestone(mut self) -> Self {
        self.is_milestone = true;
        self
    }

    /// Raises the manual risk flag.
    pub fn at_risk(mut self) -> Self {
        self.is_at_risk = true;
        self
    }

    /// Sets the baseline (planned) dates.
    pub fn with_baseline(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.baseline_start = Some(start);
        self.baseline_end = Some(end);
        self
    }

    /// Moves the start, keeping the duration.
    ///
    /// Near the end of the calendar the end saturates and the duration
    /// shrinks to the days that remain.
    pub fn set_start(&mut self, start_date: NaiveDate) {
        self.start_date = start_date;
        self.end_date = end_from_duration(start_date, self.duration);
        self.duration = day_count(self.start_date, self.end_date);
    }

    /// Moves the end, keeping the start. The end is floored at the start.
    pub fn set_end(&mut self, end_date: NaiveDate) {
        self.end_date = end_date.max(self.start_date);
        self.duration = day_count(self.start_date, self.end_date);
    }

    /// Changes the duration (floored at 1), keeping the start.
    pub fn set_duration(&mut self, duration: i64) {
        self.end_date = end_from_duration(self.start_date, duration);
        self.duration = day_count(self.start_date, self.end_date);
    }

    /// Days the current end lies after the baseline end.
    ///
    /// Positive = late, negative = early, `None` without a baseline.
    pub fn finish_variance_days(&self) -> Option<i64> {
        self.baseline_end
            .map(|baseline| days_between(baseline, self.end_date))
    }

    /// Whether this task references `predecessor_id` in any link.
    pub fn depends_on(&self, predecessor_id: &str) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.predecessor_id == predecessor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DependencyType;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    #[test]
    fn test_task_builder() {
        let task = Task::new("1.1", date(1, 1))
            .with_parent("1")
            .with_name("Market Analysis")
            .with_owner("John Doe", "Analyst")
            .with_duration(5)
            .with_progress(40)
            .with_status(TaskStatus::InProgress)
            .with_health(Health::Green)
            .with_dependency(Dependency::finish_to_start("0"))
            .at_risk();

        assert_eq!(task.id, "1.1");
        assert_eq!(task.parent_id.as_deref(), Some("1"));
        assert_eq!(task.name, "Market Analysis");
        assert_eq!(task.owner, "John Doe");
        assert_eq!(task.role, "Analyst");
        assert_eq!(task.end_date, date(1, 5));
        assert_eq!(task.duration, 5);
        assert_eq!(task.progress, 40);
        assert!(task.is_at_risk);
        assert!(task.depends_on("0"));
        assert!(!task.depends_on("2"));
    }

    #[test]
    fn test_task_defaults() {
        let task = Task::new("T", date(3, 1));
        assert_eq!(task.start_date, task.end_date);
        assert_eq!(task.duration, 1);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.health, Health::Gray);
        assert!(task.is_expanded);
        assert!(!task.is_critical);
    }

    #[test]
    fn test_progress_clamped() {
        let task = Task::new("T", date(1, 1)).with_progress(250);
        assert_eq!(task.progress, 100);
    }

    #[test]
    fn test_set_start_keeps_duration() {
        let mut task = Task::new("T", date(1, 1)).with_duration(5);
        task.set_start(date(1, 10));
        assert_eq!(task.end_date, date(1, 14));
        assert_eq!(task.duration, 5);
    }

    #[test]
    fn test_set_end_rederives_duration() {
        let mut task = Task::new("T", date(1, 1)).with_duration(5);
        task.set_end(date(1, 10));
        assert_eq!(task.duration, 10);

        task.set_end(NaiveDate::from_ymd_opt(2022, 12, 25).unwrap());
        assert_eq!(task.end_date, task.start_date);
        assert_eq!(task.duration, 1);
    }

    #[test]
    fn test_set_duration_floors_at_one() {
        let mut task = Task::new("T", date(1, 1)).with_duration(5);
        task.set_duration(0);
        assert_eq!(task.duration, 1);
        assert_eq!(task.end_date, date(1, 1));
    }

    #[test]
    fn test_dates_saturate_at_calendar_end() {
        let mut task = Task::new("T", date(1, 1)).with_duration(10);
        task.set_start(NaiveDate::MAX);
        assert_eq!(task.end_date, NaiveDate::MAX);
        assert_eq!(task.duration, 1);

        let mut long = Task::new("L", date(1, 1));
        long.set_duration(i64::MAX);
        assert_eq!(long.end_date, NaiveDate::MAX);
        assert_eq!(long.duration, day_count(long.start_date, NaiveDate::MAX));
    }

    #[test]
    fn test_finish_variance() {
        let task = Task::new("T", date(1, 1))
            .with_duration(15)
            .with_baseline(date(1, 1), date(1, 12));
        assert_eq!(task.finish_variance_days(), Some(3));
        assert_eq!(Task::new("U", date(1, 1)).finish_variance_days(), None);
    }

    #[test]
    fn test_serde_field_names() {
        let task = Task::new("2.2", date(12, 1))
            .with_duration(15)
            .with_dependency(Dependency::new("2.1", DependencyType::FinishToStart));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["startDate"], "2023-12-01");
        assert_eq!(json["endDate"], "2023-12-15");
        assert_eq!(json["rag"], "Gray");
        assert_eq!(json["dependencies"][0]["predecessorId"], "2.1");
        assert!(json.get("baselineStart").is_none());

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{
            "id": "1", "parentId": null, "name": "Inception", "owner": "", "role": "",
            "startDate": "2023-11-01", "endDate": "2023-11-15", "duration": 15,
            "progress": 80, "status": "InProgress", "rag": "Green",
            "dependencies": [], "isMilestone": false
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.is_expanded);
        assert!(!task.is_at_risk);
        assert_eq!(task.total_float, 0);
    }
}
